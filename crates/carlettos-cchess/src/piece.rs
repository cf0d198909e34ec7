//! Pieces, their types, timed effects and properties.

use std::mem;

use serde::{Deserialize, Serialize};

use crate::{
    ability,
    action::Action,
    board::Board,
    pattern,
    pos::Color,
    time::Time,
};

/// State shared by every piece.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PieceData {
    pub moved: bool,
    /// Time left before the ability can be used again.
    pub cooldown: Time,
    pub color: Color,
    pub types: Types,
    pub effects: Effects,
    pub properties: Properties,
}

impl PieceData {
    pub fn new(color: Color, types: Vec<Type>) -> Self {
        Self {
            color,
            types: Types(types),
            ..Default::default()
        }
    }

    pub fn with_props(color: Color, types: Vec<Type>, properties: Vec<Property>) -> Self {
        Self {
            properties: Properties(properties),
            ..Self::new(color, types)
        }
    }

    /// Whether the piece is allowed to perform the action at all.
    pub fn can_do(&self, action: &Action) -> bool {
        self.types.can_do(action) && self.effects.can_do(action)
    }

    /// Whether the piece can be the target of the action.
    pub fn can_be(&self, action: &Action) -> bool {
        self.types.can_be(action) && self.effects.can_be(action)
    }

    pub fn strength(&self) -> usize {
        self.properties.strength()
    }

    pub fn add_effect(&mut self, effect: Effect) {
        self.effects.0.push(effect);
    }

    /// Whether an effect of the same kind is active, regardless of its time.
    pub fn has_effect(&self, effect: &Effect) -> bool {
        self.effects.0.iter().any(|e| e.same_kind(effect))
    }

    pub fn tick(&mut self, unit: &Time) {
        self.cooldown.elapse(unit);
        self.effects.tick(unit);
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Piece {
    #[default]
    None,

    // Classic pieces
    Pawn(PieceData),
    Knight(PieceData),
    Bishop(PieceData),
    Rook(PieceData),
    Queen(PieceData),
    King(PieceData),

    // Starting pieces of the variant
    Archer(PieceData),
    Ballista(PieceData),
    Builder(PieceData),
    Cannon(PieceData),
    Catapult(PieceData),
    CrazyPawn(PieceData),
    Magician(PieceData),
    Paladin(PieceData),
    Ram(PieceData),
    ShieldBearer(PieceData),
    Ship(PieceData),
    SuperPawn(PieceData),
    TeslaTower(PieceData),
    Wall(PieceData),
    Warlock(PieceData),

    // Demonic pieces
    Portal(PieceData),
}

macro_rules! with_data {
    ($piece:expr, $data:ident => $body:expr, none => $none:expr) => {
        match $piece {
            Piece::None => $none,
            Piece::Pawn($data)
            | Piece::Knight($data)
            | Piece::Bishop($data)
            | Piece::Rook($data)
            | Piece::Queen($data)
            | Piece::King($data)
            | Piece::Archer($data)
            | Piece::Ballista($data)
            | Piece::Builder($data)
            | Piece::Cannon($data)
            | Piece::Catapult($data)
            | Piece::CrazyPawn($data)
            | Piece::Magician($data)
            | Piece::Paladin($data)
            | Piece::Ram($data)
            | Piece::ShieldBearer($data)
            | Piece::Ship($data)
            | Piece::SuperPawn($data)
            | Piece::TeslaTower($data)
            | Piece::Wall($data)
            | Piece::Warlock($data)
            | Piece::Portal($data) => $body,
        }
    };
}

impl Piece {
    pub fn data(&self) -> Option<&PieceData> {
        with_data!(self, data => Some(data), none => None)
    }

    pub fn data_mut(&mut self) -> Option<&mut PieceData> {
        with_data!(self, data => Some(data), none => None)
    }

    pub fn color(&self) -> Option<Color> {
        self.data().map(|data| data.color)
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Piece::None)
    }

    /// Variant name in snake case.
    pub fn name(&self) -> &'static str {
        match self {
            Piece::None => "none",
            Piece::Pawn(_) => "pawn",
            Piece::Knight(_) => "knight",
            Piece::Bishop(_) => "bishop",
            Piece::Rook(_) => "rook",
            Piece::Queen(_) => "queen",
            Piece::King(_) => "king",
            Piece::Archer(_) => "archer",
            Piece::Ballista(_) => "ballista",
            Piece::Builder(_) => "builder",
            Piece::Cannon(_) => "cannon",
            Piece::Catapult(_) => "catapult",
            Piece::CrazyPawn(_) => "crazy_pawn",
            Piece::Magician(_) => "magician",
            Piece::Paladin(_) => "paladin",
            Piece::Ram(_) => "ram",
            Piece::ShieldBearer(_) => "shield_bearer",
            Piece::Ship(_) => "ship",
            Piece::SuperPawn(_) => "super_pawn",
            Piece::TeslaTower(_) => "tesla_tower",
            Piece::Wall(_) => "wall",
            Piece::Warlock(_) => "warlock",
            Piece::Portal(_) => "portal",
        }
    }

    pub fn same_kind(&self, other: &Piece) -> bool {
        mem::discriminant(self) == mem::discriminant(other)
    }

    pub fn add_type(&mut self, type_: Type) {
        if let Some(data) = self.data_mut() {
            data.types.0.push(type_);
        }
    }

    fn any_type(&self, predicate: impl Fn(&Type) -> bool) -> bool {
        self.data()
            .is_some_and(|data| data.types.0.iter().any(predicate))
    }

    /// Type membership; sized types match by threshold, see the individual
    /// predicates.
    pub fn is_type(&self, type_: &Type) -> bool {
        match type_ {
            Type::Transportable(weight) => self.is_transportable(*weight),
            Type::Impenetrable(strength) => self.is_impenetrable(*strength),
            Type::Tough(life) => self.is_tough(*life),
            other => self.any_type(|t| t == other),
        }
    }

    pub fn is_biologic(&self) -> bool {
        self.any_type(|t| matches!(t, Type::Biologic))
    }

    pub fn is_structure(&self) -> bool {
        self.any_type(|t| matches!(t, Type::Structure))
    }

    /// Whether the piece weighs at most `max_weight`.
    pub fn is_transportable(&self, max_weight: usize) -> bool {
        self.any_type(|t| matches!(t, Type::Transportable(weight) if *weight <= max_weight))
    }

    /// Whether the piece resists something of `min_strength`.
    pub fn is_impenetrable(&self, min_strength: usize) -> bool {
        self.any_type(|t| matches!(t, Type::Impenetrable(strength) if *strength >= min_strength))
    }

    pub fn is_immune(&self) -> bool {
        self.any_type(|t| matches!(t, Type::Immune))
    }

    pub fn is_heroic(&self) -> bool {
        self.any_type(|t| matches!(t, Type::Heroic))
    }

    pub fn is_demonic(&self) -> bool {
        self.any_type(|t| matches!(t, Type::Demonic))
    }

    pub fn is_tough(&self, max_life: usize) -> bool {
        self.any_type(|t| matches!(t, Type::Tough(life) if *life <= max_life))
    }

    pub fn is_dead(&self) -> bool {
        self.any_type(|t| matches!(t, Type::Dead))
    }

    pub fn tick(&mut self, unit: &Time) {
        if let Some(data) = self.data_mut() {
            data.tick(unit);
        }
    }

    /// Whether this piece may perform `action` on `board`.
    ///
    /// Checks the piece's own types and effects, the target's types and
    /// effects, and the movement pattern of the piece. Tile occupancy of the
    /// destination is left to the caller.
    pub fn can_do(&self, board: &Board, action: &Action) -> bool {
        let Some(data) = self.data() else {
            return false;
        };
        if !data.can_do(action) {
            return false;
        }
        if let Some(target) = action.target()
            && !action.is_move()
            && board
                .get_data(target)
                .is_some_and(|target| !target.can_be(action))
        {
            return false;
        }

        match (self, action) {
            (Piece::None, _) => false,
            (_, Action::Ability { from, info }) => ability::of(self).is_some_and(|ability| {
                let cost = ability.data().cost;
                data.cooldown.is_zero()
                    && board
                        .player_from_color(&data.color)
                        .is_none_or(|player| player.mana >= cost)
                    && ability.can_use(board, from, info)
            }),

            (Piece::Pawn(_) | Piece::ShieldBearer(_), Action::Move { from, to }) => {
                pattern::pawn_move(board, &data.color, from, to)
            }
            (Piece::Pawn(_) | Piece::ShieldBearer(_), Action::Take { from, to }) => {
                pattern::pawn_take(&data.color, from, to)
            }
            (Piece::Knight(_), Action::Move { from, to } | Action::Take { from, to }) => {
                pattern::knight(from, to)
            }
            (Piece::Bishop(_), Action::Move { from, to } | Action::Take { from, to }) => {
                pattern::bishop(board, from, to)
            }
            (Piece::Rook(_), Action::Move { from, to } | Action::Take { from, to }) => {
                pattern::rook(board, from, to)
            }
            (
                Piece::Queen(_) | Piece::Paladin(_),
                Action::Move { from, to } | Action::Take { from, to },
            ) => pattern::queen(board, from, to),
            (Piece::King(_), Action::Move { from, to } | Action::Take { from, to }) => {
                pattern::king(from, to)
            }
            (Piece::Archer(_), Action::Move { from, to }) => pattern::archer_move(from, to),
            (Piece::Archer(_), Action::Attack { from, to }) => pattern::square(from, to, 4),
            (
                Piece::Ballista(_)
                | Piece::Cannon(_)
                | Piece::Catapult(_)
                | Piece::Ram(_),
                Action::Move { from, to },
            ) => pattern::structure_move(from, to),
            (Piece::Ballista(_), Action::Attack { from, to }) => {
                pattern::blockable_cross(board, from, to, &data.color, 6, data.strength())
            }
            (Piece::Cannon(_), Action::Attack { from, to }) => pattern::square(from, to, 3),
            (
                Piece::Builder(_)
                | Piece::Magician(_)
                | Piece::Ship(_)
                | Piece::TeslaTower(_)
                | Piece::Warlock(_),
                Action::Move { from, to },
            ) => pattern::magician_move(from, to),
            (Piece::Builder(_), Action::Take { from, to }) => pattern::cross(from, to, 1),
            (Piece::CrazyPawn(_), Action::Move { from, to } | Action::Take { from, to }) => {
                pattern::crazy_pawn(board, from, to)
            }
            (Piece::Ship(_), Action::Take { from, to }) => pattern::king(from, to),
            (Piece::SuperPawn(_), Action::Move { from, to }) => {
                pattern::super_pawn_move(board, &data.color, from, to)
            }
            (Piece::SuperPawn(_), Action::Take { from, to }) => {
                pattern::super_pawn_take(&data.color, from, to)
            }
            (Piece::TeslaTower(_), Action::Take { from, to }) => pattern::structure_move(from, to),
            _ => false,
        }
    }

    /// Every kind of piece, in declaration order.
    pub fn all(color: Color) -> Vec<Piece> {
        vec![
            Piece::pawn(color),
            Piece::knight(color),
            Piece::bishop(color),
            Piece::rook(color),
            Piece::queen(color),
            Piece::king(color),
            Piece::archer(color),
            Piece::ballista(color),
            Piece::builder(color),
            Piece::cannon(color),
            Piece::catapult(color),
            Piece::crazy_pawn(color),
            Piece::magician(color),
            Piece::paladin(color),
            Piece::ram(color),
            Piece::shield_bearer(color),
            Piece::ship(color),
            Piece::super_pawn(color),
            Piece::tesla_tower(color),
            Piece::wall(color),
            Piece::warlock(color),
            Piece::portal(color),
        ]
    }

    pub fn pawn(color: Color) -> Self {
        Self::Pawn(PieceData::new(color, vec![Type::Biologic, Type::Transportable(2)]))
    }

    pub fn knight(color: Color) -> Self {
        Self::Knight(PieceData::new(color, vec![Type::Biologic, Type::Transportable(4)]))
    }

    pub fn bishop(color: Color) -> Self {
        Self::Bishop(PieceData::new(color, vec![Type::Biologic, Type::Transportable(3)]))
    }

    pub fn rook(color: Color) -> Self {
        Self::Rook(PieceData::new(color, vec![Type::Structure]))
    }

    pub fn queen(color: Color) -> Self {
        Self::Queen(PieceData::new(color, vec![Type::Biologic, Type::Heroic]))
    }

    /// The king can teleport once per game.
    pub fn king(color: Color) -> Self {
        Self::King(PieceData::with_props(
            color,
            vec![Type::Biologic, Type::Heroic, Type::Immune],
            vec![Property::AbilityUsed(false)],
        ))
    }

    pub fn archer(color: Color) -> Self {
        Self::Archer(PieceData::new(color, vec![Type::Biologic, Type::Transportable(3)]))
    }

    pub fn ballista(color: Color) -> Self {
        Self::Ballista(PieceData::with_props(
            color,
            vec![Type::Structure],
            vec![Property::Strength(3)],
        ))
    }

    pub fn builder(color: Color) -> Self {
        Self::Builder(PieceData::new(color, vec![Type::Biologic, Type::Transportable(3)]))
    }

    pub fn cannon(color: Color) -> Self {
        Self::Cannon(PieceData::new(color, vec![Type::Structure]))
    }

    pub fn catapult(color: Color) -> Self {
        Self::Catapult(PieceData::new(color, vec![Type::Structure]))
    }

    pub fn crazy_pawn(color: Color) -> Self {
        Self::CrazyPawn(PieceData::new(color, vec![Type::Biologic, Type::Transportable(2)]))
    }

    pub fn magician(color: Color) -> Self {
        Self::Magician(PieceData::new(
            color,
            vec![Type::Biologic, Type::Transportable(4), Type::Heroic, Type::Immune],
        ))
    }

    pub fn paladin(color: Color) -> Self {
        Self::Paladin(PieceData::new(
            color,
            vec![Type::Biologic, Type::Transportable(4), Type::Heroic, Type::Immune],
        ))
    }

    pub fn ram(color: Color) -> Self {
        Self::Ram(PieceData::with_props(
            color,
            vec![Type::Structure],
            vec![Property::Strength(2)],
        ))
    }

    pub fn shield_bearer(color: Color) -> Self {
        Self::ShieldBearer(PieceData::new(
            color,
            vec![Type::Biologic, Type::Transportable(2), Type::Impenetrable(5)],
        ))
    }

    pub fn ship(color: Color) -> Self {
        Self::Ship(PieceData::new(color, vec![Type::Structure]))
    }

    pub fn super_pawn(color: Color) -> Self {
        Self::SuperPawn(PieceData::new(color, vec![Type::Biologic, Type::Transportable(2)]))
    }

    pub fn tesla_tower(color: Color) -> Self {
        Self::TeslaTower(PieceData::new(color, vec![Type::Structure]))
    }

    pub fn wall(color: Color) -> Self {
        Self::Wall(PieceData::new(color, vec![Type::Structure, Type::Impenetrable(2)]))
    }

    pub fn warlock(color: Color) -> Self {
        Self::Warlock(PieceData::new(
            color,
            vec![Type::Transportable(5), Type::Demonic, Type::Immune],
        ))
    }

    pub fn portal(color: Color) -> Self {
        Self::Portal(PieceData::new(color, vec![Type::Structure]))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Type {
    Biologic,
    Structure,
    /// Can be carried; holds its weight.
    Transportable(usize),
    /// Blocks what is weaker than its strength.
    Impenetrable(usize),
    /// Cannot be targeted by abilities.
    Immune,
    /// Cannot be attacked.
    Heroic,
    Demonic,
    /// Has to be taken several times.
    Tough(usize),
    Dead,
}

impl Type {
    pub fn can_do(&self, _action: &Action) -> bool {
        true
    }

    pub fn can_be(&self, action: &Action) -> bool {
        match self {
            Type::Immune => !action.is_ability(),
            Type::Heroic => !action.is_attack(),
            _ => true,
        }
    }
}

/// Timed status on a piece; removed once its time runs out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Effect {
    Deactivate(Time),
    Fire(Time),
    Ice(Time),
    Invulnerability(Time),
}

impl Effect {
    pub fn deactivate() -> Self {
        Effect::Deactivate(Time::rounds(6))
    }

    pub fn fire() -> Self {
        Effect::Fire(Time::rounds(5))
    }

    pub fn ice() -> Self {
        Effect::Ice(Time::rounds(3))
    }

    pub fn invulnerability() -> Self {
        Effect::Invulnerability(Time::rounds(3))
    }

    pub fn time(&self) -> &Time {
        match self {
            Effect::Deactivate(time)
            | Effect::Fire(time)
            | Effect::Ice(time)
            | Effect::Invulnerability(time) => time,
        }
    }

    fn time_mut(&mut self) -> &mut Time {
        match self {
            Effect::Deactivate(time)
            | Effect::Fire(time)
            | Effect::Ice(time)
            | Effect::Invulnerability(time) => time,
        }
    }

    pub fn same_kind(&self, other: &Effect) -> bool {
        mem::discriminant(self) == mem::discriminant(other)
    }

    pub fn can_do(&self, _action: &Action) -> bool {
        !matches!(self, Effect::Deactivate(_) | Effect::Ice(_))
    }

    pub fn can_be(&self, _action: &Action) -> bool {
        !matches!(self, Effect::Invulnerability(_))
    }

    pub fn is_expired(&self) -> bool {
        self.time().is_zero()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Property {
    /// For pieces whose ability works once, like the king.
    AbilityUsed(bool),
    /// Times a tough piece has been taken.
    Taken(usize),
    /// Pieces carried or controlled by this one.
    Pieces(Vec<Piece>),
    /// Compared against `Type::Impenetrable`.
    Strength(usize),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Types(pub Vec<Type>);

impl Types {
    pub fn can_do(&self, action: &Action) -> bool {
        self.0.iter().all(|t| t.can_do(action))
    }

    pub fn can_be(&self, action: &Action) -> bool {
        self.0.iter().all(|t| t.can_be(action))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Effects(pub Vec<Effect>);

impl Effects {
    pub fn can_do(&self, action: &Action) -> bool {
        self.0.iter().all(|e| e.can_do(action))
    }

    pub fn can_be(&self, action: &Action) -> bool {
        self.0.iter().all(|e| e.can_be(action))
    }

    pub fn tick(&mut self, unit: &Time) {
        for effect in self.0.iter_mut() {
            effect.time_mut().elapse(unit);
        }
        self.0.retain(|effect| !effect.is_expired());
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Properties(pub Vec<Property>);

impl Properties {
    pub fn has_used_ability(&self) -> bool {
        self.0.iter().any(|p| matches!(p, Property::AbilityUsed(true)))
    }

    /// Marks the single-use ability as spent.
    pub fn use_ability(&mut self) {
        self.0.retain(|p| !matches!(p, Property::AbilityUsed(_)));
        self.0.push(Property::AbilityUsed(true));
    }

    pub fn taken_times(&self) -> usize {
        self.0
            .iter()
            .filter_map(|p| match p {
                Property::Taken(times) => Some(*times),
                _ => None,
            })
            .sum()
    }

    pub fn strength(&self) -> usize {
        self.0
            .iter()
            .filter_map(|p| match p {
                Property::Strength(strength) => Some(*strength),
                _ => None,
            })
            .sum()
    }
}
