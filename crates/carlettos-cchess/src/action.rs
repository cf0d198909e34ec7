use serde::{Deserialize, Serialize};

use crate::{
    piece::Piece,
    pos::{Direction, Pos, SubDirection},
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    /// A piece walks onto an empty tile.
    Move { from: Pos, to: Pos },
    /// A piece captures by moving onto an enemy.
    Take { from: Pos, to: Pos },
    /// A piece captures from a distance without moving.
    Attack { from: Pos, to: Pos },
    /// A piece uses its ability.
    Ability { from: Pos, info: Info },
}

impl Action {
    pub fn r#move(from: &Pos, to: &Pos) -> Self {
        Action::Move { from: *from, to: *to }
    }

    pub fn take(from: &Pos, to: &Pos) -> Self {
        Action::Take { from: *from, to: *to }
    }

    pub fn attack(from: &Pos, to: &Pos) -> Self {
        Action::Attack { from: *from, to: *to }
    }

    pub fn ability(from: &Pos, info: Info) -> Self {
        Action::Ability { from: *from, info }
    }

    pub fn is_move(&self) -> bool {
        matches!(self, Action::Move { .. })
    }

    pub fn is_take(&self) -> bool {
        matches!(self, Action::Take { .. })
    }

    pub fn is_attack(&self) -> bool {
        matches!(self, Action::Attack { .. })
    }

    pub fn is_ability(&self) -> bool {
        matches!(self, Action::Ability { .. })
    }

    pub fn origin(&self) -> &Pos {
        match self {
            Action::Move { from, .. }
            | Action::Take { from, .. }
            | Action::Attack { from, .. }
            | Action::Ability { from, .. } => from,
        }
    }

    /// The tile acted upon, if the action names one.
    pub fn target(&self) -> Option<&Pos> {
        match self {
            Action::Move { to, .. } | Action::Take { to, .. } | Action::Attack { to, .. } => Some(to),
            Action::Ability {
                info: Info::Pos(to),
                ..
            } => Some(to),
            Action::Ability { .. } => None,
        }
    }
}

/// Extra input an ability needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Info {
    Piece(Piece),
    Direction(Direction),
    SubDirection(SubDirection),
    Pos(Pos),
    Integer(usize),
    /// Throws the neighbour at `subdirection` `squares` tiles towards
    /// `direction`.
    Throw {
        direction: Direction,
        subdirection: SubDirection,
        squares: usize,
    },
    Paladin(PaladinOrder),
}

/// What a paladin does with the cards laid on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaladinOrder {
    /// Kills an enemy demonic piece.
    Attack(Pos),
    /// Shields an ally.
    Invulnerability(Pos),
    /// Brings the last fallen ally back on an empty tile.
    Revive(Pos),
}
