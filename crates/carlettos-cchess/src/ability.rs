//! Piece abilities.
//!
//! Every ability has a mana cost paid by the owner and a cooldown that starts
//! when it is used. Legality is checked by [`Ability::can_use`]; cooldown and
//! mana are handled by `Piece::can_do` and `Board::make`.

use std::collections::VecDeque;

use crate::{
    action::{Action, Info, PaladinOrder},
    board::{Board, Event, EventFunction, FilterFunction, Mana},
    card::Card,
    error::CChessError,
    pattern,
    piece::{Effect, Piece, Type},
    pos::{Color, Direction, Pos},
    time::Time,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AbilityData {
    pub cooldown: Time,
    pub cost: Mana,
}

impl AbilityData {
    const fn new(cooldown: Time, cost: usize) -> Self {
        Self {
            cooldown,
            cost: Mana(cost),
        }
    }
}

pub trait Ability: Sync {
    fn data(&self) -> AbilityData;

    fn can_use(&self, board: &Board, from: &Pos, info: &Info) -> bool;

    fn apply(&self, board: &mut Board, from: &Pos, info: Info) -> Result<(), CChessError>;
}

/// The ability of a piece, if it has one.
pub fn of(piece: &Piece) -> Option<&'static dyn Ability> {
    match piece {
        Piece::Pawn(_) => Some(&Promotion),
        Piece::Knight(_) => Some(&KnightEscort),
        Piece::Bishop(_) => Some(&BishopStep),
        Piece::Rook(_) => Some(&RookThrow),
        Piece::Queen(_) => Some(&QueenJump),
        Piece::King(_) => Some(&KingTeleport),
        Piece::Builder(_) => Some(&BuildWalls),
        Piece::Catapult(_) => Some(&CatapultThrow),
        Piece::CrazyPawn(_) => Some(&CrazyDraw),
        Piece::Magician(_) => Some(&Elements),
        Piece::Paladin(_) => Some(&Crusade),
        Piece::Ram(_) => Some(&Charge),
        Piece::ShieldBearer(_) => Some(&ShieldWall),
        Piece::Ship(_) => Some(&Broadside),
        Piece::SuperPawn(_) => Some(&Harden),
        Piece::TeslaTower(_) => Some(&Discharge),
        Piece::Warlock(_) => Some(&SummonPortal),
        _ => None,
    }
}

fn owner(board: &Board, from: &Pos) -> Result<Color, CChessError> {
    board
        .get_piece(from)
        .ok_or(CChessError::OutOfBoard(*from))?
        .color()
        .ok_or(CChessError::EmptyTile(*from))
}

fn relocate(board: &mut Board, from: &Pos, to: &Pos) -> Result<(), CChessError> {
    let piece = board
        .get_mut(from)
        .ok_or(CChessError::OutOfBoard(*from))?
        .remove();
    board
        .get_mut(to)
        .ok_or(CChessError::OutOfBoard(*to))?
        .replace(piece);
    Ok(())
}

/// A pawn on the last row turns into another piece of its color.
pub struct Promotion;

impl Ability for Promotion {
    fn data(&self) -> AbilityData {
        AbilityData::new(Time::default(), 0)
    }

    fn can_use(&self, board: &Board, from: &Pos, info: &Info) -> bool {
        let Ok(color) = owner(board, from) else {
            return false;
        };
        let Info::Piece(piece) = info else {
            return false;
        };
        let last_row = from
            .shift(0, color.forward())
            .is_none_or(|next| !board.contains(&next));
        last_row
            && piece.color() == Some(color)
            && !matches!(piece, Piece::King(_) | Piece::Pawn(_))
    }

    fn apply(&self, board: &mut Board, from: &Pos, info: Info) -> Result<(), CChessError> {
        let Info::Piece(piece) = info else {
            return Err(CChessError::InvalidInfo("piece"));
        };
        board.place(from, piece);
        Ok(())
    }
}

/// The knight calls two pawns to its east and west.
pub struct KnightEscort;

impl Ability for KnightEscort {
    fn data(&self) -> AbilityData {
        AbilityData::new(Time::rounds(10), 1)
    }

    fn can_use(&self, board: &Board, from: &Pos, _info: &Info) -> bool {
        [from.east(), from.west()]
            .iter()
            .all(|side| side.is_some_and(|pos| board.is_empty(&pos)))
    }

    fn apply(&self, board: &mut Board, from: &Pos, _info: Info) -> Result<(), CChessError> {
        let color = owner(board, from)?;
        for side in [from.east(), from.west()].into_iter().flatten() {
            board.place(&side, Piece::pawn(color));
        }
        Ok(())
    }
}

/// The bishop steps one tile orthogonally.
pub struct BishopStep;

impl Ability for BishopStep {
    fn data(&self) -> AbilityData {
        AbilityData::new(Time::rounds(2), 0)
    }

    fn can_use(&self, board: &Board, from: &Pos, info: &Info) -> bool {
        match info {
            Info::Direction(direction) => from
                .direction_shift(direction)
                .is_some_and(|to| board.is_empty(&to)),
            _ => false,
        }
    }

    fn apply(&self, board: &mut Board, from: &Pos, info: Info) -> Result<(), CChessError> {
        let Info::Direction(direction) = info else {
            return Err(CChessError::InvalidInfo("direction"));
        };
        let to = from
            .direction_shift(&direction)
            .ok_or(CChessError::OutOfBoard(*from))?;
        relocate(board, from, &to)
    }
}

/// Every allied rook connected to this one slides in a direction until it
/// hits a piece or the edge of the board.
pub struct RookThrow;

impl RookThrow {
    fn group(board: &Board, from: &Pos) -> Vec<Pos> {
        let Some(color) = board.get_piece(from).and_then(Piece::color) else {
            return Vec::new();
        };
        let is_allied_rook = |pos: &Pos| {
            board
                .get_piece(pos)
                .is_some_and(|piece| matches!(piece, Piece::Rook(_)) && piece.color() == Some(color))
        };

        let mut group = vec![*from];
        let mut queue = VecDeque::from([*from]);
        while let Some(pos) = queue.pop_front() {
            for tile in board.get_nearby_tiles(&pos) {
                let next = *tile.pos();
                if is_allied_rook(&next) && !group.contains(&next) {
                    group.push(next);
                    queue.push_back(next);
                }
            }
        }
        group
    }
}

impl Ability for RookThrow {
    fn data(&self) -> AbilityData {
        AbilityData::new(Time::rounds(10), 0)
    }

    fn can_use(&self, _board: &Board, _from: &Pos, info: &Info) -> bool {
        matches!(info, Info::Direction(_))
    }

    fn apply(&self, board: &mut Board, from: &Pos, info: Info) -> Result<(), CChessError> {
        let Info::Direction(direction) = info else {
            return Err(CChessError::InvalidInfo("direction"));
        };
        let mut rooks = Self::group(board, from);
        // The rook closest to the destination edge moves first.
        rooks.sort_by(|a, b| match direction {
            Direction::N => b.y.cmp(&a.y),
            Direction::E => b.x.cmp(&a.x),
            Direction::S => a.y.cmp(&b.y),
            Direction::W => a.x.cmp(&b.x),
        });
        for rook in rooks {
            let ray = board.ray_cast_empty(&rook, None, direction.vector());
            if let Some(last) = ray.last().copied() {
                relocate(board, &rook, &last)?;
            }
        }
        Ok(())
    }
}

/// The queen jumps like a knight onto an empty tile.
pub struct QueenJump;

impl Ability for QueenJump {
    fn data(&self) -> AbilityData {
        AbilityData::new(Time::rounds(5), 0)
    }

    fn can_use(&self, board: &Board, from: &Pos, info: &Info) -> bool {
        matches!(info, Info::Pos(to) if pattern::knight(from, to) && board.is_empty(to))
    }

    fn apply(&self, board: &mut Board, from: &Pos, info: Info) -> Result<(), CChessError> {
        let Info::Pos(to) = info else {
            return Err(CChessError::InvalidInfo("position"));
        };
        relocate(board, from, &to)
    }
}

/// Once per game the king teleports to an empty tile within five tiles.
pub struct KingTeleport;

impl Ability for KingTeleport {
    fn data(&self) -> AbilityData {
        AbilityData::new(Time::default(), 2)
    }

    fn can_use(&self, board: &Board, from: &Pos, info: &Info) -> bool {
        let used = board
            .get_data(from)
            .is_some_and(|data| data.properties.has_used_ability());
        !used && matches!(info, Info::Pos(to) if pattern::square(from, to, 5) && board.is_empty(to))
    }

    fn apply(&self, board: &mut Board, from: &Pos, info: Info) -> Result<(), CChessError> {
        let Info::Pos(to) = info else {
            return Err(CChessError::InvalidInfo("position"));
        };
        relocate(board, from, &to)?;
        if let Some(data) = board.get_data_mut(&to) {
            data.properties.use_ability();
        }
        Ok(())
    }
}

/// The builder raises walls on the three empty tiles facing a direction.
pub struct BuildWalls;

impl Ability for BuildWalls {
    fn data(&self) -> AbilityData {
        AbilityData::new(Time::rounds(10), 0)
    }

    fn can_use(&self, _board: &Board, _from: &Pos, info: &Info) -> bool {
        matches!(info, Info::Direction(_))
    }

    fn apply(&self, board: &mut Board, from: &Pos, info: Info) -> Result<(), CChessError> {
        let Info::Direction(direction) = info else {
            return Err(CChessError::InvalidInfo("direction"));
        };
        let color = owner(board, from)?;
        for subdirection in direction.related_subdirections() {
            if let Some(tile) = from
                .subdirection_shift(&subdirection)
                .and_then(|pos| board.get_mut(&pos))
                && tile.is_empty()
                && tile.buildable
            {
                tile.replace(Piece::wall(color));
            }
        }
        Ok(())
    }
}

/// The catapult throws a light neighbour up to a few tiles away.
pub struct CatapultThrow;

impl CatapultThrow {
    const MAX_WEIGHT: usize = 5;

    fn landing(from: &Pos, direction: &Direction, squares: usize) -> Option<Pos> {
        let (dx, dy) = direction.vector();
        let squares = isize::try_from(squares).ok()?;
        from.shift(dx * squares, dy * squares)
    }
}

impl Ability for CatapultThrow {
    fn data(&self) -> AbilityData {
        AbilityData::new(Time::rounds(2), 0)
    }

    fn can_use(&self, board: &Board, from: &Pos, info: &Info) -> bool {
        let Info::Throw {
            direction,
            subdirection,
            squares,
        } = info
        else {
            return false;
        };
        let carried = from
            .subdirection_shift(subdirection)
            .and_then(|pos| board.get_piece(&pos))
            .is_some_and(|piece| piece.is_transportable(Self::MAX_WEIGHT));
        carried
            && *squares > 0
            && Self::landing(from, direction, *squares).is_some_and(|to| board.is_empty(&to))
    }

    fn apply(&self, board: &mut Board, from: &Pos, info: Info) -> Result<(), CChessError> {
        let Info::Throw {
            direction,
            subdirection,
            squares,
        } = info
        else {
            return Err(CChessError::InvalidInfo("throw"));
        };
        let carried = from
            .subdirection_shift(&subdirection)
            .ok_or(CChessError::OutOfBoard(*from))?;
        let to = Self::landing(from, &direction, squares).ok_or(CChessError::OutOfBoard(*from))?;
        relocate(board, &carried, &to)
    }
}

/// At the end of the turn the owner draws two cards and shuffles the deck.
pub struct CrazyDraw;

impl Ability for CrazyDraw {
    fn data(&self) -> AbilityData {
        AbilityData::new(Time::default(), 0)
    }

    fn can_use(&self, _board: &Board, _from: &Pos, _info: &Info) -> bool {
        true
    }

    fn apply(&self, board: &mut Board, from: &Pos, _info: Info) -> Result<(), CChessError> {
        let color = owner(board, from)?;
        let player_id = board
            .player_from_color(&color)
            .map(|player| player.id())
            .ok_or_else(|| CChessError::IllegalAction(format!("no player plays {:?}", color)))?;
        board.add_event(
            Event::new(
                "crazy pawn cards",
                vec![
                    EventFunction::TakeCard(player_id),
                    EventFunction::TakeCard(player_id),
                    EventFunction::ShuffleDeck(player_id),
                ],
            )
            .at(*from),
        );
        Ok(())
    }
}

/// With ice or fire cards on the board, the magician spreads those effects
/// over enemies within four tiles.
pub struct Elements;

impl Ability for Elements {
    fn data(&self) -> AbilityData {
        AbilityData::new(Time::rounds(6), 2)
    }

    fn can_use(&self, board: &Board, _from: &Pos, _info: &Info) -> bool {
        board.has_any_card_on_board(&[Card::Ice, Card::Fire])
    }

    fn apply(&self, board: &mut Board, from: &Pos, _info: Info) -> Result<(), CChessError> {
        let color = owner(board, from)?;
        let fire = board.has_card_on_board(Card::Fire);
        let ice = board.has_card_on_board(Card::Ice);
        board
            .iter_mut_from_pattern(from, |from, to| pattern::square(from, to, 4))
            .filter(|tile| tile.has_piece() && !tile.is_controlled_by(&color))
            .filter_map(|tile| tile.piece.data_mut())
            .for_each(|data| {
                if fire {
                    data.add_effect(Effect::fire());
                }
                if ice {
                    data.add_effect(Effect::ice());
                }
            });
        Ok(())
    }
}

/// The paladin acts through the attack demonic, invulnerability and revive
/// cards laid on the board.
pub struct Crusade;

impl Ability for Crusade {
    fn data(&self) -> AbilityData {
        AbilityData::new(Time::rounds(8), 2)
    }

    fn can_use(&self, board: &Board, from: &Pos, info: &Info) -> bool {
        let (Ok(color), Info::Paladin(order)) = (owner(board, from), info) else {
            return false;
        };
        match order {
            PaladinOrder::Attack(to) => {
                board.has_card_on_board(Card::AttackDemonic)
                    && board
                        .get_piece(to)
                        .is_some_and(|piece| piece.is_demonic() && piece.color() != Some(color))
                    && board
                        .get_data(to)
                        .is_some_and(|data| data.can_be(&Action::attack(from, to)))
            }
            PaladinOrder::Invulnerability(to) => {
                board.has_card_on_board(Card::Invulnerability)
                    && board
                        .get_piece(to)
                        .is_some_and(|piece| piece.color() == Some(color))
            }
            PaladinOrder::Revive(to) => {
                board.has_card_on_board(Card::Revive)
                    && board.is_empty(to)
                    && board.get_last_dead_with_color(&color).is_some()
            }
        }
    }

    fn apply(&self, board: &mut Board, from: &Pos, info: Info) -> Result<(), CChessError> {
        let Info::Paladin(order) = info else {
            return Err(CChessError::InvalidInfo("paladin order"));
        };
        match order {
            PaladinOrder::Attack(to) => board.attack_piece(from, &to),
            PaladinOrder::Invulnerability(to) => {
                board
                    .get_data_mut(&to)
                    .ok_or(CChessError::EmptyTile(to))?
                    .add_effect(Effect::Invulnerability(Time::rounds(5)));
                Ok(())
            }
            PaladinOrder::Revive(to) => {
                let color = owner(board, from)?;
                if !board.is_empty(&to) {
                    return Err(CChessError::IllegalAction(format!("{} is occupied", to)));
                }
                let revived = board
                    .remove_last_dead_with_color(&color)
                    .ok_or_else(|| CChessError::IllegalAction("no fallen ally".to_string()))?;
                board.place(&to, revived);
                Ok(())
            }
        }
    }
}

/// The ram rushes in a direction. The first piece it meets dies, and a long
/// run carries it through more pieces until something resists its strength.
pub struct Charge;

impl Ability for Charge {
    fn data(&self) -> AbilityData {
        AbilityData::new(Time::turns(4), 0)
    }

    fn can_use(&self, _board: &Board, _from: &Pos, info: &Info) -> bool {
        matches!(info, Info::Direction(_))
    }

    fn apply(&self, board: &mut Board, from: &Pos, info: Info) -> Result<(), CChessError> {
        let Info::Direction(direction) = info else {
            return Err(CChessError::InvalidInfo("direction"));
        };
        let strength = board.get_data(from).map(|data| data.strength()).unwrap_or_default();
        let resists = |board: &Board, pos: &Pos| {
            board
                .get_piece(pos)
                .is_some_and(|piece| piece.is_impenetrable(strength))
        };

        let ray = board.ray_cast_empty(from, None, direction.vector());
        let mut landing = ray.last().copied();
        if let Some(hit) = ray.collision.filter(|hit| !resists(board, hit)) {
            // Every five tiles of run-up break through one more piece.
            let charge = ray.len() / 5 + 1;
            let mut crushed = vec![hit];
            while crushed.len() <= charge {
                let next = crushed
                    .last()
                    .and_then(|pos| pos.direction_shift(&direction))
                    .filter(|pos| board.contains(pos) && !resists(board, pos));
                match next {
                    Some(next) => crushed.push(next),
                    None => break,
                }
            }
            for pos in &crushed {
                board.attack_piece(from, pos)?;
            }
            landing = crushed.last().copied();
        }
        match landing {
            Some(to) => relocate(board, from, &to),
            None => Ok(()),
        }
    }
}

/// Allies around the shield bearer become impenetrable.
pub struct ShieldWall;

impl Ability for ShieldWall {
    fn data(&self) -> AbilityData {
        AbilityData::new(Time::rounds(15), 0)
    }

    fn can_use(&self, _board: &Board, _from: &Pos, _info: &Info) -> bool {
        true
    }

    fn apply(&self, board: &mut Board, from: &Pos, _info: Info) -> Result<(), CChessError> {
        let color = owner(board, from)?;
        board
            .iter_mut_from_pattern(from, pattern::king)
            .filter(|tile| tile.is_controlled_by(&color))
            .for_each(|tile| tile.piece.add_type(Type::Impenetrable(1)));
        Ok(())
    }
}

/// The ship fires at the six tiles on its east and west flanks.
pub struct Broadside;

impl Ability for Broadside {
    fn data(&self) -> AbilityData {
        AbilityData::new(Time::rounds(12), 0)
    }

    fn can_use(&self, _board: &Board, _from: &Pos, _info: &Info) -> bool {
        true
    }

    fn apply(&self, board: &mut Board, from: &Pos, _info: Info) -> Result<(), CChessError> {
        let color = owner(board, from)?;
        let targets: Vec<Pos> = [Direction::E, Direction::W]
            .iter()
            .flat_map(|direction| direction.related_subdirections())
            .filter_map(|subdirection| from.subdirection_shift(&subdirection))
            .filter(|pos| {
                board.get(pos).is_some_and(|tile| {
                    tile.has_piece() && !tile.is_controlled_by(&color) && !tile.piece.is_heroic()
                })
            })
            .collect();
        for target in targets {
            board.attack_piece(from, &target)?;
        }
        Ok(())
    }
}

/// The super pawn makes itself immune and impenetrable.
pub struct Harden;

impl Ability for Harden {
    fn data(&self) -> AbilityData {
        AbilityData::new(Time::rounds(10), 0)
    }

    fn can_use(&self, board: &Board, from: &Pos, _info: &Info) -> bool {
        board
            .get_piece(from)
            .is_some_and(|piece| !piece.is_immune() && !piece.is_impenetrable(10))
    }

    fn apply(&self, board: &mut Board, from: &Pos, _info: Info) -> Result<(), CChessError> {
        let tile = board.get_mut(from).ok_or(CChessError::OutOfBoard(*from))?;
        tile.piece.add_type(Type::Immune);
        tile.piece.add_type(Type::Impenetrable(10));
        Ok(())
    }
}

/// Two turns later, enemy structures within three tiles are deactivated.
pub struct Discharge;

impl Ability for Discharge {
    fn data(&self) -> AbilityData {
        AbilityData::new(Time::rounds(10), 1)
    }

    fn can_use(&self, _board: &Board, _from: &Pos, _info: &Info) -> bool {
        true
    }

    fn apply(&self, board: &mut Board, from: &Pos, _info: Info) -> Result<(), CChessError> {
        let color = owner(board, from)?;
        board.add_event(
            Event::with_time(
                "tesla tower discharge",
                Time::turns(2),
                vec![EventFunction::ApplyEffect(
                    Effect::deactivate(),
                    *from,
                    FilterFunction::all([
                        FilterFunction::Square(3),
                        FilterFunction::IsType(Type::Structure),
                        FilterFunction::IsNotColor(color),
                    ]),
                )],
            )
            .at(*from),
        );
        Ok(())
    }
}

/// The warlock opens portals on adjacent empty magic tiles.
pub struct SummonPortal;

impl Ability for SummonPortal {
    fn data(&self) -> AbilityData {
        AbilityData::new(Time::rounds(5), 3)
    }

    fn can_use(&self, board: &Board, from: &Pos, _info: &Info) -> bool {
        board
            .iter_from_pattern(from, pattern::king)
            .any(|tile| tile.is_empty() && tile.buildable && tile.magic)
    }

    fn apply(&self, board: &mut Board, from: &Pos, _info: Info) -> Result<(), CChessError> {
        let color = owner(board, from)?;
        board
            .iter_mut_from_pattern(from, pattern::king)
            .filter(|tile| tile.is_empty() && tile.buildable && tile.magic)
            .for_each(|tile| {
                tile.replace(Piece::portal(color));
            });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{action::Action, pos::SubDirection};

    fn use_ability(board: &mut Board, from: Pos, info: Info) -> Result<(), CChessError> {
        let action = Action::ability(&from, info);
        let allowed = board
            .get_piece(&from)
            .is_some_and(|piece| piece.can_do(board, &action));
        if !allowed {
            return Err(CChessError::IllegalAction("refused".to_string()));
        }
        board.make(action)
    }

    #[test]
    fn test_rook_throw_moves_the_whole_group() {
        let mut board = Board::default();
        for pos in [Pos::new(1, 1), Pos::new(1, 2), Pos::new(2, 1)] {
            board.place(&pos, Piece::rook(Color::White));
        }
        board.place(&Pos::new(5, 5), Piece::rook(Color::White));

        RookThrow
            .apply(&mut board, &Pos::new(1, 1), Info::Direction(Direction::N))
            .unwrap();

        let rook_at = |board: &Board, x, y| matches!(board.get_piece(&Pos::new(x, y)), Some(Piece::Rook(_)));
        assert!(!rook_at(&board, 1, 1));
        assert!(!rook_at(&board, 1, 2));
        assert!(!rook_at(&board, 2, 1));
        assert!(rook_at(&board, 1, 7));
        assert!(rook_at(&board, 1, 6));
        assert!(rook_at(&board, 2, 7));
        assert!(rook_at(&board, 5, 5));
    }

    #[test]
    fn test_promotion_only_on_last_row() {
        let mut board = Board::default();
        board.place(&Pos::new(2, 7), Piece::pawn(Color::White));
        board.place(&Pos::new(3, 6), Piece::pawn(Color::White));

        let queen = Info::Piece(Piece::queen(Color::White));
        assert!(use_ability(&mut board, Pos::new(3, 6), queen.clone()).is_err());
        assert!(use_ability(&mut board, Pos::new(2, 7), Info::Piece(Piece::king(Color::White))).is_err());
        assert!(use_ability(&mut board, Pos::new(2, 7), Info::Piece(Piece::queen(Color::Black))).is_err());
        use_ability(&mut board, Pos::new(2, 7), queen).unwrap();
        assert!(matches!(board.get_piece(&Pos::new(2, 7)), Some(Piece::Queen(_))));
    }

    #[test]
    fn test_knight_escort_costs_mana_and_cools_down() {
        let mut board = Board::default();
        board.place(&Pos::new(3, 3), Piece::knight(Color::White));
        let info = Info::Integer(0);

        assert!(use_ability(&mut board, Pos::new(3, 3), info.clone()).is_err());
        board.mut_player_from_color(&Color::White).unwrap().mana = Mana(2);
        use_ability(&mut board, Pos::new(3, 3), info.clone()).unwrap();

        assert!(matches!(board.get_piece(&Pos::new(2, 3)), Some(Piece::Pawn(_))));
        assert!(matches!(board.get_piece(&Pos::new(4, 3)), Some(Piece::Pawn(_))));
        assert_eq!(board.player_from_color(&Color::White).unwrap().mana, Mana(1));
        assert_eq!(
            board.get_data(&Pos::new(3, 3)).map(|d| d.cooldown),
            Some(Time::rounds(10))
        );

        board.place(&Pos::new(2, 3), Piece::None);
        board.place(&Pos::new(4, 3), Piece::None);
        assert!(use_ability(&mut board, Pos::new(3, 3), info).is_err());
    }

    #[test]
    fn test_king_teleports_once() {
        let mut board = Board::default();
        board.place(&Pos::new(0, 0), Piece::king(Color::White));
        board.mut_player_from_color(&Color::White).unwrap().mana = Mana(10);

        assert!(use_ability(&mut board, Pos::new(0, 0), Info::Pos(Pos::new(6, 6))).is_err());
        use_ability(&mut board, Pos::new(0, 0), Info::Pos(Pos::new(5, 5))).unwrap();
        assert!(matches!(board.get_piece(&Pos::new(5, 5)), Some(Piece::King(_))));
        assert!(use_ability(&mut board, Pos::new(5, 5), Info::Pos(Pos::new(4, 4))).is_err());
    }

    #[test]
    fn test_queen_and_bishop_moves() {
        let mut board = Board::default();
        board.place(&Pos::new(3, 3), Piece::queen(Color::White));
        board.place(&Pos::new(0, 0), Piece::bishop(Color::White));

        assert!(use_ability(&mut board, Pos::new(3, 3), Info::Pos(Pos::new(4, 4))).is_err());
        use_ability(&mut board, Pos::new(3, 3), Info::Pos(Pos::new(4, 5))).unwrap();
        assert!(matches!(board.get_piece(&Pos::new(4, 5)), Some(Piece::Queen(_))));

        assert!(use_ability(&mut board, Pos::new(0, 0), Info::Direction(Direction::W)).is_err());
        use_ability(&mut board, Pos::new(0, 0), Info::Direction(Direction::N)).unwrap();
        assert!(matches!(board.get_piece(&Pos::new(0, 1)), Some(Piece::Bishop(_))));
    }

    #[test]
    fn test_builder_walls() {
        let mut board = Board::default();
        board.place(&Pos::new(3, 3), Piece::builder(Color::Black));
        board.place(&Pos::new(4, 4), Piece::pawn(Color::White));
        BuildWalls
            .apply(&mut board, &Pos::new(3, 3), Info::Direction(Direction::N))
            .unwrap();
        assert!(matches!(board.get_piece(&Pos::new(2, 4)), Some(Piece::Wall(_))));
        assert!(matches!(board.get_piece(&Pos::new(3, 4)), Some(Piece::Wall(_))));
        assert!(matches!(board.get_piece(&Pos::new(4, 4)), Some(Piece::Pawn(_))));
    }

    #[test]
    fn test_broadside_spares_allies_and_heroes() {
        let mut board = Board::default();
        board.place(&Pos::new(3, 3), Piece::ship(Color::White));
        board.place(&Pos::new(4, 4), Piece::pawn(Color::Black));
        board.place(&Pos::new(4, 3), Piece::queen(Color::Black));
        board.place(&Pos::new(2, 2), Piece::pawn(Color::White));
        board.place(&Pos::new(3, 4), Piece::pawn(Color::Black));

        Broadside.apply(&mut board, &Pos::new(3, 3), Info::Integer(0)).unwrap();
        assert!(board.is_empty(&Pos::new(4, 4)));
        assert!(board.has_piece(&Pos::new(4, 3)));
        assert!(board.has_piece(&Pos::new(2, 2)));
        assert!(board.has_piece(&Pos::new(3, 4)));
        assert_eq!(board.dead_pieces().len(), 1);
    }

    #[test]
    fn test_immune_targets_and_harden() {
        let mut board = Board::default();
        board.place(&Pos::new(1, 1), Piece::super_pawn(Color::White));
        use_ability(&mut board, Pos::new(1, 1), Info::Integer(0)).unwrap();
        let piece = board.get_piece(&Pos::new(1, 1)).unwrap();
        assert!(piece.is_immune());
        assert!(piece.is_impenetrable(10));

        // cooldown blocks a second use
        assert!(use_ability(&mut board, Pos::new(1, 1), Info::Integer(0)).is_err());
    }

    #[test]
    fn test_tesla_discharge_is_delayed() {
        let mut board = Board::default();
        board.place(&Pos::new(0, 0), Piece::tesla_tower(Color::White));
        board.place(&Pos::new(2, 2), Piece::cannon(Color::Black));
        board.place(&Pos::new(1, 1), Piece::pawn(Color::Black));
        board.mut_player_from_color(&Color::White).unwrap().mana = Mana(1);

        use_ability(&mut board, Pos::new(0, 0), Info::Integer(0)).unwrap();
        assert_eq!(board.events().len(), 1);
        board.tick();
        board.tick();
        board.tick();
        assert!(board.events().is_empty());
        let deactivated = |board: &Board, pos| {
            board
                .get_data(&pos)
                .is_some_and(|d| d.has_effect(&Effect::deactivate()))
        };
        assert!(deactivated(&board, Pos::new(2, 2)));
        assert!(!deactivated(&board, Pos::new(1, 1)));
    }

    #[test]
    fn test_magician_needs_element_cards() {
        let mut board = Board::default();
        board.place(&Pos::new(0, 0), Piece::magician(Color::White));
        board.place(&Pos::new(3, 3), Piece::rook(Color::Black));
        board.mut_player_from_color(&Color::White).unwrap().mana = Mana(10);
        assert!(use_ability(&mut board, Pos::new(0, 0), Info::Integer(0)).is_err());

        let white = board.mut_player_from_color(&Color::White).unwrap();
        white.hand.add(Card::Ice);
        board.play_card(0, Card::Ice, None).unwrap();
        use_ability(&mut board, Pos::new(0, 0), Info::Integer(0)).unwrap();
        assert!(board
            .get_data(&Pos::new(3, 3))
            .is_some_and(|d| d.has_effect(&Effect::ice())));
    }

    #[test]
    fn test_warlock_portals_on_magic_tiles() {
        let mut board = Board::default();
        board.place(&Pos::new(4, 4), Piece::warlock(Color::Black));
        board.mut_player_from_color(&Color::Black).unwrap().mana = Mana(3);
        assert!(use_ability(&mut board, Pos::new(4, 4), Info::Integer(0)).is_err());

        if let Some(tile) = board.get_mut(&Pos::new(4, 5)) {
            tile.magic = true;
        }
        use_ability(&mut board, Pos::new(4, 4), Info::SubDirection(SubDirection::N)).unwrap();
        assert!(matches!(board.get_piece(&Pos::new(4, 5)), Some(Piece::Portal(_))));
        assert!(board.is_empty(&Pos::new(5, 5)));
    }

    #[test]
    fn test_catapult_throws_light_neighbours() {
        let mut board = Board::default();
        board.place(&Pos::new(3, 3), Piece::catapult(Color::White));
        board.place(&Pos::new(3, 4), Piece::pawn(Color::White));
        board.place(&Pos::new(2, 3), Piece::cannon(Color::White));

        let throw = |subdirection, squares| Info::Throw {
            direction: Direction::E,
            subdirection,
            squares,
        };
        assert!(use_ability(&mut board, Pos::new(3, 3), throw(SubDirection::W, 2)).is_err());
        assert!(use_ability(&mut board, Pos::new(3, 3), throw(SubDirection::N, 9)).is_err());
        use_ability(&mut board, Pos::new(3, 3), throw(SubDirection::N, 3)).unwrap();

        assert!(board.is_empty(&Pos::new(3, 4)));
        assert!(matches!(board.get_piece(&Pos::new(6, 3)), Some(Piece::Pawn(_))));
        assert!(matches!(board.get_piece(&Pos::new(3, 3)), Some(Piece::Catapult(_))));
    }

    #[test]
    fn test_paladin_revives_the_last_fallen_ally() {
        let mut board = Board::default();
        board.place(&Pos::new(2, 2), Piece::paladin(Color::White));
        board.place(&Pos::new(5, 5), Piece::knight(Color::White));
        board.place(&Pos::new(6, 6), Piece::rook(Color::Black));
        board.attack_piece(&Pos::new(6, 6), &Pos::new(5, 5)).unwrap();
        board.mut_player_from_color(&Color::White).unwrap().mana = Mana(10);

        let revive = Info::Paladin(PaladinOrder::Revive(Pos::new(3, 3)));
        assert!(use_ability(&mut board, Pos::new(2, 2), revive.clone()).is_err());

        board.mut_player_from_color(&Color::White).unwrap().hand.add(Card::Revive);
        board.play_card(0, Card::Revive, None).unwrap();
        let occupied = Info::Paladin(PaladinOrder::Revive(Pos::new(6, 6)));
        assert!(use_ability(&mut board, Pos::new(2, 2), occupied).is_err());
        use_ability(&mut board, Pos::new(2, 2), revive).unwrap();

        assert!(matches!(board.get_piece(&Pos::new(3, 3)), Some(Piece::Knight(_))));
        assert!(board.dead_pieces().is_empty());
        assert_eq!(board.player_from_color(&Color::White).unwrap().mana, Mana(4));
        assert_eq!(
            board.get_data(&Pos::new(2, 2)).map(|d| d.cooldown),
            Some(Time::rounds(8))
        );
    }

    #[test]
    fn test_paladin_smites_demons_and_shields_allies() {
        let mut board = Board::default();
        board.place(&Pos::new(2, 2), Piece::paladin(Color::White));
        board.place(&Pos::new(6, 6), Piece::warlock(Color::Black));
        board.place(&Pos::new(6, 5), Piece::pawn(Color::Black));
        board.place(&Pos::new(1, 1), Piece::rook(Color::White));

        let attack = |x, y| Info::Paladin(PaladinOrder::Attack(Pos::new(x, y)));
        assert!(!Crusade.can_use(&board, &Pos::new(2, 2), &attack(6, 6)));
        let white = board.mut_player_from_color(&Color::White).unwrap();
        white.mana = Mana(10);
        white.hand.add(Card::AttackDemonic);
        board.play_card(0, Card::AttackDemonic, None).unwrap();

        assert!(!Crusade.can_use(&board, &Pos::new(2, 2), &attack(6, 5)));
        assert!(Crusade.can_use(&board, &Pos::new(2, 2), &attack(6, 6)));
        Crusade.apply(&mut board, &Pos::new(2, 2), attack(6, 6)).unwrap();
        assert!(board.is_empty(&Pos::new(6, 6)));

        let shield = Info::Paladin(PaladinOrder::Invulnerability(Pos::new(1, 1)));
        assert!(!Crusade.can_use(&board, &Pos::new(2, 2), &shield));
        let white = board.mut_player_from_color(&Color::White).unwrap();
        white.mana = Mana(10);
        white.hand.add(Card::Invulnerability);
        board.play_card(0, Card::Invulnerability, None).unwrap();
        assert!(!Crusade.can_use(
            &board,
            &Pos::new(2, 2),
            &Info::Paladin(PaladinOrder::Invulnerability(Pos::new(6, 5)))
        ));
        Crusade.apply(&mut board, &Pos::new(2, 2), shield).unwrap();
        assert!(board
            .get_data(&Pos::new(1, 1))
            .is_some_and(|d| d.has_effect(&Effect::invulnerability())));
    }

    #[test]
    fn test_ram_breaks_through_until_resisted() {
        let mut board = Board::default();
        board.place(&Pos::new(0, 0), Piece::ram(Color::White));
        board.place(&Pos::new(0, 3), Piece::pawn(Color::Black));
        board.place(&Pos::new(0, 4), Piece::pawn(Color::Black));
        board.place(&Pos::new(0, 5), Piece::pawn(Color::Black));

        use_ability(&mut board, Pos::new(0, 0), Info::Direction(Direction::N)).unwrap();
        assert!(board.is_empty(&Pos::new(0, 0)));
        assert!(matches!(board.get_piece(&Pos::new(0, 4)), Some(Piece::Ram(_))));
        assert!(matches!(board.get_piece(&Pos::new(0, 5)), Some(Piece::Pawn(_))));
        assert_eq!(board.dead_pieces().len(), 2);

        board.place(&Pos::new(7, 0), Piece::ram(Color::White));
        board.place(&Pos::new(7, 3), Piece::wall(Color::Black));
        Charge
            .apply(&mut board, &Pos::new(7, 0), Info::Direction(Direction::N))
            .unwrap();
        assert!(matches!(board.get_piece(&Pos::new(7, 2)), Some(Piece::Ram(_))));
        assert!(matches!(board.get_piece(&Pos::new(7, 3)), Some(Piece::Wall(_))));

        Charge
            .apply(&mut board, &Pos::new(7, 2), Info::Direction(Direction::W))
            .unwrap();
        assert!(matches!(board.get_piece(&Pos::new(0, 2)), Some(Piece::Ram(_))));
    }

    #[test]
    fn test_pieces_without_ability() {
        assert!(of(&Piece::catapult(Color::White)).is_some());
        assert!(of(&Piece::paladin(Color::White)).is_some());
        assert!(of(&Piece::ram(Color::White)).is_some());
        assert!(of(&Piece::wall(Color::White)).is_none());
        assert!(of(&Piece::None).is_none());
        assert!(of(&Piece::pawn(Color::White)).is_some());
    }
}
