//! Delayed board events.
//!
//! Abilities may schedule work for later. Each event counts its time down with
//! the board clock and runs its functions once the time reaches zero.

use rand::{SeedableRng, rngs::StdRng};
use serde::{Deserialize, Serialize};

use super::{Board, Tile};
use crate::{
    error::CChessError,
    pattern,
    piece::{Effect, Type},
    pos::{Color, Pos},
    time::Time,
};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Events {
    events: Vec<Event>,
}

impl Events {
    pub fn push(&mut self, event: Event) {
        self.events.push(event);
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Event> {
        self.events.iter()
    }

    pub fn tick(&mut self, unit: &Time) {
        self.events.iter_mut().for_each(|event| event.time.elapse(unit));
    }

    /// Removes and returns the events whose time ran out.
    pub fn take_due(&mut self) -> Vec<Event> {
        let (due, pending) = std::mem::take(&mut self.events)
            .into_iter()
            .partition(|event| event.time.is_zero());
        self.events = pending;
        due
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub name: String,
    pub time: Time,
    pub pos: Option<Pos>,
    pub functions: Vec<EventFunction>,
}

impl Event {
    /// An event due at the end of the current turn.
    pub fn new(name: impl Into<String>, functions: Vec<EventFunction>) -> Self {
        Self::with_time(name, Time::turns(1), functions)
    }

    pub fn with_time(name: impl Into<String>, time: Time, functions: Vec<EventFunction>) -> Self {
        Self {
            name: name.into(),
            time,
            pos: None,
            functions,
        }
    }

    pub fn at(mut self, pos: Pos) -> Self {
        self.pos = Some(pos);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventFunction {
    Nothing,
    /// Player id draws a card.
    TakeCard(usize),
    /// Player id shuffles their deck.
    ShuffleDeck(usize),
    /// Adds the effect to every piece around the position that passes the filter.
    ApplyEffect(Effect, Pos, FilterFunction),
}

impl EventFunction {
    pub fn act(&self, board: &mut Board) -> Result<(), CChessError> {
        match self {
            EventFunction::Nothing => Ok(()),
            EventFunction::TakeCard(player_id) => board
                .mut_player_from_id(*player_id)
                .ok_or(CChessError::PlayerNotFound(*player_id))?
                .take_from_deck(),
            EventFunction::ShuffleDeck(player_id) => {
                let mut rng = StdRng::seed_from_u64(board.rng.seed());
                board
                    .mut_player_from_id(*player_id)
                    .ok_or(CChessError::PlayerNotFound(*player_id))?
                    .deck_mut()
                    .shuffle(&mut rng);
                Ok(())
            }
            EventFunction::ApplyEffect(effect, center, filter) => {
                board
                    .iter_mut()
                    .filter(|tile| filter.matches(center, tile))
                    .filter_map(|tile| tile.piece.data_mut())
                    .for_each(|data| data.add_effect(effect.clone()));
                Ok(())
            }
        }
    }
}

/// Selects tiles relative to a center position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FilterFunction {
    Square(usize),
    Cross(usize),
    IsType(Type),
    IsNotType(Type),
    IsColor(Color),
    IsNotColor(Color),
    HasEffect(Effect),
    All(Vec<FilterFunction>),
}

impl FilterFunction {
    pub fn all(filters: impl IntoIterator<Item = FilterFunction>) -> Self {
        FilterFunction::All(filters.into_iter().collect())
    }

    pub fn matches(&self, center: &Pos, tile: &Tile) -> bool {
        match self {
            FilterFunction::Square(range) => pattern::square(center, tile.pos(), *range),
            FilterFunction::Cross(range) => pattern::cross(center, tile.pos(), *range),
            FilterFunction::IsType(type_) => tile.piece.is_type(type_),
            FilterFunction::IsNotType(type_) => !tile.piece.is_type(type_),
            FilterFunction::IsColor(color) => tile.is_controlled_by(color),
            FilterFunction::IsNotColor(color) => tile.has_piece() && !tile.is_controlled_by(color),
            FilterFunction::HasEffect(effect) => tile
                .piece
                .data()
                .is_some_and(|data| data.has_effect(effect)),
            FilterFunction::All(filters) => filters.iter().all(|f| f.matches(center, tile)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::piece::Piece;

    #[test]
    fn test_take_due() {
        let mut events = Events::default();
        events.push(Event::new("soon", vec![EventFunction::Nothing]));
        events.push(Event::with_time("later", Time::turns(2), vec![]));
        events.tick(&Time::turns(1));
        let due = events.take_due();
        assert_eq!(due.len(), 1);
        assert_eq!(due[0].name, "soon");
        assert_eq!(events.len(), 1);
    }

    #[test]
    fn test_filters() {
        let mut tile = Tile::new(Pos::new(2, 2));
        tile.replace(Piece::cannon(Color::Black));
        let center = Pos::new(0, 0);

        assert!(FilterFunction::Square(2).matches(&center, &tile));
        assert!(!FilterFunction::Cross(4).matches(&center, &tile));
        let enemy_structure = FilterFunction::all([
            FilterFunction::Square(3),
            FilterFunction::IsType(Type::Structure),
            FilterFunction::IsNotColor(Color::White),
        ]);
        assert!(enemy_structure.matches(&center, &tile));
        assert!(!FilterFunction::IsNotColor(Color::White).matches(&center, &Tile::new(center)));
    }
}
