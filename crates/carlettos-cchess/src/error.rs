use thiserror::Error;

use crate::{card::Card, pos::Pos};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CChessError {
    #[error("position {0} is outside the board")]
    OutOfBoard(Pos),
    #[error("no piece at {0}")]
    EmptyTile(Pos),
    #[error("illegal action: {0}")]
    IllegalAction(String),
    #[error("ability expects {0} info")]
    InvalidInfo(&'static str),
    #[error("the deck is empty")]
    EmptyDeck,
    #[error("player {0} not found")]
    PlayerNotFound(usize),
    #[error("not enough mana: needs {needed}, has {available}")]
    NotEnoughMana { needed: usize, available: usize },
    #[error("card {0:?} is not in hand")]
    CardNotInHand(Card),
}
