use std::mem;

use serde::{Deserialize, Serialize};

use crate::{
    piece::Piece,
    pos::{Color, Pos},
    time::Time,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tile {
    /// Portals can only be summoned on magic tiles.
    pub magic: bool,
    pub buildable: bool,
    pub piece: Piece,
    pos: Pos,
}

impl Tile {
    pub fn new(pos: Pos) -> Self {
        Self {
            magic: false,
            buildable: true,
            piece: Piece::None,
            pos,
        }
    }

    pub fn pos(&self) -> &Pos {
        &self.pos
    }

    pub fn color(&self) -> Option<Color> {
        self.piece.color()
    }

    pub fn is_controlled_by(&self, color: &Color) -> bool {
        self.color().as_ref() == Some(color)
    }

    pub fn is_empty(&self) -> bool {
        self.piece.is_none()
    }

    pub fn has_piece(&self) -> bool {
        !self.is_empty()
    }

    /// Puts `piece` on the tile and returns what was there.
    pub fn replace(&mut self, piece: Piece) -> Piece {
        mem::replace(&mut self.piece, piece)
    }

    pub fn remove(&mut self) -> Piece {
        self.replace(Piece::None)
    }

    pub fn tick(&mut self, unit: &Time) {
        self.piece.tick(unit);
    }
}
