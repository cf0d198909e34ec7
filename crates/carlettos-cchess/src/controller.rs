//! Click-driven game controller.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::{
    action::{Action, Info},
    board::{Board, Shape, Square, Tile},
    error::CChessError,
    piece::Piece,
    pos::{Color, Pos},
};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CChess {
    pub board: Board,
    pub selected: Option<Pos>,
    pub moves: Vec<Pos>,
    pub takes: Vec<Pos>,
    pub attacks: Vec<Pos>,
}

impl CChess {
    pub fn new(board: Board) -> Self {
        Self {
            board,
            ..Default::default()
        }
    }

    pub fn default_chessboard() -> Self {
        Self::new(Board::default_chessboard())
    }

    pub fn cchessboard() -> Self {
        Self::new(Board::cchessboard())
    }

    /// Every kind of piece side by side, white on row 0 and black on row 1.
    pub fn default_display() -> Self {
        let white = Piece::all(Color::White);
        let black = Piece::all(Color::Black);
        let mut board = Board::with_shape(Shape::new(vec![Square::new(
            Pos::new(0, 0),
            white.len(),
            2,
        )]));
        for (x, (white, black)) in white.into_iter().zip(black).enumerate() {
            board.place(&Pos::new(x, 0), white);
            board.place(&Pos::new(x, 1), black);
        }
        Self::new(board)
    }

    /// Handles a click on the board.
    ///
    /// With nothing selected, selects the tile and, when it holds a piece of
    /// the player in turn, collects its moves, takes and attacks. With a
    /// selection, performs the highlighted action on the clicked tile
    /// (attack first, then take, then move), ticks the board and clears the
    /// selection. Returns `false` for clicks outside the board.
    pub fn click(&mut self, pos: Pos) -> bool {
        if !self.board.contains(&pos) {
            return false;
        }

        match self.selected {
            None => {
                self.collect_actions(&pos);
                self.selected = Some(pos);
            }
            Some(selected) => {
                let action = if self.attacks.contains(&pos) {
                    Some(Action::attack(&selected, &pos))
                } else if self.takes.contains(&pos) {
                    Some(Action::take(&selected, &pos))
                } else if self.moves.contains(&pos) {
                    Some(Action::r#move(&selected, &pos))
                } else {
                    None
                };
                if let Some(action) = action {
                    match self.board.make(action) {
                        Ok(()) => self.board.tick(),
                        Err(e) => warn!(error = %e, "action failed"),
                    }
                }
                self.clear();
            }
        }
        true
    }

    fn in_turn(&self, piece: &Piece) -> bool {
        self.board
            .current_player()
            .is_none_or(|player| piece.color().as_ref() == Some(player.color()))
    }

    fn collect_actions(&mut self, from: &Pos) {
        let Some(piece) = self.board.get_piece(from) else {
            return;
        };
        if piece.is_none() || !self.in_turn(piece) {
            return;
        }

        let board = &self.board;
        for to in board.shape().points_iter() {
            if &to == from {
                continue;
            }
            let enemy = board.has_piece(&to) && !board.same_color(from, &to);
            if board.is_empty(&to) && piece.can_do(board, &Action::r#move(from, &to)) {
                self.moves.push(to);
            }
            if enemy && piece.can_do(board, &Action::take(from, &to)) {
                self.takes.push(to);
            }
            if enemy && piece.can_do(board, &Action::attack(from, &to)) {
                self.attacks.push(to);
            }
        }
        debug!(
            from = %from,
            moves = self.moves.len(),
            takes = self.takes.len(),
            attacks = self.attacks.len(),
            "collected actions"
        );
    }

    /// Uses the ability of the piece at `from`, then ticks the board.
    pub fn use_ability(&mut self, from: Pos, info: Info) -> Result<(), CChessError> {
        let piece = self
            .board
            .get_piece(&from)
            .ok_or(CChessError::OutOfBoard(from))?;
        if piece.is_none() {
            return Err(CChessError::EmptyTile(from));
        }
        let action = Action::ability(&from, info);
        if !self.in_turn(piece) || !piece.can_do(&self.board, &action) {
            return Err(CChessError::IllegalAction(format!(
                "{} cannot use its ability",
                piece.name()
            )));
        }
        self.board.make(action)?;
        self.board.tick();
        self.clear();
        Ok(())
    }

    pub fn clear(&mut self) {
        self.moves.clear();
        self.takes.clear();
        self.attacks.clear();
        self.selected = None;
    }

    /// Actions the current selection may perform on `pos`.
    pub fn actions_at(&self, pos: &Pos) -> Vec<Action> {
        let Some(selected) = &self.selected else {
            return Vec::new();
        };
        let mut actions = Vec::with_capacity(3);
        if self.moves.contains(pos) {
            actions.push(Action::r#move(selected, pos));
        }
        if self.takes.contains(pos) {
            actions.push(Action::take(selected, pos));
        }
        if self.attacks.contains(pos) {
            actions.push(Action::attack(selected, pos));
        }
        actions
    }

    pub fn height(&self) -> usize {
        self.board.height()
    }

    pub fn row_iter(&self, row: usize) -> impl Iterator<Item = &Tile> {
        self.board.row_iter(row)
    }

    pub fn has_move(&self, pos: &Pos) -> bool {
        self.moves.contains(pos)
    }

    pub fn has_take(&self, pos: &Pos) -> bool {
        self.takes.contains(pos)
    }

    pub fn has_attack(&self, pos: &Pos) -> bool {
        self.attacks.contains(pos)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pos::Direction;

    #[test]
    fn test_select_pawn_in_opening() {
        let mut game = CChess::default_chessboard();
        assert!(game.click(Pos::new(4, 1)));
        assert_eq!(game.selected, Some(Pos::new(4, 1)));
        assert_eq!(game.moves, vec![Pos::new(4, 2), Pos::new(4, 3)]);
        assert!(game.takes.is_empty());
        assert_eq!(
            game.actions_at(&Pos::new(4, 3)),
            vec![Action::r#move(&Pos::new(4, 1), &Pos::new(4, 3))]
        );
        assert!(game.actions_at(&Pos::new(5, 5)).is_empty());
    }

    #[test]
    fn test_move_passes_the_turn() {
        let mut game = CChess::default_chessboard();
        game.click(Pos::new(4, 1));
        game.click(Pos::new(4, 3));
        assert!(matches!(game.board.get_piece(&Pos::new(4, 3)), Some(Piece::Pawn(_))));
        assert!(game.board.is_empty(&Pos::new(4, 1)));
        assert_eq!(game.selected, None);
        assert_eq!(
            game.board.current_player().map(|p| *p.color()),
            Some(Color::Black)
        );

        // white pieces cannot act on black's turn
        game.click(Pos::new(3, 1));
        assert!(game.moves.is_empty());
        game.click(Pos::new(3, 2));
        assert!(game.board.is_empty(&Pos::new(3, 2)));
    }

    #[test]
    fn test_archer_attacks_without_moving() {
        let mut board = Board::default();
        board.place(&Pos::new(0, 0), Piece::archer(Color::White));
        board.place(&Pos::new(3, 4), Piece::pawn(Color::Black));
        board.place(&Pos::new(4, 4), Piece::queen(Color::Black));
        let mut game = CChess::new(board);

        game.click(Pos::new(0, 0));
        assert!(game.has_attack(&Pos::new(3, 4)));
        // heroic pieces cannot be attacked
        assert!(!game.has_attack(&Pos::new(4, 4)));
        assert!(game.has_move(&Pos::new(1, 1)));
        assert!(!game.has_take(&Pos::new(3, 4)));

        game.click(Pos::new(3, 4));
        assert!(game.board.is_empty(&Pos::new(3, 4)));
        assert!(game.board.has_piece(&Pos::new(0, 0)));
        assert_eq!(game.board.dead_pieces().len(), 1);
    }

    #[test]
    fn test_click_outside_and_deselect() {
        let mut game = CChess::default_chessboard();
        assert!(!game.click(Pos::new(8, 0)));
        game.click(Pos::new(0, 0));
        assert!(game.moves.is_empty());
        game.click(Pos::new(5, 5));
        assert_eq!(game.selected, None);
        assert_eq!(game.board.time.turn, 0);
    }

    #[test]
    fn test_use_ability_ticks() {
        let mut board = Board::default();
        board.place(&Pos::new(0, 0), Piece::bishop(Color::White));
        let mut game = CChess::new(board);

        assert!(game.use_ability(Pos::new(3, 3), Info::Direction(Direction::N)).is_err());
        game.use_ability(Pos::new(0, 0), Info::Direction(Direction::E))
            .unwrap();
        assert!(matches!(game.board.get_piece(&Pos::new(1, 0)), Some(Piece::Bishop(_))));
        assert_eq!(game.board.time.turn, 1);
    }

    #[test]
    fn test_default_display_shows_every_piece() {
        let display = CChess::default_display();
        assert_eq!(display.height(), 2);
        assert_eq!(display.row_iter(0).filter(|t| t.has_piece()).count(), 22);
        assert!(display.row_iter(1).all(|t| t.color() == Some(Color::Black)));
    }

    #[test]
    fn test_board_serializes() {
        let game = CChess::default_chessboard();
        let json = serde_json::to_string(&game).unwrap();
        let back: CChess = serde_json::from_str(&json).unwrap();
        assert_eq!(back, game);
    }
}
