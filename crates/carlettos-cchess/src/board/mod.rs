pub mod event;
pub mod player;
pub mod rng;
pub mod shape;
pub mod tile;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

pub use event::{Event, EventFunction, Events, FilterFunction};
pub use player::{Mana, Movements, Player};
pub use rng::{BoardRng, RandomNumberGenerator};
pub use shape::{Shape, Square};
pub use tile::Tile;

use crate::{
    ability,
    action::Action,
    card::{Card, Cards},
    error::CChessError,
    piece::{Piece, PieceData},
    pos::{Color, Pos},
    time::Time,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    pub tiles: Vec<Tile>,
    pub rng: BoardRng,
    pub time: Time,
    players: Vec<Player>,
    /// Cards laid on the board, shared by everyone.
    cards: Cards,
    dead_pieces: Vec<Piece>,
    shape: Shape,
    events: Events,
}

impl Default for Board {
    /// An empty 8x8 board with a white and a black player.
    fn default() -> Self {
        Self::with_shape(Shape::default_chessboard())
    }
}

impl Board {
    pub fn with_shape(shape: Shape) -> Self {
        Self::new(
            shape,
            vec![
                Player::new(Color::White, 0, Cards::default()),
                Player::new(Color::Black, 1, Cards::default()),
            ],
        )
    }

    pub fn new(shape: Shape, players: Vec<Player>) -> Self {
        Self {
            tiles: shape.points_iter().map(Tile::new).collect(),
            rng: BoardRng::default(),
            time: Time::default(),
            players,
            cards: Cards::default(),
            dead_pieces: Vec::new(),
            shape,
            events: Events::default(),
        }
    }

    /// Classic chess setup; white holds rows 0 and 1.
    pub fn default_chessboard() -> Self {
        let mut board = Self::default();
        let back_rank: [fn(Color) -> Piece; 8] = [
            Piece::rook,
            Piece::knight,
            Piece::bishop,
            Piece::queen,
            Piece::king,
            Piece::bishop,
            Piece::knight,
            Piece::rook,
        ];
        for (x, piece) in back_rank.iter().enumerate() {
            board.place(&Pos::new(x, 0), piece(Color::White));
            board.place(&Pos::new(x, 1), Piece::pawn(Color::White));
            board.place(&Pos::new(x, 6), Piece::pawn(Color::Black));
            board.place(&Pos::new(x, 7), piece(Color::Black));
        }
        board
    }

    /// The 16x17 variant setup with four magic tiles on the side files.
    pub fn cchessboard() -> Self {
        let deck = || Cards::from(vec![Card::AddMovement; 3]);
        let player = |color, id| {
            let mut player = Player::new(color, id, deck());
            player.hand.add(Card::AddMovement);
            player.mana = Mana(5);
            player
        };
        let mut board = Self::new(
            Shape::cchessboard(),
            vec![player(Color::White, 0), player(Color::Black, 1)],
        );

        for pos in [
            Pos::new(0, 7),
            Pos::new(0, 9),
            Pos::new(15, 7),
            Pos::new(15, 9),
        ] {
            if let Some(tile) = board.get_mut(&pos) {
                tile.magic = true;
            }
        }

        // Rows are listed from the owner's side; `None` keeps the tile empty.
        type Maker = Option<fn(Color) -> Piece>;
        let back: [Maker; 16] = [
            Some(Piece::cannon),
            Some(Piece::rook),
            Some(Piece::catapult),
            Some(Piece::knight),
            Some(Piece::warlock),
            Some(Piece::bishop),
            Some(Piece::magician),
            Some(Piece::queen),
            Some(Piece::king),
            Some(Piece::paladin),
            Some(Piece::bishop),
            Some(Piece::warlock),
            Some(Piece::knight),
            Some(Piece::catapult),
            Some(Piece::rook),
            Some(Piece::cannon),
        ];
        let second: [Maker; 16] = [
            Some(Piece::ship),
            Some(Piece::tesla_tower),
            Some(Piece::ram),
            Some(Piece::builder),
            Some(Piece::pawn),
            Some(Piece::pawn),
            Some(Piece::crazy_pawn),
            Some(Piece::super_pawn),
            Some(Piece::super_pawn),
            Some(Piece::crazy_pawn),
            Some(Piece::pawn),
            Some(Piece::pawn),
            Some(Piece::builder),
            Some(Piece::ram),
            Some(Piece::tesla_tower),
            Some(Piece::ship),
        ];
        let third: [Maker; 16] = [
            Some(Piece::ballista),
            Some(Piece::archer),
            Some(Piece::archer),
            Some(Piece::shield_bearer),
            None,
            None,
            None,
            None,
            None,
            None,
            None,
            None,
            Some(Piece::shield_bearer),
            Some(Piece::archer),
            Some(Piece::archer),
            Some(Piece::ballista),
        ];
        let fourth: [Maker; 16] = [
            Some(Piece::pawn),
            Some(Piece::crazy_pawn),
            Some(Piece::pawn),
            None,
            None,
            None,
            None,
            None,
            None,
            None,
            None,
            None,
            None,
            Some(Piece::pawn),
            Some(Piece::crazy_pawn),
            Some(Piece::pawn),
        ];

        let top = board.height() - 1;
        for (offset, row) in [back, second, third, fourth].iter().enumerate() {
            for (x, maker) in row.iter().enumerate() {
                if let Some(make) = maker {
                    board.place(&Pos::new(x, offset), make(Color::White));
                    board.place(&Pos::new(x, top - offset), make(Color::Black));
                }
            }
        }
        board
    }

    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    pub fn height(&self) -> usize {
        self.shape.height()
    }

    pub fn contains(&self, pos: &Pos) -> bool {
        self.shape.contains(pos)
    }

    pub fn get(&self, pos: &Pos) -> Option<&Tile> {
        self.tiles.iter().find(|tile| tile.pos() == pos)
    }

    pub fn get_mut(&mut self, pos: &Pos) -> Option<&mut Tile> {
        self.tiles.iter_mut().find(|tile| tile.pos() == pos)
    }

    pub fn get_piece(&self, pos: &Pos) -> Option<&Piece> {
        self.get(pos).map(|tile| &tile.piece)
    }

    pub fn get_data(&self, pos: &Pos) -> Option<&PieceData> {
        self.get(pos).and_then(|tile| tile.piece.data())
    }

    pub fn get_data_mut(&mut self, pos: &Pos) -> Option<&mut PieceData> {
        self.get_mut(pos).and_then(|tile| tile.piece.data_mut())
    }

    /// Puts a piece on the tile, returning the previous occupant. Positions
    /// outside the board are ignored.
    pub fn place(&mut self, pos: &Pos, piece: Piece) -> Option<Piece> {
        self.get_mut(pos).map(|tile| tile.replace(piece))
    }

    /// `false` for positions outside the board.
    pub fn is_empty(&self, pos: &Pos) -> bool {
        self.get(pos).is_some_and(Tile::is_empty)
    }

    pub fn has_piece(&self, pos: &Pos) -> bool {
        self.get(pos).is_some_and(Tile::has_piece)
    }

    pub fn same_color(&self, a: &Pos, b: &Pos) -> bool {
        match (self.get(a), self.get(b)) {
            (Some(a), Some(b)) => a.color() == b.color(),
            _ => false,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Tile> {
        self.tiles.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Tile> {
        self.tiles.iter_mut()
    }

    /// Tiles other than `from` selected by a pattern.
    pub fn iter_from_pattern<'a, F>(&'a self, from: &'a Pos, pattern: F) -> impl Iterator<Item = &'a Tile>
    where
        F: Fn(&Pos, &Pos) -> bool + 'a,
    {
        self.iter()
            .filter(move |tile| tile.pos() != from && pattern(from, tile.pos()))
    }

    pub fn iter_mut_from_pattern<'a, F>(
        &'a mut self,
        from: &'a Pos,
        pattern: F,
    ) -> impl Iterator<Item = &'a mut Tile>
    where
        F: Fn(&Pos, &Pos) -> bool + 'a,
    {
        self.iter_mut()
            .filter(move |tile| tile.pos() != from && pattern(from, tile.pos()))
    }

    pub fn row_iter(&self, row: usize) -> impl Iterator<Item = &Tile> {
        self.tiles.iter().filter(move |tile| tile.pos().y == row)
    }

    /// Orthogonal neighbours on the board.
    pub fn get_nearby_tiles(&self, pos: &Pos) -> Vec<&Tile> {
        [pos.north(), pos.east(), pos.south(), pos.west()]
            .into_iter()
            .flatten()
            .filter_map(|p| self.get(&p))
            .collect()
    }

    /// Walks from `from` (exclusive) by `shift` until `len` tiles were
    /// crossed, the board ends, or `stop_at` accepts a tile, which becomes
    /// the collision.
    pub fn ray_cast<F: Fn(&Tile) -> bool>(
        &self,
        from: &Pos,
        len: Option<usize>,
        shift: (isize, isize),
        stop_at: F,
    ) -> RayCastInfo {
        if !self.contains(from) {
            return RayCastInfo::default();
        }
        let mut info = RayCastInfo {
            start: Some(*from),
            ..Default::default()
        };
        let mut next = from.shift(shift.0, shift.1);
        while let Some(pos) = next {
            if len.is_some_and(|len| info.mid.len() == len) {
                break;
            }
            let Some(tile) = self.get(&pos) else {
                break;
            };
            if stop_at(tile) {
                info.collision = Some(pos);
                break;
            }
            info.mid.push(pos);
            next = pos.shift(shift.0, shift.1);
        }
        info
    }

    /// Ray cast that stops at the first occupied tile.
    pub fn ray_cast_empty(&self, from: &Pos, len: Option<usize>, shift: (isize, isize)) -> RayCastInfo {
        self.ray_cast(from, len, shift, Tile::has_piece)
    }

    fn lift(&mut self, from: &Pos) -> Result<Piece, CChessError> {
        let tile = self.get_mut(from).ok_or(CChessError::OutOfBoard(*from))?;
        if tile.is_empty() {
            return Err(CChessError::EmptyTile(*from));
        }
        let mut piece = tile.remove();
        if let Some(data) = piece.data_mut() {
            data.moved = true;
        }
        Ok(piece)
    }

    pub fn move_piece(&mut self, from: &Pos, to: &Pos) -> Result<(), CChessError> {
        if !self.contains(to) {
            return Err(CChessError::OutOfBoard(*to));
        }
        let piece = self.lift(from)?;
        self.place(to, piece);
        Ok(())
    }

    /// Moves onto `to`, sending its occupant to the dead pile.
    pub fn take_piece(&mut self, from: &Pos, to: &Pos) -> Result<(), CChessError> {
        if !self.contains(to) {
            return Err(CChessError::OutOfBoard(*to));
        }
        let piece = self.lift(from)?;
        if let Some(dead) = self.place(to, piece).filter(|dead| !dead.is_none()) {
            self.dead_pieces.push(dead);
        }
        Ok(())
    }

    /// Kills the occupant of `to` without moving.
    pub fn attack_piece(&mut self, _from: &Pos, to: &Pos) -> Result<(), CChessError> {
        let tile = self.get_mut(to).ok_or(CChessError::OutOfBoard(*to))?;
        let dead = tile.remove();
        if !dead.is_none() {
            self.dead_pieces.push(dead);
        }
        Ok(())
    }

    /// Applies the action without checking whether it is legal.
    pub fn make(&mut self, action: Action) -> Result<(), CChessError> {
        debug!(?action, "making action");
        match action {
            Action::Move { from, to } => self.move_piece(&from, &to),
            Action::Take { from, to } => self.take_piece(&from, &to),
            Action::Attack { from, to } => self.attack_piece(&from, &to),
            Action::Ability { from, info } => {
                let piece = self.get_piece(&from).ok_or(CChessError::OutOfBoard(from))?;
                let color = piece.color().ok_or(CChessError::EmptyTile(from))?;
                let ability = ability::of(piece).ok_or_else(|| {
                    CChessError::IllegalAction(format!("{} has no ability", piece.name()))
                })?;
                let data = ability.data();
                // The cooldown travels with pieces that move during the ability.
                let previous = self.get_data_mut(&from).map(|piece_data| {
                    std::mem::replace(&mut piece_data.cooldown, data.cooldown)
                });
                if let Err(e) = ability.apply(self, &from, info) {
                    if let (Some(previous), Some(piece_data)) = (previous, self.get_data_mut(&from)) {
                        piece_data.cooldown = previous;
                    }
                    return Err(e);
                }
                if let Some(player) = self.mut_player_from_color(&color) {
                    player.mana -= data.cost;
                }
                Ok(())
            }
        }
    }

    /// Plays a card from the player's hand. Summon cards need an empty
    /// `target`; board cards stay on the board; utility cards are discarded.
    pub fn play_card(&mut self, player_id: usize, card: Card, target: Option<Pos>) -> Result<(), CChessError> {
        let player = self
            .player_from_id(player_id)
            .ok_or(CChessError::PlayerNotFound(player_id))?;
        if !player.hand.contains(&card) {
            return Err(CChessError::CardNotInHand(card));
        }
        let cost = card.cost();
        if player.mana < cost {
            return Err(CChessError::NotEnoughMana {
                needed: cost.0,
                available: player.mana.0,
            });
        }
        let color = *player.color();

        let summon: Option<fn(Color) -> Piece> = match card {
            Card::Knight => Some(Piece::knight),
            Card::Rook => Some(Piece::rook),
            Card::Warlock => Some(Piece::warlock),
            _ => None,
        };
        if let Some(summon) = summon {
            let target = target.ok_or(CChessError::InvalidInfo("position"))?;
            if !self.is_empty(&target) {
                return Err(CChessError::IllegalAction(format!(
                    "cannot summon on {}",
                    target
                )));
            }
            self.place(&target, summon(color));
        }

        if card.is_board_state() {
            self.cards.add(card);
        }
        let player = self
            .mut_player_from_id(player_id)
            .ok_or(CChessError::PlayerNotFound(player_id))?;
        player.hand.remove(card);
        player.mana -= cost;
        if card == Card::AddMovement {
            player.movements += Movements(1);
        }
        if !card.is_board_state() {
            player.discard_pile_mut().add(card);
        }
        Ok(())
    }

    pub fn cards(&self) -> &Cards {
        &self.cards
    }

    pub fn has_card_on_board(&self, card: Card) -> bool {
        self.cards.contains(&card)
    }

    pub fn has_any_card_on_board(&self, cards: &[Card]) -> bool {
        cards.iter().any(|card| self.cards.contains(card))
    }

    pub fn dead_pieces(&self) -> &[Piece] {
        &self.dead_pieces
    }

    pub fn get_last_dead(&self) -> Option<&Piece> {
        self.dead_pieces.last()
    }

    pub fn remove_last_dead(&mut self) -> Option<Piece> {
        self.dead_pieces.pop()
    }

    pub fn get_last_dead_with_color(&self, color: &Color) -> Option<&Piece> {
        self.dead_pieces
            .iter()
            .rev()
            .find(|piece| piece.color().as_ref() == Some(color))
    }

    pub fn remove_last_dead_with_color(&mut self, color: &Color) -> Option<Piece> {
        let index = self
            .dead_pieces
            .iter()
            .rposition(|piece| piece.color().as_ref() == Some(color))?;
        Some(self.dead_pieces.remove(index))
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn player_from_id(&self, player_id: usize) -> Option<&Player> {
        self.players.iter().find(|player| player.id() == player_id)
    }

    pub fn player_from_color(&self, color: &Color) -> Option<&Player> {
        self.players.iter().find(|player| player.color() == color)
    }

    pub fn mut_player_from_id(&mut self, player_id: usize) -> Option<&mut Player> {
        self.players.iter_mut().find(|player| player.id() == player_id)
    }

    pub fn mut_player_from_color(&mut self, color: &Color) -> Option<&mut Player> {
        self.players.iter_mut().find(|player| player.color() == color)
    }

    /// The player whose turn it is.
    pub fn current_player(&self) -> Option<&Player> {
        self.players.get(self.time.turn)
    }

    pub fn events(&self) -> &Events {
        &self.events
    }

    pub fn add_event(&mut self, event: Event) {
        self.events.push(event);
    }

    /// Advances the clock by one movement.
    ///
    /// Once the current player used all their movements the turn passes, and
    /// once every player had a turn a new round starts. Each step ticks the
    /// pieces, the affected players, the events and the rng in that order;
    /// events that ran out of time fire at the end.
    pub fn tick(&mut self) {
        let movement = Time::movements(1);
        let turn = Time::turns(1);
        let round = Time::rounds(1);

        self.time.movement += 1;
        self.tick_all(&movement);
        if let Some(player) = self.players.get_mut(self.time.turn) {
            player.tick(&movement);
        }
        self.rng.next_movement();

        let movements = self.current_player().map(|player| player.movements.0);
        if movements.is_some_and(|movements| self.time.movement >= movements) {
            debug!(turn = self.time.turn, "turn tick");
            self.time.movement = 0;
            if let Some(player) = self.players.get_mut(self.time.turn) {
                player.tick(&turn);
            }
            self.time.turn += 1;
            self.tick_all(&turn);
            self.rng.next_turn();

            if self.time.turn >= self.players.len() {
                debug!(round = self.time.round, "round tick");
                self.time.turn = 0;
                self.time.round += 1;
                self.tick_all(&round);
                self.players.iter_mut().for_each(|player| player.tick(&round));
                self.rng.next_round();
            }
        }

        self.fire_events();
    }

    fn tick_all(&mut self, unit: &Time) {
        self.tiles.iter_mut().for_each(|tile| tile.tick(unit));
        self.events.tick(unit);
    }

    fn fire_events(&mut self) {
        for event in self.events.take_due() {
            debug!(name = %event.name, "firing event");
            for function in &event.functions {
                if let Err(e) = function.act(self) {
                    warn!(name = %event.name, error = %e, "event function failed");
                }
            }
        }
    }
}

/// Result of a ray cast: the start, the crossed tiles in order, and the tile
/// that stopped the ray, if any.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RayCastInfo {
    pub start: Option<Pos>,
    pub mid: Vec<Pos>,
    pub collision: Option<Pos>,
}

impl RayCastInfo {
    pub fn is_empty(&self) -> bool {
        self.start.is_none() && self.mid.is_empty() && self.collision.is_none()
    }

    pub fn len(&self) -> usize {
        self.start.iter().count() + self.mid.len() + self.collision.iter().count()
    }

    pub fn contains(&self, pos: &Pos) -> bool {
        self.start.as_ref() == Some(pos)
            || self.mid.contains(pos)
            || self.collision.as_ref() == Some(pos)
    }

    pub fn contains_mid(&self, pos: &Pos) -> bool {
        self.mid.contains(pos)
    }

    pub fn first(&self) -> Option<&Pos> {
        self.mid.first()
    }

    pub fn last(&self) -> Option<&Pos> {
        self.mid.last()
    }
}
