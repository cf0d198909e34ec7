use std::ops::{Add, AddAssign, Sub, SubAssign};

use serde::{Deserialize, Serialize};

use crate::{card::Cards, error::CChessError, pos::Color, time::Time};

macro_rules! saturating_counter {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
        pub struct $name(pub usize);

        impl Add for $name {
            type Output = $name;

            fn add(self, rhs: Self) -> Self::Output {
                $name(self.0 + rhs.0)
            }
        }

        impl AddAssign for $name {
            fn add_assign(&mut self, rhs: Self) {
                self.0 += rhs.0;
            }
        }

        impl Sub for $name {
            type Output = $name;

            fn sub(self, rhs: Self) -> Self::Output {
                $name(self.0.saturating_sub(rhs.0))
            }
        }

        impl SubAssign for $name {
            fn sub_assign(&mut self, rhs: Self) {
                self.0 = self.0.saturating_sub(rhs.0);
            }
        }
    };
}

saturating_counter!(Mana);
saturating_counter!(Movements);

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    /// Actions per turn.
    pub movements: Movements,
    pub mana: Mana,
    pub hand: Cards,
    deck: Cards,
    discard_pile: Cards,
    id: usize,
    color: Color,
}

impl Player {
    pub fn new(color: Color, id: usize, deck: Cards) -> Self {
        Self {
            movements: Movements(1),
            id,
            color,
            deck,
            ..Default::default()
        }
    }

    pub fn color(&self) -> &Color {
        &self.color
    }

    pub fn id(&self) -> usize {
        self.id
    }

    pub fn deck(&self) -> &Cards {
        &self.deck
    }

    pub fn deck_mut(&mut self) -> &mut Cards {
        &mut self.deck
    }

    pub fn discard_pile(&self) -> &Cards {
        &self.discard_pile
    }

    pub fn discard_pile_mut(&mut self) -> &mut Cards {
        &mut self.discard_pile
    }

    /// Draws the top card of the deck into the hand.
    pub fn take_from_deck(&mut self) -> Result<(), CChessError> {
        let card = self.deck.take().ok_or(CChessError::EmptyDeck)?;
        self.hand.add(card);
        Ok(())
    }

    /// One mana is granted per round.
    pub fn tick(&mut self, unit: &Time) {
        if unit.is_round() {
            self.mana += Mana(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::Card;

    #[test]
    fn test_counters_saturate() {
        let mut mana = Mana(2);
        mana -= Mana(5);
        assert_eq!(mana, Mana(0));
        assert_eq!(Movements(1) + Movements(2), Movements(3));
        assert_eq!(Movements(1) - Movements(2), Movements(0));
        assert!(Mana(3) >= Mana(2));
    }

    #[test]
    fn test_draw_until_empty() {
        let mut player = Player::new(Color::Black, 1, Cards::from(vec![Card::Ice]));
        assert_eq!(player.movements, Movements(1));
        assert!(player.take_from_deck().is_ok());
        assert_eq!(player.hand, Cards::from(vec![Card::Ice]));
        assert_eq!(player.take_from_deck(), Err(CChessError::EmptyDeck));
    }

    #[test]
    fn test_mana_per_round() {
        let mut player = Player::new(Color::White, 0, Cards::default());
        player.tick(&Time::movements(1));
        player.tick(&Time::turns(1));
        assert_eq!(player.mana, Mana(0));
        player.tick(&Time::rounds(1));
        assert_eq!(player.mana, Mana(1));
    }
}
