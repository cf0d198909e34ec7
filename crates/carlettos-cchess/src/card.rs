//! Cards held by players or laid on the board.

use rand::{Rng, seq::SliceRandom};
use serde::{Deserialize, Serialize};

use crate::board::Mana;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Card {
    // Summon
    Knight,
    Rook,
    Warlock,
    // Board state
    Ice,
    Fire,
    AttackDemonic,
    Invulnerability,
    Revive,
    // Utility
    AddMovement,
}

impl Card {
    pub fn cost(&self) -> Mana {
        Mana(match self {
            Card::Knight => 2,
            Card::Rook => 0,
            Card::Warlock => 5,
            Card::Ice => 3,
            Card::Fire => 3,
            Card::AttackDemonic => 3,
            Card::Invulnerability => 5,
            Card::Revive => 4,
            Card::AddMovement => 1,
        })
    }

    /// Whether the card stays on the board once played.
    pub fn is_board_state(&self) -> bool {
        matches!(
            self,
            Card::Ice | Card::Fire | Card::AttackDemonic | Card::Invulnerability | Card::Revive
        )
    }
}

/// An ordered pile of cards; the top of the pile is the end of the vector.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cards(pub Vec<Card>);

impl Cards {
    pub fn add(&mut self, card: Card) {
        self.0.push(card);
    }

    /// Removes the first copy of `card`.
    pub fn remove(&mut self, card: Card) -> Option<Card> {
        let index = self.0.iter().position(|c| *c == card)?;
        Some(self.0.remove(index))
    }

    /// Pops the top card.
    pub fn take(&mut self) -> Option<Card> {
        self.0.pop()
    }

    pub fn contains(&self, card: &Card) -> bool {
        self.0.contains(card)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn shuffle<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.0.shuffle(rng);
    }
}

impl From<Vec<Card>> for Cards {
    fn from(cards: Vec<Card>) -> Self {
        Self(cards)
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;

    #[test]
    fn test_costs() {
        assert_eq!(Card::Warlock.cost(), Mana(5));
        assert_eq!(Card::Rook.cost(), Mana(0));
        assert_eq!(Card::AddMovement.cost(), Mana(1));
        assert!(Card::Ice.is_board_state());
        assert!(!Card::AddMovement.is_board_state());
    }

    #[test]
    fn test_pile_operations() {
        let mut cards = Cards::from(vec![Card::Ice, Card::Fire, Card::Ice]);
        assert_eq!(cards.take(), Some(Card::Ice));
        assert_eq!(cards.remove(Card::Ice), Some(Card::Ice));
        assert_eq!(cards.remove(Card::Revive), None);
        assert_eq!(cards.len(), 1);
        assert!(cards.contains(&Card::Fire));
        cards.take();
        assert!(cards.is_empty());
        assert_eq!(cards.take(), None);
    }

    #[test]
    fn test_shuffle_keeps_cards() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut cards = Cards::from(vec![Card::Ice, Card::Fire, Card::Revive, Card::Rook]);
        cards.shuffle(&mut rng);
        let mut sorted = cards.0.clone();
        sorted.sort_by_key(|c| c.cost().0);
        assert_eq!(sorted.len(), 4);
        assert!(cards.contains(&Card::Revive));
    }
}
