//! Energy heuristic for 2048 grids.
//!
//! Lower energy means a grid that is easier to keep playing:
//!
//! | term      | per tile                                                          |
//! |-----------|-------------------------------------------------------------------|
//! | `epsilon` | the tile exponent, or `-1` for an empty cell                       |
//! | `phi`     | per neighbour: `-exp` when the neighbour is equal, `+exp` otherwise |
//! | `xi`      | per axis: `-exp` when both neighbours form a +-1 gradient through the tile, `+exp` otherwise |
//!
//! Empty cells only contribute `epsilon`.

use std::ops::AddAssign;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Energy {
    pub epsilon: isize,
    pub phi: isize,
    pub xi: isize,
}

impl Energy {
    pub fn sum(&self) -> isize {
        self.epsilon + self.phi + self.xi
    }
}

impl AddAssign for Energy {
    fn add_assign(&mut self, rhs: Self) {
        self.epsilon += rhs.epsilon;
        self.phi += rhs.phi;
        self.xi += rhs.xi;
    }
}

/// Energy of a single tile with every neighbour term kept apart.
///
/// A term is `None` when the neighbour (or neighbour pair) falls off the grid.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FullEnergy {
    pub epsilon: isize,
    pub phi_north: Option<isize>,
    pub phi_south: Option<isize>,
    pub phi_west: Option<isize>,
    pub phi_east: Option<isize>,
    pub xi_vertical: Option<isize>,
    pub xi_horizontal: Option<isize>,
}

impl FullEnergy {
    pub fn reduce(self) -> Energy {
        Energy {
            epsilon: self.epsilon,
            phi: [self.phi_north, self.phi_south, self.phi_west, self.phi_east]
                .into_iter()
                .flatten()
                .sum(),
            xi: [self.xi_vertical, self.xi_horizontal]
                .into_iter()
                .flatten()
                .sum(),
        }
    }
}

pub(crate) fn phi(exp: u8, neighbour: Option<u8>) -> Option<isize> {
    neighbour.map(|n| if n == exp { -(exp as isize) } else { exp as isize })
}

pub(crate) fn xi(exp: u8, a: Option<u8>, b: Option<u8>) -> Option<isize> {
    let (a, b) = (a? as isize, b? as isize);
    let e = exp as isize;
    let gradient = (a == e + 1 && b == e - 1) || (a == e - 1 && b == e + 1);
    Some(if gradient { -e } else { e })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reduce_ignores_missing_terms() {
        let full = FullEnergy {
            epsilon: 3,
            phi_north: Some(-3),
            phi_east: Some(3),
            xi_horizontal: Some(3),
            ..FullEnergy::default()
        };
        let energy = full.reduce();
        assert_eq!(energy, Energy { epsilon: 3, phi: 0, xi: 3 });
        assert_eq!(energy.sum(), 6);
    }

    #[test]
    fn test_phi_and_xi() {
        assert_eq!(phi(2, Some(2)), Some(-2));
        assert_eq!(phi(2, Some(3)), Some(2));
        assert_eq!(phi(2, None), None);
        assert_eq!(xi(2, Some(1), Some(3)), Some(-2));
        assert_eq!(xi(2, Some(3), Some(1)), Some(-2));
        assert_eq!(xi(2, Some(3), Some(3)), Some(2));
        assert_eq!(xi(2, None, Some(3)), None);
    }
}
