//! Movement and attack patterns.
//!
//! Patterns only answer whether `to` is reachable from `from`; whether the
//! destination is empty, an enemy, or a valid target is checked elsewhere.

use crate::{
    board::Board,
    pos::{Color, Pos, SubDirection},
};

fn sign(to: usize, from: usize) -> isize {
    to.cmp(&from) as isize
}

pub fn pawn_move(board: &Board, color: &Color, from: &Pos, to: &Pos) -> bool {
    let forward = color.forward();
    let next = from.shift(0, forward);
    if next.as_ref() == Some(to) {
        return true;
    }
    from.shift(0, 2 * forward).as_ref() == Some(to) && next.is_some_and(|n| board.is_empty(&n))
}

pub fn pawn_take(color: &Color, from: &Pos, to: &Pos) -> bool {
    let forward = color.forward();
    [from.shift(-1, forward), from.shift(1, forward)]
        .iter()
        .any(|p| p.as_ref() == Some(to))
}

pub fn knight(from: &Pos, to: &Pos) -> bool {
    let Pos { x, y } = from.abs_diff(to);
    (x == 2 && y == 1) || (x == 1 && y == 2)
}

pub fn king(from: &Pos, to: &Pos) -> bool {
    let Pos { x, y } = from.abs_diff(to);
    x < 2 && y < 2
}

pub fn bishop(board: &Board, from: &Pos, to: &Pos) -> bool {
    let Pos { x, y } = from.abs_diff(to);
    if x != y || x == 0 {
        return false;
    }
    board
        .ray_cast_empty(from, None, (sign(to.x, from.x), sign(to.y, from.y)))
        .contains(to)
}

pub fn rook(board: &Board, from: &Pos, to: &Pos) -> bool {
    let Pos { x, y } = from.abs_diff(to);
    if (x != 0 && y != 0) || (x == 0 && y == 0) {
        return false;
    }
    board
        .ray_cast_empty(from, None, (sign(to.x, from.x), sign(to.y, from.y)))
        .contains(to)
}

pub fn queen(board: &Board, from: &Pos, to: &Pos) -> bool {
    bishop(board, from, to) || rook(board, from, to)
}

pub fn square(from: &Pos, to: &Pos, range: usize) -> bool {
    let Pos { x, y } = from.abs_diff(to);
    x <= range && y <= range
}

pub fn cross(from: &Pos, to: &Pos, range: usize) -> bool {
    let Pos { x, y } = from.abs_diff(to);
    (x == 0 || y == 0) && x + y <= range
}

/// Orthogonal line of `range` tiles that stops at the first enemy piece
/// impenetrable to `strength`; that piece is still hit.
pub fn blockable_cross(
    board: &Board,
    from: &Pos,
    to: &Pos,
    color: &Color,
    range: usize,
    strength: usize,
) -> bool {
    if !cross(from, to, range) || from == to {
        return false;
    }
    board
        .ray_cast(
            from,
            Some(range),
            (sign(to.x, from.x), sign(to.y, from.y)),
            |tile| tile.piece.is_impenetrable(strength) && !tile.is_controlled_by(color),
        )
        .contains(to)
}

pub fn archer_move(from: &Pos, to: &Pos) -> bool {
    magician_move(from, to) || king(from, to)
}

/// Diagonal step of at most two tiles.
pub fn magician_move(from: &Pos, to: &Pos) -> bool {
    let Pos { x, y } = from.abs_diff(to);
    x == y && x <= 2
}

/// Single orthogonal step.
pub fn structure_move(from: &Pos, to: &Pos) -> bool {
    let Pos { x, y } = from.abs_diff(to);
    x + y == 1
}

/// One or two steps in the direction picked by the movement rng.
pub fn crazy_pawn(board: &Board, from: &Pos, to: &Pos) -> bool {
    let index = ((board.rng.movement() * 8.0).floor() as usize).min(7);
    let subdirection = SubDirection::ALL[index];
    let first = from.subdirection_shift(&subdirection);
    first.as_ref() == Some(to)
        || first
            .and_then(|pos| pos.subdirection_shift(&subdirection))
            .as_ref()
            == Some(to)
}

pub fn super_pawn_move(board: &Board, color: &Color, from: &Pos, to: &Pos) -> bool {
    let forward = color.forward();
    [-1, 0, 1].into_iter().any(|dx| {
        let next = from.shift(dx, forward);
        next.as_ref() == Some(to)
            || (from.shift(2 * dx, 2 * forward).as_ref() == Some(to)
                && next.is_some_and(|n| board.is_empty(&n)))
    })
}

pub fn super_pawn_take(color: &Color, from: &Pos, to: &Pos) -> bool {
    let forward = color.forward();
    [-1, 0, 1]
        .into_iter()
        .any(|dx| from.shift(dx, forward).as_ref() == Some(to))
}
