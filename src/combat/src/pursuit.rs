// src/combat/src/pursuit.rs
//! One-step greedy chase used by every enemy.
//!
//! Not a path search: an enemy looks at its four neighbours and keeps the
//! legal one closest to the target, so it can get stuck behind a wall.

use bincode::{Decode, Encode};
use dungeon::Position;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, IntoEnumIterator};

/// Cardinal step. Declaration order is the tie-break order: +x, -x, +y, -y.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, Display, EnumIter, Encode, Decode, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
pub enum Direction {
    East,
    West,
    South,
    North,
}

impl Direction {
    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::East => (1, 0),
            Direction::West => (-1, 0),
            Direction::South => (0, 1),
            Direction::North => (0, -1),
        }
    }

    /// Only unit cardinal deltas map to a direction
    pub fn from_delta(dx: i32, dy: i32) -> Option<Self> {
        Direction::iter().find(|dir| dir.delta() == (dx, dy))
    }

    pub fn step(self, from: Position) -> Position {
        let (dx, dy) = self.delta();
        from.offset(dx, dy)
    }
}

/// Neighbour of `from` that `can_enter` allows and that is nearest to
/// `target` by Manhattan distance; the first such neighbour in
/// [`Direction`] order wins ties. `None` when every neighbour is blocked.
pub fn greedy_step<F>(from: Position, target: Position, mut can_enter: F) -> Option<Position>
where
    F: FnMut(Position) -> bool,
{
    let mut best: Option<(Position, i32)> = None;
    for dir in Direction::iter() {
        let next = dir.step(from);
        if !can_enter(next) {
            continue;
        }
        let dist = next.manhattan(target);
        if best.is_none_or(|(_, best_dist)| dist < best_dist) {
            best = Some((next, dist));
        }
    }
    best.map(|(pos, _)| pos)
}
