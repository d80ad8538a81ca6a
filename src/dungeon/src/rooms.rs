// src/dungeon/src/rooms.rs

use bincode::{Decode, Encode};
use serde::{Deserialize, Serialize};

use crate::tiles::Position;

/// Axis-aligned rectangle of carved floor
#[derive(Clone, Copy, Debug, PartialEq, Eq, Encode, Decode, Serialize, Deserialize)]
pub struct Room {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Room {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Centre cell, rounded toward the top-left
    pub fn center(&self) -> Position {
        Position::new(self.x + self.width / 2, self.y + self.height / 2)
    }

    /// Overlap test with one tile of padding around both rooms
    pub fn intersects(&self, other: &Self) -> bool {
        self.x <= other.x + other.width + 1
            && self.x + self.width + 1 >= other.x
            && self.y <= other.y + other.height + 1
            && self.y + self.height + 1 >= other.y
    }

    #[cfg(test)]
    pub fn contains(&self, pos: Position) -> bool {
        pos.x >= self.x
            && pos.x < self.x + self.width
            && pos.y >= self.y
            && pos.y < self.y + self.height
    }

    /// Every cell inside the room, row by row
    pub fn cells(&self) -> impl Iterator<Item = Position> {
        let Room {
            x,
            y,
            width,
            height,
        } = *self;
        (y..y + height).flat_map(move |row| (x..x + width).map(move |col| Position::new(col, row)))
    }
}

/// L-shaped passage joining two room centres
#[derive(Clone, Debug, PartialEq, Eq, Encode, Decode, Serialize, Deserialize)]
pub struct Corridor {
    pub start: Position,
    pub end: Position,
    pub horizontal_first: bool,
    pub tiles: Vec<Position>,
}

impl Corridor {
    pub fn new(start: Position, end: Position, horizontal_first: bool) -> Self {
        let tiles = Self::create_corridor_tiles(start, end, horizontal_first);
        Self {
            start,
            end,
            horizontal_first,
            tiles,
        }
    }

    /// Both legs are inclusive of their endpoints, so the bend is listed twice
    fn create_corridor_tiles(start: Position, end: Position, horizontal_first: bool) -> Vec<Position> {
        let mut tiles = Vec::new();
        if horizontal_first {
            horizontal_run(&mut tiles, start.x, end.x, start.y);
            vertical_run(&mut tiles, start.y, end.y, end.x);
        } else {
            vertical_run(&mut tiles, start.y, end.y, start.x);
            horizontal_run(&mut tiles, start.x, end.x, end.y);
        }
        tiles
    }
}

fn horizontal_run(tiles: &mut Vec<Position>, x1: i32, x2: i32, y: i32) {
    tiles.extend((x1.min(x2)..=x1.max(x2)).map(|x| Position::new(x, y)));
}

fn vertical_run(tiles: &mut Vec<Position>, y1: i32, y2: i32, x: i32) {
    tiles.extend((y1.min(y2)..=y1.max(y2)).map(|y| Position::new(x, y)));
}
