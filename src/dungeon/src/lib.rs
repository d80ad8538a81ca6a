//src/dungeon/src/lib.rs
//! Seeded room-and-corridor dungeon generation.
//!
//! A [`Dungeon`] is built once per floor and never patched afterwards: the
//! tile grid and the cached list of floor positions come out of the same
//! construction step, so they cannot drift apart.

use bincode::{Decode, Encode};
use error::{GameError, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

pub mod rng;
pub mod rooms;
pub mod tiles;

pub use crate::rng::GameRng;
pub use crate::rooms::{Corridor, Room};
pub use crate::tiles::{Position, Tile};

/// Layout constants for the room placer
pub mod constants {
    pub const ROOM_ATTEMPTS: u32 = 120; // Candidate rooms drawn per floor
    pub const MAX_ROOMS: usize = 14; // Placement stops once this many fit
    pub const MIN_ROOM_WIDTH: i32 = 4;
    pub const MAX_ROOM_WIDTH: i32 = 10;
    pub const MIN_ROOM_HEIGHT: i32 = 4;
    pub const MAX_ROOM_HEIGHT: i32 = 8;
    pub const MAX_GRID_SIDE: i32 = 1000; // Largest width or height a run may configure
    pub const HORIZONTAL_FIRST_CHANCE: f64 = 0.5; // Corridor leg order
}

use crate::constants::*;

#[derive(Clone, Debug, PartialEq, Eq, Encode, Decode, Serialize, Deserialize)]
pub struct Dungeon {
    width: i32,
    height: i32,
    tiles: Vec<Tile>,
    floors: Vec<Position>,
    rooms: Vec<Room>,
    corridors: Vec<Corridor>,
}

impl Dungeon {
    /// Carve a fresh floor from the generator's current state.
    ///
    /// The grid must leave a corner range for the widest and the tallest
    /// room candidate, so anything under 13x11 is rejected up front even
    /// though a smaller room might still fit. A grid whose cell count
    /// overflows `i32` is rejected too. Beyond that the generator does not
    /// special-case an empty result; callers decide whether zero floor tiles
    /// is fatal.
    pub fn generate(width: i32, height: i32, rng: &mut GameRng) -> Result<Self> {
        if width < MAX_ROOM_WIDTH + 3 || height < MAX_ROOM_HEIGHT + 3 {
            return Err(GameError::GridTooSmall { width, height });
        }
        let cells = width
            .checked_mul(height)
            .ok_or(GameError::GridTooLarge { width, height })?;

        let mut tiles = vec![Tile::Wall; cells as usize];
        let mut rooms: Vec<Room> = Vec::with_capacity(MAX_ROOMS);
        let mut corridors = Vec::with_capacity(MAX_ROOMS);

        for _ in 0..ROOM_ATTEMPTS {
            let room_width = rng.int_range(MIN_ROOM_WIDTH, MAX_ROOM_WIDTH)?;
            let room_height = rng.int_range(MIN_ROOM_HEIGHT, MAX_ROOM_HEIGHT)?;
            let x = rng.int_range(1, width - room_width - 2)?;
            let y = rng.int_range(1, height - room_height - 2)?;

            let room = Room::new(x, y, room_width, room_height);
            if rooms.iter().any(|other| room.intersects(other)) {
                continue;
            }

            for cell in room.cells() {
                tiles[index(width, cell)] = Tile::Floor;
            }

            if let Some(prev) = rooms.last() {
                let horizontal_first = rng.chance(HORIZONTAL_FIRST_CHANCE);
                let corridor = Corridor::new(prev.center(), room.center(), horizontal_first);
                for &cell in &corridor.tiles {
                    tiles[index(width, cell)] = Tile::Floor;
                }
                corridors.push(corridor);
            }

            rooms.push(room);
            if rooms.len() >= MAX_ROOMS {
                break;
            }
        }

        let floors: Vec<Position> = (0..height)
            .flat_map(|y| (0..width).map(move |x| Position::new(x, y)))
            .filter(|&pos| tiles[index(width, pos)] == Tile::Floor)
            .collect();

        debug!(
            width,
            height,
            rooms = rooms.len(),
            floor_tiles = floors.len(),
            "dungeon generated"
        );

        Ok(Self {
            width,
            height,
            tiles,
            floors,
            rooms,
            corridors,
        })
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn in_bounds(&self, pos: Position) -> bool {
        pos.x >= 0 && pos.y >= 0 && pos.x < self.width && pos.y < self.height
    }

    /// Tile at a position, `None` outside the grid
    pub fn tile(&self, pos: Position) -> Option<Tile> {
        self.in_bounds(pos).then(|| self.tiles[index(self.width, pos)])
    }

    /// In bounds and a floor tile
    pub fn is_walkable(&self, pos: Position) -> bool {
        self.tile(pos).is_some_and(Tile::is_walkable)
    }

    /// All floor positions in row-major scan order
    pub fn floors(&self) -> &[Position] {
        &self.floors
    }

    /// Rooms in the order they were accepted
    pub fn rooms(&self) -> &[Room] {
        &self.rooms
    }

    /// `corridors[i]` joins `rooms[i]` to `rooms[i + 1]`
    pub fn corridors(&self) -> &[Corridor] {
        &self.corridors
    }

    /// Grid rows from top to bottom
    pub fn rows(&self) -> impl Iterator<Item = &[Tile]> {
        self.tiles.chunks(self.width as usize)
    }
}

fn index(width: i32, pos: Position) -> usize {
    pos.y as usize * width as usize + pos.x as usize
}
