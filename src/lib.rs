//! Seeded, turn-based tile dungeon crawler.
//!
//! The engine crates (`dungeon`, `combat`, `error`) hold the pure rules;
//! this crate wires them into the run state machine and the terminal
//! driver.

pub mod config;
pub mod game;
pub mod input;
pub mod message_log;
pub mod renderer;
pub mod snapshot;

pub use combat::Direction;
pub use config::GameConfig;
pub use error::{GameError, Result, handle_error};
pub use game::{Game, MoveOutcome, Status};
pub use message_log::{Message, MessageLog};
pub use snapshot::GameSnapshot;
