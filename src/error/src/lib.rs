//! Error types shared by the engine crates.
//!
//! Generation failures are fatal for the run that triggered them: the
//! driver must not be handed a half-built floor. Benign no-ops (walking
//! into a wall, acting after the run ended) are not errors and never
//! appear here.

use thiserror::Error;

/// Errors raised while building or driving a run
#[derive(Debug, Error)]
pub enum GameError {
    /// The generator carved no floor tiles at all
    #[error("Map generation failed: no floor tiles")]
    NoFloorTiles,

    /// The grid cannot hold a room inside its 1-tile border
    #[error("Map generation failed: {width}x{height} grid is too small for a room")]
    GridTooSmall { width: i32, height: i32 },

    /// The grid has more cells than a tile index can address
    #[error("Map generation failed: {width}x{height} grid is too large")]
    GridTooLarge { width: i32, height: i32 },

    /// Entity placement ran out of random draws
    #[error("Unable to place entity on floor tile after {attempts} attempts")]
    PlacementExhausted { attempts: u32 },

    /// Caller handed the RNG an empty slice or an inverted range
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Configuration values contradict each other
    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    /// Config file could not be read
    #[error("Config IO error: {0}")]
    ConfigIo(#[from] std::io::Error),

    /// Config file is not valid JSON for the expected shape
    #[error("Config parse error: {0}")]
    ConfigParse(#[from] serde_json::Error),
}

impl GameError {
    /// Whether this error belongs to the fatal generation group
    pub fn is_generation_failure(&self) -> bool {
        matches!(
            self,
            GameError::NoFloorTiles
                | GameError::GridTooSmall { .. }
                | GameError::GridTooLarge { .. }
                | GameError::PlacementExhausted { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, GameError>;

/// Convert an error into a message fit for the player
pub fn handle_error(error: &GameError) -> String {
    match error {
        GameError::NoFloorTiles
        | GameError::GridTooSmall { .. }
        | GameError::GridTooLarge { .. } => {
            format!("The dungeon could not be built: {}", error)
        }
        GameError::PlacementExhausted { .. } => {
            "The dungeon is too crowded to place everyone. Try another seed.".to_string()
        }
        GameError::ConfigIo(e) => match e.kind() {
            std::io::ErrorKind::NotFound => "Config file not found".to_string(),
            std::io::ErrorKind::PermissionDenied => {
                "No permission to read the config file".to_string()
            }
            _ => format!("Could not read config: {}", e),
        },
        _ => error.to_string(),
    }
}
