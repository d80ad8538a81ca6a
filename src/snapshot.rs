//! Read-only view of a run for drivers, tests and replay checks.

use bincode::{Decode, Encode};
use combat::{Enemy, Player};
use serde::{Deserialize, Serialize};

use crate::game::Status;

#[derive(Clone, Debug, PartialEq, Eq, Encode, Decode, Serialize, Deserialize)]
pub struct GameSnapshot {
    pub seed: i64,
    pub floor: u32,
    pub status: Status,
    pub player: Player,
    /// Live enemies in id order
    pub enemies: Vec<Enemy>,
    pub width: i32,
    pub height: i32,
    /// Terrain only, one string per row (`#` wall, `.` floor)
    pub rows: Vec<String>,
    /// Newest first
    pub messages: Vec<String>,
}

impl GameSnapshot {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Compact binary encoding; two runs in the same state encode to the same bytes
    pub fn fingerprint(&self) -> Result<Vec<u8>, bincode::error::EncodeError> {
        bincode::encode_to_vec(self, bincode::config::standard())
    }

    pub fn from_fingerprint(bytes: &[u8]) -> Result<Self, bincode::error::DecodeError> {
        let (snapshot, _) = bincode::decode_from_slice(bytes, bincode::config::standard())?;
        Ok(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use crate::game::Game;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_json_shape() {
        let game = Game::new(1).unwrap();
        let json = game.snapshot().to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["floor"], 1);
        assert_eq!(value["status"], "Playing");
        assert_eq!(value["player"]["hp"], 20);
        assert_eq!(value["enemies"].as_array().unwrap().len(), 6);
        assert_eq!(value["rows"].as_array().unwrap().len(), 30);
        assert_eq!(value["rows"][0].as_str().unwrap().len(), 60);
    }

    #[test]
    fn test_fingerprint_decodes_back() {
        let snapshot = Game::new(8).unwrap().snapshot();
        let bytes = snapshot.fingerprint().unwrap();
        let decoded = super::GameSnapshot::from_fingerprint(&bytes).unwrap();
        assert_eq!(decoded, snapshot);
    }
}
