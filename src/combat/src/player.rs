// src/combat/src/player.rs

use bincode::{Decode, Encode};
use dungeon::Position;
use serde::{Deserialize, Serialize};

use crate::combatant::Combatant;

/// The single hero of a run; moved and healed in place, never replaced
#[derive(Clone, Debug, PartialEq, Eq, Encode, Decode, Serialize, Deserialize)]
pub struct Player {
    pub position: Position,
    pub hp: i32,
    pub max_hp: i32,
}

impl Player {
    pub fn new(max_hp: i32) -> Self {
        Self {
            position: Position::default(),
            hp: max_hp,
            max_hp,
        }
    }

    /// Fill the health pool back up
    pub fn restore(&mut self) {
        self.hp = self.max_hp;
    }

    /// Pin negative hit points to zero once the run is lost
    pub fn clamp_hp(&mut self) {
        self.hp = self.hp.max(0);
    }
}

impl Combatant for Player {
    fn hp(&self) -> i32 {
        self.hp
    }

    fn max_hp(&self) -> i32 {
        self.max_hp
    }

    fn position(&self) -> Position {
        self.position
    }

    fn name(&self) -> String {
        "you".to_string()
    }

    fn take_damage(&mut self, amount: i32) -> bool {
        self.hp -= amount;
        self.is_alive()
    }

    fn heal(&mut self, amount: i32) {
        self.hp = self.max_hp.min(self.hp + amount);
    }
}
