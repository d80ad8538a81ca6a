// src/combat/src/enemy.rs

use bincode::{Decode, Encode};
use dungeon::Position;
use serde::{Deserialize, Serialize};

use crate::combatant::Combatant;

/// A hostile on the current floor, identified by its placement order
#[derive(Clone, Debug, PartialEq, Eq, Encode, Decode, Serialize, Deserialize)]
pub struct Enemy {
    pub id: u32,
    pub position: Position,
    pub hp: i32,
    pub max_hp: i32,
}

impl Enemy {
    pub fn new(id: u32, position: Position, max_hp: i32) -> Self {
        Self {
            id,
            position,
            hp: max_hp,
            max_hp,
        }
    }

    /// Map glyph
    pub fn symbol(&self) -> char {
        'g'
    }
}

impl Combatant for Enemy {
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
        format!("enemy #{}", self.id)
    }

    fn take_damage(&mut self, amount: i32) -> bool {
        self.hp -= amount;
        self.is_alive()
    }

    fn heal(&mut self, amount: i32) {
        self.hp = self.max_hp.min(self.hp + amount);
    }
}
