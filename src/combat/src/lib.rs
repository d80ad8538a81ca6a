// src/combat/src/lib.rs
//! Melee rules, combatants and the enemy chase step.

use tracing::trace;

pub mod combatant;
pub mod enemy;
pub mod player;
pub mod pursuit;

pub use crate::combatant::Combatant;
pub use crate::enemy::Enemy;
pub use crate::player::Player;
pub use crate::pursuit::{Direction, greedy_step};

/// Handles combat interactions between entities
pub struct Combat;

/// Fixed combat numbers
pub mod constants {
    pub const PLAYER_ATTACK: i32 = 4; // Damage the player deals per hit
    pub const ENEMY_ATTACK: i32 = 2; // Damage an adjacent enemy deals per turn
    pub const FLOOR_HEAL: i32 = 5; // Healing granted on descending
}

/// Result of a single blow
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttackOutcome {
    pub damage: i32,
    pub defeated: bool,
}

impl Combat {
    /// Apply a fixed-damage hit. Every swing lands; there is no miss roll.
    pub fn strike<T: Combatant>(defender: &mut T, damage: i32) -> AttackOutcome {
        let alive = defender.take_damage(damage);
        trace!(
            target_name = %defender.name(),
            damage,
            hp = defender.hp(),
            "strike resolved"
        );
        AttackOutcome {
            damage,
            defeated: !alive,
        }
    }

    /// The player's melee attack
    pub fn player_attack(enemy: &mut Enemy) -> AttackOutcome {
        Self::strike(enemy, constants::PLAYER_ATTACK)
    }

    /// An adjacent enemy's attack
    pub fn enemy_attack(player: &mut Player) -> AttackOutcome {
        Self::strike(player, constants::ENEMY_ATTACK)
    }

    /// Melee reach is one cardinal step
    pub fn in_reach<A: Combatant, B: Combatant>(a: &A, b: &B) -> bool {
        a.position().is_adjacent(b.position())
    }
}
