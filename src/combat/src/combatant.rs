// src/combat/src/combatant.rs

use dungeon::Position;

/// Something with a position and a health pool that can be hit
pub trait Combatant {
    /// Current hit points; may dip below zero until the turn is settled
    fn hp(&self) -> i32;

    fn max_hp(&self) -> i32;

    fn position(&self) -> Position;

    /// Label used in log lines
    fn name(&self) -> String;

    fn is_alive(&self) -> bool {
        self.hp() > 0
    }

    /// Subtract damage, returning whether the target is still alive
    fn take_damage(&mut self, amount: i32) -> bool;

    /// Restore hit points without exceeding the maximum
    fn heal(&mut self, amount: i32);
}
