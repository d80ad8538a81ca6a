//! The turn-based state machine that owns one run.
//!
//! A [`Game`] holds the generator, the current floor, the player and the
//! live enemies. Every public operation runs to completion before it
//! returns; there is no shared state and no background work.

use std::collections::{BTreeMap, HashSet};

use bincode::{Decode, Encode};
use combat::{Combat, Combatant, Direction, Enemy, Player, constants::FLOOR_HEAL, greedy_step};
use dungeon::{Dungeon, GameRng, Position};
use error::{GameError, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace, warn};

use crate::config::GameConfig;
use crate::message_log::{Message, MessageLog};
use crate::snapshot::GameSnapshot;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Encode, Decode, Serialize, Deserialize)]
pub enum Status {
    #[default]
    Playing,
    Won,
    Lost,
}

impl Status {
    /// Short banner for the HUD
    pub fn label(self) -> &'static str {
        match self {
            Status::Playing => "Exploring",
            Status::Won => "Floor Cleared",
            Status::Lost => "Game Over",
        }
    }
}

/// What a single move request turned into
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MoveOutcome {
    /// The run is not in progress; nothing happened
    Ignored,
    /// Target was a wall or off the map; no turn was spent
    Bumped,
    Moved,
    Attacked { enemy_id: u32, killed: bool },
}

/// A freshly generated floor, not yet installed
struct FloorLayout {
    dungeon: Dungeon,
    spawn: Position,
    enemies: BTreeMap<u32, Enemy>,
}

#[derive(Clone, Debug)]
pub struct Game {
    config: GameConfig,
    seed: i64,
    rng: GameRng,
    dungeon: Dungeon,
    player: Player,
    enemies: BTreeMap<u32, Enemy>,
    floor: u32,
    status: Status,
    log: MessageLog,
}

impl Game {
    /// Start a run with the default ruleset
    pub fn new(seed: i64) -> Result<Self> {
        Self::with_config(seed, GameConfig::default())
    }

    /// Start a run; fails if floor 1 cannot be generated or populated
    pub fn with_config(seed: i64, config: GameConfig) -> Result<Self> {
        config.validate()?;
        let mut rng = GameRng::new(seed);
        let FloorLayout {
            dungeon,
            spawn,
            enemies,
        } = build_floor(&mut rng, &config)?;

        let mut player = Player::new(config.player_max_hp);
        player.position = spawn;

        let mut game = Self {
            config,
            seed,
            rng,
            dungeon,
            player,
            enemies,
            floor: 1,
            status: Status::Playing,
            log: MessageLog::new(),
        };
        game.announce_floor();
        info!(seed, "run started");
        Ok(game)
    }

    /// Throw away the current run and start over from floor 1.
    ///
    /// On error the game is left exactly as it was.
    pub fn reset(&mut self, seed: i64) -> Result<()> {
        let mut rng = GameRng::new(seed);
        let layout = build_floor(&mut rng, &self.config)?;

        self.rng = rng;
        self.seed = seed;
        self.floor = 1;
        self.player.restore();
        self.status = Status::Playing;
        self.log.clear();
        self.log.push(format!("New run started (seed {}).", seed));
        self.install_floor(layout);
        info!(seed, "run reset");
        Ok(())
    }

    /// Step or attack in one cardinal direction
    pub fn attempt_move(&mut self, direction: Direction) -> MoveOutcome {
        if self.status != Status::Playing {
            return MoveOutcome::Ignored;
        }

        let target = direction.step(self.player.position);
        if !self.dungeon.is_walkable(target) {
            self.log.push("Bumped into a wall.");
            return MoveOutcome::Bumped;
        }

        let hit = self
            .enemies
            .values_mut()
            .find(|enemy| enemy.position == target)
            .map(|enemy| (enemy.id, Combat::player_attack(enemy)));

        let outcome = match hit {
            Some((enemy_id, attack)) => {
                self.log
                    .push(format!("You hit enemy #{} for {}.", enemy_id, attack.damage));
                if attack.defeated {
                    self.enemies.remove(&enemy_id);
                    self.log.push(format!("Enemy #{} dies.", enemy_id));
                    if self.enemies.is_empty() {
                        self.status = Status::Won;
                        self.log.push("All enemies defeated. Press N for next floor.");
                        info!(floor = self.floor, "floor cleared");
                    }
                }
                MoveOutcome::Attacked {
                    enemy_id,
                    killed: attack.defeated,
                }
            }
            None => {
                self.player.position = target;
                MoveOutcome::Moved
            }
        };

        if self.status == Status::Playing {
            self.enemy_turn();
            self.check_defeat();
        }
        outcome
    }

    /// Convenience for drivers that speak in raw deltas.
    /// Anything but a unit cardinal step is ignored.
    pub fn attempt_move_delta(&mut self, dx: i32, dy: i32) -> MoveOutcome {
        match Direction::from_delta(dx, dy) {
            Some(direction) => self.attempt_move(direction),
            None => MoveOutcome::Ignored,
        }
    }

    /// Descend after clearing a floor. Returns `Ok(false)` when the floor is
    /// not cleared yet. On error the game is left exactly as it was.
    pub fn next_floor(&mut self) -> Result<bool> {
        if self.status != Status::Won {
            return Ok(false);
        }

        let mut rng = self.rng.clone();
        let layout = build_floor(&mut rng, &self.config)?;
        self.rng = rng;

        self.floor += 1;
        self.status = Status::Playing;
        self.player.heal(FLOOR_HEAL);
        self.install_floor(layout);
        self.log.push(format!("Descended to floor {}.", self.floor));
        info!(floor = self.floor, hp = self.player.hp, "descended");
        Ok(true)
    }

    pub fn seed(&self) -> i64 {
        self.seed
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn width(&self) -> i32 {
        self.config.width
    }

    pub fn height(&self) -> i32 {
        self.config.height
    }

    pub fn dungeon(&self) -> &Dungeon {
        &self.dungeon
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    /// Live enemies in id order
    pub fn enemies(&self) -> impl Iterator<Item = &Enemy> {
        self.enemies.values()
    }

    /// Live enemies satisfying a predicate
    pub fn enemies_where<'a, P>(&'a self, predicate: P) -> impl Iterator<Item = &'a Enemy>
    where
        P: Fn(&Enemy) -> bool + 'a,
    {
        self.enemies.values().filter(move |enemy| predicate(enemy))
    }

    pub fn enemy(&self, id: u32) -> Option<&Enemy> {
        self.enemies.get(&id)
    }

    pub fn enemy_at(&self, pos: Position) -> Option<&Enemy> {
        self.enemies.values().find(|enemy| enemy.position == pos)
    }

    pub fn enemy_count(&self) -> usize {
        self.enemies.len()
    }

    pub fn floor(&self) -> u32 {
        self.floor
    }

    pub fn status(&self) -> Status {
        self.status
    }

    /// Newest first, at most five
    pub fn messages(&self) -> impl Iterator<Item = &Message> {
        self.log.iter()
    }

    pub fn message_log(&self) -> &MessageLog {
        &self.log
    }

    /// Read-only copy of everything a driver can observe
    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            seed: self.seed,
            floor: self.floor,
            status: self.status,
            player: self.player.clone(),
            enemies: self.enemies.values().cloned().collect(),
            width: self.width(),
            height: self.height(),
            rows: self
                .dungeon
                .rows()
                .map(|row| row.iter().map(|tile| tile.glyph()).collect())
                .collect(),
            messages: self.log.texts(),
        }
    }

    fn install_floor(&mut self, layout: FloorLayout) {
        self.dungeon = layout.dungeon;
        self.player.position = layout.spawn;
        self.enemies = layout.enemies;
        self.announce_floor();
    }

    fn announce_floor(&mut self) {
        self.log.push(format!(
            "Floor {} generated with {} enemies.",
            self.floor,
            self.enemies.len()
        ));
    }

    /// Every live enemy acts once, in id order. Occupancy is read live, so
    /// an enemy that moved earlier in the turn can block a later one.
    fn enemy_turn(&mut self) {
        let ids: Vec<u32> = self.enemies.keys().copied().collect();
        for id in ids {
            let Some(enemy) = self.enemies.get(&id) else {
                continue;
            };
            let from = enemy.position;

            if Combat::in_reach(enemy, &self.player) {
                let attack = Combat::enemy_attack(&mut self.player);
                self.log
                    .push(format!("Enemy #{} hits you for {}.", id, attack.damage));
                continue;
            }

            let player_pos = self.player.position;
            let step = greedy_step(from, player_pos, |cell| {
                self.dungeon.is_walkable(cell)
                    && cell != player_pos
                    && !self
                        .enemies
                        .values()
                        .any(|other| other.id != id && other.position == cell)
            });

            match step {
                Some(next) => {
                    if let Some(enemy) = self.enemies.get_mut(&id) {
                        enemy.position = next;
                    }
                    trace!(id, ?from, to = ?next, "enemy advanced");
                }
                None => trace!(id, ?from, "enemy stuck"),
            }
        }
    }

    fn check_defeat(&mut self) {
        if self.player.hp <= 0 {
            self.player.clamp_hp();
            self.status = Status::Lost;
            self.log.push("Game Over. Press R to restart.");
            info!(floor = self.floor, "player died");
        }
    }
}

/// Generate a dungeon and populate it: spawn point first, then enemies
fn build_floor(rng: &mut GameRng, config: &GameConfig) -> Result<FloorLayout> {
    let dungeon = Dungeon::generate(config.width, config.height, rng)?;
    if dungeon.floors().is_empty() {
        return Err(GameError::NoFloorTiles);
    }

    let spawn = *rng.pick(dungeon.floors())?;
    let count = rng.int_range(config.min_enemies, config.max_enemies)?;

    let mut occupied = HashSet::from([spawn]);
    let mut enemies = BTreeMap::new();
    for id in 1..=count as u32 {
        let tile = find_open_tile(rng, dungeon.floors(), &occupied, config.placement_attempts)?;
        occupied.insert(tile);
        enemies.insert(id, Enemy::new(id, tile, config.enemy_max_hp));
    }

    debug!(?spawn, enemies = enemies.len(), "floor populated");
    Ok(FloorLayout {
        dungeon,
        spawn,
        enemies,
    })
}

fn find_open_tile(
    rng: &mut GameRng,
    floors: &[Position],
    occupied: &HashSet<Position>,
    attempts: u32,
) -> Result<Position> {
    for attempt in 1..=attempts {
        let candidate = *rng.pick(floors)?;
        if !occupied.contains(&candidate) {
            if attempt > attempts / 2 {
                warn!(attempt, attempts, "placement needed many retries");
            }
            return Ok(candidate);
        }
    }
    Err(GameError::PlacementExhausted { attempts })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    /// Put the player somewhere and replace the enemy set with `(position, hp)` pairs
    fn stage(game: &mut Game, player: Position, enemies: &[(Position, i32)]) {
        game.player.position = player;
        game.enemies = enemies
            .iter()
            .enumerate()
            .map(|(i, &(pos, hp))| {
                let id = i as u32 + 1;
                let mut enemy = Enemy::new(id, pos, 8);
                enemy.hp = hp;
                (id, enemy)
            })
            .collect();
    }

    /// Centre of the first room; all four neighbours are floor
    fn open_cell(game: &Game) -> Position {
        game.dungeon.rooms()[0].center()
    }

    #[test]
    fn test_new_game_floor_one() {
        let game = Game::new(1).unwrap();
        assert_eq!(game.floor(), 1);
        assert_eq!(game.status(), Status::Playing);
        assert_eq!(game.player().hp, 20);
        assert_eq!(game.player().max_hp, 20);
        assert_eq!(game.enemy_count(), 6);
        assert_eq!(game.message_log().texts(), vec!["Floor 1 generated with 6 enemies."]);

        let ids: Vec<u32> = game.enemies().map(|e| e.id).collect();
        assert_eq!(ids, (1..=6).collect::<Vec<_>>());

        let mut seen = HashSet::from([game.player().position]);
        assert!(game.dungeon().is_walkable(game.player().position));
        for enemy in game.enemies() {
            assert!(game.dungeon().is_walkable(enemy.position));
            assert!(seen.insert(enemy.position), "two entities share a tile");
            assert_eq!(enemy.hp, 8);
        }
    }

    #[test]
    fn test_reference_spawn() {
        let game = Game::new(12345).unwrap();
        assert_eq!(game.player().position, Position::new(49, 27));
        assert_eq!(game.enemy_count(), 7);
    }

    #[test]
    fn test_wall_bump_from_spawn() {
        let mut game = Game::new(12345).unwrap();
        let spawn = game.player().position;
        let enemies_before: Vec<Enemy> = game.enemies().cloned().collect();

        for _ in 0..3 {
            assert_eq!(game.attempt_move(Direction::South), MoveOutcome::Bumped);
        }

        assert_eq!(game.player().position, spawn);
        assert_eq!(game.status(), Status::Playing);
        assert_eq!(game.player().hp, 20);
        assert_eq!(game.messages().next().unwrap().text, "Bumped into a wall.");
        // a bump spends no turn
        assert_eq!(game.enemies().cloned().collect::<Vec<_>>(), enemies_before);
    }

    #[test]
    fn test_north_of_first_floor_tile_is_wall() {
        let mut game = Game::new(12345).unwrap();
        let first = game.dungeon.floors()[0];
        stage(&mut game, first, &[(Position::new(1, 1), 8)]);

        assert_eq!(game.attempt_move(Direction::North), MoveOutcome::Bumped);
        assert_eq!(game.player().position, first);
    }

    #[test]
    fn test_log_is_capped_at_five() {
        let mut game = Game::new(12345).unwrap();
        for _ in 0..7 {
            game.attempt_move(Direction::South);
        }
        assert_eq!(game.message_log().len(), 5);
        assert!(game.messages().all(|m| m.text == "Bumped into a wall."));
    }

    #[test]
    fn test_plain_move_then_enemies_act() {
        let mut game = Game::new(3).unwrap();
        let cell = open_cell(&game);
        let far = game.dungeon.floors()[0];
        stage(&mut game, cell, &[(far, 8)]);

        assert_eq!(game.attempt_move(Direction::East), MoveOutcome::Moved);
        assert_eq!(game.player().position, cell.offset(1, 0));
        assert_eq!(game.status(), Status::Playing);
    }

    #[test]
    fn test_attack_does_not_move_player() {
        let mut game = Game::new(3).unwrap();
        let cell = open_cell(&game);
        stage(&mut game, cell, &[(cell.offset(1, 0), 8)]);

        let outcome = game.attempt_move(Direction::East);
        assert_eq!(
            outcome,
            MoveOutcome::Attacked {
                enemy_id: 1,
                killed: false
            }
        );
        assert_eq!(game.player().position, cell);
        assert_eq!(game.enemy(1).unwrap().hp, 4);
        // survivor is adjacent and strikes back
        assert_eq!(game.player().hp, 18);
        assert_eq!(
            game.message_log().texts()[..2].to_vec(),
            vec!["Enemy #1 hits you for 2.", "You hit enemy #1 for 4."]
        );
    }

    #[test]
    fn test_killing_last_enemy_wins_without_enemy_turn() {
        let mut game = Game::new(3).unwrap();
        let cell = open_cell(&game);
        stage(&mut game, cell, &[(cell.offset(0, 1), 4)]);
        game.player.hp = 7;

        let outcome = game.attempt_move(Direction::South);
        assert_eq!(
            outcome,
            MoveOutcome::Attacked {
                enemy_id: 1,
                killed: true
            }
        );
        assert_eq!(game.status(), Status::Won);
        assert_eq!(game.enemy_count(), 0);
        assert_eq!(game.player().hp, 7);
        assert_eq!(
            game.message_log().texts()[..3].to_vec(),
            vec![
                "All enemies defeated. Press N for next floor.",
                "Enemy #1 dies.",
                "You hit enemy #1 for 4."
            ]
        );

        // the run is frozen until the player descends
        let log_before = game.message_log().clone();
        assert_eq!(game.attempt_move(Direction::North), MoveOutcome::Ignored);
        assert_eq!(game.message_log(), &log_before);
        assert_eq!(game.player().position, cell);
    }

    #[test]
    fn test_kill_with_survivors_keeps_playing() {
        let mut game = Game::new(3).unwrap();
        let cell = open_cell(&game);
        let far = game.dungeon.floors()[0];
        stage(&mut game, cell, &[(cell.offset(-1, 0), 3), (far, 8)]);

        game.attempt_move(Direction::West);
        assert_eq!(game.status(), Status::Playing);
        assert!(game.enemy(1).is_none());
        assert!(game.enemy(2).is_some());
        assert_eq!(game.enemy_count(), 1);
    }

    #[test]
    fn test_cumulative_hits_lose_the_run() {
        let mut game = Game::new(3).unwrap();
        let cell = open_cell(&game);
        stage(
            &mut game,
            cell,
            &[(cell.offset(1, 0), 8), (cell.offset(-1, 0), 8)],
        );
        game.player.hp = 3;

        game.attempt_move(Direction::East);
        assert_eq!(game.status(), Status::Lost);
        assert_eq!(game.player().hp, 0);
        assert_eq!(
            game.message_log().texts()[..3].to_vec(),
            vec![
                "Game Over. Press R to restart.",
                "Enemy #2 hits you for 2.",
                "Enemy #1 hits you for 2."
            ]
        );

        let log_before = game.message_log().clone();
        assert_eq!(game.attempt_move(Direction::West), MoveOutcome::Ignored);
        assert_eq!(game.message_log(), &log_before);
        assert!(!game.next_floor().unwrap());
    }

    #[test]
    fn test_enemy_closes_distance() {
        let mut game = Game::new(3).unwrap();
        let cell = open_cell(&game);
        stage(&mut game, cell, &[(cell.offset(-2, 0), 8)]);

        game.enemy_turn();
        assert_eq!(game.enemy(1).unwrap().position, cell.offset(-1, 0));
        assert_eq!(game.player().hp, 20);

        game.enemy_turn();
        assert_eq!(game.enemy(1).unwrap().position, cell.offset(-1, 0));
        assert_eq!(game.player().hp, 18);
    }

    #[test]
    fn test_earlier_enemy_blocks_later_one() {
        let mut game = Game::new(3).unwrap();
        let cell = open_cell(&game);
        stage(
            &mut game,
            cell,
            &[
                (cell.offset(-2, 0), 8),
                (cell.offset(-1, 1), 8),
                (cell.offset(0, 1), 8),
            ],
        );

        game.enemy_turn();
        // enemy 1 takes the tile west of the player
        assert_eq!(game.enemy(1).unwrap().position, cell.offset(-1, 0));
        // enemy 2 would have stepped north into it; east is held by enemy 3
        assert_eq!(game.enemy(2).unwrap().position, cell.offset(-2, 1));
        // enemy 3 is adjacent and attacks instead of moving
        assert_eq!(game.enemy(3).unwrap().position, cell.offset(0, 1));
        assert_eq!(game.player().hp, 18);
    }

    #[test]
    fn test_next_floor_requires_win() {
        let mut game = Game::new(5).unwrap();
        assert!(!game.next_floor().unwrap());
        assert_eq!(game.floor(), 1);
        assert_eq!(game.status(), Status::Playing);
    }

    #[test]
    fn test_next_floor_heals_and_regenerates() {
        let mut game = Game::new(5).unwrap();
        let old_dungeon = game.dungeon().clone();
        game.enemies.clear();
        game.status = Status::Won;
        game.player.hp = 12;

        assert!(game.next_floor().unwrap());
        assert_eq!(game.floor(), 2);
        assert_eq!(game.status(), Status::Playing);
        assert_eq!(game.player().hp, 17);
        assert!(!game.dungeon().floors().is_empty());
        assert_ne!(game.dungeon(), &old_dungeon);
        assert!(game.dungeon().is_walkable(game.player().position));

        let count = game.enemy_count();
        assert!((5..=10).contains(&count));
        let ids: Vec<u32> = game.enemies().map(|e| e.id).collect();
        assert_eq!(ids, (1..=count as u32).collect::<Vec<_>>());

        let texts = game.message_log().texts();
        assert_eq!(texts[0], "Descended to floor 2.");
        assert_eq!(texts[1], format!("Floor 2 generated with {} enemies.", count));
    }

    #[test]
    fn test_next_floor_heal_is_capped() {
        let mut game = Game::new(5).unwrap();
        game.enemies.clear();
        game.status = Status::Won;
        game.player.hp = 18;

        game.next_floor().unwrap();
        assert_eq!(game.player().hp, 20);
    }

    #[test]
    fn test_reset_matches_fresh_run() {
        let mut game = Game::new(5).unwrap();
        game.player.hp = 3;
        game.floor = 4;
        game.status = Status::Lost;

        game.reset(7).unwrap();
        let fresh = Game::new(7).unwrap();

        assert_eq!(game.seed(), 7);
        assert_eq!(game.floor(), 1);
        assert_eq!(game.status(), Status::Playing);
        assert_eq!(game.player(), fresh.player());
        assert_eq!(game.dungeon(), fresh.dungeon());
        assert_eq!(
            game.enemies().collect::<Vec<_>>(),
            fresh.enemies().collect::<Vec<_>>()
        );
        assert_eq!(
            game.message_log().texts(),
            vec![
                "Floor 1 generated with 7 enemies.",
                "New run started (seed 7)."
            ]
        );
    }

    #[test]
    fn test_placement_budget_is_enforced() {
        let config = GameConfig {
            width: 13,
            height: 11,
            min_enemies: 500,
            max_enemies: 500,
            ..GameConfig::default()
        };
        let err = Game::with_config(1, config).unwrap_err();
        assert!(matches!(err, GameError::PlacementExhausted { attempts: 1000 }));
        assert!(err.is_generation_failure());
    }

    #[test]
    fn test_failed_reset_leaves_game_untouched() {
        let mut game = Game::new(5).unwrap();
        let before = game.snapshot();

        game.config.height = 5;
        assert!(matches!(game.reset(9), Err(GameError::GridTooSmall { .. })));

        game.config.height = 30;
        assert_eq!(game.snapshot(), before);
    }

    #[test]
    fn test_small_grid_is_fatal_at_construction() {
        let config = GameConfig {
            width: 8,
            height: 8,
            ..GameConfig::default()
        };
        assert!(Game::with_config(1, config).unwrap_err().is_generation_failure());
    }

    #[test]
    fn test_delta_moves() {
        let mut game = Game::new(12345).unwrap();
        assert_eq!(game.attempt_move_delta(1, 1), MoveOutcome::Ignored);
        assert_eq!(game.attempt_move_delta(0, 0), MoveOutcome::Ignored);
        assert_eq!(game.message_log().len(), 1);
        assert_eq!(game.attempt_move_delta(0, 1), MoveOutcome::Bumped);
    }

    #[test]
    fn test_enemies_where_filters() {
        let mut game = Game::new(3).unwrap();
        let cell = open_cell(&game);
        stage(
            &mut game,
            cell,
            &[(cell.offset(1, 0), 2), (cell.offset(-1, 0), 8), (cell.offset(0, 1), 5)],
        );
        let wounded: Vec<u32> = game.enemies_where(|e| e.hp < e.max_hp).map(|e| e.id).collect();
        assert_eq!(wounded, vec![1, 3]);
    }
}
