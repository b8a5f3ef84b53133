//! Game registry - owner of every live game.
//!
//! Games live in a `DashMap` keyed by game id. Each mutation runs as a
//! synchronous closure under the entry's write guard, so one operation on a
//! game completes before the next one on the same game starts, while
//! independent games proceed in parallel. Closures must not call back into
//! the registry.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use dashmap::DashMap;

use tavern_domain::{
    Character, CharacterUpdate, DomainError, Game, MonsterInstance, MonsterRule, Player,
};

use crate::infrastructure::ports::{ClockPort, RandomPort};

/// Append a line to a game's log, mirrored to the process log.
pub fn log_line(game: &mut Game, message: impl Into<String>) {
    let message = message.into();
    tracing::debug!(game_id = %game.id, log = %message, "Game log");
    game.append_log(message);
}

pub struct GameRegistry {
    games: DashMap<String, Game>,
    clock: Arc<dyn ClockPort>,
    random: Arc<dyn RandomPort>,
    monster_sequence: AtomicU64,
}

impl GameRegistry {
    pub fn new(clock: Arc<dyn ClockPort>, random: Arc<dyn RandomPort>) -> Self {
        Self {
            games: DashMap::new(),
            clock,
            random,
            monster_sequence: AtomicU64::new(0),
        }
    }

    /// Snapshot of a game, creating it if it does not exist yet.
    pub fn create_or_get_game(&self, game_id: &str) -> Game {
        self.update(game_id, |game| game.clone())
    }

    /// Snapshot of a game. Never creates.
    pub fn get_game(&self, game_id: &str) -> Option<Game> {
        self.games.get(game_id).map(|game| game.value().clone())
    }

    pub fn contains(&self, game_id: &str) -> bool {
        self.games.contains_key(game_id)
    }

    pub fn game_count(&self) -> usize {
        self.games.len()
    }

    /// Run `f` against a game, creating the game first if needed.
    pub fn update<R>(&self, game_id: &str, f: impl FnOnce(&mut Game) -> R) -> R {
        let mut game = self.games.entry(game_id.to_string()).or_insert_with(|| {
            tracing::info!(game_id = %game_id, "Game created");
            Game::new(game_id)
        });
        f(&mut *game)
    }

    /// Run `f` against a game only if it already exists.
    pub fn update_existing<R>(&self, game_id: &str, f: impl FnOnce(&mut Game) -> R) -> Option<R> {
        self.games.get_mut(game_id).map(|mut game| f(&mut *game))
    }

    /// Add a player; an existing player with the same id is left untouched.
    pub fn add_player(&self, game_id: &str, player_id: &str, name: &str) -> Player {
        self.update(game_id, |game| {
            let (player, added) = game.add_player(player_id, name);
            let player = player.clone();
            if added {
                tracing::info!(game_id = %game_id, player_id = %player_id, "Player added");
            }
            player
        })
    }

    pub fn append_log(&self, game_id: &str, message: impl Into<String>) {
        let message = message.into();
        self.update(game_id, |game| log_line(game, message));
    }

    /// Create a monster instance from its rule and add it to the game.
    pub fn spawn_monster(
        &self,
        game_id: &str,
        monster_type: &str,
        rule: &MonsterRule,
    ) -> MonsterInstance {
        self.spawn_monster_with(game_id, monster_type, rule, |_, _| ()).0
    }

    /// Like [`spawn_monster`](Self::spawn_monster), then run `then` under the
    /// same entry guard, so nothing can observe the monster before `then` ran.
    pub fn spawn_monster_with<R>(
        &self,
        game_id: &str,
        monster_type: &str,
        rule: &MonsterRule,
        then: impl FnOnce(&mut Game, &MonsterInstance) -> R,
    ) -> (MonsterInstance, R) {
        let monster = MonsterInstance::new(
            self.next_monster_id(monster_type),
            monster_type,
            rule.starting_hit_points(),
            rule.armor_class(),
        );
        let result = self.update(game_id, |game| {
            game.insert_monster(monster.clone());
            then(game, &monster)
        });
        tracing::info!(
            game_id = %game_id,
            monster_id = %monster.id,
            monster_type = %monster_type,
            "Monster spawned"
        );
        (monster, result)
    }

    pub fn get_monster(&self, game_id: &str, monster_id: &str) -> Option<MonsterInstance> {
        self.games
            .get(game_id)
            .and_then(|game| game.monster(monster_id).cloned())
    }

    pub fn set_character(
        &self,
        game_id: &str,
        player_id: &str,
        update: CharacterUpdate,
    ) -> Result<Character, DomainError> {
        self.update(game_id, |game| game.set_character(player_id, update).cloned())
    }

    /// Add experience, returning every level reached.
    pub fn add_experience(
        &self,
        game_id: &str,
        player_id: &str,
        xp: u32,
    ) -> Result<Vec<u32>, DomainError> {
        self.update(game_id, |game| game.add_experience(player_id, xp))
    }

    pub fn add_item_to_player(
        &self,
        game_id: &str,
        player_id: &str,
        item_id: &str,
    ) -> Result<(), DomainError> {
        self.update(game_id, |game| game.add_item_to_player(player_id, item_id))
    }

    /// Remove the first occurrence of an item; `Ok(false)` if it was not carried.
    pub fn remove_item_from_player(
        &self,
        game_id: &str,
        player_id: &str,
        item_id: &str,
    ) -> Result<bool, DomainError> {
        self.update(game_id, |game| {
            game.remove_item_from_player(player_id, item_id)
        })
    }

    /// Detached copy of a character, `None` if the game, player or character is absent.
    pub fn export_character(&self, game_id: &str, player_id: &str) -> Option<Character> {
        self.games
            .get(game_id)
            .and_then(|game| game.export_character(player_id))
    }

    /// `<type>-<unix millis>-<sequence>-<random>`.
    ///
    /// The process-wide sequence alone makes ids unique; the timestamp and
    /// random suffix keep them unique across restarts as well.
    fn next_monster_id(&self, monster_type: &str) -> String {
        let millis = self.clock.now().timestamp_millis();
        let sequence = self.monster_sequence.fetch_add(1, Ordering::Relaxed);
        let suffix = self.random.gen_uuid().simple().to_string();
        format!(
            "{}-{}-{}-{}",
            monster_type,
            millis,
            sequence,
            &suffix[..8]
        )
    }
}
