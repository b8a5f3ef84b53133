//! Monster AI - one periodic attack task per live monster.
//!
//! Tasks are keyed by `(game_id, monster_id)`. Starting a task under a key
//! that already has one aborts the old task first. A task stops on its own
//! once its monster is gone or nobody conscious is left to attack. Tasks only
//! hold a weak reference to the scheduler, so dropping it aborts them all.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use std::time::Duration;

use dashmap::DashMap;
use tokio::task::AbortHandle;

use tavern_shared::ServerMessage;

use super::connections::ConnectionManager;
use crate::app::App;
use crate::use_cases::MonsterTurn;

type TaskKey = (String, String);

pub struct MonsterAi {
    app: Arc<App>,
    connections: Arc<ConnectionManager>,
    interval: Duration,
    /// Running tasks with the generation they were started under.
    tasks: DashMap<TaskKey, (u64, AbortHandle)>,
    generation: AtomicU64,
}

impl MonsterAi {
    pub fn new(app: Arc<App>, connections: Arc<ConnectionManager>, interval: Duration) -> Self {
        Self {
            app,
            connections,
            interval,
            tasks: DashMap::new(),
            generation: AtomicU64::new(0),
        }
    }

    /// Start (or restart) the attack loop for a monster.
    pub fn start(self: &Arc<Self>, game_id: &str, monster_id: &str) {
        let key: TaskKey = (game_id.to_string(), monster_id.to_string());
        let generation = self.generation.fetch_add(1, Ordering::Relaxed);

        let handle = tokio::spawn(Self::run(
            Arc::downgrade(self),
            key.clone(),
            generation,
            self.interval,
        ));

        if let Some((_, previous)) = self.tasks.insert(key, (generation, handle.abort_handle())) {
            previous.abort();
            tracing::debug!(game_id = %game_id, monster_id = %monster_id, "Replaced monster AI task");
        }
        tracing::debug!(
            game_id = %game_id,
            monster_id = %monster_id,
            interval_ms = self.interval.as_millis() as u64,
            "Monster AI started"
        );
    }

    /// Stop the task for one monster, if any.
    pub fn cancel(&self, game_id: &str, monster_id: &str) {
        if let Some((_, (_, handle))) = self
            .tasks
            .remove(&(game_id.to_string(), monster_id.to_string()))
        {
            handle.abort();
            tracing::debug!(game_id = %game_id, monster_id = %monster_id, "Monster AI cancelled");
        }
    }

    /// Stop every task of a game.
    pub fn cancel_game(&self, game_id: &str) {
        self.tasks.retain(|(task_game, _), (_, handle)| {
            if task_game == game_id {
                handle.abort();
                false
            } else {
                true
            }
        });
    }

    pub fn is_running(&self, game_id: &str, monster_id: &str) -> bool {
        self.tasks
            .contains_key(&(game_id.to_string(), monster_id.to_string()))
    }

    pub fn task_count(&self) -> usize {
        self.tasks.len()
    }

    async fn run(ai: Weak<Self>, key: TaskKey, generation: u64, interval: Duration) {
        loop {
            tokio::time::sleep(interval).await;

            let Some(ai) = ai.upgrade() else {
                return;
            };
            if !ai.turn(&key.0, &key.1).await {
                // A newer task may have taken the key in the meantime.
                ai.tasks.remove_if(&key, |_, (g, _)| *g == generation);
                return;
            }
        }
    }

    /// One monster turn; `false` once the loop should stop.
    async fn turn(&self, game_id: &str, monster_id: &str) -> bool {
        match self.app.use_cases.monsters.take_turn(game_id, monster_id) {
            MonsterTurn::Attacked {
                target_id,
                resolution,
            } => {
                tracing::debug!(
                    game_id = %game_id,
                    monster_id = %monster_id,
                    target_id = %target_id,
                    hit = resolution.result.hit,
                    damage = resolution.result.damage,
                    "Monster attacked"
                );
                if let Some(state) = self.app.use_cases.session.game_state(game_id) {
                    self.connections
                        .broadcast_to_game(game_id, ServerMessage::GameState { state })
                        .await;
                }
                true
            }
            stopped => {
                tracing::info!(
                    game_id = %game_id,
                    monster_id = %monster_id,
                    reason = ?stopped,
                    "Monster AI stopped"
                );
                false
            }
        }
    }
}

impl Drop for MonsterAi {
    fn drop(&mut self) {
        for entry in self.tasks.iter() {
            entry.value().1.abort();
        }
    }
}
