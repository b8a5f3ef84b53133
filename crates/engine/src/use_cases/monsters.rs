//! Monster lifecycle: spawning and the periodic monster turn.

use std::sync::Arc;

use tavern_domain::MonsterInstance;

use super::combat::{monster_attack, AttackOutcome};
use super::{Resolution, ResolutionError};
use crate::infrastructure::content::ContentStore;
use crate::infrastructure::ports::RandomPort;
use crate::stores::{log_line, GameRegistry};

/// What happened on one monster turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MonsterTurn {
    /// The monster attacked a randomly chosen conscious player.
    Attacked {
        target_id: String,
        resolution: Resolution<AttackOutcome>,
    },
    /// The game or the monster no longer exists.
    MonsterGone,
    /// Nobody conscious is left to attack.
    NoTargets,
}

pub struct Monsters {
    registry: Arc<GameRegistry>,
    content: Arc<ContentStore>,
    random: Arc<dyn RandomPort>,
}

impl Monsters {
    pub fn new(
        registry: Arc<GameRegistry>,
        content: Arc<ContentStore>,
        random: Arc<dyn RandomPort>,
    ) -> Self {
        Self {
            registry,
            content,
            random,
        }
    }

    /// Spawn a monster of a rule-table type and announce it in the log.
    pub fn spawn(
        &self,
        game_id: &str,
        monster_type: &str,
    ) -> Result<Resolution<MonsterInstance>, ResolutionError> {
        let rule = self
            .content
            .rules()
            .monster(monster_type)
            .ok_or_else(|| ResolutionError::not_found("Monster type", monster_type))?;

        let (monster, message) =
            self.registry
                .spawn_monster_with(game_id, monster_type, rule, |game, monster| {
                    let message = format!(
                        "{} appears! ({} HP, AC {})",
                        rule.name.as_deref().unwrap_or(monster_type),
                        monster.hit_points,
                        monster.armor_class
                    );
                    log_line(game, message.clone());
                    message
                });

        Ok(Resolution::new(message, monster))
    }

    /// Run one turn for a monster: attack a random conscious player.
    ///
    /// Never creates the game.
    pub fn take_turn(&self, game_id: &str, monster_id: &str) -> MonsterTurn {
        let turn = self.registry.update_existing(game_id, |game| {
            if game.monster(monster_id).is_none() {
                return MonsterTurn::MonsterGone;
            }

            let targets: Vec<String> = game
                .eligible_targets()
                .into_iter()
                .map(|p| p.id.clone())
                .collect();
            if targets.is_empty() {
                return MonsterTurn::NoTargets;
            }

            let last = i32::try_from(targets.len() - 1).unwrap_or(i32::MAX);
            let index = usize::try_from(self.random.gen_range(0, last)).unwrap_or(0);
            let target_id = targets[index.min(targets.len() - 1)].clone();

            match monster_attack(
                game,
                self.content.rules(),
                self.random.as_ref(),
                monster_id,
                &target_id,
            ) {
                Ok(resolution) => MonsterTurn::Attacked {
                    target_id,
                    resolution,
                },
                Err(e) => {
                    // Both ids were checked above under the same guard.
                    tracing::warn!(
                        game_id = %game.id,
                        monster_id = %monster_id,
                        error = %e,
                        "Monster attack rejected"
                    );
                    MonsterTurn::MonsterGone
                }
            }
        });

        turn.unwrap_or(MonsterTurn::MonsterGone)
    }
}
