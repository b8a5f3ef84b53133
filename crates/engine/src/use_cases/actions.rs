//! Player action dispatch.
//!
//! Actions arrive as loose JSON tagged by `type`. Recognised kinds are
//! parsed into [`PlayerAction`]; anything else is kept as
//! [`PlayerAction::Unknown`] and only logged.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use tavern_domain::Game;

use super::combat::{attack, attack_monster};
use super::spells::{cast_spell, TargetType};
use super::{Resolution, ResolutionError};
use crate::infrastructure::content::ContentStore;
use crate::infrastructure::ports::RandomPort;
use crate::stores::{log_line, GameRegistry};

const DEFAULT_ROLL_SIDES: i32 = 20;

fn default_sides() -> i32 {
    DEFAULT_ROLL_SIDES
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum PlayerAction {
    Roll {
        #[serde(default = "default_sides")]
        sides: i32,
    },
    #[serde(rename_all = "camelCase")]
    Attack {
        #[serde(default)]
        target_type: TargetType,
        target_id: String,
    },
    #[serde(rename_all = "camelCase")]
    CastSpell {
        #[serde(alias = "spell")]
        spell_name: String,
        #[serde(default)]
        target_type: TargetType,
        target_id: String,
    },
    #[serde(skip)]
    Unknown(Value),
}

impl PlayerAction {
    const KNOWN_KINDS: [&'static str; 3] = ["roll", "attack", "castSpell"];

    /// Parse an action payload.
    ///
    /// Fails only when a recognised kind is missing or has malformed fields.
    pub fn from_payload(payload: Value) -> Result<Self, ResolutionError> {
        let kind = match payload.get("type").and_then(Value::as_str) {
            Some(kind) if Self::KNOWN_KINDS.contains(&kind) => kind.to_string(),
            _ => return Ok(Self::Unknown(payload)),
        };
        serde_json::from_value(payload).map_err(|e| {
            ResolutionError::invalid_state(format!("Malformed {} action: {}", kind, e))
        })
    }
}

/// Reply to a dispatched action.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActionOutcome {
    pub message: String,
    pub result: Option<Value>,
}

impl<T: Serialize> From<Resolution<T>> for ActionOutcome {
    fn from(resolution: Resolution<T>) -> Self {
        Self {
            result: serde_json::to_value(&resolution.result).ok(),
            message: resolution.message,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RollOutcome {
    pub sides: i32,
    pub roll: i32,
}

/// A bare die roll, logged for everyone to see.
pub fn roll(
    game: &mut Game,
    random: &dyn RandomPort,
    player_id: &str,
    sides: i32,
) -> Result<Resolution<RollOutcome>, ResolutionError> {
    if sides < 1 {
        return Err(ResolutionError::invalid_state(format!(
            "A die needs at least one side, got {}",
            sides
        )));
    }
    let player_name = game.require_player(player_id)?.name.clone();
    let value = random.gen_range(1, sides);

    let message = format!("{} rolls a d{}: {}", player_name, sides, value);
    log_line(game, message.clone());

    Ok(Resolution::new(message, RollOutcome { sides, roll: value }))
}

/// Resolve one parsed action against a game.
pub fn dispatch(
    game: &mut Game,
    content: &ContentStore,
    random: &dyn RandomPort,
    player_id: &str,
    action: PlayerAction,
) -> Result<ActionOutcome, ResolutionError> {
    let outcome = match action {
        PlayerAction::Roll { sides } => roll(game, random, player_id, sides)?.into(),
        PlayerAction::Attack {
            target_type: TargetType::Player,
            target_id,
        } => attack(game, random, player_id, &target_id)?.into(),
        PlayerAction::Attack {
            target_type: TargetType::Monster,
            target_id,
        } => attack_monster(game, random, player_id, &target_id)?.into(),
        PlayerAction::CastSpell {
            spell_name,
            target_type,
            target_id,
        } => cast_spell(
            game,
            content.rules(),
            random,
            player_id,
            &spell_name,
            target_type,
            &target_id,
        )?
        .into(),
        PlayerAction::Unknown(payload) => {
            let kind = payload
                .get("type")
                .and_then(Value::as_str)
                .unwrap_or("untyped");
            let message = format!("Unknown action: {}", kind);
            log_line(game, message.clone());
            ActionOutcome {
                message,
                result: None,
            }
        }
    };
    Ok(outcome)
}

pub struct Actions {
    registry: Arc<GameRegistry>,
    content: Arc<ContentStore>,
    random: Arc<dyn RandomPort>,
}

impl Actions {
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

    pub fn handle(
        &self,
        game_id: &str,
        player_id: &str,
        payload: Value,
    ) -> Result<ActionOutcome, ResolutionError> {
        let action = PlayerAction::from_payload(payload)?;
        tracing::debug!(game_id = %game_id, player_id = %player_id, action = ?action, "Dispatching action");

        self.registry.update(game_id, |game| {
            dispatch(
                game,
                &self.content,
                self.random.as_ref(),
                player_id,
                action,
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::clock::{FixedClock, ScriptedRandom};
    use chrono::Utc;
    use serde_json::json;
    use tavern_domain::{CharacterUpdate, RuleTables, SpellGroup, SpellRule, SpellTable};

    #[test]
    fn parses_recognised_kinds() {
        assert_eq!(
            PlayerAction::from_payload(json!({"type": "roll"})).unwrap(),
            PlayerAction::Roll { sides: 20 }
        );
        assert_eq!(
            PlayerAction::from_payload(json!({"type": "attack", "targetId": "p2"})).unwrap(),
            PlayerAction::Attack {
                target_type: TargetType::Player,
                target_id: "p2".into()
            }
        );
        assert_eq!(
            PlayerAction::from_payload(json!({
                "type": "castSpell",
                "spell": "Magic Missile",
                "targetType": "monster",
                "targetId": "orc-1"
            }))
            .unwrap(),
            PlayerAction::CastSpell {
                spell_name: "Magic Missile".into(),
                target_type: TargetType::Monster,
                target_id: "orc-1".into()
            }
        );
    }

    #[test]
    fn unrecognised_or_untyped_payloads_are_unknown() {
        let dance = json!({"type": "dance", "style": "jig"});
        assert_eq!(
            PlayerAction::from_payload(dance.clone()).unwrap(),
            PlayerAction::Unknown(dance)
        );
        assert!(matches!(
            PlayerAction::from_payload(json!({"sides": 6})).unwrap(),
            PlayerAction::Unknown(_)
        ));
    }

    #[test]
    fn recognised_kind_with_missing_fields_is_malformed() {
        let err = PlayerAction::from_payload(json!({"type": "attack"})).unwrap_err();
        match err {
            ResolutionError::InvalidState(msg) => assert!(msg.starts_with("Malformed attack action")),
            other => panic!("Expected InvalidState, got {:?}", other),
        }
    }

    fn setup(rolls: Vec<i32>) -> (Arc<GameRegistry>, Actions) {
        let random: Arc<dyn RandomPort> = Arc::new(ScriptedRandom::new(rolls));
        let registry = Arc::new(GameRegistry::new(
            Arc::new(FixedClock(Utc::now())),
            random.clone(),
        ));
        let mut rules = RuleTables::default();
        rules.spells = SpellTable::new(vec![SpellGroup {
            caster_class: "cleric".into(),
            level: "1".into(),
            spells: vec![serde_json::from_value::<SpellRule>(
                json!({"name": "Cure Light Wounds", "effect": {"heal": "1d6+1"}}),
            )
            .unwrap()],
        }]);
        let content = Arc::new(ContentStore::new(rules));
        registry.add_player("g1", "p1", "Rowan");
        registry.add_player("g1", "p2", "Brin");
        (registry.clone(), Actions::new(registry, content, random))
    }

    #[test]
    fn roll_logs_the_result() {
        let (registry, actions) = setup(vec![5]);

        let outcome = actions
            .handle("g1", "p1", json!({"type": "roll", "sides": 6}))
            .unwrap();

        assert_eq!(outcome.message, "Rowan rolls a d6: 5");
        assert_eq!(outcome.result, Some(json!({"sides": 6, "roll": 5})));
        assert_eq!(registry.get_game("g1").unwrap().log, vec!["Rowan rolls a d6: 5"]);
    }

    #[test]
    fn roll_rejects_zero_sides() {
        let (_, actions) = setup(vec![]);
        let err = actions
            .handle("g1", "p1", json!({"type": "roll", "sides": 0}))
            .unwrap_err();
        assert!(matches!(err, ResolutionError::InvalidState(_)));
    }

    #[test]
    fn attack_routes_by_target_type() {
        let (registry, actions) = setup(vec![20, 4]);
        registry
            .set_character(
                "g1",
                "p2",
                CharacterUpdate {
                    hit_points: Some(10),
                    ..CharacterUpdate::default()
                },
            )
            .unwrap();

        let outcome = actions
            .handle("g1", "p1", json!({"type": "attack", "targetId": "p2"}))
            .unwrap();
        assert_eq!(outcome.result.unwrap()["targetHitPoints"], json!(6));

        let err = actions
            .handle(
                "g1",
                "p1",
                json!({"type": "attack", "targetType": "monster", "targetId": "ghost"}),
            )
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn cast_spell_accepts_legacy_field_name() {
        let (registry, actions) = setup(vec![3]);
        registry
            .set_character("g1", "p2", CharacterUpdate::default())
            .unwrap();

        let outcome = actions
            .handle(
                "g1",
                "p1",
                json!({"type": "castSpell", "spell": "cure light wounds", "targetId": "p2"}),
            )
            .unwrap();

        assert_eq!(outcome.message, "Rowan casts Cure Light Wounds on Brin, healing 4 HP");
    }

    #[test]
    fn unknown_action_is_logged_not_failed() {
        let (registry, actions) = setup(vec![]);

        let outcome = actions
            .handle("g1", "p1", json!({"type": "dance"}))
            .unwrap();

        assert_eq!(outcome.message, "Unknown action: dance");
        assert_eq!(outcome.result, None);
        assert_eq!(registry.get_game("g1").unwrap().log.last().unwrap(), "Unknown action: dance");
    }
}
