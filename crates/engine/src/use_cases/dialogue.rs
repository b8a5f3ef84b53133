//! Dialogue traversal.
//!
//! The engine keeps no per-conversation state: the caller says which node it
//! is showing and which option was picked, and gets back the next node or the
//! end of the conversation.

use std::sync::Arc;

use serde::Serialize;

use tavern_domain::{Conversation, DialogueNode, DialogueReward, Game};

use super::experience::add_experience;
use super::ResolutionError;
use crate::infrastructure::content::ContentStore;
use crate::stores::{log_line, GameRegistry};

/// Where a conversation stands after a start or a choice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum DialogueStep {
    #[serde(rename_all = "camelCase")]
    Node {
        node_id: String,
        text: String,
        options: Vec<String>,
    },
    Ended,
}

impl DialogueStep {
    fn node(node_id: &str, node: &DialogueNode) -> Self {
        Self::Node {
            node_id: node_id.to_string(),
            text: node.text.clone(),
            options: node.option_texts(),
        }
    }
}

pub struct Dialogues {
    registry: Arc<GameRegistry>,
    content: Arc<ContentStore>,
}

impl Dialogues {
    pub fn new(registry: Arc<GameRegistry>, content: Arc<ContentStore>) -> Self {
        Self { registry, content }
    }

    fn conversation(
        &self,
        dialogue_id: &str,
        conversation_id: &str,
    ) -> Result<&Conversation, ResolutionError> {
        self.content
            .dialogue(dialogue_id)
            .ok_or_else(|| ResolutionError::not_found("Dialogue", dialogue_id))?
            .conversation(conversation_id)
            .ok_or_else(|| ResolutionError::not_found("Conversation", conversation_id))
    }

    /// Open a conversation at its start node.
    pub fn start(
        &self,
        dialogue_id: &str,
        conversation_id: &str,
    ) -> Result<DialogueStep, ResolutionError> {
        let conversation = self.conversation(dialogue_id, conversation_id)?;
        let node = conversation
            .node(&conversation.start)
            .ok_or_else(|| ResolutionError::not_found("Dialogue node", &conversation.start))?;
        Ok(DialogueStep::node(&conversation.start, node))
    }

    /// Pick an option of `node_id`, apply its reward and move on.
    ///
    /// A missing or dangling `next` ends the conversation.
    pub fn choose(
        &self,
        game_id: &str,
        player_id: &str,
        dialogue_id: &str,
        conversation_id: &str,
        node_id: &str,
        option_index: usize,
    ) -> Result<DialogueStep, ResolutionError> {
        let conversation = self.conversation(dialogue_id, conversation_id)?;
        let node = conversation
            .node(node_id)
            .ok_or_else(|| ResolutionError::not_found("Dialogue node", node_id))?;
        let option = node.options.get(option_index).ok_or_else(|| {
            ResolutionError::invalid_state(format!(
                "Option index {} out of range for node {} ({} options)",
                option_index,
                node_id,
                node.options.len()
            ))
        })?;

        if let Some(reward) = option.reward.as_ref().filter(|r| !r.is_empty()) {
            self.registry
                .update(game_id, |game| apply_reward(game, player_id, reward))?;
        } else {
            // Still reject unknown players even when there is nothing to give.
            self.registry
                .update(game_id, |game| game.require_player(player_id).map(|_| ()))?;
        }

        let next = option
            .next
            .as_deref()
            .and_then(|next_id| conversation.node(next_id).map(|node| (next_id, node)));

        Ok(match next {
            Some((next_id, node)) => DialogueStep::node(next_id, node),
            None => {
                tracing::debug!(
                    game_id = %game_id,
                    dialogue_id = %dialogue_id,
                    conversation_id = %conversation_id,
                    "Conversation ended"
                );
                DialogueStep::Ended
            }
        })
    }
}

/// Grant a dialogue reward: experience first, then each item on its own line.
fn apply_reward(
    game: &mut Game,
    player_id: &str,
    reward: &DialogueReward,
) -> Result<(), ResolutionError> {
    let player_name = game.require_player(player_id)?.name.clone();
    // Validate before granting anything.
    game.character_mut(player_id)?;

    if let Some(xp) = reward.xp.filter(|xp| *xp > 0) {
        add_experience(game, player_id, xp)?;
    }
    for item_id in &reward.items {
        game.add_item_to_player(player_id, item_id)?;
        log_line(game, format!("{} receives {}", player_name, item_id));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::clock::{FixedClock, SystemRandom};
    use chrono::Utc;
    use tavern_domain::{CharacterUpdate, DialogueFile, RuleTables};

    fn dialogue() -> DialogueFile {
        serde_json::from_value(serde_json::json!({
            "id": "innkeeper",
            "campaignId": "keep",
            "dialogues": [{
                "id": "greeting",
                "name": "Greeting",
                "start": "A",
                "nodes": {
                    "A": {
                        "text": "Welcome, traveller!",
                        "options": [
                            {"text": "Any work?", "next": "B"},
                            {"text": "Goodbye."},
                            {"text": "Follow me.", "next": "Z"}
                        ]
                    },
                    "B": {
                        "text": "Rats in the cellar.",
                        "options": [
                            {"text": "I'll do it.", "reward": {"xp": 1200, "items": ["key", "torch"]}}
                        ]
                    }
                }
            }]
        }))
        .unwrap()
    }

    fn setup() -> (Arc<GameRegistry>, Dialogues) {
        let registry = Arc::new(GameRegistry::new(
            Arc::new(FixedClock(Utc::now())),
            Arc::new(SystemRandom::new()),
        ));
        let content = Arc::new(ContentStore::new(RuleTables::default()).with_dialogue(dialogue()));
        registry.add_player("g1", "p1", "Rowan");
        (registry.clone(), Dialogues::new(registry, content))
    }

    #[test]
    fn start_returns_start_node_verbatim() {
        let (_, dialogues) = setup();

        let step = dialogues.start("innkeeper", "greeting").unwrap();

        assert_eq!(
            step,
            DialogueStep::Node {
                node_id: "A".into(),
                text: "Welcome, traveller!".into(),
                options: vec!["Any work?".into(), "Goodbye.".into(), "Follow me.".into()],
            }
        );
    }

    #[test]
    fn start_fails_for_unknown_file_or_conversation() {
        let (_, dialogues) = setup();
        assert!(dialogues.start("blacksmith", "greeting").unwrap_err().is_not_found());
        assert!(dialogues.start("innkeeper", "farewell").unwrap_err().is_not_found());
    }

    #[test]
    fn choosing_an_option_follows_next() {
        let (_, dialogues) = setup();

        let step = dialogues
            .choose("g1", "p1", "innkeeper", "greeting", "A", 0)
            .unwrap();

        assert!(matches!(step, DialogueStep::Node { ref text, .. } if text == "Rats in the cellar."));
    }

    #[test]
    fn missing_or_dangling_next_ends_conversation() {
        let (_, dialogues) = setup();

        assert_eq!(
            dialogues.choose("g1", "p1", "innkeeper", "greeting", "A", 1),
            Ok(DialogueStep::Ended)
        );
        assert_eq!(
            dialogues.choose("g1", "p1", "innkeeper", "greeting", "A", 2),
            Ok(DialogueStep::Ended)
        );
    }

    #[test]
    fn out_of_range_option_is_invalid() {
        let (_, dialogues) = setup();

        let err = dialogues
            .choose("g1", "p1", "innkeeper", "greeting", "A", 3)
            .unwrap_err();
        assert!(matches!(err, ResolutionError::InvalidState(_)));

        let err = dialogues
            .choose("g1", "p1", "innkeeper", "greeting", "Q", 0)
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn reward_grants_experience_and_items() {
        let (registry, dialogues) = setup();
        registry
            .set_character("g1", "p1", CharacterUpdate::default())
            .unwrap();

        let step = dialogues
            .choose("g1", "p1", "innkeeper", "greeting", "B", 0)
            .unwrap();

        assert_eq!(step, DialogueStep::Ended);
        let character = registry.export_character("g1", "p1").unwrap();
        assert_eq!(character.level, 2);
        assert_eq!(character.experience, 200);
        assert_eq!(character.inventory, vec!["key", "torch"]);
        assert_eq!(
            registry.get_game("g1").unwrap().log,
            vec![
                "Rowan gains 1200 experience",
                "Rowan reached level 2!",
                "Rowan receives key",
                "Rowan receives torch",
            ]
        );
    }

    #[test]
    fn reward_without_character_changes_nothing() {
        let (registry, dialogues) = setup();

        let err = dialogues
            .choose("g1", "p1", "innkeeper", "greeting", "B", 0)
            .unwrap_err();

        assert!(matches!(err, ResolutionError::InvalidState(_)));
        assert!(registry.get_game("g1").unwrap().log.is_empty());
    }
}
