//! Entities - the live game state owned by the game registry.

mod campaign;
mod character;
mod dialogue;
mod game;
mod monster;
mod player;

pub use campaign::CampaignSummary;
pub use character::{
    AbilityScores, Character, CharacterUpdate, STATUS_OK, STATUS_UNCONSCIOUS, XP_PER_LEVEL,
};
pub use dialogue::{Conversation, DialogueFile, DialogueNode, DialogueOption, DialogueReward};
pub use game::Game;
pub use monster::{MonsterInstance, MonsterStatus};
pub use player::Player;
