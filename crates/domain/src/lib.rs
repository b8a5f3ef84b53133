//! Tavern Domain
//!
//! Pure game state for the Tavern tabletop engine:
//!
//! - `entities` - games, players, characters, monster instances, dialogue trees
//! - `rules` - read-only rule tables (classes, spells, monsters, items)
//! - `value_objects` - dice notation
//! - `error` - the domain error type
//!
//! Nothing here performs I/O or owns a random source.

pub mod entities;
pub mod error;
pub mod rules;
pub mod value_objects;

pub use entities::{
    AbilityScores, CampaignSummary, Character, CharacterUpdate, Conversation, DialogueFile,
    DialogueNode, DialogueOption, DialogueReward, Game, MonsterInstance, MonsterStatus, Player,
    STATUS_OK, STATUS_UNCONSCIOUS, XP_PER_LEVEL,
};
pub use error::DomainError;
pub use rules::{
    ClassRule, ItemEffect, ItemEffectKind, ItemRule, MonsterAttackRule, MonsterRule, RuleTables,
    SpellEffect, SpellEffectKind, SpellGroup, SpellMatch, SpellRule, SpellTable,
};
pub use value_objects::{roll_notation, DiceFormula, DiceParseError, DiceRollResult};
