//! Player entity - one participant of a game.

use serde::{Deserialize, Serialize};

use super::Character;

/// A participant of a game.
///
/// The identifier is the session/connection identifier of whoever joined.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    pub id: String,
    pub name: String,
    pub character: Option<Character>,
}

impl Player {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            character: None,
        }
    }

    /// Armour class used when this player is the target of a to-hit roll.
    pub fn armor_class(&self) -> i32 {
        self.character.as_ref().map_or(10, |c| c.armor_class)
    }

    /// A player without a character counts as conscious.
    pub fn is_eligible_target(&self) -> bool {
        self.character.as_ref().map_or(true, |c| c.is_conscious())
    }
}
