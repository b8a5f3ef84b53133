//! WebSocket message types for Engine-client communication
//!
//! ## Versioning Policy
//!
//! - New variants can be added at the end (forward compatible)
//! - Renaming variants is a breaking change
//! - Unknown enum variants deserialize to `Unknown` for forward compatibility

use serde::{Deserialize, Serialize};
use tavern_domain::{AbilityScores, CampaignSummary, Character, Game, Player};

use crate::responses::ErrorCode;

// =============================================================================
// Client Messages (client → Engine)
// =============================================================================

/// Messages from a client to the Engine
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ClientMessage {
    /// Join (creating if needed) a game under this connection's player id
    JoinGame { game_id: String, name: String },
    /// Attach a campaign to the joined game
    SelectCampaign { campaign_id: String },
    /// Create the connection's character
    CreateCharacter {
        name: String,
        #[serde(default)]
        race: String,
        class: String,
        #[serde(default)]
        abilities: Option<AbilityScores>,
        #[serde(default)]
        armor_class: Option<i32>,
    },
    /// A game action: `{"type": "roll" | "attack" | "castSpell", ...}`
    ///
    /// Kept as raw JSON so unknown action kinds can be logged instead of
    /// rejected.
    Action { action: serde_json::Value },
    /// Spawn a monster of a rule-table type into the joined game
    SpawnMonster { monster_type: String },
    /// Give an item to a player (the sender when `player_id` is absent)
    GiveItem {
        item_id: String,
        #[serde(default)]
        player_id: Option<String>,
    },
    /// Use (consume) an item from the sender's inventory
    UseItem { item_id: String },
    /// Open a conversation at its start node
    StartDialogue {
        dialogue_id: String,
        conversation_id: String,
    },
    /// Pick an option of the node the client is currently showing
    ChooseDialogueOption {
        dialogue_id: String,
        conversation_id: String,
        node_id: String,
        option_index: usize,
    },
    /// Request a detached copy of the sender's character
    ExportCharacter,
    /// Heartbeat ping
    Heartbeat,

    /// Unknown message type for forward compatibility
    #[serde(other)]
    Unknown,
}

// =============================================================================
// Server Messages (Engine → client)
// =============================================================================

/// Messages from the Engine to a client
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ServerMessage {
    /// Sent to the joining connection only
    Joined {
        game_id: String,
        player: Player,
    },
    /// Full snapshot of a game, broadcast after every change
    GameState { state: Game },
    /// Outcome of a dispatched action
    ActionResult {
        message: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        result: Option<serde_json::Value>,
    },
    CampaignSelected { campaign: CampaignSummary },
    /// A dialogue node to display
    DialogueNode {
        dialogue_id: String,
        conversation_id: String,
        node_id: String,
        text: String,
        options: Vec<String>,
    },
    /// The chosen option ended the conversation
    DialogueEnded {
        dialogue_id: String,
        conversation_id: String,
    },
    CharacterExport { character: Option<Character> },
    /// Error, sent only to the connection that caused it
    Error { code: ErrorCode, message: String },
    /// Heartbeat response
    Pong,

    /// Unknown message type for forward compatibility
    #[serde(other)]
    Unknown,
}
