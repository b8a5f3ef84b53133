//! Dialogue trees.
//!
//! A dialogue file holds one or more conversations. Each conversation is a
//! graph of nodes keyed by id; options point at the next node or end the
//! conversation.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DialogueFile {
    pub id: String,
    #[serde(default)]
    pub campaign_id: Option<String>,
    #[serde(default)]
    pub dialogues: Vec<Conversation>,
}

impl DialogueFile {
    pub fn conversation(&self, conversation_id: &str) -> Option<&Conversation> {
        self.dialogues.iter().find(|c| c.id == conversation_id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Conversation {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    /// Id of the node the conversation opens with.
    pub start: String,
    #[serde(default)]
    pub nodes: BTreeMap<String, DialogueNode>,
}

impl Conversation {
    pub fn node(&self, node_id: &str) -> Option<&DialogueNode> {
        self.nodes.get(node_id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DialogueNode {
    pub text: String,
    #[serde(default)]
    pub options: Vec<DialogueOption>,
}

impl DialogueNode {
    pub fn option_texts(&self) -> Vec<String> {
        self.options.iter().map(|o| o.text.clone()).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DialogueOption {
    pub text: String,
    /// Absent means the conversation ends here.
    #[serde(default)]
    pub next: Option<String>,
    #[serde(default)]
    pub reward: Option<DialogueReward>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DialogueReward {
    #[serde(default, alias = "experience")]
    pub xp: Option<u32>,
    #[serde(default)]
    pub items: Vec<String>,
}

impl DialogueReward {
    pub fn is_empty(&self) -> bool {
        self.xp.map_or(true, |xp| xp == 0) && self.items.is_empty()
    }
}
