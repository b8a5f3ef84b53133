use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Die rolled for starting hit points when a class does not name one.
pub const DEFAULT_HIT_DIE: u32 = 8;

/// Rules for a character class.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ClassRule {
    pub name: Option<String>,
    pub hit_die: Option<u32>,
    pub saving_throws: BTreeMap<String, i32>,
    pub spell_slots: Option<serde_json::Value>,
    pub abilities: Option<serde_json::Value>,
}

impl ClassRule {
    pub fn hit_die(&self) -> u32 {
        self.hit_die.filter(|d| *d >= 2).unwrap_or(DEFAULT_HIT_DIE)
    }
}

/// Saving throws given to a character whose class rule has none.
pub fn placeholder_saving_throws() -> BTreeMap<String, i32> {
    [
        ("death", 12),
        ("wands", 13),
        ("paralysis", 14),
        ("breath", 15),
        ("spells", 16),
    ]
    .into_iter()
    .map(|(name, value)| (name.to_string(), value))
    .collect()
}
