//! Monster instance - a spawned occurrence of a monster rule.

use serde::{Deserialize, Serialize};

/// Life status of a monster instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MonsterStatus {
    Alive,
    Dead,
}

impl std::fmt::Display for MonsterStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Alive => write!(f, "alive"),
            Self::Dead => write!(f, "dead"),
        }
    }
}

/// A monster present in one game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonsterInstance {
    /// Unique for the lifetime of the process.
    pub id: String,
    /// Key into the monster rule table.
    #[serde(rename = "type")]
    pub monster_type: String,
    pub hit_points: i32,
    pub armor_class: i32,
    pub status: MonsterStatus,
}

impl MonsterInstance {
    pub fn new(
        id: impl Into<String>,
        monster_type: impl Into<String>,
        hit_points: i32,
        armor_class: i32,
    ) -> Self {
        Self {
            id: id.into(),
            monster_type: monster_type.into(),
            hit_points,
            armor_class,
            status: MonsterStatus::Alive,
        }
    }

    /// Reduce hit points; returns true when the monster died from this damage.
    pub fn take_damage(&mut self, damage: i32) -> bool {
        self.hit_points -= damage;
        if self.hit_points <= 0 {
            self.status = MonsterStatus::Dead;
            true
        } else {
            false
        }
    }
}
