use serde::{Deserialize, Serialize};

/// Damage notation used when a monster has no readable attack.
pub const DEFAULT_MONSTER_DAMAGE: &str = "1d6";

/// Hit points granted per hit die when a rule has no explicit value.
pub const HIT_POINTS_PER_HIT_DIE: i32 = 4;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MonsterAttackRule {
    pub name: Option<String>,
    pub damage: Option<String>,
}

/// Rules for a monster type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MonsterRule {
    pub name: Option<String>,
    pub armor_class: Option<i32>,
    pub hit_dice: Option<u32>,
    pub hit_points: Option<i32>,
    pub attacks: Vec<MonsterAttackRule>,
}

impl MonsterRule {
    /// Explicit hit points, or `hitDice × 4`, or 4 when neither is given.
    pub fn starting_hit_points(&self) -> i32 {
        self.hit_points.unwrap_or_else(|| {
            let dice = self.hit_dice.unwrap_or(1) as i32;
            dice * HIT_POINTS_PER_HIT_DIE
        })
    }

    pub fn armor_class(&self) -> i32 {
        self.armor_class.unwrap_or(10)
    }

    /// Damage notation of the first attack, "1d6" if missing.
    pub fn first_attack_damage(&self) -> &str {
        self.attacks
            .first()
            .and_then(|a| a.damage.as_deref())
            .unwrap_or(DEFAULT_MONSTER_DAMAGE)
    }
}
