//! Character entity - the role-play statistics attached to a player.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Status tag of a character that can still act.
pub const STATUS_OK: &str = "ok";
/// Status tag set when hit points drop to zero or below.
pub const STATUS_UNCONSCIOUS: &str = "unconscious";

/// Experience needed per level: a level L character levels up at `L * 1000`.
pub const XP_PER_LEVEL: u32 = 1000;

/// The six ability scores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AbilityScores {
    pub strength: i32,
    pub dexterity: i32,
    pub constitution: i32,
    pub intelligence: i32,
    pub wisdom: i32,
    pub charisma: i32,
}

impl Default for AbilityScores {
    fn default() -> Self {
        Self {
            strength: 10,
            dexterity: 10,
            constitution: 10,
            intelligence: 10,
            wisdom: 10,
            charisma: 10,
        }
    }
}

/// Role-play statistics of a player.
///
/// Hit points may go to zero or below; at that point the status becomes
/// [`STATUS_UNCONSCIOUS`] and nothing in the engine clears it again.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Character {
    pub name: String,
    pub race: String,
    pub class: String,
    pub hit_points: i32,
    pub armor_class: i32,
    pub abilities: AbilityScores,
    pub saving_throws: BTreeMap<String, i32>,
    pub experience: u32,
    pub level: u32,
    /// Item identifiers, duplicates allowed, acquisition order.
    pub inventory: Vec<String>,
    pub status: String,
}

impl Default for Character {
    fn default() -> Self {
        Self {
            name: String::new(),
            race: String::new(),
            class: String::new(),
            hit_points: 0,
            armor_class: 10,
            abilities: AbilityScores::default(),
            saving_throws: BTreeMap::new(),
            experience: 0,
            level: 1,
            inventory: Vec::new(),
            status: STATUS_OK.to_string(),
        }
    }
}

impl Character {
    /// Reduce hit points by `damage`.
    ///
    /// Returns true when this damage left the character at zero or fewer
    /// hit points, in which case the status is now unconscious.
    pub fn take_damage(&mut self, damage: i32) -> bool {
        self.hit_points -= damage;
        if self.hit_points <= 0 {
            self.status = STATUS_UNCONSCIOUS.to_string();
            true
        } else {
            false
        }
    }

    /// Add hit points. No maximum applies and the status is left untouched.
    pub fn heal(&mut self, amount: i32) {
        self.hit_points += amount;
    }

    pub fn is_unconscious(&self) -> bool {
        self.status == STATUS_UNCONSCIOUS
    }

    /// Whether a monster may pick this character as a target.
    pub fn is_conscious(&self) -> bool {
        self.hit_points > 0 && !self.is_unconscious()
    }

    /// Add experience and level up as many times as the total allows.
    ///
    /// Each level-up consumes `level * 1000` experience. Returns every level
    /// reached, in order.
    pub fn add_experience(&mut self, xp: u32) -> Vec<u32> {
        self.experience = self.experience.saturating_add(xp);
        let mut reached = Vec::new();
        while self.experience >= self.level * XP_PER_LEVEL {
            self.experience -= self.level * XP_PER_LEVEL;
            self.level += 1;
            reached.push(self.level);
        }
        reached
    }

    pub fn add_item(&mut self, item_id: impl Into<String>) {
        self.inventory.push(item_id.into());
    }

    /// Remove the first occurrence of `item_id`. Returns false if absent.
    pub fn remove_item(&mut self, item_id: &str) -> bool {
        match self.inventory.iter().position(|id| id == item_id) {
            Some(index) => {
                self.inventory.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn item_count(&self, item_id: &str) -> usize {
        self.inventory.iter().filter(|id| *id == item_id).count()
    }

    /// Shallow-merge `update` onto an existing character (or a fresh default).
    ///
    /// Fields absent from the update keep their existing value.
    pub fn merged(existing: Option<Character>, update: CharacterUpdate) -> Character {
        let mut character = existing.unwrap_or_default();
        if let Some(name) = update.name {
            character.name = name;
        }
        if let Some(race) = update.race {
            character.race = race;
        }
        if let Some(class) = update.class {
            character.class = class;
        }
        if let Some(hit_points) = update.hit_points {
            character.hit_points = hit_points;
        }
        if let Some(armor_class) = update.armor_class {
            character.armor_class = armor_class;
        }
        if let Some(abilities) = update.abilities {
            character.abilities = abilities;
        }
        if let Some(saving_throws) = update.saving_throws {
            character.saving_throws = saving_throws;
        }
        if let Some(experience) = update.experience {
            character.experience = experience;
        }
        if let Some(level) = update.level {
            character.level = level.max(1);
        }
        if let Some(inventory) = update.inventory {
            character.inventory = inventory;
        }
        if let Some(status) = update.status {
            character.status = status;
        }
        character
    }
}

/// Partial character used by `set_character`; `None` means "keep".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CharacterUpdate {
    pub name: Option<String>,
    pub race: Option<String>,
    pub class: Option<String>,
    pub hit_points: Option<i32>,
    pub armor_class: Option<i32>,
    pub abilities: Option<AbilityScores>,
    pub saving_throws: Option<BTreeMap<String, i32>>,
    pub experience: Option<u32>,
    pub level: Option<u32>,
    pub inventory: Option<Vec<String>>,
    pub status: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fighter(hit_points: i32) -> Character {
        Character {
            name: "Rowan".into(),
            class: "fighter".into(),
            hit_points,
            ..Character::default()
        }
    }

    #[test]
    fn damage_to_zero_knocks_unconscious() {
        let mut character = fighter(4);
        assert!(!character.take_damage(3));
        assert_eq!(character.status, STATUS_OK);

        assert!(character.take_damage(1));
        assert_eq!(character.hit_points, 0);
        assert!(character.is_unconscious());
    }

    #[test]
    fn healing_does_not_clear_unconscious_status() {
        let mut character = fighter(2);
        character.take_damage(5);
        character.heal(10);

        assert_eq!(character.hit_points, 7);
        assert!(character.is_unconscious());
        assert!(!character.is_conscious());
    }

    #[test]
    fn experience_crosses_multiple_thresholds() {
        let mut character = fighter(8);
        let reached = character.add_experience(3500);

        // 1000 for level 1 -> 2, 2000 for level 2 -> 3, 500 left over
        assert_eq!(reached, vec![2, 3]);
        assert_eq!(character.level, 3);
        assert_eq!(character.experience, 500);
    }

    #[test]
    fn experience_stops_below_next_threshold() {
        let mut character = fighter(8);
        character.add_experience(2500);

        assert_eq!(character.level, 2);
        assert_eq!(character.experience, 1500);
        assert!(character.experience < character.level * XP_PER_LEVEL);
    }

    #[test]
    fn remove_item_only_takes_first_occurrence() {
        let mut character = fighter(8);
        character.add_item("potion");
        character.add_item("rope");
        character.add_item("potion");
        assert_eq!(character.item_count("potion"), 2);

        assert!(character.remove_item("potion"));
        assert_eq!(character.inventory, vec!["rope", "potion"]);
        assert_eq!(character.item_count("potion"), 1);
        assert!(!character.remove_item("torch"));
        assert_eq!(character.item_count("torch"), 0);
    }

    #[test]
    fn merge_preserves_fields_not_in_update() {
        let mut existing = fighter(9);
        existing.add_item("rope");
        existing.experience = 300;

        let merged = Character::merged(
            Some(existing),
            CharacterUpdate {
                race: Some("elf".into()),
                ..CharacterUpdate::default()
            },
        );

        assert_eq!(merged.race, "elf");
        assert_eq!(merged.name, "Rowan");
        assert_eq!(merged.hit_points, 9);
        assert_eq!(merged.experience, 300);
        assert_eq!(merged.inventory, vec!["rope"]);
    }

    #[test]
    fn merge_onto_nothing_defaults_level_and_experience() {
        let merged = Character::merged(
            None,
            CharacterUpdate {
                name: Some("Brin".into()),
                ..CharacterUpdate::default()
            },
        );
        assert_eq!(merged.level, 1);
        assert_eq!(merged.experience, 0);
        assert_eq!(merged.armor_class, 10);
        assert_eq!(merged.abilities, AbilityScores::default());
    }
}
