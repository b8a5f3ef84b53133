//! Rule tables - static, read-only reference data.
//!
//! Loaded once at start-up and shared by every game. Each table is keyed by
//! a string identifier; an absent rule file yields an empty table.

mod class;
mod item;
mod monster;
mod ordered;
mod spell;

use std::collections::BTreeMap;

pub use class::{placeholder_saving_throws, ClassRule, DEFAULT_HIT_DIE};
pub use item::{ItemEffect, ItemEffectKind, ItemRule};
pub use monster::{MonsterAttackRule, MonsterRule, DEFAULT_MONSTER_DAMAGE, HIT_POINTS_PER_HIT_DIE};
pub use ordered::OrderedMap;
pub use spell::{SpellEffect, SpellEffectKind, SpellGroup, SpellMatch, SpellRule, SpellTable};

/// The four rule tables.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RuleTables {
    pub classes: BTreeMap<String, ClassRule>,
    pub spells: SpellTable,
    pub monsters: BTreeMap<String, MonsterRule>,
    pub items: BTreeMap<String, ItemRule>,
}

impl RuleTables {
    pub fn class(&self, class_id: &str) -> Option<&ClassRule> {
        self.classes.get(class_id)
    }

    pub fn monster(&self, monster_type: &str) -> Option<&MonsterRule> {
        self.monsters.get(monster_type)
    }

    pub fn item(&self, item_id: &str) -> Option<&ItemRule> {
        self.items.get(item_id)
    }

    pub fn find_spell(&self, name: &str) -> Option<SpellMatch<'_>> {
        self.spells.find(name)
    }
}
