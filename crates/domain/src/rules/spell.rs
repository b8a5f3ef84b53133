//! Spell rules, grouped by caster class and spell level.

use serde::{Deserialize, Deserializer, Serialize};

use super::ordered::OrderedMap;

/// Effect block of a spell rule. Unrecognised keys are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SpellEffect {
    pub heal: Option<String>,
    pub damage: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpellEffectKind<'a> {
    Heal(&'a str),
    Damage(&'a str),
    Inert,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpellRule {
    pub name: String,
    #[serde(default)]
    pub effect: Option<SpellEffect>,
}

impl SpellRule {
    /// Heal takes precedence when a rule names both.
    pub fn effect_kind(&self) -> SpellEffectKind<'_> {
        match &self.effect {
            Some(SpellEffect {
                heal: Some(notation),
                ..
            }) => SpellEffectKind::Heal(notation),
            Some(SpellEffect {
                damage: Some(notation),
                ..
            }) => SpellEffectKind::Damage(notation),
            _ => SpellEffectKind::Inert,
        }
    }
}

/// Spells of one caster class at one level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpellGroup {
    pub caster_class: String,
    pub level: String,
    pub spells: Vec<SpellRule>,
}

/// A spell found by name, with where it was defined.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpellMatch<'a> {
    pub caster_class: &'a str,
    pub level: &'a str,
    pub spell: &'a SpellRule,
}

/// All spells, in the order they were defined.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpellTable {
    groups: Vec<SpellGroup>,
}

impl SpellTable {
    pub fn new(groups: Vec<SpellGroup>) -> Self {
        Self { groups }
    }

    pub fn groups(&self) -> &[SpellGroup] {
        &self.groups
    }

    pub fn is_empty(&self) -> bool {
        self.groups.iter().all(|g| g.spells.is_empty())
    }

    /// Case-insensitive lookup by name.
    ///
    /// Classes, then levels, then spells are searched in definition order and
    /// the first match is returned. Duplicate names across classes are not
    /// disambiguated any further.
    pub fn find(&self, name: &str) -> Option<SpellMatch<'_>> {
        let wanted = name.trim().to_lowercase();
        self.groups.iter().find_map(|group| {
            group
                .spells
                .iter()
                .find(|spell| spell.name.to_lowercase() == wanted)
                .map(|spell| SpellMatch {
                    caster_class: &group.caster_class,
                    level: &group.level,
                    spell,
                })
        })
    }
}

impl<'de> Deserialize<'de> for SpellTable {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let classes = OrderedMap::<OrderedMap<Vec<SpellRule>>>::deserialize(deserializer)?;
        let groups = classes
            .0
            .into_iter()
            .flat_map(|(caster_class, levels)| {
                levels.0.into_iter().map(move |(level, spells)| SpellGroup {
                    caster_class: caster_class.clone(),
                    level,
                    spells,
                })
            })
            .collect();
        Ok(Self { groups })
    }
}
