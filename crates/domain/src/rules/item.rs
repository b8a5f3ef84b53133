use serde::{Deserialize, Serialize};

/// Effect block of an item rule. Unrecognised keys are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ItemEffect {
    pub heal: Option<String>,
    pub ac_bonus: Option<i32>,
}

/// What using an item does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemEffectKind<'a> {
    /// Roll the notation and add it to hit points.
    Heal(&'a str),
    /// Add to armour class.
    ArmorBonus(i32),
    Inert,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ItemRule {
    pub name: Option<String>,
    pub description: Option<String>,
    pub effect: Option<ItemEffect>,
}

impl ItemRule {
    pub fn effect_kind(&self) -> ItemEffectKind<'_> {
        match &self.effect {
            Some(ItemEffect {
                heal: Some(notation),
                ..
            }) => ItemEffectKind::Heal(notation),
            Some(ItemEffect {
                ac_bonus: Some(bonus),
                ..
            }) => ItemEffectKind::ArmorBonus(*bonus),
            _ => ItemEffectKind::Inert,
        }
    }

    /// Display name, falling back to the identifier.
    pub fn display_name<'a>(&'a self, item_id: &'a str) -> &'a str {
        self.name.as_deref().unwrap_or(item_id)
    }
}
