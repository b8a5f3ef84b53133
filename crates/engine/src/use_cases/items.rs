//! Item handling: giving items to players and using them up.

use std::sync::Arc;

use serde::Serialize;

use tavern_domain::{roll_notation, Game, ItemEffectKind, RuleTables};

use super::{Resolution, ResolutionError};
use crate::infrastructure::content::ContentStore;
use crate::infrastructure::ports::RandomPort;
use crate::stores::{log_line, GameRegistry};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GiveItemOutcome {
    pub player_id: String,
    pub item_id: String,
    pub inventory: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ItemEffectApplied {
    Heal,
    AcBonus,
    None,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UseItemOutcome {
    pub player_id: String,
    pub item_id: String,
    pub effect: ItemEffectApplied,
    /// Hit points healed or armour class gained.
    pub amount: i32,
    pub hit_points: i32,
    pub armor_class: i32,
    pub inventory: Vec<String>,
}

/// Add an item from the item rules to a player's inventory.
pub fn give_item(
    game: &mut Game,
    rules: &RuleTables,
    player_id: &str,
    item_id: &str,
) -> Result<Resolution<GiveItemOutcome>, ResolutionError> {
    let rule = rules
        .item(item_id)
        .ok_or_else(|| ResolutionError::not_found("Item", item_id))?;
    let player_name = game.require_player(player_id)?.name.clone();

    let character = game.character_mut(player_id)?;
    character.add_item(item_id);
    let inventory = character.inventory.clone();

    let message = format!("{} receives {}", player_name, rule.display_name(item_id));
    log_line(game, message.clone());

    Ok(Resolution::new(
        message,
        GiveItemOutcome {
            player_id: player_id.to_string(),
            item_id: item_id.to_string(),
            inventory,
        },
    ))
}

/// Consume one item from a player's inventory and apply its effect.
///
/// Healing is uncapped and armour bonuses stack; an item without a known
/// effect is still consumed.
pub fn use_item(
    game: &mut Game,
    rules: &RuleTables,
    random: &dyn RandomPort,
    player_id: &str,
    item_id: &str,
) -> Result<Resolution<UseItemOutcome>, ResolutionError> {
    let rule = rules
        .item(item_id)
        .ok_or_else(|| ResolutionError::not_found("Item", item_id))?;
    let player_name = game.require_player(player_id)?.name.clone();
    let item_name = rule.display_name(item_id);

    let character = game.character_mut(player_id)?;
    if !character.remove_item(item_id) {
        return Err(ResolutionError::not_found("Inventory item", item_id));
    }

    let (effect, amount, message) = match rule.effect_kind() {
        ItemEffectKind::Heal(notation) => {
            let healed = roll_notation(notation, |min, max| random.gen_range(min, max));
            character.heal(healed);
            (
                ItemEffectApplied::Heal,
                healed,
                format!("{} uses {} and recovers {} HP", player_name, item_name, healed),
            )
        }
        ItemEffectKind::ArmorBonus(bonus) => {
            character.armor_class += bonus;
            (
                ItemEffectApplied::AcBonus,
                bonus,
                format!(
                    "{} uses {} and gains {} AC (now {})",
                    player_name, item_name, bonus, character.armor_class
                ),
            )
        }
        ItemEffectKind::Inert => (
            ItemEffectApplied::None,
            0,
            format!("{} uses {}, but nothing happens", player_name, item_name),
        ),
    };

    let outcome = UseItemOutcome {
        player_id: player_id.to_string(),
        item_id: item_id.to_string(),
        effect,
        amount,
        hit_points: character.hit_points,
        armor_class: character.armor_class,
        inventory: character.inventory.clone(),
    };
    let remaining = character.item_count(item_id);
    log_line(game, message.clone());
    tracing::debug!(
        game_id = %game.id,
        player_id = %player_id,
        item_id = %item_id,
        remaining,
        "Item used"
    );

    Ok(Resolution::new(message, outcome))
}

pub struct Items {
    registry: Arc<GameRegistry>,
    content: Arc<ContentStore>,
    random: Arc<dyn RandomPort>,
}

impl Items {
    pub fn new(
        registry: Arc<GameRegistry>,
        content: Arc<ContentStore>,
        random: Arc<dyn RandomPort>,
    ) -> Self {
        Self {
            registry,
            content,
            random,
        }
    }

    pub fn give(
        &self,
        game_id: &str,
        player_id: &str,
        item_id: &str,
    ) -> Result<Resolution<GiveItemOutcome>, ResolutionError> {
        let result = self.registry.update(game_id, |game| {
            give_item(game, self.content.rules(), player_id, item_id)
        });
        if result.is_ok() {
            tracing::info!(
                game_id = %game_id,
                player_id = %player_id,
                item_id = %item_id,
                "Item given to player"
            );
        }
        result
    }

    pub fn use_item(
        &self,
        game_id: &str,
        player_id: &str,
        item_id: &str,
    ) -> Result<Resolution<UseItemOutcome>, ResolutionError> {
        self.registry.update(game_id, |game| {
            use_item(
                game,
                self.content.rules(),
                self.random.as_ref(),
                player_id,
                item_id,
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::clock::{FixedRandom, ScriptedRandom};
    use tavern_domain::{Character, ItemRule};

    fn rules() -> RuleTables {
        let mut rules = RuleTables::default();
        for (id, json) in [
            ("potion", serde_json::json!({"name": "Potion of Healing", "effect": {"heal": "1d8"}})),
            ("shield", serde_json::json!({"name": "Shield", "effect": {"acBonus": 1}})),
            ("strength", serde_json::json!({"name": "Potion of Strength", "effect": {"strength": 2}})),
            ("rope", serde_json::json!({})),
        ] {
            let rule: ItemRule = serde_json::from_value(json).unwrap();
            rules.items.insert(id.to_string(), rule);
        }
        rules
    }

    fn game() -> Game {
        let mut game = Game::new("g1");
        game.add_player("p1", "Rowan");
        game.player_mut("p1").unwrap().character = Some(Character {
            name: "Rowan".into(),
            hit_points: 6,
            armor_class: 12,
            ..Character::default()
        });
        game.add_player("p2", "Brin");
        game
    }

    #[test]
    fn give_appends_in_order_with_duplicates() {
        let mut game = game();
        let rules = rules();
        give_item(&mut game, &rules, "p1", "potion").unwrap();
        give_item(&mut game, &rules, "p1", "rope").unwrap();
        let resolved = give_item(&mut game, &rules, "p1", "potion").unwrap();

        assert_eq!(resolved.result.inventory, vec!["potion", "rope", "potion"]);
        assert_eq!(resolved.message, "Rowan receives Potion of Healing");
        assert_eq!(game.log.len(), 3);
    }

    #[test]
    fn give_rejects_unknown_item_and_missing_character() {
        let mut game = game();
        let rules = rules();

        let err = give_item(&mut game, &rules, "p1", "vorpal-sword").unwrap_err();
        assert_eq!(err, ResolutionError::not_found("Item", "vorpal-sword"));

        let err = give_item(&mut game, &rules, "p2", "potion").unwrap_err();
        assert!(matches!(err, ResolutionError::InvalidState(_)));
        assert!(game.log.is_empty());
    }

    #[test]
    fn healing_item_is_uncapped_and_consumed_once() {
        let mut game = game();
        let rules = rules();
        give_item(&mut game, &rules, "p1", "potion").unwrap();
        give_item(&mut game, &rules, "p1", "potion").unwrap();

        let resolved =
            use_item(&mut game, &rules, &ScriptedRandom::new([8]), "p1", "potion").unwrap();

        assert_eq!(resolved.result.effect, ItemEffectApplied::Heal);
        assert_eq!(resolved.result.hit_points, 14);
        assert_eq!(resolved.result.inventory, vec!["potion"]);
        let character = game.export_character("p1").unwrap();
        assert_eq!(character.item_count("potion"), 1);
    }

    #[test]
    fn armor_bonus_stacks_across_uses() {
        let mut game = game();
        let rules = rules();
        give_item(&mut game, &rules, "p1", "shield").unwrap();
        give_item(&mut game, &rules, "p1", "shield").unwrap();

        use_item(&mut game, &rules, &FixedRandom(1), "p1", "shield").unwrap();
        let resolved = use_item(&mut game, &rules, &FixedRandom(1), "p1", "shield").unwrap();

        assert_eq!(resolved.result.armor_class, 14);
        assert!(resolved.result.inventory.is_empty());
    }

    #[test]
    fn unimplemented_effect_is_inert_but_consumed() {
        let mut game = game();
        let rules = rules();
        give_item(&mut game, &rules, "p1", "strength").unwrap();

        let resolved = use_item(&mut game, &rules, &FixedRandom(1), "p1", "strength").unwrap();

        assert_eq!(resolved.result.effect, ItemEffectApplied::None);
        assert_eq!(resolved.result.hit_points, 6);
        assert_eq!(resolved.result.armor_class, 12);
        assert!(resolved.result.inventory.is_empty());
        assert!(resolved.message.ends_with("but nothing happens"));
    }

    #[test]
    fn using_an_item_not_carried_fails() {
        let mut game = game();
        let rules = rules();

        let err = use_item(&mut game, &rules, &FixedRandom(1), "p1", "potion").unwrap_err();
        assert_eq!(err, ResolutionError::not_found("Inventory item", "potion"));

        let err = use_item(&mut game, &rules, &FixedRandom(1), "p1", "elixir").unwrap_err();
        assert_eq!(err, ResolutionError::not_found("Item", "elixir"));
        assert!(game.log.is_empty());
    }
}
