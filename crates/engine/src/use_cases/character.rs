//! Character creation and export.

use std::sync::Arc;

use tavern_domain::{
    rules::placeholder_saving_throws, AbilityScores, Character, CharacterUpdate, Game,
    RuleTables, STATUS_OK,
};

use super::{Resolution, ResolutionError};
use crate::infrastructure::content::ContentStore;
use crate::infrastructure::ports::RandomPort;
use crate::stores::{log_line, GameRegistry};

/// Input for a new character.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewCharacter {
    pub name: String,
    pub race: String,
    pub class: String,
    pub abilities: Option<AbilityScores>,
    pub armor_class: Option<i32>,
}

/// Roll a fresh character and attach it to the player, replacing any old one.
///
/// Hit points are one roll of the class hit die (d8 for unknown classes).
/// Saving throws come from the class, or a placeholder table.
pub fn create_character(
    game: &mut Game,
    rules: &RuleTables,
    random: &dyn RandomPort,
    player_id: &str,
    new: NewCharacter,
) -> Result<Resolution<Character>, ResolutionError> {
    let player_name = game.require_player(player_id)?.name.clone();

    let class_rule = rules.class(&new.class);
    let hit_die = class_rule.map_or(tavern_domain::rules::DEFAULT_HIT_DIE, |c| c.hit_die());
    let hit_die = i32::try_from(hit_die).unwrap_or(i32::MAX);
    let hit_points = random.gen_range(1, hit_die).max(1);
    let saving_throws = class_rule
        .map(|c| c.saving_throws.clone())
        .filter(|throws| !throws.is_empty())
        .unwrap_or_else(placeholder_saving_throws);

    let update = CharacterUpdate {
        name: Some(new.name),
        race: Some(new.race),
        class: Some(new.class),
        hit_points: Some(hit_points),
        armor_class: Some(new.armor_class.unwrap_or(10)),
        abilities: Some(new.abilities.unwrap_or_default()),
        saving_throws: Some(saving_throws),
        experience: Some(0),
        level: Some(1),
        inventory: Some(Vec::new()),
        status: Some(STATUS_OK.to_string()),
    };
    let character = game.set_character(player_id, update)?.clone();

    let message = format!(
        "{} created {}, a {} {} ({} HP)",
        player_name, character.name, character.race, character.class, character.hit_points
    );
    log_line(game, message.clone());

    Ok(Resolution::new(message, character))
}

pub struct Characters {
    registry: Arc<GameRegistry>,
    content: Arc<ContentStore>,
    random: Arc<dyn RandomPort>,
}

impl Characters {
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

    pub fn create(
        &self,
        game_id: &str,
        player_id: &str,
        new: NewCharacter,
    ) -> Result<Resolution<Character>, ResolutionError> {
        let result = self.registry.update(game_id, |game| {
            create_character(
                game,
                self.content.rules(),
                self.random.as_ref(),
                player_id,
                new,
            )
        });
        if let Ok(resolved) = &result {
            tracing::info!(
                game_id = %game_id,
                player_id = %player_id,
                class = %resolved.result.class,
                hit_points = resolved.result.hit_points,
                "Character created"
            );
        }
        result
    }

    /// Shallow-merge fields onto the player's character.
    pub fn update(
        &self,
        game_id: &str,
        player_id: &str,
        update: CharacterUpdate,
    ) -> Result<Character, ResolutionError> {
        Ok(self.registry.set_character(game_id, player_id, update)?)
    }

    /// Detached copy, `None` if there is no such character.
    pub fn export(&self, game_id: &str, player_id: &str) -> Option<Character> {
        self.registry.export_character(game_id, player_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::clock::FixedRandom;
    use crate::infrastructure::ports::MockRandomPort;
    use tavern_domain::ClassRule;

    fn rules() -> RuleTables {
        let mut rules = RuleTables::default();
        rules.classes.insert(
            "fighter".into(),
            ClassRule {
                name: Some("Fighter".into()),
                hit_die: Some(10),
                saving_throws: [("death".to_string(), 12), ("spells".to_string(), 16)]
                    .into_iter()
                    .collect(),
                ..ClassRule::default()
            },
        );
        rules
    }

    fn game() -> Game {
        let mut game = Game::new("g1");
        game.add_player("p1", "Rowan");
        game
    }

    fn fighter() -> NewCharacter {
        NewCharacter {
            name: "Rowan".into(),
            race: "human".into(),
            class: "fighter".into(),
            ..NewCharacter::default()
        }
    }

    #[test]
    fn hit_points_roll_the_class_hit_die() {
        let mut game = game();
        let mut random = MockRandomPort::new();
        random
            .expect_gen_range()
            .withf(|min, max| (*min, *max) == (1, 10))
            .times(1)
            .return_const(7);

        let resolved = create_character(&mut game, &rules(), &random, "p1", fighter()).unwrap();

        let character = resolved.result;
        assert_eq!(character.hit_points, 7);
        assert_eq!(character.saving_throws.get("spells"), Some(&16));
        assert_eq!(character.armor_class, 10);
        assert_eq!(character.level, 1);
        assert_eq!(character.status, STATUS_OK);
        assert_eq!(resolved.message, "Rowan created Rowan, a human fighter (7 HP)");
        assert_eq!(game.export_character("p1"), Some(character));
    }

    #[test]
    fn unknown_class_uses_d8_and_placeholder_saves() {
        let mut game = game();
        let mut random = MockRandomPort::new();
        random
            .expect_gen_range()
            .withf(|min, max| (*min, *max) == (1, 8))
            .times(1)
            .return_const(3);

        let new = NewCharacter {
            class: "bard".into(),
            armor_class: Some(14),
            ..fighter()
        };
        let character = create_character(&mut game, &rules(), &random, "p1", new)
            .unwrap()
            .result;

        assert_eq!(character.hit_points, 3);
        assert_eq!(character.armor_class, 14);
        assert_eq!(character.saving_throws, placeholder_saving_throws());
    }

    #[test]
    fn unknown_player_gets_no_character() {
        let mut game = game();
        let err = create_character(&mut game, &rules(), &FixedRandom(5), "ghost", fighter())
            .unwrap_err();
        assert_eq!(err, ResolutionError::not_found("Player", "ghost"));
        assert!(game.log.is_empty());
    }
}
