//! Application state and composition.

use std::sync::Arc;

use crate::infrastructure::{
    config::EngineConfig,
    content::ContentStore,
    ports::{ClockPort, RandomPort},
};
use crate::stores::GameRegistry;
use crate::use_cases;

/// Main application state.
///
/// Holds the game registry, the loaded content and every use case.
/// Passed to HTTP/WebSocket handlers via Axum state.
pub struct App {
    pub registry: Arc<GameRegistry>,
    pub content: Arc<ContentStore>,
    pub config: EngineConfig,
    pub use_cases: UseCases,
}

/// Container for all use cases.
pub struct UseCases {
    pub session: use_cases::Session,
    pub campaigns: use_cases::Campaigns,
    pub characters: use_cases::Characters,
    pub actions: use_cases::Actions,
    pub combat: use_cases::Combat,
    pub spells: use_cases::Spells,
    pub items: use_cases::Items,
    pub experience: use_cases::Experience,
    pub monsters: use_cases::Monsters,
    pub dialogue: use_cases::Dialogues,
}

impl App {
    /// Create a new App with all dependencies wired up.
    pub fn new(
        content: ContentStore,
        clock: Arc<dyn ClockPort>,
        random: Arc<dyn RandomPort>,
        config: EngineConfig,
    ) -> Self {
        let content = Arc::new(content);
        let registry = Arc::new(GameRegistry::new(clock, random.clone()));

        let use_cases = UseCases {
            session: use_cases::Session::new(registry.clone()),
            campaigns: use_cases::Campaigns::new(registry.clone(), content.clone()),
            characters: use_cases::Characters::new(
                registry.clone(),
                content.clone(),
                random.clone(),
            ),
            actions: use_cases::Actions::new(registry.clone(), content.clone(), random.clone()),
            combat: use_cases::Combat::new(registry.clone(), content.clone(), random.clone()),
            spells: use_cases::Spells::new(registry.clone(), content.clone(), random.clone()),
            items: use_cases::Items::new(registry.clone(), content.clone(), random.clone()),
            experience: use_cases::Experience::new(registry.clone()),
            monsters: use_cases::Monsters::new(registry.clone(), content.clone(), random),
            dialogue: use_cases::Dialogues::new(registry.clone(), content.clone()),
        };

        Self {
            registry,
            content,
            config,
            use_cases,
        }
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::{app_with, sample_content};
    use crate::infrastructure::clock::FixedRandom;
    use crate::infrastructure::content::ContentStore;
    use crate::use_cases::TargetType;
    use std::sync::Arc;
    use tavern_domain::{CharacterUpdate, RuleTables, SpellGroup, SpellTable};

    #[test]
    fn combat_spells_and_experience_share_the_game_registry() {
        let rules = RuleTables {
            spells: SpellTable::new(vec![SpellGroup {
                caster_class: "magic-user".into(),
                level: "1".into(),
                spells: vec![serde_json::from_value(serde_json::json!({
                    "name": "Magic Missile", "effect": {"damage": "1d6+1"}
                }))
                .unwrap()],
            }]),
            ..sample_content().rules().clone()
        };
        let content = ContentStore::new(rules);
        // Every die lands on its highest face.
        let app = app_with(content, Arc::new(FixedRandom(20)));

        app.use_cases.session.join("g1", "p1", "Rowan");
        app.use_cases.session.join("g1", "p2", "Brin");
        app.use_cases
            .characters
            .update("g1", "p1", CharacterUpdate::default())
            .unwrap();
        app.use_cases
            .characters
            .update(
                "g1",
                "p2",
                CharacterUpdate {
                    hit_points: Some(30),
                    armor_class: Some(12),
                    ..CharacterUpdate::default()
                },
            )
            .unwrap();

        let attack = app.use_cases.combat.attack("g1", "p1", "p2").unwrap();
        assert_eq!(attack.result.damage, 6);
        assert_eq!(attack.result.target_hit_points, Some(24));

        let cast = app
            .use_cases
            .spells
            .cast("g1", "p1", "Magic Missile", TargetType::Player, "p2")
            .unwrap();
        assert_eq!(cast.result.amount, 7);
        assert_eq!(cast.result.target_hit_points, Some(17));

        let award = app.use_cases.experience.add("g1", "p1", 2500).unwrap();
        assert_eq!(award.result.levels_gained, vec![2]);

        let state = app.use_cases.session.game_state("g1").unwrap();
        assert_eq!(
            &state.log[2..],
            &[
                attack.message,
                cast.message,
                award.message,
                "Rowan reached level 2!".to_string(),
            ]
        );
        assert_eq!(
            app.use_cases.characters.export("g1", "p2").unwrap().hit_points,
            17
        );
    }
}
