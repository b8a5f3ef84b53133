//! Experience and levelling.

use std::sync::Arc;

use serde::Serialize;

use tavern_domain::Game;

use super::{Resolution, ResolutionError};
use crate::stores::{log_line, GameRegistry};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExperienceOutcome {
    pub player_id: String,
    pub gained: u32,
    pub experience: u32,
    pub level: u32,
    /// Every level reached by this award, in order.
    pub levels_gained: Vec<u32>,
}

/// Award experience, levelling up as many times as the total allows.
///
/// Logs the award and then each level-up on its own line.
pub fn add_experience(
    game: &mut Game,
    player_id: &str,
    xp: u32,
) -> Result<Resolution<ExperienceOutcome>, ResolutionError> {
    let player_name = game.require_player(player_id)?.name.clone();
    let character = game.character_mut(player_id)?;
    let levels_gained = character.add_experience(xp);
    let outcome = ExperienceOutcome {
        player_id: player_id.to_string(),
        gained: xp,
        experience: character.experience,
        level: character.level,
        levels_gained,
    };

    let message = format!("{} gains {} experience", player_name, xp);
    log_line(game, message.clone());
    for level in &outcome.levels_gained {
        log_line(game, format!("{} reached level {}!", player_name, level));
    }
    if !outcome.levels_gained.is_empty() {
        tracing::info!(
            game_id = %game.id,
            player_id = %player_id,
            level = outcome.level,
            "Player levelled up"
        );
    }

    Ok(Resolution::new(message, outcome))
}

pub struct Experience {
    registry: Arc<GameRegistry>,
}

impl Experience {
    pub fn new(registry: Arc<GameRegistry>) -> Self {
        Self { registry }
    }

    pub fn add(
        &self,
        game_id: &str,
        player_id: &str,
        xp: u32,
    ) -> Result<Resolution<ExperienceOutcome>, ResolutionError> {
        self.registry
            .update(game_id, |game| add_experience(game, player_id, xp))
    }
}
