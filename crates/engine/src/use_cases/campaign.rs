//! Campaign selection.

use std::sync::Arc;

use tavern_domain::CampaignSummary;

use super::ResolutionError;
use crate::infrastructure::content::ContentStore;
use crate::stores::{log_line, GameRegistry};

pub struct Campaigns {
    registry: Arc<GameRegistry>,
    content: Arc<ContentStore>,
}

impl Campaigns {
    pub fn new(registry: Arc<GameRegistry>, content: Arc<ContentStore>) -> Self {
        Self { registry, content }
    }

    /// Attach a campaign to the game, replacing any earlier choice.
    pub fn select(
        &self,
        game_id: &str,
        campaign_id: &str,
    ) -> Result<CampaignSummary, ResolutionError> {
        let summary = self
            .content
            .campaign(campaign_id)
            .map(|campaign| campaign.summary())
            .ok_or_else(|| ResolutionError::not_found("Campaign", campaign_id))?;

        self.registry.update(game_id, |game| {
            game.campaign = Some(summary.clone());
            log_line(game, format!("Campaign selected: {}", summary.name));
        });
        tracing::info!(game_id = %game_id, campaign_id = %campaign_id, "Campaign selected");

        Ok(summary)
    }

    pub fn list(&self) -> Vec<CampaignSummary> {
        self.content.list_campaigns()
    }
}
