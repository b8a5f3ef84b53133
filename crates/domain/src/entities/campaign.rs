use serde::{Deserialize, Serialize};

/// The part of a campaign a game keeps a reference to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CampaignSummary {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
}
