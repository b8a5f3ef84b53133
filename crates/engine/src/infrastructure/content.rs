//! Read-only content: rule tables, campaigns and dialogue files.
//!
//! Everything is loaded once at start-up from the data directory:
//!
//! ```text
//! data/
//!   rules/{classes,spells,monsters,items}.json
//!   campaigns/*.json
//!   dialogues/*.json
//! ```
//!
//! A missing file or directory yields empty content. Malformed JSON is a
//! start-up error.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::fs;

use tavern_domain::{CampaignSummary, DialogueFile, RuleTables};

#[derive(Debug, Error)]
pub enum ContentError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("JSON parse error in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// A campaign definition. Fields beyond the summary are kept as opaque JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Campaign {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Campaign {
    pub fn summary(&self) -> CampaignSummary {
        CampaignSummary {
            id: self.id.clone(),
            name: self.name.clone(),
            description: self.description.clone(),
        }
    }
}

/// All static content shared by every game.
#[derive(Debug, Clone, Default)]
pub struct ContentStore {
    rules: RuleTables,
    campaigns: BTreeMap<String, Campaign>,
    dialogues: BTreeMap<String, DialogueFile>,
}

impl ContentStore {
    pub fn new(rules: RuleTables) -> Self {
        Self {
            rules,
            campaigns: BTreeMap::new(),
            dialogues: BTreeMap::new(),
        }
    }

    pub fn with_campaign(mut self, campaign: Campaign) -> Self {
        self.campaigns.insert(campaign.id.clone(), campaign);
        self
    }

    pub fn with_dialogue(mut self, dialogue: DialogueFile) -> Self {
        self.dialogues.insert(dialogue.id.clone(), dialogue);
        self
    }

    /// Load every content file under `data_dir`.
    pub async fn load(data_dir: &Path) -> Result<Self, ContentError> {
        let rules_dir = data_dir.join("rules");
        let rules = RuleTables {
            classes: load_optional(&rules_dir.join("classes.json")).await?,
            spells: load_optional(&rules_dir.join("spells.json")).await?,
            monsters: load_optional(&rules_dir.join("monsters.json")).await?,
            items: load_optional(&rules_dir.join("items.json")).await?,
        };

        let mut store = Self::new(rules);

        for campaign in load_dir::<Campaign>(&data_dir.join("campaigns")).await? {
            store = store.with_campaign(campaign);
        }
        for dialogue in load_dir::<DialogueFile>(&data_dir.join("dialogues")).await? {
            store = store.with_dialogue(dialogue);
        }

        tracing::info!(
            data_dir = %data_dir.display(),
            classes = store.rules.classes.len(),
            spell_groups = store.rules.spells.groups().len(),
            monsters = store.rules.monsters.len(),
            items = store.rules.items.len(),
            campaigns = store.campaigns.len(),
            dialogues = store.dialogues.len(),
            "Content loaded"
        );

        Ok(store)
    }

    pub fn rules(&self) -> &RuleTables {
        &self.rules
    }

    pub fn campaign(&self, campaign_id: &str) -> Option<&Campaign> {
        self.campaigns.get(campaign_id)
    }

    /// Summaries of every campaign, sorted by id.
    pub fn list_campaigns(&self) -> Vec<CampaignSummary> {
        self.campaigns.values().map(Campaign::summary).collect()
    }

    pub fn dialogue(&self, dialogue_id: &str) -> Option<&DialogueFile> {
        self.dialogues.get(dialogue_id)
    }

    /// Ids of the dialogue files attached to a campaign.
    pub fn dialogues_for_campaign(&self, campaign_id: &str) -> Vec<String> {
        self.dialogues
            .values()
            .filter(|d| d.campaign_id.as_deref() == Some(campaign_id))
            .map(|d| d.id.clone())
            .collect()
    }
}

/// Parse a JSON file, or return the default value if it does not exist.
async fn load_optional<T>(path: &Path) -> Result<T, ContentError>
where
    T: DeserializeOwned + Default,
{
    if !fs::try_exists(path).await.unwrap_or(false) {
        tracing::warn!(path = %path.display(), "Content file missing, using empty table");
        return Ok(T::default());
    }
    read_json(path).await
}

/// Parse every `*.json` file of a directory, in file name order.
async fn load_dir<T>(dir: &Path) -> Result<Vec<T>, ContentError>
where
    T: DeserializeOwned,
{
    let mut entries = match fs::read_dir(dir).await {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::warn!(dir = %dir.display(), "Content directory missing");
            return Ok(Vec::new());
        }
        Err(source) => {
            return Err(ContentError::Io {
                path: dir.to_path_buf(),
                source,
            })
        }
    };

    let mut paths = Vec::new();
    while let Some(entry) = entries.next_entry().await.map_err(|source| ContentError::Io {
        path: dir.to_path_buf(),
        source,
    })? {
        let path = entry.path();
        if path.extension().is_some_and(|ext| ext == "json") {
            paths.push(path);
        }
    }
    paths.sort();

    let mut items = Vec::with_capacity(paths.len());
    for path in paths {
        items.push(read_json(&path).await?);
    }
    Ok(items)
}

async fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, ContentError> {
    let content = fs::read_to_string(path)
        .await
        .map_err(|source| ContentError::Io {
            path: path.to_path_buf(),
            source,
        })?;
    serde_json::from_str(&content).map_err(|source| ContentError::Json {
        path: path.to_path_buf(),
        source,
    })
}
