//! Game aggregate - one isolated play session.
//!
//! A game exclusively owns its players, monsters and log. Players and
//! monsters are kept in insertion order (join order and spawn order) with
//! unique identifiers.

use serde::{Deserialize, Serialize};

use super::{CampaignSummary, Character, CharacterUpdate, MonsterInstance, Player};
use crate::DomainError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Game {
    pub id: String,
    pub players: Vec<Player>,
    pub monsters: Vec<MonsterInstance>,
    /// Append-only, human-readable.
    pub log: Vec<String>,
    pub campaign: Option<CampaignSummary>,
}

impl Game {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            players: Vec::new(),
            monsters: Vec::new(),
            log: Vec::new(),
            campaign: None,
        }
    }

    // =========================================================================
    // Players
    // =========================================================================

    pub fn player(&self, player_id: &str) -> Option<&Player> {
        self.players.iter().find(|p| p.id == player_id)
    }

    pub fn player_mut(&mut self, player_id: &str) -> Option<&mut Player> {
        self.players.iter_mut().find(|p| p.id == player_id)
    }

    pub fn require_player(&self, player_id: &str) -> Result<&Player, DomainError> {
        self.player(player_id)
            .ok_or_else(|| DomainError::not_found("Player", player_id))
    }

    pub fn require_player_mut(&mut self, player_id: &str) -> Result<&mut Player, DomainError> {
        self.player_mut(player_id)
            .ok_or_else(|| DomainError::not_found("Player", player_id))
    }

    /// Add a player unless one with the same id already exists.
    ///
    /// An existing player keeps its name. Returns the stored player and
    /// whether it was newly added.
    pub fn add_player(&mut self, player_id: &str, name: &str) -> (&Player, bool) {
        if let Some(index) = self.players.iter().position(|p| p.id == player_id) {
            return (&self.players[index], false);
        }
        self.players.push(Player::new(player_id, name));
        let index = self.players.len() - 1;
        (&self.players[index], true)
    }

    /// Players a monster may attack: no character yet, or conscious.
    pub fn eligible_targets(&self) -> Vec<&Player> {
        self.players
            .iter()
            .filter(|p| p.is_eligible_target())
            .collect()
    }

    // =========================================================================
    // Characters
    // =========================================================================

    /// Character of an existing player; fails if the player has none.
    pub fn character_mut(&mut self, player_id: &str) -> Result<&mut Character, DomainError> {
        self.require_player_mut(player_id)?
            .character
            .as_mut()
            .ok_or_else(|| {
                DomainError::invalid_state(format!("Player {} has no character", player_id))
            })
    }

    /// Shallow-merge `update` onto the player's character.
    pub fn set_character(
        &mut self,
        player_id: &str,
        update: CharacterUpdate,
    ) -> Result<&Character, DomainError> {
        let player = self.require_player_mut(player_id)?;
        let merged = Character::merged(player.character.take(), update);
        Ok(&*player.character.insert(merged))
    }

    /// Add experience, returning each level reached.
    pub fn add_experience(&mut self, player_id: &str, xp: u32) -> Result<Vec<u32>, DomainError> {
        Ok(self.character_mut(player_id)?.add_experience(xp))
    }

    pub fn add_item_to_player(&mut self, player_id: &str, item_id: &str) -> Result<(), DomainError> {
        self.character_mut(player_id)?.add_item(item_id);
        Ok(())
    }

    /// Remove the first occurrence of an item; `Ok(false)` if it was not carried.
    pub fn remove_item_from_player(
        &mut self,
        player_id: &str,
        item_id: &str,
    ) -> Result<bool, DomainError> {
        Ok(self.character_mut(player_id)?.remove_item(item_id))
    }

    /// Detached copy of a player's character, `None` if absent.
    pub fn export_character(&self, player_id: &str) -> Option<Character> {
        self.player(player_id)?.character.clone()
    }

    // =========================================================================
    // Monsters
    // =========================================================================

    pub fn monster(&self, monster_id: &str) -> Option<&MonsterInstance> {
        self.monsters.iter().find(|m| m.id == monster_id)
    }

    pub fn monster_mut(&mut self, monster_id: &str) -> Option<&mut MonsterInstance> {
        self.monsters.iter_mut().find(|m| m.id == monster_id)
    }

    pub fn require_monster(&self, monster_id: &str) -> Result<&MonsterInstance, DomainError> {
        self.monster(monster_id)
            .ok_or_else(|| DomainError::not_found("Monster", monster_id))
    }

    pub fn insert_monster(&mut self, monster: MonsterInstance) {
        self.monsters.push(monster);
    }

    pub fn remove_monster(&mut self, monster_id: &str) -> Option<MonsterInstance> {
        let index = self.monsters.iter().position(|m| m.id == monster_id)?;
        Some(self.monsters.remove(index))
    }

    // =========================================================================
    // Log
    // =========================================================================

    pub fn append_log(&mut self, message: impl Into<String>) {
        self.log.push(message.into());
    }
}
