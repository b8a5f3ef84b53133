//! Combat resolution.
//!
//! Every attack is one opposed roll: a d20 hits when it meets or beats the
//! target's armour class. Player weapons deal 1d6; monsters deal the damage
//! of the first attack in their rule.

use std::sync::Arc;

use serde::Serialize;

use tavern_domain::{DiceFormula, Game, MonsterStatus, RuleTables};

use super::{d20, Resolution, ResolutionError};
use crate::infrastructure::content::ContentStore;
use crate::infrastructure::ports::RandomPort;
use crate::stores::{log_line, GameRegistry};

/// Outcome of an attack against a player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttackOutcome {
    pub attacker: String,
    pub target: String,
    pub roll: i32,
    pub hit: bool,
    pub damage: i32,
    /// `None` when the target has no character.
    pub target_hit_points: Option<i32>,
}

/// Outcome of a player attacking a monster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonsterHitOutcome {
    pub attacker: String,
    pub monster_id: String,
    pub monster_type: String,
    pub roll: i32,
    pub hit: bool,
    pub damage: i32,
    /// Where the hit points settled; may be negative.
    pub monster_hit_points: i32,
    pub monster_status: MonsterStatus,
}

/// Player attacks player.
pub fn attack(
    game: &mut Game,
    random: &dyn RandomPort,
    attacker_id: &str,
    target_id: &str,
) -> Result<Resolution<AttackOutcome>, ResolutionError> {
    let attacker = game.require_player(attacker_id)?.name.clone();
    let target = game.require_player(target_id)?;
    let target_name = target.name.clone();
    let armor_class = target.armor_class();

    let roll = d20(random);
    let hit = roll >= armor_class;
    let damage = if hit { random.gen_range(1, 6) } else { 0 };

    let (target_hit_points, knocked_out) = apply_player_damage(game, target_id, damage)?;

    let mut message = if hit {
        format!(
            "{} attacks {} (rolled {} vs AC {}) and hits for {} damage",
            attacker, target_name, roll, armor_class, damage
        )
    } else {
        format!(
            "{} attacks {} (rolled {} vs AC {}) and misses",
            attacker, target_name, roll, armor_class
        )
    };
    if knocked_out {
        message.push_str(&format!(". {} falls unconscious!", target_name));
    }
    log_line(game, message.clone());

    tracing::debug!(
        game_id = %game.id,
        attacker_id = %attacker_id,
        target_id = %target_id,
        roll,
        hit,
        damage,
        "Player attack resolved"
    );

    Ok(Resolution::new(
        message,
        AttackOutcome {
            attacker,
            target: target_name,
            roll,
            hit,
            damage,
            target_hit_points,
        },
    ))
}

/// Player attacks monster. A monster brought to zero hit points is removed.
pub fn attack_monster(
    game: &mut Game,
    random: &dyn RandomPort,
    attacker_id: &str,
    monster_id: &str,
) -> Result<Resolution<MonsterHitOutcome>, ResolutionError> {
    let attacker = game.require_player(attacker_id)?.name.clone();
    let monster = game.require_monster(monster_id)?;
    let monster_type = monster.monster_type.clone();
    let armor_class = monster.armor_class;

    let roll = d20(random);
    let hit = roll >= armor_class;
    let damage = if hit { random.gen_range(1, 6) } else { 0 };

    let (monster_hit_points, monster_status) = apply_monster_damage(game, monster_id, damage)?;

    let mut message = if hit {
        format!(
            "{} attacks the {} (rolled {} vs AC {}) and hits for {} damage",
            attacker, monster_type, roll, armor_class, damage
        )
    } else {
        format!(
            "{} attacks the {} (rolled {} vs AC {}) and misses",
            attacker, monster_type, roll, armor_class
        )
    };
    if monster_status == MonsterStatus::Dead {
        message.push_str(&format!(". The {} is slain!", monster_type));
    }
    log_line(game, message.clone());

    Ok(Resolution::new(
        message,
        MonsterHitOutcome {
            attacker,
            monster_id: monster_id.to_string(),
            monster_type,
            roll,
            hit,
            damage,
            monster_hit_points,
            monster_status,
        },
    ))
}

/// Monster attacks player, using the first attack of its rule.
pub fn monster_attack(
    game: &mut Game,
    rules: &RuleTables,
    random: &dyn RandomPort,
    monster_id: &str,
    target_id: &str,
) -> Result<Resolution<AttackOutcome>, ResolutionError> {
    let monster_type = game.require_monster(monster_id)?.monster_type.clone();
    let target = game.require_player(target_id)?;
    let target_name = target.name.clone();
    let armor_class = target.armor_class();

    let notation = rules
        .monster(&monster_type)
        .map(|rule| rule.first_attack_damage().to_string())
        .unwrap_or_else(|| tavern_domain::rules::DEFAULT_MONSTER_DAMAGE.to_string());

    let roll = d20(random);
    let hit = roll >= armor_class;
    let damage = if hit {
        // Unreadable notation falls back to a single d6.
        DiceFormula::parse(&notation)
            .unwrap_or(DiceFormula::D6)
            .roll_with(|min, max| random.gen_range(min, max))
            .total
    } else {
        0
    };

    let (target_hit_points, knocked_out) = apply_player_damage(game, target_id, damage)?;

    let mut message = if hit {
        format!(
            "The {} attacks {} (rolled {} vs AC {}) and hits for {} damage",
            monster_type, target_name, roll, armor_class, damage
        )
    } else {
        format!(
            "The {} attacks {} (rolled {} vs AC {}) and misses",
            monster_type, target_name, roll, armor_class
        )
    };
    if knocked_out {
        message.push_str(&format!(". {} falls unconscious!", target_name));
    }
    log_line(game, message.clone());

    Ok(Resolution::new(
        message,
        AttackOutcome {
            attacker: monster_type,
            target: target_name,
            roll,
            hit,
            damage,
            target_hit_points,
        },
    ))
}

/// Apply damage to a player's character, if any.
///
/// Returns the remaining hit points (`None` without a character) and whether
/// this damage knocked the character out.
pub(crate) fn apply_player_damage(
    game: &mut Game,
    player_id: &str,
    damage: i32,
) -> Result<(Option<i32>, bool), ResolutionError> {
    let player = game.require_player_mut(player_id)?;
    match player.character.as_mut() {
        Some(character) if damage > 0 => {
            let was_down = character.hit_points <= 0;
            let dropped = character.take_damage(damage);
            Ok((Some(character.hit_points), dropped && !was_down))
        }
        Some(character) => Ok((Some(character.hit_points), false)),
        None => Ok((None, false)),
    }
}

/// Apply damage to a monster, removing it from the game when it dies.
pub(crate) fn apply_monster_damage(
    game: &mut Game,
    monster_id: &str,
    damage: i32,
) -> Result<(i32, MonsterStatus), ResolutionError> {
    let monster = game
        .monster_mut(monster_id)
        .ok_or_else(|| ResolutionError::not_found("Monster", monster_id))?;
    if damage <= 0 {
        return Ok((monster.hit_points, monster.status));
    }
    let died = monster.take_damage(damage);
    let remaining = (monster.hit_points, monster.status);
    if died {
        game.remove_monster(monster_id);
        tracing::info!(game_id = %game.id, monster_id = %monster_id, "Monster slain");
    }
    Ok(remaining)
}

/// Combat operations against the game registry.
pub struct Combat {
    registry: Arc<GameRegistry>,
    content: Arc<ContentStore>,
    random: Arc<dyn RandomPort>,
}

impl Combat {
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

    pub fn attack(
        &self,
        game_id: &str,
        attacker_id: &str,
        target_id: &str,
    ) -> Result<Resolution<AttackOutcome>, ResolutionError> {
        self.registry.update(game_id, |game| {
            attack(game, self.random.as_ref(), attacker_id, target_id)
        })
    }

    pub fn attack_monster(
        &self,
        game_id: &str,
        attacker_id: &str,
        monster_id: &str,
    ) -> Result<Resolution<MonsterHitOutcome>, ResolutionError> {
        self.registry.update(game_id, |game| {
            attack_monster(game, self.random.as_ref(), attacker_id, monster_id)
        })
    }

    pub fn monster_attack(
        &self,
        game_id: &str,
        monster_id: &str,
        target_id: &str,
    ) -> Result<Resolution<AttackOutcome>, ResolutionError> {
        self.registry.update(game_id, |game| {
            monster_attack(
                game,
                self.content.rules(),
                self.random.as_ref(),
                monster_id,
                target_id,
            )
        })
    }
}
