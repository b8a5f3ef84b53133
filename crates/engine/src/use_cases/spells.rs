//! Spellcasting.
//!
//! Spells are looked up by name, case-insensitively, across every caster
//! class and level. When two spells share a name the one defined first in
//! the spell rules wins.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use tavern_domain::{roll_notation, Game, MonsterStatus, RuleTables, SpellEffectKind};

use super::combat::{apply_monster_damage, apply_player_damage};
use super::{d20, Resolution, ResolutionError};
use crate::infrastructure::content::ContentStore;
use crate::infrastructure::ports::RandomPort;
use crate::stores::{log_line, GameRegistry};

/// What a spell or attack is aimed at.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetType {
    #[default]
    Player,
    Monster,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CastEffect {
    Heal,
    Damage,
    None,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpellOutcome {
    pub caster: String,
    pub spell: String,
    pub target: String,
    pub target_type: TargetType,
    pub effect: CastEffect,
    /// To-hit roll, damage spells only.
    pub roll: Option<i32>,
    pub hit: bool,
    /// Hit points healed or damage dealt.
    pub amount: i32,
    pub target_hit_points: Option<i32>,
    pub target_status: Option<String>,
}

/// Who is being targeted, resolved before anything is rolled.
struct Target {
    name: String,
    armor_class: i32,
}

fn resolve_target(
    game: &Game,
    target_type: TargetType,
    target_id: &str,
) -> Result<Target, ResolutionError> {
    match target_type {
        TargetType::Player => {
            let player = game.require_player(target_id)?;
            Ok(Target {
                name: player.name.clone(),
                armor_class: player.armor_class(),
            })
        }
        TargetType::Monster => {
            let monster = game.require_monster(target_id)?;
            Ok(Target {
                name: format!("the {}", monster.monster_type),
                armor_class: monster.armor_class,
            })
        }
    }
}

pub fn cast_spell(
    game: &mut Game,
    rules: &RuleTables,
    random: &dyn RandomPort,
    caster_id: &str,
    spell_name: &str,
    target_type: TargetType,
    target_id: &str,
) -> Result<Resolution<SpellOutcome>, ResolutionError> {
    let caster = game.require_player(caster_id)?.name.clone();
    let found = rules
        .find_spell(spell_name)
        .ok_or_else(|| ResolutionError::not_found("Spell", spell_name))?;
    let spell = found.spell.name.clone();
    let target = resolve_target(game, target_type, target_id)?;

    let mut outcome = SpellOutcome {
        caster: caster.clone(),
        spell: spell.clone(),
        target: target.name.clone(),
        target_type,
        effect: CastEffect::None,
        roll: None,
        hit: false,
        amount: 0,
        target_hit_points: None,
        target_status: None,
    };

    let draw = |min: i32, max: i32| random.gen_range(min, max);

    let message = match found.spell.effect_kind() {
        SpellEffectKind::Heal(notation) => {
            if target_type == TargetType::Monster {
                return Err(ResolutionError::invalid_state(format!(
                    "{} can only heal players",
                    spell
                )));
            }
            let amount = roll_notation(notation, draw);
            outcome.effect = CastEffect::Heal;
            outcome.hit = true;
            outcome.amount = amount;

            let player = game.require_player_mut(target_id)?;
            if let Some(character) = player.character.as_mut() {
                character.heal(amount);
                outcome.target_hit_points = Some(character.hit_points);
                outcome.target_status = Some(character.status.clone());
            }
            format!(
                "{} casts {} on {}, healing {} HP",
                caster, spell, target.name, amount
            )
        }
        SpellEffectKind::Damage(notation) => {
            let roll = d20(random);
            let hit = roll >= target.armor_class;
            let damage = if hit { roll_notation(notation, draw) } else { 0 };
            outcome.effect = CastEffect::Damage;
            outcome.roll = Some(roll);
            outcome.hit = hit;
            outcome.amount = damage;

            let mut message = if hit {
                format!(
                    "{} casts {} on {} (rolled {} vs AC {}) for {} damage",
                    caster, spell, target.name, roll, target.armor_class, damage
                )
            } else {
                format!(
                    "{} casts {} on {} (rolled {} vs AC {}) but misses",
                    caster, spell, target.name, roll, target.armor_class
                )
            };

            match target_type {
                TargetType::Player => {
                    let (hit_points, knocked_out) = apply_player_damage(game, target_id, damage)?;
                    outcome.target_hit_points = hit_points;
                    outcome.target_status = game
                        .player(target_id)
                        .and_then(|p| p.character.as_ref())
                        .map(|c| c.status.clone());
                    if knocked_out {
                        message.push_str(&format!(". {} falls unconscious!", target.name));
                    }
                }
                TargetType::Monster => {
                    let (hit_points, status) = apply_monster_damage(game, target_id, damage)?;
                    outcome.target_hit_points = Some(hit_points);
                    outcome.target_status = Some(status.to_string());
                    if status == MonsterStatus::Dead {
                        message.push_str(&format!(". {} is slain!", capitalize(&target.name)));
                    }
                }
            }
            message
        }
        SpellEffectKind::Inert => {
            format!(
                "{} casts {} on {}, but nothing happens",
                caster, spell, target.name
            )
        }
    };

    log_line(game, message.clone());
    tracing::debug!(
        game_id = %game.id,
        caster_id = %caster_id,
        spell = %spell,
        caster_class = %found.caster_class,
        spell_level = %found.level,
        "Spell resolved"
    );

    Ok(Resolution::new(message, outcome))
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

pub struct Spells {
    registry: Arc<GameRegistry>,
    content: Arc<ContentStore>,
    random: Arc<dyn RandomPort>,
}

impl Spells {
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

    pub fn cast(
        &self,
        game_id: &str,
        caster_id: &str,
        spell_name: &str,
        target_type: TargetType,
        target_id: &str,
    ) -> Result<Resolution<SpellOutcome>, ResolutionError> {
        self.registry.update(game_id, |game| {
            cast_spell(
                game,
                self.content.rules(),
                self.random.as_ref(),
                caster_id,
                spell_name,
                target_type,
                target_id,
            )
        })
    }
}
