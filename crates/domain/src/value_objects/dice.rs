//! Dice notation value objects and parsing
//!
//! Supports formulas like "1d6" and "2d4+2": `NdS[+B]` with a non-negative
//! bonus, so a roll is never below the dice count. Rolling never touches a
//! random source directly: callers pass a closure returning a uniform integer
//! in an inclusive range, which keeps the domain free of RNG state.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Error when parsing a dice formula
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DiceParseError {
    /// The formula string is empty
    #[error("Empty dice formula")]
    Empty,
    /// Invalid format - expected XdY or XdY+Z
    #[error("Invalid dice format: {0}")]
    InvalidFormat(String),
    /// Dice count must be at least 1
    #[error("Dice count must be at least 1")]
    InvalidDiceCount,
    /// Die size must be at least 2
    #[error("Die size must be at least 2")]
    InvalidDieSize,
}

/// A parsed dice formula like "2d6+3"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiceFormula {
    /// Number of dice to roll (X in XdY)
    pub dice_count: u8,
    /// Size of each die (Y in XdY)
    pub die_size: u8,
    /// Bonus added after rolling (+Z), never negative
    pub modifier: i32,
}

impl DiceFormula {
    /// A single six-sided die, the fallback for unreadable damage notation.
    pub const D6: DiceFormula = DiceFormula {
        dice_count: 1,
        die_size: 6,
        modifier: 0,
    };

    /// Create a new dice formula
    pub fn new(dice_count: u8, die_size: u8, modifier: i32) -> Result<Self, DiceParseError> {
        if modifier < 0 {
            return Err(DiceParseError::InvalidFormat(format!(
                "Negative modifier: {}",
                modifier
            )));
        }
        if dice_count == 0 {
            return Err(DiceParseError::InvalidDiceCount);
        }
        if die_size < 2 {
            return Err(DiceParseError::InvalidDieSize);
        }
        Ok(Self {
            dice_count,
            die_size,
            modifier,
        })
    }

    /// Parse a dice formula string like "1d6" or "2d4+2"
    ///
    /// The dice count is mandatory; the bonus is optional and defaults to 0.
    /// Anything else after the die size, a `-` modifier included, is rejected.
    pub fn parse(input: &str) -> Result<Self, DiceParseError> {
        let input = input.trim().to_lowercase();
        if input.is_empty() {
            return Err(DiceParseError::Empty);
        }

        let d_pos = input.find('d').ok_or_else(|| {
            DiceParseError::InvalidFormat(format!("Missing 'd' separator in '{}'", input))
        })?;

        let count_str = &input[..d_pos];
        let dice_count: u8 = count_str.parse().map_err(|_| {
            DiceParseError::InvalidFormat(format!("Invalid dice count: '{}'", count_str))
        })?;

        let after_d = &input[d_pos + 1..];
        let (size_str, modifier) = match after_d.split_once('+') {
            Some((size_str, mod_str)) => {
                // Unsigned parse: "+-3" is as malformed as "-3".
                let modifier: u16 = mod_str.parse().map_err(|_| {
                    DiceParseError::InvalidFormat(format!("Invalid modifier: '+{}'", mod_str))
                })?;
                (size_str, i32::from(modifier))
            }
            None => (after_d, 0),
        };

        let die_size: u8 = size_str.parse().map_err(|_| {
            DiceParseError::InvalidFormat(format!("Invalid die size: '{}'", size_str))
        })?;

        Self::new(dice_count, die_size, modifier)
    }

    /// Roll the dice, drawing each die from `draw(1, die_size)`.
    pub fn roll_with<F>(&self, mut draw: F) -> DiceRollResult
    where
        F: FnMut(i32, i32) -> i32,
    {
        let die_max = i32::from(self.die_size);
        let individual_rolls: Vec<i32> = (0..self.dice_count).map(|_| draw(1, die_max)).collect();
        let dice_total = individual_rolls
            .iter()
            .fold(0i32, |sum, roll| sum.saturating_add(*roll));

        DiceRollResult {
            formula: *self,
            individual_rolls,
            dice_total,
            total: dice_total.saturating_add(self.modifier),
        }
    }

    /// Get the minimum possible roll
    pub fn min_roll(&self) -> i32 {
        i32::from(self.dice_count) + self.modifier
    }

    /// Get the maximum possible roll
    pub fn max_roll(&self) -> i32 {
        i32::from(self.dice_count) * i32::from(self.die_size) + self.modifier
    }
}

impl fmt::Display for DiceFormula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.modifier {
            0 => write!(f, "{}d{}", self.dice_count, self.die_size),
            m => write!(f, "{}d{}+{}", self.dice_count, self.die_size, m),
        }
    }
}

/// Result of rolling dice
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiceRollResult {
    /// The formula that was rolled
    pub formula: DiceFormula,
    /// Individual die results
    pub individual_rolls: Vec<i32>,
    /// Sum of dice before modifier
    pub dice_total: i32,
    /// Final total (dice_total + modifier)
    pub total: i32,
}

/// Roll a notation string, returning 0 when the notation cannot be read.
///
/// Malformed notation is recovered from locally and never reported as an error.
pub fn roll_notation<F>(notation: &str, draw: F) -> i32
where
    F: FnMut(i32, i32) -> i32,
{
    match DiceFormula::parse(notation) {
        Ok(formula) => formula.roll_with(draw).total,
        Err(_) => 0,
    }
}
