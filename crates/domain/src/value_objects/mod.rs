//! Value objects - immutable, validated building blocks.

mod dice;

pub use dice::{roll_notation, DiceFormula, DiceParseError, DiceRollResult};
