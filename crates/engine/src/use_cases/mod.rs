//! Use cases - rules resolution against live games.
//!
//! Each module pairs pure functions over a single `&mut Game` with a small
//! struct that runs them under the game registry's entry guard. The pure
//! functions validate every identifier before mutating anything and append
//! their log lines in the order the effects happen.

pub mod actions;
pub mod campaign;
pub mod character;
pub mod combat;
pub mod dialogue;
pub mod error;
pub mod experience;
pub mod items;
pub mod monsters;
pub mod session;
pub mod spells;

use serde::Serialize;

use crate::infrastructure::ports::RandomPort;

pub use actions::{ActionOutcome, Actions, PlayerAction};
pub use campaign::Campaigns;
pub use character::{Characters, NewCharacter};
pub use combat::Combat;
pub use dialogue::{DialogueStep, Dialogues};
pub use error::ResolutionError;
pub use experience::Experience;
pub use items::Items;
pub use monsters::{MonsterTurn, Monsters};
pub use session::Session;
pub use spells::{Spells, TargetType};

/// A resolved operation: the line appended to the game log plus the
/// structured result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Resolution<T> {
    pub message: String,
    pub result: T,
}

impl<T> Resolution<T> {
    pub fn new(message: impl Into<String>, result: T) -> Self {
        Self {
            message: message.into(),
            result,
        }
    }
}

/// To-hit roll.
pub fn d20(random: &dyn RandomPort) -> i32 {
    random.gen_range(1, 20)
}
