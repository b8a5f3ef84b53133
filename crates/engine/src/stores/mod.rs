//! In-memory state storage.
//!
//! - `GameRegistry` - every live game, keyed by game id

pub mod registry;

pub use registry::{log_line, GameRegistry};
