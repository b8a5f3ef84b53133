//! Infrastructure layer - everything that touches the outside world.
//!
//! - `clock` - system clock and random source (plus test doubles)
//! - `config` - environment configuration
//! - `content` - rule tables, campaigns and dialogues loaded from disk
//! - `ports` - the clock/random seams

pub mod clock;
pub mod config;
pub mod content;
pub mod ports;
