//! Seams for the two sources of nondeterminism: wall-clock time and dice.
//!
//! Production wires `SystemClock` / `SystemRandom`; tests inject the fixed
//! and scripted doubles from `infrastructure::clock` or the mockall mocks.

mod testing;

pub use testing::{ClockPort, RandomPort};

#[cfg(test)]
pub use testing::{MockClockPort, MockRandomPort};
