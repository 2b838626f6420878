//! Reusable [`Logic`](crate::Logic) fixtures for testing.
//!
//! Available behind the `test-utils` feature flag.

mod constant_logic;
mod recording_logic;

pub use constant_logic::ConstantLogic;
pub use recording_logic::RecordingLogic;
