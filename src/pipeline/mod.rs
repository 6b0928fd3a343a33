//! Generation-side plumbing around the quality gates.
//!
//! The gates themselves are pure; this module holds the async pieces that
//! talk to a text generator: batch variation generation and the bounded
//! regenerate-until-different loop.

pub mod generator;
pub mod regeneration;
pub mod variations;

pub use generator::{generate_nonempty, ClassifiedGenerator, RawTextGenerator, TextGenerator};
pub use regeneration::{LoopState, RegenerationLoop, RegenerationOutcome};
pub use variations::{generate_variations, VariationPrompt};
