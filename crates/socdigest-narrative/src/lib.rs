//! Narrative text for monthly reports from an OpenAI-compatible chat
//! completion service.

pub mod client;
pub mod error;
pub mod prompt;
pub mod types;

pub use client::{Narrative, NarrativeClient, INSIGHTS_PLACEHOLDER, NEXT_STEPS_PLACEHOLDER};
pub use error::NarrativeError;
pub use prompt::{insights_prompt, next_steps_prompt, NarrativeInput};
