//! Trade-idea narration through an external text generator.

mod client;
mod prompt;
mod types;

pub use client::{NarrativeClient, NarrativeConfig};
pub use prompt::build_prompt;
