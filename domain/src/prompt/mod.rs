//! Prompt domain
//!
//! Templates and context formatting for round and synthesis prompts.

pub mod context;
mod template;

pub use context::{build_context, build_history};
pub use template::DebatePromptTemplate;
