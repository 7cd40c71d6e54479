pub mod config;
pub mod runner;
pub mod sinks;

pub use config::{HostConfig, ScriptSegment};
pub use runner::{MatchSummary, ScriptedInput, run_match};
pub use sinks::{logging_collaborators, victory_text};
