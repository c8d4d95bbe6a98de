//! history-replay library: Exposes the replay pieces for testing.
//!
//! This is a thin library layer over the binary, allowing integration
//! tests to drive scripts without spawning a process.

pub mod replay;
pub mod script;

// Re-export key types for convenience
pub use replay::{OutputFormat, QueryOutcome, Replayer, write_outcomes};
pub use script::{ScriptError, Step, load_script, parse_script};
