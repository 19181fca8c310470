//! Move scripts: the line-oriented log a game run is replayed from.
//!
//! # Invariants
//! - The header is the first line; without it nothing is parsed.
//! - Unrecognized lines are skipped, never reported as errors.
//! - Robot indices are dense across colors: `N * rank(color) + (k - 1)`.

mod parser;

pub use parser::{Script, ScriptError, load, parse_str, robot_index};
