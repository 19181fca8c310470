//! Input: key actions and the cooperative cancellation flag.
//!
//! # Invariants
//! - One writer (the key watcher or a presenter), one reader (the replay loop).
//! - Cancellation is observed between commands, never mid-command.

pub mod action;
mod cancel;

pub use action::Action;
pub use cancel::{CancelToken, spawn_key_watcher};
