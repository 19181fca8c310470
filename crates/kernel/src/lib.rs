//! Game kernel: authoritative robot/station state and the motion state machine.
//!
//! # Invariants
//! - Every robot stands on a board cell and faces a cardinal direction.
//! - A cargo unit is owned by at most one robot or one station.
//! - All logical mutations flow through `Game::apply_command` and are logged.

pub mod config;
pub mod entities;
pub mod game;

pub use config::{AnimationConfig, GameConfig, RestockPolicy};
pub use entities::{Robot, Station};
pub use game::{FrameSink, Game, GameError, GameEvent};
