//! Shared types and board tables for the forklift yard.
//!
//! # Invariants
//! - A `GridPos` always names a cell on the 9x9 board.
//! - Board tables (stations, dropoff cells) are immutable constants.

pub mod board;
pub mod types;

pub use board::{StationId, is_dropoff, station_at};
pub use types::{
    CargoId, Command, Direction, GridPos, ParseDirectionError, Placement, RobotColor, RobotId,
    Transform, Turn,
};
