//! Fixed board layout: 9x9 grid, three pickup stations, nine dropoff cells.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::types::GridPos;

/// Cells per board side.
pub const BOARD_SIZE: i32 = 9;

/// Row holding the pickup stations.
pub const STATION_ROW: i32 = 7;

/// The yellow cells. A robot entering one of these releases its cargo.
pub const DROPOFF_CELLS: [GridPos; 9] = [
    GridPos::at(2, 0),
    GridPos::at(4, 0),
    GridPos::at(6, 0),
    GridPos::at(0, 2),
    GridPos::at(0, 4),
    GridPos::at(0, 6),
    GridPos::at(8, 2),
    GridPos::at(8, 4),
    GridPos::at(8, 6),
];

/// Index into the fixed station table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StationId(pub usize);

/// Station cells, left to right as seen on the board.
pub const STATION_CELLS: [GridPos; 3] = [
    GridPos::at(2, STATION_ROW),
    GridPos::at(4, STATION_ROW),
    GridPos::at(6, STATION_ROW),
];

pub fn is_dropoff(pos: GridPos) -> bool {
    DROPOFF_CELLS.contains(&pos)
}

/// Station occupying `pos`, if any.
pub fn station_at(pos: GridPos) -> Option<StationId> {
    STATION_CELLS.iter().position(|&c| c == pos).map(StationId)
}

/// Board cell to world position (board units, before the global model scale).
///
/// The board's X axis runs toward world -X and its Y axis toward world +Z,
/// centred on cell (4,4).
pub fn grid_to_world(pos: GridPos) -> Vec3 {
    Vec3::new((4 - pos.x()) as f32, 0.0, (pos.y() - 4) as f32)
}

/// Nearest board cell under a world position, if it lies on the board.
pub fn world_to_grid(world: Vec3) -> Option<GridPos> {
    let x = 4 - world.x.round() as i32;
    let y = world.z.round() as i32 + 4;
    GridPos::new(x, y)
}
