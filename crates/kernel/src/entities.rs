use forklift_common::board::{STATION_CELLS, grid_to_world};
use forklift_common::{
    CargoId, Direction, GridPos, Placement, RobotColor, RobotId, StationId, Transform,
};
use glam::Vec3;
use serde::{Deserialize, Serialize};

/// A forklift on the board.
///
/// Logical state (cell, orientation, cargo) changes only when a maneuver
/// commits. The transform is the animated pose and may sit between cells
/// while a command is in flight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Robot {
    id: RobotId,
    color: RobotColor,
    pos: GridPos,
    orientation: Direction,
    cargo: Option<CargoId>,
    transform: Transform,
}

impl Robot {
    /// New robot at its declared cell, facing DOWN, empty-handed.
    pub fn new(placement: Placement) -> Self {
        let orientation = Direction::Down;
        Self {
            id: placement.robot,
            color: placement.color,
            pos: placement.at,
            orientation,
            cargo: None,
            transform: canonical_pose(placement.at, orientation),
        }
    }

    pub fn id(&self) -> RobotId {
        self.id
    }

    pub fn color(&self) -> RobotColor {
        self.color
    }

    pub fn pos(&self) -> GridPos {
        self.pos
    }

    pub fn orientation(&self) -> Direction {
        self.orientation
    }

    pub fn cargo(&self) -> Option<CargoId> {
        self.cargo
    }

    pub fn is_carrying(&self) -> bool {
        self.cargo.is_some()
    }

    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    pub(crate) fn transform_mut(&mut self) -> &mut Transform {
        &mut self.transform
    }

    pub(crate) fn set_pos(&mut self, pos: GridPos) {
        self.pos = pos;
    }

    pub(crate) fn set_orientation(&mut self, orientation: Direction) {
        self.orientation = orientation;
    }

    /// Hold `cargo` (possibly nothing), returning whatever was carried before.
    pub(crate) fn load(&mut self, cargo: Option<CargoId>) -> Option<CargoId> {
        std::mem::replace(&mut self.cargo, cargo)
    }

    pub(crate) fn unload(&mut self) -> Option<CargoId> {
        self.cargo.take()
    }

    /// Snap the animated pose onto the committed cell and orientation.
    pub(crate) fn settle(&mut self) {
        self.transform = canonical_pose(self.pos, self.orientation);
    }
}

fn canonical_pose(pos: GridPos, orientation: Direction) -> Transform {
    Transform::from_position_rotation(grid_to_world(pos), orientation.rotation())
}

/// One of the three fixed pickup stations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Station {
    id: StationId,
    cargo: Option<CargoId>,
}

impl Station {
    pub(crate) fn stocked(id: StationId, cargo: CargoId) -> Self {
        Self {
            id,
            cargo: Some(cargo),
        }
    }

    pub fn id(&self) -> StationId {
        self.id
    }

    pub fn cell(&self) -> GridPos {
        STATION_CELLS[self.id.0]
    }

    pub fn cargo(&self) -> Option<CargoId> {
        self.cargo
    }

    pub fn is_empty(&self) -> bool {
        self.cargo.is_none()
    }

    /// Where unclaimed cargo is drawn.
    pub fn world_position(&self) -> Vec3 {
        grid_to_world(self.cell())
    }

    pub(crate) fn take(&mut self) -> Option<CargoId> {
        self.cargo.take()
    }

    pub(crate) fn refill(&mut self, cargo: CargoId) -> Option<CargoId> {
        self.cargo.replace(cargo)
    }
}
