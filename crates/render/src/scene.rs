use forklift_common::{RobotColor, Transform};
use forklift_kernel::Game;
use glam::{Mat4, Vec3};

use crate::renderer::RenderView;

/// Uniform scale applied to every model on top of its own transform.
pub const MODEL_SCALE: f32 = 0.45;

/// The three models the scene is built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssetRef {
    Board,
    Forklift,
    Cargo,
}

impl AssetRef {
    pub fn path(self) -> &'static str {
        match self {
            AssetRef::Board => "assets/board/board.obj",
            AssetRef::Forklift => "assets/forklift/forklift.obj",
            AssetRef::Cargo => "assets/box/box.obj",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DrawKind {
    Board,
    Forklift(RobotColor),
    Cargo,
}

/// One draw call: which model, where.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawItem {
    pub kind: DrawKind,
    pub transform: Transform,
}

impl DrawItem {
    pub fn asset(&self) -> AssetRef {
        match self.kind {
            DrawKind::Board => AssetRef::Board,
            DrawKind::Forklift(_) => AssetRef::Forklift,
            DrawKind::Cargo => AssetRef::Cargo,
        }
    }

    /// Flat color for untextured models.
    pub fn tint(&self) -> Option<Vec3> {
        match self.kind {
            DrawKind::Forklift(color) => Some(color.rgb()),
            _ => None,
        }
    }

    pub fn model_matrix(&self) -> Mat4 {
        Mat4::from_scale(Vec3::splat(MODEL_SCALE)) * self.transform.to_mat4()
    }

    pub fn mvp(&self, view: &RenderView) -> Mat4 {
        view.view_projection() * self.model_matrix()
    }
}

/// Everything visible in `game`, in draw order.
pub fn compose(game: &Game) -> Vec<DrawItem> {
    let mut items = Vec::with_capacity(1 + 2 * game.robot_count() + game.stations().len());
    items.push(DrawItem {
        kind: DrawKind::Board,
        transform: Transform::default(),
    });
    for robot in game.robots() {
        items.push(DrawItem {
            kind: DrawKind::Forklift(robot.color()),
            transform: *robot.transform(),
        });
        // carried cargo rides on the forks
        if robot.is_carrying() {
            items.push(DrawItem {
                kind: DrawKind::Cargo,
                transform: *robot.transform(),
            });
        }
    }
    for station in game.stations() {
        if !station.is_empty() {
            items.push(DrawItem {
                kind: DrawKind::Cargo,
                transform: Transform::from_position_rotation(
                    station.world_position(),
                    glam::Quat::IDENTITY,
                ),
            });
        }
    }
    items
}
