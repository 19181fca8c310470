use forklift_kernel::Game;
use glam::{Mat4, Vec3};
use std::fmt::Write as _;

use crate::scene::compose;
use crate::sketch::BoardSketch;

/// Camera/view configuration for rendering.
///
/// The default is the fixed camera the yard is shown from: slightly behind
/// and above the board, with world -Y as up.
#[derive(Debug, Clone, Copy)]
pub struct RenderView {
    pub eye: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    pub fov_degrees: f32,
    pub width: u32,
    pub height: u32,
    pub near: f32,
    pub far: f32,
}

impl Default for RenderView {
    fn default() -> Self {
        Self {
            eye: Vec3::new(0.0, -3.0, 4.0),
            target: Vec3::ZERO,
            up: Vec3::NEG_Y,
            fov_degrees: 45.0,
            width: 800,
            height: 600,
            near: 0.1,
            far: 100.0,
        }
    }
}

impl RenderView {
    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height.max(1) as f32
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, self.up)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh_gl(self.fov_degrees.to_radians(), self.aspect(), self.near, self.far)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }
}

/// Renderer-agnostic interface over a whole game state.
///
/// The renderer reads the game and a view, then produces output. It never
/// mutates the game.
pub trait Renderer {
    type Output;

    fn render(&self, game: &Game, view: &RenderView) -> Self::Output;
}

/// Human-readable dump of the game: counters, robots, stations, and a board
/// sketch. Used for CLI summaries and logging.
#[derive(Debug, Default)]
pub struct DebugTextRenderer;

impl DebugTextRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl Renderer for DebugTextRenderer {
    type Output = String;

    fn render(&self, game: &Game, view: &RenderView) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            "=== Yard (commands={}, frames={}, hash={:#018x}) ===",
            game.commands_applied(),
            game.frames(),
            game.state_hash()
        );
        let _ = writeln!(
            out,
            "Camera: eye=({:.1}, {:.1}, {:.1}) fov={:.0} {}x{}",
            view.eye.x, view.eye.y, view.eye.z, view.fov_degrees, view.width, view.height
        );
        for robot in game.robots() {
            let cargo = robot
                .cargo()
                .map_or_else(|| "-".to_string(), |c| format!("box#{}", c.0));
            let _ = writeln!(
                out,
                "  {} {} at {} facing {} carrying {}",
                robot.id(),
                robot.color().letter(),
                robot.pos(),
                robot.orientation(),
                cargo
            );
        }
        for station in game.stations() {
            let cargo = station
                .cargo()
                .map_or_else(|| "empty".to_string(), |c| format!("box#{}", c.0));
            let _ = writeln!(out, "  station {} {}", station.cell(), cargo);
        }

        let mut sketch = BoardSketch::new();
        for item in compose(game) {
            sketch.place(&item);
        }
        out.push_str(&sketch.to_string());
        out
    }
}
