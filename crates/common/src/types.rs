use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::board::BOARD_SIZE;

/// Dense 0-based robot index, stable for the lifetime of a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RobotId(pub usize);

impl fmt::Display for RobotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "robot#{}", self.0)
    }
}

/// Identifier of a cargo unit. Allocated from a counter, never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CargoId(pub u64);

/// Player color. The discriminant order is the color rank used for indexing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RobotColor {
    Red,
    Blue,
    Green,
}

impl RobotColor {
    pub const ALL: [RobotColor; 3] = [RobotColor::Red, RobotColor::Blue, RobotColor::Green];

    /// Rank used in `index = N * rank + (k - 1)`.
    pub fn rank(self) -> usize {
        match self {
            RobotColor::Red => 0,
            RobotColor::Blue => 1,
            RobotColor::Green => 2,
        }
    }

    /// Letter used in move scripts.
    pub fn letter(self) -> char {
        match self {
            RobotColor::Red => 'R',
            RobotColor::Blue => 'B',
            RobotColor::Green => 'G',
        }
    }

    pub fn from_letter(c: char) -> Option<Self> {
        match c {
            'R' => Some(RobotColor::Red),
            'B' => Some(RobotColor::Blue),
            'G' => Some(RobotColor::Green),
            _ => None,
        }
    }

    /// Tint applied to the forklift model.
    pub fn rgb(self) -> Vec3 {
        match self {
            RobotColor::Red => Vec3::new(0.8, 0.2, 0.2),
            RobotColor::Blue => Vec3::new(0.2, 0.2, 0.8),
            RobotColor::Green => Vec3::new(0.2, 0.8, 0.2),
        }
    }
}

/// One of the four cardinal directions. Used both as a command direction and
/// as a robot's orientation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Grid displacement `(dx, dy)` of one step in this direction.
    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }

    /// Number of quarter turns (positive yaw) from the DOWN facing.
    fn quarters(self) -> u8 {
        match self {
            Direction::Down => 0,
            Direction::Left => 1,
            Direction::Up => 2,
            Direction::Right => 3,
        }
    }

    fn from_quarters(q: u8) -> Self {
        match q % 4 {
            0 => Direction::Down,
            1 => Direction::Left,
            2 => Direction::Up,
            _ => Direction::Right,
        }
    }

    /// Canonical model rotation for a robot facing this way.
    ///
    /// The forklift model faces +Z at identity, which is DOWN on the board.
    pub fn rotation(self) -> Quat {
        Quat::from_rotation_y(self.quarters() as f32 * std::f32::consts::FRAC_PI_2)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Left => "left",
            Direction::Right => "right",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown direction: {0:?}")]
pub struct ParseDirectionError(pub String);

impl FromStr for Direction {
    type Err = ParseDirectionError;

    /// Accepts the textual form (`up`) and the single-letter form (`U`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "up" | "U" => Ok(Direction::Up),
            "down" | "D" => Ok(Direction::Down),
            "left" | "L" => Ok(Direction::Left),
            "right" | "R" => Ok(Direction::Right),
            other => Err(ParseDirectionError(other.to_string())),
        }
    }
}

/// Reorientation maneuver needed to go from one facing to another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Turn {
    None,
    Left,
    Right,
    Back,
}

impl Turn {
    /// Resolve the single maneuver that turns `from` into `to`.
    pub fn resolve(from: Direction, to: Direction) -> Self {
        match (to.quarters() + 4 - from.quarters()) % 4 {
            0 => Turn::None,
            1 => Turn::Right,
            2 => Turn::Back,
            _ => Turn::Left,
        }
    }

    /// Facing after performing this maneuver from `from`.
    pub fn apply(self, from: Direction) -> Direction {
        let q = from.quarters();
        match self {
            Turn::None => from,
            Turn::Right => Direction::from_quarters(q + 1),
            Turn::Back => Direction::from_quarters(q + 2),
            Turn::Left => Direction::from_quarters(q + 3),
        }
    }

    /// Yaw about world Y, in radians.
    pub fn angle(self) -> f32 {
        use std::f32::consts::{FRAC_PI_2, PI};
        match self {
            Turn::None => 0.0,
            Turn::Left => -FRAC_PI_2,
            Turn::Right => FRAC_PI_2,
            Turn::Back => PI,
        }
    }
}

/// A cell on the 9x9 board. Construction is checked, so a `GridPos` is always
/// on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GridPos {
    x: i32,
    y: i32,
}

impl GridPos {
    pub fn new(x: i32, y: i32) -> Option<Self> {
        let on_board = (0..BOARD_SIZE).contains(&x) && (0..BOARD_SIZE).contains(&y);
        on_board.then_some(Self { x, y })
    }

    /// Unchecked constructor for the const board tables.
    pub(crate) const fn at(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn x(self) -> i32 {
        self.x
    }

    pub fn y(self) -> i32 {
        self.y
    }

    /// Neighbouring cell in `dir`, or `None` at the board edge.
    pub fn step(self, dir: Direction) -> Option<Self> {
        let (dx, dy) = dir.delta();
        Self::new(self.x + dx, self.y + dy)
    }
}

impl fmt::Display for GridPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{},{}]", self.x, self.y)
    }
}

/// One parsed `(robot, direction)` instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Command {
    pub robot: RobotId,
    pub direction: Direction,
}

impl Command {
    pub fn new(robot: RobotId, direction: Direction) -> Self {
        Self { robot, direction }
    }
}

/// Initial placement of a robot declared in a script.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placement {
    pub robot: RobotId,
    pub color: RobotColor,
    pub at: GridPos,
}

/// Spatial transform: position, rotation, scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    pub fn from_position_rotation(position: Vec3, rotation: Quat) -> Self {
        Self {
            position,
            rotation,
            ..Self::default()
        }
    }

    /// Translate along the model's local axes.
    pub fn translate_local(&mut self, local: Vec3) {
        self.position += self.rotation * local;
    }

    /// Rotate about the model's local Y axis.
    pub fn rotate_y(&mut self, angle: f32) {
        self.rotation = (self.rotation * Quat::from_rotation_y(angle)).normalize();
    }

    /// Local +Z expressed in world space.
    pub fn forward(&self) -> Vec3 {
        self.rotation * Vec3::Z
    }

    pub fn to_mat4(&self) -> glam::Mat4 {
        glam::Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transform_default_is_identity() {
        let t = Transform::default();
        assert_eq!(t.position, Vec3::ZERO);
        assert_eq!(t.rotation, Quat::IDENTITY);
        assert_eq!(t.scale, Vec3::ONE);
    }

    #[test]
    fn resolve_turn_always_lands_on_target() {
        for from in Direction::ALL {
            for to in Direction::ALL {
                let turn = Turn::resolve(from, to);
                assert_eq!(turn.apply(from), to, "{from} -> {to} via {turn:?}");
            }
        }
    }

    #[test]
    fn resolve_turn_kinds() {
        assert_eq!(Turn::resolve(Direction::Up, Direction::Up), Turn::None);
        assert_eq!(Turn::resolve(Direction::Down, Direction::Up), Turn::Back);
        assert_eq!(Turn::resolve(Direction::Left, Direction::Right), Turn::Back);
        assert_eq!(Turn::resolve(Direction::Left, Direction::Up), Turn::Right);
        assert_eq!(Turn::resolve(Direction::Right, Direction::Up), Turn::Left);
        assert_eq!(Turn::resolve(Direction::Left, Direction::Down), Turn::Left);
        assert_eq!(Turn::resolve(Direction::Right, Direction::Down), Turn::Right);
        assert_eq!(Turn::resolve(Direction::Up, Direction::Left), Turn::Left);
        assert_eq!(Turn::resolve(Direction::Down, Direction::Left), Turn::Right);
        assert_eq!(Turn::resolve(Direction::Up, Direction::Right), Turn::Right);
        assert_eq!(Turn::resolve(Direction::Down, Direction::Right), Turn::Left);
    }

    #[test]
    fn turn_angle_matches_canonical_rotation() {
        for from in Direction::ALL {
            for to in Direction::ALL {
                let mut t = Transform::from_position_rotation(Vec3::ZERO, from.rotation());
                t.rotate_y(Turn::resolve(from, to).angle());
                assert!(t.forward().abs_diff_eq(to.rotation() * Vec3::Z, 1e-5));
            }
        }
    }

    #[test]
    fn grid_pos_is_checked() {
        assert!(GridPos::new(0, 0).is_some());
        assert!(GridPos::new(8, 8).is_some());
        assert!(GridPos::new(9, 0).is_none());
        assert!(GridPos::new(0, -1).is_none());
    }

    #[test]
    fn step_stops_at_board_edge() {
        let corner = GridPos::new(0, 0).unwrap();
        assert_eq!(corner.step(Direction::Up), None);
        assert_eq!(corner.step(Direction::Left), None);
        assert_eq!(corner.step(Direction::Down), GridPos::new(0, 1));
        assert_eq!(corner.step(Direction::Right), GridPos::new(1, 0));
    }

    #[test]
    fn direction_parses_both_encodings() {
        assert_eq!("up".parse::<Direction>(), Ok(Direction::Up));
        assert_eq!("L".parse::<Direction>(), Ok(Direction::Left));
        assert!("north".parse::<Direction>().is_err());
    }

    #[test]
    fn color_rank_follows_script_order() {
        assert_eq!(RobotColor::from_letter('R').map(RobotColor::rank), Some(0));
        assert_eq!(RobotColor::from_letter('B').map(RobotColor::rank), Some(1));
        assert_eq!(RobotColor::from_letter('G').map(RobotColor::rank), Some(2));
        assert_eq!(RobotColor::from_letter('Y'), None);
    }
}
