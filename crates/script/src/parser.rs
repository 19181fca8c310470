use std::collections::BTreeSet;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use forklift_common::{Command, Direction, GridPos, Placement, RobotColor, RobotId};
use regex::{Captures, Regex};
use serde::Serialize;

static HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"game starts with (\d+) number robots per player").expect("header pattern")
});

static PLACEMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([RBG]) robot (\d+) in position \[(\d+),\s*(\d+)\]").expect("placement pattern")
});

static MOVE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([RBG]) robot (\d+) go (up|down|left|right|[UDLR])\b").expect("move pattern")
});

/// Errors from loading or parsing a move script.
#[derive(Debug, thiserror::Error)]
pub enum ScriptError {
    #[error("cannot read script {path}: {source}")]
    ResourceUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed script: {0}")]
    MalformedInput(String),
}

/// A parsed move script.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Script {
    /// Robots each player (color) controls.
    pub robots_per_player: usize,
    /// Declared starting cells, in file order, one per robot at most.
    pub placements: Vec<Placement>,
    /// Commands in file order.
    pub commands: Vec<Command>,
}

impl Script {
    /// Size of the dense index space across all three colors.
    pub fn robot_count(&self) -> usize {
        self.robots_per_player.saturating_mul(RobotColor::ALL.len())
    }

    /// One line per command, `t=<seq> <robot> <direction>`.
    pub fn listing(&self) -> String {
        let mut out = String::new();
        for (t, command) in self.commands.iter().enumerate() {
            let _ = writeln!(out, "t={t} {} {}", command.robot, command.direction);
        }
        out
    }
}

/// Dense index for the `k`-th (1-based) robot of `color`, or `None` if `k` is
/// outside `1..=robots_per_player` or the index does not fit in `usize`.
pub fn robot_index(robots_per_player: usize, color: RobotColor, k: usize) -> Option<RobotId> {
    if k == 0 || k > robots_per_player {
        return None;
    }
    robots_per_player
        .checked_mul(color.rank())?
        .checked_add(k - 1)
        .map(RobotId)
}

/// Read and parse the script at `path`.
pub fn load(path: impl AsRef<Path>) -> Result<Script, ScriptError> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|source| ScriptError::ResourceUnavailable {
        path: path.to_path_buf(),
        source,
    })?;
    let script = parse_str(&text)?;
    tracing::info!(
        path = %path.display(),
        robots_per_player = script.robots_per_player,
        robots = script.robot_count(),
        placements = script.placements.len(),
        commands = script.commands.len(),
        "script loaded"
    );
    Ok(script)
}

/// Parse script text. The first line must be the header.
pub fn parse_str(text: &str) -> Result<Script, ScriptError> {
    let mut lines = text.lines().enumerate();
    let (_, header) = lines
        .next()
        .ok_or_else(|| ScriptError::MalformedInput("script is empty".into()))?;
    let robots_per_player = parse_header(header)?;

    let mut script = Script {
        robots_per_player,
        placements: Vec::new(),
        commands: Vec::new(),
    };
    let mut placed = BTreeSet::new();

    for (idx, line) in lines {
        let line_no = idx + 1;
        if let Some(caps) = MOVE.captures(line) {
            let Some((robot, _)) = resolve_robot(robots_per_player, &caps) else {
                tracing::warn!(line = line_no, "move for robot outside the declared range");
                continue;
            };
            // The pattern only admits the encodings `Direction` parses.
            let Ok(direction) = caps[3].parse::<Direction>() else {
                continue;
            };
            script.commands.push(Command::new(robot, direction));
        } else if let Some(caps) = PLACEMENT.captures(line) {
            let Some((robot, color)) = resolve_robot(robots_per_player, &caps) else {
                tracing::warn!(line = line_no, "placement for robot outside the declared range");
                continue;
            };
            let Some(at) = parse_cell(&caps[3], &caps[4]) else {
                tracing::warn!(line = line_no, %robot, "placement off the board");
                continue;
            };
            if !placed.insert(robot) {
                tracing::warn!(line = line_no, %robot, "robot declared twice, keeping the first");
                continue;
            }
            script.placements.push(Placement { robot, color, at });
        } else {
            tracing::trace!(line = line_no, "skipping unrecognized line");
        }
    }

    Ok(script)
}

fn parse_header(line: &str) -> Result<usize, ScriptError> {
    let caps = HEADER
        .captures(line)
        .ok_or_else(|| ScriptError::MalformedInput(format!("missing header, found {line:?}")))?;
    let n: usize = caps[1]
        .parse()
        .map_err(|_| ScriptError::MalformedInput(format!("bad robot count {:?}", &caps[1])))?;
    if n == 0 {
        return Err(ScriptError::MalformedInput(
            "robots per player must be positive".into(),
        ));
    }
    if n.checked_mul(RobotColor::ALL.len()).is_none() {
        return Err(ScriptError::MalformedInput(format!("robot count {n} is too large")));
    }
    Ok(n)
}

fn resolve_robot(robots_per_player: usize, caps: &Captures<'_>) -> Option<(RobotId, RobotColor)> {
    let color = caps[1].chars().next().and_then(RobotColor::from_letter)?;
    let k: usize = caps[2].parse().ok()?;
    Some((robot_index(robots_per_player, color, k)?, color))
}

fn parse_cell(x: &str, y: &str) -> Option<GridPos> {
    GridPos::new(x.parse().ok()?, y.parse().ok()?)
}
