//! Render loop driver: replays a move script against the kernel, presenting a
//! frame after every animation sub-step.
//!
//! # Invariants
//! - Commands run strictly in file order, one at a time.
//! - Cancellation is checked before each command and is not an error.
//! - The driver never touches game state except through `Game::apply_command`.

use std::path::Path;

use forklift_common::Command;
use forklift_input::CancelToken;
use forklift_kernel::{FrameSink, Game, GameConfig, GameError};
use forklift_render::{Presenter, present_game};
use forklift_script::{Script, ScriptError};
use serde::Serialize;

#[derive(Debug, thiserror::Error)]
pub enum ReplayError {
    #[error(transparent)]
    Script(#[from] ScriptError),
    #[error("invalid robot setup: {0}")]
    Setup(#[from] GameError),
    #[error("command {seq} failed: {source}")]
    Command {
        seq: usize,
        #[source]
        source: GameError,
    },
}

/// Summary of a finished (or cancelled) replay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ReplayOutcome {
    pub commands_total: usize,
    pub commands_applied: u64,
    pub frames: u64,
    pub cancelled: bool,
    pub state_hash: u64,
}

/// Adapts a presenter to the kernel's per-frame callback.
struct PresentSink<'a, P: ?Sized>(&'a mut P);

impl<P: Presenter + ?Sized> FrameSink for PresentSink<'_, P> {
    fn frame(&mut self, game: &Game) {
        present_game(&mut *self.0, game);
    }
}

/// A game wired to a presenter and a cancellation flag.
pub struct Replay<P: Presenter> {
    game: Game,
    presenter: P,
    cancel: CancelToken,
}

impl<P: Presenter> Replay<P> {
    pub fn new(game: Game, presenter: P, cancel: CancelToken) -> Self {
        Self {
            game,
            presenter,
            cancel,
        }
    }

    /// Set up the board from the script's placements.
    pub fn from_script(
        script: &Script,
        config: GameConfig,
        presenter: P,
        cancel: CancelToken,
    ) -> Result<Self, ReplayError> {
        let game = Game::with_placements(config, &script.placements)?;
        Ok(Self::new(game, presenter, cancel))
    }

    pub fn game(&self) -> &Game {
        &self.game
    }

    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    pub fn into_parts(self) -> (Game, P) {
        (self.game, self.presenter)
    }

    /// Apply `commands` in order until done, cancelled, or a command faults.
    pub fn run(&mut self, commands: &[Command]) -> Result<ReplayOutcome, ReplayError> {
        let _span = tracing::info_span!("replay", commands = commands.len()).entered();

        for (seq, command) in commands.iter().enumerate() {
            if self.cancel.is_cancelled() || self.presenter.should_close() {
                tracing::info!(applied = seq, remaining = commands.len() - seq, "replay cancelled");
                return Ok(self.outcome(commands.len(), true));
            }
            let mut sink = PresentSink(&mut self.presenter);
            self.game
                .apply_command(*command, &mut sink)
                .map_err(|source| ReplayError::Command { seq, source })?;
        }

        let outcome = self.outcome(commands.len(), false);
        tracing::info!(
            applied = outcome.commands_applied,
            frames = outcome.frames,
            hash = outcome.state_hash,
            "replay finished"
        );
        Ok(outcome)
    }

    fn outcome(&self, commands_total: usize, cancelled: bool) -> ReplayOutcome {
        ReplayOutcome {
            commands_total,
            commands_applied: self.game.commands_applied(),
            frames: self.game.frames(),
            cancelled,
            state_hash: self.game.state_hash(),
        }
    }
}

/// Load the script at `path` and replay all of it.
pub fn run_script<P: Presenter>(
    path: impl AsRef<Path>,
    config: GameConfig,
    presenter: P,
    cancel: CancelToken,
) -> Result<(Replay<P>, ReplayOutcome), ReplayError> {
    let script = forklift_script::load(path)?;
    let mut replay = Replay::from_script(&script, config, presenter, cancel)?;
    let outcome = replay.run(&script.commands)?;
    Ok((replay, outcome))
}

#[cfg(test)]
mod tests {
    use super::*;
    use forklift_common::{Direction, GridPos, RobotId};
    use forklift_kernel::{AnimationConfig, GameEvent};
    use forklift_render::{DrawKind, FrameRecorder};
    use std::io::Write;
    use std::path::PathBuf;

    const END_TO_END: &str = "game starts with 1 number robots per player\n\
                              R robot 1 in position [4,8]\n\
                              R robot 1 go up\n";

    fn write_script(dir: &tempfile::TempDir, text: &str) -> PathBuf {
        let path = dir.path().join("moves.log");
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(text.as_bytes()).unwrap();
        path
    }

    #[test]
    fn end_to_end_pickup_turns_robot_down() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_script(&dir, END_TO_END);
        let (replay, outcome) = run_script(
            &path,
            GameConfig::default(),
            FrameRecorder::new(),
            CancelToken::new(),
        )
        .unwrap();

        assert_eq!(outcome.commands_total, 1);
        assert_eq!(outcome.commands_applied, 1);
        assert!(!outcome.cancelled);
        // turn back, drive, turn back for the pickup
        assert_eq!(outcome.frames, 28);
        assert_eq!(replay.presenter().presented(), 28);

        let robot = replay.game().robot(RobotId(0)).unwrap();
        assert_eq!(robot.pos(), GridPos::new(4, 7).unwrap());
        assert_eq!(robot.orientation(), Direction::Down);
        assert!(robot.is_carrying());

        // board, forklift, carried box, two remaining station boxes
        let kinds: Vec<DrawKind> = replay.presenter().last_frame().iter().map(|i| i.kind).collect();
        assert_eq!(kinds.len(), 5);
        assert_eq!(kinds[2], DrawKind::Cargo);
    }

    #[test]
    fn cancelled_before_start_applies_nothing() {
        let script = forklift_script::parse_str(END_TO_END).unwrap();
        let cancel = CancelToken::new();
        cancel.cancel();
        let mut replay =
            Replay::from_script(&script, GameConfig::default(), FrameRecorder::new(), cancel)
                .unwrap();
        let outcome = replay.run(&script.commands).unwrap();

        assert!(outcome.cancelled);
        assert_eq!(outcome.commands_applied, 0);
        assert_eq!(outcome.frames, 0);
    }

    #[test]
    fn presenter_close_stops_between_commands() {
        let text = "game starts with 1 number robots per player\n\
                    B robot 1 in position [3,3]\n\
                    B robot 1 go down\n\
                    B robot 1 go down\n\
                    B robot 1 go down\n";
        let script = forklift_script::parse_str(text).unwrap();
        // the first command is an aligned move: exactly 10 frames
        let presenter = FrameRecorder::closing_after(5);
        let mut replay =
            Replay::from_script(&script, GameConfig::default(), presenter, CancelToken::new())
                .unwrap();
        let outcome = replay.run(&script.commands).unwrap();

        assert!(outcome.cancelled);
        assert_eq!(outcome.commands_applied, 1);
        assert_eq!(outcome.frames, 10);
        assert_eq!(
            replay.game().robot(RobotId(1)).unwrap().pos(),
            GridPos::new(3, 4).unwrap()
        );
    }

    #[test]
    fn command_for_undeclared_robot_faults() {
        let text = "game starts with 2 number robots per player\n\
                    R robot 1 in position [1,1]\n\
                    R robot 1 go right\n\
                    R robot 2 go right\n";
        let script = forklift_script::parse_str(text).unwrap();
        let mut replay = Replay::from_script(
            &script,
            GameConfig::default(),
            FrameRecorder::new(),
            CancelToken::new(),
        )
        .unwrap();
        let err = replay.run(&script.commands).unwrap_err();
        assert!(matches!(
            err,
            ReplayError::Command {
                seq: 1,
                source: GameError::UnknownRobot(RobotId(1))
            }
        ));
        assert_eq!(replay.game().commands_applied(), 1);
    }

    #[test]
    fn missing_script_is_a_script_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = run_script(
            dir.path().join("absent.log"),
            GameConfig::default(),
            FrameRecorder::new(),
            CancelToken::new(),
        );
        assert!(matches!(
            result,
            Err(ReplayError::Script(ScriptError::ResourceUnavailable { .. }))
        ));
    }

    #[test]
    fn malformed_header_is_a_script_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_script(&dir, "hello\nR robot 1 go up\n");
        let result = run_script(
            &path,
            GameConfig::default(),
            FrameRecorder::new(),
            CancelToken::new(),
        );
        assert!(matches!(
            result,
            Err(ReplayError::Script(ScriptError::MalformedInput(_)))
        ));
    }

    #[test]
    fn replays_are_deterministic() {
        let text = "game starts with 1 number robots per player\n\
                    R robot 1 in position [2,5]\n\
                    G robot 1 in position [6,5]\n\
                    R robot 1 go down\n\
                    G robot 1 go down\n\
                    R robot 1 go down\n\
                    G robot 1 go down\n\
                    R robot 1 go left\n\
                    G robot 1 go right\n";
        let script = forklift_script::parse_str(text).unwrap();
        let config = GameConfig {
            animation: AnimationConfig::atomic(),
            ..GameConfig::default()
        };

        let run = || {
            let mut replay =
                Replay::from_script(&script, config, FrameRecorder::new(), CancelToken::new())
                    .unwrap();
            let outcome = replay.run(&script.commands).unwrap();
            let (game, _) = replay.into_parts();
            (outcome, game.events().to_vec())
        };
        let (a, events_a) = run();
        let (b, events_b) = run();
        assert_eq!(a, b);
        assert_eq!(events_a, events_b);
        assert_eq!(
            events_a
                .iter()
                .filter(|e| matches!(e, GameEvent::PickedUp { .. }))
                .count(),
            2
        );
    }

    #[test]
    fn bundled_demo_replays_cleanly() {
        let path = concat!(env!("CARGO_MANIFEST_DIR"), "/../../demos/yard.log");
        let (replay, outcome) = run_script(
            path,
            GameConfig::default(),
            FrameRecorder::new(),
            CancelToken::new(),
        )
        .unwrap();
        assert!(!outcome.cancelled);
        assert_eq!(outcome.commands_applied as usize, outcome.commands_total);

        let count = |pred: fn(&GameEvent) -> bool| {
            replay.game().events().iter().filter(|e| pred(e)).count()
        };
        assert_eq!(count(|e| matches!(e, GameEvent::PickedUp { .. })), 3);
        assert_eq!(count(|e| matches!(e, GameEvent::DroppedOff { .. })), 2);
    }
}
