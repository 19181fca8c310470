use forklift_common::board::STATION_CELLS;
use forklift_common::{
    CargoId, Command, Direction, GridPos, Placement, RobotColor, RobotId, StationId, Turn,
    is_dropoff, station_at,
};
use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::config::{GameConfig, RestockPolicy};
use crate::entities::{Robot, Station};

/// Receives the game state after every animation sub-step.
pub trait FrameSink {
    fn frame(&mut self, game: &Game);
}

/// Headless: frames are dropped.
impl FrameSink for () {
    fn frame(&mut self, _game: &Game) {}
}

/// Precondition faults raised by the state machine.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GameError {
    #[error("{0} was never placed on the board")]
    UnknownRobot(RobotId),
    #[error("{robot} at {from} cannot go {direction}: off the board")]
    OffBoard {
        robot: RobotId,
        from: GridPos,
        direction: Direction,
    },
    #[error("{0} is already on the board")]
    DuplicateRobot(RobotId),
}

/// A record of every logical mutation, in the order it happened.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    Placed {
        robot: RobotId,
        color: RobotColor,
        at: GridPos,
    },
    Turned {
        robot: RobotId,
        from: Direction,
        to: Direction,
        turn: Turn,
    },
    Moved {
        robot: RobotId,
        from: GridPos,
        to: GridPos,
    },
    /// A station got a fresh unit. `replaced` is an unclaimed unit that was
    /// thrown away to make room.
    Restocked {
        station: StationId,
        cargo: CargoId,
        replaced: Option<CargoId>,
    },
    /// The robot now holds whatever the station held, `None` for an empty
    /// slot. `discarded` is the unit it was carrying before, if any.
    PickedUp {
        robot: RobotId,
        station: StationId,
        cargo: Option<CargoId>,
        discarded: Option<CargoId>,
    },
    DroppedOff {
        robot: RobotId,
        cargo: CargoId,
        at: GridPos,
    },
}

/// The authoritative game state.
///
/// Robots are keyed by their dense index in a BTreeMap, so iteration (and
/// therefore draw order and hashing) follows robot index.
#[derive(Debug, Clone)]
pub struct Game {
    config: GameConfig,
    robots: BTreeMap<RobotId, Robot>,
    stations: [Station; 3],
    next_cargo: u64,
    commands_applied: u64,
    frames: u64,
    events: Vec<GameEvent>,
}

impl Game {
    /// Empty board with all three stations stocked.
    pub fn new(config: GameConfig) -> Self {
        let stations = std::array::from_fn(|i| Station::stocked(StationId(i), CargoId(i as u64)));
        Self {
            config,
            robots: BTreeMap::new(),
            stations,
            next_cargo: STATION_CELLS.len() as u64,
            commands_applied: 0,
            frames: 0,
            events: Vec::new(),
        }
    }

    /// Board populated from script placements.
    pub fn with_placements(
        config: GameConfig,
        placements: &[Placement],
    ) -> Result<Self, GameError> {
        let mut game = Self::new(config);
        for placement in placements {
            game.place_robot(*placement)?;
        }
        Ok(game)
    }

    pub fn place_robot(&mut self, placement: Placement) -> Result<(), GameError> {
        if self.robots.contains_key(&placement.robot) {
            return Err(GameError::DuplicateRobot(placement.robot));
        }
        self.robots.insert(placement.robot, Robot::new(placement));
        self.events.push(GameEvent::Placed {
            robot: placement.robot,
            color: placement.color,
            at: placement.at,
        });
        tracing::debug!(robot = %placement.robot, at = %placement.at, "robot placed");
        Ok(())
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn robot(&self, id: RobotId) -> Option<&Robot> {
        self.robots.get(&id)
    }

    /// Robots in index order.
    pub fn robots(&self) -> impl Iterator<Item = &Robot> {
        self.robots.values()
    }

    pub fn robot_count(&self) -> usize {
        self.robots.len()
    }

    pub fn stations(&self) -> &[Station] {
        &self.stations
    }

    pub fn commands_applied(&self) -> u64 {
        self.commands_applied
    }

    /// Frames emitted so far across all commands.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn up<S: FrameSink + ?Sized>(
        &mut self,
        id: RobotId,
        sink: &mut S,
    ) -> Result<(), GameError> {
        self.apply_command(Command::new(id, Direction::Up), sink)
    }

    pub fn down<S: FrameSink + ?Sized>(
        &mut self,
        id: RobotId,
        sink: &mut S,
    ) -> Result<(), GameError> {
        self.apply_command(Command::new(id, Direction::Down), sink)
    }

    pub fn left<S: FrameSink + ?Sized>(
        &mut self,
        id: RobotId,
        sink: &mut S,
    ) -> Result<(), GameError> {
        self.apply_command(Command::new(id, Direction::Left), sink)
    }

    pub fn right<S: FrameSink + ?Sized>(
        &mut self,
        id: RobotId,
        sink: &mut S,
    ) -> Result<(), GameError> {
        self.apply_command(Command::new(id, Direction::Right), sink)
    }

    /// Run one command to completion: turn, drive, restock the cell being
    /// left, commit the move, then pickup and dropoff at the new cell.
    ///
    /// A move off the board is rejected before anything changes.
    pub fn apply_command<S: FrameSink + ?Sized>(
        &mut self,
        command: Command,
        sink: &mut S,
    ) -> Result<(), GameError> {
        let Command { robot: id, direction } = command;
        let from = self.require(id)?.pos();
        let to = from.step(direction).ok_or(GameError::OffBoard {
            robot: id,
            from,
            direction,
        })?;
        let _span = tracing::debug_span!("command", robot = id.0, %direction).entered();

        self.reorient(id, direction, sink)?;
        self.drive_forward(id, sink)?;
        self.restock(from);
        self.commit_move(id, from, to)?;
        self.pickup(id, to, sink)?;
        self.dropoff(id, to)?;

        self.commands_applied += 1;
        tracing::debug!(%from, %to, "command applied");
        Ok(())
    }

    fn require(&self, id: RobotId) -> Result<&Robot, GameError> {
        self.robots.get(&id).ok_or(GameError::UnknownRobot(id))
    }

    fn require_mut(&mut self, id: RobotId) -> Result<&mut Robot, GameError> {
        self.robots.get_mut(&id).ok_or(GameError::UnknownRobot(id))
    }

    fn emit_frame<S: FrameSink + ?Sized>(&mut self, sink: &mut S) {
        self.frames += 1;
        tracing::trace!(frame = self.frames, "frame");
        sink.frame(self);
    }

    /// Turn in place to face `target`, one interpolated maneuver at most.
    fn reorient<S: FrameSink + ?Sized>(
        &mut self,
        id: RobotId,
        target: Direction,
        sink: &mut S,
    ) -> Result<(), GameError> {
        let from = self.require(id)?.orientation();
        let turn = Turn::resolve(from, target);
        if turn == Turn::None {
            return Ok(());
        }

        let steps = self.config.animation.turn_substeps;
        if steps > 0 {
            let increment = turn.angle() / steps as f32;
            for _ in 0..steps {
                self.require_mut(id)?.transform_mut().rotate_y(increment);
                self.emit_frame(sink);
            }
        }

        let robot = self.require_mut(id)?;
        robot.set_orientation(turn.apply(from));
        robot.settle();
        self.events.push(GameEvent::Turned {
            robot: id,
            from,
            to: target,
            turn,
        });
        Ok(())
    }

    /// Animate one cell of travel along the current facing. Logical position
    /// is untouched here; see `commit_move`.
    fn drive_forward<S: FrameSink + ?Sized>(
        &mut self,
        id: RobotId,
        sink: &mut S,
    ) -> Result<(), GameError> {
        let steps = self.config.animation.forward_substeps;
        if steps == 0 {
            return Ok(());
        }
        let increment = Vec3::Z / steps as f32;
        for _ in 0..steps {
            self.require_mut(id)?.transform_mut().translate_local(increment);
            self.emit_frame(sink);
        }
        Ok(())
    }

    fn commit_move(&mut self, id: RobotId, from: GridPos, to: GridPos) -> Result<(), GameError> {
        let robot = self.require_mut(id)?;
        robot.set_pos(to);
        robot.settle();
        self.events.push(GameEvent::Moved { robot: id, from, to });
        Ok(())
    }

    fn alloc_cargo(&mut self) -> CargoId {
        let id = CargoId(self.next_cargo);
        self.next_cargo += 1;
        id
    }

    /// Refill the station under `cell` as a robot leaves it.
    fn restock(&mut self, cell: GridPos) {
        let Some(station) = station_at(cell) else {
            return;
        };
        if self.config.restock == RestockPolicy::WhenEmpty && !self.stations[station.0].is_empty() {
            return;
        }
        let cargo = self.alloc_cargo();
        let replaced = self.stations[station.0].refill(cargo);
        if let Some(old) = replaced {
            tracing::debug!(station = station.0, cargo = old.0, "unclaimed cargo replaced");
        }
        tracing::debug!(station = station.0, cargo = cargo.0, "station restocked");
        self.events.push(GameEvent::Restocked {
            station,
            cargo,
            replaced,
        });
    }

    /// On a station cell: face DOWN, then swap in the station's slot, empty or not.
    fn pickup<S: FrameSink + ?Sized>(
        &mut self,
        id: RobotId,
        at: GridPos,
        sink: &mut S,
    ) -> Result<(), GameError> {
        let Some(station) = station_at(at) else {
            return Ok(());
        };
        self.reorient(id, Direction::Down, sink)?;

        let cargo = self.stations[station.0].take();
        let discarded = self.require_mut(id)?.load(cargo);
        if cargo.is_none() && discarded.is_none() {
            tracing::debug!(station = station.0, "station empty, nothing to pick up");
            return Ok(());
        }
        match cargo {
            Some(c) => tracing::debug!(station = station.0, cargo = c.0, "cargo picked up"),
            None => tracing::debug!(station = station.0, "station empty, carried cargo lost"),
        }
        self.events.push(GameEvent::PickedUp {
            robot: id,
            station,
            cargo,
            discarded,
        });
        Ok(())
    }

    /// On a dropoff cell: release whatever is carried.
    fn dropoff(&mut self, id: RobotId, at: GridPos) -> Result<(), GameError> {
        if !is_dropoff(at) {
            return Ok(());
        }
        if let Some(cargo) = self.require_mut(id)?.unload() {
            tracing::debug!(cargo = cargo.0, %at, "cargo dropped off");
            self.events.push(GameEvent::DroppedOff {
                robot: id,
                cargo,
                at,
            });
        }
        Ok(())
    }

    /// Deterministic hash of the logical state (FNV-1a). Animation poses and
    /// frame counts are excluded, so the same commands hash the same under
    /// any `AnimationConfig`.
    pub fn state_hash(&self) -> u64 {
        let mut h: u64 = 0xcbf2_9ce4_8422_2325;
        let mix = |h: &mut u64, bytes: &[u8]| {
            for &b in bytes {
                *h ^= b as u64;
                *h = h.wrapping_mul(0x0100_0000_01b3);
            }
        };
        let cargo_bytes = |c: Option<CargoId>| c.map_or(u64::MAX, |c| c.0).to_le_bytes();

        mix(&mut h, &self.commands_applied.to_le_bytes());
        mix(&mut h, &self.next_cargo.to_le_bytes());
        for (id, robot) in &self.robots {
            mix(&mut h, &(id.0 as u64).to_le_bytes());
            mix(&mut h, &robot.pos().x().to_le_bytes());
            mix(&mut h, &robot.pos().y().to_le_bytes());
            mix(&mut h, &[robot.orientation() as u8]);
            mix(&mut h, &cargo_bytes(robot.cargo()));
        }
        for station in &self.stations {
            mix(&mut h, &cargo_bytes(station.cargo()));
        }
        h
    }
}
