use serde::{Deserialize, Serialize};

/// Interpolation granularity for robot maneuvers.
///
/// A count of zero makes the maneuver an atomic transition that emits no
/// frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnimationConfig {
    /// Frames per one-cell forward move.
    pub forward_substeps: u32,
    /// Frames per turn, whether quarter or half.
    pub turn_substeps: u32,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            forward_substeps: 10,
            turn_substeps: 9,
        }
    }
}

impl AnimationConfig {
    /// No interpolation at all; useful for headless replays.
    pub fn atomic() -> Self {
        Self {
            forward_substeps: 0,
            turn_substeps: 0,
        }
    }
}

/// When a station gets a fresh cargo unit as a robot leaves it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum RestockPolicy {
    /// Only refill an empty slot.
    #[default]
    WhenEmpty,
    /// Refill on every departure, discarding any unclaimed unit.
    OnVisit,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    pub animation: AnimationConfig,
    pub restock: RestockPolicy,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_board_animation() {
        let cfg = GameConfig::default();
        assert_eq!(cfg.animation.forward_substeps, 10);
        assert_eq!(cfg.animation.turn_substeps, 9);
        assert_eq!(cfg.restock, RestockPolicy::WhenEmpty);
    }
}
