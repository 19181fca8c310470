use forklift_common::board::{BOARD_SIZE, DROPOFF_CELLS, STATION_CELLS, world_to_grid};
use forklift_common::GridPos;
use std::fmt;

use crate::scene::{DrawItem, DrawKind};

const SIDE: usize = BOARD_SIZE as usize;

/// ASCII top-down view of the board, built from draw calls.
///
/// Legend: `.` floor, `+` dropoff cell, `_` empty station, `#` waiting box,
/// lowercase color letter for an empty-handed robot, uppercase when carrying.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardSketch {
    cells: [[char; SIDE]; SIDE],
}

impl Default for BoardSketch {
    fn default() -> Self {
        Self::new()
    }
}

impl BoardSketch {
    pub fn new() -> Self {
        let mut cells = [['.'; SIDE]; SIDE];
        for c in DROPOFF_CELLS {
            cells[c.y() as usize][c.x() as usize] = '+';
        }
        for c in STATION_CELLS {
            cells[c.y() as usize][c.x() as usize] = '_';
        }
        Self { cells }
    }

    pub fn at(&self, pos: GridPos) -> char {
        self.cells[pos.y() as usize][pos.x() as usize]
    }

    /// Mark the cell under `item`. Robots must be placed before the cargo
    /// they carry, which is the scene's draw order.
    pub fn place(&mut self, item: &DrawItem) {
        let Some(pos) = world_to_grid(item.transform.position) else {
            return;
        };
        let cell = &mut self.cells[pos.y() as usize][pos.x() as usize];
        match item.kind {
            DrawKind::Board => {}
            DrawKind::Forklift(color) => *cell = color.letter().to_ascii_lowercase(),
            DrawKind::Cargo if cell.is_ascii_lowercase() => *cell = cell.to_ascii_uppercase(),
            DrawKind::Cargo => *cell = '#',
        }
    }
}

impl fmt::Display for BoardSketch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in &self.cells {
            let line: Vec<String> = row.iter().map(char::to_string).collect();
            writeln!(f, "{}", line.join(" "))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::compose;
    use forklift_common::{Placement, RobotColor, RobotId};
    use forklift_kernel::{Game, GameConfig};

    fn cell(x: i32, y: i32) -> GridPos {
        GridPos::new(x, y).unwrap()
    }

    fn sketch(game: &Game) -> BoardSketch {
        let mut s = BoardSketch::new();
        for item in compose(game) {
            s.place(&item);
        }
        s
    }

    #[test]
    fn empty_yard_shows_stocked_stations_and_dropoffs() {
        let s = sketch(&Game::new(GameConfig::default()));
        assert_eq!(s.at(cell(4, 7)), '#');
        assert_eq!(s.at(cell(0, 2)), '+');
        assert_eq!(s.at(cell(4, 4)), '.');
    }

    #[test]
    fn carrying_robot_is_uppercase() {
        let placements = [
            Placement {
                robot: RobotId(0),
                color: RobotColor::Green,
                at: cell(4, 6),
            },
            Placement {
                robot: RobotId(1),
                color: RobotColor::Blue,
                at: cell(1, 1),
            },
        ];
        let mut game = Game::with_placements(GameConfig::default(), &placements).unwrap();
        game.down(RobotId(0), &mut ()).unwrap();

        let s = sketch(&game);
        assert_eq!(s.at(cell(4, 7)), 'G');
        assert_eq!(s.at(cell(1, 1)), 'b');
        assert_eq!(s.at(cell(2, 7)), '#');
    }

    #[test]
    fn display_has_one_line_per_row() {
        let text = BoardSketch::new().to_string();
        assert_eq!(text.lines().count(), SIDE);
        assert!(text.lines().all(|l| l.split(' ').count() == SIDE));
    }
}
