//! Coarse 8×8 map of where subjects are in the frame.
//!
//! Suited to a small LED matrix or a terminal status line: each detection
//! lights the cell containing its box centre, and the active target is marked
//! distinctly from other subjects.

use serde::Serialize;

use crate::types::{Detection, FrameSize};

pub const GRID_SIZE: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Cell {
    #[default]
    Empty,
    Subject,
    Target,
}

impl Cell {
    pub fn symbol(self) -> char {
        match self {
            Self::Empty => '.',
            Self::Subject => 'o',
            Self::Target => 'X',
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct OverviewGrid {
    rows: [[Cell; GRID_SIZE]; GRID_SIZE],
}

impl OverviewGrid {
    /// Map `detections` in a frame of `frame` onto the grid.
    ///
    /// Only a detection whose id equals `active` is drawn as the target, so
    /// anonymous detections are always plain subjects. A target shares its
    /// cell with nobody: subjects never overwrite it.
    pub fn from_detections(frame: FrameSize, detections: &[Detection], active: Option<u32>) -> Self {
        let mut grid = Self::default();
        if frame.is_empty() {
            return grid;
        }

        for detection in detections.iter().filter(|d| d.bbox.is_valid()) {
            let (cx, cy) = detection.bbox.center();
            let col = grid_index(cx, frame.width);
            let row = grid_index(cy, frame.height);
            let is_target = active.is_some() && detection.id == active;

            if let Some(cell) = grid.rows.get_mut(row).and_then(|r| r.get_mut(col)) {
                if is_target {
                    *cell = Cell::Target;
                } else if *cell == Cell::Empty {
                    *cell = Cell::Subject;
                }
            }
        }
        grid
    }

    /// Cell at column `x`, row `y`.
    pub fn cell(&self, x: usize, y: usize) -> Option<Cell> {
        self.rows.get(y).and_then(|r| r.get(x)).copied()
    }

    pub fn count(&self, kind: Cell) -> usize {
        self.rows.iter().flatten().filter(|&&c| c == kind).count()
    }
}

impl std::fmt::Display for OverviewGrid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, row) in self.rows.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            for cell in row {
                write!(f, "{}", cell.symbol())?;
            }
        }
        Ok(())
    }
}

fn grid_index(position: f64, extent: u32) -> usize {
    let scaled = (position / f64::from(extent)) * GRID_SIZE as f64;
    scaled.floor().clamp(0.0, (GRID_SIZE - 1) as f64) as usize
}
