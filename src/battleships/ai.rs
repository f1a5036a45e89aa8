//! Hunt/target opponent
//!
//! Hunt mode fires at random untried cells. A hit that does not sink pushes
//! the hit cell's untried orthogonal neighbours onto a stack, and target
//! mode pops from that stack until it runs dry. The stack is deliberately
//! left alone when a ship sinks, so leftover candidates around a sunk ship
//! still get probed later.

use crate::battleships::board::{Board, Grid, ShotOutcome};
use crate::core::types::Coord;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Which rule picked the last target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AiMode {
    Hunt,
    Target,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HuntTargetAi {
    candidates: Vec<Coord>,
}

impl HuntTargetAi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn candidates(&self) -> &[Coord] {
        &self.candidates
    }

    /// Pick the next cell to fire at on `grid`.
    ///
    /// Candidates that were hit since they were pushed are skipped. Hunt
    /// mode makes `attempts` random picks, then falls back to the first
    /// untried cell in row order. None only when every cell has been hit.
    pub fn choose_target<R: Rng + ?Sized>(
        &mut self,
        grid: &Grid,
        rng: &mut R,
        attempts: u32,
    ) -> Option<(Coord, AiMode)> {
        while let Some(candidate) = self.candidates.pop() {
            if candidate.in_bounds(grid.size()) && !grid.is_hit(candidate) {
                return Some((candidate, AiMode::Target));
            }
        }

        let size = grid.size();
        for _ in 0..attempts {
            let pick = Coord::new(rng.gen_range(0..size), rng.gen_range(0..size));
            if !grid.is_hit(pick) {
                return Some((pick, AiMode::Hunt));
            }
        }
        grid.untried().next().map(|c| (c, AiMode::Hunt))
    }

    /// Learn from the result of a shot at `target`
    pub fn observe(&mut self, grid: &Grid, target: Coord, outcome: ShotOutcome) {
        if let ShotOutcome::Hit(_) = outcome {
            for neighbor in target.neighbors(grid.size()) {
                if !grid.is_hit(neighbor) {
                    self.candidates.push(neighbor);
                }
            }
        }
    }

    /// Learn from a batch of cells resolved at once, such as a barrage.
    ///
    /// Each cell's outcome is read back from `board`; cells not yet hit
    /// are skipped.
    pub fn observe_area(&mut self, board: &Board, cells: &[Coord]) {
        let grid = board.grid();
        for &at in cells {
            let Some(cell) = grid.cell(at).filter(|c| c.hit) else {
                continue;
            };
            let outcome = match cell.ship {
                Some(id) if board.ship(id).is_some_and(|s| s.sunk) => ShotOutcome::Sunk(id),
                Some(id) => ShotOutcome::Hit(id),
                None => ShotOutcome::Miss,
            };
            self.observe(grid, at, outcome);
        }
    }
}
