//! Grid, ship and fleet model for one side of a Battleships game
//!
//! Invariants the rest of the engine relies on:
//! - a cell's `hit` flag is only ever set, never cleared
//! - a ship is `sunk` exactly when `hit_count >= size`
//! - no two ships share a cell

use crate::core::types::Coord;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Index of a ship within its fleet
pub type ShipId = usize;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    pub ship: Option<ShipId>,
    pub hit: bool,
}

impl Cell {
    pub fn occupied(&self) -> bool {
        self.ship.is_some()
    }
}

/// Where a ship sits: its top-left cell and orientation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placement {
    pub origin: Coord,
    pub horizontal: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ship {
    pub id: ShipId,
    pub size: usize,
    pub hit_count: usize,
    pub sunk: bool,
    /// None until placed, or if automatic placement gave up on it
    pub placement: Option<Placement>,
}

impl Ship {
    pub fn new(id: ShipId, size: usize) -> Self {
        Self {
            id,
            size,
            hit_count: 0,
            sunk: false,
            placement: None,
        }
    }

    /// Cells covered by the ship's current placement
    pub fn cells(&self) -> Vec<Coord> {
        match self.placement {
            Some(p) => (0..self.size).map(|i| p.origin.step(p.horizontal, i)).collect(),
            None => Vec::new(),
        }
    }

    pub fn is_placed(&self) -> bool {
        self.placement.is_some()
    }

    /// Count one hit. Returns true if this hit sank the ship.
    fn register_hit(&mut self) -> bool {
        let was_sunk = self.sunk;
        self.hit_count += 1;
        self.sunk = self.hit_count >= self.size;
        self.sunk && !was_sunk
    }
}

/// Result of firing at a single cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShotOutcome {
    /// Out of bounds or already hit: nothing changed
    Ignored,
    Miss,
    Hit(ShipId),
    Sunk(ShipId),
}

impl ShotOutcome {
    pub fn is_hit(&self) -> bool {
        matches!(self, ShotOutcome::Hit(_) | ShotOutcome::Sunk(_))
    }

    pub fn consumed(&self) -> bool {
        !matches!(self, ShotOutcome::Ignored)
    }
}

/// Square matrix of cells
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    size: usize,
    cells: Vec<Cell>,
}

impl Grid {
    pub fn new(size: usize) -> Self {
        Self {
            size,
            cells: vec![Cell::default(); size * size],
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    #[inline]
    pub fn cell(&self, at: Coord) -> Option<&Cell> {
        if at.in_bounds(self.size) {
            Some(&self.cells[at.row * self.size + at.col])
        } else {
            None
        }
    }

    #[inline]
    fn cell_mut(&mut self, at: Coord) -> Option<&mut Cell> {
        if at.in_bounds(self.size) {
            Some(&mut self.cells[at.row * self.size + at.col])
        } else {
            None
        }
    }

    pub fn is_hit(&self, at: Coord) -> bool {
        self.cell(at).is_some_and(|c| c.hit)
    }

    /// All coordinates, row by row
    pub fn coords(&self) -> impl Iterator<Item = Coord> {
        let size = self.size;
        (0..size).flat_map(move |row| (0..size).map(move |col| Coord::new(row, col)))
    }

    /// Would a run of `length` cells from `origin` fit?
    ///
    /// Every cell must be in bounds and either empty or already owned by
    /// `exclude` (the ship being moved).
    pub fn can_place(
        &self,
        origin: Coord,
        length: usize,
        horizontal: bool,
        exclude: Option<ShipId>,
    ) -> bool {
        if length == 0 {
            return false;
        }
        (0..length).all(|i| match self.cell(origin.step(horizontal, i)) {
            Some(cell) => cell.ship.is_none() || cell.ship == exclude,
            None => false,
        })
    }

    pub fn untried(&self) -> impl Iterator<Item = Coord> + '_ {
        self.coords().filter(move |&c| !self.is_hit(c))
    }
}

/// One side's grid plus the fleet sitting on it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    grid: Grid,
    ships: Vec<Ship>,
}

impl Board {
    /// Empty grid with an unplaced fleet; sizes are clamped to fit the grid
    pub fn new(size: usize, ship_sizes: &[usize]) -> Self {
        let ships = ship_sizes
            .iter()
            .enumerate()
            .map(|(id, &len)| Ship::new(id, len.clamp(1, size.max(1))))
            .collect();
        Self {
            grid: Grid::new(size),
            ships,
        }
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn size(&self) -> usize {
        self.grid.size
    }

    pub fn ships(&self) -> &[Ship] {
        &self.ships
    }

    pub fn ship(&self, id: ShipId) -> Option<&Ship> {
        self.ships.get(id)
    }

    pub fn can_place(
        &self,
        origin: Coord,
        length: usize,
        horizontal: bool,
        exclude: Option<ShipId>,
    ) -> bool {
        self.grid.can_place(origin, length, horizontal, exclude)
    }

    /// Stamp a ship at a new position without validating it.
    ///
    /// The ship's previous footprint is cleared first. Callers validate
    /// with `can_place` beforehand; cells off the grid are skipped.
    pub fn place(&mut self, id: ShipId, origin: Coord, horizontal: bool) {
        let Some(ship) = self.ships.get(id) else {
            return;
        };
        let old_cells = ship.cells();
        let size = ship.size;

        for at in old_cells {
            if let Some(cell) = self.grid.cell_mut(at) {
                if cell.ship == Some(id) {
                    cell.ship = None;
                }
            }
        }
        for i in 0..size {
            if let Some(cell) = self.grid.cell_mut(origin.step(horizontal, i)) {
                cell.ship = Some(id);
            }
        }
        self.ships[id].placement = Some(Placement { origin, horizontal });
    }

    /// Validate then place. Returns false and changes nothing if it won't fit.
    pub fn try_place(&mut self, id: ShipId, origin: Coord, horizontal: bool) -> bool {
        let Some(size) = self.ships.get(id).map(|s| s.size) else {
            return false;
        };
        if !self.can_place(origin, size, horizontal, Some(id)) {
            return false;
        }
        self.place(id, origin, horizontal);
        true
    }

    /// Remove every ship from the grid
    fn clear_placements(&mut self) {
        for cell in &mut self.grid.cells {
            cell.ship = None;
        }
        for ship in &mut self.ships {
            ship.placement = None;
        }
    }

    /// Place the whole fleet at random, ship by ship.
    ///
    /// Each ship gets up to `attempts` uniformly random tries. A ship that
    /// never fits is left unplaced; earlier ships are not moved to make
    /// room. Returns how many ships were left unplaced.
    pub fn auto_place<R: Rng + ?Sized>(&mut self, rng: &mut R, attempts: u32) -> usize {
        self.clear_placements();
        let size = self.grid.size;
        let mut unplaced = 0;

        for id in 0..self.ships.len() {
            let len = self.ships[id].size;
            let mut placed = false;
            for _ in 0..attempts {
                let horizontal: bool = rng.gen();
                let (max_row, max_col) = if horizontal {
                    (size, size + 1 - len)
                } else {
                    (size + 1 - len, size)
                };
                let origin = Coord::new(rng.gen_range(0..max_row), rng.gen_range(0..max_col));
                if self.can_place(origin, len, horizontal, Some(id)) {
                    self.place(id, origin, horizontal);
                    placed = true;
                    break;
                }
            }
            if !placed {
                tracing::warn!(
                    ship = id,
                    size = len,
                    "Ship could not be placed, leaving it off the board"
                );
                unplaced += 1;
            }
        }
        unplaced
    }

    /// Fire at one cell, updating the cell and any ship on it
    pub fn fire_at(&mut self, at: Coord) -> ShotOutcome {
        let Some(cell) = self.grid.cell_mut(at) else {
            return ShotOutcome::Ignored;
        };
        if cell.hit {
            return ShotOutcome::Ignored;
        }
        cell.hit = true;
        match cell.ship {
            Some(id) => {
                if self.ships[id].register_hit() {
                    ShotOutcome::Sunk(id)
                } else {
                    ShotOutcome::Hit(id)
                }
            }
            None => ShotOutcome::Miss,
        }
    }

    /// Square of cells within `radius` of `center`, clipped to the grid
    pub fn area(&self, center: Coord, radius: usize) -> Vec<Coord> {
        let size = self.grid.size;
        if !center.in_bounds(size) {
            return Vec::new();
        }
        let rows = center.row.saturating_sub(radius)..=(center.row + radius).min(size - 1);
        rows.flat_map(|row| {
            let cols = center.col.saturating_sub(radius)..=(center.col + radius).min(size - 1);
            cols.map(move |col| Coord::new(row, col))
        })
        .collect()
    }

    /// True once every placed ship is sunk (and at least one was placed)
    pub fn all_sunk(&self) -> bool {
        let mut placed = self.ships.iter().filter(|s| s.is_placed()).peekable();
        placed.peek().is_some() && placed.all(|s| s.sunk)
    }

    pub fn ships_remaining(&self) -> usize {
        self.ships
            .iter()
            .filter(|s| s.is_placed() && !s.sunk)
            .count()
    }

    /// Ship cells that have not been hit yet
    pub fn untouched_ship_cells(&self) -> Vec<Coord> {
        self.grid
            .coords()
            .filter(|&c| self.grid.cell(c).is_some_and(|cell| cell.occupied() && !cell.hit))
            .collect()
    }
}
