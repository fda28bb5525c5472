#![no_std]

extern crate alloc;

use alloc::vec::Vec;
use core::ops::Index;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

pub use engine::*;
pub use error::*;
pub use generator::*;
pub use snapshot::*;
pub use tile::*;
pub use types::*;

mod engine;
mod error;
mod generator;
mod snapshot;
mod tile;
mod types;

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    pub size: Coord2,
    pub mines: CellCount,
}

impl GameConfig {
    pub const fn new_unchecked(size: Coord2, mines: CellCount) -> Self {
        Self { size, mines }
    }

    /// Zero-sized boards are rejected, mine counts above the cell count are clamped.
    pub fn new((size_x, size_y): Coord2, mines: CellCount) -> Result<Self> {
        if size_x == 0 || size_y == 0 {
            return Err(GameError::EmptyBoard);
        }
        let total_cells = mult(size_x, size_y);
        if mines > total_cells {
            log::warn!(
                "Requested {} mines but the board only fits {}, clamping",
                mines,
                total_cells
            );
        }
        Ok(Self::new_unchecked((size_x, size_y), mines.min(total_cells)))
    }

    pub const fn total_cells(&self) -> CellCount {
        mult(self.size.0, self.size.1)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MineLayout {
    mine_mask: Array2<bool>,
    /// Mine coordinates in placement order, without duplicates.
    mines: Vec<Coord2>,
}

impl MineLayout {
    /// Builds a layout from explicit coordinates, repeated coordinates count once.
    pub fn from_mine_coords(size: Coord2, mine_coords: &[Coord2]) -> Result<Self> {
        if size.0 == 0 || size.1 == 0 {
            return Err(GameError::EmptyBoard);
        }

        let mut layout = Self::empty(size);
        for &coords in mine_coords {
            if !in_bounds(coords, size) {
                return Err(GameError::InvalidLayout);
            }
            layout.insert(coords);
        }

        Ok(layout)
    }

    pub(crate) fn empty(size: Coord2) -> Self {
        Self {
            mine_mask: Array2::default(size.to_nd_index()),
            mines: Vec::new(),
        }
    }

    /// Places a mine, returns `false` when the cell already had one.
    pub(crate) fn insert(&mut self, coords: Coord2) -> bool {
        let cell = &mut self.mine_mask[coords.to_nd_index()];
        if *cell {
            return false;
        }
        *cell = true;
        self.mines.push(coords);
        true
    }

    pub fn game_config(&self) -> GameConfig {
        GameConfig::new_unchecked(self.size(), self.mine_count())
    }

    pub fn validate_coords(&self, coords: Coord2) -> Result<Coord2> {
        if in_bounds(coords, self.size()) {
            Ok(coords)
        } else {
            Err(GameError::InvalidCoords)
        }
    }

    pub fn size(&self) -> Coord2 {
        let (x, y) = self.mine_mask.dim();
        (x as Coord, y as Coord)
    }

    pub fn safe_cell_count(&self) -> CellCount {
        self.total_cells() - self.mine_count()
    }

    pub fn total_cells(&self) -> CellCount {
        mult(self.size().0, self.size().1)
    }

    pub fn mine_count(&self) -> CellCount {
        // bounded by `total_cells`, which fits a `CellCount`
        self.mines.len() as CellCount
    }

    pub fn mines(&self) -> &[Coord2] {
        &self.mines
    }

    pub fn contains_mine(&self, coords: Coord2) -> bool {
        self[coords]
    }

    pub fn adjacent_mine_count(&self, coords: Coord2) -> u8 {
        self.iter_neighbors(coords).filter(|&pos| self[pos]).count() as u8
    }

    /// Derives the content of every cell: mines stay mines, every other cell
    /// counts the mines among its in-bounds neighbors.
    pub fn build_field(&self) -> Array2<FieldCell> {
        let mut counts: Array2<u8> = Array2::default(self.mine_mask.dim());

        for &mine in &self.mines {
            for pos in self.iter_neighbors(mine) {
                if !self[pos] {
                    counts[pos.to_nd_index()] += 1;
                }
            }
        }

        Array2::from_shape_fn(self.mine_mask.dim(), |(x, y)| {
            match (self.mine_mask[(x, y)], counts[(x, y)]) {
                (true, _) => FieldCell::Mine,
                (false, 0) => FieldCell::Empty,
                (false, count) => FieldCell::Count(count),
            }
        })
    }

    pub(crate) fn iter_neighbors(&self, coords: Coord2) -> NeighborIter {
        self.mine_mask.iter_neighbors(coords)
    }
}

impl Index<Coord2> for MineLayout {
    type Output = bool;

    fn index(&self, (x, y): Coord2) -> &Self::Output {
        &self.mine_mask[(x as usize, y as usize)]
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum FlagOutcome {
    NoChange,
    Changed,
    /// The flag completed the board.
    Won,
}

impl FlagOutcome {
    /// Whether this outcome could have caused an update to the game
    pub const fn has_update(self) -> bool {
        match self {
            Self::NoChange => false,
            Self::Changed => true,
            Self::Won => true,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum RevealOutcome {
    NoChange,
    Revealed,
    HitMine,
    Won,
}

impl RevealOutcome {
    /// Whether this outcome could have caused an update to the game
    pub const fn has_update(self) -> bool {
        use RevealOutcome::*;
        match self {
            NoChange => false,
            Revealed => true,
            HitMine => true,
            Won => true,
        }
    }
}
