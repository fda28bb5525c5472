use serde::{Deserialize, Serialize};

/// What a cell holds, derived once from the mine layout.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldCell {
    /// No mine here and no mine around.
    Empty,
    /// Number of adjacent mines, always `1..=8`.
    Count(u8),
    Mine,
}

impl FieldCell {
    pub const fn is_mine(self) -> bool {
        matches!(self, Self::Mine)
    }
}

impl Default for FieldCell {
    fn default() -> Self {
        Self::Empty
    }
}

/// What a revealed cell shows to the player.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellDisplay {
    Empty,
    Count(u8),
    Mine,
    /// The mine that ended the game.
    ExplodedMine,
}

impl CellDisplay {
    pub const fn is_mine(self) -> bool {
        matches!(self, Self::Mine | Self::ExplodedMine)
    }
}

impl From<FieldCell> for CellDisplay {
    fn from(cell: FieldCell) -> Self {
        match cell {
            FieldCell::Empty => Self::Empty,
            FieldCell::Count(count) => Self::Count(count),
            FieldCell::Mine => Self::Mine,
        }
    }
}
