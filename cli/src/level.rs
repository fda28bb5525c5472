use clap::ValueEnum;
use sweeper_core::{CellCount, Coord, GameConfig, Result};

/// Named board presets.
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum Level {
    /// 2x1 with a single mine
    Debug,
    Beginner,
    Intermediate,
    Expert,
}

impl Level {
    /// `(width, height, mines)`
    pub const fn dimensions(self) -> (Coord, Coord, CellCount) {
        use Level::*;
        match self {
            Debug => (2, 1, 1),
            Beginner => (9, 9, 10),
            Intermediate => (16, 16, 40),
            Expert => (30, 16, 99),
        }
    }

    pub fn config(self) -> GameConfig {
        let (width, height, mines) = self.dimensions();
        GameConfig::new_unchecked((width, height), mines)
    }

    /// Preset with any of its dimensions replaced.
    pub fn config_with(
        self,
        width: Option<Coord>,
        height: Option<Coord>,
        mines: Option<CellCount>,
    ) -> Result<GameConfig> {
        let (preset_width, preset_height, preset_mines) = self.dimensions();
        GameConfig::new(
            (width.unwrap_or(preset_width), height.unwrap_or(preset_height)),
            mines.unwrap_or(preset_mines),
        )
    }

    pub fn parse(name: &str) -> Option<Self> {
        <Self as ValueEnum>::from_str(name, true).ok()
    }
}
