use alloc::collections::{BTreeMap, BTreeSet};
use serde::{Deserialize, Serialize};

use crate::*;

/// Owned copy of everything a presentation layer needs to draw the board.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub mine_count: CellCount,
    pub status: GameStatus,
    pub width: Coord,
    pub height: Coord,
    pub flagged: BTreeSet<Coord2>,
    #[serde(with = "entries")]
    pub revealed: BTreeMap<Coord2, CellDisplay>,
}

impl Snapshot {
    pub fn from_engine(engine: &GameEngine) -> Self {
        let (width, height) = engine.size();
        let mut flagged = BTreeSet::new();
        let mut revealed = BTreeMap::new();

        for x in 0..width {
            for y in 0..height {
                let coords = (x, y);
                if engine.is_flagged(coords) {
                    flagged.insert(coords);
                }
                if let Some(display) = engine.revealed_at(coords) {
                    revealed.insert(coords, display);
                }
            }
        }

        Self {
            mine_count: engine.mine_count(),
            status: engine.status(),
            width,
            height,
            flagged,
            revealed,
        }
    }

    pub fn size(&self) -> Coord2 {
        (self.width, self.height)
    }

    /// Can go negative only if a caller edits the copy.
    pub fn flags_left(&self) -> isize {
        (self.mine_count as isize) - (self.flagged.len() as isize)
    }

    pub fn display_at(&self, coords: Coord2) -> Option<CellDisplay> {
        self.revealed.get(&coords).copied()
    }

    pub fn is_flagged(&self, coords: Coord2) -> bool {
        self.flagged.contains(&coords)
    }
}

/// Coordinate keys are not strings, so the map goes over the wire as a list of pairs.
mod entries {
    use alloc::collections::BTreeMap;
    use alloc::vec::Vec;
    use serde::{Deserialize, Deserializer, Serializer};

    use crate::{CellDisplay, Coord2};

    pub fn serialize<S: Serializer>(
        map: &BTreeMap<Coord2, CellDisplay>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(map)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<BTreeMap<Coord2, CellDisplay>, D::Error> {
        let pairs = Vec::<(Coord2, CellDisplay)>::deserialize(deserializer)?;
        Ok(pairs.into_iter().collect())
    }
}
