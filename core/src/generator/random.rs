use rand::prelude::*;

use super::*;

/// Uniform placement driven by a seeded `SmallRng`, so a seed always reproduces the same board.
#[derive(Clone, Debug, PartialEq)]
pub struct RandomMineGenerator {
    seed: u64,
}

impl RandomMineGenerator {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl MineGenerator for RandomMineGenerator {
    fn generate(self, config: GameConfig) -> MineLayout {
        let mut rng = SmallRng::seed_from_u64(self.seed);
        generate_mines(config, &mut rng)
    }
}

/// Samples uniformly random cells until `config.mines` distinct cells hold a mine, resampling on collision.
pub fn generate_mines<R: Rng + ?Sized>(config: GameConfig, rng: &mut R) -> MineLayout {
    let total_cells = config.total_cells();
    let wanted = config.mines.min(total_cells);
    let (size_x, size_y) = config.size;
    let mut layout = MineLayout::empty(config.size);

    // optimize for full boards
    if wanted == total_cells {
        for y in 0..size_y {
            for x in 0..size_x {
                layout.insert((x, y));
            }
        }
        return layout;
    }

    let mut collisions = 0u32;
    while layout.mine_count() < wanted {
        let coords = (rng.random_range(0..size_x), rng.random_range(0..size_y));
        if !layout.insert(coords) {
            collisions += 1;
        }
    }
    log::trace!(
        "Placed {} mines on {}x{}, {} collisions resampled",
        wanted,
        size_x,
        size_y,
        collisions
    );

    layout
}
