use alloc::vec::Vec;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

/// Valid transitions:
/// - Started -> Won
/// - Started -> Lost
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameStatus {
    Started,
    Won,
    Lost,
}

impl GameStatus {
    pub const fn is_started(self) -> bool {
        matches!(self, Self::Started)
    }

    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

impl Default for GameStatus {
    fn default() -> Self {
        Self::Started
    }
}

/// Represents a game from the first move until it is won or lost.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameEngine {
    mine_layout: MineLayout,
    field: Array2<FieldCell>,
    revealed: Array2<Option<CellDisplay>>,
    flagged: Array2<bool>,
    /// Only counts safe cells, mines shown after a loss are not included.
    revealed_count: CellCount,
    flagged_count: CellCount,
    status: GameStatus,
}

impl GameEngine {
    /// New game with mines placed by the thread-local random generator.
    pub fn new(width: Coord, height: Coord, mine_count: CellCount) -> Result<Self> {
        let config = GameConfig::new((width, height), mine_count)?;
        Ok(Self::from_layout(generate_mines(config, &mut rand::rng())))
    }

    pub fn with_generator(config: GameConfig, generator: impl MineGenerator) -> Self {
        Self::from_layout(generator.generate(config))
    }

    pub fn from_layout(mine_layout: MineLayout) -> Self {
        let size = mine_layout.size();
        let field = mine_layout.build_field();
        log::debug!(
            "New game {}x{} with {} mines",
            size.0,
            size.1,
            mine_layout.mine_count()
        );
        Self {
            mine_layout,
            field,
            revealed: Array2::from_elem(size.to_nd_index(), None),
            flagged: Array2::from_elem(size.to_nd_index(), false),
            revealed_count: 0,
            flagged_count: 0,
            status: Default::default(),
        }
    }

    /// Discards the whole game for a fresh one; on error the current game is kept.
    pub fn reset(&mut self, width: Coord, height: Coord, mine_count: CellCount) -> Result<()> {
        *self = Self::new(width, height, mine_count)?;
        Ok(())
    }

    pub fn reset_with(&mut self, config: GameConfig, generator: impl MineGenerator) {
        *self = Self::with_generator(config, generator);
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn is_finished(&self) -> bool {
        self.status.is_finished()
    }

    pub fn size(&self) -> Coord2 {
        self.mine_layout.size()
    }

    pub fn mine_count(&self) -> CellCount {
        self.mine_layout.mine_count()
    }

    pub fn flagged_count(&self) -> CellCount {
        self.flagged_count
    }

    /// How many mines have not been flagged yet
    pub fn flags_left(&self) -> isize {
        (self.mine_count() as isize) - (self.flagged_count as isize)
    }

    pub fn revealed_at(&self, coords: Coord2) -> Option<CellDisplay> {
        self.revealed[coords.to_nd_index()]
    }

    pub fn is_flagged(&self, coords: Coord2) -> bool {
        self.flagged[coords.to_nd_index()]
    }

    pub fn content_at(&self, coords: Coord2) -> FieldCell {
        self.field[coords.to_nd_index()]
    }

    pub fn mine_layout(&self) -> &MineLayout {
        &self.mine_layout
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot::from_engine(self)
    }

    /// Reveal a cell; empty cells open their whole empty region and its numbered border.
    ///
    /// Revealed cells, and any cell once the game is over, are left alone. Flags do not protect a cell.
    pub fn reveal(&mut self, coords: Coord2) -> Result<RevealOutcome> {
        let coords = self.mine_layout.validate_coords(coords)?;
        let index = coords.to_nd_index();

        if !self.status.is_started() || self.revealed[index].is_some() {
            return Ok(RevealOutcome::NoChange);
        }

        if self.field[index].is_mine() {
            self.explode(coords);
            return Ok(RevealOutcome::HitMine);
        }

        self.flood_fill(coords);

        Ok(if self.update_status_if_won() {
            RevealOutcome::Won
        } else {
            RevealOutcome::Revealed
        })
    }

    /// Toggle a flag, new flags are limited to the number of mines.
    pub fn flag(&mut self, coords: Coord2) -> Result<FlagOutcome> {
        let coords = self.mine_layout.validate_coords(coords)?;
        let index = coords.to_nd_index();

        if !self.status.is_started() || self.revealed[index].is_some() {
            return Ok(FlagOutcome::NoChange);
        }

        if self.flagged[index] {
            self.flagged[index] = false;
            self.flagged_count -= 1;
        } else if self.flagged_count >= self.mine_count() {
            log::debug!("No flags left for {:?}", coords);
            return Ok(FlagOutcome::NoChange);
        } else {
            self.flagged[index] = true;
            self.flagged_count += 1;
        }

        Ok(if self.update_status_if_won() {
            FlagOutcome::Won
        } else {
            FlagOutcome::Changed
        })
    }

    fn flood_fill(&mut self, start: Coord2) {
        let mut to_visit = Vec::from([start]);

        while let Some(visit_coords) = to_visit.pop() {
            let index = visit_coords.to_nd_index();
            if self.revealed[index].is_some() {
                continue;
            }

            match self.field[index] {
                FieldCell::Empty => {
                    self.open(visit_coords, CellDisplay::Empty);
                    to_visit.extend(
                        self.mine_layout
                            .iter_neighbors(visit_coords)
                            .filter(|&pos| self.revealed[pos.to_nd_index()].is_none()),
                    );
                }
                FieldCell::Count(count) => self.open(visit_coords, CellDisplay::Count(count)),
                // only reachable through a count, which stops the fill
                FieldCell::Mine => {}
            }
        }
    }

    fn open(&mut self, coords: Coord2, display: CellDisplay) {
        let index = coords.to_nd_index();
        self.revealed[index] = Some(display);
        self.revealed_count += 1;
        log::trace!("Opened {:?} as {:?}", coords, display);
    }

    fn explode(&mut self, coords: Coord2) {
        self.status = GameStatus::Lost;
        for &mine in self.mine_layout.mines() {
            self.revealed[mine.to_nd_index()] = Some(CellDisplay::Mine);
        }
        self.revealed[coords.to_nd_index()] = Some(CellDisplay::ExplodedMine);
        log::debug!("Hit mine at {:?}, game lost", coords);
    }

    fn all_mines_flagged(&self) -> bool {
        self.mine_layout
            .mines()
            .iter()
            .all(|&mine| self.flagged[mine.to_nd_index()])
    }

    fn update_status_if_won(&mut self) -> bool {
        if self.status.is_started()
            && self.revealed_count == self.mine_layout.safe_cell_count()
            && self.all_mines_flagged()
        {
            self.status = GameStatus::Won;
            log::debug!("All mines flagged and safe cells revealed, game won");
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine(size: Coord2, mines: &[Coord2]) -> GameEngine {
        GameEngine::from_layout(MineLayout::from_mine_coords(size, mines).unwrap())
    }

    fn revealed_count(engine: &GameEngine) -> usize {
        engine.revealed.iter().filter(|cell| cell.is_some()).count()
    }

    #[test]
    fn new_rejects_zero_dimensions() {
        assert_eq!(GameEngine::new(0, 3, 1), Err(GameError::EmptyBoard));
        assert_eq!(GameEngine::new(3, 0, 1), Err(GameError::EmptyBoard));
    }

    #[test]
    fn new_clamps_mine_count() {
        let engine = GameEngine::new(2, 2, 10).unwrap();
        assert_eq!(engine.mine_count(), 4);
        assert_eq!(engine.status(), GameStatus::Started);
    }

    #[test]
    fn reveal_out_of_bounds_is_an_error() {
        let mut engine = engine((2, 2), &[(0, 0)]);
        assert_eq!(engine.reveal((2, 0)), Err(GameError::InvalidCoords));
        assert_eq!(engine.flag((0, 2)), Err(GameError::InvalidCoords));
    }

    #[test]
    fn reveal_number_stops_there() {
        let mut engine = engine((3, 1), &[(0, 0)]);

        assert_eq!(engine.reveal((1, 0)).unwrap(), RevealOutcome::Revealed);
        assert_eq!(engine.revealed_at((1, 0)), Some(CellDisplay::Count(1)));
        assert_eq!(engine.revealed_at((2, 0)), None);
    }

    #[test]
    fn reveal_flood_fill_opens_zero_region() {
        let mut engine = engine((3, 3), &[(2, 2)]);

        assert_eq!(engine.reveal((0, 0)).unwrap(), RevealOutcome::Revealed);
        assert_eq!(engine.revealed_at((0, 0)), Some(CellDisplay::Empty));
        assert_eq!(engine.revealed_at((1, 1)), Some(CellDisplay::Count(1)));
        assert_eq!(engine.revealed_at((2, 1)), Some(CellDisplay::Count(1)));
        assert_eq!(engine.revealed_at((2, 2)), None);
        assert_eq!(revealed_count(&engine), 8);
        // the mine is still unflagged
        assert_eq!(engine.status(), GameStatus::Started);
    }

    #[test]
    fn flood_fill_stops_at_numbered_wall() {
        // . 1 * 1 .
        let mut engine = engine((5, 1), &[(2, 0)]);

        engine.reveal((0, 0)).unwrap();

        assert_eq!(engine.revealed_at((0, 0)), Some(CellDisplay::Empty));
        assert_eq!(engine.revealed_at((1, 0)), Some(CellDisplay::Count(1)));
        assert_eq!(engine.revealed_at((3, 0)), None);
        assert_eq!(engine.revealed_at((4, 0)), None);
    }

    #[test]
    fn reveal_hits_mine_and_shows_all_mines() {
        let mut engine = engine((3, 3), &[(0, 0), (2, 2)]);

        assert_eq!(engine.reveal((2, 2)).unwrap(), RevealOutcome::HitMine);
        assert_eq!(engine.status(), GameStatus::Lost);
        assert_eq!(engine.revealed_at((2, 2)), Some(CellDisplay::ExplodedMine));
        assert_eq!(engine.revealed_at((0, 0)), Some(CellDisplay::Mine));
        assert_eq!(revealed_count(&engine), 2);
    }

    #[test]
    fn nothing_changes_after_loss() {
        let mut engine = engine((3, 3), &[(0, 0)]);
        engine.reveal((0, 0)).unwrap();
        let lost = engine.clone();

        assert_eq!(engine.reveal((2, 2)).unwrap(), RevealOutcome::NoChange);
        assert_eq!(engine.flag((1, 1)).unwrap(), FlagOutcome::NoChange);
        assert_eq!(engine.flag((0, 0)).unwrap(), FlagOutcome::NoChange);
        assert_eq!(engine, lost);
    }

    #[test]
    fn reveal_is_idempotent() {
        let mut once = engine((4, 4), &[(3, 3), (0, 3)]);
        once.reveal((1, 1)).unwrap();
        let mut twice = once.clone();

        assert_eq!(twice.reveal((1, 1)).unwrap(), RevealOutcome::NoChange);
        assert_eq!(once, twice);
    }

    #[test]
    fn reveal_flagged_mine_loses() {
        let mut engine = engine((2, 1), &[(0, 0)]);
        engine.flag((0, 0)).unwrap();

        assert_eq!(engine.reveal((0, 0)).unwrap(), RevealOutcome::HitMine);
        assert_eq!(engine.status(), GameStatus::Lost);
        assert_eq!(engine.revealed_at((0, 0)), Some(CellDisplay::ExplodedMine));
        // the flag stays, the mine is drawn over it
        assert!(engine.is_flagged((0, 0)));
    }

    #[test]
    fn reveal_flagged_safe_cell_keeps_flag() {
        let mut engine = engine((3, 1), &[(0, 0)]);
        engine.flag((2, 0)).unwrap();

        assert_eq!(engine.reveal((2, 0)).unwrap(), RevealOutcome::Revealed);
        assert_eq!(engine.revealed_at((2, 0)), Some(CellDisplay::Empty));
        assert!(engine.is_flagged((2, 0)));
    }

    #[test]
    fn flood_fill_leaves_flags_alone() {
        let mut engine = engine((4, 1), &[(3, 0)]);
        engine.flag((0, 0)).unwrap();

        engine.reveal((1, 0)).unwrap();

        assert_eq!(engine.revealed_at((0, 0)), Some(CellDisplay::Empty));
        assert!(engine.is_flagged((0, 0)));
        assert_eq!(engine.flags_left(), 0);
        assert_eq!(
            engine.snapshot().flagged.into_iter().collect::<Vec<_>>(),
            [(0, 0)]
        );
    }

    #[test]
    fn flag_toggles() {
        let mut engine = engine((2, 2), &[(0, 0), (1, 1)]);

        assert_eq!(engine.flag((1, 0)).unwrap(), FlagOutcome::Changed);
        assert!(engine.is_flagged((1, 0)));
        assert_eq!(engine.flag((1, 0)).unwrap(), FlagOutcome::Changed);
        assert!(!engine.is_flagged((1, 0)));
        assert_eq!(engine.flagged_count(), 0);
    }

    #[test]
    fn flag_is_capped_by_mine_count() {
        let mut engine = engine((3, 3), &[(0, 0)]);

        assert_eq!(engine.flag((1, 1)).unwrap(), FlagOutcome::Changed);
        assert_eq!(engine.flag((2, 2)).unwrap(), FlagOutcome::NoChange);
        assert!(!engine.is_flagged((2, 2)));

        // removing is always allowed
        assert_eq!(engine.flag((1, 1)).unwrap(), FlagOutcome::Changed);
        assert_eq!(engine.flag((2, 2)).unwrap(), FlagOutcome::Changed);
    }

    #[test]
    fn flag_on_revealed_cell_is_ignored() {
        let mut engine = engine((3, 1), &[(0, 0)]);
        engine.reveal((1, 0)).unwrap();

        assert_eq!(engine.flag((1, 0)).unwrap(), FlagOutcome::NoChange);
        assert!(!engine.is_flagged((1, 0)));
    }

    #[test]
    fn zero_mine_board_has_no_flags() {
        let mut engine = engine((2, 2), &[]);
        assert_eq!(engine.flag((0, 0)).unwrap(), FlagOutcome::NoChange);
    }

    #[test]
    fn flag_then_reveal_wins() {
        let mut engine = engine((2, 1), &[(0, 0)]);

        assert_eq!(engine.flag((0, 0)).unwrap(), FlagOutcome::Changed);
        assert_eq!(engine.reveal((1, 0)).unwrap(), RevealOutcome::Won);
        assert_eq!(engine.status(), GameStatus::Won);
        assert!(engine.is_finished());
    }

    #[test]
    fn reveal_then_flag_wins() {
        let mut engine = engine((2, 1), &[(0, 0)]);

        assert_eq!(engine.reveal((1, 0)).unwrap(), RevealOutcome::Revealed);
        assert_eq!(engine.status(), GameStatus::Started);
        assert_eq!(engine.flag((0, 0)).unwrap(), FlagOutcome::Won);
        assert_eq!(engine.status(), GameStatus::Won);
    }

    #[test]
    fn flagging_all_mines_alone_does_not_win() {
        let mut engine = engine((3, 1), &[(0, 0)]);

        engine.flag((0, 0)).unwrap();
        assert_eq!(engine.status(), GameStatus::Started);
    }

    #[test]
    fn zero_mine_board_wins_on_first_reveal() {
        let mut engine = engine((3, 3), &[]);

        assert_eq!(engine.reveal((1, 1)).unwrap(), RevealOutcome::Won);
        assert_eq!(revealed_count(&engine), 9);
    }

    #[test]
    fn won_game_is_frozen() {
        let mut engine = engine((2, 1), &[(0, 0)]);
        engine.flag((0, 0)).unwrap();
        engine.reveal((1, 0)).unwrap();
        let won = engine.clone();

        assert_eq!(engine.flag((0, 0)).unwrap(), FlagOutcome::NoChange);
        assert_eq!(engine.reveal((0, 0)).unwrap(), RevealOutcome::NoChange);
        assert_eq!(engine, won);
    }

    #[test]
    fn reset_replaces_the_game() {
        let mut engine = engine((2, 1), &[(0, 0)]);
        engine.reveal((0, 0)).unwrap();

        engine.reset_with(
            GameConfig::new((9, 9), 10).unwrap(),
            RandomMineGenerator::new(1),
        );

        assert_eq!(engine.status(), GameStatus::Started);
        assert_eq!(engine.size(), (9, 9));
        assert_eq!(engine.mine_count(), 10);
        assert_eq!(engine.flagged_count(), 0);
        assert_eq!(revealed_count(&engine), 0);
    }

    #[test]
    fn failed_reset_keeps_current_game() {
        let mut engine = engine((2, 1), &[(0, 0)]);
        let before = engine.clone();

        assert_eq!(engine.reset(0, 0, 1), Err(GameError::EmptyBoard));
        assert_eq!(engine, before);
    }
}
