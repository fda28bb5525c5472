use thiserror::Error;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Invalid coordinates")]
    InvalidCoords,
    #[error("Board must be at least one cell wide and one cell high")]
    EmptyBoard,
    #[error("Mine layout lists a cell outside of the board")]
    InvalidLayout,
}

pub type Result<T> = core::result::Result<T, GameError>;
