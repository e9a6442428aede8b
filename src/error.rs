use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LabyrinthError {
    #[error("cannot build a {width}x{height} labyrinth: it needs at least two cells")]
    InvalidDimensions { width: usize, height: usize },
    #[error("position ({x}, {y}) lies outside the {width}x{height} labyrinth")]
    OutOfBounds {
        x: usize,
        y: usize,
        width: usize,
        height: usize,
    },
    #[error("a background worker panicked")]
    WorkerPanicked,
    #[error("the labyrinth lock was poisoned by a panicking worker")]
    LockPoisoned,
}

pub type Result<T> = std::result::Result<T, LabyrinthError>;
