//! Perfect maze generation and solving.
//!
//! A [`Labyrinth`] is carved by one of nine [`Generator`]s, solved by one of three
//! [`Solver`]s, and walked by a [`Player`]. All algorithms can run step by step for
//! visualization and stop cooperatively through a [`CancelToken`]; [`Session`] runs
//! them on background threads around a single shared labyrinth.

pub mod error;
pub mod generators;
pub mod logging;
pub mod maze;
pub mod player;
pub mod session;
pub mod settings;
pub mod solvers;
pub mod stepping;

pub use error::{LabyrinthError, Result};
pub use generators::Generator;
pub use maze::{
    Cell, CellAround, CellValue, Direction, GenerationOutcome, Grid, GridEvent, Labyrinth,
    Position,
};
pub use player::Player;
pub use session::{Session, Task};
pub use settings::LabyrinthSettings;
pub use solvers::{Solver, SolvingStrategy};
pub use stepping::{CancelToken, Stepper};
