use rand::{SeedableRng, rngs::StdRng, seq::SliceRandom};

mod aldous_broder;
mod binary_tree;
mod growing_tree;
mod hunt_and_kill;
mod prim;
mod recur_backtrack;
mod recur_div;
mod sidewinder;
mod wilson;

use aldous_broder::aldous_broder;
use binary_tree::binary_tree;
use growing_tree::growing_tree;
use hunt_and_kill::hunt_and_kill;
use prim::randomized_prim;
use recur_backtrack::recursive_backtrack;
use recur_div::recursive_division;
use sidewinder::sidewinder;
use wilson::wilson;

use crate::{
    maze::{Direction, Grid, Position},
    stepping::Stepper,
};

/// Get the random number generator for a generation seed.
/// The same seed always yields the same sequence, hence the same maze.
pub fn get_rng(seed: i64) -> StdRng {
    StdRng::seed_from_u64(seed as u64)
}

/// The four directions in a random order.
fn shuffled_directions(rng: &mut StdRng) -> [Direction; 4] {
    let mut directions = Direction::ALL;
    directions.shuffle(rng);
    directions
}

/// A generator returned before carving the whole grid because it was cancelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stopped;

/// Available maze generation algorithms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum Generator {
    AldousBroder,
    BinaryTree,
    Sidewinder,
    RecurBacktrack,
    #[default]
    GrowingTree,
    HuntAndKill,
    Prim,
    Wilson,
    RecurDiv,
}

impl Generator {
    pub const ALL: [Generator; 9] = [
        Generator::AldousBroder,
        Generator::BinaryTree,
        Generator::Sidewinder,
        Generator::RecurBacktrack,
        Generator::GrowingTree,
        Generator::HuntAndKill,
        Generator::Prim,
        Generator::Wilson,
        Generator::RecurDiv,
    ];
}

impl std::fmt::Display for Generator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Generator::AldousBroder => write!(f, "Aldous-Broder"),
            Generator::BinaryTree => write!(f, "Binary Tree"),
            Generator::Sidewinder => write!(f, "Sidewinder"),
            Generator::RecurBacktrack => write!(f, "Recursive Backtracking"),
            Generator::GrowingTree => write!(f, "Growing Tree"),
            Generator::HuntAndKill => write!(f, "Hunt and Kill"),
            Generator::Prim => write!(f, "Prim's Algorithm"),
            Generator::Wilson => write!(f, "Wilson's Algorithm"),
            Generator::RecurDiv => write!(f, "Recursive Division"),
        }
    }
}

/// Carve `grid` into a perfect maze with the given algorithm.
///
/// `grid` must be freshly reset (all cells uncarved) with the `start` cell already carved.
/// If `stepper` is stopped midway, returns `Err(Stopped)` early and the grid may not be
/// spanning. A cancellation that arrives after the last cell is carved does not count.
pub fn generate_maze(
    grid: &mut Grid,
    generator: Generator,
    rng: &mut StdRng,
    start: Position,
    end: Position,
    stepper: &Stepper,
) -> Result<(), Stopped> {
    tracing::debug!(
        "[generate] {} on {}x{} grid from {} (goal {})",
        generator,
        grid.width(),
        grid.height(),
        start,
        end
    );
    match generator {
        Generator::AldousBroder => aldous_broder(grid, rng, start, stepper),
        Generator::BinaryTree => binary_tree(grid, rng, stepper),
        Generator::Sidewinder => sidewinder(grid, rng, stepper),
        Generator::RecurBacktrack => recursive_backtrack(grid, rng, start, stepper),
        Generator::GrowingTree => growing_tree(grid, rng, start, stepper),
        Generator::HuntAndKill => hunt_and_kill(grid, rng, start, stepper),
        Generator::Prim => randomized_prim(grid, rng, start, stepper),
        Generator::Wilson => wilson(grid, rng, start, stepper),
        Generator::RecurDiv => recursive_division(grid, rng, stepper),
    }
}
