use std::time::Duration;

use rand::{Rng, rngs::StdRng};

use crate::{
    generators::Stopped,
    maze::{CellValue, Direction, Grid},
    stepping::Stepper,
};

const STEP_DELAY: Duration = Duration::from_millis(150);

/// Each cell carves either north or west, chosen uniformly among the in-range options.
/// Every maze has open corridors along the top row and left column.
pub fn binary_tree(grid: &mut Grid, rng: &mut StdRng, stepper: &Stepper) -> Result<(), Stopped> {
    for position in grid.positions() {
        let mut candidates = Vec::with_capacity(2);
        if position.y > 0 {
            candidates.push(Direction::North);
        }
        if position.x > 0 {
            candidates.push(Direction::West);
        }
        if candidates.is_empty() {
            continue;
        }

        let dir = candidates[rng.random_range(0..candidates.len())];
        if !stepper.flash(grid, position, CellValue::Current, STEP_DELAY) {
            return Err(Stopped);
        }
        grid.carve(position, dir);
    }
    Ok(())
}
