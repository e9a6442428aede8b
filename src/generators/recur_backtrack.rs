use std::time::Duration;

use rand::rngs::StdRng;

use crate::{
    generators::{Stopped, shuffled_directions},
    maze::{CellValue, Grid, Position},
    stepping::Stepper,
};

const STEP_DELAY: Duration = Duration::from_millis(150);

pub fn recursive_backtrack(
    grid: &mut Grid,
    rng: &mut StdRng,
    start: Position,
    stepper: &Stepper,
) -> Result<(), Stopped> {
    grid.set_value(start, CellValue::Empty);

    // The stack keeps only carved cells
    let mut stack = vec![start];

    while let Some(cell) = stack.pop() {
        if !stepper.flash(grid, cell, CellValue::Current, STEP_DELAY) {
            return Err(Stopped);
        }

        for dir in shuffled_directions(rng) {
            if stepper.is_stopped() {
                return Err(Stopped);
            }
            let Some(neighbor) = grid.neighbour(cell, dir) else {
                continue;
            };
            if grid.value(neighbor) == CellValue::Wall {
                grid.carve(cell, dir);
                // The last pushed neighbor is carved from first, which keeps the corridors long
                stack.push(neighbor);
            }
        }
    }
    Ok(())
}
