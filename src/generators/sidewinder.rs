use std::time::Duration;

use rand::{Rng, rngs::StdRng};

use crate::{
    generators::Stopped,
    maze::{CellValue, Direction, Grid, Position},
    stepping::Stepper,
};

const STEP_DELAY: Duration = Duration::from_millis(250);

/// Row by row, extend a horizontal run eastward and randomly close it by carving
/// north from one of its cells. The first row is a single corridor.
pub fn sidewinder(grid: &mut Grid, rng: &mut StdRng, stepper: &Stepper) -> Result<(), Stopped> {
    let (width, height) = (grid.width(), grid.height());

    for y in 0..height {
        let mut run_start = 0;

        for x in 0..width {
            let position = Position::new(x, y);
            if !stepper.flash(grid, position, CellValue::Current, STEP_DELAY) {
                return Err(Stopped);
            }

            let last_in_row = x + 1 == width;
            if y > 0 && (last_in_row || rng.random_range(0..2) == 0) {
                // Close the run: carve north from a random cell of the run
                let chosen = run_start + rng.random_range(0..=x - run_start);
                grid.carve(Position::new(chosen, y), Direction::North);
                run_start = x + 1;
            } else if !last_in_row {
                grid.carve(position, Direction::East);
            }
        }
    }
    Ok(())
}
