use std::time::Duration;

use rand::rngs::StdRng;

use crate::{
    generators::{Stopped, shuffled_directions},
    maze::{CellValue, Grid, Position},
    stepping::Stepper,
};

const STEP_DELAY: Duration = Duration::from_millis(250);

/// Random walk over the whole grid, carving into a cell the first time it is entered.
/// Produces a uniform spanning tree but visits cells many times.
pub fn aldous_broder(
    grid: &mut Grid,
    rng: &mut StdRng,
    start: Position,
    stepper: &Stepper,
) -> Result<(), Stopped> {
    grid.set_value(start, CellValue::Empty);
    let mut remaining = grid.width() * grid.height() - 1;
    let mut current = start;

    while remaining > 0 {
        if !stepper.flash(grid, current, CellValue::Current, STEP_DELAY) {
            return Err(Stopped);
        }

        // The first in-bounds direction of a shuffle is a uniform pick among valid moves
        let Some((dir, next)) = shuffled_directions(rng)
            .into_iter()
            .find_map(|dir| grid.neighbour(current, dir).map(|next| (dir, next)))
        else {
            // Single-cell grid, nothing to walk to
            return Ok(());
        };

        if grid.value(next) == CellValue::Wall {
            grid.carve(current, dir);
            remaining -= 1;
        }
        current = next;
    }
    Ok(())
}
