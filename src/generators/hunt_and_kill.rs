use std::time::Duration;

use rand::{Rng, rngs::StdRng};

use crate::{
    generators::{Stopped, shuffled_directions},
    maze::{CellValue, Direction, Grid, Position},
    stepping::Stepper,
};

const WALK_DELAY: Duration = Duration::from_millis(100);
const HUNT_DELAY: Duration = Duration::from_millis(25);

/// Random walk carving into unvisited cells until stuck, then hunt row by row for an
/// uncarved cell next to the carved region, connect it, and walk again from there.
pub fn hunt_and_kill(
    grid: &mut Grid,
    rng: &mut StdRng,
    start: Position,
    stepper: &Stepper,
) -> Result<(), Stopped> {
    grid.set_value(start, CellValue::Empty);
    // Rows known to contain no uncarved cell are skipped by later hunts
    let mut finished_rows = vec![false; grid.height()];
    let mut current = start;

    loop {
        let next = match walk(grid, rng, current, stepper)? {
            Some(next) => Some(next),
            None => hunt(grid, rng, &mut finished_rows, stepper)?,
        };
        match next {
            Some(next) => current = next,
            None => return Ok(()),
        }
    }
}

/// Carve one step from `position` into a random uncarved neighbour, if any.
fn walk(
    grid: &mut Grid,
    rng: &mut StdRng,
    position: Position,
    stepper: &Stepper,
) -> Result<Option<Position>, Stopped> {
    if !stepper.flash(grid, position, CellValue::Current, WALK_DELAY) {
        return Err(Stopped);
    }
    for dir in shuffled_directions(rng) {
        if let Some(next) = grid.neighbour(position, dir) {
            if grid.value(next) == CellValue::Wall {
                return Ok(grid.carve(position, dir));
            }
        }
    }
    Ok(None)
}

/// Find the first uncarved cell adjacent to a carved one, connect it to a random
/// carved neighbour and return it.
fn hunt(
    grid: &mut Grid,
    rng: &mut StdRng,
    finished_rows: &mut [bool],
    stepper: &Stepper,
) -> Result<Option<Position>, Stopped> {
    for y in 0..grid.height() {
        if finished_rows[y] {
            continue;
        }
        let mut row_has_wall = false;

        for x in 0..grid.width() {
            let position = Position::new(x, y);
            if !stepper.flash(grid, position, CellValue::Current, HUNT_DELAY) {
                return Err(Stopped);
            }
            if grid.value(position) != CellValue::Wall {
                continue;
            }
            row_has_wall = true;

            let carved_neighbours = Direction::ALL
                .into_iter()
                .filter(|&dir| {
                    grid.neighbour(position, dir)
                        .is_some_and(|next| grid.value(next) != CellValue::Wall)
                })
                .collect::<Vec<_>>();
            if carved_neighbours.is_empty() {
                continue;
            }

            let dir = carved_neighbours[rng.random_range(0..carved_neighbours.len())];
            grid.carve(position, dir);
            return Ok(Some(position));
        }

        if !row_has_wall {
            finished_rows[y] = true;
        }
    }
    Ok(None)
}
