use std::{collections::HashMap, time::Duration};

use rand::rngs::StdRng;

use crate::{
    generators::{Stopped, shuffled_directions},
    maze::{CellValue, Direction, Grid, Position},
    stepping::Stepper,
};

const CARVE_DELAY: Duration = Duration::from_millis(150);
const WALK_DELAY: Duration = Duration::from_millis(50);

/// Repeatedly run a loop-erased random walk from a random uncarved cell until it hits
/// the carved region, then carve the walk. Produces a uniform spanning tree.
pub fn wilson(
    grid: &mut Grid,
    rng: &mut StdRng,
    start: Position,
    stepper: &Stepper,
) -> Result<(), Stopped> {
    grid.set_value(start, CellValue::Empty);
    let mut remaining = grid.width() * grid.height() - 1;

    while remaining > 0 {
        let path = loop_erased_walk(grid, rng, stepper)?;

        for (position, dir) in path {
            if !stepper.flash(grid, position, CellValue::Current, CARVE_DELAY) {
                return Err(Stopped);
            }
            grid.carve(position, dir);
            remaining -= 1;
        }
    }
    Ok(())
}

/// Walk randomly from an uncarved cell until a carved cell is reached.
///
/// Only the last exit direction of each visited cell is kept, so revisiting a cell
/// overwrites its exit and erases the loop. Returns the loop-free path as
/// `(cell, exit direction)` pairs.
fn loop_erased_walk(
    grid: &mut Grid,
    rng: &mut StdRng,
    stepper: &Stepper,
) -> Result<Vec<(Position, Direction)>, Stopped> {
    let walk_start = loop {
        if stepper.is_stopped() {
            return Err(Stopped);
        }
        let candidate = Position::random(grid.width(), grid.height(), rng);
        if grid.value(candidate) == CellValue::Wall {
            break candidate;
        }
    };

    let mut exits: HashMap<Position, Direction> = HashMap::new();
    let mut current = walk_start;
    loop {
        let (dir, next) = shuffled_directions(rng)
            .into_iter()
            .find_map(|dir| grid.neighbour(current, dir).map(|next| (dir, next)))
            .ok_or(Stopped)?;

        if !stepper.flash(grid, next, CellValue::Current, WALK_DELAY) {
            return Err(Stopped);
        }

        exits.insert(current, dir);
        if grid.value(next) != CellValue::Wall {
            break;
        }
        current = next;
    }

    // Replay the walk from its start following the last recorded exits
    let mut path = Vec::new();
    let mut position = walk_start;
    while let Some(&dir) = exits.get(&position) {
        path.push((position, dir));
        let Some(next) = grid.neighbour(position, dir) else {
            break;
        };
        position = next;
    }
    Ok(path)
}
