use std::time::Duration;

use rand::{Rng, rngs::StdRng};

use crate::{
    generators::Stopped,
    maze::{CellValue, Direction, Grid, Position},
    stepping::Stepper,
};

const STEP_DELAY: Duration = Duration::from_millis(150);

pub fn randomized_prim(
    grid: &mut Grid,
    rng: &mut StdRng,
    start: Position,
    stepper: &Stepper,
) -> Result<(), Stopped> {
    // Uncarved cells adjacent to the carved region, each marked as frontier in the grid
    let mut frontiers = Vec::new();
    add_to_maze(grid, start, &mut frontiers);

    while !frontiers.is_empty() {
        // Randomly select a cell from the frontiers
        let frontier = frontiers.remove(rng.random_range(0..frontiers.len()));

        if !stepper.flash(grid, frontier, CellValue::Current, STEP_DELAY) {
            // Unqueue the remaining frontier cells so no marker outlives the run
            grid.set_value(frontier, CellValue::Wall);
            frontiers
                .into_iter()
                .for_each(|position| grid.set_value(position, CellValue::Wall));
            return Err(Stopped);
        }

        // Directions of the neighbors that are already part of the maze
        let carved = Direction::ALL
            .into_iter()
            .filter(|&dir| {
                grid.neighbour(frontier, dir)
                    .is_some_and(|next| grid.value(next) == CellValue::Empty)
            })
            .collect::<Vec<_>>();

        if !carved.is_empty() {
            let dir = carved[rng.random_range(0..carved.len())];
            grid.carve(frontier, dir);
        }

        add_to_maze(grid, frontier, &mut frontiers);
    }
    Ok(())
}

/// Mark `position` as carved and queue its uncarved neighbors as frontier cells.
fn add_to_maze(grid: &mut Grid, position: Position, frontiers: &mut Vec<Position>) {
    grid.set_value(position, CellValue::Empty);
    for dir in [
        Direction::North,
        Direction::East,
        Direction::West,
        Direction::South,
    ] {
        if let Some(next) = grid.neighbour(position, dir) {
            // Frontier cells are no longer walls, so each cell is queued at most once
            if grid.value(next) == CellValue::Wall {
                grid.set_value(next, CellValue::Frontier);
                frontiers.push(next);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        generators::{
            Generator, get_rng,
            test_utils::{assert_perfect, generated},
        },
        stepping::CancelToken,
    };

    #[test]
    fn test_randomized_prim_is_perfect() {
        for (width, height) in [(2, 2), (7, 7), (2, 9), (9, 1)] {
            assert_perfect(&generated(Generator::Prim, width, height, 4));
        }
    }

    #[test]
    fn test_stopped_prim_leaves_no_frontier() {
        let mut grid = Grid::new(6, 6, None);
        let token = CancelToken::new();
        token.cancel();
        let stepper = Stepper::new(false, &token);
        assert_eq!(
            randomized_prim(&mut grid, &mut get_rng(1), Position::new(0, 0), &stepper),
            Err(Stopped)
        );
        assert!(
            grid.cells()
                .iter()
                .all(|cell| cell.value() != CellValue::Frontier)
        );
        assert_eq!(grid.value(Position::new(0, 0)), CellValue::Empty);
    }
}
