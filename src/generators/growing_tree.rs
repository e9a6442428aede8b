use std::time::Duration;

use rand::{Rng, rngs::StdRng};

use crate::{
    generators::{Stopped, shuffled_directions},
    maze::{CellValue, Grid, Position},
    stepping::Stepper,
};

const STEP_DELAY: Duration = Duration::from_millis(150);

/// Keep a list of active cells. Repeatedly pick one at random and carve into one of its
/// uncarved neighbours, which becomes active; a cell with no such neighbour is retired.
///
/// Picking the newest cell instead would make this a depth-first carve and picking at
/// random makes it behave like Prim's algorithm. This implementation picks at random.
pub fn growing_tree(
    grid: &mut Grid,
    rng: &mut StdRng,
    start: Position,
    stepper: &Stepper,
) -> Result<(), Stopped> {
    grid.set_value(start, CellValue::Empty);
    let mut active = vec![start];

    while !active.is_empty() {
        let index = rng.random_range(0..active.len());
        let cell = active[index];
        if !stepper.flash(grid, cell, CellValue::Current, STEP_DELAY) {
            return Err(Stopped);
        }

        let mut carved = false;
        for dir in shuffled_directions(rng) {
            if stepper.is_stopped() {
                return Err(Stopped);
            }
            if let Some(next) = grid.neighbour(cell, dir) {
                if grid.value(next) == CellValue::Wall {
                    grid.carve(cell, dir);
                    active.push(next);
                    carved = true;
                    break;
                }
            }
        }

        if !carved {
            active.remove(index);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::generators::{
        Generator,
        test_utils::{assert_perfect, generated},
    };

    #[test]
    fn test_growing_tree_is_perfect() {
        for (width, height) in [(2, 2), (5, 5), (10, 3), (1, 2)] {
            assert_perfect(&generated(Generator::GrowingTree, width, height, 42));
        }
    }
}
