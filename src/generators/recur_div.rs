use std::time::Duration;

use rand::{Rng, rngs::StdRng};

use crate::{
    generators::Stopped,
    maze::{CellValue, Direction, Grid, Position},
    stepping::Stepper,
};

const STEP_DELAY: Duration = Duration::from_millis(150);

#[derive(Debug, Clone, Copy, PartialEq)]
enum Orientation {
    /// A wall line running west to east, splitting a region into upper and lower parts
    Horizontal,
    /// A wall line running north to south, splitting a region into left and right parts
    Vertical,
}

/// Start from a fully open grid and split it recursively with wall lines that each
/// keep a single gap. Unlike the other generators, this one adds walls instead of
/// carving passages.
pub fn recursive_division(
    grid: &mut Grid,
    rng: &mut StdRng,
    stepper: &Stepper,
) -> Result<(), Stopped> {
    // Clear all walls in the maze, except the boundary walls
    grid.erase();

    let (width, height) = (grid.width(), grid.height());
    divide(grid, Position::new(0, 0), width, height, rng, stepper)
}

fn divide(
    grid: &mut Grid,
    top_left: Position,
    width: usize,
    height: usize,
    rng: &mut StdRng,
    stepper: &Stepper,
) -> Result<(), Stopped> {
    if width < 2 || height < 2 {
        return Ok(());
    }
    if stepper.is_stopped() {
        return Err(Stopped);
    }

    let Position { x, y } = top_left;

    let orientation = match width.cmp(&height) {
        std::cmp::Ordering::Less => Orientation::Horizontal,
        std::cmp::Ordering::Greater => Orientation::Vertical,
        std::cmp::Ordering::Equal => {
            if rng.random_bool(0.5) {
                Orientation::Horizontal
            } else {
                Orientation::Vertical
            }
        }
    };

    match orientation {
        Orientation::Horizontal => {
            // Randomly choose the row the wall line goes under
            let diff = rng.random_range(0..height - 1);
            let y_wall = y + diff;
            // Randomly choose a position for the hole in the wall
            let x_hole = x + rng.random_range(0..width);

            for wall_x in x..x + width {
                if stepper.is_stopped() {
                    return Err(Stopped);
                }
                if wall_x != x_hole {
                    grid.build_wall(Position::new(wall_x, y_wall), Direction::South);
                }
            }
            if !stepper.flash(grid, Position::new(x_hole, y_wall), CellValue::Current, STEP_DELAY) {
                return Err(Stopped);
            }

            let upper_height = diff + 1;
            let lower_height = height - upper_height;

            // Recursively divide the regions above and below the wall
            divide(grid, top_left, width, upper_height, rng, stepper)?;
            divide(
                grid,
                Position::new(x, y_wall + 1),
                width,
                lower_height,
                rng,
                stepper,
            )
        }
        Orientation::Vertical => {
            // Randomly choose the column the wall line goes right of
            let diff = rng.random_range(0..width - 1);
            let x_wall = x + diff;
            // Randomly choose a position for the hole in the wall
            let y_hole = y + rng.random_range(0..height);

            for wall_y in y..y + height {
                if stepper.is_stopped() {
                    return Err(Stopped);
                }
                if wall_y != y_hole {
                    grid.build_wall(Position::new(x_wall, wall_y), Direction::East);
                }
            }
            if !stepper.flash(grid, Position::new(x_wall, y_hole), CellValue::Current, STEP_DELAY) {
                return Err(Stopped);
            }

            let left_width = diff + 1;
            let right_width = width - left_width;

            // Recursively divide the regions left and right of the wall
            divide(grid, top_left, left_width, height, rng, stepper)?;
            divide(
                grid,
                Position::new(x_wall + 1, y),
                right_width,
                height,
                rng,
                stepper,
            )
        }
    }
}
