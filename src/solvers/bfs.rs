use std::{
    collections::{HashSet, VecDeque},
    time::Duration,
};

use crate::{
    maze::{CellValue, Direction, Grid, Position},
    stepping::Stepper,
};

const STEP_DELAY: Duration = Duration::from_millis(50);

/// Level-order search where each queue entry is the whole path leading to a frontier
/// cell. The first path ending at the goal is a shortest one.
pub fn solve_bfs(
    grid: &mut Grid,
    start: Position,
    goal: Position,
    stepper: &Stepper,
) -> Option<Vec<Position>> {
    let mut queue: VecDeque<Vec<Position>> = VecDeque::from([vec![start]]);
    let mut explored = HashSet::from([start]);

    while let Some(path) = queue.pop_front() {
        if stepper.is_stopped() {
            return None;
        }
        let current = *path.last()?;

        if current == goal {
            return Some(path);
        }
        if !stepper.mark(grid, current, CellValue::Current, STEP_DELAY) {
            return None;
        }

        for dir in Direction::ALL {
            let Some(neighbor) = grid.neighbour(current, dir) else {
                continue;
            };
            if neighbor != goal && !stepper.mark(grid, neighbor, CellValue::Frontier, STEP_DELAY) {
                return None;
            }
            if !explored.contains(&neighbor) && grid.can_move(current, dir) {
                explored.insert(neighbor);
                let mut next_path = path.clone();
                next_path.push(neighbor);
                queue.push_back(next_path);
            }
        }
    }

    None // No path found
}
