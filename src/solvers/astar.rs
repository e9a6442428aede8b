use std::{
    cmp::{Ordering, Reverse},
    collections::{BinaryHeap, HashMap, HashSet},
    rc::Rc,
    time::Duration,
};

use crate::{
    maze::{CellValue, Direction, Grid, Position},
    stepping::Stepper,
};

const STEP_DELAY: Duration = Duration::from_millis(50);

/// Estimate of the remaining distance between a cell and the goal.
pub trait Heuristic {
    fn distance(&self, position: Position, goal: Position) -> usize;
}

/// Manhattan distance: admissible and consistent on a 4-connected unit-cost grid.
#[derive(Debug, Clone, Copy, Default)]
pub struct Manhattan;

impl Heuristic for Manhattan {
    fn distance(&self, position: Position, goal: Position) -> usize {
        position.manhattan(&goal)
    }
}

/// Always 0, which turns A* into Dijkstra's algorithm.
#[derive(Debug, Clone, Copy, Default)]
pub struct ZeroHeuristic;

impl Heuristic for ZeroHeuristic {
    fn distance(&self, _position: Position, _goal: Position) -> usize {
        0
    }
}

struct TrackedCell {
    /// Coordinates of the cell in the maze
    coord: Position,
    /// The parent cell from which this cell was reached
    parent: Option<Rc<TrackedCell>>,
    /// Cost to reach this cell from the start
    traveling_cost: usize,
    /// Estimated cost to reach the goal from this cell
    heuristic_cost: usize,
    /// Insertion order, so equal costs pop first-in first-out
    sequence: usize,
}

impl TrackedCell {
    fn total_cost(&self) -> usize {
        self.traveling_cost + self.heuristic_cost
    }

    /// Follow the parent pointers back to the start and return the path start-first.
    fn path(&self) -> Vec<Position> {
        let mut path = vec![self.coord];
        let mut parent = self.parent.as_ref();
        while let Some(cell) = parent {
            path.push(cell.coord);
            parent = cell.parent.as_ref();
        }
        path.reverse();
        path
    }
}

impl PartialEq for TrackedCell {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for TrackedCell {}

impl PartialOrd for TrackedCell {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for TrackedCell {
    fn cmp(&self, other: &Self) -> Ordering {
        self.total_cost()
            .cmp(&other.total_cost())
            .then(self.sequence.cmp(&other.sequence))
    }
}

/// A* search ordered by `traveling cost + heuristic`.
///
/// The best known cost of every cell is tracked, and a cell is pushed again whenever a
/// cheaper way to reach it shows up; stale queue entries are skipped once the cell is
/// closed. The goal test happens when a cell is popped, so the returned path is optimal
/// for any admissible heuristic.
pub fn solve_astar<H: Heuristic + ?Sized>(
    grid: &mut Grid,
    start: Position,
    goal: Position,
    heuristic: &H,
    stepper: &Stepper,
) -> Option<Vec<Position>> {
    // Using Reverse to turn the max-heap into a min-heap
    let mut open: BinaryHeap<Reverse<TrackedCell>> = BinaryHeap::new();
    let mut sequence = 0;
    open.push(Reverse(TrackedCell {
        coord: start,
        parent: None,
        traveling_cost: 0,
        heuristic_cost: heuristic.distance(start, goal),
        sequence,
    }));
    let mut closed = HashSet::new();

    // Minimum known cost to reach each cell
    let mut costs = HashMap::from([(start, 0)]);

    while let Some(Reverse(current)) = open.pop() {
        if stepper.is_stopped() {
            return None;
        }
        if !closed.insert(current.coord) {
            // A cheaper entry for this cell was already expanded
            continue;
        }
        if current.coord == goal {
            return Some(current.path());
        }
        if !stepper.mark(grid, current.coord, CellValue::Current, STEP_DELAY) {
            return None;
        }

        let current = Rc::new(current);
        for dir in Direction::ALL {
            let Some(neighbor) = grid.neighbour(current.coord, dir) else {
                continue;
            };
            if closed.contains(&neighbor) || !grid.can_move(current.coord, dir) {
                continue;
            }

            let new_cost = current.traveling_cost + current.coord.manhattan(&neighbor);
            let is_cheaper = costs
                .get(&neighbor)
                .is_none_or(|&existing_cost| new_cost < existing_cost);
            if !is_cheaper {
                continue;
            }
            costs.insert(neighbor, new_cost);

            if neighbor != goal
                && !stepper.mark(grid, neighbor, CellValue::Frontier, STEP_DELAY)
            {
                return None;
            }
            sequence += 1;
            open.push(Reverse(TrackedCell {
                coord: neighbor,
                parent: Some(Rc::clone(&current)),
                traveling_cost: new_cost,
                heuristic_cost: heuristic.distance(neighbor, goal),
                sequence,
            }));
        }
    }

    None // No path found
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        solvers::{
            bfs::solve_bfs,
            test_utils::{assert_walkable, maze},
        },
        stepping::CancelToken,
    };

    #[test]
    fn test_heuristics() {
        let a = Position::new(1, 2);
        let b = Position::new(4, 0);
        assert_eq!(Manhattan.distance(a, b), 5);
        assert_eq!(ZeroHeuristic.distance(a, b), 0);
    }

    #[test]
    fn test_astar_matches_bfs() {
        let token = CancelToken::new();
        let stepper = Stepper::new(false, &token);
        for seed in 10..15 {
            let mut grid = maze(8, 8, seed);
            let start = Position::new(0, 7);
            let goal = Position::new(7, 0);
            let bfs = solve_bfs(&mut grid, start, goal, &stepper).unwrap();
            let astar = solve_astar(&mut grid, start, goal, &Manhattan, &stepper).unwrap();
            assert_eq!(astar.len(), bfs.len());
            assert_eq!(astar.first(), Some(&start));
            assert_eq!(astar.last(), Some(&goal));
            assert_walkable(&grid, &astar);
        }
    }

    #[test]
    fn test_astar_optimal_in_open_room() {
        // Open rooms have many equal routes, exercising the cost bookkeeping
        let mut grid = Grid::new(6, 5, None);
        grid.erase();
        let token = CancelToken::new();
        let path = solve_astar(
            &mut grid,
            Position::new(0, 0),
            Position::new(5, 4),
            &Manhattan,
            &Stepper::new(false, &token),
        )
        .unwrap();
        assert_eq!(path.len(), 10);
        assert_walkable(&grid, &path);
    }

    #[test]
    fn test_astar_unreachable() {
        let mut grid = Grid::new(3, 1, None);
        grid.erase();
        grid.build_wall(Position::new(1, 0), Direction::East);
        let token = CancelToken::new();
        assert_eq!(
            solve_astar(
                &mut grid,
                Position::new(0, 0),
                Position::new(2, 0),
                &Manhattan,
                &Stepper::new(false, &token)
            ),
            None
        );
    }
}
