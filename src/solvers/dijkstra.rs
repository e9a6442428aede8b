use super::astar::{ZeroHeuristic, solve_astar};
use crate::{
    maze::{Grid, Position},
    stepping::Stepper,
};

/// Dijkstra's algorithm: uniform-cost search, i.e. A* without a heuristic.
pub fn solve_dijkstra(
    grid: &mut Grid,
    start: Position,
    goal: Position,
    stepper: &Stepper,
) -> Option<Vec<Position>> {
    solve_astar(grid, start, goal, &ZeroHeuristic, stepper)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        maze::{CellValue, Direction},
        solvers::test_utils::{assert_walkable, maze},
        stepping::CancelToken,
    };

    #[test]
    fn test_dijkstra_finds_walkable_path() {
        let mut grid = maze(7, 5, 21);
        let token = CancelToken::new();
        let path = solve_dijkstra(
            &mut grid,
            Position::new(6, 0),
            Position::new(0, 4),
            &Stepper::new(false, &token),
        )
        .unwrap();
        assert_eq!(path.first(), Some(&Position::new(6, 0)));
        assert_eq!(path.last(), Some(&Position::new(0, 4)));
        assert_walkable(&grid, &path);
    }

    #[test]
    fn test_dijkstra_goes_around_wall() {
        // 3x2 room with a wall between the two top-right cells
        let mut grid = Grid::new(3, 2, None);
        grid.erase();
        grid.build_wall(Position::new(1, 0), Direction::East);
        let token = CancelToken::new();
        let path = solve_dijkstra(
            &mut grid,
            Position::new(0, 0),
            Position::new(2, 0),
            &Stepper::new(false, &token),
        )
        .unwrap();
        assert_eq!(path.len(), 5);
        assert!(path.contains(&Position::new(2, 1)));
    }

    #[test]
    fn test_crossed_cells_stay_passable() {
        let mut grid = Grid::new(3, 1, None);
        grid.erase();
        grid.set_value(Position::new(1, 0), CellValue::Crossed);
        let token = CancelToken::new();
        let path = solve_dijkstra(
            &mut grid,
            Position::new(0, 0),
            Position::new(2, 0),
            &Stepper::new(false, &token),
        );
        assert_eq!(path.map(|p| p.len()), Some(3));
    }
}
