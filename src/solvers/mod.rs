use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

mod astar;
mod bfs;
mod dijkstra;

pub use astar::{Heuristic, Manhattan, ZeroHeuristic, solve_astar};
pub use bfs::solve_bfs;
pub use dijkstra::solve_dijkstra;

use crate::{
    maze::{Grid, Position},
    stepping::{CancelToken, Stepper, clear_markers},
};

/// Available maze solving algorithms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum Solver {
    #[default]
    Bfs,
    AStar,
    Dijkstra,
}

impl Solver {
    pub const ALL: [Solver; 3] = [Solver::Bfs, Solver::AStar, Solver::Dijkstra];
}

impl std::fmt::Display for Solver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Solver::Bfs => write!(f, "Breadth-First Search (BFS)"),
            Solver::AStar => write!(f, "A* Search"),
            Solver::Dijkstra => write!(f, "Dijkstra's Algorithm"),
        }
    }
}

/// Find a shortest path from `start` to `goal`, both included, with the given algorithm.
/// Returns `None` if the goal is unreachable or `stepper` was stopped.
pub fn solve_maze(
    grid: &mut Grid,
    solver: Solver,
    start: Position,
    goal: Position,
    stepper: &Stepper,
) -> Option<Vec<Position>> {
    match solver {
        Solver::Bfs => solve_bfs(grid, start, goal, stepper),
        Solver::AStar => solve_astar(grid, start, goal, &Manhattan, stepper),
        Solver::Dijkstra => solve_dijkstra(grid, start, goal, stepper),
    }
}

/// A solving algorithm plus its execution mode, allowing at most one search in flight.
#[derive(Debug, Clone)]
pub struct SolvingStrategy {
    solver: Solver,
    step_by_step: bool,
    searching: Arc<AtomicBool>,
}

/// Clears the in-flight flag on every exit path of a search.
struct SearchGuard<'a>(&'a AtomicBool);

impl Drop for SearchGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl SolvingStrategy {
    pub fn new(solver: Solver, step_by_step: bool) -> Self {
        SolvingStrategy {
            solver,
            step_by_step,
            searching: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn solver(&self) -> Solver {
        self.solver
    }

    pub fn is_step_by_step(&self) -> bool {
        self.step_by_step
    }

    pub fn is_searching_path(&self) -> bool {
        self.searching.load(Ordering::Acquire)
    }

    /// Shared view of the in-flight flag, readable without access to the strategy.
    pub(crate) fn searching_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.searching)
    }

    /// Compute a path from `from` to `goal`.
    ///
    /// Returns `None` if `from` already is the goal, if a search is already running on
    /// this strategy, if the goal is unreachable, or if `cancel` fires. In step-by-step
    /// mode every transient marker is cleared before returning.
    pub fn get_path(
        &self,
        grid: &mut Grid,
        from: Position,
        goal: Position,
        cancel: &CancelToken,
    ) -> Option<Vec<Position>> {
        if from == goal {
            return None;
        }
        if self
            .searching
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            tracing::debug!("[solve] search already in flight, skipping");
            return None;
        }
        let _guard = SearchGuard(&self.searching);

        let stepper = Stepper::new(self.step_by_step, cancel);
        let path = solve_maze(grid, self.solver, from, goal, &stepper);
        if self.step_by_step {
            clear_markers(grid);
        }

        match &path {
            Some(path) => tracing::info!(
                "[solve] {} found a path of {} steps from {} to {}",
                self.solver,
                path.len() - 1,
                from,
                goal
            ),
            None if cancel.is_cancelled() => tracing::info!("[solve] {} cancelled", self.solver),
            None => tracing::info!("[solve] {} found no path from {} to {}", self.solver, from, goal),
        }
        path
    }
}

impl Default for SolvingStrategy {
    fn default() -> Self {
        SolvingStrategy::new(Solver::default(), false)
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::solvers::test_utils::maze;

    #[test]
    fn test_search_in_flight_short_circuits() {
        let strategy = SolvingStrategy::new(Solver::Bfs, false);
        let mut grid = maze(4, 4, 1);
        let token = CancelToken::new();

        strategy.searching.store(true, Ordering::Release);
        assert!(strategy.is_searching_path());
        assert_eq!(
            strategy.get_path(&mut grid, Position::new(0, 0), Position::new(3, 3), &token),
            None
        );

        strategy.searching.store(false, Ordering::Release);
        let path = strategy
            .get_path(&mut grid, Position::new(0, 0), Position::new(3, 3), &token)
            .unwrap();
        assert_eq!(path.first(), Some(&Position::new(0, 0)));
        assert_eq!(path.last(), Some(&Position::new(3, 3)));
        assert!(!strategy.is_searching_path());
    }

    #[test]
    fn test_no_path_when_already_at_goal() {
        let strategy = SolvingStrategy::default();
        let mut grid = maze(3, 3, 1);
        let goal = Position::new(2, 2);
        assert_eq!(
            strategy.get_path(&mut grid, goal, goal, &CancelToken::new()),
            None
        );
    }

    #[test]
    fn test_all_solvers_agree_on_length() {
        for seed in 0..5 {
            let mut grid = maze(9, 7, seed);
            let token = CancelToken::new();
            let stepper = Stepper::new(false, &token);
            let lengths = Solver::ALL
                .into_iter()
                .map(|solver| {
                    solve_maze(
                        &mut grid,
                        solver,
                        Position::new(0, 0),
                        Position::new(8, 6),
                        &stepper,
                    )
                    .map(|path| path.len())
                })
                .collect::<Vec<_>>();
            assert!(lengths[0].is_some());
            assert!(lengths.iter().all(|&len| len == lengths[0]));
        }
    }

    #[test]
    fn test_step_by_step_clears_markers() {
        let strategy = SolvingStrategy::new(Solver::AStar, true);
        let mut grid = maze(3, 2, 4);
        let before = grid.cells().to_vec();
        let path = strategy.get_path(
            &mut grid,
            Position::new(0, 0),
            Position::new(2, 1),
            &CancelToken::new(),
        );
        assert!(path.is_some());
        assert_eq!(grid.cells(), &before[..]);
    }
}
