use crate::{
    generators::{Generator, get_rng},
    maze::Position,
    solvers::Solver,
};

/// Everything needed to build a [`crate::Labyrinth`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabyrinthSettings {
    pub width: usize,
    pub height: usize,
    pub start: Position,
    pub end: Position,
    pub generator: Generator,
    pub solver: Solver,
    /// Pace the solver and show its search on the grid.
    pub solver_step_by_step: bool,
    /// Whether the solver may run at all for this labyrinth.
    pub auto_player_enabled: bool,
}

impl LabyrinthSettings {
    pub const DEFAULT_WIDTH: usize = 5;
    pub const DEFAULT_HEIGHT: usize = 5;

    /// Settings for a `width` x `height` labyrinth going from the top-left corner to the
    /// bottom-right one.
    pub fn with_size(width: usize, height: usize) -> Self {
        LabyrinthSettings {
            width,
            height,
            start: Position::new(0, 0),
            end: Position::new(width.saturating_sub(1), height.saturating_sub(1)),
            generator: Generator::default(),
            solver: Solver::default(),
            solver_step_by_step: false,
            auto_player_enabled: true,
        }
    }

    /// Replace the endpoints with two distinct random cells derived from `seed`.
    /// Left untouched if the grid has fewer than two cells.
    pub fn with_random_endpoints(mut self, seed: i64) -> Self {
        if self.width * self.height < 2 {
            return self;
        }
        let mut rng = get_rng(seed);
        self.start = Position::random(self.width, self.height, &mut rng);
        self.end = loop {
            let end = Position::random(self.width, self.height, &mut rng);
            if end != self.start {
                break end;
            }
        };
        self
    }
}

impl Default for LabyrinthSettings {
    fn default() -> Self {
        LabyrinthSettings::with_size(Self::DEFAULT_WIDTH, Self::DEFAULT_HEIGHT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = LabyrinthSettings::default();
        assert_eq!((settings.width, settings.height), (5, 5));
        assert_eq!(settings.start, Position::new(0, 0));
        assert_eq!(settings.end, Position::new(4, 4));
        assert_eq!(settings.generator, Generator::GrowingTree);
        assert_eq!(settings.solver, Solver::Bfs);
        assert!(settings.auto_player_enabled);
    }

    #[test]
    fn test_random_endpoints_are_distinct_and_seeded() {
        for seed in 0..20 {
            let settings = LabyrinthSettings::with_size(2, 1).with_random_endpoints(seed);
            assert_ne!(settings.start, settings.end);
            assert_eq!(
                settings,
                LabyrinthSettings::with_size(2, 1).with_random_endpoints(seed)
            );
        }
    }
}
