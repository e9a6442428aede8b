pub mod cell;
mod grid;
mod position;

use std::{fmt, sync::mpsc::Receiver};

pub use cell::{Cell, CellAround, CellValue};
pub use grid::{Grid, GridEvent};
pub use position::{Direction, Position};

use crate::{
    error::{LabyrinthError, Result},
    generators::{Generator, generate_maze, get_rng},
    player::Player,
    settings::LabyrinthSettings,
    solvers::SolvingStrategy,
    stepping::{CancelToken, Stepper},
};

/// How a call to [`Labyrinth::generate_with`] ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationOutcome {
    /// The algorithm ran to completion; the grid is a perfect maze.
    Completed,
    /// The algorithm was cancelled midway; the grid may not be spanning.
    Stopped,
}

/// A rectangular labyrinth: the cell grid, its endpoints, the algorithms used to
/// carve and solve it, and the player walking through it.
pub struct Labyrinth {
    grid: Grid,
    start: Position,
    end: Position,
    generator: Generator,
    solving: SolvingStrategy,
    player: Player,
    auto_player_enabled: bool,
    auto_player: bool,
    generation_finished: bool,
    generation_complete: bool,
}

impl Labyrinth {
    /// Creates an uncarved labyrinth.
    ///
    /// Fails if the grid would hold fewer than two cells, or if `start` or `end` lies
    /// outside of it.
    pub fn new(
        width: usize,
        height: usize,
        start: Position,
        end: Position,
        generator: Generator,
        solving: SolvingStrategy,
        auto_player_enabled: bool,
    ) -> Result<Self> {
        if width == 0 || height == 0 || width * height <= 1 {
            return Err(LabyrinthError::InvalidDimensions { width, height });
        }
        for position in [start, end] {
            if position.x >= width || position.y >= height {
                return Err(LabyrinthError::OutOfBounds {
                    x: position.x,
                    y: position.y,
                    width,
                    height,
                });
            }
        }

        Ok(Labyrinth {
            grid: Grid::new(width, height, None),
            start,
            end,
            generator,
            solving,
            player: Player::new(start),
            auto_player_enabled,
            auto_player: false,
            generation_finished: false,
            generation_complete: false,
        })
    }

    pub fn from_settings(settings: &LabyrinthSettings) -> Result<Self> {
        Labyrinth::new(
            settings.width,
            settings.height,
            settings.start,
            settings.end,
            settings.generator,
            SolvingStrategy::new(settings.solver, settings.solver_step_by_step),
            settings.auto_player_enabled,
        )
    }

    pub fn width(&self) -> usize {
        self.grid.width()
    }

    pub fn height(&self) -> usize {
        self.grid.height()
    }

    pub fn start(&self) -> Position {
        self.start
    }

    pub fn end(&self) -> Position {
        self.end
    }

    pub fn generator(&self) -> Generator {
        self.generator
    }

    pub fn solving(&self) -> &SolvingStrategy {
        &self.solving
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn cell(&self, position: Position) -> Option<&Cell> {
        self.grid.in_bounds(position).then(|| &self.grid[position])
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    /// Stream of every cell change from now on, starting with a
    /// [`GridEvent::Initial`]. Replaces any previous subscriber.
    pub fn subscribe(&mut self) -> Receiver<GridEvent> {
        let (tx, rx) = std::sync::mpsc::channel();
        self.grid.set_sender(Some(tx));
        rx
    }

    /// Carve the labyrinth without step-by-step pacing or cancellation.
    pub fn generate(&mut self, seed: i64, step_by_step: bool) -> GenerationOutcome {
        self.generate_with(seed, step_by_step, &CancelToken::new())
    }

    /// Carve the labyrinth with the configured algorithm, seeded by `seed`.
    ///
    /// The grid is reset and a new player placed on the start cell first, so the same
    /// seed always yields the same layout. The labyrinth counts as finished once this
    /// returns, whether or not `cancel` stopped it.
    pub fn generate_with(
        &mut self,
        seed: i64,
        step_by_step: bool,
        cancel: &CancelToken,
    ) -> GenerationOutcome {
        self.generation_finished = false;
        self.generation_complete = false;
        self.grid.reset();
        self.player = Player::new(self.start);
        self.grid.set_value(self.start, CellValue::Empty);

        let mut rng = get_rng(seed);
        let stepper = Stepper::new(step_by_step, cancel);
        let carved = generate_maze(
            &mut self.grid,
            self.generator,
            &mut rng,
            self.start,
            self.end,
            &stepper,
        );

        self.generation_finished = true;
        self.generation_complete = carved.is_ok();
        let outcome = if self.generation_complete {
            GenerationOutcome::Completed
        } else {
            GenerationOutcome::Stopped
        };
        tracing::info!(
            "[generate] {} on {}x{} with seed {}: {:?}",
            self.generator,
            self.width(),
            self.height(),
            seed,
            outcome
        );
        outcome
    }

    /// The generate call returned, completed or stopped.
    pub fn is_generation_finished(&self) -> bool {
        self.generation_finished
    }

    /// The generate call ran to completion.
    pub fn is_generation_complete(&self) -> bool {
        self.generation_complete
    }

    /// See [`Grid::get_neighbour`].
    pub fn get_neighbour(
        &self,
        position: Position,
        direction_x: Option<Direction>,
        direction_y: Option<Direction>,
    ) -> Option<Position> {
        self.grid.get_neighbour(position, direction_x, direction_y)
    }

    pub fn neighbour(&self, position: Position, direction: Direction) -> Option<Position> {
        self.grid.neighbour(position, direction)
    }

    pub fn direction_between(&self, from: Position, to: Position) -> Option<Direction> {
        self.grid.direction_between(from, to)
    }

    pub fn can_move_to(&self, current: &Cell, neighbour: &Cell, direction: Direction) -> bool {
        current.can_move_to(neighbour, direction)
    }

    pub fn is_auto_player_enabled(&self) -> bool {
        self.auto_player_enabled
    }

    /// Whether the solver is allowed to run.
    pub fn is_auto_player(&self) -> bool {
        self.auto_player_enabled && self.auto_player
    }

    pub fn set_auto_player(&mut self, auto_player: bool) {
        self.auto_player = auto_player;
    }

    pub fn is_searching_path(&self) -> bool {
        self.solving.is_searching_path()
    }

    /// A path from the player to the end, both included. See [`Labyrinth::get_path_with`].
    pub fn get_path(&mut self) -> Option<Vec<Position>> {
        self.get_path_with(&CancelToken::new())
    }

    /// Run the configured solver from the player's position to the end.
    ///
    /// Returns `None` when the auto player is off, when the player already stands on
    /// the end, when a search is in flight, or when no path exists.
    pub fn get_path_with(&mut self, cancel: &CancelToken) -> Option<Vec<Position>> {
        if !self.is_auto_player() {
            return None;
        }
        self.solving
            .get_path(&mut self.grid, self.player.position(), self.end, cancel)
    }

    /// How the west side, north side and north-west corner of a cell are drawn.
    ///
    /// A side is a wall when a neighbour exists on that side and both halves of the
    /// shared edge are closed. The corner is a wall when any of the four edges meeting
    /// there is.
    pub fn get_cell_around(&self, position: Position) -> Option<CellAround> {
        if !self.grid.in_bounds(position) {
            return None;
        }
        let west_of = |pos: Position| self.closed_side(pos, Direction::West);
        let north_of = |pos: Position| self.closed_side(pos, Direction::North);

        let west = west_of(position);
        let north = north_of(position);
        let north_west = west
            || north
            || self
                .grid
                .neighbour(position, Direction::North)
                .is_some_and(west_of)
            || self
                .grid
                .neighbour(position, Direction::West)
                .is_some_and(north_of);

        let value = |wall: bool| if wall { CellValue::Wall } else { CellValue::Empty };
        Some(CellAround {
            west: value(west),
            north: value(north),
            north_west: value(north_west),
        })
    }

    fn closed_side(&self, position: Position, direction: Direction) -> bool {
        self.grid.neighbour(position, direction).is_some_and(|next| {
            self.grid[position].edge(direction) == CellValue::Wall
                && self.grid[next].opposite_edge(direction) == CellValue::Wall
        })
    }

    /// [`Labyrinth::get_cell_around`] for every cell in row-major order.
    pub fn all_cells_around(&self) -> Vec<CellAround> {
        self.grid
            .positions()
            .filter_map(|position| self.get_cell_around(position))
            .collect()
    }

    /// Move the player one cell. Returns whether the move happened.
    pub fn move_player(&mut self, direction: Direction) -> bool {
        self.player.move_to(&mut self.grid, direction)
    }

    pub fn goal_achieved(&self) -> bool {
        self.player.goal_achieved(self.end)
    }

    /// Re-evaluate whether the player can still reach the end.
    /// Returns `None` if `cancel` fired before an answer was found.
    pub fn check_blocked(&mut self, cancel: &CancelToken) -> Option<bool> {
        self.player.check_blocked(&self.grid, self.end, cancel)
    }

    pub fn is_blocked(&self) -> bool {
        self.player.is_blocked()
    }

    /// Replay `path` as player moves. The first entry may be the player's own cell.
    /// Stops at the first move that fails; returns whether the end was reached.
    pub fn follow_path(&mut self, path: &[Position]) -> bool {
        for &next in path {
            if next == self.player.position() {
                continue;
            }
            let Some(direction) = self.direction_between(self.player.position(), next) else {
                tracing::warn!("[player] {} is not adjacent to {}", next, self.player.position());
                return false;
            };
            if !self.move_player(direction) {
                return false;
            }
        }
        self.goal_achieved()
    }
}

impl fmt::Display for Labyrinth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let closed = |position: Position, direction: Direction| {
            self.grid[position].edge(direction) == CellValue::Wall
                || self
                    .grid
                    .neighbour(position, direction)
                    .is_some_and(|next| self.grid[next].opposite_edge(direction) == CellValue::Wall)
        };

        write!(f, "+")?;
        for _ in 0..self.width() {
            write!(f, "--+")?;
        }
        for y in 0..self.height() {
            write!(f, "\n|")?;
            for x in 0..self.width() {
                let position = Position::new(x, y);
                let body = if position == self.player.position() {
                    "00"
                } else {
                    match self.grid.value(position) {
                        CellValue::Wall => "##",
                        CellValue::Crossed => "~~",
                        _ => "  ",
                    }
                };
                let side = if closed(position, Direction::East) { "|" } else { " " };
                write!(f, "{body}{side}")?;
            }
            writeln!(f)?;
            for x in 0..self.width() {
                let floor = if closed(Position::new(x, y), Direction::South) {
                    "--"
                } else {
                    "  "
                };
                write!(f, "+{floor}")?;
            }
            write!(f, "+")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::solvers::Solver;

    fn labyrinth(width: usize, height: usize, generator: Generator) -> Labyrinth {
        Labyrinth::new(
            width,
            height,
            Position::new(0, 0),
            Position::new(width - 1, height - 1),
            generator,
            SolvingStrategy::default(),
            true,
        )
        .unwrap()
    }

    #[test]
    fn test_degenerate_dimensions_rejected() {
        for (width, height) in [(0, 5), (5, 0), (1, 1), (0, 0)] {
            let result = Labyrinth::new(
                width,
                height,
                Position::new(0, 0),
                Position::new(0, 0),
                Generator::default(),
                SolvingStrategy::default(),
                true,
            );
            assert_eq!(
                result.err(),
                Some(LabyrinthError::InvalidDimensions { width, height })
            );
        }
        assert_eq!(labyrinth(1, 2, Generator::default()).grid().cells().len(), 2);
    }

    #[test]
    fn test_endpoints_must_be_in_bounds() {
        let result = Labyrinth::new(
            3,
            3,
            Position::new(0, 0),
            Position::new(3, 1),
            Generator::default(),
            SolvingStrategy::default(),
            true,
        );
        assert_eq!(
            result.err(),
            Some(LabyrinthError::OutOfBounds {
                x: 3,
                y: 1,
                width: 3,
                height: 3
            })
        );
    }

    #[test]
    fn test_generation_flags() {
        let mut lab = labyrinth(4, 4, Generator::Prim);
        assert!(!lab.is_generation_finished());
        assert_eq!(lab.generate(7, false), GenerationOutcome::Completed);
        assert!(lab.is_generation_finished());
        assert!(lab.is_generation_complete());

        let token = CancelToken::new();
        token.cancel();
        assert_eq!(lab.generate_with(7, false, &token), GenerationOutcome::Stopped);
        assert!(lab.is_generation_finished());
        assert!(!lab.is_generation_complete());
    }

    #[test]
    fn test_regeneration_is_deterministic_and_resets_player() {
        let mut lab = labyrinth(6, 5, Generator::HuntAndKill);
        lab.generate(99, false);
        let first = lab.grid().cells().to_vec();

        lab.set_auto_player(true);
        let path = lab.get_path().unwrap();
        assert!(lab.follow_path(&path));
        assert_eq!(lab.player().position(), lab.end());

        lab.generate(99, false);
        assert_eq!(lab.grid().cells(), &first[..]);
        assert_eq!(lab.player().position(), lab.start());
    }

    #[test]
    fn test_get_path_gated_by_auto_player() {
        let mut lab = labyrinth(4, 3, Generator::Wilson);
        lab.generate(3, false);
        assert_eq!(lab.get_path(), None);

        lab.set_auto_player(true);
        let path = lab.get_path().unwrap();
        assert_eq!(path.first(), Some(&lab.start()));
        assert_eq!(path.last(), Some(&lab.end()));

        let mut disabled = Labyrinth::new(
            4,
            3,
            Position::new(0, 0),
            Position::new(3, 2),
            Generator::Wilson,
            SolvingStrategy::new(Solver::AStar, false),
            false,
        )
        .unwrap();
        disabled.generate(3, false);
        disabled.set_auto_player(true);
        assert!(!disabled.is_auto_player());
        assert_eq!(disabled.get_path(), None);
    }

    #[test]
    fn test_cell_around() {
        let mut lab = labyrinth(2, 2, Generator::default());
        // Fully closed grid: every inner side is a wall, outer sides are not drawn
        let origin = lab.get_cell_around(Position::new(0, 0)).unwrap();
        assert_eq!(origin.west, CellValue::Empty);
        assert_eq!(origin.north, CellValue::Empty);
        assert_eq!(origin.north_west, CellValue::Empty);

        let corner = lab.get_cell_around(Position::new(1, 1)).unwrap();
        assert_eq!(corner.west, CellValue::Wall);
        assert_eq!(corner.north, CellValue::Wall);
        assert_eq!(corner.north_west, CellValue::Wall);

        // Open everything but the wall between the two top cells
        lab.grid.erase();
        lab.grid.build_wall(Position::new(0, 0), Direction::East);
        let corner = lab.get_cell_around(Position::new(1, 1)).unwrap();
        assert_eq!(corner.west, CellValue::Empty);
        assert_eq!(corner.north, CellValue::Empty);
        assert_eq!(corner.north_west, CellValue::Wall);

        assert_eq!(lab.all_cells_around().len(), 4);
        assert_eq!(lab.get_cell_around(Position::new(2, 0)), None);
    }

    #[test]
    fn test_display() {
        let mut lab = labyrinth(2, 2, Generator::default());
        lab.grid.erase();
        lab.grid.build_wall(Position::new(0, 1), Direction::East);
        assert!(lab.move_player(Direction::East));
        let expected = "+--+--+\n|~~ 00|\n+  +  +\n|  |  |\n+--+--+";
        assert_eq!(lab.to_string(), expected);
    }

    #[test]
    fn test_subscribe_streams_changes() {
        let mut lab = labyrinth(3, 2, Generator::BinaryTree);
        let rx = lab.subscribe();
        assert_eq!(
            rx.recv().unwrap(),
            GridEvent::Initial {
                width: 3,
                height: 2
            }
        );
        lab.generate(1, false);
        assert!(rx.try_iter().count() > 0);
    }

    #[test]
    fn test_follow_path_stops_on_bad_step() {
        let mut lab = labyrinth(3, 3, Generator::RecurBacktrack);
        lab.generate(5, false);
        assert!(!lab.follow_path(&[Position::new(2, 2)]));
        assert_eq!(lab.player().position(), lab.start());
    }
}
