use std::sync::mpsc::Sender;

use super::cell::{Cell, CellValue};
use super::position::{Direction, Position};

/// Change notifications sent to an observer (e.g. a renderer) while the grid is mutated.
#[derive(Debug, Clone, PartialEq)]
pub enum GridEvent {
    /// Sent once when an observer subscribes, before any update.
    Initial { width: usize, height: usize },
    /// A cell changed its value or one of its edges.
    Update {
        position: Position,
        old: Cell,
        new: Cell,
    },
}

/// Row-major storage of the labyrinth cells.
///
/// All edge mutators keep the two sides of a shared wall in agreement.
pub struct Grid {
    cells: Box<[Cell]>,
    width: usize,
    height: usize,
    sender: Option<Sender<GridEvent>>,
}

impl Grid {
    /// Creates a grid with every cell uncarved and closed on all sides.
    pub fn new(width: usize, height: usize, sender: Option<Sender<GridEvent>>) -> Self {
        let cells = vec![Cell::WALL; width * height].into_boxed_slice();
        let mut grid = Grid {
            cells,
            width,
            height,
            sender: None,
        };
        grid.set_sender(sender);
        grid
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// All cells in row-major order.
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// All positions in row-major order.
    pub fn positions(&self) -> impl Iterator<Item = Position> + use<> {
        let (width, height) = (self.width, self.height);
        (0..height).flat_map(move |y| (0..width).map(move |x| Position::new(x, y)))
    }

    pub fn in_bounds(&self, position: Position) -> bool {
        position.x < self.width && position.y < self.height
    }

    /// Attach (or detach with `None`) the observer of grid changes.
    pub fn set_sender(&mut self, sender: Option<Sender<GridEvent>>) {
        self.sender = sender;
        self.emit(GridEvent::Initial {
            width: self.width,
            height: self.height,
        });
    }

    fn emit(&mut self, event: GridEvent) {
        let disconnected = self
            .sender
            .as_ref()
            .is_some_and(|sender| sender.send(event).is_err());
        if disconnected {
            tracing::debug!("[grid] observer disconnected, dropping event sender");
            self.sender = None;
        }
    }

    fn ravel_index(&self, position: Position) -> usize {
        position.y * self.width + position.x
    }

    /// Apply `f` to the cell at `position` and notify the observer if anything changed.
    fn update(&mut self, position: Position, f: impl FnOnce(&mut Cell)) {
        let idx = self.ravel_index(position);
        let old = self.cells[idx];
        f(&mut self.cells[idx]);
        let new = self.cells[idx];
        if old != new {
            self.emit(GridEvent::Update { position, old, new });
        }
    }

    pub fn value(&self, position: Position) -> CellValue {
        self[position].value()
    }

    pub fn set_value(&mut self, position: Position, value: CellValue) {
        self.update(position, |cell| cell.set_value(value));
    }

    /// Position reached by applying `direction_x` to x, or failing that `direction_y` to y.
    ///
    /// Only east/west are meaningful for `direction_x` and north/south for `direction_y`;
    /// passing the same direction twice steps one cell in that direction.
    /// Returns `None` if no supplied direction leads to an in-bounds cell.
    pub fn get_neighbour(
        &self,
        position: Position,
        direction_x: Option<Direction>,
        direction_y: Option<Direction>,
    ) -> Option<Position> {
        let Position { x, y } = position;

        if x < self.width {
            match direction_x {
                Some(Direction::East) if x + 1 < self.width => {
                    return Some(Position::new(x + 1, y));
                }
                Some(Direction::West) if x >= 1 => return Some(Position::new(x - 1, y)),
                _ => {}
            }
        }

        if y < self.height {
            match direction_y {
                Some(Direction::North) if y >= 1 => return Some(Position::new(x, y - 1)),
                Some(Direction::South) if y + 1 < self.height => {
                    return Some(Position::new(x, y + 1));
                }
                _ => {}
            }
        }

        None
    }

    /// The adjacent position in `direction`, if it lies inside the grid.
    pub fn neighbour(&self, position: Position, direction: Direction) -> Option<Position> {
        self.get_neighbour(position, Some(direction), Some(direction))
    }

    /// Direction leading from `from` to the adjacent cell `to`, if they are adjacent.
    pub fn direction_between(&self, from: Position, to: Position) -> Option<Direction> {
        if !self.in_bounds(from) || !self.in_bounds(to) {
            return None;
        }
        Direction::ALL
            .into_iter()
            .find(|&dir| self.neighbour(from, dir) == Some(to))
    }

    /// Open the edge between `position` and its neighbour in `direction` on both sides
    /// and mark both cells as carved. Returns the neighbour, or `None` at the border.
    pub fn carve(&mut self, position: Position, direction: Direction) -> Option<Position> {
        let next = self.neighbour(position, direction)?;
        self.update(position, |cell| {
            cell.set_value(CellValue::Empty);
            cell.set_edge(direction, CellValue::Empty);
        });
        self.update(next, |cell| {
            cell.set_value(CellValue::Empty);
            cell.set_opposite_edge(direction, CellValue::Empty);
        });
        Some(next)
    }

    /// Close the edge between `position` and its neighbour in `direction` on both sides.
    pub fn build_wall(&mut self, position: Position, direction: Direction) -> Option<Position> {
        let next = self.neighbour(position, direction)?;
        self.update(position, |cell| cell.set_edge(direction, CellValue::Wall));
        self.update(next, |cell| {
            cell.set_opposite_edge(direction, CellValue::Wall)
        });
        Some(next)
    }

    /// Whether a move from `position` one step in `direction` is possible.
    pub fn can_move(&self, position: Position, direction: Direction) -> bool {
        self.neighbour(position, direction)
            .is_some_and(|next| self[position].can_move_to(&self[next], direction))
    }

    /// Fill the whole grid with uncarved, fully closed cells.
    pub fn reset(&mut self) {
        for position in self.positions() {
            self.update(position, |cell| *cell = Cell::WALL);
        }
    }

    /// Carve every cell and open every interior edge. Border edges stay closed.
    pub fn erase(&mut self) {
        let (width, height) = (self.width, self.height);
        for position in self.positions() {
            self.update(position, |cell| {
                cell.set_value(CellValue::Empty);
                for dir in Direction::ALL {
                    let interior = match dir {
                        Direction::North => position.y > 0,
                        Direction::South => position.y + 1 < height,
                        Direction::West => position.x > 0,
                        Direction::East => position.x + 1 < width,
                    };
                    if interior {
                        cell.set_edge(dir, CellValue::Empty);
                    }
                }
            });
        }
    }
}

impl std::ops::Index<Position> for Grid {
    type Output = Cell;

    fn index(&self, position: Position) -> &Self::Output {
        &self.cells[self.ravel_index(position)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_neighbour_in_and_out_of_bounds() {
        let grid = Grid::new(3, 2, None);
        let origin = Position::new(0, 0);
        assert_eq!(grid.neighbour(origin, Direction::North), None);
        assert_eq!(grid.neighbour(origin, Direction::West), None);
        assert_eq!(
            grid.neighbour(origin, Direction::East),
            Some(Position::new(1, 0))
        );
        assert_eq!(
            grid.neighbour(origin, Direction::South),
            Some(Position::new(0, 1))
        );
        assert_eq!(grid.neighbour(Position::new(2, 1), Direction::East), None);
        assert_eq!(grid.neighbour(Position::new(2, 1), Direction::South), None);
    }

    #[test]
    fn test_get_neighbour_falls_back_to_y() {
        let grid = Grid::new(2, 2, None);
        // East is blocked by the border, so the south step is used
        assert_eq!(
            grid.get_neighbour(
                Position::new(1, 0),
                Some(Direction::East),
                Some(Direction::South)
            ),
            Some(Position::new(1, 1))
        );
        assert_eq!(grid.get_neighbour(Position::new(1, 0), None, None), None);
    }

    #[test]
    fn test_carve_keeps_shared_edges_in_agreement() {
        let mut grid = Grid::new(3, 3, None);
        let center = Position::new(1, 1);
        for dir in Direction::ALL {
            let next = grid.carve(center, dir).unwrap();
            assert_eq!(grid[center].edge(dir), CellValue::Empty);
            assert_eq!(grid[next].opposite_edge(dir), CellValue::Empty);
            assert!(grid.can_move(center, dir));
            assert!(grid.can_move(next, dir.opposite()));
        }
        grid.build_wall(center, Direction::East);
        assert!(!grid.can_move(center, Direction::East));
        assert!(!grid.can_move(Position::new(2, 1), Direction::West));
    }

    #[test]
    fn test_carve_at_border_is_noop() {
        let mut grid = Grid::new(2, 2, None);
        assert_eq!(grid.carve(Position::new(0, 0), Direction::North), None);
        assert_eq!(grid[Position::new(0, 0)], Cell::WALL);
    }

    #[test]
    fn test_direction_between() {
        let grid = Grid::new(3, 3, None);
        let center = Position::new(1, 1);
        assert_eq!(
            grid.direction_between(center, Position::new(1, 0)),
            Some(Direction::North)
        );
        assert_eq!(
            grid.direction_between(center, Position::new(0, 1)),
            Some(Direction::West)
        );
        assert_eq!(grid.direction_between(center, Position::new(2, 2)), None);
        assert_eq!(grid.direction_between(center, center), None);
    }

    #[test]
    fn test_erase_opens_interior_only() {
        let mut grid = Grid::new(2, 2, None);
        grid.erase();
        let corner = grid[Position::new(0, 0)];
        assert_eq!(corner.value(), CellValue::Empty);
        assert_eq!(corner.edge(Direction::North), CellValue::Wall);
        assert_eq!(corner.edge(Direction::West), CellValue::Wall);
        assert_eq!(corner.edge(Direction::East), CellValue::Empty);
        assert_eq!(corner.edge(Direction::South), CellValue::Empty);
        grid.reset();
        assert!(grid.cells().iter().all(|cell| *cell == Cell::WALL));
    }

    #[test]
    fn test_events_sent_only_on_change() {
        let (tx, rx) = std::sync::mpsc::channel();
        let mut grid = Grid::new(2, 1, Some(tx));
        assert_eq!(
            rx.try_recv(),
            Ok(GridEvent::Initial {
                width: 2,
                height: 1
            })
        );
        grid.set_value(Position::new(0, 0), CellValue::Wall);
        assert!(rx.try_recv().is_err());
        grid.carve(Position::new(0, 0), Direction::East);
        assert_eq!(rx.try_iter().count(), 2);
    }
}
