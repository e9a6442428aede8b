use crate::maze::Direction;

/// The state of a cell or of one of its edges.
///
/// Edges only ever hold [`CellValue::Wall`] or [`CellValue::Empty`].
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CellValue {
    /// Not yet carved, impassable.
    #[default]
    Wall,
    /// Carved and never visited by the player.
    Empty,
    /// Carved and previously occupied by the player.
    Crossed,
    /// Visualization marker: the cell an algorithm is currently working on.
    Current,
    /// Visualization marker: a cell queued for later processing.
    Frontier,
}

impl CellValue {
    /// Whether this is one of the transient step-by-step markers.
    pub fn is_marker(self) -> bool {
        matches!(self, CellValue::Current | CellValue::Frontier)
    }
}

/// One grid square: its own value plus one edge state per direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cell {
    value: CellValue,
    /// Edges indexed by [`Direction::index`]: north, south, east, west.
    edges: [CellValue; 4],
}

impl Default for Cell {
    fn default() -> Self {
        Cell::WALL
    }
}

impl Cell {
    /// An uncarved cell closed on all four sides.
    pub const WALL: Cell = Cell {
        value: CellValue::Wall,
        edges: [CellValue::Wall; 4],
    };

    pub fn value(&self) -> CellValue {
        self.value
    }

    pub(crate) fn set_value(&mut self, value: CellValue) {
        self.value = value;
    }

    /// The edge on the `direction` side of this cell.
    pub fn edge(&self, direction: Direction) -> CellValue {
        self.edges[direction.index()]
    }

    pub(crate) fn set_edge(&mut self, direction: Direction, value: CellValue) {
        self.edges[direction.index()] = value;
    }

    /// The edge this cell shares with a neighbour located in the opposite of `direction`,
    /// i.e. the edge as seen from a cell that reached this one by moving `direction`.
    pub fn opposite_edge(&self, direction: Direction) -> CellValue {
        self.edge(direction.opposite())
    }

    pub(crate) fn set_opposite_edge(&mut self, direction: Direction, value: CellValue) {
        self.set_edge(direction.opposite(), value);
    }

    /// Whether a move from this cell into `neighbour`, lying in `direction`, is possible.
    ///
    /// Both sides of the shared edge must be open and the neighbour must be carved.
    pub fn can_move_to(&self, neighbour: &Cell, direction: Direction) -> bool {
        self.edge(direction) == CellValue::Empty
            && neighbour.opposite_edge(direction) == CellValue::Empty
            && neighbour.value != CellValue::Wall
    }

    /// Whether at least one of the four edges is open.
    pub fn has_open_edge(&self) -> bool {
        self.edges.iter().any(|&edge| edge != CellValue::Wall)
    }
}

/// How the west, north and north-west corner of a cell should be drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellAround {
    pub west: CellValue,
    pub north: CellValue,
    pub north_west: CellValue,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open(direction: Direction) -> Cell {
        let mut cell = Cell::WALL;
        cell.set_value(CellValue::Empty);
        cell.set_edge(direction, CellValue::Empty);
        cell
    }

    #[test]
    fn test_opposite_edge_addresses_shared_wall() {
        let mut cell = Cell::WALL;
        cell.set_opposite_edge(Direction::North, CellValue::Empty);
        assert_eq!(cell.edge(Direction::South), CellValue::Empty);
        assert_eq!(cell.opposite_edge(Direction::North), CellValue::Empty);
        assert_eq!(cell.edge(Direction::North), CellValue::Wall);
    }

    #[test]
    fn test_can_move_requires_all_three_conditions() {
        let current = open(Direction::East);
        let neighbour = open(Direction::West);
        assert!(current.can_move_to(&neighbour, Direction::East));

        // Closed on the neighbour's side
        let closed = open(Direction::North);
        assert!(!current.can_move_to(&closed, Direction::East));

        // Closed on the current side
        assert!(!open(Direction::South).can_move_to(&neighbour, Direction::East));

        // Edges open but the neighbour was never carved
        let mut uncarved = neighbour;
        uncarved.set_value(CellValue::Wall);
        assert!(!current.can_move_to(&uncarved, Direction::East));

        // Crossed cells stay passable
        let mut crossed = neighbour;
        crossed.set_value(CellValue::Crossed);
        assert!(current.can_move_to(&crossed, Direction::East));
    }

    #[test]
    fn test_open_edge_detection() {
        assert!(!Cell::WALL.has_open_edge());
        assert!(open(Direction::West).has_open_edge());
    }
}
