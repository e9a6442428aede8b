use std::{
    fmt,
    io::{self, Write},
};

use crossterm::{
    cursor, queue,
    style::{self, Color, Stylize},
    terminal::{self, ClearType},
};
use labyrinth::{Cell, CellValue, Direction, GridEvent, Position};

/// One character cell of the block rendering: labyrinth cells sit on odd
/// coordinates, the edges and corners between them on even ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tile {
    Wall,
    Empty,
    Crossed,
    Current,
    Frontier,
    Start,
    Goal,
    Player,
}

impl Tile {
    /// The width of each tile when rendered, in character widths.
    pub const WIDTH: u16 = 2;

    fn symbol(&self) -> &'static str {
        match self {
            Tile::Wall => "⬜",
            Tile::Empty => "  ",
            Tile::Crossed => "· ",
            Tile::Current => "🟪",
            Tile::Frontier => "* ",
            Tile::Start => "🟩",
            Tile::Goal => "🟥",
            Tile::Player => "🟡",
        }
    }

    fn color(&self) -> Color {
        match self {
            Tile::Wall => Color::White,
            Tile::Empty => Color::Reset,
            Tile::Crossed => Color::DarkGrey,
            Tile::Current => Color::Magenta,
            Tile::Frontier => Color::Blue,
            Tile::Start => Color::Green,
            Tile::Goal => Color::Red,
            Tile::Player => Color::Yellow,
        }
    }
}

impl fmt::Display for Tile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let styled_symbol = self.symbol().with(self.color());

        #[cfg(debug_assertions)]
        {
            use unicode_width::UnicodeWidthStr;
            assert_eq!(
                styled_symbol.content().width(),
                Tile::WIDTH as usize,
                "Each tile must occupy exactly two character widths."
            );
        }

        write!(f, "{}", styled_symbol)
    }
}

/// A copy of the labyrinth cells kept up to date from [`GridEvent`]s, so the view
/// never needs the lock a running algorithm holds.
pub struct Mirror {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl Mirror {
    pub fn new(width: usize, height: usize) -> Self {
        Mirror {
            width,
            height,
            cells: vec![Cell::WALL; width * height],
        }
    }

    pub fn apply(&mut self, event: GridEvent) {
        match event {
            GridEvent::Initial { width, height } => *self = Mirror::new(width, height),
            GridEvent::Update { position, new, .. } => {
                if position.x < self.width && position.y < self.height {
                    self.cells[position.y * self.width + position.x] = new;
                }
            }
        }
    }

    fn cell(&self, x: usize, y: usize) -> &Cell {
        &self.cells[y * self.width + x]
    }

    /// Whether the `direction` side of the cell at `(x, y)` is closed.
    fn closed(&self, x: usize, y: usize, direction: Direction) -> bool {
        self.cell(x, y).edge(direction) == CellValue::Wall
    }

    /// The block rendering, `2 * height + 1` rows of `2 * width + 1` tiles.
    pub fn tiles(&self, player: Position, start: Position, end: Position) -> Vec<Vec<Tile>> {
        let (columns, rows) = (2 * self.width + 1, 2 * self.height + 1);
        let mut tiles = vec![vec![Tile::Wall; columns]; rows];

        for y in 0..self.height {
            for x in 0..self.width {
                let position = Position::new(x, y);
                tiles[2 * y + 1][2 * x + 1] = if position == player {
                    Tile::Player
                } else if position == end {
                    Tile::Goal
                } else if position == start {
                    Tile::Start
                } else {
                    match self.cell(x, y).value() {
                        CellValue::Wall => Tile::Wall,
                        CellValue::Empty => Tile::Empty,
                        CellValue::Crossed => Tile::Crossed,
                        CellValue::Current => Tile::Current,
                        CellValue::Frontier => Tile::Frontier,
                    }
                };

                if x + 1 < self.width
                    && !self.closed(x, y, Direction::East)
                    && !self.closed(x + 1, y, Direction::West)
                {
                    tiles[2 * y + 1][2 * x + 2] = Tile::Empty;
                }
                if y + 1 < self.height
                    && !self.closed(x, y, Direction::South)
                    && !self.closed(x, y + 1, Direction::North)
                {
                    tiles[2 * y + 2][2 * x + 1] = Tile::Empty;
                }
            }
        }

        // A corner is open only if none of the four edges meeting there is closed
        for y in 1..self.height {
            for x in 1..self.width {
                let (cx, cy) = (2 * x, 2 * y);
                let open = [
                    tiles[cy - 1][cx],
                    tiles[cy + 1][cx],
                    tiles[cy][cx - 1],
                    tiles[cy][cx + 1],
                ]
                .iter()
                .all(|&tile| tile != Tile::Wall);
                if open {
                    tiles[cy][cx] = Tile::Empty;
                }
            }
        }
        tiles
    }

    /// Redraw the whole labyrinth at the top-left of the terminal, followed by `status`.
    pub fn draw(
        &self,
        out: &mut impl Write,
        player: Position,
        start: Position,
        end: Position,
        status: &str,
    ) -> io::Result<()> {
        queue!(out, terminal::Clear(ClearType::All), cursor::MoveTo(0, 0))?;
        for row in self.tiles(player, start, end) {
            for tile in row {
                queue!(out, style::Print(tile))?;
            }
            queue!(out, style::Print("\r\n"))?;
        }
        queue!(out, style::Print(status), style::Print("\r\n"))?;
        out.flush()
    }
}
