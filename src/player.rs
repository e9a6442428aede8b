use std::collections::HashSet;

use crate::{
    maze::{CellValue, Direction, Grid, Position},
    stepping::CancelToken,
};

/// The agent walking through a generated labyrinth.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Player {
    position: Position,
    /// Last attempted move, successful or not.
    direction: Direction,
    /// Sticky: once set, never re-evaluated until a new player is created.
    blocked: bool,
    /// Cleared by a completed blocked check, set again by every successful move.
    needs_check: bool,
}

impl Player {
    pub fn new(position: Position) -> Self {
        Player {
            position,
            direction: Direction::South,
            blocked: false,
            needs_check: true,
        }
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn is_blocked(&self) -> bool {
        self.blocked
    }

    pub fn goal_achieved(&self, goal: Position) -> bool {
        self.position == goal
    }

    /// Try to move one cell in `direction`, leaving a crossed cell behind.
    ///
    /// The facing direction is updated even when the move is refused.
    pub fn move_to(&mut self, grid: &mut Grid, direction: Direction) -> bool {
        self.direction = direction;

        let Some(next) = grid.neighbour(self.position, direction) else {
            return false;
        };
        if !grid.can_move(self.position, direction) {
            return false;
        }

        grid.set_value(self.position, CellValue::Crossed);
        self.position = next;
        self.needs_check = true;
        true
    }

    /// Decide whether the goal is still reachable without walking back over crossed cells.
    ///
    /// Flood fills from `goal` through empty cells until the player's cell is reached.
    /// Returns `None` if `cancel` fired first, in which case nothing is recorded.
    pub fn check_blocked(
        &mut self,
        grid: &Grid,
        goal: Position,
        cancel: &CancelToken,
    ) -> Option<bool> {
        if self.blocked || !self.needs_check {
            return Some(self.blocked);
        }
        if self.position == goal {
            self.needs_check = false;
            return Some(false);
        }

        const PROBE_ORDER: [Direction; 4] = [
            Direction::North,
            Direction::South,
            Direction::West,
            Direction::East,
        ];

        let mut stack = vec![goal];
        let mut seen = HashSet::from([goal]);
        while let Some(current) = stack.pop() {
            if cancel.is_cancelled() {
                return None;
            }
            for dir in PROBE_ORDER {
                if cancel.is_cancelled() {
                    return None;
                }
                let Some(next) = grid.neighbour(current, dir) else {
                    continue;
                };
                if seen.contains(&next) || !grid.can_move(current, dir) {
                    continue;
                }
                if next == self.position {
                    self.needs_check = false;
                    return Some(false);
                }
                if grid.value(next) == CellValue::Empty {
                    seen.insert(next);
                    stack.push(next);
                }
            }
        }

        tracing::info!("[player] blocked at {}, goal {} unreachable", self.position, goal);
        self.needs_check = false;
        self.blocked = true;
        Some(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A 4x1 corridor, fully carved.
    fn corridor() -> Grid {
        let mut grid = Grid::new(4, 1, None);
        grid.erase();
        grid
    }

    #[test]
    fn test_move_marks_crossed_and_turns() {
        let mut grid = corridor();
        let mut player = Player::new(Position::new(0, 0));
        assert_eq!(player.direction(), Direction::South);

        assert!(!player.move_to(&mut grid, Direction::North));
        assert_eq!(player.direction(), Direction::North);
        assert_eq!(player.position(), Position::new(0, 0));

        assert!(player.move_to(&mut grid, Direction::East));
        assert_eq!(player.position(), Position::new(1, 0));
        assert_eq!(grid.value(Position::new(0, 0)), CellValue::Crossed);
        assert_eq!(grid.value(Position::new(1, 0)), CellValue::Empty);
    }

    #[test]
    fn test_move_refused_by_wall() {
        let mut grid = corridor();
        grid.build_wall(Position::new(0, 0), Direction::East);
        let mut player = Player::new(Position::new(0, 0));
        assert!(!player.move_to(&mut grid, Direction::East));
        assert_eq!(grid.value(Position::new(0, 0)), CellValue::Empty);
    }

    #[test]
    fn test_not_blocked_on_open_corridor() {
        let grid = corridor();
        let mut player = Player::new(Position::new(0, 0));
        let token = CancelToken::new();
        assert_eq!(player.check_blocked(&grid, Position::new(3, 0), &token), Some(false));
        assert!(!player.is_blocked());
    }

    #[test]
    fn test_blocked_is_sticky() {
        // The only way back to the goal runs over the crossed cell
        let mut grid = Grid::new(3, 1, None);
        grid.erase();
        let goal = Position::new(0, 0);
        let mut player = Player::new(Position::new(1, 0));
        assert!(player.move_to(&mut grid, Direction::East));

        let token = CancelToken::new();
        assert_eq!(player.check_blocked(&grid, goal, &token), Some(true));
        assert!(player.is_blocked());

        // Even if the wall situation changed, the answer stays
        grid.set_value(Position::new(1, 0), CellValue::Empty);
        assert_eq!(player.check_blocked(&grid, goal, &token), Some(true));
    }

    #[test]
    fn test_at_goal_is_never_blocked() {
        let grid = Grid::new(2, 1, None);
        let mut player = Player::new(Position::new(1, 0));
        let token = CancelToken::new();
        assert_eq!(player.check_blocked(&grid, Position::new(1, 0), &token), Some(false));
    }

    #[test]
    fn test_cancelled_check_records_nothing() {
        let mut grid = Grid::new(3, 1, None);
        grid.erase();
        let mut player = Player::new(Position::new(1, 0));
        assert!(player.move_to(&mut grid, Direction::East));

        let token = CancelToken::new();
        token.cancel();
        assert_eq!(player.check_blocked(&grid, Position::new(0, 0), &token), None);
        assert!(!player.is_blocked());

        let fresh = CancelToken::new();
        assert_eq!(player.check_blocked(&grid, Position::new(0, 0), &fresh), Some(true));
    }
}
