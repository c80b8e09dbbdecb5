use std::collections::{HashSet, VecDeque};

use crate::{Coords, GridInt};
use Direction::*;
use MoveResult::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right
}

impl Direction {
    pub fn opposite(self) -> Direction {
        match self {
            Up => Down,
            Down => Up,
            Left => Right,
            Right => Left,
        }
    }

    fn delta(self) -> (i32, i32) {
        match self {
            Up => (0, -1),
            Down => (0, 1),
            Left => (-1, 0),
            Right => (1, 0),
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum MoveResult {
    Moved { new_head: Coords, old_tail: Option<Coords> },
    Crashed
}

/// The snake's body lives on a toroidal grid: leaving one edge re-enters on
/// the opposite one. The head is the front of `body`.
#[derive(Debug)]
pub struct Snake {
    body: VecDeque<Coords>,
    direction: Direction,
    next_direction: Direction,
    grow_next_move: bool,
    grid: Coords,
}

impl Snake {
    /// Builds a straight snake with its head on `pos`, the rest of the body
    /// trailing behind it (opposite to `direction`).
    pub fn new(pos: Coords, size: GridInt, direction: Direction, grid: Coords) -> Self {
        let (dx, dy) = direction.delta();

        let body = (0..size as i32)
            .map(|i| wrap(pos, (-dx * i, -dy * i), grid))
            .collect();
        Snake { body, direction, next_direction: direction, grow_next_move: false, grid }
    }

    pub fn head(&self) -> Coords {
        self.body[0]
    }

    pub fn body(&self) -> impl DoubleEndedIterator<Item = &Coords> + ExactSizeIterator + '_ {
        self.body.iter()
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn contains(&self, pos: Coords) -> bool {
        self.body.contains(&pos)
    }

    pub fn occupied(&self) -> HashSet<Coords> {
        self.body.iter().copied().collect()
    }

    /// Moves one cell forward. The collision check runs against the whole
    /// body as it is before the move, tail included, and a crash leaves the
    /// snake untouched.
    pub fn move_step(&mut self) -> MoveResult {
        let direction = if self.next_direction != self.direction.opposite() {
            self.next_direction
        } else {
            self.direction
        };

        let new_head = wrap(self.head(), direction.delta(), self.grid);

        if self.body.contains(&new_head) {
            return Crashed;
        }

        self.direction = direction;
        self.body.push_front(new_head);

        if self.grow_next_move {
            self.grow_next_move = false;
            Moved { new_head, old_tail: None }
        } else {
            let old_tail = self.body.pop_back();
            Moved { new_head, old_tail }
        }
    }

    /// Requests a turn for the next move. Reversals are dropped when the move
    /// happens, not here, so a later valid key press still wins.
    pub fn set_direction(&mut self, new_direction: Direction) {
        self.next_direction = new_direction;
    }

    pub fn get_direction(&self) -> Direction {
        self.direction
    }

    pub fn grow(&mut self) {
        self.grow_next_move = true;
    }

    #[cfg(test)]
    pub fn is_growing(&self) -> bool {
        self.grow_next_move
    }

    pub fn head_char(&self) -> char {
        match self.direction {
            Up => '^',
            Down => 'v',
            Left => '<',
            Right => '>',
        }
    }
}

fn wrap(pos: Coords, (dx, dy): (i32, i32), (width, height): Coords) -> Coords {
    let x = (pos.0 as i32 + dx).rem_euclid(width as i32);
    let y = (pos.1 as i32 + dy).rem_euclid(height as i32);
    (x as GridInt, y as GridInt)
}
