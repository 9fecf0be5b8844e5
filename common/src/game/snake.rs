use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use super::types::{Direction, Position};

/// Snake body, head first, tail last. Length is always at least 1.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snake {
    pub body: VecDeque<Position>,
}

impl Snake {
    /// Builds a snake whose segments trail behind the head, opposite the
    /// heading, wrapping around the grid if the trail crosses an edge.
    pub fn spawn(head: Position, direction: Direction, length: usize, grid_size: usize) -> Self {
        let (dx, dy) = match direction {
            Direction::Up => (0i32, 1i32),
            Direction::Down => (0i32, -1i32),
            Direction::Left => (1i32, 0i32),
            Direction::Right => (-1i32, 0i32),
        };

        let size = grid_size as i32;
        let mut body = VecDeque::with_capacity(length.max(1));
        let mut segment = head;
        body.push_back(segment);

        for _ in 1..length.max(1) {
            segment = Position::new(
                ((segment.x as i32 + dx + size) % size) as usize,
                ((segment.y as i32 + dy + size) % size) as usize,
            );
            body.push_back(segment);
        }

        Self { body }
    }

    pub fn from_segments(segments: Vec<Position>) -> Self {
        assert!(!segments.is_empty(), "Snake body should never be empty");
        Self {
            body: segments.into(),
        }
    }

    pub fn head(&self) -> Position {
        *self.body.front().expect("Snake body should never be empty")
    }

    pub fn tail(&self) -> Position {
        *self.body.back().expect("Snake body should never be empty")
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    pub fn contains(&self, position: Position) -> bool {
        self.body.contains(&position)
    }

    /// One movement step as a new value: the head is prepended, and unless
    /// the snake grows this step the tail cell is vacated.
    pub fn advanced(&self, new_head: Position, grow: bool) -> Snake {
        let mut body = self.body.clone();
        body.push_front(new_head);
        if !grow {
            body.pop_back();
        }
        Snake { body }
    }
}
