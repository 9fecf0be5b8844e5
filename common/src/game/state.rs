use serde::{Deserialize, Serialize};

use super::session_rng::SessionRng;
use super::settings::GameSettings;
use super::snake::Snake;
use super::types::{Direction, GameMode, Position};

/// Full state of one game session. Transitions never mutate in place: every
/// entry point returns a fresh value, so hosts can keep or replay old states
/// freely. Once `game_over` is set the state is terminal and every
/// transition returns it unchanged.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    pub snake: Snake,
    pub food: Position,
    pub direction: Direction,
    pub score: u32,
    pub game_over: bool,
    pub paused: bool,
    pub mode: GameMode,
    pub speed_ms: u64,
}

impl GameState {
    /// Fresh session: a centered snake heading right, one food item off the
    /// snake, score zero, running.
    pub fn new(mode: GameMode, settings: &GameSettings, rng: &mut SessionRng) -> Self {
        let center = settings.grid_size / 2;
        let snake = Snake::spawn(
            Position::new(center, center),
            Direction::Right,
            settings.initial_snake_length,
            settings.grid_size,
        );
        let food = spawn_food(&snake, settings.grid_size, rng);

        Self {
            snake,
            food,
            direction: Direction::Right,
            score: 0,
            game_over: false,
            paused: false,
            mode,
            speed_ms: settings.initial_speed_ms,
        }
    }

    /// Requests a heading change for the next tick. A 180° reversal into the
    /// snake's own neck is always rejected, whatever the snake's length, and
    /// a finished game no longer accepts input. Callable any number of times
    /// between ticks; the latest accepted heading is the one the tick uses.
    pub fn request_direction(&self, requested: Direction) -> Self {
        if self.game_over || requested.is_opposite(&self.direction) {
            return self.clone();
        }
        Self {
            direction: requested,
            ..self.clone()
        }
    }

    pub fn toggle_pause(&self) -> Self {
        if self.game_over {
            return self.clone();
        }
        Self {
            paused: !self.paused,
            ..self.clone()
        }
    }

    /// Advances the game by exactly one cell. Ticking a paused or finished
    /// game is a no-op returning the state unchanged.
    pub fn tick(&self, settings: &GameSettings, rng: &mut SessionRng) -> Self {
        if self.game_over || self.paused {
            return self.clone();
        }

        let next_head = match next_head_position(
            self.snake.head(),
            self.direction,
            self.mode,
            settings.grid_size,
        ) {
            Some(position) => position,
            None => {
                return Self {
                    game_over: true,
                    ..self.clone()
                };
            }
        };

        if self.hits_own_body(next_head) {
            return Self {
                game_over: true,
                ..self.clone()
            };
        }

        if next_head == self.food {
            let snake = self.snake.advanced(next_head, true);
            let score = self.score + settings.food_reward;
            let food = spawn_food(&snake, settings.grid_size, rng);
            return Self {
                snake,
                food,
                score,
                speed_ms: settings.speed_for_score(score),
                ..self.clone()
            };
        }

        Self {
            snake: self.snake.advanced(next_head, false),
            ..self.clone()
        }
    }

    /// The tail cell being vacated this step does not count: moving into the
    /// spot the tail leaves behind is legal. A length-1 snake can never
    /// collide with itself.
    fn hits_own_body(&self, next_head: Position) -> bool {
        let body = &self.snake.body;
        body.iter()
            .take(body.len() - 1)
            .any(|segment| *segment == next_head)
    }
}

/// One cell along `direction` from `head` under the session's boundary
/// policy. `None` means the move leaves the grid in `Walls` mode. Shared by
/// the authoritative tick and the spectator prediction so the boundary math
/// lives in exactly one place.
pub fn next_head_position(
    head: Position,
    direction: Direction,
    mode: GameMode,
    grid_size: usize,
) -> Option<Position> {
    match mode {
        GameMode::Passthrough => Some(match direction {
            Direction::Up => Position::new(head.x, wrapping_dec(head.y, grid_size)),
            Direction::Down => Position::new(head.x, wrapping_inc(head.y, grid_size)),
            Direction::Left => Position::new(wrapping_dec(head.x, grid_size), head.y),
            Direction::Right => Position::new(wrapping_inc(head.x, grid_size), head.y),
        }),
        GameMode::Walls => match direction {
            Direction::Up if head.y > 0 => Some(Position::new(head.x, head.y - 1)),
            Direction::Down if head.y + 1 < grid_size => Some(Position::new(head.x, head.y + 1)),
            Direction::Left if head.x > 0 => Some(Position::new(head.x - 1, head.y)),
            Direction::Right if head.x + 1 < grid_size => Some(Position::new(head.x + 1, head.y)),
            _ => None,
        },
    }
}

fn wrapping_inc(value: usize, max: usize) -> usize {
    if value + 1 >= max { 0 } else { value + 1 }
}

fn wrapping_dec(value: usize, max: usize) -> usize {
    if value == 0 { max - 1 } else { value - 1 }
}

/// Uniform rejection sampling: resample until the cell is off the snake.
/// Slow on a near-full grid, which occupancy never approaches in practice.
pub(crate) fn spawn_food(snake: &Snake, grid_size: usize, rng: &mut SessionRng) -> Position {
    loop {
        let candidate = Position::new(
            rng.random_range(0..grid_size),
            rng.random_range(0..grid_size),
        );
        if !snake.contains(candidate) {
            return candidate;
        }
    }
}
