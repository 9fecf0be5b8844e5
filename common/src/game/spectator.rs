//! Cosmetic movement prediction for spectated players. Interpolates between
//! authoritative snapshots by replaying the engine's movement rules with a
//! randomized heading instead of player input. Predicted snakes never
//! terminate: they exist only to keep the spectator view moving.

use super::session_rng::SessionRng;
use super::settings::GameSettings;
use super::state::{GameState, next_head_position, spawn_food};
use super::types::{Direction, Position};

/// Chance per tick that a predicted snake turns sideways.
pub const TURN_PROBABILITY: f64 = 0.1;

pub fn predict_tick(state: &GameState, settings: &GameSettings, rng: &mut SessionRng) -> GameState {
    predict_tick_with_probability(state, settings, TURN_PROBABILITY, rng)
}

pub fn predict_tick_with_probability(
    state: &GameState,
    settings: &GameSettings,
    turn_probability: f64,
    rng: &mut SessionRng,
) -> GameState {
    let mut direction = state.direction;
    if rng.random_chance(turn_probability) {
        direction = random_perpendicular(direction, rng);
    }

    let head = state.snake.head();
    let next_head = match next_head_position(head, direction, state.mode, settings.grid_size) {
        Some(position) => position,
        None => {
            // Walls mode edge: steer along the wall instead of dying.
            match steer_inside(state, rng, settings.grid_size) {
                Some((turned, position)) => {
                    direction = turned;
                    position
                }
                None => return state.clone(),
            }
        }
    };

    if next_head == state.food {
        let snake = state.snake.advanced(next_head, true);
        let food = spawn_food(&snake, settings.grid_size, rng);
        return GameState {
            snake,
            food,
            direction,
            score: state.score + settings.food_reward,
            ..state.clone()
        };
    }

    GameState {
        snake: state.snake.advanced(next_head, false),
        direction,
        ..state.clone()
    }
}

fn random_perpendicular(current: Direction, rng: &mut SessionRng) -> Direction {
    let options: Vec<Direction> = Direction::all()
        .into_iter()
        .filter(|d| *d != current && !d.is_opposite(&current))
        .collect();
    options[rng.random_range(0..options.len())]
}

/// Picks a random non-reverse heading whose next cell stays on the grid.
fn steer_inside(
    state: &GameState,
    rng: &mut SessionRng,
    grid_size: usize,
) -> Option<(Direction, Position)> {
    let head = state.snake.head();
    let candidates: Vec<(Direction, Position)> = Direction::all()
        .into_iter()
        .filter(|d| !d.is_opposite(&state.direction))
        .filter_map(|d| next_head_position(head, d, state.mode, grid_size).map(|p| (d, p)))
        .collect();

    if candidates.is_empty() {
        return None;
    }
    Some(candidates[rng.random_range(0..candidates.len())])
}
