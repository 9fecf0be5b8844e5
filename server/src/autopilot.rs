use common::game::{
    Direction, GameMode, GameSettings, GameState, Position, SessionRng, next_head_position,
};

/// Input policy for headless sessions: steers the snake toward the food
/// along safe cells so demo games last long enough to exercise the speed
/// curve and feed the leaderboard.
pub struct Autopilot;

impl Autopilot {
    pub fn choose_direction(
        state: &GameState,
        settings: &GameSettings,
        rng: &mut SessionRng,
    ) -> Option<Direction> {
        if state.game_over {
            return None;
        }

        let head = state.snake.head();
        let safe: Vec<(Direction, Position)> = Direction::all()
            .into_iter()
            .filter(|d| !d.is_opposite(&state.direction))
            .filter_map(|d| {
                next_head_position(head, d, state.mode, settings.grid_size).map(|p| (d, p))
            })
            .filter(|(_, position)| Self::is_safe_position(state, *position))
            .collect();

        if safe.is_empty() {
            // Boxed in: keep heading and let the engine call it.
            return Some(state.direction);
        }

        let best_distance = safe
            .iter()
            .map(|(_, position)| {
                manhattan_distance(*position, state.food, state.mode, settings.grid_size)
            })
            .min()
            .expect("safe directions are non-empty");

        let closest: Vec<Direction> = safe
            .iter()
            .filter(|(_, position)| {
                manhattan_distance(*position, state.food, state.mode, settings.grid_size)
                    == best_distance
            })
            .map(|(direction, _)| *direction)
            .collect();

        Some(closest[rng.random_range(0..closest.len())])
    }

    fn is_safe_position(state: &GameState, position: Position) -> bool {
        let body = &state.snake.body;
        !body
            .iter()
            .take(body.len() - 1)
            .any(|segment| *segment == position)
    }
}

/// Cell distance between two positions, taking the shorter wrapped path in
/// passthrough mode.
fn manhattan_distance(a: Position, b: Position, mode: GameMode, grid_size: usize) -> usize {
    let dx = a.x.abs_diff(b.x);
    let dy = a.y.abs_diff(b.y);
    match mode {
        GameMode::Walls => dx + dy,
        GameMode::Passthrough => dx.min(grid_size - dx) + dy.min(grid_size - dy),
    }
}
