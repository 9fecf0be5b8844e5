use serde::{Deserialize, Serialize};

/// Every this many points the tick delay shrinks by one increment.
pub const SPEED_SCORE_STEP: u32 = 50;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameSettings {
    pub grid_size: usize,
    pub initial_speed_ms: u64,
    pub speed_increment_ms: u64,
    pub min_speed_ms: u64,
    pub food_reward: u32,
    pub initial_snake_length: usize,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            grid_size: 20,
            initial_speed_ms: 150,
            speed_increment_ms: 5,
            min_speed_ms: 50,
            food_reward: 10,
            initial_snake_length: 3,
        }
    }
}

impl GameSettings {
    pub fn validate(&self) -> Result<(), String> {
        if self.grid_size < 10 || self.grid_size > 100 {
            return Err("Grid size must be between 10 and 100".to_string());
        }
        if self.initial_speed_ms < 50 || self.initial_speed_ms > 5000 {
            return Err("Initial speed must be between 50ms and 5000ms".to_string());
        }
        if self.min_speed_ms < 10 || self.min_speed_ms > self.initial_speed_ms {
            return Err("Min speed must be between 10ms and the initial speed".to_string());
        }
        if self.food_reward == 0 {
            return Err("Food reward must be positive".to_string());
        }
        if self.initial_snake_length < 1 || self.initial_snake_length >= self.grid_size {
            return Err("Initial snake length must fit inside the grid".to_string());
        }
        Ok(())
    }

    /// Tick delay for a given score: monotonically non-increasing, floored at
    /// `min_speed_ms`. Lower is faster.
    pub fn speed_for_score(&self, score: u32) -> u64 {
        let steps = (score / SPEED_SCORE_STEP) as u64;
        self.initial_speed_ms
            .saturating_sub(steps * self.speed_increment_ms)
            .max(self.min_speed_ms)
    }
}
