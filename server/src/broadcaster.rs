use std::future::Future;

use common::game::{GameMode, GameState, Position};
use common::log;
use serde::Serialize;

/// Snapshot of one session state, shaped for consumers that draw or relay
/// it. Read-only: broadcasting never feeds back into the engine.
#[derive(Clone, Debug, Serialize)]
pub struct GameStateUpdate {
    pub tick: u64,
    pub snake: Vec<Position>,
    pub food: Position,
    pub score: u32,
    pub speed_ms: u64,
    pub mode: GameMode,
    pub paused: bool,
    pub game_over: bool,
}

impl GameStateUpdate {
    pub fn from_state(state: &GameState, tick: u64) -> Self {
        Self {
            tick,
            snake: state.snake.body.iter().copied().collect(),
            food: state.food,
            score: state.score,
            speed_ms: state.speed_ms,
            mode: state.mode,
            paused: state.paused,
            game_over: state.game_over,
        }
    }
}

/// Final result of a session, handed to the score submission side.
#[derive(Clone, Debug, Serialize)]
pub struct GameOverNotification {
    pub final_score: u32,
    pub mode: GameMode,
    pub ticks: u64,
}

pub trait GameBroadcaster: Send + Sync + Clone + 'static {
    fn broadcast_state(&self, state: GameStateUpdate) -> impl Future<Output = ()> + Send;

    fn broadcast_game_over(
        &self,
        notification: GameOverNotification,
    ) -> impl Future<Output = ()> + Send;
}

/// Broadcaster for headless runs: writes snapshots to the log.
#[derive(Clone)]
pub struct LogBroadcaster {
    every_n_ticks: u64,
}

impl LogBroadcaster {
    pub fn new(every_n_ticks: u64) -> Self {
        Self {
            every_n_ticks: every_n_ticks.max(1),
        }
    }
}

impl GameBroadcaster for LogBroadcaster {
    async fn broadcast_state(&self, state: GameStateUpdate) {
        if state.tick % self.every_n_ticks == 0 {
            let head = state.snake.first().copied();
            log!(
                "tick {}: head {:?}, length {}, score {}, speed {}ms",
                state.tick,
                head,
                state.snake.len(),
                state.score,
                state.speed_ms
            );
        }
    }

    async fn broadcast_game_over(&self, notification: GameOverNotification) {
        log!(
            "game over after {} ticks: score {} ({:?} mode)",
            notification.ticks,
            notification.final_score,
            notification.mode
        );
    }
}
