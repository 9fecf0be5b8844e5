use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex, mpsc};

use common::game::{Direction, GameMode, GameSettings, GameState, SessionRng};
use common::{SessionId, log};

use crate::broadcaster::{GameBroadcaster, GameOverNotification, GameStateUpdate};

/// Input-side commands for a running session. Direction changes come from
/// whatever translates raw input; Restart with a different mode is how a
/// mode change takes effect, since the boundary policy is fixed per session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionCommand {
    ChangeDirection(Direction),
    TogglePause,
    Restart(GameMode),
}

#[derive(Clone)]
pub struct GameSessionState {
    pub session_id: SessionId,
    pub state: Arc<Mutex<GameState>>,
    pub tick: Arc<Mutex<u64>>,
    pub rng: Arc<Mutex<SessionRng>>,
    pub settings: GameSettings,
}

impl GameSessionState {
    pub fn create(
        session_id: SessionId,
        mode: GameMode,
        settings: &GameSettings,
        seed: u64,
    ) -> Self {
        let mut rng = SessionRng::new(seed);
        let state = GameState::new(mode, settings, &mut rng);

        Self {
            session_id,
            state: Arc::new(Mutex::new(state)),
            tick: Arc::new(Mutex::new(0u64)),
            rng: Arc::new(Mutex::new(rng)),
            settings: settings.clone(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SessionOutcome {
    pub final_score: u32,
    pub mode: GameMode,
    pub ticks: u64,
}

pub struct GameSession;

impl GameSession {
    /// Drives one session to completion: sleep the current tick delay (the
    /// cadence follows the speed curve), drain queued commands in arrival
    /// order, advance the engine once, broadcast. Exits when the engine
    /// reports game over.
    pub async fn run(
        session_state: GameSessionState,
        broadcaster: impl GameBroadcaster,
        mut commands: mpsc::Receiver<SessionCommand>,
    ) -> SessionOutcome {
        loop {
            let delay = {
                let state = session_state.state.lock().await;
                Duration::from_millis(state.speed_ms)
            };
            tokio::time::sleep(delay).await;

            let mut state = session_state.state.lock().await;
            let mut rng = session_state.rng.lock().await;

            while let Ok(command) = commands.try_recv() {
                if let SessionCommand::Restart(mode) = command {
                    log!("[session:{}] restarting in {:?} mode", session_state.session_id, mode);
                }
                *state = apply_command(&state, command, &session_state.settings, &mut rng);
            }

            *state = state.tick(&session_state.settings, &mut rng);
            drop(rng);

            let mut tick_value = session_state.tick.lock().await;
            *tick_value += 1;
            let current_tick = *tick_value;
            let update = GameStateUpdate::from_state(&state, current_tick);
            drop(tick_value);

            let game_over = state.game_over;
            let outcome = SessionOutcome {
                final_score: state.score,
                mode: state.mode,
                ticks: current_tick,
            };
            drop(state);

            broadcaster.broadcast_state(update).await;

            if game_over {
                broadcaster
                    .broadcast_game_over(GameOverNotification {
                        final_score: outcome.final_score,
                        mode: outcome.mode,
                        ticks: outcome.ticks,
                    })
                    .await;
                return outcome;
            }
        }
    }
}

fn apply_command(
    state: &GameState,
    command: SessionCommand,
    settings: &GameSettings,
    rng: &mut SessionRng,
) -> GameState {
    match command {
        SessionCommand::ChangeDirection(direction) => state.request_direction(direction),
        SessionCommand::TogglePause => state.toggle_pause(),
        SessionCommand::Restart(mode) => GameState::new(mode, settings, rng),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::game::Position;

    fn session(mode: GameMode) -> GameSessionState {
        GameSessionState::create(
            SessionId::new("test-session".to_string()),
            mode,
            &GameSettings::default(),
            42,
        )
    }

    #[derive(Clone)]
    struct NullBroadcaster;

    impl GameBroadcaster for NullBroadcaster {
        async fn broadcast_state(&self, _state: GameStateUpdate) {}
        async fn broadcast_game_over(&self, _notification: GameOverNotification) {}
    }

    #[test]
    fn test_apply_command_direction() {
        let settings = GameSettings::default();
        let mut rng = SessionRng::new(42);
        let state = GameState::new(GameMode::Passthrough, &settings, &mut rng);
        let next = apply_command(
            &state,
            SessionCommand::ChangeDirection(Direction::Up),
            &settings,
            &mut rng,
        );
        assert_eq!(next.direction, Direction::Up);
    }

    #[test]
    fn test_apply_command_restart_switches_mode() {
        let settings = GameSettings::default();
        let mut rng = SessionRng::new(42);
        let state = GameState::new(GameMode::Passthrough, &settings, &mut rng);
        let restarted = apply_command(
            &state,
            SessionCommand::Restart(GameMode::Walls),
            &settings,
            &mut rng,
        );
        assert_eq!(restarted.mode, GameMode::Walls);
        assert_eq!(restarted.score, 0);
        assert!(!restarted.game_over);
    }

    #[test]
    fn test_latest_direction_wins_between_ticks() {
        let settings = GameSettings::default();
        let mut rng = SessionRng::new(42);
        let state = GameState::new(GameMode::Passthrough, &settings, &mut rng);
        // Heading right; Up then Left both get accepted in order, so the
        // tick sees Left.
        let after_up = apply_command(
            &state,
            SessionCommand::ChangeDirection(Direction::Up),
            &settings,
            &mut rng,
        );
        let after_left = apply_command(
            &after_up,
            SessionCommand::ChangeDirection(Direction::Left),
            &settings,
            &mut rng,
        );
        assert_eq!(after_left.direction, Direction::Left);
    }

    #[tokio::test(start_paused = true)]
    async fn test_session_runs_to_wall_collision() {
        let session_state = session(GameMode::Walls);
        let (sender, receiver) = mpsc::channel(16);
        drop(sender);

        let outcome = GameSession::run(session_state.clone(), NullBroadcaster, receiver).await;

        // Centered head at (10,10) heading right on a 20-cell grid: nine
        // steps to the edge, the tenth tick hits the wall.
        assert_eq!(outcome.ticks, 10);
        assert_eq!(outcome.mode, GameMode::Walls);

        let final_state = session_state.state.lock().await;
        assert!(final_state.game_over);
        assert_eq!(final_state.snake.head(), Position::new(19, 10));
    }

    #[tokio::test(start_paused = true)]
    async fn test_session_honors_queued_commands() {
        let session_state = session(GameMode::Walls);
        let (sender, receiver) = mpsc::channel(16);

        sender
            .send(SessionCommand::ChangeDirection(Direction::Up))
            .await
            .expect("command channel open");
        drop(sender);

        let outcome = GameSession::run(session_state.clone(), NullBroadcaster, receiver).await;

        // Turned up on the first tick: ten rows to the top edge, then the
        // eleventh tick terminates.
        assert_eq!(outcome.ticks, 11);
        let final_state = session_state.state.lock().await;
        assert_eq!(final_state.snake.head(), Position::new(10, 0));
    }
}
