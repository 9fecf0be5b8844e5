use std::collections::HashMap;

use chrono::{DateTime, Local};

use common::PlayerId;
use common::game::{
    Direction, GameMode, GameSettings, GameState, Position, SessionRng, Snake, spectator,
};

/// One entry in the spectator view: a player the hub is simulating, plus the
/// presentation details the player list shows.
#[derive(Clone, Debug)]
pub struct ActivePlayer {
    pub player_id: PlayerId,
    pub username: String,
    pub game: GameState,
    pub started_at: DateTime<Local>,
}

impl ActivePlayer {
    pub fn play_time_minutes(&self) -> i64 {
        (Local::now() - self.started_at).num_minutes()
    }
}

/// Registry of simulated active players backing the spectator view. The hub
/// task advances every registered game with the prediction routine at a
/// fixed cadence.
#[derive(Default)]
pub struct ActivePlayerRegistry {
    players: HashMap<PlayerId, ActivePlayer>,
}

impl ActivePlayerRegistry {
    pub fn new() -> Self {
        Self {
            players: HashMap::new(),
        }
    }

    pub fn register(&mut self, player: ActivePlayer) {
        self.players.insert(player.player_id.clone(), player);
    }

    pub fn remove(&mut self, player_id: &PlayerId) -> Option<ActivePlayer> {
        self.players.remove(player_id)
    }

    pub fn get(&self, player_id: &PlayerId) -> Option<&ActivePlayer> {
        self.players.get(player_id)
    }

    pub fn list(&self) -> Vec<&ActivePlayer> {
        let mut players: Vec<&ActivePlayer> = self.players.values().collect();
        players.sort_by(|a, b| a.player_id.as_str().cmp(b.player_id.as_str()));
        players
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    /// One prediction step for every registered player.
    pub fn advance_all(&mut self, settings: &GameSettings, rng: &mut SessionRng) {
        for player in self.players.values_mut() {
            player.game = spectator::predict_tick(&player.game, settings, rng);
        }
    }

    /// Seeds the registry with a handful of simulated players so the
    /// spectator view is never empty.
    pub fn seed_mock_players(&mut self, settings: &GameSettings) {
        let mocks = [
            (
                "active-1",
                "LivePlayer1",
                150u32,
                GameMode::Walls,
                vec![Position::new(10, 10), Position::new(9, 10)],
                Position::new(15, 12),
                Direction::Right,
            ),
            (
                "active-2",
                "ProGamer99",
                320,
                GameMode::Passthrough,
                vec![
                    Position::new(5, 5),
                    Position::new(5, 6),
                    Position::new(5, 7),
                ],
                Position::new(8, 8),
                Direction::Up,
            ),
            (
                "active-3",
                "SnakeMaster",
                80,
                GameMode::Walls,
                vec![Position::new(15, 15), Position::new(16, 15)],
                Position::new(12, 12),
                Direction::Left,
            ),
        ];

        for (id, username, score, mode, segments, food, direction) in mocks {
            let game = GameState {
                snake: Snake::from_segments(segments),
                food,
                direction,
                score,
                game_over: false,
                paused: false,
                mode,
                speed_ms: settings.initial_speed_ms,
            };
            self.register(ActivePlayer {
                player_id: PlayerId::new(id.to_string()),
                username: username.to_string(),
                game,
                started_at: Local::now(),
            });
        }
    }
}
