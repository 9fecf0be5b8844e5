use serde::{Deserialize, Serialize};

use common::game::GameSettings;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub game: GameSettings,
    /// Cadence of the spectator hub; fixed, unlike session cadence which
    /// follows the speed curve.
    pub spectator_tick_ms: u64,
    pub seed_mock_players: bool,
    /// How many autopilot sessions to run.
    pub session_count: usize,
    /// Log every nth state update per session.
    pub broadcast_log_every: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            game: GameSettings::default(),
            spectator_tick_ms: 200,
            seed_mock_players: true,
            session_count: 2,
            broadcast_log_every: 10,
        }
    }
}

impl ServerConfig {
    /// Reads the config from a YAML file, falling back to defaults when no
    /// path is given. The result is always validated.
    pub fn load(path: Option<&str>) -> Result<Self, String> {
        let config = match path {
            Some(path) => {
                let content = std::fs::read_to_string(path)
                    .map_err(|e| format!("Failed to read config file {}: {}", path, e))?;
                serde_yaml_ng::from_str(&content)
                    .map_err(|e| format!("Failed to deserialize config: {}", e))?
            }
            None => Self::default(),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn to_yaml(&self) -> Result<String, String> {
        serde_yaml_ng::to_string(self).map_err(|e| format!("Failed to serialize config: {}", e))
    }

    pub fn validate(&self) -> Result<(), String> {
        self.game.validate()?;
        if self.spectator_tick_ms < 50 || self.spectator_tick_ms > 5000 {
            return Err("Spectator tick must be between 50ms and 5000ms".to_string());
        }
        if self.session_count < 1 || self.session_count > 64 {
            return Err("Session count must be between 1 and 64".to_string());
        }
        if self.broadcast_log_every == 0 {
            return Err("Broadcast log interval must be positive".to_string());
        }
        Ok(())
    }
}
