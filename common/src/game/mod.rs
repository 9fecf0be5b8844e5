mod session_rng;
mod settings;
mod snake;
mod state;
mod types;

pub mod spectator;

pub use session_rng::SessionRng;
pub use settings::{GameSettings, SPEED_SCORE_STEP};
pub use snake::Snake;
pub use state::{GameState, next_head_position};
pub use types::{Direction, GameMode, Position};
