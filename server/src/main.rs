mod autopilot;
mod broadcaster;
mod config;
mod leaderboard;
mod players;
mod session;

use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tokio::sync::{Mutex, mpsc};
use tokio::time::interval;

use common::game::{GameMode, SessionRng};
use common::{SessionId, log, logger};

use autopilot::Autopilot;
use broadcaster::LogBroadcaster;
use config::ServerConfig;
use leaderboard::Leaderboard;
use players::ActivePlayerRegistry;
use session::{GameSession, GameSessionState, SessionCommand};

#[derive(Parser)]
#[command(name = "snake_arcade_server")]
struct Args {
    /// Optional YAML config path; defaults apply when omitted.
    #[arg(long)]
    config: Option<String>,

    /// Base seed for all randomized behavior; random when omitted.
    #[arg(long)]
    seed: Option<u64>,

    #[arg(long)]
    use_log_prefix: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let prefix = if args.use_log_prefix {
        Some("Server".to_string())
    } else {
        None
    };
    logger::init_logger(prefix);

    let config = ServerConfig::load(args.config.as_deref()).map_err(std::io::Error::other)?;
    let base_seed = args.seed.unwrap_or_else(|| SessionRng::from_random().seed());
    log!("Snake arcade server starting (base seed {})", base_seed);

    let leaderboard = Arc::new(Mutex::new(Leaderboard::new()));
    let registry = Arc::new(Mutex::new(ActivePlayerRegistry::new()));

    if config.seed_mock_players {
        let mut registry = registry.lock().await;
        registry.seed_mock_players(&config.game);
        log!("Spectator hub seeded with {} simulated players", registry.len());
    }

    spawn_spectator_hub(registry.clone(), &config, base_seed);

    let mut session_handles = Vec::new();
    for index in 0..config.session_count {
        let mode = if index % 2 == 0 {
            GameMode::Passthrough
        } else {
            GameMode::Walls
        };
        session_handles.push(spawn_arcade_session(
            index,
            mode,
            &config,
            base_seed,
            leaderboard.clone(),
        ));
    }

    let all_sessions = async {
        for handle in session_handles {
            let _ = handle.await;
        }
    };

    tokio::select! {
        _ = all_sessions => {
            log!("All arcade sessions finished");
        }
        _ = tokio::signal::ctrl_c() => {
            log!("Shutdown signal received");
        }
    }

    let board = leaderboard.lock().await;
    for (rank, entry) in board.top(None).iter().enumerate() {
        log!(
            "#{} {} - {} points ({:?} mode, {})",
            rank + 1,
            entry.username,
            entry.score,
            entry.mode,
            entry.date
        );
    }

    let registry = registry.lock().await;
    for player in registry.list() {
        log!(
            "spectating {}: score {}, playing for {}m",
            player.username,
            player.game.score,
            player.play_time_minutes()
        );
    }

    log!("Server shut down gracefully");

    Ok(())
}

/// Advances every spectated player with the prediction routine at a fixed
/// cadence, independent of the authoritative sessions.
fn spawn_spectator_hub(
    registry: Arc<Mutex<ActivePlayerRegistry>>,
    config: &ServerConfig,
    base_seed: u64,
) {
    let settings = config.game.clone();
    let tick = Duration::from_millis(config.spectator_tick_ms);
    let mut rng = SessionRng::new(base_seed.wrapping_add(1));

    tokio::spawn(async move {
        let mut timer = interval(tick);
        loop {
            timer.tick().await;
            registry.lock().await.advance_all(&settings, &mut rng);
        }
    });
}

/// One autopilot-driven session: a driver task feeds direction commands, the
/// session loop runs the engine, and the final score lands on the
/// leaderboard.
fn spawn_arcade_session(
    index: usize,
    mode: GameMode,
    config: &ServerConfig,
    base_seed: u64,
    leaderboard: Arc<Mutex<Leaderboard>>,
) -> tokio::task::JoinHandle<()> {
    let session_id = SessionId::new(format!("arcade-{}", index + 1));
    let username = format!("Autopilot{}", index + 1);
    let settings = config.game.clone();
    let session_state = GameSessionState::create(
        session_id,
        mode,
        &settings,
        base_seed.wrapping_add(index as u64),
    );
    let (sender, receiver) = mpsc::channel(64);

    {
        let session_state = session_state.clone();
        let settings = settings.clone();
        let mut rng = SessionRng::new(base_seed.wrapping_add(1000 + index as u64));
        tokio::spawn(async move {
            loop {
                let (direction, delay, game_over) = {
                    let state = session_state.state.lock().await;
                    (
                        Autopilot::choose_direction(&state, &settings, &mut rng),
                        Duration::from_millis(state.speed_ms),
                        state.game_over,
                    )
                };
                if game_over {
                    break;
                }
                if let Some(direction) = direction
                    && sender
                        .send(SessionCommand::ChangeDirection(direction))
                        .await
                        .is_err()
                {
                    break;
                }
                tokio::time::sleep(delay).await;
            }
        });
    }

    let broadcaster = LogBroadcaster::new(config.broadcast_log_every);
    tokio::spawn(async move {
        let outcome = GameSession::run(session_state, broadcaster, receiver).await;
        let entry =
            leaderboard
                .lock()
                .await
                .add_score(&username, outcome.final_score, outcome.mode);
        log!(
            "{} finished with {} points in {:?} mode after {} ticks",
            entry.username,
            entry.score,
            entry.mode,
            outcome.ticks
        );
    })
}
