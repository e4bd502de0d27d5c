//! Replays a scripted match through the game driver and prints how it
//! ended.
//!
//! Run with: cargo run -p replay -- demos/replay/scripts/connect4.json
//!
//! A script names the game and lists moves by side. User 1 plays `X`
//! (the creator), user 2 plays `O`:
//!
//! ```json
//! {"game_type": "connect4", "moves": [{"by": "X", "move": {"column": 3}}]}
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use serde::Deserialize;
use tabletop::prelude::*;
use tabletop::{RoomError, RoomRepository, StatsRepository};

#[derive(Parser, Debug)]
#[command(author, version, about = "Replay a Tabletop match script")]
struct Args {
    /// Match script (JSON)
    script: PathBuf,

    /// Driver settings (JSON); anything left out keeps its default
    #[arg(long)]
    config: Option<PathBuf>,

    /// Skip rejected moves instead of stopping at the first one
    #[arg(long)]
    keep_going: bool,

    /// Log level
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[derive(Debug, Deserialize)]
struct Script {
    game_type: GameType,
    moves: Vec<ScriptedMove>,
}

#[derive(Debug, Deserialize)]
struct ScriptedMove {
    by: Mark,
    #[serde(rename = "move")]
    payload: serde_json::Value,
}

const CREATOR: UserId = UserId(1);
const OPPONENT: UserId = UserId(2);

fn player(mark: Mark) -> UserId {
    match mark {
        Mark::X => CREATOR,
        Mark::O => OPPONENT,
    }
}

/// Plays `script` in a fresh room and returns the room as it ends up.
fn replay<R, S>(
    driver: &GameDriver<R, S>,
    script: &Script,
    keep_going: bool,
) -> Result<GameRoom, TabletopError>
where
    R: RoomRepository,
    S: StatsRepository,
{
    let (room, _) = driver.create_room(CREATOR, script.game_type)?;
    let room_id = room.id;
    driver.join_room(OPPONENT, room_id)?;

    for (i, step) in script.moves.iter().enumerate() {
        match driver.submit_json_move(room_id, player(step.by), step.payload.clone()) {
            Ok(result) => {
                tracing::info!(move_number = result.move_number, by = %step.by, payload = %step.payload, "move accepted");
                if result.outcome.is_terminal() {
                    let unplayed = script.moves.len() - i - 1;
                    if unplayed > 0 {
                        tracing::warn!(unplayed, "game finished before the script ran out");
                    }
                    break;
                }
            }
            Err(err @ (RoomError::InvalidMove(_) | RoomError::NotYourTurn)) if keep_going => {
                tracing::warn!(step = i + 1, by = %step.by, error = %err, "move rejected, skipping");
            }
            Err(err) => return Err(err.into()),
        }
    }

    Ok(driver.room(room_id)?)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(args.log_level.parse()?),
        )
        .init();

    let script: Script = serde_json::from_str(&std::fs::read_to_string(&args.script)?)?;
    let config: GameConfig = match &args.config {
        Some(path) => serde_json::from_str(&std::fs::read_to_string(path)?)?,
        None => GameConfig::default(),
    };

    let store = Arc::new(MemoryStore::new());
    let driver = GameDriver::new(store.clone(), store, config);
    let room = replay(&driver, &script, args.keep_going)?;

    println!("{}", room.board());
    match room.outcome() {
        Outcome::Winner(mark) => println!("{} ({mark}) wins after {} moves", player(mark), room.move_count),
        Outcome::Draw => println!("draw after {} moves", room.move_count),
        Outcome::Ongoing => println!("unfinished ({}) after {} moves", room.status, room.move_count),
    }
    for user in [CREATOR, OPPONENT] {
        let stats = driver.stats(user, script.game_type)?;
        println!(
            "{user}: {} won, {} lost, {} drawn, {} points",
            stats.wins, stats.losses, stats.draws, stats.points
        );
    }
    Ok(())
}
