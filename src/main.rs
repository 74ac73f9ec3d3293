//! dao-arena: run a seeded session headless and report the standings.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use sqlx::postgres::PgPoolOptions;
use tracing::info;

use dao_arena::ecs::MissionRequest;
use dao_arena::scenario::{self, PLAYER_DAO, TUTORIAL_ATTACK};
use dao_arena::{
    Engine, EngineConfig, EngineOptions, GameState, GridConfig, MissionKind, SimulatedProtocol,
    TickMode,
};

#[derive(Parser)]
#[command(name = "dao-arena")]
#[command(about = "Headless territory-control simulation for competing DAOs")]
struct Cli {
    /// Grid generation seed
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Hex-disk radius of the map
    #[arg(long, default_value_t = 3)]
    radius: u32,

    /// Simulation ticks to run
    #[arg(long, default_value_t = 600)]
    ticks: u64,

    /// JSON file with engine config overrides
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory to write the final state to as JSONL
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Postgres URL to save the final state to
    #[arg(long, env = "DAO_ARENA_DATABASE_URL")]
    database_url: Option<String>,

    /// Skip the tutorial assault and opening harvest
    #[arg(long)]
    idle: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => EngineConfig::from_json_file(path)?,
        None => EngineConfig::default(),
    };
    let grid = GridConfig {
        seed: cli.seed,
        radius: cli.radius,
        ..GridConfig::default()
    };

    let state = scenario::new_session(&grid, &config);
    let protocol = Arc::new(SimulatedProtocol::instant(cli.seed));
    let engine = Engine::spawn(
        state,
        config,
        protocol,
        EngineOptions {
            tick_mode: TickMode::Manual,
            ..EngineOptions::default()
        },
    )?;

    if !cli.idle {
        open_session(&engine).await;
    }

    info!(ticks = cli.ticks, "running session");
    for _ in 0..cli.ticks {
        engine.tick().await?;
    }
    engine.settled().await?;
    let state = engine.shutdown().await?;

    print_standings(&state);

    if let Some(dir) = &cli.output {
        dao_arena::flush::flush_to_jsonl(&state, dir)?;
        info!(dir = %dir.display(), "wrote JSONL snapshot");
    }
    if let Some(url) = &cli.database_url {
        let pool = PgPoolOptions::new().connect(url).await?;
        dao_arena::db::migrate(&pool).await?;
        dao_arena::db::save_state(&pool, &state).await?;
    }
    Ok(())
}

/// Start the tutorial assault and a harvest for the player. Failures are
/// logged and the session runs on without them.
async fn open_session(engine: &Engine) {
    if let Err(err) = engine.start_mission(TUTORIAL_ATTACK, None).await {
        tracing::warn!(error = %err, "tutorial assault did not start");
    }
    let harvest = MissionRequest::quick(MissionKind::Harvest, PLAYER_DAO, None);
    let started = match engine.create_mission(harvest).await {
        Ok(mission) => engine.start_mission(&mission, None).await,
        Err(err) => Err(err),
    };
    if let Err(err) = started {
        tracing::warn!(error = %err, "opening harvest did not start");
    }
}

fn print_standings(state: &GameState) {
    println!(
        "season {} at {} after {} ticks",
        state.season.number, state.clock, state.tick_count
    );
    println!("{:>4}  {:<16} {:>6} {:>6} {:>6}", "rank", "dao", "score", "tiles", "wins");
    for entry in &state.leaderboard {
        println!(
            "{:>4}  {:<16} {:>6} {:>6} {:>6}",
            entry.rank, entry.dao_id, entry.score, entry.territories_controlled, entry.battles_won
        );
    }
}
