#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that plays a headless Crown Arena match.

mod autopilot;
mod config;
mod presenter;
mod progress_file;

use std::{fs, io, path::PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use crown_arena_core::{Catalog, CatalogFile, Command, Event, Side};
use crown_arena_rendering::{
    ArenaPresentation, Color, FrameControl, Presentation, RenderingBackend, Scene, Viewport,
};
use crown_arena_system_enemy_spawner::{self as enemy_spawner, EnemySpawner};
use crown_arena_system_pathfinding::Bridge;
use crown_arena_world::{self as world, query, World};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::{
    autopilot::Autopilot,
    config::{random_enemy_deck, Difficulty, MatchConfig, SeedStreams},
    presenter::TextBackend,
    progress_file::{PendingReward, ProgressFile},
};

/// Ticks between autopilot decisions.
const AUTOPILOT_THINK_TICKS: u32 = 30;

#[derive(Parser, Debug)]
#[command(
    name = "crown-arena",
    version,
    about = "Plays a headless two-lane tower defense match"
)]
struct Cli {
    /// TOML match configuration.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Difficulty preset, overriding the configuration file.
    #[arg(long, value_enum)]
    difficulty: Option<Difficulty>,
    /// Seed label from which every random stream is derived.
    #[arg(long)]
    seed: Option<String>,
    /// Stops the match after this many ticks even if it has not ended.
    #[arg(long)]
    ticks: Option<u64>,
    /// Print a frame every N ticks; zero prints only the first and last.
    #[arg(long, default_value_t = 600)]
    frame_interval: u64,
    /// JSON catalog replacing the built-in card table.
    #[arg(long)]
    catalog: Option<PathBuf>,
    /// Player progress file credited with the match reward.
    #[arg(long, default_value = "crown-arena-progress.json")]
    progress: PathBuf,
    /// Log filter, e.g. `info` or `crown_arena_world=debug`.
    #[arg(long)]
    log_level: Option<String>,
    /// Columns of the printed arena.
    #[arg(long, default_value_t = 60)]
    columns: u32,
    /// Rows of the printed arena.
    #[arg(long, default_value_t = 15)]
    rows: u32,
}

fn init_logging(level: Option<&str>) {
    let filter = match level {
        Some(level) => EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("info")),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn load_catalog(path: Option<&PathBuf>) -> Result<Catalog> {
    let Some(path) = path else {
        return Ok(Catalog::standard());
    };
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read catalog {}", path.display()))?;
    let file: CatalogFile = serde_json::from_str(&contents)
        .with_context(|| format!("failed to parse catalog {}", path.display()))?;
    Catalog::from_file(file).with_context(|| format!("invalid catalog {}", path.display()))
}

/// Entry point for the Crown Arena command-line interface.
fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_level.as_deref());

    let mut config = match &cli.config {
        Some(path) => MatchConfig::load(path)?,
        None => MatchConfig::default(),
    };
    if let Some(difficulty) = cli.difficulty {
        config.difficulty = difficulty;
    }
    if let Some(seed) = &cli.seed {
        config.seed.clone_from(seed);
    }
    if cli.ticks.is_some() {
        config.tick_limit = cli.ticks;
    }

    let seeds = SeedStreams::from_label(&config.seed);
    let catalog = load_catalog(cli.catalog.as_ref())?;
    let progress_file = ProgressFile::new(&cli.progress);
    let mut progress = progress_file.load()?;
    let enemy_deck = random_enemy_deck(seeds.enemy_deck)?;
    let enemy_level = config.enemy_level()?;

    let mut setup = progress.match_setup(enemy_deck.clone());
    setup.seed = seeds.world;
    setup.enemy_level = enemy_level;
    setup.reward_multiplier = config.difficulty.preset().reward_multiplier;

    info!(
        difficulty = ?config.difficulty,
        seed = %config.seed,
        enemy_deck = ?enemy_deck.cards(),
        "starting match"
    );

    let mut world = World::with_catalog(catalog, setup);
    let mut spawner = EnemySpawner::new(enemy_spawner::Config::new(
        config.period_ticks(),
        config.spawn_count(),
        enemy_level,
        enemy_deck,
        seeds.spawner,
    ));
    let mut autopilot = Autopilot::new(AUTOPILOT_THINK_TICKS);
    let mut pending = PendingReward::default();
    let mut outcome = None;

    let arena_layout = ArenaPresentation::standard(Bridge::ALL.map(Bridge::position));
    let scene = Scene::capture(
        arena_layout.clone(),
        &query::arena_snapshot(&world),
        &query::match_status(&world),
    );
    let presentation = Presentation::new("Crown Arena", Color::GRASS, scene);
    let viewport = Viewport::new(cli.columns, cli.rows)?;
    let tick_limit = config.tick_limit;

    TextBackend::new(viewport, cli.frame_interval, io::stdout().lock()).run(
        presentation,
        |_, scene| {
            let mut events = Vec::new();
            world::apply(&mut world, Command::Tick, &mut events);

            let status = query::match_status(&world);
            let arena = query::arena_snapshot(&world);
            let mut commands = Vec::new();
            spawner.handle(&events, query::catalog(&world), &arena, &mut commands);
            autopilot.handle(&events, query::catalog(&world), &status, &arena, &mut commands);
            for command in commands {
                world::apply(&mut world, command, &mut events);
            }

            for event in &events {
                if let Event::MatchEnded {
                    winner,
                    crowns,
                    reward,
                } = event
                {
                    pending.record(*reward);
                    outcome = Some((*winner, *crowns));
                }
            }

            *scene = Scene::capture(
                arena_layout.clone(),
                &query::arena_snapshot(&world),
                &query::match_status(&world),
            );
            let limit_reached = tick_limit.is_some_and(|limit| query::tick(&world) >= limit);
            if outcome.is_some() || limit_reached {
                FrameControl::Exit
            } else {
                FrameControl::Continue
            }
        },
    )?;

    match outcome {
        Some((winner, crowns)) => {
            let verdict = match winner {
                Some(Side::Player) => "victory",
                Some(Side::Enemy) => "defeat",
                None => "draw",
            };
            println!(
                "match over: {verdict} ({} - {} crowns)",
                crowns.player, crowns.enemy
            );
        }
        None => println!(
            "match stopped after {} ticks without a result",
            query::tick(&world)
        ),
    }

    if let Some(reward) = pending.credit(&mut progress) {
        progress_file.save(&progress)?;
        println!("credited {reward} coins, balance {}", progress.currency);
        info!(path = %progress_file.path().display(), "progress saved");
    }

    Ok(())
}
