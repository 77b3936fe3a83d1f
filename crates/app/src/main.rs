use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use cursor_choreography_core::{
    AppConfig, Choreographer, Clock, ManualClock, ManualScheduler, RasterSurface, SystemClock,
    DEFAULT_FILE_NAME,
};
use tracing_subscriber::EnvFilter;

mod demo;
mod script;

/// Interval between simulated display frames.
const FRAME_INTERVAL_MS: f64 = 16.0;

type Session<'a> = Choreographer<RasterSurface, ManualScheduler, &'a ManualClock>;

fn main() -> cursor_choreography_core::Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => AppConfig::from_path(path)?,
        None => AppConfig::default(),
    };

    match cli.command {
        Commands::Demo { dances, output } => run_demo(&config, dances, &output),
        Commands::Play { script, output } => run_script(&config, &script, &output),
    }
}

fn run_demo(config: &AppConfig, dances: usize, output: &Path) -> cursor_choreography_core::Result<()> {
    tracing::info!(dances, ?output, "starting demo");

    let clock = ManualClock::new(SystemClock.now_ms());
    let mut session = new_session(config, &clock)?;
    demo::perform(&mut session, &clock, dances)?;

    if !session.replay() {
        return Err("demo produced nothing to replay".into());
    }
    let frames = session.replay_to_end(0.0, FRAME_INTERVAL_MS);
    tracing::info!(frames, status = %session.status(), "replay complete");
    session.save_image(output)
}

fn run_script(config: &AppConfig, script: &Path, output: &Path) -> cursor_choreography_core::Result<()> {
    tracing::info!(?script, "running script");

    let actions = script::load(script)?;
    let clock = ManualClock::new(SystemClock.now_ms());
    let mut session = new_session(config, &clock)?;
    let saved = script::run(&mut session, &clock, &actions)?;

    if !saved {
        session.save_image(output)?;
    }
    tracing::info!(status = %session.status(), "script finished");
    Ok(())
}

fn new_session<'a>(config: &AppConfig, clock: &'a ManualClock) -> cursor_choreography_core::Result<Session<'a>> {
    let layout = config.canvas.layout;
    Choreographer::new(
        config,
        RasterSurface::new(layout.width, layout.height, layout.pixel_ratio),
        ManualScheduler::new(),
        clock,
    )
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .try_init();
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Paint with light: record, replay and save cursor dances", long_about = None)]
struct Cli {
    /// Optional JSON configuration file.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Record a few synthetic overlapping dances, replay them and save the result.
    Demo {
        /// Number of dances to record.
        #[arg(short, long, default_value_t = 3)]
        dances: usize,
        /// Where to write the final image.
        #[arg(short, long, default_value = DEFAULT_FILE_NAME)]
        output: PathBuf,
    },
    /// Run a scripted session of pointer moves and actions.
    Play {
        /// JSON file containing a list of actions.
        script: PathBuf,
        /// Where to write the final image if the script does not save itself.
        #[arg(short, long, default_value = DEFAULT_FILE_NAME)]
        output: PathBuf,
    },
}
