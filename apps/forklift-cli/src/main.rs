use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use forklift_input::{CancelToken, spawn_key_watcher};
use forklift_kernel::{AnimationConfig, GameConfig, RestockPolicy};
use forklift_render::{DebugTextRenderer, RenderView, Renderer, TextPresenter};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "forklift-cli", about = "Replay a forklift move script, frame by frame")]
struct Cli {
    /// Move script to replay
    script: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Print the parsed commands and exit without replaying
    #[arg(long)]
    list: bool,

    /// Frames per one-cell move (0 = no interpolation)
    #[arg(long, default_value = "10")]
    forward_substeps: u32,

    /// Frames per turn (0 = no interpolation)
    #[arg(long, default_value = "9")]
    turn_substeps: u32,

    /// When stations get a fresh box as a robot leaves them
    #[arg(long, value_enum, default_value_t = Restock::WhenEmpty)]
    restock: Restock,

    /// Print a board sketch every N frames (0 = final board only)
    #[arg(long, default_value = "0")]
    print_every: u64,

    /// Pause after each frame, in milliseconds
    #[arg(long, default_value = "0")]
    frame_delay_ms: u64,

    /// Stop before the next command when `q` is entered on stdin
    #[arg(long)]
    watch_stdin: bool,

    /// Write the event log as JSON to this path
    #[arg(long)]
    events: Option<PathBuf>,
}

#[derive(Clone, Copy, ValueEnum)]
enum Restock {
    WhenEmpty,
    OnVisit,
}

impl From<Restock> for RestockPolicy {
    fn from(r: Restock) -> Self {
        match r {
            Restock::WhenEmpty => RestockPolicy::WhenEmpty,
            Restock::OnVisit => RestockPolicy::OnVisit,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!("{err:#}");
            eprintln!("error: {err:#}");
            ExitCode::from(1)
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    if cli.list {
        let script = forklift_script::load(&cli.script)
            .with_context(|| format!("listing {}", cli.script.display()))?;
        print!("{}", script.listing());
        return Ok(());
    }

    let config = GameConfig {
        animation: AnimationConfig {
            forward_substeps: cli.forward_substeps,
            turn_substeps: cli.turn_substeps,
        },
        restock: cli.restock.into(),
    };

    let cancel = CancelToken::new();
    if cli.watch_stdin {
        let _ = spawn_key_watcher(BufReader::new(std::io::stdin()), cancel.clone());
    }

    let presenter = TextPresenter::new(std::io::stdout(), cli.print_every)
        .with_delay(Duration::from_millis(cli.frame_delay_ms));

    let (replay, outcome) = forklift_replay::run_script(&cli.script, config, presenter, cancel)
        .with_context(|| format!("replaying {}", cli.script.display()))?;

    let game = replay.game();
    print!("{}", DebugTextRenderer::new().render(game, &RenderView::default()));
    println!(
        "applied {}/{} commands in {} frames{}",
        outcome.commands_applied,
        outcome.commands_total,
        outcome.frames,
        if outcome.cancelled { " (cancelled)" } else { "" }
    );

    if let Some(path) = &cli.events {
        let file = File::create(path)
            .with_context(|| format!("creating event log {}", path.display()))?;
        serde_json::to_writer_pretty(BufWriter::new(file), game.events())
            .context("writing event log")?;
        tracing::info!(path = %path.display(), events = game.events().len(), "event log written");
    }

    Ok(())
}
