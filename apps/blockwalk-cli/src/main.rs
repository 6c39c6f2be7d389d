use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use blockwalk_common::PlayerConfig;
use blockwalk_input::RawInput;
use blockwalk_session::Session;
use blockwalk_tools::SessionInspector;

mod script;

use script::{RunStats, Script, frame_time};

#[derive(Parser)]
#[command(name = "blockwalk-cli", about = "Headless host for the blockwalk engine")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Player/world config (.json, .yaml or .yml); defaults apply when omitted
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print engine version and the effective config
    Info,
    /// Drop the player from spawn and report when it lands
    Fall {
        /// Give up after this many ticks
        #[arg(short, long, default_value = "1000")]
        max_ticks: u64,
    },
    /// Replay a JSON input script and print the final session state
    Run {
        /// Path to the script
        script: PathBuf,
        /// Print the session summary after every N blocks (0 = only at the end)
        #[arg(short, long, default_value = "0")]
        every: u64,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    let config = match &cli.config {
        Some(path) => PlayerConfig::load(path)?,
        None => PlayerConfig::default(),
    };

    match cli.command {
        Commands::Info => {
            println!("blockwalk-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
        Commands::Fall { max_ticks } => {
            let spawn = config.spawn;
            let mut session = Session::new(config)?;
            let idle = RawInput::default();

            let landed_at = (1..=max_ticks).find(|&tick| {
                session.frame(&idle, &[], frame_time(16, tick));
                session.body().is_grounded()
            });
            match landed_at {
                Some(tick) => println!(
                    "Landed after {tick} ticks: ({:.2}, {:.2}) -> y={:.3}",
                    spawn.x,
                    spawn.z,
                    session.body().position().y
                ),
                None => println!("Still airborne after {max_ticks} ticks"),
            }
            println!("{}", SessionInspector::summary(&session));
        }
        Commands::Run { script, every } => {
            let script = Script::load(&script)?;
            let mut session = Session::new(config)?;
            let mut stats = RunStats::default();
            for (i, block) in script.blocks.iter().enumerate() {
                let single = Script {
                    frame_ms: script.frame_ms,
                    blocks: vec![block.clone()],
                };
                stats.absorb(single.run(&mut session));
                if every > 0 && (i as u64 + 1) % every == 0 {
                    println!("{}", SessionInspector::summary(&session));
                }
            }
            println!(
                "Ran {} frames: {} edits, {} rejected",
                stats.frames, stats.edits, stats.rejected
            );
            println!("{}", SessionInspector::summary(&session));
        }
    }

    Ok(())
}
