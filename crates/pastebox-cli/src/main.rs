mod cmd;
mod output;

use clap::{Parser, Subcommand};
use cmd::config::ConfigSubcommand;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "pastebox",
    about = "Poll a paste store for commands and publish new ones",
    version,
    propagate_version = true
)]
struct Cli {
    /// Config file (missing file means built-in defaults)
    #[arg(long, global = true, env = "PASTEBOX_CONFIG", default_value = pastebox_core::config::DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// Store developer key (overrides store.dev_key)
    #[arg(long, global = true, env = "PASTEBOX_DEV_KEY", hide_env_values = true)]
    dev_key: Option<String>,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Poll the command slot and run the identity query when it reads "run"
    Poll {
        /// Command slot id (overrides poller.command_slot)
        #[arg(long)]
        slot: Option<String>,

        /// Seconds between polls (overrides poller.interval_secs)
        #[arg(long)]
        interval: Option<u64>,

        /// Run a single cycle and exit
        #[arg(long)]
        once: bool,
    },

    /// Publish a new command (reads one line from stdin when TEXT is omitted)
    Publish {
        /// Command text, e.g. "run" or "idle"
        text: Option<String>,
    },

    /// Create, show, or validate the config file
    Config {
        #[command(subcommand)]
        subcommand: ConfigSubcommand,
    },

    /// Print the readable or encoded naming demo
    Demo {
        /// Use the variant that decodes its key at runtime
        #[arg(long)]
        encoded: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    // Status lines share stdout with results; keep JSON output parseable.
    let default_level = match &cli.command {
        _ if cli.json => tracing::Level::ERROR,
        Commands::Poll { .. } | Commands::Publish { .. } => tracing::Level::INFO,
        _ => tracing::Level::WARN,
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(default_level.into()),
        )
        .with_target(false)
        .init();

    let settings = cmd::Settings {
        config_path: cli.config,
        dev_key: cli.dev_key,
        json: cli.json,
    };

    let result = match cli.command {
        Commands::Poll {
            slot,
            interval,
            once,
        } => cmd::poll::run(&settings, slot, interval, once),
        Commands::Publish { text } => cmd::publish::run(&settings, text),
        Commands::Config { subcommand } => cmd::config::run(&settings, subcommand),
        Commands::Demo { encoded } => cmd::demo::run(encoded),
    };

    if let Err(e) = result {
        // Print the full error chain (anyhow's alternate Display)
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
