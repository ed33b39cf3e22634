use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;

#[derive(Parser)]
#[command(name = "osprey")]
#[command(author, version, about, long_about = None)]
#[command(
    about = "A CLI tool for fetching extension packages from marketplace web UIs",
    long_about = "Osprey drives a headless Chrome instance through marketplace search and \
                  navigation to resolve extension download links, then saves the packages \
                  into a local directory."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch extensions from the marketplaces
    Fetch {
        /// Comma-separated extension display names
        #[arg(short, long, value_name = "NAMES")]
        extensions: String,

        /// Directory to save downloaded packages into
        #[arg(short, long, default_value = "./downloads")]
        download_dir: PathBuf,

        /// Path to the Chrome binary
        #[arg(long)]
        chrome_path: Option<PathBuf>,

        /// Per-download timeout in milliseconds
        #[arg(long, default_value_t = 3000)]
        download_timeout: u64,

        /// Page navigation timeout in milliseconds
        #[arg(long)]
        navigation_timeout: Option<u64>,

        /// Page action timeout in milliseconds
        #[arg(long)]
        action_timeout: Option<u64>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    match cli.command {
        Commands::Fetch {
            extensions,
            download_dir,
            chrome_path,
            download_timeout,
            navigation_timeout,
            action_timeout,
        } => commands::fetch::execute(
            &extensions,
            &download_dir,
            chrome_path,
            download_timeout,
            navigation_timeout,
            action_timeout,
        ),
    }
}

fn init_logging(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = if verbose {
        EnvFilter::new("osprey=debug,osprey_core=debug,osprey_browser=debug,osprey_market=debug")
    } else {
        EnvFilter::new("osprey=info,osprey_core=info,osprey_browser=info,osprey_market=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .init();
}
