use clap::{Parser, Subcommand};
use vidgate_core::config::VidgateConfig;
use vidgate_core::logging::init_logging;
use vidgate_core::server;

#[derive(Parser, Debug)]
#[command(
    name = "vidgate",
    version,
    about = "Vidgate: Pingora-based video streaming gateway"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the vidgate server (default)
    Run {
        /// Path to the vidgate config file
        #[arg(long, default_value = "config/vidgate.toml")]
        config: String,
    },
}

fn main() {
    let cli = Cli::parse();

    let config_path = match cli.command {
        Some(Command::Run { config }) => config,
        None => "config/vidgate.toml".to_string(),
    };

    init_logging();

    let cfg = VidgateConfig::from_file(&config_path).expect("Failed to load vidgate config");

    server::run(cfg).expect("Failed to start vidgate server");
}
