use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod output;

#[derive(Parser)]
#[command(name = "focuscycle", version, about = "Single-task countdown cycles")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start a cycle and count it down in the foreground (Ctrl-C interrupts)
    Run(commands::run::RunArgs),
    /// Line-oriented session on stdin: start, interrupt, status, history
    Session {
        /// Emit events, status and history as JSON lines
        #[arg(long)]
        json: bool,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Format a number of seconds as MM:SS
    Format {
        /// Remaining seconds
        seconds: u64,
    },
}

fn init_logging() {
    let filter = EnvFilter::try_from_env("FOCUSCYCLE_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    init_logging();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Run(args) => commands::run::run(args),
        Commands::Session { json } => commands::session::run(json),
        Commands::Config { action } => commands::config::run(action),
        Commands::Format { seconds } => {
            println!("{}", focuscycle_core::format_countdown(seconds));
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
