use clap::{Parser, Subcommand};

mod audio;
mod commands;
mod display;
mod notify;

#[derive(Parser)]
#[command(name = "winddown-cli", version, about = "Winddown reverse alarm clock CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute and show the sleep plan
    Plan {
        /// Print the plan as JSON
        #[arg(long)]
        json: bool,
    },
    /// Arm the monitor and run until wake time or stopped
    Run {
        /// Print fired events as JSON lines
        #[arg(long)]
        json: bool,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Audio self-tests
    Test {
        #[command(subcommand)]
        action: commands::test::TestAction,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Plan { json } => commands::plan::run(json),
        Commands::Run { json } => commands::run::run(json),
        Commands::Config { action } => commands::config::run(action),
        Commands::Test { action } => commands::test::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
