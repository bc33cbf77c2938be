use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "redacta", version, about = "Redacta CLI -- ENEM essay prep")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Progression stats and weakness map
    Stats {
        #[command(subcommand)]
        action: commands::stats::StatsAction,
    },
    /// Submit an essay for AI correction
    Correct(commands::correct::CorrectArgs),
    /// Run a generated simulation quiz
    Simulate(commands::simulate::SimulateArgs),
    /// Probable exam themes from recent events
    Themes,
    /// Chat with the AI tutor
    Chat {
        #[command(subcommand)]
        action: commands::chat::ChatAction,
    },
    /// Correction history
    History {
        #[command(subcommand)]
        action: commands::history::HistoryAction,
    },
    /// First-run onboarding flags
    Onboarding {
        #[command(subcommand)]
        action: commands::onboarding::OnboardingAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Stats { action } => commands::stats::run(action),
        Commands::Correct(args) => commands::correct::run(args).await,
        Commands::Simulate(args) => commands::simulate::run(args).await,
        Commands::Themes => commands::themes::run().await,
        Commands::Chat { action } => commands::chat::run(action).await,
        Commands::History { action } => commands::history::run(action),
        Commands::Onboarding { action } => commands::onboarding::run(action),
        Commands::Config { action } => commands::config::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
