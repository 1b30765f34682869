use clap::{Parser, Subcommand};
use taskmaster_core::Config;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "taskmaster-cli", version, about = "TaskMaster CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in (the first login for a username registers it)
    Login {
        username: String,
        #[arg(long)]
        password: String,
    },
    /// Log out the current user
    Logout,
    /// Show the logged-in user
    Whoami,
    /// Task management
    Task {
        #[command(subcommand)]
        action: commands::task::TaskAction,
    },
    /// Points, rank, streak and precision
    Stats {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Completed tasks, most recent first
    History {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

impl Commands {
    fn name(&self) -> &'static str {
        match self {
            Commands::Login { .. } => "login",
            Commands::Logout => "logout",
            Commands::Whoami => "whoami",
            Commands::Task { .. } => "task",
            Commands::Stats { .. } => "stats",
            Commands::History { .. } => "history",
            Commands::Config { .. } => "config",
        }
    }
}

fn init_tracing(config: &Config) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log.level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();
    let config = Config::load_or_default();
    init_tracing(&config);

    tracing::debug!(command = cli.command.name(), "dispatching");
    let result = match cli.command {
        Commands::Login { username, password } => commands::auth::login(&username, &password),
        Commands::Logout => commands::auth::logout(),
        Commands::Whoami => commands::auth::whoami(),
        Commands::Task { action } => commands::task::run(action, &config),
        Commands::Stats { json } => commands::stats::run(json),
        Commands::History { json } => commands::history::run(json, &config),
        Commands::Config { action } => commands::config::run(action),
    };

    if let Err(e) = result {
        tracing::debug!(error = %e, "command failed");
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
