use anyhow::Result;
use clap::{Parser, Subcommand};

mod cli;

/// cannabot - cannabis tracker and strain discovery bot
#[derive(Parser)]
#[command(name = "cannabot")]
#[command(about = "Consumption tracking, stash inventory and strain discovery", long_about = None)]
struct Cli {
    /// Path to configuration file
    #[arg(long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP interactions server
    Serve {
        /// Server host address (overrides config file)
        #[arg(long)]
        host: Option<String>,

        /// Server port (overrides config file)
        #[arg(long)]
        port: Option<u16>,
    },
    /// Run database migrations
    Migrate,
    /// Drop database if exists and recreate with migrations
    Reset,
    /// Query the strain dataset from the terminal
    Strains(cli::strains::StrainsArgs),
    /// Manage user settings
    User {
        #[command(subcommand)]
        command: cli::user::UserCommand,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = cannabot::Config::load(cli.config.clone())?;
    config.validate().map_err(|e| anyhow::anyhow!(e))?;

    cannabot::observability::init_observability(
        "cannabot",
        env!("CARGO_PKG_VERSION"),
        &config.observability.log_level,
    )?;

    match cli.command {
        Commands::Serve { host, port } => cli::server::serve(config, host, port).await,
        Commands::Migrate => cannabot::migrate::migrate(&config).await,
        Commands::Reset => cannabot::migrate::reset(&config).await,
        Commands::Strains(args) => cli::strains::run(&config, args),
        Commands::User { command } => cli::user::run(config, command).await,
    }
}
