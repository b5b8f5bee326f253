use std::io;

use tracing::info;

use profnet_cli::config::DEFAULT_LOG_FILTER;
use profnet_cli::{Config, Console, menu};

fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Logs go to stderr so they stay out of the menus
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()),
        )
        .with_writer(io::stderr)
        .init();

    let config = Config::from_env();

    let db = config.connect(&mut io::stdout())?;
    info!("Using database {}", config.db_path.display());

    let mut console = Console::new(io::stdin().lock(), io::stdout());
    menu::run(&db, &mut console)
}
