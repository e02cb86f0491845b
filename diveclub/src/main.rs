//! `diveclub` - serve, migrate or seed the dive club database.

#![deny(unsafe_code)]

use clap::Parser;
use rand::{SeedableRng, rngs::StdRng};
use tokio::{net::TcpListener, signal};

use diveclub::{
    AppState, Result,
    cli::{Cli, Command},
    config::Config,
    database, logging, routes, seed,
};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_logging(cli.verbosity());

    let mut config = Config::load_from(cli.config.as_deref())?;

    match cli.command {
        Command::Serve { bind } => {
            if let Some(bind) = bind {
                config.server.bind = bind;
            }
            serve(&config).await
        }
        Command::Migrate => {
            let db = database::connect(&config.database).await?;
            database::migrate(&db).await?;
            Ok(())
        }
        Command::Seed { rng_seed } => {
            let db = database::connect(&config.database).await?;
            database::migrate(&db).await?;
            let mut rng = rng_seed.map_or_else(StdRng::from_entropy, StdRng::seed_from_u64);
            let summary = seed::seed(&db, &mut rng).await?;
            tracing::info!(
                removed = summary.removed,
                members = summary.members,
                dives = summary.dives,
                equipment = summary.equipment,
                "Seeded database"
            );
            Ok(())
        }
    }
}

async fn serve(config: &Config) -> Result<()> {
    let addr = config.bind_addr()?;
    let db = database::connect(&config.database).await?;
    database::migrate(&db).await?;

    let app = routes::app(AppState::new(db, config.pagination.per_page));
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, docs = diveclub::admin::DOCS_PATH, "Listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = signal::ctrl_c().await {
        tracing::error!(error = %err, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
