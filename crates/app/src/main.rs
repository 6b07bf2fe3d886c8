use clap::Parser;
use tokio::net::TcpListener;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use services::AppServices;

mod config;
mod error;
mod routes;

use config::{Cli, Command, prepare_sqlite_file};

async fn run(cli: Cli) -> anyhow::Result<()> {
    // Open + migrate SQLite at startup. Keep this in the binary glue so core/services stay pure.
    let db_url = cli.database_url();
    prepare_sqlite_file(&db_url)?;
    let services = AppServices::new_sqlite(&db_url, cli.questions.clone(), cli.random()).await?;

    match cli.command() {
        Command::Serve => {
            let addr = cli.addr();
            let listener = TcpListener::bind(addr).await?;
            tracing::info!(
                %addr,
                db = %db_url,
                questions = %cli.questions.display(),
                "quiz server listening"
            );

            axum::serve(listener, routes::router(services))
                .with_graceful_shutdown(shutdown_signal())
                .await?;
            Ok(())
        }
        Command::Summary => {
            let total = services.quiz().total().await?;
            let summary = services.stats().summary(total).await;
            println!("{}", serde_json::to_string_pretty(&summary)?);
            Ok(())
        }
    }
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Err(err) = run(Cli::parse()).await {
        // At this layer (binary glue), printing once is fine.
        eprintln!("{err:#}");
        std::process::exit(2);
    }
}
