use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::level_filters::LevelFilter;

use pass_schema_core::SchemaMap;
use pass_schema_service::cli::{Cli, Commands};
use pass_schema_service::fetch::{Credentials, EntityFetcher};
use pass_schema_service::server::router;
use pass_schema_service::service::SchemaService;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    };
    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Serve(args) => {
            let mut store = SchemaMap::new();
            store
                .load(&args.paths)
                .context("could not load static schemas")?;
            tracing::info!(count = store.len(), "loaded static schemas");

            let credentials = if !args.username.is_empty() {
                Some(Credentials {
                    username: args.username.clone(),
                    password: args.password.clone(),
                })
            } else {
                None
            };

            let entities = EntityFetcher::new(
                reqwest::Client::new(),
                args.external.clone(),
                args.internal.clone(),
                credentials,
            );

            let service = Arc::new(SchemaService::new(Arc::new(store), entities));
            let app = router(service);

            let listener = tokio::net::TcpListener::bind(("0.0.0.0", args.port))
                .await
                .with_context(|| format!("could not bind port {}", args.port))?;
            let local_addr = listener.local_addr().context("could not read bound address")?;
            tracing::info!(port = local_addr.port(), "listening");

            axum::serve(listener, app)
                .with_graceful_shutdown(shutdown_signal())
                .await
                .context("server error")?;
        }
    }

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }

    tracing::info!("shutting down");
}
