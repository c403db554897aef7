use std::{path::PathBuf, sync::Arc};

use anyhow::Result;
use cannabot::{AppState, bot::Bot};
use cannabot_strain::StrainCatalog;
use tokio::sync::oneshot;
use tower_http::trace::TraceLayer;

/// Loads the dataset off the async runtime. The failure reason is sent on
/// `failed` so the server can stop.
fn spawn_dataset_load(
    catalog: Arc<StrainCatalog>,
    path: PathBuf,
    failed: oneshot::Sender<String>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let result = tokio::task::spawn_blocking(move || catalog.reload(&path)).await;

        let reason = match result {
            Ok(Ok(count)) => {
                tracing::info!(count, "Strain dataset loaded");
                return;
            }
            Ok(Err(err)) => err.to_string(),
            Err(err) => err.to_string(),
        };

        tracing::error!(reason = %reason, "Strain dataset failed to load");
        let _ = failed.send(reason);
    })
}

#[cfg(unix)]
fn spawn_reload_on_hangup(catalog: Arc<StrainCatalog>, path: PathBuf) -> Result<()> {
    use tokio::signal::unix::{SignalKind, signal};

    let mut hangup = signal(SignalKind::hangup())?;
    tokio::spawn(async move {
        while hangup.recv().await.is_some() {
            tracing::info!("Received SIGHUP signal, reloading strain dataset");

            let catalog = catalog.clone();
            let path = path.clone();
            match tokio::task::spawn_blocking(move || catalog.reload(&path)).await {
                Ok(Ok(count)) => tracing::info!(count, "Strain dataset reloaded"),
                Ok(Err(_)) => tracing::warn!("Keeping the previous strain dataset"),
                Err(err) => tracing::error!("Strain reload task failed: {err}"),
            }
        }
    });

    Ok(())
}

async fn shutdown_signal(load_failed: oneshot::Receiver<String>) {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {err}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!("Failed to install SIGTERM handler: {err}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    let load_failed = async {
        // A dropped sender means the load succeeded.
        if load_failed.await.is_err() {
            std::future::pending::<()>().await;
        }
    };

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C signal");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM signal");
        },
        _ = load_failed => {
            tracing::info!("Stopping after strain dataset failure");
        },
    }

    tracing::info!("Starting graceful shutdown...");
}

pub async fn serve(
    config: cannabot::Config,
    host_override: Option<String>,
    port_override: Option<u16>,
) -> Result<()> {
    tracing::info!("Starting cannabot server...");

    let host = host_override.unwrap_or(config.server.host.to_owned());
    let port = port_override.unwrap_or(config.server.port);

    let write_pool = cannabot::db::create_write_pool(&config.database.url).await?;
    let read_pool =
        cannabot::db::create_read_pool(&config.database.url, config.database.max_connections)
            .await?;

    let state = cannabot_shared::State {
        read_db: read_pool.clone(),
        write_db: write_pool.clone(),
    };
    let consumption = cannabot_consumption::Command::new(state)
        .with_default_daily_limit(config.bot.max_daily_thc_default);
    let catalog = Arc::new(StrainCatalog::new(config.strains.discovery_options()));
    let dataset_path = PathBuf::from(&config.strains.dataset_path);

    let app_state = AppState {
        bot: Bot::new(catalog.clone(), consumption),
        pool: read_pool.clone(),
        config,
    };

    let app = cannabot::router(app_state).layer(TraceLayer::new_for_http());

    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", listener.local_addr()?);

    let (failed_tx, failed_rx) = oneshot::channel();
    let load = spawn_dataset_load(catalog.clone(), dataset_path.clone(), failed_tx);

    #[cfg(unix)]
    spawn_reload_on_hangup(catalog.clone(), dataset_path.clone())?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(failed_rx))
        .await?;

    let load_finished = load.is_finished();
    load.abort();

    tracing::info!("Closing database pools...");
    read_pool.close().await;
    write_pool.close().await;
    tracing::info!("Database pools closed");

    if load_finished && !catalog.is_ready() {
        anyhow::bail!(
            "strain dataset {} could not be loaded",
            dataset_path.display()
        );
    }

    tracing::info!("Graceful shutdown complete");

    Ok(())
}
