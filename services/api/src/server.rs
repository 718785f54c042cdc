use crate::cli::ServeArgs;
use crate::infra::{cors_layer, AppState};
use crate::routes::with_operational_routes;
use axum::{Extension, Router};
use axum_prometheus::PrometheusMetricLayer;
use bh_investment::config::{AppConfig, ServerConfig};
use bh_investment::error::AppError;
use bh_investment::lifecycle::Backend;
use bh_investment::listings::SeedOutcome;
use bh_investment::store::{DocumentStore, MemoryStore, MongoStore};
use bh_investment::telemetry;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::signal;
use tower_http::trace::TraceLayer;
use tracing::{debug, error, info};

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    if args.in_memory {
        info!("using in-memory store; records are lost on exit");
        serve(config, MemoryStore::new()).await
    } else {
        let store = MongoStore::connect(&config.store).await?;
        serve(config, store).await
    }
}

async fn serve<S>(config: AppConfig, store: S) -> Result<(), AppError>
where
    S: DocumentStore + 'static,
{
    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let backend = Backend::init(store).await?;

    let app = with_operational_routes(backend.router())
        .layer(Extension(app_state))
        .layer(cors_layer(&config.cors))
        .layer(TraceLayer::new_for_http())
        .layer(prometheus_layer);

    info!(?config.environment, database = %config.store.database, "starting bh investment api");

    serve_backend(&config.server, backend, app, &readiness_flag).await
}

/// Serves `app` until a shutdown signal, then closes the backend's store even
/// when binding or serving failed. The first error wins.
async fn serve_backend<S>(
    server: &ServerConfig,
    backend: Backend<S>,
    app: Router,
    readiness: &AtomicBool,
) -> Result<(), AppError>
where
    S: DocumentStore + 'static,
{
    let served = async {
        let addr = server.socket_addr()?;
        let listener = tokio::net::TcpListener::bind(addr).await?;
        readiness.store(true, Ordering::Release);
        info!(%addr, "bh investment api ready");

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;
        Ok::<(), AppError>(())
    }
    .await;

    readiness.store(false, Ordering::Release);
    if let Err(err) = &served {
        error!(error = %err, "api server stopped with an error");
    }

    let closed = backend.shutdown().await.map_err(AppError::from);
    served.and(closed)
}

/// Runs the startup seeding check against the configured store and exits.
pub(crate) async fn seed() -> Result<(), AppError> {
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    let store = MongoStore::connect(&config.store).await?;
    store.ping().await?;
    let backend = Backend::init(store).await?;

    match backend.seed_outcome() {
        SeedOutcome::Seeded(written) => {
            println!("Seeded {written} sample properties into '{}'", config.store.database)
        }
        SeedOutcome::Skipped { existing } => println!(
            "'{}' already holds {existing} properties; nothing seeded",
            config.store.database
        ),
    }

    backend.shutdown().await?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            debug!(error = %err, "ctrl-c handler unavailable");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(err) => {
                debug!(error = %err, "SIGTERM handler unavailable");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("received ctrl-c, shutting down"),
        _ = terminate => info!("received SIGTERM, shutting down"),
    }
}
