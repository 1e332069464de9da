use std::future::Future;
use std::time::Duration;

use axum::Router;
use configs::AppConfig;
use migration::MigratorTrait;
use sea_orm::DatabaseConnection;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

use crate::errors::StartupError;
use crate::routes;
use crate::state::ServerState;

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

/// Connect to the datastore and, when configured, apply pending migrations.
pub async fn connect_database(cfg: &AppConfig) -> Result<DatabaseConnection, StartupError> {
    let db = models::db::connect(&cfg.database)
        .await
        .map_err(|e| StartupError::Database(e.to_string()))?;
    if cfg.database.run_migrations {
        migration::Migrator::up(&db, None)
            .await
            .map_err(|e| StartupError::Migration(e.to_string()))?;
        info!("migrations applied");
    }
    Ok(db)
}

/// Router over a ready connection.
pub fn build_app(db: DatabaseConnection) -> Router {
    routes::build_router(ServerState::new(db), build_cors())
}

/// Resolves on Ctrl+C or, on unix, SIGTERM.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "failed to listen for ctrl_c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

/// Serve `app` until `shutdown` resolves, then give in-flight requests up to
/// `draining` to finish.
pub async fn serve<F>(listener: TcpListener, app: Router, shutdown: F, draining: Duration) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send,
{
    let (stop_tx, stop_rx) = tokio::sync::oneshot::channel::<()>();
    let server = axum::serve(listener, app).with_graceful_shutdown(async move {
        let _ = stop_rx.await;
    });
    let mut server_task = tokio::spawn(async move { server.await });

    tokio::select! {
        res = &mut server_task => return Ok(res??),
        _ = shutdown => {
            info!(draining_secs = draining.as_secs(), "shutdown signal received, draining");
        }
    }

    let _ = stop_tx.send(());
    match tokio::time::timeout(draining, server_task).await {
        Ok(joined) => joined??,
        Err(_) => warn!("draining period elapsed with requests still in flight"),
    }
    info!("server stopped");
    Ok(())
}

/// Public entry: build the app from config and run the HTTP server
pub async fn run(cfg: AppConfig) -> anyhow::Result<()> {
    let db = connect_database(&cfg).await?;
    let app = build_app(db);

    let addr = format!("{}:{}", cfg.server.host, cfg.server.port);
    let listener = TcpListener::bind((cfg.server.host.as_str(), cfg.server.port))
        .await
        .map_err(|source| StartupError::Bind { addr: addr.clone(), source })?;
    info!(%addr, "starting service registry");

    serve(listener, app, shutdown_signal(), Duration::from_secs(cfg.server.draining_period_secs)).await
}
