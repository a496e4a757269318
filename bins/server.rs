use std::process::ExitCode;
use std::sync::Arc;

use dotenvy::dotenv;
use migration::{Migrator, MigratorTrait};
use service::cache::MokaCache;
use service::hash::Argon2Hasher;
use service::repo::SeaOrmRepositories;
use service::{PreferenceBootstrap, Provider};
use tracing::{error, info};

/// Connect storage, build the provider and warm the cache. Returns the
/// provider once the process is ready to serve.
async fn start(cfg: &configs::AppConfig) -> anyhow::Result<Arc<Provider>> {
    let db = models::db::connect_with_config(&cfg.database).await?;

    if cfg.database.migrate_on_start {
        Migrator::up(&db, None).await?;
        info!(service = "server", event = "migrated", "database schema up to date");
    }

    let provider = Arc::new(Provider::new(
        Arc::new(SeaOrmRepositories::new(db)),
        Arc::new(Argon2Hasher::new()),
        Arc::new(MokaCache::new(cfg.cache.max_capacity)),
    ));

    let report = PreferenceBootstrap::from_provider(&provider).run().await;
    info!(
        service = "server",
        event = "bootstrap",
        outcome = ?report.outcome,
        rooms = report.room_statuses,
        tables = report.table_statuses,
        "store preferences seeded"
    );

    Ok(provider)
}

fn main() -> ExitCode {
    // .env must be loaded before the config and RUST_LOG are read
    dotenv().ok();

    let cfg = match configs::AppConfig::load_and_validate() {
        Ok(cfg) => cfg,
        Err(e) => {
            common::utils::logging::init_logging_default();
            error!(
                service = "server",
                event = "config_invalid",
                error = %e,
                "failed to load configuration"
            );
            return ExitCode::FAILURE;
        }
    };
    common::utils::logging::init_logging(cfg.logging.format);

    let pid = std::process::id();
    let version = env!("CARGO_PKG_VERSION");

    std::panic::set_hook(Box::new(move |info| {
        error!(
            service = "server",
            event = "panic",
            pid,
            message = %info,
            "unhandled panic occurred"
        );
    }));

    let mut builder = tokio::runtime::Builder::new_multi_thread();
    builder.enable_all();
    if let Some(w) = cfg.server.worker_threads {
        builder.worker_threads(w);
    }
    let rt = match builder.build() {
        Ok(rt) => rt,
        Err(e) => {
            error!(
                service = "server",
                event = "runtime_build_failed",
                error = %e,
                "failed to build tokio runtime"
            );
            return ExitCode::FAILURE;
        }
    };

    info!(
        service = %cfg.server.name,
        event = "start",
        pid,
        version,
        threads = cfg.server.worker_threads.unwrap_or_default(),
        "server starting"
    );

    rt.block_on(async move {
        let _provider = match start(&cfg).await {
            Ok(provider) => provider,
            Err(e) => {
                error!(service = "server", event = "start_failed", error = %e, "startup failed");
                return ExitCode::FAILURE;
            }
        };
        info!(service = %cfg.server.name, event = "ready", pid, "business tier ready");

        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!(
                    service = "server",
                    event = "shutdown_signal",
                    pid,
                    "received Ctrl+C, shutting down"
                );
                ExitCode::SUCCESS
            }
            Err(e) => {
                error!(
                    service = "server",
                    event = "signal_error",
                    error = %e,
                    "failed to listen for Ctrl+C"
                );
                ExitCode::FAILURE
            }
        }
    })
}
