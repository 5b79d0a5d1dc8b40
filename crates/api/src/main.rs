//! API server entry point.

use std::sync::Arc;

use api::config::{AppEnv, Config};
use carrier_store::{
    CarrierStore, InMemoryCarrierStore, PostgresCarrierStore, SeedOutcome, bootstrap,
    default_carriers,
};
use tokio::signal;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Waits for a shutdown signal (SIGINT or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install SIGINT handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("received SIGINT, starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("received SIGTERM, starting graceful shutdown");
        }
    }
}

fn init_tracing(config: &Config) {
    let filter = EnvFilter::try_new(&config.log_level).unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    if config.env == AppEnv::Production {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

/// Opens the carrier directory selected by configuration.
async fn open_carrier_store(config: &Config) -> Arc<dyn CarrierStore> {
    let Some(url) = config.database_url.as_deref() else {
        if config.env == AppEnv::Production {
            panic!("DATABASE_URL is required in production");
        }
        tracing::info!("DATABASE_URL not set, using in-memory carrier directory");
        return Arc::new(InMemoryCarrierStore::new());
    };

    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(10)
        .connect(url)
        .await
        .expect("failed to connect to database");
    let store = PostgresCarrierStore::new(pool);

    if config.run_migrations {
        store.run_migrations().await.expect("migrations failed");
        tracing::info!("database migrations applied");
    }

    Arc::new(store)
}

#[tokio::main]
async fn main() {
    // 1. Load configuration and initialize tracing
    let config = Config::from_env();
    init_tracing(&config);
    tracing::info!(env = %config.env, "loaded configuration");

    // 2. Install Prometheus metrics recorder
    let prometheus_builder = metrics_exporter_prometheus::PrometheusBuilder::new();
    let metrics_handle = prometheus_builder
        .install_recorder()
        .expect("failed to install Prometheus recorder");

    // 3. Open and seed the carrier directory
    let carriers = open_carrier_store(&config).await;
    match bootstrap(carriers.as_ref(), default_carriers(&config.mock_base_url))
        .await
        .expect("failed to seed carrier directory")
    {
        SeedOutcome::Seeded(count) => tracing::info!(count, "seeded carrier directory"),
        SeedOutcome::AlreadyPopulated => tracing::info!("carrier directory already populated"),
        SeedOutcome::NotMigrated => {
            tracing::warn!("carrier table missing; set RUN_MIGRATIONS=true to create it")
        }
    }

    // 4. Build the application
    let state = api::create_state(carriers, &config).expect("failed to build HTTP client");
    let app = api::create_app(state, metrics_handle);

    // 5. Start server
    let addr = config.addr();
    tracing::info!(%addr, "starting API server");

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("failed to bind address");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("server error");

    tracing::info!("server shut down gracefully");
}
