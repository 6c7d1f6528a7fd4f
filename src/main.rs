//! Loan Desk API server.

use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use loan_desk::adapters::auth::{FirebaseConfig, FirebaseSessionValidator};
use loan_desk::adapters::http::{api_router, with_transport_layers, ApiDependencies};
use loan_desk::adapters::memory::InMemoryStore;
use loan_desk::adapters::postgres::{
    self, PostgresApplicationRepository, PostgresLoanRepository, PostgresPaymentLedger,
    PostgresUserRepository,
};
use loan_desk::adapters::stripe::{StripeConfig, StripePaymentAdapter};
use loan_desk::application::handlers::CheckoutSettings;
use loan_desk::config::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::load().context("failed to load configuration")?;
    config.validate().context("invalid configuration")?;

    init_tracing(&config);
    tracing::info!(
        environment = ?config.server.environment,
        in_memory = config.database.in_memory,
        "Starting loan-desk"
    );

    let payment_provider = Arc::new(
        StripePaymentAdapter::new(StripeConfig::from_payment_config(&config.payment))
            .context("failed to build Stripe client")?,
    );
    let session_validator = Arc::new(
        FirebaseSessionValidator::new(FirebaseConfig::from_auth_config(&config.auth))
            .context("failed to build Firebase token validator")?,
    );
    let checkout = CheckoutSettings::new(&config.server.site_domain, &config.payment.currency);

    let (deps, pool) = if config.database.in_memory {
        tracing::warn!("Using in-memory storage; data is lost on shutdown");
        let store = Arc::new(InMemoryStore::new());
        let deps = ApiDependencies {
            loans: store.clone(),
            users: store.clone(),
            applications: store.clone(),
            ledger: store,
            payment_provider,
            session_validator,
            checkout,
        };
        (deps, None)
    } else {
        let pool = postgres::connect(&config.database)
            .await
            .context("failed to connect to PostgreSQL")?;
        if config.database.run_migrations {
            postgres::run_migrations(&pool)
                .await
                .context("failed to run migrations")?;
            tracing::info!("Database migrations applied");
        }
        let deps = ApiDependencies {
            loans: Arc::new(PostgresLoanRepository::new(pool.clone())),
            users: Arc::new(PostgresUserRepository::new(pool.clone())),
            applications: Arc::new(PostgresApplicationRepository::new(pool.clone())),
            ledger: Arc::new(PostgresPaymentLedger::new(pool.clone())),
            payment_provider,
            session_validator,
            checkout,
        };
        (deps, Some(pool))
    };

    let app = with_transport_layers(api_router(deps), &config.server);

    let addr = config.server.socket_addr()?;
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    tracing::info!("Listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    if let Some(pool) = pool {
        pool.close().await;
    }
    tracing::info!("Shut down");
    Ok(())
}

fn init_tracing(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.server.log_level));

    let registry = tracing_subscriber::registry().with(filter);
    if config.is_production() {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
    tracing::info!("Shutdown signal received");
}
