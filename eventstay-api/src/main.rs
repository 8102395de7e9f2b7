use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use eventstay_api::{app, AppState, AuthConfig};
use eventstay_core::BookingService;
use eventstay_store::{
    app_config::Config, DbClient, PgBookingRepository, PgEnrollmentRepository,
    PgSessionRepository, PgTicketRepository,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "eventstay_api=debug,eventstay_core=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::load().context("Failed to load config")?;
    tracing::info!("Starting EventStay API on port {}", config.server.port);

    let db = DbClient::new(&config.database)
        .await
        .context("Failed to connect to Postgres")?;
    if config.database.run_migrations {
        db.migrate().await.context("Failed to run migrations")?;
    }

    let bookings = BookingService::new(
        Arc::new(PgBookingRepository::new(db.pool.clone())),
        Arc::new(PgEnrollmentRepository::new(db.pool.clone())),
        Arc::new(PgTicketRepository::new(db.pool.clone())),
    )
    .with_update_mode(config.booking.update_mode);
    tracing::info!("Room changes use {:?} mode", config.booking.update_mode);

    let app_state = AppState {
        bookings,
        sessions: Arc::new(PgSessionRepository::new(db.pool.clone())),
        auth: AuthConfig {
            secret: config.auth.jwt_secret.clone(),
            expiration: config.auth.jwt_expiration_seconds,
        },
    };

    let app = app(app_state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
