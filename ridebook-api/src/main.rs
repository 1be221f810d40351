use std::sync::Arc;
use std::net::SocketAddr;
use ridebook_api::{app, state::{AppState, AuthConfig}};
use ridebook_core::BookingRepository;
use ridebook_store::{DbClient, ImageStore, InMemoryBookingRepository, PgBookingRepository};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ridebook_api=debug,ridebook_store=debug,tower_http=debug,axum::rejection=trace".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ridebook_store::app_config::Config::load()?;
    tracing::info!("Starting Ridebook API on port {}", config.server.port);

    // Booking storage
    let bookings: Arc<dyn BookingRepository> = match &config.database {
        Some(db) => {
            let client = DbClient::new(&db.url, db.max_connections).await?;
            client.migrate().await?;
            Arc::new(PgBookingRepository::new(client.pool.clone()))
        }
        None => {
            tracing::warn!("No database configured, bookings are kept in memory");
            Arc::new(InMemoryBookingRepository::new())
        }
    };

    // Upload directory
    let images = ImageStore::new(config.uploads.clone());
    images.ensure_dir().await?;
    tracing::info!("Storing uploads in {}", images.dir().display());

    let app_state = AppState {
        bookings,
        images: Arc::new(images),
        auth: AuthConfig {
            secret: config.auth.jwt_secret.clone(),
        },
    };

    let app = app(app_state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
