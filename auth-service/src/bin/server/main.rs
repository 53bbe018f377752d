use std::sync::Arc;

use auth::Authenticator;
use auth_service::config::Config;
use auth_service::domain::session::ports::TokenServicePort;
use auth_service::domain::session::service::TokenService;
use auth_service::inbound::http::router::create_router;
use auth_service::outbound::repositories::InMemoryCredentialStore;
use auth_service::outbound::repositories::PostgresCredentialStore;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "auth_service=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        service = "auth-service",
        version = env!("CARGO_PKG_VERSION"),
        "Service starting"
    );

    let config = Config::load()?;

    tracing::info!(
        http_port = config.server.http_port,
        persistent = config.database.is_some(),
        access_ttl_minutes = config.jwt.access_ttl_minutes,
        refresh_ttl_minutes = config.jwt.refresh_ttl_minutes,
        "Configuration loaded"
    );

    let authenticator = Arc::new(
        Authenticator::new(
            config.jwt.access_secret.as_bytes(),
            config.jwt.refresh_secret.as_bytes(),
        )
        .with_ttls(
            chrono::Duration::minutes(config.jwt.access_ttl_minutes),
            chrono::Duration::minutes(config.jwt.refresh_ttl_minutes),
        ),
    );

    let token_service: Arc<dyn TokenServicePort> = match &config.database {
        Some(database) => {
            let pg_pool = PgPoolOptions::new()
                .max_connections(5)
                .connect(&database.url)
                .await?;
            tracing::info!(
                max_connections = 5,
                database = "postgresql",
                "Database connection pool created"
            );

            sqlx::migrate!("./migrations").run(&pg_pool).await?;
            tracing::info!(database = "postgresql", "Database migrations completed");

            let store = Arc::new(PostgresCredentialStore::new(pg_pool));
            Arc::new(TokenService::new(store, Arc::clone(&authenticator)))
        }
        None => {
            tracing::warn!("No database configured, sessions are kept in memory only");

            let store = Arc::new(InMemoryCredentialStore::new());
            Arc::new(TokenService::new(store, Arc::clone(&authenticator)))
        }
    };

    let http_address = format!("0.0.0.0:{}", config.server.http_port);
    let http_listener = tokio::net::TcpListener::bind(&http_address).await?;
    tracing::info!(
        address = %http_address,
        port = config.server.http_port,
        protocol = "http",
        "Http server listening"
    );

    let http_application = create_router(token_service, authenticator);

    if let Err(e) = axum::serve(http_listener, http_application).await {
        tracing::error!(error = %e, "Server error");
        return Err(e.into());
    }

    tracing::info!("Server exited successfully");
    Ok(())
}
