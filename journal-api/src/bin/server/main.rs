use std::sync::Arc;
use std::time::Duration;

use auth::AuthGate;
use auth::PasswordHasher;
use auth::RevocationSweeper;
use auth::TokenCodec;
use journal_api::config::Config;
use journal_api::domain::user::service::UserService;
use journal_api::inbound::http::router::create_router;
use journal_api::outbound::repositories::PostgresRevocationStore;
use journal_api::outbound::repositories::PostgresUserRepository;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "journal_api=debug,auth=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        service = "journal-api",
        version = env!("CARGO_PKG_VERSION"),
        "Service starting"
    );

    let config = Config::load()?;

    tracing::info!(
        http_port = config.server.http_port,
        token_ttl_minutes = config.jwt.access_token_expire_minutes,
        gc_interval_secs = config.revocation.gc_interval_secs,
        "Configuration loaded"
    );

    let pg_pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .acquire_timeout(Duration::from_secs(config.database.acquire_timeout_secs))
        .connect(&config.database.url)
        .await?;
    tracing::info!(
        max_connections = config.database.max_connections,
        database = "postgresql",
        "Database connection pool created"
    );

    sqlx::migrate!("./migrations").run(&pg_pool).await?;
    tracing::info!(database = "postgresql", "Database migrations completed");

    let password_hasher = PasswordHasher::with_params(
        config.password.memory_kib,
        config.password.iterations,
        config.password.parallelism,
    )?;
    let token_codec = TokenCodec::new(config.jwt.secret.as_bytes());

    let user_repository = Arc::new(PostgresUserRepository::new(pg_pool.clone()));
    let user_service = Arc::new(UserService::new(user_repository));
    let revocation_store = Arc::new(PostgresRevocationStore::new(pg_pool));

    let auth_gate = Arc::new(
        AuthGate::new(
            password_hasher,
            token_codec,
            user_service,
            Arc::clone(&revocation_store),
            config.jwt.token_ttl(),
        )
        .with_store_timeout(config.revocation.store_timeout()),
    );

    let sweeper = RevocationSweeper::new(revocation_store, config.revocation.gc_interval());
    tokio::spawn(sweeper.run());

    let http_address = format!("0.0.0.0:{}", config.server.http_port);
    let http_listener = tokio::net::TcpListener::bind(&http_address).await?;
    tracing::info!(
        address = %http_address,
        port = config.server.http_port,
        protocol = "http",
        "Http server listening"
    );

    axum::serve(http_listener, create_router(auth_gate)).await?;

    tracing::info!("Server exited successfully");
    Ok(())
}
