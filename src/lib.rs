pub mod controllers;
pub mod core;
pub mod routes;
pub mod token;
pub mod types;
pub mod utils;
pub(crate) mod workers;

use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::controllers::authorizer::SessionAuthorizer;
use crate::controllers::credentials::PgCredentialSource;
use crate::core::error::ConfigError as Error;
use crate::core::{config::Args, state::AppState};
use crate::token::{PgTokenStore, TokenStore};
use crate::workers::sweeper::Sweeper;

pub async fn run() -> Result<(), Error> {
    let config = Args::load()?;

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_new(&config.log_level).unwrap_or_default())
        .with(tracing_subscriber::fmt::layer())
        .init();

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&config.database_url())
        .await
        .map_err(Error::Sql)?;

    sqlx::migrate!()
        .run(&pool)
        .await
        .map_err(Error::DatabaseMigration)?;

    let token_store: Arc<dyn TokenStore> = Arc::new(PgTokenStore::new(pool.clone()));

    let authorizer = SessionAuthorizer::new(
        token_store.clone(),
        Arc::new(PgCredentialSource::new(pool)),
        config.token_ttl(),
    );

    let state = AppState::new(Arc::new(authorizer), token_store, config.body_limits());

    let sweeper = Sweeper::new(state.token_store.clone(), config.purge_interval());

    tokio::spawn(async move {
        sweeper.run().await;
    });

    let app = routes::router::routes(state);

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", config.port))
        .await
        .map_err(Error::IO)?;

    tracing::info!("listening on port {}", config.port);

    axum::serve(listener, app).await.map_err(Error::IO)?;

    Ok(())
}
