//! Recipe search service binary

use std::sync::Arc;

use actix_web::{web, App, HttpServer};
use sqlx::postgres::PgPoolOptions;
use tracing::info;

use recipe_gateway_search::config::ServiceConfig;
use recipe_gateway_search::extractor::{ConstraintExtractor, HttpConstraintExtractor};
use recipe_gateway_search::handlers::{configure_routes, AppState};
use recipe_gateway_search::store::{GraphStore, PostgresGraphStore};
use recipe_gateway_search::{SearchEngine, SimilarityService};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .json()
        .init();

    let config = ServiceConfig::from_env()?;
    config.validate()?;
    info!(host = %config.host, port = config.port, "starting search service");

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(&config.database_url)
        .await?;
    let store: Arc<dyn GraphStore> = Arc::new(PostgresGraphStore::new(pool));
    let extractor: Arc<dyn ConstraintExtractor> = Arc::new(HttpConstraintExtractor::new(
        config.extractor.api_url.clone(),
        config.extractor.api_key.clone(),
        config.extractor.model.clone(),
    ));

    let state = web::Data::new(AppState {
        engine: SearchEngine::new(extractor, store.clone(), config.engine),
        similarity: SimilarityService::new(store),
        similarity_params: config.similarity,
    });

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .configure(configure_routes)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await?;

    Ok(())
}
