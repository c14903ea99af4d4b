//! HTTP handlers for the search service

use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use tracing::error;

use recipe_gateway_core::{FilterKeywords, RecipeGatewayError};

use crate::engine::SearchEngine;
use crate::similarity::{SimilarityParams, SimilarityService};
use crate::store::SimilarCandidate;

pub struct AppState {
    pub engine: SearchEngine,
    pub similarity: SimilarityService,
    pub similarity_params: SimilarityParams,
}

#[derive(Debug, Deserialize)]
pub struct SearchRequest {
    pub query: String,
    #[serde(rename = "filterKeywords", default)]
    pub filter_keywords: FilterKeywords,
    pub top_k: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct SimilarRequest {
    pub recipe_id: i64,
    pub top_n: Option<usize>,
    pub min_shared_ings: Option<u32>,
}

#[derive(Debug, Serialize)]
struct SimilarResponse {
    overall: Vec<SimilarCandidate>,
    ingredients: Vec<SimilarCandidate>,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

async fn search(state: web::Data<AppState>, body: web::Json<SearchRequest>) -> HttpResponse {
    let request = body.into_inner();
    if request.query.trim().is_empty() {
        let err = RecipeGatewayError::InvalidRequest("query must not be empty".to_string());
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: err.to_string(),
        });
    }

    match state
        .engine
        .search(&request.query, &request.filter_keywords, request.top_k)
        .await
    {
        Ok(outcome) => HttpResponse::Ok().json(outcome),
        Err(e) => {
            error!(error = %e, "search request failed");
            HttpResponse::InternalServerError().json(ErrorResponse {
                error: e.to_string(),
            })
        }
    }
}

async fn similar(state: web::Data<AppState>, body: web::Json<SimilarRequest>) -> HttpResponse {
    let request = body.into_inner();
    let mut params = state.similarity_params;
    if let Some(top_n) = request.top_n {
        params.top_n = top_n;
    }
    if let Some(min_shared) = request.min_shared_ings {
        params.min_shared_ings = min_shared;
    }

    match state.similarity.similar(request.recipe_id, &params).await {
        Ok(recipes) => HttpResponse::Ok().json(SimilarResponse {
            overall: recipes.overall,
            ingredients: recipes.ingredients,
        }),
        Err(e) => {
            error!(error = %e, recipe_id = request.recipe_id, "similarity request failed");
            HttpResponse::InternalServerError().json(ErrorResponse {
                error: e.to_string(),
            })
        }
    }
}

async fn health() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "service": "search-service",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .route("/search", web::post().to(search))
            .route("/similar", web::post().to(similar))
            .route("/health", web::get().to(health)),
    );
}
