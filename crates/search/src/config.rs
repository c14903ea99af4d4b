//! Service configuration
//!
//! Loaded from environment variables with the `RECIPE_GATEWAY_` prefix,
//! with `.env` support via dotenvy in the binary. Defaults cover local
//! development; only the database URL is required.

use recipe_gateway_core::RecipeGatewayError;

use crate::engine::EngineParams;
use crate::similarity::SimilarityParams;

const ENV_PREFIX: &str = "RECIPE_GATEWAY_";

#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub extractor: ExtractorConfig,
    pub engine: EngineParams,
    pub similarity: SimilarityParams,
}

#[derive(Debug, Clone)]
pub struct ExtractorConfig {
    pub api_url: String,
    pub api_key: String,
    pub model: String,
}

fn var(name: &str) -> Option<String> {
    std::env::var(format!("{ENV_PREFIX}{name}")).ok()
}

fn required(name: &str) -> Result<String, RecipeGatewayError> {
    var(name).ok_or_else(|| {
        RecipeGatewayError::Config(format!("missing required env var {ENV_PREFIX}{name}"))
    })
}

fn parsed<T: std::str::FromStr>(name: &str, default: T) -> Result<T, RecipeGatewayError> {
    match var(name) {
        Some(raw) => raw.parse().map_err(|_| {
            RecipeGatewayError::Config(format!("invalid value for {ENV_PREFIX}{name}: {raw}"))
        }),
        None => Ok(default),
    }
}

impl ServiceConfig {
    pub fn from_env() -> Result<Self, RecipeGatewayError> {
        let engine_defaults = EngineParams::default();
        let similarity_defaults = SimilarityParams::default();

        Ok(Self {
            host: var("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: parsed("PORT", 8083)?,
            database_url: required("DATABASE_URL")?,
            extractor: ExtractorConfig {
                api_url: var("LLM_API_URL")
                    .unwrap_or_else(|| "https://api.openai.com/v1/chat/completions".to_string()),
                api_key: var("LLM_API_KEY").unwrap_or_default(),
                model: var("LLM_MODEL").unwrap_or_else(|| "gpt-4o-mini".to_string()),
            },
            engine: EngineParams {
                candidate_cap: parsed("CANDIDATE_CAP", engine_defaults.candidate_cap)?,
                greedy_k: parsed("GREEDY_K", engine_defaults.greedy_k)?,
                temperature: parsed("TEMPERATURE", engine_defaults.temperature)?,
                default_top_k: parsed("TOP_K", engine_defaults.default_top_k)?,
            },
            similarity: SimilarityParams {
                top_n: parsed("SIMILAR_TOP_N", similarity_defaults.top_n)?,
                min_shared_ings: parsed("SIMILAR_MIN_SHARED", similarity_defaults.min_shared_ings)?,
                candidate_factor: parsed(
                    "SIMILAR_CANDIDATE_FACTOR",
                    similarity_defaults.candidate_factor,
                )?,
                lambda_ing: parsed("SIMILAR_LAMBDA_ING", similarity_defaults.lambda_ing)?,
                lambda_overall: parsed(
                    "SIMILAR_LAMBDA_OVERALL",
                    similarity_defaults.lambda_overall,
                )?,
            },
        })
    }

    pub fn validate(&self) -> Result<(), RecipeGatewayError> {
        if self.engine.temperature <= 0.0 {
            return Err(RecipeGatewayError::Config(
                "temperature must be positive".to_string(),
            ));
        }
        if self.engine.greedy_k == 0 || self.engine.default_top_k == 0 {
            return Err(RecipeGatewayError::Config(
                "greedy_k and top_k must be at least 1".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.similarity.lambda_ing)
            || !(0.0..=1.0).contains(&self.similarity.lambda_overall)
        {
            return Err(RecipeGatewayError::Config(
                "lambda values must be within [0, 1]".to_string(),
            ));
        }
        Ok(())
    }
}
