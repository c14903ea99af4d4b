//! Similar-recipe lookup
//!
//! Two MMR passes per query: first over recipes sharing ingredients with
//! the seed, then over recipes sharing non-ingredient tags, with the
//! second pass skipping everything the first already picked.

use std::sync::Arc;

use tracing::{debug, instrument};

use recipe_gateway_core::RecipeGatewayError;

use crate::diversity::{mmr_diversify, SimilarityBasis};
use crate::store::{GraphStore, SimilarCandidate};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimilarityParams {
    pub top_n: usize,
    pub min_shared_ings: u32,
    /// Over-fetch multiplier: the store returns `top_n * candidate_factor`
    /// neighbors per pass before MMR trims them
    pub candidate_factor: usize,
    pub lambda_ing: f64,
    pub lambda_overall: f64,
}

impl Default for SimilarityParams {
    fn default() -> Self {
        Self {
            top_n: 3,
            min_shared_ings: 2,
            candidate_factor: 5,
            lambda_ing: 0.7,
            lambda_overall: 0.7,
        }
    }
}

/// Both result lists of one similarity query
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SimilarRecipes {
    pub ingredients: Vec<SimilarCandidate>,
    pub overall: Vec<SimilarCandidate>,
}

pub struct SimilarityService {
    store: Arc<dyn GraphStore>,
}

impl SimilarityService {
    pub fn new(store: Arc<dyn GraphStore>) -> Self {
        Self { store }
    }

    #[instrument(skip(self, params))]
    pub async fn similar(
        &self,
        recipe_id: i64,
        params: &SimilarityParams,
    ) -> Result<SimilarRecipes, RecipeGatewayError> {
        let fetch_limit = (params.top_n * params.candidate_factor).max(params.top_n) as u32;

        let ingredient_pool = self
            .store
            .ingredient_neighbors(recipe_id, fetch_limit, params.min_shared_ings)
            .await?;
        debug!(pool = ingredient_pool.len(), "ingredient neighbors fetched");
        let ingredients = mmr_diversify(
            ingredient_pool,
            params.top_n,
            SimilarityBasis::Ingredients,
            params.lambda_ing,
        );

        let exclude: Vec<i64> = ingredients.iter().map(|n| n.candidate.id).collect();
        let tag_pool = self
            .store
            .tag_neighbors(recipe_id, fetch_limit, &exclude)
            .await?;
        debug!(pool = tag_pool.len(), "tag neighbors fetched");
        let overall = mmr_diversify(
            tag_pool,
            params.top_n,
            SimilarityBasis::Tags,
            params.lambda_overall,
        );

        Ok(SimilarRecipes {
            ingredients,
            overall,
        })
    }
}
