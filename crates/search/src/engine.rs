//! Search engine pipeline
//!
//! One request flows extractor → normalizer → retriever → scorer →
//! selector → explanation builder. The random source driving selection is
//! caller-injectable so full pipeline runs are reproducible in tests.

use std::sync::Arc;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use recipe_gateway_core::{
    ConstraintSet, Explanation, FilterKeywords, RecipeGatewayError, ScoredCandidate,
};

use crate::explanation::ExplanationBuilder;
use crate::extractor::ConstraintExtractor;
use crate::normalize::ConstraintNormalizer;
use crate::retrieval::CandidateRetriever;
use crate::scoring::MultiDimensionScorer;
use crate::selection::{select_diverse, sort_pool, SelectionOutcome, SelectionParams};
use crate::store::GraphStore;

pub const NO_DISCRIMINATIVE_RESULT: &str = "no_discriminative_result";

/// Engine-level knobs
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineParams {
    /// Pool size cap applied after scoring and ranking, so a low-view
    /// candidate with a strong score is never cut before it is scored
    pub candidate_cap: usize,
    pub greedy_k: usize,
    pub temperature: f64,
    pub default_top_k: usize,
}

impl Default for EngineParams {
    fn default() -> Self {
        Self {
            candidate_cap: 50,
            greedy_k: 3,
            temperature: 0.5,
            default_top_k: 5,
        }
    }
}

/// One selected recipe with its score and justification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    #[serde(flatten)]
    pub scored: ScoredCandidate,
    pub explanation: Explanation,
}

/// Everything a search request produces
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchOutcome {
    pub results: Vec<SearchResult>,
    /// The normalized constraint set, echoed back to the client
    pub keywords: ConstraintSet,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub no_result_reason: Option<String>,
}

pub struct SearchEngine {
    extractor: Arc<dyn ConstraintExtractor>,
    store: Arc<dyn GraphStore>,
    retriever: CandidateRetriever,
    normalizer: ConstraintNormalizer,
    scorer: MultiDimensionScorer,
    explainer: ExplanationBuilder,
    params: EngineParams,
}

impl SearchEngine {
    pub fn new(
        extractor: Arc<dyn ConstraintExtractor>,
        store: Arc<dyn GraphStore>,
        params: EngineParams,
    ) -> Self {
        Self {
            extractor,
            retriever: CandidateRetriever::new(store.clone()),
            store,
            normalizer: ConstraintNormalizer::new(),
            scorer: MultiDimensionScorer::new(),
            explainer: ExplanationBuilder::new(),
            params,
        }
    }

    /// Run a search with an entropy-seeded random source
    pub async fn search(
        &self,
        query: &str,
        overrides: &FilterKeywords,
        top_k: Option<usize>,
    ) -> Result<SearchOutcome, RecipeGatewayError> {
        let mut rng = StdRng::from_entropy();
        self.search_with_rng(query, overrides, top_k, &mut rng).await
    }

    /// Full pipeline with a caller-supplied random source
    #[instrument(skip(self, overrides, rng), fields(query = %query))]
    pub async fn search_with_rng<R: Rng>(
        &self,
        query: &str,
        overrides: &FilterKeywords,
        top_k: Option<usize>,
        rng: &mut R,
    ) -> Result<SearchOutcome, RecipeGatewayError> {
        let raw = self.extractor.extract(query).await;
        let constraints = self.normalizer.normalize(raw, overrides);
        info!(keywords = ?constraints.all_keywords(), "constraints normalized");

        let pool = self.retriever.retrieve(&constraints).await?;
        let mut scored = self.scorer.score_all(pool, &constraints);
        sort_pool(&mut scored);
        // the cap cuts by rank, not by popularity; every hard-filter
        // survivor has been scored at this point
        scored.truncate(self.params.candidate_cap);

        let selection = SelectionParams {
            top_k: top_k.unwrap_or(self.params.default_top_k),
            greedy_k: self.params.greedy_k,
            temperature: self.params.temperature,
        };
        let selected = match select_diverse(scored, &selection, rng) {
            SelectionOutcome::Selected(selected) => selected,
            SelectionOutcome::NoDiscriminativeResult => {
                info!("pool carried no discriminative signal");
                return Ok(SearchOutcome {
                    results: Vec::new(),
                    keywords: constraints,
                    no_result_reason: Some(NO_DISCRIMINATIVE_RESULT.to_string()),
                });
            }
        };

        // one detail round trip per selected candidate, never per pool
        // member
        let mut results = Vec::with_capacity(selected.len());
        for scored in selected {
            let display_tags = self.store.fetch_tag_detail(scored.candidate.id).await?;
            let explanation =
                self.explainer
                    .build(&scored, &constraints, display_tags.as_ref());
            results.push(SearchResult {
                scored,
                explanation,
            });
        }

        info!(results = results.len(), "search completed");
        Ok(SearchOutcome {
            results,
            keywords: constraints,
            no_result_reason: None,
        })
    }
}
