//! Graph store abstraction
//!
//! The engine reads recipes and their tag edges through [`GraphStore`].
//! The production implementation is backed by Postgres; tests use the
//! in-memory store.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use recipe_gateway_core::{Candidate, RecipeGatewayError, TagSets};

pub mod memory;
pub mod postgres;

pub use memory::InMemoryGraphStore;
pub use postgres::PostgresGraphStore;

/// Weighted overlap per dimension used by the tag-neighbor queries.
/// Ingredient is deliberately absent: ingredient overlap has its own pass.
pub const TAG_NEIGHBOR_WEIGHTS: &[(&str, u32)] = &[
    ("situation", 4),
    ("health", 5),
    ("category", 2),
    ("weather", 2),
    ("menu_style", 2),
    ("extra", 3),
];

/// Coarse narrowing pushed down to the store. The retriever still applies
/// the exact hard-filter predicate on every returned candidate, so the
/// store may over-return but must never under-return.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PoolFilter {
    pub max_cook_time_min: Option<u32>,
}

/// A recipe related to a seed recipe by shared edges, annotated with the
/// (weighted) overlap the store computed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimilarCandidate {
    pub candidate: Candidate,
    /// Shared ingredient count for ingredient neighbors, weighted shared
    /// tag count for tag neighbors
    pub shared: u32,
}

#[async_trait]
pub trait GraphStore: Send + Sync {
    /// Fetch the candidate pool with normalized tag sets populated,
    /// narrowed by the pool filter, most viewed first.
    async fn fetch_candidates(
        &self,
        filter: &PoolFilter,
        limit: u32,
    ) -> Result<Vec<Candidate>, RecipeGatewayError>;

    /// Fetch one recipe by id with its tag sets populated.
    async fn fetch_candidate(&self, id: i64) -> Result<Option<Candidate>, RecipeGatewayError>;

    /// Display-form tags for one recipe, used when building explanations.
    /// Returns `None` for unknown ids.
    async fn fetch_tag_detail(&self, id: i64) -> Result<Option<TagSets>, RecipeGatewayError>;

    /// Recipes sharing at least `min_shared` ingredient tags with the
    /// seed, strongest overlap first.
    async fn ingredient_neighbors(
        &self,
        id: i64,
        limit: u32,
        min_shared: u32,
    ) -> Result<Vec<SimilarCandidate>, RecipeGatewayError>;

    /// Recipes sharing non-ingredient tags with the seed, ranked by the
    /// dimension-weighted overlap, skipping `exclude` ids.
    async fn tag_neighbors(
        &self,
        id: i64,
        limit: u32,
        exclude: &[i64],
    ) -> Result<Vec<SimilarCandidate>, RecipeGatewayError>;
}
