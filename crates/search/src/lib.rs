//! # Recipe Gateway Search
//!
//! Constraint-driven recipe recommendation engine: free text becomes a
//! normalized constraint set, candidates are hard-filtered out of the tag
//! graph, scored along independent weighted dimensions, diversified
//! (greedy + softmax for recommendations, MMR for similar-recipe lookup)
//! and returned with a per-recipe match explanation.

pub mod canonical;
pub mod config;
pub mod diversity;
pub mod engine;
pub mod explanation;
pub mod extractor;
pub mod handlers;
pub mod normalize;
pub mod retrieval;
pub mod scoring;
pub mod selection;
pub mod similarity;
pub mod store;
pub mod text;

#[cfg(test)]
mod tests;

pub use engine::{EngineParams, SearchEngine, SearchOutcome, SearchResult};
pub use normalize::ConstraintNormalizer;
pub use retrieval::CandidateRetriever;
pub use scoring::MultiDimensionScorer;
pub use selection::{SelectionOutcome, SelectionParams};
pub use similarity::{SimilarityParams, SimilarityService};
