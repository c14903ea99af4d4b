//! # Recipe Gateway Core
//!
//! Shared domain models for the Recipe Gateway platform.
//!
//! This crate provides the data structures flowing through the
//! recommendation pipeline: normalized constraint sets, retrieved
//! candidates with their tag dimensions, score breakdowns, match traces
//! and the error types shared across services.

pub mod error;
pub mod models;

pub use error::RecipeGatewayError;
pub use models::candidate::{Candidate, TagDimension, TagSets};
pub use models::constraint::{
    ConstraintSet, DietaryConstraints, FilterKeyword, FilterKeywords, KeywordState,
    RawConstraints, ServingsRange,
};
pub use models::score::{
    DimensionTrace, Explanation, MatchTrace, ScoreBreakdown, ScoredCandidate,
};
