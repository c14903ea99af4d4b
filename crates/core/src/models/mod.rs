//! Domain models for recipe retrieval, scoring and selection

pub mod candidate;
pub mod constraint;
pub mod score;
