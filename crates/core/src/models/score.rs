//! Score breakdowns, match traces and explanations

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::candidate::Candidate;

/// Per-dimension scores for one candidate. All scores are non-negative
/// and `total` is their sum.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub must_ingredient: u32,
    pub optional_ingredient: u32,
    pub dish_type: u32,
    pub method: u32,
    pub situation: u32,
    pub health: u32,
    pub weather: u32,
    pub menu_style: u32,
    pub extra: u32,
    pub difficulty: u32,
    pub menu_name: u32,
    pub servings: u32,
    pub total: u32,
}

impl ScoreBreakdown {
    /// Recompute `total` from the dimension scores
    pub fn finalize(mut self) -> Self {
        self.total = self.must_ingredient
            + self.optional_ingredient
            + self.dish_type
            + self.method
            + self.situation
            + self.health
            + self.weather
            + self.menu_style
            + self.extra
            + self.difficulty
            + self.menu_name
            + self.servings;
        self
    }

    /// One-line human-readable breakdown, fields in fixed order
    pub fn summary(&self) -> String {
        format!(
            "total={} (must={}, opt={}, dish={}, method={}, situation={}, health={}, \
             weather={}, style={}, extra={}, difficulty={}, menu_name={}, servings={})",
            self.total,
            self.must_ingredient,
            self.optional_ingredient,
            self.dish_type,
            self.method,
            self.situation,
            self.health,
            self.weather,
            self.menu_style,
            self.extra,
            self.difficulty,
            self.menu_name,
            self.servings,
        )
    }
}

/// A candidate annotated with its score breakdown
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredCandidate {
    pub candidate: Candidate,
    pub breakdown: ScoreBreakdown,
}

/// Constraint value to matched candidate tags, for one dimension
pub type DimensionTrace = BTreeMap<String, Vec<String>>;

/// Per-dimension record of which constraint values matched which tags.
/// Used purely for explanation, never for scoring.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MatchTrace(pub BTreeMap<String, DimensionTrace>);

impl MatchTrace {
    pub fn insert(&mut self, dimension: &str, trace: DimensionTrace) {
        if !trace.is_empty() {
            self.0.insert(dimension.to_string(), trace);
        }
    }

    pub fn get(&self, dimension: &str) -> Option<&DimensionTrace> {
        self.0.get(dimension)
    }
}

/// Human-readable justification for one selected candidate
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Explanation {
    /// Total score plus every dimension sub-score, fixed field order
    pub summary: String,
    /// One line per satisfied hard filter and per non-trivial dimension
    pub lines: Vec<String>,
    /// Which constraint values matched which tags, by dimension
    pub trace: MatchTrace,
    /// Flattened union of requested keywords, first-seen order
    pub keywords: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finalize_sums_all_dimensions() {
        let breakdown = ScoreBreakdown {
            must_ingredient: 5,
            optional_ingredient: 2,
            situation: 4,
            menu_name: 10,
            servings: 3,
            ..Default::default()
        }
        .finalize();
        assert_eq!(breakdown.total, 24);
        assert!(breakdown.summary().starts_with("total=24 (must=5, opt=2,"));
    }

    #[test]
    fn empty_dimension_traces_are_dropped() {
        let mut trace = MatchTrace::default();
        trace.insert("dish_type", DimensionTrace::new());
        assert!(trace.get("dish_type").is_none());

        let mut dim = DimensionTrace::new();
        dim.insert("국".into(), vec!["국물요리".into()]);
        trace.insert("dish_type", dim);
        assert_eq!(trace.get("dish_type").unwrap()["국"], ["국물요리"]);
    }
}
