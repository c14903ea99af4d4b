//! Candidate retrieval and hard filtering
//!
//! The retriever narrows coarsely at the store, then applies the exact
//! hard-filter predicate in process: must-have ingredients, exclusions,
//! cook time, servings range and dietary flags. Everything that survives
//! is ordered by popularity; the engine caps the pool after scoring.

use std::sync::Arc;

use tracing::debug;

use recipe_gateway_core::{Candidate, ConstraintSet, RecipeGatewayError};

use crate::canonical::{
    canonicalize_ingredient, BEEF_MARKER, CHICKEN_MARKER, MEAT_MARKERS, PORK_MARKER,
    SEAFOOD_MARKER, VEGAN_EXTRA_MARKERS,
};
use crate::store::{GraphStore, PoolFilter};
use crate::text::{normalize_for_match, value_matches_tag};

/// How many recipes to pull from the store before exact filtering
const POOL_FETCH_LIMIT: u32 = 500;

pub struct CandidateRetriever {
    store: Arc<dyn GraphStore>,
}

impl CandidateRetriever {
    pub fn new(store: Arc<dyn GraphStore>) -> Self {
        Self { store }
    }

    /// Fetch and hard-filter the candidate pool, most viewed first
    pub async fn retrieve(
        &self,
        constraints: &ConstraintSet,
    ) -> Result<Vec<Candidate>, RecipeGatewayError> {
        let filter = PoolFilter {
            max_cook_time_min: constraints.max_cook_time_min,
        };
        let pool = self.store.fetch_candidates(&filter, POOL_FETCH_LIMIT).await?;
        let fetched = pool.len();

        let mut survivors: Vec<Candidate> = pool
            .into_iter()
            .filter(|c| passes_hard_filters(c, constraints))
            .collect();
        survivors.sort_by(|a, b| b.views.cmp(&a.views));

        // scoring matches against canonical ingredient names, the same
        // forms the normalizer produced for the constraint lists
        for candidate in &mut survivors {
            let mut seen = std::collections::HashSet::new();
            candidate.tags.ingredients = candidate
                .tags
                .ingredients
                .drain(..)
                .map(|tag| canonicalize_ingredient(&tag))
                .filter(|tag| !tag.is_empty() && seen.insert(tag.clone()))
                .collect();
        }

        debug!(fetched, survivors = survivors.len(), "candidate pool retrieved");
        Ok(survivors)
    }
}

/// Whether any ingredient tag of the candidate contains the marker, on
/// the normalized tag or its canonical form. Checking the canonical form
/// lets a must-ingredient like "돼지고기" match a tag stored as
/// "대패삼겹살".
fn has_ingredient_marker(candidate: &Candidate, marker: &str) -> bool {
    let marker_norm = normalize_for_match(marker);
    candidate.tags.ingredients.iter().any(|tag| {
        value_matches_tag(&marker_norm, &normalize_for_match(tag))
            || value_matches_tag(
                &marker_norm,
                &normalize_for_match(&canonicalize_ingredient(tag)),
            )
    })
}

/// The exact hard-filter predicate. A candidate survives only when every
/// enabled filter passes.
pub fn passes_hard_filters(candidate: &Candidate, constraints: &ConstraintSet) -> bool {
    // every must ingredient has to appear in some ingredient tag
    for must in &constraints.must_ingredients {
        if !has_ingredient_marker(candidate, must) {
            return false;
        }
    }

    // no excluded ingredient may appear in any ingredient tag
    for excluded in &constraints.exclude_ingredients {
        if has_ingredient_marker(candidate, excluded) {
            return false;
        }
    }

    if let Some(max) = constraints.max_cook_time_min {
        match candidate.time_min {
            Some(t) if t <= max => {}
            _ => return false,
        }
    }

    // a candidate with unknown servings is not rejected by the range
    if let Some(servings) = candidate.servings {
        if constraints.servings.min.is_some_and(|min| servings < min) {
            return false;
        }
        if constraints.servings.max.is_some_and(|max| servings > max) {
            return false;
        }
    }

    let dc = &constraints.dietary_constraints;
    if (dc.vegetarian || dc.vegan)
        && MEAT_MARKERS.iter().any(|m| has_ingredient_marker(candidate, m))
    {
        return false;
    }
    if dc.vegan
        && VEGAN_EXTRA_MARKERS
            .iter()
            .any(|m| has_ingredient_marker(candidate, m))
    {
        return false;
    }
    if dc.no_beef && has_ingredient_marker(candidate, BEEF_MARKER) {
        return false;
    }
    if dc.no_pork && has_ingredient_marker(candidate, PORK_MARKER) {
        return false;
    }
    if dc.no_chicken && has_ingredient_marker(candidate, CHICKEN_MARKER) {
        return false;
    }
    if dc.no_seafood && has_ingredient_marker(candidate, SEAFOOD_MARKER) {
        return false;
    }

    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use recipe_gateway_core::{DietaryConstraints, ServingsRange, TagSets};

    fn candidate(ingredients: &[&str]) -> Candidate {
        Candidate {
            id: 1,
            title: "테스트 레시피".into(),
            name: "테스트".into(),
            views: 10,
            time_min: Some(30),
            difficulty: None,
            servings: Some(2),
            image_url: None,
            tags: TagSets {
                ingredients: ingredients.iter().map(|s| s.to_string()).collect(),
                ..Default::default()
            },
        }
    }

    #[test]
    fn retrieved_pool_carries_canonical_ingredient_tags() {
        let store = Arc::new(crate::store::InMemoryGraphStore::new(vec![candidate(&[
            "대패삼겹살",
            "다진마늘",
            "김치",
        ])]));
        let retriever = CandidateRetriever::new(store);
        let pool =
            tokio_test::block_on(retriever.retrieve(&ConstraintSet::default())).unwrap();
        assert_eq!(pool[0].tags.ingredients, vec!["돼지고기", "마늘", "김치"]);
    }

    #[test]
    fn must_ingredients_all_required() {
        let constraints = ConstraintSet {
            must_ingredients: vec!["돼지고기".into(), "김치".into()],
            ..Default::default()
        };
        assert!(passes_hard_filters(
            &candidate(&["돼지고기", "김치", "두부"]),
            &constraints
        ));
        assert!(!passes_hard_filters(&candidate(&["돼지고기"]), &constraints));
    }

    #[test]
    fn must_ingredient_matches_canonical_form_of_tag() {
        // "대패삼겹살" canonicalizes to "돼지고기", so a must constraint
        // on the canonical name accepts the raw tag
        let constraints = ConstraintSet {
            must_ingredients: vec!["돼지고기".into()],
            ..Default::default()
        };
        assert!(passes_hard_filters(&candidate(&["대패삼겹살"]), &constraints));
    }

    #[test]
    fn exclusion_matches_by_substring() {
        let constraints = ConstraintSet {
            exclude_ingredients: vec!["고추".into()],
            ..Default::default()
        };
        // "청양고추" contains the excluded "고추"
        assert!(!passes_hard_filters(&candidate(&["청양고추"]), &constraints));
        assert!(passes_hard_filters(&candidate(&["마늘"]), &constraints));
    }

    #[test]
    fn cook_time_requires_known_time() {
        let constraints = ConstraintSet {
            max_cook_time_min: Some(20),
            ..Default::default()
        };
        let mut fast = candidate(&[]);
        fast.time_min = Some(15);
        let mut unknown = candidate(&[]);
        unknown.time_min = None;
        assert!(passes_hard_filters(&fast, &constraints));
        assert!(!passes_hard_filters(&candidate(&[]), &constraints));
        assert!(!passes_hard_filters(&unknown, &constraints));
    }

    #[test]
    fn servings_range_is_inclusive() {
        let constraints = ConstraintSet {
            servings: ServingsRange {
                min: Some(2),
                max: Some(4),
            },
            ..Default::default()
        };
        assert!(passes_hard_filters(&candidate(&[]), &constraints));
        let mut big = candidate(&[]);
        big.servings = Some(5);
        assert!(!passes_hard_filters(&big, &constraints));
        // unknown servings is treated as unconstrained
        let mut unknown = candidate(&[]);
        unknown.servings = None;
        assert!(passes_hard_filters(&unknown, &constraints));
    }

    #[test]
    fn vegetarian_rejects_all_meat_categories() {
        let constraints = ConstraintSet {
            dietary_constraints: DietaryConstraints {
                vegetarian: true,
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(!passes_hard_filters(&candidate(&["돼지고기"]), &constraints));
        assert!(!passes_hard_filters(&candidate(&["닭고기"]), &constraints));
        // vegetarian still allows eggs
        assert!(passes_hard_filters(&candidate(&["계란", "두부"]), &constraints));
    }

    #[test]
    fn vegan_additionally_rejects_eggs_and_milk() {
        let constraints = ConstraintSet {
            dietary_constraints: DietaryConstraints {
                vegan: true,
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(!passes_hard_filters(&candidate(&["계란"]), &constraints));
        assert!(!passes_hard_filters(&candidate(&["우유"]), &constraints));
        assert!(passes_hard_filters(&candidate(&["두부"]), &constraints));
    }

    #[test]
    fn single_category_flags_are_independent() {
        let constraints = ConstraintSet {
            dietary_constraints: DietaryConstraints {
                no_pork: true,
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(!passes_hard_filters(&candidate(&["돼지고기"]), &constraints));
        assert!(passes_hard_filters(&candidate(&["소고기"]), &constraints));
    }
}
