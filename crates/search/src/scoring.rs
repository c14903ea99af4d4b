//! Multi-dimension weighted scoring
//!
//! Every surviving candidate gets a deterministic, non-negative score per
//! dimension: `(match_count + ngram_count) * weight`. Matching is
//! substring containment on normalized forms, symmetric for the health
//! and extra dimensions. The must-ingredient, difficulty, menu-name and
//! servings dimensions take no n-gram contribution.

use recipe_gateway_core::{Candidate, ConstraintSet, ScoreBreakdown, ScoredCandidate};

use crate::text::{normalize_for_match, value_matches_tag, value_matches_tag_symmetric};

pub const WEIGHT_MUST_INGREDIENT: u32 = 5;
pub const WEIGHT_OPTIONAL_INGREDIENT: u32 = 2;
pub const WEIGHT_DISH_TYPE: u32 = 3;
pub const WEIGHT_METHOD: u32 = 2;
pub const WEIGHT_SITUATION: u32 = 4;
pub const WEIGHT_HEALTH: u32 = 5;
pub const WEIGHT_WEATHER: u32 = 3;
pub const WEIGHT_MENU_STYLE: u32 = 2;
pub const WEIGHT_EXTRA: u32 = 3;
pub const WEIGHT_DIFFICULTY: u32 = 4;
pub const WEIGHT_MENU_NAME: u32 = 10;
pub const SERVINGS_EXACT: u32 = 5;
pub const SERVINGS_OFF_BY_ONE: u32 = 3;

/// Constraint values matched against a tag set, with the tags each value
/// hit. Shared by the scorer (counts) and the explanation builder
/// (traces) so both always agree.
pub fn dimension_matches(
    values: &[String],
    tags: &[String],
    symmetric: bool,
) -> Vec<(String, Vec<String>)> {
    values
        .iter()
        .filter_map(|value| {
            let value_norm = normalize_for_match(value);
            let hits: Vec<String> = tags
                .iter()
                .filter(|tag| {
                    let tag_norm = normalize_for_match(tag);
                    if symmetric {
                        value_matches_tag_symmetric(&value_norm, &tag_norm)
                    } else {
                        value_matches_tag(&value_norm, &tag_norm)
                    }
                })
                .cloned()
                .collect();
            if hits.is_empty() {
                None
            } else {
                Some((value.clone(), hits))
            }
        })
        .collect()
}

fn match_count(values: &[String], tags: &[String], symmetric: bool) -> u32 {
    dimension_matches(values, tags, symmetric).len() as u32
}

/// Number of prompt n-grams contained in at least one normalized tag
fn ngram_count(ngrams: &[String], tags: &[String]) -> u32 {
    let tag_norms: Vec<String> = tags.iter().map(|t| normalize_for_match(t)).collect();
    ngrams
        .iter()
        .filter(|gram| tag_norms.iter().any(|tag| tag.contains(gram.as_str())))
        .count() as u32
}

fn servings_score(constraints: &ConstraintSet, candidate: &Candidate) -> u32 {
    if !constraints.servings.is_set() {
        return 0;
    }
    let Some(servings) = candidate.servings else {
        return 0;
    };
    let min = constraints.servings.min.unwrap_or(servings);
    let max = constraints.servings.max.unwrap_or(servings);
    if (min..=max).contains(&servings) {
        SERVINGS_EXACT
    } else if servings + 1 == min || servings == max + 1 {
        SERVINGS_OFF_BY_ONE
    } else {
        0
    }
}

/// Constraint dish-type and extra-keyword values matched directly against
/// the candidate's own title and name
fn menu_name_count(constraints: &ConstraintSet, candidate: &Candidate) -> u32 {
    let title_norm = normalize_for_match(&candidate.title);
    let name_norm = normalize_for_match(&candidate.name);
    constraints
        .dish_type
        .iter()
        .chain(constraints.extra_keywords.iter())
        .filter(|value| {
            let value_norm = normalize_for_match(value);
            !value_norm.is_empty()
                && (title_norm.contains(&value_norm) || name_norm.contains(&value_norm))
        })
        .count() as u32
}

/// Stateless scorer over the process-wide weight table
#[derive(Debug, Default, Clone, Copy)]
pub struct MultiDimensionScorer;

impl MultiDimensionScorer {
    pub fn new() -> Self {
        Self
    }

    pub fn score(&self, candidate: &Candidate, constraints: &ConstraintSet) -> ScoreBreakdown {
        let tags = &candidate.tags;
        let ngrams = &constraints.prompt_ngrams;

        let difficulty_tags: Vec<String> = candidate.difficulty.iter().cloned().collect();

        ScoreBreakdown {
            must_ingredient: match_count(&constraints.must_ingredients, &tags.ingredients, false)
                * WEIGHT_MUST_INGREDIENT,
            optional_ingredient: (match_count(
                &constraints.optional_ingredients,
                &tags.ingredients,
                false,
            ) + ngram_count(ngrams, &tags.ingredients))
                * WEIGHT_OPTIONAL_INGREDIENT,
            dish_type: (match_count(&constraints.dish_type, &tags.categories, false)
                + ngram_count(ngrams, &tags.categories))
                * WEIGHT_DISH_TYPE,
            method: (match_count(&constraints.method, &tags.methods, false)
                + ngram_count(ngrams, &tags.methods))
                * WEIGHT_METHOD,
            situation: (match_count(&constraints.situation, &tags.situations, false)
                + ngram_count(ngrams, &tags.situations))
                * WEIGHT_SITUATION,
            health: (match_count(&constraints.health_tags, &tags.health, true)
                + ngram_count(ngrams, &tags.health))
                * WEIGHT_HEALTH,
            weather: (match_count(&constraints.weather_tags, &tags.weather, false)
                + ngram_count(ngrams, &tags.weather))
                * WEIGHT_WEATHER,
            menu_style: (match_count(&constraints.menu_style, &tags.menu_styles, false)
                + ngram_count(ngrams, &tags.menu_styles))
                * WEIGHT_MENU_STYLE,
            extra: (match_count(&constraints.extra_keywords, &tags.extra, true)
                + ngram_count(ngrams, &tags.extra))
                * WEIGHT_EXTRA,
            difficulty: match_count(&constraints.difficulty, &difficulty_tags, false)
                * WEIGHT_DIFFICULTY,
            menu_name: menu_name_count(constraints, candidate) * WEIGHT_MENU_NAME,
            servings: servings_score(constraints, candidate),
            total: 0,
        }
        .finalize()
    }

    pub fn score_all(
        &self,
        candidates: Vec<Candidate>,
        constraints: &ConstraintSet,
    ) -> Vec<ScoredCandidate> {
        candidates
            .into_iter()
            .map(|candidate| {
                let breakdown = self.score(&candidate, constraints);
                ScoredCandidate {
                    candidate,
                    breakdown,
                }
            })
            .collect()
    }
}
