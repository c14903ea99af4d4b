//! Constraint normalization
//!
//! Turns the raw extractor output into a complete [`ConstraintSet`]:
//! folds auxiliary tag fields, maps colloquial difficulty words to graph
//! levels, infers weather tags from free text, canonicalizes ingredients,
//! deduplicates every list preserving first-seen order, merges
//! interactive keyword overrides and derives the prompt n-grams used for
//! fuzzy matching.

use recipe_gateway_core::{ConstraintSet, FilterKeywords, KeywordState, RawConstraints};
use tracing::debug;

use crate::canonical::{canonicalize_ingredient, DIFFICULTY_MAP, KNOWN_WEATHER_TAGS};
use crate::text::{char_ngrams, normalize_for_match};

const NGRAM_MIN: usize = 2;
const NGRAM_MAX: usize = 4;

/// Deduplicate preserving the first occurrence of each value
fn unique_preserve(values: Vec<String>) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    values
        .into_iter()
        .filter(|v| !v.is_empty())
        .filter(|v| seen.insert(v.clone()))
        .collect()
}

/// Canonicalize an ingredient list, dropping entries that normalize away
fn canonicalize_list(values: Vec<String>) -> Vec<String> {
    unique_preserve(
        values
            .into_iter()
            .map(|v| canonicalize_ingredient(&v))
            .collect(),
    )
}

/// Map extracted difficulty words plus free-text mentions to the graph's
/// difficulty levels
fn normalize_difficulty(difficulty: &[String], free_text: &str) -> Vec<String> {
    let text = free_text.to_lowercase();
    let mut detected = Vec::new();
    let mut push_mapped = |haystack: &str| {
        for (word, levels) in DIFFICULTY_MAP {
            if haystack.contains(word) {
                for level in *levels {
                    let level = level.to_string();
                    if !detected.contains(&level) {
                        detected.push(level);
                    }
                }
            }
        }
    };
    for raw in difficulty {
        push_mapped(&raw.to_lowercase());
    }
    push_mapped(&text);
    detected
}

/// Detect known weather tags mentioned in free text
fn infer_weather_tags(free_text: &str) -> Vec<String> {
    let norm = normalize_for_match(free_text);
    KNOWN_WEATHER_TAGS
        .iter()
        .filter(|tag| norm.contains(&normalize_for_match(tag)))
        .map(|tag| tag.to_string())
        .collect()
}

/// Constraint normalizer; stateless, safe for concurrent use
#[derive(Debug, Default, Clone, Copy)]
pub struct ConstraintNormalizer;

impl ConstraintNormalizer {
    pub fn new() -> Self {
        Self
    }

    /// Produce a complete constraint set from raw extractor output and
    /// interactive overrides
    pub fn normalize(&self, raw: RawConstraints, overrides: &FilterKeywords) -> ConstraintSet {
        // positive tags carry no dimension of their own: fold them into
        // both health and extra so they participate in scoring
        let mut health_tags = raw.health_tags;
        let mut extra_keywords = raw.extra_keywords;
        health_tags.extend(raw.positive_tags.iter().cloned());
        extra_keywords.extend(raw.positive_tags.iter().cloned());

        let mut weather_tags = raw.weather_tags;
        weather_tags.extend(infer_weather_tags(&raw.free_text));

        let difficulty = normalize_difficulty(&raw.difficulty, &raw.free_text);

        let mut constraints = ConstraintSet {
            must_ingredients: unique_preserve(raw.must_ingredients),
            optional_ingredients: unique_preserve(raw.optional_ingredients),
            exclude_ingredients: unique_preserve(raw.exclude_ingredients),
            dish_type: unique_preserve(raw.dish_type),
            method: unique_preserve(raw.method),
            situation: unique_preserve(raw.situation),
            health_tags: unique_preserve(health_tags),
            weather_tags: unique_preserve(weather_tags),
            menu_style: unique_preserve(raw.menu_style),
            extra_keywords: unique_preserve(extra_keywords),
            difficulty,
            negative_tags: unique_preserve(raw.negative_tags),
            dietary_constraints: raw.dietary_constraints,
            servings: raw.servings,
            max_cook_time_min: raw.max_cook_time_min,
            free_text: raw.free_text,
            prompt_ngrams: Vec::new(),
        };

        self.apply_overrides(&mut constraints, overrides);

        constraints.must_ingredients =
            canonicalize_list(std::mem::take(&mut constraints.must_ingredients));
        constraints.optional_ingredients =
            canonicalize_list(std::mem::take(&mut constraints.optional_ingredients));
        constraints.exclude_ingredients =
            canonicalize_list(std::mem::take(&mut constraints.exclude_ingredients));

        constraints.prompt_ngrams = char_ngrams(&constraints.free_text, NGRAM_MIN, NGRAM_MAX);
        constraints
    }

    /// Merge interactive keyword corrections into the constraint set.
    ///
    /// Include entries append unconditionally to their named field.
    /// Exclude entries first cancel a stale exclusion of the same name,
    /// then re-add it only when the name carries no positive signal in
    /// any other list field. Entries with an unknown state or field are
    /// ignored.
    fn apply_overrides(&self, constraints: &mut ConstraintSet, overrides: &FilterKeywords) {
        for entry in &overrides.include {
            if entry.state != KeywordState::Include {
                continue;
            }
            let name = entry.name.trim();
            if name.is_empty() {
                continue;
            }
            match constraints.list_field_mut(&entry.field) {
                Some(list) => {
                    if !list.iter().any(|v| v == name) {
                        list.push(name.to_string());
                    }
                }
                None => debug!(field = %entry.field, "ignoring override for unknown field"),
            }
        }

        for entry in &overrides.exclude {
            if entry.state != KeywordState::Exclude {
                continue;
            }
            let name = entry.name.trim();
            if name.is_empty() {
                continue;
            }
            constraints.exclude_ingredients.retain(|v| v != name);
            if !constraints.appears_in_positive_lists(name) {
                constraints.exclude_ingredients.push(name.to_string());
            }
        }
    }
}
