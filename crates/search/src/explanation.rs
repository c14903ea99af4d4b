//! Match-explanation reconstruction
//!
//! For every selected candidate the builder re-derives which constraint
//! values matched which tags, using exactly the matching rules the scorer
//! applied, and renders a fixed-order summary, per-filter and
//! per-dimension lines, and the flat keyword list handed to downstream
//! consumers.

use recipe_gateway_core::{
    ConstraintSet, DimensionTrace, Explanation, MatchTrace, ScoredCandidate, TagSets,
};

use crate::scoring::dimension_matches;
use crate::text::normalize_for_match;

/// Dimensions whose constraint values feed the flat keyword list
const KEYWORD_FIELDS: [&str; 9] = [
    "must_ingredients",
    "optional_ingredients",
    "dish_type",
    "method",
    "situation",
    "health_tags",
    "weather_tags",
    "menu_style",
    "extra_keywords",
];

#[derive(Debug, Default, Clone, Copy)]
pub struct ExplanationBuilder;

impl ExplanationBuilder {
    pub fn new() -> Self {
        Self
    }

    /// Build the explanation for one selected candidate. `display_tags`
    /// are the display-form tag sets from the store's detail call; when
    /// absent the candidate's own (normalized) tags are used.
    pub fn build(
        &self,
        scored: &ScoredCandidate,
        constraints: &ConstraintSet,
        display_tags: Option<&TagSets>,
    ) -> Explanation {
        let candidate = &scored.candidate;
        let breakdown = &scored.breakdown;
        let tags = display_tags.unwrap_or(&candidate.tags);

        let mut trace = MatchTrace::default();
        let difficulty_tags: Vec<String> = candidate.difficulty.iter().cloned().collect();
        let dimensions: [(&str, &[String], &[String], bool, u32); 10] = [
            (
                "must_ingredients",
                &constraints.must_ingredients,
                &tags.ingredients,
                false,
                breakdown.must_ingredient,
            ),
            (
                "optional_ingredients",
                &constraints.optional_ingredients,
                &tags.ingredients,
                false,
                breakdown.optional_ingredient,
            ),
            (
                "dish_type",
                &constraints.dish_type,
                &tags.categories,
                false,
                breakdown.dish_type,
            ),
            (
                "method",
                &constraints.method,
                &tags.methods,
                false,
                breakdown.method,
            ),
            (
                "situation",
                &constraints.situation,
                &tags.situations,
                false,
                breakdown.situation,
            ),
            (
                "health",
                &constraints.health_tags,
                &tags.health,
                true,
                breakdown.health,
            ),
            (
                "weather",
                &constraints.weather_tags,
                &tags.weather,
                false,
                breakdown.weather,
            ),
            (
                "menu_style",
                &constraints.menu_style,
                &tags.menu_styles,
                false,
                breakdown.menu_style,
            ),
            (
                "extra",
                &constraints.extra_keywords,
                &tags.extra,
                true,
                breakdown.extra,
            ),
            (
                "difficulty",
                &constraints.difficulty,
                &difficulty_tags,
                false,
                breakdown.difficulty,
            ),
        ];

        let mut lines = hard_filter_lines(candidate, constraints);
        for (name, values, dim_tags, symmetric, score) in dimensions {
            let matches = dimension_matches(values, dim_tags, symmetric);
            let dim_trace: DimensionTrace = matches.into_iter().collect();
            if score > 0 || !values.is_empty() {
                lines.push(dimension_line(name, score, values, &dim_trace));
            }
            trace.insert(name, dim_trace);
        }

        let menu_trace = menu_name_trace(candidate, constraints);
        if breakdown.menu_name > 0 {
            lines.push(dimension_line(
                "menu_name",
                breakdown.menu_name,
                &menu_name_values(constraints),
                &menu_trace,
            ));
        }
        trace.insert("menu_name", menu_trace);

        if breakdown.servings > 0 {
            lines.push(format!("servings (score {})", breakdown.servings));
        }

        Explanation {
            summary: breakdown.summary(),
            lines,
            trace,
            keywords: flat_keywords(constraints),
        }
    }
}

fn hard_filter_lines(
    candidate: &recipe_gateway_core::Candidate,
    constraints: &ConstraintSet,
) -> Vec<String> {
    let mut lines = Vec::new();
    if !constraints.must_ingredients.is_empty() {
        lines.push(format!(
            "contains every required ingredient: {}",
            constraints.must_ingredients.join(", ")
        ));
    }
    if !constraints.exclude_ingredients.is_empty() {
        lines.push(format!(
            "contains none of the excluded ingredients: {}",
            constraints.exclude_ingredients.join(", ")
        ));
    }
    if let (Some(max), Some(time)) = (constraints.max_cook_time_min, candidate.time_min) {
        lines.push(format!("cook time {time} min within the {max} min limit"));
    }
    if constraints.servings.is_set() {
        if let Some(servings) = candidate.servings {
            let min = constraints
                .servings
                .min
                .map(|v| v.to_string())
                .unwrap_or_else(|| "-".into());
            let max = constraints
                .servings
                .max
                .map(|v| v.to_string())
                .unwrap_or_else(|| "-".into());
            lines.push(format!("serves {servings}, requested {min}..{max}"));
        }
    }
    lines
}

fn dimension_line(
    name: &str,
    score: u32,
    values: &[String],
    trace: &DimensionTrace,
) -> String {
    let mapping = values
        .iter()
        .map(|value| match trace.get(value) {
            Some(tags) => format!("{value} -> [{}]", tags.join(", ")),
            None => format!("{value} -> []"),
        })
        .collect::<Vec<_>>()
        .join("; ");
    format!("{name} (score {score}): {mapping}")
}

fn menu_name_values(constraints: &ConstraintSet) -> Vec<String> {
    constraints
        .dish_type
        .iter()
        .chain(constraints.extra_keywords.iter())
        .cloned()
        .collect()
}

/// Constraint values that hit the candidate's own title or name
fn menu_name_trace(
    candidate: &recipe_gateway_core::Candidate,
    constraints: &ConstraintSet,
) -> DimensionTrace {
    let title_norm = normalize_for_match(&candidate.title);
    let name_norm = normalize_for_match(&candidate.name);
    let mut trace = DimensionTrace::new();
    for value in menu_name_values(constraints) {
        let value_norm = normalize_for_match(&value);
        if value_norm.is_empty() {
            continue;
        }
        let mut hits = Vec::new();
        if title_norm.contains(&value_norm) {
            hits.push(candidate.title.clone());
        }
        if name_norm.contains(&value_norm) && candidate.name != candidate.title {
            hits.push(candidate.name.clone());
        }
        if !hits.is_empty() {
            trace.insert(value, hits);
        }
    }
    trace
}

/// Union of the constraint values across ingredient and tag dimensions,
/// deduplicated in first-seen order
fn flat_keywords(constraints: &ConstraintSet) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    KEYWORD_FIELDS
        .iter()
        .filter_map(|field| constraints.list_field(field))
        .flatten()
        .filter(|value| seen.insert((*value).clone()))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::MultiDimensionScorer;
    use recipe_gateway_core::Candidate;

    fn scored() -> (ScoredCandidate, ConstraintSet) {
        let candidate = Candidate {
            id: 1,
            title: "얼큰한 김치찌개".into(),
            name: "김치찌개".into(),
            views: 10,
            time_min: Some(25),
            difficulty: Some("초급".into()),
            servings: Some(2),
            image_url: None,
            tags: TagSets {
                ingredients: vec!["돼지고기".into(), "김치".into()],
                categories: vec!["찌개".into()],
                situations: vec!["저녁식사".into()],
                ..Default::default()
            },
        };
        let constraints = ConstraintSet {
            must_ingredients: vec!["돼지고기".into()],
            dish_type: vec!["찌개".into()],
            max_cook_time_min: Some(30),
            ..Default::default()
        };
        let breakdown = MultiDimensionScorer::new().score(&candidate, &constraints);
        (
            ScoredCandidate {
                candidate,
                breakdown,
            },
            constraints,
        )
    }

    #[test]
    fn trace_maps_values_to_matched_tags() {
        let (scored, constraints) = scored();
        let explanation = ExplanationBuilder::new().build(&scored, &constraints, None);
        let must = explanation.trace.get("must_ingredients").unwrap();
        assert_eq!(must["돼지고기"], vec!["돼지고기"]);
        let dish = explanation.trace.get("dish_type").unwrap();
        assert_eq!(dish["찌개"], vec!["찌개"]);
        // the menu-name boost hits the title and the distinct name
        let menu = explanation.trace.get("menu_name").unwrap();
        assert_eq!(menu["찌개"], vec!["얼큰한 김치찌개", "김치찌개"]);
    }

    #[test]
    fn lines_cover_filters_and_scored_dimensions() {
        let (scored, constraints) = scored();
        let explanation = ExplanationBuilder::new().build(&scored, &constraints, None);
        assert!(explanation
            .lines
            .iter()
            .any(|l| l.starts_with("contains every required ingredient")));
        assert!(explanation
            .lines
            .iter()
            .any(|l| l.contains("cook time 25 min within the 30 min limit")));
        assert!(explanation
            .lines
            .iter()
            .any(|l| l.starts_with("dish_type (score 3)")));
        assert!(explanation.summary.starts_with("total="));
    }

    #[test]
    fn keywords_flatten_in_first_seen_order() {
        let constraints = ConstraintSet {
            must_ingredients: vec!["돼지고기".into()],
            dish_type: vec!["찌개".into(), "돼지고기".into()],
            situation: vec!["저녁식사".into()],
            difficulty: vec!["초급".into()],
            ..Default::default()
        };
        assert_eq!(
            flat_keywords(&constraints),
            vec!["돼지고기", "찌개", "저녁식사"]
        );
    }

    #[test]
    fn display_tags_replace_normalized_forms_in_traces() {
        let (scored, constraints) = scored();
        let display = TagSets {
            ingredients: vec!["돼지고기 (앞다리살)".into(), "김치".into()],
            categories: vec!["찌개".into()],
            ..Default::default()
        };
        let explanation = ExplanationBuilder::new().build(&scored, &constraints, Some(&display));
        let must = explanation.trace.get("must_ingredients").unwrap();
        assert_eq!(must["돼지고기"], vec!["돼지고기 (앞다리살)"]);
    }
}
