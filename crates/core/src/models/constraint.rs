//! Constraint models for recipe search
//!
//! A raw constraint object arrives from the LLM extractor (or from a
//! client supplying one directly) and is normalized by the search engine
//! into a complete [`ConstraintSet`]. Every list field is always present,
//! defaulting to empty, so downstream code never branches on absence.

use serde::de::Deserializer;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Named dietary flags extracted from the user request
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DietaryConstraints {
    pub vegetarian: bool,
    pub vegan: bool,
    pub no_beef: bool,
    pub no_pork: bool,
    pub no_chicken: bool,
    pub no_seafood: bool,
}

impl DietaryConstraints {
    pub fn any(&self) -> bool {
        self.vegetarian
            || self.vegan
            || self.no_beef
            || self.no_pork
            || self.no_chicken
            || self.no_seafood
    }

    fn from_json(value: Option<&Value>) -> Self {
        let flag = |key: &str| -> bool {
            value
                .and_then(|v| v.get(key))
                .and_then(Value::as_bool)
                .unwrap_or(false)
        };
        Self {
            vegetarian: flag("vegetarian"),
            vegan: flag("vegan"),
            no_beef: flag("no_beef"),
            no_pork: flag("no_pork"),
            no_chicken: flag("no_chicken"),
            no_seafood: flag("no_seafood"),
        }
    }
}

/// Requested servings range (closed interval, both ends optional)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServingsRange {
    pub min: Option<u32>,
    pub max: Option<u32>,
}

impl ServingsRange {
    pub fn is_set(&self) -> bool {
        self.min.is_some() || self.max.is_some()
    }

    fn from_json(value: Option<&Value>) -> Self {
        let bound = |key: &str| -> Option<u32> {
            value
                .and_then(|v| v.get(key))
                .and_then(Value::as_u64)
                .map(|n| n as u32)
        };
        Self {
            min: bound("min"),
            max: bound("max"),
        }
    }
}

/// Coerce an extractor field into a list of strings.
///
/// null/absent becomes empty, a scalar string becomes a singleton list and
/// non-string array entries are skipped rather than failing the pipeline.
fn string_list(value: Option<&Value>) -> Vec<String> {
    match value {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::String(s)) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                Vec::new()
            } else {
                vec![trimmed.to_string()]
            }
        }
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect(),
        Some(_) => Vec::new(),
    }
}

/// Pre-normalization constraint shape produced by the LLM extractor
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawConstraints {
    pub dish_type: Vec<String>,
    pub method: Vec<String>,
    pub situation: Vec<String>,
    pub must_ingredients: Vec<String>,
    pub optional_ingredients: Vec<String>,
    pub exclude_ingredients: Vec<String>,
    pub health_tags: Vec<String>,
    pub weather_tags: Vec<String>,
    pub menu_style: Vec<String>,
    pub extra_keywords: Vec<String>,
    pub difficulty: Vec<String>,
    pub positive_tags: Vec<String>,
    pub negative_tags: Vec<String>,
    pub dietary_constraints: DietaryConstraints,
    pub servings: ServingsRange,
    pub max_cook_time_min: Option<u32>,
    pub free_text: String,
}

impl RawConstraints {
    /// Lenient construction from arbitrary extractor JSON.
    ///
    /// Wrong-typed fields degrade to their defaults instead of failing;
    /// non-string list entries are dropped one by one.
    pub fn from_json(value: &Value) -> Self {
        Self {
            dish_type: string_list(value.get("dish_type")),
            method: string_list(value.get("method")),
            situation: string_list(value.get("situation")),
            must_ingredients: string_list(value.get("must_ingredients")),
            optional_ingredients: string_list(value.get("optional_ingredients")),
            exclude_ingredients: string_list(value.get("exclude_ingredients")),
            health_tags: string_list(value.get("health_tags")),
            weather_tags: string_list(value.get("weather_tags")),
            menu_style: string_list(value.get("menu_style")),
            extra_keywords: string_list(value.get("extra_keywords")),
            difficulty: string_list(value.get("difficulty")),
            positive_tags: string_list(value.get("positive_tags")),
            negative_tags: string_list(value.get("negative_tags")),
            dietary_constraints: DietaryConstraints::from_json(value.get("dietary_constraints")),
            servings: ServingsRange::from_json(value.get("servings")),
            max_cook_time_min: value
                .get("max_cook_time_min")
                .and_then(Value::as_u64)
                .map(|n| n as u32),
            free_text: value
                .get("free_text")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
        }
    }

    /// Default constraints carrying the raw user query as free text.
    /// Used when the extractor reply is malformed or unavailable.
    pub fn fallback(query: &str) -> Self {
        Self {
            free_text: query.to_string(),
            ..Self::default()
        }
    }
}

/// Fully normalized user intent driving retrieval, scoring and selection
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConstraintSet {
    pub must_ingredients: Vec<String>,
    pub optional_ingredients: Vec<String>,
    pub exclude_ingredients: Vec<String>,
    pub dish_type: Vec<String>,
    pub method: Vec<String>,
    pub situation: Vec<String>,
    pub health_tags: Vec<String>,
    pub weather_tags: Vec<String>,
    pub menu_style: Vec<String>,
    pub extra_keywords: Vec<String>,
    pub difficulty: Vec<String>,
    /// Disliked-attribute tags. They never filter or score, but they are
    /// part of the extracted intent and travel in the keyword digest.
    pub negative_tags: Vec<String>,
    pub dietary_constraints: DietaryConstraints,
    pub servings: ServingsRange,
    pub max_cook_time_min: Option<u32>,
    pub free_text: String,
    /// Character n-grams (length 2-4) derived from `free_text`, used for
    /// fuzzy tag matching during scoring
    pub prompt_ngrams: Vec<String>,
}

/// Names of the list-typed constraint fields, in canonical order
pub const LIST_FIELDS: [&str; 11] = [
    "must_ingredients",
    "optional_ingredients",
    "exclude_ingredients",
    "dish_type",
    "method",
    "situation",
    "health_tags",
    "weather_tags",
    "menu_style",
    "extra_keywords",
    "difficulty",
];

impl ConstraintSet {
    /// Mutable access to a list field by its wire name
    pub fn list_field_mut(&mut self, field: &str) -> Option<&mut Vec<String>> {
        match field {
            "must_ingredients" => Some(&mut self.must_ingredients),
            "optional_ingredients" => Some(&mut self.optional_ingredients),
            "exclude_ingredients" => Some(&mut self.exclude_ingredients),
            "dish_type" => Some(&mut self.dish_type),
            "method" => Some(&mut self.method),
            "situation" => Some(&mut self.situation),
            "health_tags" => Some(&mut self.health_tags),
            "weather_tags" => Some(&mut self.weather_tags),
            "menu_style" => Some(&mut self.menu_style),
            "extra_keywords" => Some(&mut self.extra_keywords),
            "difficulty" => Some(&mut self.difficulty),
            _ => None,
        }
    }

    /// Read access to a list field by its wire name
    pub fn list_field(&self, field: &str) -> Option<&[String]> {
        match field {
            "must_ingredients" => Some(&self.must_ingredients),
            "optional_ingredients" => Some(&self.optional_ingredients),
            "exclude_ingredients" => Some(&self.exclude_ingredients),
            "dish_type" => Some(&self.dish_type),
            "method" => Some(&self.method),
            "situation" => Some(&self.situation),
            "health_tags" => Some(&self.health_tags),
            "weather_tags" => Some(&self.weather_tags),
            "menu_style" => Some(&self.menu_style),
            "extra_keywords" => Some(&self.extra_keywords),
            "difficulty" => Some(&self.difficulty),
            _ => None,
        }
    }

    /// Whether `name` appears in any list field other than
    /// `exclude_ingredients`. Used as the contradiction guard when merging
    /// interactive exclusions: an existing positive signal wins.
    pub fn appears_in_positive_lists(&self, name: &str) -> bool {
        LIST_FIELDS
            .iter()
            .filter(|f| **f != "exclude_ingredients")
            .filter_map(|f| self.list_field(f))
            .any(|values| values.iter().any(|v| v == name))
    }

    /// Every meaningful extracted keyword as one flat deduplicated list,
    /// preserving first-seen order. Numeric and boolean constraints are
    /// rendered as `key:value` markers. Used for request logging and
    /// echoed back to clients.
    pub fn all_keywords(&self) -> Vec<String> {
        let mut flat: Vec<String> = Vec::new();
        for field in LIST_FIELDS {
            if let Some(values) = self.list_field(field) {
                flat.extend(values.iter().cloned());
            }
        }
        flat.extend(self.negative_tags.iter().cloned());
        if let Some(min) = self.servings.min {
            flat.push(format!("servings_min:{min}"));
        }
        if let Some(max) = self.servings.max {
            flat.push(format!("servings_max:{max}"));
        }
        let dc = &self.dietary_constraints;
        for (flag, set) in [
            ("vegetarian", dc.vegetarian),
            ("vegan", dc.vegan),
            ("no_beef", dc.no_beef),
            ("no_pork", dc.no_pork),
            ("no_chicken", dc.no_chicken),
            ("no_seafood", dc.no_seafood),
        ] {
            if set {
                flat.push(format!("diet:{flag}"));
            }
        }
        if let Some(t) = self.max_cook_time_min {
            flat.push(format!("max_time:{t}"));
        }

        let mut seen = std::collections::HashSet::new();
        flat.retain(|k| seen.insert(k.clone()));
        flat
    }
}

/// State of one interactive keyword override
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeywordState {
    Include,
    Exclude,
    #[serde(other)]
    Ignore,
}

/// One interactive override entry: a keyword, the constraint field it
/// targets and whether the user switched it on or off
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterKeyword {
    pub name: String,
    pub field: String,
    pub state: KeywordState,
}

/// Interactive keyword corrections supplied alongside a search request
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterKeywords {
    #[serde(deserialize_with = "lenient_keyword_list")]
    pub include: Vec<FilterKeyword>,
    #[serde(deserialize_with = "lenient_keyword_list")]
    pub exclude: Vec<FilterKeyword>,
}

/// Deserialize a list of override entries, silently dropping malformed
/// ones instead of rejecting the whole request
fn lenient_keyword_list<'de, D>(deserializer: D) -> Result<Vec<FilterKeyword>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Vec<Value> = Vec::deserialize(deserializer)?;
    Ok(raw
        .into_iter()
        .filter_map(|v| serde_json::from_value::<FilterKeyword>(v).ok())
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn string_list_coercions() {
        assert!(string_list(None).is_empty());
        assert!(string_list(Some(&Value::Null)).is_empty());
        assert_eq!(string_list(Some(&json!("국물요리"))), vec!["국물요리"]);
        assert_eq!(
            string_list(Some(&json!(["돼지고기", 42, null, "김치"]))),
            vec!["돼지고기", "김치"]
        );
        assert!(string_list(Some(&json!({"not": "a list"}))).is_empty());
    }

    #[test]
    fn raw_constraints_from_malformed_json() {
        let value = json!({
            "must_ingredients": "돼지고기",
            "dish_type": [1, 2, 3],
            "servings": {"min": 2},
            "max_cook_time_min": "soon",
            "dietary_constraints": {"vegan": true, "no_pork": "yes"},
            "free_text": "따뜻한 국물"
        });
        let raw = RawConstraints::from_json(&value);
        assert_eq!(raw.must_ingredients, vec!["돼지고기"]);
        assert!(raw.dish_type.is_empty());
        assert_eq!(raw.servings.min, Some(2));
        assert_eq!(raw.max_cook_time_min, None);
        assert!(raw.dietary_constraints.vegan);
        assert!(!raw.dietary_constraints.no_pork);
        assert_eq!(raw.free_text, "따뜻한 국물");
    }

    #[test]
    fn all_keywords_dedups_and_orders() {
        let constraints = ConstraintSet {
            must_ingredients: vec!["돼지고기".into()],
            dish_type: vec!["찌개".into(), "돼지고기".into()],
            servings: ServingsRange {
                min: Some(2),
                max: None,
            },
            max_cook_time_min: Some(30),
            ..Default::default()
        };
        assert_eq!(
            constraints.all_keywords(),
            vec!["돼지고기", "찌개", "servings_min:2", "max_time:30"]
        );
    }

    #[test]
    fn negative_tags_join_the_keyword_digest() {
        let constraints = ConstraintSet {
            dish_type: vec!["찌개".into()],
            negative_tags: vec!["느끼한".into(), "찌개".into()],
            ..Default::default()
        };
        // negative tags follow the list fields and share the dedup pass
        assert_eq!(constraints.all_keywords(), vec!["찌개", "느끼한"]);
    }

    #[test]
    fn malformed_override_entries_are_skipped() {
        let body = json!({
            "include": [
                {"name": "김치", "field": "must_ingredients", "state": "include"},
                {"name": 7, "field": "dish_type", "state": "include"},
                "just a string"
            ],
            "exclude": []
        });
        let parsed: FilterKeywords = serde_json::from_value(body).unwrap();
        assert_eq!(parsed.include.len(), 1);
        assert_eq!(parsed.include[0].name, "김치");
    }

    #[test]
    fn unknown_state_maps_to_ignore() {
        let entry: FilterKeyword = serde_json::from_value(json!({
            "name": "마늘", "field": "exclude_ingredients", "state": "maybe"
        }))
        .unwrap();
        assert_eq!(entry.state, KeywordState::Ignore);
    }
}
