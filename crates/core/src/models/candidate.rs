//! Candidate models: one retrievable recipe with its tag dimensions
//!
//! Candidates are constructed fresh per retrieval call from the graph
//! store, stay immutable through scoring and selection, and are never
//! persisted by the engine.

use serde::{Deserialize, Serialize};

/// One facet of tag-based matching
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TagDimension {
    Ingredient,
    Category,
    Method,
    Situation,
    Health,
    Weather,
    MenuStyle,
    Extra,
}

impl TagDimension {
    pub const ALL: [TagDimension; 8] = [
        TagDimension::Ingredient,
        TagDimension::Category,
        TagDimension::Method,
        TagDimension::Situation,
        TagDimension::Health,
        TagDimension::Weather,
        TagDimension::MenuStyle,
        TagDimension::Extra,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TagDimension::Ingredient => "ingredient",
            TagDimension::Category => "category",
            TagDimension::Method => "method",
            TagDimension::Situation => "situation",
            TagDimension::Health => "health",
            TagDimension::Weather => "weather",
            TagDimension::MenuStyle => "menu_style",
            TagDimension::Extra => "extra",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "ingredient" => Some(TagDimension::Ingredient),
            "category" => Some(TagDimension::Category),
            "method" => Some(TagDimension::Method),
            "situation" => Some(TagDimension::Situation),
            "health" => Some(TagDimension::Health),
            "weather" => Some(TagDimension::Weather),
            "menu_style" => Some(TagDimension::MenuStyle),
            "extra" => Some(TagDimension::Extra),
            _ => None,
        }
    }
}

/// Tag strings associated with a candidate, grouped by dimension
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TagSets {
    pub ingredients: Vec<String>,
    pub categories: Vec<String>,
    pub methods: Vec<String>,
    pub situations: Vec<String>,
    pub health: Vec<String>,
    pub weather: Vec<String>,
    pub menu_styles: Vec<String>,
    pub extra: Vec<String>,
}

impl TagSets {
    pub fn get(&self, dimension: TagDimension) -> &[String] {
        match dimension {
            TagDimension::Ingredient => &self.ingredients,
            TagDimension::Category => &self.categories,
            TagDimension::Method => &self.methods,
            TagDimension::Situation => &self.situations,
            TagDimension::Health => &self.health,
            TagDimension::Weather => &self.weather,
            TagDimension::MenuStyle => &self.menu_styles,
            TagDimension::Extra => &self.extra,
        }
    }

    pub fn push(&mut self, dimension: TagDimension, tag: String) {
        let list = match dimension {
            TagDimension::Ingredient => &mut self.ingredients,
            TagDimension::Category => &mut self.categories,
            TagDimension::Method => &mut self.methods,
            TagDimension::Situation => &mut self.situations,
            TagDimension::Health => &mut self.health,
            TagDimension::Weather => &mut self.weather,
            TagDimension::MenuStyle => &mut self.menu_styles,
            TagDimension::Extra => &mut self.extra,
        };
        if !list.contains(&tag) {
            list.push(tag);
        }
    }
}

/// One retrievable recipe with the tag sets needed for scoring
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub id: i64,
    pub title: String,
    pub name: String,
    pub views: i64,
    pub time_min: Option<u32>,
    pub difficulty: Option<String>,
    pub servings: Option<u32>,
    pub image_url: Option<String>,
    pub tags: TagSets,
}
