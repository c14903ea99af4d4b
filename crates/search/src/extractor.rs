//! LLM constraint extraction
//!
//! Turns a free-text recipe request into the raw constraint JSON via an
//! OpenAI-compatible chat endpoint. Extraction failures are never fatal:
//! a malformed or unreachable extractor degrades to an empty constraint
//! carrying the raw query as free text.

use async_trait::async_trait;
use tracing::{debug, warn};

use recipe_gateway_core::RawConstraints;

const EXTRACTOR_SYSTEM_PROMPT: &str = r#"You extract structured recipe-search constraints from a Korean free-text request.
Return ONLY a JSON object with these fields (use [] / null / false when absent):
{
  "dish_type": [], "method": [], "situation": [],
  "must_ingredients": [], "optional_ingredients": [], "exclude_ingredients": [],
  "health_tags": [], "weather_tags": [], "menu_style": [], "extra_keywords": [],
  "difficulty": [], "positive_tags": [], "negative_tags": [],
  "dietary_constraints": {"vegetarian": false, "vegan": false, "no_beef": false,
                          "no_pork": false, "no_chicken": false, "no_seafood": false},
  "servings": {"min": null, "max": null},
  "max_cook_time_min": null,
  "free_text": "one-line summary of the request"
}
Keep ingredient names as the user wrote them; do not translate."#;

#[async_trait]
pub trait ConstraintExtractor: Send + Sync {
    /// Extract raw constraints from the user query. Implementations must
    /// degrade to [`RawConstraints::fallback`] instead of failing.
    async fn extract(&self, query: &str) -> RawConstraints;
}

/// Extractor backed by an OpenAI-compatible chat completion endpoint
pub struct HttpConstraintExtractor {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
    model: String,
}

impl HttpConstraintExtractor {
    pub fn new(api_url: String, api_key: String, model: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_url,
            api_key,
            model,
        }
    }

    async fn extract_with_llm(&self, query: &str) -> anyhow::Result<RawConstraints> {
        let request = serde_json::json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": EXTRACTOR_SYSTEM_PROMPT },
                { "role": "user", "content": query }
            ],
            "temperature": 0.1,
            "response_format": { "type": "json_object" }
        });

        let response = self
            .client
            .post(&self.api_url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&request)
            .send()
            .await?;

        let body: serde_json::Value = response.json().await?;
        let content = body["choices"][0]["message"]["content"]
            .as_str()
            .ok_or_else(|| anyhow::anyhow!("missing content in extractor reply"))?;

        let value: serde_json::Value = serde_json::from_str(strip_code_fences(content))?;
        Ok(RawConstraints::from_json(&value))
    }
}

/// Some models wrap JSON replies in markdown code fences even when asked
/// not to
fn strip_code_fences(content: &str) -> &str {
    let trimmed = content.trim();
    let trimmed = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .unwrap_or(trimmed);
    trimmed.strip_suffix("```").unwrap_or(trimmed).trim()
}

#[async_trait]
impl ConstraintExtractor for HttpConstraintExtractor {
    async fn extract(&self, query: &str) -> RawConstraints {
        match self.extract_with_llm(query).await {
            Ok(mut raw) => {
                if raw.free_text.is_empty() {
                    raw.free_text = query.to_string();
                }
                debug!(query = %query, "constraints extracted");
                raw
            }
            Err(e) => {
                warn!(error = %e, "extractor failed, falling back to free text");
                RawConstraints::fallback(query)
            }
        }
    }
}

/// Extractor returning a preset constraint object; used in tests and to
/// serve requests that already carry structured constraints
#[derive(Debug, Clone, Default)]
pub struct FixedConstraintExtractor {
    pub raw: RawConstraints,
}

#[async_trait]
impl ConstraintExtractor for FixedConstraintExtractor {
    async fn extract(&self, query: &str) -> RawConstraints {
        let mut raw = self.raw.clone();
        if raw.free_text.is_empty() {
            raw.free_text = query.to_string();
        }
        raw
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn code_fences_are_stripped() {
        assert_eq!(strip_code_fences("{\"a\":1}"), "{\"a\":1}");
        assert_eq!(strip_code_fences("```json\n{\"a\":1}\n```"), "{\"a\":1}");
        assert_eq!(strip_code_fences("```\n{}\n```"), "{}");
    }

    #[test]
    fn fixed_extractor_fills_free_text() {
        let extractor = FixedConstraintExtractor::default();
        let raw = tokio_test::block_on(extractor.extract("두부 요리"));
        assert_eq!(raw.free_text, "두부 요리");
    }
}
