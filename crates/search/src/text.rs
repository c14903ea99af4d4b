//! Text normalization and substring matching helpers
//!
//! All tag matching in the engine happens on normalized forms: scoring
//! and hard filters use whitespace-stripped lowercase, n-gram derivation
//! additionally drops everything outside alphanumerics and Hangul.

/// Strip all whitespace and lowercase. This is the normal form used for
/// every substring comparison between constraint values and tags.
pub fn normalize_for_match(s: &str) -> String {
    s.chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_lowercase()
}

/// Keep only alphanumerics and Hangul syllables, lowercased. Used before
/// n-gram derivation so punctuation never produces grams.
pub fn normalize_basic(s: &str) -> String {
    s.chars()
        .filter(|c| c.is_ascii_alphanumeric() || ('가'..='힣').contains(c))
        .collect::<String>()
        .to_lowercase()
}

/// All contiguous character substrings of length `min_n..=max_n` over the
/// cleaned text, deduplicated and sorted for deterministic output.
pub fn char_ngrams(text: &str, min_n: usize, max_n: usize) -> Vec<String> {
    let norm: Vec<char> = normalize_basic(text).chars().collect();
    let len = norm.len();
    if len < min_n {
        return Vec::new();
    }
    let mut grams = std::collections::BTreeSet::new();
    for n in min_n..=max_n.min(len) {
        for window in norm.windows(n) {
            grams.insert(window.iter().collect::<String>());
        }
    }
    grams.into_iter().collect()
}

/// One-directional containment on normalized forms: the constraint value
/// must appear inside the tag.
pub fn value_matches_tag(value_norm: &str, tag_norm: &str) -> bool {
    !value_norm.is_empty() && tag_norm.contains(value_norm)
}

/// Symmetric containment: a hit also counts when the tag appears inside
/// the constraint value. Used for the health and extra dimensions, where
/// either side may be an abbreviation of the other.
pub fn value_matches_tag_symmetric(value_norm: &str, tag_norm: &str) -> bool {
    if value_norm.is_empty() || tag_norm.is_empty() {
        return false;
    }
    tag_norm.contains(value_norm) || value_norm.contains(tag_norm)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_strips_whitespace_and_lowercases() {
        assert_eq!(normalize_for_match("비 오는 날"), "비오는날");
        assert_eq!(normalize_for_match("Spicy Soup"), "spicysoup");
    }

    #[test]
    fn normalize_basic_drops_punctuation() {
        assert_eq!(normalize_basic("건강한 국이 땡긴다!"), "건강한국이땡긴다");
        assert_eq!(normalize_basic("A-B_C 1"), "abc1");
    }

    #[test]
    fn ngrams_cover_lengths_two_to_four() {
        let grams = char_ngrams("국물요리", 2, 4);
        assert!(grams.contains(&"국물".to_string()));
        assert!(grams.contains(&"물요리".to_string()));
        assert!(grams.contains(&"국물요리".to_string()));
        assert!(!grams.contains(&"국".to_string()));
    }

    #[test]
    fn ngrams_on_short_text_are_empty() {
        assert!(char_ngrams("국", 2, 4).is_empty());
        assert!(char_ngrams("", 2, 4).is_empty());
    }

    #[test]
    fn symmetric_matching_goes_both_ways() {
        assert!(value_matches_tag("국물", "따끈한국물요리"));
        assert!(!value_matches_tag("따끈한국물요리", "국물"));
        assert!(value_matches_tag_symmetric("따끈한국물요리", "국물"));
        assert!(!value_matches_tag_symmetric("", "국물"));
    }
}
