//! Maximal-marginal-relevance selection for similar-recipe lookup
//!
//! Re-ranks an over-fetched neighbor pool so the returned set balances
//! relevance against novelty: each step picks the candidate maximizing
//! `lambda * relevance - (1 - lambda) * max_overlap_with_selected`, with
//! overlap measured as Jaccard similarity over a caller-chosen tag set.

use std::collections::HashSet;

use recipe_gateway_core::{Candidate, TagDimension};

use crate::store::SimilarCandidate;

/// Which tag set the Jaccard overlap is computed over
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimilarityBasis {
    Ingredients,
    /// Union of all non-ingredient dimensions
    Tags,
}

fn basis_set(candidate: &Candidate, basis: SimilarityBasis) -> HashSet<&str> {
    match basis {
        SimilarityBasis::Ingredients => candidate
            .tags
            .ingredients
            .iter()
            .map(String::as_str)
            .collect(),
        SimilarityBasis::Tags => TagDimension::ALL
            .iter()
            .filter(|dim| **dim != TagDimension::Ingredient)
            .flat_map(|dim| candidate.tags.get(*dim))
            .map(String::as_str)
            .collect(),
    }
}

fn jaccard(a: &HashSet<&str>, b: &HashSet<&str>) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    let intersection = a.intersection(b).count();
    let union = a.len() + b.len() - intersection;
    intersection as f64 / union as f64
}

/// MMR over a pool sorted descending by relevance (`shared`). Returns at
/// most `top_n` candidates; a pool no larger than `top_n` is returned
/// unchanged. Ties on the marginal score resolve to the better original
/// rank.
pub fn mmr_diversify(
    pool: Vec<SimilarCandidate>,
    top_n: usize,
    basis: SimilarityBasis,
    lambda: f64,
) -> Vec<SimilarCandidate> {
    if pool.len() <= top_n {
        return pool;
    }

    let sets: Vec<HashSet<&str>> = pool
        .iter()
        .map(|n| basis_set(&n.candidate, basis))
        .collect();

    let mut selected: Vec<usize> = vec![0];
    let mut remaining: Vec<usize> = (1..pool.len()).collect();

    while selected.len() < top_n && !remaining.is_empty() {
        let mut best_pos = 0;
        let mut best_score = f64::NEG_INFINITY;
        for (pos, &idx) in remaining.iter().enumerate() {
            let max_overlap = selected
                .iter()
                .map(|&s| jaccard(&sets[idx], &sets[s]))
                .fold(0.0, f64::max);
            let mmr = lambda * pool[idx].shared as f64 - (1.0 - lambda) * max_overlap;
            // strict improvement only: earlier (better-ranked) candidates
            // win ties
            if mmr > best_score {
                best_score = mmr;
                best_pos = pos;
            }
        }
        selected.push(remaining.remove(best_pos));
    }

    let mut keep: Vec<Option<SimilarCandidate>> = pool.into_iter().map(Some).collect();
    selected
        .into_iter()
        .filter_map(|idx| keep[idx].take())
        .collect()
}
