//! Tie-aware greedy + softmax selection
//!
//! Primary recommendation path: the top slots are taken greedily, with
//! uniform sampling among candidates tied at the greedy cutoff so equal
//! scores never favor retrieval order, and the remaining slots are drawn
//! by softmax-weighted sampling without replacement. The result is
//! deduplicated by normalized name and backfilled from the pool.

use rand::Rng;

use recipe_gateway_core::ScoredCandidate;

use crate::text::normalize_for_match;

/// Selection knobs for the greedy + softmax path
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SelectionParams {
    pub top_k: usize,
    pub greedy_k: usize,
    pub temperature: f64,
}

impl Default for SelectionParams {
    fn default() -> Self {
        Self {
            top_k: 5,
            greedy_k: 3,
            temperature: 0.5,
        }
    }
}

/// Outcome of a selection run
#[derive(Debug, Clone, PartialEq)]
pub enum SelectionOutcome {
    Selected(Vec<ScoredCandidate>),
    /// Every candidate scored zero: the pool carries no signal worth
    /// ranking, so no result is returned at all
    NoDiscriminativeResult,
}

/// Order a scored pool by total descending, then views descending
pub fn sort_pool(pool: &mut [ScoredCandidate]) {
    pool.sort_by(|a, b| {
        b.breakdown
            .total
            .cmp(&a.breakdown.total)
            .then(b.candidate.views.cmp(&a.candidate.views))
    });
}

/// Select up to `top_k` candidates from a pool pre-sorted by
/// [`sort_pool`]. The random source is caller-supplied so selection is
/// reproducible under a seeded generator.
pub fn select_diverse<R: Rng>(
    pool: Vec<ScoredCandidate>,
    params: &SelectionParams,
    rng: &mut R,
) -> SelectionOutcome {
    if pool.is_empty() || params.top_k == 0 {
        return SelectionOutcome::Selected(Vec::new());
    }
    if pool.iter().all(|c| c.breakdown.total == 0) {
        return SelectionOutcome::NoDiscriminativeResult;
    }
    if pool.len() <= params.top_k {
        return SelectionOutcome::Selected(pool);
    }

    let top_k = params.top_k;
    // clamp down only, so greedy_k <= top_k always holds
    let greedy_k = params.greedy_k.min(top_k);

    let greedy = if greedy_k == 0 {
        Vec::new()
    } else {
        pick_greedy(&pool, greedy_k, rng)
    };
    let sampled = pick_softmax(&pool, &greedy, top_k - greedy.len(), params.temperature, rng);

    let mut picked: Vec<usize> = greedy;
    picked.extend(sampled);

    // dedup by normalized name, first occurrence wins, then backfill from
    // the pool in sorted order
    let mut used_names = std::collections::HashSet::new();
    let mut used_indices = std::collections::HashSet::new();
    let mut selected = Vec::with_capacity(top_k);
    for idx in picked {
        let name = normalize_for_match(&pool[idx].candidate.name);
        if used_names.insert(name) {
            used_indices.insert(idx);
            selected.push(idx);
        }
    }
    for idx in 0..pool.len() {
        if selected.len() >= top_k {
            break;
        }
        if used_indices.contains(&idx) {
            continue;
        }
        let name = normalize_for_match(&pool[idx].candidate.name);
        if used_names.insert(name) {
            used_indices.insert(idx);
            selected.push(idx);
        }
    }

    let mut keep: Vec<Option<ScoredCandidate>> = pool.into_iter().map(Some).collect();
    SelectionOutcome::Selected(
        selected
            .into_iter()
            .filter_map(|idx| keep[idx].take())
            .collect(),
    )
}

/// Greedy slots: everything strictly above the cutoff score is taken in
/// rank order; when the remaining slots are contested by more tied
/// candidates than fit, the tied slots are sampled uniformly without
/// replacement over every pool member at the cutoff score.
fn pick_greedy<R: Rng>(pool: &[ScoredCandidate], greedy_k: usize, rng: &mut R) -> Vec<usize> {
    let cutoff = pool[greedy_k - 1].breakdown.total;
    let above: Vec<usize> = (0..greedy_k)
        .filter(|&i| pool[i].breakdown.total > cutoff)
        .collect();
    let tied: Vec<usize> = (0..pool.len())
        .filter(|&i| pool[i].breakdown.total == cutoff)
        .collect();
    let tie_slots = greedy_k - above.len();

    if tied.len() > 1 && tied.len() > tie_slots {
        let mut picks = above;
        for offset in rand::seq::index::sample(rng, tied.len(), tie_slots) {
            picks.push(tied[offset]);
        }
        picks
    } else {
        (0..greedy_k).collect()
    }
}

/// Softmax sampling without replacement: probabilities are computed once
/// over the unchosen remainder; each draw walks the cumulative
/// distribution and takes the first still-unchosen index at or after the
/// landing point.
fn pick_softmax<R: Rng>(
    pool: &[ScoredCandidate],
    already: &[usize],
    count: usize,
    temperature: f64,
    rng: &mut R,
) -> Vec<usize> {
    if count == 0 {
        return Vec::new();
    }
    let taken: std::collections::HashSet<usize> = already.iter().copied().collect();
    let remaining: Vec<usize> = (0..pool.len()).filter(|i| !taken.contains(i)).collect();
    if remaining.is_empty() {
        return Vec::new();
    }

    let temperature = if temperature > 0.0 { temperature } else { 1.0 };
    let max_score = remaining
        .iter()
        .map(|&i| pool[i].breakdown.total)
        .max()
        .unwrap_or(0) as f64;
    let weights: Vec<f64> = remaining
        .iter()
        .map(|&i| ((pool[i].breakdown.total as f64 - max_score) / temperature).exp())
        .collect();
    let total_weight: f64 = weights.iter().sum();

    let mut chosen = Vec::with_capacity(count);
    let mut chosen_set = std::collections::HashSet::new();
    let count = count.min(remaining.len());
    while chosen.len() < count {
        let target = rng.gen::<f64>() * total_weight;
        let mut cumulative = 0.0;
        let mut landing = remaining.len() - 1;
        for (pos, weight) in weights.iter().enumerate() {
            cumulative += weight;
            if target < cumulative {
                landing = pos;
                break;
            }
        }
        // first unchosen index at or after the landing point, wrapping
        let pick = (0..remaining.len())
            .map(|step| (landing + step) % remaining.len())
            .find(|pos| !chosen_set.contains(pos));
        match pick {
            Some(pos) => {
                chosen_set.insert(pos);
                chosen.push(remaining[pos]);
            }
            None => break,
        }
    }
    chosen
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use recipe_gateway_core::{Candidate, ScoreBreakdown, TagSets};

    fn scored(id: i64, name: &str, total: u32) -> ScoredCandidate {
        ScoredCandidate {
            candidate: Candidate {
                id,
                title: format!("{name} 레시피"),
                name: name.into(),
                views: 100 - id,
                time_min: None,
                difficulty: None,
                servings: None,
                image_url: None,
                tags: TagSets::default(),
            },
            breakdown: ScoreBreakdown {
                situation: total,
                ..Default::default()
            }
            .finalize(),
        }
    }

    fn selected(outcome: SelectionOutcome) -> Vec<ScoredCandidate> {
        match outcome {
            SelectionOutcome::Selected(items) => items,
            SelectionOutcome::NoDiscriminativeResult => panic!("expected a selection"),
        }
    }

    #[test]
    fn small_pool_returned_unchanged() {
        let pool = vec![scored(1, "a", 10), scored(2, "b", 5)];
        let params = SelectionParams {
            top_k: 5,
            ..Default::default()
        };
        let mut rng = StdRng::seed_from_u64(0);
        let result = selected(select_diverse(pool.clone(), &params, &mut rng));
        assert_eq!(result, pool);
    }

    #[test]
    fn zero_top_k_yields_an_empty_selection() {
        let pool = vec![scored(1, "a", 10), scored(2, "b", 7)];
        let params = SelectionParams {
            top_k: 0,
            greedy_k: 3,
            temperature: 0.5,
        };
        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(
            select_diverse(pool, &params, &mut rng),
            SelectionOutcome::Selected(Vec::new())
        );
    }

    #[test]
    fn zero_greedy_k_fills_every_slot_by_sampling() {
        let pool = vec![scored(1, "a", 10), scored(2, "b", 7), scored(3, "c", 4)];
        let params = SelectionParams {
            top_k: 2,
            greedy_k: 0,
            temperature: 0.5,
        };
        let mut rng = StdRng::seed_from_u64(0);
        let result = selected(select_diverse(pool, &params, &mut rng));
        assert_eq!(result.len(), 2);
    }

    #[test]
    fn all_zero_pool_is_not_a_result() {
        let pool = vec![scored(1, "a", 0), scored(2, "b", 0), scored(3, "c", 0)];
        let params = SelectionParams {
            top_k: 2,
            ..Default::default()
        };
        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(
            select_diverse(pool, &params, &mut rng),
            SelectionOutcome::NoDiscriminativeResult
        );
    }

    #[test]
    fn cutoff_ties_are_sampled_across_the_whole_pool() {
        // two candidates tie at the cutoff; across seeds both must be
        // able to take the single greedy slot
        let params = SelectionParams {
            top_k: 2,
            greedy_k: 1,
            temperature: 0.5,
        };
        let mut first_slot_ids = std::collections::HashSet::new();
        for seed in 0..64 {
            let pool = vec![scored(1, "a", 10), scored(2, "b", 10), scored(3, "c", 7)];
            let mut rng = StdRng::seed_from_u64(seed);
            let result = selected(select_diverse(pool, &params, &mut rng));
            assert_eq!(result.len(), 2);
            assert!(result[0].breakdown.total == 10);
            first_slot_ids.insert(result[0].candidate.id);
        }
        assert_eq!(
            first_slot_ids,
            std::collections::HashSet::from([1, 2]),
            "both tied candidates must win the greedy slot across seeds"
        );
    }

    #[test]
    fn ties_outside_the_window_can_win_a_greedy_slot() {
        // the cutoff tie spans three pool members but only one sits in
        // the greedy window; sampling runs over all of them so every
        // tied candidate can take the contested slot
        let params = SelectionParams {
            top_k: 3,
            greedy_k: 2,
            temperature: 0.5,
        };
        let mut second_slot_ids = std::collections::HashSet::new();
        for seed in 0..96 {
            let pool = vec![
                scored(1, "a", 12),
                scored(2, "b", 10),
                scored(3, "c", 10),
                scored(4, "d", 10),
            ];
            let mut rng = StdRng::seed_from_u64(seed);
            let result = selected(select_diverse(pool, &params, &mut rng));
            assert_eq!(result[0].candidate.id, 1);
            assert_eq!(result[1].breakdown.total, 10);
            second_slot_ids.insert(result[1].candidate.id);
        }
        assert_eq!(
            second_slot_ids,
            std::collections::HashSet::from([2, 3, 4]),
            "every cutoff-tied candidate must be able to win the contested slot"
        );
    }

    #[test]
    fn untied_cutoff_keeps_rank_order_in_greedy_slots() {
        let params = SelectionParams {
            top_k: 3,
            greedy_k: 2,
            temperature: 0.5,
        };
        for seed in 0..16 {
            let pool = vec![
                scored(1, "a", 10),
                scored(2, "b", 8),
                scored(3, "c", 5),
                scored(4, "d", 2),
            ];
            let mut rng = StdRng::seed_from_u64(seed);
            let result = selected(select_diverse(pool, &params, &mut rng));
            assert_eq!(result[0].candidate.id, 1);
            assert_eq!(result[1].candidate.id, 2);
            assert_eq!(result.len(), 3);
        }
    }

    #[test]
    fn duplicate_names_are_dropped_and_backfilled() {
        let params = SelectionParams {
            top_k: 3,
            greedy_k: 3,
            temperature: 0.5,
        };
        // "김치 찌개" and "김치찌개" normalize to the same name
        let pool = vec![
            scored(1, "김치찌개", 10),
            scored(2, "김치 찌개", 9),
            scored(3, "된장찌개", 8),
            scored(4, "부대찌개", 7),
        ];
        let mut rng = StdRng::seed_from_u64(0);
        let result = selected(select_diverse(pool, &params, &mut rng));
        assert_eq!(result.len(), 3);
        let names: Vec<String> = result
            .iter()
            .map(|c| normalize_for_match(&c.candidate.name))
            .collect();
        let unique: std::collections::HashSet<&String> = names.iter().collect();
        assert_eq!(unique.len(), names.len());
        assert!(result.iter().any(|c| c.candidate.id == 4));
    }

    #[test]
    fn selection_size_is_bounded_by_top_k() {
        let params = SelectionParams {
            top_k: 4,
            greedy_k: 2,
            temperature: 1.0,
        };
        let pool: Vec<ScoredCandidate> = (1..=10)
            .map(|id| scored(id, &format!("menu{id}"), 20 - id as u32))
            .collect();
        let mut rng = StdRng::seed_from_u64(7);
        let result = selected(select_diverse(pool, &params, &mut rng));
        assert_eq!(result.len(), 4);
    }

    #[test]
    fn sort_pool_orders_by_total_then_views() {
        let mut a = scored(1, "a", 5);
        a.candidate.views = 10;
        let mut b = scored(2, "b", 5);
        b.candidate.views = 50;
        let c = scored(3, "c", 9);
        let mut pool = vec![a, b, c];
        sort_pool(&mut pool);
        let ids: Vec<i64> = pool.iter().map(|s| s.candidate.id).collect();
        assert_eq!(ids, vec![3, 2, 1]);
    }
}
