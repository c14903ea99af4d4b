//! In-memory graph store used in tests and local development

use std::collections::HashSet;

use async_trait::async_trait;

use recipe_gateway_core::{Candidate, RecipeGatewayError, TagDimension, TagSets};

use super::{GraphStore, PoolFilter, SimilarCandidate, TAG_NEIGHBOR_WEIGHTS};

#[derive(Debug, Clone, Default)]
pub struct InMemoryGraphStore {
    recipes: Vec<Candidate>,
}

impl InMemoryGraphStore {
    pub fn new(recipes: Vec<Candidate>) -> Self {
        Self { recipes }
    }

    fn find(&self, id: i64) -> Option<&Candidate> {
        self.recipes.iter().find(|c| c.id == id)
    }

    fn shared_ingredients(a: &Candidate, b: &Candidate) -> u32 {
        let a_set: HashSet<&String> = a.tags.ingredients.iter().collect();
        b.tags
            .ingredients
            .iter()
            .filter(|tag| a_set.contains(tag))
            .count() as u32
    }

    fn weighted_shared_tags(a: &Candidate, b: &Candidate) -> u32 {
        TAG_NEIGHBOR_WEIGHTS
            .iter()
            .filter_map(|(name, weight)| TagDimension::from_str(name).map(|dim| (dim, *weight)))
            .map(|(dim, weight)| {
                let a_set: HashSet<&String> = a.tags.get(dim).iter().collect();
                let shared = b.tags.get(dim).iter().filter(|t| a_set.contains(t)).count();
                shared as u32 * weight
            })
            .sum()
    }
}

#[async_trait]
impl GraphStore for InMemoryGraphStore {
    async fn fetch_candidates(
        &self,
        filter: &PoolFilter,
        limit: u32,
    ) -> Result<Vec<Candidate>, RecipeGatewayError> {
        let mut pool: Vec<Candidate> = self
            .recipes
            .iter()
            .filter(|c| match filter.max_cook_time_min {
                Some(max) => c.time_min.is_some_and(|t| t <= max),
                None => true,
            })
            .cloned()
            .collect();
        pool.sort_by(|a, b| b.views.cmp(&a.views));
        pool.truncate(limit as usize);
        Ok(pool)
    }

    async fn fetch_candidate(&self, id: i64) -> Result<Option<Candidate>, RecipeGatewayError> {
        Ok(self.find(id).cloned())
    }

    async fn fetch_tag_detail(&self, id: i64) -> Result<Option<TagSets>, RecipeGatewayError> {
        Ok(self.find(id).map(|c| c.tags.clone()))
    }

    async fn ingredient_neighbors(
        &self,
        id: i64,
        limit: u32,
        min_shared: u32,
    ) -> Result<Vec<SimilarCandidate>, RecipeGatewayError> {
        let Some(seed) = self.find(id) else {
            return Ok(Vec::new());
        };
        let mut neighbors: Vec<SimilarCandidate> = self
            .recipes
            .iter()
            .filter(|c| c.id != id)
            .map(|c| SimilarCandidate {
                candidate: c.clone(),
                shared: Self::shared_ingredients(seed, c),
            })
            .filter(|n| n.shared >= min_shared)
            .collect();
        neighbors.sort_by(|a, b| {
            b.shared
                .cmp(&a.shared)
                .then(b.candidate.views.cmp(&a.candidate.views))
        });
        neighbors.truncate(limit as usize);
        Ok(neighbors)
    }

    async fn tag_neighbors(
        &self,
        id: i64,
        limit: u32,
        exclude: &[i64],
    ) -> Result<Vec<SimilarCandidate>, RecipeGatewayError> {
        let Some(seed) = self.find(id) else {
            return Ok(Vec::new());
        };
        let mut neighbors: Vec<SimilarCandidate> = self
            .recipes
            .iter()
            .filter(|c| c.id != id && !exclude.contains(&c.id))
            .map(|c| SimilarCandidate {
                candidate: c.clone(),
                shared: Self::weighted_shared_tags(seed, c),
            })
            .filter(|n| n.shared > 0)
            .collect();
        neighbors.sort_by(|a, b| {
            b.shared
                .cmp(&a.shared)
                .then(b.candidate.views.cmp(&a.candidate.views))
        });
        neighbors.truncate(limit as usize);
        Ok(neighbors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recipe(id: i64, views: i64, ingredients: &[&str]) -> Candidate {
        Candidate {
            id,
            title: format!("레시피 {id}"),
            name: format!("메뉴{id}"),
            views,
            time_min: Some(30),
            difficulty: None,
            servings: None,
            image_url: None,
            tags: TagSets {
                ingredients: ingredients.iter().map(|s| s.to_string()).collect(),
                ..Default::default()
            },
        }
    }

    #[test]
    fn ingredient_neighbors_respect_min_shared() {
        let store = InMemoryGraphStore::new(vec![
            recipe(1, 100, &["돼지고기", "김치", "두부"]),
            recipe(2, 50, &["돼지고기", "김치"]),
            recipe(3, 80, &["돼지고기"]),
        ]);
        let neighbors =
            tokio_test::block_on(store.ingredient_neighbors(1, 10, 2)).unwrap();
        assert_eq!(neighbors.len(), 1);
        assert_eq!(neighbors[0].candidate.id, 2);
        assert_eq!(neighbors[0].shared, 2);
    }

    #[test]
    fn pool_fetch_filters_time_and_sorts_by_views() {
        let mut slow = recipe(4, 999, &["소고기"]);
        slow.time_min = Some(90);
        let store = InMemoryGraphStore::new(vec![
            recipe(1, 10, &[]),
            recipe(2, 30, &[]),
            slow,
        ]);
        let filter = PoolFilter {
            max_cook_time_min: Some(60),
        };
        let pool = tokio_test::block_on(store.fetch_candidates(&filter, 10)).unwrap();
        let ids: Vec<i64> = pool.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![2, 1]);
    }
}
