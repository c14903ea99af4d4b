//! Postgres-backed graph store
//!
//! Recipes live in `recipes` and their tag edges in `recipe_tags
//! (recipe_id, dimension, tag)`. Tag strings in `recipe_tags` are stored
//! in normalized form; display forms live in `recipe_tags.display`.

use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::postgres::PgPool;
use sqlx::Row;
use tracing::instrument;

use recipe_gateway_core::{Candidate, RecipeGatewayError, TagDimension, TagSets};

use super::{GraphStore, PoolFilter, SimilarCandidate, TAG_NEIGHBOR_WEIGHTS};

#[derive(Clone)]
pub struct PostgresGraphStore {
    pool: PgPool,
}

impl PostgresGraphStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn map_err(err: sqlx::Error) -> RecipeGatewayError {
        RecipeGatewayError::Store(err.to_string())
    }

    fn candidate_from_row(row: &sqlx::postgres::PgRow) -> Result<Candidate, sqlx::Error> {
        Ok(Candidate {
            id: row.try_get("id")?,
            title: row.try_get("title")?,
            name: row.try_get("name")?,
            views: row.try_get("views")?,
            time_min: row
                .try_get::<Option<i32>, _>("time_min")?
                .map(|t| t.max(0) as u32),
            difficulty: row.try_get("difficulty")?,
            servings: row
                .try_get::<Option<i32>, _>("servings")?
                .map(|s| s.max(0) as u32),
            image_url: row.try_get("image_url")?,
            tags: TagSets::default(),
        })
    }

    /// Attach tag sets to the given candidates with one grouped query
    async fn attach_tags(
        &self,
        candidates: &mut [Candidate],
        display: bool,
    ) -> Result<(), RecipeGatewayError> {
        if candidates.is_empty() {
            return Ok(());
        }
        let ids: Vec<i64> = candidates.iter().map(|c| c.id).collect();
        let column = if display { "display" } else { "tag" };
        let sql = format!(
            "SELECT recipe_id, dimension, {column} AS tag \
             FROM recipe_tags WHERE recipe_id = ANY($1)"
        );
        let rows = sqlx::query(&sql)
            .bind(&ids)
            .fetch_all(&self.pool)
            .await
            .map_err(Self::map_err)?;

        let mut by_id: HashMap<i64, &mut Candidate> =
            candidates.iter_mut().map(|c| (c.id, c)).collect();
        for row in rows {
            let recipe_id: i64 = row.try_get("recipe_id").map_err(Self::map_err)?;
            let dimension: String = row.try_get("dimension").map_err(Self::map_err)?;
            let tag: String = row.try_get("tag").map_err(Self::map_err)?;
            if let (Some(candidate), Some(dim)) =
                (by_id.get_mut(&recipe_id), TagDimension::from_str(&dimension))
            {
                candidate.tags.push(dim, tag);
            }
        }
        Ok(())
    }

    async fn neighbors_from_rows(
        &self,
        rows: Vec<sqlx::postgres::PgRow>,
    ) -> Result<Vec<SimilarCandidate>, RecipeGatewayError> {
        let mut shared_by_id = HashMap::new();
        let mut candidates = Vec::with_capacity(rows.len());
        for row in &rows {
            let candidate = Self::candidate_from_row(row).map_err(Self::map_err)?;
            let shared: i64 = row.try_get("shared").map_err(Self::map_err)?;
            shared_by_id.insert(candidate.id, shared.max(0) as u32);
            candidates.push(candidate);
        }
        self.attach_tags(&mut candidates, false).await?;
        Ok(candidates
            .into_iter()
            .map(|candidate| {
                let shared = shared_by_id.get(&candidate.id).copied().unwrap_or(0);
                SimilarCandidate { candidate, shared }
            })
            .collect())
    }
}

#[async_trait]
impl GraphStore for PostgresGraphStore {
    #[instrument(skip(self))]
    async fn fetch_candidates(
        &self,
        filter: &PoolFilter,
        limit: u32,
    ) -> Result<Vec<Candidate>, RecipeGatewayError> {
        let sql = "SELECT id, title, name, views, time_min, difficulty, servings, image_url \
                   FROM recipes \
                   WHERE $1::int IS NULL OR (time_min IS NOT NULL AND time_min <= $1) \
                   ORDER BY views DESC LIMIT $2";

        let rows = sqlx::query(sql)
            .bind(filter.max_cook_time_min.map(|t| t as i32))
            .bind(limit as i64)
            .fetch_all(&self.pool)
            .await
            .map_err(Self::map_err)?;

        let mut candidates = rows
            .iter()
            .map(Self::candidate_from_row)
            .collect::<Result<Vec<_>, _>>()
            .map_err(Self::map_err)?;
        self.attach_tags(&mut candidates, false).await?;
        Ok(candidates)
    }

    async fn fetch_candidate(&self, id: i64) -> Result<Option<Candidate>, RecipeGatewayError> {
        let row = sqlx::query(
            "SELECT id, title, name, views, time_min, difficulty, servings, image_url \
             FROM recipes WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(Self::map_err)?;

        match row {
            Some(row) => {
                let mut candidates = vec![Self::candidate_from_row(&row).map_err(Self::map_err)?];
                self.attach_tags(&mut candidates, false).await?;
                Ok(candidates.pop())
            }
            None => Ok(None),
        }
    }

    async fn fetch_tag_detail(&self, id: i64) -> Result<Option<TagSets>, RecipeGatewayError> {
        let rows = sqlx::query(
            "SELECT dimension, display AS tag FROM recipe_tags WHERE recipe_id = $1",
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await
        .map_err(Self::map_err)?;

        if rows.is_empty() {
            return Ok(None);
        }
        let mut tags = TagSets::default();
        for row in rows {
            let dimension: String = row.try_get("dimension").map_err(Self::map_err)?;
            let tag: String = row.try_get("tag").map_err(Self::map_err)?;
            if let Some(dim) = TagDimension::from_str(&dimension) {
                tags.push(dim, tag);
            }
        }
        Ok(Some(tags))
    }

    #[instrument(skip(self))]
    async fn ingredient_neighbors(
        &self,
        id: i64,
        limit: u32,
        min_shared: u32,
    ) -> Result<Vec<SimilarCandidate>, RecipeGatewayError> {
        let rows = sqlx::query(
            "SELECT r.id, r.title, r.name, r.views, r.time_min, r.difficulty, \
                    r.servings, r.image_url, COUNT(*) AS shared \
             FROM recipe_tags a \
             JOIN recipe_tags b ON b.tag = a.tag AND b.dimension = 'ingredient' \
             JOIN recipes r ON r.id = b.recipe_id \
             WHERE a.recipe_id = $1 AND a.dimension = 'ingredient' AND b.recipe_id <> $1 \
             GROUP BY r.id, r.title, r.name, r.views, r.time_min, r.difficulty, \
                      r.servings, r.image_url \
             HAVING COUNT(*) >= $2 \
             ORDER BY shared DESC, r.views DESC \
             LIMIT $3",
        )
        .bind(id)
        .bind(min_shared as i64)
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(Self::map_err)?;

        self.neighbors_from_rows(rows).await
    }

    #[instrument(skip(self, exclude))]
    async fn tag_neighbors(
        &self,
        id: i64,
        limit: u32,
        exclude: &[i64],
    ) -> Result<Vec<SimilarCandidate>, RecipeGatewayError> {
        let weight_case = TAG_NEIGHBOR_WEIGHTS
            .iter()
            .map(|(dim, w)| format!("WHEN '{dim}' THEN {w}"))
            .collect::<Vec<_>>()
            .join(" ");
        let sql = format!(
            "SELECT r.id, r.title, r.name, r.views, r.time_min, r.difficulty, \
                    r.servings, r.image_url, \
                    SUM(CASE b.dimension {weight_case} ELSE 0 END) AS shared \
             FROM recipe_tags a \
             JOIN recipe_tags b ON b.tag = a.tag AND b.dimension = a.dimension \
             JOIN recipes r ON r.id = b.recipe_id \
             WHERE a.recipe_id = $1 AND a.dimension <> 'ingredient' \
               AND b.recipe_id <> $1 AND NOT (b.recipe_id = ANY($2)) \
             GROUP BY r.id, r.title, r.name, r.views, r.time_min, r.difficulty, \
                      r.servings, r.image_url \
             HAVING SUM(CASE b.dimension {weight_case} ELSE 0 END) > 0 \
             ORDER BY shared DESC, r.views DESC \
             LIMIT $3"
        );
        let rows = sqlx::query(&sql)
            .bind(id)
            .bind(exclude)
            .bind(limit as i64)
            .fetch_all(&self.pool)
            .await
            .map_err(Self::map_err)?;

        self.neighbors_from_rows(rows).await
    }
}
