use std::collections::HashMap;

use anyhow::Result;
use chrono::Utc;
use sqlx::SqlitePool;

use super::placeholders;
use crate::database::models::ReviewImage;

const REVIEW_IMAGE_COLUMNS: &str = "id, review_id, url, created_at, updated_at";

#[derive(Clone)]
pub struct ReviewImageRepository {
    pool: SqlitePool,
}

impl ReviewImageRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Adds an image unless the review already has `limit` of them, in which
    /// case `None` is returned. Count and insert happen in one statement.
    pub async fn create_within_limit(
        &self,
        review_id: i64,
        url: &str,
        limit: i64,
    ) -> Result<Option<ReviewImage>> {
        let now = Utc::now();
        let image = sqlx::query_as::<_, ReviewImage>(&format!(
            r#"
            INSERT INTO review_images (review_id, url, created_at, updated_at)
            SELECT ?1, ?2, ?3, ?4
            WHERE (SELECT COUNT(*) FROM review_images WHERE review_id = ?1) < ?5
            RETURNING {REVIEW_IMAGE_COLUMNS}
            "#
        ))
        .bind(review_id)
        .bind(url)
        .bind(now)
        .bind(now)
        .bind(limit)
        .fetch_optional(&self.pool)
        .await?;

        Ok(image)
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<ReviewImage>> {
        let image = sqlx::query_as::<_, ReviewImage>(&format!(
            "SELECT {REVIEW_IMAGE_COLUMNS} FROM review_images WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(image)
    }

    pub async fn find_by_reviews(
        &self,
        review_ids: &[i64],
    ) -> Result<HashMap<i64, Vec<ReviewImage>>> {
        if review_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let sql = format!(
            "SELECT {REVIEW_IMAGE_COLUMNS} FROM review_images WHERE review_id IN ({}) ORDER BY id",
            placeholders(review_ids.len())
        );
        let mut query = sqlx::query_as::<_, ReviewImage>(&sql);
        for id in review_ids {
            query = query.bind(id);
        }
        let images = query.fetch_all(&self.pool).await?;

        let mut grouped: HashMap<i64, Vec<ReviewImage>> = HashMap::new();
        for image in images {
            grouped.entry(image.review_id).or_default().push(image);
        }
        Ok(grouped)
    }

    pub async fn delete_image(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM review_images WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
