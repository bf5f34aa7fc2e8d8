use std::collections::HashMap;

use anyhow::Result;
use chrono::Utc;
use sqlx::SqlitePool;

use super::placeholders;
use crate::database::models::SpotImage;

const SPOT_IMAGE_COLUMNS: &str = "id, spot_id, url, preview, created_at, updated_at";

#[derive(Clone)]
pub struct SpotImageRepository {
    pool: SqlitePool,
}

impl SpotImageRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create_image(&self, spot_id: i64, url: &str, preview: bool) -> Result<SpotImage> {
        let now = Utc::now();
        let image = sqlx::query_as::<_, SpotImage>(&format!(
            r#"
            INSERT INTO spot_images (spot_id, url, preview, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            RETURNING {SPOT_IMAGE_COLUMNS}
            "#
        ))
        .bind(spot_id)
        .bind(url)
        .bind(preview)
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        Ok(image)
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<SpotImage>> {
        let image = sqlx::query_as::<_, SpotImage>(&format!(
            "SELECT {SPOT_IMAGE_COLUMNS} FROM spot_images WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(image)
    }

    pub async fn find_by_spot(&self, spot_id: i64) -> Result<Vec<SpotImage>> {
        let images = sqlx::query_as::<_, SpotImage>(&format!(
            "SELECT {SPOT_IMAGE_COLUMNS} FROM spot_images WHERE spot_id = ?1 ORDER BY id"
        ))
        .bind(spot_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(images)
    }

    /// URL of the earliest preview image of each spot that has one.
    pub async fn preview_urls(&self, spot_ids: &[i64]) -> Result<HashMap<i64, String>> {
        if spot_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let sql = format!(
            r#"
            SELECT spot_id, url FROM spot_images
            WHERE preview = 1 AND spot_id IN ({})
            ORDER BY id
            "#,
            placeholders(spot_ids.len())
        );
        let mut query = sqlx::query_as::<_, (i64, String)>(&sql);
        for id in spot_ids {
            query = query.bind(id);
        }
        let rows = query.fetch_all(&self.pool).await?;

        let mut previews = HashMap::new();
        for (spot_id, url) in rows {
            previews.entry(spot_id).or_insert(url);
        }
        Ok(previews)
    }

    pub async fn delete_image(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM spot_images WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
