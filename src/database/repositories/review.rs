use std::collections::HashMap;

use anyhow::Result;
use chrono::Utc;
use sqlx::SqlitePool;

use super::{is_unique_violation, placeholders};
use crate::database::models::{Review, ReviewFields};

const REVIEW_COLUMNS: &str = "id, user_id, spot_id, review, stars, created_at, updated_at";

#[derive(Clone)]
pub struct ReviewRepository {
    pool: SqlitePool,
}

impl ReviewRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Inserts the review, or returns `None` when the user already reviewed the spot.
    pub async fn create_review(
        &self,
        user_id: i64,
        spot_id: i64,
        fields: &ReviewFields,
    ) -> Result<Option<Review>> {
        let now = Utc::now();
        let result = sqlx::query_as::<_, Review>(&format!(
            r#"
            INSERT INTO reviews (user_id, spot_id, review, stars, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            RETURNING {REVIEW_COLUMNS}
            "#
        ))
        .bind(user_id)
        .bind(spot_id)
        .bind(&fields.review)
        .bind(fields.stars)
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await;

        match result {
            Ok(review) => Ok(Some(review)),
            Err(err) if is_unique_violation(&err) => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<Review>> {
        let review = sqlx::query_as::<_, Review>(&format!(
            "SELECT {REVIEW_COLUMNS} FROM reviews WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(review)
    }

    pub async fn find_by_user_and_spot(
        &self,
        user_id: i64,
        spot_id: i64,
    ) -> Result<Option<Review>> {
        let review = sqlx::query_as::<_, Review>(&format!(
            "SELECT {REVIEW_COLUMNS} FROM reviews WHERE user_id = ?1 AND spot_id = ?2"
        ))
        .bind(user_id)
        .bind(spot_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(review)
    }

    pub async fn find_by_spot(&self, spot_id: i64) -> Result<Vec<Review>> {
        let reviews = sqlx::query_as::<_, Review>(&format!(
            "SELECT {REVIEW_COLUMNS} FROM reviews WHERE spot_id = ?1 ORDER BY id"
        ))
        .bind(spot_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(reviews)
    }

    pub async fn find_by_user(&self, user_id: i64) -> Result<Vec<Review>> {
        let reviews = sqlx::query_as::<_, Review>(&format!(
            "SELECT {REVIEW_COLUMNS} FROM reviews WHERE user_id = ?1 ORDER BY id"
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(reviews)
    }

    pub async fn update_review(&self, id: i64, fields: &ReviewFields) -> Result<Option<Review>> {
        let review = sqlx::query_as::<_, Review>(&format!(
            r#"
            UPDATE reviews SET review = ?1, stars = ?2, updated_at = ?3
            WHERE id = ?4
            RETURNING {REVIEW_COLUMNS}
            "#
        ))
        .bind(&fields.review)
        .bind(fields.stars)
        .bind(Utc::now())
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(review)
    }

    pub async fn delete_review(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM reviews WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn stars_for_spot(&self, spot_id: i64) -> Result<Vec<i64>> {
        let stars = sqlx::query_scalar::<_, i64>("SELECT stars FROM reviews WHERE spot_id = ?1")
            .bind(spot_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(stars)
    }

    /// Star ratings grouped by spot. Spots without reviews are absent.
    pub async fn stars_for_spots(&self, spot_ids: &[i64]) -> Result<HashMap<i64, Vec<i64>>> {
        if spot_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let sql = format!(
            "SELECT spot_id, stars FROM reviews WHERE spot_id IN ({})",
            placeholders(spot_ids.len())
        );
        let mut query = sqlx::query_as::<_, (i64, i64)>(&sql);
        for id in spot_ids {
            query = query.bind(id);
        }
        let rows = query.fetch_all(&self.pool).await?;

        let mut grouped: HashMap<i64, Vec<i64>> = HashMap::new();
        for (spot_id, stars) in rows {
            grouped.entry(spot_id).or_default().push(stars);
        }
        Ok(grouped)
    }
}
