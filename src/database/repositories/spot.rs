use std::collections::HashMap;

use anyhow::Result;
use chrono::Utc;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};

use super::placeholders;
use crate::database::models::{Spot, SpotFields};
use crate::validation::SpotFilters;

const SPOT_COLUMNS: &str =
    "id, owner_id, address, city, state, country, lat, lng, name, description, price, created_at, updated_at";

#[derive(Clone)]
pub struct SpotRepository {
    pool: SqlitePool,
}

impl SpotRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create_spot(&self, owner_id: i64, fields: &SpotFields) -> Result<Spot> {
        let now = Utc::now();
        let spot = sqlx::query_as::<_, Spot>(&format!(
            r#"
            INSERT INTO spots (owner_id, address, city, state, country, lat, lng, name, description, price, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)
            RETURNING {SPOT_COLUMNS}
            "#
        ))
        .bind(owner_id)
        .bind(&fields.address)
        .bind(&fields.city)
        .bind(&fields.state)
        .bind(&fields.country)
        .bind(fields.lat)
        .bind(fields.lng)
        .bind(&fields.name)
        .bind(&fields.description)
        .bind(fields.price)
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        Ok(spot)
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<Spot>> {
        let spot = sqlx::query_as::<_, Spot>(&format!(
            "SELECT {SPOT_COLUMNS} FROM spots WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(spot)
    }

    pub async fn find_by_ids(&self, ids: &[i64]) -> Result<HashMap<i64, Spot>> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let sql = format!(
            "SELECT {SPOT_COLUMNS} FROM spots WHERE id IN ({})",
            placeholders(ids.len())
        );
        let mut query = sqlx::query_as::<_, Spot>(&sql);
        for id in ids {
            query = query.bind(id);
        }
        let spots = query.fetch_all(&self.pool).await?;

        Ok(spots.into_iter().map(|s| (s.id, s)).collect())
    }

    /// One page of spots matching the optional coordinate and price bounds.
    pub async fn list_spots(&self, filters: &SpotFilters) -> Result<Vec<Spot>> {
        let mut builder: QueryBuilder<Sqlite> =
            QueryBuilder::new(format!("SELECT {SPOT_COLUMNS} FROM spots WHERE 1 = 1"));

        let bounds = [
            ("lat", ">=", filters.min_lat),
            ("lat", "<=", filters.max_lat),
            ("lng", ">=", filters.min_lng),
            ("lng", "<=", filters.max_lng),
            ("price", ">=", filters.min_price),
            ("price", "<=", filters.max_price),
        ];
        for (column, op, value) in bounds {
            if let Some(value) = value {
                builder
                    .push(format!(" AND {column} {op} "))
                    .push_bind(value);
            }
        }

        builder
            .push(" ORDER BY id LIMIT ")
            .push_bind(filters.size)
            .push(" OFFSET ")
            .push_bind(filters.offset());

        let spots = builder
            .build_query_as::<Spot>()
            .fetch_all(&self.pool)
            .await?;

        Ok(spots)
    }

    pub async fn find_by_owner(&self, owner_id: i64) -> Result<Vec<Spot>> {
        let spots = sqlx::query_as::<_, Spot>(&format!(
            "SELECT {SPOT_COLUMNS} FROM spots WHERE owner_id = ?1 ORDER BY id"
        ))
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(spots)
    }

    pub async fn update_spot(&self, id: i64, fields: &SpotFields) -> Result<Option<Spot>> {
        let now = Utc::now();
        let spot = sqlx::query_as::<_, Spot>(&format!(
            r#"
            UPDATE spots
            SET address = ?1, city = ?2, state = ?3, country = ?4, lat = ?5, lng = ?6,
                name = ?7, description = ?8, price = ?9, updated_at = ?10
            WHERE id = ?11
            RETURNING {SPOT_COLUMNS}
            "#
        ))
        .bind(&fields.address)
        .bind(&fields.city)
        .bind(&fields.state)
        .bind(&fields.country)
        .bind(fields.lat)
        .bind(fields.lng)
        .bind(&fields.name)
        .bind(&fields.description)
        .bind(fields.price)
        .bind(now)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(spot)
    }

    /// Removes the spot; images, reviews and bookings go with it.
    pub async fn delete_spot(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM spots WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
