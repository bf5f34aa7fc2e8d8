use anyhow::Result;
use chrono::{NaiveDate, Utc};
use sqlx::{Sqlite, SqlitePool, Transaction};

use crate::database::models::{Booking, BookingWrite};
use crate::services::booking_conflicts::{DateRange, has_conflict};

const BOOKING_COLUMNS: &str = "id, spot_id, user_id, start_date, end_date, created_at, updated_at";

/// Message raised by the overlap triggers in the bookings migration.
const CONFLICT_TRIGGER_MESSAGE: &str = "booking_conflict";

#[derive(Clone)]
pub struct BookingRepository {
    pool: SqlitePool,
}

impl BookingRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Books the spot for the given dates unless they collide with an existing
    /// booking. The check and the insert share a transaction, and the table
    /// triggers reject any overlap that slips past the check.
    pub async fn create_booking(
        &self,
        spot_id: i64,
        user_id: i64,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<BookingWrite> {
        let mut tx = self.pool.begin().await?;

        let existing = Self::ranges_for_spot(&mut tx, spot_id, None).await?;
        if has_conflict(start_date, end_date, &existing) {
            log::debug!("Booking {start_date}..{end_date} on spot {spot_id} conflicts");
            return Ok(BookingWrite::Conflict);
        }

        let now = Utc::now();
        let inserted = sqlx::query_as::<_, Booking>(&format!(
            r#"
            INSERT INTO bookings (spot_id, user_id, start_date, end_date, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            RETURNING {BOOKING_COLUMNS}
            "#
        ))
        .bind(spot_id)
        .bind(user_id)
        .bind(start_date)
        .bind(end_date)
        .bind(now)
        .bind(now)
        .fetch_one(&mut *tx)
        .await;

        match inserted {
            Ok(booking) => {
                tx.commit().await?;
                Ok(BookingWrite::Saved(booking))
            }
            Err(err) if is_conflict_trigger(&err) => Ok(BookingWrite::Conflict),
            Err(err) => Err(err.into()),
        }
    }

    /// Moves an existing booking to new dates. The booking's own current range
    /// never counts against it.
    pub async fn update_dates(
        &self,
        booking: &Booking,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<BookingWrite> {
        let mut tx = self.pool.begin().await?;

        let existing = Self::ranges_for_spot(&mut tx, booking.spot_id, Some(booking.id)).await?;
        if has_conflict(start_date, end_date, &existing) {
            return Ok(BookingWrite::Conflict);
        }

        let updated = sqlx::query_as::<_, Booking>(&format!(
            r#"
            UPDATE bookings SET start_date = ?1, end_date = ?2, updated_at = ?3
            WHERE id = ?4
            RETURNING {BOOKING_COLUMNS}
            "#
        ))
        .bind(start_date)
        .bind(end_date)
        .bind(Utc::now())
        .bind(booking.id)
        .fetch_one(&mut *tx)
        .await;

        match updated {
            Ok(booking) => {
                tx.commit().await?;
                Ok(BookingWrite::Saved(booking))
            }
            Err(err) if is_conflict_trigger(&err) => Ok(BookingWrite::Conflict),
            Err(err) => Err(err.into()),
        }
    }

    async fn ranges_for_spot(
        tx: &mut Transaction<'_, Sqlite>,
        spot_id: i64,
        excluding: Option<i64>,
    ) -> Result<Vec<DateRange>> {
        let ranges = sqlx::query_as::<_, (NaiveDate, NaiveDate)>(
            r#"
            SELECT start_date, end_date FROM bookings
            WHERE spot_id = ?1 AND (?2 IS NULL OR id != ?2)
            "#,
        )
        .bind(spot_id)
        .bind(excluding)
        .fetch_all(&mut **tx)
        .await?;

        Ok(ranges)
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<Booking>> {
        let booking = sqlx::query_as::<_, Booking>(&format!(
            "SELECT {BOOKING_COLUMNS} FROM bookings WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(booking)
    }

    pub async fn find_by_spot(&self, spot_id: i64) -> Result<Vec<Booking>> {
        let bookings = sqlx::query_as::<_, Booking>(&format!(
            "SELECT {BOOKING_COLUMNS} FROM bookings WHERE spot_id = ?1 ORDER BY start_date"
        ))
        .bind(spot_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(bookings)
    }

    pub async fn find_by_spot_and_user(&self, spot_id: i64, user_id: i64) -> Result<Vec<Booking>> {
        let bookings = sqlx::query_as::<_, Booking>(&format!(
            "SELECT {BOOKING_COLUMNS} FROM bookings WHERE spot_id = ?1 AND user_id = ?2 ORDER BY start_date"
        ))
        .bind(spot_id)
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(bookings)
    }

    pub async fn find_by_user(&self, user_id: i64) -> Result<Vec<Booking>> {
        let bookings = sqlx::query_as::<_, Booking>(&format!(
            "SELECT {BOOKING_COLUMNS} FROM bookings WHERE user_id = ?1 ORDER BY start_date"
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(bookings)
    }

    pub async fn delete_booking(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM bookings WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

fn is_conflict_trigger(error: &sqlx::Error) -> bool {
    matches!(error, sqlx::Error::Database(db) if db.message().contains(CONFLICT_TRIGGER_MESSAGE))
}
