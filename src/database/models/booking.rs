use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{SpotSummary, UserSummary};
use crate::error::AppError;
use crate::validation::{FieldErrors, date_field, validate_booking_dates};

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: i64,
    pub spot_id: i64,
    pub user_id: i64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Booking {
    /// Editable while the stay has not ended.
    pub fn is_past(&self, today: NaiveDate) -> bool {
        self.end_date <= today
    }

    /// Deletable only before the first night.
    pub fn has_started(&self, today: NaiveDate) -> bool {
        self.start_date <= today
    }
}

/// Dates arrive as raw JSON so a malformed value is reported per field.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingInput {
    pub start_date: Option<Value>,
    pub end_date: Option<Value>,
}

impl BookingInput {
    /// Parses both dates and applies the create/edit date rules.
    pub fn validated(&self, today: NaiveDate) -> Result<(NaiveDate, NaiveDate), AppError> {
        let mut errors = FieldErrors::new();
        let start_date = date_field(&self.start_date, "startDate", &mut errors);
        let end_date = date_field(&self.end_date, "endDate", &mut errors);
        errors.into_result()?;

        validate_booking_dates(start_date, end_date, today)
    }
}

/// Outcome of a booking write guarded by the conflict check.
#[derive(Debug)]
pub enum BookingWrite {
    Saved(Booking),
    Conflict,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingWithSpot {
    pub id: i64,
    pub spot_id: i64,
    #[serde(rename = "Spot")]
    pub spot: Option<SpotSummary>,
    pub user_id: i64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl BookingWithSpot {
    pub fn new(booking: Booking, spot: Option<SpotSummary>) -> Self {
        BookingWithSpot {
            id: booking.id,
            spot_id: booking.spot_id,
            spot,
            user_id: booking.user_id,
            start_date: booking.start_date,
            end_date: booking.end_date,
            created_at: booking.created_at,
            updated_at: booking.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingWithUser {
    #[serde(rename = "User")]
    pub user: Option<UserSummary>,
    #[serde(flatten)]
    pub booking: Booking,
}

/// What a guest sees of their own bookings on someone else's spot.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GuestBookingView {
    pub spot_id: i64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl From<Booking> for GuestBookingView {
    fn from(booking: Booking) -> Self {
        GuestBookingView {
            spot_id: booking.spot_id,
            start_date: booking.start_date,
            end_date: booking.end_date,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum SpotBookingEntry {
    Owner(BookingWithUser),
    Guest(GuestBookingView),
}

#[derive(Debug, Serialize, Deserialize)]
pub struct BookingsResponse<T> {
    #[serde(rename = "Bookings")]
    pub bookings: Vec<T>,
}
