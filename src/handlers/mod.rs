pub mod bookings;
pub mod review_images;
pub mod reviews;
pub mod session;
pub mod shared;
pub mod spot_images;
pub mod spots;
pub mod users;

use chrono::{NaiveDate, Utc};

/// The current UTC calendar date that booking rules compare against.
pub(crate) fn today() -> NaiveDate {
    Utc::now().date_naive()
}
