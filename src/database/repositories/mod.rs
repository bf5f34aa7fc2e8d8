pub mod booking;
pub mod review;
pub mod review_image;
pub mod spot;
pub mod spot_image;
pub mod user;

// Re-export all repositories for easy importing
pub use booking::BookingRepository;
pub use review::ReviewRepository;
pub use review_image::ReviewImageRepository;
pub use spot::SpotRepository;
pub use spot_image::SpotImageRepository;
pub use user::UserRepository;

/// True when the error is a UNIQUE constraint violation.
pub(crate) fn is_unique_violation(error: &sqlx::Error) -> bool {
    matches!(error, sqlx::Error::Database(db) if db.is_unique_violation())
}

/// `?, ?, ?` for an `IN (...)` clause with `count` bound values.
pub(crate) fn placeholders(count: usize) -> String {
    vec!["?"; count].join(", ")
}
