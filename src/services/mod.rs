pub mod auth;
pub mod booking_conflicts;
pub mod ratings;

pub use auth::{AuthService, Claims};
