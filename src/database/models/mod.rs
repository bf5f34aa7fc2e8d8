pub mod booking;
pub mod review;
pub mod review_image;
pub mod spot;
pub mod spot_image;
pub mod user;

// Re-export all models for easy importing
pub use booking::*;
pub use review::*;
pub use review_image::*;
pub use spot::*;
pub use spot_image::*;
pub use user::*;
