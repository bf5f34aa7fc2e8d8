use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::AppError;
use crate::validation::validate_body;

/// A review can carry at most this many images.
pub const MAX_REVIEW_IMAGES: i64 = 10;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ReviewImage {
    pub id: i64,
    pub review_id: i64,
    pub url: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct ReviewImageInput {
    #[validate(
        required(message = "Image url is required"),
        length(min = 1, message = "Image url is required")
    )]
    pub url: Option<String>,
}

impl ReviewImageInput {
    pub fn validated(self) -> Result<String, AppError> {
        validate_body(&self)?;
        Ok(self.url.unwrap_or_default())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewImageSummary {
    pub id: i64,
    pub url: String,
}

impl From<ReviewImage> for ReviewImageSummary {
    fn from(image: ReviewImage) -> Self {
        ReviewImageSummary {
            id: image.id,
            url: image.url,
        }
    }
}
