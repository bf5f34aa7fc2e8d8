use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use validator::Validate;

use super::{ReviewImageSummary, SpotSummary, UserSummary};
use crate::error::AppError;
use crate::validation::{body_errors, integer_from};

const STARS_MESSAGE: &str = "Stars must be an integer from 1 to 5";

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub id: i64,
    pub user_id: i64,
    pub spot_id: i64,
    pub review: String,
    pub stars: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct ReviewInput {
    #[validate(
        required(message = "Review text is required"),
        length(min = 1, message = "Review text is required")
    )]
    pub review: Option<String>,

    /// An integer or a numeric string; checked in `validated`.
    pub stars: Option<Value>,
}

#[derive(Debug, Clone)]
pub struct ReviewFields {
    pub review: String,
    pub stars: i64,
}

impl ReviewInput {
    pub fn validated(self) -> Result<ReviewFields, AppError> {
        let mut errors = body_errors(&self);

        let stars = integer_from(&self.stars).filter(|stars| (1..=5).contains(stars));
        if stars.is_none() {
            errors.add("stars", STARS_MESSAGE);
        }
        errors.into_result()?;

        Ok(ReviewFields {
            review: self.review.unwrap_or_default(),
            stars: stars.unwrap_or_default(),
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewWithDetails {
    #[serde(flatten)]
    pub review: Review,
    #[serde(rename = "User")]
    pub user: Option<UserSummary>,
    #[serde(rename = "Spot", skip_serializing_if = "Option::is_none")]
    pub spot: Option<SpotSummary>,
    #[serde(rename = "ReviewImages")]
    pub review_images: Vec<ReviewImageSummary>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ReviewsResponse {
    #[serde(rename = "Reviews")]
    pub reviews: Vec<ReviewWithDetails>,
}
