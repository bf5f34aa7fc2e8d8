use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::AppError;
use crate::validation::validate_body;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct SpotImage {
    pub id: i64,
    pub spot_id: i64,
    pub url: String,
    pub preview: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct SpotImageInput {
    #[validate(
        required(message = "Image url is required"),
        length(min = 1, message = "Image url is required")
    )]
    pub url: Option<String>,
    pub preview: Option<bool>,
}

impl SpotImageInput {
    /// Returns `(url, preview)`; a missing preview flag means false.
    pub fn validated(self) -> Result<(String, bool), AppError> {
        validate_body(&self)?;
        Ok((self.url.unwrap_or_default(), self.preview.unwrap_or(false)))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpotImageSummary {
    pub id: i64,
    pub url: String,
    pub preview: bool,
}

impl From<SpotImage> for SpotImageSummary {
    fn from(image: SpotImage) -> Self {
        SpotImageSummary {
            id: image.id,
            url: image.url,
            preview: image.preview,
        }
    }
}
