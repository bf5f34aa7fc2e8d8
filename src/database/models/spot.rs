use std::borrow::Cow;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use validator::{Validate, ValidationError};

use super::{SpotImageSummary, UserSummary};
use crate::error::AppError;
use crate::validation::{body_errors, number_from};

pub const MAX_SPOT_NAME_LENGTH: usize = 50;

const LAT_MESSAGE: &str = "Latitude must be within -90 and 90";
const LNG_MESSAGE: &str = "Longitude must be within -180 and 180";
const PRICE_MESSAGE: &str = "Price per day must be a positive number";

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Spot {
    pub id: i64,
    pub owner_id: i64,
    pub address: String,
    pub city: String,
    pub state: String,
    pub country: String,
    pub lat: f64,
    pub lng: f64,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SpotInput {
    #[validate(
        required(message = "Street address is required"),
        length(min = 1, message = "Street address is required")
    )]
    pub address: Option<String>,

    #[validate(
        required(message = "City is required"),
        length(min = 1, message = "City is required")
    )]
    pub city: Option<String>,

    #[validate(
        required(message = "State is required"),
        length(min = 1, message = "State is required")
    )]
    pub state: Option<String>,

    #[validate(
        required(message = "Country is required"),
        length(min = 1, message = "Country is required")
    )]
    pub country: Option<String>,

    // lat, lng and price take numbers or numeric strings; checked in `validated`.
    pub lat: Option<Value>,

    pub lng: Option<Value>,

    #[validate(
        required(message = "Name is required"),
        custom(function = "validate_spot_name")
    )]
    pub name: Option<String>,

    #[validate(
        required(message = "Description is required"),
        length(min = 1, message = "Description is required")
    )]
    pub description: Option<String>,

    pub price: Option<Value>,
}

fn validate_spot_name(name: &str) -> Result<(), ValidationError> {
    let message = if name.trim().is_empty() {
        "Name is required"
    } else if name.chars().count() > MAX_SPOT_NAME_LENGTH {
        "Name must be 50 characters or fewer"
    } else {
        return Ok(());
    };

    Err(ValidationError::new("name").with_message(Cow::Borrowed(message)))
}

/// A spot body that passed validation.
#[derive(Debug, Clone)]
pub struct SpotFields {
    pub address: String,
    pub city: String,
    pub state: String,
    pub country: String,
    pub lat: f64,
    pub lng: f64,
    pub name: String,
    pub description: String,
    pub price: f64,
}

impl SpotInput {
    pub fn validated(self) -> Result<SpotFields, AppError> {
        let mut errors = body_errors(&self);

        let lat = number_from(&self.lat).filter(|lat| (-90.0..=90.0).contains(lat));
        if lat.is_none() {
            errors.add("lat", LAT_MESSAGE);
        }
        let lng = number_from(&self.lng).filter(|lng| (-180.0..=180.0).contains(lng));
        if lng.is_none() {
            errors.add("lng", LNG_MESSAGE);
        }
        let price = number_from(&self.price).filter(|price| *price > 0.0);
        if price.is_none() {
            errors.add("price", PRICE_MESSAGE);
        }
        errors.into_result()?;

        Ok(SpotFields {
            address: self.address.unwrap_or_default(),
            city: self.city.unwrap_or_default(),
            state: self.state.unwrap_or_default(),
            country: self.country.unwrap_or_default(),
            lat: lat.unwrap_or_default(),
            lng: lng.unwrap_or_default(),
            name: self.name.unwrap_or_default(),
            description: self.description.unwrap_or_default(),
            price: price.unwrap_or_default(),
        })
    }
}

/// Entry of `GET /api/spots` and `GET /api/spots/current`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpotListItem {
    #[serde(flatten)]
    pub spot: Spot,
    pub avg_rating: Option<f64>,
    pub preview_image: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SpotListResponse {
    #[serde(rename = "Spots")]
    pub spots: Vec<SpotListItem>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpotDetails {
    #[serde(flatten)]
    pub spot: Spot,
    pub num_reviews: i64,
    pub avg_star_rating: Option<f64>,
    #[serde(rename = "SpotImages")]
    pub spot_images: Vec<SpotImageSummary>,
    #[serde(rename = "Owner")]
    pub owner: Option<UserSummary>,
}

/// Spot embedded in a review or booking of the current user.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpotSummary {
    pub id: i64,
    pub owner_id: i64,
    pub address: String,
    pub city: String,
    pub state: String,
    pub country: String,
    pub lat: f64,
    pub lng: f64,
    pub name: String,
    pub price: f64,
    pub preview_image: Option<String>,
}

impl SpotSummary {
    pub fn new(spot: Spot, preview_image: Option<String>) -> Self {
        SpotSummary {
            id: spot.id,
            owner_id: spot.owner_id,
            address: spot.address,
            city: spot.city,
            state: spot.state,
            country: spot.country,
            lat: spot.lat,
            lng: spot.lng,
            name: spot.name,
            price: spot.price,
            preview_image,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn valid_input() -> SpotInput {
        SpotInput {
            address: Some("123 Disney Lane".into()),
            city: Some("San Francisco".into()),
            state: Some("California".into()),
            country: Some("United States of America".into()),
            lat: Some(json!(37.7645358)),
            lng: Some(json!(-122.4730327)),
            name: Some("App Academy".into()),
            description: Some("Place where web developers are created".into()),
            price: Some(json!(123.0)),
        }
    }

    fn errors_of(input: SpotInput) -> crate::validation::FieldErrors {
        match input.validated() {
            Err(AppError::Validation(errors)) => errors,
            other => panic!("expected validation failure, got {:?}", other),
        }
    }

    #[test]
    fn valid_spot_passes() {
        let fields = valid_input().validated().unwrap();
        assert_eq!(fields.city, "San Francisco");
    }

    #[test]
    fn empty_body_reports_every_field() {
        let errors = errors_of(SpotInput::default());
        assert_eq!(errors.len(), 9);
        assert_eq!(errors.get("address"), Some("Street address is required"));
        assert_eq!(errors.get("name"), Some("Name is required"));
        assert_eq!(
            errors.get("price"),
            Some("Price per day must be a positive number")
        );
    }

    #[test]
    fn coordinates_and_price_are_range_checked() {
        let errors = errors_of(SpotInput {
            lat: Some(json!(91.0)),
            lng: Some(json!(-181.0)),
            price: Some(json!(0.0)),
            ..valid_input()
        });
        assert_eq!(errors.get("lat"), Some(LAT_MESSAGE));
        assert_eq!(errors.get("lng"), Some(LNG_MESSAGE));
        assert_eq!(errors.get("price"), Some(PRICE_MESSAGE));
    }

    #[test]
    fn numeric_strings_are_accepted_and_other_types_reported() {
        let fields = SpotInput {
            lat: Some(json!("45.5")),
            price: Some(json!(" 80 ")),
            ..valid_input()
        }
        .validated()
        .unwrap();
        assert_eq!(fields.lat, 45.5);
        assert_eq!(fields.price, 80.0);

        let errors = errors_of(SpotInput {
            lat: Some(json!("north")),
            lng: Some(json!([1, 2])),
            price: Some(json!(false)),
            ..valid_input()
        });
        assert_eq!(errors.len(), 3);
        assert_eq!(errors.get("lat"), Some(LAT_MESSAGE));
        assert_eq!(errors.get("lng"), Some(LNG_MESSAGE));
        assert_eq!(errors.get("price"), Some(PRICE_MESSAGE));
    }

    #[test]
    fn name_length_is_capped() {
        let ok = SpotInput {
            name: Some("x".repeat(50)),
            ..valid_input()
        };
        assert!(ok.validated().is_ok());

        let errors = errors_of(SpotInput {
            name: Some("x".repeat(51)),
            ..valid_input()
        });
        assert_eq!(errors.get("name"), Some("Name must be 50 characters or fewer"));
    }
}
