use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use validator::{Validate, ValidationErrors};

use crate::error::AppError;

/// Field name (as it appears in the JSON body) mapped to a single message.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `message` for `field` unless the field already has one.
    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_string())
            .or_insert_with(|| message.into());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn into_result(self) -> Result<(), AppError> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(AppError::Validation(self))
        }
    }
}

impl From<ValidationErrors> for FieldErrors {
    fn from(errors: ValidationErrors) -> Self {
        let mut fields = FieldErrors::new();
        for (field, field_errors) in errors.field_errors() {
            if let Some(first) = field_errors.first() {
                let message = first
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("{} is invalid", field));
                fields.add(&camel_case(&field), message);
            }
        }
        fields
    }
}

/// Runs the derived `validator` rules and converts failures into a 400.
pub fn validate_body<T: Validate>(body: &T) -> Result<(), AppError> {
    body.validate()
        .map_err(|errors| AppError::Validation(errors.into()))
}

/// Like `validate_body`, but hands back the field map so callers can add the
/// rules `validator` cannot express before failing.
pub fn body_errors<T: Validate>(body: &T) -> FieldErrors {
    body.validate().map(|_| FieldErrors::new()).unwrap_or_else(FieldErrors::from)
}

fn present_value(value: &Option<Value>) -> Option<&Value> {
    value.as_ref().filter(|v| !v.is_null())
}

/// A JSON number, or a string holding one.
pub fn number_from(value: &Option<Value>) -> Option<f64> {
    let number = match present_value(value)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    number.is_finite().then_some(number)
}

/// A JSON integer, or a string holding one. `4.5` and `"4.5"` are rejected.
pub fn integer_from(value: &Option<Value>) -> Option<i64> {
    match present_value(value)? {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
}

/// Parses a `YYYY-MM-DD` body field, recording why it was rejected.
pub fn date_field(
    value: &Option<Value>,
    field: &str,
    errors: &mut FieldErrors,
) -> Option<NaiveDate> {
    let Some(raw) = present_value(value) else {
        errors.add(field, format!("{} is required", field));
        return None;
    };

    let parsed = raw
        .as_str()
        .and_then(|s| NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok());
    if parsed.is_none() {
        errors.add(field, format!("{} must be a date in YYYY-MM-DD format", field));
    }
    parsed
}

fn camel_case(field: &str) -> String {
    let mut out = String::with_capacity(field.len());
    let mut upper_next = false;
    for ch in field.chars() {
        if ch == '_' {
            upper_next = true;
        } else if upper_next {
            out.extend(ch.to_uppercase());
            upper_next = false;
        } else {
            out.push(ch);
        }
    }
    out
}

/// Date rules shared by booking create and edit. `today` is the caller's notion
/// of the current UTC date.
pub fn validate_booking_dates(
    start_date: Option<NaiveDate>,
    end_date: Option<NaiveDate>,
    today: NaiveDate,
) -> Result<(NaiveDate, NaiveDate), AppError> {
    let mut errors = FieldErrors::new();

    match (start_date, end_date) {
        (Some(start), Some(end)) => {
            if start <= today {
                errors.add("startDate", "startDate cannot be in the past");
            }
            if end <= start {
                errors.add("endDate", "endDate cannot be on or before startDate");
            }
            errors.into_result()?;
            Ok((start, end))
        }
        (start, end) => {
            if start.is_none() {
                errors.add("startDate", "startDate is required");
            }
            if end.is_none() {
                errors.add("endDate", "endDate is required");
            }
            Err(AppError::Validation(errors))
        }
    }
}

/// Raw query string of `GET /api/spots`. Values stay as strings so that a
/// malformed number is reported per field instead of failing extraction.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpotQueryParams {
    pub page: Option<String>,
    pub size: Option<String>,
    pub min_lat: Option<String>,
    pub max_lat: Option<String>,
    pub min_lng: Option<String>,
    pub max_lng: Option<String>,
    pub min_price: Option<String>,
    pub max_price: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SpotFilters {
    pub page: i64,
    pub size: i64,
    pub min_lat: Option<f64>,
    pub max_lat: Option<f64>,
    pub min_lng: Option<f64>,
    pub max_lng: Option<f64>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
}

pub const DEFAULT_PAGE: i64 = 1;
pub const DEFAULT_PAGE_SIZE: i64 = 20;
pub const MAX_PAGE_SIZE: i64 = 20;

impl SpotFilters {
    /// Rows skipped before the requested page. `validate` rejects pages whose
    /// offset does not fit in an `i64`.
    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.size)
    }
}

impl SpotQueryParams {
    pub fn validate(&self) -> Result<SpotFilters, AppError> {
        let mut errors = FieldErrors::new();

        let page = match present(&self.page) {
            None => DEFAULT_PAGE,
            Some(raw) => match raw.parse::<i64>() {
                Ok(page) if page >= 1 => page,
                _ => {
                    errors.add("page", "Page must be greater than or equal to 1");
                    DEFAULT_PAGE
                }
            },
        };

        let size = match present(&self.size) {
            None => DEFAULT_PAGE_SIZE,
            Some(raw) => match raw.parse::<i64>() {
                Ok(size) if (1..=MAX_PAGE_SIZE).contains(&size) => size,
                _ => {
                    errors.add("size", "Size must be between 1 and 20");
                    DEFAULT_PAGE_SIZE
                }
            },
        };

        if (page - 1).checked_mul(size).is_none() {
            errors.add("page", "Page is out of range");
        }

        let min_lat = bounded(&self.min_lat, -90.0, 90.0)
            .map_err(|_| errors.add("minLat", "Minimum latitude is invalid"))
            .unwrap_or(None);
        let max_lat = bounded(&self.max_lat, -90.0, 90.0)
            .map_err(|_| errors.add("maxLat", "Maximum latitude is invalid"))
            .unwrap_or(None);
        let min_lng = bounded(&self.min_lng, -180.0, 180.0)
            .map_err(|_| errors.add("minLng", "Minimum longitude is invalid"))
            .unwrap_or(None);
        let max_lng = bounded(&self.max_lng, -180.0, 180.0)
            .map_err(|_| errors.add("maxLng", "Maximum longitude is invalid"))
            .unwrap_or(None);
        let min_price = bounded(&self.min_price, 0.0, f64::MAX)
            .map_err(|_| {
                errors.add(
                    "minPrice",
                    "Minimum price must be greater than or equal to 0",
                )
            })
            .unwrap_or(None);
        let max_price = bounded(&self.max_price, 0.0, f64::MAX)
            .map_err(|_| {
                errors.add(
                    "maxPrice",
                    "Maximum price must be greater than or equal to 0",
                )
            })
            .unwrap_or(None);

        errors.into_result()?;

        Ok(SpotFilters {
            page,
            size,
            min_lat,
            max_lat,
            min_lng,
            max_lng,
            min_price,
            max_price,
        })
    }
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn bounded(value: &Option<String>, min: f64, max: f64) -> Result<Option<f64>, ()> {
    match present(value) {
        None => Ok(None),
        Some(raw) => match raw.parse::<f64>() {
            Ok(v) if v.is_finite() && v >= min && v <= max => Ok(Some(v)),
            _ => Err(()),
        },
    }
}
