use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use thiserror::Error;

use crate::handlers::shared::ErrorBody;
use crate::validation::FieldErrors;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    DatabaseError(sqlx::Error),

    #[error("{0} couldn't be found")]
    NotFound(String),

    #[error("Forbidden")]
    Forbidden,

    #[error("{message}")]
    Conflict {
        message: String,
        errors: Option<FieldErrors>,
    },

    #[error("Bad Request")]
    Validation(FieldErrors),

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("Internal server error{}", .0.as_ref().map_or("".to_string(), |s| format!(": {}", s)))]
    InternalServerError(Option<String>),
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::DatabaseError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::Conflict { .. } => StatusCode::FORBIDDEN,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status_code = self.status_code();

        let body = match self {
            AppError::Validation(errors) => ErrorBody::with_errors("Bad Request", errors.clone()),
            AppError::Conflict {
                message,
                errors: Some(errors),
            } => ErrorBody::with_errors(message, errors.clone()),
            // Internal details stay in the log.
            AppError::DatabaseError(_) | AppError::InternalServerError(_) => {
                ErrorBody::message("Internal Server Error")
            }
            other => ErrorBody::message(&other.to_string()),
        };

        if status_code.is_server_error() {
            log::error!("Request failed with status {}: {}", status_code, self);
        } else {
            log::warn!("Request failed with status {}: {}", status_code, self);
        }

        HttpResponse::build(status_code).json(body)
    }
}

impl From<sqlx::Error> for AppError {
    fn from(error: sqlx::Error) -> Self {
        log::error!("Database error: {}", error);
        AppError::DatabaseError(error)
    }
}

impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        log::error!("Anyhow error: {}", error);

        match error.downcast::<sqlx::Error>() {
            Ok(sqlx_err) => AppError::DatabaseError(sqlx_err),
            Err(original_error) => AppError::InternalServerError(Some(original_error.to_string())),
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        AppError::Validation(errors.into())
    }
}

impl AppError {
    pub fn not_found(resource: &str) -> Self {
        AppError::NotFound(resource.to_string())
    }

    pub fn authentication_required() -> Self {
        AppError::Unauthorized("Authentication required".to_string())
    }

    pub fn booking_conflict() -> Self {
        let mut errors = FieldErrors::new();
        errors.add("startDate", "Start date conflicts with an existing booking");
        errors.add("endDate", "End date conflicts with an existing booking");

        AppError::Conflict {
            message: "Sorry, this spot is already booked for the specified dates".to_string(),
            errors: Some(errors),
        }
    }

    pub fn duplicate_review() -> Self {
        AppError::Conflict {
            message: "User already has a review for this spot".to_string(),
            errors: None,
        }
    }

    pub fn image_limit_reached() -> Self {
        AppError::Conflict {
            message: "Maximum number of images for this resource was reached".to_string(),
            errors: None,
        }
    }

    pub fn user_exists(field: &str) -> Self {
        let mut errors = FieldErrors::new();
        errors.add(field, format!("User with that {} already exists", field));

        AppError::Conflict {
            message: "User already exists".to_string(),
            errors: Some(errors),
        }
    }

    pub fn internal_server_error_message(message: impl Into<String>) -> Self {
        AppError::InternalServerError(Some(message.into()))
    }
}
