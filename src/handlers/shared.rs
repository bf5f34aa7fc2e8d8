use actix_web::HttpResponse;
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::validation::FieldErrors;

/// Body of every non-2xx response.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<FieldErrors>,
}

impl ErrorBody {
    pub fn message(message: &str) -> Self {
        Self {
            message: message.to_string(),
            errors: None,
        }
    }

    pub fn with_errors(message: &str, errors: FieldErrors) -> Self {
        Self {
            message: message.to_string(),
            errors: Some(errors),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

pub fn deleted() -> HttpResponse {
    HttpResponse::Ok().json(MessageResponse {
        message: "Successfully deleted".to_string(),
    })
}

/// Fails with 403 unless `user_id` owns the resource.
pub fn ensure_owner(user_id: i64, owner_id: i64) -> Result<(), AppError> {
    if user_id == owner_id {
        Ok(())
    } else {
        Err(AppError::Forbidden)
    }
}
