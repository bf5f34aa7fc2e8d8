use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::error::AppError;
use crate::validation::validate_body;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub hashed_password: String,
    pub first_name: String,
    pub last_name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The user as returned by signup, login and session restore.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SafeUser {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub username: String,
}

impl From<User> for SafeUser {
    fn from(user: User) -> Self {
        SafeUser {
            id: user.id,
            first_name: user.first_name,
            last_name: user.last_name,
            email: user.email,
            username: user.username,
        }
    }
}

/// Embedded as `Owner` on spot details and `User` on reviews and bookings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
}

/// Outcome of inserting a user; `Taken` names the unique column that collided.
#[derive(Debug)]
pub enum UserWrite {
    Created(User),
    Taken(&'static str),
}

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub user: Option<SafeUser>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SignupInput {
    #[validate(
        required(message = "Please provide a valid email."),
        email(message = "Please provide a valid email.")
    )]
    pub email: Option<String>,

    #[validate(
        required(message = "Please provide a username with at least 4 characters."),
        length(min = 4, message = "Please provide a username with at least 4 characters."),
        custom(function = "validate_username_not_email")
    )]
    pub username: Option<String>,

    #[validate(
        required(message = "Password must be 6 characters or more."),
        length(min = 6, message = "Password must be 6 characters or more.")
    )]
    pub password: Option<String>,

    #[validate(
        required(message = "First Name is required"),
        length(min = 1, message = "First Name is required")
    )]
    pub first_name: Option<String>,

    #[validate(
        required(message = "Last Name is required"),
        length(min = 1, message = "Last Name is required")
    )]
    pub last_name: Option<String>,
}

fn validate_username_not_email(username: &str) -> Result<(), ValidationError> {
    if username.contains('@') {
        let mut error = ValidationError::new("username_is_email");
        error.message = Some("Username cannot be an email.".into());
        return Err(error);
    }
    Ok(())
}

#[derive(Debug, Clone)]
pub struct SignupFields {
    pub email: String,
    pub username: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
}

impl SignupInput {
    pub fn validated(self) -> Result<SignupFields, AppError> {
        validate_body(&self)?;

        Ok(SignupFields {
            email: self.email.unwrap_or_default(),
            username: self.username.unwrap_or_default(),
            password: self.password.unwrap_or_default(),
            first_name: self.first_name.unwrap_or_default(),
            last_name: self.last_name.unwrap_or_default(),
        })
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct LoginInput {
    #[validate(
        required(message = "Email or username is required"),
        length(min = 1, message = "Email or username is required")
    )]
    pub credential: Option<String>,

    #[validate(
        required(message = "Password is required"),
        length(min = 1, message = "Password is required")
    )]
    pub password: Option<String>,
}

impl LoginInput {
    /// Returns `(credential, password)` once both are present.
    pub fn validated(self) -> Result<(String, String), AppError> {
        validate_body(&self)?;

        Ok((
            self.credential.unwrap_or_default(),
            self.password.unwrap_or_default(),
        ))
    }
}
