use std::future::{Ready, ready};

use actix_web::{
    FromRequest, HttpRequest,
    cookie::{Cookie, SameSite, time::Duration as CookieDuration},
    dev::Payload,
    web::Data,
};
use anyhow::Result;
use bcrypt::{hash, verify};
use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::database::models::{SafeUser, SignupFields, User, UserWrite};
use crate::database::repositories::UserRepository;
use crate::error::AppError;

pub const TOKEN_COOKIE: &str = "token";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: i64, // user id
    pub email: String,
    pub username: String,
    pub exp: usize, // expiration time
}

impl Claims {
    pub fn user_id(&self) -> i64 {
        self.sub
    }
}

/// Reads the session token from the `token` cookie, falling back to an
/// `Authorization: Bearer` header.
fn token_from_request(req: &HttpRequest) -> Option<String> {
    if let Some(cookie) = req.cookie(TOKEN_COOKIE) {
        return Some(cookie.value().to_string());
    }

    req.headers()
        .get("Authorization")
        .and_then(|header| header.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::to_string)
}

fn decode_claims(token: &str, secret: &str) -> Result<Claims> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_ref()),
        &Validation::new(Algorithm::HS256),
    )?;

    Ok(token_data.claims)
}

/// Verified claims of the caller's session, if any.
fn claims_from_request(req: &HttpRequest) -> Option<Claims> {
    let Some(config) = req.app_data::<Data<Config>>() else {
        log::error!("Config missing from app data; cannot verify session");
        return None;
    };

    token_from_request(req).and_then(|token| {
        decode_claims(&token, &config.jwt_secret)
            .map_err(|e| log::debug!("Rejected session token: {}", e))
            .ok()
    })
}

/// Id of the authenticated user, or `None` for anonymous requests.
pub fn current_user(req: &HttpRequest) -> Option<i64> {
    claims_from_request(req).map(|claims| claims.user_id())
}

impl FromRequest for Claims {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(claims_from_request(req).ok_or_else(AppError::authentication_required))
    }
}

#[derive(Clone)]
pub struct AuthService {
    user_repository: UserRepository,
    config: Config,
}

impl AuthService {
    pub fn new(user_repository: UserRepository, config: Config) -> Self {
        Self {
            user_repository,
            config,
        }
    }

    pub async fn signup(&self, fields: SignupFields) -> Result<User, AppError> {
        if self.user_repository.email_exists(&fields.email).await? {
            return Err(AppError::user_exists("email"));
        }
        if self.user_repository.username_exists(&fields.username).await? {
            return Err(AppError::user_exists("username"));
        }

        let hashed_password = hash(&fields.password, self.config.bcrypt_cost)
            .map_err(|e| AppError::internal_server_error_message(e.to_string()))?;

        let user = match self
            .user_repository
            .create_user(&fields, &hashed_password)
            .await?
        {
            UserWrite::Created(user) => user,
            UserWrite::Taken(field) => return Err(AppError::user_exists(field)),
        };
        log::info!("Created user {} ({})", user.id, user.username);

        Ok(user)
    }

    /// Checks the credential (username or email) and password.
    pub async fn login(&self, credential: &str, password: &str) -> Result<User, AppError> {
        let invalid = || AppError::Unauthorized("Invalid credentials".to_string());

        let user = self
            .user_repository
            .find_by_credential(credential)
            .await?
            .ok_or_else(invalid)?;

        let matches = verify(password, &user.hashed_password)
            .map_err(|e| AppError::internal_server_error_message(e.to_string()))?;
        if !matches {
            return Err(invalid());
        }

        Ok(user)
    }

    /// Resolves the user behind a verified session, if the account still exists.
    pub async fn restore_user(&self, claims: &Claims) -> Result<Option<SafeUser>> {
        let user = self.user_repository.find_by_id(claims.user_id()).await?;
        Ok(user.map(SafeUser::from))
    }

    pub fn generate_token(&self, user: &User) -> Result<String> {
        let expiration = Utc::now() + Duration::days(self.config.jwt_expiration_days);

        let claims = Claims {
            sub: user.id,
            email: user.email.clone(),
            username: user.username.clone(),
            exp: expiration.timestamp() as usize,
        };

        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.config.jwt_secret.as_ref()),
        )?;

        Ok(token)
    }

    /// Session cookie carrying a fresh token for `user`.
    pub fn session_cookie(&self, user: &User) -> Result<Cookie<'static>> {
        let token = self.generate_token(user)?;

        Ok(Cookie::build(TOKEN_COOKIE, token)
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .secure(self.config.is_production())
            .max_age(CookieDuration::days(self.config.jwt_expiration_days))
            .finish())
    }

    pub fn removal_cookie(&self) -> Cookie<'static> {
        let mut cookie = Cookie::build(TOKEN_COOKIE, "").path("/").finish();
        cookie.make_removal();
        cookie
    }
}
