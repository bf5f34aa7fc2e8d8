use actix_web::{HttpRequest, HttpResponse, web};

use crate::database::models::{LoginInput, SafeUser, UserResponse};
use crate::error::AppError;
use crate::handlers::shared::MessageResponse;
use crate::services::auth::current_user;
use crate::services::{AuthService, Claims};

pub async fn login(
    auth_service: web::Data<AuthService>,
    input: web::Json<LoginInput>,
) -> Result<HttpResponse, AppError> {
    let (credential, password) = input.into_inner().validated()?;
    let user = auth_service.login(&credential, &password).await?;
    let cookie = auth_service.session_cookie(&user)?;

    Ok(HttpResponse::Ok().cookie(cookie).json(UserResponse {
        user: Some(SafeUser::from(user)),
    }))
}

/// Anonymous callers get `{"user": null}` rather than an error.
pub async fn restore_user(
    auth_service: web::Data<AuthService>,
    claims: Option<Claims>,
) -> Result<HttpResponse, AppError> {
    let user = match claims {
        Some(claims) => auth_service.restore_user(&claims).await?,
        None => None,
    };

    Ok(HttpResponse::Ok().json(UserResponse { user }))
}

pub async fn logout(req: HttpRequest, auth_service: web::Data<AuthService>) -> HttpResponse {
    if let Some(user_id) = current_user(&req) {
        log::info!("User {} logged out", user_id);
    }

    HttpResponse::Ok()
        .cookie(auth_service.removal_cookie())
        .json(MessageResponse {
            message: "success".to_string(),
        })
}
