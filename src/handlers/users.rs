use actix_web::{HttpResponse, web};

use crate::database::models::{SafeUser, SignupInput, UserResponse};
use crate::error::AppError;
use crate::services::AuthService;

/// `POST /api/users`: creates the account and logs it in.
pub async fn signup(
    auth_service: web::Data<AuthService>,
    input: web::Json<SignupInput>,
) -> Result<HttpResponse, AppError> {
    let fields = input.into_inner().validated()?;
    let user = auth_service.signup(fields).await?;
    let cookie = auth_service.session_cookie(&user)?;

    Ok(HttpResponse::Created().cookie(cookie).json(UserResponse {
        user: Some(SafeUser::from(user)),
    }))
}
