use actix_web::{HttpResponse, web};

use crate::database::models::{MAX_REVIEW_IMAGES, ReviewImageInput, ReviewImageSummary};
use crate::database::repositories::{ReviewImageRepository, ReviewRepository};
use crate::error::AppError;
use crate::handlers::shared::{deleted, ensure_owner};
use crate::services::Claims;

pub async fn add_review_image(
    claims: Claims,
    review_repo: web::Data<ReviewRepository>,
    review_image_repo: web::Data<ReviewImageRepository>,
    path: web::Path<i64>,
    input: web::Json<ReviewImageInput>,
) -> Result<HttpResponse, AppError> {
    let review_id = path.into_inner();
    let review = review_repo
        .find_by_id(review_id)
        .await?
        .ok_or_else(|| AppError::not_found("Review"))?;
    ensure_owner(claims.user_id(), review.user_id)?;

    let url = input.into_inner().validated()?;
    let image = review_image_repo
        .create_within_limit(review_id, &url, MAX_REVIEW_IMAGES)
        .await?
        .ok_or_else(AppError::image_limit_reached)?;

    Ok(HttpResponse::Created().json(ReviewImageSummary::from(image)))
}

pub async fn delete_review_image(
    claims: Claims,
    review_repo: web::Data<ReviewRepository>,
    review_image_repo: web::Data<ReviewImageRepository>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let image_id = path.into_inner();
    let image = review_image_repo
        .find_by_id(image_id)
        .await?
        .ok_or_else(|| AppError::not_found("Review Image"))?;

    let review = review_repo
        .find_by_id(image.review_id)
        .await?
        .ok_or_else(|| AppError::not_found("Review Image"))?;
    ensure_owner(claims.user_id(), review.user_id)?;

    review_image_repo.delete_image(image_id).await?;

    Ok(deleted())
}
