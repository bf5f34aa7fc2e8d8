use std::collections::HashMap;

use actix_web::{HttpResponse, web};

use crate::database::models::{
    Review, ReviewImageSummary, ReviewInput, ReviewWithDetails, ReviewsResponse, SpotSummary,
};
use crate::database::repositories::{
    ReviewImageRepository, ReviewRepository, SpotImageRepository, SpotRepository, UserRepository,
};
use crate::error::AppError;
use crate::handlers::shared::{deleted, ensure_owner};
use crate::services::Claims;

/// Attaches author and images to each review.
async fn with_details(
    reviews: Vec<Review>,
    user_repo: &UserRepository,
    review_image_repo: &ReviewImageRepository,
    spots: &HashMap<i64, SpotSummary>,
) -> Result<Vec<ReviewWithDetails>, AppError> {
    let review_ids: Vec<i64> = reviews.iter().map(|r| r.id).collect();
    let user_ids: Vec<i64> = reviews.iter().map(|r| r.user_id).collect();

    let users = user_repo.find_summaries(&user_ids).await?;
    let mut images = review_image_repo.find_by_reviews(&review_ids).await?;

    let details = reviews
        .into_iter()
        .map(|review| ReviewWithDetails {
            user: users.get(&review.user_id).cloned(),
            spot: spots.get(&review.spot_id).cloned(),
            review_images: images
                .remove(&review.id)
                .unwrap_or_default()
                .into_iter()
                .map(ReviewImageSummary::from)
                .collect(),
            review,
        })
        .collect();

    Ok(details)
}

pub async fn get_current_user_reviews(
    claims: Claims,
    review_repo: web::Data<ReviewRepository>,
    review_image_repo: web::Data<ReviewImageRepository>,
    user_repo: web::Data<UserRepository>,
    spot_repo: web::Data<SpotRepository>,
    spot_image_repo: web::Data<SpotImageRepository>,
) -> Result<HttpResponse, AppError> {
    let reviews = review_repo.find_by_user(claims.user_id()).await?;

    let spot_ids: Vec<i64> = reviews.iter().map(|r| r.spot_id).collect();
    let mut previews = spot_image_repo.preview_urls(&spot_ids).await?;
    let spots: HashMap<i64, SpotSummary> = spot_repo
        .find_by_ids(&spot_ids)
        .await?
        .into_iter()
        .map(|(id, spot)| (id, SpotSummary::new(spot, previews.remove(&id))))
        .collect();

    let reviews = with_details(reviews, &user_repo, &review_image_repo, &spots).await?;

    Ok(HttpResponse::Ok().json(ReviewsResponse { reviews }))
}

pub async fn get_spot_reviews(
    spot_repo: web::Data<SpotRepository>,
    review_repo: web::Data<ReviewRepository>,
    review_image_repo: web::Data<ReviewImageRepository>,
    user_repo: web::Data<UserRepository>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let spot_id = path.into_inner();
    spot_repo
        .find_by_id(spot_id)
        .await?
        .ok_or_else(|| AppError::not_found("Spot"))?;

    let reviews = review_repo.find_by_spot(spot_id).await?;
    let reviews = with_details(reviews, &user_repo, &review_image_repo, &HashMap::new()).await?;

    Ok(HttpResponse::Ok().json(ReviewsResponse { reviews }))
}

pub async fn create_review(
    claims: Claims,
    spot_repo: web::Data<SpotRepository>,
    review_repo: web::Data<ReviewRepository>,
    path: web::Path<i64>,
    input: web::Json<ReviewInput>,
) -> Result<HttpResponse, AppError> {
    let spot_id = path.into_inner();
    spot_repo
        .find_by_id(spot_id)
        .await?
        .ok_or_else(|| AppError::not_found("Spot"))?;

    if review_repo
        .find_by_user_and_spot(claims.user_id(), spot_id)
        .await?
        .is_some()
    {
        return Err(AppError::duplicate_review());
    }

    let fields = input.into_inner().validated()?;
    let review = review_repo
        .create_review(claims.user_id(), spot_id, &fields)
        .await?
        .ok_or_else(AppError::duplicate_review)?;

    Ok(HttpResponse::Created().json(review))
}

pub async fn update_review(
    claims: Claims,
    review_repo: web::Data<ReviewRepository>,
    path: web::Path<i64>,
    input: web::Json<ReviewInput>,
) -> Result<HttpResponse, AppError> {
    let review_id = path.into_inner();
    let review = review_repo
        .find_by_id(review_id)
        .await?
        .ok_or_else(|| AppError::not_found("Review"))?;
    ensure_owner(claims.user_id(), review.user_id)?;

    let fields = input.into_inner().validated()?;
    let review = review_repo
        .update_review(review_id, &fields)
        .await?
        .ok_or_else(|| AppError::not_found("Review"))?;

    Ok(HttpResponse::Ok().json(review))
}

pub async fn delete_review(
    claims: Claims,
    review_repo: web::Data<ReviewRepository>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let review_id = path.into_inner();
    let review = review_repo
        .find_by_id(review_id)
        .await?
        .ok_or_else(|| AppError::not_found("Review"))?;
    ensure_owner(claims.user_id(), review.user_id)?;

    review_repo.delete_review(review_id).await?;

    Ok(deleted())
}
