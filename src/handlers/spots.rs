use actix_web::{HttpResponse, web};

use crate::database::models::{
    Spot, SpotDetails, SpotImageSummary, SpotInput, SpotListItem, SpotListResponse,
};
use crate::database::repositories::{
    ReviewRepository, SpotImageRepository, SpotRepository, UserRepository,
};
use crate::error::AppError;
use crate::handlers::shared::{deleted, ensure_owner};
use crate::services::Claims;
use crate::services::ratings::{average_stars, round_to_tenth};
use crate::validation::SpotQueryParams;

/// Decorates spots with their average rating and preview image.
async fn list_items(
    spots: Vec<Spot>,
    spot_image_repo: &SpotImageRepository,
    review_repo: &ReviewRepository,
    round_ratings: bool,
) -> Result<Vec<SpotListItem>, AppError> {
    let ids: Vec<i64> = spots.iter().map(|s| s.id).collect();
    let mut previews = spot_image_repo.preview_urls(&ids).await?;
    let stars = review_repo.stars_for_spots(&ids).await?;

    let items = spots
        .into_iter()
        .map(|spot| {
            let avg = stars
                .get(&spot.id)
                .and_then(|ratings| average_stars(ratings));
            let avg_rating = if round_ratings {
                avg.map(round_to_tenth)
            } else {
                avg
            };

            SpotListItem {
                preview_image: previews.remove(&spot.id),
                avg_rating,
                spot,
            }
        })
        .collect();

    Ok(items)
}

pub async fn get_spots(
    spot_repo: web::Data<SpotRepository>,
    spot_image_repo: web::Data<SpotImageRepository>,
    review_repo: web::Data<ReviewRepository>,
    query: web::Query<SpotQueryParams>,
) -> Result<HttpResponse, AppError> {
    let filters = query.validate()?;
    let spots = spot_repo.list_spots(&filters).await?;
    let items = list_items(spots, &spot_image_repo, &review_repo, true).await?;

    Ok(HttpResponse::Ok().json(SpotListResponse {
        spots: items,
        page: Some(filters.page),
        size: Some(filters.size),
    }))
}

pub async fn get_current_user_spots(
    claims: Claims,
    spot_repo: web::Data<SpotRepository>,
    spot_image_repo: web::Data<SpotImageRepository>,
    review_repo: web::Data<ReviewRepository>,
) -> Result<HttpResponse, AppError> {
    let spots = spot_repo.find_by_owner(claims.user_id()).await?;
    let items = list_items(spots, &spot_image_repo, &review_repo, false).await?;

    Ok(HttpResponse::Ok().json(SpotListResponse {
        spots: items,
        page: None,
        size: None,
    }))
}

pub async fn get_spot(
    spot_repo: web::Data<SpotRepository>,
    spot_image_repo: web::Data<SpotImageRepository>,
    review_repo: web::Data<ReviewRepository>,
    user_repo: web::Data<UserRepository>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let spot_id = path.into_inner();
    let spot = spot_repo
        .find_by_id(spot_id)
        .await?
        .ok_or_else(|| AppError::not_found("Spot"))?;

    let stars = review_repo.stars_for_spot(spot_id).await?;
    let images = spot_image_repo.find_by_spot(spot_id).await?;
    let owner = user_repo.find_summary(spot.owner_id).await?;

    Ok(HttpResponse::Ok().json(SpotDetails {
        num_reviews: stars.len() as i64,
        avg_star_rating: average_stars(&stars),
        spot_images: images.into_iter().map(SpotImageSummary::from).collect(),
        owner,
        spot,
    }))
}

pub async fn create_spot(
    claims: Claims,
    spot_repo: web::Data<SpotRepository>,
    input: web::Json<SpotInput>,
) -> Result<HttpResponse, AppError> {
    let fields = input.into_inner().validated()?;
    let spot = spot_repo.create_spot(claims.user_id(), &fields).await?;
    log::info!("User {} created spot {}", claims.user_id(), spot.id);

    Ok(HttpResponse::Created().json(spot))
}

pub async fn update_spot(
    claims: Claims,
    spot_repo: web::Data<SpotRepository>,
    path: web::Path<i64>,
    input: web::Json<SpotInput>,
) -> Result<HttpResponse, AppError> {
    let spot_id = path.into_inner();
    let spot = spot_repo
        .find_by_id(spot_id)
        .await?
        .ok_or_else(|| AppError::not_found("Spot"))?;
    ensure_owner(claims.user_id(), spot.owner_id)?;

    let fields = input.into_inner().validated()?;
    let spot = spot_repo
        .update_spot(spot_id, &fields)
        .await?
        .ok_or_else(|| AppError::not_found("Spot"))?;

    Ok(HttpResponse::Ok().json(spot))
}

pub async fn delete_spot(
    claims: Claims,
    spot_repo: web::Data<SpotRepository>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let spot_id = path.into_inner();
    let spot = spot_repo
        .find_by_id(spot_id)
        .await?
        .ok_or_else(|| AppError::not_found("Spot"))?;
    ensure_owner(claims.user_id(), spot.owner_id)?;

    spot_repo.delete_spot(spot_id).await?;
    log::info!("User {} deleted spot {}", claims.user_id(), spot_id);

    Ok(deleted())
}
