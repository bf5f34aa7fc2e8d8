use actix_web::{HttpResponse, web};

use crate::database::models::{SpotImageInput, SpotImageSummary};
use crate::database::repositories::{SpotImageRepository, SpotRepository};
use crate::error::AppError;
use crate::handlers::shared::{deleted, ensure_owner};
use crate::services::Claims;

pub async fn add_spot_image(
    claims: Claims,
    spot_repo: web::Data<SpotRepository>,
    spot_image_repo: web::Data<SpotImageRepository>,
    path: web::Path<i64>,
    input: web::Json<SpotImageInput>,
) -> Result<HttpResponse, AppError> {
    let spot_id = path.into_inner();
    let spot = spot_repo
        .find_by_id(spot_id)
        .await?
        .ok_or_else(|| AppError::not_found("Spot"))?;
    ensure_owner(claims.user_id(), spot.owner_id)?;

    let (url, preview) = input.into_inner().validated()?;
    let image = spot_image_repo.create_image(spot_id, &url, preview).await?;

    Ok(HttpResponse::Created().json(SpotImageSummary::from(image)))
}

pub async fn delete_spot_image(
    claims: Claims,
    spot_repo: web::Data<SpotRepository>,
    spot_image_repo: web::Data<SpotImageRepository>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let image_id = path.into_inner();
    let image = spot_image_repo
        .find_by_id(image_id)
        .await?
        .ok_or_else(|| AppError::not_found("Spot Image"))?;

    // The image row cascades away with its spot, so a missing spot means a missing image.
    let spot = spot_repo
        .find_by_id(image.spot_id)
        .await?
        .ok_or_else(|| AppError::not_found("Spot Image"))?;
    ensure_owner(claims.user_id(), spot.owner_id)?;

    spot_image_repo.delete_image(image_id).await?;

    Ok(deleted())
}
