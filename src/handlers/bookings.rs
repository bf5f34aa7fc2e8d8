use actix_web::{HttpResponse, web};

use super::today;
use crate::database::models::{
    BookingInput, BookingWithSpot, BookingWithUser, BookingWrite, BookingsResponse,
    GuestBookingView, SpotBookingEntry, SpotSummary,
};
use crate::database::repositories::{
    BookingRepository, SpotImageRepository, SpotRepository, UserRepository,
};
use crate::error::AppError;
use crate::handlers::shared::{deleted, ensure_owner};
use crate::services::Claims;

pub async fn get_current_user_bookings(
    claims: Claims,
    booking_repo: web::Data<BookingRepository>,
    spot_repo: web::Data<SpotRepository>,
    spot_image_repo: web::Data<SpotImageRepository>,
) -> Result<HttpResponse, AppError> {
    let bookings = booking_repo.find_by_user(claims.user_id()).await?;

    let spot_ids: Vec<i64> = bookings.iter().map(|b| b.spot_id).collect();
    let spots = spot_repo.find_by_ids(&spot_ids).await?;
    let previews = spot_image_repo.preview_urls(&spot_ids).await?;

    let bookings = bookings
        .into_iter()
        .map(|booking| {
            let spot = spots.get(&booking.spot_id).cloned().map(|spot| {
                let preview = previews.get(&spot.id).cloned();
                SpotSummary::new(spot, preview)
            });
            BookingWithSpot::new(booking, spot)
        })
        .collect();

    Ok(HttpResponse::Ok().json(BookingsResponse::<BookingWithSpot> { bookings }))
}

/// The owner sees every booking with its guest; anyone else only the dates
/// of their own bookings.
pub async fn get_spot_bookings(
    claims: Claims,
    booking_repo: web::Data<BookingRepository>,
    spot_repo: web::Data<SpotRepository>,
    user_repo: web::Data<UserRepository>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let spot_id = path.into_inner();
    let spot = spot_repo
        .find_by_id(spot_id)
        .await?
        .ok_or_else(|| AppError::not_found("Spot"))?;

    let bookings: Vec<SpotBookingEntry> = if spot.owner_id == claims.user_id() {
        let bookings = booking_repo.find_by_spot(spot_id).await?;
        let user_ids: Vec<i64> = bookings.iter().map(|b| b.user_id).collect();
        let users = user_repo.find_summaries(&user_ids).await?;

        bookings
            .into_iter()
            .map(|booking| {
                SpotBookingEntry::Owner(BookingWithUser {
                    user: users.get(&booking.user_id).cloned(),
                    booking,
                })
            })
            .collect()
    } else {
        booking_repo
            .find_by_spot_and_user(spot_id, claims.user_id())
            .await?
            .into_iter()
            .map(|booking| SpotBookingEntry::Guest(GuestBookingView::from(booking)))
            .collect()
    };

    Ok(HttpResponse::Ok().json(BookingsResponse { bookings }))
}

pub async fn create_booking(
    claims: Claims,
    booking_repo: web::Data<BookingRepository>,
    spot_repo: web::Data<SpotRepository>,
    path: web::Path<i64>,
    input: web::Json<BookingInput>,
) -> Result<HttpResponse, AppError> {
    let spot_id = path.into_inner();
    let spot = spot_repo
        .find_by_id(spot_id)
        .await?
        .ok_or_else(|| AppError::not_found("Spot"))?;

    // Owners cannot book their own spot.
    if spot.owner_id == claims.user_id() {
        return Err(AppError::Forbidden);
    }

    let (start_date, end_date) = input.validated(today())?;

    match booking_repo
        .create_booking(spot_id, claims.user_id(), start_date, end_date)
        .await?
    {
        BookingWrite::Saved(booking) => {
            log::info!(
                "User {} booked spot {} from {} to {}",
                claims.user_id(),
                spot_id,
                start_date,
                end_date
            );
            Ok(HttpResponse::Created().json(booking))
        }
        BookingWrite::Conflict => Err(AppError::booking_conflict()),
    }
}

pub async fn update_booking(
    claims: Claims,
    booking_repo: web::Data<BookingRepository>,
    path: web::Path<i64>,
    input: web::Json<BookingInput>,
) -> Result<HttpResponse, AppError> {
    let booking_id = path.into_inner();
    let booking = booking_repo
        .find_by_id(booking_id)
        .await?
        .ok_or_else(|| AppError::not_found("Booking"))?;
    ensure_owner(claims.user_id(), booking.user_id)?;

    let today = today();
    if booking.is_past(today) {
        return Err(AppError::BadRequest(
            "Past bookings can't be modified".to_string(),
        ));
    }

    let (start_date, end_date) = input.validated(today)?;

    match booking_repo
        .update_dates(&booking, start_date, end_date)
        .await?
    {
        BookingWrite::Saved(booking) => Ok(HttpResponse::Ok().json(booking)),
        BookingWrite::Conflict => Err(AppError::booking_conflict()),
    }
}

pub async fn delete_booking(
    claims: Claims,
    booking_repo: web::Data<BookingRepository>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let booking_id = path.into_inner();
    let booking = booking_repo
        .find_by_id(booking_id)
        .await?
        .ok_or_else(|| AppError::not_found("Booking"))?;
    ensure_owner(claims.user_id(), booking.user_id)?;

    if booking.has_started(today()) {
        return Err(AppError::BadRequest(
            "Bookings that have been started can't be deleted".to_string(),
        ));
    }

    booking_repo.delete_booking(booking_id).await?;

    Ok(deleted())
}
