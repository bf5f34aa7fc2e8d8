use actix_web::web;

use crate::handlers::{bookings, reviews, spot_images, spots};

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/spots")
            .route("", web::get().to(spots::get_spots))
            .route("", web::post().to(spots::create_spot))
            // Must precede "/{spot_id}" so "current" is not parsed as an id.
            .route("/current", web::get().to(spots::get_current_user_spots))
            .route("/{spot_id}", web::get().to(spots::get_spot))
            .route("/{spot_id}", web::put().to(spots::update_spot))
            .route("/{spot_id}", web::delete().to(spots::delete_spot))
            .route("/{spot_id}/images", web::post().to(spot_images::add_spot_image))
            .route("/{spot_id}/reviews", web::get().to(reviews::get_spot_reviews))
            .route("/{spot_id}/reviews", web::post().to(reviews::create_review))
            .route("/{spot_id}/bookings", web::get().to(bookings::get_spot_bookings))
            .route("/{spot_id}/bookings", web::post().to(bookings::create_booking)),
    );
}
