use actix_web::web;

use crate::handlers::{review_images, reviews};

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/reviews")
            .route("/current", web::get().to(reviews::get_current_user_reviews))
            .route("/{review_id}", web::put().to(reviews::update_review))
            .route("/{review_id}", web::delete().to(reviews::delete_review))
            .route(
                "/{review_id}/images",
                web::post().to(review_images::add_review_image),
            ),
    );
}
