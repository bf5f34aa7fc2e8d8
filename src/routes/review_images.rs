use actix_web::web;

use crate::handlers::review_images;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/review-images")
            .route("/{image_id}", web::delete().to(review_images::delete_review_image)),
    );
}
