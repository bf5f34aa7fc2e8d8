use actix_web::web;

use crate::handlers::spot_images;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/spot-images")
            .route("/{image_id}", web::delete().to(spot_images::delete_spot_image)),
    );
}
