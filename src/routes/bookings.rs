use actix_web::web;

use crate::handlers::bookings;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/bookings")
            .route("/current", web::get().to(bookings::get_current_user_bookings))
            .route("/{booking_id}", web::put().to(bookings::update_booking))
            .route("/{booking_id}", web::delete().to(bookings::delete_booking)),
    );
}
