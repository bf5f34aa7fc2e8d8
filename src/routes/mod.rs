use actix_web::{HttpRequest, error, web};

use crate::error::AppError;

pub mod bookings;
pub mod review_images;
pub mod reviews;
pub mod session;
pub mod spot_images;
pub mod spots;
pub mod users;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .app_data(json_config())
            .app_data(query_config())
            .app_data(path_config())
            .configure(users::configure)
            .configure(session::configure)
            .configure(spots::configure)
            .configure(spot_images::configure)
            .configure(reviews::configure)
            .configure(review_images::configure)
            .configure(bookings::configure),
    );
}

/// Malformed JSON bodies answer with the usual error shape.
fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err: error::JsonPayloadError, _req: &HttpRequest| {
        AppError::BadRequest(err.to_string()).into()
    })
}

fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(|err: error::QueryPayloadError, _req: &HttpRequest| {
        AppError::BadRequest(err.to_string()).into()
    })
}

/// Non-numeric ids can never match a row.
fn path_config() -> web::PathConfig {
    web::PathConfig::default().error_handler(|_err: error::PathError, _req: &HttpRequest| {
        AppError::not_found("Resource").into()
    })
}
