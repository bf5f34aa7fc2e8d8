use actix_web::web;

use crate::handlers::session;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/session")
            .route("", web::post().to(session::login))
            .route("", web::get().to(session::restore_user))
            .route("", web::delete().to(session::logout)),
    );
}
