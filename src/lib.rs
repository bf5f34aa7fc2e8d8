pub mod config;
pub mod database;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod services;
pub mod validation;

use actix_web::{HttpResponse, Responder, get, web};
use sqlx::SqlitePool;

pub use config::Config;
use database::repositories::{
    BookingRepository, ReviewImageRepository, ReviewRepository, SpotImageRepository,
    SpotRepository, UserRepository,
};
pub use error::AppError;
pub use services::AuthService;

/// Shared handles registered as `web::Data` on every worker.
#[derive(Clone)]
pub struct AppState {
    pub config: web::Data<Config>,
    pub auth_service: web::Data<AuthService>,
    pub user_repository: web::Data<UserRepository>,
    pub spot_repository: web::Data<SpotRepository>,
    pub spot_image_repository: web::Data<SpotImageRepository>,
    pub review_repository: web::Data<ReviewRepository>,
    pub review_image_repository: web::Data<ReviewImageRepository>,
    pub booking_repository: web::Data<BookingRepository>,
}

impl AppState {
    pub fn new(pool: SqlitePool, config: Config) -> Self {
        let user_repository = UserRepository::new(pool.clone());
        let auth_service = AuthService::new(user_repository.clone(), config.clone());

        Self {
            config: web::Data::new(config),
            auth_service: web::Data::new(auth_service),
            user_repository: web::Data::new(user_repository),
            spot_repository: web::Data::new(SpotRepository::new(pool.clone())),
            spot_image_repository: web::Data::new(SpotImageRepository::new(pool.clone())),
            review_repository: web::Data::new(ReviewRepository::new(pool.clone())),
            review_image_repository: web::Data::new(ReviewImageRepository::new(pool.clone())),
            booking_repository: web::Data::new(BookingRepository::new(pool)),
        }
    }

    /// Registers app data, the health check and the `/api` routes.
    pub fn register(&self, cfg: &mut web::ServiceConfig) {
        cfg.app_data(self.config.clone())
            .app_data(self.auth_service.clone())
            .app_data(self.user_repository.clone())
            .app_data(self.spot_repository.clone())
            .app_data(self.spot_image_repository.clone())
            .app_data(self.review_repository.clone())
            .app_data(self.review_image_repository.clone())
            .app_data(self.booking_repository.clone())
            .service(health)
            .configure(routes::configure);
    }
}

#[get("/health")]
async fn health() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "ok",
        "timestamp": chrono::Utc::now()
    }))
}
