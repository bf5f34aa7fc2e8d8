use actix_cors::Cors;
use actix_web::{App, HttpServer, middleware::Logger};
use anyhow::Result;

use spots_be::database::init_database;
use spots_be::database::seed::seed_demo_data;
use spots_be::middleware::RequestId;
use spots_be::{AppState, Config};

#[actix_web::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize logger
    env_logger::init();

    log::info!("Starting spots API server...");

    let config = Config::from_env()?;
    log::info!(
        "Configuration loaded (environment: {})",
        config.environment
    );

    let pool = init_database(&config.database_url).await?;
    log::info!("Database initialized");

    if config.seed_demo {
        seed_demo_data(&pool, &config).await?;
    }

    let server_address = config.server_address();
    let client_origin = config.client_origin.clone();
    let state = AppState::new(pool, config);

    log::info!("Server starting on http://{}", server_address);

    HttpServer::new(move || {
        App::new()
            .wrap(
                Cors::default()
                    .allowed_origin(&client_origin)
                    .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
                    .allowed_headers(vec![
                        "Authorization",
                        "Content-Type",
                        "Accept",
                        "X-Requested-With",
                        "X-Correlation-ID",
                    ])
                    .supports_credentials()
                    .max_age(3600),
            )
            .wrap(RequestId)
            .wrap(Logger::new(
                r#"%a "%r" %s %b "%{Referer}i" "%{User-Agent}i" %T correlation_id=%{x-correlation-id}o"#,
            ))
            .configure(|cfg| state.register(cfg))
    })
    .bind(&server_address)?
    .run()
    .await
    .map_err(|e| anyhow::anyhow!("Server error: {}", e))
}
