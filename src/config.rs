use anyhow::Result;
use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub jwt_expiration_days: i64,
    pub bcrypt_cost: u32,
    pub host: String,
    pub port: u16,
    pub environment: String,
    pub client_origin: String,
    /// Load the demo data set at startup.
    pub seed_demo: bool,
    pub demo_password: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        // Load .env file if it exists
        dotenvy::dotenv().ok();

        Self::from_env_only()
    }

    /// Load configuration from environment variables only (without loading .env files)
    pub fn from_env_only() -> Result<Self> {
        Ok(Config {
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite://spots.db".to_string()),
            jwt_secret: env::var("JWT_SECRET").unwrap_or_else(|_| {
                "change-this-jwt-secret-before-deploying-to-production".to_string()
            }),
            jwt_expiration_days: env::var("JWT_EXPIRATION_DAYS")
                .unwrap_or_else(|_| "7".to_string())
                .parse()
                .unwrap_or(7),
            bcrypt_cost: env::var("BCRYPT_COST")
                .ok()
                .and_then(|cost| cost.parse().ok())
                .unwrap_or(bcrypt::DEFAULT_COST),
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8000".to_string())
                .parse()
                .unwrap_or(8000),
            environment: env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
            client_origin: env::var("CLIENT_ORIGIN")
                .unwrap_or_else(|_| "http://localhost:5173".to_string()),
            seed_demo: env::var("SEED_DEMO")
                .map(|flag| matches!(flag.to_lowercase().as_str(), "1" | "true" | "yes"))
                .unwrap_or(false),
            demo_password: env::var("DEMO_PASSWORD").unwrap_or_else(|_| "password".to_string()),
        })
    }

    /// Fixed configuration for tests; the database url is replaced by the test harness.
    pub fn test_config() -> Self {
        Config {
            database_url: "sqlite::memory:".to_string(),
            jwt_secret: "test-jwt-secret-key-that-is-long-enough".to_string(),
            jwt_expiration_days: 1,
            bcrypt_cost: 4,
            host: "127.0.0.1".to_string(),
            port: 0,
            environment: "test".to_string(),
            client_origin: "http://localhost:5173".to_string(),
            seed_demo: false,
            demo_password: "password".to_string(),
        }
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
