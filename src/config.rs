// config.rs
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub environment: String,
    pub points_conversion_hours: i64,
}

impl Config {
    pub fn init() -> Config {
        let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

        let environment = std::env::var("ENVIRONMENT")
            .unwrap_or_else(|_| "development".to_string());

        // Delay before completed task points become convertible (default 24h).
        let points_conversion_hours = std::env::var("POINTS_CONVERSION_HOURS")
            .ok()
            .and_then(|v| v.parse::<i64>().ok())
            .unwrap_or(24);

        Config {
            database_url,
            environment,
            points_conversion_hours,
        }
    }

    /// Non-production environments run both batches once at startup so they
    /// can be exercised without waiting for midnight.
    pub fn run_jobs_on_startup(&self) -> bool {
        self.environment != "production"
    }
}
