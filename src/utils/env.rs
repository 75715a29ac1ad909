#[derive(Clone, Debug)]
pub struct EnvVars {
    pub database_url: String,
    pub db_max_connections: u32,
    pub port: u16,
    pub backup_dir: String,
    // Day boundaries are computed in this fixed offset (minutes east of UTC)
    pub utc_offset_minutes: i32,
    pub fetch_timeout_secs: u64,
    pub day_summary_cache_ttl_secs: u64,
    // Upstream providers (override for testing)
    pub bluelytics_api_base_url: String,
    pub ripio_api_base_url: String,
    pub dolar_api_base_url: String,
}

impl Default for EnvVars {
    fn default() -> Self {
        Self {
            database_url: std::env::var("DATABASE_URL")
                .ok()
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| "sqlite://db.sqlite".to_string()),
            db_max_connections: std::env::var("DB_MAX_CONNECTIONS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(5),
            port: std::env::var("PORT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(6000),
            backup_dir: std::env::var("BACKUP_DIR").unwrap_or_else(|_| "bkp".to_string()),
            utc_offset_minutes: std::env::var("UTC_OFFSET_MINUTES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(0),
            fetch_timeout_secs: std::env::var("FETCH_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(10),
            day_summary_cache_ttl_secs: std::env::var("DAY_SUMMARY_CACHE_TTL_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(30),
            bluelytics_api_base_url: std::env::var("BLUELYTICS_API_BASE_URL")
                .unwrap_or_else(|_| "https://api.bluelytics.com.ar".to_string()),
            ripio_api_base_url: std::env::var("RIPIO_API_BASE_URL")
                .unwrap_or_else(|_| "https://app.ripio.com".to_string()),
            dolar_api_base_url: std::env::var("DOLAR_API_BASE_URL")
                .unwrap_or_else(|_| "https://api-dolar-argentina.herokuapp.com".to_string()),
        }
    }
}
