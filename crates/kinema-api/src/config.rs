//! API configuration.

/// API server configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Server host
    pub host: String,
    /// Server port
    pub port: u16,
    /// Bucket admins upload raw sources into
    pub uploads_bucket: String,
    /// Bucket subtitle tracks are staged in before processing
    pub staging_bucket: String,
    /// Bucket holding published packages and tracks
    pub media_bucket: String,
    /// Max request body size
    pub max_body_size: usize,
    /// Environment (development/production)
    pub environment: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            uploads_bucket: "uploads".to_string(),
            staging_bucket: "staging".to_string(),
            media_bucket: "media".to_string(),
            max_body_size: 10 * 1024 * 1024,
            environment: "development".to_string(),
        }
    }
}

impl ApiConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        Self {
            host: std::env::var("API_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: std::env::var("API_PORT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(8000),
            uploads_bucket: std::env::var("UPLOADS_BUCKET")
                .unwrap_or_else(|_| "uploads".to_string()),
            staging_bucket: std::env::var("STAGING_BUCKET")
                .unwrap_or_else(|_| "staging".to_string()),
            media_bucket: std::env::var("MEDIA_BUCKET").unwrap_or_else(|_| "media".to_string()),
            max_body_size: std::env::var("MAX_BODY_SIZE")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(10 * 1024 * 1024),
            environment: std::env::var("ENVIRONMENT")
                .unwrap_or_else(|_| "development".to_string()),
        }
    }

    /// Check if running in production mode.
    pub fn is_production(&self) -> bool {
        self.environment.to_lowercase() == "production"
    }
}
