use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub frontend_url: String,

    pub claude_api_url: String,
    pub claude_api_key: String,
    pub claude_model: String,
    pub claude_timeout_secs: u64,

    /// Serve the built-in sample dataset to the demo user when their
    /// collections are empty (reads always fall back to it on store errors).
    pub demo_fallback_enabled: bool,

    /// Per-IP request budget for the analyze endpoint.
    pub analyze_rate_limit: u32,
    pub analyze_rate_window_secs: u64,

    /// Override for the settings blob location; defaults to the platform
    /// data directory.
    pub settings_path: Option<PathBuf>,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            database_url: env::var("DATABASE_URL").expect("DATABASE_URL must be set"),
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".into())
                .parse()
                .expect("PORT must be a number"),
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:5173".into()),

            claude_api_url: env::var("CLAUDE_API_URL")
                .unwrap_or_else(|_| "https://api.anthropic.com/v1/messages".into()),
            claude_api_key: env::var("CLAUDE_API_KEY").unwrap_or_else(|_| String::new()),
            claude_model: env::var("CLAUDE_MODEL")
                .unwrap_or_else(|_| "claude-sonnet-4-20250514".into()),
            claude_timeout_secs: env::var("CLAUDE_TIMEOUT_SECS")
                .unwrap_or_else(|_| "30".into())
                .parse()
                .unwrap_or(30),

            demo_fallback_enabled: env::var("DEMO_FALLBACK_ENABLED")
                .unwrap_or_else(|_| "true".into())
                .parse()
                .unwrap_or(true),

            analyze_rate_limit: env::var("ANALYZE_RATE_LIMIT")
                .unwrap_or_else(|_| "5".into())
                .parse()
                .unwrap_or(5),
            analyze_rate_window_secs: env::var("ANALYZE_RATE_WINDOW_SECS")
                .unwrap_or_else(|_| "60".into())
                .parse()
                .unwrap_or(60),

            settings_path: env::var("SETTINGS_PATH").ok().map(PathBuf::from),
        }
    }

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
