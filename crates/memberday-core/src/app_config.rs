use std::net::{IpAddr, SocketAddr};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub bind_host: IpAddr,
    pub port: u16,
    pub log_level: String,
    /// Allowed CORS origins. Empty means any origin.
    pub cors_origins: Vec<String>,
    pub holiday_url: String,
    pub party_world_url: String,
    pub scraper_request_timeout_secs: u64,
    pub scraper_user_agent: String,
}

impl AppConfig {
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind_host, self.port)
    }
}
