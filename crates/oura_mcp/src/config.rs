//! Process configuration for the server binaries.

pub const DEFAULT_BASE_URL: &str = "https://api.ouraring.com";

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub base_url: String,
    pub host: String,
    pub port: u16,
    /// When set, every tool call probes the vendor with the supplied token
    /// before fetching and rejects tokens the vendor answers 401 to.
    pub validate_token: bool,
}

impl ServerConfig {
    pub fn from_env() -> Self {
        Self::from_env_with(|k| std::env::var(k).ok())
    }

    /// Testable helper that reads configuration values using the provided
    /// function. This avoids mutating global environment in tests and keeps
    /// `from_env()` small and safe.
    pub fn from_env_with<F>(mut get: F) -> Self
    where
        F: FnMut(&str) -> Option<String>,
    {
        Self {
            base_url: get("OURA_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            host: get("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: get("PORT").and_then(|s| s.parse().ok()).unwrap_or(3000),
            validate_token: get("OURA_VALIDATE_TOKEN")
                .map(|v| matches!(v.to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
                .unwrap_or(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_env_defaults() {
        let cfg = ServerConfig::from_env_with(|_| None);
        assert_eq!(cfg.base_url, DEFAULT_BASE_URL);
        assert_eq!(cfg.host, "0.0.0.0");
        assert_eq!(cfg.port, 3000);
        assert!(!cfg.validate_token);
    }

    #[test]
    fn from_env_reads_values() {
        let get = |k: &str| match k {
            "OURA_BASE_URL" => Some("http://localhost:8080".into()),
            "HOST" => Some("127.0.0.1".into()),
            "PORT" => Some("9000".into()),
            "OURA_VALIDATE_TOKEN" => Some("true".into()),
            _ => None,
        };
        let cfg = ServerConfig::from_env_with(get);
        assert_eq!(cfg.base_url, "http://localhost:8080");
        assert_eq!(cfg.host, "127.0.0.1");
        assert_eq!(cfg.port, 9000);
        assert!(cfg.validate_token);
    }

    #[test]
    fn bad_port_falls_back_to_default() {
        let cfg = ServerConfig::from_env_with(|k| match k {
            "PORT" => Some("not-a-port".into()),
            _ => None,
        });
        assert_eq!(cfg.port, 3000);
    }
}
