use std::net::SocketAddr;
use std::path::PathBuf;

/// Application-level constants
pub const APP_NAME: &str = "ClinicRecords";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Environment variables read at startup.
pub const ENV_BIND_ADDR: &str = "CLINIC_BIND_ADDR";
pub const ENV_DB_PATH: &str = "CLINIC_DB_PATH";
pub const ENV_LOG: &str = "CLINIC_LOG";

pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:5000";

/// Get the application data directory.
/// `~/ClinicRecords/`, or the working directory when no home is known.
pub fn app_data_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_NAME)
}

/// Default database file location
pub fn default_db_path() -> PathBuf {
    app_data_dir().join("clinic.db")
}

/// Log filter used when neither `RUST_LOG` nor `CLINIC_LOG` is set.
pub fn default_log_filter() -> String {
    std::env::var(ENV_LOG).unwrap_or_else(|_| "clinic_records=info,tower_http=info".into())
}

/// Runtime settings for the HTTP server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    pub db_path: PathBuf,
}

impl ServerConfig {
    /// Read settings from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from any key lookup. Unparseable values fall back to
    /// the defaults with a warning.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let default_addr: SocketAddr = DEFAULT_BIND_ADDR
            .parse()
            .unwrap_or_else(|_| SocketAddr::from(([127, 0, 0, 1], 5000)));

        let bind_addr = match lookup(ENV_BIND_ADDR) {
            Some(raw) => raw.trim().parse().unwrap_or_else(|e| {
                tracing::warn!(value = %raw, error = %e, "Invalid {ENV_BIND_ADDR}, using default");
                default_addr
            }),
            None => default_addr,
        };

        let db_path = lookup(ENV_DB_PATH)
            .map(|raw| raw.trim().to_string())
            .filter(|raw| !raw.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(default_db_path);

        Self { bind_addr, db_path }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn db_path_under_app_data() {
        let path = default_db_path();
        assert!(path.starts_with(app_data_dir()));
        assert!(path.ends_with("clinic.db"));
    }

    #[test]
    fn defaults_when_unset() {
        let config = ServerConfig::default();
        assert_eq!(config.bind_addr.to_string(), DEFAULT_BIND_ADDR);
        assert_eq!(config.db_path, default_db_path());
    }

    #[test]
    fn env_values_override_defaults() {
        let config = ServerConfig::from_lookup(|key| match key {
            ENV_BIND_ADDR => Some("0.0.0.0:8080".into()),
            ENV_DB_PATH => Some("/tmp/clinic-test.db".into()),
            _ => None,
        });
        assert_eq!(config.bind_addr.port(), 8080);
        assert_eq!(config.db_path, PathBuf::from("/tmp/clinic-test.db"));
    }

    #[test]
    fn invalid_bind_addr_falls_back() {
        let config = ServerConfig::from_lookup(|key| match key {
            ENV_BIND_ADDR => Some("not-an-address".into()),
            ENV_DB_PATH => Some("  ".into()),
            _ => None,
        });
        assert_eq!(config.bind_addr.to_string(), DEFAULT_BIND_ADDR);
        assert_eq!(config.db_path, default_db_path());
    }

    #[test]
    fn app_version_matches_cargo() {
        assert_eq!(APP_VERSION, "0.1.0");
    }
}
