// src/config.rs
use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use url::Url;

use crate::domain::MatchPolicy;
use crate::isochrone::{IsochronePolicy, DEFAULT_BANDS, DEFAULT_TTL};

pub const DEFAULT_GEOCODER_URL: &str = "https://nominatim.openstreetmap.org/";
pub const DEFAULT_ISOCHRONE_URL: &str = "https://api.openrouteservice.org/";
pub const DEFAULT_CATALOG_URL: &str = "http://express.heartrails.com/api/json";
pub const DEFAULT_STATION_SUFFIX: &str = "駅";
/// Ten years.
pub const MAX_TTL_SECS: u64 = 10 * 365 * 24 * 60 * 60;

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub telemetry: TelemetryConfig,
    /// Request header carrying the username set by the signing-in proxy.
    pub identity_header: String,
    pub geocoder: ProviderConfig,
    pub isochrone: ProviderConfig,
    pub isochrone_policy: IsochronePolicy,
    pub catalog_url: Url,
    pub station_suffix: String,
    pub match_policy: MatchPolicy,
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub workers: usize,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub path: String,
    pub schema_path: String,
}

#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Connection settings for one outbound HTTP provider.
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    pub base_url: Url,
    pub api_key: Option<String>,
    pub timeout: Duration,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the config from any key lookup (the process environment in
    /// production, a map in tests).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str, default: &str| -> String {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| default.to_string())
        };
        let secret = |key: &str| -> Option<String> {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let port = parse_num::<u16>("APP_PORT", &get("APP_PORT", "3000"))?;
        let workers = parse_num::<usize>("APP_WORKERS", &get("APP_WORKERS", "8"))?;
        if workers == 0 {
            return Err(ConfigError::Invalid {
                key: "APP_WORKERS",
                reason: "must be at least 1".into(),
            });
        }

        let match_policy_raw = get("MATCH_POLICY", "all-members");
        let match_policy =
            MatchPolicy::parse(&match_policy_raw).ok_or_else(|| ConfigError::Invalid {
                key: "MATCH_POLICY",
                reason: format!(
                    "unknown policy {match_policy_raw:?} (use fixed-pair, paired-group or all-members)"
                ),
            })?;

        let default_bands = DEFAULT_BANDS
            .iter()
            .map(u32::to_string)
            .collect::<Vec<_>>()
            .join(",");
        let bands = parse_bands(&get("ISOCHRONE_BANDS", &default_bands))?;
        let ttl_secs = parse_num::<u64>(
            "ISOCHRONE_TTL_SECS",
            &get("ISOCHRONE_TTL_SECS", &DEFAULT_TTL.as_secs().to_string()),
        )?;
        if ttl_secs == 0 || ttl_secs > MAX_TTL_SECS {
            return Err(ConfigError::Invalid {
                key: "ISOCHRONE_TTL_SECS",
                reason: format!("must be between 1 and {MAX_TTL_SECS}"),
            });
        }

        Ok(Self {
            server: ServerConfig {
                host: get("APP_HOST", "127.0.0.1"),
                port,
                workers,
            },
            database: DatabaseConfig {
                path: get("APP_DB_PATH", "couple_map.sqlite3"),
                schema_path: get("APP_SCHEMA_PATH", "sql/schema.sql"),
            },
            telemetry: TelemetryConfig {
                log_level: get("APP_LOG_LEVEL", "info"),
            },
            identity_header: get("APP_IDENTITY_HEADER", "x-remote-user").to_ascii_lowercase(),
            geocoder: ProviderConfig {
                base_url: parse_base_url("GEOCODER_BASE_URL", &get("GEOCODER_BASE_URL", DEFAULT_GEOCODER_URL))?,
                api_key: secret("GEOCODER_API_KEY"),
                timeout: parse_timeout("GEOCODER_TIMEOUT_SECS", &get("GEOCODER_TIMEOUT_SECS", "10"))?,
            },
            isochrone: ProviderConfig {
                base_url: parse_base_url("ISOCHRONE_BASE_URL", &get("ISOCHRONE_BASE_URL", DEFAULT_ISOCHRONE_URL))?,
                api_key: secret("ISOCHRONE_API_KEY"),
                timeout: parse_timeout("ISOCHRONE_TIMEOUT_SECS", &get("ISOCHRONE_TIMEOUT_SECS", "10"))?,
            },
            isochrone_policy: IsochronePolicy {
                bands,
                ttl: Duration::from_secs(ttl_secs),
            },
            catalog_url: Url::parse(&get("CATALOG_BASE_URL", DEFAULT_CATALOG_URL)).map_err(|e| {
                ConfigError::Invalid {
                    key: "CATALOG_BASE_URL",
                    reason: e.to_string(),
                }
            })?,
            station_suffix: get("STATION_SUFFIX", DEFAULT_STATION_SUFFIX),
            match_policy,
        })
    }
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

fn parse_num<T: std::str::FromStr>(key: &'static str, raw: &str) -> Result<T, ConfigError> {
    raw.parse::<T>().map_err(|_| ConfigError::Invalid {
        key,
        reason: format!("{raw:?} is not a valid number"),
    })
}

fn parse_timeout(key: &'static str, raw: &str) -> Result<Duration, ConfigError> {
    let secs = parse_num::<u64>(key, raw)?;
    if secs == 0 || secs > 120 {
        return Err(ConfigError::Invalid {
            key,
            reason: "timeout must be between 1 and 120 seconds".into(),
        });
    }
    Ok(Duration::from_secs(secs))
}

/// Base URLs always end in '/' so endpoint paths join under them.
fn parse_base_url(key: &'static str, raw: &str) -> Result<Url, ConfigError> {
    let with_slash = if raw.ends_with('/') {
        raw.to_string()
    } else {
        format!("{raw}/")
    };
    Url::parse(&with_slash).map_err(|e| ConfigError::Invalid {
        key,
        reason: e.to_string(),
    })
}

fn parse_bands(raw: &str) -> Result<Vec<u32>, ConfigError> {
    let mut bands = Vec::new();
    for part in raw.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        let band = parse_num::<u32>("ISOCHRONE_BANDS", part)?;
        if band == 0 {
            return Err(ConfigError::Invalid {
                key: "ISOCHRONE_BANDS",
                reason: "bands must be positive".into(),
            });
        }
        bands.push(band);
    }
    if bands.is_empty() {
        return Err(ConfigError::Invalid {
            key: "ISOCHRONE_BANDS",
            reason: "at least one band is required".into(),
        });
    }
    bands.sort_unstable();
    bands.dedup();
    Ok(bands)
}

#[derive(Debug)]
pub enum ConfigError {
    Invalid { key: &'static str, reason: String },
    InvalidHost { source: std::net::AddrParseError },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Invalid { key, reason } => write!(f, "{key}: {reason}"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Invalid { .. } => None,
            ConfigError::InvalidHost { source } => Some(source),
        }
    }
}
