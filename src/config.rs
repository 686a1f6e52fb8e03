//! Environment-driven application configuration.
//!
//! All knobs come from environment variables so that deployments configure
//! the service without a file on disk. Database settings accept either a
//! full `DATABASE_URL` or the individual `DB_*` parts.

use std::env;
use thiserror::Error;

/// Errors returned while loading configuration from the environment.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A required environment variable is missing.
    #[error("missing required environment variable {0}")]
    MissingVar(&'static str),

    /// An environment variable holds a value that fails to parse.
    #[error("environment variable {name} has invalid value '{value}'")]
    InvalidVar {
        /// The variable name.
        name: &'static str,
        /// The offending value.
        value: String,
    },
}

/// Top-level application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Database connection settings.
    pub database: DatabaseConfig,
    /// Token signing settings.
    pub auth: AuthTokenConfig,
    /// Route-planning tuning parameters.
    pub dispatch: DispatchTuning,
    /// Log filter directive, e.g. `info` or `fieldline=debug`.
    pub log_filter: String,
}

impl AppConfig {
    /// Loads the full configuration from the environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a required variable is missing or a
    /// numeric variable fails to parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            database: DatabaseConfig::from_env()?,
            auth: AuthTokenConfig::from_env()?,
            dispatch: DispatchTuning::from_env()?,
            log_filter: optional_var("LOG_LEVEL").unwrap_or_else(|| "info".to_owned()),
        })
    }
}

/// PostgreSQL connection settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    /// Full connection URL; assembled from parts when `DATABASE_URL` is
    /// absent.
    url: String,
    /// Connection pool size.
    pub pool_size: u32,
}

impl DatabaseConfig {
    /// Default pool size, matching the original deployment's five
    /// pooled connections.
    const DEFAULT_POOL_SIZE: u32 = 5;

    /// Loads database settings from the environment.
    ///
    /// `DATABASE_URL` wins when present; otherwise the URL is assembled from
    /// `DB_HOST`, `DB_PORT`, `DB_NAME`, `DB_USER`, and `DB_PASSWORD`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when neither a URL nor the individual parts
    /// are available, or when `DB_PORT`/`DB_POOL_SIZE` fail to parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        let pool_size = parse_var("DB_POOL_SIZE", Self::DEFAULT_POOL_SIZE)?;

        if let Some(url) = optional_var("DATABASE_URL") {
            return Ok(Self { url, pool_size });
        }

        let host = required_var("DB_HOST")?;
        let port: u16 = parse_var("DB_PORT", 5432)?;
        let name = required_var("DB_NAME")?;
        let user = required_var("DB_USER")?;
        let password = required_var("DB_PASSWORD")?;

        Ok(Self {
            url: format!("postgres://{user}:{password}@{host}:{port}/{name}"),
            pool_size,
        })
    }

    /// Returns the connection URL.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }
}

/// JWT signing configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthTokenConfig {
    /// Secret for access token signatures.
    pub access_secret: String,
    /// Secret for refresh token signatures; distinct from the access secret
    /// so the two token kinds can never validate against each other's key.
    pub refresh_secret: String,
    /// Access token lifetime in minutes.
    pub access_ttl_minutes: i64,
    /// Refresh token lifetime in minutes.
    pub refresh_ttl_minutes: i64,
}

impl AuthTokenConfig {
    /// Default access token lifetime.
    const DEFAULT_ACCESS_TTL_MINUTES: i64 = 15;
    /// Default refresh token lifetime (seven days).
    const DEFAULT_REFRESH_TTL_MINUTES: i64 = 7 * 24 * 60;

    /// Loads token settings from `JWT_SECRET`, `JWT_REFRESH_SECRET`, and the
    /// optional TTL overrides.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a secret is missing or a TTL fails to
    /// parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            access_secret: required_var("JWT_SECRET")?,
            refresh_secret: required_var("JWT_REFRESH_SECRET")?,
            access_ttl_minutes: parse_var(
                "ACCESS_TOKEN_TTL_MINUTES",
                Self::DEFAULT_ACCESS_TTL_MINUTES,
            )?,
            refresh_ttl_minutes: parse_var(
                "REFRESH_TOKEN_TTL_MINUTES",
                Self::DEFAULT_REFRESH_TTL_MINUTES,
            )?,
        })
    }
}

/// Route-planning tuning parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct DispatchTuning {
    /// Assumed average driving speed for the haversine estimator, km/h.
    pub average_speed_kmh: f64,
    /// Multiplier applied to travel times when traffic awareness is on.
    pub traffic_peak_factor: f64,
    /// Fuel price in cents per litre for route cost estimates.
    pub fuel_price_cents_per_litre: u32,
    /// Assumed vehicle consumption in litres per 100 km.
    pub litres_per_100_km: f64,
}

impl Default for DispatchTuning {
    fn default() -> Self {
        Self {
            average_speed_kmh: 40.0,
            traffic_peak_factor: 1.25,
            fuel_price_cents_per_litre: 180,
            litres_per_100_km: 9.5,
        }
    }
}

impl DispatchTuning {
    /// Loads tuning parameters from the environment, falling back to the
    /// defaults for any variable that is absent.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a present variable fails to parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        Ok(Self {
            average_speed_kmh: parse_var("DISPATCH_AVERAGE_SPEED_KMH", defaults.average_speed_kmh)?,
            traffic_peak_factor: parse_var(
                "DISPATCH_TRAFFIC_PEAK_FACTOR",
                defaults.traffic_peak_factor,
            )?,
            fuel_price_cents_per_litre: parse_var(
                "DISPATCH_FUEL_PRICE_CENTS_PER_LITRE",
                defaults.fuel_price_cents_per_litre,
            )?,
            litres_per_100_km: parse_var("DISPATCH_LITRES_PER_100_KM", defaults.litres_per_100_km)?,
        })
    }
}

fn optional_var(name: &'static str) -> Option<String> {
    env::var(name).ok().filter(|value| !value.trim().is_empty())
}

fn required_var(name: &'static str) -> Result<String, ConfigError> {
    optional_var(name).ok_or(ConfigError::MissingVar(name))
}

fn parse_var<T: std::str::FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match optional_var(name) {
        None => Ok(default),
        Some(value) => value
            .parse()
            .map_err(|_| ConfigError::InvalidVar { name, value }),
    }
}
