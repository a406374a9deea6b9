//! Service configuration read from the environment.

use std::convert::Infallible;
use std::fmt::{Debug, Display};
use std::net::SocketAddr;
use std::str::FromStr;

use tracing::warn;

#[derive(Debug, Clone, PartialEq)]
pub struct ServiceConfig {
    /// Listen address of the HTTP surface.
    pub http_address: SocketAddr,
    /// Trains in the mock fleet.
    pub fleet_size: usize,
    /// Pilots in the mock staff catalog.
    pub pilot_count: usize,
    /// Seed for the mock fleet's distance figures.
    pub catalog_seed: u64,
    /// When set, staff and fleet are read from this service instead of the mocks.
    pub remote_catalog_url: Option<String>,
    pub remote_timeout_secs: u64,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            http_address: ([0, 0, 0, 0], 8000).into(),
            fleet_size: 25,
            pilot_count: 20,
            catalog_seed: 2024,
            remote_catalog_url: None,
            remote_timeout_secs: 10,
        }
    }
}

impl ServiceConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            http_address: parse_env_var(
                "METRO_HTTP_ADDRESS",
                defaults.http_address,
                SocketAddr::from_str,
            ),
            fleet_size: parse_env_var("METRO_FLEET_SIZE", defaults.fleet_size, usize::from_str),
            pilot_count: parse_env_var("METRO_PILOT_COUNT", defaults.pilot_count, usize::from_str),
            catalog_seed: parse_env_var("METRO_CATALOG_SEED", defaults.catalog_seed, u64::from_str),
            remote_catalog_url: parse_env_var(
                "METRO_CATALOG_URL",
                defaults.remote_catalog_url,
                |value| Ok::<_, Infallible>(Some(value.to_string()).filter(|url| !url.is_empty())),
            ),
            remote_timeout_secs: parse_env_var(
                "METRO_CATALOG_TIMEOUT_SECS",
                defaults.remote_timeout_secs,
                u64::from_str,
            ),
        }
    }
}

/// Read and parse an environment variable, keeping `default_value` when it
/// is missing or malformed.
pub fn parse_env_var<T, Parser, ParseErr>(var_name: &str, default_value: T, parser: Parser) -> T
where
    Parser: Fn(&str) -> Result<T, ParseErr>,
    ParseErr: Display,
    T: Debug,
{
    match std::env::var(var_name) {
        Ok(value) => match parser(&value) {
            Ok(parsed) => parsed,
            Err(err) => {
                warn!(
                    "Could not parse env var {} : {}. Using the default value '{:?}' instead",
                    var_name, err, default_value
                );
                default_value
            }
        },
        Err(std::env::VarError::NotPresent) => default_value,
        Err(std::env::VarError::NotUnicode(err)) => {
            warn!(
                "Badly formed env var {} : {:?}. Using the default value '{:?}' instead",
                var_name, err, default_value
            );
            default_value
        }
    }
}
