//! HTTP adapters for remote staff and fleet catalogs.
//!
//! A failed fetch degrades to an empty list so the scheduling core never
//! sees transport errors.

use serde::de::DeserializeOwned;
use tracing::warn;

use crate::model::{StaffMember, TrainRecord};
use crate::traits::{FleetCatalog, StaffCatalog};

#[derive(Debug, Clone)]
pub struct CatalogConfig {
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            timeout_secs: 10,
        }
    }
}

#[derive(Debug, Clone)]
struct CatalogClient {
    config: CatalogConfig,
    client: reqwest::blocking::Client,
}

impl CatalogClient {
    fn new(config: CatalogConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { config, client })
    }

    fn fetch<T: DeserializeOwned>(&self, path: &str) -> Vec<T> {
        let url = format!("{}/{}", self.config.base_url.trim_end_matches('/'), path);

        let response = self
            .client
            .get(&url)
            .send()
            .and_then(|resp| resp.error_for_status())
            .and_then(|resp| resp.json::<Vec<T>>());

        match response {
            Ok(items) => items,
            Err(err) => {
                warn!(%url, error = %err, "Catalog unavailable, using an empty list");
                Vec::new()
            }
        }
    }
}

/// Reads pilots from `GET {base_url}/staff/list`.
#[derive(Debug, Clone)]
pub struct HttpStaffCatalog {
    inner: CatalogClient,
}

impl HttpStaffCatalog {
    pub fn new(config: CatalogConfig) -> Result<Self, reqwest::Error> {
        Ok(Self {
            inner: CatalogClient::new(config)?,
        })
    }
}

impl StaffCatalog for HttpStaffCatalog {
    fn list_pilots(&self) -> Vec<StaffMember> {
        self.inner.fetch("staff/list")
    }
}

/// Reads train sets from `GET {base_url}/fleet`.
#[derive(Debug, Clone)]
pub struct HttpFleetCatalog {
    inner: CatalogClient,
}

impl HttpFleetCatalog {
    pub fn new(config: CatalogConfig) -> Result<Self, reqwest::Error> {
        Ok(Self {
            inner: CatalogClient::new(config)?,
        })
    }
}

impl FleetCatalog for HttpFleetCatalog {
    fn list_trains(&self) -> Vec<TrainRecord> {
        self.inner.fetch("fleet")
    }
}
