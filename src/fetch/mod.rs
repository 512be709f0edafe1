/// Acquisition: catalog lookup, CSV download, last-good cache.
pub mod cache;
pub mod catalog;

use std::thread::sleep;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use reqwest::blocking::{Client, ClientBuilder};
use thiserror::Error;

use crate::config::Config;
use crate::data::loader::parse_csv_bytes;
use crate::data::model::CpihDataset;
use cache::DataCache;
use catalog::{CatalogResponse, ReleaseInfo, latest_release};

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("catalog lists no version with a CSV download")]
    NoVersions,

    #[error("request to {url} failed after {attempts} attempt(s): {source}")]
    Http {
        url: String,
        attempts: u32,
        #[source]
        source: reqwest::Error,
    },
}

// ---------------------------------------------------------------------------
// HTTP client
// ---------------------------------------------------------------------------

/// Blocking client for the ONS catalog with retry and backoff.
pub struct OnsClient {
    client: Client,
    max_retries: u32,
    retry_delay: Duration,
}

impl OnsClient {
    pub fn new(config: &Config) -> Result<Self> {
        Self::with_builder(Client::builder(), config)
    }

    fn with_builder(builder: ClientBuilder, config: &Config) -> Result<Self> {
        let client = builder
            .user_agent(config.user_agent.clone())
            .timeout(config.timeout)
            .build()
            .context("building HTTP client")?;
        Ok(Self {
            client,
            max_retries: config.max_retries.max(1),
            retry_delay: config.retry_delay,
        })
    }

    /// Resolve the newest release listed at `catalog_url`.
    pub fn latest_release(&self, catalog_url: &str) -> Result<ReleaseInfo> {
        let catalog: CatalogResponse = self.with_retry(catalog_url, |resp| resp.json())?;
        let release = latest_release(&catalog)?;
        log::info!("Latest CPIH release: {} ({})", release.csv_url, release.summary());
        Ok(release)
    }

    /// Download the raw CSV bytes of a release.
    pub fn download_csv(&self, release: &ReleaseInfo) -> Result<Vec<u8>> {
        let bytes = self.with_retry(&release.csv_url, |resp| resp.bytes())?;
        log::info!("Downloaded {} bytes from {}", bytes.len(), release.csv_url);
        Ok(bytes.to_vec())
    }

    fn with_retry<T, F>(&self, url: &str, read: F) -> Result<T, FetchError>
    where
        F: Fn(reqwest::blocking::Response) -> reqwest::Result<T>,
    {
        let mut delay = self.retry_delay;
        let mut attempt = 0;

        loop {
            attempt += 1;
            let result = self
                .client
                .get(url)
                .send()
                .and_then(|resp| resp.error_for_status())
                .and_then(&read);

            match result {
                Ok(value) => return Ok(value),
                Err(e) if attempt < self.max_retries && is_transient(&e) => {
                    log::warn!(
                        "GET {url} failed (attempt {attempt}/{}): {e}; retrying in {delay:?}",
                        self.max_retries
                    );
                    sleep(delay);
                    delay = delay.saturating_mul(2);
                }
                Err(source) => {
                    return Err(FetchError::Http {
                        url: url.to_string(),
                        attempts: attempt,
                        source,
                    });
                }
            }
        }
    }
}

/// Connection failures, timeouts and 5xx responses may clear up; 4xx and
/// undecodable bodies will not.
fn is_transient(e: &reqwest::Error) -> bool {
    !e.is_decode() && e.status().map_or(true, |s| s.is_server_error())
}

// ---------------------------------------------------------------------------
// Load pipeline
// ---------------------------------------------------------------------------

/// Where a loaded dataset came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    Remote(ReleaseInfo),
    /// Served from the cache because the remote load failed.
    Cache {
        release: Option<ReleaseInfo>,
        remote_error: String,
    },
    LocalFile(String),
}

/// A dataset ready for the UI plus its provenance.
#[derive(Debug)]
pub struct LoadedData {
    pub dataset: CpihDataset,
    pub source: DataSource,
    pub loaded_at: DateTime<Local>,
}

impl LoadedData {
    pub fn new(dataset: CpihDataset, source: DataSource) -> Self {
        Self {
            dataset,
            source,
            loaded_at: Local::now(),
        }
    }
}

/// Fetch the latest release, falling back to the cached copy on failure.
pub fn load_latest(config: &Config) -> Result<LoadedData> {
    let cache = config.cache_dir.as_ref().map(DataCache::new);

    let remote_error = match load_remote(config) {
        Ok((dataset, csv, release)) => {
            if let Some(cache) = &cache {
                match cache.store(&csv, &release) {
                    Ok(()) => log::debug!("Cached CSV in {}", cache.dir().display()),
                    Err(e) => log::warn!("Could not cache CSV: {e:#}"),
                }
            }
            return Ok(LoadedData::new(dataset, DataSource::Remote(release)));
        }
        Err(e) => e,
    };

    log::error!("Remote load failed: {remote_error:#}");

    let cache = match cache {
        Some(cache) if cache.exists() => cache,
        _ => return Err(remote_error),
    };

    log::warn!("Falling back to cached data in {}", cache.dir().display());
    let (csv, release) = cache.load()?;
    let dataset = parse_csv_bytes(&csv).context("parsing cached CSV")?;
    Ok(LoadedData::new(
        dataset,
        DataSource::Cache {
            release,
            remote_error: format!("{remote_error:#}"),
        },
    ))
}

fn load_remote(config: &Config) -> Result<(CpihDataset, Vec<u8>, ReleaseInfo)> {
    let client = OnsClient::new(config)?;
    let release = client
        .latest_release(&config.catalog_url)
        .context("resolving latest CPIH version")?;
    let csv = client.download_csv(&release).context("downloading CPIH CSV")?;
    let dataset = parse_csv_bytes(&csv).context("parsing CPIH CSV")?;
    log::info!(
        "Loaded {} observations across {} categories",
        dataset.len(),
        dataset.categories.len()
    );
    Ok((dataset, csv, release))
}
