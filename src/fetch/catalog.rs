use serde::{Deserialize, Serialize};

use super::FetchError;

// ---------------------------------------------------------------------------
// Catalog response shape
// ---------------------------------------------------------------------------

/// Body of `GET .../editions/<edition>/versions`. Unknown fields are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogResponse {
    #[serde(default)]
    pub items: Vec<VersionItem>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VersionItem {
    #[serde(default)]
    pub version: Option<u64>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub edition: Option<String>,
    #[serde(default)]
    pub downloads: Option<Downloads>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Downloads {
    #[serde(default)]
    pub csv: Option<DownloadLink>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DownloadLink {
    pub href: String,
}

impl VersionItem {
    fn csv_href(&self) -> Option<&str> {
        self.downloads
            .as_ref()?
            .csv
            .as_ref()
            .map(|link| link.href.as_str())
            .filter(|href| !href.trim().is_empty())
    }
}

// ---------------------------------------------------------------------------
// ReleaseInfo – what we actually downloaded
// ---------------------------------------------------------------------------

/// The catalog entry a dataset was loaded from. Stored next to the cache.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReleaseInfo {
    pub version: Option<u64>,
    pub release_date: Option<String>,
    pub edition: Option<String>,
    pub csv_url: String,
}

impl ReleaseInfo {
    /// `"version 52, released 2024-10-16"`, leaving out what is unknown.
    pub fn summary(&self) -> String {
        let mut parts = Vec::new();
        if let Some(v) = self.version {
            parts.push(format!("version {v}"));
        }
        if let Some(date) = &self.release_date {
            // ONS dates are full timestamps; the day is enough here.
            let day = date.split('T').next().unwrap_or(date);
            parts.push(format!("released {day}"));
        }
        parts.join(", ")
    }
}

/// Pick the newest version that offers a CSV download.
///
/// Highest `version` wins. Items without a number rank below numbered
/// ones, and among those the first listed wins since the catalog lists
/// newest first.
pub fn latest_release(catalog: &CatalogResponse) -> Result<ReleaseInfo, FetchError> {
    let mut best: Option<(&VersionItem, &str)> = None;

    for item in &catalog.items {
        let Some(href) = item.csv_href() else {
            continue;
        };
        let newer = match best {
            None => true,
            Some((current, _)) => match (item.version, current.version) {
                (Some(a), Some(b)) => a > b,
                (Some(_), None) => true,
                _ => false,
            },
        };
        if newer {
            best = Some((item, href));
        }
    }

    let (item, href) = best.ok_or(FetchError::NoVersions)?;
    Ok(ReleaseInfo {
        version: item.version,
        release_date: item.release_date.clone(),
        edition: item.edition.clone(),
        csv_url: href.to_string(),
    })
}
