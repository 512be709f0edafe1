use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use super::catalog::ReleaseInfo;

const CSV_FILE: &str = "cpih_latest.csv";
const INFO_FILE: &str = "cpih_latest.json";

/// The last CSV that downloaded and parsed cleanly.
#[derive(Debug, Clone)]
pub struct DataCache {
    dir: PathBuf,
}

impl DataCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn exists(&self) -> bool {
        self.dir.join(CSV_FILE).is_file()
    }

    /// Overwrite the cached copy. The CSV is replaced before its release
    /// info, each through a temp file and a rename.
    pub fn store(&self, csv: &[u8], release: &ReleaseInfo) -> Result<()> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("creating cache dir {}", self.dir.display()))?;

        let info = serde_json::to_vec_pretty(release).context("serialising release info")?;
        self.replace(CSV_FILE, csv).context("writing cached CSV")?;
        self.replace(INFO_FILE, &info)
            .context("writing cached release info")?;
        Ok(())
    }

    fn replace(&self, name: &str, contents: &[u8]) -> Result<()> {
        let target = self.dir.join(name);
        let tmp = self.dir.join(format!("{name}.tmp"));
        fs::write(&tmp, contents).with_context(|| format!("writing {}", tmp.display()))?;
        fs::rename(&tmp, &target).with_context(|| format!("replacing {}", target.display()))?;
        Ok(())
    }

    /// Read the cached CSV bytes and, if readable, the release they came from.
    pub fn load(&self) -> Result<(Vec<u8>, Option<ReleaseInfo>)> {
        let csv_path = self.dir.join(CSV_FILE);
        let csv = fs::read(&csv_path)
            .with_context(|| format!("reading cached CSV {}", csv_path.display()))?;

        let release: Option<ReleaseInfo> = fs::read(self.dir.join(INFO_FILE))
            .ok()
            .and_then(|bytes| match serde_json::from_slice(&bytes) {
                Ok(info) => Some(info),
                Err(e) => {
                    log::warn!("Ignoring unreadable cached release info: {e}");
                    None
                }
            });

        Ok((csv, release))
    }
}
