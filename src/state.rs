use std::sync::Arc;

use chrono::{DateTime, Local};

use crate::chart::{Chart, Selection, build_chart};
use crate::color::ColorMap;
use crate::data::model::CpihDataset;
use crate::fetch::catalog::ReleaseInfo;
use crate::fetch::{DataSource, LoadedData};

// ---------------------------------------------------------------------------
// Status banner
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Banner {
    Warning(String),
    Error(String),
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
#[derive(Default)]
pub struct AppState {
    /// Loaded dataset; read-only and shared.
    pub dataset: Option<Arc<CpihDataset>>,

    /// Where the dataset came from.
    pub source: Option<DataSource>,

    /// Local time the dataset was loaded ("Last update" in the footer).
    pub loaded_at: Option<DateTime<Local>>,

    /// Ticked categories.
    pub selection: Selection,

    /// Chart for the current selection (recomputed on every change).
    pub chart: Chart,

    pub color_map: ColorMap,

    /// Text typed into the category search box.
    pub category_filter: String,

    pub banner: Option<Banner>,

    /// Whether a load is in progress.
    pub loading: bool,
}

impl AppState {
    /// Ingest a newly loaded dataset and reset the selection to its default.
    pub fn set_data(&mut self, loaded: LoadedData) {
        let LoadedData {
            dataset,
            source,
            loaded_at,
        } = loaded;

        self.banner = match &source {
            DataSource::Cache { remote_error, .. } => Some(Banner::Warning(format!(
                "Showing cached data: could not reach the ONS API ({remote_error})"
            ))),
            _ => None,
        };

        self.color_map = ColorMap::new(&dataset.categories);
        self.selection = dataset.default_selection();
        self.dataset = Some(Arc::new(dataset));
        self.source = Some(source);
        self.loaded_at = Some(loaded_at);
        self.loading = false;
        self.recompute();
    }

    /// Record a failed load. Any dataset already shown stays on screen.
    pub fn set_error(&mut self, message: String) {
        self.banner = Some(Banner::Error(message));
        self.loading = false;
    }

    /// Rebuild the chart from the current selection.
    pub fn recompute(&mut self) {
        self.chart = match &self.dataset {
            Some(ds) => build_chart(ds, &self.selection),
            None => Chart::default(),
        };
    }

    pub fn set_selected(&mut self, category: &str, selected: bool) {
        let changed = if selected {
            self.selection.insert(category.to_string())
        } else {
            self.selection.remove(category)
        };
        if changed {
            self.recompute();
        }
    }

    pub fn select_all(&mut self) {
        if let Some(ds) = &self.dataset {
            self.selection = ds.categories.iter().cloned().collect();
            self.recompute();
        }
    }

    pub fn select_none(&mut self) {
        self.selection.clear();
        self.recompute();
    }

    /// Back to the overall index only.
    pub fn reset_selection(&mut self) {
        if let Some(ds) = &self.dataset {
            self.selection = ds.default_selection();
            self.recompute();
        }
    }

    /// Categories matching the search box, in dataset order.
    pub fn visible_categories(&self) -> Vec<&str> {
        let Some(ds) = &self.dataset else {
            return Vec::new();
        };
        let needle = self.category_filter.trim().to_lowercase();
        ds.categories
            .iter()
            .map(String::as_str)
            .filter(|c| needle.is_empty() || c.to_lowercase().contains(&needle))
            .collect()
    }

    pub fn release(&self) -> Option<&ReleaseInfo> {
        match self.source.as_ref()? {
            DataSource::Remote(release) => Some(release),
            DataSource::Cache { release, .. } => release.as_ref(),
            DataSource::LocalFile(_) => None,
        }
    }
}
