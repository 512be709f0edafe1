use std::path::Path;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

use eframe::egui;

use crate::config::Config;
use crate::data::loader::load_file;
use crate::fetch::{DataSource, LoadedData, load_latest};
use crate::state::AppState;
use crate::ui::panels::{self, TopBarAction};
use crate::ui::plot;

type LoadResult = anyhow::Result<LoadedData>;

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct CpihDashboardApp {
    pub state: AppState,
    config: Config,
    /// Result of the background load, if one is running.
    pending: Option<Receiver<LoadResult>>,
}

impl CpihDashboardApp {
    /// Create the app and start fetching the latest release.
    pub fn new(ctx: &egui::Context, config: Config) -> Self {
        let mut app = Self {
            state: AppState::default(),
            config,
            pending: None,
        };
        app.start_load(ctx);
        app
    }

    fn start_load(&mut self, ctx: &egui::Context) {
        if self.pending.is_some() {
            return;
        }
        let (tx, rx) = mpsc::channel();
        let config = self.config.clone();
        let ctx = ctx.clone();

        thread::spawn(move || {
            log::info!("Fetching CPIH catalog from {}", config.catalog_url);
            let _ = tx.send(load_latest(&config));
            ctx.request_repaint();
        });

        self.pending = Some(rx);
        self.state.loading = true;
    }

    fn poll_load(&mut self) {
        let Some(rx) = &self.pending else {
            return;
        };
        match rx.try_recv() {
            Ok(result) => {
                self.pending = None;
                self.apply(result);
            }
            Err(TryRecvError::Empty) => {}
            Err(TryRecvError::Disconnected) => {
                self.pending = None;
                self.state
                    .set_error("loader thread exited without a result".to_string());
            }
        }
    }

    fn apply(&mut self, result: LoadResult) {
        match result {
            Ok(loaded) => {
                if loaded.dataset.is_empty() {
                    log::warn!("Loaded dataset has no rows");
                }
                log::info!(
                    "Showing {} observations in {} categories",
                    loaded.dataset.len(),
                    loaded.dataset.categories.len()
                );
                self.state.set_data(loaded);
            }
            Err(e) => {
                log::error!("Failed to load CPIH data: {e:#}");
                self.state.set_error(format!("{e:#}"));
            }
        }
    }

    fn open_file_dialog(&mut self) {
        let file = rfd::FileDialog::new()
            .set_title("Open CPIH data")
            .add_filter("CSV", &["csv"])
            .pick_file();

        if let Some(path) = file {
            self.open_local(&path);
        }
    }

    /// Show a local CSV. A background load still in flight is abandoned so
    /// its result cannot replace the file the user picked.
    fn open_local(&mut self, path: &Path) {
        let result = load_file(path).map(|dataset| {
            LoadedData::new(dataset, DataSource::LocalFile(path.display().to_string()))
        });
        if result.is_ok() && self.pending.take().is_some() {
            log::info!("Abandoning background load for {}", path.display());
        }
        self.apply(result);
        self.state.loading = self.pending.is_some();
    }
}

impl eframe::App for CpihDashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_load();

        // ---- Top panel: menu bar ----
        let action = egui::TopBottomPanel::top("top_bar")
            .show(ctx, |ui| panels::top_bar(ui, &self.state))
            .inner;
        match action {
            Some(TopBarAction::Reload) => self.start_load(ctx),
            Some(TopBarAction::OpenFile) => self.open_file_dialog(),
            None => {}
        }

        // ---- Bottom panel: footer ----
        egui::TopBottomPanel::bottom("footer").show(ctx, |ui| {
            panels::footer(ui, &self.state, &self.config);
        });

        // ---- Left side panel: categories ----
        egui::SidePanel::left("category_panel")
            .default_width(260.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Right side panel: latest readings ----
        egui::SidePanel::right("latest_panel")
            .default_width(300.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::latest_readings(ui, &self.state);
            });

        // ---- Central panel: plot ----
        egui::CentralPanel::default().show(ctx, |ui| {
            panels::header(ui, &self.state);
            ui.separator();
            plot::inflation_plot(ui, &self.state);
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::CpihDataset;
    use crate::fetch::catalog::ReleaseInfo;

    const CSV: &str = "v4_0,Time,Aggregate\n100.0,Jan-22,Overall Index\n101.0,Jan-22,01 Food\n";

    fn idle_app() -> CpihDashboardApp {
        CpihDashboardApp {
            state: AppState::default(),
            config: Config::default(),
            pending: None,
        }
    }

    fn remote_result() -> LoadResult {
        let dataset = CpihDataset::from_observations(Vec::new())?;
        Ok(LoadedData::new(
            dataset,
            DataSource::Remote(ReleaseInfo {
                version: Some(9),
                release_date: None,
                edition: None,
                csv_url: "https://example.test/v9.csv".to_string(),
            }),
        ))
    }

    #[test]
    fn local_file_survives_a_late_remote_result() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cpih.csv");
        std::fs::write(&path, CSV).unwrap();

        let mut app = idle_app();
        let (tx, rx) = mpsc::channel();
        app.pending = Some(rx);
        app.state.loading = true;

        app.open_local(&path);
        assert!(!app.state.loading);
        assert!(app.pending.is_none());

        // The loader thread finishing later has nowhere to deliver.
        assert!(tx.send(remote_result()).is_err());
        app.poll_load();

        assert!(matches!(app.state.source, Some(DataSource::LocalFile(_))));
        assert_eq!(app.state.dataset.as_ref().map(|d| d.len()), Some(2));
    }

    #[test]
    fn unreadable_file_keeps_background_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.csv");

        let mut app = idle_app();
        let (tx, rx) = mpsc::channel();
        app.pending = Some(rx);
        app.state.loading = true;

        app.open_local(&path);
        assert!(app.state.loading);
        assert!(matches!(app.state.banner, Some(crate::state::Banner::Error(_))));

        tx.send(remote_result()).unwrap();
        app.poll_load();
        assert!(!app.state.loading);
        assert!(matches!(app.state.source, Some(DataSource::Remote(_))));
    }
}
