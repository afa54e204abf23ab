//! Eurovision Dash Main Application
//! Main window with control bar and the three dashboard views.

use crate::gui::{ChartViewer, ControlPanel, ControlPanelAction};
use eurovision_dash::config::Config;
use eurovision_dash::data::{TtlCache, VoteLoader, VoteTables};
use polars::prelude::*;
use std::sync::mpsc::{channel, Receiver};
use std::thread;
use std::time::{Duration, Instant};
use tracing::{error, info};

/// Dataset loading result from background thread
enum LoadResult {
    Complete(DataFrame),
    Error(String),
}

/// Decides when an expired dataset is fetched again. Every attempt counts,
/// so a failed load is not repeated until another TTL has passed.
struct ReloadSchedule {
    ttl: Duration,
    last_attempt: Option<Instant>,
}

impl ReloadSchedule {
    fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            last_attempt: None,
        }
    }

    fn record_attempt(&mut self, now: Instant) {
        self.last_attempt = Some(now);
    }

    fn is_due(&self, now: Instant, cache_fresh: bool) -> bool {
        !cache_fresh
            && !matches!(
                self.last_attempt,
                Some(at) if now.saturating_duration_since(at) < self.ttl
            )
    }
}

/// Main application window.
pub struct DashboardApp {
    config: Config,
    loader: VoteLoader,
    cache: TtlCache<DataFrame>,
    tables: Option<VoteTables>,
    schedule: ReloadSchedule,

    control_panel: ControlPanel,
    chart_viewer: ChartViewer,

    // Async dataset loading
    load_rx: Option<Receiver<LoadResult>>,
}

impl DashboardApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, config: Config) -> Self {
        let cache = TtlCache::new(config.cache_ttl());
        let mut app = Self {
            loader: config.loader(),
            schedule: ReloadSchedule::new(cache.ttl()),
            cache,
            config,
            tables: None,
            control_panel: ControlPanel::new(),
            chart_viewer: ChartViewer::new(),
            load_rx: None,
        };
        app.start_load();
        app
    }

    fn is_loading(&self) -> bool {
        self.load_rx.is_some()
    }

    fn cache_key(&self) -> String {
        self.loader.source().key()
    }

    /// Fetch the dataset on a worker thread. At most one load runs at a time.
    fn start_load(&mut self) {
        if self.is_loading() {
            return;
        }

        self.control_panel
            .set_status(&format!("Loading {}...", self.cache_key()));
        self.schedule.record_attempt(Instant::now());
        let (tx, rx) = channel();
        self.load_rx = Some(rx);

        let loader = self.loader.clone();
        thread::spawn(move || {
            let result = match loader.load() {
                Ok(df) => LoadResult::Complete(df),
                Err(e) => LoadResult::Error(e.to_string()),
            };
            let _ = tx.send(result);
        });
    }

    /// Check for dataset loading results
    fn check_load_results(&mut self) {
        let Some(rx) = self.load_rx.take() else {
            return;
        };

        match rx.try_recv() {
            Ok(LoadResult::Complete(df)) => {
                let key = self.cache_key();
                let raw = self.cache.insert(&key, Instant::now(), df);
                match VoteTables::build(raw, self.config.pipeline.missing_points) {
                    Ok(tables) => self.install_tables(tables),
                    Err(e) => {
                        error!("Failed to prepare votes: {}", e);
                        self.cache.invalidate(&key);
                        self.fail_load(&e.to_string());
                    }
                }
            }
            Ok(LoadResult::Error(e)) => {
                error!("Failed to load votes: {}", e);
                self.fail_load(&e);
            }
            Err(std::sync::mpsc::TryRecvError::Empty) => {
                self.load_rx = Some(rx);
            }
            Err(std::sync::mpsc::TryRecvError::Disconnected) => {
                self.fail_load("loader thread stopped");
            }
        }
    }

    /// A failed load leaves no views on screen until the next successful one.
    fn fail_load(&mut self, message: &str) {
        self.tables = None;
        self.control_panel.export_enabled = false;
        self.control_panel.set_error(message);
    }

    fn install_tables(&mut self, tables: VoteTables) {
        if let Err(e) = self.chart_viewer.set_tables(&tables) {
            self.control_panel.set_error(&e.to_string());
            return;
        }
        self.control_panel.set_status(&format!(
            "{} final-round votes, {} countries",
            tables.votes.height(),
            tables.countries.len()
        ));
        self.control_panel.export_enabled = true;
        self.tables = Some(tables);
    }

    /// Reload once the cached dataset has outlived its TTL.
    fn refresh_if_stale(&mut self) {
        let now = Instant::now();
        let cache_fresh = self.cache.get(&self.cache_key(), now).is_some();
        if self.tables.is_some() && !self.is_loading() && self.schedule.is_due(now, cache_fresh) {
            info!("Cached votes expired, reloading");
            self.start_load();
        }
    }

    fn handle_reload(&mut self) {
        let key = self.cache_key();
        self.cache.invalidate(&key);
        self.start_load();
    }

    fn handle_country_changed(&mut self, country: &str) {
        let Some(tables) = &self.tables else {
            return;
        };
        if let Err(e) = self.chart_viewer.select_country(tables, country) {
            self.control_panel.set_error(&e.to_string());
        }
    }

    /// Save the table behind the active tab as CSV.
    fn handle_export_csv(&mut self) {
        let tab = self.control_panel.tab;
        let Some(tables) = &self.tables else {
            return;
        };
        let Some(frame) = self.chart_viewer.frame_for(tab, tables) else {
            self.control_panel.set_status("Nothing to export");
            return;
        };

        let Some(path) = rfd::FileDialog::new()
            .add_filter("CSV Files", &["csv"])
            .set_file_name(format!("{}.csv", tab.title().to_lowercase()))
            .save_file()
        else {
            return; // User cancelled
        };

        let mut frame = frame.clone();
        let written = std::fs::File::create(&path)
            .map_err(PolarsError::from)
            .and_then(|file| CsvWriter::new(file).include_header(true).finish(&mut frame));
        match written {
            Ok(()) => self
                .control_panel
                .set_status(&format!("Exported {} rows to {}", frame.height(), path.display())),
            Err(e) => self.control_panel.set_error(&e.to_string()),
        }
    }
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.check_load_results();
        self.refresh_if_stale();

        // Request repaint while loading
        if self.is_loading() {
            ctx.request_repaint();
        }

        egui::TopBottomPanel::top("control_panel").show(ctx, |ui| {
            ui.add_space(4.0);
            let action = self.control_panel.show(ui, self.load_rx.is_some());
            match action {
                ControlPanelAction::Reload => self.handle_reload(),
                ControlPanelAction::ExportCsv => self.handle_export_csv(),
                ControlPanelAction::None => {}
            }
            ui.add_space(4.0);
        });

        let tab = self.control_panel.tab;
        let mut changed_country = None;
        egui::CentralPanel::default().show(ctx, |ui| {
            changed_country = self.chart_viewer.show(ui, tab, self.tables.as_ref());
        });
        if let Some(country) = changed_country {
            self.handle_country_changed(&country);
        }
    }
}
