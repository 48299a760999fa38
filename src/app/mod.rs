use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

use anyhow::{Context as _, Result};
use eframe::egui::{self, Context, Vec2};

use crate::config::ViewerConfig;
use crate::context::Focus;
use crate::itsm::{ItsmStore, load_store, sample_dataset};

mod graph;
mod highlight;
mod render_utils;
mod session;
mod ui;

use self::session::SessionSlot;

/// Where the ITSM records come from.
#[derive(Clone, Debug)]
pub enum DataSource {
    Sample,
    File(PathBuf),
}

impl DataSource {
    fn label(&self) -> String {
        match self {
            Self::Sample => "built-in sample".to_owned(),
            Self::File(path) => path.display().to_string(),
        }
    }

    fn load(&self) -> Result<ItsmStore> {
        match self {
            Self::Sample => ItsmStore::from_dataset(sample_dataset())
                .context("built-in sample dataset is inconsistent"),
            Self::File(path) => load_store(path),
        }
    }
}

pub struct ContextGraphApp {
    source: DataSource,
    config: ViewerConfig,
    focus: Option<Focus>,
    state: AppState,
    reload_rx: Option<Receiver<Result<ItsmStore, String>>>,
}

enum AppState {
    Loading {
        rx: Receiver<Result<ItsmStore, String>>,
    },
    Ready(Box<ViewModel>),
    Error(String),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum EntityTab {
    Incidents,
    Problems,
    Risks,
    Epics,
    AiServices,
    ConfigItems,
    Cmdb,
}

impl EntityTab {
    const ALL: [Self; 7] = [
        Self::Risks,
        Self::Incidents,
        Self::Problems,
        Self::Epics,
        Self::AiServices,
        Self::ConfigItems,
        Self::Cmdb,
    ];

    fn label(self) -> &'static str {
        match self {
            Self::Incidents => "Incidents",
            Self::Problems => "Problems",
            Self::Risks => "Risks",
            Self::Epics => "Epics",
            Self::AiServices => "AI Services",
            Self::ConfigItems => "CIs",
            Self::Cmdb => "CMDB",
        }
    }
}

struct ViewModel {
    store: ItsmStore,
    source_label: String,
    config: ViewerConfig,
    focus: Focus,
    sessions: SessionSlot,
    entity_tab: EntityTab,
    search: String,
    selected: Option<usize>,
    pan: Vec2,
    zoom: f32,
    live_physics: bool,
    show_quadtree_overlay: bool,
    show_labels: bool,
    show_fps_bar: bool,
    fps_show_average: bool,
    fps_show_frame_time: bool,
    fps_current: f32,
    fps_samples: VecDeque<f32>,
}

impl ContextGraphApp {
    pub fn new(
        _cc: &eframe::CreationContext<'_>,
        source: DataSource,
        config: ViewerConfig,
        focus: Option<Focus>,
    ) -> Self {
        let state = Self::start_load(&source);
        Self {
            source,
            config,
            focus,
            state,
            reload_rx: None,
        }
    }

    fn spawn_load(source: &DataSource) -> Receiver<Result<ItsmStore, String>> {
        let (tx, rx) = mpsc::channel();
        let source = source.clone();

        thread::spawn(move || {
            let result = source.load().map_err(|error| {
                tracing::error!(error = %format!("{error:#}"), "dataset load failed");
                format!("{error:#}")
            });
            let _ = tx.send(result);
        });

        rx
    }

    fn start_load(source: &DataSource) -> AppState {
        tracing::info!(source = %source.label(), "loading dataset");
        AppState::Loading {
            rx: Self::spawn_load(source),
        }
    }

    fn ready(&self, store: ItsmStore) -> AppState {
        AppState::Ready(Box::new(ViewModel::new(
            store,
            self.source.label(),
            self.config.clone(),
            self.focus.clone(),
        )))
    }
}

impl eframe::App for ContextGraphApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        let mut transition = None;
        let mut retry = false;

        match &mut self.state {
            AppState::Loading { rx } => {
                match rx.try_recv() {
                    Ok(result) => transition = Some(result),
                    Err(TryRecvError::Empty) => ctx.request_repaint(),
                    Err(TryRecvError::Disconnected) => {
                        transition = Some(Err("Background load worker disconnected".to_owned()));
                    }
                }

                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.vertical_centered(|ui| {
                        ui.add_space(120.0);
                        ui.heading("Loading ITSM records...");
                        ui.add_space(8.0);
                        ui.spinner();
                    });
                });
            }
            AppState::Error(error) => {
                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.heading("Failed to load ITSM records");
                    ui.add_space(6.0);
                    ui.label(error.as_str());
                    ui.add_space(10.0);
                    retry = ui.button("Retry").clicked();
                });
            }
            AppState::Ready(model) => {
                let mut reload_requested = false;
                let is_reloading = self.reload_rx.is_some();
                model.show(ctx, &mut reload_requested, is_reloading);

                // Reloads keep the current focus and edited settings.
                self.focus = Some(model.focus.clone());
                self.config = model.config.clone();

                if reload_requested && self.reload_rx.is_none() {
                    tracing::info!(source = %self.source.label(), "reloading dataset");
                    self.reload_rx = Some(Self::spawn_load(&self.source));
                }

                if let Some(rx) = self.reload_rx.take() {
                    match rx.try_recv() {
                        Ok(result) => transition = Some(result),
                        Err(TryRecvError::Empty) => {
                            ctx.request_repaint();
                            self.reload_rx = Some(rx);
                        }
                        Err(TryRecvError::Disconnected) => {
                            transition =
                                Some(Err("Background load worker disconnected".to_owned()));
                        }
                    }
                }
            }
        }

        if retry {
            self.state = Self::start_load(&self.source);
            return;
        }

        if let Some(result) = transition {
            self.reload_rx = None;
            self.state = match result {
                Ok(store) => self.ready(store),
                Err(error) => AppState::Error(error),
            };
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn sample_source_loads() {
        let store = DataSource::Sample.load().unwrap();
        assert!(store.record_count() > 0);
        assert!(!store.topology.nodes.is_empty());
    }

    #[test]
    fn file_source_reports_the_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"[1, 2]").unwrap();
        let source = DataSource::File(file.path().to_path_buf());

        let error = format!("{:#}", source.load().unwrap_err());

        assert!(error.contains(&file.path().display().to_string()));
        assert_eq!(source.label(), file.path().display().to_string());
    }
}
