use std::collections::VecDeque;

use eframe::egui::{self, Align, Context, Layout, Vec2};

use crate::config::ViewerConfig;
use crate::context::{Focus, build_graph};
use crate::itsm::ItsmStore;
use crate::layout::ForceParams;

use super::super::session::SessionSlot;
use super::super::{EntityTab, ViewModel};

/// First risk in the store, else the CMDB topology.
fn default_focus(store: &ItsmStore) -> Focus {
    store
        .risks
        .iter()
        .next()
        .map_or(Focus::Topology, |risk| Focus::Risk(risk.id.clone()))
}

impl ViewModel {
    pub(in crate::app) fn new(
        store: ItsmStore,
        source_label: String,
        config: ViewerConfig,
        focus: Option<Focus>,
    ) -> Self {
        let focus = focus.unwrap_or_else(|| default_focus(&store));
        let entity_tab = match focus {
            Focus::Incident(_) => EntityTab::Incidents,
            Focus::Problem(_) => EntityTab::Problems,
            Focus::Risk(_) => EntityTab::Risks,
            Focus::Epic(_) => EntityTab::Epics,
            Focus::AiService(_) => EntityTab::AiServices,
            Focus::ConfigItem(_) => EntityTab::ConfigItems,
            Focus::Topology => EntityTab::Cmdb,
        };

        let mut model = Self {
            store,
            source_label,
            config,
            focus: Focus::Topology,
            sessions: SessionSlot::default(),
            entity_tab,
            search: String::new(),
            selected: None,
            pan: Vec2::ZERO,
            zoom: 1.0,
            live_physics: true,
            show_quadtree_overlay: false,
            show_labels: true,
            show_fps_bar: true,
            fps_show_average: true,
            fps_show_frame_time: false,
            fps_current: 0.0,
            fps_samples: VecDeque::new(),
        };
        model.set_focus(focus);
        model
    }

    pub(in crate::app) fn show(
        &mut self,
        ctx: &Context,
        reload_requested: &mut bool,
        is_loading: bool,
    ) {
        self.update_fps_counter(ctx);

        egui::TopBottomPanel::top("top_bar")
            .resizable(false)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.heading("ITSM context graph");
                    ui.separator();
                    ui.label(format!("data: {}", self.source_label));
                    ui.label(format!("focus: {}", self.focus.title()));
                    let reload_button =
                        ui.add_enabled(!is_loading, egui::Button::new("Reload data"));
                    if reload_button.clicked() {
                        *reload_requested = true;
                    }
                    ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                        if let Some(stats) = self.graph_stats_text() {
                            ui.label(stats);
                        }
                        if let Some(fps_text) = self.fps_display_text() {
                            ui.label(fps_text);
                        }
                    });
                });
            });

        egui::SidePanel::left("entities")
            .resizable(true)
            .default_width(320.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    self.draw_controls(ui);
                    ui.separator();
                    self.draw_entity_list(ui);
                });
            });

        egui::SidePanel::right("details")
            .resizable(true)
            .default_width(340.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| self.draw_details(ui));
            });

        egui::CentralPanel::default()
            .frame(egui::Frame::NONE)
            .show(ctx, |ui| self.draw_graph(ui));
    }

    fn layout_params_for(&self, focus: &Focus) -> ForceParams {
        match focus {
            Focus::Topology => self.config.topology_layout,
            _ => self.config.entity_layout,
        }
    }

    /// Builds the graph for `focus` and replaces the running session.
    pub(in crate::app) fn set_focus(&mut self, focus: Focus) {
        let graph = build_graph(&focus, &self.store, &self.config.policy);
        let (nodes, edges) = (graph.node_count(), graph.edge_count());
        let generation = self.sessions.open(graph, self.layout_params_for(&focus));

        tracing::info!(%focus, generation, nodes, edges, "showing context graph");
        self.focus = focus;
        self.selected = None;
        self.reset_view();
    }

    /// Rebuilds the current focus, e.g. after a policy change.
    pub(in crate::app) fn rebuild_graph(&mut self) {
        self.set_focus(self.focus.clone());
    }

    pub(in crate::app) fn set_layout_params(&mut self, params: ForceParams) {
        match self.focus {
            Focus::Topology => self.config.topology_layout = params,
            _ => self.config.entity_layout = params,
        }
        if let Some(session) = self.sessions.current_mut() {
            session.set_params(params);
        }
    }

    pub(in crate::app) fn set_selected(&mut self, selected: Option<usize>) {
        let node_count = self
            .sessions
            .current()
            .map_or(0, |session| session.graph().node_count());
        let selected = selected.filter(|&index| index < node_count);
        if self.selected == selected {
            return;
        }

        if let Some(node) = selected.and_then(|index| {
            self.sessions
                .current()
                .and_then(|session| session.graph().nodes().get(index))
        }) {
            tracing::debug!(id = %node.id, kind = %node.kind, "selected node");
        }
        self.selected = selected;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::itsm::{Dataset, sample_dataset};

    fn model(focus: Option<Focus>) -> ViewModel {
        let store = ItsmStore::from_dataset(sample_dataset()).unwrap();
        ViewModel::new(store, "test".to_owned(), ViewerConfig::default(), focus)
    }

    #[test]
    fn defaults_to_first_risk() {
        let model = model(None);
        assert_eq!(model.focus, Focus::Risk("RSK-005".to_owned()));
        assert_eq!(model.entity_tab, EntityTab::Risks);
    }

    #[test]
    fn empty_store_defaults_to_topology() {
        let store = ItsmStore::from_dataset(Dataset::default()).unwrap();
        assert_eq!(default_focus(&store), Focus::Topology);
    }

    #[test]
    fn changing_focus_starts_a_new_session() {
        let mut model = model(None);
        let first = model.sessions.current().map(|session| session.generation());
        model.set_selected(Some(0));
        assert_eq!(model.selected, Some(0));

        model.set_focus(Focus::Incident("INC001023".to_owned()));

        let second = model.sessions.current().map(|session| session.generation());
        assert_ne!(first, second);
        assert_eq!(model.selected, None);
        assert_eq!(
            model.sessions.current().map(|session| session.graph().focus().clone()),
            Some(Focus::Incident("INC001023".to_owned()))
        );
    }

    #[test]
    fn topology_uses_topology_params() {
        let model = model(Some(Focus::Topology));
        let params = model.sessions.current().map(|session| *session.params());
        assert_eq!(params, Some(ForceParams::topology()));
        assert_eq!(model.entity_tab, EntityTab::Cmdb);
    }

    #[test]
    fn out_of_range_selection_is_ignored() {
        let mut model = model(None);
        model.set_selected(Some(10_000));
        assert_eq!(model.selected, None);
    }

    #[test]
    fn edited_params_are_kept_per_graph_kind() {
        let mut model = model(None);
        let params = ForceParams {
            link_distance: 80.0,
            ..ForceParams::entity()
        };

        model.set_layout_params(params);
        model.set_focus(Focus::Risk("RSK-002".to_owned()));

        assert_eq!(model.config.entity_layout, params);
        assert_eq!(model.config.topology_layout, ForceParams::topology());
        assert_eq!(model.sessions.current().map(|session| *session.params()), Some(params));
    }
}
