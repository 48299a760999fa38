use eframe::egui::{Color32, RichText, Ui};

use crate::context::{Focus, GraphNode};
use crate::itsm::{ItsmStore, RiskRating};

use super::super::ViewModel;
use super::super::render_utils::kind_color;

enum DetailsAction {
    Select(usize),
    Focus(Focus),
}

fn rating_color(rating: RiskRating) -> Color32 {
    match rating {
        RiskRating::Low => Color32::from_rgb(34, 197, 94),
        RiskRating::Medium => Color32::from_rgb(234, 179, 8),
        RiskRating::High => Color32::from_rgb(249, 115, 22),
        RiskRating::Critical => Color32::from_rgb(239, 68, 68),
    }
}

fn field(ui: &mut Ui, name: &str, value: &str) {
    if value.trim().is_empty() {
        return;
    }
    ui.horizontal_wrapped(|ui| {
        ui.label(RichText::new(format!("{name}:")).weak());
        ui.label(value);
    });
}

fn draw_focus_summary(ui: &mut Ui, store: &ItsmStore, focus: &Focus) {
    let missing = |ui: &mut Ui, id: &str| {
        ui.label(format!("No record with id {id}; it is shown as an unresolved node."));
    };

    match focus {
        Focus::Incident(id) => {
            let Some(incident) = store.incidents.get(id) else {
                return missing(ui, id);
            };
            ui.label(RichText::new(&incident.title).strong());
            field(ui, "Priority", &format!("{:?}", incident.priority));
            field(ui, "Status", incident.status.label());
            field(ui, "Assignee", &incident.assignee);
            field(ui, "Created", &incident.created);
            field(ui, "Description", &incident.description);
        }
        Focus::Problem(id) => {
            let Some(problem) = store.problems.get(id) else {
                return missing(ui, id);
            };
            ui.label(RichText::new(&problem.title).strong());
            field(ui, "Status", problem.status.label());
            field(ui, "Priority", &format!("{:?}", problem.priority));
            field(ui, "Root cause", &problem.root_cause);
            field(ui, "Description", &problem.description);
        }
        Focus::Risk(id) => {
            let Some(risk) = store.risks.get(id) else {
                return missing(ui, id);
            };
            let rating = risk.rating();
            ui.label(RichText::new(&risk.title).strong());
            ui.horizontal(|ui| {
                ui.label(format!(
                    "Likelihood {} x impact {} = {}",
                    risk.likelihood.clamp(1, 5),
                    risk.impact.clamp(1, 5),
                    risk.score()
                ));
                ui.label(
                    RichText::new(rating.label())
                        .strong()
                        .color(rating_color(rating)),
                );
            });
            field(ui, "Category", &risk.category);
            field(ui, "Owner", &risk.owner);
            field(ui, "Description", &risk.description);
        }
        Focus::Epic(id) => {
            let Some(epic) = store.epics.get(id) else {
                return missing(ui, id);
            };
            ui.label(RichText::new(&epic.title).strong());
            field(ui, "Owner", &epic.owner);
            field(ui, "Description", &epic.description);
        }
        Focus::AiService(id) => {
            let Some(service) = store.ai_services.get(id) else {
                return missing(ui, id);
            };
            ui.label(RichText::new(&service.name).strong());
            field(ui, "Description", &service.description);
        }
        Focus::ConfigItem(id) => {
            if let Some(item) = store.config_items.get(id) {
                ui.label(RichText::new(&item.name).strong());
                field(ui, "Type", &format!("{:?}", item.ci_type));
                field(ui, "Version", &item.version);
                field(ui, "Location", &item.location);
                field(ui, "Owner", &item.owner);
            } else if let Some(node) = store.topology.node(id) {
                ui.label(RichText::new(&node.label).strong());
                field(ui, "CMDB group", &format!("{:?}", node.group));
            } else {
                missing(ui, id);
            }
        }
        Focus::Topology => {
            ui.label(format!(
                "{} CMDB nodes, {} links",
                store.topology.nodes.len(),
                store.topology.links.len()
            ));
        }
    }
}

fn node_button(ui: &mut Ui, node: &GraphNode) -> bool {
    let text = RichText::new(format!("{} {}  {}", node.kind.glyph(), node.id, node.label))
        .color(kind_color(node.kind));
    ui.selectable_label(false, text)
        .on_hover_text(node.kind.label())
        .clicked()
}

impl ViewModel {
    pub(in crate::app) fn draw_details(&mut self, ui: &mut Ui) {
        ui.heading(self.focus.title());
        ui.add_space(6.0);
        draw_focus_summary(ui, &self.store, &self.focus);

        let Some(session) = self.sessions.current() else {
            return;
        };
        let graph = session.graph();
        let mut action = None;

        ui.separator();
        ui.label(RichText::new("Selection").strong());
        match self.selected.and_then(|index| graph.nodes().get(index).map(|node| (index, node))) {
            None => {
                ui.label("Click a node in the graph to inspect it.");
            }
            Some((index, node)) => {
                ui.label(RichText::new(&node.label).strong().color(kind_color(node.kind)));
                field(ui, "Kind", node.kind.label());
                field(ui, "Id", &node.id);
                if !node.resolved {
                    ui.label(RichText::new("Unresolved reference").weak());
                }
                if node.resolved
                    && graph.focal_index() != Some(index)
                    && let Some(focus) = Focus::for_node(node.kind, &node.id)
                    && ui.button(format!("Focus on {}", node.id)).clicked()
                {
                    action = Some(DetailsAction::Focus(focus));
                }

                ui.add_space(6.0);
                ui.label(RichText::new("Connected").strong());
                let neighbors = graph.neighbors(index);
                if neighbors.is_empty() {
                    ui.label("No direct connections.");
                }
                for neighbor in neighbors {
                    if let Some(other) = graph.nodes().get(neighbor)
                        && node_button(ui, other)
                    {
                        action = Some(DetailsAction::Select(neighbor));
                    }
                }

                ui.add_space(6.0);
                ui.label(RichText::new("Path from focus").strong());
                match graph.path_from_focal(index) {
                    Some(path) => {
                        let ids = path
                            .iter()
                            .filter_map(|&step| graph.nodes().get(step))
                            .map(|step| step.id.as_str())
                            .collect::<Vec<_>>();
                        ui.label(ids.join(" > "));
                    }
                    None => {
                        ui.label("Not reachable from the focal node.");
                    }
                }
            }
        }

        let unresolved = graph
            .unresolved()
            .filter_map(|node| graph.index_of(&node.id).map(|index| (index, node)))
            .collect::<Vec<_>>();
        if !unresolved.is_empty() {
            ui.separator();
            ui.label(
                RichText::new(format!("Unresolved references ({})", unresolved.len())).strong(),
            );
            for (index, node) in unresolved {
                if node_button(ui, node) {
                    action = Some(DetailsAction::Select(index));
                }
            }
        }

        match action {
            Some(DetailsAction::Select(index)) => self.set_selected(Some(index)),
            Some(DetailsAction::Focus(focus)) => self.set_focus(focus),
            None => {}
        }
    }
}
