use std::collections::HashSet;

use eframe::egui::{self, Align2, Color32, FontId, Pos2, Sense, Stroke, Ui, vec2};
use fuzzy_matcher::FuzzyMatcher;
use fuzzy_matcher::skim::SkimMatcherV2;

use crate::context::ContextGraph;
use crate::util::truncate_label;

use super::super::ViewModel;
use super::super::highlight::build_highlight_state;
use super::super::render_utils::{
    NODE_RADIUS, blend_color, circle_visible, dim_color, draw_arrow, draw_background,
    edge_visible, kind_color,
};
use super::interaction::{CanvasTransform, node_at};

const LABEL_MAX_CHARS: usize = 32;

fn search_matches(graph: &ContextGraph, query: &str) -> HashSet<usize> {
    let query = query.trim();
    if query.is_empty() {
        return HashSet::new();
    }

    let matcher = SkimMatcherV2::default().ignore_case();
    graph
        .nodes()
        .iter()
        .enumerate()
        .filter(|(_, node)| {
            matcher.fuzzy_match(&node.id, query).is_some()
                || matcher.fuzzy_match(&node.label, query).is_some()
        })
        .map(|(index, _)| index)
        .collect()
}

impl ViewModel {
    pub(in crate::app) fn draw_graph(&mut self, ui: &mut Ui) {
        let (rect, response) = ui.allocate_exact_size(ui.available_size(), Sense::click_and_drag());
        if !rect.is_positive() {
            return;
        }

        let painter = ui.painter_at(rect);
        draw_background(&painter, rect, self.pan, self.zoom);
        self.handle_graph_zoom(ui, rect, &response);

        let radius = (NODE_RADIUS * self.zoom).clamp(4.0, 60.0);
        let mut transform = CanvasTransform {
            rect,
            pan: self.pan,
            zoom: self.zoom,
            center: (0.0, 0.0),
        };

        let Some(session) = self.sessions.current_mut() else {
            return;
        };
        if !session.ensure_started(f64::from(rect.width()), f64::from(rect.height())) {
            return;
        }
        transform.center = session.center();

        let screen_positions: Vec<Pos2> = session
            .snapshot()
            .map(|snapshot| snapshot.positions.iter().map(|&p| transform.to_screen(p)).collect())
            .unwrap_or_else(Vec::new);

        if response.drag_started_by(egui::PointerButton::Primary)
            && let Some(origin) = ui.input(|input| input.pointer.press_origin())
            && let Some(node) = node_at(&screen_positions, radius, origin)
        {
            let (x, y) = transform.to_layout(origin);
            session.start_drag(node, x, y);
        }

        let node_drag = session.dragged_node().is_some();
        if node_drag {
            if let Some(pointer) = response.interact_pointer_pos() {
                let (x, y) = transform.to_layout(pointer);
                session.drag_to(x, y);
            }
            if response.drag_stopped() {
                session.end_drag();
            }
        }

        if self.live_physics || node_drag {
            session.advance();
        }
        if (self.live_physics && session.is_animating()) || response.dragged() {
            ui.ctx().request_repaint();
        }

        self.handle_graph_pan(&response, node_drag);
        transform.pan = self.pan;

        let pending_selection = self.paint_session(ui, &painter, &response, transform, radius);
        if let Some(selected) = pending_selection {
            self.set_selected(selected);
        }
    }

    /// Draws the current session and returns the click selection, if any.
    fn paint_session(
        &self,
        ui: &Ui,
        painter: &egui::Painter,
        response: &egui::Response,
        transform: CanvasTransform,
        radius: f32,
    ) -> Option<Option<usize>> {
        let session = self.sessions.current()?;
        let graph = session.graph();
        let snapshot = session.snapshot()?;
        let rect = transform.rect;
        let zoom_sqrt = transform.zoom.sqrt();

        let screen_positions: Vec<Pos2> = snapshot
            .positions
            .iter()
            .map(|&position| transform.to_screen(position))
            .collect();

        if self.show_quadtree_overlay {
            for cell in session.quadtree_cells() {
                let (cx, cy) = cell.center;
                let min = transform.to_screen((cx - cell.half_extent, cy - cell.half_extent));
                let max = transform.to_screen((cx + cell.half_extent, cy + cell.half_extent));
                let alpha = if cell.is_leaf { 110 } else { 55 };
                let width = (1.4 - cell.depth as f32 * 0.09).clamp(0.45, 1.4);
                painter.rect_stroke(
                    egui::Rect::from_two_pos(min, max),
                    0.0,
                    Stroke::new(width, Color32::from_rgba_unmultiplied(106, 198, 255, alpha)),
                    egui::StrokeKind::Middle,
                );
            }
        }

        let hovered = ui
            .input(|input| input.pointer.hover_pos())
            .filter(|pointer| rect.contains(*pointer))
            .and_then(|pointer| node_at(&screen_positions, radius, pointer));
        if hovered.is_some() || session.dragged_node().is_some() {
            ui.output_mut(|output| output.cursor_icon = egui::CursorIcon::PointingHand);
        }

        let highlight = self
            .selected
            .map(|selected| build_highlight_state(graph, selected))
            .filter(|state| !state.is_empty());
        let pseudo_matches = if highlight.is_none() {
            search_matches(graph, &self.search)
        } else {
            HashSet::new()
        };

        for edge in graph.edges() {
            let (Some(&start), Some(&end)) = (
                screen_positions.get(edge.source),
                screen_positions.get(edge.target),
            ) else {
                continue;
            };
            if !edge_visible(rect, start, end, radius) {
                continue;
            }

            let pair = (edge.source, edge.target);
            let (width, color) = match &highlight {
                Some(state) if state.focal_path_edges.contains(&pair) => {
                    (3.0 * zoom_sqrt, Color32::from_rgb(246, 206, 104))
                }
                Some(state) if state.related_edges.contains(&pair) => {
                    (2.4 * zoom_sqrt, Color32::from_rgb(241, 146, 94))
                }
                Some(_) => (1.0 * zoom_sqrt, Color32::from_rgba_unmultiplied(100, 116, 139, 90)),
                None => (1.6 * zoom_sqrt, Color32::from_rgb(148, 163, 184)),
            };
            draw_arrow(painter, start, end, radius, Stroke::new(width.clamp(0.6, 5.0), color));
        }

        let focal = graph.focal_index();
        let label_font = FontId::proportional((12.0 * transform.zoom).clamp(8.0, 20.0));
        let kind_font = FontId::proportional((10.0 * transform.zoom).clamp(7.0, 16.0));
        let glyph_font = FontId::proportional(radius * 0.9);

        for (index, node) in graph.nodes().iter().enumerate() {
            let Some(&center) = screen_positions.get(index) else {
                continue;
            };
            if !circle_visible(rect, center, radius + 160.0 * transform.zoom) {
                continue;
            }

            let related = highlight.as_ref().is_none_or(|state| {
                state.related_nodes.contains(&index) || state.focal_path_nodes.contains(&index)
            });
            let mut fill = kind_color(node.kind);
            if !node.resolved {
                fill = blend_color(fill, Color32::from_rgb(30, 41, 59), 0.55);
            }
            if !related {
                fill = dim_color(fill, 0.35);
            }

            painter.circle_filled(center, radius, fill);

            let ring = if self.selected == Some(index) {
                Some(Stroke::new(3.0, Color32::from_rgb(245, 206, 93)))
            } else if pseudo_matches.contains(&index) {
                Some(Stroke::new(2.5, Color32::from_rgb(250, 204, 21)))
            } else if focal == Some(index) {
                Some(Stroke::new(2.5, Color32::WHITE))
            } else if hovered == Some(index) {
                Some(Stroke::new(1.5, Color32::from_gray(220)))
            } else if !node.resolved {
                Some(Stroke::new(1.0, Color32::from_gray(140)))
            } else {
                None
            };
            if let Some(stroke) = ring {
                painter.circle_stroke(center, radius, stroke);
            }

            painter.text(
                center,
                Align2::CENTER_CENTER,
                node.kind.glyph(),
                glyph_font.clone(),
                Color32::WHITE,
            );

            if !self.show_labels {
                continue;
            }
            let text_color = if related {
                Color32::from_gray(230)
            } else {
                Color32::from_gray(110)
            };
            painter.text(
                center + vec2(25.0, 5.0) * transform.zoom,
                Align2::LEFT_BOTTOM,
                truncate_label(&node.label, LABEL_MAX_CHARS),
                label_font.clone(),
                text_color,
            );
            painter.text(
                center + vec2(25.0, 18.0) * transform.zoom,
                Align2::LEFT_BOTTOM,
                node.kind.label(),
                kind_font.clone(),
                dim_color(kind_color(node.kind), if related { 1.0 } else { 0.5 }),
            );
        }

        response
            .clicked_by(egui::PointerButton::Primary)
            .then_some(hovered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{BuildPolicy, Focus, build_graph};
    use crate::itsm::{ItsmStore, sample_dataset};

    #[test]
    fn search_matches_ids_and_labels() {
        let store = ItsmStore::from_dataset(sample_dataset()).unwrap();
        let focus = Focus::Risk("RSK-005".to_owned());
        let graph = build_graph(&focus, &store, &BuildPolicy::default());

        let by_id = search_matches(&graph, "rsk005");
        assert!(by_id.contains(&graph.index_of("RSK-005").unwrap()));

        assert!(search_matches(&graph, "   ").is_empty());
        assert!(search_matches(&graph, "zzzzqqq").is_empty());
    }
}
