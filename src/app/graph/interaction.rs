use eframe::egui::{self, Pos2, Rect, Ui, Vec2, vec2};

use super::super::ViewModel;
use super::super::render_utils::{screen_to_world, world_to_screen};

/// Maps between layout coordinates (origin at the canvas corner, as the
/// simulation sees them) and screen coordinates under the current pan/zoom.
#[derive(Clone, Copy, Debug)]
pub(super) struct CanvasTransform {
    pub(super) rect: Rect,
    pub(super) pan: Vec2,
    pub(super) zoom: f32,
    pub(super) center: (f64, f64),
}

impl CanvasTransform {
    pub(super) fn to_screen(self, (x, y): (f64, f64)) -> Pos2 {
        let world = vec2((x - self.center.0) as f32, (y - self.center.1) as f32);
        world_to_screen(self.rect, self.pan, self.zoom, world)
    }

    pub(super) fn to_layout(self, screen: Pos2) -> (f64, f64) {
        let world = screen_to_world(self.rect, self.pan, self.zoom, screen);
        (
            f64::from(world.x) + self.center.0,
            f64::from(world.y) + self.center.1,
        )
    }
}

/// Closest node whose circle contains `point`.
pub(super) fn node_at(screen_positions: &[Pos2], radius: f32, point: Pos2) -> Option<usize> {
    screen_positions
        .iter()
        .enumerate()
        .filter_map(|(index, position)| {
            let distance = position.distance(point);
            (distance <= radius).then_some((index, distance))
        })
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(index, _)| index)
}

impl ViewModel {
    pub(in crate::app) fn handle_graph_zoom(
        &mut self,
        ui: &Ui,
        rect: Rect,
        response: &egui::Response,
    ) {
        if !response.hovered() {
            return;
        }

        let scroll = ui.input(|input| input.raw_scroll_delta.y);
        if scroll.abs() <= f32::EPSILON {
            return;
        }

        let pointer = ui
            .input(|input| input.pointer.hover_pos())
            .unwrap_or_else(|| rect.center());
        let world_before = screen_to_world(rect, self.pan, self.zoom, pointer);

        let zoom_factor = (1.0 + (scroll * 0.0018)).clamp(0.85, 1.15);
        self.zoom = (self.zoom * zoom_factor).clamp(0.1, 5.0);
        self.pan = pointer - rect.center() - (world_before * self.zoom);
    }

    /// Pans unless the primary button is busy dragging a node.
    pub(in crate::app) fn handle_graph_pan(
        &mut self,
        response: &egui::Response,
        dragging_node: bool,
    ) {
        let primary_pan = response.dragged_by(egui::PointerButton::Primary) && !dragging_node;
        if primary_pan
            || response.dragged_by(egui::PointerButton::Secondary)
            || response.dragged_by(egui::PointerButton::Middle)
        {
            self.pan += response.drag_delta();
        }
    }

    pub(in crate::app) fn reset_view(&mut self) {
        self.pan = Vec2::ZERO;
        self.zoom = 1.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn transform(pan: Vec2, zoom: f32) -> CanvasTransform {
        CanvasTransform {
            rect: Rect::from_min_size(Pos2::new(300.0, 40.0), vec2(800.0, 600.0)),
            pan,
            zoom,
            center: (400.0, 300.0),
        }
    }

    #[test]
    fn layout_center_maps_to_canvas_center() {
        let transform = transform(Vec2::ZERO, 1.0);
        assert_eq!(transform.to_screen((400.0, 300.0)), Pos2::new(700.0, 340.0));
    }

    #[test]
    fn pointer_maps_back_to_layout() {
        let transform = transform(vec2(-25.0, 60.0), 2.0);
        let (x, y) = transform.to_layout(transform.to_screen((512.0, 128.0)));

        assert!((x - 512.0).abs() < 1e-3);
        assert!((y - 128.0).abs() < 1e-3);
    }

    #[test]
    fn node_hit_prefers_closest_circle() {
        let positions = [Pos2::new(0.0, 0.0), Pos2::new(30.0, 0.0), Pos2::new(300.0, 0.0)];

        assert_eq!(node_at(&positions, 20.0, Pos2::new(18.0, 0.0)), Some(1));
        assert_eq!(node_at(&positions, 20.0, Pos2::new(5.0, 2.0)), Some(0));
        assert_eq!(node_at(&positions, 20.0, Pos2::new(150.0, 0.0)), None);
    }
}
