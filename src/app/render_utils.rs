use eframe::egui::{Color32, Painter, Pos2, Rect, Shape, Stroke, Vec2, vec2};

use crate::context::NodeKind;

/// Node circle radius in layout units.
pub(super) const NODE_RADIUS: f32 = 20.0;

pub(super) fn kind_color(kind: NodeKind) -> Color32 {
    let [r, g, b] = kind.color_rgb();
    Color32::from_rgb(r, g, b)
}

pub(super) fn blend_color(base: Color32, overlay: Color32, amount: f32) -> Color32 {
    let amount = amount.clamp(0.0, 1.0);
    let mix = |a: u8, b: u8| (f32::from(a) * (1.0 - amount) + f32::from(b) * amount) as u8;

    Color32::from_rgba_unmultiplied(
        mix(base.r(), overlay.r()),
        mix(base.g(), overlay.g()),
        mix(base.b(), overlay.b()),
        mix(base.a(), overlay.a()),
    )
}

pub(super) fn dim_color(color: Color32, factor: f32) -> Color32 {
    let factor = factor.clamp(0.0, 1.0);
    Color32::from_rgba_unmultiplied(
        (f32::from(color.r()) * factor) as u8,
        (f32::from(color.g()) * factor) as u8,
        (f32::from(color.b()) * factor) as u8,
        (f32::from(color.a()) * (0.45 + factor * 0.55)) as u8,
    )
}

pub(super) fn draw_background(painter: &Painter, rect: Rect, pan: Vec2, zoom: f32) {
    painter.rect_filled(rect, 0.0, Color32::from_rgb(15, 23, 42));

    let step = (48.0 * zoom.clamp(0.6, 1.8)).max(20.0);
    let origin = rect.center() + pan;
    let stroke = Stroke::new(1.0, Color32::from_rgba_unmultiplied(71, 85, 105, 60));

    let mut x = rect.left() + (origin.x - rect.left()).rem_euclid(step);
    while x < rect.right() {
        painter.line_segment([Pos2::new(x, rect.top()), Pos2::new(x, rect.bottom())], stroke);
        x += step;
    }

    let mut y = rect.top() + (origin.y - rect.top()).rem_euclid(step);
    while y < rect.bottom() {
        painter.line_segment([Pos2::new(rect.left(), y), Pos2::new(rect.right(), y)], stroke);
        y += step;
    }
}

pub(super) fn circle_visible(rect: Rect, position: Pos2, radius: f32) -> bool {
    rect.expand(radius).contains(position)
}

/// Cheap culling: the segment's bounding box overlaps the canvas.
pub(super) fn edge_visible(rect: Rect, start: Pos2, end: Pos2, padding: f32) -> bool {
    Rect::from_two_pos(start, end)
        .expand(padding)
        .intersects(rect)
}

/// `world` is relative to the layout center.
pub(super) fn world_to_screen(rect: Rect, pan: Vec2, zoom: f32, world: Vec2) -> Pos2 {
    rect.center() + pan + world * zoom
}

pub(super) fn screen_to_world(rect: Rect, pan: Vec2, zoom: f32, screen: Pos2) -> Vec2 {
    (screen - rect.center() - pan) / zoom
}

/// Line from the rim of the source circle to an arrowhead touching the rim
/// of the target circle.
pub(super) fn draw_arrow(painter: &Painter, start: Pos2, end: Pos2, radius: f32, stroke: Stroke) {
    let delta = end - start;
    let length = delta.length();
    if length <= radius * 2.0 {
        return;
    }

    let direction = delta / length;
    let arrow_size = (stroke.width * 4.0).clamp(5.0, 12.0);
    let tip = end - direction * radius;
    let back = tip - direction * arrow_size;
    let side = vec2(-direction.y, direction.x) * arrow_size * 0.5;

    painter.line_segment([start + direction * radius, back], stroke);
    painter.add(Shape::convex_polygon(
        vec![tip, back + side, back - side],
        stroke.color,
        Stroke::NONE,
    ));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn screen_and_world_round_trip() {
        let rect = Rect::from_min_size(Pos2::new(10.0, 20.0), vec2(800.0, 600.0));
        let pan = vec2(35.0, -12.0);
        let world = vec2(-120.0, 64.0);

        let screen = world_to_screen(rect, pan, 1.5, world);
        let back = screen_to_world(rect, pan, 1.5, screen);

        assert!((back - world).length() < 1e-3);
    }

    #[test]
    fn blend_endpoints() {
        let red = Color32::from_rgb(255, 0, 0);
        let blue = Color32::from_rgb(0, 0, 255);
        assert_eq!(blend_color(red, blue, 0.0), red);
        assert_eq!(blend_color(red, blue, 1.0), blue);
    }

    #[test]
    fn edge_culling_uses_bounds() {
        let rect = Rect::from_min_size(Pos2::ZERO, vec2(100.0, 100.0));
        assert!(edge_visible(rect, Pos2::new(-50.0, 50.0), Pos2::new(150.0, 50.0), 1.0));
        assert!(!edge_visible(rect, Pos2::new(200.0, 0.0), Pos2::new(300.0, 80.0), 1.0));
    }
}
