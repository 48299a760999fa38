use eframe::egui::Context;

use super::super::ViewModel;

impl ViewModel {
    pub(in crate::app) fn update_fps_counter(&mut self, ctx: &Context) {
        const FPS_SAMPLE_WINDOW: usize = 180;

        let dt = ctx.input(|input| input.stable_dt);
        if dt <= f32::EPSILON {
            return;
        }

        self.fps_current = (1.0 / dt).clamp(0.0, 1000.0);
        self.fps_samples.push_back(self.fps_current);
        while self.fps_samples.len() > FPS_SAMPLE_WINDOW {
            self.fps_samples.pop_front();
        }
    }

    pub(in crate::app) fn fps_display_text(&self) -> Option<String> {
        if !self.show_fps_bar {
            return None;
        }

        let mut parts = vec![format!("FPS {:.0}", self.fps_current)];

        if self.fps_show_average && !self.fps_samples.is_empty() {
            let avg = self.fps_samples.iter().sum::<f32>() / self.fps_samples.len() as f32;
            parts.push(format!("avg {avg:.1}"));
        }

        if self.fps_show_frame_time && self.fps_current > f32::EPSILON {
            parts.push(format!("{:.1} ms", 1000.0 / self.fps_current));
        }

        Some(parts.join(" | "))
    }

    /// Node/edge counts and the cooling state of the current layout.
    pub(in crate::app) fn graph_stats_text(&self) -> Option<String> {
        let session = self.sessions.current()?;
        let graph = session.graph();
        let layout = match session.snapshot() {
            _ if session.is_pending() => "layout pending".to_owned(),
            Some(snapshot) if session.is_animating() => format!("alpha {:.3}", snapshot.alpha),
            _ => "layout settled".to_owned(),
        };

        Some(format!(
            "{} nodes / {} edges | {layout}",
            graph.node_count(),
            graph.edge_count()
        ))
    }
}
