use std::ops::RangeInclusive;

use eframe::egui::{self, Key, Response, Ui};

use crate::context::CiAttachment;

use super::super::ViewModel;

const SLIDER_KEY_BASE_RATE: f64 = 10.0;
const SLIDER_KEY_ACCEL_PER_SEC: f64 = 9.0;
const SLIDER_KEY_ACCEL_MAX: f64 = 40.0;

#[derive(Clone, Copy, Default)]
struct SliderKeyHoldState {
    positive_secs: f64,
    negative_secs: f64,
}

fn slider_key_accel_multiplier(hold_secs: f64) -> f64 {
    let ramp = hold_secs * SLIDER_KEY_ACCEL_PER_SEC;
    (1.0 + ramp + ramp * ramp * 0.15).min(SLIDER_KEY_ACCEL_MAX)
}

fn default_slider_key_step(range: &RangeInclusive<f64>) -> f64 {
    ((range.end() - range.start()) / 200.0).max(0.0005)
}

/// Holding an arrow key on a focused slider moves it faster the longer the
/// key is held.
fn apply_slider_arrow_acceleration(
    ui: &Ui,
    response: &Response,
    value: &mut f64,
    range: &RangeInclusive<f64>,
) -> bool {
    let state_id = response.id.with("arrow_key_hold_state");
    let mut hold_state = ui.ctx().data(|data| {
        data.get_temp::<SliderKeyHoldState>(state_id)
            .unwrap_or_default()
    });

    if !response.has_focus() {
        ui.ctx()
            .data_mut(|data| data.insert_temp(state_id, SliderKeyHoldState::default()));
        return false;
    }

    let (delta_time, increase_down, decrease_down) = ui.input(|input| {
        (
            f64::from(input.stable_dt.min(0.1)),
            input.key_down(Key::ArrowRight) || input.key_down(Key::ArrowUp),
            input.key_down(Key::ArrowLeft) || input.key_down(Key::ArrowDown),
        )
    });

    hold_state.positive_secs = if increase_down {
        hold_state.positive_secs + delta_time
    } else {
        0.0
    };
    hold_state.negative_secs = if decrease_down {
        hold_state.negative_secs + delta_time
    } else {
        0.0
    };
    ui.ctx()
        .data_mut(|data| data.insert_temp(state_id, hold_state));

    let direction = f64::from(i8::from(increase_down) - i8::from(decrease_down));
    if direction == 0.0 {
        return false;
    }

    let hold_secs = if direction > 0.0 {
        hold_state.positive_secs
    } else {
        hold_state.negative_secs
    };
    let speed = SLIDER_KEY_BASE_RATE * slider_key_accel_multiplier(hold_secs);
    let delta = direction * default_slider_key_step(range) * speed * delta_time;

    let old_value = *value;
    *value = (*value + delta).clamp(*range.start(), *range.end());
    ui.ctx().request_repaint();
    (*value - old_value).abs() > f64::EPSILON
}

fn force_slider(
    ui: &mut Ui,
    value: &mut f64,
    range: RangeInclusive<f64>,
    text: &str,
    hover: &str,
) -> bool {
    let slider = ui
        .add(
            egui::Slider::new(value, range.clone())
                .text(text)
                .clamping(egui::SliderClamping::Always),
        )
        .on_hover_text(hover);
    if slider.hovered() {
        slider.request_focus();
    }
    let dragged = slider.changed();
    dragged | apply_slider_arrow_acceleration(ui, &slider, value, &range)
}

impl ViewModel {
    pub(in crate::app) fn draw_controls(&mut self, ui: &mut Ui) {
        ui.heading("Layout");
        ui.add_space(4.0);

        ui.checkbox(&mut self.live_physics, "Live physics simulation")
            .on_hover_text("Advance the layout every frame until it cools down.");
        ui.checkbox(&mut self.show_labels, "Node labels")
            .on_hover_text("Draw the name and kind next to each node.");
        ui.checkbox(&mut self.show_quadtree_overlay, "Show quadtree overlay")
            .on_hover_text("Draw the Barnes-Hut partitions used for node repulsion.");

        ui.horizontal(|ui| {
            if ui
                .button("Re-run layout")
                .on_hover_text("Reheat the simulation from its current positions.")
                .clicked()
                && let Some(session) = self.sessions.current_mut()
            {
                session.reheat();
                self.live_physics = true;
            }
            if ui.button("Reset view").clicked() {
                self.reset_view();
            }
        });

        if let Some(mut params) = self.sessions.current().map(|session| *session.params()) {
            let mut changed = false;
            ui.collapsing("Forces", |ui| {
                changed |= force_slider(
                    ui,
                    &mut params.link_distance,
                    20.0..=400.0,
                    "Link distance",
                    "Rest length of every edge.",
                );
                changed |= force_slider(
                    ui,
                    &mut params.charge_strength,
                    -2000.0..=0.0,
                    "Charge",
                    "Many-body strength; negative values repel.",
                );
                changed |= force_slider(
                    ui,
                    &mut params.collision_radius,
                    0.0..=120.0,
                    "Collision radius",
                    "Minimum spacing kept around each node; zero turns collision off.",
                );
                changed |= force_slider(
                    ui,
                    &mut params.velocity_decay,
                    0.05..=0.9,
                    "Velocity decay",
                    "Share of velocity lost on every tick.",
                );
                changed |= force_slider(
                    ui,
                    &mut params.theta,
                    0.3..=1.5,
                    "Barnes-Hut theta",
                    "Higher values approximate distant nodes more coarsely.",
                );
            });
            if changed {
                self.set_layout_params(params);
            }
        }

        ui.collapsing("Graph policy", |ui| {
            let mut policy = self.config.policy;
            ui.label("Incident configuration items attach to");
            ui.radio_value(
                &mut policy.incident_ci_attachment,
                CiAttachment::PreferService,
                "the incident's service",
            )
            .on_hover_text("Falls back to the incident when the service is missing.");
            ui.radio_value(&mut policy.incident_ci_attachment, CiAttachment::Focal, "the incident");
            ui.checkbox(&mut policy.expand_risk_incidents, "Risk graphs include incidents")
                .on_hover_text("Follow risk -> problem -> incident.");

            if policy != self.config.policy {
                tracing::info!(?policy, "graph policy changed");
                self.config.policy = policy;
                self.rebuild_graph();
            }
        });

        ui.checkbox(&mut self.show_fps_bar, "FPS Display")
            .on_hover_text("Show a live FPS readout in the header.");
        ui.collapsing("FPS Display tuning", |ui| {
            ui.add_enabled_ui(self.show_fps_bar, |ui| {
                ui.checkbox(&mut self.fps_show_average, "Show average FPS")
                    .on_hover_text("Display the running average FPS over recent samples.");
                ui.checkbox(&mut self.fps_show_frame_time, "Show frame time")
                    .on_hover_text("Display frame duration in milliseconds.");
            });
        });
    }
}
