use serde::{Deserialize, Serialize};
use thiserror::Error;

mod forces;
mod quadtree;

use forces::{ChargeParams, Lcg, Link, apply_center, apply_charge, apply_collision, apply_links};
pub use quadtree::QuadtreeCell;
use quadtree::{Point, QuadNode, collect_quadtree_cells};

const INITIAL_RADIUS: f64 = 10.0;

#[derive(Debug, Error, PartialEq)]
pub enum LayoutError {
    #[error("canvas has no area ({width}x{height})")]
    EmptyCanvas { width: f64, height: f64 },
    #[error("link {from}->{to} points outside {node_count} nodes")]
    LinkOutOfRange {
        from: usize,
        to: usize,
        node_count: usize,
    },
    #[error("node {index} does not exist")]
    UnknownNode { index: usize },
    #[error("{name} must be {expected}, got {value}")]
    InvalidParam {
        name: &'static str,
        expected: &'static str,
        value: f64,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ForceParams {
    pub link_distance: f64,
    pub charge_strength: f64,
    /// Barnes-Hut opening angle.
    pub theta: f64,
    /// Per-node collision radius; zero disables the collision force.
    pub collision_radius: f64,
    pub collision_strength: f64,
    pub velocity_decay: f64,
    pub alpha_min: f64,
    /// Ticks for alpha to cool from 1 to `alpha_min` with no target.
    pub cooling_ticks: u32,
    pub drag_alpha_target: f64,
}

impl ForceParams {
    /// Entity graphs: multi-hop, with collision.
    pub fn entity() -> Self {
        Self {
            link_distance: 120.0,
            charge_strength: -500.0,
            theta: 0.9,
            collision_radius: 50.0,
            collision_strength: 1.0,
            velocity_decay: 0.4,
            alpha_min: 0.001,
            cooling_ticks: 300,
            drag_alpha_target: 0.3,
        }
    }

    pub fn topology() -> Self {
        Self {
            link_distance: 150.0,
            charge_strength: -400.0,
            collision_radius: 0.0,
            ..Self::entity()
        }
    }

    /// Rejects values that would keep the simulation from cooling or let
    /// velocities diverge.
    pub fn validate(&self) -> Result<(), LayoutError> {
        fn check(
            name: &'static str,
            value: f64,
            expected: &'static str,
            ok: impl Fn(f64) -> bool,
        ) -> Result<(), LayoutError> {
            if value.is_finite() && ok(value) {
                Ok(())
            } else {
                Err(LayoutError::InvalidParam {
                    name,
                    expected,
                    value,
                })
            }
        }

        check("alphaMin", self.alpha_min, "in (0, 1)", |v| v > 0.0 && v < 1.0)?;
        check("velocityDecay", self.velocity_decay, "in [0, 1]", |v| {
            (0.0..=1.0).contains(&v)
        })?;
        check("theta", self.theta, "positive", |v| v > 0.0)?;
        check("linkDistance", self.link_distance, "positive", |v| v > 0.0)?;
        check("collisionRadius", self.collision_radius, "non-negative", |v| v >= 0.0)?;
        check("collisionStrength", self.collision_strength, "non-negative", |v| v >= 0.0)?;
        check("chargeStrength", self.charge_strength, "finite", |_| true)?;
        check("dragAlphaTarget", self.drag_alpha_target, "in [0, 1]", |v| {
            (0.0..=1.0).contains(&v)
        })
    }

    pub fn alpha_decay(&self) -> f64 {
        1.0 - self.alpha_min.powf(1.0 / f64::from(self.cooling_ticks.max(1)))
    }
}

impl Default for ForceParams {
    fn default() -> Self {
        Self::entity()
    }
}

/// Simulation-owned node state. `pin` overrides the position every tick.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct NodePosition {
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    pub vy: f64,
    pub pin: Option<(f64, f64)>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DragState {
    #[default]
    Free,
    Dragging {
        node: usize,
    },
}

/// Read-only copy of the layout after a tick.
#[derive(Clone, Debug, PartialEq)]
pub struct LayoutSnapshot {
    pub tick: u64,
    pub alpha: f64,
    pub positions: Vec<(f64, f64)>,
    pub pinned: Option<usize>,
}

impl LayoutSnapshot {
    pub fn position(&self, index: usize) -> Option<(f64, f64)> {
        self.positions.get(index).copied()
    }
}

fn check_canvas(width: f64, height: f64) -> Result<Point, LayoutError> {
    if width.is_nan() || height.is_nan() || width <= 0.0 || height <= 0.0 {
        return Err(LayoutError::EmptyCanvas { width, height });
    }
    Ok([width / 2.0, height / 2.0])
}

/// Force-directed layout with d3-style cooling: link, charge, center and
/// collision forces feed velocities, then velocities decay and integrate.
#[derive(Clone, Debug)]
pub struct Simulation {
    nodes: Vec<NodePosition>,
    links: Vec<Link>,
    params: ForceParams,
    center: Point,
    alpha: f64,
    alpha_target: f64,
    alpha_decay: f64,
    tick: u64,
    running: bool,
    drag: DragState,
    rng: Lcg,
    positions_scratch: Vec<Point>,
}

impl Simulation {
    pub fn new(
        node_count: usize,
        links: &[(usize, usize)],
        width: f64,
        height: f64,
        params: ForceParams,
    ) -> Result<Self, LayoutError> {
        let center = check_canvas(width, height)?;
        if let Some(&(source, target)) = links
            .iter()
            .find(|(source, target)| *source >= node_count || *target >= node_count)
        {
            return Err(LayoutError::LinkOutOfRange {
                from: source,
                to: target,
                node_count,
            });
        }

        // Phyllotaxis spiral in insertion order.
        let golden_angle = std::f64::consts::PI * (3.0 - 5.0_f64.sqrt());
        let nodes = (0..node_count)
            .map(|index| {
                let radius = INITIAL_RADIUS * (0.5 + index as f64).sqrt();
                let angle = index as f64 * golden_angle;
                NodePosition {
                    x: center[0] + radius * angle.cos(),
                    y: center[1] + radius * angle.sin(),
                    ..NodePosition::default()
                }
            })
            .collect();

        tracing::debug!(nodes = node_count, links = links.len(), width, height, "starting layout");

        Ok(Self {
            nodes,
            links: Link::weighted(links, node_count),
            alpha_decay: params.alpha_decay(),
            params,
            center,
            alpha: 1.0,
            alpha_target: 0.0,
            tick: 0,
            running: true,
            drag: DragState::Free,
            rng: Lcg::new(),
            positions_scratch: Vec::with_capacity(node_count),
        })
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn drag_state(&self) -> DragState {
        self.drag
    }

    pub fn params(&self) -> &ForceParams {
        &self.params
    }

    pub fn set_params(&mut self, params: ForceParams) {
        self.alpha_decay = params.alpha_decay();
        self.params = params;
    }

    /// Scheduled tick: advances once while the simulation is warm and
    /// returns the new snapshot, or `None` once it has cooled.
    pub fn tick(&mut self) -> Option<LayoutSnapshot> {
        if !self.running {
            return None;
        }

        self.step();
        if self.alpha < self.params.alpha_min {
            self.running = false;
            tracing::trace!(ticks = self.tick, "layout cooled");
        }
        Some(self.snapshot())
    }

    /// One integration step regardless of temperature.
    pub fn step(&mut self) {
        self.alpha += (self.alpha_target - self.alpha) * self.alpha_decay;
        let alpha = self.alpha;

        apply_links(
            &mut self.nodes,
            &self.links,
            self.params.link_distance,
            alpha,
            &mut self.rng,
        );
        apply_charge(
            &mut self.nodes,
            &mut self.positions_scratch,
            ChargeParams {
                strength: self.params.charge_strength,
                theta2: self.params.theta * self.params.theta,
                alpha,
            },
            &mut self.rng,
        );
        apply_center(&mut self.nodes, self.center);
        apply_collision(
            &mut self.nodes,
            self.params.collision_radius,
            self.params.collision_strength,
            &mut self.rng,
        );

        let keep = 1.0 - self.params.velocity_decay;
        for node in &mut self.nodes {
            if let Some((x, y)) = node.pin {
                node.x = x;
                node.y = y;
                node.vx = 0.0;
                node.vy = 0.0;
            } else {
                node.vx *= keep;
                node.vy *= keep;
                node.x += node.vx;
                node.y += node.vy;
            }
        }

        self.tick += 1;
    }

    pub fn snapshot(&self) -> LayoutSnapshot {
        LayoutSnapshot {
            tick: self.tick,
            alpha: self.alpha,
            positions: self.nodes.iter().map(|node| (node.x, node.y)).collect(),
            pinned: match self.drag {
                DragState::Dragging { node } => Some(node),
                DragState::Free => None,
            },
        }
    }

    /// Pins `node` at the pointer and keeps the simulation warm while dragging.
    pub fn start_drag(&mut self, node: usize, x: f64, y: f64) -> Result<(), LayoutError> {
        if node >= self.nodes.len() {
            return Err(LayoutError::UnknownNode { index: node });
        }
        if let DragState::Dragging { node: previous } = self.drag {
            self.nodes[previous].pin = None;
        }

        self.nodes[node].pin = Some((x, y));
        self.drag = DragState::Dragging { node };
        self.alpha_target = self.params.drag_alpha_target;
        self.running = true;
        Ok(())
    }

    pub fn drag_to(&mut self, x: f64, y: f64) {
        if let DragState::Dragging { node } = self.drag {
            self.nodes[node].pin = Some((x, y));
        }
    }

    /// Releases the pin; the node continues from where it was dropped.
    pub fn end_drag(&mut self) {
        if let DragState::Dragging { node } = self.drag {
            self.nodes[node].pin = None;
        }
        self.drag = DragState::Free;
        self.alpha_target = 0.0;
    }

    /// Moves the centering target. The layout keeps its current positions.
    pub fn resize(&mut self, width: f64, height: f64) -> Result<(), LayoutError> {
        let center = check_canvas(width, height)?;
        if center != self.center {
            self.center = center;
            self.running = true;
        }
        Ok(())
    }

    pub fn reheat(&mut self) {
        self.alpha = 1.0;
        self.running = true;
    }

    pub fn quadtree_cells(&self) -> Vec<QuadtreeCell> {
        let positions = self.nodes.iter().map(|node| [node.x, node.y]).collect::<Vec<_>>();
        let mut cells = Vec::new();
        if let Some(tree) = QuadNode::build(&positions) {
            collect_quadtree_cells(&tree, 0, &mut cells);
        }
        cells
    }
}
