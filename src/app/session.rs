use crate::context::ContextGraph;
use crate::layout::{ForceParams, LayoutError, LayoutSnapshot, QuadtreeCell, Simulation};

/// One focal graph and its simulation. The simulation only exists once the
/// canvas has a size; until then the graph is pending and nothing is drawn.
pub(in crate::app) struct GraphSession {
    generation: u64,
    graph: ContextGraph,
    params: ForceParams,
    simulation: Option<Simulation>,
    snapshot: Option<LayoutSnapshot>,
    canvas: (f64, f64),
}

impl GraphSession {
    fn new(generation: u64, graph: ContextGraph, params: ForceParams) -> Self {
        Self {
            generation,
            graph,
            params,
            simulation: None,
            snapshot: None,
            canvas: (0.0, 0.0),
        }
    }

    pub(in crate::app) fn generation(&self) -> u64 {
        self.generation
    }

    pub(in crate::app) fn graph(&self) -> &ContextGraph {
        &self.graph
    }

    pub(in crate::app) fn params(&self) -> &ForceParams {
        &self.params
    }

    pub(in crate::app) fn snapshot(&self) -> Option<&LayoutSnapshot> {
        self.snapshot.as_ref()
    }

    pub(in crate::app) fn is_pending(&self) -> bool {
        self.simulation.is_none()
    }

    /// Starts the simulation on the first non-empty canvas and follows later
    /// resizes. Returns false while there is nothing to draw.
    pub(in crate::app) fn ensure_started(&mut self, width: f64, height: f64) -> bool {
        if let Some(simulation) = self.simulation.as_mut() {
            if (width, height) != self.canvas && simulation.resize(width, height).is_ok() {
                self.canvas = (width, height);
            }
            return true;
        }

        match Simulation::new(
            self.graph.node_count(),
            &self.graph.links(),
            width,
            height,
            self.params,
        ) {
            Ok(simulation) => {
                self.snapshot = Some(simulation.snapshot());
                self.simulation = Some(simulation);
                self.canvas = (width, height);
                tracing::debug!(
                    generation = self.generation,
                    focus = %self.graph.focus(),
                    "layout started"
                );
                true
            }
            Err(LayoutError::EmptyCanvas { .. }) => false,
            Err(error) => {
                tracing::error!(%error, generation = self.generation, "could not start layout");
                false
            }
        }
    }

    /// Runs one scheduled tick. Returns true when positions changed.
    pub(in crate::app) fn advance(&mut self) -> bool {
        let Some(snapshot) = self.simulation.as_mut().and_then(Simulation::tick) else {
            return false;
        };
        self.snapshot = Some(snapshot);
        true
    }

    pub(in crate::app) fn is_animating(&self) -> bool {
        self.simulation.as_ref().is_some_and(Simulation::is_running)
    }

    /// Layout coordinates of the canvas center.
    pub(in crate::app) fn center(&self) -> (f64, f64) {
        (self.canvas.0 / 2.0, self.canvas.1 / 2.0)
    }

    pub(in crate::app) fn start_drag(&mut self, node: usize, x: f64, y: f64) {
        let Some(simulation) = self.simulation.as_mut() else {
            return;
        };
        if let Err(error) = simulation.start_drag(node, x, y) {
            tracing::warn!(%error, "ignoring drag");
        }
    }

    pub(in crate::app) fn drag_to(&mut self, x: f64, y: f64) {
        if let Some(simulation) = self.simulation.as_mut() {
            simulation.drag_to(x, y);
        }
    }

    pub(in crate::app) fn end_drag(&mut self) {
        if let Some(simulation) = self.simulation.as_mut() {
            simulation.end_drag();
        }
    }

    pub(in crate::app) fn dragged_node(&self) -> Option<usize> {
        match self.simulation.as_ref()?.drag_state() {
            crate::layout::DragState::Dragging { node } => Some(node),
            crate::layout::DragState::Free => None,
        }
    }

    pub(in crate::app) fn set_params(&mut self, params: ForceParams) {
        self.params = params;
        if let Some(simulation) = self.simulation.as_mut() {
            simulation.set_params(params);
            simulation.reheat();
        }
    }

    pub(in crate::app) fn reheat(&mut self) {
        if let Some(simulation) = self.simulation.as_mut() {
            simulation.reheat();
        }
    }

    pub(in crate::app) fn quadtree_cells(&self) -> Vec<QuadtreeCell> {
        self.simulation
            .as_ref()
            .map(Simulation::quadtree_cells)
            .unwrap_or_default()
    }
}

/// Holds the live session. Opening a new graph drops the previous session
/// together with its simulation, which ends its tick scheduling.
#[derive(Default)]
pub(in crate::app) struct SessionSlot {
    next_generation: u64,
    current: Option<GraphSession>,
}

impl SessionSlot {
    pub(in crate::app) fn open(&mut self, graph: ContextGraph, params: ForceParams) -> u64 {
        self.next_generation = self.next_generation.wrapping_add(1);
        let generation = self.next_generation;
        if let Some(previous) = self.current.take() {
            tracing::debug!(
                previous = previous.generation,
                generation,
                "discarding graph session"
            );
        }
        self.current = Some(GraphSession::new(generation, graph, params));
        generation
    }

    pub(in crate::app) fn current(&self) -> Option<&GraphSession> {
        self.current.as_ref()
    }

    pub(in crate::app) fn current_mut(&mut self) -> Option<&mut GraphSession> {
        self.current.as_mut()
    }
}
