use std::collections::HashSet;

use crate::context::ContextGraph;

mod paths;

use self::paths::focal_path;

/// Nodes and edges emphasized around the selected node.
#[derive(Debug, Default)]
pub(in crate::app) struct HighlightState {
    pub(in crate::app) related_nodes: HashSet<usize>,
    pub(in crate::app) related_edges: HashSet<(usize, usize)>,
    pub(in crate::app) focal_path_nodes: HashSet<usize>,
    pub(in crate::app) focal_path_edges: HashSet<(usize, usize)>,
}

impl HighlightState {
    pub(in crate::app) fn is_empty(&self) -> bool {
        self.related_nodes.is_empty() && self.focal_path_nodes.is_empty()
    }
}

pub(super) fn build_highlight_state(graph: &ContextGraph, selected: usize) -> HighlightState {
    if selected >= graph.node_count() {
        return HighlightState::default();
    }

    let mut related_nodes = HashSet::from([selected]);
    let mut related_edges = HashSet::new();
    for &target in graph.outgoing(selected) {
        related_nodes.insert(target);
        related_edges.insert((selected, target));
    }
    for &source in graph.incoming(selected) {
        related_nodes.insert(source);
        related_edges.insert((source, selected));
    }

    let (focal_path_nodes, focal_path_edges) = focal_path(graph, selected);

    HighlightState {
        related_nodes,
        related_edges,
        focal_path_nodes,
        focal_path_edges,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{BuildPolicy, Focus, build_graph};
    use crate::itsm::{ItsmStore, sample_dataset};

    #[test]
    fn selection_marks_neighbors_and_path_to_focal() {
        let store = ItsmStore::from_dataset(sample_dataset()).unwrap();
        let graph = build_graph(
            &Focus::Risk("RSK-005".to_owned()),
            &store,
            &BuildPolicy::default(),
        );
        let problem = graph.index_of("PRB00047").unwrap();
        let incident = graph.index_of("INC0001026").unwrap();
        let focal = graph.focal_index().unwrap();

        let state = build_highlight_state(&graph, incident);

        assert_eq!(state.related_nodes, HashSet::from([incident, problem]));
        assert_eq!(state.related_edges, HashSet::from([(problem, incident)]));
        assert_eq!(state.focal_path_nodes, HashSet::from([focal, problem, incident]));
        assert_eq!(
            state.focal_path_edges,
            HashSet::from([(focal, problem), (problem, incident)])
        );
    }

    #[test]
    fn out_of_range_selection_highlights_nothing() {
        let store = ItsmStore::from_dataset(sample_dataset()).unwrap();
        let graph = build_graph(&Focus::Topology, &store, &BuildPolicy::default());

        let state = build_highlight_state(&graph, graph.node_count());

        assert!(state.is_empty());
    }
}
