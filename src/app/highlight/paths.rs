use std::collections::HashSet;

use crate::context::ContextGraph;

/// Nodes and edges on the shortest path from the focal node to `target`.
/// Edges keep their stored direction even when the walk went against it.
pub(super) fn focal_path(
    graph: &ContextGraph,
    target: usize,
) -> (HashSet<usize>, HashSet<(usize, usize)>) {
    let mut path_nodes = HashSet::new();
    let mut path_edges = HashSet::new();

    let Some(path) = graph.path_from_focal(target) else {
        return (path_nodes, path_edges);
    };

    path_nodes.extend(path.iter().copied());
    for pair in path.windows(2) {
        if let [from, to] = *pair {
            if graph.outgoing(from).contains(&to) {
                path_edges.insert((from, to));
            } else {
                path_edges.insert((to, from));
            }
        }
    }

    (path_nodes, path_edges)
}
