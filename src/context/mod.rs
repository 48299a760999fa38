use std::collections::{HashMap, HashSet, VecDeque};
use std::fmt;
use std::str::FromStr;

use thiserror::Error;

mod build;
mod policy;

pub use build::{build_graph, build_topology};
pub use policy::{BuildPolicy, CiAttachment};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Incident,
    Problem,
    Change,
    Risk,
    Service,
    ConfigurationItem,
    Epic,
    AiService,
    Goal,
    Process,
    Application,
    Server,
    Database,
    Network,
}

impl NodeKind {
    pub const ALL: [Self; 14] = [
        Self::Incident,
        Self::Problem,
        Self::Change,
        Self::Risk,
        Self::Service,
        Self::ConfigurationItem,
        Self::Epic,
        Self::AiService,
        Self::Goal,
        Self::Process,
        Self::Application,
        Self::Server,
        Self::Database,
        Self::Network,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Incident => "Incident",
            Self::Problem => "Problem",
            Self::Change => "Change",
            Self::Risk => "Risk",
            Self::Service => "Service",
            Self::ConfigurationItem => "Configuration Item",
            Self::Epic => "Epic",
            Self::AiService => "AI Service",
            Self::Goal => "Goal",
            Self::Process => "Process",
            Self::Application => "Application",
            Self::Server => "Server",
            Self::Database => "Database",
            Self::Network => "Network",
        }
    }

    /// Single letter drawn inside the node circle.
    pub fn glyph(self) -> char {
        match self {
            Self::Incident => 'I',
            Self::Problem => 'P',
            Self::Change => 'C',
            Self::Risk => 'R',
            Self::Service => 'S',
            Self::ConfigurationItem => 'C',
            Self::Epic => 'E',
            Self::AiService => 'A',
            Self::Goal => 'G',
            Self::Process => 'P',
            Self::Application => 'A',
            Self::Server => 'S',
            Self::Database => 'D',
            Self::Network => 'N',
        }
    }

    pub fn color_rgb(self) -> [u8; 3] {
        match self {
            Self::Incident | Self::Risk => [0xef, 0x44, 0x44],
            Self::Problem | Self::Database => [0xf9, 0x73, 0x16],
            Self::Change => [0x06, 0xb6, 0xd4],
            Self::Service | Self::Application => [0x3b, 0x82, 0xf6],
            Self::ConfigurationItem | Self::Server => [0x64, 0x74, 0x8b],
            Self::Epic | Self::Process => [0x8b, 0x5c, 0xf6],
            Self::AiService => [0x10, 0xb9, 0x81],
            Self::Goal => [0xf5, 0x9e, 0x0b],
            Self::Network => [0x22, 0xc5, 0x5e],
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GraphNode {
    pub id: String,
    pub label: String,
    pub kind: NodeKind,
    /// False when the id was not found and `label` fell back to the raw id.
    pub resolved: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct GraphEdge {
    pub source: usize,
    pub target: usize,
}

/// Entity the context graph is centered on.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Focus {
    Incident(String),
    Problem(String),
    Risk(String),
    Epic(String),
    AiService(String),
    ConfigItem(String),
    Topology,
}

impl Focus {
    pub fn id(&self) -> Option<&str> {
        match self {
            Self::Incident(id)
            | Self::Problem(id)
            | Self::Risk(id)
            | Self::Epic(id)
            | Self::AiService(id)
            | Self::ConfigItem(id) => Some(id),
            Self::Topology => None,
        }
    }

    pub fn kind(&self) -> Option<NodeKind> {
        match self {
            Self::Incident(_) => Some(NodeKind::Incident),
            Self::Problem(_) => Some(NodeKind::Problem),
            Self::Risk(_) => Some(NodeKind::Risk),
            Self::Epic(_) => Some(NodeKind::Epic),
            Self::AiService(_) => Some(NodeKind::AiService),
            Self::ConfigItem(_) => Some(NodeKind::ConfigurationItem),
            Self::Topology => None,
        }
    }

    /// Focus that re-centers the graph on a node of `kind`. CMDB groups all
    /// map to configuration items; services, changes and goals cannot be
    /// focused.
    pub fn for_node(kind: NodeKind, id: &str) -> Option<Self> {
        let id = id.to_owned();
        match kind {
            NodeKind::Incident => Some(Self::Incident(id)),
            NodeKind::Problem => Some(Self::Problem(id)),
            NodeKind::Risk => Some(Self::Risk(id)),
            NodeKind::Epic => Some(Self::Epic(id)),
            NodeKind::AiService => Some(Self::AiService(id)),
            NodeKind::ConfigurationItem
            | NodeKind::Process
            | NodeKind::Application
            | NodeKind::Server
            | NodeKind::Database
            | NodeKind::Network => Some(Self::ConfigItem(id)),
            NodeKind::Change | NodeKind::Service | NodeKind::Goal => None,
        }
    }

    pub fn title(&self) -> String {
        match (self.kind(), self.id()) {
            (Some(kind), Some(id)) => format!("{kind} {id}"),
            _ => "CMDB topology".to_owned(),
        }
    }
}

impl fmt::Display for Focus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (prefix, id) = match self {
            Self::Incident(id) => ("incident", id),
            Self::Problem(id) => ("problem", id),
            Self::Risk(id) => ("risk", id),
            Self::Epic(id) => ("epic", id),
            Self::AiService(id) => ("ai-service", id),
            Self::ConfigItem(id) => ("ci", id),
            Self::Topology => return f.write_str("cmdb"),
        };
        write!(f, "{prefix}:{id}")
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseFocusError {
    #[error("expected `<kind>:<id>` or `cmdb`, got `{0}`")]
    Malformed(String),
    #[error("unknown entity kind `{0}` (expected incident, problem, risk, epic, ai-service or ci)")]
    UnknownKind(String),
    #[error("focus `{0}` has an empty id")]
    EmptyId(String),
}

impl FromStr for Focus {
    type Err = ParseFocusError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let raw = raw.trim();
        if raw.eq_ignore_ascii_case("cmdb") {
            return Ok(Self::Topology);
        }

        let Some((kind, id)) = raw.split_once(':') else {
            return Err(ParseFocusError::Malformed(raw.to_owned()));
        };
        let id = id.trim();
        if id.is_empty() {
            return Err(ParseFocusError::EmptyId(raw.to_owned()));
        }

        let id = id.to_owned();
        match kind.trim().to_ascii_lowercase().as_str() {
            "incident" => Ok(Self::Incident(id)),
            "problem" => Ok(Self::Problem(id)),
            "risk" => Ok(Self::Risk(id)),
            "epic" => Ok(Self::Epic(id)),
            "ai-service" | "ai" => Ok(Self::AiService(id)),
            "ci" => Ok(Self::ConfigItem(id)),
            other => Err(ParseFocusError::UnknownKind(other.to_owned())),
        }
    }
}

/// Nodes and edges for one focal entity. Node ids are unique and edge
/// endpoints always index into `nodes`.
#[derive(Clone, Debug)]
pub struct ContextGraph {
    focus: Focus,
    nodes: Vec<GraphNode>,
    edges: Vec<GraphEdge>,
    index_by_id: HashMap<String, usize>,
    outgoing: Vec<Vec<usize>>,
    incoming: Vec<Vec<usize>>,
    focal: Option<usize>,
}

impl ContextGraph {
    fn new(
        focus: Focus,
        nodes: Vec<GraphNode>,
        edges: Vec<GraphEdge>,
        index_by_id: HashMap<String, usize>,
        focal: Option<usize>,
    ) -> Self {
        let mut outgoing = vec![Vec::new(); nodes.len()];
        let mut incoming = vec![Vec::new(); nodes.len()];
        for edge in &edges {
            outgoing[edge.source].push(edge.target);
            incoming[edge.target].push(edge.source);
        }

        Self {
            focus,
            nodes,
            edges,
            index_by_id,
            outgoing,
            incoming,
            focal,
        }
    }

    pub fn focus(&self) -> &Focus {
        &self.focus
    }

    pub fn nodes(&self) -> &[GraphNode] {
        &self.nodes
    }

    pub fn edges(&self) -> &[GraphEdge] {
        &self.edges
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn focal_index(&self) -> Option<usize> {
        self.focal
    }

    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.index_by_id.get(id).copied()
    }

    pub fn node_by_id(&self, id: &str) -> Option<&GraphNode> {
        self.index_of(id).and_then(|index| self.nodes.get(index))
    }

    pub fn outgoing(&self, index: usize) -> &[usize] {
        self.outgoing.get(index).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn incoming(&self, index: usize) -> &[usize] {
        self.incoming.get(index).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Directly connected nodes in either direction, without duplicates.
    pub fn neighbors(&self, index: usize) -> Vec<usize> {
        let mut seen = HashSet::new();
        self.outgoing(index)
            .iter()
            .chain(self.incoming(index))
            .copied()
            .filter(|neighbor| seen.insert(*neighbor))
            .collect()
    }

    pub fn unresolved(&self) -> impl Iterator<Item = &GraphNode> {
        self.nodes.iter().filter(|node| !node.resolved)
    }

    /// Edge index pairs, for the layout engine.
    pub fn links(&self) -> Vec<(usize, usize)> {
        self.edges
            .iter()
            .map(|edge| (edge.source, edge.target))
            .collect()
    }

    /// Shortest path from the focal node to `target`, walking edges in either
    /// direction. Returns node indices starting at the focal node.
    pub fn path_from_focal(&self, target: usize) -> Option<Vec<usize>> {
        let root = self.focal?;
        if target >= self.nodes.len() {
            return None;
        }
        if root == target {
            return Some(vec![root]);
        }

        let mut queue = VecDeque::from([root]);
        let mut parent = vec![usize::MAX; self.nodes.len()];
        let mut visited = vec![false; self.nodes.len()];
        visited[root] = true;

        while let Some(node) = queue.pop_front() {
            if node == target {
                break;
            }
            for &next in self.outgoing[node].iter().chain(&self.incoming[node]) {
                if !visited[next] {
                    visited[next] = true;
                    parent[next] = node;
                    queue.push_back(next);
                }
            }
        }

        if !visited[target] {
            return None;
        }

        let mut path = vec![target];
        let mut cursor = target;
        while cursor != root {
            cursor = parent[cursor];
            path.push(cursor);
        }
        path.reverse();
        Some(path)
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case::risk("risk:RSK-001", Focus::Risk("RSK-001".to_owned()))]
    #[case::ai_service("ai-service:AI-002", Focus::AiService("AI-002".to_owned()))]
    #[case::ci_with_spaces(" ci : CI-DB-001 ", Focus::ConfigItem("CI-DB-001".to_owned()))]
    #[case::topology("cmdb", Focus::Topology)]
    #[case::topology_upper("CMDB", Focus::Topology)]
    fn focus_parses(#[case] raw: &str, #[case] expected: Focus) {
        assert_eq!(raw.parse::<Focus>(), Ok(expected));
    }

    #[rstest]
    #[case::no_separator("RSK-001", ParseFocusError::Malformed("RSK-001".to_owned()))]
    #[case::unknown_kind("goal:SG-001", ParseFocusError::UnknownKind("goal".to_owned()))]
    #[case::empty_id("risk:", ParseFocusError::EmptyId("risk:".to_owned()))]
    fn focus_rejects_bad_input(#[case] raw: &str, #[case] expected: ParseFocusError) {
        assert_eq!(raw.parse::<Focus>(), Err(expected));
    }

    #[test]
    fn focus_display_parses_back() {
        let focus = Focus::AiService("AI-001".to_owned());
        assert_eq!(focus.to_string().parse::<Focus>(), Ok(focus));
        assert_eq!(Focus::Topology.to_string(), "cmdb");
    }

    #[rstest]
    #[case::risk(NodeKind::Risk, Some(Focus::Risk("RSK-002".to_owned())))]
    #[case::server(NodeKind::Server, Some(Focus::ConfigItem("RSK-002".to_owned())))]
    #[case::service(NodeKind::Service, None)]
    #[case::goal(NodeKind::Goal, None)]
    fn focus_for_node_kind(#[case] kind: NodeKind, #[case] expected: Option<Focus>) {
        assert_eq!(Focus::for_node(kind, "RSK-002"), expected);
    }

    #[test]
    fn every_kind_has_a_glyph_and_label() {
        for kind in NodeKind::ALL {
            assert!(kind.glyph().is_ascii_uppercase());
            assert!(kind.label().starts_with(kind.glyph()));
        }
    }
}
