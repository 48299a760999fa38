use std::collections::{HashMap, HashSet};

use crate::itsm::{CmdbGroup, CmdbTopology, Lookup, Record};

use super::{BuildPolicy, CiAttachment, ContextGraph, Focus, GraphEdge, GraphNode, NodeKind};

struct GraphBuilder {
    nodes: Vec<GraphNode>,
    edges: Vec<GraphEdge>,
    index_by_id: HashMap<String, usize>,
    seen_edges: HashSet<(usize, usize)>,
}

impl GraphBuilder {
    fn new() -> Self {
        Self {
            nodes: Vec::new(),
            edges: Vec::new(),
            index_by_id: HashMap::new(),
            seen_edges: HashSet::new(),
        }
    }

    /// Inserts a node unless one with the same id exists; the first insertion
    /// keeps its kind and label. Blank ids are skipped.
    fn node(&mut self, id: &str, kind: NodeKind, label: Option<&str>) -> Option<usize> {
        let id = id.trim();
        if id.is_empty() {
            return None;
        }
        if let Some(&index) = self.index_by_id.get(id) {
            return Some(index);
        }

        let index = self.nodes.len();
        self.nodes.push(GraphNode {
            id: id.to_owned(),
            label: label.unwrap_or(id).to_owned(),
            kind,
            resolved: label.is_some(),
        });
        self.index_by_id.insert(id.to_owned(), index);
        Some(index)
    }

    fn edge(&mut self, source: usize, target: usize) {
        if source == target || !self.seen_edges.insert((source, target)) {
            return;
        }
        self.edges.push(GraphEdge { source, target });
    }

    /// Adds `id` as a node and an edge `from -> id`.
    fn relate(
        &mut self,
        from: usize,
        id: &str,
        kind: NodeKind,
        label: Option<&str>,
    ) -> Option<usize> {
        let index = self.node(id, kind, label)?;
        self.edge(from, index);
        Some(index)
    }

    fn relate_all<'a, I>(&mut self, from: usize, ids: &[String], kind: NodeKind, resolve: I)
    where
        I: Fn(&str) -> Option<&'a str>,
    {
        for id in ids {
            let id = id.trim();
            self.relate(from, id, kind, resolve(id));
        }
    }

    fn finish(self, focus: Focus, focal: Option<usize>) -> ContextGraph {
        ContextGraph::new(focus, self.nodes, self.edges, self.index_by_id, focal)
    }
}

fn name_of<T: Record>(record: Option<&T>) -> Option<&str> {
    record.map(Record::display_name)
}

fn cmdb_kind(group: CmdbGroup) -> NodeKind {
    match group {
        CmdbGroup::Process => NodeKind::Process,
        CmdbGroup::Application => NodeKind::Application,
        CmdbGroup::Server => NodeKind::Server,
        CmdbGroup::Database => NodeKind::Database,
        CmdbGroup::Network => NodeKind::Network,
    }
}

/// Builds the relationship graph around `focus`. Missing records never fail
/// the build: they show up as unresolved nodes labelled with their raw id.
pub fn build_graph<L: Lookup + ?Sized>(
    focus: &Focus,
    lookup: &L,
    policy: &BuildPolicy,
) -> ContextGraph {
    let Some(focal_id) = focus.id() else {
        return build_topology(lookup.topology());
    };
    let id = focal_id.trim();

    let mut builder = GraphBuilder::new();
    let focal = match focus {
        Focus::Incident(_) => incident_graph(&mut builder, id, lookup, policy),
        Focus::Problem(_) => problem_graph(&mut builder, id, lookup),
        Focus::Risk(_) => risk_graph(&mut builder, id, lookup, policy),
        Focus::Epic(_) => epic_graph(&mut builder, id, lookup),
        Focus::AiService(_) => ai_service_graph(&mut builder, id, lookup),
        Focus::ConfigItem(_) => config_item_graph(&mut builder, id, lookup),
        Focus::Topology => None,
    };

    let graph = builder.finish(focus.clone(), focal);
    tracing::debug!(
        focus = %focus,
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        unresolved = graph.unresolved().count(),
        "built context graph"
    );
    if focal.is_none() {
        tracing::warn!(focal_id, "focal entity id is blank");
    }
    graph
}

/// Seeds the focal node. A focal id missing from the store yields a single
/// unresolved node and `None` for the record, so no relations get expanded.
fn seed<'a, T: Record>(
    builder: &mut GraphBuilder,
    id: &str,
    kind: NodeKind,
    record: Option<&'a T>,
) -> (Option<usize>, Option<&'a T>) {
    let focal = builder.node(id, kind, name_of(record));
    if record.is_none() {
        tracing::warn!(id, kind = %kind, "focal entity not found");
    }
    (focal, record)
}

fn incident_graph<L: Lookup + ?Sized>(
    builder: &mut GraphBuilder,
    id: &str,
    lookup: &L,
    policy: &BuildPolicy,
) -> Option<usize> {
    let (focal, incident) = seed(builder, id, NodeKind::Incident, lookup.incident(id));
    let (Some(focal), Some(incident)) = (focal, incident) else {
        return focal;
    };

    let mut service_node = None;
    if let Some(service_id) = incident.service_id.as_deref().map(str::trim) {
        let service = lookup.service(service_id);
        let index = builder.relate(focal, service_id, NodeKind::Service, name_of(service));
        if service.is_some() {
            service_node = index;
        }
    }
    if let Some(problem_id) = incident.problem_id.as_deref().map(str::trim) {
        builder.relate(
            focal,
            problem_id,
            NodeKind::Problem,
            name_of(lookup.problem(problem_id)),
        );
    }
    if let Some(change_id) = incident.change_id.as_deref().map(str::trim) {
        builder.relate(
            focal,
            change_id,
            NodeKind::Change,
            name_of(lookup.change(change_id)),
        );
    }

    let ci_parent = match policy.incident_ci_attachment {
        CiAttachment::PreferService => service_node.unwrap_or(focal),
        CiAttachment::Focal => focal,
    };
    builder.relate_all(
        ci_parent,
        &incident.related_ci_ids,
        NodeKind::ConfigurationItem,
        |ci| name_of(lookup.config_item(ci)),
    );

    Some(focal)
}

fn problem_graph<L: Lookup + ?Sized>(
    builder: &mut GraphBuilder,
    id: &str,
    lookup: &L,
) -> Option<usize> {
    let (focal, problem) = seed(builder, id, NodeKind::Problem, lookup.problem(id));
    let (Some(focal), Some(problem)) = (focal, problem) else {
        return focal;
    };

    if let Some(service_id) = problem.service_id.as_deref().map(str::trim) {
        builder.relate(
            focal,
            service_id,
            NodeKind::Service,
            name_of(lookup.service(service_id)),
        );
    }
    builder.relate_all(focal, &problem.related_risk_ids, NodeKind::Risk, |risk| {
        name_of(lookup.risk(risk))
    });
    builder.relate_all(
        focal,
        &problem.related_incidents,
        NodeKind::Incident,
        |incident| name_of(lookup.incident(incident)),
    );

    Some(focal)
}

fn risk_graph<L: Lookup + ?Sized>(
    builder: &mut GraphBuilder,
    id: &str,
    lookup: &L,
    policy: &BuildPolicy,
) -> Option<usize> {
    let (focal, risk) = seed(builder, id, NodeKind::Risk, lookup.risk(id));
    let (Some(focal), Some(risk)) = (focal, risk) else {
        return focal;
    };

    builder.relate_all(focal, &risk.related_service_ids, NodeKind::Service, |service| {
        name_of(lookup.service(service))
    });
    builder.relate_all(focal, &risk.related_epic_ids, NodeKind::Epic, |epic| {
        name_of(lookup.epic(epic))
    });
    builder.relate_all(
        focal,
        &risk.related_ai_service_ids,
        NodeKind::AiService,
        |ai| name_of(lookup.ai_service(ai)),
    );
    builder.relate_all(focal, &risk.related_goal_ids, NodeKind::Goal, |goal| {
        name_of(lookup.goal(goal))
    });

    // Problems point at risks, so the second hop is a reverse lookup.
    for problem in lookup.problems().iter().filter(|problem| {
        problem
            .related_risk_ids
            .iter()
            .any(|risk_id| risk_id.trim() == risk.id.trim())
    }) {
        let title = Some(problem.title.as_str());
        let Some(problem_node) = builder.relate(focal, &problem.id, NodeKind::Problem, title)
        else {
            continue;
        };
        if !policy.expand_risk_incidents {
            continue;
        }
        builder.relate_all(
            problem_node,
            &problem.related_incidents,
            NodeKind::Incident,
            |incident| name_of(lookup.incident(incident)),
        );
    }

    Some(focal)
}

fn epic_graph<L: Lookup + ?Sized>(
    builder: &mut GraphBuilder,
    id: &str,
    lookup: &L,
) -> Option<usize> {
    let (focal, epic) = seed(builder, id, NodeKind::Epic, lookup.epic(id));
    let (Some(focal), Some(epic)) = (focal, epic) else {
        return focal;
    };

    builder.relate_all(focal, &epic.related_service_ids, NodeKind::Service, |service| {
        name_of(lookup.service(service))
    });
    builder.relate_all(focal, &epic.related_change_ids, NodeKind::Change, |change| {
        name_of(lookup.change(change))
    });
    builder.relate_all(focal, &epic.related_problem_ids, NodeKind::Problem, |problem| {
        name_of(lookup.problem(problem))
    });
    builder.relate_all(focal, &epic.related_risk_ids, NodeKind::Risk, |risk| {
        name_of(lookup.risk(risk))
    });
    builder.relate_all(focal, &epic.related_goal_ids, NodeKind::Goal, |goal| {
        name_of(lookup.goal(goal))
    });

    Some(focal)
}

fn ai_service_graph<L: Lookup + ?Sized>(
    builder: &mut GraphBuilder,
    id: &str,
    lookup: &L,
) -> Option<usize> {
    let (focal, ai_service) = seed(builder, id, NodeKind::AiService, lookup.ai_service(id));
    let (Some(focal), Some(ai_service)) = (focal, ai_service) else {
        return focal;
    };

    if let Some(service_id) = ai_service.service_id.as_deref().map(str::trim) {
        builder.relate(
            focal,
            service_id,
            NodeKind::Service,
            name_of(lookup.service(service_id)),
        );
    }
    builder.relate_all(focal, &ai_service.related_risk_ids, NodeKind::Risk, |risk| {
        name_of(lookup.risk(risk))
    });

    Some(focal)
}

/// A CMDB topology node without a configuration item record still resolves,
/// taking its kind from the CMDB group.
fn config_item_graph<L: Lookup + ?Sized>(
    builder: &mut GraphBuilder,
    id: &str,
    lookup: &L,
) -> Option<usize> {
    let topology = lookup.topology();
    let (kind, label) = match (lookup.config_item(id), topology.node(id)) {
        (Some(ci), _) => (NodeKind::ConfigurationItem, Some(ci.name.as_str())),
        (None, Some(node)) => (cmdb_kind(node.group), Some(node.label.as_str())),
        (None, None) => (NodeKind::ConfigurationItem, None),
    };
    let focal = builder.node(id, kind, label)?;
    if label.is_none() {
        tracing::warn!(id, kind = %kind, "focal entity not found");
        return Some(focal);
    }

    for incident in lookup
        .incidents()
        .iter()
        .filter(|incident| incident.related_ci_ids.iter().any(|ci_id| ci_id.trim() == id))
    {
        if let Some(incident_node) =
            builder.node(&incident.id, NodeKind::Incident, Some(incident.title.as_str()))
        {
            builder.edge(incident_node, focal);
        }
    }

    for link in &topology.links {
        let (other, outgoing) = if link.source.trim() == id {
            (link.target.trim(), true)
        } else if link.target.trim() == id {
            (link.source.trim(), false)
        } else {
            continue;
        };

        let (kind, label) = match topology.node(other) {
            Some(node) => (cmdb_kind(node.group), Some(node.label.as_str())),
            None => (
                NodeKind::ConfigurationItem,
                name_of(lookup.config_item(other)),
            ),
        };
        let Some(other_node) = builder.node(other, kind, label) else {
            continue;
        };
        if outgoing {
            builder.edge(focal, other_node);
        } else {
            builder.edge(other_node, focal);
        }
    }

    Some(focal)
}

/// Whole CMDB as one graph. Link endpoints missing from the node list become
/// unresolved configuration item nodes. There is no focal node.
pub fn build_topology(topology: &CmdbTopology) -> ContextGraph {
    let mut builder = GraphBuilder::new();
    for node in &topology.nodes {
        builder.node(&node.id, cmdb_kind(node.group), Some(node.label.as_str()));
    }

    for link in &topology.links {
        let source = builder.node(&link.source, NodeKind::ConfigurationItem, None);
        let target = builder.node(&link.target, NodeKind::ConfigurationItem, None);
        if let (Some(source), Some(target)) = (source, target) {
            builder.edge(source, target);
        }
    }

    let graph = builder.finish(Focus::Topology, None);
    tracing::debug!(
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        "built CMDB topology graph"
    );
    graph
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use rstest::rstest;

    use super::*;
    use crate::itsm::{
        CmdbLink, CmdbNode, ConfigItem, Dataset, Incident, ItsmStore, Problem, Risk, Service,
        sample_dataset,
    };

    fn sample_store() -> ItsmStore {
        ItsmStore::from_dataset(sample_dataset()).unwrap()
    }

    fn ids(graph: &ContextGraph) -> Vec<&str> {
        graph.nodes().iter().map(|node| node.id.as_str()).collect()
    }

    fn edge_ids(graph: &ContextGraph) -> HashSet<(&str, &str)> {
        graph
            .edges()
            .iter()
            .map(|edge| {
                (
                    graph.nodes()[edge.source].id.as_str(),
                    graph.nodes()[edge.target].id.as_str(),
                )
            })
            .collect()
    }

    fn assert_well_formed(graph: &ContextGraph) {
        let unique = ids(graph).into_iter().collect::<HashSet<_>>();
        assert_eq!(unique.len(), graph.node_count(), "node ids must be unique");
        for edge in graph.edges() {
            assert!(edge.source < graph.node_count());
            assert!(edge.target < graph.node_count());
            assert_ne!(edge.source, edge.target);
        }
        let pairs = graph
            .edges()
            .iter()
            .map(|edge| (edge.source, edge.target))
            .collect::<HashSet<_>>();
        assert_eq!(pairs.len(), graph.edge_count(), "edges must be distinct");
    }

    fn risk(id: &str) -> Risk {
        Risk {
            id: id.to_owned(),
            title: format!("Risk {id}"),
            ..Risk::default()
        }
    }

    fn problem(id: &str, risk_ids: &[&str], incidents: &[&str]) -> Problem {
        Problem {
            id: id.to_owned(),
            title: format!("Problem {id}"),
            related_risk_ids: risk_ids.iter().map(|id| (*id).to_owned()).collect(),
            related_incidents: incidents.iter().map(|id| (*id).to_owned()).collect(),
            ..Problem::default()
        }
    }

    fn incident(id: &str) -> Incident {
        Incident {
            id: id.to_owned(),
            title: format!("Incident {id}"),
            ..Incident::default()
        }
    }

    #[rstest]
    #[case::incident(Focus::Incident("INC001026".to_owned()))]
    #[case::problem(Focus::Problem("PRB00047".to_owned()))]
    #[case::risk(Focus::Risk("RSK-005".to_owned()))]
    #[case::epic(Focus::Epic("EPC-2024-001".to_owned()))]
    #[case::ai_service(Focus::AiService("AI-002".to_owned()))]
    #[case::config_item(Focus::ConfigItem("CI-DB-001".to_owned()))]
    #[case::topology(Focus::Topology)]
    fn sample_graphs_are_well_formed(#[case] focus: Focus) {
        let graph = build_graph(&focus, &sample_store(), &BuildPolicy::default());
        assert!(graph.node_count() > 1);
        assert_well_formed(&graph);
    }

    #[test]
    fn risk_two_hop_traversal() {
        let store = ItsmStore::from_dataset(Dataset {
            incidents: vec![incident("I2"), incident("I1")],
            problems: vec![problem("P1", &["R"], &["I1", "I2"])],
            risks: vec![risk("R")],
            ..Dataset::default()
        })
        .unwrap();

        let graph = build_graph(&Focus::Risk("R".to_owned()), &store, &BuildPolicy::default());

        assert_eq!(graph.node_count(), 4);
        assert_eq!(
            ids(&graph).into_iter().collect::<HashSet<_>>(),
            HashSet::from(["R", "P1", "I1", "I2"])
        );
        assert_eq!(
            edge_ids(&graph),
            HashSet::from([("R", "P1"), ("P1", "I1"), ("P1", "I2")])
        );
    }

    #[test]
    fn risk_second_hop_can_be_disabled() {
        let store = ItsmStore::from_dataset(Dataset {
            problems: vec![problem("P1", &["R"], &["I1"])],
            risks: vec![risk("R")],
            ..Dataset::default()
        })
        .unwrap();
        let policy = BuildPolicy {
            expand_risk_incidents: false,
            ..BuildPolicy::default()
        };

        let graph = build_graph(&Focus::Risk("R".to_owned()), &store, &policy);

        assert_eq!(ids(&graph), vec!["R", "P1"]);
    }

    #[test]
    fn shared_id_across_relations_yields_one_node() {
        let mut risk = risk("R");
        risk.related_service_ids = vec!["SVC".to_owned(), "SVC".to_owned()];
        risk.related_epic_ids = vec!["SVC".to_owned()];
        let store = ItsmStore::from_dataset(Dataset {
            risks: vec![risk],
            services: vec![Service {
                id: "SVC".to_owned(),
                name: "Shared".to_owned(),
                ..Service::default()
            }],
            ..Dataset::default()
        })
        .unwrap();

        let graph = build_graph(&Focus::Risk("R".to_owned()), &store, &BuildPolicy::default());

        assert_eq!(ids(&graph), vec!["R", "SVC"]);
        assert_eq!(graph.edge_count(), 1);
        let shared = graph.node_by_id("SVC").unwrap();
        assert_eq!(shared.kind, NodeKind::Service);
        assert_eq!(shared.label, "Shared");
    }

    #[test]
    fn unresolved_reference_uses_raw_id() {
        let graph = build_graph(
            &Focus::Risk("RSK-005".to_owned()),
            &sample_store(),
            &BuildPolicy::default(),
        );

        let typo = graph.node_by_id("INC0001026").unwrap();
        assert_eq!(typo.label, "INC0001026");
        assert_eq!(typo.kind, NodeKind::Incident);
        assert!(!typo.resolved);
        assert!(edge_ids(&graph).contains(&("PRB00047", "INC0001026")));
    }

    #[test]
    fn empty_and_blank_relations_add_nothing() {
        let mut bare = incident("INC");
        bare.service_id = Some("  ".to_owned());
        bare.problem_id = Some(String::new());
        let store = ItsmStore::from_dataset(Dataset {
            incidents: vec![bare],
            ..Dataset::default()
        })
        .unwrap();

        let graph = build_graph(
            &Focus::Incident("INC".to_owned()),
            &store,
            &BuildPolicy::default(),
        );

        assert_eq!(ids(&graph), vec!["INC"]);
        assert_eq!(graph.edge_count(), 0);
        assert_eq!(graph.focal_index(), Some(0));
    }

    #[test]
    fn unknown_focal_id_yields_single_unresolved_node() {
        let graph = build_graph(
            &Focus::Epic("EPC-404".to_owned()),
            &sample_store(),
            &BuildPolicy::default(),
        );

        assert_eq!(graph.node_count(), 1);
        assert!(!graph.nodes()[0].resolved);
        assert_eq!(graph.nodes()[0].label, "EPC-404");
    }

    #[rstest]
    #[case::prefer_service(CiAttachment::PreferService, "SVC002")]
    #[case::focal(CiAttachment::Focal, "INC001026")]
    fn incident_ci_attachment_follows_policy(
        #[case] attachment: CiAttachment,
        #[case] parent: &str,
    ) {
        let policy = BuildPolicy {
            incident_ci_attachment: attachment,
            ..BuildPolicy::default()
        };
        let focus = Focus::Incident("INC001026".to_owned());

        let graph = build_graph(&focus, &sample_store(), &policy);
        let edges = edge_ids(&graph);

        assert!(edges.contains(&(parent, "CI-APP-001")));
        assert!(edges.contains(&(parent, "CI-DB-001")));
        assert!(edges.contains(&("INC001026", "PRB00047")));
    }

    #[test]
    fn ci_attaches_to_focal_when_service_is_unresolved() {
        // INC001025 points at SVC005, which the sample does not define.
        let mut store = sample_store();
        let mut incident = store.incidents.get("INC001025").cloned().unwrap();
        incident.related_ci_ids = vec!["CI-SRV-001".to_owned()];
        store.incidents.update(incident).unwrap();

        let graph = build_graph(
            &Focus::Incident("INC001025".to_owned()),
            &store,
            &BuildPolicy::default(),
        );

        assert!(!graph.node_by_id("SVC005").unwrap().resolved);
        assert!(edge_ids(&graph).contains(&("INC001025", "CI-SRV-001")));
    }

    #[test]
    fn config_item_graph_includes_incidents_and_cmdb_links() {
        let graph = build_graph(
            &Focus::ConfigItem("CI-DB-001".to_owned()),
            &sample_store(),
            &BuildPolicy::default(),
        );
        let edges = edge_ids(&graph);

        assert!(edges.contains(&("INC001026", "CI-DB-001")));
        assert!(edges.contains(&("SVC002", "CI-DB-001")));
        assert!(edges.contains(&("CI-DB-001", "CI-SRV-001")));
        assert_eq!(
            graph.node_by_id("CI-DB-001").unwrap().kind,
            NodeKind::ConfigurationItem
        );
        assert_eq!(graph.node_by_id("CI-SRV-001").unwrap().kind, NodeKind::Server);
    }

    #[rstest]
    #[case::process("BP-001", NodeKind::Process, ("BP-001", "SVC002"))]
    #[case::application("SVC002", NodeKind::Application, ("SVC002", "CI-APP-001"))]
    fn cmdb_node_without_ci_record_resolves(
        #[case] id: &str,
        #[case] kind: NodeKind,
        #[case] edge: (&str, &str),
    ) {
        let store = sample_store();
        assert!(store.config_items.get(id).is_none());

        let graph = build_graph(
            &Focus::ConfigItem(id.to_owned()),
            &store,
            &BuildPolicy::default(),
        );

        let focal = &graph.nodes()[graph.focal_index().unwrap()];
        assert_eq!(focal.id, id);
        assert!(focal.resolved);
        assert_eq!(focal.kind, kind);
        assert_eq!(focal.label, store.topology.node(id).unwrap().label);
        assert!(edge_ids(&graph).contains(&edge));
        assert_well_formed(&graph);
    }

    #[test]
    fn id_in_neither_ci_table_nor_cmdb_stays_unresolved() {
        let graph = build_graph(
            &Focus::ConfigItem("CI-404".to_owned()),
            &sample_store(),
            &BuildPolicy::default(),
        );

        assert_eq!(ids(&graph), vec!["CI-404"]);
        assert!(!graph.nodes()[0].resolved);
    }

    #[test]
    fn problems_sharing_an_incident_point_at_one_node() {
        let store = ItsmStore::from_dataset(Dataset {
            incidents: vec![incident("I1")],
            problems: vec![
                problem("P1", &["R"], &["I1"]),
                problem("P2", &["R"], &["I1"]),
            ],
            risks: vec![risk("R")],
            ..Dataset::default()
        })
        .unwrap();

        let graph = build_graph(&Focus::Risk("R".to_owned()), &store, &BuildPolicy::default());

        assert_eq!(ids(&graph).iter().filter(|id| **id == "I1").count(), 1);
        assert_eq!(
            edge_ids(&graph),
            HashSet::from([("R", "P1"), ("R", "P2"), ("P1", "I1"), ("P2", "I1")])
        );
        assert_well_formed(&graph);
    }

    #[test]
    fn padded_reference_ids_resolve() {
        let mut padded = incident("INC");
        padded.service_id = Some(" SVC002".to_owned());
        padded.related_ci_ids = vec!["CI-APP-001 ".to_owned()];
        let mut store = sample_store();
        store.incidents.create(padded).unwrap();

        let graph = build_graph(
            &Focus::Incident("INC".to_owned()),
            &store,
            &BuildPolicy::default(),
        );

        let service = graph.node_by_id("SVC002").unwrap();
        assert!(service.resolved);
        assert_eq!(service.kind, NodeKind::Service);
        assert!(graph.node_by_id("CI-APP-001").unwrap().resolved);
        assert!(edge_ids(&graph).contains(&("SVC002", "CI-APP-001")));
        assert!(graph.unresolved().next().is_none());
    }

    #[test]
    fn padded_reverse_references_match_the_focal_id() {
        let mut linked = incident("I1");
        linked.related_ci_ids = vec![" CI ".to_owned()];
        let store = ItsmStore::from_dataset(Dataset {
            incidents: vec![linked],
            problems: vec![problem("P1", &["R "], &[])],
            risks: vec![risk("R")],
            configuration_items: vec![ConfigItem {
                id: "CI".to_owned(),
                name: "Ledger host".to_owned(),
                ..ConfigItem::default()
            }],
            ..Dataset::default()
        })
        .unwrap();
        let policy = BuildPolicy::default();

        let risk_graph = build_graph(&Focus::Risk("R".to_owned()), &store, &policy);
        let ci_graph = build_graph(&Focus::ConfigItem("CI".to_owned()), &store, &policy);

        assert!(edge_ids(&risk_graph).contains(&("R", "P1")));
        assert!(edge_ids(&ci_graph).contains(&("I1", "CI")));
    }

    #[test]
    fn topology_keeps_links_and_marks_dangling_endpoints() {
        let topology = CmdbTopology {
            nodes: vec![
                CmdbNode {
                    id: "BP".to_owned(),
                    group: CmdbGroup::Process,
                    label: "Billing".to_owned(),
                },
                CmdbNode {
                    id: "APP".to_owned(),
                    group: CmdbGroup::Application,
                    label: "Ledger".to_owned(),
                },
            ],
            links: vec![
                CmdbLink {
                    source: "BP".to_owned(),
                    target: "APP".to_owned(),
                },
                CmdbLink {
                    source: "APP".to_owned(),
                    target: "GHOST".to_owned(),
                },
            ],
        };

        let graph = build_topology(&topology);

        assert_eq!(ids(&graph), vec!["BP", "APP", "GHOST"]);
        assert_eq!(graph.edge_count(), 2);
        assert!(graph.focal_index().is_none());
        let ghost = graph.node_by_id("GHOST").unwrap();
        assert!(!ghost.resolved);
        assert_eq!(ghost.kind, NodeKind::ConfigurationItem);
    }

    #[test]
    fn sample_topology_matches_cmdb() {
        let store = sample_store();
        let graph = build_graph(&Focus::Topology, &store, &BuildPolicy::default());

        assert_eq!(graph.node_count(), store.topology.nodes.len());
        assert_eq!(graph.edge_count(), store.topology.links.len());
        assert_eq!(graph.node_by_id("BP-001").unwrap().kind, NodeKind::Process);
    }

    #[test]
    fn path_from_focal_follows_edges() {
        let graph = build_graph(
            &Focus::Risk("RSK-005".to_owned()),
            &sample_store(),
            &BuildPolicy::default(),
        );
        let target = graph.index_of("INC0001026").unwrap();

        let path = graph
            .path_from_focal(target)
            .unwrap()
            .into_iter()
            .map(|index| graph.nodes()[index].id.as_str())
            .collect::<Vec<_>>();

        assert_eq!(path, vec!["RSK-005", "PRB00047", "INC0001026"]);
        for pair in path.windows(2) {
            assert!(edge_ids(&graph).contains(&(pair[0], pair[1])));
        }
    }
}
