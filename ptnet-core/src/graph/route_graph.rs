use super::GraphError;
use crate::model::{NetworkLink, NetworkNode};
use geo::{Distance, Euclidean, Point};
use petgraph::algo::{astar, has_path_connecting};
use petgraph::prelude::DiGraphMap;
use petgraph::visit::EdgeRef;
use std::collections::HashMap;

/// ephemeral directed graph over a route-local network subset, weighted by
/// link geometry length. rebuilt per route; candidate transit-only links
/// are inserted (and possibly removed again) during gap validation.
pub struct RouteGraph {
    graph: DiGraphMap<i64, f64>,
    positions: HashMap<i64, Point<f64>>,
}

impl RouteGraph {
    pub fn new<'a, N, L>(nodes: N, links: L) -> RouteGraph
    where
        N: IntoIterator<Item = &'a NetworkNode>,
        L: IntoIterator<Item = &'a NetworkLink>,
    {
        let mut graph = DiGraphMap::new();
        let mut positions = HashMap::new();
        for node in nodes {
            graph.add_node(node.id);
            positions.insert(node.id, node.point);
        }
        for link in links {
            let (a, b) = link.key();
            graph.add_edge(a, b, link.length());
        }
        RouteGraph { graph, positions }
    }

    pub fn add_node(&mut self, id: i64, point: Point<f64>) {
        self.graph.add_node(id);
        self.positions.insert(id, point);
    }

    pub fn contains_node(&self, id: i64) -> bool {
        self.graph.contains_node(id)
    }

    /// inserts a candidate link in both directions with the given length
    pub fn insert_link_pair(&mut self, a: i64, b: i64, length: f64) {
        self.graph.add_edge(a, b, length);
        self.graph.add_edge(b, a, length);
    }

    /// removes a previously inserted candidate pair
    pub fn remove_link_pair(&mut self, a: i64, b: i64) {
        self.graph.remove_edge(a, b);
        self.graph.remove_edge(b, a);
    }

    pub fn has_path(&self, source_node: i64, target_node: i64) -> bool {
        if !self.graph.contains_node(source_node) || !self.graph.contains_node(target_node) {
            return false;
        }
        has_path_connecting(&self.graph, source_node, target_node, None)
    }

    /// length-weighted shortest path as a node id sequence, source and
    /// target inclusive. the straight-line heuristic is admissible since
    /// edge weights are polyline lengths.
    pub fn shortest_path(
        &self,
        source_node: i64,
        target_node: i64,
    ) -> Result<Vec<i64>, GraphError> {
        for id in [source_node, target_node] {
            if !self.graph.contains_node(id) {
                return Err(GraphError::MissingNode(id));
            }
        }
        let target_position = self.positions.get(&target_node).copied();
        let (_, path) = astar(
            &self.graph,
            source_node,
            |finish| finish == target_node,
            |e| *e.weight(),
            |n| match (self.positions.get(&n), target_position) {
                (Some(p), Some(t)) => Euclidean.distance(*p, t),
                _ => 0.0,
            },
        )
        .ok_or(GraphError::NoPath {
            source_node,
            target_node,
        })?;
        Ok(path)
    }

    pub fn n_nodes(&self) -> usize {
        self.graph.node_count()
    }

    pub fn n_edges(&self) -> usize {
        self.graph.edge_count()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::model::NetworkLink;
    use geo::line_string;

    fn line_network() -> (Vec<NetworkNode>, Vec<NetworkLink>) {
        // 1 - 2 - 3 connected, 4 isolated
        let nodes = vec![
            NetworkNode::new(1, 0.0, 0.0),
            NetworkNode::new(2, 100.0, 0.0),
            NetworkNode::new(3, 200.0, 0.0),
            NetworkNode::new(4, 900.0, 900.0),
        ];
        let links = vec![
            NetworkLink::new(1, 2, line_string![(x: 0.0, y: 0.0), (x: 100.0, y: 0.0)]),
            NetworkLink::new(2, 3, line_string![(x: 100.0, y: 0.0), (x: 200.0, y: 0.0)]),
        ];
        (nodes, links)
    }

    #[test]
    fn test_shortest_path_follows_links() {
        let (nodes, links) = line_network();
        let graph = RouteGraph::new(nodes.iter(), links.iter());
        let path = graph.shortest_path(1, 3).expect("path should exist");
        assert_eq!(path, vec![1, 2, 3]);
    }

    #[test]
    fn test_shortest_path_errors_when_disconnected() {
        let (nodes, links) = line_network();
        let graph = RouteGraph::new(nodes.iter(), links.iter());
        assert!(!graph.has_path(1, 4));
        match graph.shortest_path(1, 4) {
            Err(GraphError::NoPath { .. }) => {}
            other => panic!("expected NoPath, got {other:?}"),
        }
    }

    #[test]
    fn test_insert_and_remove_link_pair() {
        let (nodes, links) = line_network();
        let mut graph = RouteGraph::new(nodes.iter(), links.iter());
        graph.insert_link_pair(3, 4, 1000.0);
        assert!(graph.has_path(1, 4));
        assert!(graph.has_path(4, 1));
        graph.remove_link_pair(3, 4);
        assert!(!graph.has_path(1, 4));
    }

    #[test]
    fn test_directed_links_are_one_way() {
        let (nodes, links) = line_network();
        let graph = RouteGraph::new(nodes.iter(), links.iter());
        assert!(graph.has_path(1, 3));
        assert!(!graph.has_path(3, 1));
    }
}
