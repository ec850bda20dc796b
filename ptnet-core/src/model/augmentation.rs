use super::{AttributeValue, NetworkLink, NetworkNode};
use geo::Point;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// attribute stamped on every registered transit-only link with the link
/// length divided by the configured distance divisor
pub const DIST_FIELD: &str = "DIST";

/// the transit-only elements accumulated while coding routes: nodes and
/// links absent from the base roadway network, created solely to carry
/// transit service. the context is passed into each route-processing call
/// and carried to the next, so later routes reuse elements synthesized by
/// earlier ones. registries only ever grow within a run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AugmentationContext {
    nodes: BTreeMap<i64, NetworkNode>,
    links: BTreeMap<(i64, i64), NetworkLink>,
    next_node_id: i64,
}

impl AugmentationContext {
    /// `first_node_id` seeds the id counter, typically one above the
    /// largest id of the base network
    pub fn new(first_node_id: i64) -> AugmentationContext {
        AugmentationContext {
            nodes: BTreeMap::new(),
            links: BTreeMap::new(),
            next_node_id: first_node_id,
        }
    }

    /// registers a new transit-only node at the given location, assigning
    /// it the next id from the counter
    pub fn create_node(&mut self, point: Point<f64>) -> i64 {
        let id = self.next_node_id;
        self.next_node_id += 1;
        self.nodes.insert(id, NetworkNode::from_point(id, point));
        id
    }

    /// registers a link and its reverse, stamping the derived distance
    /// attribute on both. deduplicated by endpoint key: re-registering an
    /// already-known pair is a no-op.
    pub fn register_link_pair(&mut self, link: NetworkLink, distance_divisor: f64) {
        let mut forward = link;
        forward.attributes.insert(
            String::from(DIST_FIELD),
            AttributeValue::Number(forward.length() / distance_divisor),
        );
        let reverse = forward.reversed();
        for candidate in [forward, reverse] {
            let key = candidate.key();
            self.links.entry(key).or_insert(candidate);
        }
    }

    pub fn contains_node(&self, id: i64) -> bool {
        self.nodes.contains_key(&id)
    }

    pub fn node(&self, id: i64) -> Option<&NetworkNode> {
        self.nodes.get(&id)
    }

    pub fn contains_link(&self, key: &(i64, i64)) -> bool {
        self.links.contains_key(key)
    }

    pub fn link(&self, key: &(i64, i64)) -> Option<&NetworkLink> {
        self.links.get(key)
    }

    pub fn nodes(&self) -> impl Iterator<Item = &NetworkNode> {
        self.nodes.values()
    }

    pub fn links(&self) -> impl Iterator<Item = &NetworkLink> {
        self.links.values()
    }

    pub fn n_nodes(&self) -> usize {
        self.nodes.len()
    }

    pub fn n_links(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.links.is_empty()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use geo::line_string;

    #[test]
    fn test_create_node_increments_counter() {
        let mut ctx = AugmentationContext::new(1000);
        let a = ctx.create_node(Point::new(0.0, 0.0));
        let b = ctx.create_node(Point::new(1.0, 1.0));
        assert_eq!((a, b), (1000, 1001));
        assert!(ctx.contains_node(1000));
        assert!(ctx.contains_node(1001));
    }

    #[test]
    fn test_register_link_pair_adds_both_directions() {
        let mut ctx = AugmentationContext::new(1000);
        let link = NetworkLink::new(
            5,
            1000,
            line_string![(x: 0.0, y: 0.0), (x: 5280.0, y: 0.0)],
        );
        ctx.register_link_pair(link, 5280.0);
        assert!(ctx.contains_link(&(5, 1000)));
        assert!(ctx.contains_link(&(1000, 5)));
        assert_eq!(ctx.n_links(), 2);

        let forward = ctx.links().find(|l| l.a == 5).expect("forward link");
        let dist = forward
            .attributes
            .get(DIST_FIELD)
            .and_then(|v| v.as_number())
            .expect("derived distance");
        assert!((dist - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_register_link_pair_deduplicates() {
        let mut ctx = AugmentationContext::new(1000);
        let geometry = line_string![(x: 0.0, y: 0.0), (x: 100.0, y: 0.0)];
        ctx.register_link_pair(NetworkLink::new(1, 2, geometry.clone()), 1.0);
        ctx.register_link_pair(NetworkLink::new(1, 2, geometry), 1.0);
        assert_eq!(ctx.n_links(), 2);
    }
}
