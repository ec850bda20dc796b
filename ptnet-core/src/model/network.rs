use super::{AugmentationContext, NetworkError, NetworkLink, NetworkNode};
use geo::{BoundingRect, EuclideanDistance, LineString};
use itertools::Itertools;
use rstar::primitives::{GeomWithData, Rectangle};
use rstar::{RTree, AABB};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// node and link tables of a roadway network. insertion deduplicates by
/// node id and by normalized link endpoint key, so merging the same
/// augmentation twice leaves the tables unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Network {
    nodes: BTreeMap<i64, NetworkNode>,
    links: BTreeMap<(i64, i64), NetworkLink>,
}

impl Network {
    pub fn new() -> Network {
        Network::default()
    }

    /// inserts a node if its id is not already present. returns true when
    /// the node was added.
    pub fn add_node(&mut self, node: NetworkNode) -> bool {
        if self.nodes.contains_key(&node.id) {
            return false;
        }
        self.nodes.insert(node.id, node);
        true
    }

    /// inserts a link if its endpoint key is not already present. both
    /// endpoints must exist in the node table.
    pub fn add_link(&mut self, link: NetworkLink) -> Result<bool, NetworkError> {
        for endpoint in [link.a, link.b] {
            if !self.nodes.contains_key(&endpoint.abs()) {
                return Err(NetworkError::MissingLinkEndpoint(link.a, link.b, endpoint));
            }
        }
        let key = link.key();
        if self.links.contains_key(&key) {
            return Ok(false);
        }
        self.links.insert(key, link);
        Ok(true)
    }

    pub fn node(&self, id: i64) -> Option<&NetworkNode> {
        self.nodes.get(&id)
    }

    pub fn contains_node(&self, id: i64) -> bool {
        self.nodes.contains_key(&id)
    }

    pub fn link(&self, key: &(i64, i64)) -> Option<&NetworkLink> {
        self.links.get(key)
    }

    pub fn contains_link(&self, key: &(i64, i64)) -> bool {
        self.links.contains_key(key)
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

    /// largest node id in the table, or 0 for an empty network. new
    /// transit-only ids are assigned starting above this value.
    pub fn max_node_id(&self) -> i64 {
        self.nodes.keys().max().copied().unwrap_or(0)
    }

    /// drops nodes in the given id ranges (with their incident links) and
    /// links whose numeric facility-type attribute is listed. ranges are
    /// inclusive. used to keep centroid connectors and excluded facility
    /// classes out of the matching candidate set.
    pub fn clean(
        &mut self,
        node_ranges: &[(i64, i64)],
        facility_field: &str,
        facility_types: &[f64],
    ) {
        let in_range = |id: i64| node_ranges.iter().any(|(lo, hi)| *lo <= id && id <= *hi);
        self.nodes.retain(|id, _| !in_range(*id));
        self.links.retain(|(a, b), link| {
            if in_range(*a) || in_range(*b) {
                return false;
            }
            match link.attributes.get(facility_field).and_then(|v| v.as_number()) {
                Some(factype) => !facility_types.contains(&factype),
                None => true,
            }
        });
    }

    /// folds transit-only nodes and links not already present into the
    /// tables. safe to call repeatedly with a growing context; elements
    /// merged earlier are skipped by their id / endpoint key.
    pub fn merge_context(&mut self, context: &AugmentationContext) -> (usize, usize) {
        let mut nodes_added = 0;
        let mut links_added = 0;
        for node in context.nodes() {
            if self.add_node(node.clone()) {
                nodes_added += 1;
            }
        }
        for link in context.links() {
            // endpoints are guaranteed by the context, which registers a
            // node before any link that references it
            if let Ok(true) = self.add_link(link.clone()) {
                links_added += 1;
            }
        }
        (nodes_added, links_added)
    }

    /// extracts the route-local network: links whose geometry lies entirely
    /// within `buffer` of the route shape, and the nodes incident to them.
    /// candidates are prefiltered with an r-tree over link envelopes, then
    /// refined pointwise against the shape.
    pub fn subset_within(&self, shape: &LineString<f64>, buffer: f64) -> Network {
        let mut subset = Network::new();
        let shape_rect = match shape.bounding_rect() {
            Some(rect) => rect,
            None => return subset,
        };

        let envelopes = self
            .links
            .values()
            .filter_map(|link| {
                let rect = link.geometry.bounding_rect()?;
                let envelope = Rectangle::from_corners(rect.min().x_y(), rect.max().x_y());
                Some(GeomWithData::new(envelope, link.key()))
            })
            .collect_vec();
        let rtree: RTree<GeomWithData<Rectangle<(f64, f64)>, (i64, i64)>> =
            RTree::bulk_load(envelopes);

        let query = AABB::from_corners(
            (shape_rect.min().x - buffer, shape_rect.min().y - buffer),
            (shape_rect.max().x + buffer, shape_rect.max().y + buffer),
        );
        let keys = rtree
            .locate_in_envelope_intersecting(&query)
            .map(|obj| obj.data)
            .sorted()
            .collect_vec();

        for key in keys {
            let link = match self.links.get(&key) {
                Some(link) => link,
                None => continue,
            };
            let within = link
                .geometry
                .points()
                .all(|p| p.euclidean_distance(shape) <= buffer);
            if !within {
                continue;
            }
            for endpoint in [link.a.abs(), link.b.abs()] {
                if let Some(node) = self.nodes.get(&endpoint) {
                    subset.add_node(node.clone());
                }
            }
            // endpoints were just added, insertion cannot fail
            let _ = subset.add_link(link.clone());
        }
        subset
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::model::{AttributeValue, AugmentationContext};
    use geo::{line_string, Point};

    fn grid_network() -> Network {
        // 1 --- 2 --- 3 on y=0, with node 4 off at (0, 500)
        let mut net = Network::new();
        for (id, x, y) in [(1, 0.0, 0.0), (2, 100.0, 0.0), (3, 200.0, 0.0), (4, 0.0, 500.0)] {
            net.add_node(NetworkNode::new(id, x, y));
        }
        let ab = |a: i64, b: i64, x0: f64, x1: f64| {
            NetworkLink::new(a, b, line_string![(x: x0, y: 0.0), (x: x1, y: 0.0)])
        };
        net.add_link(ab(1, 2, 0.0, 100.0)).unwrap();
        net.add_link(ab(2, 1, 100.0, 0.0)).unwrap();
        net.add_link(ab(2, 3, 100.0, 200.0)).unwrap();
        net.add_link(
            NetworkLink::new(1, 4, line_string![(x: 0.0, y: 0.0), (x: 0.0, y: 500.0)]),
        )
        .unwrap();
        net
    }

    #[test]
    fn test_add_link_requires_endpoints() {
        let mut net = Network::new();
        net.add_node(NetworkNode::new(1, 0.0, 0.0));
        let link = NetworkLink::new(1, 9, line_string![(x: 0.0, y: 0.0), (x: 1.0, y: 0.0)]);
        assert!(net.add_link(link).is_err());
    }

    #[test]
    fn test_merge_context_is_idempotent() {
        let mut net = grid_network();
        let mut ctx = AugmentationContext::new(net.max_node_id() + 1);
        let n = ctx.create_node(Point::new(50.0, 10.0));
        ctx.register_link_pair(
            NetworkLink::new(1, n, line_string![(x: 0.0, y: 0.0), (x: 50.0, y: 10.0)]),
            1.0,
        );

        let (first_nodes, first_links) = net.merge_context(&ctx);
        assert_eq!(first_nodes, 1);
        assert_eq!(first_links, 2);
        let (second_nodes, second_links) = net.merge_context(&ctx);
        assert_eq!((second_nodes, second_links), (0, 0));
        assert_eq!(net.n_nodes(), 5);
        assert_eq!(net.n_links(), 6);
    }

    #[test]
    fn test_clean_drops_ranges_and_facility_types() {
        let mut net = grid_network();
        let key = (2, 3);
        if let Some(link) = net.links.get_mut(&key) {
            link.attributes
                .insert(String::from("FACTYPE"), AttributeValue::Number(90.0));
        }
        net.clean(&[(4, 4)], "FACTYPE", &[90.0]);
        assert!(!net.contains_node(4));
        assert!(!net.contains_link(&(1, 4)));
        assert!(!net.contains_link(&(2, 3)));
        assert!(net.contains_link(&(1, 2)));
    }

    #[test]
    fn test_subset_within_keeps_corridor_links() {
        let net = grid_network();
        let shape = line_string![(x: -10.0, y: 0.0), (x: 210.0, y: 0.0)];
        let subset = net.subset_within(&shape, 50.0);
        assert!(subset.contains_link(&(1, 2)));
        assert!(subset.contains_link(&(2, 3)));
        // the link up to node 4 leaves the corridor
        assert!(!subset.contains_link(&(1, 4)));
        assert!(!subset.contains_node(4));
    }
}
