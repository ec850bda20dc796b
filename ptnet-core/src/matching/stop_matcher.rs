use crate::model::{AugmentationContext, Network, NetworkNode, RouteStop};
use geo::{EuclideanDistance, Point};

/// id of the candidate node nearest to `point`, if any candidate lies
/// within `threshold`. distances are computed against every candidate;
/// ties resolve to the lowest node id by iteration order.
pub fn nearest_node<'a, I>(point: &Point<f64>, candidates: I, threshold: f64) -> Option<i64>
where
    I: IntoIterator<Item = &'a NetworkNode>,
{
    let mut best: Option<(i64, f64)> = None;
    for candidate in candidates {
        let distance = candidate.distance_to(point);
        let closer = match best {
            Some((_, d)) => distance < d,
            None => true,
        };
        if closer {
            best = Some((candidate.id, distance));
        }
    }
    match best {
        Some((id, distance)) if distance <= threshold => Some(id),
        _ => None,
    }
}

/// assigns each stop its route-local network node.
///
/// the first pass matches against the route-local node set (excluding
/// transit-only nodes) with no distance bound; stops that do not sit within
/// `link_buffer` of any route-local roadway link are reset to unmatched. a
/// second pass then matches still-unmatched stops against transit-only
/// nodes created while coding earlier routes, under the tight
/// `snap_threshold` so far-away gap nodes are not reused spuriously.
pub fn match_route_stops(
    stops: &mut [RouteStop],
    subset: &Network,
    context: &AugmentationContext,
    link_buffer: f64,
    snap_threshold: f64,
) {
    for stop in stops.iter_mut() {
        let roadway_nodes = subset.nodes().filter(|n| !context.contains_node(n.id));
        stop.node = nearest_node(&stop.point, roadway_nodes, f64::INFINITY);
        if stop.node.is_some() {
            let in_corridor = subset
                .links()
                .filter(|l| !context.contains_link(&l.key()))
                .any(|l| stop.point.euclidean_distance(&l.geometry) <= link_buffer);
            if !in_corridor {
                stop.node = None;
            }
        }
    }
    rematch_unmatched_stops(stops, subset, context, snap_threshold);
}

/// resolves still-unmatched stops against the transit-only nodes present in
/// the route-local subset. called once after the first matching pass and
/// again after every hop, since a gap filled earlier in the route (or in an
/// earlier route) may satisfy a later stop.
pub fn rematch_unmatched_stops(
    stops: &mut [RouteStop],
    subset: &Network,
    context: &AugmentationContext,
    snap_threshold: f64,
) {
    for stop in stops.iter_mut() {
        if stop.node.is_some() {
            continue;
        }
        let transit_nodes = subset.nodes().filter(|n| context.contains_node(n.id));
        stop.node = nearest_node(&stop.point, transit_nodes, snap_threshold);
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::model::NetworkLink;
    use geo::line_string;

    fn node(id: i64, x: f64, y: f64) -> NetworkNode {
        NetworkNode::new(id, x, y)
    }

    #[test]
    fn test_nearest_node_returns_argmin() {
        let candidates = vec![node(1, 0.0, 0.0), node(2, 10.0, 0.0), node(3, 100.0, 0.0)];
        let found = nearest_node(&Point::new(12.0, 0.0), candidates.iter(), f64::INFINITY);
        assert_eq!(found, Some(2));
    }

    #[test]
    fn test_nearest_node_respects_threshold() {
        let candidates = vec![node(1, 0.0, 0.0)];
        let found = nearest_node(&Point::new(50.0, 0.0), candidates.iter(), 10.0);
        assert_eq!(found, None);
    }

    #[test]
    fn test_nearest_node_empty_candidates() {
        let candidates: Vec<NetworkNode> = vec![];
        let found = nearest_node(&Point::new(0.0, 0.0), candidates.iter(), f64::INFINITY);
        assert_eq!(found, None);
    }

    #[test]
    fn test_match_resets_stops_outside_corridor() {
        let mut subset = Network::new();
        subset.add_node(node(1, 0.0, 0.0));
        subset.add_node(node(2, 100.0, 0.0));
        subset
            .add_link(NetworkLink::new(
                1,
                2,
                line_string![(x: 0.0, y: 0.0), (x: 100.0, y: 0.0)],
            ))
            .unwrap();
        let context = AugmentationContext::new(1000);

        let mut stops = vec![
            RouteStop::new("near", 1, Point::new(50.0, 10.0)),
            RouteStop::new("far", 2, Point::new(50.0, 5000.0)),
        ];
        match_route_stops(&mut stops, &subset, &context, 328.0, 328.0);
        assert_eq!(stops[0].node, Some(1));
        assert_eq!(stops[1].node, None);
    }

    #[test]
    fn test_rematch_assigns_transit_nodes_within_threshold() {
        let mut subset = Network::new();
        let mut context = AugmentationContext::new(1000);
        let id = context.create_node(Point::new(200.0, 0.0));
        if let Some(n) = context.node(id) {
            subset.add_node(n.clone());
        }

        let mut stops = vec![
            RouteStop::new("close", 1, Point::new(210.0, 0.0)),
            RouteStop::new("distant", 2, Point::new(900.0, 0.0)),
        ];
        rematch_unmatched_stops(&mut stops, &subset, &context, 328.0);
        assert_eq!(stops[0].node, Some(1000));
        assert_eq!(stops[1].node, None);
    }
}
