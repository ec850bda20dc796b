use super::gap_ops;
use super::shape_points::ShapePoints;
use super::{SequenceError, SequenceParams};
use crate::graph::RouteGraph;
use crate::matching;
use crate::model::{AttributeMap, AugmentationContext, Network, RouteStop};

/// walks one route's consecutive stop pairs and accumulates its node-id
/// sequence through the route-local graph. pairs that are matched and
/// reachable take the shortest path directly; every other combination goes
/// through gap synthesis, which leaves the pair connected. the subset,
/// graph and context are mutated in place and carry into the next route.
///
/// the returned sequence is unsigned; the stop/pass-through sign
/// convention is applied by the encoder once the matched stop set is
/// final.
pub fn sequence_route(
    subset: &mut Network,
    graph: &mut RouteGraph,
    context: &mut AugmentationContext,
    stops: &mut [RouteStop],
    shape_points: &mut ShapePoints,
    link_attributes: &AttributeMap,
    params: &SequenceParams,
) -> Result<Vec<i64>, SequenceError> {
    let mut sequence: Vec<i64> = vec![];
    for index in 0..stops.len().saturating_sub(1) {
        let (head, tail) = stops.split_at_mut(index + 1);
        let source = &mut head[index];
        let target = &mut tail[0];

        match (source.node, target.node) {
            (Some(s), Some(t)) if s == t => {
                // degenerate hop, both stops resolved to the same node
                continue;
            }
            (Some(s), Some(t)) if graph.has_path(s, t) => {
                let path = graph.shortest_path(s, t)?;
                extend_sequence(&mut sequence, path);
            }
            _ => {
                let endpoints = gap_ops::bridge_gap(
                    subset,
                    graph,
                    context,
                    shape_points,
                    source,
                    target,
                    link_attributes,
                    params,
                )?;
                let path = graph.shortest_path(endpoints.source_node, endpoints.target_node)?;
                extend_sequence(&mut sequence, path);
            }
        }

        // a gap bridged on this hop may satisfy a later stop
        matching::rematch_unmatched_stops(
            &mut tail[1..],
            subset,
            context,
            params.transit_node_snap_threshold,
        );
    }
    Ok(sequence)
}

/// appends a hop's path without repeating the boundary node shared with
/// the previous hop
fn extend_sequence(sequence: &mut Vec<i64>, path: Vec<i64>) {
    if sequence.is_empty() {
        sequence.extend(path);
    } else {
        sequence.extend(path.into_iter().skip(1));
    }
}
