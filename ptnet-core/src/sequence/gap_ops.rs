use super::shape_points::{GapWindow, ShapePoints};
use super::{SequenceError, SequenceParams};
use crate::graph::RouteGraph;
use crate::matching::nearest_node;
use crate::model::{AttributeMap, AugmentationContext, Network, NetworkLink, NetworkNode, RouteStop};
use geo::{Coord, LineString, Point};
use itertools::Itertools;

/// terminal node ids of an accepted gap link, used to route the hop
pub(crate) struct GapEndpoints {
    pub source_node: i64,
    pub target_node: i64,
}

/// bridges one consecutive stop pair that is unmatched on either side or
/// matched but unreachable. the four matched-state combinations share this
/// single path: synthesize 0, 1 or 2 nodes onto the sampled shape, build a
/// candidate link that favors sampled points passing existing
/// infrastructure, validate it for connectivity in the working graph, and
/// fall back to the literal shape geometry when the candidate does not
/// connect. the accepted pair is registered in the transit-only registries
/// and mirrored into the route-local tables.
#[allow(clippy::too_many_arguments)]
pub(crate) fn bridge_gap(
    subset: &mut Network,
    graph: &mut RouteGraph,
    context: &mut AugmentationContext,
    shape_points: &mut ShapePoints,
    source: &mut RouteStop,
    target: &mut RouteStop,
    link_attributes: &AttributeMap,
    params: &SequenceParams,
) -> Result<GapEndpoints, SequenceError> {
    let radius_steps = params.bracket_radius_steps();
    let mut window = shape_points
        .bracket(&source.point, &target.point, &radius_steps)
        .ok_or_else(|| {
            SequenceError::UnbracketedStopPair(source.stop_id.clone(), target.stop_id.clone())
        })?;

    // an unmatched target synthesizes at its nearest sampled point, which
    // can sit past the bracketing point; stretch the window (and the
    // cursor) out to it so the gap geometry reaches the stop
    if target.node.is_none() {
        if let Some(index) = shape_points.nearest_index_from(window.start, &target.point) {
            if index > window.end {
                window.end = index;
                shape_points.advance_to(index);
            }
        }
    }

    // nearest already-coded node per sampled gap point, computed before any
    // node synthesis so fresh nodes do not flag their own sample
    let gap_points = shape_points.window_points(&window).to_vec();
    let near_nodes: Vec<Option<i64>> = gap_points
        .iter()
        .map(|p| nearest_node(p, subset.nodes(), params.node_reuse_threshold))
        .collect();

    let source_node = resolve_endpoint(source, &window, shape_points, subset, graph, context)?;
    let target_node = resolve_endpoint(target, &window, shape_points, subset, graph, context)?;

    // when exactly one terminus is transit-only, substitute the nearest
    // already-coded node intersected along the gap as the opposite
    // terminus instead of coding a parallel segment past it. the window is
    // cut at the first matching intermediate for a transit-only source and
    // at the last one for a transit-only target.
    let mut a = source_node;
    let mut b = target_node;
    let mut a_point = source.point;
    let mut b_point = target.point;
    let mut kept = 0..gap_points.len();
    let source_is_transit = context.contains_node(source_node);
    let target_is_transit = context.contains_node(target_node);
    if source_is_transit && !target_is_transit {
        let first = near_nodes
            .iter()
            .position(|n| matches!(n, Some(id) if *id != source_node));
        if let Some(index) = first {
            if let Some(Some(id)) = near_nodes.get(index) {
                if let Some(node) = subset.node(*id) {
                    kept = 0..(index + 1);
                    b = *id;
                    b_point = node.point;
                }
            }
        }
    } else if !source_is_transit && target_is_transit {
        let last = near_nodes
            .iter()
            .rposition(|n| matches!(n, Some(id) if *id != target_node));
        if let Some(index) = last {
            if let Some(Some(id)) = near_nodes.get(index) {
                if let Some(node) = subset.node(*id) {
                    kept = index..gap_points.len();
                    a = *id;
                    a_point = node.point;
                }
            }
        }
    }

    // primary candidate: only sampled points passing existing
    // infrastructure. fallback: every sampled point, so it always traces
    // the literal shape between the original termini.
    let primary_points = gap_points[kept.clone()]
        .iter()
        .zip(&near_nodes[kept])
        .filter(|(_, flag)| flag.is_some())
        .map(|(p, _)| *p)
        .collect_vec();
    let primary = build_geometry(&a_point, &primary_points, &b_point);
    let fallback = build_geometry(&source.point, &gap_points, &target.point);

    graph.insert_link_pair(a, b, link_length(&primary));
    let (a, b, geometry) = if graph.has_path(source_node, target_node) {
        (a, b, primary)
    } else {
        log::debug!("candidate link {a}->{b} does not connect, using the full shape geometry");
        graph.remove_link_pair(a, b);
        graph.insert_link_pair(source_node, target_node, link_length(&fallback));
        (source_node, target_node, fallback)
    };

    let link = NetworkLink::new(a, b, geometry).with_attributes(link_attributes.clone());
    context.register_link_pair(link, params.distance_divisor);
    for key in [(a.abs(), b.abs()), (b.abs(), a.abs())] {
        if let Some(registered) = context.link(&key) {
            let _ = subset.add_link(registered.clone());
        }
    }

    Ok(GapEndpoints {
        source_node,
        target_node,
    })
}

/// returns the stop's node, synthesizing one at the nearest sampled shape
/// point when unmatched. a synthesized stop is projected onto the shape:
/// its point becomes the sampled location.
fn resolve_endpoint(
    stop: &mut RouteStop,
    window: &GapWindow,
    shape_points: &ShapePoints,
    subset: &mut Network,
    graph: &mut RouteGraph,
    context: &mut AugmentationContext,
) -> Result<i64, SequenceError> {
    if let Some(id) = stop.node {
        return Ok(id);
    }
    let point = shape_points
        .nearest_in_window(window, &stop.point)
        .ok_or(SequenceError::EmptyGapWindow)?;
    let id = context.create_node(point);
    log::debug!(
        "synthesized transit-only node {id} for stop {} at ({:.1}, {:.1})",
        stop.stop_id,
        point.x(),
        point.y()
    );
    subset.add_node(NetworkNode::from_point(id, point));
    graph.add_node(id, point);
    stop.node = Some(id);
    stop.point = point;
    Ok(id)
}

/// assembles the candidate polyline, dropping consecutive duplicate
/// coordinates that arise when a terminus sits on a sampled point
fn build_geometry(
    from: &Point<f64>,
    via: &[Point<f64>],
    to: &Point<f64>,
) -> LineString<f64> {
    let mut coords: Vec<Coord<f64>> = vec![];
    for point in std::iter::once(from).chain(via.iter()).chain(std::iter::once(to)) {
        let coord = Coord {
            x: point.x(),
            y: point.y(),
        };
        if coords.last() != Some(&coord) {
            coords.push(coord);
        }
    }
    LineString::new(coords)
}

fn link_length(geometry: &LineString<f64>) -> f64 {
    use geo::{Euclidean, Length};
    Euclidean.length(geometry)
}
