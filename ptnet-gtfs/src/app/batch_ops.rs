use super::{AppError, BuildConfig};
use crate::io::{self, RouteModeTable};
use crate::lin::{self, LinRecord};
use crate::schedule::{self, PeriodWindow};
use gtfs_structures::Gtfs;
use itertools::Itertools;
use kdam::tqdm;
use ptnet_core::graph::RouteGraph;
use ptnet_core::matching;
use ptnet_core::model::{AugmentationContext, Network};
use ptnet_core::sequence::{sequence_route, ShapePoints};
use std::collections::HashSet;
use std::fmt::Display;
use std::path::Path;
use std::time::Instant;

/// counts reported at the end of a line-coding run
#[derive(Debug, Clone, Default)]
pub struct BatchSummary {
    pub lines: usize,
    pub skipped: usize,
    pub transit_nodes: usize,
    pub transit_links: usize,
}

impl Display for BatchSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} lines coded, {} shapes skipped, {} transit-only nodes, {} transit-only links",
            self.lines, self.skipped, self.transit_nodes, self.transit_links
        )
    }
}

/// codes every GTFS shape of interest onto the roadway network, one route
/// at a time. the augmentation context threads through the loop, so a
/// route can reuse nodes and links synthesized for any earlier route, and
/// is folded into the working network before each route and into the
/// persisted tables at the end.
pub fn run_build(
    gtfs: &Gtfs,
    base: Network,
    modes: &RouteModeTable,
    config: &BuildConfig,
    output_directory: &Path,
) -> Result<BatchSummary, AppError> {
    let run_start = Instant::now();
    let windows = config.windows()?;

    std::fs::create_dir_all(output_directory).map_err(|e| {
        AppError::OtherError(format!(
            "cannot create output directory {output_directory:?}: {e}"
        ))
    })?;

    let mut working = base.clone();
    working.clean(
        &config.node_ranges_to_drop,
        &config.facility_type_field,
        &config.facility_types_to_drop,
    );
    log::info!(
        "matching network has {} nodes and {} links after cleaning",
        working.n_nodes(),
        working.n_links()
    );

    let mut context = AugmentationContext::new(base.max_node_id() + 1);
    let mut records: Vec<LinRecord> = vec![];
    let mut skipped = 0;

    let shape_ids = gtfs.shapes.keys().sorted().cloned().collect_vec();
    for shape_id in tqdm!(shape_ids.iter(), total = shape_ids.len(), desc = "coding routes") {
        let route_start = Instant::now();
        match code_route(gtfs, &mut working, &mut context, modes, config, &windows, shape_id) {
            Ok(Some(record)) => {
                log::info!(
                    "shape {} coded as '{}' in {:.2} seconds",
                    shape_id,
                    record.name,
                    route_start.elapsed().as_secs_f64()
                );
                records.push(record);
            }
            Ok(None) => {
                skipped += 1;
            }
            Err(e) => {
                log::warn!("shape {shape_id} skipped: {e}");
                skipped += 1;
            }
        }
    }
    eprintln!();

    // persist the augmented network from the uncleaned base so dropped
    // facility classes still appear in the output tables
    let mut augmented = base;
    augmented.merge_context(&context);
    io::write_network(output_directory, &augmented)?;

    let lin_path = output_directory.join("transit_lines.lin");
    let mut lin_file = std::fs::File::create(&lin_path).map_err(|e| {
        AppError::OtherError(format!("cannot create {lin_path:?}: {e}"))
    })?;
    lin::write_lin(&records, &mut lin_file)
        .map_err(|e| AppError::OtherError(format!("failure writing {lin_path:?}: {e}")))?;

    if !context.is_empty() {
        io::write_transit_only(output_directory, &context)?;
    }

    let summary = BatchSummary {
        lines: records.len(),
        skipped,
        transit_nodes: context.n_nodes(),
        transit_links: context.n_links(),
    };
    log::info!(
        "finished in {:.2} seconds: {summary}",
        run_start.elapsed().as_secs_f64()
    );
    Ok(summary)
}

/// codes a single shape. Ok(None) marks a shape that is out of scope for
/// this run (no trips, or a route type not of interest); errors mark
/// per-route anomalies, logged and skipped by the caller while the batch
/// continues.
fn code_route(
    gtfs: &Gtfs,
    working: &mut Network,
    context: &mut AugmentationContext,
    modes: &RouteModeTable,
    config: &BuildConfig,
    windows: &[PeriodWindow],
    shape_id: &str,
) -> Result<Option<LinRecord>, AppError> {
    let trip = match schedule::representative_trip(gtfs, shape_id) {
        Some(trip) => trip,
        None => {
            log::info!("shape {shape_id} not found in GTFS trips");
            return Ok(None);
        }
    };
    let route = gtfs
        .routes
        .get(&trip.route_id)
        .ok_or_else(|| AppError::OtherError(format!("trip {} references unknown route", trip.id)))?;
    let route_type = schedule::route_type_code(&route.route_type);
    if !config.route_types.contains(&route_type) {
        log::info!("shape {shape_id} is route type {route_type}, not of interest");
        return Ok(None);
    }
    // an unresolvable mode lookup is fatal to this route only
    let mode = modes.mode_for(&trip.route_id)?;

    // fold earlier routes' transit-only elements in before extraction so
    // this route can match against them
    working.merge_context(context);

    let params = &config.sequence;
    let shape = schedule::shape_linestring(gtfs, shape_id)?;
    let mut subset = working.subset_within(&shape, params.link_buffer);
    let mut stops = schedule::route_stops(gtfs, trip)?;
    if stops.len() < 2 {
        log::info!("shape {shape_id} has fewer than two stops");
        return Ok(None);
    }
    matching::match_route_stops(
        &mut stops,
        &subset,
        context,
        params.link_buffer,
        params.transit_node_snap_threshold,
    );

    let mut graph = RouteGraph::new(subset.nodes(), subset.links());
    let mut sampled = ShapePoints::sample(&shape, params.shape_sampling_interval)
        .map_err(|e| AppError::OtherError(format!("{e}")))?;
    let sequence = sequence_route(
        &mut subset,
        &mut graph,
        context,
        &mut stops,
        &mut sampled,
        &config.transit_link_attributes,
        params,
    )
    .map_err(|e| AppError::OtherError(format!("{e}")))?;
    if sequence.is_empty() {
        log::info!("shape {shape_id} produced an empty node sequence");
        return Ok(None);
    }

    let stop_nodes: HashSet<i64> = stops.iter().filter_map(|s| s.node).collect();
    let node_sequence = lin::signed_sequence(&sequence, &stop_nodes);

    let head_sign = trip
        .trip_headsign
        .clone()
        .unwrap_or_else(|| trip.route_id.clone());
    let start_times = schedule::shape_start_times(gtfs, shape_id, &config.day_type);
    let headways = windows
        .iter()
        .map(|w| schedule::period_headway_minutes(&start_times, w))
        .collect_vec();

    Ok(Some(LinRecord {
        shape_id: String::from(shape_id),
        name: lin::line_name(&head_sign, shape_id),
        mode,
        headways,
        node_sequence,
    }))
}
