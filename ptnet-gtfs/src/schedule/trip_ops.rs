use super::headway::normalize_seconds;
use super::{ScheduleError, ServiceDay};
use chrono::NaiveTime;
use geo::Point;
use gtfs_structures::{Gtfs, RouteType, Stop, StopTime, Trip};
use itertools::Itertools;
use ptnet_core::model::RouteStop;
use std::collections::{BinaryHeap, HashSet};
use std::sync::Arc;

/// the trip whose stop pattern stands in for a shape: the first trip
/// referencing the shape id, by ascending trip id for determinism
pub fn representative_trip<'a>(gtfs: &'a Gtfs, shape_id: &str) -> Option<&'a Trip> {
    gtfs.trips
        .values()
        .filter(|t| t.shape_id.as_deref() == Some(shape_id))
        .min_by(|a, b| a.id.cmp(&b.id))
}

/// a trip's stops in ascending stop-sequence order, located and ready for
/// node matching. stop coordinates are read as planar x,y: inputs are
/// expected pre-projected to the roadway network's coordinate system.
pub fn route_stops(gtfs: &Gtfs, trip: &Trip) -> Result<Vec<RouteStop>, ScheduleError> {
    let ordered = ordered_stop_times(trip)?;
    ordered
        .iter()
        .map(|stop_time| {
            let point = stop_location(stop_time.stop.clone(), gtfs).ok_or_else(|| {
                ScheduleError::MissingStopLocation(stop_time.stop.id.clone())
            })?;
            Ok(RouteStop::new(
                &stop_time.stop.id,
                stop_time.stop_sequence,
                point,
            ))
        })
        .collect()
}

/// start times of every trip on the shape whose service calendar is active
/// on the given day, ascending
pub fn shape_start_times(gtfs: &Gtfs, shape_id: &str, day: &ServiceDay) -> Vec<NaiveTime> {
    let active_services: HashSet<&String> = gtfs
        .calendar
        .iter()
        .filter(|(_, calendar)| day.is_active(calendar))
        .map(|(service_id, _)| service_id)
        .collect();
    gtfs.trips
        .values()
        .filter(|t| {
            t.shape_id.as_deref() == Some(shape_id) && active_services.contains(&t.service_id)
        })
        .filter_map(trip_start_seconds)
        .map(normalize_seconds)
        .sorted()
        .collect_vec()
}

/// numeric GTFS route type, extended codes included
pub fn route_type_code(route_type: &RouteType) -> i32 {
    match route_type {
        RouteType::Tramway => 0,
        RouteType::Subway => 1,
        RouteType::Rail => 2,
        RouteType::Bus => 3,
        RouteType::Ferry => 4,
        RouteType::CableCar => 5,
        RouteType::Gondola => 6,
        RouteType::Funicular => 7,
        RouteType::Coach => 200,
        RouteType::Air => 1100,
        RouteType::Taxi => 1500,
        RouteType::Other(code) => (*code).into(),
    }
}

/// Returns an ordered (ascending) vector of [StopTime]. Internally uses
/// [BinaryHeap] to sort. In order to return the [BinaryHeap] itself,
/// [StopTime] would need to implement [Ord].
fn ordered_stop_times(trip: &Trip) -> Result<Vec<StopTime>, ScheduleError> {
    let stop_queue_order: BinaryHeap<(u32, usize)> = trip
        .stop_times
        .iter()
        .enumerate()
        .map(|(i, st)| (st.stop_sequence, i))
        .collect();

    stop_queue_order
        .into_sorted_vec()
        .iter()
        .map(|(_, idx)| {
            trip.stop_times
                .get(*idx)
                .cloned()
                .ok_or_else(|| ScheduleError::MalformedTrip(*idx, trip.id.clone()))
        })
        .collect::<Result<Vec<_>, _>>()
}

/// departure from the trip's first stop, falling back to its arrival time
fn trip_start_seconds(trip: &Trip) -> Option<u32> {
    trip.stop_times
        .iter()
        .min_by_key(|st| st.stop_sequence)
        .and_then(|st| st.departure_time.or(st.arrival_time))
}

// Checks the stop and its parent for a location. Returns None if this
// fails (parent doesn't exist or doesn't have a location).
fn stop_location(stop: Arc<Stop>, gtfs: &Gtfs) -> Option<Point<f64>> {
    if let (Some(x), Some(y)) = (stop.longitude, stop.latitude) {
        return Some(Point::new(x, y));
    }
    stop.parent_station
        .clone()
        .and_then(|parent_id| gtfs.stops.get(&parent_id))
        .and_then(|parent| match (parent.longitude, parent.latitude) {
            (Some(x), Some(y)) => Some(Point::new(x, y)),
            _ => None,
        })
}
