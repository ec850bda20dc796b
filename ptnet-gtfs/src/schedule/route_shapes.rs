use super::ScheduleError;
use geo::{Coord, LineString};
use gtfs_structures::Gtfs;
use itertools::Itertools;

/// ordered polyline for a GTFS shape id, point coordinates read as planar
/// x,y (inputs are expected pre-projected to the network's system)
pub fn shape_linestring(gtfs: &Gtfs, shape_id: &str) -> Result<LineString<f64>, ScheduleError> {
    let points = gtfs
        .shapes
        .get(shape_id)
        .filter(|points| !points.is_empty())
        .ok_or_else(|| ScheduleError::MissingShape(String::from(shape_id)))?;
    let coords = points
        .iter()
        .sorted_by_key(|p| p.sequence)
        .map(|p| Coord {
            x: p.longitude,
            y: p.latitude,
        })
        .collect_vec();
    Ok(LineString::new(coords))
}
