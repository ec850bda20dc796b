use geo::Point;
use serde::{Deserialize, Serialize};

/// a transit stop served by one route, in trip stop-time order. the node
/// assignment is route-local: the same physical stop can resolve to
/// different network nodes on different routes, since matching is aware of
/// gaps filled while coding each route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteStop {
    pub stop_id: String,
    pub sequence: u32,
    pub point: Point<f64>,
    /// assigned network node, None until matched or synthesized
    pub node: Option<i64>,
}

impl RouteStop {
    pub fn new(stop_id: &str, sequence: u32, point: Point<f64>) -> RouteStop {
        RouteStop {
            stop_id: String::from(stop_id),
            sequence,
            point,
            node: None,
        }
    }
}
