use super::{AttributeMap, AttributeValue};
use geo::{Distance, Euclidean, Point};
use serde::{Deserialize, Serialize};

/// a node of the roadway network in planar coordinates. node ids are always
/// stored positive; the stop/pass-through sign convention is applied only
/// when a line's node sequence is emitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkNode {
    pub id: i64,
    pub point: Point<f64>,
    #[serde(default)]
    pub attributes: AttributeMap,
}

impl NetworkNode {
    pub fn new(id: i64, x: f64, y: f64) -> NetworkNode {
        NetworkNode {
            id,
            point: Point::new(x, y),
            attributes: AttributeMap::new(),
        }
    }

    pub fn from_point(id: i64, point: Point<f64>) -> NetworkNode {
        NetworkNode {
            id,
            point,
            attributes: AttributeMap::new(),
        }
    }

    pub fn with_attribute(mut self, key: &str, value: AttributeValue) -> NetworkNode {
        self.attributes.insert(String::from(key), value);
        self
    }

    pub fn x(&self) -> f64 {
        self.point.x()
    }

    pub fn y(&self) -> f64 {
        self.point.y()
    }

    pub fn distance_to(&self, point: &Point<f64>) -> f64 {
        Euclidean.distance(self.point, *point)
    }
}
