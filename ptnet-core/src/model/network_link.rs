use super::AttributeMap;
use geo::{Euclidean, Length, LineString};
use serde::{Deserialize, Serialize};

/// a directed link of the roadway network. `a` and `b` reference node ids;
/// `geometry` is the link polyline in the same planar units as the nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkLink {
    pub a: i64,
    pub b: i64,
    pub geometry: LineString<f64>,
    #[serde(default)]
    pub attributes: AttributeMap,
}

impl NetworkLink {
    pub fn new(a: i64, b: i64, geometry: LineString<f64>) -> NetworkLink {
        NetworkLink {
            a,
            b,
            geometry,
            attributes: AttributeMap::new(),
        }
    }

    pub fn with_attributes(mut self, attributes: AttributeMap) -> NetworkLink {
        self.attributes = attributes;
        self
    }

    /// normalized endpoint pair used for link deduplication. output node
    /// sequences can carry negated ids, so both endpoints are folded back
    /// to their positive form.
    pub fn key(&self) -> (i64, i64) {
        (self.a.abs(), self.b.abs())
    }

    /// polyline length in network units
    pub fn length(&self) -> f64 {
        Euclidean.length(&self.geometry)
    }

    /// the same link coded in the opposite direction, geometry reversed
    pub fn reversed(&self) -> NetworkLink {
        let mut coords = self.geometry.0.clone();
        coords.reverse();
        NetworkLink {
            a: self.b,
            b: self.a,
            geometry: LineString::new(coords),
            attributes: self.attributes.clone(),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use geo::line_string;

    #[test]
    fn test_key_normalizes_sign() {
        let link = NetworkLink::new(-3, 7, line_string![(x: 0.0, y: 0.0), (x: 1.0, y: 0.0)]);
        assert_eq!(link.key(), (3, 7));
    }

    #[test]
    fn test_reversed_swaps_endpoints_and_geometry() {
        let link = NetworkLink::new(1, 2, line_string![(x: 0.0, y: 0.0), (x: 3.0, y: 4.0)]);
        let rev = link.reversed();
        assert_eq!((rev.a, rev.b), (2, 1));
        assert_eq!(rev.geometry.0.first(), link.geometry.0.last());
        assert_eq!(rev.length(), link.length());
    }
}
