use serde::{Deserialize, Serialize};

/// distance and threshold tuning for stop matching and gap synthesis. all
/// values are in the planar units of the network projection; the defaults
/// assume feet.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct SequenceParams {
    /// corridor half-width around the route shape used for route-local
    /// link extraction and the stop-within-links test
    pub link_buffer: f64,
    /// spacing of sampled points along the route shape
    pub shape_sampling_interval: f64,
    /// a sampled gap point within this distance of an already-coded node
    /// counts as passing existing infrastructure
    pub node_reuse_threshold: f64,
    /// matching bound when resolving a stop against transit-only nodes
    pub transit_node_snap_threshold: f64,
    /// growing search radii used to bracket a stop pair against the
    /// sampled shape: min, max, and step
    pub bracket_radius_min: f64,
    pub bracket_radius_max: f64,
    pub bracket_radius_step: f64,
    /// geometry length is divided by this to derive the distance attribute
    /// of transit-only links (5280 for feet to miles)
    pub distance_divisor: f64,
}

impl Default for SequenceParams {
    fn default() -> Self {
        SequenceParams {
            link_buffer: 328.0,
            shape_sampling_interval: 30.0,
            node_reuse_threshold: 328.0,
            transit_node_snap_threshold: 328.0,
            bracket_radius_min: 164.0,
            bracket_radius_max: 820.0,
            bracket_radius_step: 82.0,
            distance_divisor: 5280.0,
        }
    }
}

impl SequenceParams {
    pub fn bracket_radius_steps(&self) -> Vec<f64> {
        let mut steps = vec![];
        let mut radius = self.bracket_radius_min;
        while radius <= self.bracket_radius_max {
            steps.push(radius);
            radius += self.bracket_radius_step;
        }
        steps
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_default_radius_steps() {
        let steps = SequenceParams::default().bracket_radius_steps();
        assert_eq!(steps.first(), Some(&164.0));
        assert_eq!(steps.last(), Some(&820.0));
        assert_eq!(steps.len(), 9);
    }
}
