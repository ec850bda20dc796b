use super::SequenceError;
use geo::{Distance, Euclidean, Length, LineInterpolatePoint, LineString, Point};

/// the route shape sampled at a fixed interval, ground truth for gap
/// synthesis. a forward-only cursor tracks progress along the shape so
/// successive gaps on the same route bracket monotonically, which keeps
/// looping routes from matching a sampled point already passed.
pub struct ShapePoints {
    points: Vec<Point<f64>>,
    cursor: usize,
}

/// inclusive range of sampled-point indices bracketing one stop pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GapWindow {
    pub start: usize,
    pub end: usize,
}

impl ShapePoints {
    /// samples `shape` every `interval` distance units from its start,
    /// appending the final vertex
    pub fn sample(shape: &LineString<f64>, interval: f64) -> Result<ShapePoints, SequenceError> {
        let total = Euclidean.length(shape);
        if shape.0.len() < 2 || total <= 0.0 || interval <= 0.0 {
            return Err(SequenceError::DegenerateShape);
        }
        let mut points = vec![];
        let mut travelled = 0.0;
        while travelled < total {
            if let Some(point) = shape.line_interpolate_point(travelled / total) {
                points.push(point);
            }
            travelled += interval;
        }
        if let Some(last) = shape.points().last() {
            points.push(last);
        }
        Ok(ShapePoints { points, cursor: 0 })
    }

    pub fn points(&self) -> &[Point<f64>] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// finds the sampled-point window bracketing a stop pair, scanning
    /// forward from the cursor under a growing search radius. a point
    /// brackets the source when it falls within the radius and is closer
    /// to the source than to the target; the target bracket is the first
    /// later point for which the reverse holds. on success the cursor
    /// advances to the target bracket.
    pub fn bracket(
        &mut self,
        source: &Point<f64>,
        target: &Point<f64>,
        radius_steps: &[f64],
    ) -> Option<GapWindow> {
        for radius in radius_steps {
            let mut start: Option<usize> = None;
            for (offset, point) in self.points[self.cursor..].iter().enumerate() {
                let index = self.cursor + offset;
                let to_source = Euclidean.distance(*point, *source);
                let to_target = Euclidean.distance(*point, *target);
                if start.is_none() {
                    if to_source <= *radius && to_source <= to_target {
                        start = Some(index);
                    }
                } else if to_target <= *radius && to_target < to_source {
                    let window = GapWindow {
                        start: start?,
                        end: index,
                    };
                    self.cursor = index;
                    return Some(window);
                }
            }
        }
        None
    }

    pub fn window_points(&self, window: &GapWindow) -> &[Point<f64>] {
        &self.points[window.start..=window.end]
    }

    /// sampled point in the window closest to `point`
    pub fn nearest_in_window(&self, window: &GapWindow, point: &Point<f64>) -> Option<Point<f64>> {
        self.window_points(window)
            .iter()
            .copied()
            .min_by(|a, b| {
                Euclidean
                    .distance(*a, *point)
                    .total_cmp(&Euclidean.distance(*b, *point))
            })
    }

    /// index of the sampled point closest to `point`, searching from
    /// `start` to the end of the shape
    pub fn nearest_index_from(&self, start: usize, point: &Point<f64>) -> Option<usize> {
        if start >= self.points.len() {
            return None;
        }
        self.points[start..]
            .iter()
            .enumerate()
            .min_by(|(_, a), (_, b)| {
                Euclidean
                    .distance(**a, *point)
                    .total_cmp(&Euclidean.distance(**b, *point))
            })
            .map(|(offset, _)| start + offset)
    }

    /// moves the cursor forward, never backward
    pub fn advance_to(&mut self, index: usize) {
        if index > self.cursor {
            self.cursor = index.min(self.points.len().saturating_sub(1));
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use geo::line_string;

    fn straight_shape() -> LineString<f64> {
        line_string![(x: 0.0, y: 0.0), (x: 1000.0, y: 0.0)]
    }

    #[test]
    fn test_sample_spacing_and_terminal_point() {
        let points = ShapePoints::sample(&straight_shape(), 30.0).expect("sampled");
        // 0, 30, ..., 990, then the final vertex
        assert_eq!(points.len(), 35);
        let first = points.points()[0];
        let second = points.points()[1];
        assert!((Euclidean.distance(first, second) - 30.0).abs() < 1e-6);
        let last = points.points()[points.len() - 1];
        assert_eq!(last, Point::new(1000.0, 0.0));
    }

    #[test]
    fn test_sample_rejects_degenerate_shape() {
        let shape = line_string![(x: 5.0, y: 5.0), (x: 5.0, y: 5.0)];
        assert!(ShapePoints::sample(&shape, 30.0).is_err());
    }

    #[test]
    fn test_bracket_finds_window_and_advances_cursor() {
        let mut points = ShapePoints::sample(&straight_shape(), 30.0).expect("sampled");
        let steps = vec![164.0];
        let window = points
            .bracket(&Point::new(100.0, 10.0), &Point::new(700.0, 10.0), &steps)
            .expect("bracketed");
        assert!(window.start < window.end);
        let start_point = points.points()[window.start];
        let end_point = points.points()[window.end];
        assert!(Euclidean.distance(start_point, Point::new(100.0, 10.0)) <= 164.0);
        assert!(Euclidean.distance(end_point, Point::new(700.0, 10.0)) <= 164.0);

        // a later pair brackets at or after the previous target
        let next = points
            .bracket(&Point::new(700.0, 10.0), &Point::new(950.0, 10.0), &steps)
            .expect("bracketed");
        assert!(next.start >= window.end);
    }

    #[test]
    fn test_bracket_fails_for_far_pair() {
        let mut points = ShapePoints::sample(&straight_shape(), 30.0).expect("sampled");
        let steps = vec![164.0];
        let window = points.bracket(
            &Point::new(100.0, 9000.0),
            &Point::new(700.0, 9000.0),
            &steps,
        );
        assert!(window.is_none());
    }

    #[test]
    fn test_nearest_in_window() {
        let mut points = ShapePoints::sample(&straight_shape(), 30.0).expect("sampled");
        let steps = vec![164.0];
        let window = points
            .bracket(&Point::new(100.0, 10.0), &Point::new(700.0, 10.0), &steps)
            .expect("bracketed");
        let nearest = points
            .nearest_in_window(&window, &Point::new(344.0, 10.0))
            .expect("window is not empty");
        // 344 rounds to the sampled point at 330 or 360; both are within
        // one interval
        assert!(Euclidean.distance(nearest, Point::new(344.0, 0.0)) <= 30.0);
    }
}
