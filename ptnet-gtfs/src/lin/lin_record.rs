use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// total character width available for a line name
const NAME_WIDTH: usize = 10;

/// one coded transit line, ready for serialization into the line table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinRecord {
    pub shape_id: String,
    pub name: String,
    pub mode: i64,
    /// one value per configured period, in minutes
    pub headways: Vec<f64>,
    /// signed node ids: positive for stops, negative for pass-through
    pub node_sequence: Vec<i64>,
}

/// builds the line name from the trip head-sign and the last three digits
/// of the shape id, truncating the head-sign so the joined name fits the
/// fixed field width
pub fn line_name(head_sign: &str, shape_id: &str) -> String {
    let digits = shape_id.chars().rev().take(3).collect::<Vec<char>>();
    let suffix: String = digits.into_iter().rev().collect();
    let keep = NAME_WIDTH.saturating_sub(suffix.len() + 1);
    let head: String = head_sign.chars().take(keep).collect();
    format!("{head}_{suffix}")
}

/// applies the output sign convention: a node serving as one of the
/// route's stops keeps its positive id, every other node in the sequence
/// is negated to mark it pass-through
pub fn signed_sequence(sequence: &[i64], stop_nodes: &HashSet<i64>) -> Vec<i64> {
    sequence
        .iter()
        .map(|id| {
            if stop_nodes.contains(&id.abs()) {
                id.abs()
            } else {
                -id.abs()
            }
        })
        .collect()
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_line_name_fits_field_width() {
        let name = line_name("Crosstown Express", "20250012");
        assert_eq!(name, "Crosst_012");
        assert_eq!(name.chars().count(), NAME_WIDTH);
    }

    #[test]
    fn test_line_name_short_shape_id() {
        let name = line_name("Loop", "7");
        assert_eq!(name, "Loop_7");
    }

    #[test]
    fn test_signed_sequence_marks_pass_through_nodes() {
        let stops: HashSet<i64> = [1, 4].into_iter().collect();
        let signed = signed_sequence(&[1, 2, 3, 4], &stops);
        assert_eq!(signed, vec![1, -2, -3, 4]);
    }
}
