mod stop_matcher;

pub use stop_matcher::{match_route_stops, nearest_node, rematch_unmatched_stops};
