mod headway;
mod route_shapes;
mod schedule_error;
mod service_day;
mod trip_ops;

pub use headway::{normalize_seconds, parse_schedule_time, period_headway_minutes, PeriodWindow};
pub use route_shapes::shape_linestring;
pub use schedule_error::ScheduleError;
pub use service_day::ServiceDay;
pub use trip_ops::{representative_trip, route_stops, route_type_code, shape_start_times};
