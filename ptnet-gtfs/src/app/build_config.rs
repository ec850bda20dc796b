use super::AppError;
use crate::schedule::{parse_schedule_time, PeriodWindow, ScheduleError, ServiceDay};
use ptnet_core::model::AttributeMap;
use ptnet_core::sequence::SequenceParams;
use serde::{Deserialize, Serialize};

/// defines the behaviors of one line-coding run
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    /// service-calendar day used for headway computation
    pub day_type: ServiceDay,
    /// time-of-day windows, one headway value each, in table order
    pub periods: Vec<PeriodConfig>,
    /// GTFS route types to code; everything else is skipped
    pub route_types: Vec<i32>,
    /// attributes stamped on every synthesized transit-only link
    pub transit_link_attributes: AttributeMap,
    /// numeric link column holding the facility type
    pub facility_type_field: String,
    /// facility types removed from the matching network
    pub facility_types_to_drop: Vec<f64>,
    /// inclusive node-id ranges removed from the matching network, e.g.
    /// centroid connectors
    pub node_ranges_to_drop: Vec<(i64, i64)>,
    /// matching and gap-synthesis tuning
    pub sequence: SequenceParams,
}

/// one headway period with "HH:MM:SS" bounds
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PeriodConfig {
    pub name: String,
    pub start: String,
    pub end: String,
}

impl PeriodConfig {
    fn new(name: &str, start: &str, end: &str) -> PeriodConfig {
        PeriodConfig {
            name: String::from(name),
            start: String::from(start),
            end: String::from(end),
        }
    }
}

impl Default for BuildConfig {
    fn default() -> Self {
        BuildConfig {
            day_type: ServiceDay::Wednesday,
            periods: vec![
                PeriodConfig::new("am", "06:00:00", "09:00:00"),
                PeriodConfig::new("md", "09:00:00", "15:00:00"),
                PeriodConfig::new("pm", "15:00:00", "18:00:00"),
                PeriodConfig::new("nt", "18:00:00", "23:59:59"),
            ],
            route_types: vec![3],
            transit_link_attributes: AttributeMap::new(),
            facility_type_field: String::from("FACTYPE"),
            facility_types_to_drop: vec![],
            node_ranges_to_drop: vec![],
            sequence: SequenceParams::default(),
        }
    }
}

impl BuildConfig {
    /// parses the configured period bounds; a malformed time aborts the
    /// run before any route is processed
    pub fn windows(&self) -> Result<Vec<PeriodWindow>, ScheduleError> {
        self.periods
            .iter()
            .map(|p| {
                Ok(PeriodWindow::new(
                    &p.name,
                    parse_schedule_time(&p.start)?,
                    parse_schedule_time(&p.end)?,
                ))
            })
            .collect()
    }
}

impl TryFrom<&String> for BuildConfig {
    type Error = AppError;

    fn try_from(f: &String) -> Result<Self, Self::Error> {
        if f.ends_with(".toml") {
            let base_config_file = config::File::new(f, config::FileFormat::Toml);
            let config = config::Config::builder()
                .add_source(base_config_file)
                .build()
                .map_err(|e| {
                    AppError::ConfigurationError(format!("failure reading {f}: {e}"))
                })?;
            config.try_deserialize::<BuildConfig>().map_err(|e| {
                AppError::ConfigurationError(format!("failure decoding {f}: {e}"))
            })
        } else if f.ends_with(".json") {
            let s = std::fs::read_to_string(f).map_err(|e| {
                AppError::ConfigurationError(format!("failure reading {f}: {e}"))
            })?;
            serde_json::from_str(&s).map_err(|e| {
                AppError::ConfigurationError(format!("failure decoding {f}: {e}"))
            })
        } else {
            Err(AppError::ConfigurationError(format!(
                "unsupported file type: {f}"
            )))
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_default_windows_parse() {
        let config = BuildConfig::default();
        let windows = config.windows().expect("default periods are valid");
        assert_eq!(windows.len(), 4);
        assert_eq!(windows[0].name, "am");
    }

    #[test]
    fn test_malformed_period_rejected() {
        let mut config = BuildConfig::default();
        config.periods[0].start = String::from("six am");
        assert!(config.windows().is_err());
    }

    #[test]
    fn test_decode_from_json() {
        let raw = r#"{
            "day_type": "saturday",
            "route_types": [3, 0],
            "transit_link_attributes": {"FACTYPE": 90.0, "SOURCE": "transit"},
            "sequence": {"link_buffer": 400.0}
        }"#;
        let config: BuildConfig = serde_json::from_str(raw).expect("decodes");
        assert_eq!(config.day_type, ServiceDay::Saturday);
        assert_eq!(config.route_types, vec![3, 0]);
        assert_eq!(config.sequence.link_buffer, 400.0);
        // unspecified values fall back to defaults
        assert_eq!(config.sequence.distance_divisor, 5280.0);
        assert_eq!(config.periods.len(), 4);
    }
}
