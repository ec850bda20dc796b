use super::ScheduleError;
use chrono::NaiveTime;
use itertools::Itertools;

const SECONDS_PER_DAY: u32 = 86_400;

/// one time-of-day window a headway value is computed for
#[derive(Debug, Clone, PartialEq)]
pub struct PeriodWindow {
    pub name: String,
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl PeriodWindow {
    pub fn new(name: &str, start: NaiveTime, end: NaiveTime) -> PeriodWindow {
        PeriodWindow {
            name: String::from(name),
            start,
            end,
        }
    }

    pub fn contains(&self, time: &NaiveTime) -> bool {
        self.start <= *time && *time < self.end
    }
}

/// parses "HH:MM:SS". hour values of 24 and above denote post-midnight
/// service and wrap into 0-23.
pub fn parse_schedule_time(raw: &str) -> Result<NaiveTime, ScheduleError> {
    let malformed = || ScheduleError::MalformedScheduleTime(String::from(raw));
    let trimmed = raw.trim();
    let (h, m, s) = trimmed
        .split(':')
        .map(|part| part.parse::<u32>())
        .collect_tuple()
        .ok_or_else(malformed)?;
    match (h, m, s) {
        (Ok(h), Ok(m), Ok(s)) => NaiveTime::from_hms_opt(h % 24, m, s).ok_or_else(malformed),
        _ => Err(malformed()),
    }
}

/// converts GTFS seconds-since-midnight into a time of day, wrapping
/// post-midnight values back into 0-23 hours
pub fn normalize_seconds(seconds: u32) -> NaiveTime {
    NaiveTime::from_num_seconds_from_midnight_opt(seconds % SECONDS_PER_DAY, 0)
        .unwrap_or(NaiveTime::MIN)
}

/// average gap in whole minutes between consecutive start times falling in
/// the window, or 0 when fewer than two trips run in it
pub fn period_headway_minutes(start_times: &[NaiveTime], window: &PeriodWindow) -> f64 {
    let times = start_times
        .iter()
        .filter(|t| window.contains(t))
        .sorted()
        .collect_vec();
    if times.len() < 2 {
        return 0.0;
    }
    let total_seconds: i64 = times
        .windows(2)
        .map(|pair| (*pair[1] - *pair[0]).num_seconds())
        .sum();
    let gaps = (times.len() - 1) as f64;
    (total_seconds as f64 / (gaps * 60.0)).round()
}

#[cfg(test)]
mod test {
    use super::*;

    fn window(start: &str, end: &str) -> PeriodWindow {
        PeriodWindow::new(
            "am",
            parse_schedule_time(start).expect("valid start"),
            parse_schedule_time(end).expect("valid end"),
        )
    }

    fn times(raw: &[&str]) -> Vec<NaiveTime> {
        raw.iter()
            .map(|t| parse_schedule_time(t).expect("valid time"))
            .collect()
    }

    #[test]
    fn test_quarter_hour_service() {
        let headway = period_headway_minutes(
            &times(&["08:00:00", "08:15:00", "08:30:00"]),
            &window("06:00:00", "09:00:00"),
        );
        assert_eq!(headway, 15.0);
    }

    #[test]
    fn test_single_trip_has_no_headway() {
        let headway =
            period_headway_minutes(&times(&["08:00:00"]), &window("06:00:00", "09:00:00"));
        assert_eq!(headway, 0.0);
    }

    #[test]
    fn test_trips_outside_window_ignored() {
        let headway = period_headway_minutes(
            &times(&["05:00:00", "08:00:00", "08:30:00", "09:00:00"]),
            &window("06:00:00", "09:00:00"),
        );
        assert_eq!(headway, 30.0);
    }

    #[test]
    fn test_unsorted_input_is_sorted_first() {
        let headway = period_headway_minutes(
            &times(&["08:30:00", "08:00:00", "08:15:00"]),
            &window("06:00:00", "09:00:00"),
        );
        assert_eq!(headway, 15.0);
    }

    #[test]
    fn test_post_midnight_hour_wraps() {
        let time = parse_schedule_time("25:10:30").expect("valid time");
        assert_eq!(time, NaiveTime::from_hms_opt(1, 10, 30).expect("time"));
        assert_eq!(normalize_seconds(25 * 3600), NaiveTime::from_hms_opt(1, 0, 0).expect("time"));
    }

    #[test]
    fn test_malformed_time_is_rejected() {
        assert!(parse_schedule_time("8 o'clock").is_err());
        assert!(parse_schedule_time("08:00").is_err());
        assert!(parse_schedule_time("08:61:00").is_err());
    }
}
