use gtfs_structures::Calendar;
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// day-of-week used to select the service calendars that contribute trips
/// to headway computation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceDay {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl ServiceDay {
    pub fn is_active(&self, calendar: &Calendar) -> bool {
        match self {
            ServiceDay::Monday => calendar.monday,
            ServiceDay::Tuesday => calendar.tuesday,
            ServiceDay::Wednesday => calendar.wednesday,
            ServiceDay::Thursday => calendar.thursday,
            ServiceDay::Friday => calendar.friday,
            ServiceDay::Saturday => calendar.saturday,
            ServiceDay::Sunday => calendar.sunday,
        }
    }
}

impl Display for ServiceDay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let day = match self {
            ServiceDay::Monday => "monday",
            ServiceDay::Tuesday => "tuesday",
            ServiceDay::Wednesday => "wednesday",
            ServiceDay::Thursday => "thursday",
            ServiceDay::Friday => "friday",
            ServiceDay::Saturday => "saturday",
            ServiceDay::Sunday => "sunday",
        };
        write!(f, "{day}")
    }
}
