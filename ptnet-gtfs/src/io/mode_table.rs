use super::IoError;
use serde::Deserialize;
use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

/// external route id to internal travel-model mode code lookup
pub struct RouteModeTable {
    modes: HashMap<String, i64>,
}

#[derive(Deserialize)]
struct ModeRow {
    #[serde(rename = "ROUTE_ID")]
    route_id: String,
    #[serde(rename = "MODE")]
    mode: i64,
}

impl RouteModeTable {
    pub fn from_path(path: &Path) -> Result<RouteModeTable, IoError> {
        let label = path.to_str().unwrap_or_default().to_string();
        let reader = csv::ReaderBuilder::new()
            .from_path(path)
            .map_err(|e| IoError::ReadError {
                path: label.clone(),
                message: format!("{e}"),
            })?;
        Self::from_csv(reader, &label)
    }

    pub fn from_reader<R: Read>(reader: R, label: &str) -> Result<RouteModeTable, IoError> {
        Self::from_csv(csv::Reader::from_reader(reader), label)
    }

    fn from_csv<R: Read>(reader: csv::Reader<R>, label: &str) -> Result<RouteModeTable, IoError> {
        let modes = reader
            .into_deserialize::<ModeRow>()
            .map(|row| {
                row.map(|r| (r.route_id, r.mode))
                    .map_err(|e| IoError::ReadError {
                        path: String::from(label),
                        message: format!("{e}"),
                    })
            })
            .collect::<Result<HashMap<String, i64>, IoError>>()?;
        Ok(RouteModeTable { modes })
    }

    /// mode code for a route; unresolvable lookups fail the route, not the
    /// batch
    pub fn mode_for(&self, route_id: &str) -> Result<i64, IoError> {
        self.modes
            .get(route_id)
            .copied()
            .ok_or_else(|| IoError::UnknownRouteMode(String::from(route_id)))
    }
}
