//! Built-in list of cities offered by the "add city" picker.

use serde::{Deserialize, Serialize};

use crate::{zoned_time::ZoneId, ClockError, ClockResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CityData {
    pub name: &'static str,
    pub zone: &'static str,
}

impl CityData {
    pub fn zone_id(&self) -> ClockResult<ZoneId> {
        ZoneId::parse(self.zone)
    }

    /// Continent part of the zone, e.g. `Europe` for `Europe/Paris`.
    #[must_use]
    pub fn region(&self) -> &'static str {
        self.zone.split('/').next().unwrap_or(self.zone)
    }
}

pub const CITIES: &[CityData] = &[
    CityData { name: "Taiwan", zone: "Asia/Taipei" },
    CityData { name: "Estonia", zone: "Europe/Tallinn" },
    CityData { name: "France", zone: "Europe/Paris" },
    CityData { name: "Japan", zone: "Asia/Tokyo" },
    CityData { name: "London", zone: "Europe/London" },
    CityData { name: "Mexico City", zone: "America/Mexico_City" },
    CityData { name: "New York", zone: "America/New_York" },
    CityData { name: "India", zone: "Asia/Kolkata" },
    CityData { name: "Portugal", zone: "Europe/Lisbon" },
    CityData { name: "Ukraine", zone: "Europe/Kyiv" },
    CityData { name: "Sydney", zone: "Australia/Sydney" },
    CityData { name: "Turkey", zone: "Europe/Istanbul" },
    CityData { name: "California", zone: "America/Los_Angeles" },
    CityData { name: "Vancouver", zone: "America/Vancouver" },
    CityData { name: "Singapore", zone: "Asia/Singapore" },
    CityData { name: "Berlin", zone: "Europe/Berlin" },
    CityData { name: "Dubai", zone: "Asia/Dubai" },
    CityData { name: "Seoul", zone: "Asia/Seoul" },
];

pub fn find(name: &str) -> ClockResult<&'static CityData> {
    CITIES
        .iter()
        .find(|c| c.name == name)
        .ok_or_else(|| ClockError::UnknownCity(name.to_string()))
}

/// Picker row handed to the shell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CityOption {
    pub name: String,
    pub region: String,
}

#[must_use]
pub fn options() -> Vec<CityOption> {
    CITIES
        .iter()
        .map(|c| CityOption {
            name: c.name.to_string(),
            region: c.region().to_uppercase(),
        })
        .collect()
}
