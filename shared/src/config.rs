//! Shell-supplied configuration and its validated form.

use serde::{Deserialize, Serialize};

use crate::{
    capabilities::StorageKey,
    palette::{AnchorSpec, Palette},
    ClockError, ClockResult, HEADER_TICK_MS, MAX_FRIENDS, STORAGE_KEY, WORK_DAY_END_HOUR,
    WORK_DAY_START_HOUR,
};

/// Raw configuration as the shell sends it. Every field is optional on the
/// wire and falls back to the built-in default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClockConfig {
    pub storage_key: String,
    pub max_friends: usize,
    pub work_start_hour: u32,
    pub work_end_hour: u32,
    pub header_tick_ms: u32,
    pub palette: Vec<AnchorSpec>,
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self {
            storage_key: STORAGE_KEY.to_string(),
            max_friends: MAX_FRIENDS,
            work_start_hour: WORK_DAY_START_HOUR,
            work_end_hour: WORK_DAY_END_HOUR,
            header_tick_ms: HEADER_TICK_MS,
            palette: Palette::day_cycle().to_specs(),
        }
    }
}

/// Work hours as a half-open `[start, end)` window of local hours.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkHours {
    pub start: u32,
    pub end: u32,
}

impl WorkHours {
    #[must_use]
    pub fn contains(self, hour: u32) -> bool {
        hour >= self.start && hour < self.end
    }
}

/// Validated settings the core runs with.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub storage_key: StorageKey,
    pub max_friends: usize,
    pub work_hours: WorkHours,
    pub header_tick_ms: u32,
    pub palette: Palette,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            storage_key: StorageKey::default(),
            max_friends: MAX_FRIENDS,
            work_hours: WorkHours {
                start: WORK_DAY_START_HOUR,
                end: WORK_DAY_END_HOUR,
            },
            header_tick_ms: HEADER_TICK_MS,
            palette: Palette::day_cycle(),
        }
    }
}

impl TryFrom<ClockConfig> for Settings {
    type Error = ClockError;

    fn try_from(config: ClockConfig) -> ClockResult<Self> {
        let storage_key = StorageKey::new(config.storage_key)?;

        if config.max_friends == 0 {
            return Err(ClockError::InvalidConfig {
                field: "max_friends",
                reason: "must allow at least one friend".into(),
            });
        }

        if config.work_start_hour >= config.work_end_hour || config.work_end_hour > 24 {
            return Err(ClockError::InvalidConfig {
                field: "work_hours",
                reason: format!(
                    "[{}, {}) is not a window inside the day",
                    config.work_start_hour, config.work_end_hour
                ),
            });
        }

        if config.header_tick_ms == 0 {
            return Err(ClockError::InvalidConfig {
                field: "header_tick_ms",
                reason: "period must be positive".into(),
            });
        }

        Ok(Self {
            storage_key,
            max_friends: config.max_friends,
            work_hours: WorkHours {
                start: config.work_start_hour,
                end: config.work_end_hour,
            },
            header_tick_ms: config.header_tick_ms,
            palette: Palette::from_specs(&config.palette)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_validates_to_default_settings() {
        let settings = Settings::try_from(ClockConfig::default()).unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn partial_json_uses_defaults() {
        let config: ClockConfig = serde_json::from_str(r#"{"max_friends": 4}"#).unwrap();
        assert_eq!(config.max_friends, 4);
        assert_eq!(config.storage_key, STORAGE_KEY);
        assert_eq!(config.work_start_hour, 9);
    }

    #[test]
    fn rejects_inverted_work_window() {
        let config = ClockConfig {
            work_start_hour: 17,
            work_end_hour: 9,
            ..ClockConfig::default()
        };
        assert!(matches!(
            Settings::try_from(config),
            Err(ClockError::InvalidConfig { field: "work_hours", .. })
        ));
    }

    #[test]
    fn rejects_bad_palette_color() {
        let config = ClockConfig {
            palette: vec![
                AnchorSpec { hour: 0.0, color: "#000000".into() },
                AnchorSpec { hour: 12.0, color: "blue".into() },
            ],
            ..ClockConfig::default()
        };
        assert_eq!(
            Settings::try_from(config),
            Err(ClockError::InvalidColor("blue".into()))
        );
    }

    #[test]
    fn rejects_bad_storage_key() {
        let config = ClockConfig {
            storage_key: "  ".into(),
            ..ClockConfig::default()
        };
        assert!(matches!(Settings::try_from(config), Err(ClockError::Store(_))));
    }

    #[test]
    fn work_hours_are_half_open() {
        let w = Settings::default().work_hours;
        assert!(!w.contains(8));
        assert!(w.contains(9));
        assert!(w.contains(16));
        assert!(!w.contains(17));
    }
}
