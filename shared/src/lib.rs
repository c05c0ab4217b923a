// lib.rs - Friends world clock shared core

#![forbid(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::too_many_lines)]

pub mod app;
pub mod capabilities;
pub mod catalog;
pub mod config;
pub mod dial;
pub mod event;
pub mod gesture;
pub mod model;
pub mod palette;
pub mod registry;
pub mod zoned_time;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use app::App;
pub use capabilities::{Capabilities, Effect};
pub use catalog::CityData;
pub use config::{ClockConfig, Settings};
pub use crux_core::App as CruxApp;
pub use event::Event;
pub use model::{Dialog, Model};
pub use palette::{Palette, Rgb};
pub use registry::{AppState, Friend, FriendId, FriendRegistry};
pub use zoned_time::{ZoneId, ZonedTime};

pub const STORAGE_KEY: &str = "global_friends_clock_v2";
pub const MAX_FRIENDS: usize = 8;
pub const WORK_DAY_START_HOUR: u32 = 9;
pub const WORK_DAY_END_HOUR: u32 = 17;
pub const HEADER_TICK_MS: u32 = 100;
pub const NOTICE_DURATION_MS: u64 = 3_000;
pub const MS_PER_MINUTE: i64 = 60_000;
pub const MS_PER_DAY: f64 = 86_400_000.0;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ClockError {
    #[error("unrecognized timezone identifier: {0}")]
    InvalidTimezone(String),

    #[error("instant {0}ms is outside the representable range")]
    InstantOutOfRange(i64),

    #[error("invalid color '{0}', expected #rrggbb")]
    InvalidColor(String),

    #[error("invalid palette: {reason}")]
    InvalidPalette { reason: String },

    #[error("friend list is full (maximum {max})")]
    CapacityReached { max: usize },

    #[error("the last remaining friend cannot be removed")]
    LastFriend,

    #[error("no friend with id {0}")]
    UnknownFriend(String),

    #[error("city '{0}' is not in the catalog")]
    UnknownCity(String),

    #[error("invalid configuration for {field}: {reason}")]
    InvalidConfig { field: &'static str, reason: String },

    #[error("storage error: {0}")]
    Store(#[from] capabilities::StoreError),
}

impl ClockError {
    /// Text shown to the user when an action is rejected.
    #[must_use]
    pub fn user_facing_message(&self) -> String {
        match self {
            Self::CapacityReached { max } => format!("Maximum of {max} friends allowed."),
            Self::LastFriend => "At least one friend has to stay on the clock.".into(),
            Self::UnknownFriend(_) => "That friend no longer exists.".into(),
            Self::UnknownCity(name) => format!("{name} is not available."),
            Self::InvalidTimezone(zone) => format!("The time zone {zone} is not supported."),
            Self::InstantOutOfRange(_)
            | Self::InvalidColor(_)
            | Self::InvalidPalette { .. }
            | Self::InvalidConfig { .. }
            | Self::Store(_) => "Something went wrong. Please try again.".into(),
        }
    }
}

pub type ClockResult<T> = Result<T, ClockError>;

/// Explicit timestamp unit. Signed so time travel can go before the epoch.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct UnixTimeMs(pub i64);

impl UnixTimeMs {
    #[must_use]
    pub fn add_minutes(self, minutes: i64) -> Self {
        Self(self.0.saturating_add(minutes.saturating_mul(MS_PER_MINUTE)))
    }

    #[must_use]
    pub fn as_millis(self) -> i64 {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeKind {
    Warning,
}

/// Transient user-facing message, the core's equivalent of an alert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub message: String,
    pub kind: NoticeKind,
    pub duration_ms: u64,
}

impl Notice {
    #[must_use]
    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            kind: NoticeKind::Warning,
            duration_ms: NOTICE_DURATION_MS,
        }
    }
}

impl From<&ClockError> for Notice {
    fn from(e: &ClockError) -> Self {
        Self::warning(e.user_facing_message())
    }
}
