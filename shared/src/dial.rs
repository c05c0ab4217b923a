//! Per-frame draw list for the clock face.
//!
//! [`render`] is pure: the same state and timestamp always give the same
//! frame. The shell replays the frame onto its 500×500 surface every display
//! refresh; the pulse of the work-hours glow is the only thing that moves
//! between frames when no state changes.

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use crate::{
    config::Settings,
    gesture::{point_at, Point},
    registry::{AppState, Friend},
    zoned_time::{day_badge, day_offset, project, project_named, ZoneId, ZonedTime},
    UnixTimeMs,
};

pub const SURFACE_SIZE: f64 = 500.0;
pub const CENTER: Point = Point {
    x: SURFACE_SIZE / 2.0,
    y: SURFACE_SIZE / 2.0,
};
pub const NUMERAL_RADIUS: f64 = 220.0;
pub const LABEL_RADIUS: f64 = 200.0;
pub const HAND_LENGTH: f64 = 165.0;

pub const SELECTED_COLOR: &str = "#F54927";
pub const MORNING_COLOR: &str = "white";
pub const AFTERNOON_COLOR: &str = "rgba(255,255,255,0.4)";
pub const NUMERAL_COLOR: &str = "rgba(255,255,255,0.2)";
pub const NUMERAL_FONT: &str = "24px Futura, sans-serif";
pub const LABEL_FONT: &str = "14px sans-serif";
pub const SELECTED_LABEL_FONT: &str = "bold 16px sans-serif";

const SELECTED_WIDTH: f64 = 5.0;
const HAND_WIDTH: f64 = 2.5;
const GLOW_BASE: f64 = 5.0;
const GLOW_RANGE: f64 = 25.0;
const PULSE_PERIOD_DIVISOR: f64 = 500.0;
const WORK_BADGE: &str = "💼 ";

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Numeral {
    pub text: String,
    pub position: Point,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct HandLabel {
    pub text: String,
    pub position: Point,
    pub color: String,
    pub font: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Hand {
    pub friend_id: String,
    /// Radians, 0 at 3 o'clock, clockwise.
    pub angle: f64,
    pub tip: Point,
    pub color: String,
    pub width: f64,
    /// Shadow blur radius while the friend is inside work hours.
    pub glow: Option<f64>,
    pub label: HandLabel,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct DialFrame {
    pub size: f64,
    pub numeral_font: String,
    pub numeral_color: String,
    pub numerals: Vec<Numeral>,
    pub hands: Vec<Hand>,
}

/// Glow intensity in `[0, 1]`, a sine of wall-clock time.
#[must_use]
pub fn pulse(now: UnixTimeMs) -> f64 {
    #[allow(clippy::cast_precision_loss)]
    let t = now.as_millis() as f64 / PULSE_PERIOD_DIVISOR;
    (t.sin() + 1.0) / 2.0
}

/// Hour-hand angle on a 12-hour face: 12 o'clock points up.
#[must_use]
pub fn hand_angle(t: &ZonedTime) -> f64 {
    (f64::from(t.hour % 12) + f64::from(t.minute) / 60.0) * PI / 6.0 - PI / 2.0
}

fn numerals() -> Vec<Numeral> {
    (1..=12u32)
        .map(|i| Numeral {
            text: i.to_string(),
            position: point_at(f64::from(i) * PI / 6.0 - PI / 2.0, NUMERAL_RADIUS),
        })
        .collect()
}

fn focus_time(state: &AppState, travel: UnixTimeMs) -> Option<ZonedTime> {
    let focus = state
        .friends
        .iter()
        .find(|f| f.id == state.selected_id)
        .or_else(|| state.friends.first());

    let zone = focus
        .and_then(|f| ZoneId::parse(&f.timezone).ok())
        .or_else(|| ZoneId::parse("UTC").ok())?;
    project(travel, zone).ok()
}

fn hand(
    friend: &Friend,
    local: &ZonedTime,
    focus: Option<&ZonedTime>,
    selected: bool,
    show_work_mode: bool,
    settings: &Settings,
    pulse: f64,
) -> Hand {
    let angle = hand_angle(local);
    let working = show_work_mode && settings.work_hours.contains(local.hour);

    let color = if selected {
        SELECTED_COLOR
    } else if local.hour < 12 {
        MORNING_COLOR
    } else {
        AFTERNOON_COLOR
    };

    let mut text = String::new();
    if working {
        text.push_str(WORK_BADGE);
    }
    text.push_str(&friend.name);
    if let Some(badge) = focus.and_then(|f| day_badge(day_offset(local, f))) {
        text.push(' ');
        text.push_str(&badge);
    }

    Hand {
        friend_id: friend.id.to_string(),
        angle,
        tip: point_at(angle, HAND_LENGTH),
        color: color.to_string(),
        width: if selected { SELECTED_WIDTH } else { HAND_WIDTH },
        glow: working.then(|| GLOW_BASE + pulse * GLOW_RANGE),
        label: HandLabel {
            text,
            position: point_at(angle, LABEL_RADIUS),
            color: if selected { MORNING_COLOR } else { color }.to_string(),
            font: if selected { SELECTED_LABEL_FONT } else { LABEL_FONT }.to_string(),
        },
    }
}

/// Builds the frame for `now` shifted by the manual time-travel offset.
/// Friends whose zone cannot be projected are left off the face.
#[must_use]
pub fn render(
    state: &AppState,
    manual_offset_minutes: i64,
    now: UnixTimeMs,
    settings: &Settings,
) -> DialFrame {
    let travel = now.add_minutes(manual_offset_minutes);
    let focus = focus_time(state, travel);
    let pulse = pulse(now);

    let hands = state
        .friends
        .iter()
        .filter_map(|friend| match project_named(travel, &friend.timezone) {
            Ok(local) => Some(hand(
                friend,
                &local,
                focus.as_ref(),
                friend.id == state.selected_id,
                state.show_work_mode,
                settings,
                pulse,
            )),
            Err(e) => {
                tracing::debug!(friend = %friend.id, error = %e, "hand skipped");
                None
            }
        })
        .collect();

    DialFrame {
        size: SURFACE_SIZE,
        numeral_font: NUMERAL_FONT.to_string(),
        numeral_color: NUMERAL_COLOR.to_string(),
        numerals: numerals(),
        hands,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::{FriendId, FriendRegistry};

    // 2024-01-01T12:00:00Z
    const NOON_UTC: UnixTimeMs = UnixTimeMs(1_704_110_400_000);

    fn friend(id: &str, name: &str, zone: &str) -> Friend {
        Friend {
            id: FriendId::new(id),
            name: name.into(),
            city_name: name.into(),
            timezone: zone.into(),
        }
    }

    fn state(friends: Vec<Friend>, selected: &str, work: bool) -> AppState {
        AppState {
            friends,
            selected_id: FriendId::new(selected),
            show_work_mode: work,
        }
    }

    #[test]
    fn twelve_numerals_with_twelve_on_top() {
        let frame = render(FriendRegistry::new(8).state(), 0, NOON_UTC, &Settings::default());
        assert_eq!(frame.numerals.len(), 12);
        let twelve = &frame.numerals[11];
        assert_eq!(twelve.text, "12");
        assert!((twelve.position.x - 250.0).abs() < 1e-9);
        assert!((twelve.position.y - 30.0).abs() < 1e-9);
    }

    #[test]
    fn selected_hand_is_highlighted() {
        let s = state(
            vec![friend("a", "Taipei", "Asia/Taipei"), friend("b", "London", "Europe/London")],
            "a",
            false,
        );
        let frame = render(&s, 0, NOON_UTC, &Settings::default());
        assert_eq!(frame.hands.len(), 2);

        let taipei = &frame.hands[0];
        assert_eq!(taipei.color, SELECTED_COLOR);
        assert!((taipei.width - 5.0).abs() < f64::EPSILON);
        assert_eq!(taipei.label.font, SELECTED_LABEL_FONT);
        assert_eq!(taipei.label.color, "white");
        // 20:00 → 8 o'clock
        assert!((taipei.angle - (8.0 * PI / 6.0 - PI / 2.0)).abs() < 1e-12);

        let london = &frame.hands[1];
        // 12:00 in London counts as afternoon
        assert_eq!(london.color, AFTERNOON_COLOR);
        assert!((london.width - 2.5).abs() < f64::EPSILON);
    }

    #[test]
    fn day_badges_relative_to_focus() {
        // 14:00Z: Sydney is on 2 January, Los Angeles on 1 January.
        let at = UnixTimeMs(NOON_UTC.0 + 2 * 3_600_000);
        let s = state(
            vec![
                friend("la", "LA", "America/Los_Angeles"),
                friend("syd", "Syd", "Australia/Sydney"),
            ],
            "la",
            false,
        );
        let frame = render(&s, 0, at, &Settings::default());
        assert_eq!(frame.hands[0].label.text, "LA");
        assert_eq!(frame.hands[1].label.text, "Syd +1D");

        let s = AppState {
            selected_id: FriendId::new("syd"),
            ..s
        };
        let frame = render(&s, 0, at, &Settings::default());
        assert_eq!(frame.hands[0].label.text, "LA -1D");
    }

    #[test]
    fn work_mode_glows_inside_work_hours() {
        // 12:00Z: London 12:00 (working), Taipei 20:00 (not)
        let s = state(
            vec![friend("a", "Taipei", "Asia/Taipei"), friend("b", "London", "Europe/London")],
            "a",
            true,
        );
        let frame = render(&s, 0, NOON_UTC, &Settings::default());
        assert!(frame.hands[0].glow.is_none());
        let glow = frame.hands[1].glow.unwrap();
        assert!((5.0..=30.0).contains(&glow));
        assert!(frame.hands[1].label.text.starts_with("💼 "));
    }

    #[test]
    fn no_glow_when_work_mode_off() {
        let s = state(vec![friend("b", "London", "Europe/London")], "b", false);
        let frame = render(&s, 0, NOON_UTC, &Settings::default());
        assert!(frame.hands[0].glow.is_none());
        assert_eq!(frame.hands[0].label.text, "London");
    }

    #[test]
    fn manual_offset_moves_hands() {
        let s = state(vec![friend("u", "UTC", "UTC")], "u", false);
        let frame = render(&s, 90, NOON_UTC, &Settings::default());
        // 13:30 → half past one
        let expected = 1.5 * PI / 6.0 - PI / 2.0;
        assert!((frame.hands[0].angle - expected).abs() < 1e-12);
    }

    #[test]
    fn unknown_zone_drops_only_that_hand() {
        let s = state(
            vec![friend("ok", "UTC", "UTC"), friend("bad", "Nowhere", "Not/AZone")],
            "bad",
            false,
        );
        let frame = render(&s, 0, NOON_UTC, &Settings::default());
        assert_eq!(frame.hands.len(), 1);
        assert_eq!(frame.hands[0].friend_id, "ok");
    }

    #[test]
    fn pulse_stays_in_unit_range() {
        for ms in [0, 785, 1_570, 123_456_789] {
            let p = pulse(UnixTimeMs(ms));
            assert!((0.0..=1.0).contains(&p));
        }
    }
}
