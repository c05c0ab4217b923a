use crate::{
    config::Settings,
    gesture::DragTracker,
    registry::{FriendId, FriendRegistry},
    Notice, UnixTimeMs,
};

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Dialog {
    #[default]
    Closed,
    AddCity,
    EditFriend {
        id: FriendId,
    },
}

/// Everything the core knows. Only `registry` is persisted; the manual
/// offset, drag and dialog state live for the session.
#[derive(Clone, Debug, PartialEq)]
pub struct Model {
    pub settings: Settings,
    pub registry: FriendRegistry,

    /// Time-travel delta in minutes, added to the real clock.
    pub manual_offset_minutes: i64,
    /// Latest wall-clock reading reported by the shell.
    pub now: UnixTimeMs,
    pub drag: DragTracker,

    pub dialog: Dialog,
    pub notice: Option<Notice>,

    /// Set once the stored document has been read; nothing is written before
    /// that so a slow load cannot clobber saved friends with the default.
    pub loaded: bool,
    pub tickers_running: bool,
}

impl Default for Model {
    fn default() -> Self {
        Self::new(Settings::default())
    }
}

impl Model {
    #[must_use]
    pub fn new(settings: Settings) -> Self {
        Self {
            registry: FriendRegistry::new(settings.max_friends),
            settings,
            manual_offset_minutes: 0,
            now: UnixTimeMs::default(),
            drag: DragTracker::default(),
            dialog: Dialog::Closed,
            notice: None,
            loaded: false,
            tickers_running: false,
        }
    }

    /// The instant the clock is showing: now plus the time-travel offset.
    #[must_use]
    pub fn travel_time(&self) -> UnixTimeMs {
        self.now.add_minutes(self.manual_offset_minutes)
    }

    #[must_use]
    pub fn is_time_travelling(&self) -> bool {
        self.manual_offset_minutes != 0
    }

    pub fn show_notice(&mut self, notice: Notice) {
        self.notice = Some(notice);
    }

    pub fn clear_notice(&mut self) {
        self.notice = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_model_is_at_present() {
        let model = Model::default();
        assert!(!model.is_time_travelling());
        assert!(!model.loaded);
        assert_eq!(model.registry.len(), 1);
        assert_eq!(model.dialog, Dialog::Closed);
    }

    #[test]
    fn travel_time_adds_offset() {
        let mut model = Model::default();
        model.now = UnixTimeMs(1_000);
        model.manual_offset_minutes = 2;
        assert_eq!(model.travel_time(), UnixTimeMs(121_000));
        assert!(model.is_time_travelling());
    }
}
