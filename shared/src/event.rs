use serde::{Deserialize, Serialize};

use crate::{
    capabilities::TickOutput, config::ClockConfig, gesture::Point, registry::FriendId,
};

// --- Event enum: capability responses are skipped so only the core emits them ---

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub enum Event {
    // Lifecycle
    AppStarted {
        now_ms: i64,
    },
    /// The view owning the clock went away; periodic work must stop.
    ViewDetached,
    Configure(Box<ClockConfig>),

    // Friends
    SelectFriend {
        id: FriendId,
    },
    OpenAddCity,
    AddCity {
        name: String,
    },
    /// Long-press or right-click on a friend chip.
    EditFriendRequested {
        id: FriendId,
    },
    RenameFriend {
        id: FriendId,
        name: String,
    },
    DeleteFriend {
        id: FriendId,
    },
    CloseDialog,
    ToggleWorkMode,

    // Time travel
    ResetToNow,
    DragStarted {
        at: Point,
    },
    DragMoved {
        at: Point,
    },
    DragEnded,

    DismissNotice,

    // Capability responses
    #[serde(skip)]
    StateLoaded(Result<Option<Vec<u8>>, String>),
    #[serde(skip)]
    StateSaved(Result<(), String>),
    #[serde(skip)]
    Tick(TickOutput),
}

impl Event {
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::AppStarted { .. } => "app_started",
            Self::ViewDetached => "view_detached",
            Self::Configure(_) => "configure",
            Self::SelectFriend { .. } => "select_friend",
            Self::OpenAddCity => "open_add_city",
            Self::AddCity { .. } => "add_city",
            Self::EditFriendRequested { .. } => "edit_friend_requested",
            Self::RenameFriend { .. } => "rename_friend",
            Self::DeleteFriend { .. } => "delete_friend",
            Self::CloseDialog => "close_dialog",
            Self::ToggleWorkMode => "toggle_work_mode",
            Self::ResetToNow => "reset_to_now",
            Self::DragStarted { .. } => "drag_started",
            Self::DragMoved { .. } => "drag_moved",
            Self::DragEnded => "drag_ended",
            Self::DismissNotice => "dismiss_notice",
            Self::StateLoaded(_) => "state_loaded",
            Self::StateSaved(_) => "state_saved",
            Self::Tick(_) => "tick",
        }
    }

    /// High-frequency events that would flood the log.
    #[must_use]
    pub fn is_periodic(&self) -> bool {
        matches!(self, Self::Tick(_) | Self::DragMoved { .. })
    }
}
