//! Saved friends, the focus selection and the work-mode flag.
//!
//! [`FriendRegistry`] owns the persisted [`AppState`] and is the only place
//! that mutates it, so the two invariants hold after every operation:
//! the friend list is never empty and `selected_id` names one of its members.

use std::{collections::HashSet, fmt};

use serde::{Deserialize, Serialize};

use crate::{
    capabilities::kv::decode_state, catalog::CityData, ClockError, ClockResult, UnixTimeMs,
    MAX_FRIENDS,
};

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct FriendId(pub String);

impl FriendId {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FriendId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Friend {
    pub id: FriendId,
    /// User-editable label.
    pub name: String,
    /// Catalog name the friend was created from; never changes.
    pub city_name: String,
    pub timezone: String,
}

impl Friend {
    fn seed() -> Self {
        Self {
            id: FriendId::new("1"),
            name: "Taiwan".into(),
            city_name: "Taiwan".into(),
            timezone: "Asia/Taipei".into(),
        }
    }
}

/// The persisted document.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AppState {
    #[serde(default)]
    pub friends: Vec<Friend>,
    #[serde(default)]
    pub selected_id: FriendId,
    #[serde(default)]
    pub show_work_mode: bool,
}

impl AppState {
    /// The document a fresh install starts from.
    #[must_use]
    pub fn seeded() -> Self {
        let friend = Friend::seed();
        Self {
            selected_id: friend.id.clone(),
            friends: vec![friend],
            show_work_mode: false,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct FriendRegistry {
    state: AppState,
    max_friends: usize,
}

impl FriendRegistry {
    /// Registry holding only the default friend.
    #[must_use]
    pub fn new(max_friends: usize) -> Self {
        Self {
            state: AppState::seeded(),
            max_friends,
        }
    }

    /// Rebuilds the registry from the stored document. A missing or corrupt
    /// document yields the default friend.
    #[must_use]
    pub fn restore(document: Option<&[u8]>, max_friends: usize) -> Self {
        let Some(bytes) = document else {
            tracing::info!("no saved friends, seeding default");
            return Self::new(max_friends);
        };

        match decode_state(bytes) {
            Ok(state) => Self::from_state(state, max_friends),
            Err(e) => {
                tracing::warn!(error = %e, "saved friends unreadable, seeding default");
                Self::new(max_friends)
            }
        }
    }

    /// Adopts a decoded document, repairing anything that breaks the
    /// registry invariants.
    #[must_use]
    pub fn from_state(mut state: AppState, max_friends: usize) -> Self {
        let mut seen = HashSet::new();
        let before = state.friends.len();
        state.friends.retain(|f| seen.insert(f.id.clone()));
        if state.friends.len() != before {
            tracing::warn!(dropped = before - state.friends.len(), "dropped duplicate friend ids");
        }

        // A lowered cap only blocks new friends; the hard limit still applies.
        let keep = max_friends.max(MAX_FRIENDS);
        if state.friends.len() > keep {
            tracing::warn!(
                count = state.friends.len(),
                max = keep,
                "saved friends exceed the limit, truncating"
            );
            state.friends.truncate(keep);
        }

        if state.friends.is_empty() {
            tracing::warn!("saved friend list is empty, seeding default");
            let show_work_mode = state.show_work_mode;
            state = AppState::seeded();
            state.show_work_mode = show_work_mode;
        }

        if !state.friends.iter().any(|f| f.id == state.selected_id) {
            tracing::debug!(selected = %state.selected_id, "selection dangling, focusing first friend");
            state.selected_id = state.friends[0].id.clone();
        }

        Self { state, max_friends }
    }

    #[must_use]
    pub fn state(&self) -> &AppState {
        &self.state
    }

    #[must_use]
    pub fn friends(&self) -> &[Friend] {
        &self.state.friends
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.state.friends.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.state.friends.is_empty()
    }

    #[must_use]
    pub fn max_friends(&self) -> usize {
        self.max_friends
    }

    /// Lowering the limit never deletes friends; it only blocks new ones.
    pub fn set_max_friends(&mut self, max_friends: usize) {
        self.max_friends = max_friends;
    }

    #[must_use]
    pub fn selected_id(&self) -> &FriendId {
        &self.state.selected_id
    }

    /// The focus friend.
    #[must_use]
    pub fn selected(&self) -> &Friend {
        self.state
            .friends
            .iter()
            .find(|f| f.id == self.state.selected_id)
            .unwrap_or(&self.state.friends[0])
    }

    #[must_use]
    pub fn get(&self, id: &FriendId) -> Option<&Friend> {
        self.state.friends.iter().find(|f| &f.id == id)
    }

    #[must_use]
    pub fn show_work_mode(&self) -> bool {
        self.state.show_work_mode
    }

    pub fn toggle_work_mode(&mut self) -> bool {
        self.state.show_work_mode = !self.state.show_work_mode;
        self.state.show_work_mode
    }

    /// Adds a friend for `city` and focuses it. The id is the creation time.
    pub fn add(&mut self, city: &CityData, now: UnixTimeMs) -> ClockResult<&Friend> {
        if self.state.friends.len() >= self.max_friends {
            return Err(ClockError::CapacityReached {
                max: self.max_friends,
            });
        }
        city.zone_id()?;

        let mut stamp = now.as_millis();
        while self.state.friends.iter().any(|f| f.id.0 == stamp.to_string()) {
            stamp += 1;
        }
        let friend = Friend {
            id: FriendId::new(stamp.to_string()),
            name: city.name.to_string(),
            city_name: city.name.to_string(),
            timezone: city.zone.to_string(),
        };

        tracing::debug!(id = %friend.id, city = city.name, "friend added");
        self.state.selected_id = friend.id.clone();
        self.state.friends.push(friend);
        Ok(&self.state.friends[self.state.friends.len() - 1])
    }

    /// Renames a friend; a blank name restores the city name.
    pub fn rename(&mut self, id: &FriendId, name: &str) -> ClockResult<()> {
        let friend = self
            .state
            .friends
            .iter_mut()
            .find(|f| &f.id == id)
            .ok_or_else(|| ClockError::UnknownFriend(id.to_string()))?;

        friend.name = if name.trim().is_empty() {
            friend.city_name.clone()
        } else {
            name.to_string()
        };
        Ok(())
    }

    /// Removes a friend. Refused for the last one; removing the focus friend
    /// moves the focus to the first remaining friend.
    pub fn remove(&mut self, id: &FriendId) -> ClockResult<Friend> {
        let index = self
            .state
            .friends
            .iter()
            .position(|f| &f.id == id)
            .ok_or_else(|| ClockError::UnknownFriend(id.to_string()))?;

        if self.state.friends.len() <= 1 {
            return Err(ClockError::LastFriend);
        }

        let removed = self.state.friends.remove(index);
        if self.state.selected_id == removed.id {
            self.state.selected_id = self.state.friends[0].id.clone();
        }
        Ok(removed)
    }

    pub fn select(&mut self, id: &FriendId) -> ClockResult<()> {
        if self.get(id).is_none() {
            return Err(ClockError::UnknownFriend(id.to_string()));
        }
        self.state.selected_id = id.clone();
        Ok(())
    }
}
