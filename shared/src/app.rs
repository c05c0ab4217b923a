//! The Crux app: event handling and the view handed to the shell.

use serde::{Deserialize, Serialize};

use crate::{
    capabilities::{
        kv::{decode_state, encode_state},
        Capabilities, TickKind,
    },
    catalog::{self, CityOption},
    config::Settings,
    dial::{self, DialFrame},
    event::Event,
    gesture,
    model::{Dialog, Model},
    registry::FriendRegistry,
    zoned_time::project_named,
    ClockError, Notice, UnixTimeMs,
};

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct FriendChip {
    pub id: String,
    pub name: String,
    pub selected: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DialogView {
    Closed,
    AddCity {
        cities: Vec<CityOption>,
        can_add: bool,
    },
    EditFriend {
        id: String,
        title: String,
        name: String,
        can_delete: bool,
    },
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ViewModel {
    /// Focus friend's `HH:MM` at the travelled time.
    pub header_time: String,
    pub header_name: String,
    /// Page background, `rgb(r, g, b)`.
    pub background: String,
    pub friends: Vec<FriendChip>,
    pub show_work_mode: bool,
    pub work_hours_label: String,
    pub is_time_travelling: bool,
    pub manual_offset_minutes: i64,
    /// Controls fade out while the dial is being spun.
    pub is_dragging: bool,
    pub dialog: DialogView,
    pub notice: Option<Notice>,
    pub dial: DialFrame,
}

const UNKNOWN_TIME: &str = "--:--";

#[derive(Default)]
pub struct App;

impl App {
    /// Writes the registry document. Skipped until the initial load is done.
    fn persist(model: &Model, caps: &Capabilities) {
        if !model.loaded {
            tracing::debug!("state not loaded yet, skipping save");
            return;
        }

        let data = match encode_state(model.registry.state()) {
            Ok(data) => data,
            Err(e) => {
                tracing::warn!(error = %e, "could not encode friends");
                return;
            }
        };

        caps.key_value.set(
            model.settings.storage_key.as_str().to_string(),
            data,
            |result| Event::StateSaved(result.map(|_| ()).map_err(|e| e.to_string())),
        );
    }

    fn load(model: &Model, caps: &Capabilities) {
        caps.key_value
            .get(model.settings.storage_key.as_str().to_string(), |result| {
                Event::StateLoaded(result.map_err(|e| e.to_string()))
            });
    }

    fn start_tickers(model: &mut Model, caps: &Capabilities) {
        caps.ticker.start(
            TickKind::Header,
            Some(model.settings.header_tick_ms),
            Event::Tick,
        );
        caps.ticker.start(TickKind::Frame, None, Event::Tick);
        model.tickers_running = true;
    }

    fn stop_tickers(model: &mut Model, caps: &Capabilities) {
        caps.ticker.stop(TickKind::Header);
        caps.ticker.stop(TickKind::Frame);
        model.tickers_running = false;
    }

    fn restore(model: &mut Model, stored: Option<&[u8]>, caps: &Capabilities) {
        model.registry = FriendRegistry::restore(stored, model.settings.max_friends);
        model.loaded = true;

        for friend in model.registry.friends() {
            if let Err(e) = crate::ZoneId::parse(&friend.timezone) {
                tracing::warn!(friend = %friend.id, error = %e, "friend will not be drawn");
            }
        }

        // Write back only when restoring changed the document.
        let unchanged = stored
            .and_then(|bytes| decode_state(bytes).ok())
            .is_some_and(|state| &state == model.registry.state());
        if !unchanged {
            Self::persist(model, caps);
        }
        tracing::info!(friends = model.registry.len(), "friends loaded");
    }

    fn apply_settings(model: &mut Model, settings: Settings, caps: &Capabilities) {
        let period_changed = settings.header_tick_ms != model.settings.header_tick_ms;
        let key_changed = settings.storage_key != model.settings.storage_key;

        model.registry.set_max_friends(settings.max_friends);
        model.settings = settings;

        if period_changed && model.tickers_running {
            caps.ticker.stop(TickKind::Header);
            caps.ticker.start(
                TickKind::Header,
                Some(model.settings.header_tick_ms),
                Event::Tick,
            );
        }
        if key_changed && model.loaded {
            Self::persist(model, caps);
        }
    }

    /// Surfaces a rejected action to the user.
    fn reject(model: &mut Model, error: &ClockError) {
        tracing::warn!(error = %error, "action rejected");
        model.show_notice(Notice::from(error));
    }

    fn header(model: &Model) -> (String, String, String) {
        let focus = model.registry.selected();
        let palette = &model.settings.palette;

        match project_named(model.travel_time(), &focus.timezone) {
            Ok(local) => (
                local.clock_label(),
                focus.name.clone(),
                palette.interpolate(local.hour_fraction()).to_string(),
            ),
            Err(_) => (
                UNKNOWN_TIME.to_string(),
                focus.name.clone(),
                palette.interpolate(0.0).to_string(),
            ),
        }
    }

    fn dialog_view(model: &Model) -> DialogView {
        match &model.dialog {
            Dialog::Closed => DialogView::Closed,
            Dialog::AddCity => DialogView::AddCity {
                cities: catalog::options(),
                can_add: model.registry.len() < model.registry.max_friends(),
            },
            Dialog::EditFriend { id } => match model.registry.get(id) {
                Some(friend) => DialogView::EditFriend {
                    id: friend.id.to_string(),
                    title: format!("Edit {}", friend.city_name),
                    name: friend.name.clone(),
                    can_delete: model.registry.len() > 1,
                },
                None => DialogView::Closed,
            },
        }
    }
}

impl crux_core::App for App {
    type Event = Event;
    type Model = Model;
    type ViewModel = ViewModel;
    type Capabilities = Capabilities;

    fn update(&self, event: Event, model: &mut Model, caps: &Capabilities) {
        if !event.is_periodic() {
            tracing::debug!(event = event.name(), "update");
        }

        match event {
            Event::AppStarted { now_ms } => {
                model.now = UnixTimeMs(now_ms);
                Self::load(model, caps);
                if !model.tickers_running {
                    Self::start_tickers(model, caps);
                }
                tracing::info!("clock started");
                caps.render.render();
            }

            Event::ViewDetached => {
                if model.tickers_running {
                    Self::stop_tickers(model, caps);
                }
                model.drag.end();
                tracing::info!("clock detached");
            }

            Event::Configure(config) => match Settings::try_from(*config) {
                Ok(settings) => {
                    Self::apply_settings(model, settings, caps);
                    caps.render.render();
                }
                Err(e) => {
                    tracing::warn!(error = %e, "configuration rejected, keeping previous settings");
                }
            },

            Event::StateLoaded(Ok(stored)) => {
                Self::restore(model, stored.as_deref(), caps);
                caps.render.render();
            }

            Event::StateLoaded(Err(e)) => {
                tracing::warn!(error = %e, "reading saved friends failed");
                Self::restore(model, None, caps);
                caps.render.render();
            }

            Event::StateSaved(Ok(())) => {
                tracing::trace!("friends saved");
            }

            Event::StateSaved(Err(e)) => {
                tracing::warn!(error = %e, "saving friends failed");
            }

            Event::Tick(tick) => {
                model.now = UnixTimeMs(tick.now_ms);
                caps.render.render();
            }

            Event::SelectFriend { id } => match model.registry.select(&id) {
                Ok(()) => {
                    Self::persist(model, caps);
                    caps.render.render();
                }
                Err(e) => tracing::warn!(error = %e, "select ignored"),
            },

            Event::OpenAddCity => {
                model.dialog = Dialog::AddCity;
                caps.render.render();
            }

            Event::AddCity { name } => {
                let now = model.now;
                let added = catalog::find(&name)
                    .and_then(|city| model.registry.add(city, now).map(|_| ()));
                match added {
                    Ok(()) => {
                        model.dialog = Dialog::Closed;
                        Self::persist(model, caps);
                    }
                    Err(e) => Self::reject(model, &e),
                }
                caps.render.render();
            }

            Event::EditFriendRequested { id } => {
                if model.registry.get(&id).is_some() {
                    model.dialog = Dialog::EditFriend { id };
                    caps.render.render();
                }
            }

            Event::RenameFriend { id, name } => {
                match model.registry.rename(&id, &name) {
                    Ok(()) => Self::persist(model, caps),
                    Err(e) => tracing::warn!(error = %e, "rename ignored"),
                }
                model.dialog = Dialog::Closed;
                caps.render.render();
            }

            Event::DeleteFriend { id } => {
                match model.registry.remove(&id) {
                    Ok(removed) => {
                        tracing::debug!(id = %removed.id, "friend removed");
                        Self::persist(model, caps);
                    }
                    Err(ClockError::LastFriend) => tracing::debug!("refusing to remove last friend"),
                    Err(e) => tracing::warn!(error = %e, "delete ignored"),
                }
                model.dialog = Dialog::Closed;
                caps.render.render();
            }

            Event::CloseDialog => {
                model.dialog = Dialog::Closed;
                caps.render.render();
            }

            Event::ToggleWorkMode => {
                model.registry.toggle_work_mode();
                Self::persist(model, caps);
                caps.render.render();
            }

            Event::ResetToNow => {
                model.manual_offset_minutes = 0;
                caps.render.render();
            }

            Event::DragStarted { at } => {
                if gesture::on_surface(at) {
                    model.drag.start(at);
                    caps.render.render();
                }
            }

            Event::DragMoved { at } => {
                let delta = model.drag.move_to(at);
                if delta != 0 {
                    model.manual_offset_minutes = model.manual_offset_minutes.saturating_add(delta);
                    caps.render.render();
                }
            }

            Event::DragEnded => {
                model.drag.end();
                caps.render.render();
            }

            Event::DismissNotice => {
                model.clear_notice();
                caps.render.render();
            }
        }
    }

    fn view(&self, model: &Model) -> ViewModel {
        let (header_time, header_name, background) = Self::header(model);
        let selected = model.registry.selected_id();
        let work = model.settings.work_hours;

        ViewModel {
            header_time,
            header_name,
            background,
            friends: model
                .registry
                .friends()
                .iter()
                .map(|f| FriendChip {
                    id: f.id.to_string(),
                    name: f.name.clone(),
                    selected: &f.id == selected,
                })
                .collect(),
            show_work_mode: model.registry.show_work_mode(),
            work_hours_label: format!("{}:00-{}:00", work.start, work.end),
            is_time_travelling: model.is_time_travelling(),
            manual_offset_minutes: model.manual_offset_minutes,
            is_dragging: model.drag.is_dragging(),
            dialog: Self::dialog_view(model),
            notice: model.notice.clone(),
            dial: dial::render(
                model.registry.state(),
                model.manual_offset_minutes,
                model.now,
                &model.settings,
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{registry::FriendId, CruxApp};

    // 2024-01-01T12:00:00Z
    const NOON_UTC: UnixTimeMs = UnixTimeMs(1_704_110_400_000);

    fn model_at(now: UnixTimeMs) -> Model {
        let mut model = Model::default();
        model.now = now;
        model
    }

    #[test]
    fn header_shows_focus_time_and_name() {
        let view = App.view(&model_at(NOON_UTC));
        assert_eq!(view.header_time, "20:00");
        assert_eq!(view.header_name, "Taiwan");
        // a third of the way from 19:00 (#2c3e50) to 22:00 (#0f0f0f)
        assert_eq!(view.background, "rgb(34, 46, 58)");
    }

    #[test]
    fn header_follows_time_travel() {
        let mut model = model_at(NOON_UTC);
        model.manual_offset_minutes = -245;
        let view = App.view(&model);
        assert_eq!(view.header_time, "15:55");
        assert!(view.is_time_travelling);
    }

    #[test]
    fn unknown_focus_zone_shows_placeholder_and_midnight_tint() {
        let doc = br#"{
            "friends": [{"id": "x", "name": "Lost", "cityName": "Lost", "timezone": "Not/AZone"}],
            "selectedId": "x"
        }"#;
        let mut model = model_at(NOON_UTC);
        model.registry = FriendRegistry::restore(Some(doc), 8);

        let view = App.view(&model);
        assert_eq!(view.header_time, "--:--");
        assert_eq!(view.header_name, "Lost");
        // the 00:00 anchor, #0a0a14
        assert_eq!(view.background, "rgb(10, 10, 20)");
        assert!(view.dial.hands.is_empty());
    }

    #[test]
    fn edit_dialog_view() {
        let mut model = model_at(NOON_UTC);
        model.dialog = Dialog::EditFriend {
            id: FriendId::new("1"),
        };
        let view = App.view(&model);
        assert_eq!(
            view.dialog,
            DialogView::EditFriend {
                id: "1".into(),
                title: "Edit Taiwan".into(),
                name: "Taiwan".into(),
                can_delete: false,
            }
        );
    }

    #[test]
    fn dialog_for_vanished_friend_is_closed() {
        let mut model = model_at(NOON_UTC);
        model.dialog = Dialog::EditFriend {
            id: FriendId::new("gone"),
        };
        assert_eq!(App.view(&model).dialog, DialogView::Closed);
    }

    #[test]
    fn work_hours_label() {
        assert_eq!(App.view(&Model::default()).work_hours_label, "9:00-17:00");
    }
}
