//! Capabilities the core asks the shell for.
//!
//! Render and key-value storage are Crux's built-in capabilities; the ticker
//! is ours and drives the header timer and the dial redraw loop.

pub mod kv;
mod ticker;

pub use self::kv::{StorageKey, StoreError};
pub use self::ticker::{TickKind, TickOperation, TickOutput, Ticker};

pub use crux_core::render::Render;
pub use crux_kv::KeyValue;

use crate::{app::App, event::Event};

#[derive(crux_core::macros::Effect)]
pub struct Capabilities {
    pub render: Render<Event>,
    pub key_value: KeyValue<Event>,
    pub ticker: Ticker<Event>,
}
