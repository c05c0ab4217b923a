use crux_core::capability::{CapabilityContext, Operation};
use crux_core::macros::Capability;
use futures::StreamExt;
use serde::{Deserialize, Serialize};

/// Periodic wake-ups driven by the shell: a fixed-period timer or the
/// display's refresh callback.
#[derive(Capability)]
pub struct Ticker<Ev> {
    context: CapabilityContext<TickOperation, Ev>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum TickKind {
    /// Header text and background tint.
    Header,
    /// Dial redraw, synced to the display refresh.
    Frame,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum TickOperation {
    /// `interval_ms: None` asks for one tick per displayed frame.
    Start {
        kind: TickKind,
        interval_ms: Option<u32>,
    },
    Stop {
        kind: TickKind,
    },
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct TickOutput {
    pub kind: TickKind,
    /// Wall-clock time of the tick, milliseconds since the Unix epoch.
    pub now_ms: i64,
}

impl Operation for TickOperation {
    type Output = TickOutput;
}

impl<Ev> Ticker<Ev>
where
    Ev: 'static,
{
    pub fn new(context: CapabilityContext<TickOperation, Ev>) -> Self {
        Self { context }
    }

    /// Starts a tick stream; every tick the shell reports becomes an event.
    pub fn start<F>(&self, kind: TickKind, interval_ms: Option<u32>, make_event: F)
    where
        F: Fn(TickOutput) -> Ev + Send + Sync + 'static,
    {
        let context = self.context.clone();
        self.context.spawn(async move {
            let mut ticks = context.stream_from_shell(TickOperation::Start { kind, interval_ms });
            while let Some(tick) = ticks.next().await {
                context.update_app(make_event(tick));
            }
        });
    }

    pub fn stop(&self, kind: TickKind) {
        let context = self.context.clone();
        self.context.spawn(async move {
            context.notify_shell(TickOperation::Stop { kind }).await;
        });
    }
}
