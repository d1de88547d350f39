//! Named widget events and best-effort dispatch to the host.

use super::WidgetState;
use crate::error::{BookError, Result};
use crate::types::FlipDirection;
use serde::Serialize;
use tracing::warn;

/// Something the host may want to react to.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum BookEvent {
    Flip {
        direction: FlipDirection,
        state: WidgetState,
    },
    Glitch {
        state: WidgetState,
    },
    HoverChange {
        #[serde(rename = "isHovering")]
        is_hovering: bool,
        state: WidgetState,
    },
}

impl BookEvent {
    /// The host-side event name.
    pub fn name(&self) -> &'static str {
        match self {
            BookEvent::Flip { .. } => "babel:flip",
            BookEvent::Glitch { .. } => "babel:glitch",
            BookEvent::HoverChange { .. } => "babel:hoverChange",
        }
    }

    /// The event detail as JSON: `{ direction | isHovering, state }`.
    pub fn detail(&self) -> Result<serde_json::Value> {
        Ok(serde_json::to_value(self)?)
    }
}

/// Receives named events, e.g. a DOM `dispatchEvent` bridge.
pub trait EventSink {
    fn dispatch(&mut self, name: &str, detail: &serde_json::Value) -> Result<()>;
}

/// Collects events in memory. Handy for hosts that poll.
#[derive(Debug, Default, Clone)]
pub struct EventLog {
    pub events: Vec<(String, serde_json::Value)>,
}

impl EventSink for EventLog {
    fn dispatch(&mut self, name: &str, detail: &serde_json::Value) -> Result<()> {
        self.events.push((name.to_string(), detail.clone()));
        Ok(())
    }
}

impl<F> EventSink for F
where
    F: FnMut(&str, &serde_json::Value) -> Result<()>,
{
    fn dispatch(&mut self, name: &str, detail: &serde_json::Value) -> Result<()> {
        self(name, detail)
    }
}

/// Send `event` to `sink`. Failures are logged and dropped so rendering
/// never stops over a listener.
pub(super) fn emit(sink: &mut dyn EventSink, event: &BookEvent) {
    let result = event
        .detail()
        .and_then(|detail| sink.dispatch(event.name(), &detail));
    if let Err(e) = result {
        warn!("Dropped {} event: {}", event.name(), e);
    }
}

/// Build a dispatch error from any message.
pub fn dispatch_error(message: impl Into<String>) -> BookError {
    BookError::Dispatch(message.into())
}
