//! Events delivered from the host to the countdown driver

use serde::{Deserialize, Serialize};
use tokio::sync::{mpsc, oneshot};

/// Foreground/background transition reported by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppStateEvent {
    /// The host process went to the background
    Background,
    /// The host process is in the foreground again
    Active,
}

/// Everything the driver reacts to, on a single timeline
#[derive(Debug)]
pub enum HostEvent {
    /// One second elapsed
    Tick,
    /// Lifecycle transition. `ack` is signalled once the controller has
    /// processed it, so the host can hold off suspending until then.
    AppState {
        kind: AppStateEvent,
        ack: Option<oneshot::Sender<()>>,
    },
}

impl HostEvent {
    /// A lifecycle event nobody waits on
    pub fn app_state(kind: AppStateEvent) -> Self {
        HostEvent::AppState { kind, ack: None }
    }
}

/// Sending half of the host event channel
pub type HostEventSender = mpsc::UnboundedSender<HostEvent>;
/// Receiving half of the host event channel
pub type HostEventReceiver = mpsc::UnboundedReceiver<HostEvent>;

/// Create the channel ticks and lifecycle events are funnelled through
pub fn host_event_channel() -> (HostEventSender, HostEventReceiver) {
    mpsc::unbounded_channel()
}
