//! Host capabilities module
//!
//! This module contains the capabilities the timer core consumes from its
//! host: a wall clock, a periodic tick source and a lifecycle observer,
//! along with the event channel that carries them to the driver.

pub mod clock;
pub mod events;
pub mod lifecycle;
pub mod ticker;

// Re-export main types
pub use clock::{Clock, ManualClock, SystemClock};
pub use events::{host_event_channel, AppStateEvent, HostEvent, HostEventReceiver, HostEventSender};
pub use lifecycle::{ManualObserver, SignalObserver, SuspensionObserver};
pub use ticker::{IntervalTicker, ManualTicker, TickSource};
