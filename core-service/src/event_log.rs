//! Bus-to-`tracing` forwarding
//!
//! Hosts that only watch logs still see session expiry, illegal status
//! transitions and module lifecycle changes.

use core_runtime::events::{CoreEvent, EventBus, EventSeverity, EventStream};
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

/// Log every event at or above `min_severity` until the bus closes
///
/// Must be called inside a tokio runtime. Abort the handle to stop early.
pub fn spawn_event_logger(bus: &EventBus, min_severity: EventSeverity) -> JoinHandle<()> {
    let mut stream =
        EventStream::new(bus.subscribe()).filter(move |event| event.severity() >= min_severity);

    tokio::spawn(async move {
        loop {
            match stream.recv().await {
                Ok(event) => log_event(&event),
                Err(RecvError::Lagged(missed)) => {
                    warn!(missed, "Event logger fell behind");
                }
                Err(RecvError::Closed) => {
                    debug!("Event bus closed, stopping event logger");
                    break;
                }
            }
        }
    })
}

fn log_event(event: &CoreEvent) {
    let description = event.description();
    match event.severity() {
        EventSeverity::Debug => debug!(?event, "{}", description),
        EventSeverity::Info => info!(?event, "{}", description),
        EventSeverity::Warning => warn!(?event, "{}", description),
        EventSeverity::Error => error!(?event, "{}", description),
    }
}
