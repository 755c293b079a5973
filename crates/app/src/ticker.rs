//! Periodic resync of every region.
//!
//! Bridges are fire-and-forget UDP devices: a lost datagram or a power cut
//! leaves a lamp out of step with the stored state. The ticker queues a
//! [`Request::Sync`] at a fixed period so the lamps converge again.

use std::time::Duration;

use tokio::task::JoinHandle;

use crate::processor::{ProcessorHandle, Request};

/// Default period between two resyncs.
pub const RESYNC_INTERVAL: Duration = Duration::from_secs(30);

/// Spawn the ticker. The first resync happens one `period` after startup.
///
/// The task ends on its own once the processor stops accepting requests;
/// abort the returned handle to stop it earlier.
#[must_use]
pub fn spawn_resync_ticker(processor: ProcessorHandle, period: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            tokio::time::sleep(period).await;
            tracing::trace!("resync tick");
            if processor.enqueue(Request::Sync).await.is_err() {
                tracing::debug!("command processor gone, stopping resync ticker");
                break;
            }
        }
    })
}
