//! SIGINT / SIGTERM handling.
//!
//! Both signals mean the same thing: cancel the shared shutdown token.
//! The handler task never touches the EC; the control loop notices the
//! token at its next check.

use std::io;

use log::info;
use tokio::signal::unix::{self, Signal, SignalKind};
use tokio_util::sync::CancellationToken;

pub struct ShutdownSignals {
    sigint: Signal,
    sigterm: Signal,
}

impl ShutdownSignals {
    /// Register for SIGINT and SIGTERM.  Must run inside a tokio runtime.
    pub fn install() -> io::Result<Self> {
        Ok(Self {
            sigint: unix::signal(SignalKind::interrupt())?,
            sigterm: unix::signal(SignalKind::terminate())?,
        })
    }

    /// Wait for either signal, then cancel `shutdown`.
    ///
    /// Returns early without cancelling if `shutdown` is cancelled by
    /// someone else first.
    pub async fn cancel_on_signal(mut self, shutdown: CancellationToken) {
        tokio::select! {
            _ = self.sigint.recv() => {
                info!("Received SIGINT.");
            },
            _ = self.sigterm.recv() => {
                info!("Received SIGTERM.");
            },
            () = shutdown.cancelled() => return,
        }
        shutdown.cancel();
    }
}
