//! # Artifact File Gate
//!
//! A single process-wide slot serializing every artifact file access,
//! across all platforms and artifact kinds. The underlying storage cannot
//! tolerate concurrent exclusive handles on the install binaries, so the
//! depot funnels every serve operation through one permit rather than
//! locking per file.
//!
//! The gate is created once at startup and handed to the dispatcher as a
//! dependency; tests substitute a fast-failing variant via
//! [`FileGate::with_timeout`].

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tracing::trace;

/// Bound on how long a request waits for the slot before failing.
pub const DEFAULT_GATE_TIMEOUT: Duration = Duration::from_secs(15);

/// The wait for the artifact slot exceeded the configured bound.
///
/// Distinct from I/O failures on purpose: the caller may simply retry.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("timed out waiting for the artifact file gate")]
pub struct GateTimedOut;

/// Process-wide mutual exclusion over artifact file access.
///
/// Capacity is fixed at exactly one slot. Cloning shares the slot; the
/// clone is the same gate.
#[derive(Clone)]
pub struct FileGate {
    slot: Arc<Semaphore>,
    timeout: Duration,
}

impl FileGate {
    pub fn new() -> Self {
        Self::with_timeout(DEFAULT_GATE_TIMEOUT)
    }

    /// A gate with a non-default wait bound. Tests use this to fail fast.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            slot: Arc::new(Semaphore::new(1)),
            timeout,
        }
    }

    /// Waits for the slot, up to the configured bound.
    ///
    /// The permit releases the slot when dropped, so every exit path out
    /// of a serve operation releases exactly once and a second release
    /// cannot be expressed. Dropping a pending `acquire` future abandons
    /// the wait without touching the slot, so an aborted request never
    /// leaves an orphaned hold.
    pub async fn acquire(&self) -> Result<GatePermit, GateTimedOut> {
        match tokio::time::timeout(self.timeout, Arc::clone(&self.slot).acquire_owned()).await {
            Ok(Ok(permit)) => {
                trace!("artifact file gate acquired");
                Ok(GatePermit { _permit: permit })
            }
            // The slot semaphore is never closed.
            Ok(Err(_)) | Err(_) => Err(GateTimedOut),
        }
    }

    /// Whether the slot is currently unheld.
    pub fn is_free(&self) -> bool {
        self.slot.available_permits() == 1
    }
}

impl Default for FileGate {
    fn default() -> Self {
        Self::new()
    }
}

/// RAII hold on the gate slot.
pub struct GatePermit {
    _permit: OwnedSemaphorePermit,
}

impl Drop for GatePermit {
    fn drop(&mut self) {
        trace!("artifact file gate released");
    }
}
