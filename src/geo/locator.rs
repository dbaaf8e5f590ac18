//! Background dispatch of geolocation requests.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use super::{GeolocationResolver, Location};

/// Result of one geolocation request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocationUpdate {
    /// Sequence number of the request, increasing per [`Locator`].
    pub seq: u64,
    pub location: Location,
    /// Whether `location` is the fallback substituted for a failure.
    pub fallback: bool,
}

/// Runs geolocation requests as independent tasks and collects their results.
///
/// Requests are never cancelled; each one eventually produces exactly one
/// [`LocationUpdate`], using the fallback location on error or timeout.
pub struct Locator {
    resolver: Arc<dyn GeolocationResolver>,
    runtime: Handle,
    fallback: Location,
    timeout: Duration,
    next_seq: u64,
    tx: mpsc::UnboundedSender<LocationUpdate>,
    rx: mpsc::UnboundedReceiver<LocationUpdate>,
}

impl std::fmt::Debug for Locator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Locator")
            .field("resolver", &self.resolver.name())
            .field("fallback", &self.fallback)
            .field("timeout", &self.timeout)
            .field("next_seq", &self.next_seq)
            .finish()
    }
}

impl Locator {
    /// Create a locator that spawns its requests on `runtime`.
    pub fn new(
        resolver: Arc<dyn GeolocationResolver>,
        runtime: Handle,
        fallback: Location,
        timeout: Duration,
    ) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            resolver,
            runtime,
            fallback,
            timeout,
            next_seq: 1,
            tx,
            rx,
        }
    }

    /// Start resolving a location for `hint`, returning the request's sequence number.
    pub fn request(&mut self, hint: &str) -> u64 {
        let seq = self.next_seq;
        self.next_seq += 1;

        let resolver = self.resolver.clone();
        let tx = self.tx.clone();
        let fallback = self.fallback;
        let timeout = self.timeout;
        let hint = hint.to_string();

        self.runtime.spawn(async move {
            let update = match tokio::time::timeout(timeout, resolver.resolve(&hint)).await {
                Ok(Ok(location)) => {
                    debug!("Resolved {} to {:?} via {}", hint, location, resolver.name());
                    LocationUpdate {
                        seq,
                        location,
                        fallback: false,
                    }
                }
                Ok(Err(e)) => {
                    warn!("Geolocation via {} failed: {}; using fallback", resolver.name(), e);
                    LocationUpdate {
                        seq,
                        location: fallback,
                        fallback: true,
                    }
                }
                Err(_) => {
                    warn!("Geolocation via {} timed out; using fallback", resolver.name());
                    LocationUpdate {
                        seq,
                        location: fallback,
                        fallback: true,
                    }
                }
            };
            // Receiver only goes away when the app is shutting down
            let _ = tx.send(update);
        });

        seq
    }

    /// Take the next finished request, if any. Never blocks.
    pub fn poll(&mut self) -> Option<LocationUpdate> {
        self.rx.try_recv().ok()
    }
}

/// Location shown on the map, plus whether a lookup is in flight.
#[derive(Debug, Clone, Default, Serialize)]
pub struct LocationState {
    pub location: Option<Location>,
    #[serde(skip)]
    pending: usize,
    #[serde(skip)]
    applied_seq: u64,
}

impl LocationState {
    /// Note that a request has been dispatched.
    pub fn begin(&mut self) {
        self.pending += 1;
    }

    /// Record a finished request.
    ///
    /// Results older than the newest one already applied are discarded, so
    /// a slow response cannot overwrite a fresher location. Returns whether
    /// the location changed.
    pub fn apply(&mut self, update: LocationUpdate) -> bool {
        self.pending = self.pending.saturating_sub(1);

        if update.seq <= self.applied_seq {
            debug!(
                "Discarding stale location from request {} (have {})",
                update.seq, self.applied_seq
            );
            return false;
        }

        self.applied_seq = update.seq;
        self.location = Some(update.location);
        true
    }

    /// Whether any request is still outstanding.
    pub fn is_loading(&self) -> bool {
        self.pending > 0
    }
}
