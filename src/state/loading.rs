use std::sync::{Arc, Mutex};

use log::{debug, warn};
use tokio::sync::watch;

use super::lock;

/// Process-wide in-flight request counter behind the spinner.
///
/// The indicator stays visible while at least one request is running, so overlapping
/// requests never make it flicker. The counter itself is private; callers only get
/// `begin` (paired with the guard's drop), `reset` and the visibility flag.
#[derive(Clone)]
pub struct LoadingState {
    in_flight: Arc<Mutex<usize>>,
    visible: Arc<watch::Sender<bool>>,
}

impl LoadingState {
    pub fn new() -> LoadingState {
        let (visible, _) = watch::channel(false);
        LoadingState {
            in_flight: Arc::new(Mutex::new(0)),
            visible: Arc::new(visible),
        }
    }

    /// Marks one request as started. The request counts as finished when the guard drops.
    #[must_use = "the request is considered finished as soon as the guard is dropped"]
    pub fn begin(&self) -> LoadingGuard {
        let mut in_flight = lock(&self.in_flight);
        *in_flight += 1;
        self.visible.send_replace(true);
        debug!("request started, in_flight={}", *in_flight);

        LoadingGuard { state: self.clone() }
    }

    fn finish(&self) {
        let mut in_flight = lock(&self.in_flight);
        if *in_flight == 0 {
            warn!("loading counter finished below zero, clamping");
        }
        *in_flight = in_flight.saturating_sub(1);
        if *in_flight == 0 {
            self.visible.send_replace(false);
        }
        debug!("request finished, in_flight={}", *in_flight);
    }

    /// Forces the counter to zero and hides the indicator.
    pub fn reset(&self) {
        *lock(&self.in_flight) = 0;
        self.visible.send_replace(false);
    }

    pub fn is_visible(&self) -> bool {
        *self.visible.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.visible.subscribe()
    }
}

impl Default for LoadingState {
    fn default() -> Self {
        LoadingState::new()
    }
}

pub struct LoadingGuard {
    state: LoadingState,
}

impl Drop for LoadingGuard {
    fn drop(&mut self) {
        self.state.finish();
    }
}
