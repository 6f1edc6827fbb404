use std::sync::{Arc, Mutex};
use std::time::Duration;

use getset::{CopyGetters, Getters};
use log::{debug, warn};
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

use super::lock;

pub const DEFAULT_DURATION: Duration = Duration::from_millis(5000);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Error,
    Info,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Getters, CopyGetters)]
pub struct Notification {
    #[getset(get = "pub")]
    message: String,
    #[getset(get_copy = "pub")]
    kind: NotificationKind,
    #[getset(get_copy = "pub")]
    duration: Duration,
}

#[derive(Default)]
struct Slot {
    current: Option<Notification>,
    last: Option<Notification>,
    timer: Option<JoinHandle<()>>,
    generation: u64,
}

/// Single-slot user message with auto-hide.
#[derive(Clone)]
pub struct Notifications {
    slot: Arc<Mutex<Slot>>,
    default_duration: Duration,
}

impl Notifications {
    pub fn new(default_duration: Duration) -> Notifications {
        Notifications {
            slot: Arc::new(Mutex::new(Slot::default())),
            default_duration,
        }
    }

    /// Replaces the current message. Any pending auto-hide is cancelled first so an older
    /// timer can never hide this one.
    pub fn show(&self, message: impl Into<String>, kind: NotificationKind, duration: Option<Duration>) {
        let duration = duration.unwrap_or(self.default_duration);
        let message = message.into();
        debug!("notification kind={:?} message={}", kind, message);

        let mut slot = lock(&self.slot);
        if let Some(timer) = slot.timer.take() {
            timer.abort();
        }
        slot.generation += 1;
        let notification = Notification { message, kind, duration };
        slot.last = Some(notification.clone());
        slot.current = Some(notification);

        let generation = slot.generation;
        match Handle::try_current() {
            Ok(handle) => {
                let shared = Arc::clone(&self.slot);
                slot.timer = Some(handle.spawn(async move {
                    tokio::time::sleep(duration).await;
                    let mut slot = lock(&shared);
                    if slot.generation == generation {
                        slot.current = None;
                        slot.timer = None;
                    }
                }));
            },
            Err(_) => warn!("no async runtime, notification stays until hidden"),
        }
    }

    pub fn success(&self, message: impl Into<String>) {
        self.show(message, NotificationKind::Success, None);
    }

    pub fn error(&self, message: impl Into<String>) {
        self.show(message, NotificationKind::Error, None);
    }

    pub fn info(&self, message: impl Into<String>) {
        self.show(message, NotificationKind::Info, None);
    }

    pub fn warning(&self, message: impl Into<String>) {
        self.show(message, NotificationKind::Warning, None);
    }

    pub fn hide(&self) {
        let mut slot = lock(&self.slot);
        slot.current = None;
        slot.generation += 1;
        if let Some(timer) = slot.timer.take() {
            timer.abort();
        }
    }

    pub fn current(&self) -> Option<Notification> {
        lock(&self.slot).current.clone()
    }

    /// Most recently shown message, kept after it is hidden.
    pub fn last(&self) -> Option<Notification> {
        lock(&self.slot).last.clone()
    }
}

impl Default for Notifications {
    fn default() -> Self {
        Notifications::new(DEFAULT_DURATION)
    }
}
