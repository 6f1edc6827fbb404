use std::sync::{Mutex, MutexGuard};

pub mod loading;
pub mod notification;

pub use loading::{LoadingGuard, LoadingState};
pub use notification::{Notification, NotificationKind, Notifications};


/// A poisoned lock only means another holder panicked; the counters inside stay usable.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
