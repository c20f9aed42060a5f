// src/notifications.rs
//
// Foreground notification bridge.
// Subscribes to the client's notification stream and forwards unread
// notifications to the platform presenter. Presentation is best-effort:
// a toast that fails to show is logged and dropped, never surfaced to the
// caller. Losing one notification beats destabilising the client.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;

// ============================================================================
// Types
// ============================================================================

/// A notification event pushed by the notification service.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Notification {
    pub title: String,
    pub body: String,
    #[serde(default)]
    pub image_url: Option<String>,
    /// Set once the user has acknowledged the notification elsewhere
    /// (another window, another device).
    #[serde(default)]
    pub time_read: Option<DateTime<Utc>>,
}

impl Notification {
    pub fn is_unread(&self) -> bool {
        self.time_read.is_none()
    }
}

/// Recognised ways presenting a notification can fail.
/// These are logged at low severity and dropped, never propagated.
#[derive(Debug, Error)]
pub enum PresentError {
    /// The platform notification surface is not available right now.
    #[error("notification surface unavailable: {0}")]
    PlatformUnavailable(String),
    /// The notification content could not be rendered.
    #[error("malformed notification content: {0}")]
    MalformedContent(String),
}

// ============================================================================
// Collaborator traits
// ============================================================================

/// Callback invoked for each delivered notification.
pub type NotificationListener = Arc<dyn Fn(&Notification) + Send + Sync>;

/// Registration handle returned by `NotificationService::subscribe`.
///
/// Dropping the handle unregisters the listener. There is no other way to
/// unregister, so cleanup happens on every exit path, early returns
/// included.
pub struct ListenerHandle {
    unsubscribe: Option<Box<dyn FnOnce() + Send>>,
}

impl ListenerHandle {
    pub fn new(unsubscribe: impl FnOnce() + Send + 'static) -> Self {
        Self {
            unsubscribe: Some(Box::new(unsubscribe)),
        }
    }
}

impl Drop for ListenerHandle {
    fn drop(&mut self) {
        if let Some(unsubscribe) = self.unsubscribe.take() {
            unsubscribe();
        }
    }
}

impl std::fmt::Debug for ListenerHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("ListenerHandle")
    }
}

/// Push source of notification events, implemented by the delivery pipeline
/// outside this crate. A registered listener sees each notification exactly
/// once, in delivery order, for as long as its handle lives.
pub trait NotificationService: Send + Sync {
    fn subscribe(&self, listener: NotificationListener) -> ListenerHandle;
}

/// Platform glue that actually shows one notification.
pub trait NotificationPresenter: Send + Sync {
    fn present(&self, notification: &Notification) -> Result<(), PresentError>;
}

// ============================================================================
// Bridge
// ============================================================================

enum BridgeState {
    Disabled,
    Enabled(ListenerHandle),
}

/// Forwards unread notifications to the platform presenter while enabled.
///
/// Two states: `Disabled` (initial) and `Enabled`. Enable and disable are
/// idempotent and meant to be driven by a single owner, typically the
/// shell's main thread; the bridge does not defend against concurrent
/// enable/disable races. The delivery callback itself may fire from any
/// thread and only touches the `Arc`s it captured.
pub struct NotificationBridge {
    service: Arc<dyn NotificationService>,
    presenter: Arc<dyn NotificationPresenter>,
    state: BridgeState,
}

impl NotificationBridge {
    /// `push_subscribed` is the persisted opt-in flag, read once by the
    /// caller at startup; when set, the bridge starts enabled.
    pub fn new(
        service: Arc<dyn NotificationService>,
        presenter: Arc<dyn NotificationPresenter>,
        push_subscribed: bool,
    ) -> Self {
        let mut bridge = Self {
            service,
            presenter,
            state: BridgeState::Disabled,
        };
        if push_subscribed {
            bridge.enable();
        }
        bridge
    }

    /// Register for notifications. Calling while already enabled is a no-op;
    /// exactly one listener is ever registered at a time.
    pub fn enable(&mut self) {
        if matches!(self.state, BridgeState::Enabled(_)) {
            return;
        }
        let presenter = Arc::clone(&self.presenter);
        let handle = self
            .service
            .subscribe(Arc::new(move |notification| {
                deliver(presenter.as_ref(), notification);
            }));
        self.state = BridgeState::Enabled(handle);
        tlog!("[Bridge] Notifications enabled");
    }

    /// Unregister from notifications. Safe to call when never enabled.
    pub fn disable(&mut self) {
        if matches!(self.state, BridgeState::Disabled) {
            return;
        }
        // Replacing the state drops the handle, which unregisters.
        self.state = BridgeState::Disabled;
        tlog!("[Bridge] Notifications disabled");
    }

    pub fn is_enabled(&self) -> bool {
        matches!(self.state, BridgeState::Enabled(_))
    }
}

impl Drop for NotificationBridge {
    /// Disposal always lands in `Disabled`, whatever the current state.
    fn drop(&mut self) {
        self.disable();
    }
}

/// Present one notification, best-effort. Notifications already read are
/// skipped; presenter failures are logged and dropped so a broken platform
/// surface cannot take the client down with it.
fn deliver(presenter: &dyn NotificationPresenter, notification: &Notification) {
    if !notification.is_unread() {
        return;
    }
    if let Err(e) = presenter.present(notification) {
        tlog!("[Bridge] Dropped notification '{}': {}", notification.title, e);
    }
}

// ============================================================================
// Tests
// ============================================================================
