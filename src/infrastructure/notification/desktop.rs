//! Desktop notification adapter using notify-rust

use async_trait::async_trait;
use notify_rust::Notification;

use crate::application::ports::{NotificationError, NotificationIcon, Notifier};

/// Desktop notifier backed by the platform notification service
pub struct DesktopNotifier;

impl DesktopNotifier {
    /// Create a new desktop notifier
    pub fn new() -> Self {
        Self
    }
}

impl Default for DesktopNotifier {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Notifier for DesktopNotifier {
    async fn notify(
        &self,
        title: &str,
        message: &str,
        icon: NotificationIcon,
    ) -> Result<(), NotificationError> {
        let title = title.to_string();
        let message = message.to_string();

        // notify-rust blocks on the bus round-trip
        tokio::task::spawn_blocking(move || {
            Notification::new()
                .summary(&title)
                .body(&message)
                .icon(icon.icon_name())
                .show()
                .map(|_| ())
                .map_err(|e| NotificationError::SendFailed(e.to_string()))
        })
        .await
        .map_err(|e| NotificationError::SendFailed(format!("Task join error: {}", e)))?
    }
}
