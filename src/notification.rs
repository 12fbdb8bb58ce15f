//! Desktop notifications via freedesktop D-Bus.
//!
//! Save and retrieve outcomes are reported here so they are visible even
//! though the canvas itself has no status area.

use crate::input::Notice;
use std::collections::HashMap;
use zbus::{Connection, proxy};

const APP_NAME: &str = "Sketchpad";
const TIMEOUT_MS: i32 = 4000;

/// D-Bus interface for freedesktop Notifications.
#[proxy(
    interface = "org.freedesktop.Notifications",
    default_service = "org.freedesktop.Notifications",
    default_path = "/org/freedesktop/Notifications"
)]
trait Notifications {
    /// Send a notification; returns its id.
    #[allow(clippy::too_many_arguments)]
    fn notify(
        &self,
        app_name: &str,
        replaces_id: u32,
        app_icon: &str,
        summary: &str,
        body: &str,
        actions: Vec<&str>,
        hints: HashMap<&str, zbus::zvariant::Value<'_>>,
        expire_timeout: i32,
    ) -> zbus::Result<u32>;
}

/// Icon name for a notice.
pub fn icon_for(notice: &Notice) -> &'static str {
    if notice.is_error() {
        "dialog-error"
    } else {
        "document-save"
    }
}

/// Send a system notification.
pub async fn send_notification(summary: &str, body: &str, icon: &str) -> Result<(), String> {
    let connection = Connection::session()
        .await
        .map_err(|e| format!("Failed to connect to session bus: {}", e))?;

    let proxy = NotificationsProxy::new(&connection)
        .await
        .map_err(|e| format!("Failed to create notifications proxy: {}", e))?;

    proxy
        .notify(
            APP_NAME,
            0,
            icon,
            summary,
            body,
            vec![],
            HashMap::new(),
            TIMEOUT_MS,
        )
        .await
        .map_err(|e| format!("Failed to send notification: {}", e))?;

    Ok(())
}

/// Reports `notice` in the background without blocking the event loop.
pub fn notify_async(runtime_handle: &tokio::runtime::Handle, notice: &Notice) {
    let summary = notice.summary().to_string();
    let body = notice.body();
    let icon = icon_for(notice);
    runtime_handle.spawn(async move {
        if let Err(e) = send_notification(&summary, &body, icon).await {
            log::warn!("Failed to send notification: {}", e);
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn error_notices_use_error_icon() {
        assert_eq!(icon_for(&Notice::SaveFailed("disk full".into())), "dialog-error");
        assert_eq!(
            icon_for(&Notice::Downloaded(PathBuf::from("/tmp/canvas_img.png"))),
            "document-save"
        );
    }
}
