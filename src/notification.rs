use anyhow::Result;
use chrono::{DateTime, Duration, Utc};
use std::fmt;
use tracing::{debug, info};
use uuid::Uuid;

use crate::theme::ThemeHint;

/// Every notification closes itself after this long.
pub const DEFAULT_NOTIFICATION_TIMEOUT_SECS: u64 = 120;

/// Opaque reference to a presented notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NotificationHandle(Uuid);

impl NotificationHandle {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn id(&self) -> Uuid {
        self.0
    }
}

impl fmt::Display for NotificationHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Rendering backend for notifications. Implementations only draw and
/// remove; lifecycle rules live in [`NotificationPresenter`].
pub trait NotificationSurface {
    fn open(
        &mut self,
        handle: NotificationHandle,
        text: &str,
        theme: ThemeHint,
        timeout: std::time::Duration,
    ) -> Result<()>;

    fn close(&mut self, handle: NotificationHandle) -> Result<()>;
}

#[derive(Debug, Clone, Copy)]
struct LiveNotification {
    handle: NotificationHandle,
    expires_at: DateTime<Utc>,
}

/// Keeps at most one notification on screen at a time.
pub struct NotificationPresenter<S> {
    surface: S,
    timeout: std::time::Duration,
    live: Option<LiveNotification>,
}

impl<S: NotificationSurface> NotificationPresenter<S> {
    pub fn new(surface: S, timeout: std::time::Duration) -> Self {
        Self {
            surface,
            timeout,
            live: None,
        }
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn live(&self) -> Option<NotificationHandle> {
        self.live.map(|live| live.handle)
    }

    /// Replaces whatever is showing with `text`. A failure to close the
    /// previous notification never blocks the new one.
    pub fn present(
        &mut self,
        text: &str,
        theme: ThemeHint,
        now: DateTime<Utc>,
    ) -> Result<NotificationHandle> {
        self.close_live();

        let handle = NotificationHandle::new();
        self.surface.open(handle, text, theme, self.timeout)?;

        let timeout = Duration::from_std(self.timeout)
            .unwrap_or_else(|_| Duration::seconds(DEFAULT_NOTIFICATION_TIMEOUT_SECS as i64));
        self.live = Some(LiveNotification {
            handle,
            expires_at: now + timeout,
        });
        info!(%handle, "notification presented");
        Ok(handle)
    }

    /// Stale or repeated handles are ignored.
    pub fn dismiss(&mut self, handle: NotificationHandle) {
        if self.live() == Some(handle) {
            self.close_live();
        }
    }

    /// Auto-dismisses the live notification once its timeout has passed.
    pub fn expire(&mut self, now: DateTime<Utc>) -> bool {
        match self.live {
            Some(live) if now >= live.expires_at => {
                debug!(handle = %live.handle, "notification timed out");
                self.close_live();
                true
            }
            _ => false,
        }
    }

    fn close_live(&mut self) {
        if let Some(live) = self.live.take() {
            if let Err(err) = self.surface.close(live.handle) {
                debug!(handle = %live.handle, error = %err, "ignoring notification teardown error");
            }
        }
    }
}

/// Shows reminders through the desktop notification service.
///
/// Only freedesktop notifications can be withdrawn early. On Windows and
/// macOS `close` reports an error, so preemption and auto-dismiss only
/// update the presenter's bookkeeping there.
#[derive(Default)]
pub struct DesktopSurface {
    #[cfg(all(unix, not(target_os = "macos")))]
    shown: Option<(NotificationHandle, notify_rust::NotificationHandle)>,
}

impl DesktopSurface {
    pub fn new() -> Self {
        Self::default()
    }
}

impl NotificationSurface for DesktopSurface {
    fn open(
        &mut self,
        handle: NotificationHandle,
        text: &str,
        theme: ThemeHint,
        timeout: std::time::Duration,
    ) -> Result<()> {
        use anyhow::Context;

        let millis = u32::try_from(timeout.as_millis()).unwrap_or(u32::MAX);
        let notification = notify_rust::Notification::new()
            .appname("Athkar Reminder")
            .summary("Athkar Reminder")
            .body(text)
            .icon(theme.icon_name())
            .timeout(notify_rust::Timeout::Milliseconds(millis))
            .finalize();

        #[cfg(all(unix, not(target_os = "macos")))]
        {
            let shown = notification.show().context("Failed to show notification")?;
            self.shown = Some((handle, shown));
        }

        #[cfg(not(all(unix, not(target_os = "macos"))))]
        {
            let _ = handle;
            notification.show().context("Failed to show notification")?;
        }

        Ok(())
    }

    fn close(&mut self, handle: NotificationHandle) -> Result<()> {
        #[cfg(all(unix, not(target_os = "macos")))]
        {
            if let Some((shown_for, shown)) = self.shown.take() {
                if shown_for == handle {
                    shown.close();
                } else {
                    self.shown = Some((shown_for, shown));
                }
            }
        }

        #[cfg(all(unix, not(target_os = "macos")))]
        return Ok(());

        // notify-rust gives no handle to close a toast here; it stays until
        // the OS expires it, and the presenter logs this error and moves on.
        #[cfg(not(all(unix, not(target_os = "macos"))))]
        anyhow::bail!("notification {handle} cannot be closed on this platform");
    }
}

/// Writes reminders to the log instead of the screen.
#[derive(Debug, Default)]
pub struct LogSurface;

impl NotificationSurface for LogSurface {
    fn open(
        &mut self,
        handle: NotificationHandle,
        text: &str,
        _theme: ThemeHint,
        _timeout: std::time::Duration,
    ) -> Result<()> {
        info!(%handle, "{}", text);
        Ok(())
    }

    fn close(&mut self, handle: NotificationHandle) -> Result<()> {
        debug!(%handle, "notification closed");
        Ok(())
    }
}
