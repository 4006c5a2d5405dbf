//! Ephemeral notifications
//!
//! Toast-style messages with timed auto-removal. Each notification owns one
//! cancellable expiry task; manual dismissal or teardown aborts the task, so
//! no untracked timer outlives its notification.

use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use tokio::task::JoinHandle;
use uuid::Uuid;

/// Default time a notification stays visible
const DEFAULT_TTL: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
    Info,
}

impl ToastKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ToastKind::Success => "success",
            ToastKind::Error => "error",
            ToastKind::Info => "info",
        }
    }
}

/// One visible notification
#[derive(Debug, Clone)]
pub struct Toast {
    pub id: Uuid,
    pub message: String,
    pub kind: ToastKind,
}

struct Entry {
    toast: Toast,
    /// None when pushed outside a tokio runtime; the toast then stays
    /// until dismissed or shutdown.
    expiry: Option<JoinHandle<()>>,
}

/// Holds active notifications and their expiry timers
pub struct NotificationCenter {
    entries: Arc<DashMap<Uuid, Entry>>,
    ttl: Duration,
}

impl Default for NotificationCenter {
    fn default() -> Self {
        Self::new()
    }
}

impl NotificationCenter {
    pub fn new() -> Self {
        Self::with_ttl(DEFAULT_TTL)
    }

    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            entries: Arc::new(DashMap::new()),
            ttl,
        }
    }

    /// Show a notification; it auto-removes after the configured TTL.
    ///
    /// Outside a tokio runtime no expiry timer can be scheduled and the
    /// toast stays until `dismiss` or `shutdown`.
    pub fn push(&self, message: impl Into<String>, kind: ToastKind) -> Uuid {
        let id = Uuid::new_v4();
        let toast = Toast {
            id,
            message: message.into(),
            kind,
        };

        let expiry = tokio::runtime::Handle::try_current().ok().map(|handle| {
            let entries = self.entries.clone();
            let ttl = self.ttl;
            handle.spawn(async move {
                tokio::time::sleep(ttl).await;
                entries.remove(&id);
            })
        });

        self.entries.insert(id, Entry { toast, expiry });
        id
    }

    /// Manually remove a notification, cancelling its expiry timer.
    /// Returns `false` when it already expired or was never shown.
    pub fn dismiss(&self, id: Uuid) -> bool {
        match self.entries.remove(&id) {
            Some((_, entry)) => {
                if let Some(expiry) = entry.expiry {
                    expiry.abort();
                }
                true
            }
            None => false,
        }
    }

    /// Currently visible notifications
    pub fn active(&self) -> Vec<Toast> {
        self.entries
            .iter()
            .map(|entry| entry.toast.clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Teardown: abort every expiry timer and clear the set
    pub fn shutdown(&self) {
        for entry in self.entries.iter() {
            if let Some(expiry) = &entry.expiry {
                expiry.abort();
            }
        }
        self.entries.clear();
    }
}

impl Drop for NotificationCenter {
    fn drop(&mut self) {
        self.shutdown();
    }
}
