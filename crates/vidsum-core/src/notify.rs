//! Notification effect emitted by the orchestrator.
//!
//! The orchestrator never talks to a toast widget directly. It emits a
//! [`Notice`] through a [`Notifier`] and the presentation layer decides how to
//! show it.

use std::sync::{Mutex, MutexGuard, PoisonError};

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeKind {
    Error,
    Info,
}

impl NoticeKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Info => "info",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

impl Notice {
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Error,
            message: message.into(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Info,
            message: message.into(),
        }
    }
}

/// Sink for user-facing notifications
pub trait Notifier: Send + Sync {
    fn notify(&self, notice: Notice);
}

/// Notifier that only writes to the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notice: Notice) {
        match notice.kind {
            NoticeKind::Error => tracing::error!("{}", notice.message),
            NoticeKind::Info => tracing::info!("{}", notice.message),
        }
    }
}

/// Collects notices until a renderer drains them.
#[derive(Debug, Default)]
pub struct NoticeQueue {
    notices: Mutex<Vec<Notice>>,
}

impl NoticeQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// The queue stays valid after a panic, so poisoning is ignored.
    fn lock(&self) -> MutexGuard<'_, Vec<Notice>> {
        self.notices.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Take every pending notice, oldest first.
    pub fn drain(&self) -> Vec<Notice> {
        std::mem::take(&mut *self.lock())
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Notifier for NoticeQueue {
    fn notify(&self, notice: Notice) {
        self.lock().push(notice);
    }
}
