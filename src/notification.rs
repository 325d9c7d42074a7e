//! Decode diagnostics.
//!
//! Non-fatal events met while decoding a drawing (checksum mismatches in
//! lenient mode, skipped proxy graphics, objects dropped in failsafe mode)
//! are recorded as [`Notification`]s instead of aborting the read.
//! After [`decode_sections`](crate::decode_sections) the caller inspects
//! [`DwgSections::notifications`](crate::DwgSections::notifications).

use std::fmt;

/// Severity level of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NotificationType {
    /// The object or feature is recognised but not decoded.
    NotImplemented,
    /// The feature exists but this decoder does not handle it here.
    NotSupported,
    /// Non-fatal warning (checksum mismatch, skipped payload).
    Warning,
    /// A recovered error (object skipped in failsafe mode).
    Error,
}

impl fmt::Display for NotificationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotImplemented => write!(f, "NotImplemented"),
            Self::NotSupported => write!(f, "NotSupported"),
            Self::Warning => write!(f, "Warning"),
            Self::Error => write!(f, "Error"),
        }
    }
}

/// A single diagnostic produced while decoding.
#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub notification_type: NotificationType,
    pub message: String,
    /// Absolute file offset the event refers to, when known.
    pub offset: Option<u64>,
}

impl Notification {
    pub fn new(notification_type: NotificationType, message: impl Into<String>) -> Self {
        Self {
            notification_type,
            message: message.into(),
            offset: None,
        }
    }

    /// Create a notification tied to a file offset.
    pub fn at(notification_type: NotificationType, offset: u64, message: impl Into<String>) -> Self {
        Self {
            notification_type,
            message: message.into(),
            offset: Some(offset),
        }
    }
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.offset {
            Some(offset) => write!(f, "[{}] {:#X}: {}", self.notification_type, offset, self.message),
            None => write!(f, "[{}] {}", self.notification_type, self.message),
        }
    }
}

/// Ordered collection of notifications gathered during one decode.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NotificationCollection {
    items: Vec<Notification>,
}

impl NotificationCollection {
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Record a notification without location.
    pub fn notify(&mut self, notification_type: NotificationType, message: impl Into<String>) {
        self.items.push(Notification::new(notification_type, message));
    }

    /// Record a notification tied to a file offset.
    pub fn notify_at(
        &mut self,
        notification_type: NotificationType,
        offset: u64,
        message: impl Into<String>,
    ) {
        self.items.push(Notification::at(notification_type, offset, message));
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Notification> {
        self.items.iter()
    }

    /// All notifications of one severity.
    pub fn of_type(&self, nt: NotificationType) -> Vec<&Notification> {
        self.items.iter().filter(|n| n.notification_type == nt).collect()
    }

    pub fn has_type(&self, nt: NotificationType) -> bool {
        self.items.iter().any(|n| n.notification_type == nt)
    }

    /// Move every notification of `other` into this collection.
    pub fn append(&mut self, other: &mut NotificationCollection) {
        self.items.append(&mut other.items);
    }
}

impl<'a> IntoIterator for &'a NotificationCollection {
    type Item = &'a Notification;
    type IntoIter = std::slice::Iter<'a, Notification>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
