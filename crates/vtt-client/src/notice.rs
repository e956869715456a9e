//! Toast-style notices for failures the sync loop recovers from.

use std::collections::VecDeque;

use chrono::{DateTime, Utc};

/// Severity of a [`Notice`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    /// Informational.
    Info,
    /// A request failed; the loop carries on.
    Warning,
}

/// A message for the user.
#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    /// When it was raised.
    pub at: DateTime<Utc>,
    /// Severity.
    pub level: NoticeLevel,
    /// Text to show.
    pub message: String,
}

impl Notice {
    /// A warning raised now.
    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            at: Utc::now(),
            level: NoticeLevel::Warning,
            message: message.into(),
        }
    }

    /// An informational notice raised now.
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            at: Utc::now(),
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for Notice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let level = match self.level {
            NoticeLevel::Info => "info",
            NoticeLevel::Warning => "warning",
        };
        write!(f, "[{level}] {}", self.message)
    }
}

/// A bounded queue of notices; the oldest is dropped when full.
#[derive(Debug, Clone)]
pub struct NoticeQueue {
    notices: VecDeque<Notice>,
    capacity: usize,
}

impl NoticeQueue {
    /// Create a queue holding at most `capacity` notices.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            notices: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Add a notice, dropping the oldest if the queue is full.
    pub fn push(&mut self, notice: Notice) {
        if self.notices.len() == self.capacity {
            self.notices.pop_front();
        }
        self.notices.push_back(notice);
    }

    /// Remove and return all queued notices, oldest first.
    pub fn drain(&mut self) -> Vec<Notice> {
        self.notices.drain(..).collect()
    }

    /// Queued notices, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &Notice> {
        self.notices.iter()
    }

    /// Number of queued notices.
    pub fn len(&self) -> usize {
        self.notices.len()
    }

    /// Whether the queue is empty.
    pub fn is_empty(&self) -> bool {
        self.notices.is_empty()
    }

    /// Maximum number of queued notices.
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
