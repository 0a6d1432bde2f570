// Copyright © 2025 rustmailer.com
// Licensed under RustMailer License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use crate::modules::journal::entity::DeliveryLog;
use crate::utc_now;
use poem_openapi::{Enum, Object};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle of a bulk send.
///
/// `pending -> running -> done`, with `error` reachable from either
/// non-terminal state.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash, Serialize, Deserialize, Enum)]
#[oai(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    /// Accepted and waiting for a worker.
    #[default]
    Pending,
    /// A worker is iterating recipients.
    Running,
    /// Every recipient has an outcome.
    Done,
    /// The worker hit an unexpected fault.
    Error,
}

impl TaskStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, TaskStatus::Done | TaskStatus::Error)
    }

    pub fn can_advance_to(&self, next: TaskStatus) -> bool {
        matches!(
            (self, next),
            (TaskStatus::Pending, TaskStatus::Running)
                | (TaskStatus::Running, TaskStatus::Done)
                | (TaskStatus::Pending | TaskStatus::Running, TaskStatus::Error)
        )
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let status_str = match self {
            TaskStatus::Pending => "pending",
            TaskStatus::Running => "running",
            TaskStatus::Done => "done",
            TaskStatus::Error => "error",
        };
        write!(f, "{}", status_str)
    }
}

/// Result of handling one recipient.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum DeliveryOutcome {
    Sent,
    Failed,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct TaskRecord {
    pub id: String,
    pub status: TaskStatus,
    pub total: u64,
    pub sent: u64,
    pub failed: u64,
    pub error: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl TaskRecord {
    pub fn new(id: String, total: u64) -> Self {
        let now = utc_now!();
        Self {
            id,
            status: TaskStatus::Pending,
            total,
            sent: 0,
            failed: 0,
            error: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn processed(&self) -> u64 {
        self.sent + self.failed
    }

    pub fn remaining(&self) -> u64 {
        self.total.saturating_sub(self.processed())
    }
}

/// Progress snapshot returned to clients.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize, Object)]
pub struct TaskProgress {
    /// Opaque task identifier.
    pub id: String,
    pub status: TaskStatus,
    /// Number of recipients in the task.
    pub total: u64,
    pub sent: u64,
    /// Delivery failures plus recipients skipped for an empty body.
    pub failed: u64,
    /// `total - (sent + failed)`, never negative.
    pub remaining: u64,
    /// Captured trace when the task ended in `error`.
    pub error: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl From<&TaskRecord> for TaskProgress {
    fn from(record: &TaskRecord) -> Self {
        Self {
            id: record.id.clone(),
            status: record.status,
            total: record.total,
            sent: record.sent,
            failed: record.failed,
            remaining: record.remaining(),
            error: record.error.clone(),
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}

/// Progress plus the most recent journal entries, for troubleshooting.
#[derive(Clone, Debug, Eq, PartialEq, Deserialize, Serialize, Object)]
pub struct TaskDebug {
    pub task: TaskProgress,
    pub recent_logs: Vec<DeliveryLog>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transitions_only_move_forward() {
        use TaskStatus::*;
        assert!(Pending.can_advance_to(Running));
        assert!(Running.can_advance_to(Done));
        assert!(Pending.can_advance_to(Error));
        assert!(Running.can_advance_to(Error));
        assert!(!Pending.can_advance_to(Done));
        assert!(!Running.can_advance_to(Pending));
        assert!(!Done.can_advance_to(Error));
        assert!(!Error.can_advance_to(Running));
        assert!(Done.is_terminal() && Error.is_terminal());
    }

    #[test]
    fn remaining_never_underflows() {
        let mut record = TaskRecord::new("t".into(), 2);
        record.sent = 1;
        assert_eq!(TaskProgress::from(&record).remaining, 1);
        record.failed = 5;
        assert_eq!(record.remaining(), 0);
    }

    #[test]
    fn status_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&TaskStatus::Running).unwrap(), "\"running\"");
        assert_eq!(TaskStatus::Done.to_string(), "done");
    }
}
