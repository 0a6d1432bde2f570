// Copyright © 2025 rustmailer.com
// Licensed under RustMailer License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use crate::modules::error::code::ErrorCode;
use crate::modules::error::CampaignResult;
use crate::modules::tasks::model::{DeliveryOutcome, TaskRecord, TaskStatus};
use crate::{generate_token, raise_error, utc_now};
use dashmap::DashMap;
use std::future::Future;

/// Progress storage for send tasks. Status changes are forward-only and
/// counters never exceed the task total.
pub trait TaskStore: Send + Sync + 'static {
    fn create(&self, total: u64) -> impl Future<Output = CampaignResult<TaskRecord>> + Send;

    fn get(&self, id: &str) -> impl Future<Output = CampaignResult<Option<TaskRecord>>> + Send;

    fn start(&self, id: &str) -> impl Future<Output = CampaignResult<()>> + Send;

    /// Counts one recipient outcome and returns the updated record.
    fn record(
        &self,
        id: &str,
        outcome: DeliveryOutcome,
    ) -> impl Future<Output = CampaignResult<TaskRecord>> + Send;

    fn finish(&self, id: &str) -> impl Future<Output = CampaignResult<()>> + Send;

    fn fail(&self, id: &str, trace: String) -> impl Future<Output = CampaignResult<()>> + Send;
}

/// In-process store. Entries live until the process exits.
#[derive(Default)]
pub struct MemoryTaskStore {
    tasks: DashMap<String, TaskRecord>,
}

impl MemoryTaskStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    fn not_found(id: &str) -> crate::modules::error::CampaignError {
        raise_error!(
            format!("Task '{}' not found", id),
            ErrorCode::ResourceNotFound
        )
    }

    fn advance(&self, id: &str, next: TaskStatus, trace: Option<String>) -> CampaignResult<()> {
        let mut entry = self.tasks.get_mut(id).ok_or_else(|| Self::not_found(id))?;
        if !entry.status.can_advance_to(next) {
            return Err(raise_error!(
                format!("Task '{}' cannot move from {} to {}", id, entry.status, next),
                ErrorCode::InternalError
            ));
        }
        if next == TaskStatus::Done && entry.processed() != entry.total {
            return Err(raise_error!(
                format!(
                    "Task '{}' finished with {} of {} recipients processed",
                    id,
                    entry.processed(),
                    entry.total
                ),
                ErrorCode::InternalError
            ));
        }
        entry.status = next;
        if trace.is_some() {
            entry.error = trace;
        }
        entry.updated_at = utc_now!();
        Ok(())
    }
}

impl TaskStore for MemoryTaskStore {
    async fn create(&self, total: u64) -> CampaignResult<TaskRecord> {
        loop {
            let id = generate_token!(128);
            if self.tasks.contains_key(&id) {
                continue;
            }
            let record = TaskRecord::new(id.clone(), total);
            self.tasks.insert(id, record.clone());
            return Ok(record);
        }
    }

    async fn get(&self, id: &str) -> CampaignResult<Option<TaskRecord>> {
        Ok(self.tasks.get(id).map(|entry| entry.value().clone()))
    }

    async fn start(&self, id: &str) -> CampaignResult<()> {
        self.advance(id, TaskStatus::Running, None)
    }

    async fn record(&self, id: &str, outcome: DeliveryOutcome) -> CampaignResult<TaskRecord> {
        let mut entry = self.tasks.get_mut(id).ok_or_else(|| Self::not_found(id))?;
        if entry.status != TaskStatus::Running {
            return Err(raise_error!(
                format!("Task '{}' is {}, not running", id, entry.status),
                ErrorCode::InternalError
            ));
        }
        if entry.processed() >= entry.total {
            return Err(raise_error!(
                format!("Task '{}' already has all {} outcomes", id, entry.total),
                ErrorCode::InternalError
            ));
        }
        match outcome {
            DeliveryOutcome::Sent => entry.sent += 1,
            DeliveryOutcome::Failed => entry.failed += 1,
        }
        entry.updated_at = utc_now!();
        Ok(entry.value().clone())
    }

    async fn finish(&self, id: &str) -> CampaignResult<()> {
        self.advance(id, TaskStatus::Done, None)
    }

    async fn fail(&self, id: &str, trace: String) -> CampaignResult<()> {
        self.advance(id, TaskStatus::Error, Some(trace))
    }
}
