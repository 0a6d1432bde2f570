// Copyright © 2025 rustmailer.com
// Licensed under RustMailer License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use crate::modules::composer::personalize::personalize;
use crate::modules::composer::validator::has_meaningful_body;
use crate::modules::composer::ComposedEmail;
use crate::modules::error::CampaignResult;
use crate::modules::journal::{
    failed_status, DeliveryJournal, STATUS_SENT, STATUS_SKIPPED_EMPTY_BODY,
};
use crate::modules::recipients::Recipient;
use crate::modules::smtp::transport::{OutgoingEmail, Transport};
use crate::modules::tasks::attachment::StagedAttachment;
use crate::modules::tasks::model::DeliveryOutcome;
use crate::modules::tasks::store::TaskStore;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// Everything a worker needs to deliver one bulk send.
#[derive(Clone, Debug)]
pub struct SendJob {
    pub task_id: String,
    pub recipients: Vec<Recipient>,
    /// Generic HTML, personalized per recipient at send time.
    pub email: ComposedEmail,
    pub subject: String,
    pub category: String,
    pub sender_name: Option<String>,
    pub attachments: Arc<[StagedAttachment]>,
    /// Removed once the job ends, whatever the outcome.
    pub staging_dir: Option<PathBuf>,
}

pub struct Worker<T, S, J> {
    transport: Arc<T>,
    store: Arc<S>,
    journal: Arc<J>,
    interval: Duration,
}

impl<T, S, J> Clone for Worker<T, S, J> {
    fn clone(&self) -> Self {
        Self {
            transport: self.transport.clone(),
            store: self.store.clone(),
            journal: self.journal.clone(),
            interval: self.interval,
        }
    }
}

impl<T: Transport, S: TaskStore, J: DeliveryJournal> Worker<T, S, J> {
    pub fn new(transport: Arc<T>, store: Arc<S>, journal: Arc<J>, interval: Duration) -> Self {
        Self {
            transport,
            store,
            journal,
            interval,
        }
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// Delivers the job sequentially. Per-recipient failures are counted and
    /// journaled; only store faults abort the run.
    pub async fn run(&self, job: &SendJob) -> CampaignResult<()> {
        self.store.start(&job.task_id).await?;
        info!(
            "Task {} started: {} recipients, category '{}'",
            job.task_id,
            job.recipients.len(),
            job.category
        );

        for recipient in &job.recipients {
            let html = personalize(&job.email.html, job.email.marker.as_deref(), &recipient.name);
            let (outcome, status) = if !has_meaningful_body(&html) {
                warn!(
                    "Task {}: skipping {}, body has no meaningful content",
                    job.task_id, recipient.email
                );
                (DeliveryOutcome::Failed, STATUS_SKIPPED_EMPTY_BODY.to_string())
            } else {
                let email = OutgoingEmail {
                    to: recipient.email.clone(),
                    subject: job.subject.clone(),
                    html,
                    sender_name: job.sender_name.clone(),
                    attachments: job.attachments.clone(),
                };
                match self.transport.send(email).await {
                    Ok(()) => (DeliveryOutcome::Sent, STATUS_SENT.to_string()),
                    Err(e) => {
                        warn!(
                            "Task {}: delivery to {} failed: {}",
                            job.task_id, recipient.email, e
                        );
                        (DeliveryOutcome::Failed, failed_status(&e.to_string()))
                    }
                }
            };

            self.store.record(&job.task_id, outcome).await?;
            if let Err(e) = self
                .journal
                .append(&recipient.email, &job.category, &job.subject, &status)
                .await
            {
                warn!("Failed to journal delivery to {}: {:?}", recipient.email, e);
            }

            if !self.interval.is_zero() {
                tokio::time::sleep(self.interval).await;
            }
        }

        self.store.finish(&job.task_id).await?;
        info!("Task {} finished", job.task_id);
        Ok(())
    }
}
