// Copyright © 2025 rustmailer.com
// Licensed under RustMailer License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use crate::modules::composer::personalize::RECIPIENT_MARKER;
use crate::modules::composer::ComposedEmail;
use crate::modules::error::code::ErrorCode;
use crate::modules::error::CampaignResult;
use crate::modules::journal::entity::DeliveryLog;
use crate::modules::journal::{DeliveryJournal, STATUS_SENT, STATUS_SKIPPED_EMPTY_BODY};
use crate::modules::recipients::Recipient;
use crate::modules::smtp::transport::{OutgoingEmail, Transport};
use crate::modules::tasks::model::{TaskRecord, TaskStatus};
use crate::modules::tasks::processor::SendQueue;
use crate::modules::tasks::store::{MemoryTaskStore, TaskStore};
use crate::modules::tasks::worker::{SendJob, Worker};
use crate::raise_error;
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Default)]
struct FakeTransport {
    reject: Vec<String>,
    panic_on: Option<String>,
    delivered: Mutex<Vec<OutgoingEmail>>,
}

impl Transport for FakeTransport {
    async fn send(&self, email: OutgoingEmail) -> CampaignResult<()> {
        if self.panic_on.as_deref() == Some(email.to.as_str()) {
            panic!("transport exploded");
        }
        if self.reject.contains(&email.to) {
            return Err(raise_error!(
                "550 mailbox unavailable".into(),
                ErrorCode::SmtpCommandFailed
            ));
        }
        self.delivered.lock().unwrap().push(email);
        Ok(())
    }
}

#[derive(Default)]
struct FakeJournal {
    entries: Mutex<Vec<DeliveryLog>>,
}

impl FakeJournal {
    fn statuses(&self) -> Vec<(String, String)> {
        self.entries
            .lock()
            .unwrap()
            .iter()
            .map(|e| (e.email.clone(), e.status.clone()))
            .collect()
    }
}

impl DeliveryJournal for FakeJournal {
    async fn append(
        &self,
        email: &str,
        category: &str,
        subject: &str,
        status: &str,
    ) -> CampaignResult<()> {
        self.entries
            .lock()
            .unwrap()
            .push(DeliveryLog::new(email, category, subject, status));
        Ok(())
    }

    async fn recent(&self, limit: usize) -> CampaignResult<Vec<DeliveryLog>> {
        let entries = self.entries.lock().unwrap();
        Ok(entries.iter().rev().take(limit).cloned().collect())
    }
}

fn body() -> ComposedEmail {
    ComposedEmail {
        html: format!(
            "<p>Hi {RECIPIENT_MARKER},</p><p>Grading takes hours every week; Vidya Hub gives that time back to teachers.</p>"
        ),
        marker: Some(RECIPIENT_MARKER.to_string()),
    }
}

fn recipients(emails: &[(&str, &str)]) -> Vec<Recipient> {
    emails.iter().map(|(e, n)| Recipient::new(*e, *n)).collect()
}

async fn job(store: &MemoryTaskStore, recipients: Vec<Recipient>, email: ComposedEmail) -> SendJob {
    let task = store.create(recipients.len() as u64).await.unwrap();
    SendJob {
        task_id: task.id,
        recipients,
        email,
        subject: "Less grading, more teaching".into(),
        category: "custom".into(),
        sender_name: Some("Team EduAI".into()),
        attachments: Arc::from(Vec::new()),
        staging_dir: None,
    }
}

fn worker(
    transport: FakeTransport,
) -> (
    Worker<FakeTransport, MemoryTaskStore, FakeJournal>,
    Arc<MemoryTaskStore>,
    Arc<FakeJournal>,
    Arc<FakeTransport>,
) {
    let transport = Arc::new(transport);
    let store = Arc::new(MemoryTaskStore::new());
    let journal = Arc::new(FakeJournal::default());
    let worker = Worker::new(transport.clone(), store.clone(), journal.clone(), Duration::ZERO);
    (worker, store, journal, transport)
}

async fn wait_for_terminal(store: &MemoryTaskStore, id: &str) -> TaskRecord {
    for _ in 0..200 {
        let record = store.get(id).await.unwrap().unwrap();
        if record.status.is_terminal() {
            return record;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("task {id} never reached a terminal status");
}

#[tokio::test]
async fn failures_are_counted_and_the_rest_still_send() {
    let (worker, store, journal, transport) = worker(FakeTransport {
        reject: vec!["bounce@school.edu".into()],
        ..Default::default()
    });
    let job = job(
        &store,
        recipients(&[
            ("asha@school.edu", "Asha"),
            ("bounce@school.edu", "Ravi"),
            ("meera@school.edu", ""),
        ]),
        body(),
    )
    .await;

    worker.run(&job).await.unwrap();

    let record = store.get(&job.task_id).await.unwrap().unwrap();
    assert_eq!(record.status, TaskStatus::Done);
    assert_eq!((record.sent, record.failed, record.remaining()), (2, 1, 0));

    let delivered = transport.delivered.lock().unwrap();
    assert!(delivered[0].html.contains("Hi Asha,"));
    assert!(delivered[1].html.contains("Hi Educator,"));
    assert!(delivered.iter().all(|e| !e.html.contains(RECIPIENT_MARKER)));

    let statuses = journal.statuses();
    assert_eq!(statuses.len(), 3);
    assert_eq!(statuses[0].1, STATUS_SENT);
    assert!(statuses[1].1.starts_with("failed: "));
    assert!(statuses[1].1.contains("550"));
}

#[tokio::test]
async fn empty_bodies_are_skipped_not_sent() {
    let (worker, store, journal, transport) = worker(FakeTransport::default());
    let empty = ComposedEmail {
        html: format!("<p>Hi {RECIPIENT_MARKER},</p>"),
        marker: Some(RECIPIENT_MARKER.to_string()),
    };
    let job = job(
        &store,
        recipients(&[("a@school.edu", "A"), ("b@school.edu", "B")]),
        empty,
    )
    .await;

    worker.run(&job).await.unwrap();

    let record = store.get(&job.task_id).await.unwrap().unwrap();
    assert_eq!(record.status, TaskStatus::Done);
    assert_eq!((record.sent, record.failed), (0, 2));
    assert!(transport.delivered.lock().unwrap().is_empty());
    assert!(journal
        .statuses()
        .iter()
        .all(|(_, status)| status == STATUS_SKIPPED_EMPTY_BODY));
}

#[tokio::test]
async fn queued_job_runs_and_cleans_staging() {
    let (worker, store, _journal, _transport) = worker(FakeTransport::default());
    let queue = SendQueue::new(worker, 2);

    let staging = tempfile::tempdir().unwrap();
    let dir = staging.path().join("task");
    tokio::fs::create_dir_all(&dir).await.unwrap();
    tokio::fs::write(dir.join("0-flyer.pdf"), b"%PDF").await.unwrap();

    let mut job = job(&store, recipients(&[("a@school.edu", "A")]), body()).await;
    job.staging_dir = Some(dir.clone());
    let id = job.task_id.clone();
    queue.submit(job).await.unwrap();

    let record = wait_for_terminal(&store, &id).await;
    assert_eq!(record.status, TaskStatus::Done);
    assert_eq!(record.sent, 1);
    for _ in 0..100 {
        if !dir.exists() {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    assert!(!dir.exists());
}

#[tokio::test]
async fn worker_panic_marks_task_as_error() {
    let (worker, store, _journal, _transport) = worker(FakeTransport {
        panic_on: Some("b@school.edu".into()),
        ..Default::default()
    });
    let queue = SendQueue::new(worker, 1);
    let job = job(
        &store,
        recipients(&[("a@school.edu", "A"), ("b@school.edu", "B")]),
        body(),
    )
    .await;
    let id = job.task_id.clone();
    queue.submit(job).await.unwrap();

    let record = wait_for_terminal(&store, &id).await;
    assert_eq!(record.status, TaskStatus::Error);
    assert_eq!(record.sent, 1);
    assert!(record.error.unwrap().contains("Worker aborted"));
}

#[tokio::test]
async fn shutdown_waits_for_running_jobs() {
    let (worker, store, _journal, _transport) = worker(FakeTransport::default());
    let queue = SendQueue::new(worker, 1);
    let job = job(&store, recipients(&[("a@school.edu", "A")]), body()).await;
    let id = job.task_id.clone();
    queue.submit(job).await.unwrap();
    queue.shutdown().await;

    let record = wait_for_terminal(&store, &id).await;
    assert_eq!(record.status, TaskStatus::Done);
}
