// Copyright © 2025 rustmailer.com
// Licensed under RustMailer License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use crate::modules::campaign::payload::{
    BulkCampaign, Campaign, CustomCampaign, GreetingCampaign, ProductCampaign,
    SendPreviewRequest, SendRequest, Skeleton,
};
use crate::modules::campaign::service::{dispatch, preview, send_preview, BULK_SUBJECT};
use crate::modules::composer::inliner::CssInlineEngine;
use crate::modules::composer::personalize::RECIPIENT_MARKER;
use crate::modules::error::code::ErrorCode;
use crate::modules::error::CampaignResult;
use crate::modules::llm::{ChatRequest, TextGenerator};
use crate::modules::journal::entity::DeliveryLog;
use crate::modules::journal::DeliveryJournal;
use crate::modules::llm::client::OpenAiClient;
use crate::modules::llm::greeting::GreetingKind;
use crate::modules::recipients::{Recipient, RecipientInput};
use crate::modules::smtp::transport::{OutgoingEmail, Transport};
use crate::modules::tasks::attachment::AttachmentPayload;
use crate::modules::tasks::model::TaskStatus;
use crate::modules::tasks::processor::SendQueue;
use crate::modules::tasks::store::{MemoryTaskStore, TaskStore};
use crate::modules::tasks::worker::Worker;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

const NO_MODEL: Option<&OpenAiClient> = None;
const DESCRIPTION: &str =
    "Grading takes me hours every week and I have no time for lesson planning.";

#[derive(Default)]
struct RecordingTransport {
    sent: Mutex<Vec<OutgoingEmail>>,
}

impl Transport for RecordingTransport {
    async fn send(&self, email: OutgoingEmail) -> CampaignResult<()> {
        self.sent.lock().unwrap().push(email);
        Ok(())
    }
}

/// Writes different copy on every call.
#[derive(Default)]
struct VaryingGenerator {
    calls: AtomicUsize,
}

impl TextGenerator for VaryingGenerator {
    async fn generate(&self, _: &ChatRequest) -> CampaignResult<String> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(format!(
            "<p>Version {call}: grading takes hours every week and lesson planning slips.</p>"
        ))
    }
}

struct NullJournal;

impl DeliveryJournal for NullJournal {
    async fn append(&self, _: &str, _: &str, _: &str, _: &str) -> CampaignResult<()> {
        Ok(())
    }

    async fn recent(&self, _: usize) -> CampaignResult<Vec<DeliveryLog>> {
        Ok(Vec::new())
    }
}

fn listed(recipients: &[(&str, &str)]) -> RecipientInput {
    RecipientInput {
        list: Some(
            recipients
                .iter()
                .map(|(email, name)| Recipient::new(*email, *name))
                .collect(),
        ),
        ..Default::default()
    }
}

fn custom(description: &str) -> CustomCampaign {
    CustomCampaign {
        recipients: listed(&[("asha@school.edu", "Asha"), ("ravi@school.edu", "Ravi")]),
        description: description.into(),
        ..Default::default()
    }
}

fn harness() -> (Arc<MemoryTaskStore>, Arc<RecordingTransport>, SendQueue) {
    let store = Arc::new(MemoryTaskStore::new());
    let transport = Arc::new(RecordingTransport::default());
    let worker = Worker::new(
        transport.clone(),
        store.clone(),
        Arc::new(NullJournal),
        Duration::ZERO,
    );
    (store, transport, SendQueue::new(worker, 2))
}

#[tokio::test]
async fn custom_preview_is_personalized_for_first_recipient() {
    let campaign = Campaign::Custom(custom(DESCRIPTION));
    let shown = preview(&campaign, NO_MODEL, &CssInlineEngine).await.unwrap();

    assert_eq!(shown.category, "custom");
    assert_eq!(shown.subject, "Update from EduAI");
    assert!(shown.has_meaningful_body);
    assert!(!shown.via_model);
    assert!(shown.html.contains("Hi Asha,"));
    assert!(!shown.html.contains(RECIPIENT_MARKER));
    assert!(shown.html.contains("Grading takes me hours every week"));
    assert_eq!(shown.recipients.len(), 2);
}

#[tokio::test]
async fn short_descriptions_are_rejected() {
    for description in ["", "Hi,", "Grading is slow."] {
        let campaign = Campaign::Custom(custom(description));
        let err = preview(&campaign, NO_MODEL, &CssInlineEngine)
            .await
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidParameter);
    }
}

#[tokio::test]
async fn invalid_addresses_become_warnings() {
    let mut campaign = custom(DESCRIPTION);
    campaign.recipients = listed(&[("not-an-address", "X"), ("asha@school.edu", "Asha")]);
    let shown = preview(&Campaign::Custom(campaign), NO_MODEL, &CssInlineEngine)
        .await
        .unwrap();
    assert_eq!(shown.recipients, vec![Recipient::new("asha@school.edu", "Asha")]);
    assert!(shown.warnings.iter().any(|w| w.contains("not-an-address")));

    let mut campaign = custom(DESCRIPTION);
    campaign.recipients = listed(&[("nope", "")]);
    assert!(preview(&Campaign::Custom(campaign), NO_MODEL, &CssInlineEngine)
        .await
        .is_err());
}

#[tokio::test]
async fn user_skeleton_receives_the_fragment() {
    let mut campaign = custom(DESCRIPTION);
    campaign.skeleton = Some(Skeleton {
        html: "<table><tr><td class=\"header\">Acme Header</td></tr><tr><td class=\"body\">old</td></tr></table>".into(),
        css: Some(".header{color:#123456}".into()),
    });
    let shown = preview(&Campaign::Custom(campaign), NO_MODEL, &CssInlineEngine)
        .await
        .unwrap();
    assert!(shown.html.contains("Acme Header"));
    assert!(!shown.html.contains(">old<"));
    assert_eq!(shown.html.matches("Grading takes me hours every week").count(), 1);
}

#[tokio::test]
async fn greeting_without_body_uses_local_draft() {
    let campaign = Campaign::Greeting(GreetingCampaign {
        recipients: listed(&[("asha@school.edu", "Asha")]),
        kind: GreetingKind::Thankyou,
        product_key: Some("vidya_hub".into()),
        note: Some("See you at the next workshop!".into()),
        ..Default::default()
    });
    let shown = preview(&campaign, NO_MODEL, &CssInlineEngine).await.unwrap();
    assert_eq!(shown.subject, "Thankyou from EduAI");
    assert_eq!(shown.category, "greeting-thankyou");
    assert!(shown.html.contains("Overwhelming administrative workload"));
    assert!(shown.html.contains("See you at the next workshop!"));
    assert!(shown.html.contains("Asha"));
    assert!(shown.warnings.is_empty());
}

#[tokio::test]
async fn product_and_bulk_defaults() {
    let product = Campaign::Product(ProductCampaign {
        recipients: listed(&[("asha@school.edu", "")]),
        product_key: "Vidya Hub".into(),
        ..Default::default()
    });
    let preview_product = preview(&product, NO_MODEL, &CssInlineEngine).await.unwrap();
    assert_eq!(preview_product.subject, "Discover Vidya Hub - from EduAI");
    assert_eq!(preview_product.category, "product-vidya_hub");

    let unknown = Campaign::Product(ProductCampaign {
        recipients: listed(&[("asha@school.edu", "")]),
        product_key: "chalkboard".into(),
        ..Default::default()
    });
    assert!(preview(&unknown, NO_MODEL, &CssInlineEngine).await.is_err());

    let bulk = Campaign::Bulk(BulkCampaign {
        recipients: listed(&[("asha@school.edu", "")]),
        intro: Some("Three tools for your classroom.".into()),
        ..Default::default()
    });
    let preview_bulk = preview(&bulk, NO_MODEL, &CssInlineEngine).await.unwrap();
    assert_eq!(preview_bulk.subject, BULK_SUBJECT);
    assert_eq!(preview_bulk.category, "bulk");
    for name in ["Class Tom", "Vidya Hub", "AI Viz Lab"] {
        assert!(preview_bulk.html.contains(name));
    }
}

#[tokio::test]
async fn dry_run_creates_no_task() {
    let (store, transport, queue) = harness();
    let request = SendRequest {
        campaign: Campaign::Custom(custom(DESCRIPTION)),
        draft_id: None,
        attachments: None,
        dry_run: true,
    };
    let response = dispatch(request, NO_MODEL, &CssInlineEngine, store.as_ref(), &queue)
        .await
        .unwrap();

    assert!(response.dry_run);
    assert!(response.task_id.is_none());
    assert_eq!(response.recipients.len(), 2);
    let html = response.html.unwrap();
    assert!(html.contains(RECIPIENT_MARKER));
    assert_eq!(store.len(), 0);
    assert!(transport.sent.lock().unwrap().is_empty());
}

#[tokio::test]
async fn send_runs_in_background_and_cleans_attachments() {
    let (store, transport, queue) = harness();
    let request = SendRequest {
        campaign: Campaign::Custom(custom(DESCRIPTION)),
        draft_id: None,
        attachments: Some(vec![AttachmentPayload {
            file_name: "plan.txt".into(),
            content: "aGVsbG8=".into(),
            ..Default::default()
        }]),
        dry_run: false,
    };
    let response = dispatch(request, NO_MODEL, &CssInlineEngine, store.as_ref(), &queue)
        .await
        .unwrap();
    let task_id = response.task_id.unwrap();

    let mut record = store.get(&task_id).await.unwrap().unwrap();
    for _ in 0..200 {
        if record.status.is_terminal() {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
        record = store.get(&task_id).await.unwrap().unwrap();
    }
    assert_eq!(record.status, TaskStatus::Done);
    assert_eq!((record.sent, record.failed), (2, 0));

    let sent = transport.sent.lock().unwrap();
    assert!(sent[0].html.contains("Hi Asha,"));
    assert!(sent[1].html.contains("Hi Ravi,"));
    assert_eq!(sent[0].attachments.len(), 1);
    assert_eq!(sent[0].subject, "Update from EduAI");
}

#[tokio::test]
async fn empty_custom_copy_never_reaches_the_queue() {
    let (store, _transport, queue) = harness();
    let request = SendRequest {
        campaign: Campaign::Custom(custom("Hi")),
        draft_id: None,
        attachments: None,
        dry_run: false,
    };
    assert!(
        dispatch(request, NO_MODEL, &CssInlineEngine, store.as_ref(), &queue)
            .await
            .is_err()
    );
    assert_eq!(store.len(), 0);
}

#[tokio::test]
async fn preview_send_goes_to_one_address() {
    let transport = RecordingTransport::default();
    let html = "<html><body><p>Grading takes me hours every week and I need help.</p></body></html>";
    let message = send_preview(
        SendPreviewRequest {
            to: " tester@school.edu ".into(),
            html: html.into(),
            ..Default::default()
        },
        &transport,
        &CssInlineEngine,
    )
    .await
    .unwrap();
    assert_eq!(message, "Preview sent to tester@school.edu");
    let sent = transport.sent.lock().unwrap();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].subject, "Preview - EduAI");

    let bad = send_preview(
        SendPreviewRequest {
            to: "broken".into(),
            html: html.into(),
            ..Default::default()
        },
        &transport,
        &CssInlineEngine,
    )
    .await;
    assert!(bad.is_err());
}

#[tokio::test]
async fn send_delivers_the_previewed_copy() {
    let generator = VaryingGenerator::default();
    let campaign = Campaign::Custom(custom(DESCRIPTION));
    let shown = preview(&campaign, Some(&generator), &CssInlineEngine)
        .await
        .unwrap();
    assert!(shown.via_model);
    assert!(shown.html.contains("Version 0:"));

    let (store, _transport, queue) = harness();
    let mut later = custom(DESCRIPTION);
    later.recipients = listed(&[("meera@school.edu", "Meera")]);
    let request = SendRequest {
        campaign: Campaign::Custom(later),
        draft_id: Some(shown.draft_id.clone()),
        attachments: None,
        dry_run: true,
    };
    let response = dispatch(request, Some(&generator), &CssInlineEngine, store.as_ref(), &queue)
        .await
        .unwrap();
    let html = response.html.unwrap();
    assert!(html.contains("Version 0:"));
    assert!(!html.contains("Version 1:"));
    assert_eq!(response.recipients, vec![Recipient::new("meera@school.edu", "Meera")]);
    assert_eq!(generator.calls.load(Ordering::SeqCst), 1);

    let mut edited = custom("Lesson planning eats my whole weekend and grading never ends.");
    edited.recipients = listed(&[("meera@school.edu", "Meera")]);
    let stale = SendRequest {
        campaign: Campaign::Custom(edited),
        draft_id: Some(shown.draft_id),
        attachments: None,
        dry_run: true,
    };
    let err = dispatch(stale, Some(&generator), &CssInlineEngine, store.as_ref(), &queue)
        .await
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::InvalidParameter);
}
