// Copyright © 2025 rustmailer.com
// Licensed under RustMailer License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use crate::modules::catalog;
use crate::modules::composer::stylizer::MediaAssets;
use crate::modules::error::code::ErrorCode;
use crate::modules::error::CampaignResult;
use crate::modules::llm::greeting::{self, GreetingKind};
use crate::modules::llm::rewrite::{pain_first, structure_only};
use crate::modules::llm::{ChatRequest, TextGenerator};
use crate::raise_error;
use std::sync::Mutex;

/// Replies with canned text, or fails when none is set, recording each request.
#[derive(Default)]
struct ScriptedGenerator {
    reply: Option<String>,
    requests: Mutex<Vec<ChatRequest>>,
}

impl ScriptedGenerator {
    fn replying(text: &str) -> Self {
        Self {
            reply: Some(text.to_string()),
            ..Default::default()
        }
    }

    fn failing() -> Self {
        Self::default()
    }

    fn last_request(&self) -> ChatRequest {
        self.requests.lock().unwrap().last().cloned().unwrap()
    }
}

impl TextGenerator for ScriptedGenerator {
    async fn generate(&self, request: &ChatRequest) -> CampaignResult<String> {
        self.requests.lock().unwrap().push(request.clone());
        self.reply.clone().ok_or_else(|| {
            raise_error!("service unavailable".into(), ErrorCode::LlmRequestFailed)
        })
    }
}

const NO_MODEL: Option<&ScriptedGenerator> = None;

#[tokio::test]
async fn structure_without_model_is_local() {
    let rewrite = structure_only(NO_MODEL, "Hi Team,\n\nGrading takes hours. We help.").await;
    assert!(!rewrite.via_model);
    assert_eq!(rewrite.subject, None);
    assert!(rewrite.fragment.contains("Hi [[RECIPIENT_NAME]],"));
    assert!(rewrite.fragment.contains("<strong>Grading takes hours.</strong>"));
}

#[tokio::test]
async fn structure_uses_model_output_and_subject() {
    let model = ScriptedGenerator::replying(
        "Subject: Hours back every week\n<p>Dear Ms. Rao,</p><p><strong>Grading takes hours.</strong></p>",
    );
    let rewrite = structure_only(Some(&model), "Dear Ms. Rao,\nGrading takes hours.").await;
    assert!(rewrite.via_model);
    assert_eq!(rewrite.subject.as_deref(), Some("Hours back every week"));
    assert!(rewrite.fragment.starts_with("<p>Dear [[RECIPIENT_NAME]],</p>"));

    let request = model.last_request();
    assert_eq!(request.temperature, 0.0);
    assert_eq!(request.max_tokens, 400);
    assert!(request.user.contains("Original message:\nDear Ms. Rao,"));
}

#[tokio::test]
async fn echoed_instructions_fall_back_to_local() {
    let model = ScriptedGenerator::replying(
        "You are a professional email formatter for EduAIHub.\nDo NOT change the user's words",
    );
    let rewrite = structure_only(Some(&model), "Short note about grading help.").await;
    assert!(!rewrite.via_model);
    assert!(rewrite.fragment.contains("<strong>Short note about grading help.</strong>"));
}

#[tokio::test]
async fn plain_model_output_is_wrapped_locally() {
    let model = ScriptedGenerator::replying("Grading takes hours. We help.\n\nTry it today.");
    let rewrite = structure_only(Some(&model), "anything").await;
    assert!(rewrite.via_model);
    assert_eq!(rewrite.fragment.matches("<p style=").count(), 2);
}

#[tokio::test]
async fn pain_first_falls_back_to_stylizer() {
    let model = ScriptedGenerator::failing();
    let product = catalog::find("class_tom");
    let rewrite = pain_first(
        Some(&model),
        "Smart classrooms cost too much.",
        product,
        &MediaAssets::default(),
        "https://demo.test",
    )
    .await;
    assert!(!rewrite.via_model);
    assert!(rewrite.fragment.contains("Smart classrooms cost too much. — for Class Tom."));
    assert!(model.last_request().user.contains("Known pains: Lack of affordable smart classroom solutions"));
}

#[tokio::test]
async fn pain_first_parses_subject_and_body() {
    let model = ScriptedGenerator::replying(
        "Subject: Stop drowning in grading\nBody:\n<p>Grading eats weekends.</p>\n<p>We give them back.</p>\nRegards, EduAIHub",
    );
    let rewrite = pain_first(
        Some(&model),
        "grading",
        None,
        &MediaAssets::default(),
        "https://demo.test",
    )
    .await;
    assert!(rewrite.via_model);
    assert_eq!(rewrite.subject.as_deref(), Some("Stop drowning in grading"));
    assert!(rewrite.fragment.contains("Grading eats weekends."));
    assert!(!rewrite.fragment.contains("Regards"));
    assert!(rewrite.fragment.contains("Request a short demo"));
    assert_eq!(model.last_request().temperature, 0.6);
}

#[tokio::test]
async fn greeting_sections_from_model() {
    let model = ScriptedGenerator::replying(
        "Subject: Join our live demo\nHook: See AI grading in action\nGreeting: Dear Educator, we'd love to see you.\nMain Body:\nThe session runs Friday at 5pm.\nBring your questions.\nClosing: Reserve your seat today.",
    );
    let draft = greeting::generate(
        Some(&model),
        GreetingKind::Invitation,
        "Friday demo",
        None,
        &MediaAssets::default(),
    )
    .await;
    assert!(draft.via_model);
    assert_eq!(draft.subject, "Join our live demo");
    assert_eq!(draft.sections.hook, "See AI grading in action");
    assert_eq!(
        draft.sections.greeting,
        "<p style=\"margin:0 0 16px 0;\">Dear [[RECIPIENT_NAME]], we'd love to see you.</p>"
    );
    assert_eq!(draft.sections.main_body.matches("<p ").count(), 2);
    assert!(draft.sections.closing.contains("Reserve your seat today."));

    let request = model.last_request();
    assert_eq!(request.max_tokens, 600);
    assert_eq!(request.temperature, 0.65);
}

#[tokio::test]
async fn greeting_without_model_uses_product_pains() {
    let product = catalog::find("vidya_hub");
    let draft = greeting::generate(
        NO_MODEL,
        GreetingKind::Followup,
        "",
        product,
        &MediaAssets::default(),
    )
    .await;
    assert!(!draft.via_model);
    assert_eq!(draft.subject, "Followup from EduAI");
    assert!(draft.sections.greeting.is_empty());
    assert!(draft.sections.main_body.contains("Struggling with Overwhelming, Time-consuming?"));
    assert!(draft.sections.main_body.contains("Learn more about Vidya Hub"));
}

#[tokio::test]
async fn empty_model_sections_fall_back() {
    let model = ScriptedGenerator::replying("Subject: Only a subject");
    let draft = greeting::generate(
        Some(&model),
        GreetingKind::Onboarding,
        "",
        None,
        &MediaAssets::default(),
    )
    .await;
    assert!(!draft.via_model);
    assert_eq!(draft.subject, "Onboarding from EduAI");
}
