// Copyright © 2025 rustmailer.com
// Licensed under RustMailer License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use crate::modules::campaign::drafts::DRAFT_CACHE;
use crate::modules::campaign::payload::{
    BulkCampaign, Campaign, CampaignPreview, CustomCampaign, EventCampaign, GreetingCampaign,
    ProductCampaign, SendPreviewRequest, SendRequest, SendResponse,
};
use crate::modules::catalog::{self, Product};
use crate::modules::composer::inliner::{inline_or_original, CssInliner};
use crate::modules::composer::personalize::{
    personalize, PARAGRAPH_STYLE, RECIPIENT_MARKER, RECIPIENT_TOKEN,
};
use crate::modules::composer::preview::Preheader;
use crate::modules::composer::sanitizer::sanitize_field;
use crate::modules::composer::stylizer::MediaAssets;
use crate::modules::composer::validator::{has_meaningful_body, is_substantial_description};
use crate::modules::composer::{
    compose, ComposeInput, ComposeKind, ComposedEmail, EventDetails, GreetingSections,
    TemplateKind, DEFAULT_SUBJECT,
};
use crate::modules::error::code::ErrorCode;
use crate::modules::error::{CampaignError, CampaignResult};
use crate::modules::llm::greeting;
use crate::modules::llm::rewrite::{pain_first, structure_only};
use crate::modules::llm::TextGenerator;
use crate::modules::recipients::{split_invalid, Recipient, RecipientInput};
use crate::modules::settings::cli::SETTINGS;
use crate::modules::settings::dir::DATA_DIR_MANAGER;
use crate::modules::smtp::manager::SmtpConfig;
use crate::modules::smtp::transport::{OutgoingEmail, Transport};
use crate::modules::tasks::attachment::{remove_staging, stage};
use crate::modules::tasks::processor::SendQueue;
use crate::modules::tasks::store::TaskStore;
use crate::modules::tasks::worker::SendJob;
use crate::modules::tasks::TASK_STORE;
use crate::{raise_error, validate_email};
use std::path::Path;
use std::sync::Arc;
use tracing::{error, info};

pub const CUSTOM_CATEGORY: &str = "custom";
pub const EVENT_CATEGORY: &str = "event";
pub const BULK_CATEGORY: &str = "bulk";
pub const BULK_SUBJECT: &str = "Explore EduAIHub - AI tools for classrooms";
pub const PREVIEW_SUBJECT: &str = "Preview - EduAI";

const EMPTY_BODY: &str = "Message appears to be empty or contains only a greeting, header or footer. Please add at least 5 words of body text.";

/// A composed campaign that is not yet personalized.
#[derive(Clone, Debug)]
pub struct Draft {
    pub subject: String,
    pub category: String,
    pub sender_name: String,
    pub email: ComposedEmail,
    /// Copy judged by the body-presence gate.
    pub content: String,
    pub preheader: Option<String>,
    pub via_model: bool,
    pub warnings: Vec<String>,
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(String::from)
}

fn require_description(description: &str) -> CampaignResult<String> {
    let description = sanitize_field(description);
    if description.is_empty() {
        return Err(raise_error!(
            "Please provide a message in the description field.".into(),
            ErrorCode::InvalidParameter
        ));
    }
    if !is_substantial_description(&description) {
        return Err(raise_error!(
            "Message is too short. Please provide at least 5 words of content (greetings alone are not sufficient).".into(),
            ErrorCode::InvalidParameter
        ));
    }
    Ok(description)
}

fn optional_product(key: Option<&str>, warnings: &mut Vec<String>) -> Option<&'static Product> {
    let key = non_empty(key)?;
    let product = catalog::resolve(&key);
    if product.is_none() {
        warnings.push(format!("Unknown product '{}' was ignored.", key));
    }
    product
}

/// Text the body gate should see: the fragment without personalization tokens.
fn gate_text(fragment: &str) -> String {
    fragment
        .replace(RECIPIENT_TOKEN, "")
        .replace(RECIPIENT_MARKER, "")
}

fn closing_note(note: Option<&str>) -> String {
    non_empty(note)
        .map(|note| {
            format!(
                "<p style=\"{PARAGRAPH_STYLE}\">{}</p>",
                html_escape::encode_text(&sanitize_field(&note))
            )
        })
        .unwrap_or_default()
}

impl Campaign {
    pub fn recipients(&self) -> &RecipientInput {
        match self {
            Campaign::Custom(c) => &c.recipients,
            Campaign::Event(c) => &c.recipients,
            Campaign::Greeting(c) => &c.recipients,
            Campaign::Product(c) => &c.recipients,
            Campaign::Bulk(c) => &c.recipients,
        }
    }

    fn recipients_mut(&mut self) -> &mut RecipientInput {
        match self {
            Campaign::Custom(c) => &mut c.recipients,
            Campaign::Event(c) => &mut c.recipients,
            Campaign::Greeting(c) => &mut c.recipients,
            Campaign::Product(c) => &mut c.recipients,
            Campaign::Bulk(c) => &mut c.recipients,
        }
    }

    pub fn without_recipients(&self) -> Campaign {
        let mut content = self.clone();
        *content.recipients_mut() = RecipientInput::default();
        content
    }

    /// Writes, formats and composes the campaign's generic email.
    pub async fn draft<G: TextGenerator>(&self, generator: Option<&G>) -> CampaignResult<Draft> {
        match self {
            Campaign::Custom(c) => c.draft(generator).await,
            Campaign::Event(c) => c.draft(generator).await,
            Campaign::Greeting(c) => c.draft(generator).await,
            Campaign::Product(c) => c.draft(),
            Campaign::Bulk(c) => c.draft(),
        }
    }
}

impl CustomCampaign {
    async fn draft<G: TextGenerator>(&self, generator: Option<&G>) -> CampaignResult<Draft> {
        let description = require_description(&self.description)?;
        let mut warnings = Vec::new();
        let product = optional_product(self.product_key.as_deref(), &mut warnings);
        let assets = MediaAssets::from_settings();

        let rewrite = if self.marketing {
            pain_first(
                generator,
                &description,
                product,
                &assets,
                &SETTINGS.default_cta_link,
            )
            .await
        } else {
            structure_only(generator, &description).await
        };

        let subject = non_empty(self.subject.as_deref())
            .or_else(|| non_empty(rewrite.subject.as_deref()))
            .unwrap_or_else(|| DEFAULT_SUBJECT.into());
        let kind = match &self.skeleton {
            Some(skeleton) if !skeleton.html.trim().is_empty() => ComposeKind::UserSkeleton {
                html: skeleton.html.clone(),
                css: non_empty(skeleton.css.as_deref()),
            },
            _ => ComposeKind::DefaultSkeleton,
        };
        let sender_name = self.sender_name.clone().unwrap_or_default();
        let email = compose(
            &kind,
            &ComposeInput {
                fragment: rewrite.fragment.clone(),
                subject: subject.clone(),
                sender_name: sender_name.clone(),
                assets,
            },
        )?;

        Ok(Draft {
            subject,
            category: CUSTOM_CATEGORY.into(),
            sender_name,
            email,
            content: gate_text(&rewrite.fragment),
            preheader: non_empty(self.preheader.as_deref()),
            via_model: rewrite.via_model,
            warnings,
        })
    }
}

impl EventCampaign {
    async fn draft<G: TextGenerator>(&self, generator: Option<&G>) -> CampaignResult<Draft> {
        let description = require_description(&self.description)?;
        let rewrite = structure_only(generator, &description).await;
        let subject = non_empty(self.subject.as_deref())
            .or_else(|| non_empty(rewrite.subject.as_deref()))
            .unwrap_or_else(|| DEFAULT_SUBJECT.into());
        let sender_name = self.sender_name.clone().unwrap_or_default();
        let event = EventDetails {
            date: self.date.clone().unwrap_or_default(),
            time: self.time.clone().unwrap_or_default(),
            location: self.location.clone().unwrap_or_default(),
            cta_text: self.cta_text.clone().unwrap_or_default(),
            cta_link: self.cta_link.clone().unwrap_or_default(),
        };
        let email = compose(
            &ComposeKind::NamedTemplate(TemplateKind::Event(event)),
            &ComposeInput {
                fragment: rewrite.fragment.clone(),
                subject: subject.clone(),
                sender_name: sender_name.clone(),
                assets: MediaAssets::from_settings(),
            },
        )?;

        Ok(Draft {
            subject,
            category: EVENT_CATEGORY.into(),
            sender_name,
            email,
            content: gate_text(&rewrite.fragment),
            preheader: non_empty(self.preheader.as_deref()),
            via_model: rewrite.via_model,
            warnings: Vec::new(),
        })
    }
}

impl GreetingCampaign {
    async fn draft<G: TextGenerator>(&self, generator: Option<&G>) -> CampaignResult<Draft> {
        let mut warnings = Vec::new();
        let product = optional_product(self.product_key.as_deref(), &mut warnings);
        let assets = MediaAssets::from_settings();
        let note = closing_note(self.note.as_deref());

        let (suggested_subject, sections, via_model) =
            match non_empty(self.body.as_deref()).map(|body| sanitize_field(&body)) {
                None => {
                    let context = self.context.as_deref().unwrap_or_default();
                    let draft =
                        greeting::generate(generator, self.kind, context, product, &assets).await;
                    if generator.is_some() && !draft.via_model {
                        warnings.push(
                            "AI greeting generation is unavailable, a local pain-first draft was used."
                                .into(),
                        );
                    }
                    let mut sections = draft.sections;
                    if sections.closing.trim().is_empty() {
                        sections.closing = note;
                    }
                    (Some(draft.subject), sections, draft.via_model)
                }
                Some(body) => {
                    let rewrite = pain_first(
                        generator,
                        &body,
                        product,
                        &assets,
                        &SETTINGS.default_cta_link,
                    )
                    .await;
                    let sections = GreetingSections {
                        main_body: rewrite.fragment,
                        closing: note,
                        ..Default::default()
                    };
                    (rewrite.subject, sections, rewrite.via_model)
                }
            };

        let subject = non_empty(self.subject.as_deref())
            .or_else(|| non_empty(suggested_subject.as_deref()))
            .unwrap_or_else(|| self.kind.default_subject());
        let content = gate_text(&format!(
            "{}{}{}",
            sections.greeting, sections.main_body, sections.closing
        ));
        let sender_name = self.sender_name.clone().unwrap_or_default();
        let email = compose(
            &ComposeKind::NamedTemplate(TemplateKind::Greeting(sections)),
            &ComposeInput {
                subject: subject.clone(),
                sender_name: sender_name.clone(),
                assets,
                ..Default::default()
            },
        )?;

        Ok(Draft {
            subject,
            category: self.kind.category(),
            sender_name,
            email,
            content,
            preheader: non_empty(self.preheader.as_deref()),
            via_model,
            warnings,
        })
    }
}

impl ProductCampaign {
    fn draft(&self) -> CampaignResult<Draft> {
        let product = catalog::resolve(&self.product_key).ok_or_else(|| {
            raise_error!(
                format!("Unknown product '{}'", self.product_key),
                ErrorCode::InvalidParameter
            )
        })?;
        let subject = non_empty(self.subject.as_deref())
            .unwrap_or_else(|| format!("Discover {} - from EduAI", product.name));
        let sender_name = self.sender_name.clone().unwrap_or_default();
        let email = compose(
            &ComposeKind::NamedTemplate(TemplateKind::Product {
                product,
                hook: sanitize_field(self.hook.as_deref().unwrap_or_default()),
                note: sanitize_field(self.note.as_deref().unwrap_or_default()),
            }),
            &ComposeInput {
                subject: subject.clone(),
                sender_name: sender_name.clone(),
                ..Default::default()
            },
        )?;

        Ok(Draft {
            subject,
            category: format!("product-{}", product.key),
            sender_name,
            content: email.html.clone(),
            email,
            preheader: non_empty(self.preheader.as_deref()),
            via_model: false,
            warnings: Vec::new(),
        })
    }
}

impl BulkCampaign {
    fn draft(&self) -> CampaignResult<Draft> {
        let subject = non_empty(self.subject.as_deref()).unwrap_or_else(|| BULK_SUBJECT.into());
        let sender_name = self.sender_name.clone().unwrap_or_default();
        let email = compose(
            &ComposeKind::NamedTemplate(TemplateKind::Bulk {
                intro: sanitize_field(self.intro.as_deref().unwrap_or_default()),
            }),
            &ComposeInput {
                subject: subject.clone(),
                sender_name: sender_name.clone(),
                ..Default::default()
            },
        )?;

        Ok(Draft {
            subject,
            category: BULK_CATEGORY.into(),
            sender_name,
            content: email.html.clone(),
            email,
            preheader: non_empty(self.preheader.as_deref()),
            via_model: false,
            warnings: Vec::new(),
        })
    }
}

fn valid_recipients(input: &RecipientInput) -> CampaignResult<(Vec<Recipient>, Vec<String>)> {
    let (recipients, warnings) = split_invalid(input.resolve()?);
    if recipients.is_empty() {
        return Err(raise_error!(
            "None of the provided recipient addresses are valid".into(),
            ErrorCode::InvalidParameter
        ));
    }
    Ok((recipients, warnings))
}

fn with_preheader(html: String, preheader: Option<&str>) -> String {
    match preheader {
        Some(text) => Preheader::insert(&html, text),
        None => html,
    }
}

/// Renders exactly what the first recipient would receive.
pub async fn preview<G: TextGenerator>(
    campaign: &Campaign,
    generator: Option<&G>,
    inliner: &dyn CssInliner,
) -> CampaignResult<CampaignPreview> {
    let (recipients, mut warnings) = valid_recipients(campaign.recipients())?;
    let draft = campaign.draft(generator).await?;
    let draft_id = DRAFT_CACHE.insert(campaign, draft.clone());
    warnings.extend(draft.warnings);

    let first_name = recipients.first().map(|r| r.name.as_str()).unwrap_or_default();
    let html = personalize(&draft.email.html, draft.email.marker.as_deref(), first_name);
    let (html, inline_warning) = inline_or_original(inliner, &html, true);
    warnings.extend(inline_warning);

    let has_body = has_meaningful_body(&draft.content);
    if !has_body {
        warnings.push(EMPTY_BODY.into());
    }

    Ok(CampaignPreview {
        draft_id,
        subject: draft.subject,
        category: draft.category,
        html: with_preheader(html, draft.preheader.as_deref()),
        recipients,
        has_meaningful_body: has_body,
        via_model: draft.via_model,
        warnings,
    })
}

/// Validates the transport configuration, then composes and enqueues.
pub async fn send<G: TextGenerator>(
    request: SendRequest,
    generator: Option<&G>,
    inliner: &dyn CssInliner,
) -> CampaignResult<SendResponse> {
    if !request.dry_run {
        SmtpConfig::from_settings()?;
    }
    dispatch(request, generator, inliner, TASK_STORE.as_ref(), SendQueue::get()?).await
}

async fn abandon<S: TaskStore>(
    store: &S,
    task_id: &str,
    staging_dir: Option<&Path>,
    cause: &CampaignError,
) {
    if let Err(e) = store.fail(task_id, format!("{:?}", cause)).await {
        error!("Failed to mark task {} as failed: {:?}", task_id, e);
    }
    if let Some(dir) = staging_dir {
        remove_staging(dir).await;
    }
}

pub(crate) async fn dispatch<G: TextGenerator, S: TaskStore>(
    request: SendRequest,
    generator: Option<&G>,
    inliner: &dyn CssInliner,
    store: &S,
    queue: &SendQueue,
) -> CampaignResult<SendResponse> {
    let SendRequest {
        campaign,
        draft_id,
        attachments,
        dry_run,
    } = request;
    let (recipients, mut warnings) = valid_recipients(campaign.recipients())?;
    let draft = match draft_id.as_deref().map(str::trim).filter(|id| !id.is_empty()) {
        Some(id) => DRAFT_CACHE.get(id, &campaign)?,
        None => campaign.draft(generator).await?,
    };
    if !has_meaningful_body(&draft.content) {
        return Err(raise_error!(EMPTY_BODY.into(), ErrorCode::InvalidParameter));
    }
    warnings.extend(draft.warnings);

    let (html, inline_warning) = inline_or_original(inliner, &draft.email.html, false);
    warnings.extend(inline_warning);
    let email = ComposedEmail {
        html: with_preheader(html, draft.preheader.as_deref()),
        marker: draft.email.marker,
    };

    if dry_run {
        return Ok(SendResponse {
            task_id: None,
            dry_run: true,
            subject: draft.subject,
            category: draft.category,
            recipients,
            html: Some(email.html),
            warnings,
        });
    }

    let task = store.create(recipients.len() as u64).await?;
    let attachments = attachments.unwrap_or_default();
    let staging_dir =
        (!attachments.is_empty()).then(|| DATA_DIR_MANAGER.task_attachment_dir(&task.id));
    let staged = match &staging_dir {
        Some(dir) => match stage(dir, &attachments).await {
            Ok(staged) => staged,
            Err(e) => {
                abandon(store, &task.id, Some(dir), &e).await;
                return Err(e);
            }
        },
        None => Vec::new(),
    };

    let job = SendJob {
        task_id: task.id.clone(),
        recipients: recipients.clone(),
        email,
        subject: draft.subject.clone(),
        category: draft.category.clone(),
        sender_name: non_empty(Some(draft.sender_name.as_str())),
        attachments: Arc::from(staged),
        staging_dir: staging_dir.clone(),
    };
    if let Err(e) = queue.submit(job).await {
        abandon(store, &task.id, staging_dir.as_deref(), &e).await;
        return Err(e);
    }
    info!(
        "Queued task {} ({}) for {} recipients",
        task.id,
        draft.category,
        recipients.len()
    );

    Ok(SendResponse {
        task_id: Some(task.id),
        dry_run: false,
        subject: draft.subject,
        category: draft.category,
        recipients,
        html: None,
        warnings,
    })
}

/// Sends already previewed HTML to one test address.
pub async fn send_preview<T: Transport>(
    request: SendPreviewRequest,
    transport: &T,
    inliner: &dyn CssInliner,
) -> CampaignResult<String> {
    let to = request.to.trim().to_string();
    validate_email!(&to)?;
    if !has_meaningful_body(&request.html) {
        return Err(raise_error!(EMPTY_BODY.into(), ErrorCode::InvalidParameter));
    }
    let (html, _) = inline_or_original(inliner, &request.html, false);
    transport
        .send(OutgoingEmail {
            to: to.clone(),
            subject: non_empty(request.subject.as_deref())
                .unwrap_or_else(|| PREVIEW_SUBJECT.into()),
            html,
            sender_name: non_empty(request.sender_name.as_deref()),
            attachments: Arc::from(Vec::new()),
        })
        .await?;
    Ok(format!("Preview sent to {}", to))
}
