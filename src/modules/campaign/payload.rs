// Copyright © 2025 rustmailer.com
// Licensed under RustMailer License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use crate::modules::llm::greeting::GreetingKind;
use crate::modules::recipients::{Recipient, RecipientInput};
use crate::modules::tasks::attachment::AttachmentPayload;
use poem_openapi::{Object, Union};
use serde::{Deserialize, Serialize};

/// A user supplied page skeleton.
#[derive(Clone, Debug, Default, Eq, PartialEq, Deserialize, Serialize, Object)]
pub struct Skeleton {
    /// HTML containing a `td.body` cell or a `[[AI_BODY]]` token.
    pub html: String,
    /// Stylesheet placed in the page head.
    pub css: Option<String>,
}

/// Free-form message formatted into the default or a user skeleton.
#[derive(Clone, Debug, Default, Eq, PartialEq, Deserialize, Serialize, Object)]
pub struct CustomCampaign {
    pub recipients: RecipientInput,
    /// The message; at least five words besides a lone greeting.
    pub description: String,
    pub subject: Option<String>,
    pub sender_name: Option<String>,
    /// Catalog key or product name used for pain points.
    pub product_key: Option<String>,
    /// Rewrite as pain-first marketing copy instead of keeping the wording.
    #[oai(default)]
    #[serde(default)]
    pub marketing: bool,
    pub skeleton: Option<Skeleton>,
    /// Hidden inbox preview text.
    pub preheader: Option<String>,
}

/// Event announcement rendered through the event layout.
#[derive(Clone, Debug, Default, Eq, PartialEq, Deserialize, Serialize, Object)]
pub struct EventCampaign {
    pub recipients: RecipientInput,
    pub description: String,
    /// Also used as the event title.
    pub subject: Option<String>,
    pub sender_name: Option<String>,
    pub date: Option<String>,
    pub time: Option<String>,
    /// Defaults to `LIVE ON ZOOM`.
    pub location: Option<String>,
    pub cta_text: Option<String>,
    pub cta_link: Option<String>,
    pub preheader: Option<String>,
}

#[derive(Clone, Debug, Default, Eq, PartialEq, Deserialize, Serialize, Object)]
pub struct GreetingCampaign {
    pub recipients: RecipientInput,
    #[oai(default)]
    #[serde(default)]
    pub kind: GreetingKind,
    /// Message to style; when empty the whole email is generated.
    pub body: Option<String>,
    /// Meeting details or other context for generated emails.
    pub context: Option<String>,
    /// Closing line used with a supplied body.
    pub note: Option<String>,
    pub subject: Option<String>,
    pub sender_name: Option<String>,
    pub product_key: Option<String>,
    pub preheader: Option<String>,
}

/// One catalog product.
#[derive(Clone, Debug, Default, Eq, PartialEq, Deserialize, Serialize, Object)]
pub struct ProductCampaign {
    pub recipients: RecipientInput,
    pub product_key: String,
    /// Short line under the product name.
    pub hook: Option<String>,
    pub note: Option<String>,
    pub subject: Option<String>,
    pub sender_name: Option<String>,
    pub preheader: Option<String>,
}

/// The whole catalog in one email.
#[derive(Clone, Debug, Default, Eq, PartialEq, Deserialize, Serialize, Object)]
pub struct BulkCampaign {
    pub recipients: RecipientInput,
    pub intro: Option<String>,
    pub subject: Option<String>,
    pub sender_name: Option<String>,
    pub preheader: Option<String>,
}

#[derive(Clone, Debug, Eq, PartialEq, Deserialize, Serialize, Union)]
#[oai(discriminator_name = "type")]
pub enum Campaign {
    #[oai(mapping = "custom")]
    Custom(CustomCampaign),
    #[oai(mapping = "event")]
    Event(EventCampaign),
    #[oai(mapping = "greeting")]
    Greeting(GreetingCampaign),
    #[oai(mapping = "product")]
    Product(ProductCampaign),
    #[oai(mapping = "bulk")]
    Bulk(BulkCampaign),
}

#[derive(Clone, Debug, Deserialize, Serialize, Object)]
pub struct SendRequest {
    pub campaign: Campaign,
    /// `draft_id` from a preview of this campaign. The previewed copy is sent
    /// as shown; without it the campaign is written again.
    pub draft_id: Option<String>,
    pub attachments: Option<Vec<AttachmentPayload>>,
    /// Validate and compose without sending.
    #[oai(default)]
    #[serde(default)]
    pub dry_run: bool,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, Object)]
pub struct SendPreviewRequest {
    /// Single test address.
    pub to: String,
    /// Defaults to `Preview - EduAI`.
    pub subject: Option<String>,
    pub sender_name: Option<String>,
    /// HTML returned by a preview call.
    pub html: String,
}

#[derive(Clone, Debug, Default, Eq, PartialEq, Deserialize, Serialize, Object)]
pub struct CampaignPreview {
    /// Pass to `/campaign/send` to deliver exactly this copy.
    pub draft_id: String,
    pub subject: String,
    /// Log category a send of this campaign is recorded under.
    pub category: String,
    /// Page personalized for the first recipient, styles inlined.
    pub html: String,
    pub recipients: Vec<Recipient>,
    /// Result of the body-presence check; sends are refused when false.
    pub has_meaningful_body: bool,
    /// True when the language model wrote or formatted the copy.
    pub via_model: bool,
    pub warnings: Vec<String>,
}

#[derive(Clone, Debug, Default, Eq, PartialEq, Deserialize, Serialize, Object)]
pub struct SendResponse {
    /// Absent for dry runs.
    pub task_id: Option<String>,
    pub dry_run: bool,
    pub subject: String,
    pub category: String,
    /// Recipients that will be (or would be) sent to.
    pub recipients: Vec<Recipient>,
    /// Generic HTML, returned for dry runs only.
    pub html: Option<String>,
    pub warnings: Vec<String>,
}
