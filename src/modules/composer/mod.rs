// Copyright © 2025 rustmailer.com
// Licensed under RustMailer License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use crate::modules::catalog::{Product, ProductView, PRODUCTS};
use crate::modules::composer::personalize::{ensure_greeting, has_greeting, mark, RECIPIENT_MARKER};
use crate::modules::composer::sanitizer::{looks_like_page, strip_page_chrome};
use crate::modules::composer::stylizer::MediaAssets;
use crate::modules::error::CampaignResult;
use crate::modules::template::{
    sender_or_brand, Branding, BulkPage, DefaultPage, EventPage, GreetingPage, Layout,
    ProductPage, Templates,
};

pub mod fragment;
pub mod inliner;
pub mod personalize;
pub mod preview;
pub mod sanitizer;
pub mod skeleton;
pub mod stylizer;
pub mod validator;


pub const DEFAULT_SUBJECT: &str = "Update from EduAI";
pub const DEFAULT_EVENT_LOCATION: &str = "LIVE ON ZOOM";
pub const DEFAULT_EVENT_CTA_TEXT: &str = "Register";
pub const DEFAULT_EVENT_CTA_LINK: &str = "#";
pub const EVENT_FOOTER: &str =
    "Solving complex business problems with intelligent automation solutions";

#[derive(Clone, Debug, Default)]
pub struct EventDetails {
    pub date: String,
    pub time: String,
    pub location: String,
    pub cta_text: String,
    pub cta_link: String,
}

/// Sections of a greeting email, each already an HTML fragment.
#[derive(Clone, Debug, Default)]
pub struct GreetingSections {
    pub hook: String,
    pub greeting: String,
    pub main_body: String,
    pub closing: String,
}

#[derive(Clone, Debug)]
pub enum TemplateKind {
    Event(EventDetails),
    Greeting(GreetingSections),
    Product {
        product: &'static Product,
        hook: String,
        note: String,
    },
    Bulk {
        intro: String,
    },
}

#[derive(Clone, Debug)]
pub enum ComposeKind {
    DefaultSkeleton,
    UserSkeleton { html: String, css: Option<String> },
    NamedTemplate(TemplateKind),
}

#[derive(Clone, Debug, Default)]
pub struct ComposeInput {
    /// Body fragment; unused by the product and bulk layouts.
    pub fragment: String,
    pub subject: String,
    pub sender_name: String,
    pub assets: MediaAssets,
}

/// Generic HTML plus the marker to replace per recipient, if any.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ComposedEmail {
    pub html: String,
    pub marker: Option<String>,
}

impl ComposedEmail {
    fn new(html: String) -> Self {
        let marker = html
            .contains(RECIPIENT_MARKER)
            .then(|| RECIPIENT_MARKER.to_string());
        Self { html, marker }
    }
}

fn or_default(value: &str, default: &str) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        default.to_string()
    } else {
        trimmed.to_string()
    }
}

fn clean_section(section: &str) -> String {
    let section = if looks_like_page(section) {
        strip_page_chrome(section)
    } else {
        section.to_string()
    };
    mark(&section)
}

/// Builds the generic (not yet personalized) email for one layout.
pub fn compose(kind: &ComposeKind, input: &ComposeInput) -> CampaignResult<ComposedEmail> {
    let subject = or_default(&input.subject, DEFAULT_SUBJECT);
    let html = match kind {
        ComposeKind::DefaultSkeleton => Templates::render(
            Layout::Default,
            &DefaultPage {
                branding: Branding::default(),
                subject,
                sender_name: sender_or_brand(&input.sender_name),
                gif_url: input.assets.animated_gif.clone(),
                fragment: fragment::wrap(&ensure_greeting(&input.fragment)),
            },
        )?,
        ComposeKind::UserSkeleton { html, css } => {
            let body = fragment::wrap(&ensure_greeting(&input.fragment));
            skeleton::with_stylesheet(&skeleton::inject(html, &body), css.as_deref())
        }
        ComposeKind::NamedTemplate(TemplateKind::Event(event)) => Templates::render(
            Layout::Event,
            &EventPage {
                branding: Branding::default(),
                title: subject,
                event_date: event.date.trim().to_string(),
                event_time: event.time.trim().to_string(),
                event_location: or_default(&event.location, DEFAULT_EVENT_LOCATION),
                cta_text: or_default(&event.cta_text, DEFAULT_EVENT_CTA_TEXT),
                cta_link: or_default(&event.cta_link, DEFAULT_EVENT_CTA_LINK),
                sender_name: sender_or_brand(&input.sender_name),
                footer_text: EVENT_FOOTER.into(),
                gif_url: input.assets.animated_gif.clone(),
                fragment: fragment::wrap(&ensure_greeting(&input.fragment)),
            },
        )?,
        ComposeKind::NamedTemplate(TemplateKind::Greeting(sections)) => {
            let greeting = clean_section(&sections.greeting);
            let main_body = clean_section(if sections.main_body.trim().is_empty() {
                &input.fragment
            } else {
                &sections.main_body
            });
            let closing = clean_section(&sections.closing);
            let salutation = (!has_greeting(&greeting) && !has_greeting(&main_body))
                .then(|| RECIPIENT_MARKER.to_string());
            Templates::render(
                Layout::Greeting,
                &GreetingPage {
                    branding: Branding::default(),
                    hook: sections.hook.trim().to_string(),
                    salutation,
                    greeting,
                    main_body,
                    closing,
                    sender_name: sender_or_brand(&input.sender_name),
                },
            )?
        }
        ComposeKind::NamedTemplate(TemplateKind::Product {
            product,
            hook,
            note,
        }) => Templates::render(
            Layout::Product,
            &ProductPage {
                branding: Branding::default(),
                product: ProductView::from(*product),
                hook: hook.trim().to_string(),
                note: note.trim().to_string(),
                sender_name: sender_or_brand(&input.sender_name),
            },
        )?,
        ComposeKind::NamedTemplate(TemplateKind::Bulk { intro }) => Templates::render(
            Layout::Bulk,
            &BulkPage {
                branding: Branding::default(),
                products: PRODUCTS.iter().map(ProductView::from).collect(),
                intro: intro.trim().to_string(),
                banner_url: PRODUCTS
                    .iter()
                    .map(|p| p.image_url)
                    .find(|url| !url.is_empty())
                    .map(String::from),
                sender_name: sender_or_brand(&input.sender_name),
            },
        )?,
    };

    // Product and bulk mailers are not personalized even if copy mentions the token.
    match kind {
        ComposeKind::NamedTemplate(TemplateKind::Product { .. })
        | ComposeKind::NamedTemplate(TemplateKind::Bulk { .. }) => Ok(ComposedEmail {
            html,
            marker: None,
        }),
        _ => Ok(ComposedEmail::new(html)),
    }
}
