// Copyright © 2025 rustmailer.com
// Licensed under RustMailer License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use crate::modules::catalog::Product;
use crate::modules::composer::personalize::RECIPIENT_TOKEN;
use crate::modules::composer::sanitizer::strip_page_chrome;
use crate::modules::composer::stylizer::{stylize, MediaAssets};
use crate::modules::composer::GreetingSections;
use crate::modules::llm::parse::parse_greeting;
use crate::modules::llm::rewrite::tokenize_greetings;
use crate::modules::llm::{ChatRequest, TextGenerator};
use poem_openapi::Enum;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::warn;

const GREETING_SYSTEM: &str = "You are a professional email writer for the education sector. Write clear, warm, and engaging emails with proper structure. Use a pain-first approach where relevant.";

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Deserialize, Serialize, Enum)]
#[oai(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum GreetingKind {
    Invitation,
    Thankyou,
    Onboarding,
    #[default]
    Followup,
}

impl GreetingKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            GreetingKind::Invitation => "invitation",
            GreetingKind::Thankyou => "thankyou",
            GreetingKind::Onboarding => "onboarding",
            GreetingKind::Followup => "followup",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            GreetingKind::Invitation => "Invitation",
            GreetingKind::Thankyou => "Thankyou",
            GreetingKind::Onboarding => "Onboarding",
            GreetingKind::Followup => "Followup",
        }
    }

    /// Delivery log category, e.g. `greeting-invitation`.
    pub fn category(&self) -> String {
        format!("greeting-{}", self.as_str())
    }

    pub fn default_subject(&self) -> String {
        format!("{} from EduAI", self.title())
    }

    fn prompt(&self, context: &str, pains: &str) -> String {
        let (ask, context_label, hook, greeting, main_body, closing) = match self {
            GreetingKind::Invitation => (
                "Write a professional invitation email.",
                "Meeting details",
                "compelling one-liner",
                "1-2 sentences greeting paragraph",
                "2-3 paragraphs with meeting details, purpose, and next steps",
                "1 sentence closing paragraph with call to action",
            ),
            GreetingKind::Thankyou => (
                "Write a warm thank-you email.",
                "Context",
                "heartfelt one-liner",
                "1-2 sentences greeting acknowledging their involvement",
                "2-3 paragraphs expressing gratitude, specific appreciation, and impact",
                "1 sentence closing with forward-looking sentiment",
            ),
            GreetingKind::Onboarding => (
                "Write a warm onboarding welcome email.",
                "Context",
                "welcoming one-liner",
                "1-2 sentences welcoming them",
                "2-3 paragraphs with welcome message, what to expect, next steps, and support offer",
                "1 sentence closing with encouragement",
            ),
            GreetingKind::Followup => (
                "Write a professional follow-up email.",
                "Context",
                "engaging one-liner",
                "1-2 sentences greeting",
                "2-3 paragraphs with follow-up message, key points, and proposed next steps",
                "1 sentence closing with call to action",
            ),
        };
        format!(
            "{ask} Recipient: {RECIPIENT_TOKEN} (keep this token exactly as written). {context_label}: {context}\n\
             {pains}\n\
             Format your response as:\n\
             Subject: <subject>\n\
             Hook: <{hook}>\n\
             Greeting: <{greeting}>\n\
             Main Body: <{main_body}>\n\
             Closing: <{closing}>"
        )
    }
}

impl fmt::Display for GreetingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A greeting email ready for the greeting layout.
#[derive(Clone, Debug, Default)]
pub struct GreetingDraft {
    pub subject: String,
    pub sections: GreetingSections,
    pub via_model: bool,
}

fn wrap_single(text: &str, margin: &str) -> String {
    let text = text.trim();
    if text.is_empty() {
        return String::new();
    }
    strip_page_chrome(&format!(
        "<p style=\"margin:{margin};\">{}</p>",
        text.replace('\n', "<br/>")
    ))
}

fn wrap_lines(text: &str) -> String {
    let paragraphs: String = text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| format!("<p style=\"margin:0 0 12px 0;\">{line}</p>"))
        .collect();
    strip_page_chrome(&paragraphs)
}

/// Pain-first copy used when no model is available, built from the
/// product's first two pains when there is one.
pub fn local_fallback_text(product: Option<&Product>) -> String {
    let pains: Vec<&str> = product
        .map(|p| p.pains.iter().take(2).copied().collect())
        .unwrap_or_default();
    if pains.is_empty() {
        return "Struggling with lesson planning and grading? Try EduAIHub's tools to save hours."
            .into();
    }
    let topics = pains
        .iter()
        .filter_map(|p| p.split_whitespace().next())
        .collect::<Vec<_>>()
        .join(", ");
    let details = pains
        .iter()
        .map(|p| format!("{p}."))
        .collect::<Vec<_>>()
        .join(" ");
    format!("Struggling with {topics}? {details} Try EduAIHub's tools to save time.")
}

fn local_draft(kind: GreetingKind, product: Option<&Product>, assets: &MediaAssets) -> GreetingDraft {
    GreetingDraft {
        subject: kind.default_subject(),
        sections: GreetingSections {
            main_body: stylize(&local_fallback_text(product), product, assets),
            ..Default::default()
        },
        via_model: false,
    }
}

/// Writes a complete greeting email of the given kind. Falls back to the
/// local pain-first copy when the model is absent, fails, or returns no
/// usable sections.
pub async fn generate<G: TextGenerator>(
    generator: Option<&G>,
    kind: GreetingKind,
    context: &str,
    product: Option<&Product>,
    assets: &MediaAssets,
) -> GreetingDraft {
    let Some(generator) = generator else {
        return local_draft(kind, product, assets);
    };

    let pains = product
        .filter(|p| !p.pains.is_empty())
        .map(|p| {
            format!(
                "Product: {}. Known pains: {}. Use these pains in the introduction where relevant.",
                p.name,
                p.pains.join(", ")
            )
        })
        .unwrap_or_default();
    let request = ChatRequest::new(GREETING_SYSTEM, kind.prompt(context.trim(), &pains))
        .max_tokens(600)
        .temperature(0.65);

    let text = match generator.generate(&request).await {
        Ok(text) => text,
        Err(e) => {
            warn!("Greeting generation failed, using local fallback: {e}");
            return local_draft(kind, product, assets);
        }
    };

    let parsed = parse_greeting(&text);
    if parsed.greeting.trim().is_empty() && parsed.main_body.trim().is_empty() {
        warn!("Greeting generation returned no sections, using local fallback");
        return local_draft(kind, product, assets);
    }

    let subject = parsed.subject.unwrap_or_else(|| kind.default_subject());
    GreetingDraft {
        sections: GreetingSections {
            hook: parsed.hook.unwrap_or_else(|| subject.clone()),
            greeting: wrap_single(&tokenize_greetings(&parsed.greeting), "0 0 16px 0"),
            main_body: wrap_lines(&parsed.main_body),
            closing: wrap_single(&parsed.closing, "0 0 16px 0"),
        },
        subject,
        via_model: true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::catalog;

    #[test]
    fn kind_names() {
        assert_eq!(GreetingKind::Thankyou.category(), "greeting-thankyou");
        assert_eq!(GreetingKind::Invitation.default_subject(), "Invitation from EduAI");
        assert_eq!(GreetingKind::default(), GreetingKind::Followup);
    }

    #[test]
    fn fallback_uses_first_two_pains() {
        let product = catalog::find("vidya_hub").unwrap();
        assert_eq!(
            local_fallback_text(Some(product)),
            "Struggling with Overwhelming, Time-consuming? Overwhelming administrative workload for teachers. Time-consuming grading and feedback processes. Try EduAIHub's tools to save time."
        );
        assert_eq!(
            local_fallback_text(None),
            "Struggling with lesson planning and grading? Try EduAIHub's tools to save hours."
        );
    }

    #[test]
    fn prompt_names_the_sections() {
        let prompt = GreetingKind::Invitation.prompt("Webinar on Friday", "");
        assert!(prompt.contains("Meeting details: Webinar on Friday"));
        assert!(prompt.contains("Main Body: <2-3 paragraphs with meeting details"));
        assert!(prompt.contains(RECIPIENT_TOKEN));
    }

    #[test]
    fn section_wrapping() {
        assert_eq!(wrap_single("  ", "0"), "");
        assert_eq!(
            wrap_lines("One.\n\nTwo."),
            "<p style=\"margin:0 0 12px 0;\">One.</p><p style=\"margin:0 0 12px 0;\">Two.</p>"
        );
    }
}
