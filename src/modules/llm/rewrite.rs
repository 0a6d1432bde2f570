// Copyright © 2025 rustmailer.com
// Licensed under RustMailer License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use crate::modules::catalog::{Product, BRAND_HEADER};
use crate::modules::composer::personalize::{PARAGRAPH_STYLE, RECIPIENT_TOKEN};
use crate::modules::composer::sanitizer::{strip_boilerplate, strip_page_chrome};
use crate::modules::composer::stylizer::{split_first_sentence, stylize, MediaAssets};
use crate::modules::llm::parse::{label_value, parse_copy};
use crate::modules::llm::{ChatRequest, TextGenerator};
use regex::{Captures, Regex};
use std::sync::LazyLock;
use tracing::{info, warn};

static FENCED_BLOCK: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)```.*?```").unwrap());
static PERSONA_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?im)^.*you are a professional.*$").unwrap());
static HAS_DIRECTIVE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)do not change|respond with only|you are a professional").unwrap()
});
static DIRECTIVE_PARAGRAPH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)do not change|respond with only|preserve all links|replace any recipient|format the provided message|wrap text|bold only|do not paraphrase").unwrap()
});
static PARAGRAPH_BREAK: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n\s*\n").unwrap());
static BLANK_LINES: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n{2,}").unwrap());
static NAMED_GREETING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?im)^([ \t]*(?:<[^>]+>[ \t]*)*(hi|hello|dear)[ \t]+)([^\n,<]{1,80}),").unwrap()
});
static LONE_GREETING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^\s*(hi|hello|dear)\b[^\n]{0,80},\s*$").unwrap());
static PARAGRAPH_OPEN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)<p\b([^>]*)>").unwrap());

const STRUCTURE_SYSTEM: &str = "You only format text into HTML, do not change wording.";
const MARKETING_SYSTEM: &str = "You write short, effective marketing email copy.";

const PULSE_STYLE: &str = concat!(
    "<style>",
    ".pulse{display:inline-block;vertical-align:middle;margin-left:8px;border-radius:4px;}",
    "@keyframes pulse{0%{transform:scale(1);opacity:1}50%{transform:scale(1.12);opacity:0.9}100%{transform:scale(1);opacity:1}}",
    ".pulse-anim{animation:pulse 1.6s infinite ease-in-out;}",
    "</style>"
);

/// Result of a rewrite. `via_model` is false when the local formatter produced it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Rewrite {
    pub subject: Option<String>,
    pub fragment: String,
    pub via_model: bool,
}

impl Rewrite {
    fn local(fragment: String) -> Self {
        Self {
            subject: None,
            fragment,
            via_model: false,
        }
    }
}

/// Removes pasted prompt material: fenced blocks, persona lines and, when
/// directives are present, the leading directive or bullet paragraphs.
pub fn strip_instructions(raw: &str) -> String {
    let text = FENCED_BLOCK.replace_all(raw, "");
    let text = PERSONA_LINE.replace_all(text.trim(), "");
    let text = text.trim();
    if !HAS_DIRECTIVE.is_match(text) {
        return text.to_string();
    }

    let paragraphs: Vec<&str> = PARAGRAPH_BREAK.split(text).collect();
    let start = paragraphs
        .iter()
        .position(|p| {
            let lowered = p.trim().to_lowercase();
            !(lowered.starts_with('-') || DIRECTIVE_PARAGRAPH.is_match(&lowered))
        })
        .unwrap_or(0);
    paragraphs[start..].join("\n\n").trim().to_string()
}

/// Replaces the addressee of `Hi Name,` style lines with the recipient token.
pub fn tokenize_greetings(text: &str) -> String {
    NAMED_GREETING
        .replace_all(text, |caps: &Captures| format!("{}{RECIPIENT_TOKEN},", &caps[1]))
        .into_owned()
}

/// Wraps paragraphs in styled `<p>` tags without touching wording. The first
/// sentence of the first content paragraph is bolded.
pub fn structure_local(text: &str) -> String {
    if text.trim().is_empty() {
        return String::new();
    }
    let text = tokenize_greetings(text);
    let text = BLANK_LINES.replace_all(&text, "\n\n");
    let mut paragraphs: Vec<String> = text
        .trim()
        .split("\n\n")
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(String::from)
        .collect();

    if let Some(lead) = paragraphs.iter_mut().find(|p| !LONE_GREETING.is_match(p)) {
        let (first, rest) = split_first_sentence(lead);
        *lead = match rest {
            Some(rest) => format!("<strong>{first}</strong> {}", rest.trim_start()),
            None => format!("<strong>{first}</strong>"),
        };
    }

    paragraphs
        .iter()
        .map(|p| format!("<p style=\"{PARAGRAPH_STYLE}\">{}</p>", p.replace('\n', "<br/>")))
        .collect()
}

fn structure_prompt(message: &str) -> String {
    format!(
        "You are a professional email formatter for {BRAND_HEADER}.\n\
         Do NOT change the user's words or meaning. Only format the provided message into clean, accessible HTML suitable for email:\n \
         - Wrap text into short paragraphs and add minimal inline styling.\n \
         - Bold only the first sentence (problem lead).\n \
         - Preserve all links and images.\n \
         - Do NOT paraphrase, add, or remove sentences.\n \
         - Replace any recipient names in greetings (e.g., 'Hi Support,', 'Dear Team,') with the exact token {RECIPIENT_TOKEN} so the sending code can personalize per recipient.\n\
         Respond with only an HTML fragment (no full <html> document).\n\
         Original message:\n{message}\n"
    )
}

fn echoes_prompt(text: &str) -> bool {
    let lowered = text.to_lowercase();
    lowered.contains("you are a professional email formatter")
        || lowered.contains("do not change the user")
        || text.trim_start().starts_with("```")
}

fn split_subject(text: &str) -> (Option<String>, String) {
    let mut lines = text.lines();
    match lines.next().and_then(|first| label_value(first, "subject")) {
        Some(subject) => (
            Some(subject.to_string()).filter(|s| !s.is_empty()),
            lines.collect::<Vec<_>>().join("\n").trim().to_string(),
        ),
        None => (None, text.to_string()),
    }
}

/// Formats a message into paragraphs while keeping its wording. The model is
/// asked first when available; its output is discarded when it echoes the
/// instructions, and every failure degrades to [`structure_local`].
pub async fn structure_only<G: TextGenerator>(generator: Option<&G>, raw: &str) -> Rewrite {
    let message = strip_instructions(raw);
    let Some(generator) = generator else {
        return Rewrite::local(structure_local(&message));
    };

    let request = ChatRequest::new(STRUCTURE_SYSTEM, structure_prompt(&message))
        .max_tokens(400)
        .temperature(0.0);
    let text = match generator.generate(&request).await {
        Ok(text) => text,
        Err(e) => {
            warn!("Structure formatting failed, using local formatter: {e}");
            return Rewrite::local(structure_local(&message));
        }
    };
    if echoes_prompt(&text) {
        info!("Language model echoed the formatting instructions, using local formatter");
        return Rewrite::local(structure_local(&message));
    }

    let (subject, body) = split_subject(&text);
    let body = tokenize_greetings(&body);
    let fragment = if PARAGRAPH_OPEN.is_match(&body) {
        body
    } else {
        structure_local(&body)
    };
    Rewrite {
        subject,
        fragment,
        via_model: true,
    }
}

fn marketing_prompt(raw: &str, product: Option<&Product>) -> String {
    let pains = product
        .filter(|p| !p.pains.is_empty())
        .map(|p| format!("Product: {}. Known pains: {}.", p.name, p.pains.join(", ")))
        .unwrap_or_default();
    format!(
        "You are a professional marketing copywriter for {BRAND_HEADER}.\n\
         Rewrite the following message into a concise, pain-first marketing email body suitable to embed into an existing email template. \
         Start with a short, bold problem statement (one sentence), then 1-2 short paragraphs describing benefits and a single clear call to action. \
         Keep paragraphs short, suitable for email. Preserve any links provided. Output only a subject line then the HTML fragment.\n\
         Recipient name: Valued Educator.\n\
         {pains}\n\
         Original content:\n{raw}\n\
         Respond with the format:\nSubject: <subject>\nBody:\n<html>...</html>\n"
    )
}

/// Cleans generated marketing copy and frames it with the pulse styles,
/// optional banner and the demo call to action.
pub fn finish_marketing(body: &str, assets: &MediaAssets, cta_link: &str) -> String {
    let body = strip_page_chrome(&strip_boilerplate(body));
    let styled = PARAGRAPH_OPEN.replace_all(&body, |caps: &Captures| {
        if caps[1].contains("style=") {
            caps[0].to_string()
        } else {
            format!("<p{} style=\"{PARAGRAPH_STYLE}\">", &caps[1])
        }
    });
    let body = if PARAGRAPH_OPEN.is_match(&styled) {
        styled.into_owned()
    } else {
        styled
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(|line| format!("<p style=\"{PARAGRAPH_STYLE}\">{line}</p>"))
            .collect()
    };

    let media = assets
        .animated_gif
        .as_deref()
        .map(|src| format!("<div style=\"margin-bottom:12px;text-align:center;\"><img src=\"{src}\" alt=\"\" width=320 style=\"display:block;border-radius:10px;max-width:100%;height:auto;\" /></div>"))
        .unwrap_or_default();
    let icon = assets
        .cta_icon
        .as_deref()
        .map(|src| format!("<img src=\"{src}\" alt=\"\" width=18 class=\"pulse pulse-anim\" style=\"display:inline-block;vertical-align:middle;\" />"))
        .unwrap_or_default();
    let cta = format!(
        "<div style=\"margin-top:12px;text-align:center;\"><a href=\"{cta_link}\" style=\"display:inline-block;padding:10px 16px;background:linear-gradient(90deg,#2fc071,#1aa35a);color:#fff;text-decoration:none;border-radius:8px;font-weight:700;box-shadow:0 6px 18px rgba(46,139,87,0.18);\">Request a short demo » {icon}</a></div>"
    );
    format!("{PULSE_STYLE}{media}{body}{cta}")
}

/// Rewrites free text into pain-first marketing copy with a suggested subject.
/// Without a model, or when it fails, the local stylizer is used instead.
pub async fn pain_first<G: TextGenerator>(
    generator: Option<&G>,
    raw: &str,
    product: Option<&Product>,
    assets: &MediaAssets,
    cta_link: &str,
) -> Rewrite {
    let Some(generator) = generator else {
        return Rewrite::local(stylize(raw, product, assets));
    };

    let request = ChatRequest::new(MARKETING_SYSTEM, marketing_prompt(raw, product))
        .max_tokens(400)
        .temperature(0.6);
    match generator.generate(&request).await {
        Ok(text) => {
            let copy = parse_copy(&text);
            if copy.body.is_empty() {
                warn!("Marketing rewrite returned no body, using local stylizer");
                return Rewrite::local(stylize(raw, product, assets));
            }
            Rewrite {
                subject: copy.subject,
                fragment: finish_marketing(&copy.body, assets, cta_link),
                via_model: true,
            }
        }
        Err(e) => {
            warn!("Marketing rewrite failed, using local stylizer: {e}");
            Rewrite::local(stylize(raw, product, assets))
        }
    }
}
