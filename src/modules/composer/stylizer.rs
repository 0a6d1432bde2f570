// Copyright © 2025 rustmailer.com
// Licensed under RustMailer License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use crate::modules::catalog::Product;
use crate::modules::composer::sanitizer::strip_boilerplate;
use crate::modules::settings::cli::SETTINGS;
use crate::modules::utils::truncate_chars;
use regex::Regex;
use std::sync::LazyLock;

static ANY_TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]+>").unwrap());
static SENTENCE_END: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[.!?]\s+").unwrap());

const LEAD_KEYWORDS: [&str; 11] = [
    "grade",
    "grading",
    "feedback",
    "admin",
    "administrative",
    "time",
    "overwhelm",
    "overwhelmed",
    "drowning",
    "tiring",
    "burden",
];

const PROBLEM_FALLBACK_CHARS: usize = 160;
const PROBLEM_MAX_CHARS: usize = 240;

/// Optional imagery used by the stylizer. Nothing is shown when unset.
#[derive(Clone, Debug, Default)]
pub struct MediaAssets {
    pub animated_gif: Option<String>,
    pub cta_icon: Option<String>,
}

impl MediaAssets {
    pub fn from_settings() -> Self {
        Self {
            animated_gif: SETTINGS.animated_gif_url.clone(),
            cta_icon: SETTINGS.cta_pulse_url.clone(),
        }
    }
}

pub fn contains_html(text: &str) -> bool {
    ANY_TAG.is_match(text)
}

pub fn strip_tags(text: &str) -> String {
    ANY_TAG.replace_all(text, "").into_owned()
}

/// First sentence of `text`, terminator included.
pub fn first_sentence(text: &str) -> &str {
    match SENTENCE_END.find(text) {
        Some(m) => &text[..m.start() + 1],
        None => text,
    }
}

/// Splits off the first sentence, returning it and the untrimmed remainder.
pub fn split_first_sentence(text: &str) -> (&str, Option<&str>) {
    match SENTENCE_END.find(text) {
        Some(m) => (&text[..m.start() + 1], Some(&text[m.end()..])),
        None => (text, None),
    }
}

/// The highlighted lead: first sentence of the tag-free text, bounded in length.
pub fn problem_statement(plain: &str) -> String {
    let sentence = first_sentence(plain).trim();
    let mut problem = if !sentence.is_empty() {
        sentence.to_string()
    } else {
        let mut head = truncate_chars(plain, PROBLEM_FALLBACK_CHARS).trim().to_string();
        if plain.chars().count() > PROBLEM_FALLBACK_CHARS {
            head.push_str("...");
        }
        head
    };
    if problem.chars().count() > PROBLEM_MAX_CHARS {
        problem = format!(
            "{}...",
            truncate_chars(&problem, PROBLEM_MAX_CHARS - 3).trim_end()
        );
    }
    problem
}

fn pain_first_paragraphs(raw: &str, problem: &str) -> Vec<String> {
    let mut paragraphs: Vec<String> = raw
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(String::from)
        .collect();

    let first = paragraphs.first().map(|p| p.to_lowercase()).unwrap_or_default();
    if !LEAD_KEYWORDS.iter().any(|k| first.contains(k)) {
        let found: Vec<&str> = LEAD_KEYWORDS
            .iter()
            .copied()
            .filter(|k| paragraphs.iter().any(|p| p.to_lowercase().contains(k)))
            .collect();
        let lead = if !found.is_empty() {
            format!("Struggling with {}?", found[..found.len().min(2)].join(", "))
        } else if let Some(first) = paragraphs.first() {
            first.clone()
        } else {
            problem.to_string()
        };
        paragraphs.insert(0, lead);
    }
    paragraphs
}

fn pains_block(product: &Product) -> String {
    if product.pains.is_empty() {
        return String::new();
    }
    let items: String = product
        .pains
        .iter()
        .map(|pain| format!("<li style=\"margin-bottom:6px;color:#4e453f;\">{pain}</li>"))
        .collect();
    format!("<ul style=\"margin:8px 0 12px 18px;\">{items}</ul>")
}

fn cta_block(product: &Product, assets: &MediaAssets) -> String {
    let icon = assets
        .cta_icon
        .as_deref()
        .map(|src| format!("<img src=\"{src}\" alt=\"\" width=18 style=\"vertical-align:middle;margin-left:8px;border-radius:4px;display:inline-block;\" />"))
        .unwrap_or_default();
    let gif = assets
        .animated_gif
        .as_deref()
        .map(|src| format!("<img src=\"{src}\" alt=\"\" width=40 style=\"vertical-align:middle;margin-left:8px;border-radius:6px;\" />"))
        .unwrap_or_default();
    format!(
        "<div style=\"margin-top:10px;\"><a href=\"{}\" style=\"display:inline-block;padding:10px 14px;background:linear-gradient(90deg,#2fc071,#1aa35a);color:#ffffff;text-decoration:none;border-radius:6px;font-weight:700;box-shadow:0 6px 18px rgba(46,139,87,0.18);\">Learn more about {}{icon}{gif}</a></div>",
        product.link, product.name
    )
}

/// Turns free text (or light HTML) into a pain-first, inline-styled fragment.
pub fn stylize(raw: &str, product: Option<&Product>, assets: &MediaAssets) -> String {
    let raw = strip_boilerplate(raw);
    if raw.is_empty() {
        return String::new();
    }

    let plain = strip_tags(&raw);
    let mut problem = problem_statement(&plain);
    if let Some(product) = product {
        problem = format!("{problem} — for {}.", product.name);
    }

    let media = product
        .map(|p| p.image_url)
        .filter(|url| !url.is_empty())
        .or(assets.animated_gif.as_deref())
        .map(|src| format!("<div style=\"margin-bottom:8px;\"><img src=\"{src}\" alt=\"\" width=\"120\" style=\"display:block;border-radius:6px;max-width:100%;height:auto;\" /></div>"))
        .unwrap_or_default();

    let body = if contains_html(&raw) {
        raw.clone()
    } else {
        pain_first_paragraphs(&raw, &problem)
            .iter()
            .map(|p| format!("<p style=\"margin:0 0 12px 0; font-size:14px;\">{p}</p>"))
            .collect::<Vec<_>>()
            .join("\n")
    };

    let (pains, cta) = match product {
        Some(product) => (pains_block(product), cta_block(product, assets)),
        None => (String::new(), String::new()),
    };

    format!(
        "<div style=\"padding:0 0 12px 0;\"><div style=\"background-color:#fff9d6;border-left:4px solid #f5d84c;padding:12px;border-radius:6px;color:#2f3b1f;font-weight:700;font-size:16px;line-height:1.3;margin-bottom:8px;\">{problem}</div>{media}<div style=\"font-size:14px;color:#234b38;line-height:1.6;\">{body}</div>{pains}{cta}</div>"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::catalog;

    #[test]
    fn problem_is_first_sentence() {
        assert_eq!(
            problem_statement("Marking is slow. We fix that! Try it?"),
            "Marking is slow."
        );
        assert_eq!(problem_statement("No terminator here"), "No terminator here");
    }

    #[test]
    fn long_problem_is_truncated() {
        let long = "word ".repeat(80);
        let problem = problem_statement(&long);
        assert!(problem.ends_with("..."));
        assert!(problem.chars().count() <= 240);
    }

    #[test]
    fn synthesizes_pain_lead_when_first_paragraph_lacks_keywords() {
        let paragraphs = pain_first_paragraphs("Our new tool is here.\nIt cuts grading time.", "x");
        assert_eq!(paragraphs[0], "Struggling with grading, time?");
        assert_eq!(paragraphs.len(), 3);
    }

    #[test]
    fn keeps_first_paragraph_when_it_already_leads_with_pain() {
        let paragraphs = pain_first_paragraphs("Feedback takes forever.\nWe help.", "x");
        assert_eq!(paragraphs, vec!["Feedback takes forever.", "We help."]);
    }

    #[test]
    fn no_media_without_configuration() {
        let html = stylize("Grading is slow.", None, &MediaAssets::default());
        assert!(!html.contains("<img"));
    }

    #[test]
    fn product_adds_pains_and_cta() {
        let product = catalog::find("vidya_hub").unwrap();
        let assets = MediaAssets {
            animated_gif: None,
            cta_icon: Some("https://cdn.test/pulse.gif".into()),
        };
        let html = stylize("Too much paperwork.", Some(product), &assets);
        assert!(html.contains("Too much paperwork. — for Vidya Hub."));
        assert!(html.contains(product.image_url));
        assert!(html.contains("Overwhelming administrative workload for teachers"));
        assert!(html.contains("Learn more about Vidya Hub"));
        assert!(html.contains("https://cdn.test/pulse.gif"));
    }

    #[test]
    fn html_body_passes_through() {
        let html = stylize("<p>Grading <a href=\"https://x.test\">help</a>.</p>", None, &MediaAssets::default());
        assert!(html.contains("<p>Grading <a href=\"https://x.test\">help</a>.</p>"));
    }
}
