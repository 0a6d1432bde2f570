// Copyright © 2025 rustmailer.com
// Licensed under RustMailer License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use crate::modules::composer::stylizer::strip_tags;
use crate::modules::utils::word_count;
use regex::Regex;
use std::sync::LazyLock;

pub const MIN_BODY_CHARS: usize = 30;
pub const MIN_BODY_WORDS: usize = 5;

static NON_RENDERED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<\s*(style|script|head)\b[^>]*>.*?<\s*/\s*(style|script|head)\s*>").unwrap()
});

static BOILERPLATE: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?i)eduai\s*hub\s*(•|-)\s*eduaihub\.in\s*(•|-)\s*unsubscribe",
        r"(?i)unsubscribe",
        r"(?i)visit\s+eduaihub",
        r"(?i)where education meets intelligence",
    ]
    .iter()
    .map(|pattern| Regex::new(pattern).unwrap())
    .collect()
});

static LONE_GREETING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*(hi|hello|dear|regards|thanks|thank you)\s*[,.]?\s*$").unwrap()
});

static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

static ALPHANUMERIC: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[A-Za-z0-9]").unwrap());

/// Visible text with tags, boilerplate phrases and whitespace runs removed.
pub fn visible_text(html: &str) -> String {
    let text = NON_RENDERED.replace_all(html, " ");
    let mut text = strip_tags(&text);
    for pattern in BOILERPLATE.iter() {
        text = pattern.replace_all(&text, "").into_owned();
    }
    let text = LONE_GREETING.replace(&text, "");
    WHITESPACE.replace_all(text.trim(), " ").into_owned()
}

/// Gate in front of every send: true only when the fragment carries real copy.
pub fn has_meaningful_body(html: &str) -> bool {
    let text = visible_text(html);
    text.chars().count() >= MIN_BODY_CHARS
        && word_count(&text) >= MIN_BODY_WORDS
        && ALPHANUMERIC.is_match(&text)
}

/// Description check used before any composition: at least five words once a
/// lone salutation is removed.
pub fn is_substantial_description(description: &str) -> bool {
    let trimmed = description.trim();
    if trimmed.is_empty() {
        return false;
    }
    let remainder = LONE_GREETING.replace(trimmed, "");
    word_count(&remainder) >= MIN_BODY_WORDS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_and_trivial_bodies() {
        assert!(!has_meaningful_body(""));
        assert!(!has_meaningful_body("   \n\t  "));
        assert!(!has_meaningful_body("<p>Hi John,</p>"));
        assert!(!has_meaningful_body("Grading takes too long."));
    }

    #[test]
    fn accepts_real_copy() {
        assert!(has_meaningful_body("Grading takes hours every single week."));
        let html = "<p>Our planner saves teachers real time.</p>";
        assert!(html.len() >= 40);
        assert!(has_meaningful_body(html));
    }

    #[test]
    fn boilerplate_does_not_count() {
        let footer = "<td>EduAI Hub • eduaihub.in • Unsubscribe</td><p>Where Education Meets Intelligence</p>";
        assert!(!has_meaningful_body(footer));
    }

    #[test]
    fn style_blocks_do_not_count() {
        let html = "<html><head><style>.a{color:red;font-size:12px;line-height:2}</style></head><body><p>Hi there</p></body></html>";
        assert!(!has_meaningful_body(html));
    }

    #[test]
    fn description_needs_five_words() {
        assert!(!is_substantial_description(""));
        assert!(!is_substantial_description("Thanks,"));
        assert!(!is_substantial_description("Please read this now"));
        assert!(is_substantial_description("Please read this update now"));
    }
}
