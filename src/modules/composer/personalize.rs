// Copyright © 2025 rustmailer.com
// Licensed under RustMailer License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use crate::modules::composer::stylizer::strip_tags;
use regex::Regex;
use std::sync::LazyLock;

/// Token users and the language model may write into copy.
pub const RECIPIENT_TOKEN: &str = "[[RECIPIENT_NAME]]";
/// Internal marker carried by composed HTML until send time.
pub const RECIPIENT_MARKER: &str = "___RECIPIENT_NAME_PLACEHOLDER___";
pub const FALLBACK_NAME: &str = "Educator";

pub const PARAGRAPH_STYLE: &str = "margin:0 0 12px 0; font-size:15px; color:#234b38; line-height:1.6; font-family:-apple-system,BlinkMacSystemFont,'Segoe UI',Roboto,'Helvetica Neue',Arial,sans-serif";

static GREETING_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?im)^\s*(hi|hello|dear)\s+").unwrap());

/// Rewrites the public token into the internal marker.
pub fn mark(html: &str) -> String {
    html.replace(RECIPIENT_TOKEN, RECIPIENT_MARKER)
}

/// A fragment already greets when it carries the marker or opens a line with a salutation.
pub fn has_greeting(fragment: &str) -> bool {
    fragment.contains(RECIPIENT_MARKER)
        || fragment.contains(RECIPIENT_TOKEN)
        || GREETING_LINE.is_match(fragment)
        || GREETING_LINE.is_match(&strip_tags(fragment))
}

/// Marks the fragment and prepends `Hi <marker>,` when it has no greeting of its own.
pub fn ensure_greeting(fragment: &str) -> String {
    let marked = mark(fragment);
    if has_greeting(&marked) {
        return marked;
    }
    format!("<p style=\"{PARAGRAPH_STYLE}\">Hi {RECIPIENT_MARKER},</p>{marked}")
}

pub fn display_name(name: &str) -> &str {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        FALLBACK_NAME
    } else {
        trimmed
    }
}

/// Substitutes every occurrence of `marker` with the recipient's escaped display name.
pub fn personalize(html: &str, marker: Option<&str>, name: &str) -> String {
    match marker {
        Some(marker) if !marker.is_empty() => {
            let escaped = html_escape::encode_text(display_name(name));
            html.replace(marker, &escaped)
        }
        _ => html.to_string(),
    }
}
