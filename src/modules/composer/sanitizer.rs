// Copyright © 2025 rustmailer.com
// Licensed under RustMailer License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use regex::Regex;
use std::sync::LazyLock;

static LABEL_TOKENS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(hook|body):\s*").unwrap());

static LEADING_GREETING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*(hi|hello|dear)\s+[A-Z][a-z0-9\-\._ ]{0,40},?\s*\n").unwrap()
});

static HEADER_WITH_TAGLINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?im)^(\s*EduAIHub\s*\n\s*Practical AI Tools for Education\s*\n)+").unwrap()
});

static HEADER_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?im)^(\s*EduAIHub\s*\n)+").unwrap());

static SIGNATURE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)\n\s*(warm regards|regards|thanks|thank you)[^\n]*").unwrap()
});

static FOOTER_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)\n\s*(visit\s+eduaihub[^\n]*|unsubscribe[^\n]*|visit[^\n]*eduaihub[^\n]*)")
        .unwrap()
});

static QUOTE_ATTRIBUTION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?is)\n\s*"[^\n]{0,200}"\s*—\s*[^\n]{0,100}"#).unwrap());

static EXCESS_BLANK_LINES: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n{3,}").unwrap());

static PAGE_CHROME: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?is)<\s*head[^>]*>.*?<\s*/\s*head\s*>",
        r"(?is)<\s*html[^>]*>",
        r"(?is)<\s*/\s*html\s*>",
        r"(?is)<\s*body[^>]*>",
        r"(?is)<\s*/\s*body\s*>",
        r"(?is)<\s*header[^>]*>.*?<\s*/\s*header\s*>",
        r"(?is)<\s*h1[^>]*>.*?EduAIHub.*?<\s*/\s*h1\s*>",
        r"(?is)<\s*footer[^>]*>.*?<\s*/\s*footer\s*>",
        r#"(?is)<a[^>]*href=["'][^"']*eduaihub[^"']*["'][^>]*>.*?<\s*/\s*a\s*>"#,
    ]
    .iter()
    .map(|pattern| Regex::new(pattern).unwrap())
    .collect()
});

/// Drops `Hook:` / `Body:` labels left over from generated copy.
pub fn sanitize_field(text: &str) -> String {
    LABEL_TOKENS.replace_all(text, "").trim().to_string()
}

pub fn collapse_blank_lines(text: &str) -> String {
    EXCESS_BLANK_LINES.replace_all(text, "\n\n").into_owned()
}

/// Removes salutations, repeated company headers, signatures and footer lines
/// so that the first remaining line is message content.
pub fn strip_boilerplate(raw: &str) -> String {
    let text = sanitize_field(raw.trim());
    let text = LEADING_GREETING.replace(&text, "");
    let text = HEADER_WITH_TAGLINE.replace_all(&text, "");
    let text = HEADER_LINE.replace_all(&text, "");
    let text = SIGNATURE.replace_all(&text, "");
    let text = FOOTER_LINE.replace_all(&text, "");
    let text = QUOTE_ATTRIBUTION.replace_all(&text, "");
    collapse_blank_lines(&text).trim().to_string()
}

/// Strips document wrappers and header/footer blocks from a fragment that
/// accidentally carries a full page.
pub fn strip_page_chrome(html: &str) -> String {
    let mut out = html.to_string();
    for pattern in PAGE_CHROME.iter() {
        out = pattern.replace_all(&out, "").into_owned();
    }
    collapse_blank_lines(&out).trim().to_string()
}

/// True when the fragment looks like it carries page-level markup.
pub fn looks_like_page(html: &str) -> bool {
    let lower = html.to_lowercase();
    lower.contains("<html")
        || lower.contains("<header")
        || lower.contains("<h1")
        || lower.contains("eduaihub")
}
