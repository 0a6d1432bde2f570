// Copyright © 2025 rustmailer.com
// Licensed under RustMailer License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use regex::Regex;
use std::sync::LazyLock;

static BLOCK_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)<\s*(p|div|ul|ol|table|h[1-6]|blockquote)\b").unwrap()
});

static PARAGRAPH_BREAK: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n{2,}").unwrap());

const FRAGMENT_STYLE: &str = concat!(
    "<style>",
    ".ai-fragment{font-family:-apple-system,BlinkMacSystemFont,'Segoe UI',Roboto,'Helvetica Neue',Arial,sans-serif;font-size:15px;color:#1f3a5f;line-height:1.7;background:linear-gradient(180deg,#ffffff,#fbfdff);padding:10px;border-radius:10px}",
    ".ai-fragment p{margin:0 0 12px 0}",
    ".ai-fragment .lead{font-weight:900;color:#0b60a6;margin-bottom:8px;font-size:18px}",
    ".ai-fragment .cta-inline{display:inline-block;padding:10px 14px;background:linear-gradient(90deg,#ff7ab6,#6bdeff);color:#05233a;border-radius:10px;text-decoration:none;font-weight:900;box-shadow:0 10px 28px rgba(107,222,255,0.12);transition:transform .18s}",
    ".ai-fragment .cta-inline:hover{transform:translateY(-3px)}",
    ".ai-fragment .badge{display:inline-block;background:#ffd166;color:#6b3b00;padding:6px 8px;border-radius:999px;font-weight:900;margin-right:8px}",
    ".ai-decor{display:flex;justify-content:flex-end;gap:8px;margin-bottom:8px}",
    ".spark{display:inline-block;width:10px;height:10px;border-radius:50%;background:linear-gradient(90deg,#ff7ab6,#ffd166);box-shadow:0 8px 20px rgba(255,122,182,0.12);animation:confetti 3s linear infinite}",
    "@keyframes confetti{0%{transform:translateY(-4px) rotate(0);opacity:1}50%{transform:translateY(2px) rotate(180deg);opacity:0.8}100%{transform:translateY(-2px) rotate(360deg);opacity:0.3}}",
    "@keyframes fragBounce{0%{transform:translateY(-6px);opacity:0}60%{transform:translateY(3px);opacity:1}100%{transform:none}}",
    ".ai-fragment{animation:fragBounce .6s cubic-bezier(.17,.67,.3,1) both}",
    ".ai-body-content p{margin:0 0 12px 0;color:#102a43;font-size:15px;line-height:1.7}",
    ".ai-body-content h2{color:#ff7ab6;margin:0 0 8px 0}",
    ".ai-body-content ul li{margin:6px 0;padding-left:6px;color:#1f3a5f}",
    ".ai-body-content blockquote{border-left:4px solid #ffd166;padding:8px 12px;background:#fffaf0;color:#6b4a00;border-radius:6px}",
    "@keyframes fragFadeIn{from{opacity:0;transform:translateY(6px)}to{opacity:1;transform:none}}",
    ".ai-body-content p{animation:fragFadeIn .5s ease both}",
    "</style>"
);

const DECOR: &str = "<div class='ai-decor'><span class='spark'></span><span class='spark'></span><span class='spark'></span></div>";

/// Wraps block-level content as is, otherwise turns blank-line separated text into paragraphs.
pub fn normalize(content: &str) -> String {
    if BLOCK_TAG.is_match(content) {
        return format!("<div class=\"ai-body-content\">{content}</div>");
    }
    let paragraphs: String = PARAGRAPH_BREAK
        .split(content)
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(|p| {
            format!(
                "<p style=\"margin:0 0 12px 0;color:#1f3a5f;font-size:15px;line-height:1.7\">{}</p>",
                p.replace('\n', "<br/>")
            )
        })
        .collect();
    format!("<div class=\"ai-body-content\">{paragraphs}</div>")
}

/// The decorated `ai-fragment` block placed into a skeleton's body slot.
pub fn wrap(content: &str) -> String {
    format!(
        "{FRAGMENT_STYLE}<div class=\"ai-fragment\" style=\"padding:10px;border-radius:10px;background:linear-gradient(180deg,#ffffff,#fbfdff);\">{DECOR}{}</div>",
        normalize(content)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_becomes_paragraphs() {
        let out = normalize("First line\nsecond line\n\nNext paragraph");
        assert_eq!(out.matches("<p ").count(), 2);
        assert!(out.contains("First line<br/>second line"));
    }

    #[test]
    fn block_markup_is_kept() {
        assert_eq!(
            normalize("<ul><li>a</li></ul>"),
            "<div class=\"ai-body-content\"><ul><li>a</li></ul></div>"
        );
    }

    #[test]
    fn wrap_adds_decor() {
        let out = wrap("<p>x</p>");
        assert!(out.starts_with("<style>"));
        assert!(out.contains("class=\"ai-fragment\""));
        assert_eq!(out.matches("class='spark'").count(), 3);
    }
}
