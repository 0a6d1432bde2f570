// Copyright © 2025 rustmailer.com
// Licensed under RustMailer License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

const PREHEADER_STYLE: &str =
    "display: none; font-size: 0; max-height: 0; overflow: hidden; mso-hide: all;";

pub struct Preheader;

impl Preheader {
    /// Inserts a hidden inbox-preview line right after the opening `<body>` tag,
    /// or at the very start when the markup has no body.
    pub fn insert(html: &str, text: &str) -> String {
        let text = text.trim();
        if text.is_empty() {
            return html.to_string();
        }
        let block = format!(
            "<div style=\"{PREHEADER_STYLE}\">{}</div>",
            html_escape::encode_text(text)
        );
        match Self::body_content_start(html) {
            Some(at) => format!("{}{}{}", &html[..at], block, &html[at..]),
            None => format!("{block}{html}"),
        }
    }

    fn body_content_start(html: &str) -> Option<usize> {
        let start = html.find("<body")?;
        let close = html[start..].find('>')?;
        Some(start + close + 1)
    }
}
