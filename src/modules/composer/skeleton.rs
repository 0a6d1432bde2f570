// Copyright © 2025 rustmailer.com
// Licensed under RustMailer License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use regex::Regex;
use scraper::{Html, Selector};
use std::ops::Range;
use std::sync::LazyLock;
use tracing::debug;

/// Token users may place anywhere in a skeleton to mark the body slot.
pub const BODY_TOKEN: &str = "[[AI_BODY]]";

static CELL_OPEN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)<td\b[^>]*>").unwrap());
static TABLE_PART: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)<(/?)(td|th|tr|tbody|thead|tfoot|table)\b[^>]*>").unwrap()
});
static TABLE_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<(/?)table\b[^>]*>").unwrap());

fn parse(source: &str) -> Html {
    if source.to_ascii_lowercase().contains("<html") {
        Html::parse_document(source)
    } else {
        Html::parse_fragment(source)
    }
}

fn selector(css: &str) -> Option<Selector> {
    Selector::parse(css).ok()
}

/// Position of the first `td.body` among all cells, in document order.
fn body_cell_ordinal(html: &Html) -> Option<usize> {
    let target = html.select(&selector("td.body")?).next()?.id();
    html.select(&selector("td")?).position(|cell| cell.id() == target)
}

fn is_body_cell(start_tag: &str) -> bool {
    let cell = Html::parse_fragment(&format!("<table><tr>{start_tag}</td></tr></table>"));
    selector("td.body").is_some_and(|body| cell.select(&body).next().is_some())
}

/// Source range holding the content of the first `td.body` cell.
fn body_cell_content(source: &str, html: &Html) -> Option<Range<usize>> {
    let opens: Vec<_> = CELL_OPEN.find_iter(source).collect();
    let open = body_cell_ordinal(html)
        .and_then(|n| opens.get(n).copied())
        .filter(|open| is_body_cell(open.as_str()))
        .or_else(|| opens.into_iter().find(|open| is_body_cell(open.as_str())))?;
    Some(open.end()..cell_content_end(source, open.end()))
}

/// The cell ends at its closing tag, or at the next row or cell boundary when
/// the closing tag is omitted. Nested tables are skipped.
fn cell_content_end(source: &str, from: usize) -> usize {
    let mut nested = 0usize;
    for caps in TABLE_PART.captures_iter(&source[from..]) {
        let Some(tag) = caps.get(0) else { continue };
        let closing = !caps[1].is_empty();
        if caps[2].eq_ignore_ascii_case("table") {
            if !closing {
                nested += 1;
                continue;
            }
            if nested > 0 {
                nested -= 1;
                continue;
            }
        } else if nested > 0 {
            continue;
        }
        return from + tag.start();
    }
    source.len()
}

/// Where a new row goes in the first table: before its closing `</tbody>` or
/// `</table>`, or at the end of an unterminated table.
fn new_row_position(source: &str) -> usize {
    let mut depth = 0usize;
    for caps in TABLE_TAG.captures_iter(source) {
        let Some(tag) = caps.get(0) else { continue };
        if caps[1].is_empty() {
            depth += 1;
        } else if depth > 0 {
            depth -= 1;
            if depth == 0 {
                let head = source[..tag.start()].trim_end();
                let tbody_start = head.len().saturating_sub("</tbody>".len());
                return match head.get(tbody_start..) {
                    Some(tail) if tail.eq_ignore_ascii_case("</tbody>") => tbody_start,
                    _ => tag.start(),
                };
            }
        }
    }
    source.len()
}

fn splice(source: &str, range: Range<usize>, insert: &str) -> String {
    let mut out = String::with_capacity(source.len() + insert.len());
    out.push_str(&source[..range.start]);
    out.push_str(insert);
    out.push_str(&source[range.end..]);
    out
}

/// Places `fragment` into a user supplied skeleton.
///
/// Order of preference: the first `td.body` cell, then a literal `[[AI_BODY]]`
/// token, then a new body row appended to the first table. A skeleton without
/// any table simply gets the fragment appended. Markup outside the slot is
/// kept byte for byte.
pub fn inject(skeleton: &str, fragment: &str) -> String {
    let html = parse(skeleton);
    if let Some(content) = body_cell_content(skeleton, &html) {
        return splice(skeleton, content, fragment);
    }

    if skeleton.contains(BODY_TOKEN) {
        return skeleton.replacen(BODY_TOKEN, fragment, 1);
    }

    let has_table = selector("table").is_some_and(|table| html.select(&table).next().is_some());
    if has_table {
        let at = new_row_position(skeleton);
        let row = format!("<tr><td class=\"body\">{fragment}</td></tr>");
        return splice(skeleton, at..at, &row);
    }

    debug!("Skeleton has no body slot or table; appending fragment");
    format!("{skeleton}{fragment}")
}

/// Adds the user's stylesheet to the page head, wrapping bare markup in a document.
pub fn with_stylesheet(page: &str, css: Option<&str>) -> String {
    let style = css
        .map(str::trim)
        .filter(|css| !css.is_empty())
        .map(|css| format!("<style>{css}</style>"))
        .unwrap_or_default();

    if let Some(pos) = page.find("</head>") {
        let mut out = String::with_capacity(page.len() + style.len());
        out.push_str(&page[..pos]);
        out.push_str(&style);
        out.push_str(&page[pos..]);
        return out;
    }
    format!("<html><head>{style}</head><body>{page}</body></html>")
}
