// Copyright © 2025 rustmailer.com
// Licensed under RustMailer License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use crate::modules::error::code::ErrorCode;
use crate::modules::error::CampaignResult;
use crate::raise_error;
use css_inline::{CSSInliner, InlineOptions};
use tracing::warn;

/// Moves stylesheet rules into `style=` attributes.
pub trait CssInliner: Send + Sync {
    fn inline(&self, html: &str, keep_style_tags: bool) -> CampaignResult<String>;
}

#[derive(Clone, Copy, Debug, Default)]
pub struct CssInlineEngine;

impl CssInliner for CssInlineEngine {
    fn inline(&self, html: &str, keep_style_tags: bool) -> CampaignResult<String> {
        let options = InlineOptions {
            load_remote_stylesheets: false,
            keep_style_tags,
            ..InlineOptions::default()
        };
        CSSInliner::new(options).inline(html).map_err(|e| {
            raise_error!(
                format!("Failed to inline CSS: {e}"),
                ErrorCode::InternalError
            )
        })
    }
}

/// Inlines CSS, returning the original markup and a warning when inlining fails.
pub fn inline_or_original(
    inliner: &dyn CssInliner,
    html: &str,
    keep_style_tags: bool,
) -> (String, Option<String>) {
    match inliner.inline(html, keep_style_tags) {
        Ok(inlined) => (inlined, None),
        Err(e) => {
            warn!("CSS inlining skipped: {e:?}");
            (
                html.to_string(),
                Some("Styles could not be inlined; some email clients may ignore them.".into()),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Broken;

    impl CssInliner for Broken {
        fn inline(&self, _html: &str, _keep: bool) -> CampaignResult<String> {
            Err(raise_error!("boom".into(), ErrorCode::InternalError))
        }
    }

    #[test]
    fn styles_move_inline() {
        let html = "<html><head><style>p{color:red}</style></head><body><p>x</p></body></html>";
        let (out, warning) = inline_or_original(&CssInlineEngine, html, false);
        assert!(warning.is_none());
        assert!(out.contains("<p style="));
        assert!(out.contains("red"));
        assert!(!out.contains("<style>"));
    }

    #[test]
    fn preview_keeps_style_tags() {
        let html = "<html><head><style>p{color:red}</style></head><body><p>x</p></body></html>";
        let (out, _) = inline_or_original(&CssInlineEngine, html, true);
        assert!(out.contains("<style>"));
    }

    #[test]
    fn failure_returns_original_with_warning() {
        let (out, warning) = inline_or_original(&Broken, "<p>x</p>", false);
        assert_eq!(out, "<p>x</p>");
        assert!(warning.is_some());
    }
}
