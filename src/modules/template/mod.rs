// Copyright © 2025 rustmailer.com
// Licensed under RustMailer License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use crate::modules::catalog::{
    ProductView, BRAND_HEADER, BRAND_MOTTO, BRAND_NAME, BRAND_SITE_LABEL, BRAND_SITE_URL,
    BRAND_TAGLINE,
};
use crate::modules::error::code::ErrorCode;
use crate::modules::error::CampaignResult;
use crate::raise_error;
use handlebars::Handlebars;
use serde::Serialize;

/// Page layouts compiled into the binary.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Layout {
    Default,
    Event,
    Greeting,
    Product,
    Bulk,
}

impl Layout {
    fn name(&self) -> &'static str {
        match self {
            Layout::Default => "default",
            Layout::Event => "event",
            Layout::Greeting => "greeting",
            Layout::Product => "product",
            Layout::Bulk => "bulk",
        }
    }

    fn source(&self) -> &'static str {
        match self {
            Layout::Default => include_str!("html/default.hbs"),
            Layout::Event => include_str!("html/event.hbs"),
            Layout::Greeting => include_str!("html/greeting.hbs"),
            Layout::Product => include_str!("html/product.hbs"),
            Layout::Bulk => include_str!("html/bulk.hbs"),
        }
    }
}

/// Brand strings shared by every layout footer and header.
#[derive(Clone, Debug, Serialize)]
pub struct Branding {
    pub brand_header: &'static str,
    pub tagline: &'static str,
    pub motto: &'static str,
    pub site_url: &'static str,
    pub site_label: &'static str,
}

impl Default for Branding {
    fn default() -> Self {
        Self {
            brand_header: BRAND_HEADER,
            tagline: BRAND_TAGLINE,
            motto: BRAND_MOTTO,
            site_url: BRAND_SITE_URL,
            site_label: BRAND_SITE_LABEL,
        }
    }
}

pub fn sender_or_brand(sender_name: &str) -> String {
    let trimmed = sender_name.trim();
    if trimmed.is_empty() {
        BRAND_NAME.to_string()
    } else {
        trimmed.to_string()
    }
}

#[derive(Debug, Serialize)]
pub struct DefaultPage {
    #[serde(flatten)]
    pub branding: Branding,
    pub subject: String,
    pub sender_name: String,
    pub gif_url: Option<String>,
    pub fragment: String,
}

#[derive(Debug, Serialize)]
pub struct EventPage {
    #[serde(flatten)]
    pub branding: Branding,
    pub title: String,
    pub event_date: String,
    pub event_time: String,
    pub event_location: String,
    pub cta_text: String,
    pub cta_link: String,
    pub sender_name: String,
    pub footer_text: String,
    pub gif_url: Option<String>,
    pub fragment: String,
}

#[derive(Debug, Serialize)]
pub struct GreetingPage {
    #[serde(flatten)]
    pub branding: Branding,
    pub hook: String,
    /// Rendered as `Hi <salutation>,` when present.
    pub salutation: Option<String>,
    pub greeting: String,
    pub main_body: String,
    pub closing: String,
    pub sender_name: String,
}

#[derive(Debug, Serialize)]
pub struct ProductPage {
    #[serde(flatten)]
    pub branding: Branding,
    pub product: ProductView,
    pub hook: String,
    pub note: String,
    pub sender_name: String,
}

#[derive(Debug, Serialize)]
pub struct BulkPage {
    #[serde(flatten)]
    pub branding: Branding,
    pub products: Vec<ProductView>,
    pub intro: String,
    pub banner_url: Option<String>,
    pub sender_name: String,
}

pub struct Templates;

impl Templates {
    pub fn render<T: Serialize>(layout: Layout, data: &T) -> CampaignResult<String> {
        let mut handlebars = Handlebars::new();
        handlebars.set_strict_mode(false);
        let name = layout.name();
        handlebars
            .register_template_string(name, layout.source())
            .map_err(|e| {
                raise_error!(
                    format!("Handlebars register '{name}' error: {e}"),
                    ErrorCode::InternalError
                )
            })?;
        handlebars.render(name, data).map_err(|e| {
            raise_error!(
                format!("Handlebars render '{name}' error: {e}"),
                ErrorCode::InternalError
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::catalog::{self, PRODUCTS};

    #[test]
    fn default_page_embeds_fragment_unescaped() {
        let html = Templates::render(
            Layout::Default,
            &DefaultPage {
                branding: Branding::default(),
                subject: "Save <time>".into(),
                sender_name: sender_or_brand(""),
                gif_url: None,
                fragment: "<p>Fragment</p>".into(),
            },
        )
        .unwrap();
        assert!(html.contains("<p>Fragment</p>"));
        assert!(html.contains("Save &lt;time&gt;"));
        assert!(html.contains("EduAI Hub • <a href=\"https://eduaihub.in\">eduaihub.in</a>"));
        assert!(!html.contains("<img"));
    }

    #[test]
    fn every_layout_registers() {
        for layout in [
            Layout::Default,
            Layout::Event,
            Layout::Greeting,
            Layout::Product,
            Layout::Bulk,
        ] {
            let mut handlebars = Handlebars::new();
            assert!(
                handlebars
                    .register_template_string(layout.name(), layout.source())
                    .is_ok(),
                "{layout:?}"
            );
        }
    }

    #[test]
    fn bulk_lists_all_products() {
        let html = Templates::render(
            Layout::Bulk,
            &BulkPage {
                branding: Branding::default(),
                products: PRODUCTS.iter().map(ProductView::from).collect(),
                intro: "New tools this term".into(),
                banner_url: Some(PRODUCTS[0].image_url.into()),
                sender_name: "EduAI".into(),
            },
        )
        .unwrap();
        for product in PRODUCTS.iter() {
            assert!(html.contains(&format!("Learn more about {}", product.name)));
        }
        assert!(html.contains("New tools this term"));
    }

    #[test]
    fn product_page_lists_pains_and_features() {
        let product = catalog::find("ai_viz_lab").unwrap();
        let html = Templates::render(
            Layout::Product,
            &ProductPage {
                branding: Branding::default(),
                product: product.into(),
                hook: String::new(),
                note: "See you in class".into(),
                sender_name: "EduAI".into(),
            },
        )
        .unwrap();
        assert!(html.contains("Interactive visual AI experiments"));
        assert!(html.contains("See you in class"));
        assert!(!html.contains("class=\"hook\""));
    }
}
