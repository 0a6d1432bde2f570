// Copyright © 2025 rustmailer.com
// Licensed under RustMailer License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use poem_openapi::Object;
use serde::{Deserialize, Serialize};

pub const BRAND_NAME: &str = "EduAI Hub";
pub const BRAND_HEADER: &str = "EduAIHub";
pub const BRAND_TAGLINE: &str = "Practical AI Tools for Education";
pub const BRAND_MOTTO: &str = "Where Education Meets Intelligence";
pub const BRAND_SITE_URL: &str = "https://eduaihub.in";
pub const BRAND_SITE_LABEL: &str = "eduaihub.in";

/// A static catalog entry.
#[derive(Debug)]
pub struct Product {
    pub key: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub link: &'static str,
    pub image_url: &'static str,
    pub pains: &'static [&'static str],
    pub features: &'static [&'static str],
}

pub static PRODUCTS: [Product; 3] = [
    Product {
        key: "class_tom",
        name: "Class Tom",
        description: "Revolutionize Any Classroom with AI — turns ordinary classrooms into intelligent, interactive learning spaces without extra hardware.",
        link: "https://www.eduaihub.in/class-tom/",
        image_url: "https://www.eduaihub.in/wp-content/uploads/2025/03/class_tom.jpg",
        pains: &[
            "Lack of affordable smart classroom solutions",
            "High setup costs and hardware dependencies",
            "Limited interactivity with traditional teaching tools",
        ],
        features: &[
            "Works offline — no internet required",
            "No additional hardware needed",
            "Teacher-friendly integrations and analytics",
        ],
    },
    Product {
        key: "vidya_hub",
        name: "Vidya Hub",
        description: "Teachers spend less time on paperwork and more time inspiring students — let AI handle grading, feedback, and planning.",
        link: "https://www.eduaihub.in/vidya-hub/",
        image_url: "https://www.eduaihub.in/wp-content/uploads/2025/03/vidya_hub.jpg",
        pains: &[
            "Overwhelming administrative workload for teachers",
            "Time-consuming grading and feedback processes",
            "Difficulty personalizing student feedback at scale",
        ],
        features: &[
            "Automated grading and feedback",
            "Lesson planning assistance",
            "Customizable teacher workflows",
        ],
    },
    Product {
        key: "ai_viz_lab",
        name: "AI Viz Lab",
        description: "Learning reimagined with AI and creativity — hands-on visual labs for students to explore and create.",
        link: "https://www.eduaihub.in/vidya-hub-2/",
        image_url: "https://www.eduaihub.in/wp-content/uploads/2025/03/ai_viz_lab.jpg",
        pains: &[
            "Lack of engaging, hands-on AI learning activities for students",
            "Limited opportunities for experimentation in traditional curricula",
            "Insufficient tools for visual learning and creativity with AI",
        ],
        features: &[
            "Interactive visual AI experiments",
            "Project-based learning modules",
            "Easy integration with classroom workflows",
        ],
    },
];

pub fn find(key: &str) -> Option<&'static Product> {
    PRODUCTS.iter().find(|p| p.key == key)
}

/// Accepts either the catalog key or the display name (case-insensitive).
pub fn resolve(key_or_name: &str) -> Option<&'static Product> {
    let needle = key_or_name.trim();
    if needle.is_empty() {
        return None;
    }
    find(needle).or_else(|| {
        PRODUCTS
            .iter()
            .find(|p| p.name.eq_ignore_ascii_case(needle))
    })
}

#[derive(Clone, Debug, Eq, PartialEq, Deserialize, Serialize, Object)]
pub struct ProductView {
    /// Catalog key, e.g. `class_tom`.
    pub key: String,
    pub name: String,
    pub description: String,
    pub link: String,
    pub image_url: String,
    /// Problems the product addresses, in display order.
    pub pains: Vec<String>,
    pub features: Vec<String>,
}

impl From<&Product> for ProductView {
    fn from(product: &Product) -> Self {
        Self {
            key: product.key.into(),
            name: product.name.into(),
            description: product.description.into(),
            link: product.link.into(),
            image_url: product.image_url.into(),
            pains: product.pains.iter().map(|s| s.to_string()).collect(),
            features: product.features.iter().map(|s| s.to_string()).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_by_key_and_name() {
        assert_eq!(resolve("vidya_hub").map(|p| p.name), Some("Vidya Hub"));
        assert_eq!(resolve("class tom").map(|p| p.key), Some("class_tom"));
        assert!(resolve("").is_none());
        assert!(resolve("unknown").is_none());
    }

    #[test]
    fn keys_are_unique() {
        for (i, a) in PRODUCTS.iter().enumerate() {
            for b in PRODUCTS.iter().skip(i + 1) {
                assert_ne!(a.key, b.key);
            }
        }
    }
}
