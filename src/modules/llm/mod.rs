// Copyright © 2025 rustmailer.com
// Licensed under RustMailer License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use crate::modules::error::CampaignResult;
use std::future::Future;

pub mod client;
pub mod greeting;
pub mod parse;
pub mod rewrite;

#[cfg(test)]
mod tests;

/// One system + user exchange with sampling limits.
#[derive(Clone, Debug, PartialEq)]
pub struct ChatRequest {
    pub system: String,
    pub user: String,
    pub max_tokens: u32,
    pub temperature: f32,
}

impl ChatRequest {
    pub fn new(system: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            system: system.into(),
            user: user.into(),
            max_tokens: 400,
            temperature: 0.6,
        }
    }

    pub fn max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }
}

/// Free-text completion backend. Callers treat every error as a signal to
/// fall back to local formatting.
pub trait TextGenerator: Send + Sync + 'static {
    fn generate(&self, request: &ChatRequest) -> impl Future<Output = CampaignResult<String>> + Send;
}
