// Copyright © 2025 rustmailer.com
// Licensed under RustMailer License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

pub mod drafts;
pub mod payload;
pub mod service;

#[cfg(test)]
mod tests;
