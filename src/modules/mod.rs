// Copyright © 2025 rustmailer.com
// Licensed under RustMailer License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

pub mod campaign;
pub mod catalog;
pub mod common;
pub mod composer;
pub mod context;
pub mod database;
pub mod error;
pub mod journal;
pub mod llm;
pub mod logger;
pub mod recipients;
pub mod rest;
pub mod settings;
pub mod smtp;
pub mod tasks;
pub mod template;
pub mod utils;
