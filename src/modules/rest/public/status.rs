// Copyright © 2025 rustmailer.com
// Licensed under RustMailer License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use crate::modules::settings::cli::SETTINGS;
use crate::modules::smtp::manager::SmtpConfig;
use crate::modules::tasks::TASK_STORE;
use crate::{mailer_version, utc_now};
use poem::{handler, web::Json, IntoResponse};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ServiceStatus {
    pub version: &'static str,
    pub llm_enabled: bool,
    pub smtp_configured: bool,
    /// Tasks held in memory since startup.
    pub tracked_tasks: usize,
    pub timestamp: i64,
}

impl ServiceStatus {
    pub fn get() -> Self {
        Self {
            version: mailer_version!(),
            llm_enabled: SETTINGS.llm_enabled(),
            smtp_configured: SmtpConfig::from_settings().is_ok(),
            tracked_tasks: TASK_STORE.len(),
            timestamp: utc_now!(),
        }
    }
}

#[handler]
pub async fn get_status() -> impl IntoResponse {
    Json(ServiceStatus::get())
}

#[cfg(test)]
mod tests {
    use super::ServiceStatus;

    #[test]
    fn status_reports_missing_smtp_configuration() {
        let status = ServiceStatus::get();
        assert!(!status.smtp_configured);
        assert_eq!(status.version, env!("CARGO_PKG_VERSION"));
        assert!(status.timestamp > 0);
    }
}
