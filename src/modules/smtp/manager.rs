// Copyright © 2025 rustmailer.com
// Licensed under RustMailer License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use crate::modules::error::code::ErrorCode;
use crate::modules::error::CampaignResult;
use crate::modules::settings::cli::{Encryption, SETTINGS};
use crate::modules::smtp::client::SmtpConnection;
use crate::raise_error;
use mail_send::{Credentials, SmtpClientBuilder};
use std::time::Duration;

/// Connection details for the single outbound mailbox.
#[derive(Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub email: String,
    pub password: String,
    pub encryption: Encryption,
    pub timeout: Duration,
}

impl std::fmt::Debug for SmtpConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmtpConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("email", &self.email)
            .field("encryption", &self.encryption)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

fn required(value: &Option<String>, name: &str) -> CampaignResult<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(String::from)
        .ok_or_else(|| {
            raise_error!(
                format!("SMTP settings not configured: {name} is missing"),
                ErrorCode::MissingConfiguration
            )
        })
}

impl SmtpConfig {
    pub fn from_settings() -> CampaignResult<Self> {
        Ok(Self {
            host: required(&SETTINGS.smtp_server, "smtp_server")?,
            port: SETTINGS.smtp_port,
            email: required(&SETTINGS.smtp_email, "smtp_email")?,
            password: required(&SETTINGS.smtp_password, "smtp_password")?,
            encryption: SETTINGS.smtp_encryption,
            timeout: Duration::from_secs(SETTINGS.smtp_timeout_secs),
        })
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

pub struct SmtpClientManager {
    config: SmtpConfig,
}

impl SmtpClientManager {
    pub fn new(config: SmtpConfig) -> Self {
        Self { config }
    }

    /// Opens a connection and authenticates.
    pub async fn build(&self) -> CampaignResult<SmtpConnection> {
        let config = &self.config;
        let builder = SmtpClientBuilder::new(config.host.clone(), config.port)
            .credentials(Credentials::new(config.email.clone(), config.password.clone()))
            .timeout(config.timeout);

        let client = match config.encryption {
            Encryption::Ssl => {
                let client = builder.implicit_tls(true).connect().await.map_err(|e| {
                    raise_error!(format!("{}", e), ErrorCode::SmtpConnectionFailed)
                })?;
                SmtpConnection::Tls(client)
            }
            Encryption::StartTls => {
                let client = builder.implicit_tls(false).connect().await.map_err(|e| {
                    raise_error!(format!("{}", e), ErrorCode::SmtpConnectionFailed)
                })?;
                SmtpConnection::Tls(client)
            }
            Encryption::None => {
                let client = builder.connect_plain().await.map_err(|e| {
                    raise_error!(format!("{}", e), ErrorCode::SmtpConnectionFailed)
                })?;
                SmtpConnection::Plain(client)
            }
        };

        Ok(client)
    }
}
