// Copyright © 2025 rustmailer.com
// Licensed under RustMailer License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use crate::modules::error::code::ErrorCode;
use crate::modules::error::{CampaignError, CampaignResult};
use crate::modules::settings::cli::SETTINGS;
use crate::modules::smtp::executor::SmtpExecutor;
use crate::modules::smtp::manager::{SmtpClientManager, SmtpConfig};
use crate::modules::smtp::pool::build_smtp_pool;
use crate::modules::smtp::util::generate_message_id;
use crate::modules::tasks::attachment::StagedAttachment;
use crate::{raise_error, run_with_timeout};
use mail_send::mail_builder::headers::address::Address;
use mail_send::mail_builder::MessageBuilder;
use std::borrow::Cow;
use std::future::Future;
use std::sync::{Arc, LazyLock};
use std::time::Duration;
use tokio::sync::OnceCell;
use tracing::{debug, info};

pub const PLAIN_TEXT_FALLBACK: &str = "This email requires an HTML-capable client.";
const LOGIN_CHECK_TIMEOUT: Duration = Duration::from_secs(15);

/// Shared by the send queue and single preview sends.
pub static SMTP_TRANSPORT: LazyLock<Arc<SmtpTransport>> =
    LazyLock::new(|| Arc::new(SmtpTransport::new()));

/// One fully rendered message for one recipient.
#[derive(Clone, Debug, Default)]
pub struct OutgoingEmail {
    pub to: String,
    pub subject: String,
    pub html: String,
    pub sender_name: Option<String>,
    pub attachments: Arc<[StagedAttachment]>,
}

/// Sends a single email. Implementations own their connection handling.
pub trait Transport: Send + Sync + 'static {
    fn send(&self, email: OutgoingEmail) -> impl Future<Output = CampaignResult<()>> + Send;
}

/// SMTP delivery through a lazily created connection pool.
#[derive(Default)]
pub struct SmtpTransport {
    executor: OnceCell<SmtpExecutor>,
}

impl SmtpTransport {
    pub fn new() -> Self {
        Self::default()
    }

    async fn executor(&self) -> CampaignResult<&SmtpExecutor> {
        self.executor
            .get_or_try_init(|| async {
                let config = SmtpConfig::from_settings()?;
                info!("Opening SMTP pool for {:?}", config);
                let pool = build_smtp_pool(config, SETTINGS.send_concurrency as u32).await?;
                Ok::<_, CampaignError>(SmtpExecutor::new(pool))
            })
            .await
    }

    /// Connects and authenticates once without sending anything.
    pub async fn check_login() -> CampaignResult<&'static str> {
        let config = SmtpConfig::from_settings()?.with_timeout(LOGIN_CHECK_TIMEOUT);
        let manager = SmtpClientManager::new(config);
        run_with_timeout!(
            LOGIN_CHECK_TIMEOUT,
            manager.build(),
            raise_error!(
                "Timed out connecting to the SMTP server".into(),
                ErrorCode::ConnectionTimeout
            )
        )??;
        Ok("SMTP login successful")
    }
}

/// Assembles the MIME message: HTML body, plain-text fallback, attachments
/// and inline images by content id.
pub async fn build_message(
    from_email: &str,
    email: &OutgoingEmail,
) -> CampaignResult<MessageBuilder<'static>> {
    let sender_name = email
        .sender_name
        .as_deref()
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .map(|n| Cow::Owned(n.to_string()));
    let mut builder = MessageBuilder::new()
        .from(Address::new_address(
            sender_name,
            Cow::Owned(from_email.to_string()),
        ))
        .to(Address::new_address(
            None::<Cow<'static, str>>,
            Cow::Owned(email.to.clone()),
        ))
        .subject(email.subject.clone())
        .message_id(generate_message_id(from_email))
        .text_body(PLAIN_TEXT_FALLBACK)
        .html_body(email.html.clone());

    for attachment in email.attachments.iter() {
        let content = attachment.read().await?;
        builder = match &attachment.content_id {
            Some(cid) => builder.inline(attachment.mime_type.clone(), cid.clone(), content),
            None => builder.attachment(
                attachment.mime_type.clone(),
                attachment.file_name.clone(),
                content,
            ),
        };
    }
    Ok(builder)
}

impl Transport for SmtpTransport {
    async fn send(&self, email: OutgoingEmail) -> CampaignResult<()> {
        let from_email = SETTINGS
            .smtp_email
            .as_deref()
            .map(str::trim)
            .filter(|e| !e.is_empty())
            .ok_or_else(|| {
                raise_error!(
                    "SMTP settings not configured: smtp_email is missing".into(),
                    ErrorCode::MissingConfiguration
                )
            })?;
        let message = build_message(from_email, &email).await?;
        self.executor().await?.send_email(message).await?;
        debug!("Delivered '{}' to {}", email.subject, email.to);
        Ok(())
    }
}
