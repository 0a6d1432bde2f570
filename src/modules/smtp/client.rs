// Copyright © 2025 rustmailer.com
// Licensed under RustMailer License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use crate::modules::error::code::ErrorCode;
use crate::modules::error::CampaignResult;
use crate::raise_error;
use mail_send::smtp::message::IntoMessage;
use mail_send::SmtpClient;
use tokio::net::TcpStream;
use tokio_rustls::client::TlsStream;

pub enum SmtpConnection {
    Plain(SmtpClient<TcpStream>),
    Tls(SmtpClient<TlsStream<TcpStream>>),
}

pub(crate) trait Sender {
    async fn send_noop(&mut self) -> CampaignResult<()>;
    async fn reset(&mut self) -> CampaignResult<()>;
    async fn send_email<'x>(&mut self, message: impl IntoMessage<'x>) -> CampaignResult<()>;
}

impl Sender for SmtpConnection {
    async fn send_noop(&mut self) -> CampaignResult<()> {
        match self {
            SmtpConnection::Plain(smtp_client) => smtp_client
                .noop()
                .await
                .map_err(|e| raise_error!(format!("{:#?}", e), ErrorCode::SmtpCommandFailed)),
            SmtpConnection::Tls(smtp_client) => smtp_client
                .noop()
                .await
                .map_err(|e| raise_error!(format!("{:#?}", e), ErrorCode::SmtpCommandFailed)),
        }
    }

    async fn reset(&mut self) -> CampaignResult<()> {
        match self {
            SmtpConnection::Plain(smtp_client) => smtp_client
                .rset()
                .await
                .map_err(|e| raise_error!(format!("{:#?}", e), ErrorCode::SmtpCommandFailed)),
            SmtpConnection::Tls(smtp_client) => smtp_client
                .rset()
                .await
                .map_err(|e| raise_error!(format!("{:#?}", e), ErrorCode::SmtpCommandFailed)),
        }
    }

    async fn send_email<'x>(&mut self, message: impl IntoMessage<'x>) -> CampaignResult<()> {
        match self {
            SmtpConnection::Plain(smtp_client) => smtp_client
                .send(message)
                .await
                .map_err(|e| raise_error!(format!("{}", e), ErrorCode::SmtpCommandFailed)),
            SmtpConnection::Tls(smtp_client) => smtp_client
                .send(message)
                .await
                .map_err(|e| raise_error!(format!("{}", e), ErrorCode::SmtpCommandFailed)),
        }
    }
}
