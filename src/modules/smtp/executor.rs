// Copyright © 2025 rustmailer.com
// Licensed under RustMailer License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use crate::modules::smtp::client::Sender;
use crate::modules::{error::CampaignResult, smtp::manager::SmtpClientManager};
use bb8::Pool;
use mail_send::smtp::message::IntoMessage;

pub struct SmtpExecutor {
    pool: Pool<SmtpClientManager>,
}

impl SmtpExecutor {
    pub fn new(pool: Pool<SmtpClientManager>) -> Self {
        Self { pool }
    }

    pub async fn send_email<'x>(&self, message: impl IntoMessage<'x>) -> CampaignResult<()> {
        let mut client = self.pool.get().await?;
        client.send_email(message).await
    }
}
