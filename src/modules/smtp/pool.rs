// Copyright © 2025 rustmailer.com
// Licensed under RustMailer License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use crate::modules::error::CampaignError;
use crate::modules::error::CampaignResult;
use crate::modules::smtp::client::Sender;
use crate::modules::smtp::client::SmtpConnection;
use crate::modules::smtp::manager::{SmtpClientManager, SmtpConfig};
use bb8::Pool;
use std::time::Duration;

impl bb8::ManageConnection for SmtpClientManager {
    type Connection = SmtpConnection;
    type Error = CampaignError;

    async fn connect(&self) -> CampaignResult<Self::Connection> {
        self.build().await
    }

    // call this function before using the connection
    async fn is_valid(&self, conn: &mut Self::Connection) -> CampaignResult<()> {
        conn.send_noop().await?;
        conn.reset().await
    }

    fn has_broken(&self, _: &mut Self::Connection) -> bool {
        false
    }
}

pub async fn build_smtp_pool(
    config: SmtpConfig,
    max_size: u32,
) -> CampaignResult<Pool<SmtpClientManager>> {
    let connection_timeout = config.timeout;
    let manager = SmtpClientManager::new(config);
    let pool = Pool::builder()
        .connection_timeout(connection_timeout)
        .idle_timeout(Duration::from_secs(120))
        .retry_connection(true)
        .max_size(max_size.max(1))
        .test_on_check_out(true)
        .build(manager)
        .await?;
    Ok(pool)
}
