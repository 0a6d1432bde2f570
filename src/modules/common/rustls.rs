// Copyright © 2025 rustmailer.com
// Licensed under RustMailer License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use crate::modules::{context::Initialize, error::CampaignResult};
use tracing::debug;

pub struct TlsProvider;

impl Initialize for TlsProvider {
    async fn initialize() -> CampaignResult<()> {
        if rustls::crypto::CryptoProvider::install_default(
            rustls::crypto::ring::default_provider(),
        )
        .is_err()
        {
            debug!("A rustls crypto provider is already installed");
        }
        Ok(())
    }
}
