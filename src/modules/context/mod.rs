// Copyright © 2025 rustmailer.com
// Licensed under RustMailer License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use crate::modules::error::CampaignResult;

pub trait Initialize {
    async fn initialize() -> CampaignResult<()>;
}
