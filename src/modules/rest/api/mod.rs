// Copyright © 2025 rustmailer.com
// Licensed under RustMailer License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use campaign::CampaignApi;
use catalog::CatalogApi;
use logs::LogsApi;
use poem_openapi::{OpenApiService, Tags};
use smtp::SmtpApi;
use task::TaskApi;

use crate::mailer_version;

pub mod campaign;
pub mod catalog;
pub mod logs;
pub mod smtp;
pub mod task;

#[derive(Tags)]
pub enum ApiTags {
    Catalog,
    Campaign,
    Task,
    Logs,
    Smtp,
}

type CampaignOpenApi = (CatalogApi, CampaignApi, TaskApi, LogsApi, SmtpApi);

pub fn create_openapi_service() -> OpenApiService<CampaignOpenApi, ()> {
    OpenApiService::new(
        (CatalogApi, CampaignApi, TaskApi, LogsApi, SmtpApi),
        "EduAI Campaign Mailer Api",
        mailer_version!(),
    )
}
