// Copyright © 2025 rustmailer.com
// Licensed under RustMailer License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use crate::modules::rest::api::ApiTags;
use crate::modules::rest::ApiResult;
use crate::modules::smtp::transport::SmtpTransport;
use poem_openapi::payload::PlainText;
use poem_openapi::OpenApi;

pub struct SmtpApi;

#[OpenApi(prefix_path = "/api/v1", tag = "ApiTags::Smtp")]
impl SmtpApi {
    /// Connects to the configured SMTP server and authenticates without sending.
    #[oai(method = "post", path = "/smtp/test", operation_id = "test_smtp_login")]
    async fn test_login(&self) -> ApiResult<PlainText<String>> {
        let message = SmtpTransport::check_login().await?;
        Ok(PlainText(message.to_string()))
    }
}
