// Copyright © 2025 rustmailer.com
// Licensed under RustMailer License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use super::error::CampaignError;
use poem::error::ResponseError;
use poem::Body;
use poem::{http::StatusCode, Response};

pub mod log;
pub mod rustls;
pub mod signal;

impl ResponseError for CampaignError {
    fn status(&self) -> StatusCode {
        self.code().status()
    }

    fn as_response(&self) -> Response
    where
        Self: std::error::Error + Send + Sync + 'static,
    {
        self.log();
        let code = self.code();
        let body = Body::from_json(serde_json::json!({
            "code": code as u32,
            "message": self.to_string(),
        }))
        .unwrap_or_else(|_| Body::from_string(self.to_string()));

        Response::builder().status(code.status()).body(body)
    }
}
