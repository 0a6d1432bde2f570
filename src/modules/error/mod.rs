// Copyright © 2025 rustmailer.com
// Licensed under RustMailer License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use std::fmt::Formatter;

use crate::raise_error;
use bb8::RunError;
use code::ErrorCode;
use poem::http::StatusCode;
use poem_openapi::{payload::Json, ApiResponse, Object};
use snafu::{Location, Snafu};

pub mod code;
pub mod handler;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum CampaignError {
    #[snafu(display("{message}"))]
    Generic {
        message: String,
        #[snafu(implicit)]
        location: Location,
        code: ErrorCode,
    },
}

pub type CampaignResult<T, E = CampaignError> = std::result::Result<T, E>;

impl CampaignError {
    pub fn code(&self) -> ErrorCode {
        match self {
            CampaignError::Generic { code, .. } => *code,
        }
    }
}

impl From<RunError<CampaignError>> for CampaignError {
    fn from(e: RunError<CampaignError>) -> Self {
        match e {
            RunError::User(e) => e,
            RunError::TimedOut => raise_error!(
                "Timed out while attempting to acquire a connection from the pool".into(),
                ErrorCode::ConnectionPoolTimeout
            ),
        }
    }
}

#[derive(Debug, Clone, Object)]
pub struct ApiError {
    pub message: String,
    pub code: u32,
}

impl CampaignError {
    /// Logs client mistakes as warnings and everything else as errors.
    pub(crate) fn log(&self) {
        let CampaignError::Generic {
            message,
            location,
            code,
        } = self;
        if code.status().is_client_error() {
            tracing::warn!(error_code = *code as u32, %message, ?location, "request rejected");
        } else {
            tracing::error!(error_code = *code as u32, %message, ?location, "request failed");
        }
    }
}

impl From<CampaignError> for ApiErrorResponse {
    fn from(error: CampaignError) -> Self {
        error.log();
        let CampaignError::Generic { message, code, .. } = error;
        ApiErrorResponse::Generic(code.status(), Json(ApiError::new(message, code as u32)))
    }
}

impl ApiError {
    pub fn new(message: String, code: u32) -> Self {
        Self { message, code }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Error({}): {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

#[derive(Debug, Clone, ApiResponse)]
pub enum ApiErrorResponse {
    Generic(StatusCode, Json<ApiError>),
}
