// Copyright © 2025 rustmailer.com
// Licensed under RustMailer License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use poem::http::StatusCode;
use poem_openapi::Enum;

#[derive(Copy, Clone, Debug, Enum, Eq, PartialEq)]
#[repr(u32)]
pub enum ErrorCode {
    // Client-side errors (10000–10999)
    InvalidParameter = 10000,
    MissingConfiguration = 10020,
    PayloadTooLarge = 10070,
    MethodNotAllowed = 10090,

    // Resource errors (30000–30999)
    ResourceNotFound = 30000,

    // Network connection errors (40000–40999)
    ConnectionTimeout = 40010,
    ConnectionPoolTimeout = 40020,

    // Mail service errors (50000–50999)
    SmtpCommandFailed = 50030,
    SmtpConnectionFailed = 50040,

    // Language model errors (60000–60999)
    LlmRequestFailed = 60000,
    LlmResponseInvalid = 60010,

    // Internal system errors (70000–70999)
    InternalError = 70000,
    UnhandledPoemError = 70010,
}

impl ErrorCode {
    pub fn status(&self) -> StatusCode {
        match self {
            ErrorCode::InvalidParameter | ErrorCode::MissingConfiguration => {
                StatusCode::BAD_REQUEST
            }
            ErrorCode::ResourceNotFound => StatusCode::NOT_FOUND,
            ErrorCode::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            ErrorCode::LlmRequestFailed | ErrorCode::LlmResponseInvalid => StatusCode::BAD_GATEWAY,
            ErrorCode::InternalError
            | ErrorCode::SmtpCommandFailed
            | ErrorCode::SmtpConnectionFailed
            | ErrorCode::ConnectionTimeout
            | ErrorCode::ConnectionPoolTimeout
            | ErrorCode::UnhandledPoemError => StatusCode::INTERNAL_SERVER_ERROR,
            ErrorCode::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
        }
    }
}
