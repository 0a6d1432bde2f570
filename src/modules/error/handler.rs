// Copyright © 2025 rustmailer.com
// Licensed under RustMailer License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use crate::modules::error::{code::ErrorCode, ApiError, ApiErrorResponse, CampaignError};
use poem::error::ReadBodyError;
use poem::{Endpoint, IntoResponse, Middleware, Request, Response, Result};
use poem_openapi::payload::Json;

/// Converts every error escaping the API routes into the JSON error body.
pub struct ErrorCapture;

pub struct ErrorCaptureEndpoint<E> {
    ep: E,
}

impl<E: Endpoint> Middleware<E> for ErrorCapture {
    type Output = ErrorCaptureEndpoint<E>;

    fn transform(&self, ep: E) -> Self::Output {
        ErrorCaptureEndpoint { ep }
    }
}

impl<E: Endpoint> Endpoint for ErrorCaptureEndpoint<E> {
    type Output = Response;

    async fn call(&self, req: Request) -> Result<Self::Output> {
        match self.ep.call(req).await {
            Ok(response) => Ok(response.into_response()),
            Err(error) => Ok(error_handler(error).await.into_response()),
        }
    }
}

/// Maps poem's own request errors onto the service error codes.
fn classify(error: &poem::Error) -> Option<ErrorCode> {
    if error.is::<poem::error::NotFoundError>() {
        return Some(ErrorCode::ResourceNotFound);
    }
    if error.is::<poem::error::MethodNotAllowedError>() {
        return Some(ErrorCode::MethodNotAllowed);
    }
    if let Some(ReadBodyError::PayloadTooLarge) = error.downcast_ref::<ReadBodyError>() {
        return Some(ErrorCode::PayloadTooLarge);
    }
    let invalid_request = error.is::<poem::error::ParsePathError>()
        || error.is::<poem::error::ParseQueryError>()
        || error.is::<poem::error::ParseJsonError>()
        || error.is::<poem_openapi::error::ParseRequestPayloadError>()
        || error.is::<poem_openapi::error::ContentTypeError>()
        || error.is::<poem_openapi::error::ParseParamError>()
        || error.is::<poem_openapi::error::ParsePathError>();
    if invalid_request {
        return Some(ErrorCode::InvalidParameter);
    }
    None
}

pub async fn error_handler(error: poem::Error) -> impl poem::IntoResponse {
    if error.is::<CampaignError>() {
        return error.into_response();
    }

    let code = match classify(&error) {
        Some(code) => code,
        None if error.has_source() => ErrorCode::UnhandledPoemError,
        None => return error.into_response(),
    };

    let api_error = ApiError::new(error.to_string(), code as u32);
    let mut response = ApiErrorResponse::Generic(code.status(), Json(api_error)).into_response();
    response.set_status(error.status());
    response
}
