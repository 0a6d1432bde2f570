// Copyright © 2025 rustmailer.com
// Licensed under RustMailer License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use std::{
    num::NonZeroU32,
    sync::LazyLock,
    time::{Duration, Instant},
};

use governor::{
    clock::{QuantaClock, QuantaInstant},
    middleware::NoOpMiddleware,
    state::{InMemoryState, NotKeyed},
    Quota, RateLimiter,
};
use poem::{
    http::header, web::RealIp, Endpoint, FromRequest, IntoResponse, Middleware, Request, Response,
    Result,
};
use poem_openapi::OperationId;
use tracing::{error, info, warn, Instrument};

type AccessRateLimiter =
    RateLimiter<NotKeyed, InMemoryState, QuantaClock, NoOpMiddleware<QuantaInstant>>;

/// Cells refilled per second; an error costs one, a success five.
const ACCESS_LOG_BUDGET: u32 = 10;

static ACCESS_LOG_LIMITER: LazyLock<AccessLogLimiter> =
    LazyLock::new(|| AccessLogLimiter::per_second(ACCESS_LOG_BUDGET));

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Outcome {
    ServerError,
    ClientError,
    Success,
}

impl Outcome {
    fn of(status: u16) -> Self {
        match status {
            500.. => Outcome::ServerError,
            400..=499 => Outcome::ClientError,
            _ => Outcome::Success,
        }
    }

    fn cost(self) -> NonZeroU32 {
        match self {
            Outcome::ServerError => NonZeroU32::MIN,
            Outcome::ClientError => NonZeroU32::MIN.saturating_add(2),
            Outcome::Success => NonZeroU32::MIN.saturating_add(4),
        }
    }
}

/// Keeps polling clients (task progress, status) from flooding the log.
struct AccessLogLimiter {
    limiter: AccessRateLimiter,
}

impl AccessLogLimiter {
    fn per_second(cells: u32) -> Self {
        let cells = NonZeroU32::new(cells).unwrap_or(NonZeroU32::MIN);
        Self {
            limiter: RateLimiter::direct(Quota::per_second(cells)),
        }
    }

    fn admit(&self, outcome: Outcome) -> bool {
        matches!(self.limiter.check_n(outcome.cost()), Ok(Ok(())))
    }
}

/// Wraps every API call in a `request` span and logs its completion.
#[derive(Default)]
pub struct Tracing;

impl<E: Endpoint> Middleware<E> for Tracing {
    type Output = TracingEndpoint<E>;

    fn transform(&self, ep: E) -> Self::Output {
        TracingEndpoint { inner: ep }
    }
}

pub struct TracingEndpoint<E> {
    inner: E,
}

impl<E: Endpoint> Endpoint for TracingEndpoint<E> {
    type Output = Response;

    async fn call(&self, req: Request) -> Result<Self::Output> {
        let remote_addr = RealIp::from_request_without_body(&req)
            .await
            .ok()
            .and_then(|real_ip| real_ip.0)
            .map(|addr| addr.to_string())
            .unwrap_or_else(|| req.remote_addr().to_string());
        let content_length = req
            .headers()
            .get(header::CONTENT_LENGTH)
            .and_then(|v| v.to_str().ok().map(|v| v.to_string()));

        let span = tracing::info_span!(
            "request",
            remote_addr = %remote_addr,
            method = %req.method(),
            path = %req.uri().path(),
            query = ?req.uri().query(),
            content_length = ?content_length,
        );

        async move {
            let started = Instant::now();
            match self.inner.call(req).await {
                Ok(resp) => {
                    let resp = resp.into_response();
                    let operation = resp.data::<OperationId>().map(|id| id.0);
                    log_completion(resp.status().as_u16(), operation, started.elapsed());
                    Ok(resp)
                }
                Err(err) => {
                    log_completion(err.status().as_u16(), None, started.elapsed());
                    Err(err)
                }
            }
        }
        .instrument(span)
        .await
    }
}

fn log_completion(status: u16, operation: Option<&str>, duration: Duration) {
    let outcome = Outcome::of(status);
    if !ACCESS_LOG_LIMITER.admit(outcome) {
        return;
    }
    match outcome {
        Outcome::ServerError => error!(status, operation = ?operation, duration = ?duration, "request failed"),
        Outcome::ClientError => warn!(status, operation = ?operation, duration = ?duration, "request rejected"),
        Outcome::Success => info!(status, operation = ?operation, duration = ?duration, "request completed"),
    }
}
