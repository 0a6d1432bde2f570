// Copyright © 2025 rustmailer.com
// Licensed under RustMailer License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use crate::modules::common::log::Tracing;
use crate::modules::error::code::ErrorCode;
use crate::modules::error::handler::{error_handler, ErrorCapture};
use crate::modules::error::CampaignResult;
use crate::modules::rest::public::status::get_status;
use crate::modules::{settings::cli::SETTINGS, utils::shutdown::shutdown_signal};

use super::error::ApiErrorResponse;
use crate::raise_error;
use api::create_openapi_service;
use poem::get;
use poem::listener::TcpListener;
use poem::middleware::{CatchPanic, Compression};
use poem::{middleware::Cors, EndpointExt, Route, Server};
use std::time::Duration;

pub mod api;
pub mod public;

pub type ApiResult<T, E = ApiErrorResponse> = std::result::Result<T, E>;

const DESCRIPTION: &str = r#"
    Campaign mailer for EduAI Hub.

    - Turns a short description, a greeting request or a catalog product into a branded HTML email.
    - Personalizes every copy with the recipient's name and sends in the background through SMTP.
    - Keeps a delivery log and per-task progress that can be polled while a send is running.
"#;

pub async fn start_http_server() -> CampaignResult<()> {
    let listener = TcpListener::bind((SETTINGS.mailer_bind_ip.clone(), SETTINGS.mailer_http_port));

    let api_service = create_openapi_service()
        .description(DESCRIPTION)
        .summary("Compose and bulk-send EduAI Hub marketing emails");

    let swagger = api_service.swagger_ui();
    let redoc = api_service.redoc();
    let scalar = api_service.scalar();
    let spec_json = api_service.spec_endpoint();
    let spec_yaml = api_service.spec_endpoint_yaml();

    let open_api_route = Route::new()
        .nest_no_strip("/api/v1", api_service)
        .with(ErrorCapture)
        .with(Tracing);

    let mut cors_origins = SETTINGS.mailer_cors_origins.clone();
    if cors_origins.is_empty() {
        cors_origins = ["*".to_string()].into_iter().collect();
    }

    let cors = Cors::new()
        .allow_origins(cors_origins)
        .allow_methods(vec!["GET", "POST", "OPTIONS", "HEAD"])
        .allow_headers(vec!["Content-Type"])
        .max_age(SETTINGS.mailer_cors_max_age);

    let route = Route::new()
        .nest("/api-docs/swagger", swagger)
        .nest("/api-docs/redoc", redoc)
        .nest("/api-docs/scalar", scalar)
        .nest("/api-docs/spec.json", spec_json)
        .nest("/api-docs/spec.yaml", spec_yaml)
        .nest("/api/status", get(get_status))
        .nest_no_strip("/api/v1", open_api_route)
        .with(cors)
        .with_if(SETTINGS.mailer_http_compression_enabled, Compression::new())
        .with(CatchPanic::new());

    let server = Server::new(listener)
        .name("EduAI Campaign Mailer")
        .idle_timeout(Duration::from_secs(60))
        .run_with_graceful_shutdown(
            route.catch_all_error(error_handler),
            shutdown_signal(),
            Some(Duration::from_secs(5)),
        );
    println!(
        "Campaign mailer API is now running on port {}.",
        SETTINGS.mailer_http_port
    );
    server
        .await
        .map_err(|e| raise_error!(format!("{:#?}", e), ErrorCode::InternalError))
}
