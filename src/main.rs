// Copyright © 2025 rustmailer.com
// Licensed under RustMailer License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use mimalloc::MiMalloc;
use modules::{
    common::{rustls::TlsProvider, signal::SignalManager},
    context::Initialize,
    database::manager::DatabaseManager,
    error::CampaignResult,
    logger,
    rest::start_http_server,
    settings::{cli::SETTINGS, dir::DataDirManager},
    tasks::processor::SendQueue,
};
use tracing::{error, info, warn};

mod modules;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

static LOGO: &str = r#"
  _____    _       _    ___   __  __       _ _
 | ____|__| |_   _/ \  |_ _| |  \/  | __ _(_) | ___ _ __
 |  _| / _` | | | / _ \  | |  | |\/| |/ _` | | |/ _ \ '__|
 | |__| (_| | |_| / ___ \ | |  | |  | | (_| | | |  __/ |
 |_____\__,_|\__,_/_/   \_\___| |_|  |_|\__,_|_|_|\___|_|
"#;

#[tokio::main]
async fn main() -> CampaignResult<()> {
    logger::initialize_logging();
    info!("{}", LOGO);
    info!("Starting campaign-mailer");
    info!("Version:  {}", mailer_version!());

    if let Err(error) = initialize().await {
        eprintln!("{:?}", error);
        return Err(error);
    }

    if let Err(e) = start_http_server().await {
        error!("Failed to start REST server: {}", e);
        return Err(e);
    }
    Ok(())
}

/// Prepares storage, TLS and the send queue before the API accepts requests.
async fn initialize() -> CampaignResult<()> {
    SignalManager::initialize().await?;
    DataDirManager::initialize().await?;
    DatabaseManager::initialize().await?;
    TlsProvider::initialize().await?;
    SendQueue::initialize().await?;

    if SETTINGS.smtp_server.is_none() {
        warn!("SMTP is not configured; previews work but sends will be refused");
    }
    if !SETTINGS.llm_enabled() {
        info!("No language model configured; copy is formatted locally");
    }
    Ok(())
}
