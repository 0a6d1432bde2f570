// Copyright © 2025 rustmailer.com
// Licensed under RustMailer License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use crate::modules::logger::LocalTimer;
use crate::modules::settings::cli::SETTINGS;
use crate::modules::settings::dir::DATA_DIR_MANAGER;
use std::sync::OnceLock;
use tracing::level_filters::LevelFilter;
use tracing::Level;
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::fmt;
use tracing_subscriber::layer::SubscriberExt;

pub static LOG_WORKER_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

pub fn setup_file_logger(level: Level) -> Result<(), tracing::dispatcher::SetGlobalDefaultError> {
    let server_nonb = match server_log_writer() {
        Some(writer) => writer,
        None => return super::setup_stdout_logger(level),
    };

    let registry = tracing_subscriber::registry().with(LevelFilter::from_level(level));
    let layer = fmt::layer()
        .with_timer(LocalTimer)
        .with_ansi(false)
        .with_level(true)
        .with_writer(server_nonb)
        .with_target(true);

    if SETTINGS.mailer_json_logs {
        tracing::subscriber::set_global_default(registry.with(layer.json()))
    } else {
        tracing::subscriber::set_global_default(registry.with(layer))
    }
}

fn server_log_writer() -> Option<NonBlocking> {
    let rolling = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix("server")
        .max_log_files(SETTINGS.mailer_max_server_log_files)
        .build(DATA_DIR_MANAGER.log_dir.clone());
    let rolling = match rolling {
        Ok(rolling) => rolling,
        Err(e) => {
            eprintln!("Failed to initialize rolling file appender, logging to stdout: {e}");
            return None;
        }
    };
    let (nb, guard) = tracing_appender::non_blocking(rolling);
    let _ = LOG_WORKER_GUARD.set(guard);
    Some(nb)
}
