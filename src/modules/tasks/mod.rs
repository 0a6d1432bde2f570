// Copyright © 2025 rustmailer.com
// Licensed under RustMailer License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use crate::modules::common::signal::SIGNAL_MANAGER;
use crate::modules::context::Initialize;
use crate::modules::error::code::ErrorCode;
use crate::modules::error::CampaignResult;
use crate::modules::journal::NativeDbJournal;
use crate::modules::settings::cli::SETTINGS;
use crate::modules::smtp::transport::SMTP_TRANSPORT;
use crate::raise_error;
use processor::SendQueue;
use std::sync::{Arc, LazyLock, OnceLock};
use std::time::Duration;
use store::MemoryTaskStore;
use tracing::info;
use worker::Worker;

pub mod attachment;
pub mod model;
pub mod processor;
pub mod store;
pub mod worker;

#[cfg(test)]
mod tests;

/// Progress of every task accepted since startup.
pub static TASK_STORE: LazyLock<Arc<MemoryTaskStore>> =
    LazyLock::new(|| Arc::new(MemoryTaskStore::new()));

static SEND_QUEUE: OnceLock<SendQueue> = OnceLock::new();

impl SendQueue {
    pub fn get() -> CampaignResult<&'static SendQueue> {
        SEND_QUEUE.get().ok_or_else(|| {
            raise_error!("SendQueue not initialized".into(), ErrorCode::InternalError)
        })
    }
}

impl Initialize for SendQueue {
    async fn initialize() -> CampaignResult<()> {
        let worker = Worker::new(
            SMTP_TRANSPORT.clone(),
            TASK_STORE.clone(),
            Arc::new(NativeDbJournal::from_manager()?),
            Duration::from_millis(SETTINGS.send_interval_ms),
        );
        let limit = SETTINGS.send_concurrency as usize;
        if SEND_QUEUE.set(SendQueue::new(worker, limit)).is_err() {
            return Err(raise_error!(
                "SendQueue already initialized".into(),
                ErrorCode::InternalError
            ));
        }
        info!("Send queue started with {} concurrent workers", limit.max(1));

        tokio::spawn(async move {
            let mut shutdown = SIGNAL_MANAGER.subscribe();
            if shutdown.recv().await.is_ok() {
                if let Some(queue) = SEND_QUEUE.get() {
                    queue.shutdown().await;
                }
            }
        });
        Ok(())
    }
}
