// Copyright © 2025 rustmailer.com
// Licensed under RustMailer License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use std::sync::LazyLock;

use crate::modules::{
    context::Initialize, error::CampaignResult, utils::shutdown::shutdown_signal,
};
use tokio::sync::broadcast;
use tracing::info;

pub static SIGNAL_MANAGER: LazyLock<SignalManager> = LazyLock::new(SignalManager::new);

pub struct SignalManager {
    sender: broadcast::Sender<()>,
}

impl SignalManager {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(1);
        SignalManager { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.sender.subscribe()
    }

    /// Number of components currently waiting for shutdown.
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Initialize for SignalManager {
    async fn initialize() -> CampaignResult<()> {
        tokio::spawn({
            async move {
                shutdown_signal().await;
                info!(
                    "Shutdown signal received, notifying {} subscribers",
                    SIGNAL_MANAGER.subscriber_count()
                );
                let _ = SIGNAL_MANAGER.sender.send(());
            }
        });
        Ok(())
    }
}
