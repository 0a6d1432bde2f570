// Copyright © 2025 rustmailer.com
// Licensed under RustMailer License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use crate::modules::database::manager::DatabaseManager;
use crate::modules::database::{count_impl, insert_impl, scan_latest_impl};
use crate::modules::error::CampaignResult;
use entity::DeliveryLog;
use native_db::Database;
use std::future::Future;
use std::sync::Arc;

pub mod entity;

pub const STATUS_SENT: &str = "sent";
pub const STATUS_SKIPPED_EMPTY_BODY: &str = "skipped-empty-body";

pub fn failed_status(reason: &str) -> String {
    format!("failed: {}", reason)
}

/// Append-only store of delivery outcomes.
pub trait DeliveryJournal: Send + Sync + 'static {
    fn append(
        &self,
        email: &str,
        category: &str,
        subject: &str,
        status: &str,
    ) -> impl Future<Output = CampaignResult<()>> + Send;

    /// The newest `limit` entries, most recent first.
    fn recent(&self, limit: usize) -> impl Future<Output = CampaignResult<Vec<DeliveryLog>>> + Send;
}

#[derive(Clone)]
pub struct NativeDbJournal {
    db: Arc<Database<'static>>,
}

impl NativeDbJournal {
    pub fn new(db: Arc<Database<'static>>) -> Self {
        Self { db }
    }

    pub fn from_manager() -> CampaignResult<Self> {
        Ok(Self::new(DatabaseManager::get()?.meta_db().clone()))
    }

    pub async fn total(&self) -> CampaignResult<u64> {
        count_impl::<DeliveryLog>(&self.db).await
    }
}

impl DeliveryJournal for NativeDbJournal {
    async fn append(
        &self,
        email: &str,
        category: &str,
        subject: &str,
        status: &str,
    ) -> CampaignResult<()> {
        let entry = DeliveryLog::new(email, category, subject, status);
        insert_impl(&self.db, entry).await
    }

    async fn recent(&self, limit: usize) -> CampaignResult<Vec<DeliveryLog>> {
        scan_latest_impl::<DeliveryLog>(&self.db, limit).await
    }
}
