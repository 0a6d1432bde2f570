// Copyright © 2025 rustmailer.com
// Licensed under RustMailer License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use crate::modules::context::Initialize;
use crate::modules::database::META_MODELS;
use crate::modules::error::{code::ErrorCode, CampaignError, CampaignResult};
use crate::modules::settings::cli::SETTINGS;
use crate::modules::settings::dir::DATA_DIR_MANAGER;
use crate::raise_error;
use native_db::{Builder, Database};
use std::sync::{Arc, OnceLock};
use tracing::info;

pub static DB_MANAGER: OnceLock<DatabaseManager> = OnceLock::new();

pub struct DatabaseManager {
    /// Metadata database instance, holds the delivery log
    meta_db: Arc<Database<'static>>,
}

impl DatabaseManager {
    pub fn get() -> CampaignResult<&'static DatabaseManager> {
        DB_MANAGER.get().ok_or_else(|| {
            raise_error!(
                "Database accessed before initialization".into(),
                ErrorCode::InternalError
            )
        })
    }

    pub fn meta_db(&self) -> &Arc<Database<'static>> {
        &self.meta_db
    }

    fn init_meta_database() -> CampaignResult<Arc<Database<'static>>> {
        info!(
            "Initializing metadata database at: {:?}",
            &DATA_DIR_MANAGER.meta_db
        );
        let mut database = Builder::new()
            .set_cache_size(SETTINGS.mailer_log_cache_size.max(8388608))
            .create(&META_MODELS, DATA_DIR_MANAGER.meta_db.clone())
            .map_err(Self::handle_database_error)?;
        database
            .compact()
            .map_err(|e| raise_error!(format!("{:#?}", e), ErrorCode::InternalError))?;
        Ok(Arc::new(database))
    }

    fn handle_database_error(error: native_db::db_type::Error) -> CampaignError {
        match error {
            native_db::db_type::Error::RedbDatabaseError(database_error) => match database_error {
                redb::DatabaseError::DatabaseAlreadyOpen => {
                    raise_error!(
                        "Database is already open by another instance".into(),
                        ErrorCode::InternalError
                    )
                }
                other => {
                    raise_error!(
                        format!("Database error: {:?}", other),
                        ErrorCode::InternalError
                    )
                }
            },
            other => {
                raise_error!(
                    format!("Failed to create database: {:?}", other),
                    ErrorCode::InternalError
                )
            }
        }
    }
}

impl Initialize for DatabaseManager {
    async fn initialize() -> CampaignResult<()> {
        let meta_db = Self::init_meta_database()?;
        let _ = DB_MANAGER.set(DatabaseManager { meta_db });
        Ok(())
    }
}
