// Copyright © 2025 rustmailer.com
// Licensed under RustMailer License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use crate::modules::context::Initialize;
use crate::modules::settings::cli::SETTINGS;
use crate::{
    modules::error::{code::ErrorCode, CampaignResult},
    raise_error,
};
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

pub const META_FILE: &str = "meta.db";
const LOG_DIR: &str = "logs";
const ATTACHMENT_DIR: &str = "attachments";

pub static DATA_DIR_MANAGER: LazyLock<DataDirManager> =
    LazyLock::new(|| DataDirManager::new(PathBuf::from(&SETTINGS.mailer_root_dir)));

#[derive(Debug)]
pub struct DataDirManager {
    pub root_dir: PathBuf,
    pub meta_db: PathBuf,
    pub log_dir: PathBuf,
    pub attachment_dir: PathBuf,
}

impl Initialize for DataDirManager {
    async fn initialize() -> CampaignResult<()> {
        DATA_DIR_MANAGER.create_all()
    }
}

impl DataDirManager {
    pub fn new(root_dir: PathBuf) -> Self {
        Self {
            meta_db: root_dir.join(META_FILE),
            log_dir: root_dir.join(LOG_DIR),
            attachment_dir: root_dir.join(ATTACHMENT_DIR),
            root_dir,
        }
    }

    pub fn create_all(&self) -> CampaignResult<()> {
        for dir in [&self.root_dir, &self.log_dir, &self.attachment_dir] {
            std::fs::create_dir_all(dir)
                .map_err(|e| raise_error!(format!("{:#?}", e), ErrorCode::InternalError))?;
        }
        Ok(())
    }

    /// Staging directory for the attachments of one send task.
    pub fn task_attachment_dir(&self, task_id: &str) -> PathBuf {
        Self::staging_dir(&self.attachment_dir, task_id)
    }

    fn staging_dir(base: &Path, task_id: &str) -> PathBuf {
        let safe: String = task_id
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect();
        base.join(safe)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn creates_layout_under_root() {
        let temp_dir = tempdir().unwrap();
        let manager = DataDirManager::new(temp_dir.path().to_path_buf());
        manager.create_all().unwrap();

        assert!(manager.log_dir.is_dir());
        assert!(manager.attachment_dir.is_dir());
        assert!(manager.meta_db.ends_with("meta.db"));
    }

    #[test]
    fn task_dir_cannot_escape_attachment_root() {
        let temp_dir = tempdir().unwrap();
        let manager = DataDirManager::new(temp_dir.path().to_path_buf());
        let dir = manager.task_attachment_dir("../../etc");
        assert_eq!(dir, manager.attachment_dir.join("etc"));
    }
}
