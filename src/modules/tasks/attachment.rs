// Copyright © 2025 rustmailer.com
// Licensed under RustMailer License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use crate::modules::error::code::ErrorCode;
use crate::modules::error::CampaignResult;
use crate::{base64_decode, raise_error};
use poem_openapi::Object;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// An uploaded file carried inline in a JSON request.
#[derive(Clone, Debug, Default, Eq, PartialEq, Deserialize, Serialize, Object)]
pub struct AttachmentPayload {
    /// File name shown to the recipient.
    pub file_name: String,
    /// MIME type; guessed from the file name when omitted.
    pub mime_type: Option<String>,
    /// Content id for inline images referenced as `cid:<id>` in the HTML.
    pub content_id: Option<String>,
    /// Base64 encoded file content.
    pub content: String,
}

/// A payload written to the task's staging directory.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct StagedAttachment {
    pub path: PathBuf,
    pub file_name: String,
    pub mime_type: String,
    pub content_id: Option<String>,
}

impl StagedAttachment {
    pub async fn read(&self) -> CampaignResult<Vec<u8>> {
        tokio::fs::read(&self.path).await.map_err(|e| {
            raise_error!(
                format!("Failed to read attachment {}: {}", self.file_name, e),
                ErrorCode::InternalError
            )
        })
    }
}

/// Reduces an uploaded name to a safe single path component.
pub fn secure_file_name(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or_default();
    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let cleaned = cleaned.trim_matches('.').to_string();
    if cleaned.is_empty() {
        "attachment".into()
    } else {
        cleaned
    }
}

fn mime_for(payload: &AttachmentPayload, file_name: &str) -> CampaignResult<String> {
    match payload.mime_type.as_deref().map(str::trim).filter(|m| !m.is_empty()) {
        Some(mime) => mime
            .parse::<mime_guess::Mime>()
            .map(|m| m.to_string())
            .map_err(|e| {
                raise_error!(
                    format!("Invalid MIME type '{}': {}", mime, e),
                    ErrorCode::InvalidParameter
                )
            }),
        None => Ok(mime_guess::from_path(file_name)
            .first_or_octet_stream()
            .to_string()),
    }
}

/// Decodes every payload and writes it under `dir`.
pub async fn stage(
    dir: &Path,
    payloads: &[AttachmentPayload],
) -> CampaignResult<Vec<StagedAttachment>> {
    if payloads.is_empty() {
        return Ok(Vec::new());
    }
    tokio::fs::create_dir_all(dir)
        .await
        .map_err(|e| raise_error!(format!("{:#?}", e), ErrorCode::InternalError))?;

    let mut staged = Vec::with_capacity(payloads.len());
    for (index, payload) in payloads.iter().enumerate() {
        let file_name = secure_file_name(&payload.file_name);
        let mime_type = mime_for(payload, &file_name)?;
        let bytes = base64_decode!(payload.content.trim()).map_err(|e| {
            raise_error!(
                format!("Attachment {} is not valid base64: {}", payload.file_name, e),
                ErrorCode::InvalidParameter
            )
        })?;
        let path = dir.join(format!("{index}-{file_name}"));
        tokio::fs::write(&path, bytes)
            .await
            .map_err(|e| raise_error!(format!("{:#?}", e), ErrorCode::InternalError))?;
        staged.push(StagedAttachment {
            path,
            file_name,
            mime_type,
            content_id: payload
                .content_id
                .as_deref()
                .map(str::trim)
                .filter(|cid| !cid.is_empty())
                .map(String::from),
        });
    }
    debug!("Staged {} attachments in {:?}", staged.len(), dir);
    Ok(staged)
}

/// Best-effort removal of a staging directory and everything in it.
pub async fn remove_staging(dir: &Path) {
    match tokio::fs::remove_dir_all(dir).await {
        Ok(()) => debug!("Removed attachment staging directory {:?}", dir),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => warn!("Failed to remove attachment staging directory {:?}: {}", dir, e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn payload(name: &str, content: &str) -> AttachmentPayload {
        AttachmentPayload {
            file_name: name.into(),
            content: content.into(),
            ..Default::default()
        }
    }

    #[test]
    fn file_names_are_flattened() {
        assert_eq!(secure_file_name("../../etc/passwd"), "passwd");
        assert_eq!(secure_file_name("C:\\docs\\My Plan.pdf"), "My_Plan.pdf");
        assert_eq!(secure_file_name(".."), "attachment");
    }

    #[tokio::test]
    async fn stages_and_removes_files() {
        let root = tempdir().unwrap();
        let dir = root.path().join("task1");
        // "hello" in base64
        let staged = stage(&dir, &[payload("notes.txt", "aGVsbG8=")]).await.unwrap();
        assert_eq!(staged.len(), 1);
        assert_eq!(staged[0].mime_type, "text/plain");
        assert_eq!(staged[0].read().await.unwrap(), b"hello");

        remove_staging(&dir).await;
        assert!(!dir.exists());
        remove_staging(&dir).await;
    }

    #[tokio::test]
    async fn rejects_bad_base64_and_mime() {
        let root = tempdir().unwrap();
        assert!(stage(root.path(), &[payload("a.bin", "***")]).await.is_err());

        let mut bad_mime = payload("a.bin", "aGVsbG8=");
        bad_mime.mime_type = Some("not a mime".into());
        assert!(stage(root.path(), &[bad_mime]).await.is_err());
    }

    #[tokio::test]
    async fn nothing_to_stage_creates_nothing() {
        let root = tempdir().unwrap();
        let dir = root.path().join("empty");
        assert!(stage(&dir, &[]).await.unwrap().is_empty());
        assert!(!dir.exists());
    }
}
