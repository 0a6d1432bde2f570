// Copyright © 2025 rustmailer.com
// Licensed under RustMailer License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use crate::modules::error::code::ErrorCode;
use crate::modules::journal::{DeliveryJournal, NativeDbJournal};
use crate::modules::rest::api::ApiTags;
use crate::modules::rest::ApiResult;
use crate::modules::tasks::model::{TaskDebug, TaskProgress, TaskRecord};
use crate::modules::tasks::store::TaskStore;
use crate::modules::tasks::TASK_STORE;
use crate::raise_error;
use poem_openapi::param::Path;
use poem_openapi::payload::Json;
use poem_openapi::OpenApi;

const DEBUG_LOG_LIMIT: usize = 200;

pub struct TaskApi;

async fn find_task(id: &str) -> ApiResult<TaskRecord> {
    let record = TASK_STORE.get(id).await?.ok_or_else(|| {
        raise_error!(format!("Task '{}' not found", id), ErrorCode::ResourceNotFound)
    })?;
    Ok(record)
}

#[OpenApi(prefix_path = "/api/v1", tag = "ApiTags::Task")]
impl TaskApi {
    /// Reports the status and counters of a send task.
    #[oai(method = "get", path = "/task/:id", operation_id = "get_task")]
    async fn get_task(
        &self,
        /// Id returned by `/campaign/send`.
        id: Path<String>,
    ) -> ApiResult<Json<TaskProgress>> {
        let record = find_task(&id.0).await?;
        Ok(Json(TaskProgress::from(&record)))
    }

    /// Task progress together with the latest delivery log entries.
    #[oai(method = "get", path = "/task/:id/debug", operation_id = "debug_task")]
    async fn debug_task(&self, id: Path<String>) -> ApiResult<Json<TaskDebug>> {
        let record = find_task(&id.0).await?;
        let recent_logs = NativeDbJournal::from_manager()?
            .recent(DEBUG_LOG_LIMIT)
            .await?;
        Ok(Json(TaskDebug {
            task: TaskProgress::from(&record),
            recent_logs,
        }))
    }
}
