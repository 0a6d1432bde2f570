// Copyright © 2025 rustmailer.com
// Licensed under RustMailer License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use crate::modules::journal::entity::DeliveryLog;
use crate::modules::journal::{DeliveryJournal, NativeDbJournal};
use crate::modules::rest::api::ApiTags;
use crate::modules::rest::ApiResult;
use poem_openapi::param::Query;
use poem_openapi::payload::Json;
use poem_openapi::OpenApi;

const DEFAULT_LIMIT: u64 = 500;

pub struct LogsApi;

#[OpenApi(prefix_path = "/api/v1", tag = "ApiTags::Logs")]
impl LogsApi {
    /// Returns the most recent delivery log entries, newest first.
    #[oai(method = "get", path = "/logs", operation_id = "list_delivery_logs")]
    async fn list_logs(
        &self,
        /// Maximum number of entries, 500 when omitted.
        limit: Query<Option<u64>>,
    ) -> ApiResult<Json<Vec<DeliveryLog>>> {
        let limit = limit.0.unwrap_or(DEFAULT_LIMIT) as usize;
        let logs = NativeDbJournal::from_manager()?.recent(limit).await?;
        Ok(Json(logs))
    }
}
