// Copyright © 2025 rustmailer.com
// Licensed under RustMailer License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use crate::modules::campaign::payload::{
    BulkCampaign, Campaign, CampaignPreview, CustomCampaign, EventCampaign, GreetingCampaign,
    ProductCampaign, SendPreviewRequest, SendRequest, SendResponse,
};
use crate::modules::campaign::service;
use crate::modules::composer::inliner::CssInlineEngine;
use crate::modules::llm::client::OpenAiClient;
use crate::modules::rest::api::ApiTags;
use crate::modules::rest::ApiResult;
use crate::modules::smtp::transport::SMTP_TRANSPORT;
use poem_openapi::payload::{Json, PlainText};
use poem_openapi::OpenApi;

pub struct CampaignApi;

async fn render(campaign: Campaign) -> ApiResult<Json<CampaignPreview>> {
    let generator = OpenAiClient::from_settings()?;
    let preview = service::preview(&campaign, generator.as_ref(), &CssInlineEngine).await?;
    Ok(Json(preview))
}

#[OpenApi(prefix_path = "/api/v1", tag = "ApiTags::Campaign")]
impl CampaignApi {
    /// Formats a free-form message and renders it for the first recipient.
    ///
    /// With `marketing` set the description is rewritten as pain-first copy,
    /// otherwise only its structure is changed. Nothing is sent.
    #[oai(
        method = "post",
        path = "/campaign/preview",
        operation_id = "preview_custom_campaign"
    )]
    async fn preview_custom(
        &self,
        payload: Json<CustomCampaign>,
    ) -> ApiResult<Json<CampaignPreview>> {
        render(Campaign::Custom(payload.0)).await
    }

    /// Renders a greeting, invitation, thank-you or follow-up email.
    #[oai(
        method = "post",
        path = "/campaign/greeting/preview",
        operation_id = "preview_greeting_campaign"
    )]
    async fn preview_greeting(
        &self,
        payload: Json<GreetingCampaign>,
    ) -> ApiResult<Json<CampaignPreview>> {
        render(Campaign::Greeting(payload.0)).await
    }

    /// Renders the showcase email for one catalog product.
    #[oai(
        method = "post",
        path = "/campaign/product/preview",
        operation_id = "preview_product_campaign"
    )]
    async fn preview_product(
        &self,
        payload: Json<ProductCampaign>,
    ) -> ApiResult<Json<CampaignPreview>> {
        render(Campaign::Product(payload.0)).await
    }

    /// Renders the email that presents the whole catalog.
    #[oai(
        method = "post",
        path = "/campaign/bulk/preview",
        operation_id = "preview_bulk_campaign"
    )]
    async fn preview_bulk(&self, payload: Json<BulkCampaign>) -> ApiResult<Json<CampaignPreview>> {
        render(Campaign::Bulk(payload.0)).await
    }

    #[oai(
        method = "post",
        path = "/campaign/event/preview",
        operation_id = "preview_event_campaign"
    )]
    async fn preview_event(
        &self,
        payload: Json<EventCampaign>,
    ) -> ApiResult<Json<CampaignPreview>> {
        render(Campaign::Event(payload.0)).await
    }

    /// Composes a campaign and queues it for background delivery.
    ///
    /// Returns immediately with a task id that can be polled at
    /// `/task/{id}`. With the `draft_id` of a preview the previewed copy is
    /// sent unchanged. A dry run validates and composes without creating a task.
    #[oai(method = "post", path = "/campaign/send", operation_id = "send_campaign")]
    async fn send(&self, payload: Json<SendRequest>) -> ApiResult<Json<SendResponse>> {
        let generator = OpenAiClient::from_settings()?;
        let response = service::send(payload.0, generator.as_ref(), &CssInlineEngine).await?;
        Ok(Json(response))
    }

    /// Sends previewed HTML to a single test address.
    #[oai(
        method = "post",
        path = "/campaign/send-preview",
        operation_id = "send_campaign_preview"
    )]
    async fn send_preview(
        &self,
        payload: Json<SendPreviewRequest>,
    ) -> ApiResult<PlainText<String>> {
        let message =
            service::send_preview(payload.0, SMTP_TRANSPORT.as_ref(), &CssInlineEngine).await?;
        Ok(PlainText(message))
    }
}
