// Copyright © 2025 rustmailer.com
// Licensed under RustMailer License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use crate::modules::catalog::{self, ProductView, PRODUCTS};
use crate::modules::error::code::ErrorCode;
use crate::modules::rest::api::ApiTags;
use crate::modules::rest::ApiResult;
use crate::raise_error;
use poem_openapi::param::Path;
use poem_openapi::payload::Json;
use poem_openapi::OpenApi;

pub struct CatalogApi;

#[OpenApi(prefix_path = "/api/v1", tag = "ApiTags::Catalog")]
impl CatalogApi {
    /// Lists every product that campaigns can promote.
    #[oai(method = "get", path = "/catalog", operation_id = "list_products")]
    async fn list_products(&self) -> ApiResult<Json<Vec<ProductView>>> {
        Ok(Json(PRODUCTS.iter().map(ProductView::from).collect()))
    }

    /// Looks up one product by catalog key or display name.
    #[oai(method = "get", path = "/catalog/:key", operation_id = "get_product")]
    async fn get_product(
        &self,
        /// Catalog key such as `class_tom`, or the product name.
        key: Path<String>,
    ) -> ApiResult<Json<ProductView>> {
        let product = catalog::resolve(&key.0).ok_or_else(|| {
            raise_error!(
                format!("Product '{}' not found", key.0),
                ErrorCode::ResourceNotFound
            )
        })?;
        Ok(Json(product.into()))
    }
}
