//! Product catalog endpoints.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use std::sync::Arc;

use crate::error::ApiResult;
use crate::routes::ApiResponse;
use crate::state::AppState;
use stockroom_core::input::{NewProduct, ProductFilter, ProductPatch};
use stockroom_core::Product;

/// `POST /api/products`
pub async fn create_product(
    State(state): State<Arc<AppState>>,
    body: Result<Json<NewProduct>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<ApiResponse<Product>>)> {
    let Json(input) = body?;
    let product = state.catalog.create_product(input).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::data(product).with_message("Product created successfully")),
    ))
}

/// `GET /api/products?search=&category=&status=&skip=&limit=`
pub async fn list_products(
    State(state): State<Arc<AppState>>,
    query: Result<Query<ProductFilter>, QueryRejection>,
) -> ApiResult<Json<ApiResponse<Vec<Product>>>> {
    let Query(filter) = query?;
    let products = state.catalog.list_products(&filter).await?;
    Ok(Json(ApiResponse::data(products)))
}

/// `GET /api/products/low-stock`
pub async fn low_stock(State(state): State<Arc<AppState>>) -> ApiResult<Json<ApiResponse<Vec<Product>>>> {
    let products = state.catalog.low_stock_products().await?;
    Ok(Json(ApiResponse::data(products)))
}

/// `GET /api/products/{id}`
pub async fn get_product(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<ApiResponse<Product>>> {
    let product = state.catalog.get_product(&id).await?;
    Ok(Json(ApiResponse::data(product)))
}

/// `PUT /api/products/{id}`
pub async fn update_product(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    body: Result<Json<ProductPatch>, JsonRejection>,
) -> ApiResult<Json<ApiResponse<Product>>> {
    let Json(patch) = body?;
    let product = state.catalog.update_product(&id, patch).await?;
    Ok(Json(
        ApiResponse::data(product).with_message("Product updated successfully"),
    ))
}

/// `DELETE /api/products/{id}`
pub async fn delete_product(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<ApiResponse<()>>> {
    state.catalog.delete_product(&id).await?;
    Ok(Json(ApiResponse::message("Product deleted successfully")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use crate::state::test_state;
    use stockroom_core::ProductStatus;

    fn body(json: serde_json::Value) -> Result<Json<NewProduct>, JsonRejection> {
        Ok(Json(serde_json::from_value(json).unwrap()))
    }

    #[tokio::test]
    async fn test_create_applies_defaults() {
        let state = test_state().await;

        let (status, Json(created)) = create_product(
            State(state),
            body(serde_json::json!({
                "name": "Sharp Sand",
                "category": "Building",
                "sku": "snd-t",
                "pricePerUnitCents": 2500
            })),
        )
        .await
        .unwrap();

        assert_eq!(status, StatusCode::CREATED);
        let product = created.data.unwrap();
        assert_eq!(product.sku, "SND-T");
        assert_eq!(product.unit, "bag");
        assert_eq!(product.quantity, 0);
        assert_eq!(product.status, ProductStatus::OutOfStock);
    }

    #[tokio::test]
    async fn test_duplicate_sku_is_conflict() {
        let state = test_state().await;
        let json = serde_json::json!({
            "name": "Cement",
            "category": "Building",
            "sku": "CEM-50",
            "quantity": 10,
            "pricePerUnitCents": 850
        });

        create_product(State(state.clone()), body(json.clone())).await.unwrap();
        let err = create_product(State(state), body(json)).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::Conflict);
        assert_eq!(err.status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_update_low_stock_and_delete() {
        let state = test_state().await;
        let (_, Json(created)) = create_product(
            State(state.clone()),
            body(serde_json::json!({
                "name": "Cement",
                "category": "Building",
                "sku": "CEM-50",
                "quantity": 10,
                "minStock": 3,
                "pricePerUnitCents": 850
            })),
        )
        .await
        .unwrap();
        let id = created.data.unwrap().id;

        let patch = ProductPatch {
            quantity: Some(1),
            ..Default::default()
        };
        let Json(updated) = update_product(State(state.clone()), Path(id.clone()), Ok(Json(patch)))
            .await
            .unwrap();
        assert_eq!(updated.data.unwrap().status, ProductStatus::LowStock);

        let Json(low) = low_stock(State(state.clone())).await.unwrap();
        assert_eq!(low.data.unwrap().len(), 1);

        delete_product(State(state.clone()), Path(id.clone())).await.unwrap();
        let err = get_product(State(state), Path(id)).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
    }
}
