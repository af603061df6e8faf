//! Dashboard endpoint.

use axum::extract::State;
use axum::Json;
use chrono::Utc;
use std::sync::Arc;

use crate::error::ApiResult;
use crate::routes::ApiResponse;
use crate::state::AppState;
use stockroom_core::dashboard::DashboardStats;

/// `GET /api/dashboard/stats`
pub async fn stats(State(state): State<Arc<AppState>>) -> ApiResult<Json<ApiResponse<DashboardStats>>> {
    let stats = state.db.dashboard().stats(Utc::now()).await?;
    Ok(Json(ApiResponse::data(stats)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::test_state;
    use stockroom_core::input::NewProduct;

    #[tokio::test]
    async fn test_stats_on_fresh_catalog() {
        let state = test_state().await;
        state
            .catalog
            .create_product(NewProduct {
                name: "Binding Wire".to_string(),
                category: "Steel".to_string(),
                description: None,
                sku: "BWR-20".to_string(),
                quantity: 5,
                min_stock: 10,
                max_stock: None,
                unit: "roll".to_string(),
                price_per_unit_cents: 1800,
                discontinued: false,
                location: None,
                supplier: None,
            })
            .await
            .unwrap();

        let Json(body) = stats(State(state)).await.unwrap();
        let stats = body.data.unwrap();

        assert_eq!(stats.stock.total_stock_value_cents, 9000);
        assert_eq!(stats.stock.low_stock_count, 1);
        assert_eq!(stats.summary.total_products, 1);
        assert_eq!(stats.sales.total_count, 0);
        assert_eq!(stats.summary.average_daily_revenue_cents, 0);
    }
}
