//! # HTTP Routes
//!
//! ```text
//! /api/sales                      POST create      GET list
//! /api/sales/daily-report         GET
//! /api/sales/monthly-report       GET
//! /api/sales/{id}                 GET   PUT   DELETE
//! /api/products                   POST create      GET list
//! /api/products/low-stock         GET
//! /api/products/{id}              GET   PUT   DELETE
//! /api/staff                      POST create      GET list
//! /api/staff/{id}                 GET
//! /api/dashboard/stats            GET
//! /health                         GET
//! ```

pub mod dashboard;
pub mod health;
pub mod products;
pub mod sales;
pub mod staff;

use axum::routing::get;
use axum::Router;
use serde::Serialize;
use std::sync::Arc;

use crate::state::AppState;

/// Success envelope: `{"status":"success","message"?,"data"?}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApiResponse<T> {
    pub status: &'static str,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn data(data: T) -> Self {
        ApiResponse {
            status: "success",
            message: None,
            data: Some(data),
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

impl ApiResponse<()> {
    pub fn message(message: impl Into<String>) -> Self {
        ApiResponse {
            status: "success",
            message: Some(message.into()),
            data: None,
        }
    }
}

/// Builds the application router.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/sales", get(sales::list_sales).post(sales::create_sale))
        .route("/api/sales/daily-report", get(sales::daily_report))
        .route("/api/sales/monthly-report", get(sales::monthly_report))
        .route(
            "/api/sales/{id}",
            get(sales::get_sale).put(sales::update_sale).delete(sales::delete_sale),
        )
        .route(
            "/api/products",
            get(products::list_products).post(products::create_product),
        )
        .route("/api/products/low-stock", get(products::low_stock))
        .route(
            "/api/products/{id}",
            get(products::get_product)
                .put(products::update_product)
                .delete(products::delete_product),
        )
        .route("/api/staff", get(staff::list_staff).post(staff::create_staff))
        .route("/api/staff/{id}", get(staff::get_staff))
        .route("/api/dashboard/stats", get(dashboard::stats))
        .route("/health", get(health::health))
        .with_state(state)
}
