//! Sale endpoints and the sale reports.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use std::sync::Arc;
use tracing::debug;

use crate::error::ApiResult;
use crate::routes::ApiResponse;
use crate::state::AppState;
use stockroom_core::input::{CreateSaleInput, SaleFilter, UpdateSaleInput};
use stockroom_core::report::{self, DailyReport, MonthlyReport};
use stockroom_core::SaleDetails;

/// `POST /api/sales`
pub async fn create_sale(
    State(state): State<Arc<AppState>>,
    body: Result<Json<CreateSaleInput>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<ApiResponse<SaleDetails>>)> {
    let Json(input) = body?;
    let sale = state.coordinator.create_sale(input).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::data(sale).with_message("Sale created successfully")),
    ))
}

/// `GET /api/sales?startDate=&endDate=&staffId=&productId=&paymentMethod=&skip=&limit=`
pub async fn list_sales(
    State(state): State<Arc<AppState>>,
    query: Result<Query<SaleFilter>, QueryRejection>,
) -> ApiResult<Json<ApiResponse<Vec<SaleDetails>>>> {
    let Query(filter) = query?;
    let sales = state.coordinator.list_sales(&filter).await?;
    Ok(Json(ApiResponse::data(sales)))
}

/// `GET /api/sales/{id}`
pub async fn get_sale(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<ApiResponse<SaleDetails>>> {
    let sale = state.coordinator.get_sale(&id).await?;
    Ok(Json(ApiResponse::data(sale)))
}

/// `PUT /api/sales/{id}`
pub async fn update_sale(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    body: Result<Json<UpdateSaleInput>, JsonRejection>,
) -> ApiResult<Json<ApiResponse<SaleDetails>>> {
    let Json(input) = body?;
    let sale = state.coordinator.update_sale(&id, input).await?;
    Ok(Json(
        ApiResponse::data(sale).with_message("Sale updated successfully"),
    ))
}

/// `DELETE /api/sales/{id}`
pub async fn delete_sale(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<ApiResponse<()>>> {
    state.coordinator.delete_sale(&id).await?;
    Ok(Json(ApiResponse::message("Sale deleted successfully")))
}

#[derive(Debug, Default, Deserialize)]
pub struct DailyReportParams {
    /// Defaults to today (UTC).
    pub date: Option<NaiveDate>,
}

/// `GET /api/sales/daily-report?date=YYYY-MM-DD`
pub async fn daily_report(
    State(state): State<Arc<AppState>>,
    query: Result<Query<DailyReportParams>, QueryRejection>,
) -> ApiResult<Json<ApiResponse<DailyReport>>> {
    let Query(params) = query?;
    let date = params.date.unwrap_or_else(|| Utc::now().date_naive());

    debug!(%date, "Daily report requested");
    let report = state.db.reports().daily_report(date).await?;
    Ok(Json(ApiResponse::data(report)))
}

#[derive(Debug, Default, Deserialize)]
pub struct MonthlyReportParams {
    /// Defaults to the current year and month (UTC).
    pub year: Option<i32>,
    pub month: Option<u32>,
}

/// `GET /api/sales/monthly-report?year=&month=`
pub async fn monthly_report(
    State(state): State<Arc<AppState>>,
    query: Result<Query<MonthlyReportParams>, QueryRejection>,
) -> ApiResult<Json<ApiResponse<MonthlyReport>>> {
    let Query(params) = query?;
    let (current_year, current_month) = report::year_month(Utc::now());
    let year = params.year.unwrap_or(current_year);
    let month = params.month.unwrap_or(current_month);

    debug!(year, month, "Monthly report requested");
    let report = state.db.reports().monthly_report(year, month).await?;
    Ok(Json(ApiResponse::data(report)))
}
