//! Staff directory endpoints.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use std::sync::Arc;

use crate::error::ApiResult;
use crate::routes::ApiResponse;
use crate::state::AppState;
use stockroom_core::input::NewStaff;
use stockroom_core::Staff;

/// `POST /api/staff`
pub async fn create_staff(
    State(state): State<Arc<AppState>>,
    body: Result<Json<NewStaff>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<ApiResponse<Staff>>)> {
    let Json(input) = body?;
    let staff = state.db.staff().create(input).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::data(staff).with_message("Staff member created successfully")),
    ))
}

/// `GET /api/staff`
pub async fn list_staff(State(state): State<Arc<AppState>>) -> ApiResult<Json<ApiResponse<Vec<Staff>>>> {
    let staff = state.db.staff().list().await?;
    Ok(Json(ApiResponse::data(staff)))
}

/// `GET /api/staff/{id}`
pub async fn get_staff(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<ApiResponse<Staff>>> {
    let staff = state.db.staff().get(&id).await?;
    Ok(Json(ApiResponse::data(staff)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use crate::state::test_state;

    fn new_staff(employee_id: &str) -> NewStaff {
        NewStaff {
            employee_id: employee_id.to_string(),
            first_name: "Halima".to_string(),
            last_name: "Yusuf".to_string(),
            email: Some("halima@stockroom.local".to_string()),
            department: "Sales".to_string(),
            position: "Clerk".to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_list_get() {
        let state = test_state().await;

        let (status, Json(created)) = create_staff(State(state.clone()), Ok(Json(new_staff("EMP-3"))))
            .await
            .unwrap();
        assert_eq!(status, StatusCode::CREATED);
        let id = created.data.unwrap().id;

        let Json(listed) = list_staff(State(state.clone())).await.unwrap();
        assert_eq!(listed.data.unwrap().len(), 1);

        let Json(found) = get_staff(State(state.clone()), Path(id)).await.unwrap();
        assert_eq!(found.data.unwrap().employee_id, "EMP-3");

        let err = create_staff(State(state), Ok(Json(new_staff("EMP-3"))))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::Conflict);
    }

    #[tokio::test]
    async fn test_get_unknown_and_malformed() {
        let state = test_state().await;

        let missing = "6f1c2a4e-8b7d-4c3f-9a2e-1d5b6c7e8f90".to_string();
        let err = get_staff(State(state.clone()), Path(missing.clone())).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
        assert_eq!(err.message, format!("Staff member not found: {missing}"));

        let err = get_staff(State(state), Path("42".to_string())).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
    }
}
