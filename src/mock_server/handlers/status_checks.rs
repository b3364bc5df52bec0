//! External status check endpoint handlers.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::mock_server::state::{MockError, MockState};
use crate::{
    CreateExternalStatusCheckOptions, SetExternalStatusCheckStatusOptions,
    UpdateExternalStatusCheckOptions,
};

type SharedState = State<Arc<RwLock<MockState>>>;

/// Pagination query parameters.
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

/// Response body for a recorded status.
#[derive(Debug, Serialize)]
pub struct StatusCheckResponseBody {
    pub merge_request_iid: u64,
    pub external_status_check_id: u64,
    pub sha: String,
    pub status: String,
}

/// GET /projects/{project}/external_status_checks
pub async fn list_status_checks(
    State(state): SharedState,
    headers: HeaderMap,
    Path(project): Path<String>,
    Query(query): Query<PageQuery>,
) -> Response {
    let state = state.read().await;
    if let Err(resp) = authorize(&state, &headers) {
        return resp;
    }
    let Some(project_id) = state.resolve_project(&project) else {
        return error_response(StatusCode::NOT_FOUND, "404 Project Not Found");
    };

    let checks: Vec<_> = state
        .list_status_checks(project_id)
        .into_iter()
        .cloned()
        .collect();
    paginate(checks, &query)
}

/// POST /projects/{project}/external_status_checks
pub async fn create_status_check(
    State(state): SharedState,
    headers: HeaderMap,
    Path(project): Path<String>,
    Json(params): Json<CreateExternalStatusCheckOptions>,
) -> Response {
    let mut state = state.write().await;
    if let Err(resp) = authorize(&state, &headers) {
        return resp;
    }
    let Some(project_id) = state.resolve_project(&project) else {
        return error_response(StatusCode::NOT_FOUND, "404 Project Not Found");
    };

    let (Some(name), Some(external_url)) = (params.name, params.external_url) else {
        return error_response(
            StatusCode::BAD_REQUEST,
            "name is missing, external_url is missing",
        );
    };
    let branch_ids = params.protected_branch_ids.unwrap_or_default();

    match state.create_status_check(project_id, name, external_url, &branch_ids) {
        Ok(check) => (StatusCode::CREATED, Json(check)).into_response(),
        Err(err) => mock_error_response(err),
    }
}

/// PUT /projects/{project}/external_status_checks/{id}
pub async fn update_status_check(
    State(state): SharedState,
    headers: HeaderMap,
    Path((project, check_id)): Path<(String, u64)>,
    Json(params): Json<UpdateExternalStatusCheckOptions>,
) -> Response {
    let mut state = state.write().await;
    if let Err(resp) = authorize(&state, &headers) {
        return resp;
    }
    let Some(project_id) = state.resolve_project(&project) else {
        return error_response(StatusCode::NOT_FOUND, "404 Project Not Found");
    };

    match state.update_status_check(project_id, check_id, params) {
        Ok(check) => (StatusCode::OK, Json(check)).into_response(),
        Err(err) => mock_error_response(err),
    }
}

/// DELETE /projects/{project}/external_status_checks/{id}
pub async fn delete_status_check(
    State(state): SharedState,
    headers: HeaderMap,
    Path((project, check_id)): Path<(String, u64)>,
) -> Response {
    let mut state = state.write().await;
    if let Err(resp) = authorize(&state, &headers) {
        return resp;
    }
    let Some(project_id) = state.resolve_project(&project) else {
        return error_response(StatusCode::NOT_FOUND, "404 Project Not Found");
    };

    if state.delete_status_check(project_id, check_id) {
        StatusCode::NO_CONTENT.into_response()
    } else {
        error_response(StatusCode::NOT_FOUND, "404 Not found")
    }
}

/// GET /projects/{project}/merge_requests/{iid}/status_checks
pub async fn list_merge_status_checks(
    State(state): SharedState,
    headers: HeaderMap,
    Path((project, iid)): Path<(String, u64)>,
    Query(query): Query<PageQuery>,
) -> Response {
    let state = state.read().await;
    if let Err(resp) = authorize(&state, &headers) {
        return resp;
    }
    let Some(project_id) = state.resolve_project(&project) else {
        return error_response(StatusCode::NOT_FOUND, "404 Project Not Found");
    };

    match state.merge_status_checks(project_id, iid) {
        Some(checks) => paginate(checks, &query),
        None => error_response(StatusCode::NOT_FOUND, "404 Merge Request Not Found"),
    }
}

/// POST /projects/{project}/merge_requests/{iid}/status_check_responses
pub async fn set_status_check_status(
    State(state): SharedState,
    headers: HeaderMap,
    Path((project, iid)): Path<(String, u64)>,
    Json(params): Json<SetExternalStatusCheckStatusOptions>,
) -> Response {
    let mut state = state.write().await;
    if let Err(resp) = authorize(&state, &headers) {
        return resp;
    }
    let Some(project_id) = state.resolve_project(&project) else {
        return error_response(StatusCode::NOT_FOUND, "404 Project Not Found");
    };

    let (Some(sha), Some(check_id)) = (params.sha, params.external_status_check_id) else {
        return error_response(
            StatusCode::BAD_REQUEST,
            "sha is missing, external_status_check_id is missing",
        );
    };

    match state.record_response(project_id, iid, check_id, &sha, params.status) {
        Ok(recorded) => (
            StatusCode::CREATED,
            Json(StatusCheckResponseBody {
                merge_request_iid: recorded.merge_request_iid,
                external_status_check_id: recorded.external_status_check_id,
                sha: recorded.sha,
                status: recorded.status,
            }),
        )
            .into_response(),
        Err(err) => mock_error_response(err),
    }
}

/// Reject requests without the expected `PRIVATE-TOKEN`, if one is required.
fn authorize(state: &MockState, headers: &HeaderMap) -> Result<(), Response> {
    let Some(required) = state.required_token.as_deref() else {
        return Ok(());
    };
    let provided = headers.get("private-token").and_then(|v| v.to_str().ok());
    if provided == Some(required) {
        Ok(())
    } else {
        Err(error_response(StatusCode::UNAUTHORIZED, "401 Unauthorized"))
    }
}

/// Slice `items` per the query and attach GitLab's pagination headers.
fn paginate<T: Serialize>(items: Vec<T>, query: &PageQuery) -> Response {
    let page = query.page.unwrap_or(1).max(1);
    let per_page = query.per_page.unwrap_or(20).clamp(1, 100);

    let total = items.len();
    let total_pages = total.div_ceil(per_page as usize).max(1);
    let start = (page as usize - 1) * per_page as usize;

    let page_items: Vec<T> = items
        .into_iter()
        .skip(start)
        .take(per_page as usize)
        .collect();

    let next_page = if (page as usize) < total_pages {
        (page + 1).to_string()
    } else {
        String::new()
    };
    let prev_page = if page > 1 {
        (page - 1).to_string()
    } else {
        String::new()
    };

    let mut headers = HeaderMap::new();
    for (name, value) in [
        ("x-page", page.to_string()),
        ("x-per-page", per_page.to_string()),
        ("x-total", total.to_string()),
        ("x-total-pages", total_pages.to_string()),
        ("x-next-page", next_page),
        ("x-prev-page", prev_page),
    ] {
        if let Ok(value) = HeaderValue::from_str(&value) {
            headers.insert(name, value);
        }
    }

    (StatusCode::OK, headers, Json(page_items)).into_response()
}

fn error_response(status: StatusCode, message: &str) -> Response {
    (status, Json(serde_json::json!({ "message": message }))).into_response()
}

fn mock_error_response(err: MockError) -> Response {
    match err {
        MockError::NotFound(msg) => error_response(StatusCode::NOT_FOUND, &msg),
        MockError::BadRequest(msg) => error_response(StatusCode::BAD_REQUEST, &msg),
        MockError::Conflict(msg) => error_response(StatusCode::CONFLICT, &msg),
    }
}
