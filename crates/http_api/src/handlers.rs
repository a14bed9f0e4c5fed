use axum::{
    extract::{Json, Path, Query, State, rejection::JsonRejection},
    http::{StatusCode, header},
    response::IntoResponse,
};
use serde::Deserialize;

use app_api::{ReportRequest, SuccessResponse, TicketIdRequest};
use propinas_core::{Employee, NewTicket};

use crate::{errors::HttpError, state::HttpState};

#[derive(Debug, Deserialize)]
pub struct PeriodQuery {
    pub period: Option<String>,
}

/// Malformed bodies are validation errors like any other.
fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, HttpError> {
    payload.map(|Json(body)| body).map_err(|rejection| {
        HttpError::new(
            StatusCode::BAD_REQUEST,
            rejection.body_text(),
            Some("invalid_input".to_string()),
        )
    })
}

pub async fn data(State(state): State<HttpState>) -> Result<impl IntoResponse, HttpError> {
    let response = app_api::data(&state.context)?;
    Ok(Json(response))
}

pub async fn info(State(state): State<HttpState>) -> Result<impl IntoResponse, HttpError> {
    let response = app_api::info(&state.context)?;
    Ok(Json(response))
}

pub async fn create_ticket(
    State(state): State<HttpState>,
    payload: Result<Json<NewTicket>, JsonRejection>,
) -> Result<impl IntoResponse, HttpError> {
    let response = app_api::create_ticket(&state.context, json_body(payload)?)?;
    Ok((StatusCode::CREATED, Json(response)))
}

pub async fn delete_ticket(
    State(state): State<HttpState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, HttpError> {
    // An id that cannot name a ticket matches nothing, which is still a success.
    let Ok(id) = id.trim().parse::<i64>() else {
        tracing::debug!(id = %id, "ignoring delete for non-numeric id");
        return Ok(Json(SuccessResponse { success: true }));
    };
    let response = app_api::delete_ticket(&state.context, TicketIdRequest { id })?;
    Ok(Json(response))
}

pub async fn replace_employees(
    State(state): State<HttpState>,
    payload: Result<Json<Vec<Employee>>, JsonRejection>,
) -> Result<impl IntoResponse, HttpError> {
    let response = app_api::replace_employees(&state.context, json_body(payload)?)?;
    Ok(Json(response))
}

pub async fn totals(State(state): State<HttpState>) -> Result<impl IntoResponse, HttpError> {
    let response = app_api::totals(&state.context)?;
    Ok(Json(response))
}

pub async fn report(
    State(state): State<HttpState>,
    Path(kind): Path<String>,
    Query(query): Query<PeriodQuery>,
) -> Result<impl IntoResponse, HttpError> {
    let req = ReportRequest {
        kind,
        period: query.period,
    };
    let response = app_api::report(&state.context, req)?;
    Ok(Json(response))
}

pub async fn export_report(
    State(state): State<HttpState>,
    Path(kind): Path<String>,
    Query(query): Query<PeriodQuery>,
) -> Result<impl IntoResponse, HttpError> {
    let req = ReportRequest {
        kind,
        period: query.period,
    };
    let export = app_api::export_report(&state.context, req)?;
    let disposition = format!("attachment; filename=\"{}\"", export.filename);
    Ok((
        [
            (header::CONTENT_TYPE, "text/plain; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        export.body,
    ))
}

pub async fn not_found() -> HttpError {
    HttpError::new(
        StatusCode::NOT_FOUND,
        "route not found",
        Some("not_found".to_string()),
    )
}
