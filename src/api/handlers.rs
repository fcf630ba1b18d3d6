//! Request handlers for the API endpoints.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;

use super::types::ErrorResponse;
use crate::dispatch::{DispatchRequest, PlanEntry};

type ApiError = (StatusCode, Json<ErrorResponse>);

/// Validates the payload and returns its production plan.
///
/// `POST /productionplan` → 200 + `Vec<PlanEntry>` JSON
/// undecodable body → 400/415/422 + `ErrorResponse`
/// invalid payload or infeasible dispatch → 422 + `ErrorResponse`
pub async fn production_plan(
    payload: Result<Json<DispatchRequest>, JsonRejection>,
) -> Result<Json<Vec<PlanEntry>>, ApiError> {
    let Json(request) =
        payload.map_err(|rejection| (rejection.status(), Json(ErrorResponse::from(&rejection))))?;

    let errors = request.validate();
    if !errors.is_empty() {
        return Err((
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(ErrorResponse::from(errors.as_slice())),
        ));
    }

    request
        .dispatch()
        .map(Json)
        .map_err(|e| (StatusCode::UNPROCESSABLE_ENTITY, Json(ErrorResponse::from(&e))))
}
