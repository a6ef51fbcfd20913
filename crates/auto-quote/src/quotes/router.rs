use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::catalog::{SelectionField, SelectionState, VehicleMake, VehicleModel, VehicleType};

use super::domain::{QuoteData, QuoteId};
use super::repository::{QuoteRepository, RepositoryError};
use super::service::{QuoteService, QuoteServiceError};

/// Router exposing quote intake, saved quotes, and the vehicle catalog.
pub fn quote_router<R>(service: Arc<QuoteService<R>>) -> Router
where
    R: QuoteRepository + 'static,
{
    Router::new()
        .route(
            "/api/v1/quotes",
            post(submit_handler::<R>).get(list_handler::<R>),
        )
        .route("/api/v1/quotes/estimate", post(estimate_handler::<R>))
        .route(
            "/api/v1/quotes/:quote_id",
            get(get_handler::<R>).delete(delete_handler::<R>),
        )
        .route("/api/v1/catalog/types", get(types_handler::<R>))
        .route("/api/v1/catalog/makes", get(makes_handler::<R>))
        .route("/api/v1/catalog/models", get(models_handler::<R>))
        .route("/api/v1/catalog/selection", post(selection_handler::<R>))
        .with_state(service)
}

fn error_response(status: StatusCode, message: String) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}

fn service_error_response(error: QuoteServiceError) -> Response {
    let status = match &error {
        QuoteServiceError::Intake(_) => StatusCode::UNPROCESSABLE_ENTITY,
        QuoteServiceError::NotFound(_) => StatusCode::NOT_FOUND,
        QuoteServiceError::Repository(RepositoryError::Conflict) => StatusCode::CONFLICT,
        QuoteServiceError::Repository(RepositoryError::Unavailable(_)) => {
            StatusCode::SERVICE_UNAVAILABLE
        }
        QuoteServiceError::Repository(RepositoryError::Corrupt(_)) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    error_response(status, error.to_string())
}

pub(crate) async fn submit_handler<R>(
    State(service): State<Arc<QuoteService<R>>>,
    Json(data): Json<QuoteData>,
) -> Response
where
    R: QuoteRepository + 'static,
{
    match service.submit(data) {
        Ok(record) => (StatusCode::CREATED, Json(record)).into_response(),
        Err(error) => service_error_response(error),
    }
}

pub(crate) async fn estimate_handler<R>(
    State(service): State<Arc<QuoteService<R>>>,
    Json(data): Json<QuoteData>,
) -> Response
where
    R: QuoteRepository + 'static,
{
    match service.estimate(&data) {
        Ok(quote) => (StatusCode::OK, Json(quote)).into_response(),
        Err(error) => service_error_response(error),
    }
}

pub(crate) async fn list_handler<R>(State(service): State<Arc<QuoteService<R>>>) -> Response
where
    R: QuoteRepository + 'static,
{
    match service.list() {
        Ok(records) => (StatusCode::OK, Json(records)).into_response(),
        Err(error) => service_error_response(error),
    }
}

pub(crate) async fn get_handler<R>(
    State(service): State<Arc<QuoteService<R>>>,
    Path(quote_id): Path<String>,
) -> Response
where
    R: QuoteRepository + 'static,
{
    match service.get(&QuoteId(quote_id)) {
        Ok(record) => (StatusCode::OK, Json(record)).into_response(),
        Err(error) => service_error_response(error),
    }
}

pub(crate) async fn delete_handler<R>(
    State(service): State<Arc<QuoteService<R>>>,
    Path(quote_id): Path<String>,
) -> Response
where
    R: QuoteRepository + 'static,
{
    match service.delete(&QuoteId(quote_id)) {
        Ok(_) => StatusCode::NO_CONTENT.into_response(),
        Err(error) => service_error_response(error),
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct MakesQuery {
    #[serde(rename = "type")]
    vehicle_type: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ModelsQuery {
    make: Option<String>,
    #[serde(rename = "type")]
    vehicle_type: Option<String>,
}

pub(crate) async fn types_handler<R>(
    State(service): State<Arc<QuoteService<R>>>,
) -> Json<Vec<VehicleType>>
where
    R: QuoteRepository + 'static,
{
    Json(service.catalog().types().to_vec())
}

pub(crate) async fn makes_handler<R>(
    State(service): State<Arc<QuoteService<R>>>,
    Query(query): Query<MakesQuery>,
) -> Json<Vec<VehicleMake>>
where
    R: QuoteRepository + 'static,
{
    let makes = match query.vehicle_type.as_deref() {
        Some(type_id) => service
            .catalog()
            .makes_for_type(type_id.trim())
            .into_iter()
            .cloned()
            .collect(),
        None => Vec::new(),
    };
    Json(makes)
}

pub(crate) async fn models_handler<R>(
    State(service): State<Arc<QuoteService<R>>>,
    Query(query): Query<ModelsQuery>,
) -> Json<Vec<VehicleModel>>
where
    R: QuoteRepository + 'static,
{
    let models = match (query.make.as_deref(), query.vehicle_type.as_deref()) {
        (Some(make_id), Some(type_id)) => service
            .catalog()
            .models_for_make_and_type(make_id.trim(), type_id.trim())
            .into_iter()
            .cloned()
            .collect(),
        _ => Vec::new(),
    };
    Json(models)
}

/// One dropdown change applied to the current form selection.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionRequest {
    #[serde(default)]
    pub current: SelectionState,
    pub field: SelectionField,
    #[serde(default)]
    pub value: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionResponse {
    pub state: SelectionState,
    pub invalidated: Vec<SelectionField>,
    pub makes: Vec<VehicleMake>,
    pub models: Vec<VehicleModel>,
}

pub(crate) async fn selection_handler<R>(
    State(service): State<Arc<QuoteService<R>>>,
    Json(request): Json<SelectionRequest>,
) -> Json<SelectionResponse>
where
    R: QuoteRepository + 'static,
{
    let catalog = service.catalog();
    let value = request.value.as_deref();
    let transition = match request.field {
        SelectionField::VehicleType => catalog.on_type_change(&request.current, value),
        SelectionField::VehicleMake => catalog.on_make_change(&request.current, value),
        SelectionField::VehicleModel => catalog.on_model_change(&request.current, value),
    };
    let options = catalog.selection_options(&transition.state);

    Json(SelectionResponse {
        makes: options.makes.into_iter().cloned().collect(),
        models: options.models.into_iter().cloned().collect(),
        state: transition.state,
        invalidated: transition.invalidated,
    })
}
