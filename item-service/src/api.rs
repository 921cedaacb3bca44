use std::time::Duration;

use axum::{
    error_handling::HandleErrorLayer,
    extract::{rejection::JsonRejection, Path, Query, State},
    response::{
        sse::{KeepAlive, Sse},
        IntoResponse,
    },
    routing::{delete, get},
    BoxError, Json, Router,
};
use serde::Deserialize;
use shared::{ApiResponse, Item, ItemDraft, LookupField, PageRequest, ValidationError};
use tower::{timeout::TimeoutLayer, ServiceBuilder};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::error::{middleware_error, Result};
use crate::events::event_stream;
use crate::service::ItemService;
use crate::store::StoreStatus;

#[derive(Clone)]
pub struct AppState {
    pub service: ItemService,
}

#[derive(Debug, Deserialize)]
pub struct PageParams {
    pub page: Option<String>,
    pub limit: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct OptionsParams {
    pub field: Option<String>,
}

pub fn create_router(state: AppState, request_timeout: Duration) -> Router {
    Router::new()
        .route("/api/items", get(recent_items).post(create_item))
        .route("/api/items/paginated", get(paginated_items))
        .route("/api/items/options", get(distinct_options))
        .route("/api/items/events", get(item_events))
        .route("/api/items/:id", delete(delete_item))
        .route("/api/health/db", get(database_health))
        .route("/health", get(health_check))
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(
                    CorsLayer::new()
                        .allow_origin(Any)
                        .allow_methods(Any)
                        .allow_headers(Any),
                )
                .layer(HandleErrorLayer::new(move |err: BoxError| async move {
                    middleware_error(err, request_timeout)
                }))
                .layer(TimeoutLayer::new(request_timeout)),
        )
}

pub async fn recent_items(State(state): State<AppState>) -> Result<Json<ApiResponse<Vec<Item>>>> {
    let items = state.service.recent().await?;
    Ok(Json(ApiResponse::ok(items)))
}

pub async fn create_item(
    State(state): State<AppState>,
    body: std::result::Result<Json<ItemDraft>, JsonRejection>,
) -> Result<Json<ApiResponse<Item>>> {
    let Json(draft) = body.map_err(|e| ValidationError::MalformedBody(e.body_text()))?;

    let item = state.service.create(draft).await?;
    Ok(Json(ApiResponse::ok(item).with_message("Item added successfully")))
}

pub async fn paginated_items(
    State(state): State<AppState>,
    Query(params): Query<PageParams>,
) -> Result<Json<ApiResponse<Vec<Item>>>> {
    let request = PageRequest::parse(params.page.as_deref(), params.limit.as_deref())?;

    let (items, pagination) = state.service.paginated(request).await?;
    Ok(Json(ApiResponse::ok(items).with_pagination(pagination)))
}

pub async fn distinct_options(
    State(state): State<AppState>,
    Query(params): Query<OptionsParams>,
) -> Result<Json<ApiResponse<Vec<String>>>> {
    let field: LookupField = params
        .field
        .as_deref()
        .ok_or(ValidationError::InvalidField)?
        .parse()?;

    let values = state.service.distinct_values(field).await?;
    Ok(Json(ApiResponse::ok(values)))
}

pub async fn delete_item(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<()>>> {
    let id: i32 = id.parse().map_err(|_| ValidationError::InvalidId)?;

    state.service.delete(id).await?;
    Ok(Json(ApiResponse::<()>::done().with_message("Item deleted successfully")))
}

pub async fn item_events(State(state): State<AppState>) -> impl IntoResponse {
    let receiver = state.service.feed().subscribe();
    tracing::debug!("Change feed subscriber connected");
    Sse::new(event_stream(receiver)).keep_alive(KeepAlive::default())
}

pub async fn database_health(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<StoreStatus>>> {
    let status = state.service.status().await?;
    Ok(Json(ApiResponse::ok(status).with_message("Database connection successful!")))
}

pub async fn health_check() -> &'static str {
    "OK"
}
