//! HTTP handlers for the storefront API.
//!
//! Each handler corresponds to an API endpoint and delegates to
//! [`AqualanService`](aqualan_core::AqualanService).

use axum::Json;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use serde::{Deserialize, Serialize};

use aqualan_core::ports::ProductFilter;
use aqualan_core::{
    Category, DeliveryEstimate, DeliveryZone, OfferRequest, Order, OrderCreate, OrderStatus,
    Product, ReloadReport, RouteTables,
};

use crate::error::AppError;
use crate::state::AppState;

/// Result type for handlers.
pub type HandlerResult<T> = Result<Json<T>, AppError>;

/// Plain acknowledgement body.
#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    /// Human-readable message.
    pub message: String,
}

/// Query of `GET /api/products`.
#[derive(Debug, Default, Deserialize)]
pub struct ProductQuery {
    /// Category id.
    pub category: Option<String>,
    /// Brand name.
    pub brand: Option<String>,
}

/// Query of `GET /api/delivery-date`.
#[derive(Debug, Default, Deserialize)]
pub struct CityQuery {
    /// Free-text city.
    #[serde(default)]
    pub city: String,
}

/// Query of `GET /api/orders`.
#[derive(Debug, Default, Deserialize)]
pub struct OrderQuery {
    /// Customer email.
    pub email: Option<String>,
}

/// Query of `PUT /api/orders/{id}/status`.
#[derive(Debug, Deserialize)]
pub struct StatusQuery {
    /// New status name.
    pub status: String,
}

/// Body returned after a status change.
#[derive(Debug, Serialize, Deserialize)]
pub struct StatusUpdated {
    /// Human-readable message.
    pub message: String,
    /// Status now held by the order.
    pub status: OrderStatus,
}

/// Body returned after an offer request was forwarded.
#[derive(Debug, Serialize, Deserialize)]
pub struct OfferAccepted {
    /// Always `true`.
    pub success: bool,
    /// Human-readable message.
    pub message: String,
}

/// GET /api/
pub async fn root() -> Json<MessageResponse> {
    Json(MessageResponse {
        message: "Aqualan API - Sistema de Pedidos".to_owned(),
    })
}

/// GET /health
pub async fn health() -> &'static str {
    "ok"
}

/// GET /api/products
pub async fn list_products(
    State(state): State<AppState>,
    query: Result<Query<ProductQuery>, QueryRejection>,
) -> HandlerResult<Vec<Product>> {
    let Query(query) = query?;
    let filter = ProductFilter {
        category: query.category,
        brand: query.brand,
    };
    Ok(Json(state.service.products(&filter).await?))
}

/// GET /api/products/{id}
pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> HandlerResult<Product> {
    Ok(Json(state.service.product(&id).await?))
}

/// GET /api/categories
pub async fn categories(State(state): State<AppState>) -> Json<Vec<Category>> {
    Json(state.service.categories())
}

/// GET /api/delivery-zones
pub async fn delivery_zones(State(state): State<AppState>) -> Json<Vec<DeliveryZone>> {
    Json(state.service.delivery_zones())
}

/// GET /api/delivery-date?city=
///
/// Unknown or missing cities are answered with `found: false`, never an error.
pub async fn delivery_date(
    State(state): State<AppState>,
    query: Result<Query<CityQuery>, QueryRejection>,
) -> HandlerResult<DeliveryEstimate> {
    let Query(query) = query?;
    Ok(Json(state.service.delivery_estimate(&query.city)))
}

/// GET /api/routes
pub async fn routes(State(state): State<AppState>) -> Json<RouteTables> {
    let tables = state.service.scheduler().tables();
    Json(RouteTables::clone(&tables))
}

/// POST /api/routes/reload
pub async fn reload_routes(State(state): State<AppState>) -> HandlerResult<ReloadReport> {
    let source = state
        .route_source
        .as_ref()
        .ok_or_else(|| AppError::Conflict("No route sheet configured (ROUTE_SHEET)".to_owned()))?;
    Ok(Json(state.service.reload_routes(source.as_ref()).await?))
}

/// POST /api/orders
pub async fn create_order(
    State(state): State<AppState>,
    payload: Result<Json<OrderCreate>, JsonRejection>,
) -> HandlerResult<Order> {
    let Json(request) = payload?;
    Ok(Json(state.service.create_order(request).await?))
}

/// GET /api/orders
pub async fn list_orders(
    State(state): State<AppState>,
    query: Result<Query<OrderQuery>, QueryRejection>,
) -> HandlerResult<Vec<Order>> {
    let Query(query) = query?;
    Ok(Json(state.service.orders(query.email.as_deref()).await?))
}

/// GET /api/orders/{id}
pub async fn get_order(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> HandlerResult<Order> {
    Ok(Json(state.service.order(&id).await?))
}

/// PUT /api/orders/{id}/status?status=
pub async fn update_order_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
    query: Result<Query<StatusQuery>, QueryRejection>,
) -> HandlerResult<StatusUpdated> {
    let Query(query) = query?;
    let order = state.service.update_order_status(&id, &query.status).await?;
    Ok(Json(StatusUpdated {
        message: "Estado actualizado".to_owned(),
        status: order.status,
    }))
}

/// POST /api/offer-request
pub async fn offer_request(
    State(state): State<AppState>,
    payload: Result<Json<OfferRequest>, JsonRejection>,
) -> HandlerResult<OfferAccepted> {
    let Json(request) = payload?;
    state.service.submit_offer_request(&request).await?;
    Ok(Json(OfferAccepted {
        success: true,
        message: "Solicitud enviada correctamente".to_owned(),
    }))
}
