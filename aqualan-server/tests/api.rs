use std::sync::Arc;

use aqualan_core::cycle::REFERENCE_ANCHOR;
use aqualan_core::mail::EmailMessage;
use aqualan_core::{
    AqualanService, FixedClock, InMemoryOrderStore, InMemoryProductStore, Notifier, PortError,
    RouteRow, RouteTableSource, SharedScheduler,
};
use aqualan_server::router;
use aqualan_server::state::AppState;
use async_trait::async_trait;
use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Method, Request, StatusCode, header};
use chrono::NaiveTime;
use serde_json::{Value, json};
use tower::ServiceExt;

struct QuietNotifier;

#[async_trait]
impl Notifier for QuietNotifier {
    async fn send(&self, _message: &EmailMessage) -> Result<(), PortError> {
        Ok(())
    }
}

struct GorlizSheet;

#[async_trait]
impl RouteTableSource for GorlizSheet {
    fn describe(&self) -> String {
        "gorliz sheet".to_owned()
    }

    async fn fetch_rows(&self) -> Result<Vec<RouteRow>, PortError> {
        Ok(vec![RouteRow {
            locality: "Gorliz".to_owned(),
            days: [false, true, false, false, false],
            period: "SEMANA A".to_owned(),
        }])
    }
}

/// Service frozen at noon on the reference Monday.
async fn state() -> AppState {
    let noon = REFERENCE_ANCHOR.and_time(NaiveTime::from_hms_opt(12, 0, 0).expect("valid time"));
    let service = AqualanService::new(
        Arc::new(SharedScheduler::builtin()),
        Arc::new(InMemoryProductStore::new()),
        Arc::new(InMemoryOrderStore::new()),
        Arc::new(QuietNotifier),
        Arc::new(FixedClock(noon)),
    );
    service.seed_catalog().await.expect("seed");
    AppState::new(Arc::new(service))
}

async fn app() -> Router {
    router(state().await)
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string())),
        None => builder.body(Body::empty()),
    }
    .expect("request");

    let response = app.clone().oneshot(request).await.expect("response");
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.expect("body");
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

fn order_body(city: &str) -> Value {
    json!({
        "customer_name": "Ane Etxeberria",
        "customer_email": "ane@example.com",
        "customer_phone": "600111222",
        "delivery_city": city,
        "delivery_address": "Kale Nagusia 1",
        "items": [{
            "product_id": "p-19l",
            "product_name": "Botellón 19L San Andrés",
            "quantity": 2,
            "price": 6.5,
            "unit": "unidad"
        }]
    })
}

#[tokio::test]
async fn health_and_root() {
    let app = app().await;
    let response = app
        .clone()
        .oneshot(Request::get("/health").body(Body::empty()).expect("request"))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.expect("body");
    assert_eq!(&bytes[..], b"ok");

    let (status, body) = send(&app, Method::GET, "/api/", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Aqualan API - Sistema de Pedidos");
}

#[tokio::test]
async fn delivery_date_for_known_and_unknown_cities() {
    let app = app().await;

    let (status, body) = send(&app, Method::GET, "/api/delivery-date?city=Getxo", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "found": true,
            "message": "Miércoles 08/01/2025",
            "date": "2025-01-08",
            "day_name": "Miércoles",
        })
    );

    let (status, body) = send(&app, Method::GET, "/api/delivery-date?city=Madrid", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["found"], false);
    assert_eq!(body["date"], Value::Null);
    assert_eq!(
        body["message"],
        "Te contactaremos para confirmar la fecha de entrega."
    );

    let (status, body) = send(&app, Method::GET, "/api/delivery-date", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["found"], false);
}

#[tokio::test]
async fn catalog_endpoints() {
    let app = app().await;

    let (status, products) = send(&app, Method::GET, "/api/products?category=cafe", None).await;
    assert_eq!(status, StatusCode::OK);
    let products = products.as_array().expect("array");
    assert!(!products.is_empty());
    assert!(products.iter().all(|product| product["category"] == "cafe"));

    let id = products[0]["id"].as_str().expect("id");
    let (status, product) = send(&app, Method::GET, &format!("/api/products/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(product["id"], id);

    let (status, error) = send(&app, Method::GET, "/api/products/nope", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(error["code"], "NOT_FOUND");

    let (_, categories) = send(&app, Method::GET, "/api/categories", None).await;
    assert_eq!(categories.as_array().map(Vec::len), Some(6));

    let (_, zones) = send(&app, Method::GET, "/api/delivery-zones", None).await;
    assert_eq!(zones[0]["id"], "bizkaia");
}

#[tokio::test]
async fn order_lifecycle() {
    let app = app().await;

    let (status, order) = send(&app, Method::POST, "/api/orders", Some(order_body("Getxo"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(order["total"], 13.0);
    assert_eq!(order["status"], "pendiente");
    assert_eq!(order["delivery_date"], "2025-01-08");
    assert_eq!(order["delivery_day"], "Miércoles");
    let id = order["id"].as_str().expect("id").to_owned();

    let (status, fetched) = send(&app, Method::GET, &format!("/api/orders/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, order);

    let (_, mine) = send(&app, Method::GET, "/api/orders?email=ane@example.com", None).await;
    assert_eq!(mine.as_array().map(Vec::len), Some(1));
    let (_, theirs) = send(&app, Method::GET, "/api/orders?email=jon@example.com", None).await;
    assert_eq!(theirs, json!([]));

    let (status, updated) = send(
        &app,
        Method::PUT,
        &format!("/api/orders/{id}/status?status=confirmado"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["status"], "confirmado");

    let (status, _) = send(
        &app,
        Method::PUT,
        &format!("/api/orders/{id}/status?status=perdido"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, Method::PUT, "/api/orders/missing/status?status=entregado", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, Method::GET, "/api/orders/missing", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn bad_orders_are_rejected() {
    let app = app().await;

    let mut empty = order_body("Bilbao");
    empty["items"] = json!([]);
    let (status, error) = send(&app, Method::POST, "/api/orders", Some(empty)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["code"], "BAD_REQUEST");

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/orders",
        Some(json!({ "customer_name": "Ane" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn offer_request() {
    let app = app().await;
    let offer = json!({
        "empresa": "Txoko SL",
        "nombre": "Jon",
        "telefono": "944000000",
        "email": "jon@txoko.eus",
        "ubicacion": "gipuzkoa",
        "ciudad": "Donostia",
        "productos": ["botellones"]
    });
    let (status, body) = send(&app, Method::POST, "/api/offer-request", Some(offer.clone())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);

    let mut other = offer;
    other["ubicacion"] = json!("otra");
    let (status, _) = send(&app, Method::POST, "/api/offer-request", Some(other)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn routes_and_reload() {
    let app = app().await;

    let (status, tables) = send(&app, Method::GET, "/api/routes", None).await;
    assert_eq!(status, StatusCode::OK);
    let biweekly = tables["biweekly"].as_array().expect("biweekly");
    assert_eq!(biweekly[0]["key"], "getxo");
    assert!(tables["weekly"].as_array().is_some_and(|weekly| !weekly.is_empty()));

    let (status, error) = send(&app, Method::POST, "/api/routes/reload", None).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(error["code"], "CONFLICT");

    let app = router(state().await.with_route_source(Arc::new(GorlizSheet)));
    let (status, report) = send(&app, Method::POST, "/api/routes/reload", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(report, json!({ "accepted": 1, "rejected": 0, "applied": true }));

    // WEEK_A Tuesday, the reference week is WEEK_B
    let (_, estimate) = send(&app, Method::GET, "/api/delivery-date?city=Gorliz", None).await;
    assert_eq!(estimate["date"], "2025-01-14");
    assert_eq!(estimate["day_name"], "Martes");
}
