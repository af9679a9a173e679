// Stub REST Service
//
// A small axum app standing in for the back-office service. Every handler
// records what it received so tests can assert on headers, bodies and hit
// counts.

#![allow(dead_code)]

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, patch, post};
use axum::{Json, Router};
use jsonwebtoken::{encode, EncodingKey, Header};
use punto_client::ClientConfig;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

pub const EMAIL: &str = "ana@punto.co";
pub const PASSWORD: &str = "secret";
pub const EMPLOYEE_ID: i64 = 12;

/// What the stub saw.
#[derive(Clone, Default)]
pub struct StubState {
    hits: Arc<Mutex<HashMap<String, usize>>>,
    auth: Arc<Mutex<Vec<Option<String>>>>,
    request_ids: Arc<Mutex<Vec<String>>>,
    bodies: Arc<Mutex<Vec<(String, Value)>>>,
}

impl StubState {
    fn record(&self, route: &str, headers: &HeaderMap) -> usize {
        let auth = headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        self.auth.lock().unwrap().push(auth);

        if let Some(id) = headers.get("x-request-id").and_then(|v| v.to_str().ok()) {
            self.request_ids.lock().unwrap().push(id.to_string());
        }

        let mut hits = self.hits.lock().unwrap();
        let count = hits.entry(route.to_string()).or_insert(0);
        *count += 1;
        *count
    }

    fn record_body(&self, route: &str, body: &Value) {
        self.bodies
            .lock()
            .unwrap()
            .push((route.to_string(), body.clone()));
    }

    pub fn hits(&self, route: &str) -> usize {
        self.hits.lock().unwrap().get(route).copied().unwrap_or(0)
    }

    pub fn last_auth(&self) -> Option<String> {
        self.auth.lock().unwrap().last().cloned().flatten()
    }

    pub fn request_ids(&self) -> Vec<String> {
        self.request_ids.lock().unwrap().clone()
    }

    pub fn bodies(&self, route: &str) -> Vec<Value> {
        self.bodies
            .lock()
            .unwrap()
            .iter()
            .filter(|(r, _)| r == route)
            .map(|(_, b)| b.clone())
            .collect()
    }
}

/// A bearer token as the service would issue it.
pub fn token() -> String {
    encode(
        &Header::default(),
        &json!({ "employeeId": EMPLOYEE_ID, "email": EMAIL, "exp": 4_000_000_000u64 }),
        &EncodingKey::from_secret(b"service-secret"),
    )
    .unwrap()
}

/// Client configuration pointing at the stub, with fast retries.
pub fn config(base_url: &str) -> ClientConfig {
    let mut config = ClientConfig::default();
    config.api.base_url = base_url.to_string();
    config.api.timeout_secs = 5;
    config.api.max_retries = 2;
    config.api.initial_backoff_ms = 10;
    config.api.max_backoff_secs = 1;
    config
}

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == format!("Bearer {}", token()))
}

fn unauthorized() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({ "statusCode": 401, "message": "Unauthorized" })),
    )
        .into_response()
}

fn product_json(id: i64) -> Value {
    json!({
        "productId": id,
        "productName": if id == 1 { "Cafe" } else { "Pan" },
        "unitaryProductPrice": if id == 1 { "1000.00" } else { "2500.00" },
        "productStock": 40,
        "taxes": if id == 1 {
            json!([{ "taxId": 1, "taxName": "IVA", "taxPercentage": "19.00" }])
        } else {
            json!([])
        },
        "suppliers": []
    })
}

// =============================================================================
// Handlers
// =============================================================================

async fn login(State(state): State<StubState>, headers: HeaderMap, Json(body): Json<Value>) -> Response {
    state.record("POST /auth/login", &headers);
    state.record_body("POST /auth/login", &body);
    if body["userEmail"] == EMAIL && body["userPassword"] == PASSWORD {
        Json(json!({ "token": token() })).into_response()
    } else {
        unauthorized()
    }
}

async fn list_products(State(state): State<StubState>, headers: HeaderMap) -> Response {
    state.record("GET /product", &headers);
    if !authorized(&headers) {
        return unauthorized();
    }
    Json(json!([product_json(1), product_json(2)])).into_response()
}

async fn get_product(
    State(state): State<StubState>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Response {
    state.record("GET /product/{id}", &headers);
    if !authorized(&headers) {
        return unauthorized();
    }
    match id {
        1 | 2 => Json(product_json(id)).into_response(),
        _ => (
            StatusCode::NOT_FOUND,
            Json(json!({ "statusCode": 404, "message": "Product not found" })),
        )
            .into_response(),
    }
}

async fn create_product(
    State(state): State<StubState>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    state.record("POST /product", &headers);
    state.record_body("POST /product", &body);
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        Json(json!({ "statusCode": 422, "message": ["productName must be unique"] })),
    )
        .into_response()
}

/// Fails once with 503, then answers.
async fn list_taxes(State(state): State<StubState>, headers: HeaderMap) -> Response {
    if state.record("GET /tax", &headers) == 1 {
        return StatusCode::SERVICE_UNAVAILABLE.into_response();
    }
    Json(json!([{ "taxId": 1, "taxName": "IVA", "taxPercentage": 19 }])).into_response()
}

async fn update_tax(
    State(state): State<StubState>,
    headers: HeaderMap,
    Path(_id): Path<i64>,
    Json(body): Json<Value>,
) -> Response {
    state.record("PATCH /tax/{id}", &headers);
    state.record_body("PATCH /tax/{id}", &body);
    Json(json!({ "generatedMaps": [], "raw": [], "affected": 1 })).into_response()
}

async fn delete_tax(
    State(state): State<StubState>,
    headers: HeaderMap,
    Path(_id): Path<i64>,
) -> Response {
    state.record("DELETE /tax/{id}", &headers);
    StatusCode::OK.into_response()
}

/// Always 503.
async fn create_customer(State(state): State<StubState>, headers: HeaderMap) -> Response {
    state.record("POST /customer", &headers);
    StatusCode::SERVICE_UNAVAILABLE.into_response()
}

/// Always 500.
async fn list_sales(State(state): State<StubState>, headers: HeaderMap) -> Response {
    state.record("GET /sale", &headers);
    StatusCode::INTERNAL_SERVER_ERROR.into_response()
}

async fn create_sale(
    State(state): State<StubState>,
    headers: HeaderMap,
    Json(mut body): Json<Value>,
) -> Response {
    state.record("POST /sale", &headers);
    state.record_body("POST /sale", &body);
    body["saleId"] = json!(900);
    (StatusCode::CREATED, Json(body)).into_response()
}

async fn create_sale_detail(
    State(state): State<StubState>,
    headers: HeaderMap,
    Json(mut body): Json<Value>,
) -> Response {
    let n = state.record("POST /sale-detail", &headers);
    state.record_body("POST /sale-detail", &body);
    body["saleDetailId"] = json!(n);
    (StatusCode::CREATED, Json(body)).into_response()
}

async fn list_inventory(State(state): State<StubState>, headers: HeaderMap) -> Response {
    state.record("GET /inventory", &headers);
    Json(json!([{
        "inventoryId": 3,
        "createdAt": "2024-03-09T15:30:00Z",
        "inventoryDetails": [{
            "inventoryDetailId": 1,
            "initialAmount": 10,
            "entryAmount": 5,
            "outputAmount": 3,
            "finalAmount": 12,
            "consumedAmount": 3,
            "product": { "productId": 1, "productName": "Cafe" }
        }]
    }]))
    .into_response()
}

async fn create_inventory(
    State(state): State<StubState>,
    headers: HeaderMap,
    Path(employee_id): Path<i64>,
    Json(body): Json<Value>,
) -> Response {
    state.record("POST /inventory/{employeeId}", &headers);
    state.record_body("POST /inventory/{employeeId}", &json!({ "employeeId": employee_id, "body": body }));
    (StatusCode::CREATED, Json(json!({ "inventoryId": 4 }))).into_response()
}

// =============================================================================
// Server
// =============================================================================

/// Starts the stub on an ephemeral port. Returns its base URL.
pub async fn spawn() -> (String, StubState) {
    let state = StubState::default();
    let app = Router::new()
        .route("/auth/login", post(login))
        .route("/product", get(list_products).post(create_product))
        .route("/product/{id}", get(get_product))
        .route("/tax", get(list_taxes))
        .route("/tax/{id}", patch(update_tax).delete(delete_tax))
        .route("/customer", post(create_customer))
        .route("/sale", get(list_sales).post(create_sale))
        .route("/sale-detail", post(create_sale_detail))
        .route("/inventory", get(list_inventory))
        .route("/inventory/{employee_id}", post(create_inventory))
        .with_state(state.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{}", addr), state)
}
