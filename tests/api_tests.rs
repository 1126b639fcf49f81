use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

use parking_access_control::config::parking::NUM_SLOTS;
use parking_access_control::config::EnvironmentConfig;
use parking_access_control::repositories::{MemoryParkingStore, StoreOperation};
use parking_access_control::{create_app_router, AppState};

// Función helper para crear la app de test sobre registros en memoria
fn create_test_app(store: &MemoryParkingStore) -> Router {
    let state = AppState::new(Arc::new(store.clone()), EnvironmentConfig::default());
    create_app_router(state)
}

async fn authorize(store: &MemoryParkingStore, plate: &str, document: &str) {
    store.add_vehicle(plate, Some(document)).await;
    store.add_beneficiary(document).await;
}

async fn post_raw(app: &Router, body: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri("/validar_placa/")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

async fn post_plate(app: &Router, body: Value) -> (StatusCode, Value) {
    post_raw(app, &body.to_string()).await
}

async fn get_json(app: &Router, uri: &str) -> (StatusCode, Value) {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn test_missing_placa_is_client_error() {
    let store = MemoryParkingStore::new();
    let app = create_test_app(&store);

    for body in [json!({}), json!({ "placa": null }), json!({ "placa": "" }), json!({ "placa": "--" })] {
        let (status, response) = post_plate(&app, body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(response["detail"], "Placa no proporcionada");
    }
}

#[tokio::test]
async fn test_malformed_body_is_client_error() {
    let store = MemoryParkingStore::new();
    let app = create_test_app(&store);

    let (status, response) = post_raw(&app, "{ no es json").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(response["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn test_unregistered_vehicle() {
    let store = MemoryParkingStore::new();
    let app = create_test_app(&store);

    let (status, response) = post_plate(&app, json!({ "placa": "QQQ-000" })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response, json!({ "mensaje": "Vehículo no registrado", "permitido": false }));
}

#[tokio::test]
async fn test_document_not_authorized() {
    let store = MemoryParkingStore::new();
    store.add_vehicle("ABC-123", Some("D2")).await;
    let app = create_test_app(&store);

    let (status, response) = post_plate(&app, json!({ "placa": "ABC-123" })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response, json!({ "mensaje": "Documento no registrado", "permitido": false }));
    assert!(store.records().await.is_empty());
}

#[tokio::test]
async fn test_first_entry_gets_slot_one() {
    let store = MemoryParkingStore::new();
    authorize(&store, "XYZ-001", "D1").await;
    let app = create_test_app(&store);

    let (status, response) = post_plate(&app, json!({ "placa": "XYZ-001" })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        response,
        json!({
            "mensaje": "Ingreso registrado para XYZ001",
            "permitido": true,
            "salida": false,
            "puesto": 1
        })
    );
}

#[tokio::test]
async fn test_entry_then_exit_returns_same_slot() {
    let store = MemoryParkingStore::new();
    authorize(&store, "AAA-111", "D1").await;
    authorize(&store, "BBB-222", "D2").await;
    let app = create_test_app(&store);

    post_plate(&app, json!({ "placa": "AAA111" })).await;
    let (_, entry) = post_plate(&app, json!({ "placa": "BBB-222" })).await;
    assert_eq!(entry["salida"], false);
    assert_eq!(entry["puesto"], 2);

    let (status, exit) = post_plate(&app, json!({ "placa": "B-B-B-2-2-2" })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        exit,
        json!({
            "mensaje": "Salida confirmada para BBB222",
            "permitido": true,
            "salida": true,
            "puesto": 2
        })
    );
}

#[tokio::test]
async fn test_hyphen_variants_hit_the_same_vehicle() {
    let store = MemoryParkingStore::new();
    authorize(&store, "AB-123", "D7").await;
    let app = create_test_app(&store);

    let (_, entry) = post_plate(&app, json!({ "placa": "A-B-1-2-3" })).await;
    assert_eq!(entry["mensaje"], "Ingreso registrado para AB123");

    let (_, exit) = post_plate(&app, json!({ "placa": "AB123" })).await;
    assert_eq!(exit["salida"], true);
    assert_eq!(exit["puesto"], entry["puesto"]);
}

#[tokio::test]
async fn test_no_slots_when_lot_is_full() {
    let store = MemoryParkingStore::new();
    let app = create_test_app(&store);

    for n in 1..=NUM_SLOTS {
        let plate = format!("LOT-{:02}", n);
        authorize(&store, &plate, &format!("DOC-{}", n)).await;
        let (_, response) = post_plate(&app, json!({ "placa": plate })).await;
        assert_eq!(response["permitido"], true);
    }

    authorize(&store, "LATE-99", "DOC-LATE").await;
    let (status, response) = post_plate(&app, json!({ "placa": "LATE-99" })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response, json!({ "mensaje": "No hay puestos disponibles", "permitido": false }));

    let (_, snapshot) = get_json(&app, "/puestos").await;
    assert_eq!(snapshot["ocupados"], NUM_SLOTS);
    assert_eq!(snapshot["disponibles"], 0);
}

#[tokio::test]
async fn test_concurrent_entries_get_distinct_slots() {
    let store = MemoryParkingStore::new();
    for n in 0..NUM_SLOTS {
        authorize(&store, &format!("RUSH-{}", n), &format!("R{}", n)).await;
    }
    let app = create_test_app(&store);

    let mut handles = Vec::new();
    for n in 0..NUM_SLOTS {
        let app = app.clone();
        handles.push(tokio::spawn(async move {
            post_plate(&app, json!({ "placa": format!("RUSH-{}", n) })).await
        }));
    }

    let mut slots = Vec::new();
    for handle in handles {
        let (status, response) = handle.await.unwrap();
        assert_eq!(status, StatusCode::OK);
        slots.push(response["puesto"].as_i64().unwrap());
    }
    slots.sort_unstable();
    let expected: Vec<i64> = (1..=NUM_SLOTS as i64).collect();
    assert_eq!(slots, expected);
}

#[tokio::test]
async fn test_database_failure_is_server_error() {
    let store = MemoryParkingStore::new();
    authorize(&store, "XYZ-001", "D1").await;
    store.set_unavailable(Some("connection refused")).await;
    let app = create_test_app(&store);

    let (status, response) = post_plate(&app, json!({ "placa": "XYZ-001" })).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let detail = response["detail"].as_str().unwrap();
    assert!(detail.contains("base de datos"));
    assert!(detail.contains("connection refused"));
    assert_eq!(store.open_sessions(), 0);
}

#[tokio::test]
async fn test_insert_failure_is_server_error_without_partial_state() {
    let store = MemoryParkingStore::new();
    authorize(&store, "XYZ-001", "D1").await;
    store.fail_operation(StoreOperation::RegisterEntry, "deadlock detected").await;
    let app = create_test_app(&store);

    let (status, response) = post_plate(&app, json!({ "placa": "XYZ-001" })).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response["code"], "DB_ERROR");
    let detail = response["detail"].as_str().unwrap();
    assert!(detail.starts_with("Error en la base de datos:"));
    assert!(detail.contains("deadlock detected"));
    assert!(store.records().await.is_empty());
    assert_eq!(store.open_sessions(), 0);
}

#[tokio::test]
async fn test_exit_raced_by_other_request_is_conflict() {
    let store = MemoryParkingStore::new();
    authorize(&store, "XYZ-001", "D1").await;
    let app = create_test_app(&store);

    let (status, _) = post_plate(&app, json!({ "placa": "XYZ001" })).await;
    assert_eq!(status, StatusCode::OK);

    store.simulate_concurrent_exit().await;
    let (status, response) = post_plate(&app, json!({ "placa": "XYZ001" })).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(response["code"], "CONFLICT");
    assert!(response["detail"].as_str().unwrap().contains("XYZ001"));
    assert_eq!(store.open_sessions(), 0);
}

#[tokio::test]
async fn test_occupancy_endpoint() {
    let store = MemoryParkingStore::new();
    authorize(&store, "ONE-1", "D1").await;
    authorize(&store, "TWO-2", "D2").await;
    let app = create_test_app(&store);

    post_plate(&app, json!({ "placa": "ONE-1" })).await;
    post_plate(&app, json!({ "placa": "TWO-2" })).await;
    post_plate(&app, json!({ "placa": "ONE-1" })).await;

    let (status, snapshot) = get_json(&app, "/puestos").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        snapshot,
        json!({ "total": NUM_SLOTS, "ocupados": 1, "disponibles": NUM_SLOTS - 1, "puestos_ocupados": [2] })
    );
}

#[tokio::test]
async fn test_health_check() {
    let store = MemoryParkingStore::new();
    let app = create_test_app(&store);

    let (status, body) = get_json(&app, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");

    store.set_unavailable(Some("down")).await;
    let (status, _) = get_json(&app, "/health").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
}
