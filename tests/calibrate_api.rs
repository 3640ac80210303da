use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use calibrator::api::{build_router, AppState};
use calibrator::config::RequestDefaults;
use calibrator::models::CountryTable;
use calibrator::source::NaturalEarthSource;
use http_body_util::BodyExt;
use serde_json::{json, Value as JsonValue};
use tower::ServiceExt;

const DATASET: &str = r#"{
    "type": "FeatureCollection",
    "features": [
        {
            "type": "Feature",
            "properties": {"name": "United States of America"},
            "geometry": {
                "type": "Polygon",
                "coordinates": [[[0, 0], [10, 0], [10, 10], [0, 10], [0, 0]]]
            }
        },
        {
            "type": "Feature",
            "properties": {"name": "United Kingdom"},
            "geometry": {
                "type": "Polygon",
                "coordinates": [[[-4, 50], [-2, 50], [-2, 52], [-4, 52], [-4, 50]]]
            }
        },
        {
            "type": "Feature",
            "properties": {"name": "France"},
            "geometry": {
                "type": "Polygon",
                "coordinates": [[[0, 40], [10, 40], [10, 44], [4, 44], [4, 50], [0, 50], [0, 40]]]
            }
        }
    ]
}"#;

fn test_state() -> Arc<AppState> {
    state_with_defaults(RequestDefaults::default())
}

fn state_with_defaults(defaults: RequestDefaults) -> Arc<AppState> {
    let source = NaturalEarthSource::from_geojson_str(DATASET, "name").expect("dataset");
    Arc::new(AppState::new(
        Arc::new(source),
        CountryTable::default(),
        defaults,
    ))
}

async fn json_body(resp: axum::http::Response<Body>) -> (StatusCode, JsonValue) {
    let status = resp.status();
    let bytes = resp
        .into_body()
        .collect()
        .await
        .expect("collect body")
        .to_bytes();
    let json: JsonValue = serde_json::from_slice(&bytes).expect("valid JSON response");
    (status, json)
}

async fn calibrate(body: JsonValue) -> (StatusCode, JsonValue) {
    calibrate_with(test_state(), body).await
}

async fn calibrate_with(state: Arc<AppState>, body: JsonValue) -> (StatusCode, JsonValue) {
    let app = build_router(state);
    let resp = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/v1/calibrator/calibrate")
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    json_body(resp).await
}

fn ids(cells: &JsonValue) -> Vec<u64> {
    cells
        .as_array()
        .expect("array")
        .iter()
        .map(|c| c["temp_id"].as_u64().expect("temp_id"))
        .collect()
}

#[tokio::test]
async fn health_check_ok() {
    let app = build_router(test_state());
    let resp = app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let (status, json) = json_body(resp).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "ok");
}

#[tokio::test]
async fn defaults_build_us_grid() {
    let (status, cells) = calibrate(json!({})).await;
    assert_eq!(status, StatusCode::CREATED);

    // 10x10 box at cell size 1
    assert_eq!(ids(&cells), (0..100).collect::<Vec<u64>>());

    let first = &cells[0];
    assert_eq!(first["cell_size"], 1.0);
    assert_eq!(first["bottom_left_coords"], json!({"lat": 0.0, "lng": 0.0}));
    assert_eq!(first["top_right_coords"], json!({"lat": 1.0, "lng": 1.0}));
}

#[tokio::test]
async fn explicit_cell_size_and_country() {
    let (status, cells) = calibrate(json!({"country": "US", "cell_size": 5})).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(ids(&cells), vec![0, 1, 2, 3]);
    assert_eq!(cells[1]["bottom_left_coords"], json!({"lat": 5.0, "lng": 0.0}));
}

#[tokio::test]
async fn gb_resolves_to_united_kingdom() {
    let (status_gb, gb) = calibrate(json!({"country": "gb", "cell_size": 1})).await;
    let (status_uk, uk) = calibrate(json!({"country": "UK", "cell_size": 1})).await;

    assert_eq!(status_gb, StatusCode::CREATED);
    assert_eq!(status_uk, StatusCode::CREATED);
    assert_eq!(gb, uk);
    assert_eq!(ids(&gb), vec![0, 1, 2, 3]);
    assert_eq!(gb[0]["bottom_left_coords"], json!({"lat": 50.0, "lng": -4.0}));
}

#[tokio::test]
async fn unknown_code_falls_back_to_default_country() {
    let (_, fallback) = calibrate(json!({"country": "ZZ", "cell_size": 5})).await;
    let (_, us) = calibrate(json!({"country": "US", "cell_size": 5})).await;
    assert_eq!(fallback, us);
}

#[tokio::test]
async fn non_convex_country_returns_sparse_ids() {
    let (status, cells) = calibrate(json!({"country": "FR", "cell_size": 2})).await;
    assert_eq!(status, StatusCode::CREATED);

    // 5 columns x 5 rows; cells strictly inside the notch x > 4, y > 44 are dropped
    let got = ids(&cells);
    assert_eq!(got.len(), 21);
    for missing in [18, 19, 23, 24] {
        assert!(!got.contains(&missing));
    }
    assert!(got.windows(2).all(|w| w[0] < w[1]));
}

#[tokio::test]
async fn country_missing_from_dataset_is_empty() {
    // Mapped code whose name is not in this dataset
    let (status, cells) = calibrate(json!({"country": "CA"})).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(cells, json!([]));
}

#[tokio::test]
async fn invalid_cell_size_is_bad_request() {
    for bad in [json!(0), json!(-1.5)] {
        let (status, body) = calibrate(json!({"country": "US", "cell_size": bad})).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("Invalid cell size"));
    }
}

#[tokio::test]
async fn tiny_cell_size_is_rejected_before_tiling() {
    // 10x10 box at 1e-5 would tile about 1e12 candidate cells
    let (status, body) = calibrate(json!({"country": "US", "cell_size": 0.00001})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("limit"));

    // Candidate count overflows usize
    let (status, _) = calibrate(json!({"country": "US", "cell_size": 1e-300})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn max_cells_is_configurable() {
    let defaults = RequestDefaults {
        max_cells: 50,
        ..RequestDefaults::default()
    };

    // 100 candidates at cell size 1, 4 at cell size 5
    let (status, _) =
        calibrate_with(state_with_defaults(defaults.clone()), json!({"cell_size": 1})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, cells) =
        calibrate_with(state_with_defaults(defaults), json!({"cell_size": 5})).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(ids(&cells), vec![0, 1, 2, 3]);
}

#[tokio::test]
async fn malformed_json_is_rejected() {
    let app = build_router(test_state());
    let resp = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/v1/calibrator/calibrate")
                .header("content-type", "application/json")
                .body(Body::from("{ not json"))
                .unwrap(),
        )
        .await
        .unwrap();
    assert!(resp.status().is_client_error());
}
