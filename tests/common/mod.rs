#![allow(dead_code)]

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::TcpListener;

/// How the mock records endpoint answers.
#[derive(Clone)]
pub enum Behavior {
    /// Serves the records matching the `nom` predicate of `where`, sliced by
    /// `offset` and `limit`.
    Records(Vec<Value>),
    Status(u16),
    Malformed,
    /// Answers with no records after the delay.
    Slow(Duration),
}

struct MockState {
    behavior: Behavior,
    requests: Mutex<Vec<HashMap<String, String>>>,
}

pub struct MockApi {
    pub base_url: String,
    state: Arc<MockState>,
}

impl MockApi {
    /// Query parameters of every request received so far.
    pub fn requests(&self) -> Vec<HashMap<String, String>> {
        self.state.requests.lock().unwrap().clone()
    }
}

async fn records(
    State(state): State<Arc<MockState>>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    state.requests.lock().unwrap().push(params.clone());
    match &state.behavior {
        Behavior::Records(all) => {
            let offset: usize = params.get("offset").and_then(|o| o.parse().ok()).unwrap_or(0);
            let limit: usize = params.get("limit").and_then(|l| l.parse().ok()).unwrap_or(10);
            let filter = params.get("where").and_then(|w| station_filter(w));
            let selected: Vec<&Value> = all
                .iter()
                .filter(|record| {
                    let name = record["nom"].as_str().unwrap_or_default();
                    match &filter {
                        Some(StationFilter::Equals(station)) => name == station,
                        Some(StationFilter::Contains(station)) => name.contains(station.as_str()),
                        None => true,
                    }
                })
                .collect();
            let page: Vec<&Value> = selected.iter().skip(offset).take(limit).copied().collect();
            Json(json!({ "total_count": selected.len(), "results": page })).into_response()
        }
        Behavior::Status(code) => StatusCode::from_u16(*code).unwrap().into_response(),
        Behavior::Malformed => (StatusCode::OK, "{\"results\": [oops").into_response(),
        Behavior::Slow(delay) => {
            tokio::time::sleep(*delay).await;
            Json(json!({ "results": [] })).into_response()
        }
    }
}

enum StationFilter {
    Equals(String),
    Contains(String),
}

/// Reads the `nom` predicate of a `where` clause.
fn station_filter(where_clause: &str) -> Option<StationFilter> {
    if let Some((_, rest)) = where_clause.split_once("nom like \"%") {
        let (station, _) = rest.split_once("%\"")?;
        return Some(StationFilter::Contains(station.to_string()));
    }
    let (_, rest) = where_clause.split_once("nom = \"")?;
    let (station, _) = rest.split_once('"')?;
    Some(StationFilter::Equals(station.to_string()))
}

/// Starts an in-process records endpoint on an ephemeral port.
pub async fn spawn_mock_api(behavior: Behavior) -> MockApi {
    let state = Arc::new(MockState {
        behavior,
        requests: Mutex::new(Vec::new()),
    });
    let app = Router::new()
        .route("/records", get(records))
        .with_state(Arc::clone(&state));
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    MockApi {
        base_url: format!("http://{}/records", addr),
        state,
    }
}

/// One catalog record of `station` at `timestamp`.
pub fn record(station: &str, timestamp: &str, temperature: f64, humidity: f64) -> Value {
    json!({
        "date": timestamp,
        "nom": station,
        "tc": temperature,
        "u": humidity,
        "tn12c": temperature - 3.0,
        "tx12c": temperature + 6.0,
        "rr1": null,
    })
}
