//! End-to-end tests for a small shop app with a declarative error map

mod harness;

use std::sync::{Arc, Mutex};

use axum::Router;
use axum::extract::Request;
use axum::response::{IntoResponse, Json, Response};
use schemars::{Schema, schema_for};
use serde_json::{Value, json};
use thiserror::Error;
use tower_http::trace::TraceLayer;

use errmap::{ErrorAwareRouter, ErrorMap, OnError, RouteConfig, Rule, Work};
use errmap_core::{ErrorPayload, ErrorTag, MappedError, Translator};

use harness::server::TestServer;

// -- App under test --

#[derive(Debug, Error)]
#[error("{0}")]
struct OutOfStockError(String);

impl MappedError for OutOfStockError {
    fn tag(&self) -> ErrorTag {
        ErrorTag::of::<Self>()
    }
}

#[derive(Debug, Error)]
#[error("{0}")]
struct AuthorizationError(String);

impl MappedError for AuthorizationError {
    fn tag(&self) -> ErrorTag {
        ErrorTag::of::<Self>()
    }
}

#[derive(Debug, Error)]
enum StockError {
    #[error(transparent)]
    OutOfStock(#[from] OutOfStockError),
    #[error(transparent)]
    Authorization(#[from] AuthorizationError),
}

impl MappedError for StockError {
    fn tag(&self) -> ErrorTag {
        match self {
            Self::OutOfStock(error) => error.tag(),
            Self::Authorization(error) => error.tag(),
        }
    }
}

struct OutOfStockTranslator;

impl Translator for OutOfStockTranslator {
    fn from_error(&self, error: &dyn MappedError) -> Value {
        json!({ "error": error.to_string() })
    }

    fn payload_schema(&self) -> Schema {
        schema_for!(ErrorPayload)
    }
}

fn stock_routes(notifications: Arc<Mutex<Vec<String>>>) -> ErrorAwareRouter {
    let endpoint: Work<Request, Result<Response, StockError>> =
        Work::suspending(|request: Request| async move {
            let user_id = request
                .uri()
                .query()
                .and_then(|query| query.strip_prefix("user_id="))
                .unwrap_or_default();
            match user_id {
                "0" => Err(AuthorizationError(String::new()).into()),
                "1" => Err(OutOfStockError("No items available.".to_owned()).into()),
                _ => Ok(Json(json!({"stock": 42})).into_response()),
            }
        });

    let notify: OnError = Work::suspending(move |error| {
        let notifications = Arc::clone(&notifications);
        async move {
            notifications
                .lock()
                .unwrap()
                .push(format!("Notified admin: {error}"));
        }
    });

    let map = ErrorMap::new()
        .entry::<AuthorizationError>(401)
        .entry::<OutOfStockError>(
            Rule::new(409)
                .with_translator(Arc::new(OutOfStockTranslator))
                .with_on_error(notify),
        );

    ErrorAwareRouter::new().get("/stock", endpoint, RouteConfig::new().with_error_map(map))
}

fn app(notifications: &Arc<Mutex<Vec<String>>>) -> Router {
    stock_routes(Arc::clone(notifications))
        .into_router()
        .layer(TraceLayer::new_for_http())
}

// -- Tests --

#[tokio::test]
async fn success_returns_the_stock_payload() {
    let notifications = Arc::new(Mutex::new(Vec::new()));
    let server = TestServer::start(app(&notifications)).await.unwrap();

    let resp = server
        .client()
        .get(server.url("/stock?user_id=7"))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body, json!({"stock": 42}));
}

#[tokio::test]
async fn authorization_failures_use_the_default_client_translator() {
    let notifications = Arc::new(Mutex::new(Vec::new()));
    let server = TestServer::start(app(&notifications)).await.unwrap();

    let resp = server
        .client()
        .get(server.url("/stock?user_id=0"))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 401);
    assert_eq!(
        resp.headers()[reqwest::header::CONTENT_TYPE],
        "application/json"
    );
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body, json!({"error": ""}));
}

#[tokio::test]
async fn out_of_stock_maps_to_409_and_notifies_the_admin() {
    let notifications = Arc::new(Mutex::new(Vec::new()));
    let server = TestServer::start(app(&notifications)).await.unwrap();

    let resp = server
        .client()
        .get(server.url("/stock?user_id=1"))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 409);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body, json!({"error": "No items available."}));
    assert_eq!(
        *notifications.lock().unwrap(),
        vec!["Notified admin: No items available.".to_owned()]
    );
}

#[test]
fn error_docs_list_every_declared_status() {
    let notifications = Arc::new(Mutex::new(Vec::new()));
    let routes = stock_routes(notifications);

    let docs = routes.error_docs();
    let mut statuses: Vec<u16> = docs.iter().map(|doc| doc.status).collect();
    statuses.sort_unstable();

    assert_eq!(statuses, vec![401, 409]);
    assert!(
        docs.iter()
            .all(|doc| doc.method == "GET" && doc.path == "/stock")
    );
}
