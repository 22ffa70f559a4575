use anyhow::Result;
use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::post;
use axum::{Json, Router};
use reqwest::Url;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tablecrm_cards::config::TokenPlacement;
use tablecrm_cards::model::ProductDraft;
use tablecrm_cards::tablecrm::model::NomenclatureItem;
use tablecrm_cards::tablecrm::{CatalogService, TableCrmClient};
use tokio::sync::Mutex;

/// What the fake upstream saw for one request.
#[derive(Debug, Clone)]
struct Seen {
    query_token: Option<String>,
    authorization: Option<String>,
    body: Value,
}

#[derive(Clone)]
struct Upstream {
    seen: Arc<Mutex<Vec<Seen>>>,
    /// Token accepted in the query string; bearer headers are always refused
    /// when this is set, mimicking an API that only reads `?token=`.
    query_only: bool,
}

async fn nomenclature(
    State(upstream): State<Upstream>,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, String) {
    let authorization = headers
        .get("authorization")
        .and_then(|h| h.to_str().ok())
        .map(str::to_string);
    let query_token = query.get("token").cloned();
    upstream.seen.lock().await.push(Seen {
        query_token: query_token.clone(),
        authorization: authorization.clone(),
        body,
    });

    let token = match (query_token, authorization) {
        (Some(t), _) => Some(t),
        (None, Some(h)) if !upstream.query_only => h.strip_prefix("Bearer ").map(str::to_string),
        _ => None,
    };
    match token.as_deref() {
        Some("good") => (StatusCode::OK, json!([{ "id": 42 }]).to_string()),
        Some(_) => (StatusCode::FORBIDDEN, json!({ "detail": "bad token" }).to_string()),
        None if upstream.query_only => (StatusCode::UNAUTHORIZED, String::new()),
        None => (StatusCode::UNAUTHORIZED, json!({ "detail": "no token" }).to_string()),
    }
}

async fn spawn_upstream(query_only: bool) -> (Url, Arc<Mutex<Vec<Seen>>>) {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let app = Router::new()
        .route("/api/nomenclature", post(nomenclature))
        .with_state(Upstream {
            seen: seen.clone(),
            query_only,
        });
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    let base = Url::parse(&format!("http://{}/api/", addr)).unwrap();
    (base, seen)
}

fn item() -> NomenclatureItem {
    let draft: ProductDraft = serde_json::from_value(json!({
        "name": "Ноутбук Lenovo",
        "unit": "116",
        "marketplace_price": 45000,
        "seo_keywords": ["ноутбук", "lenovo"],
    }))
    .unwrap();
    draft.to_item().unwrap()
}

fn client(base: Url, placement: TokenPlacement) -> TableCrmClient {
    TableCrmClient::with_base_url(base, placement, Duration::from_secs(5)).unwrap()
}

#[tokio::test]
async fn query_placement_sends_one_request_with_token_param() -> Result<()> {
    let (base, seen) = spawn_upstream(false).await;
    let reply = client(base, TokenPlacement::Query)
        .create_nomenclature("good", &[item()])
        .await?;
    assert_eq!(reply.status, 200);
    let body: Value = serde_json::from_str(&reply.body)?;
    assert_eq!(body, json!([{ "id": 42 }]));

    let seen = seen.lock().await.clone();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].query_token.as_deref(), Some("good"));
    assert_eq!(seen[0].authorization, None);
    let list = seen[0].body.as_array().unwrap();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0]["name"], "Ноутбук Lenovo");
    assert_eq!(list[0]["marketplace_price"], 45000.0);
    assert_eq!(list[0]["seo_keywords"], json!(["ноутбук", "lenovo"]));
    Ok(())
}

#[tokio::test]
async fn bearer_placement_sends_header_only() -> Result<()> {
    let (base, seen) = spawn_upstream(false).await;
    let reply = client(base, TokenPlacement::Bearer)
        .create_nomenclature("good", &[item()])
        .await?;
    assert_eq!(reply.status, 200);

    let seen = seen.lock().await.clone();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].query_token, None);
    assert_eq!(seen[0].authorization.as_deref(), Some("Bearer good"));
    Ok(())
}

#[tokio::test]
async fn upstream_rejection_is_returned_verbatim() -> Result<()> {
    let (base, seen) = spawn_upstream(false).await;
    let reply = client(base, TokenPlacement::Query)
        .create_nomenclature("stale", &[item()])
        .await?;
    assert_eq!(reply.status, 403);
    assert_eq!(reply.body, json!({ "detail": "bad token" }).to_string());
    assert_eq!(seen.lock().await.len(), 1);
    Ok(())
}

#[tokio::test]
async fn bearer_then_query_skips_retry_on_success() -> Result<()> {
    let (base, seen) = spawn_upstream(false).await;
    let reply = client(base, TokenPlacement::BearerThenQuery)
        .create_nomenclature("good", &[item()])
        .await?;
    assert_eq!(reply.status, 200);
    assert_eq!(seen.lock().await.len(), 1);
    Ok(())
}

#[tokio::test]
async fn bearer_then_query_falls_back_once() -> Result<()> {
    let (base, seen) = spawn_upstream(true).await;
    let reply = client(base, TokenPlacement::BearerThenQuery)
        .create_nomenclature("good", &[item()])
        .await?;
    assert_eq!(reply.status, 200);

    let seen = seen.lock().await.clone();
    assert_eq!(seen.len(), 2);
    assert_eq!(seen[0].authorization.as_deref(), Some("Bearer good"));
    assert_eq!(seen[0].query_token, None);
    assert_eq!(seen[1].authorization, None);
    assert_eq!(seen[1].query_token.as_deref(), Some("good"));
    assert_eq!(seen[0].body, seen[1].body);
    Ok(())
}

#[tokio::test]
async fn bearer_then_query_reports_second_failure() -> Result<()> {
    let (base, seen) = spawn_upstream(false).await;
    let reply = client(base, TokenPlacement::BearerThenQuery)
        .create_nomenclature("stale", &[item()])
        .await?;
    assert_eq!(reply.status, 403);
    assert_eq!(reply.body, json!({ "detail": "bad token" }).to_string());
    assert_eq!(seen.lock().await.len(), 2);
    Ok(())
}

#[tokio::test]
async fn unreachable_upstream_is_an_error() {
    // Bind then drop to get a port nothing listens on.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    let base = Url::parse(&format!("http://{}/api/", addr)).unwrap();
    let err = client(base, TokenPlacement::Query)
        .create_nomenclature("good", &[item()])
        .await
        .unwrap_err();
    assert!(format!("{:#}", err).contains("failed to reach TableCRM"));
}
