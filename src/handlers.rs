use std::sync::Arc;

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::Value;
use tracing::{info, instrument};

use crate::assist;
use crate::error::ApiError;
use crate::model::{
    require_name, CategorySuggestion, FormatRequest, FormattedText, GeneratedFields,
    NameRequest, ProductDraft, SeoCopy, SeoRequest, MIN_INPUT_CHARS,
};
use crate::tablecrm::CatalogService;

const INTERNAL_ERROR: &str = "Внутренняя ошибка сервера";

/// Request-scoped dependencies shared by the handlers.
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<dyn CatalogService>,
    pub default_token: Option<String>,
}

impl AppState {
    pub fn new(catalog: Arc<dyn CatalogService>, default_token: Option<String>) -> Self {
        Self {
            catalog,
            default_token,
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/ping", get(ping))
        .route("/api/ai/generate-fields", post(generate_fields))
        .route("/api/ai/generate-seo", post(generate_seo))
        .route("/api/ai/suggest-category", post(suggest_category))
        .route("/api/ai/format-text", post(format_text))
        .route("/api/create-product", post(create_product))
        .with_state(state)
}

async fn ping() -> &'static str {
    "PONG"
}

#[instrument(skip_all)]
async fn generate_fields(
    payload: Result<Json<NameRequest>, JsonRejection>,
) -> Result<Json<GeneratedFields>, ApiError> {
    let Json(req) = payload?;
    let name = require_name(
        req.name.as_deref(),
        "Название товара должно содержать минимум 2 символа",
    )?;
    let fields = assist::generate_fields(name, chrono::Utc::now(), &mut rand::thread_rng());
    info!(code = %fields.code, "generated fields");
    Ok(Json(fields))
}

#[instrument(skip_all)]
async fn generate_seo(
    payload: Result<Json<SeoRequest>, JsonRejection>,
) -> Result<Json<SeoCopy>, ApiError> {
    let Json(req) = payload?;
    let name = require_name(req.name.as_deref(), "Название товара обязательно")?;
    Ok(Json(assist::generate_seo(name, req.description.as_deref())))
}

#[instrument(skip_all)]
async fn suggest_category(
    payload: Result<Json<NameRequest>, JsonRejection>,
) -> Result<Json<CategorySuggestion>, ApiError> {
    let Json(req) = payload?;
    let name = require_name(req.name.as_deref(), "Название товара обязательно")?;
    let suggestion = assist::suggest_category(name);
    info!(category = suggestion.category_name, "suggested category");
    Ok(Json(suggestion))
}

#[instrument(skip_all)]
async fn format_text(
    payload: Result<Json<FormatRequest>, JsonRejection>,
) -> Result<Json<FormattedText>, ApiError> {
    let Json(req) = payload?;
    let text = match req.text.as_deref() {
        Some(t) if t.chars().count() >= MIN_INPUT_CHARS => t,
        _ => {
            return Err(ApiError::validation(
                "Текст должен содержать минимум 2 символа",
            ))
        }
    };
    Ok(Json(FormattedText {
        formatted_text: assist::format_text(text),
    }))
}

#[derive(Debug, Default, Deserialize)]
pub struct TokenQuery {
    pub token: Option<String>,
}

#[instrument(skip_all)]
async fn create_product(
    State(state): State<AppState>,
    query: Result<Query<TokenQuery>, QueryRejection>,
    payload: Result<Json<ProductDraft>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Query(query) = query?;
    let Json(draft) = payload?;
    let item = draft.to_item()?;

    let token = draft
        .token()
        .map(str::to_owned)
        .or_else(|| {
            query
                .token
                .map(|t| t.trim().to_owned())
                .filter(|t| !t.is_empty())
        })
        .or_else(|| state.default_token.clone())
        .ok_or_else(|| ApiError::validation("Токен не предоставлен"))?;

    info!(name = %item.name, code = %item.code, "submitting product");
    let reply = state
        .catalog
        .create_nomenclature(&token, std::slice::from_ref(&item))
        .await
        .map_err(|err| ApiError::internal(INTERNAL_ERROR, err))?;

    let status = StatusCode::from_u16(reply.status)
        .map_err(|err| ApiError::internal(INTERNAL_ERROR, err))?;
    if !reply.is_success() {
        return Err(ApiError::Upstream {
            status,
            body: reply.body,
        });
    }

    let body: Value = if reply.body.trim().is_empty() {
        Value::Null
    } else {
        serde_json::from_str(&reply.body).map_err(|err| ApiError::internal(INTERNAL_ERROR, err))?
    };
    info!(status = reply.status, "product created");
    Ok((status, Json(body)).into_response())
}
