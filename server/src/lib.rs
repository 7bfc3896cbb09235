use anyhow::Result;
use axum::{extract::{Path, Query, State}, http::StatusCode, routing::{get, post}, Json, Router};
use search_core::config::{DEFAULT_RANKED_K, MAX_K};
use search_core::persist::{load_all, IndexPaths};
use search_core::tokenizer::normalize;
use search_core::{Criterion, DocId, DocStore, QueryOptions, SearchEngine};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tower_http::cors::{Any, CorsLayer, AllowOrigin};
use tower_http::trace::TraceLayer;

#[derive(Deserialize)]
pub struct AndParams {
    pub q: String,
}

#[derive(Deserialize)]
pub struct RankedParams {
    pub q: String,
    #[serde(default = "default_k")]
    pub k: usize,
}
fn default_k() -> usize { DEFAULT_RANKED_K }

#[derive(Deserialize)]
pub struct RefineRequest {
    pub q: String,
    /// `field:value` strings, validated before any scoring happens
    #[serde(default)]
    pub criteria: Vec<String>,
}

#[derive(Serialize)]
pub struct SearchResponse {
    pub query: String,
    pub took_s: f64,
    pub total_hits: usize,
    pub results: Vec<SearchHit>,
}

#[derive(Serialize)]
pub struct SearchHit {
    pub doc_id: DocId,
    pub score: Option<f64>,
    pub title: String,
    pub url: Option<String>,
    pub snippet: Option<String>,
}

#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<SearchEngine>,
    pub docs: Arc<DocStore>,
}

/// Load the index and build the router. Missing artifacts fail here, before the server binds.
pub fn build_app(index_dir: String, options: QueryOptions) -> Result<Router> {
    let (artifacts, docs, meta) = load_all(&IndexPaths::new(&index_dir))?;
    let engine = SearchEngine::new(artifacts, options);
    tracing::info!(index_dir = %index_dir, num_docs = engine.num_docs(), num_terms = meta.num_terms, "index loaded");
    let app_state = AppState { engine: Arc::new(engine), docs: Arc::new(docs) };

    // CORS: read CORS_ALLOW_ORIGIN (comma-separated) or allow Any by default
    let cors = match std::env::var("CORS_ALLOW_ORIGIN") {
        Ok(val) => {
            let origins: Vec<_> = val
                .split(',')
                .filter_map(|s| s.trim().parse().ok())
                .collect();
            if origins.is_empty() {
                CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any)
            } else {
                CorsLayer::new().allow_origin(AllowOrigin::list(origins)).allow_methods(Any).allow_headers(Any)
            }
        }
        Err(_) => CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any),
    };

    let app = Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/search/and", get(search_and_handler))
        .route("/search/ranked", get(search_ranked_handler))
        .route("/search/refined", post(search_refined_handler))
        .route("/doc/:doc_id", get(doc_handler))
        .with_state(app_state)
        .layer(cors)
        .layer(TraceLayer::new_for_http());
    Ok(app)
}

pub async fn search_and_handler(State(state): State<AppState>, Query(params): Query<AndParams>) -> Json<SearchResponse> {
    let start = Instant::now();
    let hits = state.engine.search_and(&normalize(&params.q));
    let total_hits = hits.len();
    let results = build_hits(&state.docs, &params.q, hits.into_iter().map(|d| (d, None)));
    Json(SearchResponse { query: params.q, took_s: start.elapsed().as_secs_f64(), total_hits, results })
}

pub async fn search_ranked_handler(State(state): State<AppState>, Query(params): Query<RankedParams>) -> Json<SearchResponse> {
    let start = Instant::now();
    let k = params.k.clamp(1, MAX_K);
    let hits = state.engine.search_ranked(&normalize(&params.q), k);
    let total_hits = hits.len();
    let results = build_hits(&state.docs, &params.q, hits.into_iter().map(|(d, s)| (d, Some(s))));
    Json(SearchResponse { query: params.q, took_s: start.elapsed().as_secs_f64(), total_hits, results })
}

pub async fn search_refined_handler(
    State(state): State<AppState>,
    Json(req): Json<RefineRequest>,
) -> Result<Json<SearchResponse>, (StatusCode, String)> {
    let start = Instant::now();
    let criteria = req
        .criteria
        .iter()
        .map(|c| Criterion::parse(c))
        .collect::<search_core::Result<Vec<_>>>()
        .map_err(|e| (StatusCode::BAD_REQUEST, e.to_string()))?;
    let hits = state.engine.search_refined(&normalize(&req.q), &criteria, state.docs.as_ref());
    let total_hits = hits.len();
    let results = build_hits(&state.docs, &req.q, hits.into_iter().map(|(d, s)| (d, Some(s))));
    Ok(Json(SearchResponse { query: req.q, took_s: start.elapsed().as_secs_f64(), total_hits, results }))
}

pub async fn doc_handler(State(state): State<AppState>, Path(doc_id): Path<DocId>) -> Result<Json<serde_json::Value>, StatusCode> {
    let book = state.docs.get(doc_id).ok_or(StatusCode::NOT_FOUND)?;
    let mut obj = serde_json::to_value(book).map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;
    obj["doc_id"] = serde_json::Value::from(doc_id);
    Ok(Json(obj))
}

fn build_hits<I>(docs: &DocStore, raw_query: &str, hits: I) -> Vec<SearchHit>
where
    I: IntoIterator<Item = (DocId, Option<f64>)>,
{
    // Capture raw query terms for highlighting
    let raw_terms: Vec<String> = raw_query.split_whitespace().map(|s| s.to_string()).collect();
    hits.into_iter()
        .filter_map(|(doc_id, score)| {
            let book = docs.get(doc_id)?;
            Some(SearchHit {
                doc_id,
                score,
                title: book.title.clone(),
                url: book.url.clone(),
                snippet: snippet(&book.plot, &raw_terms),
            })
        })
        .collect()
}

fn snippet(text: &str, raw_terms: &[String]) -> Option<String> {
    if text.is_empty() { return None; }
    // find first match (case-insensitive) of any raw term
    let first_idx = raw_terms
        .iter()
        .filter(|t| !t.trim().is_empty())
        .find_map(|t| find_case_insensitive(text, t));
    let snippet = match first_idx {
        Some(idx) => {
            let start = floor_boundary(text, idx.saturating_sub(100));
            let end = floor_boundary(text, (idx + 200).min(text.len()));
            text[start..end].to_string()
        }
        None => text.chars().take(200).collect(),
    };
    Some(highlight_terms(&snippet, raw_terms))
}

/// Byte offset of `needle` in `haystack`, ignoring case. Only offsets that are valid in
/// the input text are returned.
fn find_case_insensitive(haystack: &str, needle: &str) -> Option<usize> {
    let h = haystack.to_lowercase();
    if h.len() != haystack.len() { return None; }
    h.find(&needle.to_lowercase())
}

fn floor_boundary(text: &str, mut idx: usize) -> usize {
    while !text.is_char_boundary(idx) { idx -= 1; }
    idx
}

fn highlight_terms(snippet: &str, terms: &[String]) -> String {
    let mut s = snippet.to_string();
    for t in terms {
        if t.trim().is_empty() { continue; }
        let Ok(pat) = regex::RegexBuilder::new(&regex::escape(t)).case_insensitive(true).build() else { continue };
        s = pat.replace_all(&s, |caps: &regex::Captures| format!("<em>{}</em>", &caps[0])).to_string();
    }
    s
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snippet_highlights_query_terms() {
        let s = snippet("A young Dragon searches for a hidden valley.", &["dragon".to_string()]).unwrap();
        assert_eq!(s, "A young <em>Dragon</em> searches for a hidden valley.");
    }

    #[test]
    fn snippet_never_splits_characters() {
        let text = format!("{}dragon", "é".repeat(150));
        let s = snippet(&text, &["dragon".to_string()]).unwrap();
        assert!(s.ends_with("<em>dragon</em>"));
    }
}
