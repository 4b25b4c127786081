use axum::extract::{Query, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};

use crate::error::ServerError;
use crate::state::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/v1/records", post(record))
        .route("/v1/similar", get(similar))
        .with_state(state)
}

async fn health() -> &'static str {
    "ok"
}

#[derive(Debug, Deserialize)]
struct RecordRequest {
    scope: String,
    key: String,
    text: String,
}

#[derive(Debug, Serialize)]
struct RecordResponse {
    recorded: bool,
}

async fn record(
    State(state): State<AppState>,
    Json(request): Json<RecordRequest>,
) -> Result<Json<RecordResponse>, ServerError> {
    if request.scope.trim().is_empty() || request.key.trim().is_empty() {
        return Err(ServerError::BadRequest(
            "scope and key must not be empty".to_string(),
        ));
    }
    state.manager.record(&request.scope, &request.key, &request.text)?;
    Ok(Json(RecordResponse { recorded: true }))
}

#[derive(Debug, Deserialize)]
struct SimilarQuery {
    scope: String,
    key: String,
}

#[derive(Debug, Serialize)]
struct SimilarHit {
    key: String,
    score: f64,
}

async fn similar(
    State(state): State<AppState>,
    Query(query): Query<SimilarQuery>,
) -> Result<Json<Vec<SimilarHit>>, ServerError> {
    let hits = state
        .manager
        .get_similar(&query.scope, &query.key)?
        .into_iter()
        .map(|(key, score)| SimilarHit { key, score })
        .collect();
    Ok(Json(hits))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use kv::{InMemoryBackend, KvCluster};
    use manager::FeatureManager;
    use minhash::{MinHashConfig, MinHashFeature};
    use std::sync::Arc;
    use tokenize::WhitespaceTokenizer;
    use tower::ServiceExt;

    fn test_state() -> AppState {
        let cluster = Arc::new(KvCluster::single(InMemoryBackend::new()));
        let feature = MinHashFeature::new(
            "message",
            MinHashConfig::default().with_rows(1024).with_permutations(8).with_bands(4),
            WhitespaceTokenizer,
            cluster,
        )
        .unwrap();
        let manager = FeatureManager::builder().with_feature("message", 1.0, feature).build();
        AppState::new(manager)
    }

    #[tokio::test]
    async fn health_returns_ok() {
        let app = router(test_state());
        let response = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn record_then_similar_round_trips() {
        let app = router(test_state());
        let body = serde_json::to_vec(&serde_json::json!({
            "scope": "s",
            "key": "a",
            "text": "the quick brown fox",
        }))
        .unwrap();
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/v1/records")
                    .header("content-type", "application/json")
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/v1/similar?scope=s&key=a")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn record_rejects_empty_key() {
        let app = router(test_state());
        let body = serde_json::to_vec(&serde_json::json!({
            "scope": "s",
            "key": "",
            "text": "text",
        }))
        .unwrap();
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/v1/records")
                    .header("content-type", "application/json")
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
