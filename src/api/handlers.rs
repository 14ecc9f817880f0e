//! HTTP request handlers

use super::types::{
    AlertsQuery, AlertsResponse, AssistantQueryRequest, AssistantQueryResponse, ChatTextResponse,
    ErrorResponse, HealthResponse, IntensityQuery, InterpretRequest, NewSessionResponse,
    PlanQuery, ReadingRequest, ReadingResponse, SynthesizeRequest, TripRequest,
};
use super::AppState;
use crate::climate::ImpactSummary;
use crate::intensity::{IntensityReading, StoreError};
use crate::transit::{self, RouteOption, RoutePriority, StationAccessibility};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};

/// Create the API router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // The assistant turn endpoint
        .route("/api/assistant/query", post(assistant_query))
        .route("/api/assistant/session", post(new_session))
        // Climate impact
        .route("/api/calculate-impact", post(calculate_impact))
        // Carbon intensity
        .route("/api/climate/lowest-intensity", get(lowest_intensity))
        .route("/api/climate/reading", post(insert_reading))
        // Route planning
        .route("/api/route/plan", post(plan_route))
        // Accessibility
        .route("/api/station/:id/accessibility", get(station_accessibility))
        .route("/api/alerts", get(accessibility_alerts))
        // Text polish
        .route("/api/chat/synthesize", post(synthesize))
        .route("/api/chat/interpret", post(interpret))
        // Probes
        .route("/health", get(health))
        .route("/version", get(version))
        .with_state(state)
}

// ============================================================
// Assistant
// ============================================================

async fn assistant_query(
    State(state): State<AppState>,
    Json(req): Json<AssistantQueryRequest>,
) -> Result<Json<AssistantQueryResponse>, AppError> {
    let output = state
        .sessions
        .dispatch(req.session_key.as_deref(), req.utterance)
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?;

    Ok(Json(AssistantQueryResponse {
        response: output.response,
        data: output.data,
    }))
}

async fn new_session() -> Json<NewSessionResponse> {
    Json(NewSessionResponse {
        session_key: uuid::Uuid::new_v4().to_string(),
    })
}

// ============================================================
// Climate impact
// ============================================================

async fn calculate_impact(
    State(state): State<AppState>,
    Json(trip): Json<TripRequest>,
) -> Result<Json<ImpactSummary>, AppError> {
    let summary = state
        .climate
        .calculate_savings(trip.distance_km, &trip.mode)
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    Ok(Json(summary))
}

// ============================================================
// Carbon intensity
// ============================================================

async fn lowest_intensity(
    State(state): State<AppState>,
    Query(query): Query<IntensityQuery>,
) -> Result<Json<Vec<IntensityReading>>, AppError> {
    let limit = query.limit.unwrap_or(5);
    let rows = state
        .intensity
        .lowest_intensity(&query.location, limit)
        .map_err(|e| match e {
            StoreError::InvalidLimit(_) => AppError::BadRequest(e.to_string()),
            StoreError::Sqlite(_) => AppError::Internal(e.to_string()),
        })?;

    Ok(Json(rows))
}

async fn insert_reading(
    State(state): State<AppState>,
    Json(req): Json<ReadingRequest>,
) -> Result<Json<ReadingResponse>, AppError> {
    state
        .intensity
        .insert_reading(&req.location, req.gco2_per_kwh, req.ts_utc)
        .map_err(|e| AppError::Internal(e.to_string()))?;

    Ok(Json(ReadingResponse { inserted: true }))
}

// ============================================================
// Route planning
// ============================================================

async fn plan_route(Query(query): Query<PlanQuery>) -> Json<Vec<RouteOption>> {
    let priority = RoutePriority::parse(query.priority.as_deref());
    Json(transit::plan_route(&query.origin, &query.destination, priority))
}

// ============================================================
// Accessibility
// ============================================================

async fn station_accessibility(Path(id): Path<String>) -> Json<StationAccessibility> {
    Json(transit::station_accessibility(&id))
}

async fn accessibility_alerts(Query(query): Query<AlertsQuery>) -> Json<AlertsResponse> {
    let alerts = transit::alerts(query.station_id.as_deref());
    let total_alerts = alerts.len();
    Json(AlertsResponse {
        alerts,
        total_alerts,
    })
}

// ============================================================
// Text polish
// ============================================================

async fn synthesize(
    State(state): State<AppState>,
    Json(req): Json<SynthesizeRequest>,
) -> Json<ChatTextResponse> {
    let text = state
        .chat
        .synthesize(&req.transit, &req.climate, &req.vision)
        .await;
    Json(ChatTextResponse { text })
}

async fn interpret(
    State(state): State<AppState>,
    Json(req): Json<InterpretRequest>,
) -> Json<ChatTextResponse> {
    let text = state.chat.interpret_destination(&req.text).await;
    Json(ChatTextResponse { text })
}

// ============================================================
// Probes
// ============================================================

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

async fn version() -> &'static str {
    concat!("greenroute ", env!("CARGO_PKG_VERSION"))
}

// ============================================================
// Error Handling
// ============================================================

enum AppError {
    BadRequest(String),
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        let body = Json(ErrorResponse::new(message));
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::ChatService;
    use crate::intensity::IntensityStore;
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    fn test_app() -> Router {
        let intensity = IntensityStore::open_in_memory().unwrap();
        let chat = ChatService::new(None);
        create_router(AppState::new(intensity, chat))
    }

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn assistant_turn_round_trips() {
        let app = test_app();
        let response = app
            .oneshot(post_json(
                "/api/assistant/query",
                serde_json::json!({
                    "session_key": "t1",
                    "utterance": "from union station to cn tower"
                }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["data"]["state"], "awaiting_transport");
        assert_eq!(json["data"]["origin"], "union station");
        assert_eq!(json["data"]["destination"], "cn tower");
    }

    #[tokio::test]
    async fn negative_distance_is_rejected() {
        let app = test_app();
        let response = app
            .oneshot(post_json(
                "/api/calculate-impact",
                serde_json::json!({ "distance_km": -2.0, "mode": "bus" }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert!(json["error"].as_str().unwrap().contains("negative"));
    }

    #[tokio::test]
    async fn impact_calculation_returns_summary() {
        let app = test_app();
        let response = app
            .oneshot(post_json(
                "/api/calculate-impact",
                serde_json::json!({ "distance_km": 5.0, "mode": "bus" }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["points_earned"], 41);
    }

    #[tokio::test]
    async fn intensity_limit_is_validated() {
        let app = test_app();
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/climate/lowest-intensity?location=toronto&limit=99")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn reading_insert_then_query() {
        let app = test_app();

        let response = app
            .clone()
            .oneshot(post_json(
                "/api/climate/reading",
                serde_json::json!({ "location": "toronto", "gco2_per_kwh": 42.0 }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/climate/lowest-intensity?location=toronto")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json.as_array().unwrap().len(), 1);
        assert_eq!(json[0]["gco2_per_kwh"], 42.0);
    }

    #[tokio::test]
    async fn alerts_report_their_count() {
        let app = test_app();
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/alerts")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        let json = body_json(response).await;
        assert_eq!(json["total_alerts"], 1);
    }

    #[tokio::test]
    async fn interpret_endpoint_uses_offline_fallback() {
        let app = test_app();
        let response = app
            .oneshot(post_json(
                "/api/chat/interpret",
                serde_json::json!({ "text": "um... metrotown" }),
            ))
            .await
            .unwrap();

        let json = body_json(response).await;
        assert_eq!(json["text"], "Metrotown");
    }
}
