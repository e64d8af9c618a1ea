use crate::agent::ChatAgent;
use crate::cli::Args;
use crate::models::chat::ChatRequest;
use std::error::Error;
use std::path::Path;
use std::sync::Arc;
use axum::{
    routing::{get, post},
    Router,
    extract::State,
    response::IntoResponse,
    http::StatusCode,
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::{ServeDir, ServeFile};
use log::{info, warn};

#[derive(Clone)]
pub struct AppState {
    pub agent: Arc<ChatAgent>,
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    timestamp: String,
    service: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ChatStatusResponse {
    gemini_configured: bool,
    api_key_length: usize,
    status: String,
    version: &'static str,
    timestamp: String,
}

#[derive(Deserialize)]
pub struct ReservationRequest {
    pub nombre: Option<String>,
    pub email: Option<String>,
    pub telefono: Option<String>,
    pub fecha: Option<String>,
    pub paquete: Option<String>,
}

#[derive(Serialize)]
struct ReservationEcho {
    nombre: Option<String>,
    fecha: Option<String>,
    paquete: Option<String>,
}

#[derive(Serialize)]
struct ReservationAck {
    success: bool,
    message: String,
    reservacion: ReservationEcho,
}

/// Build the axum router. `static_dir` is the SPA asset root; `None` runs
/// API-only.
pub fn app_router(state: AppState, static_dir: Option<&Path>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let mut app = Router::new()
        .route("/api/chat", post(chat_handler))
        .route("/api/chat-status", get(chat_status_handler))
        .route("/api/health", get(health_handler))
        .route("/api/info", get(info_handler))
        .route("/api/reservacion", post(reservation_handler));

    if let Some(dir) = static_dir {
        let index = dir.join("index.html");
        app = app.fallback_service(ServeDir::new(dir).not_found_service(ServeFile::new(index)));
    }

    app.layer(cors).with_state(state)
}

pub async fn serve(
    addr: &str,
    agent: Arc<ChatAgent>,
    args: &Args,
) -> Result<(), Box<dyn Error + Send + Sync>> {
    let static_root = Path::new(&args.static_dir);
    let static_dir = if static_root.is_dir() {
        Some(static_root)
    } else {
        warn!("Static directory '{}' not found. Serving API only.", args.static_dir);
        None
    };

    let app = app_router(AppState { agent }, static_dir);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("HTTP server listening on: http://{}", addr);
    axum::serve(listener, app.into_make_service()).await?;
    Ok(())
}

/// POST /api/chat — answer a message with provider or local fallback.
///
/// A missing or blank message is the only client error on this route;
/// every provider-side failure still resolves to a 200 with a tagged
/// local reply.
async fn chat_handler(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> impl IntoResponse {
    let message = request.message.as_deref().unwrap_or("");
    if message.trim().is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorBody {
                error: "El mensaje es requerido".to_string(),
            }),
        )
            .into_response();
    }

    let history = request.history.unwrap_or_default();
    let reply = state.agent.respond(message, &history).await;
    Json(reply).into_response()
}

/// GET /api/chat-status — whether a provider credential is configured.
async fn chat_status_handler(State(state): State<AppState>) -> impl IntoResponse {
    let configured = state.agent.gemini_configured();
    Json(ChatStatusResponse {
        gemini_configured: configured,
        api_key_length: state.agent.api_key_len(),
        status: if configured {
            "Gemini AI activo".to_string()
        } else {
            "Usando respuestas locales (configura GEMINI_API_KEY)".to_string()
        },
        version: env!("CARGO_PKG_VERSION"),
        timestamp: Utc::now().to_rfc3339(),
    })
}

/// GET /api/health — liveness probe.
async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok",
        timestamp: Utc::now().to_rfc3339(),
        service: state.agent.persona().venue.nombre.clone(),
    })
}

/// GET /api/info — venue facts from the persona configuration.
async fn info_handler(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.agent.persona().venue.clone())
}

/// POST /api/reservacion — acknowledge a reservation request. Nothing is
/// persisted; staff follow up over WhatsApp.
async fn reservation_handler(Json(request): Json<ReservationRequest>) -> impl IntoResponse {
    info!(
        "Nueva reservación recibida: nombre={:?} email={:?} telefono={:?} fecha={:?} paquete={:?}",
        request.nombre,
        request.email,
        request.telefono,
        request.fecha,
        request.paquete
    );

    Json(ReservationAck {
        success: true,
        message: "Reservación recibida. Te contactaremos pronto.".to_string(),
        reservacion: ReservationEcho {
            nombre: request.nombre,
            fecha: request.fecha,
            paquete: request.paquete,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use clap::Parser;
    use serde_json::Value;
    use tower::ServiceExt;

    fn test_router() -> Router {
        let mut args = Args::parse_from(["vr-concierge"]);
        args.gemini_api_key = None;
        args.chat_base_url = None;
        args.persona_path = None;
        let agent = Arc::new(ChatAgent::new(&args).unwrap());
        app_router(AppState { agent }, None)
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), 64 * 1024).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn health_reports_ok() {
        let response = test_router()
            .oneshot(Request::builder().uri("/api/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = body_json(response).await;
        assert_eq!(json["status"], "ok");
        assert!(json["timestamp"].as_str().is_some());
    }

    #[tokio::test]
    async fn chat_requires_a_message() {
        let response = test_router()
            .oneshot(post_json("/api/chat", serde_json::json!({})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let json = body_json(response).await;
        assert_eq!(json["error"], "El mensaje es requerido");
        assert!(json.get("response").is_none());
    }

    #[tokio::test]
    async fn blank_message_is_rejected() {
        let response = test_router()
            .oneshot(post_json("/api/chat", serde_json::json!({ "message": "   " })))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn chat_answers_locally_without_credential() {
        let response = test_router()
            .oneshot(post_json("/api/chat", serde_json::json!({ "message": "Hola" })))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = body_json(response).await;
        assert_eq!(json["source"], "local");
        assert!(!json["response"].as_str().unwrap().is_empty());
    }

    #[tokio::test]
    async fn chat_rejects_other_methods() {
        let response = test_router()
            .oneshot(Request::builder().uri("/api/chat").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }

    #[tokio::test]
    async fn chat_status_reflects_missing_credential() {
        let response = test_router()
            .oneshot(Request::builder().uri("/api/chat-status").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = body_json(response).await;
        assert_eq!(json["geminiConfigured"], false);
        assert_eq!(json["apiKeyLength"], 0);
        assert!(json["status"].as_str().unwrap().contains("GEMINI_API_KEY"));
    }

    #[tokio::test]
    async fn info_serves_venue_facts() {
        let response = test_router()
            .oneshot(Request::builder().uri("/api/info").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = body_json(response).await;
        assert!(json["nombre"].as_str().is_some());
        assert!(json["horarios"]["lunesViernes"].as_str().is_some());
        assert!(json["servicios"].as_array().is_some());
    }

    #[tokio::test]
    async fn reservation_is_acknowledged() {
        let body = serde_json::json!({
            "nombre": "Ana",
            "fecha": "2026-08-15",
            "paquete": "Pack VIP"
        });
        let response = test_router()
            .oneshot(post_json("/api/reservacion", body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = body_json(response).await;
        assert_eq!(json["success"], true);
        assert_eq!(json["reservacion"]["nombre"], "Ana");
        assert_eq!(json["reservacion"]["paquete"], "Pack VIP");
    }
}
