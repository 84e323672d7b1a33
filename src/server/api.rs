use crate::config::ConfigError;
use crate::gateway::{ ChatGateway, GatewayError };
use crate::models::chat::{ ChatRequest, ErrorBody };
use std::sync::Arc;
use axum::{
    routing::{ get, post },
    Router,
    Json,
    extract::{ State, Query, rejection::JsonRejection },
    response::{ IntoResponse, Response },
    http::{ HeaderValue, StatusCode },
};
use serde::{ Deserialize, Serialize };
use tower_http::cors::{ AllowOrigin, Any, CorsLayer };
use log::{ info, warn, error };

const DEFAULT_SIMPLIFIED_MESSAGE: &str = "Hello";

#[derive(Clone)]
pub struct AppState {
    pub gateway: Arc<ChatGateway>,
    pub service_name: String,
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    message: String,
    client_status: &'static str,
}

#[derive(Serialize)]
struct AuthCheckResponse {
    status: &'static str,
    message: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    test_response: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

#[derive(Deserialize)]
pub struct SimplifiedChatQuery {
    pub message: Option<String>,
}

#[derive(Serialize)]
struct SimplifiedChatResponse {
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    response: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
}

/// "*" anywhere in the list opens CORS to every origin, method and header.
pub fn cors_layer(origins: &[String]) -> Result<CorsLayer, ConfigError> {
    let origins: Vec<&str> = origins
        .iter()
        .map(|o| o.trim())
        .filter(|o| !o.is_empty())
        .collect();

    if origins.is_empty() || origins.contains(&"*") {
        warn!("CORS is open to any origin");
        return Ok(CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any));
    }

    let values = origins
        .iter()
        .map(|o| HeaderValue::from_str(o).map_err(|_| ConfigError::InvalidOrigin(o.to_string())))
        .collect::<Result<Vec<_>, _>>()?;
    info!("CORS allowed origins: {:?}", origins);

    Ok(
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(values))
            .allow_methods(Any)
            .allow_headers(Any)
    )
}

pub fn router(state: AppState, cors: CorsLayer) -> Router {
    Router::new()
        .route("/", get(health_handler))
        .route("/api/chat", post(chat_handler))
        .route("/test-auth", get(test_auth_handler))
        .route("/simplified-chat", get(simplified_chat_handler))
        .layer(cors)
        .with_state(state)
}

fn error_response(code: StatusCode, detail: String) -> Response {
    (code, Json(ErrorBody { detail })).into_response()
}

async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    let client_status = state.gateway.client_status();
    info!("Health check called. Client status: {}", client_status);
    Json(HealthResponse {
        status: "ok",
        message: format!("{} is running", state.service_name),
        client_status,
    })
}

async fn chat_handler(
    State(state): State<AppState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Response {
    let Json(request) = match payload {
        Ok(payload) => payload,
        Err(rejection) => {
            warn!("Rejected chat request: {}", rejection.body_text());
            return error_response(StatusCode::BAD_REQUEST, rejection.body_text());
        }
    };

    match state.gateway.handle(request).await {
        Ok(reply) => (StatusCode::OK, Json(reply)).into_response(),
        Err(e @ GatewayError::InvalidRequest(_)) => {
            warn!("{}", e);
            error_response(StatusCode::BAD_REQUEST, e.to_string())
        }
        Err(e) => {
            error!("Chat request failed under strict error policy: {}", e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        }
    }
}

async fn test_auth_handler(State(state): State<AppState>) -> impl IntoResponse {
    let body = match state.gateway.test_auth().await {
        Ok(text) => AuthCheckResponse {
            status: "success",
            message: "Authentication successful",
            test_response: Some(text),
            error: None,
        },
        Err(e @ GatewayError::Unavailable(_)) => AuthCheckResponse {
            status: "error",
            message: "Chat backend client is not initialized",
            test_response: None,
            error: Some(e.to_string()),
        },
        Err(e) => {
            error!("Auth test failed: {}", e);
            AuthCheckResponse {
                status: "error",
                message: "Authentication test failed",
                test_response: None,
                error: Some(e.to_string()),
            }
        }
    };
    Json(body)
}

async fn simplified_chat_handler(
    State(state): State<AppState>,
    Query(query): Query<SimplifiedChatQuery>,
) -> impl IntoResponse {
    let message = query.message.unwrap_or_else(|| DEFAULT_SIMPLIFIED_MESSAGE.to_string());
    let body = match state.gateway.simplified_chat(&message).await {
        Ok(text) => SimplifiedChatResponse {
            status: "success",
            response: Some(text),
            message: None,
        },
        Err(e) => {
            error!("Error in simplified chat: {}", e);
            SimplifiedChatResponse {
                status: "error",
                response: None,
                message: Some(e.to_string()),
            }
        }
    };
    Json(body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wildcard_and_empty_lists_open_cors() {
        assert!(cors_layer(&["*".to_string()]).is_ok());
        assert!(cors_layer(&[]).is_ok());
        assert!(cors_layer(&["https://a.example".to_string(), "*".to_string()]).is_ok());
    }

    #[test]
    fn explicit_origins_must_be_valid_header_values() {
        assert!(cors_layer(&["https://app.example.com".to_string()]).is_ok());
        let err = cors_layer(&["bad\norigin".to_string()]).err();
        assert!(matches!(err, Some(ConfigError::InvalidOrigin(_))));
    }
}
