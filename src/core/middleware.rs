use crate::core::error::AppError;
use crate::features::auth::services::TokenService;
use axum::{
    body::Body,
    extract::{Request, State},
    http::{header, HeaderValue, StatusCode},
    middleware::Next,
    response::Response,
};
use base64::prelude::*;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::request_id::{MakeRequestId, RequestId};
use tracing::Span;
use uuid::Uuid;

/// Request ID generator using UUID v7 (time-ordered)
#[derive(Clone, Copy)]
pub struct MakeRequestUuid;

impl MakeRequestId for MakeRequestUuid {
    fn make_request_id<B>(&mut self, _request: &axum::http::Request<B>) -> Option<RequestId> {
        let id = Uuid::now_v7().to_string();
        Some(RequestId::new(HeaderValue::from_str(&id).unwrap()))
    }
}

/// Custom MakeSpan that includes request_id in the tracing span
#[derive(Clone, Debug)]
pub struct MakeSpanWithRequestId;

impl<B> tower_http::trace::MakeSpan<B> for MakeSpanWithRequestId {
    fn make_span(&mut self, request: &axum::http::Request<B>) -> Span {
        let request_id = request
            .headers()
            .get("x-request-id")
            .and_then(|v| v.to_str().ok())
            .unwrap_or("-");

        tracing::info_span!(
            "request",
            method = %request.method(),
            uri = %request.uri(),
            request_id = %request_id,
        )
    }
}

pub fn cors_layer(allowed_origins: Vec<String>) -> CorsLayer {
    let cors = CorsLayer::new().allow_methods(Any).allow_headers(Any);

    if allowed_origins.iter().any(|o| o == "*") {
        cors.allow_origin(Any)
    } else {
        let origins: Vec<HeaderValue> = allowed_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        cors.allow_origin(AllowOrigin::list(origins))
    }
}

pub fn basic_auth_middleware(
    valid_credentials: Arc<String>,
) -> impl Fn(
    Request,
    Next,
)
    -> std::pin::Pin<Box<dyn std::future::Future<Output = Result<Response, Response>> + Send>>
       + Clone {
    move |req: Request, next: Next| {
        let credentials = valid_credentials.clone();
        Box::pin(async move {
            let auth_header = req
                .headers()
                .get(header::AUTHORIZATION)
                .and_then(|header| header.to_str().ok());

            if let Some(auth_header) = auth_header {
                if let Some(encoded) = auth_header.strip_prefix("Basic ") {
                    if let Ok(decoded) = BASE64_STANDARD.decode(encoded) {
                        if let Ok(creds) = String::from_utf8(decoded) {
                            if creds == *credentials {
                                return Ok(next.run(req).await);
                            }
                        }
                    }
                }
            }

            let response = Response::builder()
                .status(StatusCode::UNAUTHORIZED)
                .header(header::WWW_AUTHENTICATE, "Basic realm=\"Swagger UI\"")
                .body(Body::from("Unauthorized"))
                .unwrap();

            Err(response)
        })
    }
}

/// Bearer-token middleware for protected routes. Validates the access token
/// and inserts the authenticated user into request extensions.
pub async fn auth_middleware(
    State(tokens): State<Arc<TokenService>>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let auth_header = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| AppError::Unauthorized("Missing authorization header".to_string()))?;

    let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
        AppError::Unauthorized("Invalid authorization header format".to_string())
    })?;

    let user = tokens.validate_token(token)?;

    req.extensions_mut().insert(user);
    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::AuthConfig;
    use crate::features::auth::models::AuthenticatedUser;
    use axum::body::Bytes;
    use axum::extract::DefaultBodyLimit;
    use axum::routing::{get, post};
    use axum::Router;
    use axum_test::TestServer;

    fn token_service() -> Arc<TokenService> {
        Arc::new(TokenService::new(AuthConfig {
            jwt_secret: "middleware-test-secret-0123456789".to_string(),
            token_ttl_secs: 3600,
        }))
    }

    fn protected_app(tokens: Arc<TokenService>) -> Router {
        async fn whoami(user: AuthenticatedUser) -> String {
            user.id.to_string()
        }

        Router::new()
            .route("/whoami", get(whoami))
            .route_layer(axum::middleware::from_fn_with_state(tokens, auth_middleware))
    }

    #[tokio::test]
    async fn request_without_token_is_unauthorized() {
        let server = TestServer::new(protected_app(token_service())).unwrap();

        let response = server.get("/whoami").await;
        assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn request_with_garbage_token_is_unauthorized() {
        let server = TestServer::new(protected_app(token_service())).unwrap();

        let response = server
            .get("/whoami")
            .authorization_bearer("not.a.token")
            .await;
        assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn valid_bearer_token_reaches_the_handler() {
        let tokens = token_service();
        let token = tokens.issue_token(42).unwrap();
        let server = TestServer::new(protected_app(tokens)).unwrap();

        let response = server.get("/whoami").authorization_bearer(&token).await;
        assert_eq!(response.status_code(), StatusCode::OK);
        assert_eq!(response.text(), "42");
    }

    #[tokio::test]
    async fn global_body_limit_rejects_oversized_bodies() {
        async fn sink(_body: Bytes) -> StatusCode {
            StatusCode::OK
        }

        let app = Router::new()
            .route("/sink", post(sink))
            .layer(DefaultBodyLimit::max(16));
        let server = TestServer::new(app).unwrap();

        let ok = server.post("/sink").bytes(Bytes::from(vec![0u8; 16])).await;
        assert_eq!(ok.status_code(), StatusCode::OK);

        let too_big = server.post("/sink").bytes(Bytes::from(vec![0u8; 17])).await;
        assert_eq!(too_big.status_code(), StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[tokio::test]
    async fn route_local_body_limit_overrides_the_global_one() {
        async fn sink(_body: Bytes) -> StatusCode {
            StatusCode::OK
        }

        // Same shape as the app router: the uploads router carries its own
        // larger limit inside the globally capped tree.
        let uploads = Router::new()
            .route("/uploads", post(sink))
            .layer(DefaultBodyLimit::max(1024));
        let app = Router::new()
            .route("/small", post(sink))
            .merge(uploads)
            .layer(DefaultBodyLimit::max(16));
        let server = TestServer::new(app).unwrap();

        let big = Bytes::from(vec![0u8; 512]);
        let through = server.post("/uploads").bytes(big.clone()).await;
        assert_eq!(through.status_code(), StatusCode::OK);

        let capped = server.post("/small").bytes(big).await;
        assert_eq!(capped.status_code(), StatusCode::PAYLOAD_TOO_LARGE);
    }
}
