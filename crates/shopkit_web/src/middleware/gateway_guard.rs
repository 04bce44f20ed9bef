//! Gateway-only access guard.

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use tracing::warn;

use crate::config::GatewayConfig;
use crate::problem::ProblemDetails;

/// Reject requests that do not carry the gateway header with 503.
///
/// Only presence is checked; the header value is not inspected.
pub async fn gateway_guard_middleware(
    State(config): State<GatewayConfig>,
    request: Request,
    next: Next,
) -> Response {
    if request.headers().contains_key(&config.header_name) {
        return next.run(request).await;
    }

    warn!(
        header = %config.header_name,
        path = request.uri().path(),
        "Rejected request not forwarded by the API gateway"
    );
    ProblemDetails::gateway_rejected().into_response()
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{HeaderName, StatusCode};
    use axum::routing::get;
    use axum::{Router, middleware};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    use super::*;

    fn app() -> Router {
        let config = GatewayConfig {
            header_name: HeaderName::from_static("api-gateway"),
            enabled: true,
        };
        Router::new()
            .route("/products", get(|| async { "catalog" }))
            .layer(middleware::from_fn_with_state(config, gateway_guard_middleware))
    }

    #[tokio::test]
    async fn test_request_with_header_passes() {
        let response = app()
            .oneshot(
                Request::builder()
                    .uri("/products")
                    .header("Api-Gateway", "signed")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_request_without_header_is_rejected() {
        let response = app()
            .oneshot(Request::builder().uri("/products").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let problem: ProblemDetails = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(problem, ProblemDetails::gateway_rejected());
    }
}
