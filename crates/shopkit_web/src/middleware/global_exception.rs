//! Uniform problem-details bodies for client errors, timeouts and panics.

use std::any::Any;

use axum::extract::Request;
use axum::http::header::{CONTENT_LENGTH, CONTENT_TYPE};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use tracing::{error, warn};

use crate::problem::ProblemDetails;

/// Replace the body of 429, 400, 401, 403 and 408 responses with the
/// canonical problem-details body. Other responses pass through.
///
/// Headers set downstream are kept, apart from the body's own type and length.
pub async fn global_exception_middleware(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_owned();

    let response = next.run(request).await;
    let status = response.status();
    let Some(problem) = ProblemDetails::for_rewritten_status(status) else {
        return response;
    };

    warn!(%method, path, status = status.as_u16(), title = %problem.title, "Request failed");

    let (mut parts, _) = response.into_parts();
    parts.headers.remove(CONTENT_LENGTH);
    parts.headers.remove(CONTENT_TYPE);

    let (problem_parts, body) = problem.into_response().into_parts();
    if let Some(content_type) = problem_parts.headers.get(CONTENT_TYPE) {
        parts.headers.insert(CONTENT_TYPE, content_type.clone());
    }
    Response::from_parts(parts, body)
}

/// Turn a handler panic into the generic 500 problem body.
///
/// Used with `tower_http::catch_panic::CatchPanicLayer::custom`.
pub fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(msg) = err.downcast_ref::<String>() {
        msg.as_str()
    } else if let Some(msg) = err.downcast_ref::<&str>() {
        msg
    } else {
        "unknown panic payload"
    };
    error!(panic = detail, "Handler panicked");

    ProblemDetails::internal().into_response()
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::header::SET_COOKIE;
    use axum::http::{HeaderValue, StatusCode};
    use axum::response::AppendHeaders;
    use axum::routing::get;
    use axum::{Router, middleware};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    use super::*;

    fn app() -> Router {
        Router::new()
            .route("/ok", get(|| async { "fine" }))
            .route(
                "/limited",
                get(|| async {
                    (
                        StatusCode::TOO_MANY_REQUESTS,
                        [("retry-after", HeaderValue::from_static("10"))],
                        "slow down",
                    )
                }),
            )
            .route(
                "/unauthorized",
                get(|| async {
                    (
                        StatusCode::UNAUTHORIZED,
                        AppendHeaders([
                            (SET_COOKIE, "session=; Max-Age=0"),
                            (SET_COOKIE, "refresh=; Max-Age=0"),
                        ]),
                        "who are you",
                    )
                }),
            )
            .route("/forbidden", get(|| async { StatusCode::FORBIDDEN }))
            .route("/missing", get(|| async { (StatusCode::NOT_FOUND, "no such product") }))
            .layer(middleware::from_fn(global_exception_middleware))
    }

    async fn call(path: &str) -> (StatusCode, Response) {
        let response = app()
            .oneshot(Request::builder().uri(path).body(Body::empty()).unwrap())
            .await
            .unwrap();
        (response.status(), response)
    }

    #[tokio::test]
    async fn test_listed_status_gets_problem_body_and_keeps_headers() {
        let (status, response) = call("/limited").await;
        assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(response.headers()["retry-after"], "10");
        assert_eq!(response.headers()[CONTENT_TYPE], "application/json");

        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let problem: ProblemDetails = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(problem.title, "Error: Too Many Requests");
        assert_eq!(problem.status, 429);
    }

    #[tokio::test]
    async fn test_rewrite_keeps_every_value_of_repeated_headers() {
        let (status, response) = call("/unauthorized").await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        let l_cookies: Vec<_> = response
            .headers()
            .get_all(SET_COOKIE)
            .iter()
            .map(|val| val.to_str().unwrap().to_owned())
            .collect();
        assert_eq!(l_cookies, ["session=; Max-Age=0", "refresh=; Max-Age=0"]);
        assert_eq!(response.headers().get_all(CONTENT_TYPE).iter().count(), 1);

        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let problem: ProblemDetails = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(problem.title, "Error: Unauthorized");
    }

    #[tokio::test]
    async fn test_forbidden_gets_problem_body() {
        let (_, response) = call("/forbidden").await;
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let problem: ProblemDetails = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(problem.detail, "You are not allowed to perform this action");
    }

    #[tokio::test]
    async fn test_other_statuses_pass_through() {
        let (status, response) = call("/ok").await;
        assert_eq!(status, StatusCode::OK);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&bytes[..], b"fine");

        let (status, response) = call("/missing").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&bytes[..], b"no such product");
    }

    #[tokio::test]
    async fn test_handle_panic_returns_generic_500() {
        let response = handle_panic(Box::new("boom"));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let problem: ProblemDetails = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(problem, ProblemDetails::internal());
    }
}
