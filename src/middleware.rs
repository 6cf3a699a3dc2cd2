//! Cross-cutting request middleware.
//!
//! The standard chain wraps every route, static assets included, in a
//! fixed order (outermost to innermost): panic recovery, request logging,
//! security headers, then the router. Each piece is a plain decorator;
//! composition happens once, in [`crate::routes::router`].

use std::any::Any;
use std::net::SocketAddr;

use axum::extract::{ConnectInfo, Request};
use axum::http::{HeaderValue, StatusCode, header};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use tower_http::catch_panic::CatchPanicLayer;

/// Emit one log line per request before delegating onward. Runs for every
/// request, including ones that will later 404 or error.
pub async fn log_request(request: Request, next: Next) -> Response {
    let remote = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.to_string())
        .unwrap_or_else(|| "-".to_string());

    tracing::info!(
        remote = %remote,
        version = ?request.version(),
        method = %request.method(),
        uri = %request.uri(),
        "request"
    );

    next.run(request).await
}

/// Set anti-XSS and anti-framing headers on every response.
pub async fn secure_headers(request: Request, next: Next) -> Response {
    let mut response = next.run(request).await;
    let headers = response.headers_mut();
    headers.insert(
        header::X_XSS_PROTECTION,
        HeaderValue::from_static("1; mode=block"),
    );
    headers.insert(header::X_FRAME_OPTIONS, HeaderValue::from_static("deny"));
    response
}

/// Panic recovery boundary. Outermost layer: converts any unrecovered
/// fault below it into the generic 500 response instead of crashing the
/// process or hanging the connection.
pub fn recover_panic() -> CatchPanicLayer<fn(Box<dyn Any + Send + 'static>) -> Response> {
    CatchPanicLayer::custom(handle_panic as fn(Box<dyn Any + Send + 'static>) -> Response)
}

fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        (*s).to_string()
    } else {
        "non-string panic payload".to_string()
    };

    let backtrace = std::backtrace::Backtrace::force_capture();
    tracing::error!(panic = %detail, backtrace = %backtrace, "handler panicked");

    // Connection: close. Handler state may be inconsistent, so the
    // connection must not be reused for keep-alive.
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        [(header::CONNECTION, HeaderValue::from_static("close"))],
        "Internal Server Error",
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::Router;
    use axum::body::Body;
    use axum::http::Request;
    use axum::routing::get;
    use tower::ServiceExt;

    async fn ok() -> &'static str {
        "ok"
    }

    async fn boom() -> &'static str {
        panic!("deliberate test panic");
    }

    fn app() -> Router {
        Router::new()
            .route("/", get(ok))
            .route("/boom", get(boom))
            .layer(axum::middleware::from_fn(secure_headers))
            .layer(axum::middleware::from_fn(log_request))
            .layer(recover_panic())
    }

    #[tokio::test]
    async fn secure_headers_set_on_every_response() {
        let response = app()
            .oneshot(Request::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(header::X_XSS_PROTECTION).unwrap(),
            "1; mode=block"
        );
        assert_eq!(
            response.headers().get(header::X_FRAME_OPTIONS).unwrap(),
            "deny"
        );
    }

    #[tokio::test]
    async fn panic_becomes_500_with_connection_close() {
        let response = app()
            .oneshot(Request::get("/boom").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(response.headers().get(header::CONNECTION).unwrap(), "close");
    }

    #[tokio::test]
    async fn headers_present_even_on_404() {
        let response = app()
            .oneshot(Request::get("/missing").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert!(response.headers().contains_key(header::X_FRAME_OPTIONS));
    }
}
