//! # Server Infrastructure Utilities for Testing
//!
//! Helpers that mount a single route behind the configured middleware stack,
//! either served on a real socket or called in-process.

use axum::{body::Body, extract::Request, response::Response, Router};
use loco_trailing_slash::{app::AppContext, controller};
use tower::ServiceExt;

/// The hostname to which the test server binds.
const TEST_BINDING_SERVER: &str = "127.0.0.1";

/// Builds the application router: one route at `uri` wrapped with the
/// middlewares enabled in `ctx`.
pub fn router_with_route(
    ctx: AppContext,
    uri: &str,
    method: axum::routing::MethodRouter<AppContext>,
) -> Router {
    controller::apply_middlewares(Router::new().route(uri, method), ctx).expect("to router")
}

/// Sends a `GET` for `uri` straight through the router, without a socket.
pub async fn request(router: Router, uri: &str) -> Response {
    let req = Request::builder()
        .uri(uri)
        .body(Body::empty())
        .expect("request");
    router.oneshot(req).await.expect("response")
}

/// Starts the server with a custom route specified by the URI and the HTTP
/// method handler, on a random free port.
///
/// Returns the server task and the base URL (without trailing slash).
pub async fn start_with_route(
    ctx: AppContext,
    uri: &str,
    method: axum::routing::MethodRouter<AppContext>,
) -> (tokio::task::JoinHandle<()>, String) {
    let router = router_with_route(ctx, uri, method);
    let listener = tokio::net::TcpListener::bind(format!("{TEST_BINDING_SERVER}:0"))
        .await
        .expect("bind test listener");
    let addr = listener.local_addr().expect("local addr");

    let handle = tokio::spawn(async move {
        axum::serve(listener, router).await.expect("start the server");
    });

    (handle, format!("http://{addr}"))
}

/// A client that reports redirects instead of following them.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .expect("client")
}
