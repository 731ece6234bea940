use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

use axum::{
    http::{header::LOCATION, StatusCode},
    response::Response,
    routing::get,
};
use loco_trailing_slash::{
    app::AppContext, config, controller::middleware::trailing_slash::TrailingSlash,
    environment::Environment, tests_cfg,
};
use rstest::rstest;

use crate::infra_cfg;

fn ctx_with(trailing_slash: Option<TrailingSlash>) -> AppContext {
    let mut ctx = tests_cfg::app::get_app_context();
    ctx.config.server.middlewares = config::Middlewares { trailing_slash };
    ctx
}

fn location(response: &Response) -> Option<&str> {
    response
        .headers()
        .get(LOCATION)
        .and_then(|value| value.to_str().ok())
}

#[rstest]
#[case("/path", "/path/")]
#[case("/path?foo=bar", "/path/?foo=bar")]
#[case("/path/to/nested/resource", "/path/to/nested/resource/")]
#[case("/v1.0/resource", "/v1.0/resource/")]
#[tokio::test]
async fn middleware_trailing_slash_redirects(#[case] uri: &str, #[case] expected: &str) {
    let ctx = ctx_with(Some(TrailingSlash::new(["/admin"])));
    let router = infra_cfg::server::router_with_route(ctx, "/{*rest}", get(|| async { "ok" }));

    let res = infra_cfg::server::request(router, uri).await;

    assert_eq!(res.status(), StatusCode::MOVED_PERMANENTLY);
    assert_eq!(location(&res), Some(expected));
}

#[rstest]
#[case("/path/")]
#[case("/file.txt")]
#[case("/archive.tar.gz")]
#[case("/admin/users")]
#[case("/administrators")]
#[tokio::test]
async fn middleware_trailing_slash_passes_through(#[case] uri: &str) {
    let ctx = ctx_with(Some(TrailingSlash::new(["/admin"])));
    let router = infra_cfg::server::router_with_route(
        ctx,
        "/{*rest}",
        get(|| async { ([("x-downstream", "yes")], "ok") }),
    );

    let res = infra_cfg::server::request(router, uri).await;

    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(location(&res), None);
    assert_eq!(
        res.headers()
            .get("x-downstream")
            .and_then(|v| v.to_str().ok()),
        Some("yes")
    );
}

#[rstest]
#[case(true, StatusCode::MOVED_PERMANENTLY)]
#[case(false, StatusCode::OK)]
#[tokio::test]
async fn middleware_trailing_slash_enable(#[case] enable: bool, #[case] expected: StatusCode) {
    let mut middleware = TrailingSlash::new(Vec::<String>::new());
    middleware.enable = enable;
    let router = infra_cfg::server::router_with_route(
        ctx_with(Some(middleware)),
        "/path",
        get(|| async { "ok" }),
    );

    let res = infra_cfg::server::request(router, "/path").await;

    assert_eq!(res.status(), expected);
}

// Documented behavior: on redirect the downstream handler never runs.
#[tokio::test]
async fn middleware_trailing_slash_skips_downstream_on_redirect() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = calls.clone();
    let router = infra_cfg::server::router_with_route(
        ctx_with(Some(TrailingSlash::new(Vec::<String>::new()))),
        "/{*rest}",
        get(move || {
            let counter = counter.clone();
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                "ok"
            }
        }),
    );

    let res = infra_cfg::server::request(router.clone(), "/path").await;
    assert_eq!(res.status(), StatusCode::MOVED_PERMANENTLY);
    assert_eq!(calls.load(Ordering::SeqCst), 0);

    let res = infra_cfg::server::request(router, "/path/").await;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn middleware_trailing_slash_from_test_environment() {
    let ctx = AppContext::load(Environment::Test).expect("load test environment");
    let router = infra_cfg::server::router_with_route(ctx, "/{*rest}", get(|| async { "ok" }));

    let res = infra_cfg::server::request(router.clone(), "/api/users").await;
    assert_eq!(res.status(), StatusCode::OK);

    let res = infra_cfg::server::request(router, "/users").await;
    assert_eq!(res.status(), StatusCode::MOVED_PERMANENTLY);
    assert_eq!(location(&res), Some("/users/"));
}

#[tokio::test]
async fn middleware_trailing_slash_over_the_wire() {
    let (handle, base_url) = infra_cfg::server::start_with_route(
        ctx_with(Some(TrailingSlash::new(Vec::<String>::new()))),
        "/{*rest}",
        get(|| async { "ok" }),
    )
    .await;

    let res = infra_cfg::server::client()
        .get(format!("{base_url}/path?foo=bar"))
        .send()
        .await
        .expect("response");

    assert_eq!(res.status().as_u16(), 301);
    assert_eq!(
        res.headers()
            .get("location")
            .and_then(|v| v.to_str().ok()),
        Some("/path/?foo=bar")
    );

    let res = infra_cfg::server::client()
        .get(format!("{base_url}/path/"))
        .send()
        .await
        .expect("response");
    assert_eq!(res.status().as_u16(), 200);
    assert_eq!(res.text().await.expect("body"), "ok");

    handle.abort();
}
