//! Router assembly and error responses.
//!
//! # Example
//!
//! Wrap an application router with the middlewares enabled in configuration:
//!
//! ```rust
//! use axum::{routing::get, Router};
//! use loco_trailing_slash::{
//!     app::AppContext,
//!     config::{Config, Middlewares},
//!     controller::{self, middleware::trailing_slash::TrailingSlash},
//!     environment::Environment,
//! };
//!
//! let mut config = Config::default();
//! config.server.middlewares = Middlewares {
//!     trailing_slash: Some(TrailingSlash::new(["/api"])),
//! };
//! let ctx = AppContext {
//!     environment: Environment::Development,
//!     config,
//! };
//!
//! let app = Router::new().route("/users/", get(|| async { "users" }));
//! let router = controller::apply_middlewares(app, ctx).expect("router");
//! ```

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json, Router as AXRouter,
};
use serde::Serialize;

use crate::{app::AppContext, errors::Error, Result};

pub mod middleware;

#[derive(Debug, Serialize)]
/// Structure representing details about an error.
pub struct ErrorDetail {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl ErrorDetail {
    /// Create a new `ErrorDetail` with the specified error and description.
    #[must_use]
    pub fn new<T: Into<String>>(error: T, description: T) -> Self {
        Self {
            error: Some(error.into()),
            description: Some(description.into()),
        }
    }

    /// Create an `ErrorDetail` with only an error reason and no description.
    #[must_use]
    pub fn with_reason<T: Into<String>>(error: T) -> Self {
        Self {
            error: Some(error.into()),
            description: None,
        }
    }
}

impl IntoResponse for Error {
    /// Convert an `Error` into an HTTP response.
    fn into_response(self) -> Response {
        tracing::error!(
        error.msg = %self,
        error.details = ?self,
        "controller_error"
        );

        match self {
            Self::Message(err) => json_error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorDetail::new("internal_server_error", err.as_str()),
            ),
            _ => json_error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorDetail::with_reason("Internal Server Error"),
            ),
        }
    }
}

/// Create a JSON error response with the specified status code and error
/// detail.
fn json_error_response(status_code: StatusCode, detail: ErrorDetail) -> Response {
    (status_code, Json(detail)).into_response()
}

/// Applies every enabled middleware of the default stack to `app` and
/// attaches the context as router state.
///
/// Middlewares are applied in stack order: the last one applied is the first
/// to see an incoming request.
///
/// # Errors
/// When a middleware fails to apply.
pub fn apply_middlewares(mut app: AXRouter<AppContext>, ctx: AppContext) -> Result<AXRouter> {
    let middlewares = middleware::default_middleware_stack(&ctx)
        .into_iter()
        .filter(|m| m.is_enabled());

    for mid in middlewares {
        app = mid.apply(app)?;
        tracing::info!(name = mid.name(), "+middleware");
    }
    Ok(app.with_state(ctx))
}
