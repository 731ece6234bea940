#![allow(clippy::missing_const_for_fn)]
#![allow(clippy::module_name_repetitions)]
//! ## Trailing slash canonicalization for Loco applications
//!
//! Serves every resource under a single path form. A request for `/users` is
//! answered with a `301 Moved Permanently` pointing to `/users/`, query string
//! preserved, while `/users/` and file-like paths such as `/robots.txt` reach
//! your handlers untouched.
//!
//! Enable it in your environment configuration:
//!
//! ```yaml
//! server:
//!   middlewares:
//!     trailing_slash:
//!       enable: true
//!       # prefixes that are never redirected
//!       path_disable:
//!         - /api
//! ```
//!
//! Or build the layer directly:
//!
//! ```rust
//! use axum::{routing::get, Router};
//! use loco_trailing_slash::controller::middleware::trailing_slash::{
//!     TrailingSlash, TrailingSlashLayer,
//! };
//!
//! let app: Router = Router::new()
//!     .route("/users/", get(|| async { "users" }))
//!     .layer(TrailingSlashLayer::new(&TrailingSlash::new(["/api"])));
//! ```
pub use self::errors::Error;

pub mod app;
pub mod config;
pub mod controller;
pub mod environment;
pub mod errors;
pub mod logger;
pub mod prelude;
mod tera;
#[cfg(any(test, feature = "testing"))]
pub mod tests_cfg;

/// Application results options list
pub type Result<T> = std::result::Result<T, Error>;
