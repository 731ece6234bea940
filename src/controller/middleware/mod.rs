//! Base Middleware for Loco Application
//!
//! This module defines the [`MiddlewareLayer`] trait every configurable
//! middleware implements, and builds the default middleware stack out of the
//! [`crate::config::Middlewares`] section of the application configuration.
pub mod trailing_slash;

use axum::Router as AXRouter;

use crate::{app::AppContext, Result};

/// Trait representing the behavior of middleware components in the
/// application.
///
/// When implementing a new middleware, make sure to go over this checklist:
/// * The name of the middleware should be an ID that is similar to the field
///   name in configuration (look at how `serde` calls it)
/// * Default value implementation should be paired with `serde` default
///   handlers and default serialization implementation. Which means
///   deserialization and serialization should be symmetric.
/// * Use `is_enabled` to report the configured state, `apply` is only called
///   for enabled middlewares.
pub trait MiddlewareLayer {
    /// Returns the name of the middleware.
    /// This should match the name of the property in the containing
    /// `middleware` section in configuration (as named by `serde`)
    fn name(&self) -> &'static str;

    /// Returns whether the middleware is enabled or not.
    /// If the middleware is switchable, take this value from a configuration
    /// value
    fn is_enabled(&self) -> bool {
        true
    }

    /// Returns middleware config.
    ///
    /// # Errors
    /// when could not convert middleware to [`serde_json::Value`]
    fn config(&self) -> serde_json::Result<serde_json::Value>;

    /// Applies the middleware to the given Axum router and returns the
    /// modified router.
    ///
    /// # Errors
    ///
    /// If there is an issue when adding the middleware to the router.
    fn apply(&self, app: AXRouter<AppContext>) -> Result<AXRouter<AppContext>>;
}

/// Constructs a default stack of middleware for the Axum application based on
/// the provided context.
///
/// Disabled middlewares are part of the returned list, callers filter on
/// [`MiddlewareLayer::is_enabled`].
#[must_use]
pub fn default_middleware_stack(ctx: &AppContext) -> Vec<Box<dyn MiddlewareLayer>> {
    let middlewares = &ctx.config.server.middlewares;

    vec![Box::new(
        middlewares.trailing_slash.clone().unwrap_or_default(),
    )]
}
