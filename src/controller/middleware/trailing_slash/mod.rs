//! Trailing Slash Middleware
//!
//! Canonicalizes request paths so that a resource is only ever served under
//! one form. Requests for `/users` are answered with a `301 Moved Permanently`
//! to `/users/`, keeping the query string untouched. Paths that already end
//! with `/`, or whose last segment carries a file extension (`/robots.txt`),
//! pass through to the rest of the stack unchanged.
//!
//! Any path starting with one of the `path_disable` prefixes is left alone.
//!
//! ```yaml
//! server:
//!   middlewares:
//!     trailing_slash:
//!       enable: true
//!       path_disable:
//!         - /api
//!         - /admin
//! ```
//!
//! When a redirect is due, the downstream handlers are never called.
//!
//! The layer works on `http::Uri`, which carries no fragment, so redirects it
//! issues never include one. Callers holding a raw URI string can go through
//! [`TrailingSlash::intercept`] with a [`RawUri`] to keep the `#fragment`.
//! Authority-form targets (`CONNECT host:port`) have no path and always pass
//! through.
mod normalize;
mod response;
mod uri;

use std::{
    future::Future,
    sync::Arc,
    task::{Context, Poll},
};

use axum::{
    body::Body,
    extract::Request,
    response::{IntoResponse, Response},
    Router as AXRouter,
};
use futures_util::future::BoxFuture;
use serde::{Deserialize, Serialize};
use tower::{Layer, Service};

pub use self::{
    normalize::{decide, extension, is_exempt, normalize, Decision},
    response::{redirect, AxumResponseFactory, ResponseFactory},
    uri::{InterceptedRequest, RawUri, RequestUri},
};
use crate::{app::AppContext, controller::middleware::MiddlewareLayer, Result};

const PATH_DISABLE: &str = "path_disable";

/// Trailing slash middleware configuration
#[derive(Default, Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct TrailingSlash {
    #[serde(default)]
    pub enable: bool,
    /// Path prefixes that are never redirected. Matching is a literal prefix
    /// test, so `/admin` also covers `/administrators`.
    #[serde(default)]
    path_disable: Vec<String>,
}

/// What [`TrailingSlash::intercept`] decided for a request.
#[derive(Debug)]
pub enum Interception<R> {
    /// Answer with this redirect instead of calling the downstream handler.
    Redirect(R),
    /// Hand the request over to the downstream handler.
    Continue,
}

impl TrailingSlash {
    /// An enabled middleware exempting the given prefixes.
    #[must_use]
    pub fn new<I, S>(path_disable: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            enable: true,
            path_disable: path_disable.into_iter().map(Into::into).collect(),
        }
    }

    /// Builds an enabled middleware out of a free-form settings mapping,
    /// reading its optional `path_disable` list.
    ///
    /// A missing mapping, or one without `path_disable`, means no exemptions.
    ///
    /// # Errors
    /// When `path_disable` is present but is not a list of strings.
    pub fn from_settings(settings: Option<&serde_json::Value>) -> Result<Self> {
        let path_disable = settings
            .and_then(|settings| settings.get(PATH_DISABLE))
            .filter(|value| !value.is_null())
            .map(|value| serde_json::from_value::<Vec<String>>(value.clone()))
            .transpose()?
            .unwrap_or_default();

        Ok(Self::new(path_disable))
    }

    /// The configured exempt prefixes, in matching order.
    #[must_use]
    pub fn path_disable(&self) -> &[String] {
        &self.path_disable
    }

    /// Inspects `request` and builds the redirect response when one is due.
    ///
    /// # Errors
    /// When the redirect location cannot be serialized or the response cannot
    /// be built.
    pub fn intercept<Req, F>(&self, request: &Req, factory: &F) -> Result<Interception<F::Response>>
    where
        Req: InterceptedRequest,
        F: ResponseFactory,
    {
        intercept(&self.path_disable, request, factory)
    }

    /// Runs the middleware around `next`.
    ///
    /// `next` is called only when no redirect is needed, and its result is
    /// returned verbatim.
    ///
    /// # Errors
    /// Whatever `next` fails with, or a redirect construction failure.
    pub async fn process<Req, F, N, Fut, E>(
        &self,
        request: Req,
        factory: &F,
        next: N,
    ) -> std::result::Result<F::Response, E>
    where
        Req: InterceptedRequest,
        F: ResponseFactory,
        N: FnOnce(Req) -> Fut,
        Fut: Future<Output = std::result::Result<F::Response, E>>,
        E: From<crate::Error>,
    {
        match self.intercept(&request, factory)? {
            Interception::Redirect(response) => Ok(response),
            Interception::Continue => next(request).await,
        }
    }
}

fn intercept<Req, F>(
    path_disable: &[String],
    request: &Req,
    factory: &F,
) -> Result<Interception<F::Response>>
where
    Req: InterceptedRequest,
    F: ResponseFactory,
{
    let uri = request.uri();
    if !uri.has_path() {
        return Ok(Interception::Continue);
    }
    match decide(uri.path(), path_disable) {
        Decision::Exempt | Decision::AlreadyNormalized => Ok(Interception::Continue),
        Decision::NeedsRedirect(path) => {
            let location = uri.replace_path(&path)?;
            Ok(Interception::Redirect(redirect(factory, &location)?))
        }
    }
}

impl MiddlewareLayer for TrailingSlash {
    /// Returns the name of the middleware
    fn name(&self) -> &'static str {
        "trailing_slash"
    }

    /// Returns whether the middleware is enabled or not
    fn is_enabled(&self) -> bool {
        self.enable
    }

    fn config(&self) -> serde_json::Result<serde_json::Value> {
        serde_json::to_value(self)
    }

    /// Applies the trailing slash middleware to the application router.
    fn apply(&self, app: AXRouter<AppContext>) -> Result<AXRouter<AppContext>> {
        tracing::debug!(path_disable = ?self.path_disable, "trailing slash exemptions");
        Ok(app.layer(TrailingSlashLayer::new(self)))
    }
}

/// [`TrailingSlashLayer`] wraps services with [`TrailingSlashMiddleware`].
#[derive(Debug, Clone)]
pub struct TrailingSlashLayer {
    path_disable: Arc<[String]>,
}

impl TrailingSlashLayer {
    #[must_use]
    pub fn new(config: &TrailingSlash) -> Self {
        Self {
            path_disable: config.path_disable.clone().into(),
        }
    }
}

impl<S> Layer<S> for TrailingSlashLayer {
    type Service = TrailingSlashMiddleware<S>;

    fn layer(&self, inner: S) -> Self::Service {
        TrailingSlashMiddleware {
            inner,
            path_disable: self.path_disable.clone(),
        }
    }
}

#[derive(Debug, Clone)]
#[must_use]
pub struct TrailingSlashMiddleware<S> {
    inner: S,
    path_disable: Arc<[String]>,
}

impl<S> Service<Request<Body>> for TrailingSlashMiddleware<S>
where
    S: Service<Request<Body>, Response = Response> + Send + 'static,
    S::Future: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = BoxFuture<'static, std::result::Result<Self::Response, Self::Error>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<std::result::Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request<Body>) -> Self::Future {
        let response = match intercept(&self.path_disable, &req, &AxumResponseFactory) {
            Ok(Interception::Continue) => return Box::pin(self.inner.call(req)),
            Ok(Interception::Redirect(response)) => response,
            Err(err) => err.into_response(),
        };
        Box::pin(async move { Ok::<_, S::Error>(response) })
    }
}
