//! Construction of the responses the middleware short-circuits with.
use axum::{
    body::Body,
    http::{header::LOCATION, HeaderMap, HeaderValue, StatusCode},
    response::Response,
};

use crate::Result;

/// Builds a fresh response out of a status and a set of headers.
pub trait ResponseFactory {
    type Response;

    /// # Errors
    /// When the underlying framework refuses the given parts.
    fn build(&self, status: StatusCode, headers: HeaderMap) -> Result<Self::Response>;
}

/// [`ResponseFactory`] producing empty-bodied axum responses.
#[derive(Debug, Default, Clone, Copy)]
pub struct AxumResponseFactory;

impl ResponseFactory for AxumResponseFactory {
    type Response = Response;

    fn build(&self, status: StatusCode, headers: HeaderMap) -> Result<Self::Response> {
        let mut builder = Response::builder().status(status);
        if let Some(map) = builder.headers_mut() {
            map.extend(headers);
        }
        Ok(builder.body(Body::empty())?)
    }
}

/// Builds a `301 Moved Permanently` response pointing at `location`.
///
/// # Errors
/// When `location` is not a valid header value, or when the factory fails.
pub fn redirect<F: ResponseFactory>(factory: &F, location: &str) -> Result<F::Response> {
    let mut headers = HeaderMap::with_capacity(1);
    headers.insert(LOCATION, HeaderValue::from_str(location)?);
    factory.build(StatusCode::MOVED_PERMANENTLY, headers)
}
