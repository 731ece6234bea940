pub use axum::{
    response::{IntoResponse, Response},
    routing::get,
};

pub use crate::{
    app::AppContext,
    config::Config,
    controller::{
        apply_middlewares,
        middleware::{
            trailing_slash::{TrailingSlash, TrailingSlashLayer},
            MiddlewareLayer,
        },
    },
    environment::Environment,
    errors::Error,
    Result,
};
