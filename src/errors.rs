//! # Application Error Handling

use axum::http::{
    header::InvalidHeaderValue,
    uri::{InvalidUri, InvalidUriParts},
};

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("{0}")]
    Message(String),

    #[error(transparent)]
    Tera(#[from] tera::Error),

    #[error(transparent)]
    JSON(#[from] serde_json::Error),

    #[error(transparent)]
    YAML(#[from] serde_yaml::Error),

    #[error("cannot parse `{1}`: {0}")]
    YAMLFile(#[source] serde_yaml::Error, String),

    #[error(transparent)]
    IO(#[from] std::io::Error),

    // Redirect construction
    #[error(transparent)]
    InvalidHeader(#[from] InvalidHeaderValue),

    #[error(transparent)]
    InvalidUri(#[from] InvalidUri),

    #[error(transparent)]
    InvalidUriParts(#[from] InvalidUriParts),

    #[error(transparent)]
    Http(#[from] axum::http::Error),

    #[error(transparent)]
    Any(#[from] Box<dyn std::error::Error + Send + Sync>),
}
