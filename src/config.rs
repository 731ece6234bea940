//! # Configuration Management
//!
//! This module defines the configuration structures and functions to manage and
//! load configuration settings for the application.

/***
=============
CONTRIBUTORS:
=============

Here's a check list when adding configuration values:

* Add the new configuration piece
* Document each field with the appropriate rustdoc comment
* Go to `config/`, evaluate which environment needs a configuration update, and update as needed.
  apply a YAML comment above the new field or section with explanation and possible values.

***/

use std::path::{Path, PathBuf};

use fs_err as fs;
use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;

use crate::{
    controller::middleware::trailing_slash::TrailingSlash, environment::Environment, logger,
    Error, Result,
};

lazy_static! {
    static ref DEFAULT_FOLDER: PathBuf = PathBuf::from("config");
}

/// Main application configuration structure.
///
/// This struct encapsulates various configuration settings. The configuration
/// can be customized through YAML files for different environments.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub logger: Logger,
    #[serde(default)]
    pub server: Server,

    /// Custom app settings
    ///
    /// Example:
    /// ```yaml
    /// settings:
    ///   allow_list:
    ///     - google.com
    ///     - apple.com
    /// ```
    /// And then optionally deserialize it to your own `Settings` type by
    /// accessing `ctx.config.settings`.
    #[serde(default)]
    pub settings: Option<serde_json::Value>,
}

/// Logger configuration
///
/// The logging stack is built on `tracing`, using a stack of filters and
/// subscribers. We filter out noise and apply a log level across your app.
///
/// Example (development):
/// ```yaml
/// # config/development.yaml
/// logger:
///   enable: true
///   level: debug
///   format: compact
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Logger {
    /// Enable log write to stdout
    pub enable: bool,

    /// Set the logger level.
    ///
    /// * options: `trace` | `debug` | `info` | `warn` | `error`
    #[serde(default)]
    pub level: logger::LogLevel,

    /// Set the logger format.
    ///
    /// * options: `compact` | `pretty` | `json`
    #[serde(default)]
    pub format: logger::Format,

    /// Override our custom tracing filter.
    ///
    /// Set this to your own filter if you want to see traces from internal
    /// libraries. See more [here](https://docs.rs/tracing-subscriber/latest/tracing_subscriber/filter/struct.EnvFilter.html#directives)
    pub override_filter: Option<String>,
}

/// Server configuration structure.
///
/// Example (development):
/// ```yaml
/// # config/development.yaml
/// server:
///   middlewares:
///     trailing_slash:
///       enable: true
///       path_disable:
///         - /api
/// ```
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Server {
    /// Middleware configurations for the server.
    #[serde(default)]
    pub middlewares: Middlewares,
}

/// Server middleware configuration structure.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Middlewares {
    /// Redirects paths without a trailing slash to their canonical form
    pub trailing_slash: Option<TrailingSlash>,
}

impl Config {
    /// Creates a new configuration instance based on the specified environment.
    ///
    /// # Errors
    ///
    /// Returns error when could not convert the give path to [`Config`] struct.
    ///
    /// # Example
    ///
    /// ```rust
    /// use loco_trailing_slash::{
    ///     config::Config,
    ///     environment::Environment,
    /// };
    ///
    /// fn load(environment: &Environment) -> Config {
    ///     Config::new(environment).expect("configuration loading")
    /// }
    /// ```
    pub fn new(env: &Environment) -> Result<Self> {
        let config = Self::from_folder(env, DEFAULT_FOLDER.as_path())?;
        Ok(config)
    }

    /// Loads configuration settings from a folder for the specified
    /// environment.
    ///
    /// # Errors
    /// Returns error when could not convert the give path to
    /// [`Config`] struct.
    ///
    /// # Example
    ///
    /// ```rust
    /// use loco_trailing_slash::{
    ///     config::Config,
    ///     environment::Environment,
    /// };
    /// use std::path::PathBuf;
    ///
    /// fn load(environment: &Environment) -> Config {
    ///     Config::from_folder(environment, &PathBuf::from("config")).expect("configuration loading")
    /// }
    /// ```
    pub fn from_folder(env: &Environment, path: &Path) -> Result<Self> {
        // by order of precedence
        let files = [
            path.join(format!("{env}.local.yaml")),
            path.join(format!("{env}.yaml")),
        ];

        let selected_path = files
            .iter()
            .find(|p| p.exists())
            .ok_or_else(|| Error::Message("no configuration file found".to_string()))?;

        info!(selected_path =? selected_path, "loading environment from");

        let content = fs::read_to_string(selected_path)?;
        let rendered = crate::tera::render_string(&content, &json!({}))?;

        serde_yaml::from_str(&rendered)
            .map_err(|err| Error::YAMLFile(err, selected_path.to_string_lossy().to_string()))
    }

    /// Builds the trailing slash middleware out of the free-form `settings`
    /// section, for applications that keep their middleware options there
    /// rather than under `server.middlewares`.
    ///
    /// # Errors
    /// When `settings.trailing_slash.path_disable` is not a list of strings.
    pub fn trailing_slash_from_settings(&self) -> Result<TrailingSlash> {
        TrailingSlash::from_settings(
            self.settings
                .as_ref()
                .and_then(|settings| settings.get("trailing_slash")),
        )
    }
}
