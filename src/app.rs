//! This module contains the application context shared by the router and its
//! middlewares.
use crate::{
    config::Config,
    environment::{resolve_from_env, Environment},
    Result,
};

/// Represents the application context for a web server.
///
/// This struct encapsulates the settings the middleware stack is built from.
/// It is attached to the router as its state, and is cheap to clone.
#[derive(Clone, Debug)]
pub struct AppContext {
    /// The environment in which the application is running.
    pub environment: Environment,
    /// Configuration settings for the application
    pub config: Config,
}

impl AppContext {
    /// Loads the configuration of `environment` from the default `config/`
    /// folder.
    ///
    /// # Errors
    /// When the configuration cannot be found or parsed.
    pub fn load(environment: Environment) -> Result<Self> {
        let config = environment.load()?;
        Ok(Self {
            environment,
            config,
        })
    }

    /// Loads the context of the environment named by `LOCO_ENV`, `RAILS_ENV`
    /// or `NODE_ENV`, falling back to `development`.
    ///
    /// # Errors
    /// When the configuration cannot be found or parsed.
    pub fn from_env() -> Result<Self> {
        Self::load(Environment::from(resolve_from_env()))
    }
}
