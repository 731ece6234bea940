use crate::{
    config::{self, Config},
    logger,
};

#[must_use]
pub fn test_config() -> Config {
    Config {
        logger: config::Logger {
            enable: false,
            level: logger::LogLevel::Off,
            format: logger::Format::Json,
            override_filter: None,
        },
        server: config::Server {
            middlewares: config::Middlewares {
                trailing_slash: None,
            },
        },
        settings: None,
    }
}
