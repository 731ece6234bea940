use crate::{app::AppContext, environment::Environment, tests_cfg::config::test_config};

#[must_use]
pub fn get_app_context() -> AppContext {
    AppContext {
        environment: Environment::Test,
        config: test_config(),
    }
}
