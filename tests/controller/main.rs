#[path = "../infra_cfg/mod.rs"]
mod infra_cfg;

mod middlewares;
