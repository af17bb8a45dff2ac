//! Integration tests for Flitro workspace contexts

mod activation_engine;
mod cli_session;
mod config_integration;
mod grouping_properties;
mod persistence;
mod test_utils;

pub use test_utils::{with_env_lock, with_vars, with_xdg_env};
