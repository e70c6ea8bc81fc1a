//! KPI Check Infrastructure - Adapters and implementations
//!
//! This crate provides concrete implementations of the ports
//! defined in the application layer, plus environment configuration.

pub mod adapters;
pub mod config;
pub mod testing;

pub use adapters::{ReqwestHttpClient, SystemClock};
pub use config::{EnvFileStatus, EnvProbe, PROBE_VAR, settings_from_env};
pub use testing::TestRunner;
