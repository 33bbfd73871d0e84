//! tablegate - database tables as REST resources
//!
//! Builds SQL for each supported database family from a vendor-neutral
//! statement model, enforces per-alias access rules, runs statements through
//! a pluggable driver and maps vendor failures onto outcome categories.

pub mod acl;
pub mod cli;
pub mod config;
pub mod dialect;
pub mod finder;
pub mod gateway;
pub mod http_server;
pub mod model;
pub mod observability;
pub mod taxonomy;
