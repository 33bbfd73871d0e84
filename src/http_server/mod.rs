//! # HTTP Transport
//!
//! Axum routes over the gateway, nested under the configured root:
//!
//! - `GET    /{alias}` - table list
//! - `HEAD   /{alias}/{resource}` - resource metadata, status only
//! - `GET    /{alias}/{resource}/meta` - resource metadata
//! - `GET    /{alias}/{resource}` - one page (`limit`, `offset`, `sort`, `dir`, `cols`)
//! - `GET    /{alias}/{resource}/{id}` - one record (`Primary-Key` header)
//! - `GET    /{alias}/{resource}/{column}/{value}` - search by column
//! - `GET    /{alias}/{resource}/dynamic/{finder}?args=..` - dynamic finder
//! - `POST   /{alias}/{resource}` - create
//! - `PUT    /{alias}/{resource}/{id}` - update
//! - `DELETE /{alias}/{resource}/{id}` - delete
//! - `POST   /{alias}/call/{routine}` - stored routine call
//!
//! `/health` sits outside the root.

pub mod config;
pub mod gateway_routes;
pub mod server;

pub use config::HttpServerConfig;
pub use gateway_routes::{GatewayState, PRIMARY_KEY_HEADER};
pub use server::HttpServer;
