//! HTTP Server Configuration
//!
//! Root path, bind address, CORS origins and the optional JWT secret used to
//! identify principals.

use serde::{Deserialize, Serialize};

/// HTTP server configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpServerConfig {
    /// Path every alias is nested under (default: "/tablegate")
    #[serde(default = "default_root")]
    pub root: String,

    /// Host to bind to (default: "0.0.0.0")
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to bind to (default: 8080)
    #[serde(default = "default_port")]
    pub port: u16,

    /// CORS allowed origins; empty allows any origin
    #[serde(default)]
    pub cors_origins: Vec<String>,

    /// HS256 secret for bearer tokens; without it every caller is anonymous
    #[serde(default)]
    pub jwt_secret: Option<String>,
}

fn default_root() -> String {
    "/tablegate".to_string()
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

impl Default for HttpServerConfig {
    fn default() -> Self {
        Self {
            root: default_root(),
            host: default_host(),
            port: default_port(),
            cors_origins: Vec::new(),
            jwt_secret: None,
        }
    }
}

impl HttpServerConfig {
    pub fn with_port(port: u16) -> Self {
        Self {
            port,
            ..Default::default()
        }
    }

    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Root path without a trailing slash; "/" becomes ""
    pub fn normalized_root(&self) -> String {
        let trimmed = self.root.trim().trim_end_matches('/');
        if trimmed.is_empty() {
            String::new()
        } else if trimmed.starts_with('/') {
            trimmed.to_string()
        } else {
            format!("/{}", trimmed)
        }
    }
}
