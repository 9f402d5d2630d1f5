use std::net::SocketAddr;

use serde::{Deserialize, Serialize};

/// http server configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// tracing filter directives, overridden by `RUST_LOG` when set
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_log_filter() -> String {
    "loan_plan_rs=info,loaner=info,tower_http=info".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            log_filter: default_log_filter(),
        }
    }
}

impl ServerConfig {
    /// address to bind the listener to
    pub fn socket_addr(&self) -> Result<SocketAddr, std::net::AddrParseError> {
        format!("{}:{}", self.host, self.port).parse()
    }
}
