use serde::{Deserialize, Serialize};

fn default_bind_addr() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_log_level() -> String {
    "info".to_string()
}

/// HTTP surface configuration, loaded from environment variables the way
/// the teacher's `crates/server/src/config.rs` loads `ServerConfig`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServerConfig {
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            port: default_port(),
            log_level: default_log_level(),
        }
    }
}

impl ServerConfig {
    /// Build from `SIMLSH_BIND_ADDR` / `SIMLSH_PORT` / `SIMLSH_LOG_LEVEL`,
    /// falling back to defaults for anything unset or unparsable.
    pub fn from_env() -> Self {
        let mut cfg = Self::default();
        if let Ok(addr) = std::env::var("SIMLSH_BIND_ADDR") {
            cfg.bind_addr = addr;
        }
        if let Ok(port) = std::env::var("SIMLSH_PORT") {
            if let Ok(parsed) = port.parse() {
                cfg.port = parsed;
            }
        }
        if let Ok(level) = std::env::var("SIMLSH_LOG_LEVEL") {
            cfg.log_level = level;
        }
        cfg
    }

    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.bind_addr, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_binds_localhost_8080() {
        let cfg = ServerConfig::default();
        assert_eq!(cfg.socket_addr(), "127.0.0.1:8080");
    }

    #[test]
    fn serde_default_fills_missing_fields() {
        let cfg: ServerConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(cfg, ServerConfig::default());
    }
}
