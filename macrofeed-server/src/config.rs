// File: macrofeed-server/src/config.rs

use std::net::SocketAddr;

use tracing::debug;

pub const DEFAULT_BIND: &str = "127.0.0.1:3000";
pub const MAX_UPDATES: usize = 100;
pub const MACRO_ENV_PREFIX: &str = "MACRO_";

#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    /// Per-macro history cap; older entries fall off the end.
    pub max_updates: usize,
    /// Names served by `GET /api/macros`.
    pub macros: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            max_updates: MAX_UPDATES,
            macros: Vec::new(),
        }
    }
}

impl ServerConfig {
    /// Reads `.env` and the process environment for `MACRO_<NAME>=<id>` entries.
    pub fn from_env(bind_addr: SocketAddr) -> Self {
        dotenv::dotenv().ok();
        Self {
            bind_addr,
            macros: macros_from_vars(std::env::vars()),
            ..Default::default()
        }
    }
}

/// Every `MACRO_<NAME>` whose value is an integer (a Discord channel id)
/// contributes `<NAME>`. Sorted so the dashboard's default pick is stable.
pub fn macros_from_vars<I>(vars: I) -> Vec<String>
where
    I: IntoIterator<Item = (String, String)>,
{
    let mut macros: Vec<String> = vars
        .into_iter()
        .filter_map(|(key, value)| {
            let name = key.strip_prefix(MACRO_ENV_PREFIX)?;
            if name.is_empty() {
                return None;
            }
            match value.trim().parse::<i128>() {
                Ok(_) => Some(name.to_string()),
                Err(_) => {
                    debug!("Ignoring {}: value '{}' is not numeric", key, value);
                    None
                }
            }
        })
        .collect();
    macros.sort();
    macros.dedup();
    macros
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn test_numeric_macro_vars_only() {
        let found = macros_from_vars(vars(&[
            ("MACRO_deploy", "123456789012345678"),
            ("MACRO_build", "42"),
            ("MACRO_broken", "not-a-number"),
            ("MACRO_", "1"),
            ("PATH", "/usr/bin"),
        ]));
        assert_eq!(found, vec!["build".to_string(), "deploy".to_string()]);
    }

    #[test]
    fn test_default_config() {
        let cfg = ServerConfig::default();
        assert_eq!(cfg.bind_addr.to_string(), DEFAULT_BIND);
        assert_eq!(cfg.max_updates, 100);
    }
}
