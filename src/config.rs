use std::env;
use std::net::SocketAddr;

use crate::error::ConfigError;

pub const BIND_ADDR_VAR: &str = "TIMETABLE_BIND_ADDR";
pub const SEARCH_BUDGET_VAR: &str = "TIMETABLE_SEARCH_BUDGET";
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8080";

/// Settings for the HTTP service, read from the environment at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    /// Candidate placements one generation may evaluate; `None` is unbounded.
    pub search_budget: Option<u64>,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let bind = lookup(BIND_ADDR_VAR).unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = bind.parse().map_err(|_| ConfigError::InvalidBindAddr {
            var: BIND_ADDR_VAR,
            value: bind.clone(),
        })?;

        let search_budget = match lookup(SEARCH_BUDGET_VAR) {
            None => None,
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(n) if n > 0 => Some(n),
                _ => {
                    return Err(ConfigError::InvalidBudget {
                        var: SEARCH_BUDGET_VAR,
                        value: raw,
                    });
                }
            },
        };

        Ok(ServerConfig {
            bind_addr,
            search_budget,
        })
    }
}
