use std::env;

use foundation::Protocol;
use serde::{Deserialize, Serialize};

/// Environment variable holding the transport protocol (`http`, `https`, `file:`...).
pub const PROTOCOL_ENV: &str = "MAPSYNC_PROTOCOL";

/// Command-line flag overriding [`PROTOCOL_ENV`].
pub const PROTOCOL_FLAG: &str = "--protocol";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// `origin` names where the value came from: the env var or a CLI flag.
    InvalidProtocol { origin: &'static str, value: String },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::InvalidProtocol { origin, value } => {
                write!(f, "invalid protocol in {origin}: {value:?}")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Engine configuration. Passed in explicitly; nothing is read from ambient state
/// during a pass.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Selects among the protocol-keyed url variants of dataviews and analysis nodes.
    #[serde(default)]
    pub protocol: Protocol,
}

impl SyncConfig {
    pub fn new(protocol: Protocol) -> Self {
        Self { protocol }
    }

    /// Reads [`PROTOCOL_ENV`]; unset means the default (https).
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_protocol_value(env::var(PROTOCOL_ENV).ok().as_deref())
    }

    pub fn from_protocol_value(value: Option<&str>) -> Result<Self, ConfigError> {
        Self::parse_protocol(value, PROTOCOL_ENV)
    }

    /// An explicit `--protocol` flag wins over [`PROTOCOL_ENV`].
    pub fn from_flag_or_env(flag: Option<&str>) -> Result<Self, ConfigError> {
        match flag {
            Some(value) => Self::parse_protocol(Some(value), PROTOCOL_FLAG),
            None => Self::from_env(),
        }
    }

    fn parse_protocol(value: Option<&str>, origin: &'static str) -> Result<Self, ConfigError> {
        let Some(value) = value.filter(|v| !v.trim().is_empty()) else {
            return Ok(Self::default());
        };
        let protocol = Protocol::from_scheme(value).ok_or_else(|| ConfigError::InvalidProtocol {
            origin,
            value: value.to_string(),
        })?;
        Ok(Self { protocol })
    }
}
