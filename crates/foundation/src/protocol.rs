use serde::{Deserialize, Serialize};

/// Transport protocol used to pick among protocol-keyed URL variants.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Protocol {
    Http,
    #[default]
    Https,
}

impl Protocol {
    /// Maps a page/location scheme (`"https:"`, `"http"`, `"file:"`) to a protocol.
    ///
    /// `file:` pages (local test runners) fetch over plain http.
    pub fn from_scheme(scheme: &str) -> Option<Self> {
        match scheme.trim().trim_end_matches(':').to_ascii_lowercase().as_str() {
            "http" | "file" => Some(Protocol::Http),
            "https" => Some(Protocol::Https),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Protocol::Http => "http",
            Protocol::Https => "https",
        }
    }
}

impl std::fmt::Display for Protocol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A URL offered by the map service in one variant per protocol.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProtocolUrls {
    pub http: String,
    pub https: String,
}

impl ProtocolUrls {
    pub fn new(http: impl Into<String>, https: impl Into<String>) -> Self {
        Self {
            http: http.into(),
            https: https.into(),
        }
    }

    pub fn resolve(&self, protocol: Protocol) -> &str {
        match protocol {
            Protocol::Http => &self.http,
            Protocol::Https => &self.https,
        }
    }
}
