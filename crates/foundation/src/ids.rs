use serde::{Deserialize, Serialize};

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_string())
            }
        }
    };
}

string_id!(
    /// Client-side identity of a map layer.
    LayerId
);
string_id!(
    /// Client-side identity of a dataview (widget data source).
    DataviewId
);
string_id!(
    /// Identity of an analysis graph node, shared with the map service.
    AnalysisId
);

#[cfg(test)]
mod tests {
    use super::{AnalysisId, LayerId};

    #[test]
    fn ids_serialize_as_plain_strings() {
        let id = LayerId::new("l1");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"l1\"");
        let back: AnalysisId = serde_json::from_str("\"a0\"").unwrap();
        assert_eq!(back.as_str(), "a0");
    }

    #[test]
    fn display_is_the_raw_id() {
        assert_eq!(LayerId::from("layer2").to_string(), "layer2");
    }
}
