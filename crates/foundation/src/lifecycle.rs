use serde::{Deserialize, Serialize};

/// Lifecycle of a synchronized entity (layer, analysis node, visualization).
///
/// Every entity starts `Pending` and settles to `Ok` or `Error` once per
/// synchronization or error-reporting pass.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Lifecycle {
    #[default]
    Pending,
    Ok,
    Error,
}

impl Lifecycle {
    pub fn is_pending(self) -> bool {
        self == Lifecycle::Pending
    }

    pub fn is_ok(self) -> bool {
        self == Lifecycle::Ok
    }

    pub fn is_error(self) -> bool {
        self == Lifecycle::Error
    }
}

/// Lifecycle of a legend. Legends use `Success` rather than `Ok`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LegendState {
    #[default]
    Pending,
    Success,
    Error,
}

impl LegendState {
    pub fn is_success(self) -> bool {
        self == LegendState::Success
    }

    pub fn is_error(self) -> bool {
        self == LegendState::Error
    }
}
