use foundation::LayerId;
use mapservice::{DerivationError, ProviderType};

/// Aborts a synchronization pass. Entities updated before the failure keep
/// their new state and the visualization is not marked ok.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncError {
    Derivation(DerivationError),
    /// A local layer has no positional counterpart of its type in the result.
    MissingRemoteLayer {
        layer_id: LayerId,
        provider: ProviderType,
        local_index: usize,
    },
}

impl std::fmt::Display for SyncError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SyncError::Derivation(err) => write!(f, "malformed instantiation result: {err}"),
            SyncError::MissingRemoteLayer {
                layer_id,
                provider,
                local_index,
            } => write!(
                f,
                "no remote {provider} layer for local layer {layer_id} (position {local_index})"
            ),
        }
    }
}

impl std::error::Error for SyncError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SyncError::Derivation(err) => Some(err),
            SyncError::MissingRemoteLayer { .. } => None,
        }
    }
}

impl From<DerivationError> for SyncError {
    fn from(err: DerivationError) -> Self {
        SyncError::Derivation(err)
    }
}
