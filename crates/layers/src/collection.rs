use foundation::LayerId;
use mapservice::ProviderType;
use serde::Serialize;

use crate::layer::LayerEntity;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LayerCollectionError {
    DuplicateId(LayerId),
    /// Local order of one provider type differs from the order sent to the service.
    OrderMismatch {
        provider: ProviderType,
        expected: Vec<LayerId>,
        actual: Vec<LayerId>,
    },
}

impl std::fmt::Display for LayerCollectionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LayerCollectionError::DuplicateId(id) => write!(f, "duplicate layer id: {id}"),
            LayerCollectionError::OrderMismatch {
                provider,
                expected,
                actual,
            } => write!(
                f,
                "{provider} layers out of order: expected {expected:?}, got {actual:?}"
            ),
        }
    }
}

impl std::error::Error for LayerCollectionError {}

/// Ordered set of layer entities.
///
/// Ordering contract:
/// - Insertion order is the local order. The Nth layer of a provider type maps
///   to the Nth layer of that type in an instantiation result.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct LayerCollection {
    layers: Vec<LayerEntity>,
}

impl LayerCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, layer: LayerEntity) -> Result<(), LayerCollectionError> {
        if self.get(layer.id()).is_some() {
            return Err(LayerCollectionError::DuplicateId(layer.id().clone()));
        }
        self.layers.push(layer);
        Ok(())
    }

    pub fn remove(&mut self, id: &LayerId) -> Option<LayerEntity> {
        let pos = self.layers.iter().position(|l| l.id() == id)?;
        Some(self.layers.remove(pos))
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    pub fn get(&self, id: &LayerId) -> Option<&LayerEntity> {
        self.layers.iter().find(|l| l.id() == id)
    }

    pub fn get_mut(&mut self, id: &LayerId) -> Option<&mut LayerEntity> {
        self.layers.iter_mut().find(|l| l.id() == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &LayerEntity> {
        self.layers.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut LayerEntity> {
        self.layers.iter_mut()
    }

    /// Layers of `provider` in local order.
    pub fn of_type(&self, provider: ProviderType) -> impl Iterator<Item = &LayerEntity> {
        self.layers.iter().filter(move |l| l.provider() == provider)
    }

    pub fn of_type_mut(
        &mut self,
        provider: ProviderType,
    ) -> impl Iterator<Item = &mut LayerEntity> {
        self.layers
            .iter_mut()
            .filter(move |l| l.provider() == provider)
    }

    /// Checks that layers of `provider` appear in exactly the `expected` order.
    ///
    /// Run this where the layer definitions are composed for the service; the
    /// synchronization engine relies on the order but cannot detect a mismatch.
    pub fn check_order(
        &self,
        provider: ProviderType,
        expected: &[LayerId],
    ) -> Result<(), LayerCollectionError> {
        let actual: Vec<LayerId> = self.of_type(provider).map(|l| l.id().clone()).collect();
        if actual == expected {
            Ok(())
        } else {
            Err(LayerCollectionError::OrderMismatch {
                provider,
                expected: expected.to_vec(),
                actual,
            })
        }
    }
}
