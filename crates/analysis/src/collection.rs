use foundation::AnalysisId;
use serde::Serialize;

use crate::node::AnalysisNode;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnalysisCollectionError {
    DuplicateId(AnalysisId),
}

impl std::fmt::Display for AnalysisCollectionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AnalysisCollectionError::DuplicateId(id) => {
                write!(f, "duplicate analysis node id: {id}")
            }
        }
    }
}

impl std::error::Error for AnalysisCollectionError {}

/// Flat view over every analysis node known to the client.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct AnalysisCollection {
    nodes: Vec<AnalysisNode>,
}

impl AnalysisCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, node: AnalysisNode) -> Result<(), AnalysisCollectionError> {
        if self.get(node.id()).is_some() {
            return Err(AnalysisCollectionError::DuplicateId(node.id().clone()));
        }
        self.nodes.push(node);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn get(&self, id: &AnalysisId) -> Option<&AnalysisNode> {
        self.nodes.iter().find(|n| n.id() == id)
    }

    pub fn get_mut(&mut self, id: &AnalysisId) -> Option<&mut AnalysisNode> {
        self.nodes.iter_mut().find(|n| n.id() == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &AnalysisNode> {
        self.nodes.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut AnalysisNode> {
        self.nodes.iter_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::{AnalysisCollection, AnalysisCollectionError};
    use crate::node::AnalysisNode;
    use foundation::AnalysisId;

    #[test]
    fn finds_nodes_by_id() {
        let mut nodes = AnalysisCollection::new();
        nodes.add(AnalysisNode::new("a0", "source")).unwrap();
        nodes.add(AnalysisNode::new("a1", "buffer")).unwrap();
        assert_eq!(nodes.len(), 2);
        assert_eq!(nodes.get(&AnalysisId::from("a1")).map(|n| n.kind()), Some("buffer"));
        assert!(nodes.get(&AnalysisId::from("zz")).is_none());
    }

    #[test]
    fn rejects_duplicates() {
        let mut nodes = AnalysisCollection::new();
        nodes.add(AnalysisNode::new("a0", "source")).unwrap();
        assert_eq!(
            nodes.add(AnalysisNode::new("a0", "buffer")),
            Err(AnalysisCollectionError::DuplicateId(AnalysisId::from("a0")))
        );
    }
}
