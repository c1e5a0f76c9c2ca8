use crate::tree::NodeId;
use thiserror::Error;

/// Failures of structural scope-tree calls.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ScopeError {
    #[error("node {0} does not exist or was removed")]
    NodeNotFound(NodeId),

    #[error("context {context:?} is not visible from node {node}")]
    ContextNotFound { node: NodeId, context: String },
}
