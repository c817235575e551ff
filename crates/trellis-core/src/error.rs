use thiserror::Error;

use crate::host::NodeId;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HostError {
    #[error("unknown node {0:?}")]
    UnknownNode(NodeId),
    #[error("node {0:?} is not a container")]
    NotAContainer(NodeId),
    #[error("child index {index} out of bounds for {parent:?} (len {len})")]
    IndexOutOfBounds {
        parent: NodeId,
        index: usize,
        len: usize,
    },
    #[error("reorder list does not match the children of {0:?}")]
    ReorderMismatch(NodeId),
}
