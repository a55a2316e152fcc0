//! Errors raised by tree mutations.

use thiserror::Error;

use crate::NodeId;

/// A mutation the tree refused to perform.
///
/// Every variant is raised before the tree is touched, so a failed call leaves
/// the tree exactly as it was.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomError {
    /// The id does not name a node of this arena.
    #[error("node {0:?} does not exist in this tree")]
    UnknownNode(NodeId),

    /// [§ 4.2.3](https://dom.spec.whatwg.org/#concept-node-ensure-pre-insertion-validity)
    /// "HierarchyRequestError": the insertion would make a node its own
    /// ancestor, or the parent cannot hold children.
    #[error("cannot insert {node:?} into {parent:?}: hierarchy request error")]
    HierarchyRequest {
        /// The would-be parent.
        parent: NodeId,
        /// The node being inserted.
        node: NodeId,
    },

    /// The reference node is not a child of the given parent.
    #[error("{child:?} is not a child of {parent:?}")]
    NotAChild {
        /// The expected parent.
        parent: NodeId,
        /// The node that was expected to be its child.
        child: NodeId,
    },

    /// A sibling insertion was requested next to a node without a parent.
    #[error("{0:?} has no parent")]
    NoParent(NodeId),

    /// An element-only operation was applied to a non-element node.
    #[error("{0:?} is not an element")]
    NotAnElement(NodeId),
}
