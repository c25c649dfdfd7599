//! Comment association and annotated-function resolution.
//!
//! A marker comment annotates the first node that follows it inside its enclosing
//! node. That node is only the starting point: the function that receives the
//! directive is found by scanning forward from it, skipping generated wrapper nodes
//! when the comment sits directly in a block or program.
//!
//! ```js
//! /** @ngInject */
//! var factory = function ($http) { ... };   // annotates the function expression
//! ```

use std::fmt;

use crate::core::syntax::{NodeId, SyntaxNode, SyntaxTree};

/// Side table linking each comment (by index) to the node it annotates.
///
/// Kept apart from the tree so comments and nodes never reference each other.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Annotations {
    links: Vec<Option<NodeId>>,
}

impl Annotations {
    /// Associate every comment of `tree` with the node that follows it.
    pub fn associate(tree: &SyntaxTree) -> Self {
        let links = tree
            .comments
            .iter()
            .map(|comment| {
                let enclosing = tree.enclosing(&comment.range)?;
                tree.descendants(enclosing)
                    .filter(|id| tree.node(*id).range.start >= comment.range.end)
                    .min_by_key(|id| (tree.node(*id).range.start, id.0))
            })
            .collect();
        Self { links }
    }

    /// The node annotated by comment `index`, if any.
    pub fn annotates(&self, index: usize) -> Option<NodeId> {
        self.links.get(index).copied().flatten()
    }
}

/// Why a marker comment has no function to annotate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnresolvedReason {
    /// Nothing follows the comment in its enclosing scope.
    NothingFollows,
    /// Code follows, but no function that can hold the directive.
    NoFunction,
}

impl fmt::Display for UnresolvedReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnresolvedReason::NothingFollows => write!(f, "no code follows the comment"),
            UnresolvedReason::NoFunction => write!(f, "no function follows the comment"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    Resolved(NodeId),
    Unresolved(UnresolvedReason),
}

/// Resolves marker comments to the function they annotate.
pub struct Resolver<'a> {
    tree: &'a SyntaxTree,
    annotations: &'a Annotations,
    is_generated: &'a dyn Fn(&SyntaxNode) -> bool,
}

impl<'a> Resolver<'a> {
    pub fn new(
        tree: &'a SyntaxTree,
        annotations: &'a Annotations,
        is_generated: &'a dyn Fn(&SyntaxNode) -> bool,
    ) -> Self {
        Self {
            tree,
            annotations,
            is_generated,
        }
    }

    pub fn tree(&self) -> &'a SyntaxTree {
        self.tree
    }

    /// Find the function annotated by comment `index`.
    pub fn resolve(&self, index: usize) -> Resolution {
        let Some(annotated) = self.annotations.annotates(index) else {
            return Resolution::Unresolved(UnresolvedReason::NothingFollows);
        };

        self.candidates(annotated)
            .into_iter()
            .find_map(|candidate| {
                self.tree
                    .subtree_in_document_order(candidate)
                    .into_iter()
                    .find(|id| self.tree.is_function_not_iife(*id))
            })
            .map_or(
                Resolution::Unresolved(UnresolvedReason::NoFunction),
                Resolution::Resolved,
            )
    }

    /// Nodes that may contain the annotated function, in document order.
    ///
    /// Inside a block or program this is the annotated node plus any generated
    /// siblings after it, up to and including the first real one.
    fn candidates(&self, annotated: NodeId) -> Vec<NodeId> {
        let parent = self
            .tree
            .node(annotated)
            .parent
            .filter(|p| self.tree.node(*p).is_block_or_program());
        let Some(parent) = parent else {
            return vec![annotated];
        };

        let siblings = &self.tree.node(parent).children;
        let Some(index) = siblings.iter().position(|id| *id == annotated) else {
            return vec![annotated];
        };
        let rest = &siblings[index..];
        let length = rest
            .iter()
            .position(|id| !(self.is_generated)(self.tree.node(*id)))
            .map_or(rest.len(), |i| i + 1);
        rest[..length].to_vec()
    }
}
