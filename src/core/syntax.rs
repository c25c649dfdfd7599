//! Parser-neutral syntax tree consumed by the migration engine.
//!
//! Parser collaborators lower their own AST into a [`SyntaxTree`]: an arena of
//! [`SyntaxNode`]s stored in pre-order (document order) plus the file's comments.
//! Every position is 1-based and measured against the unmodified input text.
//!
//! Nodes are addressed by [`NodeId`]. Parent links are plain ids, so there is no
//! ownership cycle between nodes, and comments never point into the arena directly
//! (see `core::resolve::Annotations`).

use std::fmt;

/// A 1-based line and 1-based byte column in the original text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub const fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// A span of the original text. `end` is exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Range {
    pub start: Position,
    pub end: Position,
}

impl Range {
    pub const fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }

    /// True when `other` lies entirely inside this range.
    pub fn contains(&self, other: &Range) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    pub fn is_single_line(&self) -> bool {
        self.start.line == self.end.line
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

/// Index of a node inside its [`SyntaxTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FunctionKind {
    Declaration,
    Expression,
    Arrow,
    Method,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Program,
    Block,
    Statement,
    Expression,
    Paren,
    Call,
    /// Object property or class member.
    Member,
    Function(FunctionKind),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxNode {
    pub kind: NodeKind,
    pub range: Range,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    /// Range of the `{ ... }` body for functions with a block body.
    pub body: Option<Range>,
    /// Introduced by the parser without a textual span of its own.
    pub synthetic: bool,
    /// One past the last pre-order index of this node's subtree.
    subtree_end: usize,
}

impl SyntaxNode {
    pub fn is_block_or_program(&self) -> bool {
        matches!(self.kind, NodeKind::Program | NodeKind::Block)
    }

    /// Functions that can host a directive prologue (they have a block body).
    pub fn is_function(&self) -> bool {
        matches!(self.kind, NodeKind::Function(_)) && self.body.is_some()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentKind {
    /// `// ...`
    Line,
    /// `/* ... */`
    Block,
}

impl CommentKind {
    /// Length of the opening delimiter in bytes.
    pub fn opener_len(self) -> usize {
        2
    }
}

/// A source comment. `text` excludes the delimiters, `range` includes them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    pub kind: CommentKind,
    pub text: String,
    pub range: Range,
}

impl Comment {
    /// Position of the first byte of `text`.
    pub fn text_start(&self) -> Position {
        Position::new(
            self.range.start.line,
            self.range.start.column + self.kind.opener_len(),
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyntaxTree {
    nodes: Vec<SyntaxNode>,
    pub comments: Vec<Comment>,
}

impl SyntaxTree {
    pub fn node(&self, id: NodeId) -> &SyntaxNode {
        &self.nodes[id.0]
    }

    /// All nodes in pre-order.
    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &SyntaxNode)> {
        self.nodes.iter().enumerate().map(|(i, n)| (NodeId(i), n))
    }

    /// Strict descendants of `id`, in pre-order.
    pub fn descendants(&self, id: NodeId) -> impl Iterator<Item = NodeId> + use<> {
        (id.0 + 1..self.nodes[id.0].subtree_end).map(NodeId)
    }

    /// `id` and its descendants ordered by start position.
    ///
    /// Ties keep pre-order, so an outer node comes before an inner node that
    /// starts at the same position.
    pub fn subtree_in_document_order(&self, id: NodeId) -> Vec<NodeId> {
        let mut ids: Vec<NodeId> = std::iter::once(id).chain(self.descendants(id)).collect();
        ids.sort_by_key(|n| (self.node(*n).range.start, n.0));
        ids
    }

    /// Innermost node whose range contains `range`.
    pub fn enclosing(&self, range: &Range) -> Option<NodeId> {
        // Containing nodes form a parent chain, and pre-order visits it outermost first.
        self.nodes()
            .filter(|(_, node)| node.range.contains(range))
            .map(|(id, _)| id)
            .last()
    }

    /// True for a function that is the callee of a call, possibly through parentheses,
    /// e.g. `(function () {})()` or `!function () {}()`.
    pub fn is_immediately_invoked(&self, id: NodeId) -> bool {
        let mut callee = id;
        while let Some(parent) = self.node(callee).parent {
            let parent_node = self.node(parent);
            match parent_node.kind {
                NodeKind::Paren => callee = parent,
                NodeKind::Call => {
                    return parent_node.range.start == self.node(callee).range.start;
                }
                _ => return false,
            }
        }
        false
    }

    pub fn is_function_not_iife(&self, id: NodeId) -> bool {
        self.node(id).is_function() && !self.is_immediately_invoked(id)
    }
}

/// Incremental pre-order construction of a [`SyntaxTree`].
///
/// ```
/// use ngmigrate::core::syntax::{NodeKind, Position, Range, TreeBuilder};
///
/// let whole = Range::new(Position::new(1, 1), Position::new(1, 10));
/// let mut builder = TreeBuilder::new();
/// builder.open(NodeKind::Program, whole, None, false);
/// builder.open(NodeKind::Statement, whole, None, false);
/// builder.close();
/// let tree = builder.finish();
/// assert_eq!(tree.nodes().count(), 2);
/// ```
#[derive(Debug, Default)]
pub struct TreeBuilder {
    nodes: Vec<SyntaxNode>,
    comments: Vec<Comment>,
    stack: Vec<NodeId>,
}

impl TreeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a node as the last child of the currently open node and open it.
    pub fn open(
        &mut self,
        kind: NodeKind,
        range: Range,
        body: Option<Range>,
        synthetic: bool,
    ) -> NodeId {
        let id = NodeId(self.nodes.len());
        let parent = self.stack.last().copied();
        if let Some(parent) = parent {
            self.nodes[parent.0].children.push(id);
        }
        self.nodes.push(SyntaxNode {
            kind,
            range,
            parent,
            children: Vec::new(),
            body,
            synthetic,
            subtree_end: id.0 + 1,
        });
        self.stack.push(id);
        id
    }

    /// Close the most recently opened node.
    pub fn close(&mut self) {
        if let Some(id) = self.stack.pop() {
            self.nodes[id.0].subtree_end = self.nodes.len();
        }
    }

    /// Range of the innermost open node, if any.
    pub fn current_range(&self) -> Option<Range> {
        self.stack.last().map(|id| self.nodes[id.0].range)
    }

    pub fn comment(&mut self, comment: Comment) {
        self.comments.push(comment);
    }

    pub fn finish(mut self) -> SyntaxTree {
        while !self.stack.is_empty() {
            self.close();
        }
        self.comments.sort_by_key(|c| c.range.start);
        SyntaxTree {
            nodes: self.nodes,
            comments: self.comments,
        }
    }
}

/// Maps byte offsets of a text to 1-based positions.
#[derive(Debug, Clone)]
pub struct LineIndex {
    line_starts: Vec<usize>,
    len: usize,
}

impl LineIndex {
    pub fn new(text: &str) -> Self {
        let line_starts = std::iter::once(0)
            .chain(text.match_indices('\n').map(|(i, _)| i + 1))
            .collect();
        Self {
            line_starts,
            len: text.len(),
        }
    }

    pub fn position(&self, offset: usize) -> Position {
        let offset = offset.min(self.len);
        let line = self.line_starts.partition_point(|start| *start <= offset) - 1;
        Position::new(line + 1, offset - self.line_starts[line] + 1)
    }

    /// Position one past the last byte.
    pub fn end(&self) -> Position {
        self.position(self.len)
    }
}
