use std::{path::Path, sync::Arc};

use anyhow::{Result, anyhow};
use swc_common::{
    BytePos, FileName, GLOBALS, Globals, SourceMap, Span, Spanned,
    comments::{CommentKind as SwcCommentKind, SingleThreadedComments},
};
use swc_ecma_ast::{
    ArrowExpr, BlockStmt, BlockStmtOrExpr, CallExpr, ClassMethod, Constructor, Expr, FnDecl,
    FnExpr, Function, ModuleDecl, ParenExpr, PrivateMethod, Prop, Stmt,
};
use swc_ecma_parser::{EsSyntax, Parser, StringInput, Syntax, TsSyntax};
use swc_ecma_visit::{Visit, VisitWith};

use super::SyntaxParser;
use crate::core::syntax::{
    Comment, CommentKind, FunctionKind, LineIndex, NodeKind, Position, Range, SyntaxTree,
    TreeBuilder,
};

/// Parser collaborator backed by swc.
#[derive(Debug, Clone, Copy, Default)]
pub struct SwcParser;

impl SyntaxParser for SwcParser {
    fn parse(&self, content: &str, filename: &str) -> Result<SyntaxTree> {
        parse_js_source(content, filename)
    }
}

/// Pick the grammar from the file extension. Plain JavaScript also accepts JSX.
pub fn syntax_for(filename: &str) -> Syntax {
    match Path::new(filename).extension().and_then(|ext| ext.to_str()) {
        Some("ts" | "mts" | "cts") => Syntax::Typescript(TsSyntax {
            tsx: false,
            ..Default::default()
        }),
        Some("tsx") => Syntax::Typescript(TsSyntax {
            tsx: true,
            ..Default::default()
        }),
        _ => Syntax::Es(EsSyntax {
            jsx: true,
            ..Default::default()
        }),
    }
}

/// Parse JavaScript/TypeScript source into a [`SyntaxTree`].
///
/// Recoverable parser errors are reported as failures too: the caller should not
/// rewrite a file swc had to guess its way through.
pub fn parse_js_source(content: &str, filename: &str) -> Result<SyntaxTree> {
    let index = LineIndex::new(content);

    GLOBALS.set(&Globals::new(), || {
        let source_map = Arc::new(SourceMap::default());
        let source_file = source_map.new_source_file(
            FileName::Real(filename.into()).into(),
            content.to_string(),
        );

        // swc drops a leading byte-order mark, positions must still line up with `content`
        let offsets = Offsets {
            base: source_file.start_pos.0,
            shift: content.len().saturating_sub(source_file.src.len()),
        };

        let comments = SingleThreadedComments::default();
        let mut parser = Parser::new(
            syntax_for(filename),
            StringInput::from(&*source_file),
            Some(&comments),
        );

        let program = parser.parse_program().map_err(|e| {
            let position = index.position(offsets.offset(e.span().lo));
            anyhow!("Failed to parse {}:{}: {}", filename, position, e.kind().msg())
        })?;

        if let Some(e) = parser.take_errors().into_iter().next() {
            let position = index.position(offsets.offset(e.span().lo));
            return Err(anyhow!(
                "Failed to parse {}:{}: {}",
                filename,
                position,
                e.kind().msg()
            ));
        }

        let mut lowering = Lowering {
            builder: TreeBuilder::new(),
            index: &index,
            offsets,
            pending_function: None,
        };
        lowering.builder.open(
            NodeKind::Program,
            Range::new(Position::new(1, 1), index.end()),
            None,
            false,
        );
        program.visit_with(&mut lowering);

        let (leading, trailing) = comments.borrow_all();
        let mut swc_comments: Vec<_> = leading
            .iter()
            .chain(trailing.iter())
            .flat_map(|(_, cmts)| cmts.iter())
            .collect();
        swc_comments.sort_by_key(|cmt| cmt.span.lo);
        swc_comments.dedup_by_key(|cmt| cmt.span.lo);

        for cmt in swc_comments {
            let kind = match cmt.kind {
                SwcCommentKind::Line => CommentKind::Line,
                SwcCommentKind::Block => CommentKind::Block,
            };
            let range = lowering.range(cmt.span);
            lowering.builder.comment(Comment {
                kind,
                text: cmt.text.to_string(),
                range,
            });
        }

        Ok(lowering.builder.finish())
    })
}

#[derive(Debug, Clone, Copy)]
struct Offsets {
    base: u32,
    shift: usize,
}

impl Offsets {
    fn offset(&self, pos: BytePos) -> usize {
        pos.0.saturating_sub(self.base) as usize + self.shift
    }
}

/// Lowers the swc AST into the neutral tree, one node per construct the
/// resolver cares about.
struct Lowering<'a> {
    builder: TreeBuilder,
    index: &'a LineIndex,
    offsets: Offsets,
    /// Kind for the next `Function` visited; set by the construct wrapping it.
    pending_function: Option<FunctionKind>,
}

impl Lowering<'_> {
    fn range(&self, span: Span) -> Range {
        Range::new(
            self.index.position(self.offsets.offset(span.lo)),
            self.index.position(self.offsets.offset(span.hi)),
        )
    }

    fn with_node(
        &mut self,
        kind: NodeKind,
        span: Span,
        body: Option<Range>,
        visit: impl FnOnce(&mut Self),
    ) {
        let synthetic = span.is_dummy();
        let range = if synthetic {
            // No text of its own: sit at the start of the enclosing node.
            let start = self
                .builder
                .current_range()
                .map(|r| r.start)
                .unwrap_or_default();
            Range::new(start, start)
        } else {
            self.range(span)
        };
        self.builder.open(kind, range, body, synthetic);
        visit(self);
        self.builder.close();
    }

    fn block_range(&self, block: &BlockStmt) -> Range {
        self.range(block.span)
    }
}

impl Visit for Lowering<'_> {
    fn visit_stmt(&mut self, node: &Stmt) {
        if let Stmt::Block(_) = node {
            node.visit_children_with(self);
            return;
        }
        self.with_node(NodeKind::Statement, node.span(), None, |v| {
            node.visit_children_with(v)
        });
    }

    fn visit_module_decl(&mut self, node: &ModuleDecl) {
        self.with_node(NodeKind::Statement, node.span(), None, |v| {
            node.visit_children_with(v)
        });
    }

    fn visit_block_stmt(&mut self, node: &BlockStmt) {
        self.with_node(NodeKind::Block, node.span, None, |v| {
            node.visit_children_with(v)
        });
    }

    fn visit_expr(&mut self, node: &Expr) {
        match node {
            // Lowered by their dedicated visitors.
            Expr::Fn(_) | Expr::Arrow(_) | Expr::Paren(_) | Expr::Call(_) => {
                node.visit_children_with(self)
            }
            _ => self.with_node(NodeKind::Expression, node.span(), None, |v| {
                node.visit_children_with(v)
            }),
        }
    }

    fn visit_paren_expr(&mut self, node: &ParenExpr) {
        self.with_node(NodeKind::Paren, node.span, None, |v| {
            node.visit_children_with(v)
        });
    }

    fn visit_call_expr(&mut self, node: &CallExpr) {
        self.with_node(NodeKind::Call, node.span, None, |v| {
            node.visit_children_with(v)
        });
    }

    fn visit_fn_decl(&mut self, node: &FnDecl) {
        self.pending_function = Some(FunctionKind::Declaration);
        self.visit_function(&node.function);
    }

    fn visit_fn_expr(&mut self, node: &FnExpr) {
        self.pending_function = Some(FunctionKind::Expression);
        self.visit_function(&node.function);
    }

    fn visit_function(&mut self, node: &Function) {
        let kind = self
            .pending_function
            .take()
            .unwrap_or(FunctionKind::Expression);
        let body = node.body.as_ref().map(|b| self.block_range(b));
        self.with_node(NodeKind::Function(kind), node.span, body, |v| {
            node.visit_children_with(v)
        });
    }

    fn visit_arrow_expr(&mut self, node: &ArrowExpr) {
        let body = match &*node.body {
            BlockStmtOrExpr::BlockStmt(block) => Some(self.block_range(block)),
            BlockStmtOrExpr::Expr(_) => None,
        };
        self.with_node(
            NodeKind::Function(FunctionKind::Arrow),
            node.span,
            body,
            |v| node.visit_children_with(v),
        );
    }

    fn visit_class_method(&mut self, node: &ClassMethod) {
        self.with_node(NodeKind::Member, node.span, None, |v| {
            v.visit_prop_name(&node.key);
            v.pending_function = Some(FunctionKind::Method);
            v.visit_function(&node.function);
        });
    }

    fn visit_private_method(&mut self, node: &PrivateMethod) {
        self.with_node(NodeKind::Member, node.span, None, |v| {
            v.visit_private_name(&node.key);
            v.pending_function = Some(FunctionKind::Method);
            v.visit_function(&node.function);
        });
    }

    fn visit_constructor(&mut self, node: &Constructor) {
        let body = node.body.as_ref().map(|b| self.block_range(b));
        self.with_node(NodeKind::Member, node.span, None, |v| {
            v.with_node(
                NodeKind::Function(FunctionKind::Method),
                node.span,
                body,
                |v| node.visit_children_with(v),
            );
        });
    }

    fn visit_prop(&mut self, node: &Prop) {
        match node {
            Prop::Shorthand(_) => node.visit_children_with(self),
            Prop::Method(method) => {
                self.with_node(NodeKind::Member, node.span(), None, |v| {
                    v.visit_prop_name(&method.key);
                    v.pending_function = Some(FunctionKind::Method);
                    v.visit_function(&method.function);
                });
            }
            _ => self.with_node(NodeKind::Member, node.span(), None, |v| {
                node.visit_children_with(v)
            }),
        }
    }
}
