//! Indented text dump of a syntax tree, one node per line.

use std::fmt::Write;

use crate::node::SyntaxNode;

pub fn dump_tree(root: SyntaxNode<'_>) -> String {
    let mut out = String::new();
    // Explicit stack: operator chains can nest far deeper than the call stack.
    let mut pending = vec![(root, 0usize)];
    while let Some((node, depth)) = pending.pop() {
        let token = node.main_token();
        let _ = writeln!(
            out,
            "{:indent$}{} '{}'",
            "",
            node.kind(),
            token.sanitized_text(),
            indent = depth * 2
        );
        pending.extend(node.children().into_iter().rev().map(|child| (child, depth + 1)));
    }
    out
}
