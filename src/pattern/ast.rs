//! AST types for patterns.

use std::fmt;

/// A pattern tree node. Each node owns its children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// An exact run of characters.
    Literal(String),
    /// Exactly one character of any kind.
    Wildcard,
    /// Children matched in order; never empty.
    Sequence(Vec<Node>),
    /// One or more, greedy.
    Repeated(Box<Node>),
    /// Exactly `count` times.
    Counter { child: Box<Node>, count: usize },
    /// Child matched under ASCII case folding.
    CaseInsensitive(Box<Node>),
    /// Alternation.
    Either(Box<Node>, Box<Node>),
    /// Capture group; `index` is 0-based in order of opening parenthesis.
    Grouping { child: Box<Node>, index: usize },
    /// Whole-pattern wrapper reporting capture `group` (1-based), or the whole match for 0.
    SelectionGroup { child: Box<Node>, group: usize },
}

impl Node {
    /// Number of `Grouping` nodes in this tree.
    pub fn group_count(&self) -> usize {
        match self {
            Node::Literal(_) | Node::Wildcard => 0,
            Node::Sequence(children) => children.iter().map(Node::group_count).sum(),
            Node::Repeated(child)
            | Node::CaseInsensitive(child)
            | Node::Counter { child, .. }
            | Node::SelectionGroup { child, .. } => child.group_count(),
            Node::Grouping { child, .. } => 1 + child.group_count(),
            Node::Either(left, right) => left.group_count() + right.group_count(),
        }
    }

    fn label(&self) -> String {
        match self {
            Node::Literal(text) => format!("Literal {text:?}"),
            Node::Wildcard => "Wildcard".into(),
            Node::Sequence(_) => "Sequence".into(),
            Node::Repeated(_) => "Repeated".into(),
            Node::Counter { count, .. } => format!("Counter {count}"),
            Node::CaseInsensitive(_) => "CaseInsensitive".into(),
            Node::Either(_, _) => "Either".into(),
            Node::Grouping { index, .. } => format!("Grouping {index}"),
            Node::SelectionGroup { group, .. } => format!("SelectionGroup {group}"),
        }
    }

    fn children(&self) -> Vec<&Node> {
        match self {
            Node::Literal(_) | Node::Wildcard => vec![],
            Node::Sequence(children) => children.iter().collect(),
            Node::Repeated(child)
            | Node::CaseInsensitive(child)
            | Node::Counter { child, .. }
            | Node::Grouping { child, .. }
            | Node::SelectionGroup { child, .. } => vec![child.as_ref()],
            Node::Either(left, right) => vec![left.as_ref(), right.as_ref()],
        }
    }

    fn write_tree(&self, f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
        writeln!(f, "{:indent$}{}", "", self.label(), indent = depth * 2)?;
        for child in self.children() {
            child.write_tree(f, depth + 1)?;
        }
        Ok(())
    }
}

/// Indented tree dump, one node per line.
impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_tree(f, 0)
    }
}
