use std::path::PathBuf;

/// A node of the render tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Text(String),
    Sequence(Vec<Node>),
    /// `<? echo query ?>` / `<?= query ?>`
    Interpolation(String),
    /// Guarded branches, first match wins.
    Conditional(Vec<Branch>),
    Loop {
        variable: String,
        source: String,
        body: Box<Node>,
    },
    /// Path of another template, resolved against the including template when possible.
    Include(PathBuf),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Branch {
    pub guard: Guard,
    pub body: Node,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Guard {
    /// `if` / `elsif`: the query result is truthy.
    Truthy(String),
    /// `ifexist`: the query finds anything at all.
    Exists(String),
    /// `else`
    Always,
}

impl Node {
    /// Children of a `Sequence`, empty for every other node.
    pub fn children(&self) -> &[Node] {
        match self {
            Node::Sequence(nodes) => nodes,
            _ => &[],
        }
    }
}
