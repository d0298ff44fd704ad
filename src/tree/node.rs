use serde::{Deserialize, Serialize};

/// The grammar symbol a syntax tree node was produced for.
///
/// Terminals carry their lexeme in [`Node::value`] where it matters
/// (identifiers, literals, the text of a relational operator). Non-terminals
/// only carry children.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeKind {
    Type,
    Id,
    Int,
    Float,

    Semi,
    Comma,
    AssignOp,
    RelOp,
    Plus,
    Minus,
    Star,
    Div,
    And,
    Or,
    Dot,
    Not,
    Lp,
    Rp,
    Lb,
    Rb,
    Lc,
    Rc,

    Struct,
    Return,
    If,
    Else,
    While,

    Program,
    ExtDefList,
    ExtDef,
    ExtDecList,
    Specifier,
    StructSpecifier,
    OptTag,
    Tag,
    VarDec,
    FunDec,
    VarList,
    ParamDec,
    CompSt,
    StmtList,
    Stmt,
    DefList,
    Def,
    DecList,
    Dec,
    Exp,
    Args,
}

/// The literal or lexeme attached to a terminal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Payload {
    Int(i32),
    Float(f32),
    Text(String),
}

/// A node in the syntax tree handed over by the parser.
///
/// Productions are not distinguished by type: an `Exp` node for `a + b` and
/// one for `f(a)` differ only in the kinds and number of their children.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub kind: NodeKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Payload>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Node>,
}

impl Node {
    pub fn is(&self, kind: NodeKind) -> bool {
        self.kind == kind
    }

    /// The kind of the child at `index`, if there is one.
    pub fn child_kind(&self, index: usize) -> Option<NodeKind> {
        self.children.get(index).map(|c| c.kind)
    }

    /// The textual payload of this node: an identifier name or operator lexeme.
    pub fn text(&self) -> Option<&str> {
        match &self.value {
            Some(Payload::Text(text)) => Some(text),
            _ => None,
        }
    }

    /// Find the first direct child of the given kind.
    pub fn find_child(&self, kind: NodeKind) -> Option<&Node> {
        self.children.iter().find(|c| c.kind == kind)
    }
}
