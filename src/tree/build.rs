//! Shorthand constructors for syntax trees in the shape the parser builds them.

use super::{Node, NodeKind, NodeKind::*, Payload};

impl Node {
    /// Construct a non-terminal.
    pub fn new(kind: NodeKind, children: Vec<Node>) -> Self {
        Self {
            kind,
            value: None,
            children,
        }
    }

    /// Construct a terminal without a payload, such as `(` or `+`.
    pub fn token(kind: NodeKind) -> Self {
        Self::new(kind, vec![])
    }

    pub fn id<S: Into<String>>(name: S) -> Self {
        Self {
            kind: Id,
            value: Some(Payload::Text(name.into())),
            children: vec![],
        }
    }

    pub fn int(value: i32) -> Self {
        Self {
            kind: Int,
            value: Some(Payload::Int(value)),
            children: vec![],
        }
    }

    pub fn float(value: f32) -> Self {
        Self {
            kind: Float,
            value: Some(Payload::Float(value)),
            children: vec![],
        }
    }

    pub fn relop<S: Into<String>>(text: S) -> Self {
        Self {
            kind: RelOp,
            value: Some(Payload::Text(text.into())),
            children: vec![],
        }
    }
}

pub fn exp(children: Vec<Node>) -> Node {
    Node::new(Exp, children)
}

/// `Exp -> ID`
pub fn var(name: &str) -> Node {
    exp(vec![Node::id(name)])
}

/// `Exp -> INT`
pub fn num(value: i32) -> Node {
    exp(vec![Node::int(value)])
}

/// `Exp -> FLOAT`
pub fn real(value: f32) -> Node {
    exp(vec![Node::float(value)])
}

pub fn bin(lhs: Node, op: Node, rhs: Node) -> Node {
    exp(vec![lhs, op, rhs])
}

pub fn add(lhs: Node, rhs: Node) -> Node {
    bin(lhs, Node::token(Plus), rhs)
}

pub fn sub(lhs: Node, rhs: Node) -> Node {
    bin(lhs, Node::token(Minus), rhs)
}

pub fn mul(lhs: Node, rhs: Node) -> Node {
    bin(lhs, Node::token(Star), rhs)
}

pub fn div(lhs: Node, rhs: Node) -> Node {
    bin(lhs, Node::token(Div), rhs)
}

pub fn rel(lhs: Node, op: &str, rhs: Node) -> Node {
    bin(lhs, Node::relop(op), rhs)
}

pub fn and(lhs: Node, rhs: Node) -> Node {
    bin(lhs, Node::token(And), rhs)
}

pub fn or(lhs: Node, rhs: Node) -> Node {
    bin(lhs, Node::token(Or), rhs)
}

pub fn assign(lhs: Node, rhs: Node) -> Node {
    bin(lhs, Node::token(AssignOp), rhs)
}

pub fn neg(operand: Node) -> Node {
    exp(vec![Node::token(Minus), operand])
}

pub fn not(operand: Node) -> Node {
    exp(vec![Node::token(Not), operand])
}

pub fn paren(inner: Node) -> Node {
    exp(vec![Node::token(Lp), inner, Node::token(Rp)])
}

/// `Exp -> Exp DOT ID`
pub fn member(target: Node, field: &str) -> Node {
    exp(vec![target, Node::token(Dot), Node::id(field)])
}

/// `Exp -> Exp LB Exp RB`
pub fn index(array: Node, idx: Node) -> Node {
    exp(vec![array, Node::token(Lb), idx, Node::token(Rb)])
}

/// `Exp -> ID LP Args RP | ID LP RP`
pub fn call(name: &str, args: Vec<Node>) -> Node {
    let mut children = vec![Node::id(name), Node::token(Lp)];
    if !args.is_empty() {
        children.push(separated_list(Args, args));
    }
    children.push(Node::token(Rp));
    exp(children)
}

/// `Stmt -> Exp SEMI`
pub fn expr_stmt(expr: Node) -> Node {
    Node::new(Stmt, vec![expr, Node::token(Semi)])
}

/// `Stmt -> RETURN Exp SEMI`
pub fn ret(expr: Option<Node>) -> Node {
    let mut children = vec![Node::token(Return)];
    children.extend(expr);
    children.push(Node::token(Semi));
    Node::new(Stmt, children)
}

/// `Stmt -> IF LP Exp RP Stmt`
pub fn if_stmt(cond: Node, then: Node) -> Node {
    Node::new(
        Stmt,
        vec![
            Node::token(If),
            Node::token(Lp),
            cond,
            Node::token(Rp),
            then,
        ],
    )
}

/// `Stmt -> IF LP Exp RP Stmt ELSE Stmt`
pub fn if_else(cond: Node, then: Node, otherwise: Node) -> Node {
    Node::new(
        Stmt,
        vec![
            Node::token(If),
            Node::token(Lp),
            cond,
            Node::token(Rp),
            then,
            Node::token(Else),
            otherwise,
        ],
    )
}

/// `Stmt -> WHILE LP Exp RP Stmt`
pub fn while_stmt(cond: Node, body: Node) -> Node {
    Node::new(
        Stmt,
        vec![
            Node::token(While),
            Node::token(Lp),
            cond,
            Node::token(Rp),
            body,
        ],
    )
}

/// `CompSt -> LC DefList StmtList RC`
pub fn comp_st(defs: Vec<Node>, stmts: Vec<Node>) -> Node {
    Node::new(
        CompSt,
        vec![
            Node::token(Lc),
            recursive_list(DefList, defs),
            recursive_list(StmtList, stmts),
            Node::token(Rc),
        ],
    )
}

/// `Stmt -> CompSt`
pub fn block(stmts: Vec<Node>) -> Node {
    Node::new(Stmt, vec![comp_st(vec![], stmts)])
}

fn int_specifier() -> Node {
    Node::new(
        Specifier,
        vec![Node {
            kind: Type,
            value: Some(Payload::Text("int".to_string())),
            children: vec![],
        }],
    )
}

/// `Def -> Specifier DecList SEMI` declaring one `int`, with an optional initialiser.
pub fn def_int(name: &str, init: Option<Node>) -> Node {
    let var_dec = Node::new(VarDec, vec![Node::id(name)]);
    let dec = match init {
        Some(init) => Node::new(Dec, vec![var_dec, Node::token(AssignOp), init]),
        None => Node::new(Dec, vec![var_dec]),
    };
    Node::new(
        Def,
        vec![
            int_specifier(),
            Node::new(DecList, vec![dec]),
            Node::token(Semi),
        ],
    )
}

/// `Def` declaring an `int` array: `int name[size];`
pub fn def_array(name: &str, size: i32) -> Node {
    let var_dec = Node::new(
        VarDec,
        vec![
            Node::new(VarDec, vec![Node::id(name)]),
            Node::token(Lb),
            Node::int(size),
            Node::token(Rb),
        ],
    );
    Node::new(
        Def,
        vec![
            int_specifier(),
            Node::new(DecList, vec![Node::new(Dec, vec![var_dec])]),
            Node::token(Semi),
        ],
    )
}

/// `ExtDef -> Specifier FunDec CompSt` for an `int` function with `int` parameters.
pub fn function(name: &str, params: &[&str], body: Node) -> Node {
    let mut fun_dec = vec![Node::id(name), Node::token(Lp)];
    if !params.is_empty() {
        let param_decs = params
            .iter()
            .map(|p| {
                Node::new(
                    ParamDec,
                    vec![int_specifier(), Node::new(VarDec, vec![Node::id(*p)])],
                )
            })
            .collect();
        fun_dec.push(separated_list(VarList, param_decs));
    }
    fun_dec.push(Node::token(Rp));

    Node::new(ExtDef, vec![int_specifier(), Node::new(FunDec, fun_dec), body])
}

/// `ExtDef -> Specifier ExtDecList SEMI`
pub fn global_int(name: &str) -> Node {
    Node::new(
        ExtDef,
        vec![
            int_specifier(),
            Node::new(ExtDecList, vec![Node::new(VarDec, vec![Node::id(name)])]),
            Node::token(Semi),
        ],
    )
}

pub fn program(ext_defs: Vec<Node>) -> Node {
    Node::new(Program, vec![recursive_list(ExtDefList, ext_defs)])
}

/// Build `L -> item L | ε` for a list without separators.
fn recursive_list(kind: NodeKind, mut items: Vec<Node>) -> Node {
    if items.is_empty() {
        return Node::new(kind, vec![]);
    }
    let head = items.remove(0);
    Node::new(kind, vec![head, recursive_list(kind, items)])
}

/// Build `L -> item COMMA L | item` for a comma-separated list.
fn separated_list(kind: NodeKind, mut items: Vec<Node>) -> Node {
    let head = items.remove(0);
    if items.is_empty() {
        Node::new(kind, vec![head])
    } else {
        Node::new(
            kind,
            vec![head, Node::token(Comma), separated_list(kind, items)],
        )
    }
}
