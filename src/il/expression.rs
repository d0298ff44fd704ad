//! Lowering of expressions and conditions.
//!
//! Expression nodes are not typed per production: the shape of an `Exp` is
//! recognised from the kinds of its children, in a fixed order. Member access
//! has the same shape as a binary operation and is therefore tried first.

use crate::{
    prelude::*,
    tree::{Node, NodeKind, Payload},
};

use super::{
    generator::{list_items, TacGenerator},
    name_generator::NameGenerator,
    ops::{BinOp, UnOp},
    tac::*,
};

impl TacGenerator {
    /// Lower an expression, returning the operand holding its value.
    /// Returns `None` for shapes that are not recognised.
    pub(super) fn lower_expr(&mut self, node: &Node) -> Option<Operand> {
        self.lower_expr_into(node, None)
    }

    /// Lower an expression. If `target` is given, an operation producing a
    /// new value writes it into `target` instead of a fresh temporary.
    fn lower_expr_into(&mut self, node: &Node, target: Option<&Operand>) -> Option<Operand> {
        match (node.kind, &node.value) {
            (NodeKind::Int, Some(Payload::Int(value))) => return Some(Operand::IntConst(*value)),
            (NodeKind::Float, Some(Payload::Float(value))) => {
                return Some(Operand::FloatConst(*value))
            }
            (NodeKind::Id, Some(Payload::Text(name))) => {
                return Some(Operand::Variable(name.clone()))
            }
            _ => (),
        }

        if node.is(NodeKind::Exp) && node.child_kind(1) != Some(NodeKind::AssignOp) {
            if let Some(name) = member_name(node) {
                return Some(Operand::Variable(name));
            }
        }

        match node.children.as_slice() {
            [lp, inner, rp] if lp.is(NodeKind::Lp) && rp.is(NodeKind::Rp) => {
                self.lower_expr_into(inner, target)
            }
            [name, lp, rest @ ..] if name.is(NodeKind::Id) && lp.is(NodeKind::Lp) => {
                let args = rest.first().filter(|a| a.is(NodeKind::Args));
                self.lower_call(name, args, target)
            }
            [lhs, op, rhs, ..] => self.lower_binary(node, lhs, op, rhs, target),
            [op, operand] => {
                let op = match op.kind {
                    NodeKind::Minus => UnOp::Neg,
                    NodeKind::Not => UnOp::Not,
                    _ => {
                        trace!("Unrecognised unary operator {:?}", op.kind);
                        return None;
                    }
                };
                let value = self.lower_expr(operand)?;
                let result = self.result_operand(target);
                self.emit(TacInstr::Unary(result.clone(), op, value));
                Some(result)
            }
            [child] => self.lower_expr_into(child, target),
            _ => {
                trace!("Unrecognised expression shape under {:?}", node.kind);
                None
            }
        }
    }

    /// Lower a node of the shape `(lhs, op, rhs)`.
    fn lower_binary(
        &mut self,
        node: &Node,
        lhs: &Node,
        op: &Node,
        rhs: &Node,
        target: Option<&Operand>,
    ) -> Option<Operand> {
        let op = match op.kind {
            NodeKind::AssignOp => return self.lower_assignment(lhs, rhs),
            NodeKind::Dot => return member_name(node).map(Operand::Variable),
            NodeKind::Lb => {
                let array = self.lower_expr(lhs)?;
                let index = self.lower_expr(rhs)?;
                let result = self.result_operand(target);
                self.emit(TacInstr::ArrayLoad(result.clone(), array, index));
                return Some(result);
            }
            NodeKind::Plus => BinOp::Add,
            NodeKind::Minus => BinOp::Sub,
            NodeKind::Star => BinOp::Mul,
            NodeKind::Div => BinOp::Div,
            NodeKind::And => BinOp::And,
            NodeKind::Or => BinOp::Or,
            NodeKind::RelOp => match op.text().and_then(BinOp::from_relop) {
                Some(op) => op,
                None => {
                    trace!("Unrecognised relational operator {:?}", op.text());
                    return None;
                }
            },
            other => {
                trace!("Unrecognised binary operator {:?}", other);
                return None;
            }
        };

        let lhs = self.lower_expr(lhs)?;
        let rhs = self.lower_expr(rhs)?;
        let result = self.result_operand(target);
        self.emit(TacInstr::Bin(result.clone(), op, lhs, rhs));
        Some(result)
    }

    /// Lower `lhs = rhs`, returning the operand that was assigned to.
    fn lower_assignment(&mut self, lhs: &Node, rhs: &Node) -> Option<Operand> {
        if let Some((array, index)) = array_element(lhs) {
            let array = self.lower_expr(array)?;
            let index = self.lower_expr(index)?;
            let value = self.lower_expr(rhs)?;
            self.emit(TacInstr::ArrayStore(array.clone(), index, value));
            return Some(array);
        }

        let destination = match member_name(lhs) {
            Some(name) => Operand::Variable(name),
            None => self.lower_expr(lhs)?,
        };
        self.lower_store(destination.clone(), rhs);
        Some(destination)
    }

    /// Evaluate `value` into `destination`. A copy is emitted unless an
    /// instruction already wrote the value there, so `x = x` still copies.
    pub(super) fn lower_store(&mut self, destination: Operand, value: &Node) {
        let emitted = self.listing.len();
        match self.lower_expr_into(value, Some(&destination)) {
            Some(value) if value != destination || self.listing.len() == emitted => {
                self.emit(TacInstr::Assign(destination, value));
            }
            Some(_) => (),
            None => trace!("No value to store into {}", destination),
        }
    }

    /// Lower a call. All arguments are evaluated before the first `ARG` is
    /// emitted so that calls nested in arguments do not interleave.
    fn lower_call(
        &mut self,
        name: &Node,
        args: Option<&Node>,
        target: Option<&Operand>,
    ) -> Option<Operand> {
        let function = name.text()?.to_string();

        let values: Vec<_> = args
            .map(|args| list_items(args, NodeKind::Exp))
            .unwrap_or_default()
            .into_iter()
            .filter_map(|arg| self.lower_expr(arg))
            .collect();
        for value in values {
            self.emit(TacInstr::Arg(value));
        }

        let result = self.result_operand(target);
        self.emit(TacInstr::Call(result.clone(), function));
        Some(result)
    }

    fn result_operand(&mut self, target: Option<&Operand>) -> Operand {
        match target {
            Some(target) => target.clone(),
            None => self.name_generator.next_temp(),
        }
    }

    /// Lower a condition into jumping code: control continues at `on_true`
    /// if the condition holds and at `on_false` otherwise.
    pub(super) fn lower_cond(&mut self, cond: &Node, on_true: Label, on_false: Label) {
        match cond.children.as_slice() {
            [lhs, op, rhs] if op.is(NodeKind::And) => {
                let middle = self.label_generator.next_label();
                self.lower_cond(lhs, middle, on_false);
                self.emit(TacInstr::Label(middle));
                self.lower_cond(rhs, on_true, on_false);
            }
            [lhs, op, rhs] if op.is(NodeKind::Or) => {
                let middle = self.label_generator.next_label();
                self.lower_cond(lhs, on_true, middle);
                self.emit(TacInstr::Label(middle));
                self.lower_cond(rhs, on_true, on_false);
            }
            [lp, inner, rp] if lp.is(NodeKind::Lp) && rp.is(NodeKind::Rp) => {
                self.lower_cond(inner, on_true, on_false)
            }
            [inner] if inner.is(NodeKind::Exp) => self.lower_cond(inner, on_true, on_false),
            _ => match self.lower_expr(cond) {
                Some(value) => self.emit_branch(value, on_true, on_false),
                None => trace!("Condition produced no value, no branch emitted"),
            },
        }
    }

    fn emit_branch(&mut self, value: Operand, on_true: Label, on_false: Label) {
        self.emit(TacInstr::IfGoto(value, on_true));
        self.emit(TacInstr::Goto(on_false));
    }
}

/// The flattened variable name for a member access `s.m`, `(s).m` or `s.a.b`.
/// A node wrapping a single expression is looked through.
fn member_name(node: &Node) -> Option<String> {
    match node.children.as_slice() {
        [target, dot, member] if dot.is(NodeKind::Dot) && member.is(NodeKind::Id) => {
            let target = match target.kind {
                NodeKind::Id => target.text()?.to_string(),
                NodeKind::Exp => match target.children.as_slice() {
                    [id] if id.is(NodeKind::Id) => id.text()?.to_string(),
                    _ => member_name(target)?,
                },
                _ => return None,
            };
            Some(NameGenerator::member_name(&target, member.text()?))
        }
        [inner] if inner.is(NodeKind::Exp) => member_name(inner),
        _ => None,
    }
}

/// Split `Exp LB Exp RB` into the array and index expressions.
fn array_element(node: &Node) -> Option<(&Node, &Node)> {
    match node.children.as_slice() {
        [array, lb, index, rb] if lb.is(NodeKind::Lb) && rb.is(NodeKind::Rb) => {
            Some((array, index))
        }
        [inner] if inner.is(NodeKind::Exp) => array_element(inner),
        _ => None,
    }
}
