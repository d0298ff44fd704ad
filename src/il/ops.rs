//! Operators of the three-address code and their compile-time evaluation.

use std::fmt::{self, Display, Formatter};

use super::Operand;

/// A binary operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Gt,
    Lt,
    Ge,
    Le,
    Eq,
    Ne,
    And,
    Or,
}
impl BinOp {
    /// Parse the lexeme of a relational operator. Only the six relational
    /// symbols are accepted.
    pub fn from_relop(text: &str) -> Option<Self> {
        Some(match text {
            ">" => Self::Gt,
            "<" => Self::Lt,
            ">=" => Self::Ge,
            "<=" => Self::Le,
            "==" => Self::Eq,
            "!=" => Self::Ne,
            _ => return None,
        })
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::Gt => ">",
            Self::Lt => "<",
            Self::Ge => ">=",
            Self::Le => "<=",
            Self::Eq => "==",
            Self::Ne => "!=",
            Self::And => "&&",
            Self::Or => "||",
        }
    }

    /// Evaluate this operator over two literals of the same kind.
    /// Returns `None` if the operands are not both literals, if their kinds
    /// differ, for the logical operators, and for a division that would trap.
    pub fn fold(self, lhs: &Operand, rhs: &Operand) -> Option<Operand> {
        match (lhs, rhs) {
            (Operand::IntConst(l), Operand::IntConst(r)) => {
                self.fold_int(*l, *r).map(Operand::IntConst)
            }
            (Operand::FloatConst(l), Operand::FloatConst(r)) => self.fold_float(*l, *r),
            _ => None,
        }
    }

    fn fold_int(self, l: i32, r: i32) -> Option<i32> {
        Some(match self {
            Self::Add => l.wrapping_add(r),
            Self::Sub => l.wrapping_sub(r),
            Self::Mul => l.wrapping_mul(r),
            Self::Div => l.checked_div(r)?,
            Self::Gt => (l > r) as i32,
            Self::Lt => (l < r) as i32,
            Self::Ge => (l >= r) as i32,
            Self::Le => (l <= r) as i32,
            Self::Eq => (l == r) as i32,
            Self::Ne => (l != r) as i32,
            Self::And | Self::Or => return None,
        })
    }

    fn fold_float(self, l: f32, r: f32) -> Option<Operand> {
        let truth = |b: bool| Some(Operand::IntConst(b as i32));
        match self {
            Self::Add => Some(Operand::FloatConst(l + r)),
            Self::Sub => Some(Operand::FloatConst(l - r)),
            Self::Mul => Some(Operand::FloatConst(l * r)),
            Self::Div if r == 0.0 => None,
            Self::Div => Some(Operand::FloatConst(l / r)),
            Self::Gt => truth(l > r),
            Self::Lt => truth(l < r),
            Self::Ge => truth(l >= r),
            Self::Le => truth(l <= r),
            Self::Eq => truth(l == r),
            Self::Ne => truth(l != r),
            Self::And | Self::Or => None,
        }
    }
}
impl Display for BinOp {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// A unary operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnOp {
    Neg,
    Not,
}
impl UnOp {
    /// Evaluate this operator over a literal.
    pub fn fold(self, operand: &Operand) -> Option<Operand> {
        match (self, operand) {
            (Self::Neg, Operand::IntConst(v)) => Some(Operand::IntConst(v.wrapping_neg())),
            (Self::Neg, Operand::FloatConst(v)) => Some(Operand::FloatConst(-v)),
            (Self::Not, Operand::IntConst(v)) => Some(Operand::IntConst((*v == 0) as i32)),
            (Self::Not, Operand::FloatConst(v)) => Some(Operand::IntConst((*v == 0.0) as i32)),
            _ => None,
        }
    }
}
impl Display for UnOp {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            Self::Neg => f.write_str("-"),
            Self::Not => f.write_str("!"),
        }
    }
}
