//! Three-Address Code

use std::fmt::{self, Display, Formatter};

use crate::listing::{Listing, Position};

use super::ops::{BinOp, UnOp};

pub type TacListing = Listing<TacInstr>;

impl Listing<TacInstr> {
    /// Returns true if any instruction in the listing reads `operand`.
    pub fn is_read(&self, operand: &Operand) -> bool {
        self.iter_instructions().any(|instr| instr.reads_from(operand))
    }

    /// Replace every read of `old` after `position` with `new`.
    pub fn replace_reads_after(&mut self, position: Position, old: &Operand, new: &Operand) {
        for instr in self.iter_instructions_mut().skip(position.below().0) {
            instr.replace_reads(old, new);
        }
    }
}

/// A branch target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Label(u32);
impl Label {
    pub fn new(id: u32) -> Self {
        Self(id)
    }
}
impl Display for Label {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "label{}", self.0)
    }
}

/// A TAC operand. Operands are plain values: two operands refer to the same
/// storage exactly when they compare equal.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    /// A variable from the source program. Struct members are flattened to
    /// `<struct>_<member>`.
    Variable(String),
    IntConst(i32),
    FloatConst(f32),
    /// A generated, temporary name.
    Temp(u32),
}
impl Operand {
    pub fn is_literal(&self) -> bool {
        matches!(self, Self::IntConst(_) | Self::FloatConst(_))
    }

    pub fn is_temp(&self) -> bool {
        matches!(self, Self::Temp(_))
    }

    pub fn is_variable(&self) -> bool {
        matches!(self, Self::Variable(_))
    }
}
impl Display for Operand {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            Self::Variable(name) => f.write_str(name),
            Self::IntConst(value) => write!(f, "#{}", value),
            Self::FloatConst(value) => write!(f, "#{:.5}", value),
            Self::Temp(id) => write!(f, "t{}", id),
        }
    }
}

/// A single TAC instruction.
#[derive(Debug, Clone, PartialEq)]
pub enum TacInstr {
    /// `target := value`
    Assign(Operand, Operand),
    /// `target := lhs op rhs`
    Bin(Operand, BinOp, Operand, Operand),
    /// `target := op value`
    Unary(Operand, UnOp, Operand),
    /// Jump to a label.
    Goto(Label),
    /// Jump if a value is non-zero.
    IfGoto(Operand, Label),
    /// A label which can be jumped to.
    Label(Label),
    /// Call a function, consuming the arguments pushed before it.
    Call(Operand, String),
    /// Push an argument for the next call.
    Arg(Operand),
    /// Bind the next incoming argument to a parameter.
    Param(Operand),
    /// Return from a function body, optionally with a value.
    Return(Option<Operand>),
    /// `target := array[index]`
    ArrayLoad(Operand, Operand, Operand),
    /// `array[index] := value`
    ArrayStore(Operand, Operand, Operand),
    /// Start of a function body.
    FunctionBegin(String),
    /// End of a function body.
    FunctionEnd(String),
}
impl TacInstr {
    /// The operand this instruction assigns to, if any.
    pub fn write(&self) -> Option<&Operand> {
        match self {
            Self::Assign(t, _) => Some(t),
            Self::Bin(t, _, _, _) => Some(t),
            Self::Unary(t, _, _) => Some(t),
            Self::Call(t, _) => Some(t),
            Self::Param(t) => Some(t),
            Self::ArrayLoad(t, _, _) => Some(t),
            Self::Goto(_)
            | Self::IfGoto(_, _)
            | Self::Label(_)
            | Self::Arg(_)
            | Self::Return(_)
            | Self::ArrayStore(_, _, _)
            | Self::FunctionBegin(_)
            | Self::FunctionEnd(_) => None,
        }
    }

    /// The operands this instruction reads.
    pub fn reads(&self) -> Vec<&Operand> {
        match self {
            Self::Assign(_, v) => vec![v],
            Self::Bin(_, _, lhs, rhs) => vec![lhs, rhs],
            Self::Unary(_, _, v) => vec![v],
            Self::IfGoto(v, _) => vec![v],
            Self::Arg(v) => vec![v],
            Self::Return(v) => v.iter().collect(),
            Self::ArrayLoad(_, array, index) => vec![array, index],
            Self::ArrayStore(array, index, value) => vec![array, index, value],
            Self::Goto(_)
            | Self::Label(_)
            | Self::Call(_, _)
            | Self::Param(_)
            | Self::FunctionBegin(_)
            | Self::FunctionEnd(_) => vec![],
        }
    }

    pub fn reads_from(&self, operand: &Operand) -> bool {
        self.reads().into_iter().any(|o| o == operand)
    }

    pub fn writes_to(&self, operand: &Operand) -> bool {
        self.write() == Some(operand)
    }

    /// Replace all reads of `old` in this instruction with `new`.
    /// Returns the number of operand slots that were rewritten.
    pub fn replace_reads(&mut self, old: &Operand, new: &Operand) -> usize {
        fn try_replace(slot: &mut Operand, old: &Operand, new: &Operand) -> usize {
            if slot == old {
                *slot = new.clone();
                1
            } else {
                0
            }
        }

        match self {
            Self::Assign(_, v) | Self::Unary(_, _, v) | Self::IfGoto(v, _) | Self::Arg(v) => {
                try_replace(v, old, new)
            }
            Self::Bin(_, _, lhs, rhs) => try_replace(lhs, old, new) + try_replace(rhs, old, new),
            Self::Return(Some(v)) => try_replace(v, old, new),
            Self::ArrayLoad(_, array, index) => {
                try_replace(array, old, new) + try_replace(index, old, new)
            }
            Self::ArrayStore(array, index, value) => {
                try_replace(array, old, new)
                    + try_replace(index, old, new)
                    + try_replace(value, old, new)
            }
            Self::Return(None)
            | Self::Goto(_)
            | Self::Label(_)
            | Self::Call(_, _)
            | Self::Param(_)
            | Self::FunctionBegin(_)
            | Self::FunctionEnd(_) => 0,
        }
    }

    /// Returns true if this instruction has an effect other than assigning
    /// its result. Such instructions are never removed as dead code.
    pub fn has_side_effect(&self) -> bool {
        match self {
            Self::Assign(_, _) | Self::Bin(_, _, _, _) | Self::Unary(_, _, _) => false,
            Self::ArrayLoad(_, _, _) => false,
            Self::Goto(_)
            | Self::IfGoto(_, _)
            | Self::Label(_)
            | Self::Call(_, _)
            | Self::Arg(_)
            | Self::Param(_)
            | Self::Return(_)
            | Self::ArrayStore(_, _, _)
            | Self::FunctionBegin(_)
            | Self::FunctionEnd(_) => true,
        }
    }

    /// Returns true for instructions control may enter from elsewhere:
    /// labels and function boundaries. Forward scans stop here.
    pub fn is_boundary(&self) -> bool {
        matches!(
            self,
            Self::Label(_) | Self::FunctionBegin(_) | Self::FunctionEnd(_)
        )
    }

    /// Returns true for instructions that may leave the straight-line sequence.
    pub fn is_control_transfer(&self) -> bool {
        matches!(self, Self::Goto(_) | Self::IfGoto(_, _) | Self::Return(_))
    }

    pub fn is_call(&self) -> bool {
        matches!(self, Self::Call(_, _))
    }

    pub fn as_assign(&self) -> Option<(&Operand, &Operand)> {
        match self {
            Self::Assign(target, value) => Some((target, value)),
            _ => None,
        }
    }

    /// Matches `target := literal`.
    pub fn as_constant_assign(&self) -> Option<(&Operand, &Operand)> {
        self.as_assign().filter(|(_, value)| value.is_literal())
    }

    pub fn as_bin(&self) -> Option<(&Operand, BinOp, &Operand, &Operand)> {
        match self {
            Self::Bin(target, op, lhs, rhs) => Some((target, *op, lhs, rhs)),
            _ => None,
        }
    }

    pub fn as_array_load(&self) -> Option<(&Operand, &Operand, &Operand)> {
        match self {
            Self::ArrayLoad(target, array, index) => Some((target, array, index)),
            _ => None,
        }
    }

    /// Rewrite a binary or unary operation over literals into an assignment of
    /// its value. Returns true if the instruction was folded.
    pub fn fold(&mut self) -> bool {
        let value = match self {
            Self::Bin(_, op, lhs, rhs) => op.fold(lhs, rhs),
            Self::Unary(_, op, operand) => op.fold(operand),
            _ => None,
        };

        match (value, self.write().cloned()) {
            (Some(value), Some(target)) => {
                *self = Self::Assign(target, value);
                true
            }
            _ => false,
        }
    }
}
impl Display for TacInstr {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            Self::Assign(target, value) => write!(f, "{} := {}", target, value),
            Self::Bin(target, op, lhs, rhs) => write!(f, "{} := {} {} {}", target, lhs, op, rhs),
            Self::Unary(target, op, value) => write!(f, "{} := {}{}", target, op, value),
            Self::Goto(label) => write!(f, "GOTO {}", label),
            Self::IfGoto(cond, label) => write!(f, "IF {} GOTO {}", cond, label),
            Self::Label(label) => write!(f, "{} :", label),
            Self::Call(target, function) => write!(f, "{} := CALL {}", target, function),
            Self::Arg(value) => write!(f, "ARG {}", value),
            Self::Param(param) => write!(f, "PARAM {}", param),
            Self::Return(None) => f.write_str("RETURN"),
            Self::Return(Some(value)) => write!(f, "RETURN {}", value),
            Self::ArrayLoad(target, array, index) => {
                write!(f, "{} := {}[{}]", target, array, index)
            }
            Self::ArrayStore(array, index, value) => {
                write!(f, "{}[{}] := {}", array, index, value)
            }
            Self::FunctionBegin(name) => write!(f, "FUNCTION {} :", name),
            Self::FunctionEnd(name) => write!(f, "END FUNCTION {}", name),
        }
    }
}

pub struct LineNumberIter<I, F> {
    iter: I,
    f: F,
}
impl<A, B, I, F> Iterator for LineNumberIter<I, F>
where
    I: Iterator<Item = (Position, A)>,
    F: FnMut(A) -> Option<B>,
{
    type Item = (Position, B);

    fn next(&mut self) -> Option<(Position, B)> {
        self.iter
            .find_map(|(line, a)| (self.f)(a).map(|x| (line, x)))
    }
}

/// Filter and destructure the lines of a listing in one step, keeping their
/// positions. For example, `iter_lines().match_instruction(TacInstr::as_assign)`.
pub trait MatchInstruction<A, I> {
    fn match_instruction<P, B>(self, pred: P) -> LineNumberIter<I, P>
    where
        P: Fn(A) -> Option<B>;
}
impl<'a, I> MatchInstruction<&'a TacInstr, I> for I
where
    I: Iterator<Item = (Position, &'a TacInstr)>,
{
    fn match_instruction<P, B>(self, pred: P) -> LineNumberIter<I, P>
    where
        P: Fn(&'a TacInstr) -> Option<B>,
    {
        LineNumberIter {
            iter: self,
            f: pred,
        }
    }
}
