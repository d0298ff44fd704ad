//! A reference interpreter for integer three-address code, used to check that
//! optimised listings compute the same results as the unoptimised ones.

use std::{
    collections::{HashMap, VecDeque},
    mem,
};

use thiserror::Error;

use crate::listing::Position;

use super::{ops::BinOp, tac::*};

/// Executing a listing runs out of steps after this many instructions.
const STEP_LIMIT: usize = 1_000_000;

#[derive(Debug, Error, PartialEq)]
pub enum RunError {
    #[error("no function named {0}")]
    UnknownFunction(String),
    #[error("no {0} in the listing")]
    UnknownLabel(Label),
    #[error("execution ran past the end of the listing")]
    FellOffEnd,
    #[error("step limit exceeded")]
    StepLimit,
    #[error("cannot evaluate {0}")]
    Unsupported(String),
}

/// The storage of one function activation.
#[derive(Debug, Default)]
struct Frame {
    variables: HashMap<String, i32>,
    arrays: HashMap<String, HashMap<i32, i32>>,
    temps: HashMap<u32, i32>,
    arguments: VecDeque<i32>,
    pending: Vec<i32>,
}
impl Frame {
    fn value(&self, operand: &Operand) -> Result<i32, RunError> {
        match operand {
            Operand::Variable(name) => Ok(self.variables.get(name).copied().unwrap_or(0)),
            Operand::Temp(id) => Ok(self.temps.get(id).copied().unwrap_or(0)),
            Operand::IntConst(value) => Ok(*value),
            Operand::FloatConst(_) => Err(RunError::Unsupported(operand.to_string())),
        }
    }

    fn set(&mut self, target: &Operand, value: i32) -> Result<(), RunError> {
        match target {
            Operand::Variable(name) => {
                self.variables.insert(name.clone(), value);
            }
            Operand::Temp(id) => {
                self.temps.insert(*id, value);
            }
            _ => return Err(RunError::Unsupported(target.to_string())),
        }
        Ok(())
    }

    fn load(&self, array: &Operand, index: i32) -> Result<i32, RunError> {
        match array {
            Operand::Variable(name) => Ok(self
                .arrays
                .get(name)
                .and_then(|elements| elements.get(&index))
                .copied()
                .unwrap_or(0)),
            _ => Err(RunError::Unsupported(array.to_string())),
        }
    }

    fn store(&mut self, array: &Operand, index: i32, value: i32) -> Result<(), RunError> {
        match array {
            Operand::Variable(name) => {
                self.arrays
                    .entry(name.clone())
                    .or_default()
                    .insert(index, value);
                Ok(())
            }
            _ => Err(RunError::Unsupported(array.to_string())),
        }
    }
}

/// What a function left behind. Temporaries are not part of the outcome, as
/// the optimiser is free to rename or remove them.
#[derive(Debug, PartialEq)]
pub struct Outcome {
    pub value: Option<i32>,
    pub variables: HashMap<String, i32>,
    pub arrays: HashMap<String, HashMap<i32, i32>>,
}
impl Outcome {
    fn new(value: Option<i32>, frame: Frame) -> Self {
        Self {
            value,
            variables: frame.variables,
            arrays: frame.arrays,
        }
    }
}

/// Run the function called `entry` without arguments.
pub fn run(listing: &TacListing, entry: &str) -> Result<Outcome, RunError> {
    Interpreter::new(listing).call(entry, VecDeque::new())
}

struct Interpreter<'l> {
    listing: &'l TacListing,
    labels: HashMap<Label, usize>,
    functions: HashMap<String, usize>,
    steps: usize,
}
impl<'l> Interpreter<'l> {
    fn new(listing: &'l TacListing) -> Self {
        let mut labels = HashMap::new();
        let mut functions = HashMap::new();
        for (position, instr) in listing.iter_lines() {
            match instr {
                TacInstr::Label(label) => {
                    labels.insert(*label, position.0);
                }
                TacInstr::FunctionBegin(name) => {
                    functions.insert(name.clone(), position.0);
                }
                _ => (),
            }
        }

        Self {
            listing,
            labels,
            functions,
            steps: 0,
        }
    }

    fn jump(&self, label: &Label) -> Result<usize, RunError> {
        self.labels
            .get(label)
            .copied()
            .ok_or(RunError::UnknownLabel(*label))
    }

    fn call(&mut self, function: &str, arguments: VecDeque<i32>) -> Result<Outcome, RunError> {
        let listing = self.listing;
        let start = self
            .functions
            .get(function)
            .copied()
            .ok_or_else(|| RunError::UnknownFunction(function.to_string()))?;

        let mut frame = Frame {
            arguments,
            ..Default::default()
        };
        let mut pc = start + 1;

        loop {
            self.steps += 1;
            if self.steps > STEP_LIMIT {
                return Err(RunError::StepLimit);
            }

            let instr = listing.get(Position(pc)).ok_or(RunError::FellOffEnd)?;
            pc += 1;

            match instr {
                TacInstr::Assign(target, value) => {
                    let value = frame.value(value)?;
                    frame.set(target, value)?;
                }
                TacInstr::Bin(target, op, lhs, rhs) => {
                    let lhs = frame.value(lhs)?;
                    let rhs = frame.value(rhs)?;
                    let value = match op {
                        BinOp::And => (lhs != 0 && rhs != 0) as i32,
                        BinOp::Or => (lhs != 0 || rhs != 0) as i32,
                        _ => match op.fold(&Operand::IntConst(lhs), &Operand::IntConst(rhs)) {
                            Some(Operand::IntConst(value)) => value,
                            _ => return Err(RunError::Unsupported(instr.to_string())),
                        },
                    };
                    frame.set(target, value)?;
                }
                TacInstr::Unary(target, op, value) => {
                    let value = match op.fold(&Operand::IntConst(frame.value(value)?)) {
                        Some(Operand::IntConst(value)) => value,
                        _ => return Err(RunError::Unsupported(instr.to_string())),
                    };
                    frame.set(target, value)?;
                }
                TacInstr::Goto(label) => pc = self.jump(label)?,
                TacInstr::IfGoto(cond, label) => {
                    if frame.value(cond)? != 0 {
                        pc = self.jump(label)?;
                    }
                }
                TacInstr::Label(_) => (),
                TacInstr::Call(target, callee) => {
                    let arguments = mem::take(&mut frame.pending).into();
                    let value = self.call(callee, arguments)?.value.unwrap_or(0);
                    frame.set(target, value)?;
                }
                TacInstr::Arg(value) => {
                    let value = frame.value(value)?;
                    frame.pending.push(value);
                }
                TacInstr::Param(param) => {
                    let value = frame.arguments.pop_front().unwrap_or(0);
                    frame.set(param, value)?;
                }
                TacInstr::Return(value) => {
                    let value = value.as_ref().map(|v| frame.value(v)).transpose()?;
                    return Ok(Outcome::new(value, frame));
                }
                TacInstr::ArrayLoad(target, array, index) => {
                    let index = frame.value(index)?;
                    let value = frame.load(array, index)?;
                    frame.set(target, value)?;
                }
                TacInstr::ArrayStore(array, index, value) => {
                    let index = frame.value(index)?;
                    let value = frame.value(value)?;
                    frame.store(array, index, value)?;
                }
                TacInstr::FunctionEnd(_) => return Ok(Outcome::new(None, frame)),
                TacInstr::FunctionBegin(_) => return Err(RunError::FellOffEnd),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn var(name: &str) -> Operand {
        Operand::Variable(name.to_string())
    }

    #[test]
    fn arguments_bind_to_parameters_in_order() {
        let listing: TacListing = vec![
            TacInstr::FunctionBegin("sub".to_string()),
            TacInstr::Param(var("a")),
            TacInstr::Param(var("b")),
            TacInstr::Bin(Operand::Temp(1), BinOp::Sub, var("a"), var("b")),
            TacInstr::Return(Some(Operand::Temp(1))),
            TacInstr::FunctionEnd("sub".to_string()),
            TacInstr::FunctionBegin("main".to_string()),
            TacInstr::Arg(Operand::IntConst(10)),
            TacInstr::Arg(Operand::IntConst(3)),
            TacInstr::Call(Operand::Temp(2), "sub".to_string()),
            TacInstr::Return(Some(Operand::Temp(2))),
            TacInstr::FunctionEnd("main".to_string()),
        ]
        .into();

        assert_eq!(Some(7), run(&listing, "main").unwrap().value);
    }

    #[test]
    fn endless_loop_hits_the_step_limit() {
        let listing: TacListing = vec![
            TacInstr::FunctionBegin("main".to_string()),
            TacInstr::Label(Label::new(1)),
            TacInstr::Goto(Label::new(1)),
            TacInstr::FunctionEnd("main".to_string()),
        ]
        .into();

        assert_eq!(Err(RunError::StepLimit), run(&listing, "main"));
    }

    #[test]
    fn unknown_entry_point_is_an_error() {
        let listing = TacListing::new();

        assert_eq!(
            Err(RunError::UnknownFunction("main".to_string())),
            run(&listing, "main")
        );
    }
}
