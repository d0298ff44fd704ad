use crate::{
    prelude::*,
    tree::{Node, NodeKind},
};

use super::{label_generator::*, name_generator::*, tac::*};

/// Generate a three-address code listing for a program that has passed
/// semantic analysis.
pub fn generate(program: &Node) -> TacListing {
    TacGenerator::generate(program)
}

pub(super) struct TacGenerator {
    pub(super) listing: TacListing,
    pub(super) name_generator: NameGenerator,
    pub(super) label_generator: LabelGenerator,
}
impl TacGenerator {
    pub(super) fn new() -> Self {
        Self {
            listing: TacListing::new(),
            name_generator: NameGenerator::new(),
            label_generator: LabelGenerator::new(),
        }
    }

    /// Generate a three-address code listing for a program.
    fn generate(program: &Node) -> TacListing {
        let mut tac = Self::new();

        for ext_def_list in program
            .children
            .iter()
            .filter(|c| c.is(NodeKind::ExtDefList))
        {
            for ext_def in list_items(ext_def_list, NodeKind::ExtDef) {
                tac.lower_ext_def(ext_def);
            }
        }

        debug!("Generated {} instructions", tac.listing.len());
        tac.listing
    }

    /// Lower a top-level definition. Only function definitions produce code;
    /// global variables and struct definitions have no runtime behaviour here.
    fn lower_ext_def(&mut self, ext_def: &Node) {
        match (
            ext_def.find_child(NodeKind::FunDec),
            ext_def.find_child(NodeKind::CompSt),
        ) {
            (Some(fun_dec), Some(body)) => self.lower_function(fun_dec, body),
            (Some(_), None) => trace!("Skipping function declaration without a body"),
            _ => (),
        }
    }

    /// Lower a function definition: `FUNCTION f :`, its parameters, its body
    /// and `END FUNCTION f`.
    fn lower_function(&mut self, fun_dec: &Node, body: &Node) {
        let Some(name) = fun_dec
            .children
            .first()
            .filter(|n| n.is(NodeKind::Id))
            .and_then(Node::text)
        else {
            trace!("Skipping function declaration without a name");
            return;
        };
        let name = name.to_string();

        self.emit(TacInstr::FunctionBegin(name.clone()));

        if let Some(var_list) = fun_dec.find_child(NodeKind::VarList) {
            for param_dec in list_items(var_list, NodeKind::ParamDec) {
                let param = param_dec
                    .find_child(NodeKind::VarDec)
                    .and_then(declared_name);
                if let Some(param) = param {
                    self.emit(TacInstr::Param(Operand::Variable(param.to_string())));
                }
            }
        }

        self.lower_comp_st(body);
        self.emit(TacInstr::FunctionEnd(name));
    }

    /// Lower a compound statement: its local definitions, then its statements.
    fn lower_comp_st(&mut self, comp_st: &Node) {
        for child in &comp_st.children {
            match child.kind {
                NodeKind::DefList => {
                    for def in list_items(child, NodeKind::Def) {
                        self.lower_def(def);
                    }
                }
                NodeKind::StmtList => {
                    for stmt in list_items(child, NodeKind::Stmt) {
                        self.lower_stmt(stmt);
                    }
                }
                _ => (),
            }
        }
    }

    /// Lower a local definition. Only declarations with an initialiser emit code.
    fn lower_def(&mut self, def: &Node) {
        let Some(dec_list) = def.find_child(NodeKind::DecList) else {
            return;
        };

        for dec in list_items(dec_list, NodeKind::Dec) {
            if let [var_dec, assign, init] = dec.children.as_slice() {
                if !assign.is(NodeKind::AssignOp) {
                    continue;
                }
                if let Some(name) = declared_name(var_dec) {
                    self.lower_store(Operand::Variable(name.to_string()), init);
                }
            }
        }
    }

    /// Lower a statement.
    fn lower_stmt(&mut self, stmt: &Node) {
        let Some(first) = stmt.children.first() else {
            return;
        };

        match first.kind {
            NodeKind::Exp => {
                self.lower_expr(first);
            }
            NodeKind::CompSt => self.lower_comp_st(first),
            NodeKind::Return => {
                let value = stmt
                    .children
                    .get(1)
                    .filter(|c| c.is(NodeKind::Exp))
                    .and_then(|e| self.lower_expr(e));
                self.emit(TacInstr::Return(value));
            }
            NodeKind::If => match stmt.children.as_slice() {
                [_, _, cond, _, then] => self.lower_if(cond, then),
                [_, _, cond, _, then, els, otherwise] if els.is(NodeKind::Else) => {
                    self.lower_if_else(cond, then, otherwise)
                }
                _ => trace!("Skipping malformed if-statement"),
            },
            NodeKind::While => match stmt.children.as_slice() {
                [_, _, cond, _, body] => self.lower_while(cond, body),
                _ => trace!("Skipping malformed while-statement"),
            },
            other => trace!("Skipping statement starting with {:?}", other),
        }
    }

    /// Lower an if-statement without an else branch.
    fn lower_if(&mut self, cond: &Node, then: &Node) {
        let then_lbl = self.label_generator.next_label();
        let after_lbl = self.label_generator.next_label();

        self.lower_cond(cond, then_lbl, after_lbl);
        self.emit(TacInstr::Label(then_lbl));
        self.lower_stmt(then);
        self.emit(TacInstr::Label(after_lbl));
    }

    /// Lower an if-statement with an else branch.
    fn lower_if_else(&mut self, cond: &Node, then: &Node, otherwise: &Node) {
        let then_lbl = self.label_generator.next_label();
        let else_lbl = self.label_generator.next_label();
        let end_lbl = self.label_generator.next_label();

        self.lower_cond(cond, then_lbl, else_lbl);
        self.emit(TacInstr::Label(then_lbl));
        self.lower_stmt(then);
        self.emit(TacInstr::Goto(end_lbl));
        self.emit(TacInstr::Label(else_lbl));
        self.lower_stmt(otherwise);
        self.emit(TacInstr::Label(end_lbl));
    }

    /// Lower a while-loop. The condition is tested at the top of every iteration.
    fn lower_while(&mut self, cond: &Node, body: &Node) {
        let top_lbl = self.label_generator.next_label();
        let body_lbl = self.label_generator.next_label();
        let after_lbl = self.label_generator.next_label();

        self.emit(TacInstr::Label(top_lbl));
        self.lower_cond(cond, body_lbl, after_lbl);
        self.emit(TacInstr::Label(body_lbl));
        self.lower_stmt(body);
        self.emit(TacInstr::Goto(top_lbl));
        self.emit(TacInstr::Label(after_lbl));
    }

    /// Emit an instruction, adding it to the listing.
    pub(super) fn emit(&mut self, instr: TacInstr) {
        trace!("Emit {}", instr);
        self.listing.push(instr);
    }
}

/// Collect the items of a list node in source order. Lists are right-recursive
/// (`L -> item L`, `L -> item COMMA L`) but may also arrive flattened.
pub(super) fn list_items(list: &Node, item: NodeKind) -> Vec<&Node> {
    let mut items = vec![];
    for child in &list.children {
        if child.kind == item {
            items.push(child);
        } else if child.kind == list.kind {
            items.extend(list_items(child, item));
        }
    }
    items
}

/// The identifier declared by a `VarDec`, looking through array dimensions.
fn declared_name(var_dec: &Node) -> Option<&str> {
    let first = var_dec.children.first()?;
    match first.kind {
        NodeKind::Id => first.text(),
        NodeKind::VarDec => declared_name(first),
        _ => None,
    }
}
