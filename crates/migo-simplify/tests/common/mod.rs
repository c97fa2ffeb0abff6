#![allow(dead_code)]

use migo_ir::{Function, Position, Program, Statement};

pub fn func(name: &str, stmts: Vec<Statement>) -> Function {
    let mut f = Function::new(name, Position::none());
    f.add_stmts(stmts);
    f
}

pub fn program(funcs: Vec<Function>) -> Program {
    let mut prog = Program::new();
    for f in funcs {
        prog.add_function(f);
    }
    prog
}

pub fn call(name: &str) -> Statement {
    Statement::call(name, Position::none())
}

pub fn spawn(name: &str) -> Statement {
    Statement::spawn(name, Position::none())
}

pub fn send(chan: &str) -> Statement {
    Statement::send(chan, Position::none())
}

pub fn recv(chan: &str) -> Statement {
    Statement::recv(chan, Position::none())
}

/// Every call or spawn target left anywhere in `prog`.
pub fn all_callees(prog: &Program) -> Vec<String> {
    let mut out = Vec::new();
    for f in prog.functions() {
        migo_ir::statement::walk_stmts(&f.stmts, &mut |s| {
            if let Some(name) = s.callee() {
                out.push(name.to_string());
            }
        });
    }
    out
}
