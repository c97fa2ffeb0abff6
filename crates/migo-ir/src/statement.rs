use std::fmt;

use crate::filter_name;
use crate::function::Parameter;
use crate::named_var::NamedVar;
use crate::position::Position;

static NO_POSITION: Position = Position {
    filename: String::new(),
    line: 0,
    column: 0,
};

/// Target and caller-side bindings of a `call` or `spawn`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct CallSite {
    pub name: String,
    pub params: Vec<Parameter>,
    pub pos: Position,
}

impl CallSite {
    pub fn new(name: impl Into<String>, pos: Position) -> Self {
        Self {
            name: name.into(),
            params: Vec::new(),
            pos,
        }
    }

    /// Append bindings to the call, dropping exact duplicates.
    pub fn add_params(&mut self, params: impl IntoIterator<Item = Parameter>) {
        for param in params {
            if !self.params.contains(&param) {
                self.params.push(param);
            }
        }
    }

    pub fn with_params(mut self, params: impl IntoIterator<Item = Parameter>) -> Self {
        self.add_params(params);
        self
    }

    pub fn simple_name(&self) -> String {
        filter_name(&self.name)
    }
}

/// Comma-separated caller-side names, in declaration order.
pub fn caller_params(params: &[Parameter]) -> String {
    params
        .iter()
        .map(|p| p.caller.name())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Comma-separated callee-side names, in declaration order.
pub fn callee_params(params: &[Parameter]) -> String {
    params
        .iter()
        .map(|p| p.callee.name())
        .collect::<Vec<_>>()
        .join(", ")
}

/// A single MiGo statement.
///
/// Branching constructs nest their bodies; a function body is always one
/// linear sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serialize", serde(tag = "kind"))]
pub enum Statement {
    /// Synchronous call of another function.
    Call(CallSite),
    /// Start a new task running another function.
    Spawn(CallSite),
    /// `let var = newchan chan, size`; size 0 is unbuffered.
    NewChan {
        var: NamedVar,
        chan: String,
        size: i64,
        pos: Position,
    },
    Send {
        chan: String,
        pos: Position,
    },
    Recv {
        chan: String,
        pos: Position,
    },
    Close {
        chan: String,
        pos: Position,
    },
    /// Non-deterministic choice, one body per case.
    Select {
        cases: Vec<Vec<Statement>>,
        pos: Position,
    },
    /// Both branches are always present; a missing branch is empty.
    If {
        then_branch: Vec<Statement>,
        else_branch: Vec<Statement>,
    },
    /// One unrolled iteration test of a loop guarded by `cond`.
    IfFor {
        cond: String,
        then_branch: Vec<Statement>,
        else_branch: Vec<Statement>,
    },
    /// Inaction.
    Tau,
    NewMem {
        var: NamedVar,
        pos: Position,
    },
    MemRead {
        name: String,
        pos: Position,
    },
    MemWrite {
        name: String,
        pos: Position,
    },
    NewMutex {
        var: NamedVar,
        pos: Position,
    },
    Lock {
        name: String,
        pos: Position,
    },
    Unlock {
        name: String,
        pos: Position,
    },
    NewRwMutex {
        var: NamedVar,
        pos: Position,
    },
    RLock {
        name: String,
        pos: Position,
    },
    RUnlock {
        name: String,
        pos: Position,
    },
}

impl Statement {
    pub fn call(name: impl Into<String>, pos: Position) -> Self {
        Statement::Call(CallSite::new(name, pos))
    }

    pub fn spawn(name: impl Into<String>, pos: Position) -> Self {
        Statement::Spawn(CallSite::new(name, pos))
    }

    pub fn send(chan: impl Into<String>, pos: Position) -> Self {
        Statement::Send {
            chan: chan.into(),
            pos,
        }
    }

    pub fn recv(chan: impl Into<String>, pos: Position) -> Self {
        Statement::Recv {
            chan: chan.into(),
            pos,
        }
    }

    pub fn close(chan: impl Into<String>, pos: Position) -> Self {
        Statement::Close {
            chan: chan.into(),
            pos,
        }
    }

    pub fn new_chan(var: NamedVar, chan: impl Into<String>, size: i64, pos: Position) -> Self {
        Statement::NewChan {
            var,
            chan: chan.into(),
            size,
            pos,
        }
    }

    pub fn if_else(then_branch: Vec<Statement>, else_branch: Vec<Statement>) -> Self {
        Statement::If {
            then_branch,
            else_branch,
        }
    }

    pub fn if_for(
        cond: impl Into<String>,
        then_branch: Vec<Statement>,
        else_branch: Vec<Statement>,
    ) -> Self {
        Statement::IfFor {
            cond: cond.into(),
            then_branch,
            else_branch,
        }
    }

    /// Source position, or the line-0 sentinel for synthetic statements.
    pub fn position(&self) -> &Position {
        match self {
            Statement::Call(site) | Statement::Spawn(site) => &site.pos,
            Statement::NewChan { pos, .. }
            | Statement::Send { pos, .. }
            | Statement::Recv { pos, .. }
            | Statement::Close { pos, .. }
            | Statement::Select { pos, .. }
            | Statement::NewMem { pos, .. }
            | Statement::MemRead { pos, .. }
            | Statement::MemWrite { pos, .. }
            | Statement::NewMutex { pos, .. }
            | Statement::Lock { pos, .. }
            | Statement::Unlock { pos, .. }
            | Statement::NewRwMutex { pos, .. }
            | Statement::RLock { pos, .. }
            | Statement::RUnlock { pos, .. } => pos,
            Statement::If { .. } | Statement::IfFor { .. } | Statement::Tau => &NO_POSITION,
        }
    }

    pub fn is_tau(&self) -> bool {
        matches!(self, Statement::Tau)
    }

    /// Name of the function a `call` or `spawn` targets.
    pub fn callee(&self) -> Option<&str> {
        match self {
            Statement::Call(site) | Statement::Spawn(site) => Some(&site.name),
            _ => None,
        }
    }

    /// Nested statement sequences, in rendering order.
    pub fn bodies(&self) -> Vec<&Vec<Statement>> {
        match self {
            Statement::Select { cases, .. } => cases.iter().collect(),
            Statement::If {
                then_branch,
                else_branch,
            }
            | Statement::IfFor {
                then_branch,
                else_branch,
                ..
            } => vec![then_branch, else_branch],
            Statement::Call(_)
            | Statement::Spawn(_)
            | Statement::NewChan { .. }
            | Statement::Send { .. }
            | Statement::Recv { .. }
            | Statement::Close { .. }
            | Statement::Tau
            | Statement::NewMem { .. }
            | Statement::MemRead { .. }
            | Statement::MemWrite { .. }
            | Statement::NewMutex { .. }
            | Statement::Lock { .. }
            | Statement::Unlock { .. }
            | Statement::NewRwMutex { .. }
            | Statement::RLock { .. }
            | Statement::RUnlock { .. } => Vec::new(),
        }
    }

    pub fn bodies_mut(&mut self) -> Vec<&mut Vec<Statement>> {
        match self {
            Statement::Select { cases, .. } => cases.iter_mut().collect(),
            Statement::If {
                then_branch,
                else_branch,
            }
            | Statement::IfFor {
                then_branch,
                else_branch,
                ..
            } => vec![then_branch, else_branch],
            Statement::Call(_)
            | Statement::Spawn(_)
            | Statement::NewChan { .. }
            | Statement::Send { .. }
            | Statement::Recv { .. }
            | Statement::Close { .. }
            | Statement::Tau
            | Statement::NewMem { .. }
            | Statement::MemRead { .. }
            | Statement::MemWrite { .. }
            | Statement::NewMutex { .. }
            | Statement::Lock { .. }
            | Statement::Unlock { .. }
            | Statement::NewRwMutex { .. }
            | Statement::RLock { .. }
            | Statement::RUnlock { .. } => Vec::new(),
        }
    }
}

/// Visit every statement in `stmts`, descending into nested bodies.
pub fn walk_stmts<'a>(stmts: &'a [Statement], visit: &mut impl FnMut(&'a Statement)) {
    for stmt in stmts {
        visit(stmt);
        for body in stmt.bodies() {
            walk_stmts(body, visit);
        }
    }
}

/// Mutable counterpart of [`walk_stmts`]. Nested bodies are visited after
/// their enclosing statement.
pub fn walk_stmts_mut(stmts: &mut [Statement], visit: &mut impl FnMut(&mut Statement)) {
    for stmt in stmts.iter_mut() {
        visit(&mut *stmt);
        for body in stmt.bodies_mut() {
            walk_stmts_mut(body, visit);
        }
    }
}

/// Drop every statement, at any depth, for which `keep` is false.
///
/// Returns the number of statements removed.
pub fn retain_stmts(stmts: &mut Vec<Statement>, keep: &mut impl FnMut(&Statement) -> bool) -> usize {
    let before = stmts.len();
    stmts.retain(|s| keep(s));
    let mut removed = before - stmts.len();
    for stmt in stmts.iter_mut() {
        for body in stmt.bodies_mut() {
            removed += retain_stmts(body, keep);
        }
    }
    removed
}

fn write_inline(f: &mut fmt::Formatter<'_>, stmts: &[Statement]) -> fmt::Result {
    for s in stmts {
        write!(f, "{s}; ")?;
    }
    Ok(())
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Statement::Call(site) => {
                write!(f, "call {}({})", site.simple_name(), caller_params(&site.params))
            }
            Statement::Spawn(site) => {
                write!(f, "spawn {}({})", site.simple_name(), caller_params(&site.params))
            }
            Statement::NewChan {
                var, chan, size, ..
            } => write!(f, "let {} = newchan {}, {size}", var.name(), filter_name(chan)),
            Statement::Send { chan, .. } => write!(f, "send {chan}"),
            Statement::Recv { chan, .. } => write!(f, "recv {chan}"),
            Statement::Close { chan, .. } => write!(f, "close {chan}"),
            Statement::Select { cases, .. } => {
                write!(f, "select")?;
                for case in cases {
                    write!(f, "\n      case")?;
                    for s in case {
                        write!(f, " {s};")?;
                    }
                }
                write!(f, "\n    endselect")
            }
            Statement::If {
                then_branch,
                else_branch,
            } => {
                write!(f, "if ")?;
                write_inline(f, then_branch)?;
                write!(f, "else ")?;
                write_inline(f, else_branch)?;
                write!(f, "endif")
            }
            Statement::IfFor {
                cond,
                then_branch,
                else_branch,
            } => {
                write!(f, "ifFor (int {cond}) then ")?;
                write_inline(f, then_branch)?;
                write!(f, "else ")?;
                write_inline(f, else_branch)?;
                write!(f, "endif")
            }
            Statement::Tau => write!(f, "tau"),
            Statement::NewMem { var, .. } => write!(f, "letmem {}", var.name()),
            Statement::MemRead { name, .. } => write!(f, "read {}", filter_name(name)),
            Statement::MemWrite { name, .. } => write!(f, "write {}", filter_name(name)),
            Statement::NewMutex { var, .. } => write!(f, "letsync {} mutex", var.name()),
            Statement::Lock { name, .. } => write!(f, "lock {}", filter_name(name)),
            Statement::Unlock { name, .. } => write!(f, "unlock {}", filter_name(name)),
            Statement::NewRwMutex { var, .. } => write!(f, "letsync {} rwmutex", var.name()),
            Statement::RLock { name, .. } => write!(f, "rlock {}", filter_name(name)),
            Statement::RUnlock { name, .. } => write!(f, "runlock {}", filter_name(name)),
        }
    }
}
