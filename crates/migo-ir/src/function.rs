use std::fmt;

use thiserror::Error;

use crate::comm::has_comm;
use crate::filter_name;
use crate::named_var::NamedVar;
use crate::position::Position;
use crate::statement::{callee_params, Statement};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IrError {
    #[error("Statement stack is empty: restore without a matching put_away")]
    EmptyStack,
    #[error("Parameter not found for callee value '{0}'")]
    ParamNotFound(String),
}

/// Translation of an argument from the caller's environment to the callee's.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct Parameter {
    pub caller: NamedVar,
    pub callee: NamedVar,
}

impl Parameter {
    pub fn new(caller: impl Into<NamedVar>, callee: impl Into<NamedVar>) -> Self {
        Self {
            caller: caller.into(),
            callee: callee.into(),
        }
    }
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{} → {}]", self.caller.name(), self.callee.name())
    }
}

/// A block of statements sharing the same parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct Function {
    pub name: String,
    pub params: Vec<Parameter>,
    pub stmts: Vec<Statement>,
    /// Position of the definition; orders annotations in the rendered output.
    pub pos: Position,
    has_comm: bool,
    /// Enclosing sequences saved while a nested block is built.
    #[cfg_attr(feature = "serialize", serde(skip))]
    stack: Vec<Vec<Statement>>,
    #[cfg_attr(feature = "serialize", serde(skip))]
    var_idx: usize,
}

impl Function {
    pub fn new(name: impl Into<String>, pos: Position) -> Self {
        Self {
            name: name.into(),
            params: Vec::new(),
            stmts: Vec::new(),
            pos,
            has_comm: false,
            stack: Vec::new(),
            var_idx: 0,
        }
    }

    /// Whether the function, on its own or through analysed callees,
    /// performs a communication action. Never resets once set.
    pub fn has_comm(&self) -> bool {
        self.has_comm
    }

    pub fn mark_comm(&mut self) {
        self.has_comm = true;
    }

    /// Append bindings, skipping any whose caller or callee side is already bound.
    pub fn add_params(&mut self, params: impl IntoIterator<Item = Parameter>) {
        for param in params {
            let found = self
                .params
                .iter()
                .any(|p| p.callee == param.callee || p.caller == param.caller);
            if !found {
                self.params.push(param);
            }
        }
    }

    pub fn param_by_callee(&self, var: &NamedVar) -> Result<&Parameter, IrError> {
        self.params
            .iter()
            .find(|p| p.callee == *var)
            .ok_or_else(|| IrError::ParamNotFound(var.name().to_string()))
    }

    /// Append statements to the sequence under construction.
    ///
    /// Once the sequence holds more than one statement and ends in `tau`,
    /// appended statements are not classified and `has_comm` is left as is.
    pub fn add_stmts(&mut self, stmts: impl IntoIterator<Item = Statement>) {
        let stmts: Vec<Statement> = stmts.into_iter().collect();
        if self.stmts.len() > 1 && self.stmts.last().is_some_and(Statement::is_tau) {
            self.stmts.extend(stmts);
            return;
        }
        if !self.has_comm && has_comm(&stmts) {
            self.has_comm = true;
        }
        self.stmts.extend(stmts);
    }

    pub fn is_empty(&self) -> bool {
        self.stmts.is_empty()
    }

    /// Save the current sequence and start an empty one for a nested block.
    pub fn put_away(&mut self) {
        let current = std::mem::take(&mut self.stmts);
        self.stack.push(current);
    }

    /// Close the nested block opened by the matching [`put_away`](Self::put_away).
    ///
    /// The saved enclosing sequence becomes current again and the statements
    /// of the nested block are returned.
    pub fn restore(&mut self) -> Result<Vec<Statement>, IrError> {
        let enclosing = self.stack.pop().ok_or(IrError::EmptyStack)?;
        Ok(std::mem::replace(&mut self.stmts, enclosing))
    }

    /// Number of nested blocks currently open.
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// A variable name not yet handed out in this function.
    pub fn fresh_var(&mut self, prefix: &str) -> NamedVar {
        let var = NamedVar::new(format!("{prefix}{}", self.var_idx));
        self.var_idx += 1;
        var
    }

    pub fn simple_name(&self) -> String {
        filter_name(&self.name)
    }

    /// Materialize the `tau` placeholder into an empty body.
    pub fn normalize(&mut self) {
        if self.stmts.is_empty() {
            self.add_stmts([Statement::Tau]);
        }
    }
}

impl fmt::Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "def {}({}):", self.simple_name(), callee_params(&self.params))?;
        if self.stmts.is_empty() {
            writeln!(f, "    {};", Statement::Tau)?;
        }
        for stmt in &self.stmts {
            writeln!(f, "    {stmt};")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn send(chan: &str) -> Statement {
        Statement::send(chan, Position::none())
    }

    fn read(name: &str) -> Statement {
        Statement::MemRead {
            name: name.into(),
            pos: Position::none(),
        }
    }

    #[test]
    fn add_params_skips_either_side_collision() {
        let mut f = Function::new("f", Position::none());
        f.add_params([
            Parameter::new("a", "x"),
            Parameter::new("a", "y"),
            Parameter::new("b", "x"),
            Parameter::new("b", "y"),
        ]);
        assert_eq!(f.params, vec![Parameter::new("a", "x"), Parameter::new("b", "y")]);
    }

    #[test]
    fn param_lookup_by_callee() {
        let mut f = Function::new("f", Position::none());
        f.add_params([Parameter::new("a", "x")]);
        assert_eq!(f.param_by_callee(&"x".into()).unwrap().caller.name(), "a");
        assert_eq!(
            f.param_by_callee(&"a".into()),
            Err(IrError::ParamNotFound("a".into()))
        );
    }

    #[test]
    fn communicating_batch_latches_has_comm() {
        let mut f = Function::new("f", Position::none());
        f.add_stmts([read("m")]);
        assert!(!f.has_comm());
        f.add_stmts([send("c")]);
        assert!(f.has_comm());
        f.add_stmts([read("m")]);
        assert!(f.has_comm());
    }

    #[test]
    fn trailing_tau_suppresses_classification() {
        let mut f = Function::new("f", Position::none());
        f.add_stmts([read("m"), Statement::Tau]);
        f.add_stmts([send("c")]);
        assert!(!f.has_comm());

        let mut g = Function::new("g", Position::none());
        g.add_stmts([read("m")]);
        g.add_stmts([send("c")]);
        assert!(g.has_comm());
    }

    #[test]
    fn single_tau_does_not_suppress_classification() {
        let mut f = Function::new("f", Position::none());
        f.add_stmts([Statement::Tau]);
        f.add_stmts([send("c")]);
        assert!(f.has_comm());
    }

    #[test]
    fn put_away_and_restore_build_nested_blocks() {
        let mut f = Function::new("f", Position::none());
        f.add_stmts([read("m")]);
        f.put_away();
        assert_eq!(f.depth(), 1);
        f.add_stmts([send("c")]);
        let then_branch = f.restore().unwrap();
        assert_eq!(then_branch, vec![send("c")]);
        assert_eq!(f.stmts, vec![read("m")]);
        f.add_stmts([Statement::if_else(then_branch, vec![])]);
        assert!(f.has_comm());
        assert_eq!(f.depth(), 0);
    }

    #[test]
    fn restore_without_put_away_fails() {
        let mut f = Function::new("f", Position::none());
        f.add_stmts([read("m")]);
        assert_eq!(f.restore(), Err(IrError::EmptyStack));
        assert_eq!(f.stmts, vec![read("m")]);
    }

    #[test]
    fn fresh_vars_are_distinct() {
        let mut f = Function::new("f", Position::none());
        let a = f.fresh_var("t");
        let b = f.fresh_var("t");
        assert_eq!(a.name(), "t0");
        assert_eq!(b.name(), "t1");
    }

    #[test]
    fn display_is_pure_for_empty_function() {
        let f = Function::new("\"main\".idle", Position::none());
        assert_eq!(f.to_string(), "def main.idle():\n    tau;\n");
        assert!(f.is_empty());
    }

    #[test]
    fn header_lists_callee_names() {
        let mut f = Function::new("worker", Position::none());
        f.add_params([Parameter::new("a", "x"), Parameter::new("b", "y")]);
        f.add_stmts([send("x")]);
        assert_eq!(f.to_string(), "def worker(x, y):\n    send x;\n");
    }
}
