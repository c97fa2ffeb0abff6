//! Communication classification of statements and call-graph reachability.

use std::collections::{HashMap, VecDeque};

use indexmap::IndexSet;

use crate::program::Program;
use crate::statement::{walk_stmts, Statement};

/// Classify a batch of statements as communicating.
///
/// Scanning stops at the first classifying statement: a channel operation or
/// `select` is communicating, a branch is communicating iff either of its
/// bodies is, and a `call`/`spawn` is communicating iff it passes parameters.
/// Memory, lock and `tau` statements are skipped.
pub fn has_comm(stmts: &[Statement]) -> bool {
    for stmt in stmts {
        match stmt {
            Statement::Send { .. }
            | Statement::Recv { .. }
            | Statement::Close { .. }
            | Statement::Select { .. }
            | Statement::NewChan { .. } => return true,
            Statement::If {
                then_branch,
                else_branch,
            }
            | Statement::IfFor {
                then_branch,
                else_branch,
                ..
            } => return has_comm(then_branch) || has_comm(else_branch),
            Statement::Call(site) | Statement::Spawn(site) => return !site.params.is_empty(),
            Statement::Tau
            | Statement::NewMem { .. }
            | Statement::MemRead { .. }
            | Statement::MemWrite { .. }
            | Statement::NewMutex { .. }
            | Statement::Lock { .. }
            | Statement::Unlock { .. }
            | Statement::NewRwMutex { .. }
            | Statement::RLock { .. }
            | Statement::RUnlock { .. } => {}
        }
    }
    false
}

/// Call and spawn targets of `stmts` at any nesting depth, in order of appearance.
pub fn callees(stmts: &[Statement]) -> IndexSet<&str> {
    let mut out = IndexSet::new();
    walk_stmts(stmts, &mut |s| {
        if let Some(name) = s.callee() {
            out.insert(name);
        }
    });
    out
}

/// Propagate communication flags over everything reachable from `root`.
///
/// A function is marked communicating if it already is, or if any function it
/// transitively calls or spawns is. Each function is visited once regardless
/// of cycles in the call graph. Targets missing from the program are not
/// edges. The root is always marked. Returns the visited functions in
/// discovery order; empty if `root` is not in the program.
pub fn mark_communicating(program: &mut Program, root: &str) -> IndexSet<String> {
    let mut visited: IndexSet<String> = IndexSet::new();
    if program.function(root).is_none() {
        tracing::warn!("communication analysis root '{root}' is not defined");
        return visited;
    }

    // Discovery: callee -> callers over the reachable subgraph.
    let mut callers: HashMap<String, Vec<String>> = HashMap::new();
    let mut stack = vec![root.to_string()];
    visited.insert(root.to_string());
    while let Some(name) = stack.pop() {
        let Some(f) = program.function(&name) else {
            continue;
        };
        for callee in callees(&f.stmts) {
            if program.function(callee).is_none() {
                tracing::debug!("'{}' calls undefined function '{callee}'", f.name);
                continue;
            }
            callers
                .entry(callee.to_string())
                .or_default()
                .push(name.clone());
            if visited.insert(callee.to_string()) {
                stack.push(callee.to_string());
            }
        }
    }

    // Propagation: flags only ever flip false -> true, so each function
    // enters the worklist at most once.
    let mut worklist: VecDeque<String> = visited
        .iter()
        .filter(|name| program.function(name).is_some_and(|f| f.has_comm()))
        .cloned()
        .collect();
    while let Some(name) = worklist.pop_front() {
        let Some(parents) = callers.get(&name) else {
            continue;
        };
        for parent in parents {
            if let Some(f) = program.function_mut(parent) {
                if !f.has_comm() {
                    f.mark_comm();
                    worklist.push_back(parent.clone());
                }
            }
        }
    }

    if let Some(f) = program.function_mut(root) {
        f.mark_comm();
    }
    visited
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::function::{Function, Parameter};
    use crate::position::Position;
    use crate::statement::CallSite;

    fn none() -> Position {
        Position::none()
    }

    fn func(name: &str, stmts: Vec<Statement>) -> Function {
        let mut f = Function::new(name, none());
        f.add_stmts(stmts);
        f
    }

    #[test]
    fn first_classifying_statement_decides() {
        let mem = Statement::MemWrite {
            name: "m".into(),
            pos: none(),
        };
        assert!(has_comm(&[mem.clone(), Statement::send("c", none())]));
        assert!(!has_comm(&[mem, Statement::Tau]));
        assert!(!has_comm(&[]));
    }

    #[test]
    fn branch_result_is_returned_immediately() {
        let branch = Statement::if_else(vec![Statement::Tau], vec![]);
        assert!(!has_comm(&[branch.clone(), Statement::send("c", none())]));
        let branch = Statement::if_for("i", vec![], vec![Statement::recv("c", none())]);
        assert!(has_comm(&[branch]));
    }

    #[test]
    fn calls_communicate_only_with_parameters() {
        let bare = Statement::call("f", none());
        assert!(!has_comm(&[bare.clone(), Statement::send("c", none())]));
        let with_args = Statement::Spawn(
            CallSite::new("f", none()).with_params([Parameter::new("a", "b")]),
        );
        assert!(has_comm(&[with_args]));
    }

    #[test]
    fn lock_statements_are_skipped() {
        let stmts = [
            Statement::NewMutex {
                var: "mu".into(),
                pos: none(),
            },
            Statement::Lock {
                name: "mu".into(),
                pos: none(),
            },
            Statement::close("c", none()),
        ];
        assert!(has_comm(&stmts));
    }

    #[test]
    fn callees_include_nested_targets_once() {
        let stmts = vec![
            Statement::call("a", none()),
            Statement::if_else(vec![Statement::spawn("b", none())], vec![Statement::call("a", none())]),
        ];
        let names: Vec<&str> = callees(&stmts).into_iter().collect();
        assert_eq!(names, vec!["a", "b"]);
    }

    #[test]
    fn flags_propagate_to_callers() {
        let mut prog = Program::new();
        prog.add_function(func("main", vec![Statement::call("mid", none())]));
        prog.add_function(func("mid", vec![Statement::spawn("leaf", none())]));
        prog.add_function(func("leaf", vec![Statement::send("c", none())]));
        prog.add_function(func("quiet", vec![Statement::Tau]));

        let visited = mark_communicating(&mut prog, "main");
        assert_eq!(visited.len(), 3);
        assert!(prog.function("mid").unwrap().has_comm());
        assert!(prog.function("main").unwrap().has_comm());
        assert!(!prog.function("quiet").unwrap().has_comm());
    }

    #[test]
    fn cycles_terminate_and_share_flags() {
        let mut prog = Program::new();
        prog.add_function(func("main", vec![Statement::call("a", none())]));
        prog.add_function(func("a", vec![Statement::call("b", none()), Statement::call("d", none())]));
        prog.add_function(func("d", vec![Statement::call("a", none())]));
        prog.add_function(func(
            "b",
            vec![Statement::recv("ch", none()), Statement::call("c", none())],
        ));
        prog.add_function(func("c", vec![Statement::call("a", none())]));

        mark_communicating(&mut prog, "main");
        for name in ["main", "a", "b", "c", "d"] {
            assert!(prog.function(name).unwrap().has_comm(), "{name} should communicate");
        }
    }

    #[test]
    fn root_is_marked_even_without_communication() {
        let mut prog = Program::new();
        prog.add_function(func("main", vec![Statement::call("missing", none())]));
        let visited = mark_communicating(&mut prog, "main");
        assert_eq!(visited.len(), 1);
        assert!(prog.function("main").unwrap().has_comm());
    }

    #[test]
    fn unknown_root_visits_nothing() {
        let mut prog = Program::new();
        prog.add_function(func("f", vec![Statement::send("c", none())]));
        assert!(mark_communicating(&mut prog, "main").is_empty());
    }
}
