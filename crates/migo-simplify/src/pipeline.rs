//! Fixed-order simplification pipeline.

use migo_ir::{Program, ROOT_FUNCTION};

use crate::taufunc::TauExclusion;
use crate::{deadcall, taufunc, unused};

/// Options for [`simplify_with_report`].
#[derive(Debug, Clone)]
pub struct SimplifyOptions {
    /// Entry point anchoring tau exclusion and reachability.
    pub root: String,
}

impl Default for SimplifyOptions {
    fn default() -> Self {
        Self {
            root: ROOT_FUNCTION.to_string(),
        }
    }
}

/// What a pipeline run removed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SimplifyReport {
    pub tau_functions: usize,
    pub tau_calls: usize,
    pub unused_functions: usize,
    pub dead_calls: usize,
    /// Whether the unused-function pass ran (only with a root).
    pub had_root: bool,
}

/// Reduce `program` to a smaller equivalent program using the default root.
pub fn simplify(mut program: Program) -> Program {
    simplify_with_report(&mut program, &SimplifyOptions::default());
    program
}

/// Run the passes in order on `program`.
///
/// With a root, tau-function reduction keeps the root and unused functions
/// are then removed from it; without one, every trivial function goes and
/// no reachability pruning happens. Dead calls are always removed last, since
/// the earlier passes delete functions.
pub fn simplify_with_report(program: &mut Program, opts: &SimplifyOptions) -> SimplifyReport {
    let before = program.len();
    let mut report = SimplifyReport::default();

    if program.contains(&opts.root) {
        report.had_root = true;
        let reduction = taufunc::find(program, &TauExclusion::Except(opts.root.clone()));
        report.tau_functions = reduction.removed.len();
        report.tau_calls = reduction.rewritten_calls;
        report.unused_functions = unused::remove(program, &opts.root);
    } else {
        let reduction = taufunc::find(program, &TauExclusion::Nothing);
        report.tau_functions = reduction.removed.len();
        report.tau_calls = reduction.rewritten_calls;
    }
    report.dead_calls = deadcall::remove(program);

    tracing::info!(
        before,
        after = program.len(),
        had_root = report.had_root,
        "simplified program"
    );
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use migo_ir::{Function, Position, Statement};

    #[test]
    fn custom_root_anchors_the_passes() {
        let mut prog = Program::new();
        let mut start = Function::new("start", Position::none());
        start.add_stmts([Statement::send("c", Position::none())]);
        prog.add_function(start);
        let mut other = Function::new("other", Position::none());
        other.add_stmts([Statement::recv("c", Position::none())]);
        prog.add_function(other);

        let opts = SimplifyOptions {
            root: "start".into(),
        };
        let report = simplify_with_report(&mut prog, &opts);
        assert!(report.had_root);
        assert_eq!(report.unused_functions, 1);
        assert_eq!(prog.names().collect::<Vec<_>>(), vec!["start"]);
    }

    #[test]
    fn empty_program_is_a_no_op() {
        let prog = simplify(Program::new());
        assert!(prog.is_empty());
    }
}
