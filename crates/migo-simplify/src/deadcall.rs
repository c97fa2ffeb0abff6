//! Dead-call removal.

use std::collections::HashSet;

use migo_ir::statement::retain_stmts;
use migo_ir::Program;

/// Drop every call or spawn, at any depth, whose target is not defined.
///
/// Returns the number of statements dropped.
pub fn remove(program: &mut Program) -> usize {
    let defined: HashSet<String> = program.names().map(String::from).collect();
    let mut removed = 0;
    for f in program.functions_mut() {
        removed += retain_stmts(&mut f.stmts, &mut |s| {
            s.callee().map_or(true, |name| defined.contains(name))
        });
    }
    tracing::debug!(removed, "dead-call removal");
    removed
}
