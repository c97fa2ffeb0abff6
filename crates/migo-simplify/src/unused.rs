//! Unused-function removal.

use indexmap::IndexSet;

use migo_ir::comm::callees;
use migo_ir::Program;

/// Functions reachable from `root` over call and spawn edges, `root` included.
///
/// Targets missing from the program are ignored. Empty if `root` is missing.
pub fn reachable(program: &Program, root: &str) -> IndexSet<String> {
    let mut used = IndexSet::new();
    if !program.contains(root) {
        return used;
    }
    used.insert(root.to_string());
    let mut worklist = vec![root.to_string()];
    while let Some(name) = worklist.pop() {
        let Some(f) = program.function(&name) else {
            continue;
        };
        for callee in callees(&f.stmts) {
            if program.contains(callee) && used.insert(callee.to_string()) {
                worklist.push(callee.to_string());
            }
        }
    }
    used
}

/// Delete every function not reachable from `root`; returns how many were deleted.
///
/// Nothing is deleted when `root` is not in the program.
pub fn remove(program: &mut Program, root: &str) -> usize {
    if !program.contains(root) {
        return 0;
    }
    let used = reachable(program, root);
    let removed = program.retain(|f| used.contains(&f.name));
    tracing::debug!(removed, "unused-function removal");
    removed
}
