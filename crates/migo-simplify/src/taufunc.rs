//! Tau-function reduction.

use indexmap::IndexSet;

use migo_ir::statement::walk_stmts_mut;
use migo_ir::{Program, Statement};

/// Which functions tau-function reduction must keep even if trivial.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TauExclusion {
    /// Every trivial function is removed.
    #[default]
    Nothing,
    /// The named function (normally the entry point) is kept.
    Except(String),
}

impl TauExclusion {
    pub fn excludes(&self, name: &str) -> bool {
        match self {
            TauExclusion::Nothing => false,
            TauExclusion::Except(kept) => kept == name,
        }
    }
}

/// Outcome of [`find`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TauReduction {
    /// Deleted functions, in the order they were classified.
    pub removed: IndexSet<String>,
    /// Call and spawn sites rewritten to `tau`.
    pub rewritten_calls: usize,
}

fn is_tau_equivalent(stmt: &Statement, trivial: &IndexSet<String>) -> bool {
    match stmt {
        Statement::Tau => true,
        Statement::If {
            then_branch,
            else_branch,
        }
        | Statement::IfFor {
            then_branch,
            else_branch,
            ..
        } => {
            then_branch.iter().all(|s| is_tau_equivalent(s, trivial))
                && else_branch.iter().all(|s| is_tau_equivalent(s, trivial))
        }
        Statement::Call(site) | Statement::Spawn(site) => trivial.contains(&site.name),
        Statement::Select { .. }
        | Statement::NewChan { .. }
        | Statement::Send { .. }
        | Statement::Recv { .. }
        | Statement::Close { .. }
        | Statement::NewMem { .. }
        | Statement::MemRead { .. }
        | Statement::MemWrite { .. }
        | Statement::NewMutex { .. }
        | Statement::Lock { .. }
        | Statement::Unlock { .. }
        | Statement::NewRwMutex { .. }
        | Statement::RLock { .. }
        | Statement::RUnlock { .. } => false,
    }
}

/// Classify the functions whose whole behaviour is `tau`.
///
/// Iterates to a fixpoint, so a function calling only trivial functions is
/// itself trivial. An empty body is trivial.
pub fn trivial_functions(program: &Program, exclusion: &TauExclusion) -> IndexSet<String> {
    let mut trivial = IndexSet::new();
    loop {
        let newly: Vec<String> = program
            .functions()
            .filter(|f| !trivial.contains(&f.name) && !exclusion.excludes(&f.name))
            .filter(|f| f.stmts.iter().all(|s| is_tau_equivalent(s, &trivial)))
            .map(|f| f.name.clone())
            .collect();
        if newly.is_empty() {
            return trivial;
        }
        trivial.extend(newly);
    }
}

/// Delete trivial functions and turn every call or spawn of one into `tau`.
pub fn find(program: &mut Program, exclusion: &TauExclusion) -> TauReduction {
    let trivial = trivial_functions(program, exclusion);
    if trivial.is_empty() {
        return TauReduction::default();
    }

    program.retain(|f| !trivial.contains(&f.name));
    let mut rewritten_calls = 0;
    for f in program.functions_mut() {
        walk_stmts_mut(&mut f.stmts, &mut |s| {
            if s.callee().is_some_and(|name| trivial.contains(name)) {
                *s = Statement::Tau;
                rewritten_calls += 1;
            }
        });
    }

    tracing::debug!(
        removed = trivial.len(),
        rewritten_calls,
        "tau-function reduction"
    );
    TauReduction {
        removed: trivial,
        rewritten_calls,
    }
}
