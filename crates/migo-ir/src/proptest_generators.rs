//! Proptest strategies for generating well-formed `Program` instances.

use proptest::prelude::*;

use crate::function::{Function, Parameter};
use crate::position::Position;
use crate::program::{Program, ROOT_FUNCTION};
use crate::statement::{CallSite, Statement};

/// Name of the `i`-th generated function. Index 0 is the root.
pub fn function_name(i: usize) -> String {
    if i == 0 {
        ROOT_FUNCTION.to_string()
    } else {
        format!("pkg.f{i}")
    }
}

/// Strategy for a single statement whose call targets are indices below
/// `nfuncs + 2`, so a few targets are undefined.
pub fn arb_statement(nfuncs: usize) -> impl Strategy<Value = Statement> {
    let target = 0..nfuncs + 2;
    let leaf = prop_oneof![
        Just(Statement::Tau),
        (0..3usize, 1..50usize).prop_map(|(c, line)| Statement::send(format!("ch{c}"), Position::line(line))),
        (0..3usize, 1..50usize).prop_map(|(c, line)| Statement::recv(format!("ch{c}"), Position::line(line))),
        (0..3usize).prop_map(|m| Statement::MemWrite {
            name: format!("m{m}"),
            pos: Position::none(),
        }),
        (0..3usize).prop_map(|m| Statement::Lock {
            name: format!("mu{m}"),
            pos: Position::none(),
        }),
        (target.clone(), any::<bool>()).prop_map(|(t, with_arg)| {
            let mut site = CallSite::new(function_name(t), Position::none());
            if with_arg {
                site.add_params([Parameter::new("a", "b")]);
            }
            Statement::Call(site)
        }),
        target.prop_map(|t| Statement::spawn(function_name(t), Position::none())),
    ];
    leaf.prop_recursive(2, 16, 3, |inner| {
        prop_oneof![
            (
                proptest::collection::vec(inner.clone(), 0..3),
                proptest::collection::vec(inner.clone(), 0..3),
            )
                .prop_map(|(t, e)| Statement::if_else(t, e)),
            (
                proptest::collection::vec(inner.clone(), 0..3),
                proptest::collection::vec(inner.clone(), 0..3),
            )
                .prop_map(|(t, e)| Statement::if_for("i", t, e)),
            proptest::collection::vec(proptest::collection::vec(inner, 1..3), 1..3).prop_map(
                |cases| Statement::Select {
                    cases,
                    pos: Position::none(),
                }
            ),
        ]
    })
}

/// Strategy for a program of 1–6 functions named by [`function_name`],
/// built through the construction API. Bodies may be empty.
pub fn arb_program() -> impl Strategy<Value = Program> {
    (1..=6usize)
        .prop_flat_map(|nfuncs| {
            proptest::collection::vec(
                proptest::collection::vec(arb_statement(nfuncs), 0..5),
                nfuncs..=nfuncs,
            )
        })
        .prop_map(|bodies| {
            let mut prog = Program::new();
            for (i, body) in bodies.into_iter().enumerate() {
                let mut f = Function::new(function_name(i), Position::line(100 + i));
                f.add_stmts(body);
                prog.add_function(f);
            }
            prog
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    proptest! {
        #[test]
        fn generated_programs_are_well_formed(prog in arb_program()) {
            prop_assert!(!prog.is_empty());
            prop_assert!(prog.contains(ROOT_FUNCTION));
            for (i, name) in prog.names().enumerate() {
                prop_assert_eq!(name, function_name(i));
            }
        }

        #[test]
        fn has_comm_is_sticky(prog in arb_program(), extra in proptest::collection::vec(arb_statement(3), 0..4)) {
            let mut prog = prog;
            for f in prog.functions_mut() {
                let before = f.has_comm();
                f.add_stmts(extra.clone());
                prop_assert!(!before || f.has_comm());
            }
        }

        #[test]
        fn plain_rendering_is_deterministic(prog in arb_program()) {
            let mut prog = prog;
            prog.normalize();
            prop_assert_eq!(prog.to_string(), prog.to_string());
            let defs = prog.to_string().lines().filter(|l| l.starts_with("def ")).count();
            prop_assert_eq!(defs, prog.len());
        }
    }
}
