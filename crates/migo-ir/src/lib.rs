#![doc = include_str!("../README.md")]

//! MiGo intermediate representation.
//!
//! This crate defines the IR entity model and its construction API, the
//! communication-reachability analysis, the line-indexed annotation
//! registry, and the serializer to the textual calculus.

pub mod comm;
pub mod function;
pub mod named_var;
pub mod position;
pub mod printer;
pub mod program;
pub mod properties;
#[cfg(any(test, feature = "proptest"))]
pub mod proptest_generators;
pub mod statement;

pub use function::{Function, IrError, Parameter};
pub use named_var::NamedVar;
pub use position::Position;
pub use program::{Program, ROOT_FUNCTION};
pub use properties::Properties;
pub use statement::{CallSite, Statement};

/// Strip characters that are not legal in calculus identifiers.
///
/// Parentheses, asterisks, quotes and hyphens are dropped; path separators
/// become underscores.
pub fn filter_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for c in name.chars() {
        match c {
            '(' | ')' | '*' | '"' | '-' => {}
            '/' => out.push('_'),
            _ => out.push(c),
        }
    }
    out
}
