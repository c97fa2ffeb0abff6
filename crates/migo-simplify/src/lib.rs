#![doc = include_str!("../README.md")]

//! MiGo simplification passes.
//!
//! Each pass takes the program by exclusive reference and reports how much it
//! removed; [`pipeline`] fixes their order.

pub mod deadcall;
pub mod pipeline;
pub mod taufunc;
pub mod unused;

pub use pipeline::{simplify, simplify_with_report, SimplifyOptions, SimplifyReport};
pub use taufunc::TauExclusion;
