//! End-to-end evaluation tests.
//!
//! Programs are built with `brisk_ir::build` and run through a fresh
//! [`Interpreter`](crate::Interpreter). Suites by category:
//! - `binding_tests`: declarations, const rules, scoping, assignment targets
//! - `builtin_tests`: conversions, printing, argument checking
//! - `collection_tests`: arrays, dictionaries, strings, copy-on-write
//! - `control_tests`: conditionals, loops, exceptions
//! - `function_tests`: calls, closures, captures, pure functions, recursion

mod binding_tests;
mod builtin_tests;
mod function_tests;
