//! Back-end of the transpiler: the TypeScript tree and its printer.

pub mod pretty_print;
pub mod ts_ast;
