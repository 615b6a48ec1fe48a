//! Front-end of the transpiler: lexing and parsing Lua source into a `Chunk`.

pub mod ast;
pub mod errors;
pub mod lexer;
pub mod parser;
