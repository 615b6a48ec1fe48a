pub mod backend;
pub mod config;
pub mod sema;
pub mod syntax;
pub mod transform;
pub mod transpile;
pub mod utils;
