//! astgen-compiler
//!
//! This crate implements:
//!  1) The schema model (`TypeExpr`, `NodeDecl`, `Schema`) and a loader for the
//!     raw nested declaration form,
//!  2) A verifier that resolves every name in the schema (no dangling references),
//!  3) The type renderer (`Vec<Box<Expr>>` → `Vec<Box<Expr<'src>>>`),
//!  4) Code generation of node definitions (`compile_ast`) and of the
//!     visitor/walker pair (`compile_visitor`),
//!  5) Error types (`GenError`) and generation options (`GenOptions`).

pub mod error;
pub mod types;
pub mod utils;
pub mod options;
pub mod tokenizer;
pub mod parser;
pub mod verifier;
pub mod render;
pub mod gen_ast;
pub mod gen_visitor;
pub mod compiler;

pub use compiler::{compile_ast, compile_schema, compile_visitor, write_generated, Generated};
pub use error::GenError;
pub use options::GenOptions;
pub use parser::{parse_schema, parse_type};
pub use types::{Field, NodeDecl, Schema, TypeExpr, Variant};
