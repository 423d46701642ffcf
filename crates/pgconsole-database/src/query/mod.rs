//! SQL text construction.
//!
//! Builders only ever embed [`Identifier`](crate::identifier::Identifier)s in
//! SQL text; every value goes into [`Statement::params`].

pub mod advisory;
pub mod builder;
pub mod export;
pub mod statement;

pub use builder::{ListStatements, QuerySpec};
pub use statement::{Param, Statement};
