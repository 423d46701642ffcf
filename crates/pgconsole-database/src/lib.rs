//! # pgconsole-database
//!
//! Everything that touches SQL text or a PostgreSQL connection:
//!
//! - `identifier` - allow-list check for table/column names
//! - `query` - parameterized statement building, CSV export, ad-hoc query
//!   warnings
//! - `connection` - the per-request database gateway
//! - `catalog` - table, column, and primary-key metadata
//! - `data` - row browsing and mutation built on the pieces above
//! - `decode` - rows to JSON objects
//! - `errors` - SQLSTATE to user-facing message mapping

pub mod catalog;
pub mod connection;
pub mod data;
pub mod decode;
pub mod errors;
pub mod identifier;
pub mod query;

pub use connection::{DatabaseGateway, ExecutionResult, GatewayConnection};
pub use decode::{FieldInfo, JsonRow};
pub use identifier::{Identifier, QualifiedTable};
