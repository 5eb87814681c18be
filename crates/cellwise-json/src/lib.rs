//! # cellwise-json
//!
//! Typed JSON documents for cellwise: a document is loaded once, optionally
//! validated against a schema, and read through typed lookups that coerce
//! values the same way spreadsheet cells are coerced.
//!
//! ## Example
//!
//! ```rust
//! use cellwise_json::{DocumentStore, Lookup};
//! use serde_json::json;
//!
//! let store = DocumentStore::from_value(json!({"Deposit": [true, false]})).with_cache(true);
//! let ctx = store.context();
//!
//! assert!(ctx.get_boolean_by_index("Deposit", 0).unwrap());
//! assert!(!ctx.get_boolean_by_index("Deposit", 1).unwrap());
//! assert!(ctx.get_boolean_by_index("Deposit", 5).is_err());
//! ```

mod config;
mod context;
mod error;
mod lookup;
mod node;
mod schema;
mod store;
mod tree;

pub use config::{DocumentConfig, DocumentConfigBuilder};
pub use context::AccessContext;
pub use error::{JsonError, JsonResult};
pub use lookup::Lookup;
pub use node::{FromNode, JsonNode};
pub use schema::{JsonSchema, SchemaValidator, Violation};
pub use store::DocumentStore;
pub use tree::{DocumentTree, JsonTree};
