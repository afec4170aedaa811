//! Core compilation engine for BridgeQL: the value model, metadata
//! registries, expression tree, and the clause/filter compilers that turn
//! typed query specifications into graph-query-language text.
#![warn(unreachable_pub)]

pub mod expr;
pub mod model;
pub mod query;
pub mod types;
pub mod value;

///
/// CONSTANTS
///

/// Statement separator used between fragments inside one keyworded block.
pub const STATEMENT_SEPARATOR: &str = "; ";

/// Default variable prefix for entity queries.
pub const ENTITY_VAR: &str = "e";

/// Default variable prefix for relation queries.
pub const RELATION_VAR: &str = "r";

///
/// Prelude
///
/// Prelude contains only domain vocabulary.
/// No errors, compilers, or helpers are re-exported here.
///

pub mod prelude {
    pub use crate::{
        expr::Expression,
        model::{AttributeModel, EntityModel, RelationModel, ValueKind},
        query::{Direction, EntityQuery, RelationQuery},
        types::Timestamp,
        value::Value,
    };
}
