//! ## Crate layout
//! - `core`: value model, metadata registries, expressions, and the
//!   clause/filter compilers.
//!
//! The `prelude` module mirrors the surface used by application code
//! building queries against registered types.

pub use bridgeql_core as core;

//
// Consts
//

/// Workspace version re-export for downstream tooling/tests.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

///
/// Prelude
/// using _ brings traits into scope and avoids name conflicts
///

pub mod prelude {
    pub use crate::core::{
        expr::{
            AggregateExpression, AggregateFn, BooleanExpression, CompareExpression, Expression,
            GroupExpression, TextExpression,
        },
        model::{
            AttributeModel, EntityModel, OwnedAttribute, RelationModel, RoleModel, ValueKind,
        },
        query::{
            ClauseBuilder, CompiledQuery, DeleteQuery, Direction, EntityQuery, FetchEntry,
            InsertQuery, RelationQuery, SortKey,
        },
        types::Timestamp,
        value::Value,
    };
}
