mod builder;
mod clause;
mod filter;


pub use builder::{CompiledQuery, DeleteQuery, EntityQuery, InsertQuery, QueryError, RelationQuery};
pub use clause::{ClauseBuilder, Direction, FetchEntry};
pub use filter::{
    CompiledFilter, FilterCompiler, FilterError, FilterOp, ResolvedOperator, SortKey,
};
