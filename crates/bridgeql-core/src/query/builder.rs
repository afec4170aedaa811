use crate::{
    expr::{AggregateExpression, ExprError, Expression, GroupExpression, binding, scoped_var},
    model::{EntityModel, RelationModel},
    query::{
        clause::{ClauseBuilder, FetchEntry},
        filter::{CompiledFilter, FilterCompiler, FilterError, ResolvedOperator, SortKey},
    },
    value::Value,
};
use std::collections::BTreeSet;
use std::fmt;
use thiserror::Error as ThisError;

///
/// Query Builders
///
/// Typed, declarative builders over one type's registry.
///
/// Builders:
/// - Collect filters, expressions, ordering, and pagination declaratively
/// - Perform no resolution at accumulation time
/// - Resolve, validate, and render exactly once in `build()`
///
/// This separation keeps construction lightweight and testable, and makes
/// every error surface at one deterministic boundary.
///

///
/// QueryError
///

#[derive(Debug, ThisError)]
pub enum QueryError {
    #[error("{0}")]
    Filter(#[from] FilterError),

    #[error("{0}")]
    Expr(#[from] ExprError),
}

///
/// CompiledQuery
///
/// Immutable artifact of one `build()`: the final query text plus the
/// introspection surfaces used by callers and tests.
///

#[derive(Clone, Debug)]
pub struct CompiledQuery {
    text: String,
    operators: Vec<ResolvedOperator>,
    bound: BTreeSet<String>,
}

impl CompiledQuery {
    /// The rendered query text.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Resolved filter operators in declaration order.
    #[must_use]
    pub fn operators(&self) -> &[ResolvedOperator] {
        &self.operators
    }

    /// Scoped attribute variables bound by this query.
    #[must_use]
    pub const fn bound_variables(&self) -> &BTreeSet<String> {
        &self.bound
    }
}

impl fmt::Display for CompiledQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

///
/// QueryParts
///
/// Shared accumulation state for the read-query builders.
///

#[derive(Clone, Debug, Default)]
struct QueryParts {
    filters: Vec<(String, Value)>,
    expressions: Vec<Expression>,
    sort: Vec<SortKey>,
    offset: Option<u32>,
    limit: Option<u32>,
    reduce: Vec<AggregateExpression>,
    group: Option<GroupExpression>,
}

impl QueryParts {
    fn is_reduction(&self) -> bool {
        !self.reduce.is_empty() || self.group.is_some()
    }

    /// Assemble the accumulated parts against an already-compiled filter.
    fn assemble(
        &self,
        prefix: &str,
        compiled: &CompiledFilter,
        head_fragments: Vec<String>,
    ) -> Result<(ClauseBuilder, BTreeSet<String>), QueryError> {
        let mut bound = compiled.bound_variables().clone();
        let mut seen = BTreeSet::new();
        let mut clauses = ClauseBuilder::new();

        for fragment in head_fragments
            .into_iter()
            .chain(compiled.match_fragments().iter().cloned())
        {
            if seen.insert(fragment.clone()) {
                clauses = clauses.match_fragment(fragment);
            }
        }

        for expression in &self.expressions {
            let pattern = expression.to_pattern(prefix)?;
            if seen.insert(pattern.clone()) {
                clauses = clauses.match_fragment(pattern);
            }
        }

        for aggregate in &self.reduce {
            let attr = aggregate.attribute().name();
            if bound.insert(scoped_var(prefix, attr)) {
                clauses = clauses.match_fragment(binding(prefix, attr));
            }
            clauses = clauses.reduce_fragment(aggregate.reduce_fragment(prefix));
        }

        if let Some(group) = &self.group {
            for attribute in group.referenced_attributes() {
                if bound.insert(scoped_var(prefix, attribute.name())) {
                    clauses = clauses.match_fragment(binding(prefix, attribute.name()));
                }
            }
            clauses = clauses.reduce_fragment(group.reduce_fragment(prefix));
        }

        for (var, direction) in compiled.sort_entries() {
            clauses = clauses.sort_entry(var.clone(), *direction);
        }
        if let Some(offset) = self.offset {
            clauses = clauses.offset(offset);
        }
        if let Some(limit) = self.limit {
            clauses = clauses.limit(limit);
        }

        Ok((clauses, bound))
    }
}

///
/// EntityQuery
///

pub struct EntityQuery<'m> {
    model: &'m EntityModel,
    var: String,
    parts: QueryParts,
}

impl<'m> EntityQuery<'m> {
    #[must_use]
    pub fn new(model: &'m EntityModel) -> Self {
        Self {
            model,
            var: crate::ENTITY_VAR.to_string(),
            parts: QueryParts::default(),
        }
    }

    /// Override the owner variable prefix.
    #[must_use]
    pub fn var(mut self, prefix: impl Into<String>) -> Self {
        self.var = prefix.into();
        self
    }

    /// Add one filter entry (`field[__operator]` → value).
    #[must_use]
    pub fn filter(mut self, path: impl Into<String>, value: impl Into<Value>) -> Self {
        self.parts.filters.push((path.into(), value.into()));
        self
    }

    /// Add one pre-built expression, AND-composed with everything else.
    #[must_use]
    pub fn filter_expr(mut self, expression: Expression) -> Self {
        self.parts.expressions.push(expression);
        self
    }

    /// Append a sort key; a leading `-` means descending.
    #[must_use]
    pub fn sort(mut self, key: &str) -> Self {
        self.parts.sort.push(SortKey::parse(key));
        self
    }

    #[must_use]
    pub const fn offset(mut self, n: u32) -> Self {
        self.parts.offset = Some(n);
        self
    }

    #[must_use]
    pub const fn limit(mut self, n: u32) -> Self {
        self.parts.limit = Some(n);
        self
    }

    /// Add one aggregate reduction; the query becomes a reduce query and
    /// no fetch block is emitted.
    #[must_use]
    pub fn reduce(mut self, aggregate: AggregateExpression) -> Self {
        self.parts.reduce.push(aggregate);
        self
    }

    /// Group reductions by one attribute.
    #[must_use]
    pub fn group(mut self, group: GroupExpression) -> Self {
        self.parts.group = Some(group);
        self
    }

    /// Resolve, validate, and render the query.
    pub fn build(self) -> Result<CompiledQuery, QueryError> {
        let prefix = self.var.as_str();
        let compiled = FilterCompiler::entity(self.model, prefix).compile(
            &self.parts.filters,
            &self.parts.sort,
            self.parts.offset.is_some(),
        )?;

        let head = vec![format!("${prefix} isa {}", self.model.type_name())];
        let (mut clauses, bound) = self.parts.assemble(prefix, &compiled, head)?;

        if !self.parts.is_reduction() {
            clauses = clauses.fetch(FetchEntry::all(prefix));
        }

        Ok(CompiledQuery {
            text: clauses.build(),
            operators: compiled.operators().to_vec(),
            bound,
        })
    }
}

///
/// RelationQuery
///
/// Read query over a relation registry. Every declared role is bound in
/// the match block so role players are always fetchable; filter paths may
/// traverse roles.
///

pub struct RelationQuery<'m> {
    model: &'m RelationModel,
    var: String,
    parts: QueryParts,
}

impl<'m> RelationQuery<'m> {
    #[must_use]
    pub fn new(model: &'m RelationModel) -> Self {
        Self {
            model,
            var: crate::RELATION_VAR.to_string(),
            parts: QueryParts::default(),
        }
    }

    /// Override the owner variable prefix.
    #[must_use]
    pub fn var(mut self, prefix: impl Into<String>) -> Self {
        self.var = prefix.into();
        self
    }

    /// Add one filter entry; `role__field[__operator]` traverses a role.
    #[must_use]
    pub fn filter(mut self, path: impl Into<String>, value: impl Into<Value>) -> Self {
        self.parts.filters.push((path.into(), value.into()));
        self
    }

    /// Add one pre-built expression, AND-composed with everything else.
    #[must_use]
    pub fn filter_expr(mut self, expression: Expression) -> Self {
        self.parts.expressions.push(expression);
        self
    }

    /// Append a sort key; a leading `-` means descending.
    #[must_use]
    pub fn sort(mut self, key: &str) -> Self {
        self.parts.sort.push(SortKey::parse(key));
        self
    }

    #[must_use]
    pub const fn offset(mut self, n: u32) -> Self {
        self.parts.offset = Some(n);
        self
    }

    #[must_use]
    pub const fn limit(mut self, n: u32) -> Self {
        self.parts.limit = Some(n);
        self
    }

    #[must_use]
    pub fn reduce(mut self, aggregate: AggregateExpression) -> Self {
        self.parts.reduce.push(aggregate);
        self
    }

    #[must_use]
    pub fn group(mut self, group: GroupExpression) -> Self {
        self.parts.group = Some(group);
        self
    }

    /// Resolve, validate, and render the query.
    pub fn build(self) -> Result<CompiledQuery, QueryError> {
        let prefix = self.var.as_str();
        let compiled = FilterCompiler::relation(self.model, prefix).compile(
            &self.parts.filters,
            &self.parts.sort,
            self.parts.offset.is_some(),
        )?;

        let mut head = vec![format!("${prefix} isa {}", self.model.type_name())];
        for role in self.model.roles() {
            head.push(role.link_fragment(prefix));
        }

        let (mut clauses, bound) = self.parts.assemble(prefix, &compiled, head)?;

        if !self.parts.is_reduction() {
            clauses = clauses.fetch(FetchEntry::all(prefix));
            for role in self.model.roles() {
                clauses = clauses.fetch(FetchEntry::nested(
                    role.field(),
                    vec![FetchEntry::all(role.field())],
                ));
            }
        }

        Ok(CompiledQuery {
            text: clauses.build(),
            operators: compiled.operators().to_vec(),
            bound,
        })
    }
}

///
/// InsertQuery
///
/// Insert-statement builder over an entity registry. Field values are
/// accumulated in declaration order; list values expand to one `has`
/// clause per item.
///

pub struct InsertQuery<'m> {
    model: &'m EntityModel,
    var: String,
    values: Vec<(String, Value)>,
}

impl<'m> InsertQuery<'m> {
    #[must_use]
    pub fn new(model: &'m EntityModel) -> Self {
        Self {
            model,
            var: crate::ENTITY_VAR.to_string(),
            values: Vec::new(),
        }
    }

    /// Override the owner variable prefix.
    #[must_use]
    pub fn var(mut self, prefix: impl Into<String>) -> Self {
        self.var = prefix.into();
        self
    }

    /// Set one field value.
    #[must_use]
    pub fn set(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.values.push((field.into(), value.into()));
        self
    }

    /// Resolve fields and render the insert statement.
    pub fn build(self) -> Result<CompiledQuery, QueryError> {
        let mut parts = vec![format!("${var} isa {}", self.model.type_name(), var = self.var)];

        for (field, value) in &self.values {
            let owned = self.model.owned(field).ok_or_else(|| {
                FilterError::InvalidFilterField {
                    field: field.clone(),
                    type_name: self.model.type_name().to_string(),
                    attributes: self.model.field_names().join(", "),
                    roles: String::new(),
                }
            })?;
            let attr = owned.attribute().name();

            let items = match value {
                Value::List(items) => items.clone(),
                scalar => vec![scalar.clone()],
            };
            for item in items {
                let literal = item.render().map_err(ExprError::from).map_err(QueryError::Expr)?;
                parts.push(format!("has {attr} {literal}"));
            }
        }

        let text = ClauseBuilder::new().insert_fragment(parts.join(", ")).build();

        Ok(CompiledQuery {
            text,
            operators: Vec::new(),
            bound: BTreeSet::new(),
        })
    }
}

///
/// DeleteQuery
///
/// Match-then-delete builder: the filter surface of `EntityQuery` with a
/// delete block targeting the owner variable instead of a fetch.
///

pub struct DeleteQuery<'m> {
    model: &'m EntityModel,
    var: String,
    filters: Vec<(String, Value)>,
    expressions: Vec<Expression>,
}

impl<'m> DeleteQuery<'m> {
    #[must_use]
    pub fn new(model: &'m EntityModel) -> Self {
        Self {
            model,
            var: crate::ENTITY_VAR.to_string(),
            filters: Vec::new(),
            expressions: Vec::new(),
        }
    }

    /// Override the owner variable prefix.
    #[must_use]
    pub fn var(mut self, prefix: impl Into<String>) -> Self {
        self.var = prefix.into();
        self
    }

    /// Add one filter entry.
    #[must_use]
    pub fn filter(mut self, path: impl Into<String>, value: impl Into<Value>) -> Self {
        self.filters.push((path.into(), value.into()));
        self
    }

    /// Add one pre-built expression.
    #[must_use]
    pub fn filter_expr(mut self, expression: Expression) -> Self {
        self.expressions.push(expression);
        self
    }

    /// Resolve, validate, and render the delete statement.
    pub fn build(self) -> Result<CompiledQuery, QueryError> {
        let prefix = self.var.as_str();
        let compiled =
            FilterCompiler::entity(self.model, prefix).compile(&self.filters, &[], false)?;

        let mut clauses = ClauseBuilder::new()
            .match_fragment(format!("${prefix} isa {}", self.model.type_name()));
        for fragment in compiled.match_fragments() {
            clauses = clauses.match_fragment(fragment.clone());
        }
        for expression in &self.expressions {
            clauses = clauses.match_fragment(expression.to_pattern(prefix)?);
        }
        clauses = clauses.delete_fragment(format!("${prefix}"));

        Ok(CompiledQuery {
            text: clauses.build(),
            operators: compiled.operators().to_vec(),
            bound: compiled.bound_variables().clone(),
        })
    }
}
