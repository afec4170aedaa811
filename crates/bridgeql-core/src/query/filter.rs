use crate::{
    expr::{CompareOp, ExprError, SetExpression, binding, scoped_var},
    model::{EntityModel, OwnedAttribute, RelationModel, RoleModel},
    query::clause::Direction,
    value::Value,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use thiserror::Error as ThisError;

/// Delimiter between path segments and the trailing operator suffix.
const PATH_DELIMITER: &str = "__";

///
/// FilterError
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum FilterError {
    #[error(
        "unknown filter field '{field}' on type '{type_name}'; valid attributes: [{attributes}], valid roles: [{roles}]"
    )]
    InvalidFilterField {
        field: String,
        type_name: String,
        attributes: String,
        roles: String,
    },

    #[error("unknown sort field '{field}' on type '{type_name}'")]
    InvalidSortField { field: String, type_name: String },

    #[error("unsupported filter operator '{op}' on field '{field}'")]
    UnsupportedOperator { field: String, op: String },

    #[error(transparent)]
    Expr(#[from] ExprError),
}

///
/// FilterOp
///
/// Operator suffixes accepted in filter field-paths. Every suffix maps to
/// an explicit constraint; a bare field-path means equality, never the
/// target language's implicit-equality shorthand.
///

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[remain::sorted]
pub enum FilterOp {
    Contains,
    Eq,
    Gt,
    Gte,
    In,
    Lt,
    Lte,
    Ne,
}

impl FilterOp {
    fn from_suffix(tag: &str) -> Option<Self> {
        match tag {
            "exact" | "eq" => Some(Self::Eq),
            "ne" | "neq" => Some(Self::Ne),
            "gt" => Some(Self::Gt),
            "gte" => Some(Self::Gte),
            "lt" => Some(Self::Lt),
            "lte" => Some(Self::Lte),
            "contains" => Some(Self::Contains),
            "in" => Some(Self::In),
            _ => None,
        }
    }
}

///
/// SortKey
///
/// One sort request: a field-path with optional leading `-` for descending.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct SortKey {
    field: String,
    direction: Direction,
}

impl SortKey {
    #[must_use]
    pub fn new(field: impl Into<String>, direction: Direction) -> Self {
        Self {
            field: field.into(),
            direction,
        }
    }

    /// Parse the `-`-prefixed descending convention.
    #[must_use]
    pub fn parse(key: &str) -> Self {
        key.strip_prefix('-').map_or_else(
            || Self::new(key, Direction::Asc),
            |field| Self::new(field, Direction::Desc),
        )
    }

    #[must_use]
    pub fn field(&self) -> &str {
        &self.field
    }

    #[must_use]
    pub const fn direction(&self) -> Direction {
        self.direction
    }
}

///
/// ResolvedOperator
///
/// Introspection record for one compiled filter entry.
///

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct ResolvedOperator {
    pub path: String,
    pub attribute: String,
    pub op: FilterOp,
    pub var: String,
}

///
/// CompiledFilter
///
/// Output of one filter compilation: match fragments in emission order,
/// resolved sort entries, and introspection surfaces (the resolved operator
/// list and the set of bound scoped variable names).
///

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct CompiledFilter {
    match_fragments: Vec<String>,
    sort_entries: Vec<(String, Direction)>,
    operators: Vec<ResolvedOperator>,
    bound: BTreeSet<String>,
}

impl CompiledFilter {
    #[must_use]
    pub fn match_fragments(&self) -> &[String] {
        &self.match_fragments
    }

    #[must_use]
    pub fn sort_entries(&self) -> &[(String, Direction)] {
        &self.sort_entries
    }

    #[must_use]
    pub fn operators(&self) -> &[ResolvedOperator] {
        &self.operators
    }

    #[must_use]
    pub const fn bound_variables(&self) -> &BTreeSet<String> {
        &self.bound
    }
}

///
/// FilterCompiler
///
/// Resolves a flat filter/sort map against one type's registry and emits
/// match-clause fragments plus sort entries.
///
/// Field-paths split on `__`: the first segment resolves against owned
/// attributes, or (relation queries) against a role field when further
/// segments remain; role traversal prefixes the scoped variable with the
/// role field name, so a player attribute can never collide with a
/// relation-level attribute of the same underlying name.
///

pub struct FilterCompiler<'m> {
    entity: &'m EntityModel,
    roles: &'m [RoleModel],
    var: &'m str,
}

/// Where one resolved path binds: the owner prefix and, for role paths,
/// the role whose link fragment must be present.
struct ResolvedPath<'m> {
    owned: &'m OwnedAttribute,
    prefix: &'m str,
    role: Option<&'m RoleModel>,
    suffix: Option<&'m str>,
}

impl<'m> FilterCompiler<'m> {
    /// Compiler for an entity type; role traversal is unavailable.
    #[must_use]
    pub const fn entity(model: &'m EntityModel, var: &'m str) -> Self {
        Self {
            entity: model,
            roles: &[],
            var,
        }
    }

    /// Compiler for a relation type; filter paths may traverse roles.
    #[must_use]
    pub fn relation(model: &'m RelationModel, var: &'m str) -> Self {
        Self {
            entity: model.entity(),
            roles: model.roles(),
            var,
        }
    }

    /// Compile the filter map and sort spec.
    ///
    /// `offset_requested` drives the pagination-determinism rule: when set
    /// and no sort was given, a deterministic sort is synthesized from the
    /// type's pagination anchor (first key attribute, else first mandatory
    /// attribute). A type with no anchor keeps its offset and the ordering
    /// is unspecified. A documented limitation, not an error.
    pub fn compile(
        &self,
        filters: &[(String, Value)],
        sort: &[SortKey],
        offset_requested: bool,
    ) -> Result<CompiledFilter, FilterError> {
        let mut out = CompiledFilter::default();
        let mut outer_bound = BTreeSet::new();
        let mut linked_roles = BTreeSet::new();

        for (path, value) in filters {
            let resolved = self.resolve(path)?;
            let op = match resolved.suffix {
                Some(tag) => {
                    FilterOp::from_suffix(tag).ok_or_else(|| FilterError::UnsupportedOperator {
                        field: path.clone(),
                        op: tag.to_string(),
                    })?
                }
                None => FilterOp::Eq,
            };

            self.link_role(&mut out, &mut linked_roles, resolved.role);
            self.emit(&mut out, &mut outer_bound, &resolved, path, op, value)?;
        }

        for key in sort {
            let resolved = self.resolve_sort(key.field())?;

            self.link_role(&mut out, &mut linked_roles, resolved.role);
            let var = self.bind(&mut out, &mut outer_bound, &resolved);
            out.sort_entries.push((var, key.direction()));
        }

        if offset_requested
            && out.sort_entries.is_empty()
            && let Some(anchor) = self.entity.pagination_anchor()
        {
            let resolved = ResolvedPath {
                owned: anchor,
                prefix: self.var,
                role: None,
                suffix: None,
            };
            let var = self.bind(&mut out, &mut outer_bound, &resolved);
            out.sort_entries.push((var, Direction::Asc));
        }

        Ok(out)
    }

    /// Resolve one filter field-path into its ownership entry, variable
    /// prefix, and optional operator suffix.
    fn resolve<'a>(&'a self, path: &'a str) -> Result<ResolvedPath<'a>, FilterError> {
        let segments: Vec<&str> = path.split(PATH_DELIMITER).collect();
        let base = segments[0];

        if let Some(owned) = self.entity.owned(base) {
            if segments.len() > 2 {
                return Err(FilterError::UnsupportedOperator {
                    field: path.to_string(),
                    op: segments[1..].join(PATH_DELIMITER),
                });
            }

            return Ok(ResolvedPath {
                owned,
                prefix: self.var,
                role: None,
                suffix: segments.get(1).copied(),
            });
        }

        if let Some(role) = self.find_role(base)
            && segments.len() >= 2
        {
            if segments.len() > 3 {
                return Err(FilterError::UnsupportedOperator {
                    field: path.to_string(),
                    op: segments[2..].join(PATH_DELIMITER),
                });
            }

            let owned = role
                .player_attribute(segments[1])
                .ok_or_else(|| self.invalid_field(path))?;

            return Ok(ResolvedPath {
                owned,
                prefix: role.field(),
                role: Some(role),
                suffix: segments.get(2).copied(),
            });
        }

        Err(self.invalid_field(path))
    }

    /// Resolve one sort field-path; operator suffixes are not permitted.
    fn resolve_sort<'a>(&'a self, path: &'a str) -> Result<ResolvedPath<'a>, FilterError> {
        let segments: Vec<&str> = path.split(PATH_DELIMITER).collect();
        let base = segments[0];

        if segments.len() == 1
            && let Some(owned) = self.entity.owned(base)
        {
            return Ok(ResolvedPath {
                owned,
                prefix: self.var,
                role: None,
                suffix: None,
            });
        }

        if segments.len() == 2
            && let Some(role) = self.find_role(base)
            && let Some(owned) = role.player_attribute(segments[1])
        {
            return Ok(ResolvedPath {
                owned,
                prefix: role.field(),
                role: Some(role),
                suffix: None,
            });
        }

        Err(FilterError::InvalidSortField {
            field: path.to_string(),
            type_name: self.entity.type_name().to_string(),
        })
    }

    fn find_role(&self, field: &str) -> Option<&'m RoleModel> {
        self.roles.iter().find(|role| role.field() == field)
    }

    fn invalid_field(&self, path: &str) -> FilterError {
        FilterError::InvalidFilterField {
            field: path.to_string(),
            type_name: self.entity.type_name().to_string(),
            attributes: self.entity.field_names().join(", "),
            roles: self
                .roles
                .iter()
                .map(RoleModel::field)
                .collect::<Vec<_>>()
                .join(", "),
        }
    }

    /// Emit the deduplicated role link fragment for a traversed role.
    fn link_role(
        &self,
        out: &mut CompiledFilter,
        linked: &mut BTreeSet<String>,
        role: Option<&RoleModel>,
    ) {
        if let Some(role) = role
            && linked.insert(role.field().to_string())
        {
            out.match_fragments.push(role.link_fragment(self.var));
        }
    }

    /// Emit the binding fragment for a resolved attribute unless its scoped
    /// variable is already bound; returns the variable either way.
    fn bind(
        &self,
        out: &mut CompiledFilter,
        outer_bound: &mut BTreeSet<String>,
        resolved: &ResolvedPath<'_>,
    ) -> String {
        let attr = resolved.owned.attribute().name();
        let var = scoped_var(resolved.prefix, attr);

        if outer_bound.insert(var.clone()) {
            out.match_fragments.push(binding(resolved.prefix, attr));
        }
        out.bound.insert(var.clone());

        var
    }

    /// Emit the constraint fragments for one resolved filter entry.
    fn emit(
        &self,
        out: &mut CompiledFilter,
        outer_bound: &mut BTreeSet<String>,
        resolved: &ResolvedPath<'_>,
        path: &str,
        op: FilterOp,
        value: &Value,
    ) -> Result<(), FilterError> {
        let attribute = resolved.owned.attribute();

        let var = match op {
            FilterOp::In => {
                // Membership binds inside each OR branch; no outer binding.
                let values = match value {
                    Value::List(items) => items.clone(),
                    scalar => vec![scalar.clone()],
                };
                let expr = SetExpression::new(attribute.clone(), values)?;
                let var = scoped_var(resolved.prefix, attribute.name());

                out.match_fragments.push(expr.to_pattern(resolved.prefix)?);
                out.bound.insert(var.clone());
                var
            }
            FilterOp::Contains => {
                let text = value.as_text().ok_or(ExprError::TextValueRequired)?;
                let literal = Value::Text(text.to_string())
                    .render()
                    .map_err(ExprError::from)?;
                let var = self.bind(out, outer_bound, resolved);

                out.match_fragments.push(format!("{var} contains {literal}"));
                var
            }
            comparison => {
                let compare = match comparison {
                    FilterOp::Ne => CompareOp::Ne,
                    FilterOp::Lt => CompareOp::Lt,
                    FilterOp::Lte => CompareOp::Lte,
                    FilterOp::Gt => CompareOp::Gt,
                    FilterOp::Gte => CompareOp::Gte,
                    _ => CompareOp::Eq,
                };
                let literal = value.render().map_err(ExprError::from)?;
                let var = self.bind(out, outer_bound, resolved);

                out.match_fragments
                    .push(format!("{var} {compare} {literal}"));
                var
            }
        };

        out.operators.push(ResolvedOperator {
            path: path.to_string(),
            attribute: attribute.name().to_string(),
            op,
            var,
        });

        Ok(())
    }
}
