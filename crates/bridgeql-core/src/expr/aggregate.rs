use crate::{
    STATEMENT_SEPARATOR,
    expr::{ExprError, binding, scoped_var},
    model::AttributeModel,
};
use derive_more::Display;

///
/// AggregateFn
///

#[derive(Clone, Copy, Debug, Display, Eq, PartialEq)]
#[remain::sorted]
pub enum AggregateFn {
    #[display("count")]
    Count,
    #[display("max")]
    Max,
    #[display("mean")]
    Mean,
    #[display("median")]
    Median,
    #[display("min")]
    Min,
    #[display("std")]
    Std,
    #[display("sum")]
    Sum,
}

///
/// AggregateExpression
///
/// One reduction over an attribute: an existence binding in the match block
/// plus a reduce assignment `$<result> = <fn>($<prefix>_<attr>)`. The
/// result variable defaults to `<fn>_<attr>` unless an alias is given.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AggregateExpression {
    attribute: AttributeModel,
    function: AggregateFn,
    alias: Option<String>,
}

impl AggregateExpression {
    #[must_use]
    pub const fn new(attribute: AttributeModel, function: AggregateFn) -> Self {
        Self {
            attribute,
            function,
            alias: None,
        }
    }

    /// Override the result variable name.
    #[must_use]
    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    #[must_use]
    pub const fn attribute(&self) -> &AttributeModel {
        &self.attribute
    }

    #[must_use]
    pub const fn function(&self) -> AggregateFn {
        self.function
    }

    /// Name of the variable the reduction assigns into.
    #[must_use]
    pub fn result_var(&self) -> String {
        self.alias.clone().unwrap_or_else(|| {
            format!("{func}_{attr}", func = self.function, attr = self.attribute.name())
        })
    }

    /// Match-block existence binding for the aggregated attribute.
    #[must_use]
    pub fn to_pattern(&self, prefix: &str) -> String {
        binding(prefix, self.attribute.name())
    }

    /// Reduce-block assignment fragment.
    #[must_use]
    pub fn reduce_fragment(&self, prefix: &str) -> String {
        format!(
            "${result} = {func}({var})",
            result = self.result_var(),
            func = self.function,
            var = scoped_var(prefix, self.attribute.name()),
        )
    }
}

///
/// GroupExpression
///
/// Grouped reduction: binds the group attribute plus every aggregate's
/// attribute, then emits one reduce fragment listing all assignments
/// suffixed with `within` the scoped group variable.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct GroupExpression {
    group: AttributeModel,
    aggregates: Vec<AggregateExpression>,
}

impl GroupExpression {
    pub fn new(
        group: AttributeModel,
        aggregates: Vec<AggregateExpression>,
    ) -> Result<Self, ExprError> {
        if aggregates.is_empty() {
            return Err(ExprError::EmptyGroup);
        }

        Ok(Self { group, aggregates })
    }

    #[must_use]
    pub const fn group(&self) -> &AttributeModel {
        &self.group
    }

    #[must_use]
    pub fn aggregates(&self) -> &[AggregateExpression] {
        &self.aggregates
    }

    #[must_use]
    pub fn referenced_attributes(&self) -> Vec<AttributeModel> {
        let mut attrs = vec![self.group.clone()];
        attrs.extend(
            self.aggregates
                .iter()
                .map(|aggregate| aggregate.attribute().clone()),
        );
        attrs
    }

    /// Match-block bindings for the group attribute and every aggregated
    /// attribute, deduplicated by scoped variable.
    #[must_use]
    pub fn to_pattern(&self, prefix: &str) -> String {
        let mut seen = Vec::new();
        let mut fragments = Vec::new();

        for attribute in self.referenced_attributes() {
            let var = scoped_var(prefix, attribute.name());
            if seen.contains(&var) {
                continue;
            }
            fragments.push(binding(prefix, attribute.name()));
            seen.push(var);
        }

        fragments.join(STATEMENT_SEPARATOR)
    }

    /// Reduce-block fragment covering every aggregate assignment.
    #[must_use]
    pub fn reduce_fragment(&self, prefix: &str) -> String {
        let assignments = self
            .aggregates
            .iter()
            .map(|aggregate| aggregate.reduce_fragment(prefix))
            .collect::<Vec<_>>()
            .join(", ");

        format!(
            "{assignments} within {group}",
            group = scoped_var(prefix, self.group.name()),
        )
    }
}
