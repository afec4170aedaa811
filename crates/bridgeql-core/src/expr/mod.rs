mod aggregate;
mod boolean;
mod compare;
mod text;

#[cfg(test)]
mod tests;

pub use aggregate::{AggregateExpression, AggregateFn, GroupExpression};
pub use boolean::{BoolOp, BooleanExpression};
pub use compare::{CompareExpression, CompareOp, ExistsExpression, RangeExpression, SetExpression};
pub use text::{TextExpression, TextOp, escape_pattern};

use crate::{
    model::AttributeModel,
    value::{LiteralError, Value},
};
use thiserror::Error as ThisError;

///
/// Expression Model
///
/// Pure, schema-agnostic representation of query constraints. Expressions
/// are immutable once constructed; all validation (arity, emptiness, null
/// literals, tag resolution) happens at construction time, and rendering is
/// a deterministic transformation into match-block text.
///

///
/// ExprError
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum ExprError {
    #[error("`{keyword}` requires {expected} operand(s), got {actual}")]
    CombinatorArity {
        keyword: &'static str,
        expected: &'static str,
        actual: usize,
    },

    #[error("set membership requires at least one candidate value")]
    EmptyMembership,

    #[error("grouped aggregation requires at least one aggregate")]
    EmptyGroup,

    #[error(transparent)]
    Literal(#[from] LiteralError),

    #[error("text operation requires a string value")]
    TextValueRequired,

    #[error("unsupported text operation tag '{tag}'")]
    UnsupportedTextOperation { tag: String },
}

/// Scoped variable for one attribute access: `$<prefix>_<attr>`.
///
/// Uniqueness within one compiled query is what prevents two unrelated
/// constraints from being forced into an unintended equality.
#[must_use]
pub fn scoped_var(prefix: &str, attribute: &str) -> String {
    format!("${prefix}_{attribute}")
}

/// Binding fragment tying the owner variable to a fresh attribute variable:
/// `$<prefix> has <attr> $<prefix>_<attr>`.
#[must_use]
pub fn binding(prefix: &str, attribute: &str) -> String {
    format!("${prefix} has {attribute} ${prefix}_{attribute}")
}

///
/// Expression
///
/// Sum type over every constraint form. Rendering matches exhaustively;
/// there is no operator-tag string dispatch anywhere in the tree.
///

#[derive(Clone, Debug, PartialEq)]
pub enum Expression {
    Aggregate(AggregateExpression),
    Boolean(BooleanExpression),
    Compare(CompareExpression),
    Exists(ExistsExpression),
    Group(GroupExpression),
    InSet(SetExpression),
    Range(RangeExpression),
    Text(TextExpression),
}

impl Expression {
    ///
    /// CONSTRUCTION
    ///

    pub fn eq(attribute: AttributeModel, value: impl Into<Value>) -> Result<Self, ExprError> {
        CompareExpression::new(attribute, CompareOp::Eq, value.into()).map(Self::Compare)
    }

    pub fn ne(attribute: AttributeModel, value: impl Into<Value>) -> Result<Self, ExprError> {
        CompareExpression::new(attribute, CompareOp::Ne, value.into()).map(Self::Compare)
    }

    pub fn lt(attribute: AttributeModel, value: impl Into<Value>) -> Result<Self, ExprError> {
        CompareExpression::new(attribute, CompareOp::Lt, value.into()).map(Self::Compare)
    }

    pub fn lte(attribute: AttributeModel, value: impl Into<Value>) -> Result<Self, ExprError> {
        CompareExpression::new(attribute, CompareOp::Lte, value.into()).map(Self::Compare)
    }

    pub fn gt(attribute: AttributeModel, value: impl Into<Value>) -> Result<Self, ExprError> {
        CompareExpression::new(attribute, CompareOp::Gt, value.into()).map(Self::Compare)
    }

    pub fn gte(attribute: AttributeModel, value: impl Into<Value>) -> Result<Self, ExprError> {
        CompareExpression::new(attribute, CompareOp::Gte, value.into()).map(Self::Compare)
    }

    #[must_use]
    pub fn contains(attribute: AttributeModel, value: impl Into<String>) -> Self {
        Self::Text(TextExpression::new(attribute, TextOp::Contains, value.into()))
    }

    #[must_use]
    pub fn like(attribute: AttributeModel, pattern: impl Into<String>) -> Self {
        Self::Text(TextExpression::new(attribute, TextOp::Like, pattern.into()))
    }

    #[must_use]
    pub fn starts_with(attribute: AttributeModel, value: impl Into<String>) -> Self {
        Self::Text(TextExpression::new(attribute, TextOp::StartsWith, value.into()))
    }

    #[must_use]
    pub fn ends_with(attribute: AttributeModel, value: impl Into<String>) -> Self {
        Self::Text(TextExpression::new(attribute, TextOp::EndsWith, value.into()))
    }

    #[must_use]
    pub const fn exists(attribute: AttributeModel) -> Self {
        Self::Exists(ExistsExpression::new(attribute))
    }

    pub fn in_set(
        attribute: AttributeModel,
        values: Vec<Value>,
    ) -> Result<Self, ExprError> {
        SetExpression::new(attribute, values).map(Self::InSet)
    }

    pub fn range(
        attribute: AttributeModel,
        min: impl Into<Value>,
        max: impl Into<Value>,
        inclusive: bool,
    ) -> Result<Self, ExprError> {
        RangeExpression::new(attribute, min.into(), max.into(), inclusive).map(Self::Range)
    }

    pub fn and(operands: Vec<Self>) -> Result<Self, ExprError> {
        BooleanExpression::and(operands).map(Self::Boolean)
    }

    pub fn or(operands: Vec<Self>) -> Result<Self, ExprError> {
        BooleanExpression::or(operands).map(Self::Boolean)
    }

    #[expect(clippy::should_implement_trait)]
    #[must_use]
    pub fn not(operand: Self) -> Self {
        Self::Boolean(BooleanExpression::negate(operand))
    }

    ///
    /// RENDERING
    ///

    /// Render this expression as match-block text scoped under the given
    /// owner variable prefix.
    pub fn to_pattern(&self, prefix: &str) -> Result<String, ExprError> {
        match self {
            Self::Aggregate(expr) => Ok(expr.to_pattern(prefix)),
            Self::Boolean(expr) => expr.to_pattern(prefix),
            Self::Compare(expr) => expr.to_pattern(prefix),
            Self::Exists(expr) => Ok(expr.to_pattern(prefix)),
            Self::Group(expr) => Ok(expr.to_pattern(prefix)),
            Self::InSet(expr) => expr.to_pattern(prefix),
            Self::Range(expr) => expr.to_pattern(prefix),
            Self::Text(expr) => expr.to_pattern(prefix),
        }
    }

    /// Every attribute descriptor referenced anywhere in the tree, in
    /// render order. Duplicates are preserved; callers deduplicate.
    #[must_use]
    pub fn referenced_attributes(&self) -> Vec<AttributeModel> {
        match self {
            Self::Aggregate(expr) => vec![expr.attribute().clone()],
            Self::Boolean(expr) => expr
                .operands()
                .iter()
                .flat_map(Self::referenced_attributes)
                .collect(),
            Self::Compare(expr) => vec![expr.attribute().clone()],
            Self::Exists(expr) => vec![expr.attribute().clone()],
            Self::Group(expr) => expr.referenced_attributes(),
            Self::InSet(expr) => vec![expr.attribute().clone()],
            Self::Range(expr) => vec![expr.attribute().clone()],
            Self::Text(expr) => vec![expr.attribute().clone()],
        }
    }
}
