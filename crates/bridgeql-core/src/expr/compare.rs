use crate::{
    STATEMENT_SEPARATOR,
    expr::{ExprError, binding, scoped_var},
    model::AttributeModel,
    value::Value,
};
use derive_more::Display;

///
/// CompareOp
///

#[derive(Clone, Copy, Debug, Display, Eq, PartialEq)]
pub enum CompareOp {
    #[display("==")]
    Eq,
    #[display("!=")]
    Ne,
    #[display("<")]
    Lt,
    #[display("<=")]
    Lte,
    #[display(">")]
    Gt,
    #[display(">=")]
    Gte,
}

///
/// CompareExpression
///
/// One comparison against an attribute: a binding fragment introducing the
/// scoped variable, then the comparison itself. Never compiles to the
/// implicit-equality shorthand of the target language.
///

#[derive(Clone, Debug, PartialEq)]
pub struct CompareExpression {
    attribute: AttributeModel,
    op: CompareOp,
    value: Value,
}

impl CompareExpression {
    /// Construct a comparison; null values are rejected here, before any
    /// query is assembled.
    pub fn new(attribute: AttributeModel, op: CompareOp, value: Value) -> Result<Self, ExprError> {
        if value.is_null() {
            return Err(crate::value::LiteralError::NullLiteral.into());
        }

        Ok(Self {
            attribute,
            op,
            value,
        })
    }

    pub fn eq(attribute: AttributeModel, value: Value) -> Result<Self, ExprError> {
        Self::new(attribute, CompareOp::Eq, value)
    }

    pub fn ne(attribute: AttributeModel, value: Value) -> Result<Self, ExprError> {
        Self::new(attribute, CompareOp::Ne, value)
    }

    pub fn lt(attribute: AttributeModel, value: Value) -> Result<Self, ExprError> {
        Self::new(attribute, CompareOp::Lt, value)
    }

    pub fn lte(attribute: AttributeModel, value: Value) -> Result<Self, ExprError> {
        Self::new(attribute, CompareOp::Lte, value)
    }

    pub fn gt(attribute: AttributeModel, value: Value) -> Result<Self, ExprError> {
        Self::new(attribute, CompareOp::Gt, value)
    }

    pub fn gte(attribute: AttributeModel, value: Value) -> Result<Self, ExprError> {
        Self::new(attribute, CompareOp::Gte, value)
    }

    #[must_use]
    pub const fn attribute(&self) -> &AttributeModel {
        &self.attribute
    }

    #[must_use]
    pub const fn op(&self) -> CompareOp {
        self.op
    }

    #[must_use]
    pub const fn value(&self) -> &Value {
        &self.value
    }

    pub fn to_pattern(&self, prefix: &str) -> Result<String, ExprError> {
        let attr = self.attribute.name();
        let var = scoped_var(prefix, attr);
        let literal = self.value.render()?;

        Ok(format!(
            "{bind}{sep}{var} {op} {literal}",
            bind = binding(prefix, attr),
            sep = STATEMENT_SEPARATOR,
            op = self.op,
        ))
    }
}

///
/// ExistsExpression
///
/// Presence of the binding is the assertion; no comparison is emitted.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ExistsExpression {
    attribute: AttributeModel,
}

impl ExistsExpression {
    #[must_use]
    pub const fn new(attribute: AttributeModel) -> Self {
        Self { attribute }
    }

    #[must_use]
    pub const fn attribute(&self) -> &AttributeModel {
        &self.attribute
    }

    #[must_use]
    pub fn to_pattern(&self, prefix: &str) -> String {
        binding(prefix, self.attribute.name())
    }
}

///
/// SetExpression
///
/// Membership against a fixed candidate set. Compiles to one OR whose
/// operands are self-contained blocks, each re-binding the scoped variable
/// and constraining it to one candidate literal.
///

#[derive(Clone, Debug, PartialEq)]
pub struct SetExpression {
    attribute: AttributeModel,
    values: Vec<Value>,
}

impl SetExpression {
    pub fn new(attribute: AttributeModel, values: Vec<Value>) -> Result<Self, ExprError> {
        if values.is_empty() {
            return Err(ExprError::EmptyMembership);
        }
        if values.iter().any(Value::is_null) {
            return Err(crate::value::LiteralError::NullLiteral.into());
        }

        Ok(Self { attribute, values })
    }

    #[must_use]
    pub const fn attribute(&self) -> &AttributeModel {
        &self.attribute
    }

    #[must_use]
    pub fn values(&self) -> &[Value] {
        &self.values
    }

    pub fn to_pattern(&self, prefix: &str) -> Result<String, ExprError> {
        let attr = self.attribute.name();
        let var = scoped_var(prefix, attr);

        let branches = self
            .values
            .iter()
            .map(|value| {
                let literal = value.render()?;
                Ok(format!(
                    "{{ {bind}{sep}{var} == {literal}; }}",
                    bind = binding(prefix, attr),
                    sep = STATEMENT_SEPARATOR,
                ))
            })
            .collect::<Result<Vec<_>, ExprError>>()?;

        Ok(branches.join(" or "))
    }
}

///
/// RangeExpression
///
/// Bounded interval over one attribute: binds once, then constrains the
/// scoped variable against both bounds.
///

#[derive(Clone, Debug, PartialEq)]
pub struct RangeExpression {
    attribute: AttributeModel,
    min: Value,
    max: Value,
    inclusive: bool,
}

impl RangeExpression {
    pub fn new(
        attribute: AttributeModel,
        min: Value,
        max: Value,
        inclusive: bool,
    ) -> Result<Self, ExprError> {
        if min.is_null() || max.is_null() {
            return Err(crate::value::LiteralError::NullLiteral.into());
        }

        Ok(Self {
            attribute,
            min,
            max,
            inclusive,
        })
    }

    #[must_use]
    pub const fn attribute(&self) -> &AttributeModel {
        &self.attribute
    }

    pub fn to_pattern(&self, prefix: &str) -> Result<String, ExprError> {
        let attr = self.attribute.name();
        let var = scoped_var(prefix, attr);
        let (lower, upper) = if self.inclusive {
            (CompareOp::Gte, CompareOp::Lte)
        } else {
            (CompareOp::Gt, CompareOp::Lt)
        };

        Ok(format!(
            "{bind}{sep}{var} {lower} {min}{sep}{var} {upper} {max}",
            bind = binding(prefix, attr),
            sep = STATEMENT_SEPARATOR,
            min = self.min.render()?,
            max = self.max.render()?,
        ))
    }
}
