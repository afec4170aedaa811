use crate::{
    STATEMENT_SEPARATOR,
    expr::{ExprError, Expression},
};

///
/// BoolOp
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BoolOp {
    And,
    Or,
    Not,
}

impl BoolOp {
    const fn keyword(self) -> &'static str {
        match self {
            Self::And => "and",
            Self::Or => "or",
            Self::Not => "not",
        }
    }
}

///
/// BooleanExpression
///
/// AND/OR/NOT composition over arbitrary expressions.
///
/// AND operands share the enclosing scope and concatenate with the
/// statement separator. OR wraps each operand in its own block so operand
/// constraints cannot leak into siblings. NOT wraps its single operand in
/// one negation block. Arity is validated at construction.
///

#[derive(Clone, Debug, PartialEq)]
pub struct BooleanExpression {
    op: BoolOp,
    operands: Vec<Expression>,
}

impl BooleanExpression {
    pub fn new(op: BoolOp, operands: Vec<Expression>) -> Result<Self, ExprError> {
        match op {
            BoolOp::And | BoolOp::Or if operands.len() < 2 => Err(ExprError::CombinatorArity {
                keyword: op.keyword(),
                expected: "at least 2",
                actual: operands.len(),
            }),
            BoolOp::Not if operands.len() != 1 => Err(ExprError::CombinatorArity {
                keyword: op.keyword(),
                expected: "exactly 1",
                actual: operands.len(),
            }),
            _ => Ok(Self { op, operands }),
        }
    }

    pub fn and(operands: Vec<Expression>) -> Result<Self, ExprError> {
        Self::new(BoolOp::And, operands)
    }

    pub fn or(operands: Vec<Expression>) -> Result<Self, ExprError> {
        Self::new(BoolOp::Or, operands)
    }

    /// NOT is the only combinator that cannot fail arity validation.
    #[must_use]
    pub fn negate(operand: Expression) -> Self {
        Self {
            op: BoolOp::Not,
            operands: vec![operand],
        }
    }

    #[must_use]
    pub const fn op(&self) -> BoolOp {
        self.op
    }

    #[must_use]
    pub fn operands(&self) -> &[Expression] {
        &self.operands
    }

    pub fn to_pattern(&self, prefix: &str) -> Result<String, ExprError> {
        let patterns = self
            .operands
            .iter()
            .map(|operand| operand.to_pattern(prefix))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(match self.op {
            BoolOp::And => patterns.join(STATEMENT_SEPARATOR),
            BoolOp::Or => patterns
                .iter()
                .map(|pattern| format!("{{ {pattern}; }}"))
                .collect::<Vec<_>>()
                .join(" or "),
            BoolOp::Not => format!("not {{ {}; }}", patterns[0]),
        })
    }
}
