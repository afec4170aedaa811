use crate::{
    STATEMENT_SEPARATOR,
    expr::{ExprError, binding, scoped_var},
    model::AttributeModel,
    value::Value,
};
use derive_more::Display;

/// Pattern metacharacters escaped before anchoring.
const PATTERN_META: &[char] = &[
    '\\', '.', '^', '$', '*', '+', '?', '(', ')', '[', ']', '{', '}', '|',
];

/// Case-insensitive marker prefixed to compiled patterns.
const CI_MARKER: &str = "(?i)";

///
/// TextOp
///

#[derive(Clone, Copy, Debug, Display, Eq, PartialEq)]
#[remain::sorted]
pub enum TextOp {
    #[display("contains")]
    Contains,
    #[display("ends_with")]
    EndsWith,
    #[display("like")]
    Like,
    #[display("starts_with")]
    StartsWith,
}

impl TextOp {
    /// Resolve an operation tag crossing a stringly-typed boundary.
    pub fn from_tag(tag: &str) -> Result<Self, ExprError> {
        match tag {
            "contains" => Ok(Self::Contains),
            "ends_with" => Ok(Self::EndsWith),
            "like" => Ok(Self::Like),
            "starts_with" => Ok(Self::StartsWith),
            _ => Err(ExprError::UnsupportedTextOperation {
                tag: tag.to_string(),
            }),
        }
    }
}

///
/// TextExpression
///
/// String matching over one attribute.
///
/// `contains` and `like` bind then compare with the literal keyword;
/// `starts_with`/`ends_with` compile to an anchored pattern with all
/// metacharacters escaped, matched with `like`. The case-insensitive
/// variant compiles every operation through `like` with the `(?i)` marker.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TextExpression {
    attribute: AttributeModel,
    op: TextOp,
    text: String,
    case_insensitive: bool,
}

impl TextExpression {
    #[must_use]
    pub const fn new(attribute: AttributeModel, op: TextOp, text: String) -> Self {
        Self {
            attribute,
            op,
            text,
            case_insensitive: false,
        }
    }

    /// Construct from a stringly-typed operation tag.
    pub fn from_tag(attribute: AttributeModel, tag: &str, text: String) -> Result<Self, ExprError> {
        Ok(Self::new(attribute, TextOp::from_tag(tag)?, text))
    }

    /// Construct from a runtime value; non-text values are rejected.
    pub fn from_value(
        attribute: AttributeModel,
        op: TextOp,
        value: &Value,
    ) -> Result<Self, ExprError> {
        match value.as_text() {
            Some(text) => Ok(Self::new(attribute, op, text.to_string())),
            None => Err(ExprError::TextValueRequired),
        }
    }

    /// Switch to case-insensitive matching.
    #[must_use]
    pub const fn case_insensitive(mut self) -> Self {
        self.case_insensitive = true;
        self
    }

    #[must_use]
    pub const fn attribute(&self) -> &AttributeModel {
        &self.attribute
    }

    #[must_use]
    pub const fn op(&self) -> TextOp {
        self.op
    }

    pub fn to_pattern(&self, prefix: &str) -> Result<String, ExprError> {
        let attr = self.attribute.name();
        let var = scoped_var(prefix, attr);
        let (keyword, operand) = self.compile_operand();
        let literal = Value::Text(operand).render()?;

        Ok(format!(
            "{bind}{sep}{var} {keyword} {literal}",
            bind = binding(prefix, attr),
            sep = STATEMENT_SEPARATOR,
        ))
    }

    /// Resolve the comparison keyword and its right-hand text.
    fn compile_operand(&self) -> (&'static str, String) {
        let anchored = match self.op {
            TextOp::Contains if !self.case_insensitive => {
                return ("contains", self.text.clone());
            }
            TextOp::Contains => format!(".*{}.*", escape_pattern(&self.text)),
            TextOp::Like => self.text.clone(),
            TextOp::StartsWith => format!("^{}.*", escape_pattern(&self.text)),
            TextOp::EndsWith => format!(".*{}$", escape_pattern(&self.text)),
        };

        if self.case_insensitive {
            ("like", format!("{CI_MARKER}{anchored}"))
        } else {
            ("like", anchored)
        }
    }
}

/// Escape pattern metacharacters so caller text matches itself literally
/// once anchored.
#[must_use]
pub fn escape_pattern(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        if PATTERN_META.contains(&c) {
            out.push('\\');
        }
        out.push(c);
    }
    out
}
