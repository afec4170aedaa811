#[cfg(test)]
mod tests;

use crate::types::Timestamp;
use derive_more::Display;
use serde::{Deserialize, Serialize};
use thiserror::Error as ThisError;

///
/// LiteralError
///
/// Invariant violations raised while rendering a value as query-language
/// literal text. Callers must filter absent values before rendering.
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum LiteralError {
    #[error("null value has no literal form; filter absent values before rendering")]
    NullLiteral,

    #[error("collection values have no literal form; membership compiles structurally")]
    UnsupportedCollection,
}

///
/// ValueKind
///
/// Value categories an attribute may declare. `Display` yields the
/// query-language value-type keyword.
///

#[derive(Clone, Copy, Debug, Deserialize, Display, Eq, PartialEq, Serialize)]
#[remain::sorted]
pub enum ValueKind {
    #[display("boolean")]
    Boolean,
    #[display("datetime")]
    Datetime,
    #[display("double")]
    Double,
    #[display("integer")]
    Integer,
    #[display("string")]
    String,
}

///
/// Value
///
/// Runtime value carried by filters and expressions.
///
/// Null   → the caller supplied an absent value; it never renders.
/// List   → ordered candidate set for membership; order is preserved.
///

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub enum Value {
    Bool(bool),
    Float(f64),
    Int(i64),
    List(Vec<Self>),
    Null,
    Text(String),
    Timestamp(Timestamp),
}

impl Value {
    ///
    /// CONSTRUCTION
    ///

    /// Build a `Value::List` from a list literal.
    ///
    /// Intended for tests and inline construction.
    /// Requires `Clone` because items are borrowed.
    pub fn from_slice<T>(items: &[T]) -> Self
    where
        T: Into<Self> + Clone,
    {
        Self::List(items.iter().cloned().map(Into::into).collect())
    }

    /// Build a `Value::List` from owned items.
    ///
    /// This is the canonical constructor for filter boundaries.
    pub fn from_list<T>(items: Vec<T>) -> Self
    where
        T: Into<Self>,
    {
        Self::List(items.into_iter().map(Into::into).collect())
    }

    ///
    /// TYPES
    ///

    /// Returns the declared kind for scalar values; `None` for Null/List.
    #[must_use]
    pub const fn kind(&self) -> Option<ValueKind> {
        match self {
            Self::Bool(_) => Some(ValueKind::Boolean),
            Self::Float(_) => Some(ValueKind::Double),
            Self::Int(_) => Some(ValueKind::Integer),
            Self::Text(_) => Some(ValueKind::String),
            Self::Timestamp(_) => Some(ValueKind::Datetime),
            Self::List(_) | Self::Null => None,
        }
    }

    /// Returns true if the value is `Null`.
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    #[must_use]
    pub const fn is_scalar(&self) -> bool {
        !matches!(self, Self::List(_) | Self::Null)
    }

    #[must_use]
    pub const fn as_text(&self) -> Option<&str> {
        if let Self::Text(s) = self {
            Some(s.as_str())
        } else {
            None
        }
    }

    #[must_use]
    pub const fn as_list(&self) -> Option<&[Self]> {
        if let Self::List(xs) = self {
            Some(xs.as_slice())
        } else {
            None
        }
    }

    ///
    /// RENDERING
    ///

    /// Render this value as query-language literal text.
    ///
    /// Strings are double-quoted with `\` escaped before `"`; booleans are
    /// lowercase; numerics are decimal text; timestamps are unquoted
    /// ISO-8601. No other coercions are attempted.
    pub fn render(&self) -> Result<String, LiteralError> {
        match self {
            Self::Bool(b) => Ok(b.to_string()),
            Self::Float(x) => Ok(render_float(*x)),
            Self::Int(i) => Ok(i.to_string()),
            Self::Text(s) => Ok(format!("\"{}\"", escape_text(s))),
            Self::Timestamp(t) => Ok(t.to_string()),
            Self::Null => Err(LiteralError::NullLiteral),
            Self::List(_) => Err(LiteralError::UnsupportedCollection),
        }
    }
}

/// Escape string-literal text: backslashes first, then quotes.
#[must_use]
pub fn escape_text(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Doubles always carry a decimal point so they cannot re-parse as integers.
fn render_float(x: f64) -> String {
    if x.is_finite() && x.fract() == 0.0 {
        format!("{x:.1}")
    } else {
        format!("{x}")
    }
}

#[macro_export]
macro_rules! impl_from_for {
    ( $( $type:ty => $variant:ident ),* $(,)? ) => {
        $(
            impl From<$type> for Value {
                fn from(v: $type) -> Self {
                    Self::$variant(v.into())
                }
            }
        )*
    };
}

impl_from_for! {
    bool      => Bool,
    f32       => Float,
    f64       => Float,
    i8        => Int,
    i16       => Int,
    i32       => Int,
    i64       => Int,
    u8        => Int,
    u16       => Int,
    u32       => Int,
    &str      => Text,
    String    => Text,
    Timestamp => Timestamp,
}

impl From<Vec<Self>> for Value {
    fn from(vec: Vec<Self>) -> Self {
        Self::List(vec)
    }
}

impl<T: Into<Self>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}
