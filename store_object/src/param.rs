//! Typed statement parameters
//!
//! A [`Param`] carries its PostgreSQL type along with the value, so it binds
//! as exactly that type. Strings are always text; nothing is inferred from
//! their contents. A null names the type it stands in for.

use chrono::{DateTime, Utc};
use serde_json::Value;
use uuid::Uuid;

/// PostgreSQL type of a parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamType {
    Bool,
    Int4,
    Int8,
    Float8,
    Text,
    Uuid,
    Timestamptz,
    Jsonb,
}

/// One bound statement value
#[derive(Debug, Clone, PartialEq)]
pub enum Param {
    /// SQL NULL of the given type
    Null(ParamType),
    Bool(bool),
    Int4(i32),
    Int8(i64),
    Float8(f64),
    Text(String),
    Uuid(Uuid),
    Timestamptz(DateTime<Utc>),
    Jsonb(Value),
}

impl Param {
    pub fn param_type(&self) -> ParamType {
        match self {
            Param::Null(ty) => *ty,
            Param::Bool(_) => ParamType::Bool,
            Param::Int4(_) => ParamType::Int4,
            Param::Int8(_) => ParamType::Int8,
            Param::Float8(_) => ParamType::Float8,
            Param::Text(_) => ParamType::Text,
            Param::Uuid(_) => ParamType::Uuid,
            Param::Timestamptz(_) => ParamType::Timestamptz,
            Param::Jsonb(_) => ParamType::Jsonb,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Param::Null(_))
    }

    /// The text value, if this is a non-null text parameter
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Param::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl From<&str> for Param {
    fn from(value: &str) -> Self {
        Param::Text(value.to_string())
    }
}

impl From<&String> for Param {
    fn from(value: &String) -> Self {
        Param::Text(value.clone())
    }
}

impl From<Value> for Param {
    fn from(value: Value) -> Self {
        Param::Jsonb(value)
    }
}

/// `From<T>` and `From<Option<T>>` for types that map onto one variant
macro_rules! impl_from_typed {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Param {
                fn from(value: $ty) -> Self {
                    Param::$variant(value.into())
                }
            }

            impl From<Option<$ty>> for Param {
                fn from(value: Option<$ty>) -> Self {
                    match value {
                        Some(value) => Param::$variant(value.into()),
                        None => Param::Null(ParamType::$variant),
                    }
                }
            }
        )*
    };
}

impl_from_typed! {
    bool => Bool,
    i16 => Int4,
    i32 => Int4,
    i64 => Int8,
    f32 => Float8,
    f64 => Float8,
    String => Text,
    Uuid => Uuid,
    DateTime<Utc> => Timestamptz,
}

impl From<Option<&str>> for Param {
    fn from(value: Option<&str>) -> Self {
        value.map_or(Param::Null(ParamType::Text), Param::from)
    }
}
