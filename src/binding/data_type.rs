//! Scalar data-type tags for persisted fields.

use darling::FromMeta;
use serde::Serialize;

/// Storage data type declared on a scalar field marker.
///
/// `Unknown` is the default and means "let the storage layer infer the type
/// from the field"; the external emitter only emits an explicit type for
/// bindings that moved away from it.
///
/// Declared as a snake_case string, e.g. `#[column(data_type = "boolean")]`
/// or `#[column(data_type = "date_long")]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DataType {
    /// Not specified; inferred by the storage layer.
    #[default]
    Unknown,
    String,
    LongString,
    Boolean,
    Char,
    Byte,
    ByteArray,
    Short,
    Integer,
    Long,
    Float,
    Double,
    Serializable,
    /// Enum persisted by constant name.
    EnumString,
    /// Enum persisted by ordinal value.
    EnumInteger,
    Date,
    DateLong,
    DateString,
    BigDecimal,
    Uuid
}

impl DataType {
    /// Whether this is the unspecified default.
    #[must_use]
    pub fn is_unknown(self) -> bool {
        self == Self::Unknown
    }
}

impl FromMeta for DataType {
    fn from_string(value: &str) -> darling::Result<Self> {
        match value {
            "unknown" => Ok(Self::Unknown),
            "string" => Ok(Self::String),
            "long_string" => Ok(Self::LongString),
            "boolean" => Ok(Self::Boolean),
            "char" => Ok(Self::Char),
            "byte" => Ok(Self::Byte),
            "byte_array" => Ok(Self::ByteArray),
            "short" => Ok(Self::Short),
            "integer" => Ok(Self::Integer),
            "long" => Ok(Self::Long),
            "float" => Ok(Self::Float),
            "double" => Ok(Self::Double),
            "serializable" => Ok(Self::Serializable),
            "enum_string" => Ok(Self::EnumString),
            "enum_integer" => Ok(Self::EnumInteger),
            "date" => Ok(Self::Date),
            "date_long" => Ok(Self::DateLong),
            "date_string" => Ok(Self::DateString),
            "big_decimal" => Ok(Self::BigDecimal),
            "uuid" => Ok(Self::Uuid),
            _ => Err(darling::Error::unknown_value(value))
        }
    }
}
