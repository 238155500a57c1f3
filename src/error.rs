//! Typed validation diagnostics.
//!
//! Every validation failure in the resolution engine is a [`BindingError`]:
//! a machine-checkable kind plus enough identity (owning type, field) to
//! point the caller at the offending declaration. Nothing in the core
//! panics; resolver and walker failures propagate by early return.
//!
//! Attribute-shape problems (malformed options, unsupported struct shapes)
//! are a front-end concern and surface as [`darling::Error`] from
//! [`TypeInventory::register`](crate::inventory::TypeInventory::register)
//! instead.

use thiserror::Error;

/// Machine-checkable classification of a [`BindingError`].
///
/// | Kind | Trigger |
/// |------|---------|
/// | `NotARecordType` | table marker applied to a non-record type |
/// | `NoPersistedFields` | walk produced zero bindings for the owning type |
/// | `NotAnEnumField` | unknown-enum fallback requested on a non-enum field |
/// | `UnknownEnumConstant` | fallback name matches no constant |
/// | `InvalidPersisterType` | named persister is not a record type |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BindingErrorKind {
    NotARecordType,
    NoPersistedFields,
    NotAnEnumField,
    UnknownEnumConstant,
    InvalidPersisterType
}

/// A validation failure produced by the resolver or the walker.
///
/// Carries the declaring type name and, for field-scoped failures, the
/// field name. The `Display` implementation is the human-readable message;
/// use [`BindingError::kind`] for programmatic checks.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BindingError {
    /// Table markers are only valid on record types.
    #[error("`{type_name}` cannot carry a table marker: only record types can be bound to tables")]
    NotARecordType {
        /// Name of the offending type.
        type_name: String
    },

    /// The walk over the type and its ancestors found no marked fields.
    #[error("`{type_name}` has no persisted fields: a table-marked type needs at least one field marker")]
    NoPersistedFields {
        /// Name of the owning type.
        type_name: String
    },

    /// `unknown_enum_name` was requested on a field whose declared type is
    /// not an enumerated type.
    #[error("`{type_name}.{field_name}`: unknown-enum fallback requires an enum field, but the field is declared as `{declared_type}`")]
    NotAnEnumField {
        /// Type declaring the field.
        type_name:     String,
        /// Offending field.
        field_name:    String,
        /// The field's declared (non-enum) type.
        declared_type: String
    },

    /// The fallback name matches none of the enum's constants.
    #[error("`{type_name}.{field_name}`: enum `{declared_type}` has no constant named `{constant}`")]
    UnknownEnumConstant {
        /// Type declaring the field.
        type_name:     String,
        /// Offending field.
        field_name:    String,
        /// The field's declared enum type.
        declared_type: String,
        /// The fallback name that did not match.
        constant:      String
    },

    /// The marker names a persister that is declared but not a record type.
    #[error("`{type_name}.{field_name}`: persister `{persister}` must be a record type")]
    InvalidPersisterType {
        /// Type declaring the field.
        type_name:  String,
        /// Offending field.
        field_name: String,
        /// Name of the invalid persister type.
        persister:  String
    }
}

impl BindingError {
    /// Classification of this error.
    #[must_use]
    pub fn kind(&self) -> BindingErrorKind {
        match self {
            Self::NotARecordType { .. } => BindingErrorKind::NotARecordType,
            Self::NoPersistedFields { .. } => BindingErrorKind::NoPersistedFields,
            Self::NotAnEnumField { .. } => BindingErrorKind::NotAnEnumField,
            Self::UnknownEnumConstant { .. } => BindingErrorKind::UnknownEnumConstant,
            Self::InvalidPersisterType { .. } => BindingErrorKind::InvalidPersisterType
        }
    }

    /// Name of the type the error points at.
    #[must_use]
    pub fn type_name(&self) -> &str {
        match self {
            Self::NotARecordType { type_name }
            | Self::NoPersistedFields { type_name }
            | Self::NotAnEnumField { type_name, .. }
            | Self::UnknownEnumConstant { type_name, .. }
            | Self::InvalidPersisterType { type_name, .. } => type_name
        }
    }

    /// Name of the field the error points at, for field-scoped errors.
    #[must_use]
    pub fn field_name(&self) -> Option<&str> {
        match self {
            Self::NotARecordType { .. } | Self::NoPersistedFields { .. } => None,
            Self::NotAnEnumField { field_name, .. }
            | Self::UnknownEnumConstant { field_name, .. }
            | Self::InvalidPersisterType { field_name, .. } => Some(field_name)
        }
    }
}
