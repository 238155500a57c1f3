//! Field binding resolution.
//!
//! Turns one marker-bearing field declaration into a fully-resolved
//! [`FieldBinding`]. Scalar and collection markers take disjoint branches:
//! a collection binding carries a [`ForeignCollectionSpec`] and none of the
//! scalar column attributes; a scalar binding never carries the spec.
//!
//! String options are kept verbatim when non-blank and left unset
//! otherwise — a blank value is "not specified", never the empty string.

use serde::Serialize;

use super::DataType;
use crate::{
    error::BindingError,
    inventory::{FieldDecl, TypeInventory, TypeKind, TypeRef},
    marker::{CollectionMarker, DEFAULT_MAX_EAGER_LEVEL, FieldMarker},
    session::BindingOptions
};

/// Reference to one constant of an enumerated type.
///
/// Produced only for the unknown-enum fallback feature and resolved against
/// the declared type of the field that requested it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnumConstantRef {
    /// The enumerated type owning the constant.
    pub enum_type: TypeRef,
    /// Name of the matched constant.
    pub constant:  String
}

/// Resolved configuration of a foreign-collection field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ForeignCollectionSpec {
    /// Load the collection with its owner instead of on demand.
    pub eager: bool,

    /// Resolved eager-hop limit. The deprecated single-collection option
    /// wins when it was set away from [`DEFAULT_MAX_EAGER_LEVEL`];
    /// otherwise the current multi-level option applies.
    pub max_eager_level: i32,

    /// Column name for the collection.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column_name: Option<String>,

    /// Column the collection is ordered by.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_column_name: Option<String>,

    /// Ordering direction, ascending by default.
    pub order_ascending: bool,

    /// Field on the foreign type pointing back at the owner. The current
    /// option spelling wins; blank falls back to the deprecated
    /// foreign-column-name spelling.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub foreign_field_name: Option<String>
}

/// Fully-resolved configuration for one persisted field.
///
/// Either a scalar binding (possibly foreign) or a foreign-collection
/// binding, never both: [`FieldBinding::foreign_collection`] is present iff
/// the field carried a collection marker.
///
/// Index names may still be deferred right after resolution; the table
/// assembler finalizes them once the table name is known. See
/// [`FieldBinding::resolve_index_name`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldBinding {
    /// Field identifier, upper-cased when the run's naming convention
    /// demands it.
    pub field_name: String,

    /// Explicit column name; unset means "derive from the field name".
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column_name: Option<String>,

    /// Declared scalar data type.
    pub data_type: DataType,

    /// Storage-level default value.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,

    /// Column width; `0` means unspecified.
    pub width: u32,

    /// Whether the column accepts NULL.
    pub can_be_null: bool,

    /// Caller-assigned primary key.
    pub is_id: bool,

    /// Storage-assigned primary key.
    pub is_generated_id: bool,

    /// Sequence backing the generated id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generated_id_sequence: Option<String>,

    /// References another table-bound type.
    pub is_foreign: bool,

    /// Access through accessor methods instead of the field itself.
    pub use_accessors: bool,

    /// Fallback constant for unknown stored enum values.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unknown_enum_fallback: Option<EnumConstantRef>,

    /// Error instead of substituting null for primitive targets.
    pub throw_if_null: bool,

    /// Type-specific format string.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,

    /// Single-column uniqueness constraint.
    pub unique: bool,

    /// Participates in a combined uniqueness constraint.
    pub unique_combo: bool,

    /// Plain index requested.
    index: bool,

    /// Index name; cached here once derived or declared.
    #[serde(skip_serializing_if = "Option::is_none")]
    index_name: Option<String>,

    /// Unique index requested.
    unique_index: bool,

    /// Unique-index name; cached here once derived or declared.
    #[serde(skip_serializing_if = "Option::is_none")]
    unique_index_name: Option<String>,

    /// Eagerly refresh the referenced foreign object.
    pub foreign_auto_refresh: bool,

    /// Hop limit for foreign auto-refresh.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_foreign_auto_refresh_level: Option<i32>,

    /// Custom persister type.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub persister_type: Option<TypeRef>,

    /// Permit inserts supplying a value for a generated id.
    pub allow_generated_id_insert: bool,

    /// Verbatim column definition override.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column_definition: Option<String>,

    /// Create the referenced foreign row when missing.
    pub foreign_auto_create: bool,

    /// Optimistic-locking version column.
    pub is_version: bool,

    /// Column on the foreign side to join on.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub foreign_column_name: Option<String>,

    /// Excluded from writes.
    pub read_only: bool,

    /// Present iff the field carried a collection marker.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub foreign_collection: Option<ForeignCollectionSpec>
}

impl FieldBinding {
    /// Resolve a scalar `#[column(...)]` marker into a binding.
    ///
    /// Applies the defaulting rules: blank strings become unset options,
    /// the field name follows the run's upper-casing convention, the
    /// unknown-enum fallback is matched against the field's declared enum
    /// type, and a declared persister must be a record type.
    ///
    /// # Errors
    ///
    /// [`BindingError::NotAnEnumField`], [`BindingError::UnknownEnumConstant`]
    /// when the fallback cannot be resolved;
    /// [`BindingError::InvalidPersisterType`] when the persister names a
    /// registered non-record type.
    pub(crate) fn from_column_marker(
        declaring_type: &str,
        field: &FieldDecl,
        marker: &FieldMarker,
        inventory: &TypeInventory,
        options: &BindingOptions
    ) -> Result<Self, BindingError> {
        let field_name = if options.uppercase_field_names {
            field.ident.to_uppercase()
        } else {
            field.ident.clone()
        };

        let unknown_enum_fallback = match value_if_not_blank(&marker.unknown_enum_name) {
            Some(constant) => Some(resolve_enum_fallback(
                declaring_type,
                field,
                &constant,
                inventory
            )?),
            None => None
        };

        let persister_type = match &marker.persister {
            Some(path) => Some(resolve_persister(declaring_type, field, path, inventory)?),
            None => None
        };

        Ok(Self {
            field_name,
            column_name: value_if_not_blank(&marker.name),
            data_type: marker.data_type,
            default_value: marker.default_value.clone(),
            width: marker.width,
            can_be_null: marker.can_be_null,
            is_id: marker.id,
            is_generated_id: marker.generated_id,
            generated_id_sequence: value_if_not_blank(&marker.generated_id_sequence),
            is_foreign: marker.foreign,
            use_accessors: marker.use_accessors,
            unknown_enum_fallback,
            throw_if_null: marker.throw_if_null,
            format: value_if_not_blank(&marker.format),
            unique: marker.unique,
            unique_combo: marker.unique_combo,
            index: marker.index,
            index_name: value_if_not_blank(&marker.index_name),
            unique_index: marker.unique_index,
            unique_index_name: value_if_not_blank(&marker.unique_index_name),
            foreign_auto_refresh: marker.foreign_auto_refresh,
            max_foreign_auto_refresh_level: marker.max_foreign_auto_refresh_level,
            persister_type,
            allow_generated_id_insert: marker.allow_generated_id_insert,
            column_definition: value_if_not_blank(&marker.column_definition),
            foreign_auto_create: marker.foreign_auto_create,
            is_version: marker.version,
            foreign_column_name: value_if_not_blank(&marker.foreign_column_name),
            read_only: marker.read_only,
            foreign_collection: None
        })
    }

    /// Resolve a `#[collection(...)]` marker into a binding.
    ///
    /// Takes the collection branch exclusively: scalar column attributes
    /// stay at their defaults. The field name is kept as declared; the
    /// upper-casing convention applies to storage columns only.
    pub(crate) fn from_collection_marker(field: &FieldDecl, marker: &CollectionMarker) -> Self {
        let column_name = value_if_not_blank(&marker.name);

        let max_eager_level = marker
            .max_eager_foreign_collection_level
            .filter(|&level| level != DEFAULT_MAX_EAGER_LEVEL)
            .or(marker.max_eager_level)
            .unwrap_or(DEFAULT_MAX_EAGER_LEVEL);

        let foreign_field_name = value_if_not_blank(&marker.foreign_field_name)
            .or_else(|| value_if_not_blank(&marker.foreign_column_name));

        Self {
            field_name: field.ident.clone(),
            column_name: column_name.clone(),
            foreign_collection: Some(ForeignCollectionSpec {
                eager: marker.eager,
                max_eager_level,
                column_name,
                order_column_name: value_if_not_blank(&marker.order_column_name),
                order_ascending: marker.order_ascending,
                foreign_field_name
            }),
            ..Self::plain(field.ident.clone())
        }
    }

    /// All-default scalar binding for the given field name.
    fn plain(field_name: String) -> Self {
        Self {
            field_name,
            column_name: None,
            data_type: DataType::Unknown,
            default_value: None,
            width: 0,
            can_be_null: true,
            is_id: false,
            is_generated_id: false,
            generated_id_sequence: None,
            is_foreign: false,
            use_accessors: false,
            unknown_enum_fallback: None,
            throw_if_null: false,
            format: None,
            unique: false,
            unique_combo: false,
            index: false,
            index_name: None,
            unique_index: false,
            unique_index_name: None,
            foreign_auto_refresh: false,
            max_foreign_auto_refresh_level: None,
            persister_type: None,
            allow_generated_id_insert: false,
            column_definition: None,
            foreign_auto_create: false,
            is_version: false,
            foreign_column_name: None,
            read_only: false,
            foreign_collection: None
        }
    }

    /// Whether this is a foreign-collection binding.
    #[must_use]
    pub fn is_foreign_collection(&self) -> bool {
        self.foreign_collection.is_some()
    }

    /// Whether a plain index was requested or named.
    #[must_use]
    pub fn has_index(&self) -> bool {
        self.index || self.index_name.is_some()
    }

    /// Whether a unique index was requested or named.
    #[must_use]
    pub fn has_unique_index(&self) -> bool {
        self.unique_index || self.unique_index_name.is_some()
    }

    /// Index name, once declared or derived.
    #[must_use]
    pub fn index_name(&self) -> Option<&str> {
        self.index_name.as_deref()
    }

    /// Unique-index name, once declared or derived.
    #[must_use]
    pub fn unique_index_name(&self) -> Option<&str> {
        self.unique_index_name.as_deref()
    }

    /// Derive and cache the index name, given the owning table name.
    ///
    /// Idempotent: a name that is already cached (declared explicitly or
    /// derived earlier) is returned as-is, never recomputed.
    pub fn resolve_index_name(&mut self, table_name: &str) -> Option<&str> {
        if self.index && self.index_name.is_none() {
            self.index_name = Some(self.derive_index_name(table_name));
        }
        self.index_name.as_deref()
    }

    /// Derive and cache the unique-index name, given the owning table name.
    ///
    /// Same caching contract as [`FieldBinding::resolve_index_name`].
    pub fn resolve_unique_index_name(&mut self, table_name: &str) -> Option<&str> {
        if self.unique_index && self.unique_index_name.is_none() {
            self.unique_index_name = Some(self.derive_index_name(table_name));
        }
        self.unique_index_name.as_deref()
    }

    /// `{table}_{column_or_field}_idx`, preferring the explicit column name.
    fn derive_index_name(&self, table_name: &str) -> String {
        let column = self.column_name.as_deref().unwrap_or(&self.field_name);
        format!("{table_name}_{column}_idx")
    }
}

/// Match the fallback name against the field's declared enum type.
fn resolve_enum_fallback(
    declaring_type: &str,
    field: &FieldDecl,
    constant: &str,
    inventory: &TypeInventory
) -> Result<EnumConstantRef, BindingError> {
    let enum_decl = inventory
        .get(&field.declared_type)
        .filter(|decl| decl.kind == TypeKind::Enum)
        .ok_or_else(|| BindingError::NotAnEnumField {
            type_name:     declaring_type.to_string(),
            field_name:    field.ident.clone(),
            declared_type: field.declared_type.name().to_string()
        })?;

    if enum_decl.constants.iter().any(|c| c == constant) {
        Ok(EnumConstantRef {
            enum_type: field.declared_type.clone(),
            constant:  constant.to_string()
        })
    } else {
        Err(BindingError::UnknownEnumConstant {
            type_name:     declaring_type.to_string(),
            field_name:    field.ident.clone(),
            declared_type: field.declared_type.name().to_string(),
            constant:      constant.to_string()
        })
    }
}

/// Check a declared persister and hand back its reference.
///
/// Persisters outside the inventory are accepted as opaque references; the
/// engine can only judge the kind of types it was given.
fn resolve_persister(
    declaring_type: &str,
    field: &FieldDecl,
    path: &syn::Path,
    inventory: &TypeInventory
) -> Result<TypeRef, BindingError> {
    let persister = TypeRef::from_path(path);
    if let Some(decl) = inventory.get(&persister)
        && decl.kind != TypeKind::Record
    {
        return Err(BindingError::InvalidPersisterType {
            type_name:  declaring_type.to_string(),
            field_name: field.ident.clone(),
            persister:  persister.name().to_string()
        });
    }
    Ok(persister)
}

/// Non-blank string options pass through; blank or absent become unset.
fn value_if_not_blank(value: &Option<String>) -> Option<String> {
    value.as_deref().filter(|v| !v.is_empty()).map(ToOwned::to_owned)
}
