//! Scalar field marker.
//!
//! The `#[column(...)]` marker carries everything a field can declare about
//! its storage column. Every option is optional; the resolver applies the
//! documented defaults and treats blank strings as "not specified".
//!
//! # Options
//!
//! | Option | Meaning |
//! |--------|---------|
//! | `name` | explicit column name |
//! | `data_type` | scalar type tag, see [`DataType`] |
//! | `default_value` | storage-level default |
//! | `width` | column width, 0 means unspecified |
//! | `can_be_null` | nullability, defaults to `true` |
//! | `id` / `generated_id` / `generated_id_sequence` | primary-key flavor |
//! | `foreign` | field references another bound type |
//! | `use_accessors` | go through accessor methods, not direct field access |
//! | `unknown_enum_name` | fallback constant for unknown stored enum values |
//! | `throw_if_null` | error instead of null for primitive targets |
//! | `format` | type-specific format string |
//! | `unique` / `unique_combo` | uniqueness constraints |
//! | `index` / `index_name` | plain index, name derived when omitted |
//! | `unique_index` / `unique_index_name` | unique index, same derivation |
//! | `foreign_auto_refresh` / `max_foreign_auto_refresh_level` | eager foreign refresh |
//! | `persister` | custom persister type |
//! | `allow_generated_id_insert` | permit caller-supplied generated ids |
//! | `column_definition` | verbatim column DDL override |
//! | `foreign_auto_create` | create missing foreign rows |
//! | `version` | optimistic-locking version column |
//! | `foreign_column_name` | column on the foreign side to join on |
//! | `read_only` | excluded from writes |
//! | `persisted` | set to `false` to skip the field entirely |

use darling::FromMeta;
use syn::{Attribute, Meta, Path};

use crate::binding::DataType;

fn default_true() -> bool {
    true
}

/// Payload of the `#[column(...)]` marker on a scalar field.
///
/// Pure data: captures the declared options without interpretation. The
/// resolver in [`binding`](crate::binding) turns this into a
/// [`FieldBinding`](crate::binding::FieldBinding).
#[derive(Debug, Clone, FromMeta)]
pub struct FieldMarker {
    /// Explicit column name.
    #[darling(default)]
    pub name: Option<String>,

    /// Declared data type, defaults to [`DataType::Unknown`].
    #[darling(default)]
    pub data_type: DataType,

    /// Storage-level default value.
    #[darling(default)]
    pub default_value: Option<String>,

    /// Column width; `0` means unspecified.
    #[darling(default)]
    pub width: u32,

    /// Whether the column accepts NULL. Defaults to `true`.
    #[darling(default = "default_true")]
    pub can_be_null: bool,

    /// Caller-assigned primary key.
    #[darling(default)]
    pub id: bool,

    /// Storage-assigned primary key.
    #[darling(default)]
    pub generated_id: bool,

    /// Sequence backing the generated id, for sequence-based targets.
    #[darling(default)]
    pub generated_id_sequence: Option<String>,

    /// Field references another table-bound type.
    #[darling(default)]
    pub foreign: bool,

    /// Access the field through accessor methods instead of directly.
    #[darling(default)]
    pub use_accessors: bool,

    /// Constant name to fall back to when a stored enum value is unknown.
    #[darling(default)]
    pub unknown_enum_name: Option<String>,

    /// Error instead of substituting null for primitive targets.
    #[darling(default)]
    pub throw_if_null: bool,

    /// Type-specific format string (dates, numbers).
    #[darling(default)]
    pub format: Option<String>,

    /// Single-column uniqueness constraint.
    #[darling(default)]
    pub unique: bool,

    /// Participates in a combined uniqueness constraint.
    #[darling(default)]
    pub unique_combo: bool,

    /// Request a plain index on the column.
    #[darling(default)]
    pub index: bool,

    /// Explicit index name; derived from table and column when omitted.
    #[darling(default)]
    pub index_name: Option<String>,

    /// Request a unique index on the column.
    #[darling(default)]
    pub unique_index: bool,

    /// Explicit unique-index name; derived when omitted.
    #[darling(default)]
    pub unique_index_name: Option<String>,

    /// Eagerly refresh the referenced foreign object.
    #[darling(default)]
    pub foreign_auto_refresh: bool,

    /// How many foreign hops auto-refresh may follow.
    #[darling(default)]
    pub max_foreign_auto_refresh_level: Option<i32>,

    /// Custom persister type, e.g. `persister = "BooleanType"`.
    #[darling(default)]
    pub persister: Option<Path>,

    /// Permit inserts that supply a value for a generated id.
    #[darling(default)]
    pub allow_generated_id_insert: bool,

    /// Verbatim column definition overriding generated DDL.
    #[darling(default)]
    pub column_definition: Option<String>,

    /// Create the referenced foreign row when missing.
    #[darling(default)]
    pub foreign_auto_create: bool,

    /// Optimistic-locking version column.
    #[darling(default)]
    pub version: bool,

    /// Column on the foreign side to join on instead of its id.
    #[darling(default)]
    pub foreign_column_name: Option<String>,

    /// Excluded from inserts and updates.
    #[darling(default)]
    pub read_only: bool,

    /// Set to `false` to exclude the field from persistence entirely.
    #[darling(default = "default_true")]
    pub persisted: bool
}

impl Default for FieldMarker {
    fn default() -> Self {
        Self {
            name: None,
            data_type: DataType::Unknown,
            default_value: None,
            width: 0,
            can_be_null: true,
            id: false,
            generated_id: false,
            generated_id_sequence: None,
            foreign: false,
            use_accessors: false,
            unknown_enum_name: None,
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
            persister: None,
            allow_generated_id_insert: false,
            column_definition: None,
            foreign_auto_create: false,
            version: false,
            foreign_column_name: None,
            read_only: false,
            persisted: true
        }
    }
}

impl FieldMarker {
    /// Parse the marker from a `#[column(...)]` attribute.
    ///
    /// A bare `#[column]` path yields the all-default payload, which is the
    /// common case for plain persisted fields.
    ///
    /// # Errors
    ///
    /// Returns a darling error for unrecognized or malformed options.
    pub fn from_attr(attr: &Attribute) -> darling::Result<Self> {
        match &attr.meta {
            Meta::Path(_) => Ok(Self::default()),
            meta => Self::from_meta(meta)
        }
    }
}

#[cfg(test)]
mod tests {
    use syn::parse_quote;

    use super::*;

    fn parse(attr: Attribute) -> FieldMarker {
        FieldMarker::from_attr(&attr).unwrap()
    }

    #[test]
    fn bare_marker_is_all_defaults() {
        let marker = parse(parse_quote!(#[column]));
        assert!(marker.name.is_none());
        assert!(marker.data_type.is_unknown());
        assert_eq!(marker.width, 0);
        assert!(marker.can_be_null);
        assert!(marker.persisted);
        assert!(!marker.id);
        assert!(!marker.index);
    }

    #[test]
    fn scalar_options_parse() {
        let marker = parse(parse_quote!(#[column(
            name = "test",
            data_type = "boolean",
            can_be_null = false,
            persister = "BooleanType"
        )]));
        assert_eq!(marker.name.as_deref(), Some("test"));
        assert_eq!(marker.data_type, DataType::Boolean);
        assert!(!marker.can_be_null);
        let persister = marker.persister.unwrap();
        assert!(persister.is_ident("BooleanType"));
    }

    #[test]
    fn flag_words_set_booleans() {
        let marker = parse(parse_quote!(#[column(id, unique, index, read_only)]));
        assert!(marker.id);
        assert!(marker.unique);
        assert!(marker.index);
        assert!(marker.read_only);
        assert!(!marker.generated_id);
    }

    #[test]
    fn persisted_false_parses() {
        let marker = parse(parse_quote!(#[column(persisted = false)]));
        assert!(!marker.persisted);
    }

    #[test]
    fn generated_id_with_sequence() {
        let marker = parse(parse_quote!(#[column(generated_id, generated_id_sequence = "account_seq")]));
        assert!(marker.generated_id);
        assert_eq!(marker.generated_id_sequence.as_deref(), Some("account_seq"));
    }

    #[test]
    fn refresh_level_is_absent_unless_set() {
        let marker = parse(parse_quote!(#[column(foreign_auto_refresh)]));
        assert!(marker.foreign_auto_refresh);
        assert!(marker.max_foreign_auto_refresh_level.is_none());

        let marker = parse(parse_quote!(#[column(max_foreign_auto_refresh_level = 3)]));
        assert_eq!(marker.max_foreign_auto_refresh_level, Some(3));
    }

    #[test]
    fn unknown_option_is_rejected() {
        let attr: Attribute = parse_quote!(#[column(columnName = "x")]);
        assert!(FieldMarker::from_attr(&attr).is_err());
    }
}
