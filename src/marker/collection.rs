//! Foreign-collection field marker.

use darling::FromMeta;
use syn::{Attribute, Meta};

/// Default number of foreign-collection hops that are loaded eagerly.
pub const DEFAULT_MAX_EAGER_LEVEL: i32 = 1;

fn default_true() -> bool {
    true
}

/// Payload of the `#[collection(...)]` marker on a foreign-collection field.
///
/// Collection fields take a wholly separate resolution branch from scalar
/// fields: none of the scalar column options apply to them.
///
/// Two option pairs exist in legacy and current spellings:
/// `max_eager_foreign_collection_level` predates `max_eager_level`, and
/// `foreign_column_name` predates `foreign_field_name`. The resolver prefers
/// the current spelling when resolving the
/// [`FieldBinding`](crate::binding::FieldBinding).
#[derive(Debug, Clone, FromMeta)]
pub struct CollectionMarker {
    /// Load the collection with its owner instead of on demand.
    #[darling(default)]
    pub eager: bool,

    /// How many relationship hops to load eagerly (current spelling).
    #[darling(default)]
    pub max_eager_level: Option<i32>,

    /// Legacy spelling of the eager level; wins only when set away from
    /// [`DEFAULT_MAX_EAGER_LEVEL`].
    #[darling(default)]
    pub max_eager_foreign_collection_level: Option<i32>,

    /// Column name for the collection.
    #[darling(default)]
    pub name: Option<String>,

    /// Column the collection is ordered by.
    #[darling(default)]
    pub order_column_name: Option<String>,

    /// Ordering direction when `order_column_name` is set. Defaults to
    /// ascending.
    #[darling(default = "default_true")]
    pub order_ascending: bool,

    /// Field on the foreign type that points back at the owner (current
    /// spelling).
    #[darling(default)]
    pub foreign_field_name: Option<String>,

    /// Legacy spelling of `foreign_field_name`.
    #[darling(default)]
    pub foreign_column_name: Option<String>
}

impl Default for CollectionMarker {
    fn default() -> Self {
        Self {
            eager: false,
            max_eager_level: None,
            max_eager_foreign_collection_level: None,
            name: None,
            order_column_name: None,
            order_ascending: true,
            foreign_field_name: None,
            foreign_column_name: None
        }
    }
}

impl CollectionMarker {
    /// Parse the marker from a `#[collection(...)]` attribute.
    ///
    /// A bare `#[collection]` path yields the all-default payload.
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
