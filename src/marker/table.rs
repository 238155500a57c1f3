//! Type-level table marker.

use darling::FromMeta;
use syn::{Attribute, Meta};

/// Payload of the `#[table]` marker on a record type.
///
/// A bare `#[table]` leaves the table name to be derived from the type name
/// at assembly time; `#[table(name = "accounts")]` declares it explicitly.
#[derive(Debug, Clone, Default, PartialEq, Eq, FromMeta)]
pub struct TableMarker {
    /// Declared table name. Blank counts as "not declared".
    #[darling(default)]
    pub name: Option<String>
}

impl TableMarker {
    /// Parse the marker from a `#[table(...)]` attribute.
    ///
    /// A bare `#[table]` path yields the all-default payload.
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

    #[test]
    fn bare_marker_has_no_name() {
        let attr: Attribute = parse_quote!(#[table]);
        let marker = TableMarker::from_attr(&attr).unwrap();
        assert!(marker.name.is_none());
    }

    #[test]
    fn explicit_name_is_kept_verbatim() {
        let attr: Attribute = parse_quote!(#[table(name = "accounts")]);
        let marker = TableMarker::from_attr(&attr).unwrap();
        assert_eq!(marker.name.as_deref(), Some("accounts"));
    }

    #[test]
    fn unknown_option_is_rejected() {
        let attr: Attribute = parse_quote!(#[table(tablename = "x")]);
        assert!(TableMarker::from_attr(&attr).is_err());
    }
}
