//! Declarative persistence markers.
//!
//! Markers are the raw, unresolved payloads attached to declarations:
//! [`TableMarker`] on a type, [`FieldMarker`] on a scalar field,
//! [`CollectionMarker`] on a foreign-collection field. They capture exactly
//! what the author wrote — defaulting, blank filtering, and cross-option
//! derivation happen later in the [`binding`](crate::binding) resolver.
//!
//! All payloads are darling [`FromMeta`](darling::FromMeta) structs so the
//! reference front end can lift them straight out of `syn` attributes.

mod collection;
mod field;
mod table;

pub use collection::{CollectionMarker, DEFAULT_MAX_EAGER_LEVEL};
pub use field::FieldMarker;
pub use table::TableMarker;
