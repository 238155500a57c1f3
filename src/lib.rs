//! # table-bindgen
//!
//! Build-time resolution of declarative persistence markers into table
//! binding configurations. Record types declare how their fields map to
//! storage columns; this crate walks each type's ancestor chain, resolves
//! every marked field into a fully-defaulted [`FieldBinding`], and
//! assembles one [`TableBinding`] per type — so the running program loads
//! ready-made configurations instead of paying for startup introspection.
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use table_bindgen::{BindingOptions, TypeInventory, resolve_bindings};
//!
//! let mut inventory = TypeInventory::new();
//! inventory.register(&syn::parse_quote! {
//!     #[table]
//!     struct Simple {
//!         #[column]
//!         name: String,
//!
//!         #[column(name = "test", data_type = "boolean", can_be_null = false)]
//!         flag: bool,
//!     }
//! })?;
//!
//! let outcome = resolve_bindings(&inventory, &BindingOptions::default());
//! assert_eq!(outcome.tables[0].table_name, "simple");
//! ```
//!
//! The resolved bindings are plain serializable values; feeding them to a
//! code emitter, and discovering the declarations in the first place, are
//! deliberately someone else's job.
//!
//! ## Pipeline
//!
//! | Stage | Entry point | Role |
//! |-------|-------------|------|
//! | inventory | [`TypeInventory`] | declarations with attached markers |
//! | walker | [`resolve_table`] | fields across the ancestor chain |
//! | resolver | [`FieldBinding`] | defaulting and cross-option derivation |
//! | assembler | [`TableBinding`] | table name and deferred index names |
//! | session | [`resolve_bindings`] | batch order, error policy, registry |
//!
//! Every validation failure is a typed [`BindingError`] naming the
//! offending type and field; nothing panics and nothing is reported
//! without identity.

pub mod binding;
pub mod error;
pub mod inventory;
pub mod marker;
pub mod session;

mod walker;

pub use binding::{DataType, EnumConstantRef, FieldBinding, ForeignCollectionSpec, TableBinding};
pub use error::{BindingError, BindingErrorKind};
pub use inventory::{DeclaredMarker, FieldDecl, TypeDecl, TypeInventory, TypeKind, TypeRef};
pub use marker::{CollectionMarker, DEFAULT_MAX_EAGER_LEVEL, FieldMarker, TableMarker};
pub use session::{
    BindingOptions, BindingOutcome, ErrorMode, Registry, RegistryEntry, resolve_bindings,
    resolve_table
};
