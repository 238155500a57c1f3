//! Resolved binding artifacts.
//!
//! A [`FieldBinding`] is one marker-bearing field after defaulting, blank
//! filtering, and cross-option derivation; a [`TableBinding`] is the root
//! artifact for one type: its table name plus its fields in walk order.
//! Both are plain serializable values, immutable once the assembler has
//! finalized them, and are what the external code emitter consumes.

mod data_type;
mod field;
mod table;

pub use data_type::DataType;
pub use field::{EnumConstantRef, FieldBinding, ForeignCollectionSpec};
pub use table::TableBinding;
