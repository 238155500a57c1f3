//! Table binding assembly.

use serde::Serialize;

use super::FieldBinding;
use crate::inventory::{TypeDecl, TypeRef};

/// Root artifact of a processing run: one table-bound type with its
/// resolved fields.
///
/// Fields appear in walk order: the owning type's own fields first, in
/// declaration order, then each ancestor's in turn. By the time a
/// `TableBinding` exists all validation has already happened and every
/// deferred index name has been finalized; the value is immutable and
/// ready for the external emitter.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableBinding {
    /// The type this binding was resolved from.
    pub owning_type: TypeRef,

    /// Declared table name, else the lowercased simple type name.
    pub table_name: String,

    /// Resolved field bindings in walk order. Never empty.
    pub fields: Vec<FieldBinding>
}

impl TableBinding {
    /// Combine a type's resolved field bindings into a table binding.
    ///
    /// Resolves the table name (declared value when non-blank, else the
    /// type's simple name lowercased) and finalizes the deferred
    /// index-name derivation for every field that requested one. Performs
    /// no validation; the walker and resolver have already done it.
    pub(crate) fn assemble(owning: &TypeDecl, mut fields: Vec<FieldBinding>) -> Self {
        let declared = owning
            .table
            .as_ref()
            .and_then(|marker| marker.name.as_deref())
            .filter(|name| !name.is_empty());
        let table_name = match declared {
            Some(name) => name.to_string(),
            None => owning.type_ref().simple_name().to_lowercase()
        };

        for field in &mut fields {
            field.resolve_index_name(&table_name);
            field.resolve_unique_index_name(&table_name);
        }

        Self {
            owning_type: owning.type_ref(),
            table_name,
            fields
        }
    }
}
