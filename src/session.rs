//! Batch resolution session.
//!
//! One processing run walks every table-marked declaration in the
//! inventory, in discovery order, and produces a [`BindingOutcome`]: the
//! table bindings that resolved cleanly, the diagnostics for those that
//! did not, and a [`Registry`] of owning-type references for the external
//! registration aggregator.
//!
//! Independent types are processed independently: one type's failure never
//! contaminates another's binding. Whether a failure stops the rest of the
//! batch is the caller's choice via [`ErrorMode`]; the default keeps going
//! and reports everything at the end.
//!
//! All working state — the accumulating field lists, the registry's
//! disambiguation counter — is local to the run and discarded with it.

use std::collections::HashMap;

use serde::Serialize;

use crate::{
    binding::TableBinding,
    error::BindingError,
    inventory::{TypeDecl, TypeInventory, TypeRef},
    walker::collect_field_bindings
};

/// What to do with the rest of the batch after a type fails validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorMode {
    /// Keep processing the remaining types and report every failure.
    #[default]
    ContinueOnError,

    /// Stop the batch at the first failing type.
    FailFast
}

/// Per-run settings, supplied once and applied uniformly.
#[derive(Debug, Clone, Default)]
pub struct BindingOptions {
    /// Upper-case resolved field names, for storage targets that require
    /// upper-cased entity names.
    pub uppercase_field_names: bool,

    /// Batch behavior on validation failure.
    pub error_mode: ErrorMode
}

/// One entry of the registration aggregator's input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegistryEntry {
    /// The successfully bound type.
    pub owning_type: TypeRef,

    /// Identifier for the generated configuration unit, unique within the
    /// run.
    pub unit_name: String
}

/// Owning-type references for every binding the run produced, in emission
/// order.
///
/// The external emitter turns this into the registration aggregator that
/// seeds the runtime cache with all produced configurations.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Registry {
    /// Entries in the same order as the emitted table bindings.
    pub entries: Vec<RegistryEntry>
}

impl Registry {
    /// Derive registry entries for the given bindings.
    ///
    /// Unit names come from the owning type's simple name; types from
    /// different paths sharing a simple name are disambiguated with a
    /// counter local to this call.
    fn for_tables(tables: &[TableBinding]) -> Self {
        let mut seen: HashMap<String, u32> = HashMap::new();
        let entries = tables
            .iter()
            .map(|table| {
                let base = format!("{}Bindings", table.owning_type.simple_name());
                let ordinal = seen
                    .entry(base.clone())
                    .and_modify(|count| *count += 1)
                    .or_insert(1);
                let unit_name = if *ordinal == 1 {
                    base
                } else {
                    format!("{base}{ordinal}")
                };
                RegistryEntry {
                    owning_type: table.owning_type.clone(),
                    unit_name
                }
            })
            .collect();
        Self {
            entries
        }
    }
}

/// Result of one batch run.
#[derive(Debug, Clone, Default)]
pub struct BindingOutcome {
    /// Bindings for every type that validated, in discovery order.
    pub tables: Vec<TableBinding>,

    /// Diagnostics for every type that failed. Under
    /// [`ErrorMode::FailFast`] at most one entry.
    pub errors: Vec<BindingError>,

    /// Registration input covering exactly the types in `tables`.
    pub registry: Registry
}

impl BindingOutcome {
    /// Whether every candidate type resolved cleanly.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Resolve a single declaration into a table binding.
///
/// # Errors
///
/// Any walker or resolver error for the declaration; see
/// [`BindingError`].
pub fn resolve_table(
    inventory: &TypeInventory,
    decl: &TypeDecl,
    options: &BindingOptions
) -> Result<TableBinding, BindingError> {
    let fields = collect_field_bindings(inventory, decl, options)?;
    Ok(TableBinding::assemble(decl, fields))
}

/// Resolve every table-marked declaration in the inventory.
///
/// Types are processed in discovery order; failed types contribute a
/// diagnostic instead of a binding. Under [`ErrorMode::FailFast`] the
/// first failure also stops the batch, reproducing the historical
/// all-or-nothing behavior.
#[must_use]
pub fn resolve_bindings(inventory: &TypeInventory, options: &BindingOptions) -> BindingOutcome {
    let mut tables = Vec::new();
    let mut errors = Vec::new();

    for decl in inventory.table_types() {
        match resolve_table(inventory, decl, options) {
            Ok(table) => tables.push(table),
            Err(error) => {
                errors.push(error);
                if options.error_mode == ErrorMode::FailFast {
                    break;
                }
            }
        }
    }

    let registry = Registry::for_tables(&tables);
    BindingOutcome {
        tables,
        errors,
        registry
    }
}

#[cfg(test)]
mod tests {
    use syn::parse_quote;

    use super::*;
    use crate::{
        error::BindingErrorKind,
        inventory::{FieldDecl, TypeRef},
        marker::{FieldMarker, TableMarker}
    };

    fn inventory_of(inputs: Vec<syn::DeriveInput>) -> TypeInventory {
        let mut inventory = TypeInventory::new();
        for input in &inputs {
            inventory.register(input).unwrap();
        }
        inventory
    }

    fn mixed_inventory() -> TypeInventory {
        inventory_of(vec![
            parse_quote! {
                #[table]
                struct Healthy {
                    #[column]
                    name: String,
                }
            },
            parse_quote! {
                #[table]
                struct Broken {
                    unmarked: i32,
                }
            },
            parse_quote! {
                #[table]
                struct AlsoHealthy {
                    #[column]
                    value: i64,
                }
            },
        ])
    }

    #[test]
    fn continue_on_error_processes_every_type() {
        let outcome = resolve_bindings(&mixed_inventory(), &BindingOptions::default());

        assert!(!outcome.is_success());
        assert_eq!(outcome.tables.len(), 2);
        assert_eq!(outcome.tables[0].table_name, "healthy");
        assert_eq!(outcome.tables[1].table_name, "alsohealthy");
        assert_eq!(outcome.errors.len(), 1);
        assert_eq!(outcome.errors[0].kind(), BindingErrorKind::NoPersistedFields);
        assert_eq!(outcome.errors[0].type_name(), "Broken");
    }

    #[test]
    fn fail_fast_stops_at_the_first_failure() {
        let options = BindingOptions {
            error_mode: ErrorMode::FailFast,
            ..BindingOptions::default()
        };
        let outcome = resolve_bindings(&mixed_inventory(), &options);

        assert_eq!(outcome.tables.len(), 1);
        assert_eq!(outcome.errors.len(), 1);
    }

    #[test]
    fn registry_covers_emitted_tables_in_order() {
        let outcome = resolve_bindings(&mixed_inventory(), &BindingOptions::default());

        let units: Vec<_> = outcome
            .registry
            .entries
            .iter()
            .map(|e| e.unit_name.as_str())
            .collect();
        assert_eq!(units, vec!["HealthyBindings", "AlsoHealthyBindings"]);
        assert_eq!(outcome.registry.entries[0].owning_type.name(), "Healthy");
    }

    #[test]
    fn registry_disambiguates_shared_simple_names() {
        let mut inventory = TypeInventory::new();
        for path in ["billing::Account", "audit::Account"] {
            let decl = TypeDecl::record(path)
                .with_table(TableMarker::default())
                .with_field(FieldDecl::scalar(
                    "id",
                    TypeRef::new("i64"),
                    FieldMarker::default()
                ));
            inventory.register_decl(decl);
        }

        let outcome = resolve_bindings(&inventory, &BindingOptions::default());
        assert!(outcome.is_success());

        let units: Vec<_> = outcome
            .registry
            .entries
            .iter()
            .map(|e| e.unit_name.as_str())
            .collect();
        assert_eq!(units, vec!["AccountBindings", "AccountBindings2"]);
        assert_eq!(outcome.tables[0].table_name, "account");
        assert_eq!(outcome.tables[1].table_name, "account");
    }

    #[test]
    fn empty_inventory_yields_empty_outcome() {
        let outcome = resolve_bindings(&TypeInventory::new(), &BindingOptions::default());
        assert!(outcome.is_success());
        assert!(outcome.tables.is_empty());
        assert!(outcome.registry.entries.is_empty());
    }

    #[test]
    fn uppercase_convention_is_applied_uniformly() {
        let inventory = inventory_of(vec![parse_quote! {
            #[table]
            struct Model {
                #[column]
                first_name: String,
                #[column]
                last_name: String,
            }
        }]);
        let options = BindingOptions {
            uppercase_field_names: true,
            ..BindingOptions::default()
        };
        let outcome = resolve_bindings(&inventory, &options);

        let names: Vec<_> = outcome.tables[0]
            .fields
            .iter()
            .map(|f| f.field_name.as_str())
            .collect();
        assert_eq!(names, vec!["FIRST_NAME", "LAST_NAME"]);
    }
}
