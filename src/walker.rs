//! Type binding walker.
//!
//! Collects field bindings across a type and its ancestor chain. A
//! subtype's own fields come first, in declaration order; each ancestor's
//! fields are appended after, up to the hierarchy root. The chain also ends
//! at the first ancestor the inventory does not know, since unregistered
//! types cannot carry markers anyway.

use crate::{
    binding::FieldBinding,
    error::BindingError,
    inventory::{DeclaredMarker, TypeDecl, TypeInventory, TypeKind},
    session::BindingOptions
};

/// Walk `owning` and its ancestors, resolving every marked field.
///
/// Fields whose scalar marker declares `persisted = false` are skipped;
/// fields without a marker are invisible. The first resolver failure
/// aborts the walk for this type.
///
/// # Errors
///
/// [`BindingError::NotARecordType`] when `owning` is not a record;
/// [`BindingError::NoPersistedFields`] when the walk produces nothing;
/// any resolver error, carrying the declaring type and field.
pub(crate) fn collect_field_bindings(
    inventory: &TypeInventory,
    owning: &TypeDecl,
    options: &BindingOptions
) -> Result<Vec<FieldBinding>, BindingError> {
    if owning.kind != TypeKind::Record {
        return Err(BindingError::NotARecordType {
            type_name: owning.ident.clone()
        });
    }

    let mut bindings = Vec::new();
    let mut working = Some(owning);
    while let Some(decl) = working {
        for field in &decl.fields {
            match &field.marker {
                Some(DeclaredMarker::Scalar(marker)) => {
                    if !marker.persisted {
                        continue;
                    }
                    bindings.push(FieldBinding::from_column_marker(
                        &decl.ident,
                        field,
                        marker,
                        inventory,
                        options
                    )?);
                }
                Some(DeclaredMarker::Collection(marker)) => {
                    bindings.push(FieldBinding::from_collection_marker(field, marker));
                }
                None => {}
            }
        }
        working = decl.parent.as_ref().and_then(|parent| inventory.get(parent));
    }

    if bindings.is_empty() {
        return Err(BindingError::NoPersistedFields {
            type_name: owning.ident.clone()
        });
    }
    Ok(bindings)
}

#[cfg(test)]
mod tests {
    use syn::parse_quote;

    use super::*;
    use crate::{error::BindingErrorKind, inventory::TypeRef};

    fn inventory_of(inputs: Vec<syn::DeriveInput>) -> TypeInventory {
        let mut inventory = TypeInventory::new();
        for input in &inputs {
            inventory.register(input).unwrap();
        }
        inventory
    }

    fn walk(inventory: &TypeInventory, name: &str) -> Result<Vec<FieldBinding>, BindingError> {
        let decl = inventory.get(&TypeRef::new(name)).unwrap();
        collect_field_bindings(inventory, decl, &BindingOptions::default())
    }

    #[test]
    fn own_fields_in_declaration_order() {
        let inventory = inventory_of(vec![parse_quote! {
            #[table]
            struct Model {
                #[column]
                first: i32,
                #[column]
                second: i32,
                #[column]
                third: i32,
            }
        }]);
        let names: Vec<_> = walk(&inventory, "Model")
            .unwrap()
            .into_iter()
            .map(|b| b.field_name)
            .collect();
        assert_eq!(names, vec!["first", "second", "third"]);
    }

    #[test]
    fn ancestor_fields_follow_own_fields() {
        let inventory = inventory_of(vec![
            parse_quote! {
                struct Root {
                    #[column]
                    root_id: i64,
                }
            },
            parse_quote! {
                #[extends(Root)]
                struct Middle {
                    #[column]
                    created_at: i64,
                }
            },
            parse_quote! {
                #[table]
                #[extends(Middle)]
                struct Leaf {
                    #[column]
                    name: String,
                    #[column]
                    flag: bool,
                }
            },
        ]);
        let names: Vec<_> = walk(&inventory, "Leaf")
            .unwrap()
            .into_iter()
            .map(|b| b.field_name)
            .collect();
        assert_eq!(names, vec!["name", "flag", "created_at", "root_id"]);
    }

    #[test]
    fn unregistered_ancestor_ends_the_chain() {
        let inventory = inventory_of(vec![parse_quote! {
            #[table]
            #[extends(ExternalBase)]
            struct Model {
                #[column]
                name: String,
            }
        }]);
        let bindings = walk(&inventory, "Model").unwrap();
        assert_eq!(bindings.len(), 1);
    }

    #[test]
    fn unmarked_and_unpersisted_fields_are_skipped() {
        let inventory = inventory_of(vec![parse_quote! {
            #[table]
            struct Model {
                #[column]
                kept: i32,
                plain: i32,
                #[column(persisted = false)]
                transient: i32,
            }
        }]);
        let names: Vec<_> = walk(&inventory, "Model")
            .unwrap()
            .into_iter()
            .map(|b| b.field_name)
            .collect();
        assert_eq!(names, vec!["kept"]);
    }

    #[test]
    fn collection_fields_are_collected() {
        let inventory = inventory_of(vec![parse_quote! {
            #[table]
            struct Parent {
                #[collection]
                children: Vec<Child>,
            }
        }]);
        let bindings = walk(&inventory, "Parent").unwrap();
        assert!(bindings[0].is_foreign_collection());
    }

    #[test]
    fn non_record_type_is_rejected() {
        let inventory = inventory_of(vec![parse_quote! {
            #[table]
            enum Status { Active, Closed }
        }]);
        let err = walk(&inventory, "Status").unwrap_err();
        assert_eq!(err.kind(), BindingErrorKind::NotARecordType);
        assert_eq!(err.type_name(), "Status");
    }

    #[test]
    fn type_with_no_marked_fields_fails() {
        let inventory = inventory_of(vec![parse_quote! {
            #[table]
            struct Empty {
                ignored: i32,
            }
        }]);
        let err = walk(&inventory, "Empty").unwrap_err();
        assert_eq!(err.kind(), BindingErrorKind::NoPersistedFields);
    }

    #[test]
    fn all_fields_unpersisted_counts_as_none() {
        let inventory = inventory_of(vec![parse_quote! {
            #[table]
            struct Model {
                #[column(persisted = false)]
                hidden: i32,
            }
        }]);
        let err = walk(&inventory, "Model").unwrap_err();
        assert_eq!(err.kind(), BindingErrorKind::NoPersistedFields);
    }

    #[test]
    fn resolver_errors_name_the_declaring_ancestor() {
        let inventory = inventory_of(vec![
            parse_quote! {
                struct Base {
                    #[column(unknown_enum_name = "TEST")]
                    status: String,
                }
            },
            parse_quote! {
                #[table]
                #[extends(Base)]
                struct Model {
                    #[column]
                    name: String,
                }
            },
        ]);
        let err = walk(&inventory, "Model").unwrap_err();
        assert_eq!(err.kind(), BindingErrorKind::NotAnEnumField);
        assert_eq!(err.type_name(), "Base");
        assert_eq!(err.field_name(), Some("status"));
    }
}
