//! Marker inventory: the engine's view of declared types.
//!
//! The resolution core never introspects the host type system directly. It
//! consumes a [`TypeInventory`]: an ordered set of [`TypeDecl`]s, each
//! carrying its kind, its ancestor link, and its fields with any attached
//! markers. How the declarations are discovered is the front end's problem;
//! this module ships a `syn`-backed reference front end
//! ([`TypeInventory::register`]) that lifts declarations out of
//! `syn::DeriveInput`, and a direct path ([`TypeInventory::register_decl`])
//! for callers that build declarations themselves.
//!
//! # Declaration syntax understood by the reference front end
//!
//! ```rust,ignore
//! #[table(name = "accounts")]
//! #[extends(AuditedBase)]
//! struct Account {
//!     #[column(generated_id)]
//!     id: i64,
//!
//!     #[column(name = "login", unique, can_be_null = false)]
//!     login: String,
//!
//!     #[collection(eager = false, order_column_name = "position")]
//!     orders: Vec<Order>,
//! }
//! ```
//!
//! Ancestors are followed only while they are registered in the inventory;
//! an unregistered parent ends the chain, the same way a hierarchy root
//! does. Cyclic ancestor links are assumed impossible, an invariant the
//! front end inherits from the host type system.

use std::collections::HashMap;

use serde::Serialize;
use syn::{Attribute, DeriveInput, Type};

use crate::marker::{CollectionMarker, FieldMarker, TableMarker};

/// Opaque reference to a type, by name.
///
/// The core only ever uses it for identity, simple-name access, and
/// inventory lookups; it never inspects the referenced type beyond what the
/// owning [`TypeDecl`] records.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct TypeRef(String);

impl TypeRef {
    /// Reference a type by name.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Reference the type named by the last segment of a path.
    #[must_use]
    pub fn from_path(path: &syn::Path) -> Self {
        match path.segments.last() {
            Some(segment) => Self(segment.ident.to_string()),
            None => Self(String::new())
        }
    }

    /// The referenced type's name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.0
    }

    /// The last path segment of the name.
    #[must_use]
    pub fn simple_name(&self) -> &str {
        self.0.rsplit("::").next().unwrap_or(&self.0)
    }
}

impl std::fmt::Display for TypeRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Kind of a declared type, as far as the engine cares.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeKind {
    /// Named-field record; the only kind that can carry a table marker.
    Record,
    /// Enumerated type; eligible as an unknown-enum fallback target.
    Enum,
    /// Any other declarable kind.
    Union
}

/// Marker attached to one field, if any.
#[derive(Debug, Clone)]
pub enum DeclaredMarker {
    /// Scalar `#[column(...)]` marker.
    Scalar(FieldMarker),
    /// Foreign-collection `#[collection(...)]` marker.
    Collection(CollectionMarker)
}

/// One declared field, in source order.
#[derive(Debug, Clone)]
pub struct FieldDecl {
    /// Field identifier as declared.
    pub ident:         String,
    /// The field's own declared type, used for enum-fallback resolution.
    pub declared_type: TypeRef,
    /// Attached marker; fields without one are invisible to the walker.
    pub marker:        Option<DeclaredMarker>
}

impl FieldDecl {
    /// Declare a field with no marker.
    pub fn bare(ident: impl Into<String>, declared_type: TypeRef) -> Self {
        Self {
            ident: ident.into(),
            declared_type,
            marker: None
        }
    }

    /// Declare a field with a scalar marker.
    pub fn scalar(ident: impl Into<String>, declared_type: TypeRef, marker: FieldMarker) -> Self {
        Self {
            ident: ident.into(),
            declared_type,
            marker: Some(DeclaredMarker::Scalar(marker))
        }
    }

    /// Declare a field with a collection marker.
    pub fn collection(
        ident: impl Into<String>,
        declared_type: TypeRef,
        marker: CollectionMarker
    ) -> Self {
        Self {
            ident: ident.into(),
            declared_type,
            marker: Some(DeclaredMarker::Collection(marker))
        }
    }
}

/// One declared type as the inventory sees it.
#[derive(Debug, Clone)]
pub struct TypeDecl {
    /// Simple type name.
    pub ident:     String,
    /// Record, enum, or other.
    pub kind:      TypeKind,
    /// Immediate ancestor, or `None` at the hierarchy root.
    pub parent:    Option<TypeRef>,
    /// Table marker, present iff the type is a binding candidate.
    pub table:     Option<TableMarker>,
    /// Declared fields in source order.
    pub fields:    Vec<FieldDecl>,
    /// Constant names, populated for enum declarations.
    pub constants: Vec<String>
}

impl TypeDecl {
    /// Declare a record type with no parent, no table marker, no fields.
    pub fn record(ident: impl Into<String>) -> Self {
        Self {
            ident:     ident.into(),
            kind:      TypeKind::Record,
            parent:    None,
            table:     None,
            fields:    Vec::new(),
            constants: Vec::new()
        }
    }

    /// Declare an enumerated type with the given constants.
    pub fn enumeration<I, S>(ident: impl Into<String>, constants: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>
    {
        Self {
            ident:     ident.into(),
            kind:      TypeKind::Enum,
            parent:    None,
            table:     None,
            fields:    Vec::new(),
            constants: constants.into_iter().map(Into::into).collect()
        }
    }

    /// Attach a table marker.
    #[must_use]
    pub fn with_table(mut self, table: TableMarker) -> Self {
        self.table = Some(table);
        self
    }

    /// Link to an immediate ancestor.
    #[must_use]
    pub fn with_parent(mut self, parent: TypeRef) -> Self {
        self.parent = Some(parent);
        self
    }

    /// Append a field declaration.
    #[must_use]
    pub fn with_field(mut self, field: FieldDecl) -> Self {
        self.fields.push(field);
        self
    }

    /// Reference to this declaration.
    #[must_use]
    pub fn type_ref(&self) -> TypeRef {
        TypeRef::new(self.ident.clone())
    }
}

/// Ordered set of type declarations for one processing run.
///
/// Registration order is discovery order: [`TypeInventory::table_types`]
/// yields binding candidates in the order they were registered, and the
/// session emits table bindings in the same order.
#[derive(Debug, Default)]
pub struct TypeInventory {
    decls:   Vec<TypeDecl>,
    by_name: HashMap<String, usize>
}

impl TypeInventory {
    /// Empty inventory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a declaration parsed from `syn::DeriveInput`.
    ///
    /// Recognizes `#[table]`, `#[extends(Parent)]`, `#[column(...)]`, and
    /// `#[collection(...)]`. Enum declarations contribute their constants;
    /// their `#[table]` markers (if any) are recorded and rejected later by
    /// the walker, so the diagnostic carries the right kind.
    ///
    /// # Errors
    ///
    /// Returns a darling error when the declaration is a tuple or unit
    /// struct, or when a marker option is malformed.
    pub fn register(&mut self, input: &DeriveInput) -> darling::Result<TypeRef> {
        let decl = parse_decl(input)?;
        Ok(self.register_decl(decl))
    }

    /// Register a declaration built directly, bypassing the syn front end.
    pub fn register_decl(&mut self, decl: TypeDecl) -> TypeRef {
        let type_ref = decl.type_ref();
        match self.by_name.get(decl.ident.as_str()) {
            // Re-registration replaces the earlier declaration in place,
            // keeping its discovery position.
            Some(&slot) => self.decls[slot] = decl,
            None => {
                self.by_name.insert(decl.ident.clone(), self.decls.len());
                self.decls.push(decl);
            }
        }
        type_ref
    }

    /// Look up a declaration by reference.
    #[must_use]
    pub fn get(&self, type_ref: &TypeRef) -> Option<&TypeDecl> {
        self.by_name.get(type_ref.name()).map(|&slot| &self.decls[slot])
    }

    /// All declarations carrying a table marker, in discovery order.
    pub fn table_types(&self) -> impl Iterator<Item = &TypeDecl> {
        self.decls.iter().filter(|decl| decl.table.is_some())
    }

    /// Number of registered declarations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.decls.len()
    }

    /// Whether the inventory is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.decls.is_empty()
    }
}

/// Parse one `DeriveInput` into a [`TypeDecl`].
fn parse_decl(input: &DeriveInput) -> darling::Result<TypeDecl> {
    let ident = input.ident.to_string();
    let table = find_table_marker(&input.attrs)?;
    let parent = find_extends(&input.attrs)?;

    let (kind, fields, constants) = match &input.data {
        syn::Data::Struct(data) => match &data.fields {
            syn::Fields::Named(named) => {
                let fields = named
                    .named
                    .iter()
                    .map(parse_field_decl)
                    .collect::<darling::Result<Vec<_>>>()?;
                (TypeKind::Record, fields, Vec::new())
            }
            _ => {
                return Err(darling::Error::custom("table types require named fields")
                    .with_span(&input.ident));
            }
        },
        syn::Data::Enum(data) => {
            let constants = data.variants.iter().map(|v| v.ident.to_string()).collect();
            (TypeKind::Enum, Vec::new(), constants)
        }
        syn::Data::Union(_) => (TypeKind::Union, Vec::new(), Vec::new())
    };

    Ok(TypeDecl {
        ident,
        kind,
        parent,
        table,
        fields,
        constants
    })
}

/// Parse one named field, picking up its marker if present.
///
/// A field carrying both marker kinds resolves as scalar; the scalar marker
/// is checked first, matching the original precedence.
fn parse_field_decl(field: &syn::Field) -> darling::Result<FieldDecl> {
    let ident = field
        .ident
        .as_ref()
        .map(ToString::to_string)
        .unwrap_or_default();
    let declared_type = declared_type_of(&field.ty);

    let mut marker = None;
    for attr in &field.attrs {
        if attr.path().is_ident("column") {
            marker = Some(DeclaredMarker::Scalar(FieldMarker::from_attr(attr)?));
            break;
        }
        if attr.path().is_ident("collection") {
            marker = Some(DeclaredMarker::Collection(CollectionMarker::from_attr(attr)?));
            break;
        }
    }

    Ok(FieldDecl {
        ident,
        declared_type,
        marker
    })
}

/// Extract `#[table]` / `#[table(...)]` from type attributes.
fn find_table_marker(attrs: &[Attribute]) -> darling::Result<Option<TableMarker>> {
    for attr in attrs {
        if attr.path().is_ident("table") {
            return TableMarker::from_attr(attr).map(Some);
        }
    }
    Ok(None)
}

/// Extract `#[extends(Parent)]` from type attributes.
fn find_extends(attrs: &[Attribute]) -> darling::Result<Option<TypeRef>> {
    for attr in attrs {
        if attr.path().is_ident("extends") {
            let path: syn::Path = attr
                .parse_args()
                .map_err(|_| darling::Error::custom("extends takes a type path").with_span(attr))?;
            return Ok(Some(TypeRef::from_path(&path)));
        }
    }
    Ok(None)
}

/// The type a field is declared with, for enum-fallback resolution.
///
/// One level of single-argument generics is unwrapped so `Option<Status>`
/// and `Vec<Order>` resolve to the inner type. Non-path types yield an
/// unnamed reference that matches no declaration.
fn declared_type_of(ty: &Type) -> TypeRef {
    let Type::Path(type_path) = ty else {
        return TypeRef::new("");
    };
    let Some(segment) = type_path.path.segments.last() else {
        return TypeRef::new("");
    };

    if let syn::PathArguments::AngleBracketed(args) = &segment.arguments {
        let mut inner_types = args.args.iter().filter_map(|arg| match arg {
            syn::GenericArgument::Type(inner) => Some(inner),
            _ => None
        });
        if let (Some(inner), None) = (inner_types.next(), inner_types.next()) {
            return declared_type_of(inner);
        }
    }

    TypeRef::new(segment.ident.to_string())
}
