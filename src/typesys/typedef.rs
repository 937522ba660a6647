//! Typedef expressions: how a `TYPEDEF` object's declared shape is built
//! up from built-ins and other typedefs.

use super::TypeRef;

/// A named, typed column of a `tblt` typedef.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct FieldDef {
    pub name: String,
    pub ty: TypeRef,
}

/// Constraints a `use(ref, constraints)` typedef layers on top of a base
/// type: range, length, pattern, or enum-restriction.
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct Constraints {
    pub range: Option<(i128, i128)>,
    pub length: Option<(usize, Option<usize>)>,
    pub pattern: Option<String>,
    pub enumeration: Option<Vec<String>>,
}

impl Constraints {
    pub fn is_empty(&self) -> bool {
        self.range.is_none()
            && self.length.is_none()
            && self.pattern.is_none()
            && self.enumeration.is_none()
    }
}

/// The body of a `TYPEDEF` object.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeExpr {
    /// A reference to another typedef or built-in, no further structure.
    Alias(TypeRef),
    /// Ordered alternatives; first-match wins on encode, first-accepting
    /// wins on decode (pinned by `DESIGN.md`).
    Union(Vec<TypeExpr>),
    /// A uniform list of element type `T`.
    Ulist(Box<TypeExpr>),
    /// A heterogeneous list with a fixed element-type sequence.
    Dlist(Vec<TypeExpr>),
    /// A uniform map from key type `K` to value type `V`.
    Umap(Box<TypeExpr>, Box<TypeExpr>),
    /// A table whose rows have named/typed columns.
    Tblt(Vec<FieldDef>),
    /// A base type with constraints.
    Use(TypeRef, Constraints),
}

impl TypeExpr {
    /// The `TypeRef` this expression resolves to at its outermost layer,
    /// where that's unambiguous (`Alias`/`Use`); structural expressions
    /// have no single `TypeRef` and return `None`.
    pub fn as_type_ref(&self) -> Option<&TypeRef> {
        match self {
            TypeExpr::Alias(r) | TypeExpr::Use(r, _) => Some(r),
            _ => None,
        }
    }
}
