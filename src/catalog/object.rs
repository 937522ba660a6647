//! ADM object variants: the payload each `(object_type, name)` entry in a
//! [`super::Module`] carries.

use crate::ident::ObjectType;
use crate::typesys::{TypeExpr, TypeRef};
use crate::value::Ari;

/// Sentinel `enum_id` meaning "not yet assigned a nickname" (`u32::MAX`).
/// Lives here rather than alongside `adm-add-enum`, the transform that
/// produces and consumes it, because `Module::new`'s own uniqueness check
/// has to recognize it too and `catalog` does not depend on `transform`.
pub const UNASSIGNED_ENUM: u32 = u32::MAX;

/// A single formal parameter of a `CTRL`/`OPER`: its declared type and
/// default value, used when an actual parameter list comes up short.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct FormalParam {
    pub name: String,
    pub ty: TypeRef,
    pub default: Option<Ari>,
}

/// One named, enumerated entry of an ADM module.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct Object {
    pub name: String,
    pub enum_id: u32,
    pub object_type: ObjectType,
    pub kind: ObjectKind,
}

/// The kind-specific metadata carried by an [`Object`].
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectKind {
    Const { ty: TypeRef, value: Ari },
    Ctrl { params: Vec<FormalParam>, result: Option<TypeRef> },
    Edd { ty: TypeRef, params: Vec<FormalParam> },
    Ident { base_classes: Vec<String> },
    Oper { params: Vec<FormalParam>, result: TypeRef },
    Sbr { condition: TypeRef, action: TypeRef },
    Tbr { period: TypeRef, action: TypeRef },
    Typedef { expr: TypeExpr },
    Var { ty: TypeRef, params: Vec<FormalParam> },
}

impl Object {
    /// The formal parameter list, for object kinds that take parameters.
    /// Returns an empty slice for kinds that don't (`CONST`, `IDENT`,
    /// `TYPEDEF`, rule objects).
    pub fn formal_params(&self) -> &[FormalParam] {
        match &self.kind {
            ObjectKind::Ctrl { params, .. }
            | ObjectKind::Edd { params, .. }
            | ObjectKind::Oper { params, .. }
            | ObjectKind::Var { params, .. } => params,
            _ => &[],
        }
    }
}
