//! Shared catalog-building helpers for the integration test suite.

use ari_codec::catalog::{FormalParam, Module, Object, ObjectKind};
use ari_codec::ident::{Name, ObjectType};
use ari_codec::typesys::{BuiltinType, TypeRef};
use ari_codec::Catalog;

pub fn ctrl(name: &str, enum_id: u32, params: Vec<FormalParam>) -> Object {
    Object {
        name: name.into(),
        enum_id,
        object_type: ObjectType::Ctrl,
        kind: ObjectKind::Ctrl { params, result: None },
    }
}

pub fn edd(name: &str, enum_id: u32, ty: TypeRef) -> Object {
    Object {
        name: name.into(),
        enum_id,
        object_type: ObjectType::Edd,
        kind: ObjectKind::Edd { ty, params: Vec::new() },
    }
}

pub fn formal(name: &str, ty: TypeRef) -> FormalParam {
    FormalParam {
        name: name.into(),
        ty,
        default: None,
    }
}

/// A catalog preloaded with a single module `org/module` carrying a CTRL
/// named `inspect` (enum 12) that takes one EDD-typed parameter, and an
/// EDD named `sw-version` (enum 7) — enough surface for the object-
/// reference scenarios (S1, S4) without pulling in a full ADM fixture.
pub fn demo_catalog(org: &str, module: &str) -> Catalog {
    let objects = vec![
        ctrl("inspect", 12, vec![formal("target", TypeRef::builtin(BuiltinType::Text))]),
        edd("sw-version", 7, TypeRef::builtin(BuiltinType::Text)),
    ];
    let m = Module::new(Name::Text(org.into()), 1, Name::Text(module.into()), 1, None, objects).unwrap();
    let catalog = Catalog::new();
    catalog.load_module(m).unwrap();
    catalog
}
