//! Integration coverage for the transform pipeline: snapshotting a
//! realistic module's shape after `adm-add-enum` and `canonicalize`, and
//! running both through `ace_adm`'s lookup path (`transform::by_name`).

mod common;

use ari_codec::catalog::{Module, ObjectKind};
use ari_codec::ident::{Name, ObjectType};
use ari_codec::transform::{self, add_enum::UNASSIGNED};
use ari_codec::typesys::{BuiltinType, TypeRef};
use ari_codec::value::{Ari, Literal, Primitive};

fn const_obj(name: &str, enum_id: u32) -> ari_codec::catalog::Object {
    ari_codec::catalog::Object {
        name: name.into(),
        enum_id,
        object_type: ObjectType::Const,
        kind: ObjectKind::Const {
            ty: TypeRef::builtin(BuiltinType::Bool),
            value: Ari::Literal(Literal::new_unchecked(TypeRef::builtin(BuiltinType::Bool), Primitive::Bool(true))),
        },
    }
}

fn unsorted_module() -> Module {
    Module::new(
        Name::Text("ietf".into()),
        1,
        Name::Text("dtnma-agent".into()),
        1,
        None,
        vec![
            const_obj("zeta", UNASSIGNED),
            common::ctrl("inspect", 12, vec![common::formal("target", TypeRef::builtin(BuiltinType::Text))]),
            const_obj("alpha", UNASSIGNED),
            common::edd("sw-version", 7, TypeRef::builtin(BuiltinType::Text)),
        ],
    )
    .unwrap()
}

#[test]
fn add_enum_then_canonicalize_produces_a_stable_shape() {
    let module = unsorted_module();
    let with_enums = transform::add_enum(&module).unwrap();
    let canonical = transform::canonicalize(&with_enums).unwrap();

    let shape: Vec<(String, u32, String)> = canonical
        .objects()
        .iter()
        .map(|o| (format!("{:?}", o.object_type), o.enum_id, o.name.clone()))
        .collect();
    insta::assert_yaml_snapshot!(shape, @r###"
    - - Const
      - 0
      - alpha
    - - Const
      - 1
      - zeta
    - - Ctrl
      - 12
      - inspect
    - - Edd
      - 7
      - sw-version
    "###);
}

#[test]
fn pipeline_order_is_respected() {
    let module = unsorted_module();
    let forward = transform::run_pipeline(
        &module,
        &[transform::by_name("adm-add-enum").unwrap(), transform::by_name("canonicalize").unwrap()],
    )
    .unwrap();
    // canonicalize before add_enum would leave UNASSIGNED (u32::MAX) entries
    // sorted to the end of their bucket instead of given real enums.
    assert!(forward.objects().iter().all(|o| o.enum_id != UNASSIGNED));
}

#[test]
fn unknown_transform_name_is_rejected() {
    assert!(transform::by_name("not-a-real-transform").is_none());
}

#[test]
fn lint_runs_after_transforms_see_renamed_objects() {
    let module = Module::new(
        Name::Text("ietf".into()),
        1,
        Name::Text("dtnma-agent".into()),
        1,
        None,
        vec![const_obj("under_scored", 0)],
    )
    .unwrap();
    let findings = transform::lint_ensure_hyphenated_names(&transform::canonicalize(&module).unwrap());
    assert_eq!(findings.len(), 1);
    assert_eq!(findings[0].name, "under_scored");
}
