//! Catalog resolution: name/enum lookup, revision matching, and the
//! ambiguous-organization-alias case.

mod common;

use ari_codec::catalog::Module;
use ari_codec::ident::{Name, ObjectRef, ObjectType, Revision};
use ari_codec::{Ari, CodecError};

fn rev(year: u16, month: u8, day: u8) -> Revision {
    Revision { year, month, day }
}

#[test]
fn resolve_by_name_finds_object_in_single_module() {
    let catalog = common::demo_catalog("ietf", "dtnma-agent");
    let obj = catalog
        .resolve_by_name(
            &Name::Text("ietf".into()),
            &Name::Text("dtnma-agent".into()),
            None,
            ObjectType::Ctrl,
            &Name::Text("inspect".into()),
        )
        .unwrap();
    assert_eq!(obj.enum_id, 12);
}

#[test]
fn resolve_by_enum_finds_same_object_as_resolve_by_name() {
    let catalog = common::demo_catalog("ietf", "dtnma-agent");
    let obj = catalog.resolve_by_enum(1, 1, None, ObjectType::Edd, 7).unwrap();
    assert_eq!(obj.name, "sw-version");
}

#[test]
fn unknown_object_is_not_found() {
    let catalog = common::demo_catalog("ietf", "dtnma-agent");
    let err = catalog
        .resolve_by_name(
            &Name::Text("ietf".into()),
            &Name::Text("dtnma-agent".into()),
            None,
            ObjectType::Ctrl,
            &Name::Text("does-not-exist".into()),
        )
        .unwrap_err();
    assert!(matches!(err, CodecError::NotFound(_)));
}

#[test]
fn no_revision_requested_picks_the_latest_one_loaded() {
    let catalog = common::demo_catalog("ietf", "dtnma-agent");
    let old = Module::new(
        Name::Text("ietf".into()),
        1,
        Name::Text("dtnma-agent".into()),
        1,
        Some(rev(2020, 1, 1)),
        vec![common::edd("sw-version", 7, ari_codec::typesys::TypeRef::builtin(ari_codec::typesys::BuiltinType::Text))],
    )
    .unwrap();
    let new = Module::new(
        Name::Text("ietf".into()),
        1,
        Name::Text("dtnma-agent".into()),
        1,
        Some(rev(2024, 6, 1)),
        vec![common::edd("sw-version", 99, ari_codec::typesys::TypeRef::builtin(ari_codec::typesys::BuiltinType::Text))],
    )
    .unwrap();
    catalog.load_module(old).unwrap();
    catalog.load_module(new).unwrap();

    let resolved = catalog
        .resolve_by_name(
            &Name::Text("ietf".into()),
            &Name::Text("dtnma-agent".into()),
            None,
            ObjectType::Edd,
            &Name::Text("sw-version".into()),
        )
        .unwrap();
    assert_eq!(resolved.enum_id, 99, "should have picked the 2024-06-01 revision, not the unversioned or 2020 one");
}

#[test]
fn exact_revision_request_picks_that_revision_even_if_not_latest() {
    let catalog = ari_codec::Catalog::new();
    let v1 = Module::new(
        Name::Text("ietf".into()),
        1,
        Name::Text("dtnma-agent".into()),
        1,
        Some(rev(2020, 1, 1)),
        vec![common::edd("sw-version", 7, ari_codec::typesys::TypeRef::builtin(ari_codec::typesys::BuiltinType::Text))],
    )
    .unwrap();
    let v2 = Module::new(
        Name::Text("ietf".into()),
        1,
        Name::Text("dtnma-agent".into()),
        1,
        Some(rev(2024, 6, 1)),
        vec![common::edd("sw-version", 99, ari_codec::typesys::TypeRef::builtin(ari_codec::typesys::BuiltinType::Text))],
    )
    .unwrap();
    catalog.load_module(v1).unwrap();
    catalog.load_module(v2).unwrap();

    let resolved = catalog
        .resolve_by_name(
            &Name::Text("ietf".into()),
            &Name::Text("dtnma-agent".into()),
            Some(rev(2020, 1, 1)),
            ObjectType::Edd,
            &Name::Text("sw-version".into()),
        )
        .unwrap();
    assert_eq!(resolved.enum_id, 7);
}

#[test]
fn loading_the_same_module_identity_twice_is_idempotent() {
    let catalog = common::demo_catalog("ietf", "dtnma-agent");
    let dup = Module::new(
        Name::Text("ietf".into()),
        1,
        Name::Text("dtnma-agent".into()),
        1,
        None,
        vec![common::edd("sw-version", 123, ari_codec::typesys::TypeRef::builtin(ari_codec::typesys::BuiltinType::Text))],
    )
    .unwrap();
    catalog.load_module(dup).unwrap();

    assert_eq!(catalog.list_modules().len(), 1, "duplicate (org, module, revision) should not add a second module");
    let obj = catalog
        .resolve_by_name(
            &Name::Text("ietf".into()),
            &Name::Text("dtnma-agent".into()),
            None,
            ObjectType::Edd,
            &Name::Text("sw-version".into()),
        )
        .unwrap();
    assert_eq!(obj.enum_id, 7, "the first-loaded copy should have won, not the later duplicate");
}

#[test]
fn same_org_alias_with_two_distinct_enums_is_ambiguous() {
    let catalog = ari_codec::Catalog::new();
    let a = Module::new(Name::Text("ietf".into()), 1, Name::Text("dtnma-agent".into()), 1, None, vec![]).unwrap();
    let b = Module::new(Name::Text("ietf".into()), 2, Name::Text("other-agent".into()), 1, None, vec![]).unwrap();
    catalog.load_module(a).unwrap();
    catalog.load_module(b).unwrap();

    let err = catalog
        .resolve_by_name(
            &Name::Text("ietf".into()),
            &Name::Text("dtnma-agent".into()),
            None,
            ObjectType::Ctrl,
            &Name::Text("inspect".into()),
        )
        .unwrap_err();
    assert!(matches!(err, CodecError::AmbiguousReference(_)));
}

#[test]
fn undefined_actual_parameter_is_rejected() {
    let catalog = common::demo_catalog("ietf", "dtnma-agent");
    let call = ObjectRef::new(
        Name::Text("ietf".into()),
        Name::Text("dtnma-agent".into()),
        None,
        ObjectType::Ctrl,
        Name::Text("inspect".into()),
        vec![Ari::Undefined],
    );
    let err = catalog.resolve_ari(&Ari::Reference(call), true).unwrap_err();
    assert!(matches!(err, CodecError::InvariantViolation(_)));
}

#[test]
fn reference_actual_parameter_is_checked_against_its_target_type() {
    // Builds its own catalog (rather than reusing `demo_catalog`) so a
    // zero-parameter "noop" CTRL can sit alongside "inspect"/"sw-version"
    // without a second `load_module` call colliding on the same identity.
    let catalog = ari_codec::Catalog::new();
    let m = Module::new(
        Name::Text("ietf".into()),
        1,
        Name::Text("dtnma-agent".into()),
        1,
        None,
        vec![
            common::ctrl("inspect", 12, vec![common::formal("target", ari_codec::typesys::TypeRef::builtin(ari_codec::typesys::BuiltinType::Text))]),
            common::edd("sw-version", 7, ari_codec::typesys::TypeRef::builtin(ari_codec::typesys::BuiltinType::Text)),
            common::ctrl("noop", 13, vec![]),
        ],
    )
    .unwrap();
    catalog.load_module(m).unwrap();

    let sw_version = ObjectRef::new(
        Name::Text("ietf".into()),
        Name::Text("dtnma-agent".into()),
        None,
        ObjectType::Edd,
        Name::Text("sw-version".into()),
        vec![],
    );
    let call = ObjectRef::new(
        Name::Text("ietf".into()),
        Name::Text("dtnma-agent".into()),
        None,
        ObjectType::Ctrl,
        Name::Text("inspect".into()),
        vec![Ari::Reference(sw_version)],
    );
    // "inspect"'s formal is TEXT and "sw-version" is declared TEXT, so a
    // reference to it satisfies the formal without ever being a literal.
    catalog.resolve_ari(&Ari::Reference(call), true).unwrap();

    let noop = ObjectRef::new(
        Name::Text("ietf".into()),
        Name::Text("dtnma-agent".into()),
        None,
        ObjectType::Ctrl,
        Name::Text("noop".into()),
        vec![],
    );
    let bad_call = ObjectRef::new(
        Name::Text("ietf".into()),
        Name::Text("dtnma-agent".into()),
        None,
        ObjectType::Ctrl,
        Name::Text("inspect".into()),
        vec![Ari::Reference(noop)],
    );
    // A CTRL with no declared result has no value type to offer.
    let err = catalog.resolve_ari(&Ari::Reference(bad_call), true).unwrap_err();
    assert!(matches!(err, CodecError::TypeMismatch { .. }));
}
