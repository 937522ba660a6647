//! `adm-add-enum`: assigns the smallest unused nonnegative integer, per
//! object-type bucket, to every object missing one.

use std::collections::BTreeSet;

use crate::catalog::{Module, Object};
use crate::error::Result;
use crate::ident::ObjectType;

/// Sentinel `enum_id` meaning "not yet assigned". `u32::MAX` is not a
/// plausible real enum (an enum is a nonnegative integer, and no ADM module
/// runs anywhere near this many objects in one type bucket), so it's reused
/// here instead of widening [`Object`] with an `Option`. Defined in
/// `catalog::object`, since `Module::new`'s uniqueness check needs it too.
pub use crate::catalog::object::UNASSIGNED_ENUM as UNASSIGNED;

const BUCKETS: [ObjectType; 9] = [
    ObjectType::Const,
    ObjectType::Ctrl,
    ObjectType::Edd,
    ObjectType::Ident,
    ObjectType::Oper,
    ObjectType::Sbr,
    ObjectType::Tbr,
    ObjectType::Typedef,
    ObjectType::Var,
];

/// Assigns every [`UNASSIGNED`]-enum object the smallest nonnegative
/// integer not already used in its `(object_type)` bucket, processing
/// objects within a bucket in sorted-name order so the assignment is
/// deterministic. Total: a module where every object already has an enum
/// is returned unchanged.
pub fn add_enum(module: &Module) -> Result<Module> {
    let mut objects: Vec<Object> = module.objects().to_vec();

    for &bucket in &BUCKETS {
        let mut used: BTreeSet<u32> = objects
            .iter()
            .filter(|o| o.object_type == bucket && o.enum_id != UNASSIGNED)
            .map(|o| o.enum_id)
            .collect();

        let mut pending: Vec<usize> = objects
            .iter()
            .enumerate()
            .filter(|(_, o)| o.object_type == bucket && o.enum_id == UNASSIGNED)
            .map(|(idx, _)| idx)
            .collect();
        pending.sort_by(|&a, &b| objects[a].name.cmp(&objects[b].name));

        for idx in pending {
            let next = smallest_unused(&used);
            used.insert(next);
            objects[idx].enum_id = next;
        }
    }

    Module::new(
        module.org.clone(),
        module.org_enum,
        module.module.clone(),
        module.module_enum,
        module.revision,
        objects,
    )
}

fn smallest_unused(used: &BTreeSet<u32>) -> u32 {
    let mut candidate = 0u32;
    for &v in used {
        if v == candidate {
            candidate += 1;
        } else if v > candidate {
            break;
        }
    }
    candidate
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ident::Name;
    use crate::typesys::{BuiltinType, TypeRef};
    use crate::value::Ari;

    fn const_obj(name: &str, enum_id: u32) -> Object {
        Object {
            name: name.into(),
            enum_id,
            object_type: ObjectType::Const,
            kind: crate::catalog::ObjectKind::Const {
                ty: TypeRef::Builtin(BuiltinType::Bool),
                value: Ari::Literal(crate::value::Literal::new_unchecked(
                    TypeRef::Builtin(BuiltinType::Bool),
                    crate::value::Primitive::Bool(true),
                )),
            },
        }
    }

    fn module_with(objects: Vec<Object>) -> Module {
        Module::new(Name::Text("ex".into()), 1, Name::Text("m".into()), 1, None, objects).unwrap()
    }

    #[test]
    fn fills_gaps_in_sorted_name_order() {
        let m = module_with(vec![
            const_obj("b", UNASSIGNED),
            const_obj("a", 0),
            const_obj("c", UNASSIGNED),
        ]);
        let out = add_enum(&m).unwrap();
        assert_eq!(out.get_by_name(ObjectType::Const, "a").unwrap().enum_id, 0);
        assert_eq!(out.get_by_name(ObjectType::Const, "b").unwrap().enum_id, 1);
        assert_eq!(out.get_by_name(ObjectType::Const, "c").unwrap().enum_id, 2);
    }

    #[test]
    fn is_identity_once_every_object_has_an_enum() {
        let m = module_with(vec![const_obj("a", 0), const_obj("b", 1)]);
        let once = add_enum(&m).unwrap();
        let twice = add_enum(&once).unwrap();
        assert_eq!(once.get_by_name(ObjectType::Const, "a").unwrap().enum_id, 0);
        assert_eq!(twice.get_by_name(ObjectType::Const, "a").unwrap().enum_id, 0);
        assert_eq!(twice.get_by_name(ObjectType::Const, "b").unwrap().enum_id, 1);
    }
}
