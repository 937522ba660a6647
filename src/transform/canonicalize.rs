//! `canonicalize`: reorders a module's objects into a stable, diff-friendly
//! ordering — object-type groups in a fixed order, objects within a group
//! by enum ascending.

use crate::catalog::{Module, Object};
use crate::error::Result;
use crate::ident::ObjectType;

const GROUP_ORDER: [ObjectType; 9] = [
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

fn group_rank(t: ObjectType) -> usize {
    GROUP_ORDER.iter().position(|&g| g == t).expect("ObjectType is exhaustively listed in GROUP_ORDER")
}

/// Reorders `module`'s objects; idempotent since the sort key is a pure
/// function of each object's `(object_type, enum_id)`.
pub fn canonicalize(module: &Module) -> Result<Module> {
    let mut objects: Vec<Object> = module.objects().to_vec();
    objects.sort_by_key(|o| (group_rank(o.object_type), o.enum_id));

    Module::new(
        module.org.clone(),
        module.org_enum,
        module.module.clone(),
        module.module_enum,
        module.revision,
        objects,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ident::Name;
    use crate::typesys::{BuiltinType, TypeRef};
    use crate::value::{Ari, Literal, Primitive};

    fn obj(object_type: ObjectType, name: &str, enum_id: u32) -> Object {
        Object {
            name: name.into(),
            enum_id,
            object_type,
            kind: crate::catalog::ObjectKind::Const {
                ty: TypeRef::Builtin(BuiltinType::Bool),
                value: Ari::Literal(Literal::new_unchecked(TypeRef::Builtin(BuiltinType::Bool), Primitive::Bool(true))),
            },
        }
    }

    #[test]
    fn groups_by_type_then_sorts_by_enum() {
        let module = Module::new(
            Name::Text("ex".into()),
            1,
            Name::Text("m".into()),
            1,
            None,
            vec![
                obj(ObjectType::Ctrl, "z-ctrl", 0),
                obj(ObjectType::Const, "b-const", 1),
                obj(ObjectType::Const, "a-const", 0),
            ],
        )
        .unwrap();

        let out = canonicalize(&module).unwrap();
        let names: Vec<&str> = out.objects().iter().map(|o| o.name.as_str()).collect();
        assert_eq!(names, vec!["a-const", "b-const", "z-ctrl"]);
    }

    #[test]
    fn is_idempotent() {
        let module = Module::new(
            Name::Text("ex".into()),
            1,
            Name::Text("m".into()),
            1,
            None,
            vec![obj(ObjectType::Var, "v", 2), obj(ObjectType::Const, "c", 0)],
        )
        .unwrap();
        let once = canonicalize(&module).unwrap();
        let twice = canonicalize(&once).unwrap();
        let once_names: Vec<&str> = once.objects().iter().map(|o| o.name.as_str()).collect();
        let twice_names: Vec<&str> = twice.objects().iter().map(|o| o.name.as_str()).collect();
        assert_eq!(once_names, twice_names);
    }
}
