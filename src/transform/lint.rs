//! Lint checks: report findings as a collection rather than aborting on
//! the first one.

use crate::catalog::Module;
use crate::ident::ObjectType;

/// One lint complaint about a single object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LintFinding {
    pub object_type: ObjectType,
    pub name: String,
    pub message: String,
}

/// `--lint-ensure-hyphenated-names`: flags object names that use
/// underscores where the ADM naming convention calls for hyphens.
pub fn lint_ensure_hyphenated_names(module: &Module) -> Vec<LintFinding> {
    module
        .objects()
        .iter()
        .filter(|o| o.name.contains('_'))
        .map(|o| LintFinding {
            object_type: o.object_type,
            name: o.name.clone(),
            message: format!("object name {:?} uses '_'; expected hyphenated form", o.name),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ident::Name;
    use crate::typesys::{BuiltinType, TypeRef};
    use crate::value::{Ari, Literal, Primitive};

    fn const_obj(name: &str, enum_id: u32) -> crate::catalog::Object {
        crate::catalog::Object {
            name: name.into(),
            enum_id,
            object_type: ObjectType::Const,
            kind: crate::catalog::ObjectKind::Const {
                ty: TypeRef::Builtin(BuiltinType::Bool),
                value: Ari::Literal(Literal::new_unchecked(TypeRef::Builtin(BuiltinType::Bool), Primitive::Bool(true))),
            },
        }
    }

    #[test]
    fn flags_underscored_names_only() {
        let module = Module::new(
            Name::Text("ex".into()),
            1,
            Name::Text("m".into()),
            1,
            None,
            vec![const_obj("good-name", 0), const_obj("bad_name", 1)],
        )
        .unwrap();
        let findings = lint_ensure_hyphenated_names(&module);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].name, "bad_name");
    }
}
