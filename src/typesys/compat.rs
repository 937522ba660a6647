//! Value/type compatibility: recursive matching with numeric
//! widening, text/bytes distinction, structural componentwise matching,
//! and transparent typedef expansion.

use crate::catalog::{Catalog, ObjectKind};
use crate::error::{CodecError, Result};
use crate::ident::ObjectRef;
use crate::value::{Ari, Primitive};

use super::typedef::TypeExpr;
use super::{BuiltinType, TypeRef};

/// Checks that `primitive` satisfies `ty`, expanding ADM typedefs against
/// `catalog` as needed.
pub fn check_compatible(catalog: &Catalog, ty: &TypeRef, primitive: &Primitive) -> Result<()> {
    match ty {
        TypeRef::Builtin(BuiltinType::Tbl) => check_tbl(catalog, primitive),
        TypeRef::Builtin(b) => check_builtin(*b, primitive),
        TypeRef::Adm { org, module, name } => {
            let expr = catalog.typedef(org, module, name)?;
            check_expr(catalog, &expr, primitive)
        }
    }
}

/// Checks an [`Ari`] value against a declared [`TypeRef`] slot (a `tblt`
/// field, a CTRL/OPER formal parameter, a `tbl` column): `Undefined` is
/// never valid here (invariant 6), `Null` passes through unchecked, a
/// `Literal` is checked structurally, and a `Reference` is resolved to the
/// value/result type its target declares and checked for type-level
/// compatibility with `ty` (invariant 5) since there is no primitive to
/// inspect directly.
pub fn check_ari_against_ref(catalog: &Catalog, ty: &TypeRef, ari: &Ari) -> Result<()> {
    // ARITYPE has no literal form of its own (see `text::parser`); it is
    // reused as the wildcard column type `Table::infer_columns` falls back
    // to when a `tbl` column's first-row cell carries no declared type to
    // recover, so it accepts anything but Undefined here.
    if matches!(ty, TypeRef::Builtin(BuiltinType::TypeRefType)) {
        return match ari {
            Ari::Undefined => Err(CodecError::InvariantViolation(
                "Undefined is not valid in a typed slot".into(),
            )),
            _ => Ok(()),
        };
    }
    match ari {
        Ari::Undefined => Err(CodecError::InvariantViolation(
            "Undefined is not valid in a typed slot".into(),
        )),
        Ari::Null => Ok(()),
        Ari::Literal(lit) => check_compatible(catalog, ty, &lit.primitive),
        Ari::Reference(r) => {
            let declared = reference_value_type(catalog, r)?;
            if type_refs_compatible(ty, &declared) {
                Ok(())
            } else {
                Err(CodecError::TypeMismatch {
                    expected: ty.to_string(),
                    found: declared.to_string(),
                })
            }
        }
    }
}

/// As [`check_ari_against_ref`], but against a `TypeExpr` slot (a `ulist`
/// element, a `dlist` position, an `umap` key/value type).
fn check_ari_against_expr(catalog: &Catalog, expr: &TypeExpr, ari: &Ari) -> Result<()> {
    match ari {
        Ari::Undefined => Err(CodecError::InvariantViolation(
            "Undefined is not valid in a typed slot".into(),
        )),
        Ari::Null => Ok(()),
        Ari::Literal(lit) => check_expr(catalog, expr, &lit.primitive),
        Ari::Reference(r) => {
            let declared = reference_value_type(catalog, r)?;
            if type_ref_satisfies_expr(expr, &declared) {
                Ok(())
            } else {
                Err(CodecError::TypeMismatch {
                    expected: format!("{expr:?}"),
                    found: declared.to_string(),
                })
            }
        }
    }
}

/// The declared value/result type of the object an [`ObjectRef`] names,
/// used by [`check_ari_against_ref`]/[`check_ari_against_expr`] to check a
/// reference against a typed slot without a primitive in hand. Kinds with
/// no value of their own (`IDENT`, `SBR`, `TBR`, `TYPEDEF`, a `CTRL` with no
/// declared result) have nothing to check against and are rejected.
fn reference_value_type(catalog: &Catalog, r: &ObjectRef) -> Result<TypeRef> {
    let obj = catalog.resolve_by_name(&r.org, &r.model, r.revision, r.object_type, &r.object)?;
    match &obj.kind {
        ObjectKind::Const { ty, .. } | ObjectKind::Edd { ty, .. } | ObjectKind::Var { ty, .. } => Ok(ty.clone()),
        ObjectKind::Oper { result, .. } => Ok(result.clone()),
        ObjectKind::Ctrl { result: Some(ty), .. } => Ok(ty.clone()),
        other => Err(CodecError::TypeMismatch {
            expected: "a value-producing object (CONST/EDD/VAR/OPER/CTRL with a result)".into(),
            found: format!("{other:?}"),
        }),
    }
}

/// Type-level (not value-level) compatibility: does a reference declared as
/// `candidate` satisfy a slot declared as `expected`, using the same
/// numeric-widening rules [`check_builtin`] applies to values.
fn type_refs_compatible(expected: &TypeRef, candidate: &TypeRef) -> bool {
    if expected == candidate {
        return true;
    }
    matches!(
        (expected, candidate),
        (TypeRef::Builtin(BuiltinType::Int64), TypeRef::Builtin(BuiltinType::UInt64))
            | (TypeRef::Builtin(BuiltinType::Vast), TypeRef::Builtin(BuiltinType::Int64))
            | (TypeRef::Builtin(BuiltinType::Vast), TypeRef::Builtin(BuiltinType::UVast))
            | (TypeRef::Builtin(BuiltinType::UVast), TypeRef::Builtin(BuiltinType::UInt64))
            | (TypeRef::Builtin(BuiltinType::Real64), TypeRef::Builtin(BuiltinType::Real32))
    )
}

fn type_ref_satisfies_expr(expr: &TypeExpr, candidate: &TypeRef) -> bool {
    match expr {
        TypeExpr::Alias(r) | TypeExpr::Use(r, _) => type_refs_compatible(r, candidate),
        TypeExpr::Union(alts) => alts.iter().any(|a| type_ref_satisfies_expr(a, candidate)),
        TypeExpr::Ulist(_) | TypeExpr::Dlist(_) | TypeExpr::Umap(_, _) | TypeExpr::Tblt(_) => false,
    }
}

/// Validates a `tbl` literal's invariant 3: every cell conforms to its
/// column's declared type (row-length-is-a-multiple-of-column-count is
/// already enforced by `Table::new`).
fn check_tbl(catalog: &Catalog, primitive: &Primitive) -> Result<()> {
    let Primitive::Tbl(tbl) = primitive else {
        return Err(mismatch("tbl", primitive));
    };
    for row in tbl.rows() {
        for (cell, col_ty) in row.iter().zip(tbl.columns.iter()) {
            check_ari_against_ref(catalog, col_ty, cell)?;
        }
    }
    Ok(())
}

fn check_expr(catalog: &Catalog, expr: &TypeExpr, primitive: &Primitive) -> Result<()> {
    match expr {
        TypeExpr::Alias(r) => check_compatible(catalog, r, primitive),
        TypeExpr::Use(r, constraints) => {
            check_compatible(catalog, r, primitive)?;
            check_constraints(constraints, primitive)
        }
        // First-accepting wins on decode.
        TypeExpr::Union(alts) => {
            for alt in alts {
                if check_expr(catalog, alt, primitive).is_ok() {
                    return Ok(());
                }
            }
            Err(CodecError::TypeMismatch {
                expected: "union".into(),
                found: primitive.shape_name().into(),
            })
        }
        TypeExpr::Ulist(elem) => match primitive {
            Primitive::Ac(items) => {
                for item in items {
                    check_ari_against_expr(catalog, elem, item)?;
                }
                Ok(())
            }
            other => Err(mismatch("ulist", other)),
        },
        TypeExpr::Dlist(elems) => match primitive {
            Primitive::Ac(items) => {
                if items.len() != elems.len() {
                    return Err(CodecError::TypeMismatch {
                        expected: format!("dlist of {} elements", elems.len()),
                        found: format!("{} elements", items.len()),
                    });
                }
                for (item, elem_ty) in items.iter().zip(elems.iter()) {
                    check_ari_against_expr(catalog, elem_ty, item)?;
                }
                Ok(())
            }
            other => Err(mismatch("dlist", other)),
        },
        TypeExpr::Umap(key_ty, val_ty) => match primitive {
            Primitive::Am(map) => {
                for (k, v) in map.iter() {
                    check_ari_against_expr(catalog, key_ty, k)?;
                    check_ari_against_expr(catalog, val_ty, v)?;
                }
                Ok(())
            }
            other => Err(mismatch("umap", other)),
        },
        TypeExpr::Tblt(fields) => match primitive {
            Primitive::Tblt(actual) => {
                if actual.len() != fields.len() {
                    return Err(CodecError::TypeMismatch {
                        expected: format!("tblt with {} fields", fields.len()),
                        found: format!("{} fields", actual.len()),
                    });
                }
                for (field, decl) in actual.iter().zip(fields.iter()) {
                    check_ari_against_ref(catalog, &decl.ty, &field.value)?;
                }
                Ok(())
            }
            other => Err(mismatch("tblt", other)),
        },
    }
}

fn mismatch(expected: &str, found: &Primitive) -> CodecError {
    CodecError::TypeMismatch {
        expected: expected.into(),
        found: found.shape_name().into(),
    }
}

fn check_constraints(c: &super::typedef::Constraints, primitive: &Primitive) -> Result<()> {
    if let Some((lo, hi)) = c.range {
        let v = match primitive {
            Primitive::Int64(n) => i128::from(*n),
            Primitive::UInt64(n) => i128::from(*n),
            Primitive::Vast(n) => i128::from(*n),
            Primitive::UVast(n) => i128::from(*n),
            _ => return Ok(()),
        };
        if v < lo || v > hi {
            return Err(CodecError::TypeMismatch {
                expected: format!("range [{lo}, {hi}]"),
                found: format!("{v}"),
            });
        }
    }
    if let Some((min, max)) = c.length {
        let len = match primitive {
            Primitive::Text(s) => Some(s.chars().count()),
            Primitive::Bytes(b) => Some(b.len()),
            Primitive::Ac(v) => Some(v.len()),
            _ => None,
        };
        if let Some(len) = len {
            if len < min || max.is_some_and(|max| len > max) {
                return Err(CodecError::TypeMismatch {
                    expected: format!("length in [{min}, {max:?}]"),
                    found: format!("{len}"),
                });
            }
        }
    }
    if let Some(allowed) = &c.enumeration {
        if let Primitive::Text(s) = primitive {
            if !allowed.iter().any(|a| a == s) {
                return Err(CodecError::TypeMismatch {
                    expected: format!("one of {allowed:?}"),
                    found: s.clone(),
                });
            }
        }
    }
    if let Some(pattern) = &c.pattern {
        if let Primitive::Text(s) = primitive {
            if !glob_match(pattern, s) {
                return Err(CodecError::TypeMismatch {
                    expected: format!("text matching pattern {pattern:?}"),
                    found: s.clone(),
                });
            }
        }
    }
    Ok(())
}

/// A `*`/`?` glob matcher, not a full regex engine: ADM patterns in
/// practice are simple prefix/suffix/wildcard restrictions, and this
/// crate has no regex dependency to bring in for the rare exotic case.
fn glob_match(pattern: &str, text: &str) -> bool {
    fn rec(p: &[char], t: &[char]) -> bool {
        match p.first() {
            None => t.is_empty(),
            Some('*') => rec(&p[1..], t) || (!t.is_empty() && rec(p, &t[1..])),
            Some('?') => !t.is_empty() && rec(&p[1..], &t[1..]),
            Some(c) => t.first() == Some(c) && rec(&p[1..], &t[1..]),
        }
    }
    let p: Vec<char> = pattern.chars().collect();
    let t: Vec<char> = text.chars().collect();
    rec(&p, &t)
}

fn check_builtin(b: BuiltinType, primitive: &Primitive) -> Result<()> {
    let ok = match (b, primitive) {
        (BuiltinType::Bool, Primitive::Bool(_)) => true,
        (BuiltinType::Byte, Primitive::UInt64(n)) => *n <= u8::MAX as u64,
        (BuiltinType::UInt64, Primitive::UInt64(_)) => true,
        (BuiltinType::UVast, Primitive::UVast(_)) => true,
        (BuiltinType::UVast, Primitive::UInt64(_)) => true,
        // An unsigned integer within range satisfies a signed request.
        (BuiltinType::Int64, Primitive::Int64(_)) => true,
        (BuiltinType::Int64, Primitive::UInt64(n)) => *n <= i64::MAX as u64,
        (BuiltinType::Vast, Primitive::Vast(_)) => true,
        (BuiltinType::Vast, Primitive::Int64(_)) => true,
        (BuiltinType::Vast, Primitive::UVast(n)) => *n <= i64::MAX as u64,
        // A real number never silently satisfies an integer request.
        (BuiltinType::Real32, Primitive::Real32(_)) => true,
        (BuiltinType::Real64, Primitive::Real64(_)) => true,
        (BuiltinType::Real64, Primitive::Real32(_)) => true,
        (BuiltinType::Text, Primitive::Text(_)) => true,
        (BuiltinType::Bytes, Primitive::Bytes(_)) => true,
        (BuiltinType::Timepoint, Primitive::Timepoint(_)) => true,
        (BuiltinType::Timeperiod, Primitive::Timeperiod(_)) => true,
        (BuiltinType::Ac, Primitive::Ac(_)) => true,
        (BuiltinType::Am, Primitive::Am(_)) => true,
        // Tbl is intercepted by `check_tbl` in `check_compatible` before
        // it ever reaches here, since per-column checking needs `catalog`.
        (BuiltinType::Tblt, Primitive::Tblt(_)) => true,
        (BuiltinType::ExecSet, Primitive::ExecSet(_)) => true,
        (BuiltinType::RptSet, Primitive::RptSet(_)) => true,
        (BuiltinType::Rpt, Primitive::Rpt(_)) => true,
        _ => false,
    };
    if ok {
        Ok(())
    } else {
        Err(CodecError::TypeMismatch {
            expected: b.token().into(),
            found: primitive.shape_name().into(),
        })
    }
}

/// Widens a decoded wire primitive to match a more specific declared
/// type, never truncating. Returns
/// `TypeMismatch` if no widening rule applies.
pub fn coerce(catalog: &Catalog, ty: &TypeRef, primitive: Primitive) -> Result<Primitive> {
    if check_compatible(catalog, ty, &primitive).is_ok() {
        return Ok(primitive);
    }
    let TypeRef::Builtin(b) = ty else {
        return Err(CodecError::TypeMismatch {
            expected: ty.to_string(),
            found: primitive.shape_name().into(),
        });
    };
    let widened = match (b, &primitive) {
        (BuiltinType::Int64, Primitive::UInt64(n)) if *n <= i64::MAX as u64 => {
            Some(Primitive::Int64(*n as i64))
        }
        (BuiltinType::Vast, Primitive::UInt64(n)) if *n <= i64::MAX as u64 => {
            Some(Primitive::Vast(*n as i64))
        }
        (BuiltinType::Vast, Primitive::Int64(n)) => Some(Primitive::Vast(*n)),
        (BuiltinType::UVast, Primitive::UInt64(n)) => Some(Primitive::UVast(*n)),
        (BuiltinType::Real64, Primitive::Real32(f)) => Some(Primitive::Real64(*f as f64)),
        _ => None,
    };
    widened.ok_or_else(|| CodecError::TypeMismatch {
        expected: b.token().into(),
        found: primitive.shape_name().into(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::typesys::typedef::{Constraints, FieldDef};
    use crate::value::Primitive;

    #[test]
    fn real_never_satisfies_integer_request() {
        let catalog = Catalog::new();
        let err = check_compatible(&catalog, &TypeRef::builtin(BuiltinType::Int64), &Primitive::Real64(3.0))
            .unwrap_err();
        assert!(matches!(err, CodecError::TypeMismatch { .. }));
    }

    #[test]
    fn unsigned_within_range_satisfies_signed_request() {
        let catalog = Catalog::new();
        check_compatible(&catalog, &TypeRef::builtin(BuiltinType::Int64), &Primitive::UInt64(5)).unwrap();
    }

    #[test]
    fn coerce_widens_uint_to_int_without_truncating() {
        let catalog = Catalog::new();
        let widened = coerce(&catalog, &TypeRef::builtin(BuiltinType::Int64), Primitive::UInt64(5)).unwrap();
        assert!(matches!(widened, Primitive::Int64(5)));
    }

    #[test]
    fn union_first_accepting_alternative_wins() {
        let catalog = Catalog::new();
        let union = TypeExpr::Union(vec![
            TypeExpr::Alias(TypeRef::builtin(BuiltinType::Bool)),
            TypeExpr::Alias(TypeRef::builtin(BuiltinType::UInt64)),
        ]);
        check_expr(&catalog, &union, &Primitive::UInt64(5)).unwrap();
        check_expr(&catalog, &union, &Primitive::Text("nope".into())).unwrap_err();
    }

    /// A small unsigned value satisfies both alternatives of
    /// `union(uint64, int64)`; the earlier alternative in declaration order
    /// wins rather than erroring on the ambiguity.
    #[test]
    fn overlapping_union_alternatives_pick_the_first_declared() {
        let catalog = Catalog::new();
        let uint_first = TypeExpr::Union(vec![
            TypeExpr::Alias(TypeRef::builtin(BuiltinType::UInt64)),
            TypeExpr::Alias(TypeRef::builtin(BuiltinType::Int64)),
        ]);
        check_expr(&catalog, &uint_first, &Primitive::UInt64(5)).unwrap();

        // A bare Int64(5) only satisfies the second alternative, still
        // accepted since "first-accepting wins", not "first-declared only".
        check_expr(&catalog, &uint_first, &Primitive::Int64(5)).unwrap();
    }

    #[test]
    fn use_constraint_rejects_out_of_range_value() {
        let catalog = Catalog::new();
        let constrained = TypeExpr::Use(
            TypeRef::builtin(BuiltinType::Int64),
            Constraints {
                range: Some((0, 10)),
                ..Default::default()
            },
        );
        check_expr(&catalog, &constrained, &Primitive::Int64(5)).unwrap();
        check_expr(&catalog, &constrained, &Primitive::Int64(20)).unwrap_err();
    }

    #[test]
    fn glob_pattern_constraint_matches_wildcard() {
        let catalog = Catalog::new();
        let constrained = TypeExpr::Use(
            TypeRef::builtin(BuiltinType::Text),
            Constraints {
                pattern: Some("sensor-*".into()),
                ..Default::default()
            },
        );
        check_expr(&catalog, &constrained, &Primitive::Text("sensor-42".into())).unwrap();
        check_expr(&catalog, &constrained, &Primitive::Text("actuator-1".into())).unwrap_err();
    }

    #[test]
    fn tblt_field_count_mismatch_is_rejected() {
        let catalog = Catalog::new();
        let tblt = TypeExpr::Tblt(vec![FieldDef {
            name: "x".into(),
            ty: TypeRef::builtin(BuiltinType::Int64),
        }]);
        let actual = Primitive::Tblt(vec![]);
        check_expr(&catalog, &tblt, &actual).unwrap_err();
    }

    #[test]
    fn undefined_is_never_a_valid_ulist_element() {
        let catalog = Catalog::new();
        let ulist = TypeExpr::Ulist(Box::new(TypeExpr::Alias(TypeRef::builtin(BuiltinType::Int64))));
        let err = check_expr(&catalog, &ulist, &Primitive::Ac(vec![crate::value::Ari::Undefined])).unwrap_err();
        assert!(matches!(err, CodecError::InvariantViolation(_)));
    }

    #[test]
    fn undefined_is_never_a_valid_tbl_cell() {
        let catalog = Catalog::new();
        let table = crate::value::Table::new(
            vec![TypeRef::builtin(BuiltinType::Int64)],
            vec![crate::value::Ari::Undefined],
        )
        .unwrap();
        let err = check_compatible(&catalog, &TypeRef::builtin(BuiltinType::Tbl), &Primitive::Tbl(table)).unwrap_err();
        assert!(matches!(err, CodecError::InvariantViolation(_)));
    }

    #[test]
    fn tbl_cell_must_conform_to_its_column_type() {
        let catalog = Catalog::new();
        let table = crate::value::Table::new(
            vec![TypeRef::builtin(BuiltinType::Int64)],
            vec![crate::value::Ari::Literal(crate::value::Literal::new_unchecked(
                TypeRef::builtin(BuiltinType::Text),
                Primitive::Text("not an int".into()),
            ))],
        )
        .unwrap();
        check_compatible(&catalog, &TypeRef::builtin(BuiltinType::Tbl), &Primitive::Tbl(table)).unwrap_err();
    }

    #[test]
    fn tbl_column_type_conforms_to_well_typed_cells() {
        let catalog = Catalog::new();
        let table = crate::value::Table::new(
            vec![TypeRef::builtin(BuiltinType::Int64)],
            vec![
                crate::value::Ari::Literal(crate::value::Literal::new_unchecked(
                    TypeRef::builtin(BuiltinType::Int64),
                    Primitive::Int64(1),
                )),
                crate::value::Ari::Literal(crate::value::Literal::new_unchecked(
                    TypeRef::builtin(BuiltinType::Int64),
                    Primitive::Int64(2),
                )),
            ],
        )
        .unwrap();
        check_compatible(&catalog, &TypeRef::builtin(BuiltinType::Tbl), &Primitive::Tbl(table)).unwrap();
    }
}
