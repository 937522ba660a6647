//! Structural equality: `Undefined == Undefined`, numeric
//! literals compare by value within the same type family, reals compare
//! bit-exact (two NaNs are unequal), `tp`/`td` by scalar, text/bytes by
//! codepoint/octet sequence, and collections componentwise and
//! order-sensitive (`am` by insertion order).

use crate::ident::{Name, ObjectRef};
use crate::value::{Ari, Literal, Primitive};

pub fn ari_eq(a: &Ari, b: &Ari) -> bool {
    match (a, b) {
        (Ari::Undefined, Ari::Undefined) => true,
        (Ari::Null, Ari::Null) => true,
        (Ari::Literal(l), Ari::Literal(r)) => literal_eq(l, r),
        (Ari::Reference(l), Ari::Reference(r)) => reference_eq(l, r),
        _ => false,
    }
}

fn literal_eq(a: &Literal, b: &Literal) -> bool {
    primitive_eq(&a.primitive, &b.primitive)
}

fn primitive_eq(a: &Primitive, b: &Primitive) -> bool {
    match (a, b) {
        (Primitive::Bool(x), Primitive::Bool(y)) => x == y,
        (Primitive::UInt64(x), Primitive::UInt64(y)) => x == y,
        (Primitive::Int64(x), Primitive::Int64(y)) => x == y,
        (Primitive::UVast(x), Primitive::UVast(y)) => x == y,
        (Primitive::Vast(x), Primitive::Vast(y)) => x == y,
        // Integer families compare as integers across width/signedness
        // within the same family (uint/int).
        (Primitive::UInt64(x), Primitive::Int64(y)) | (Primitive::Int64(y), Primitive::UInt64(x)) => {
            i128::from(*x) == i128::from(*y)
        }
        // Reals compare bit-exact; NaN is unequal to anything, including
        // another NaN.
        (Primitive::Real32(x), Primitive::Real32(y)) => !x.is_nan() && !y.is_nan() && x == y,
        (Primitive::Real64(x), Primitive::Real64(y)) => !x.is_nan() && !y.is_nan() && x == y,
        (Primitive::Text(x), Primitive::Text(y)) => x == y,
        (Primitive::Bytes(x), Primitive::Bytes(y)) => x == y,
        (Primitive::Timepoint(x), Primitive::Timepoint(y)) => x.ticks == y.ticks,
        (Primitive::Timeperiod(x), Primitive::Timeperiod(y)) => x.ticks == y.ticks,
        (Primitive::Ac(x), Primitive::Ac(y)) => {
            x.len() == y.len() && x.iter().zip(y.iter()).all(|(a, b)| ari_eq(a, b))
        }
        (Primitive::Am(x), Primitive::Am(y)) => {
            x.len() == y.len()
                && x.iter()
                    .zip(y.iter())
                    .all(|((k1, v1), (k2, v2))| ari_eq(k1, k2) && ari_eq(v1, v2))
        }
        (Primitive::Tbl(x), Primitive::Tbl(y)) => {
            x.columns.len() == y.columns.len()
                && x.cells.len() == y.cells.len()
                && x.cells.iter().zip(y.cells.iter()).all(|(a, b)| ari_eq(a, b))
        }
        (Primitive::Tblt(x), Primitive::Tblt(y)) => {
            x.len() == y.len()
                && x.iter()
                    .zip(y.iter())
                    .all(|(a, b)| a.name == b.name && ari_eq(&a.value, &b.value))
        }
        (Primitive::ExecSet(x), Primitive::ExecSet(y)) => {
            x.nonce == y.nonce
                && x.targets.len() == y.targets.len()
                && x.targets.iter().zip(y.targets.iter()).all(|(a, b)| ari_eq(a, b))
        }
        (Primitive::RptSet(x), Primitive::RptSet(y)) => {
            x.reference_time.ticks == y.reference_time.ticks
                && x.reports.len() == y.reports.len()
                && x.reports.iter().zip(y.reports.iter()).all(report_eq)
        }
        (Primitive::Rpt(x), Primitive::Rpt(y)) => report_eq((x, y)),
        _ => false,
    }
}

fn report_eq((a, b): (&crate::value::Report, &crate::value::Report)) -> bool {
    ari_eq(&a.source, &b.source)
        && a.time.ticks == b.time.ticks
        && a.items.len() == b.items.len()
        && a.items.iter().zip(b.items.iter()).all(|(x, y)| ari_eq(x, y))
}

fn name_eq(a: &Name, b: &Name) -> bool {
    match (a, b) {
        (Name::Text(x), Name::Text(y)) => x == y,
        (Name::Num(x), Name::Num(y)) => x == y,
        // Unresolved cross-form names (text vs numeric) are not
        // structurally equal; resolving against the catalog first is
        // required to compare them.
        _ => false,
    }
}

fn reference_eq(a: &ObjectRef, b: &ObjectRef) -> bool {
    name_eq(&a.org, &b.org)
        && name_eq(&a.model, &b.model)
        && a.revision == b.revision
        && a.object_type == b.object_type
        && name_eq(&a.object, &b.object)
        && a.params.len() == b.params.len()
        && a.params.iter().zip(b.params.iter()).all(|(x, y)| ari_eq(x, y))
}

/// Wraps an [`Ari`] so it can be used as a `HashMap`/`IndexMap` key under
/// structural equality. NaN-bearing reals are therefore never equal to
/// themselves as a key, matching the bit-exact NaN rule; such a key can be
/// inserted but can never be looked back up, which is the documented edge
/// case rather than a bug.
#[derive(Debug, Clone)]
pub struct AriKey(pub Ari);

impl PartialEq for AriKey {
    fn eq(&self, other: &Self) -> bool {
        ari_eq(&self.0, &other.0)
    }
}

impl Eq for AriKey {}

impl std::hash::Hash for AriKey {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        hash_ari(&self.0, state);
    }
}

fn hash_ari<H: std::hash::Hasher>(a: &Ari, state: &mut H) {
    use std::hash::Hash;
    match a {
        Ari::Undefined => 0u8.hash(state),
        Ari::Null => 1u8.hash(state),
        Ari::Literal(l) => {
            2u8.hash(state);
            hash_primitive(&l.primitive, state);
        }
        Ari::Reference(r) => {
            3u8.hash(state);
            hash_name(&r.org, state);
            hash_name(&r.model, state);
            hash_name(&r.object, state);
        }
    }
}

fn hash_name<H: std::hash::Hasher>(n: &Name, state: &mut H) {
    use std::hash::Hash;
    match n {
        Name::Text(s) => s.hash(state),
        Name::Num(n) => n.hash(state),
    }
}

fn hash_primitive<H: std::hash::Hasher>(p: &Primitive, state: &mut H) {
    use std::hash::Hash;
    match p {
        Primitive::Bool(b) => b.hash(state),
        Primitive::UInt64(n) => n.hash(state),
        Primitive::Int64(n) => n.hash(state),
        Primitive::UVast(n) => n.hash(state),
        Primitive::Vast(n) => n.hash(state),
        // NaN hashes to a fixed sentinel so it lands in a bucket at all;
        // equality still rejects the lookup.
        Primitive::Real32(f) => {
            if f.is_nan() {
                u32::MAX.hash(state)
            } else {
                f.to_bits().hash(state)
            }
        }
        Primitive::Real64(f) => {
            if f.is_nan() {
                u64::MAX.hash(state)
            } else {
                f.to_bits().hash(state)
            }
        }
        Primitive::Text(s) => s.hash(state),
        Primitive::Bytes(b) => b.hash(state),
        Primitive::Timepoint(t) => t.ticks.hash(state),
        Primitive::Timeperiod(t) => t.ticks.hash(state),
        // Structured literals are rarely used as map keys; fall back to a
        // length-based hash, relying on `eq` for correctness.
        Primitive::Ac(v) => v.len().hash(state),
        Primitive::Am(m) => m.len().hash(state),
        Primitive::Tbl(t) => t.cells.len().hash(state),
        Primitive::Tblt(v) => v.len().hash(state),
        Primitive::ExecSet(e) => e.nonce.hash(state),
        Primitive::RptSet(r) => r.reports.len().hash(state),
        Primitive::Rpt(_) => 0u8.hash(state),
    }
}
