//! The CBOR decoder: the mirror image of [`super::encode`], dispatching on
//! CBOR major type and tag rather than on a declared ARI type, since the
//! wire is all the decoder has to start from.

use crate::catalog::Catalog;
use crate::error::Result;
use crate::ident::{Name, ObjectRef, ObjectType, Revision};
use crate::time::{Timeperiod, Timepoint};
use crate::typesys::{BuiltinType, TypeRef};
use crate::value::{Ari, ExecSet, Literal, Primitive, Report, ReportSet, Table, TbltField};

use super::options::CborCodecOptions;
use super::raw::{self, Head, Reader, MAJOR_ARRAY, MAJOR_BYTES, MAJOR_MAP, MAJOR_SIMPLE, MAJOR_TEXT, MAJOR_UINT};
use super::tags::{TagKind, TagTable};

pub fn decode_cbor(data: &[u8], catalog: &Catalog, options: &CborCodecOptions, tags: &TagTable) -> Result<Ari> {
    let mut reader = Reader::new(data);
    let ctx = Ctx { catalog, options, tags };
    let ari = ctx.decode_ari(&mut reader)?;
    if !reader.is_eof() {
        return Err(reader.error("trailing bytes after CBOR item"));
    }
    Ok(ari)
}

struct Ctx<'a> {
    catalog: &'a Catalog,
    options: &'a CborCodecOptions,
    tags: &'a TagTable,
}

impl Ctx<'_> {
    fn decode_ari(&self, r: &mut Reader) -> Result<Ari> {
        let head = r.read_head()?;
        match head.major {
            MAJOR_SIMPLE => self.decode_simple(r, head),
            MAJOR_TEXT => {
                let s = read_text_body(r, head)?;
                Ok(Ari::Literal(Literal::new_unchecked(
                    TypeRef::Builtin(BuiltinType::Text),
                    Primitive::Text(s),
                )))
            }
            MAJOR_BYTES => {
                let b = read_bytes_body(r, head)?;
                Ok(Ari::Literal(Literal::new_unchecked(
                    TypeRef::Builtin(BuiltinType::Bytes),
                    Primitive::Bytes(b),
                )))
            }
            MAJOR_ARRAY => self.decode_wrapped(r, head),
            raw::MAJOR_TAG => self.decode_tagged(r, head),
            other => Err(r.error(format!("unexpected top-level CBOR major type {other}"))),
        }
    }

    fn decode_simple(&self, r: &mut Reader, head: Head) -> Result<Ari> {
        Ok(match head.value {
            raw::SIMPLE_FALSE => literal_bool(false),
            raw::SIMPLE_TRUE => literal_bool(true),
            raw::SIMPLE_NULL => Ari::Null,
            raw::SIMPLE_UNDEFINED => Ari::Undefined,
            raw::SIMPLE_F32 => {
                let v = r.read_f32()?;
                Ari::Literal(Literal::new_unchecked(TypeRef::Builtin(BuiltinType::Real32), Primitive::Real32(v)))
            }
            raw::SIMPLE_F64 => {
                let v = r.read_f64()?;
                Ari::Literal(Literal::new_unchecked(TypeRef::Builtin(BuiltinType::Real64), Primitive::Real64(v)))
            }
            other => return Err(r.error(format!("unsupported CBOR simple value {other}"))),
        })
    }

    /// The `[type_code, value]` wrapper used for the CBOR-ambiguous integer
    /// families and for `tblt` (neither gets a dedicated tag).
    fn decode_wrapped(&self, r: &mut Reader, head: Head) -> Result<Ari> {
        if head.value != 2 {
            return Err(r.error(format!(
                "expected a 2-element [type_code, value] array, found length {}",
                head.value
            )));
        }
        let code = r.expect_major(MAJOR_UINT)?;
        let builtin = BuiltinType::try_from(code as u8).map_err(|_| r.error(format!("unknown ARI type code {code}")))?;
        let primitive = match builtin {
            BuiltinType::Byte | BuiltinType::UInt64 => Primitive::UInt64(read_uint_value(r)?),
            BuiltinType::UVast => Primitive::UVast(read_uint_value(r)?),
            BuiltinType::Int64 => Primitive::Int64(r.read_signed()?),
            BuiltinType::Vast => Primitive::Vast(r.read_signed()?),
            BuiltinType::Tblt => Primitive::Tblt(self.decode_tblt_fields(r)?),
            other => return Err(r.error(format!("type code {other:?} does not use the [type_code, value] wrapper"))),
        };
        Ok(Ari::Literal(Literal::new_unchecked(TypeRef::Builtin(builtin), primitive)))
    }

    fn decode_tblt_fields(&self, r: &mut Reader) -> Result<Vec<TbltField>> {
        let n = r.expect_major(MAJOR_ARRAY)? as usize;
        let mut fields = Vec::with_capacity(n);
        for _ in 0..n {
            let pair_len = r.expect_major(MAJOR_ARRAY)?;
            if pair_len != 2 {
                return Err(r.error("tblt field must be a 2-element [name, value] array"));
            }
            let name = read_text(r)?;
            let value = self.decode_ari(r)?;
            fields.push(TbltField {
                name,
                ty: TypeRef::Builtin(BuiltinType::TypeRefType),
                value,
            });
        }
        Ok(fields)
    }

    fn decode_tagged(&self, r: &mut Reader, head: Head) -> Result<Ari> {
        let kind = match self.tags.kind_of(head.value) {
            Some(k) => k,
            None if self.options.allow_unknown_tags => return self.decode_ari(r),
            None => return Err(r.error(format!("unknown CBOR tag {}", head.value))),
        };
        match kind {
            TagKind::Tp => {
                let ticks = r.read_signed()?;
                Ok(Ari::Literal(Literal::new_unchecked(
                    TypeRef::Builtin(BuiltinType::Timepoint),
                    Primitive::Timepoint(Timepoint { ticks }),
                )))
            }
            TagKind::Td => {
                let ticks = r.read_signed()?;
                Ok(Ari::Literal(Literal::new_unchecked(
                    TypeRef::Builtin(BuiltinType::Timeperiod),
                    Primitive::Timeperiod(Timeperiod { ticks }),
                )))
            }
            TagKind::Ac => {
                let n = r.expect_major(MAJOR_ARRAY)? as usize;
                let mut items = Vec::with_capacity(n);
                for _ in 0..n {
                    items.push(self.decode_ari(r)?);
                }
                Ok(Ari::Literal(Literal::new_unchecked(TypeRef::Builtin(BuiltinType::Ac), Primitive::Ac(items))))
            }
            TagKind::Am => {
                let n = r.expect_major(MAJOR_MAP)? as usize;
                let mut map = crate::value::AriMap::new();
                for _ in 0..n {
                    let k = self.decode_ari(r)?;
                    let v = self.decode_ari(r)?;
                    map.try_insert(k, v)?;
                }
                Ok(Ari::Literal(Literal::new_unchecked(TypeRef::Builtin(BuiltinType::Am), Primitive::Am(map))))
            }
            TagKind::Tbl => {
                let n = r.expect_major(MAJOR_ARRAY)? as usize;
                if n == 0 {
                    return Err(r.error("tbl array must carry at least a column count"));
                }
                let ncols = r.expect_major(MAJOR_UINT)? as usize;
                let mut cells = Vec::with_capacity(n - 1);
                for _ in 0..n - 1 {
                    cells.push(self.decode_ari(r)?);
                }
                let columns = Table::infer_columns(ncols, &cells);
                let table = Table::new(columns, cells)?;
                Ok(Ari::Literal(Literal::new_unchecked(TypeRef::Builtin(BuiltinType::Tbl), Primitive::Tbl(table))))
            }
            TagKind::ExecSet => {
                let (nonce, targets) = self.decode_execset_body(r)?;
                Ok(Ari::Literal(Literal::new_unchecked(
                    TypeRef::Builtin(BuiltinType::ExecSet),
                    Primitive::ExecSet(ExecSet { nonce, targets }),
                )))
            }
            TagKind::RptSet => {
                let len = r.expect_major(MAJOR_ARRAY)?;
                if len != 2 {
                    return Err(r.error("rptset must be a 2-element [reference_time, reports] array"));
                }
                let reference_time = Timepoint { ticks: r.read_signed()? };
                let n = r.expect_major(MAJOR_ARRAY)? as usize;
                let mut reports = Vec::with_capacity(n);
                for _ in 0..n {
                    reports.push(self.decode_rpt_body(r)?);
                }
                Ok(Ari::Literal(Literal::new_unchecked(
                    TypeRef::Builtin(BuiltinType::RptSet),
                    Primitive::RptSet(ReportSet { reference_time, reports }),
                )))
            }
            TagKind::Rpt => {
                let rpt = self.decode_rpt_body(r)?;
                Ok(Ari::Literal(Literal::new_unchecked(TypeRef::Builtin(BuiltinType::Rpt), Primitive::Rpt(rpt))))
            }
            TagKind::ObjectRef => self.decode_object_ref(r),
        }
    }

    fn decode_execset_body(&self, r: &mut Reader) -> Result<(u64, Vec<Ari>)> {
        let len = r.expect_major(MAJOR_ARRAY)?;
        if len != 2 {
            return Err(r.error("execset must be a 2-element [nonce, targets] array"));
        }
        let nonce = read_uint_value(r)?;
        let n = r.expect_major(MAJOR_ARRAY)? as usize;
        let mut targets = Vec::with_capacity(n);
        for _ in 0..n {
            targets.push(self.decode_ari(r)?);
        }
        Ok((nonce, targets))
    }

    fn decode_rpt_body(&self, r: &mut Reader) -> Result<Report> {
        let len = r.expect_major(MAJOR_ARRAY)?;
        if len != 3 {
            return Err(r.error("rpt must be a 3-element [source, time, items] array"));
        }
        let source = Box::new(self.decode_ari(r)?);
        let time = Timepoint { ticks: r.read_signed()? };
        let n = r.expect_major(MAJOR_ARRAY)? as usize;
        let mut items = Vec::with_capacity(n);
        for _ in 0..n {
            items.push(self.decode_ari(r)?);
        }
        Ok(Report { source, time, items })
    }

    fn decode_object_ref(&self, r: &mut Reader) -> Result<Ari> {
        let len = r.expect_major(MAJOR_ARRAY)?;
        if len != 5 && len != 6 {
            return Err(r.error(format!("object reference array must have 5 or 6 elements, found {len}")));
        }
        let org = read_name(r)?;
        let model = read_name(r)?;
        let revision = read_revision(r)?;
        let type_code = r.expect_major(MAJOR_UINT)?;
        let object_type =
            ObjectType::try_from(type_code as u8).map_err(|_| r.error(format!("unknown object type code {type_code}")))?;
        let object = read_name(r)?;
        let params = if len == 6 {
            let n = r.expect_major(MAJOR_ARRAY)? as usize;
            let mut v = Vec::with_capacity(n);
            for _ in 0..n {
                v.push(self.decode_ari(r)?);
            }
            v
        } else {
            Vec::new()
        };
        let reference = ObjectRef::new(org, model, revision, object_type, object, params);
        let ari = Ari::Reference(reference);
        if self.options.strict_resolve {
            self.catalog.resolve_ari(&ari, true)
        } else {
            Ok(ari)
        }
    }
}

fn literal_bool(v: bool) -> Ari {
    Ari::Literal(Literal::new_unchecked(TypeRef::Builtin(BuiltinType::Bool), Primitive::Bool(v)))
}

fn read_uint_value(r: &mut Reader) -> Result<u64> {
    let head = r.read_head()?;
    match head.major {
        MAJOR_UINT => Ok(head.value),
        other => Err(r.error(format!("expected unsigned integer, found major type {other}"))),
    }
}

fn read_text_body(r: &mut Reader, head: Head) -> Result<String> {
    let bytes = r.read_bytes_raw(head.value as usize)?;
    String::from_utf8(bytes.to_vec()).map_err(|_| r.error("invalid UTF-8 in CBOR text string"))
}

fn read_bytes_body(r: &mut Reader, head: Head) -> Result<Vec<u8>> {
    Ok(r.read_bytes_raw(head.value as usize)?.to_vec())
}

fn read_text(r: &mut Reader) -> Result<String> {
    let len = r.expect_major(MAJOR_TEXT)?;
    let bytes = r.read_bytes_raw(len as usize)?;
    String::from_utf8(bytes.to_vec()).map_err(|_| r.error("invalid UTF-8 in CBOR text string"))
}

/// An `org`/`model`/`object` field that may be written as either a number
/// or a symbolic name.
fn read_name(r: &mut Reader) -> Result<Name> {
    let head = r.read_head()?;
    match head.major {
        MAJOR_UINT => Ok(Name::Num(head.value)),
        MAJOR_TEXT => {
            let bytes = r.read_bytes_raw(head.value as usize)?;
            let s = String::from_utf8(bytes.to_vec()).map_err(|_| r.error("invalid UTF-8 in CBOR text string"))?;
            Ok(Name::Text(s))
        }
        other => Err(r.error(format!("expected identifier (uint or text), found major type {other}"))),
    }
}

fn read_revision(r: &mut Reader) -> Result<Option<Revision>> {
    let head = r.read_head()?;
    if head.major == MAJOR_SIMPLE && head.value == raw::SIMPLE_NULL {
        return Ok(None);
    }
    if head.major != MAJOR_TEXT {
        return Err(r.error("expected revision as text or null"));
    }
    let bytes = r.read_bytes_raw(head.value as usize)?;
    let s = String::from_utf8(bytes.to_vec()).map_err(|_| r.error("invalid UTF-8 in CBOR text string"))?;
    parse_revision(&s)
        .map(Some)
        .ok_or_else(|| r.error(format!("malformed revision date {s:?}")))
}

fn parse_revision(s: &str) -> Option<Revision> {
    let mut parts = s.splitn(3, '-');
    let year = parts.next()?.parse().ok()?;
    let month = parts.next()?.parse().ok()?;
    let day = parts.next()?.parse().ok()?;
    Some(Revision { year, month, day })
}
