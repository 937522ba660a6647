//! The CBOR encoder: drives off the declared type, picking the narrowest
//! legal CBOR representation, and is deterministic for identical inputs
//! under a fixed option set.

use crate::catalog::Catalog;
use crate::error::Result;
use crate::ident::{Name, ObjectRef};
use crate::typesys::{BuiltinType, TypeRef};
use crate::value::{Ari, ExecSet, Literal, Primitive, Report, ReportSet, Table, TbltField};

use super::options::CborCodecOptions;
use super::raw;
use super::tags::TagTable;

pub fn encode_cbor(ari: &Ari, catalog: &Catalog, options: &CborCodecOptions, tags: &TagTable) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    let ctx = Ctx { catalog, options, tags };
    ctx.encode_ari(ari, &mut out)?;
    Ok(out)
}

struct Ctx<'a> {
    catalog: &'a Catalog,
    options: &'a CborCodecOptions,
    tags: &'a TagTable,
}

impl Ctx<'_> {
    fn encode_ari(&self, ari: &Ari, out: &mut Vec<u8>) -> Result<()> {
        match ari {
            Ari::Undefined => Ok(raw::write_undefined(out)),
            Ari::Null => Ok(raw::write_null(out)),
            Ari::Literal(lit) => self.encode_literal(lit, out),
            Ari::Reference(r) => self.encode_object_ref(r, out),
        }
    }

    fn encode_literal(&self, lit: &Literal, out: &mut Vec<u8>) -> Result<()> {
        let TypeRef::Builtin(builtin) = &lit.ty else {
            // An ADM typedef's wire shape is whatever its expansion
            // resolves to; encode the underlying primitive directly.
            return self.encode_primitive_bare(&lit.primitive, out);
        };
        match (&lit.primitive, builtin) {
            (Primitive::Bool(v), BuiltinType::Bool) => Ok(raw::write_bool(out, *v)),
            (Primitive::Text(v), BuiltinType::Text) => Ok(raw::write_text(out, v)),
            (Primitive::Bytes(v), BuiltinType::Bytes) => Ok(raw::write_bytes(out, v)),
            (Primitive::Real32(v), BuiltinType::Real32) => Ok(raw::write_f32(out, *v)),
            (Primitive::Real64(v), BuiltinType::Real64) => Ok(raw::write_f64(out, *v)),
            (Primitive::Timepoint(tp), BuiltinType::Timepoint) => {
                raw::write_tag(out, self.tags.tp);
                raw::write_int(out, tp.ticks);
                Ok(())
            }
            (Primitive::Timeperiod(td), BuiltinType::Timeperiod) => {
                raw::write_tag(out, self.tags.td);
                raw::write_int(out, td.ticks);
                Ok(())
            }
            (Primitive::Ac(items), BuiltinType::Ac) => {
                raw::write_tag(out, self.tags.ac);
                raw::write_array_header(out, items.len());
                for item in items {
                    self.encode_ari(item, out)?;
                }
                Ok(())
            }
            (Primitive::Am(map), BuiltinType::Am) => {
                raw::write_tag(out, self.tags.am);
                let mut entries: Vec<_> = map.iter().collect();
                if self.options.sort_keys {
                    entries.sort_by(|(a, _), (b, _)| cmp_keys(a, b));
                }
                raw::write_map_header(out, entries.len());
                for (k, v) in entries {
                    self.encode_ari(k, out)?;
                    self.encode_ari(v, out)?;
                }
                Ok(())
            }
            (Primitive::Tbl(tbl), BuiltinType::Tbl) => self.encode_tbl(tbl, out),
            (Primitive::Tblt(fields), BuiltinType::Tblt) => self.encode_tblt(fields, out),
            (Primitive::ExecSet(e), BuiltinType::ExecSet) => self.encode_execset(e, out),
            (Primitive::RptSet(r), BuiltinType::RptSet) => self.encode_rptset(r, out),
            (Primitive::Rpt(r), BuiltinType::Rpt) => self.encode_rpt(r, out),
            // The remaining numeric families (BYTE/UINT/UVAST/INT/VAST)
            // share CBOR's two integer major types, so the declared type
            // can't be recovered from the bare wire shape: disambiguate
            // with an explicit `[type_code, value]` array.
            (primitive, builtin) => self.encode_wrapped(*builtin, primitive, out),
        }
    }

    fn encode_wrapped(&self, builtin: BuiltinType, primitive: &Primitive, out: &mut Vec<u8>) -> Result<()> {
        raw::write_array_header(out, 2);
        raw::write_uint(out, u8::from(builtin) as u64);
        self.encode_primitive_bare(primitive, out)
    }

    /// Encodes a primitive's raw wire value with no type-disambiguating
    /// wrapper, used both for the second slot of the `[type_code, value]`
    /// array and for ADM-typedef'd literals whose shape isn't one of the
    /// built-ins handled above.
    fn encode_primitive_bare(&self, primitive: &Primitive, out: &mut Vec<u8>) -> Result<()> {
        match primitive {
            Primitive::Bool(v) => raw::write_bool(out, *v),
            Primitive::UInt64(v) | Primitive::UVast(v) => raw::write_uint(out, *v),
            Primitive::Int64(v) | Primitive::Vast(v) => raw::write_int(out, *v),
            Primitive::Real32(v) => raw::write_f32(out, *v),
            Primitive::Real64(v) => raw::write_f64(out, *v),
            Primitive::Text(v) => raw::write_text(out, v),
            Primitive::Bytes(v) => raw::write_bytes(out, v),
            Primitive::Timepoint(tp) => raw::write_int(out, tp.ticks),
            Primitive::Timeperiod(td) => raw::write_int(out, td.ticks),
            Primitive::Ac(items) => {
                raw::write_array_header(out, items.len());
                for item in items {
                    self.encode_ari(item, out)?;
                }
            }
            Primitive::Am(map) => {
                raw::write_map_header(out, map.len());
                for (k, v) in map.iter() {
                    self.encode_ari(k, out)?;
                    self.encode_ari(v, out)?;
                }
            }
            Primitive::Tbl(tbl) => {
                raw::write_array_header(out, 1 + tbl.cells.len());
                raw::write_uint(out, tbl.columns.len() as u64);
                for cell in &tbl.cells {
                    self.encode_ari(cell, out)?;
                }
            }
            Primitive::Tblt(fields) => {
                raw::write_array_header(out, fields.len());
                for field in fields {
                    raw::write_array_header(out, 2);
                    raw::write_text(out, &field.name);
                    self.encode_ari(&field.value, out)?;
                }
            }
            Primitive::ExecSet(e) => {
                raw::write_array_header(out, 2);
                raw::write_uint(out, e.nonce);
                raw::write_array_header(out, e.targets.len());
                for t in &e.targets {
                    self.encode_ari(t, out)?;
                }
            }
            Primitive::RptSet(r) => self.encode_rptset_body(r, out)?,
            Primitive::Rpt(r) => self.encode_rpt_body(r, out)?,
        }
        Ok(())
    }

    fn encode_tbl(&self, tbl: &Table, out: &mut Vec<u8>) -> Result<()> {
        raw::write_tag(out, self.tags.tbl);
        raw::write_array_header(out, 1 + tbl.cells.len());
        raw::write_uint(out, tbl.columns.len() as u64);
        for cell in &tbl.cells {
            self.encode_ari(cell, out)?;
        }
        Ok(())
    }

    fn encode_tblt(&self, fields: &[TbltField], out: &mut Vec<u8>) -> Result<()> {
        // No dedicated tag is allocated for `tblt`, so it rides the same
        // `[type_code, value]` wrapper as the ambiguous scalar families.
        raw::write_array_header(out, 2);
        raw::write_uint(out, u8::from(BuiltinType::Tblt) as u64);
        raw::write_array_header(out, fields.len());
        for field in fields {
            raw::write_array_header(out, 2);
            raw::write_text(out, &field.name);
            self.encode_ari(&field.value, out)?;
        }
        Ok(())
    }

    fn encode_execset(&self, e: &ExecSet, out: &mut Vec<u8>) -> Result<()> {
        raw::write_tag(out, self.tags.execset);
        raw::write_array_header(out, 2);
        raw::write_uint(out, e.nonce);
        raw::write_array_header(out, e.targets.len());
        for t in &e.targets {
            self.encode_ari(t, out)?;
        }
        Ok(())
    }

    fn encode_rptset(&self, r: &ReportSet, out: &mut Vec<u8>) -> Result<()> {
        raw::write_tag(out, self.tags.rptset);
        self.encode_rptset_body(r, out)
    }

    fn encode_rptset_body(&self, r: &ReportSet, out: &mut Vec<u8>) -> Result<()> {
        raw::write_array_header(out, 2);
        raw::write_int(out, r.reference_time.ticks);
        raw::write_array_header(out, r.reports.len());
        for rpt in &r.reports {
            self.encode_rpt_body(rpt, out)?;
        }
        Ok(())
    }

    fn encode_rpt(&self, r: &Report, out: &mut Vec<u8>) -> Result<()> {
        raw::write_tag(out, self.tags.rpt);
        self.encode_rpt_body(r, out)
    }

    fn encode_rpt_body(&self, r: &Report, out: &mut Vec<u8>) -> Result<()> {
        raw::write_array_header(out, 3);
        self.encode_ari(&r.source, out)?;
        raw::write_int(out, r.time.ticks);
        raw::write_array_header(out, r.items.len());
        for item in &r.items {
            self.encode_ari(item, out)?;
        }
        Ok(())
    }

    fn encode_object_ref(&self, r: &ObjectRef, out: &mut Vec<u8>) -> Result<()> {
        raw::write_tag(out, self.tags.object_ref);
        let with_params = !r.params.is_empty();
        raw::write_array_header(out, if with_params { 6 } else { 5 });
        self.encode_name_field(&r.org, out);
        self.encode_name_field(&r.model, out);
        match r.revision {
            Some(rev) => raw::write_text(out, &rev.to_string()),
            None => raw::write_null(out),
        }
        raw::write_uint(out, u8::from(r.object_type) as u64);
        self.encode_object_name_field(r, out);
        if with_params {
            raw::write_array_header(out, r.params.len());
            for p in &r.params {
                self.encode_ari(p, out)?;
            }
        }
        Ok(())
    }

    fn encode_name_field(&self, name: &Name, out: &mut Vec<u8>) {
        match name {
            Name::Num(n) => raw::write_uint(out, *n),
            Name::Text(s) => raw::write_text(out, s),
        }
    }

    fn encode_object_name_field(&self, r: &ObjectRef, out: &mut Vec<u8>) {
        if self.options.prefer_numeric_names {
            if let Ok(obj) = self
                .catalog
                .resolve_by_name(&r.org, &r.model, r.revision, r.object_type, &r.object)
            {
                raw::write_uint(out, obj.enum_id as u64);
                return;
            }
        }
        match &r.object {
            Name::Num(n) => raw::write_uint(out, *n),
            Name::Text(s) => raw::write_text(out, s),
        }
    }
}

fn cmp_keys(a: &Ari, b: &Ari) -> std::cmp::Ordering {
    format!("{a:?}").cmp(&format!("{b:?}"))
}
