//! The canonical text-form emitter.
//!
//! Symbolic names are preferred when a [`Catalog`] resolves them; absent a
//! catalog (or when the catalog can't resolve a given reference) names are
//! emitted in whatever form the [`Ari`] already carries. `numeric_names`
//! forces the numeric form, failing with `EncodeError` if no enum can be
//! found for a symbolic name.

use crate::catalog::Catalog;
use crate::error::{CodecError, Result};
use crate::ident::{Name, ObjectRef, ObjectType};
use crate::time::CatalogEpoch;
use crate::typesys::TypeRef;
use crate::value::{Ari, ExecSet, Literal, Primitive, Report, ReportSet, Table, TbltField};

use super::options::{FloatFormat, TextCodecOptions, TimeFormat};

/// Formats `ari` as canonical text, per the options and (optionally) a
/// catalog used to resolve symbolic/numeric object names.
pub fn format_text(ari: &Ari, options: &TextCodecOptions, catalog: Option<&Catalog>) -> Result<String> {
    let ctx = Ctx { options, catalog };
    let mut out = String::new();
    if options.text_identity {
        out.push_str("ari:");
    }
    ctx.format_body(ari, &mut out)?;
    Ok(out)
}

struct Ctx<'a> {
    options: &'a TextCodecOptions,
    catalog: Option<&'a Catalog>,
}

impl Ctx<'_> {
    fn format_body(&self, ari: &Ari, out: &mut String) -> Result<()> {
        match ari {
            Ari::Undefined => {
                out.push_str("/UNDEFINED");
                Ok(())
            }
            Ari::Null => {
                out.push_str("/NULL");
                Ok(())
            }
            Ari::Literal(lit) => self.format_literal(lit, out),
            Ari::Reference(r) => self.format_reference(r, out),
        }
    }

    fn format_literal(&self, lit: &Literal, out: &mut String) -> Result<()> {
        let TypeRef::Builtin(b) = &lit.ty else {
            return Err(CodecError::Encode(
                "ADM-defined typedef literals have no standalone text form".into(),
            ));
        };
        out.push('/');
        out.push_str(b.token());
        out.push('/');
        self.format_primitive(&lit.primitive, out)
    }

    fn format_primitive(&self, p: &Primitive, out: &mut String) -> Result<()> {
        match p {
            Primitive::Bool(v) => out.push_str(if *v { "true" } else { "false" }),
            Primitive::UInt64(v) => out.push_str(&v.to_string()),
            Primitive::Int64(v) => out.push_str(&v.to_string()),
            Primitive::UVast(v) => out.push_str(&v.to_string()),
            Primitive::Vast(v) => out.push_str(&v.to_string()),
            Primitive::Real32(v) => out.push_str(&self.format_float(*v as f64)),
            Primitive::Real64(v) => out.push_str(&self.format_float(*v)),
            Primitive::Text(s) => out.push_str(&percent_encode(s)),
            Primitive::Bytes(b) => {
                for byte in b {
                    out.push_str(&format!("{byte:02x}"));
                }
            }
            Primitive::Timepoint(tp) => out.push_str(&self.format_timepoint(*tp)),
            Primitive::Timeperiod(td) => out.push_str(&self.format_timeperiod(*td)),
            Primitive::Ac(items) => {
                out.push('(');
                self.format_comma_list(items, out, |ctx, item, out| ctx.format_nested(item, out))?;
                out.push(')');
            }
            Primitive::Am(map) => {
                out.push('(');
                let entries: Vec<_> = map.iter().collect();
                self.format_comma_list(&entries, out, |ctx, (k, v), out| {
                    ctx.format_nested(k, out)?;
                    out.push('=');
                    ctx.format_nested(v, out)
                })?;
                out.push(')');
            }
            Primitive::Tbl(tbl) => {
                out.push_str(&format!("c={};(", tbl.columns.len()));
                self.format_comma_list(&tbl.cells, out, |ctx, cell, out| ctx.format_nested(cell, out))?;
                out.push(')');
            }
            Primitive::Tblt(fields) => {
                out.push('(');
                self.format_comma_list(fields, out, |ctx, field: &TbltField, out| {
                    out.push_str(&field.name);
                    out.push('=');
                    ctx.format_nested(&field.value, out)
                })?;
                out.push(')');
            }
            Primitive::ExecSet(e) => self.format_execset(e, out)?,
            Primitive::RptSet(r) => self.format_rptset(r, out)?,
            Primitive::Rpt(r) => self.format_rpt(r, out)?,
        }
        Ok(())
    }

    /// A value nested inside a structured literal: always written through
    /// the full `/TYPE/value` or `//org/...` form, never the bare
    /// type-inferred token the parser also accepts on input.
    fn format_nested(&self, ari: &Ari, out: &mut String) -> Result<()> {
        self.format_body(ari, out)
    }

    fn format_comma_list<T>(
        &self,
        items: &[T],
        out: &mut String,
        mut item: impl FnMut(&Self, &T, &mut String) -> Result<()>,
    ) -> Result<()> {
        for (i, it) in items.iter().enumerate() {
            if i > 0 {
                out.push(',');
            }
            item(self, it, out)?;
        }
        Ok(())
    }

    fn format_execset(&self, e: &ExecSet, out: &mut String) -> Result<()> {
        out.push_str(&format!("n={};(", e.nonce));
        self.format_comma_list(&e.targets, out, |ctx, t, out| ctx.format_nested(t, out))?;
        out.push(')');
        Ok(())
    }

    fn format_rptset(&self, r: &ReportSet, out: &mut String) -> Result<()> {
        out.push_str(&format!("t={};(", self.format_timepoint(r.reference_time)));
        self.format_comma_list(&r.reports, out, |ctx, rpt, out| ctx.format_rpt(rpt, out))?;
        out.push(')');
        Ok(())
    }

    fn format_rpt(&self, r: &Report, out: &mut String) -> Result<()> {
        out.push_str("s=");
        self.format_nested(&r.source, out)?;
        out.push_str(&format!(";t={};(", self.format_timepoint(r.time)));
        self.format_comma_list(&r.items, out, |ctx, item, out| ctx.format_nested(item, out))?;
        out.push(')');
        Ok(())
    }

    fn format_float(&self, v: f64) -> String {
        match self.options.float_format {
            FloatFormat::Shortest => {
                let s = v.to_string();
                if s.contains('.') || s.contains('e') || s.contains("inf") || s.contains("NaN") {
                    s
                } else {
                    format!("{s}.0")
                }
            }
            FloatFormat::Decimal(n) => format!("{v:.*}", n as usize),
        }
    }

    fn format_timepoint(&self, tp: crate::time::Timepoint) -> String {
        match self.options.time_format {
            TimeFormat::Numeric => tp.ticks.to_string(),
            TimeFormat::Iso8601 => CatalogEpoch::default()
                .to_datetime(tp)
                .map(|dt| dt.to_rfc3339_opts(chrono::SecondsFormat::Secs, true))
                .unwrap_or_else(|| tp.ticks.to_string()),
        }
    }

    fn format_timeperiod(&self, td: crate::time::Timeperiod) -> String {
        match self.options.time_format {
            TimeFormat::Numeric => td.ticks.to_string(),
            TimeFormat::Iso8601 => {
                let secs = td.ticks.unsigned_abs();
                let sign = if td.ticks < 0 { "-" } else { "" };
                format!("{sign}P{}DT{}H{}M{}S", secs / 86400, (secs / 3600) % 24, (secs / 60) % 60, secs % 60)
            }
        }
    }

    fn format_reference(&self, r: &ObjectRef, out: &mut String) -> Result<()> {
        out.push_str("//");
        out.push_str(&self.format_org_model_name(&r.org)?);
        out.push('/');
        out.push_str(&self.format_org_model_name(&r.model)?);
        if let Some(rev) = r.revision {
            out.push('@');
            out.push_str(&rev.to_string());
        }
        out.push('/');
        out.push_str(r.object_type.as_token());
        out.push('/');
        out.push_str(&self.format_object_name(r)?);
        if !r.params.is_empty() {
            out.push('(');
            self.format_comma_list(&r.params, out, |ctx, p, out| ctx.format_nested(p, out))?;
            out.push(')');
        }
        Ok(())
    }

    /// Org/model identifiers resolve only as far as whichever form the
    /// `Ari` already carries; the catalog resolves enum↔symbol pairs at the
    /// whole-module granularity, not in isolation, so there is nothing
    /// further to look up here beyond the numeric-name override.
    fn format_org_model_name(&self, name: &Name) -> Result<String> {
        if self.options.numeric_names {
            return match name {
                Name::Num(n) => Ok(n.to_string()),
                Name::Text(_) => Err(CodecError::Encode(
                    "cannot force numeric_names: organization/model has no catalog-resolved enum".into(),
                )),
            };
        }
        Ok(match name {
            Name::Num(n) => n.to_string(),
            Name::Text(s) => percent_encode(s),
        })
    }

    fn format_object_name(&self, r: &ObjectRef) -> Result<String> {
        if let Some(catalog) = self.catalog {
            if let Ok(obj) = catalog.resolve_by_name(&r.org, &r.model, r.revision, r.object_type, &r.object) {
                return Ok(if self.options.numeric_names {
                    obj.enum_id.to_string()
                } else {
                    percent_encode(&obj.name)
                });
            }
        }
        match &r.object {
            Name::Num(n) if self.options.numeric_names => Ok(n.to_string()),
            Name::Num(n) => Ok(n.to_string()),
            Name::Text(s) if self.options.numeric_names => Err(CodecError::Encode(format!(
                "cannot force numeric_names: object {s:?} has no catalog-resolved enum"
            ))),
            Name::Text(s) => Ok(percent_encode(s)),
        }
    }
}

/// Percent-encodes every octet outside the RFC 3986 unreserved set plus
/// the grammar's own structural delimiters.
fn percent_encode(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for b in s.bytes() {
        let c = b as char;
        if super::lexer::is_unreserved(c) && !matches!(c, ',' | ')' | '(' | ';' | '=' | '/' | '!' | '@' | '%') {
            out.push(c);
        } else {
            out.push_str(&format!("%{b:02X}"));
        }
    }
    out
}
