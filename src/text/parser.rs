//! Hand-written recursive-descent parser for the text form.
//!
//! Reentrant and consumes exactly one ARI per invocation. Object
//! references come back unresolved: resolution against the catalog is a
//! separate step (see [`crate::catalog::Catalog::resolve_ari`]), so this
//! module never touches a `Catalog`.

use crate::error::Result;
use crate::ident::{Name, ObjectRef, ObjectType, Revision};
use crate::time::{CatalogEpoch, Timepoint, Timeperiod};
use crate::typesys::{BuiltinType, TypeRef};
use crate::value::{Ari, AriMap, ExecSet, Literal, Primitive, Report, ReportSet, Table, TbltField};

use super::lexer::{is_name_continue, is_name_start, Cursor};

/// Parses one ARI from `input`, optionally prefixed with `ari:`.
pub fn parse_text(input: &str) -> Result<Ari> {
    let mut cur = Cursor::new(input.trim());
    if cur.rest().starts_with("ari:") {
        cur.expect_str("ari:")?;
    }
    let ari = parse_body(&mut cur)?;
    cur.skip_ws();
    if !cur.is_eof() {
        return Err(cur.error("trailing characters after ARI"));
    }
    Ok(ari)
}

fn parse_body(cur: &mut Cursor) -> Result<Ari> {
    if cur.rest().starts_with("//") {
        return parse_object_ref(cur).map(Ari::Reference);
    }
    cur.expect('/')?;
    let type_token = parse_token(cur, is_name_continue);
    match type_token {
        "NULL" => Ok(Ari::Null),
        "UNDEFINED" => Ok(Ari::Undefined),
        other => parse_typed_literal(cur, other).map(Ari::Literal),
    }
}

/// Parses a value that can appear nested inside a structured literal: a
/// full object reference, a full explicit `/TYPE/value` literal, or a
/// bare token that's type-inferred from its lexical shape.
fn parse_nested_value(cur: &mut Cursor) -> Result<Ari> {
    cur.skip_ws();
    if cur.rest().starts_with("//") {
        return parse_object_ref(cur).map(Ari::Reference);
    }
    if cur.peek() == Some('/') {
        return parse_body(cur);
    }
    let bare = parse_bare_token(cur)?;
    Ok(Ari::Literal(infer_bare_literal(&bare)))
}

fn parse_token<'a>(cur: &mut Cursor<'a>, pred: impl Fn(char) -> bool) -> &'a str {
    cur.take_while(pred)
}

/// A bare, unprefixed token used inside a container: runs until the next
/// structural delimiter, percent-decoded.
fn parse_bare_token(cur: &mut Cursor) -> Result<String> {
    let raw = cur.take_while(|c| !matches!(c, ',' | ')' | ';' | '=' | '('));
    percent_decode(raw, cur)
}

fn infer_bare_literal(token: &str) -> Literal {
    if let Ok(n) = token.parse::<i64>() {
        if n >= 0 {
            return Literal::new_unchecked(
                TypeRef::builtin(BuiltinType::UInt64),
                Primitive::UInt64(n as u64),
            );
        }
        return Literal::new_unchecked(TypeRef::builtin(BuiltinType::Int64), Primitive::Int64(n));
    }
    if let Ok(f) = token.parse::<f64>() {
        return Literal::new_unchecked(TypeRef::builtin(BuiltinType::Real64), Primitive::Real64(f));
    }
    if token == "true" || token == "false" {
        return Literal::new_unchecked(
            TypeRef::builtin(BuiltinType::Bool),
            Primitive::Bool(token == "true"),
        );
    }
    Literal::new_unchecked(
        TypeRef::builtin(BuiltinType::Text),
        Primitive::Text(token.to_string()),
    )
}

fn parse_typed_literal(cur: &mut Cursor, type_token: &str) -> Result<Literal> {
    let Some(builtin) = BuiltinType::from_token(type_token) else {
        return Err(cur.error(format!("unknown literal type {type_token:?}")));
    };
    cur.expect('/')?;
    let primitive = match builtin {
        BuiltinType::Bool => Primitive::Bool(parse_scalar(cur)?.parse().map_err(|_| cur.error("invalid BOOL"))?),
        BuiltinType::Byte | BuiltinType::UInt64 => {
            Primitive::UInt64(parse_scalar(cur)?.parse().map_err(|_| cur.error("invalid unsigned integer"))?)
        }
        BuiltinType::UVast => {
            Primitive::UVast(parse_scalar(cur)?.parse().map_err(|_| cur.error("invalid UVAST"))?)
        }
        BuiltinType::Int64 => {
            Primitive::Int64(parse_scalar(cur)?.parse().map_err(|_| cur.error("invalid INT"))?)
        }
        BuiltinType::Vast => {
            Primitive::Vast(parse_scalar(cur)?.parse().map_err(|_| cur.error("invalid VAST"))?)
        }
        BuiltinType::Real32 => {
            Primitive::Real32(parse_scalar(cur)?.parse().map_err(|_| cur.error("invalid REAL32"))?)
        }
        BuiltinType::Real64 => {
            Primitive::Real64(parse_scalar(cur)?.parse().map_err(|_| cur.error("invalid REAL64"))?)
        }
        BuiltinType::Text => Primitive::Text(percent_decode(&parse_scalar(cur)?, cur)?),
        BuiltinType::Bytes => Primitive::Bytes(parse_hex_bytes(cur)?),
        BuiltinType::Timepoint => Primitive::Timepoint(parse_timepoint(cur)?),
        BuiltinType::Timeperiod => Primitive::Timeperiod(parse_timeperiod(cur)?),
        BuiltinType::Ac => Primitive::Ac(parse_ac(cur)?),
        BuiltinType::Am => Primitive::Am(parse_am(cur)?),
        BuiltinType::Tbl => Primitive::Tbl(parse_tbl(cur)?),
        BuiltinType::Tblt => Primitive::Tblt(parse_tblt(cur)?),
        BuiltinType::ExecSet => Primitive::ExecSet(parse_execset(cur)?),
        BuiltinType::RptSet => Primitive::RptSet(parse_rptset(cur)?),
        BuiltinType::Rpt => Primitive::Rpt(parse_rpt(cur)?),
        BuiltinType::TypeRefType => {
            return Err(cur.error("ARITYPE has no literal text form"));
        }
    };
    Ok(Literal::new_unchecked(TypeRef::builtin(builtin), primitive))
}

/// Consumes one scalar field: up to the next `,`/`)`/`;` or end of input.
fn parse_scalar(cur: &mut Cursor) -> Result<String> {
    Ok(cur
        .take_while(|c| !matches!(c, ',' | ')' | ';'))
        .to_string())
}

fn percent_decode(raw: &str, cur: &Cursor) -> Result<String> {
    let bytes = raw.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let hex = bytes
                .get(i + 1..i + 3)
                .and_then(|h| std::str::from_utf8(h).ok())
                .and_then(|h| u8::from_str_radix(h, 16).ok())
                .ok_or_else(|| cur.error("invalid percent-encoding"))?;
            out.push(hex);
            i += 3;
        } else {
            out.push(bytes[i]);
            i += 1;
        }
    }
    String::from_utf8(out).map_err(|_| cur.error("percent-decoded bytes are not valid UTF-8"))
}

fn parse_hex_bytes(cur: &mut Cursor) -> Result<Vec<u8>> {
    let raw = cur.take_while(|c| c.is_ascii_hexdigit());
    if raw.len() % 2 != 0 {
        return Err(cur.error("BYTESTR hex literal has odd length"));
    }
    (0..raw.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(&raw[i..i + 2], 16).map_err(|_| cur.error("invalid hex digit")))
        .collect()
}

fn parse_timepoint(cur: &mut Cursor) -> Result<Timepoint> {
    let raw = parse_scalar(cur)?;
    if let Ok(ticks) = raw.parse::<i64>() {
        return Ok(Timepoint { ticks });
    }
    let dt = chrono::DateTime::parse_from_rfc3339(&raw)
        .map_err(|_| cur.error("invalid ISO-8601 timepoint"))?;
    Ok(CatalogEpoch::default().from_datetime(dt.with_timezone(&chrono::Utc)))
}

fn parse_timeperiod(cur: &mut Cursor) -> Result<Timeperiod> {
    let raw = parse_scalar(cur)?;
    if let Ok(ticks) = raw.parse::<i64>() {
        return Ok(Timeperiod { ticks });
    }
    let dur = parse_iso8601_duration(&raw).ok_or_else(|| cur.error("invalid ISO-8601 duration"))?;
    Ok(CatalogEpoch::default().duration_to_ticks(dur))
}

/// A minimal `PnYnMnDTnHnMnS` parser covering the subset ARIs need
/// (day/hour/minute/second components; no calendar-aware year/month).
fn parse_iso8601_duration(s: &str) -> Option<chrono::Duration> {
    let s = s.strip_prefix('P')?;
    let (date_part, time_part) = s.split_once('T').unwrap_or((s, ""));
    let mut total = chrono::Duration::zero();
    let mut num = String::new();
    for c in date_part.chars() {
        if c.is_ascii_digit() {
            num.push(c);
        } else if c == 'D' {
            total += chrono::Duration::days(num.parse().ok()?);
            num.clear();
        } else {
            return None;
        }
    }
    num.clear();
    for c in time_part.chars() {
        if c.is_ascii_digit() {
            num.push(c);
        } else if c == 'H' {
            total += chrono::Duration::hours(num.parse().ok()?);
            num.clear();
        } else if c == 'M' {
            total += chrono::Duration::minutes(num.parse().ok()?);
            num.clear();
        } else if c == 'S' {
            total += chrono::Duration::seconds(num.parse().ok()?);
            num.clear();
        } else {
            return None;
        }
    }
    Some(total)
}

fn parse_ac(cur: &mut Cursor) -> Result<Vec<Ari>> {
    cur.expect('(')?;
    let mut items = Vec::new();
    parse_comma_list(cur, |cur| {
        items.push(parse_nested_value(cur)?);
        Ok(())
    })?;
    cur.expect(')')?;
    Ok(items)
}

fn parse_am(cur: &mut Cursor) -> Result<AriMap> {
    cur.expect('(')?;
    let mut map = AriMap::new();
    parse_comma_list(cur, |cur| {
        let key = parse_nested_value(cur)?;
        cur.expect('=')?;
        let value = parse_nested_value(cur)?;
        map.try_insert(key, value)
    })?;
    cur.expect(')')?;
    Ok(map)
}

/// Runs `item` for each comma-separated element until `)` is next,
/// tolerating an empty `()`.
fn parse_comma_list(cur: &mut Cursor, mut item: impl FnMut(&mut Cursor) -> Result<()>) -> Result<()> {
    cur.skip_ws();
    if cur.peek() == Some(')') {
        return Ok(());
    }
    loop {
        item(cur)?;
        cur.skip_ws();
        if !cur.eat(',') {
            break;
        }
    }
    Ok(())
}

fn parse_tbl(cur: &mut Cursor) -> Result<Table> {
    cur.expect_str("c=")?;
    let ncol: usize = cur
        .take_while(|c| c.is_ascii_digit())
        .parse()
        .map_err(|_| cur.error("invalid TBL column count"))?;
    cur.expect(';')?;
    cur.expect('(')?;
    let mut cells = Vec::new();
    parse_comma_list(cur, |cur| {
        cells.push(parse_nested_value(cur)?);
        Ok(())
    })?;
    cur.expect(')')?;
    if ncol == 0 || cells.len() % ncol != 0 {
        return Err(cur.error(format!(
            "TBL row length {} is not a multiple of declared column count {ncol}",
            cells.len()
        )));
    }
    let columns = Table::infer_columns(ncol, &cells);
    Table::new(columns, cells).map_err(|e| cur.error(e.to_string()))
}

fn parse_tblt(cur: &mut Cursor) -> Result<Vec<TbltField>> {
    cur.expect('(')?;
    let mut fields = Vec::new();
    parse_comma_list(cur, |cur| {
        let name = parse_token(cur, is_name_continue).to_string();
        if name.is_empty() || !name.chars().next().is_some_and(is_name_start) {
            return Err(cur.error("TBLT field requires a name"));
        }
        cur.expect('=')?;
        let value = parse_nested_value(cur)?;
        let ty = value
            .as_literal()
            .map(|l| l.ty.clone())
            .unwrap_or(TypeRef::builtin(BuiltinType::Text));
        fields.push(TbltField { name, ty, value });
        Ok(())
    })?;
    cur.expect(')')?;
    Ok(fields)
}

fn parse_execset(cur: &mut Cursor) -> Result<ExecSet> {
    cur.expect_str("n=")?;
    let nonce: u64 = cur
        .take_while(|c| c.is_ascii_digit())
        .parse()
        .map_err(|_| cur.error("invalid EXECSET nonce"))?;
    cur.expect(';')?;
    cur.expect('(')?;
    let mut targets = Vec::new();
    parse_comma_list(cur, |cur| {
        targets.push(parse_nested_value(cur)?);
        Ok(())
    })?;
    cur.expect(')')?;
    Ok(ExecSet { nonce, targets })
}

fn parse_rptset(cur: &mut Cursor) -> Result<ReportSet> {
    cur.expect_str("t=")?;
    let reference_time = parse_timepoint(cur)?;
    cur.expect(';')?;
    cur.expect('(')?;
    let mut reports = Vec::new();
    parse_comma_list(cur, |cur| {
        reports.push(parse_rpt(cur)?);
        Ok(())
    })?;
    cur.expect(')')?;
    Ok(ReportSet {
        reference_time,
        reports,
    })
}

fn parse_rpt(cur: &mut Cursor) -> Result<Report> {
    cur.expect_str("s=")?;
    let source = Box::new(parse_nested_value(cur)?);
    cur.expect(';')?;
    cur.expect_str("t=")?;
    let time = parse_timepoint(cur)?;
    cur.expect(';')?;
    cur.expect('(')?;
    let mut items = Vec::new();
    parse_comma_list(cur, |cur| {
        items.push(parse_nested_value(cur)?);
        Ok(())
    })?;
    cur.expect(')')?;
    Ok(Report { source, time, items })
}

fn parse_object_ref(cur: &mut Cursor) -> Result<ObjectRef> {
    cur.expect_str("//")?;
    let org = parse_name(cur)?;
    cur.expect('/')?;
    let model = parse_name(cur)?;
    let revision = if cur.eat('@') {
        Some(parse_revision(cur)?)
    } else {
        None
    };
    cur.expect('/')?;
    let type_token = parse_token(cur, is_name_continue);
    let Some(object_type) = ObjectType::from_token(type_token) else {
        return Err(cur.error(format!("unknown object type {type_token:?}")));
    };
    cur.expect('/')?;
    let object = parse_name(cur)?;
    let mut params = Vec::new();
    if cur.eat('(') {
        parse_comma_list(cur, |cur| {
            params.push(parse_nested_value(cur)?);
            Ok(())
        })?;
        cur.expect(')')?;
    }
    Ok(ObjectRef::new(org, model, revision, object_type, object, params))
}

/// A name is either numeric, marked with a leading `!`, or symbolic
/// (NCName-like); the codec also accepts a bare decimal run as numeric
/// for convenience.
fn parse_name(cur: &mut Cursor) -> Result<Name> {
    if cur.eat('!') {
        let digits = cur.take_while(|c| c.is_ascii_digit());
        let n: u64 = digits.parse().map_err(|_| cur.error("invalid numeric name"))?;
        return Ok(Name::Num(n));
    }
    if cur.peek().is_some_and(|c| c.is_ascii_digit()) {
        let digits = cur.take_while(|c| c.is_ascii_digit());
        if let Ok(n) = digits.parse::<u64>() {
            return Ok(Name::Num(n));
        }
    }
    let name = cur.take_while(is_name_continue);
    if name.is_empty() {
        return Err(cur.error("expected a name"));
    }
    Ok(Name::Text(name.to_string()))
}

fn parse_revision(cur: &mut Cursor) -> Result<Revision> {
    let raw = cur.take_while(|c| c.is_ascii_digit() || c == '-');
    let mut parts = raw.split('-');
    let year: u16 = parts
        .next()
        .and_then(|p| p.parse().ok())
        .ok_or_else(|| cur.error("invalid revision year"))?;
    let month: u8 = parts
        .next()
        .and_then(|p| p.parse().ok())
        .ok_or_else(|| cur.error("invalid revision month"))?;
    let day: u8 = parts
        .next()
        .and_then(|p| p.parse().ok())
        .ok_or_else(|| cur.error("invalid revision day"))?;
    Ok(Revision { year, month, day })
}
