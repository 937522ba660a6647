//! Byte-level canonical CBOR primitives (RFC 8949 §3): definite-length
//! major-type headers, the shortest-form integer encoding canonical CBOR
//! requires, and a cursor reader that mirrors `text::lexer::Cursor`'s
//! shape but over bytes instead of `char`s.
//!
//! Written by hand rather than through a generic CBOR `Value` tree: the
//! wire shapes here are fully bespoke per ADM schema, and CBOR `undefined`
//! (simple value 23) has no first-class representation in the generic
//! serde-oriented CBOR crates this repo could otherwise reach for (see
//! `DESIGN.md`).

use crate::error::{CodecError, Result};

pub const MAJOR_UINT: u8 = 0;
pub const MAJOR_NEGINT: u8 = 1;
pub const MAJOR_BYTES: u8 = 2;
pub const MAJOR_TEXT: u8 = 3;
pub const MAJOR_ARRAY: u8 = 4;
pub const MAJOR_MAP: u8 = 5;
pub const MAJOR_TAG: u8 = 6;
pub const MAJOR_SIMPLE: u8 = 7;

pub const SIMPLE_FALSE: u64 = 20;
pub const SIMPLE_TRUE: u64 = 21;
pub const SIMPLE_NULL: u64 = 22;
pub const SIMPLE_UNDEFINED: u64 = 23;
pub const SIMPLE_F32: u64 = 26;
pub const SIMPLE_F64: u64 = 27;

pub fn write_head(out: &mut Vec<u8>, major: u8, value: u64) {
    let top = major << 5;
    if value < 24 {
        out.push(top | value as u8);
    } else if value <= u8::MAX as u64 {
        out.push(top | 24);
        out.push(value as u8);
    } else if value <= u16::MAX as u64 {
        out.push(top | 25);
        out.extend_from_slice(&(value as u16).to_be_bytes());
    } else if value <= u32::MAX as u64 {
        out.push(top | 26);
        out.extend_from_slice(&(value as u32).to_be_bytes());
    } else {
        out.push(top | 27);
        out.extend_from_slice(&value.to_be_bytes());
    }
}

pub fn write_uint(out: &mut Vec<u8>, v: u64) {
    write_head(out, MAJOR_UINT, v);
}

/// Encodes a signed integer as CBOR major 0 (non-negative) or major 1
/// (negative, stored as `-1 - n`).
pub fn write_int(out: &mut Vec<u8>, v: i64) {
    if v >= 0 {
        write_head(out, MAJOR_UINT, v as u64);
    } else {
        write_head(out, MAJOR_NEGINT, (-1 - v) as u64);
    }
}

pub fn write_bytes(out: &mut Vec<u8>, b: &[u8]) {
    write_head(out, MAJOR_BYTES, b.len() as u64);
    out.extend_from_slice(b);
}

pub fn write_text(out: &mut Vec<u8>, s: &str) {
    write_head(out, MAJOR_TEXT, s.len() as u64);
    out.extend_from_slice(s.as_bytes());
}

pub fn write_array_header(out: &mut Vec<u8>, len: usize) {
    write_head(out, MAJOR_ARRAY, len as u64);
}

pub fn write_map_header(out: &mut Vec<u8>, len: usize) {
    write_head(out, MAJOR_MAP, len as u64);
}

pub fn write_tag(out: &mut Vec<u8>, tag: u64) {
    write_head(out, MAJOR_TAG, tag);
}

pub fn write_bool(out: &mut Vec<u8>, v: bool) {
    out.push((MAJOR_SIMPLE << 5) | if v { SIMPLE_TRUE as u8 } else { SIMPLE_FALSE as u8 });
}

pub fn write_null(out: &mut Vec<u8>) {
    out.push((MAJOR_SIMPLE << 5) | SIMPLE_NULL as u8);
}

pub fn write_undefined(out: &mut Vec<u8>) {
    out.push((MAJOR_SIMPLE << 5) | SIMPLE_UNDEFINED as u8);
}

pub fn write_f32(out: &mut Vec<u8>, v: f32) {
    out.push((MAJOR_SIMPLE << 5) | SIMPLE_F32 as u8);
    out.extend_from_slice(&v.to_be_bytes());
}

pub fn write_f64(out: &mut Vec<u8>, v: f64) {
    out.push((MAJOR_SIMPLE << 5) | SIMPLE_F64 as u8);
    out.extend_from_slice(&v.to_be_bytes());
}

/// A CBOR item header: major type plus the decoded additional-info value
/// (the integer, string/array/map length, tag number, or simple-value
/// code, per major type).
#[derive(Debug, Clone, Copy)]
pub struct Head {
    pub major: u8,
    pub value: u64,
}

pub struct Reader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    pub fn offset(&self) -> usize {
        self.pos
    }

    pub fn is_eof(&self) -> bool {
        self.pos >= self.data.len()
    }

    pub fn error(&self, message: impl Into<String>) -> CodecError {
        CodecError::decode(self.pos, message)
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8]> {
        if self.pos + n > self.data.len() {
            return Err(self.error("unexpected end of CBOR input"));
        }
        let slice = &self.data[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    fn take_byte(&mut self) -> Result<u8> {
        Ok(self.take(1)?[0])
    }

    pub fn read_head(&mut self) -> Result<Head> {
        let b0 = self.take_byte()?;
        let major = b0 >> 5;
        let info = b0 & 0x1F;
        let value = match info {
            0..=23 => info as u64,
            24 => self.take_byte()? as u64,
            25 => u16::from_be_bytes(self.take(2)?.try_into().unwrap()) as u64,
            26 => u32::from_be_bytes(self.take(4)?.try_into().unwrap()) as u64,
            27 => u64::from_be_bytes(self.take(8)?.try_into().unwrap()),
            _ => return Err(self.error(format!("indefinite-length CBOR item not supported (info {info})"))),
        };
        Ok(Head { major, value })
    }

    /// Reads an expected-major-type head, failing if the major type
    /// doesn't match.
    pub fn expect_major(&mut self, major: u8) -> Result<u64> {
        let head = self.read_head()?;
        if head.major != major {
            return Err(self.error(format!("expected CBOR major type {major}, found {}", head.major)));
        }
        Ok(head.value)
    }

    pub fn read_bytes_raw(&mut self, n: usize) -> Result<&'a [u8]> {
        self.take(n)
    }

    pub fn read_f32(&mut self) -> Result<f32> {
        Ok(f32::from_be_bytes(self.take(4)?.try_into().unwrap()))
    }

    pub fn read_f64(&mut self) -> Result<f64> {
        Ok(f64::from_be_bytes(self.take(8)?.try_into().unwrap()))
    }

    /// Reads a signed integer assumed to already be positioned at a
    /// major-0 or major-1 head.
    pub fn read_signed(&mut self) -> Result<i64> {
        let head = self.read_head()?;
        match head.major {
            MAJOR_UINT => i64::try_from(head.value).map_err(|_| self.error("integer too large for i64")),
            MAJOR_NEGINT => {
                let n = i64::try_from(head.value).map_err(|_| self.error("integer too large for i64"))?;
                Ok(-1 - n)
            }
            other => Err(self.error(format!("expected integer, found major type {other}"))),
        }
    }
}
