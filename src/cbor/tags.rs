//! Fixed CBOR tag numbers: one per structured-literal kind plus the
//! object-reference array, read from configuration rather than hardcoded,
//! so a deployment that needs to match another implementation's wire
//! format can swap in its own table.
//!
//! Only the `tp` tag is fixed across implementations (RFC 8949 tag 1,
//! "epoch-based date/time"); the rest are ADM/implementation-defined. This
//! crate's own assignment follows below; see `DESIGN.md`.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TagTable {
    pub object_ref: u64,
    pub execset: u64,
    pub rptset: u64,
    pub rpt: u64,
    pub am: u64,
    pub ac: u64,
    pub tbl: u64,
    pub tp: u64,
    pub td: u64,
}

impl Default for TagTable {
    fn default() -> Self {
        Self {
            tp: 1,
            td: 1001,
            ac: 1002,
            am: 1003,
            tbl: 1004,
            execset: 1005,
            rptset: 1006,
            rpt: 1007,
            object_ref: 1008,
        }
    }
}

impl TagTable {
    /// The kind a tag number identifies, or `None` for an unrecognized tag
    /// (surfaced as `DecodeError{UnknownTag}` unless
    /// `CborCodecOptions::allow_unknown_tags` is set).
    pub fn kind_of(&self, tag: u64) -> Option<TagKind> {
        Some(if tag == self.tp {
            TagKind::Tp
        } else if tag == self.td {
            TagKind::Td
        } else if tag == self.ac {
            TagKind::Ac
        } else if tag == self.am {
            TagKind::Am
        } else if tag == self.tbl {
            TagKind::Tbl
        } else if tag == self.execset {
            TagKind::ExecSet
        } else if tag == self.rptset {
            TagKind::RptSet
        } else if tag == self.rpt {
            TagKind::Rpt
        } else if tag == self.object_ref {
            TagKind::ObjectRef
        } else {
            return None;
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagKind {
    Tp,
    Td,
    Ac,
    Am,
    Tbl,
    ExecSet,
    RptSet,
    Rpt,
    ObjectRef,
}
