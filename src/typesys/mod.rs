//! The type system (component C): the built-in type set, typedef
//! expansion, structural type constructors, and value/type compatibility.

pub mod compat;
pub mod typedef;

use num_enum::{IntoPrimitive, TryFromPrimitive};

use crate::ident::Name;

pub use typedef::TypeExpr;

/// The closed built-in literal type set. Wire codes are this crate's own
/// assignment; see `DESIGN.md` for how `Int64 = 4` was picked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, IntoPrimitive, TryFromPrimitive)]
#[repr(u8)]
pub enum BuiltinType {
    Bool = 0,
    Byte = 1,
    UInt64 = 2,
    UVast = 3,
    Int64 = 4,
    Vast = 5,
    Real32 = 6,
    Real64 = 7,
    Text = 8,
    Bytes = 9,
    Timepoint = 10,
    Timeperiod = 11,
    Ac = 12,
    Am = 13,
    Tbl = 14,
    Tblt = 15,
    ExecSet = 16,
    RptSet = 17,
    Rpt = 18,
    /// A reference to a type itself (used inside `union`/`use` typedef
    /// expressions that quantify over "any type").
    TypeRefType = 19,
}

impl BuiltinType {
    pub fn token(self) -> &'static str {
        match self {
            BuiltinType::Bool => "BOOL",
            BuiltinType::Byte => "BYTE",
            BuiltinType::UInt64 => "UINT",
            BuiltinType::UVast => "UVAST",
            BuiltinType::Int64 => "INT",
            BuiltinType::Vast => "VAST",
            BuiltinType::Real32 => "REAL32",
            BuiltinType::Real64 => "REAL64",
            BuiltinType::Text => "TEXTSTR",
            BuiltinType::Bytes => "BYTESTR",
            BuiltinType::Timepoint => "TP",
            BuiltinType::Timeperiod => "TD",
            BuiltinType::Ac => "AC",
            BuiltinType::Am => "AM",
            BuiltinType::Tbl => "TBL",
            BuiltinType::Tblt => "TBLT",
            BuiltinType::ExecSet => "EXECSET",
            BuiltinType::RptSet => "RPTSET",
            BuiltinType::Rpt => "RPT",
            BuiltinType::TypeRefType => "ARITYPE",
        }
    }

    pub fn from_token(token: &str) -> Option<Self> {
        Some(match token {
            "BOOL" => BuiltinType::Bool,
            "BYTE" => BuiltinType::Byte,
            "UINT" | "UINT64" => BuiltinType::UInt64,
            "UVAST" => BuiltinType::UVast,
            "INT" | "INT64" => BuiltinType::Int64,
            "VAST" => BuiltinType::Vast,
            "REAL32" => BuiltinType::Real32,
            "REAL64" => BuiltinType::Real64,
            "TEXTSTR" | "STR" => BuiltinType::Text,
            "BYTESTR" => BuiltinType::Bytes,
            "TP" => BuiltinType::Timepoint,
            "TD" => BuiltinType::Timeperiod,
            "AC" => BuiltinType::Ac,
            "AM" => BuiltinType::Am,
            "TBL" => BuiltinType::Tbl,
            "TBLT" => BuiltinType::Tblt,
            "EXECSET" => BuiltinType::ExecSet,
            "RPTSET" => BuiltinType::RptSet,
            "RPT" => BuiltinType::Rpt,
            "ARITYPE" => BuiltinType::TypeRefType,
            _ => return None,
        })
    }
}

/// JSON/YAML ADM records spell a built-in type by its text-form token
/// (`"UINT"`, `"TBLT"`, ...) rather than the Rust variant name, matching
/// [`BuiltinType::token`]/[`BuiltinType::from_token`].
impl serde::Serialize for BuiltinType {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.token())
    }
}

impl<'de> serde::Deserialize<'de> for BuiltinType {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        BuiltinType::from_token(&s).ok_or_else(|| serde::de::Error::custom(format!("unknown built-in type {s:?}")))
    }
}

/// A reference to a type: built-in, or an ADM-defined `TYPEDEF` object
/// named either symbolically or by (module, ordinal).
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeRef {
    Builtin(BuiltinType),
    Adm {
        org: Name,
        module: Name,
        name: Name,
    },
}

impl TypeRef {
    pub fn builtin(b: BuiltinType) -> Self {
        TypeRef::Builtin(b)
    }
}

impl std::fmt::Display for TypeRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TypeRef::Builtin(b) => write!(f, "{}", b.token()),
            TypeRef::Adm { org, module, name } => {
                write!(f, "{org:?}/{module:?}/TYPEDEF/{name:?}")
            }
        }
    }
}
