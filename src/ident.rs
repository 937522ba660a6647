//! Object identifiers: the organization/model/object triple an [`crate::value::Ari::Reference`]
//! carries, plus the closed object-type tag set.

use num_enum::{IntoPrimitive, TryFromPrimitive};

use crate::value::Ari;

/// Either a symbolic name or a resolved numeric enum: internally either
/// form is legal, and a reference is only forced into one canonical form
/// when the formatter/encoder writes it out.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Name {
    Text(String),
    Num(u64),
}

impl Name {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Name::Text(s) => Some(s),
            Name::Num(_) => None,
        }
    }

    pub fn as_num(&self) -> Option<u64> {
        match self {
            Name::Num(n) => Some(*n),
            Name::Text(_) => None,
        }
    }
}

/// The closed set of ADM object kinds, with wire codes fixed across the
/// codec.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, IntoPrimitive, TryFromPrimitive, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "UPPERCASE")]
#[repr(u8)]
pub enum ObjectType {
    Const = 0,
    Ctrl = 1,
    Edd = 2,
    Ident = 3,
    Oper = 4,
    Sbr = 5,
    Tbr = 6,
    Typedef = 7,
    Var = 8,
}

impl ObjectType {
    /// The lowercase token used in text form (`CONST`, `CTRL`, ...).
    pub fn as_token(self) -> &'static str {
        match self {
            ObjectType::Const => "CONST",
            ObjectType::Ctrl => "CTRL",
            ObjectType::Edd => "EDD",
            ObjectType::Ident => "IDENT",
            ObjectType::Oper => "OPER",
            ObjectType::Sbr => "SBR",
            ObjectType::Tbr => "TBR",
            ObjectType::Typedef => "TYPEDEF",
            ObjectType::Var => "VAR",
        }
    }

    pub fn from_token(token: &str) -> Option<Self> {
        Some(match token {
            "CONST" => ObjectType::Const,
            "CTRL" => ObjectType::Ctrl,
            "EDD" => ObjectType::Edd,
            "IDENT" => ObjectType::Ident,
            "OPER" => ObjectType::Oper,
            "SBR" => ObjectType::Sbr,
            "TBR" => ObjectType::Tbr,
            "TYPEDEF" => ObjectType::Typedef,
            "VAR" => ObjectType::Var,
            _ => return None,
        })
    }
}

/// An optional module revision: a calendar date, or explicitly absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
pub struct Revision {
    pub year: u16,
    pub month: u8,
    pub day: u8,
}

impl std::fmt::Display for Revision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}-{:02}", self.year, self.month, self.day)
    }
}

/// A reference to a named ADM object, carrying actual parameters.
///
/// Object references are symbolic, never live pointers: `org`/`model`/
/// `object` may be text or numeric independent of whether the catalog has
/// resolved them.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ObjectRef {
    pub org: Name,
    pub model: Name,
    pub revision: Option<Revision>,
    pub object_type: ObjectType,
    pub object: Name,
    pub params: Vec<Ari>,
}

impl ObjectRef {
    pub fn new(
        org: Name,
        model: Name,
        revision: Option<Revision>,
        object_type: ObjectType,
        object: Name,
        params: Vec<Ari>,
    ) -> Self {
        Self {
            org,
            model,
            revision,
            object_type,
            object,
            params,
        }
    }

    /// A copy of this reference with `params` replacing the actual
    /// parameter list, everything else unchanged.
    pub fn with_params(&self, params: Vec<Ari>) -> Self {
        Self {
            params,
            ..self.clone()
        }
    }
}
