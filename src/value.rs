//! The ARI abstract data model: one tagged value space with many variants.
//!
//! An [`Ari`] never carries a catalog pointer — object references are
//! symbolic until resolved by the catalog as a separate step.

use indexmap::IndexMap;

use crate::ident::ObjectRef;
use crate::time::{Timeperiod, Timepoint};
use crate::typesys::TypeRef;

/// An ARI value: the sum type every codec operation ultimately produces or
/// consumes.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Ari {
    /// Explicit "no value" sentinel, distinct from any literal.
    Undefined,
    /// The literal null.
    Null,
    /// A `(type, primitive)` pair. Construction goes through
    /// [`Literal::new`], which enforces invariant 1 (shape matches type).
    Literal(Literal),
    /// A reference to a named ADM object, with optional actual parameters.
    Reference(ObjectRef),
}

impl Ari {
    pub fn is_undefined(&self) -> bool {
        matches!(self, Ari::Undefined)
    }

    pub fn as_literal(&self) -> Option<&Literal> {
        match self {
            Ari::Literal(l) => Some(l),
            _ => None,
        }
    }

    pub fn as_reference(&self) -> Option<&ObjectRef> {
        match self {
            Ari::Reference(r) => Some(r),
            _ => None,
        }
    }
}

/// A typed literal value: a primitive paired with the type it was declared,
/// parsed, or decoded against.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct Literal {
    pub ty: TypeRef,
    pub primitive: Primitive,
}

impl Literal {
    /// Constructs a literal, checking the primitive's shape against `ty`
    /// per the compatibility rules in the type system (invariant 1: a
    /// `Literal` is never constructed in an inconsistent state).
    ///
    /// Callers that already know the shape matches (e.g. a decoder that
    /// picked `primitive`'s variant directly from `ty`) may use
    /// [`Literal::new_unchecked`] to skip the recheck.
    pub fn new(
        ty: TypeRef,
        primitive: Primitive,
        catalog: &crate::catalog::Catalog,
    ) -> crate::error::Result<Self> {
        crate::typesys::compat::check_compatible(catalog, &ty, &primitive)?;
        Ok(Self { ty, primitive })
    }

    pub fn new_unchecked(ty: TypeRef, primitive: Primitive) -> Self {
        Self { ty, primitive }
    }
}

/// A single ordered `(name, value)` field of a labeled tuple (`tblt`).
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct TbltField {
    pub name: String,
    pub ty: TypeRef,
    pub value: Ari,
}

/// A `tbl` literal: a row-major grid with a declared column count and
/// column-type tuple (invariant 3).
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct Table {
    pub columns: Vec<TypeRef>,
    /// Row-major flattened cells; `cells.len()` is always a multiple of
    /// `columns.len()`.
    pub cells: Vec<Ari>,
}

impl Table {
    pub fn new(columns: Vec<TypeRef>, cells: Vec<Ari>) -> crate::error::Result<Self> {
        let ncol = columns.len();
        if ncol == 0 || cells.len() % ncol != 0 {
            return Err(crate::error::CodecError::InvariantViolation(format!(
                "tbl row length {} is not a multiple of column count {ncol}",
                cells.len()
            )));
        }
        Ok(Self { columns, cells })
    }

    pub fn row_count(&self) -> usize {
        self.cells.len() / self.columns.len().max(1)
    }

    pub fn rows(&self) -> impl Iterator<Item = &[Ari]> {
        self.cells.chunks(self.columns.len())
    }

    /// Recovers a `tbl`'s column types from its first row: neither the text
    /// grammar nor the CBOR wire form carries column types directly (only a
    /// column count), so both decoders call this on the cells they just
    /// read to reconstruct the same `columns` for the same logical table.
    /// A column whose first-row cell isn't a `Literal` (undefined, a
    /// reference, or a table with no rows) falls back to the open
    /// `type-ref` builtin, the same "accept anything" placeholder
    /// `check_compatible` already treats as a wildcard column.
    pub fn infer_columns(ncol: usize, cells: &[Ari]) -> Vec<TypeRef> {
        (0..ncol)
            .map(|c| {
                cells
                    .get(c)
                    .and_then(Ari::as_literal)
                    .map(|lit| lit.ty.clone())
                    .unwrap_or(TypeRef::builtin(crate::typesys::BuiltinType::TypeRefType))
            })
            .collect()
    }
}

/// An `am` literal: a key-unique, insertion-ordered mapping from ARI to ARI.
///
/// Wraps an [`IndexMap`] keyed by [`AriKey`] (an equality/hash wrapper over
/// [`Ari`] implementing structural equality) rather than `Ari` itself,
/// since `Ari` has no derived `Hash`/`Eq` — see [`crate::eq`].
#[derive(Debug, Clone, Default)]
pub struct AriMap {
    entries: IndexMap<crate::eq::AriKey, Ari>,
}

/// Serialized as a sequence of `[key, value]` pairs rather than a JSON/YAML
/// mapping object: an ARI key is frequently not a string (it can itself be
/// an object reference or a structured literal), which a string-keyed
/// serde map format can't represent.
impl serde::Serialize for AriMap {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeSeq;
        let mut seq = serializer.serialize_seq(Some(self.entries.len()))?;
        for (k, v) in self.entries.iter() {
            seq.serialize_element(&(&k.0, v))?;
        }
        seq.end()
    }
}

impl<'de> serde::Deserialize<'de> for AriMap {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let pairs = Vec::<(Ari, Ari)>::deserialize(deserializer)?;
        let mut map = AriMap::new();
        for (k, v) in pairs {
            map.try_insert(k, v).map_err(serde::de::Error::custom)?;
        }
        Ok(map)
    }
}

impl AriMap {
    pub fn new() -> Self {
        Self {
            entries: IndexMap::new(),
        }
    }

    /// Inserts a key/value pair, returning `DuplicateMapKey` if an
    /// ARI-equal key is already present.
    pub fn try_insert(&mut self, key: Ari, value: Ari) -> crate::error::Result<()> {
        if key.is_undefined() {
            return Err(crate::error::CodecError::InvariantViolation(
                "Undefined is not a valid map key".into(),
            ));
        }
        let key = crate::eq::AriKey(key);
        if self.entries.contains_key(&key) {
            return Err(crate::error::CodecError::Parse {
                pos: Default::default(),
                message: "DuplicateMapKey".into(),
            });
        }
        self.entries.insert(key, value);
        Ok(())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Ari, &Ari)> {
        self.entries.iter().map(|(k, v)| (&k.0, v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A single report (`rpt`): the source object that produced it, the
/// timepoint it was produced at, and the item values it carries.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct Report {
    pub source: Box<Ari>,
    pub time: Timepoint,
    pub items: Vec<Ari>,
}

/// A batch of reports (`rptset`), each keyed by a nonce the way an
/// execution set keys its requests.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ReportSet {
    pub reference_time: Timepoint,
    pub reports: Vec<Report>,
}

/// An execution set (`execset`): a nonce plus the ordered CTRL invocations
/// (each an object reference) to run.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ExecSet {
    pub nonce: u64,
    pub targets: Vec<Ari>,
}

/// The payload carried by a [`Literal`].
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Primitive {
    Bool(bool),
    UInt64(u64),
    Int64(i64),
    UVast(u64),
    Vast(i64),
    Real32(f32),
    Real64(f64),
    Text(String),
    Bytes(Vec<u8>),
    Timepoint(Timepoint),
    Timeperiod(Timeperiod),
    Ac(Vec<Ari>),
    Am(AriMap),
    Tbl(Table),
    Tblt(Vec<TbltField>),
    ExecSet(ExecSet),
    RptSet(ReportSet),
    Rpt(Report),
}

impl Primitive {
    /// A short name for the primitive's shape, used in `TypeMismatch`
    /// error messages.
    pub fn shape_name(&self) -> &'static str {
        match self {
            Primitive::Bool(_) => "bool",
            Primitive::UInt64(_) => "uint64",
            Primitive::Int64(_) => "int64",
            Primitive::UVast(_) => "uvast",
            Primitive::Vast(_) => "vast",
            Primitive::Real32(_) => "real32",
            Primitive::Real64(_) => "real64",
            Primitive::Text(_) => "text",
            Primitive::Bytes(_) => "bytes",
            Primitive::Timepoint(_) => "tp",
            Primitive::Timeperiod(_) => "td",
            Primitive::Ac(_) => "ac",
            Primitive::Am(_) => "am",
            Primitive::Tbl(_) => "tbl",
            Primitive::Tblt(_) => "tblt",
            Primitive::ExecSet(_) => "execset",
            Primitive::RptSet(_) => "rptset",
            Primitive::Rpt(_) => "rpt",
        }
    }
}
