//! The CBOR codec: a compact, catalog-aware binary encoding of the same
//! [`crate::value::Ari`] value space the text codec covers.

mod decode;
mod encode;
pub mod options;
pub mod raw;
pub mod tags;

use crate::catalog::Catalog;
use crate::error::Result;
use crate::value::Ari;

pub use decode::decode_cbor;
pub use encode::encode_cbor;
pub use options::CborCodecOptions;
pub use tags::TagTable;

/// Encodes `ari` to canonical CBOR bytes using the default tag assignment
/// (see [`TagTable::default`]).
pub fn encode(ari: &Ari, catalog: &Catalog, options: &CborCodecOptions) -> Result<Vec<u8>> {
    encode_cbor(ari, catalog, options, &TagTable::default())
}

/// Decodes a complete CBOR item from `data`, using the default tag
/// assignment. Fails if trailing bytes remain after the item.
pub fn decode(data: &[u8], catalog: &Catalog, options: &CborCodecOptions) -> Result<Ari> {
    decode_cbor(data, catalog, options, &TagTable::default())
}
