#![forbid(unsafe_code)]
//! A codec for Application Resource Identifiers (ARIs), the naming and
//! literal-value scheme used by the DTN Management Architecture (DTNMA).
//!
//! Transcodes ARIs between a URI-style text form ([`text`]) and a compact
//! CBOR binary form ([`cbor`]), resolving symbolic names against an
//! in-memory [`catalog`] of Application Data Model (ADM) modules. See
//! `DESIGN.md` for how each module here is grounded.

pub mod catalog;
pub mod cbor;
pub mod eq;
pub mod error;
pub mod ident;
pub mod text;
pub mod time;
pub mod transform;
pub mod typesys;
pub mod value;

pub use catalog::Catalog;
pub use error::{CodecError, Result};
pub use value::Ari;
