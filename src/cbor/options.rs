//! CBOR-codec options, plus the supplementary `sort_keys` knob for
//! deployments that want sorted-key `am` canonicalization.

#[derive(Debug, Clone, Copy)]
pub struct CborCodecOptions {
    /// Require every object reference to resolve against the catalog.
    pub strict_resolve: bool,
    /// Pass unknown tagged items through as opaque literals instead of
    /// failing with `DecodeError{UnknownTag}`.
    pub allow_unknown_tags: bool,
    /// Encode identifiers as integers when possible.
    pub prefer_numeric_names: bool,
    /// Canonicalize `am` key ordering by key rather than insertion order
    /// on encode: some deployments expect sorted-key canonicalization
    /// instead of the default insertion order.
    pub sort_keys: bool,
}

impl Default for CborCodecOptions {
    fn default() -> Self {
        Self {
            strict_resolve: false,
            allow_unknown_tags: false,
            prefer_numeric_names: false,
            sort_keys: false,
        }
    }
}
