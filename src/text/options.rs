//! Text-codec options.

/// Rendering of `tp`/`td` scalars in the formatter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimeFormat {
    #[default]
    Iso8601,
    Numeric,
}

/// Rendering of `real32`/`real64` scalars in the formatter.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum FloatFormat {
    #[default]
    Shortest,
    Decimal(u8),
}

#[derive(Debug, Clone, Copy)]
pub struct TextCodecOptions {
    /// Emit object names as integers.
    pub numeric_names: bool,
    /// If `true`, always emit the `ari:` prefix; if `false`, omit it on
    /// bare ARIs.
    pub text_identity: bool,
    pub time_format: TimeFormat,
    pub float_format: FloatFormat,
}

impl Default for TextCodecOptions {
    fn default() -> Self {
        Self {
            numeric_names: false,
            text_identity: true,
            time_format: TimeFormat::default(),
            float_format: FloatFormat::default(),
        }
    }
}
