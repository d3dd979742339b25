/// How much metadata the payload carries alongside the data.
///
/// Annotations (`@odata.context`, `@odata.etag`) are emitted at `Minimal`
/// and above.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum MetadataLevel {
    None,
    #[default]
    Minimal,
    Full,
}

#[derive(Debug, Clone)]
pub struct Options {
    pub metadata: MetadataLevel,
    /// Render `Edm.Int64` and `Edm.Decimal` as JSON strings instead of
    /// numbers (the `IEEE754Compatible` format parameter).
    pub ieee754_compatible: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            metadata: MetadataLevel::default(),
            ieee754_compatible: false,
        }
    }
}
