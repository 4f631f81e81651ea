/// Parser behavior toggles, including
/// [`ParserConfig::permissive_mixed_fractions`], which controls whether an
/// additive leading term before a fraction rewrites into a mixed fraction
/// (see `DESIGN.md`).
///
/// A plain struct constructed directly by the embedder, no `serde` or CLI
/// parsing layer.
#[derive(Debug, Clone, Copy)]
pub struct ParserConfig {
    /// Rounding scale applied by the active `NumberScaler` to scaled `NUM`
    /// leaves. `None` means "do not round."
    pub decimal_places: Option<u32>,
    /// Whether `,` may appear inside a numeric literal as a thousands
    /// separator (e.g. `1,234.5`).
    pub allow_thousands_separator: bool,
    /// Whether a parenthesized/bracketed pair rewrites to `INTERVAL` rather
    /// than `LIST`.
    pub allow_interval: bool,
    /// Whether `\text{...}` is treated as whitespace rather than a `VAR`.
    pub ignore_text: bool,
    /// Gates the permissive mixed-fraction rewrite. Default `false`: only a
    /// bare `NUM` leading term is rewritten into a mixed fraction; any other
    /// leading term is left as ordinary implicit multiplication.
    pub permissive_mixed_fractions: bool,
}

impl Default for ParserConfig {
    fn default() -> ParserConfig {
        ParserConfig {
            decimal_places: None,
            allow_thousands_separator: false,
            allow_interval: false,
            ignore_text: false,
            permissive_mixed_fractions: false,
        }
    }
}
