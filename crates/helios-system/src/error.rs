//! Layout generation error types.

/// Errors that prevent a layout from being generated.
///
/// These only arise from configurations whose carried ranges degenerate during
/// placement; a validated default config never produces them.
#[derive(Debug, thiserror::Error)]
pub enum LayoutError {
    /// A palette was empty.
    #[error("{0} palette is empty")]
    EmptyPalette(&'static str),

    /// The palette holds no color different from the previous body's.
    #[error("palette has no color different from {0}")]
    NoDistinctColor(String),

    /// A nonzero draw was requested from a range containing only zero.
    #[error("{name} range contains only zero")]
    OnlyZero { name: &'static str },

    /// A range narrowed past itself.
    #[error("{name} range is inverted: [{min}, {max}]")]
    InvertedRange {
        name: &'static str,
        min: i64,
        max: i64,
    },
}
