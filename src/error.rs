use polars::prelude::PolarsError;
use thiserror::Error;

/// Errors surfaced by table loading, validation and generation.
///
/// Only two kinds are fatal to table generation itself:
/// [`LifeTableError::MissingRequiredColumn`] when neither the `age` nor the
/// `qx` synonyms can be matched against the input headers, and
/// [`LifeTableError::InvalidRowData`] when a supplied cell is out of domain
/// (negative count, rate outside `[0, 1]`, fractional or duplicate age).
/// Cells that are merely *missing* never error: they are filled by the
/// recurrences where derivable and zero-filled otherwise.
#[derive(Debug, Error)]
pub enum LifeTableError {
    /// No input column matched any accepted label for a mandatory field.
    #[error("missing required column '{field}' (accepted labels: {accepted:?})")]
    MissingRequiredColumn {
        field: &'static str,
        accepted: &'static [&'static str],
    },

    /// A supplied cell value is outside the field's domain.
    #[error("invalid row data: {reason}")]
    InvalidRowData { reason: String },

    /// Configuration rejected by validation (e.g. zero radix).
    #[error("invalid configuration: {0}")]
    Config(String),

    /// Input data could not be loaded or parsed.
    #[error("failed to load input data: {0}")]
    Load(String),

    /// A per-age lookup on a generated table found no row.
    #[error("no row found for age {0}")]
    AgeNotFound(u32),

    #[error(transparent)]
    Polars(#[from] PolarsError),
}

impl From<String> for LifeTableError {
    fn from(msg: String) -> Self {
        LifeTableError::Load(msg)
    }
}

impl From<&str> for LifeTableError {
    fn from(msg: &str) -> Self {
        LifeTableError::Load(msg.to_string())
    }
}
