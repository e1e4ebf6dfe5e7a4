//! Row Normalizer: match arbitrary input column labels to the canonical
//! life-table fields and extract them into [`CanonicalColumns`].
//!
//! Matching is case-insensitive and whitespace-trimmed, and the first label
//! in the synonym list that appears among the input columns wins, so at
//! most one source column feeds each canonical field. `age` and `qx` are
//! mandatory; `lx` and `dx` start out absent when unmatched. The input
//! DataFrame is read, never mutated.

use crate::error::LifeTableError;
use crate::LifeTableResult;
use polars::prelude::*;

// ================================================
// ACCEPTED COLUMN LABELS
// ================================================

/// Accepted labels for the age column ("yas"/"yaş" kept for compatibility
/// with Turkish-language source workbooks).
pub const AGE_LABELS: &[&str] = &["yas", "age", "yaş", "x"];

/// Accepted labels for the survivors column.
pub const LX_LABELS: &[&str] = &["lx", "l(x)", "survivors"];

/// Accepted labels for the mortality-rate column.
pub const QX_LABELS: &[&str] = &["qx", "q(x)", "mortality_rate"];

/// Accepted labels for the deaths column.
pub const DX_LABELS: &[&str] = &["dx", "d(x)", "deaths"];

// ================================================
// CANONICAL COLUMNS
// ================================================

/// The three base quantities plus the age axis, one entry per row.
///
/// Absent cells are `None` - never a NaN marker - so "still absent after
/// completion" is an exact check rather than a floating-point propagation.
#[derive(Debug, Clone, PartialEq)]
pub struct CanonicalColumns {
    pub age: Vec<u32>,
    pub lx: Vec<Option<f64>>,
    pub qx: Vec<Option<f64>>,
    pub dx: Vec<Option<f64>>,
}

impl CanonicalColumns {
    pub fn len(&self) -> usize {
        self.age.len()
    }

    pub fn is_empty(&self) -> bool {
        self.age.is_empty()
    }

    /// Reorder all four columns so that `age` is ascending.
    pub fn sort_by_age(&mut self) {
        let mut order: Vec<usize> = (0..self.len()).collect();
        order.sort_by_key(|&i| self.age[i]);

        self.age = order.iter().map(|&i| self.age[i]).collect();
        self.lx = order.iter().map(|&i| self.lx[i]).collect();
        self.qx = order.iter().map(|&i| self.qx[i]).collect();
        self.dx = order.iter().map(|&i| self.dx[i]).collect();
    }

    /// Reject tables holding the same age twice. Must be called after
    /// [`CanonicalColumns::sort_by_age`]; relies on adjacency.
    pub fn reject_duplicate_ages(&self) -> LifeTableResult<()> {
        for pair in self.age.windows(2) {
            if pair[0] == pair[1] {
                return Err(LifeTableError::InvalidRowData {
                    reason: format!("duplicate age {} in input table", pair[0]),
                });
            }
        }
        Ok(())
    }
}

// ================================================
// PUBLIC FUNCTIONS
// ================================================

/// Find the first accepted label (in synonym-list order) that matches one
/// of the available column labels, comparing trimmed and lowercased.
pub fn match_column<'a>(labels: &'a [String], synonyms: &[&str]) -> Option<&'a str> {
    synonyms.iter().find_map(|synonym| {
        labels
            .iter()
            .find(|label| label.trim().to_lowercase() == *synonym)
            .map(|label| label.as_str())
    })
}

/// Map the input DataFrame's columns onto [`CanonicalColumns`].
///
/// # Errors
/// - [`LifeTableError::MissingRequiredColumn`] when no column matches the
///   `age` or `qx` synonyms.
/// - [`LifeTableError::InvalidRowData`] when an age is fractional or
///   negative, a supplied `lx`/`dx` is negative, or a supplied `qx` lies
///   outside `[0, 1]`.
pub fn normalize(df: &DataFrame) -> LifeTableResult<CanonicalColumns> {
    let labels: Vec<String> = df
        .get_column_names()
        .iter()
        .map(|name| name.to_string())
        .collect();

    // age and qx are mandatory; lx and dx start out absent when unmatched
    let age_label = match_column(&labels, AGE_LABELS).ok_or(
        LifeTableError::MissingRequiredColumn {
            field: "age",
            accepted: AGE_LABELS,
        },
    )?;
    let qx_label = match_column(&labels, QX_LABELS).ok_or(
        LifeTableError::MissingRequiredColumn {
            field: "qx",
            accepted: QX_LABELS,
        },
    )?;
    let lx_label = match_column(&labels, LX_LABELS);
    let dx_label = match_column(&labels, DX_LABELS);

    let n = df.height();

    let age = extract_age_column(df, age_label)?;
    let qx = extract_value_column(df, qx_label, 0.0, 1.0)?;
    let lx = match lx_label {
        Some(label) => extract_value_column(df, label, 0.0, f64::INFINITY)?,
        None => vec![None; n],
    };
    let dx = match dx_label {
        Some(label) => extract_value_column(df, label, 0.0, f64::INFINITY)?,
        None => vec![None; n],
    };

    Ok(CanonicalColumns { age, lx, qx, dx })
}

// ================================================
// PRIVATE FUNCTIONS
// ================================================

/// Extract the age axis. Ages must be whole and non-negative; a missing
/// age cell makes the row unaddressable and is rejected outright.
fn extract_age_column(df: &DataFrame, label: &str) -> LifeTableResult<Vec<u32>> {
    let column = df.column(label)?.cast(&DataType::Float64)?;
    let values = column.f64()?;

    let mut ages = Vec::with_capacity(values.len());
    for (row, opt) in values.into_iter().enumerate() {
        let value = opt.filter(|v| v.is_finite()).ok_or_else(|| {
            LifeTableError::InvalidRowData {
                reason: format!("row {}: missing age value in column '{label}'", row + 1),
            }
        })?;

        if value < 0.0 || value.fract() != 0.0 {
            return Err(LifeTableError::InvalidRowData {
                reason: format!(
                    "row {}: age {value} in column '{label}' must be a non-negative whole number",
                    row + 1
                ),
            });
        }

        ages.push(value as u32);
    }

    Ok(ages)
}

/// Extract a numeric column as optional cells. NaN reads as absent, the
/// missing-value convention of the source workbooks; supplied values must
/// lie in `[min, max]`.
fn extract_value_column(
    df: &DataFrame,
    label: &str,
    min: f64,
    max: f64,
) -> LifeTableResult<Vec<Option<f64>>> {
    let column = df.column(label)?.cast(&DataType::Float64)?;
    let values = column.f64()?;

    let mut cells = Vec::with_capacity(values.len());
    for (row, opt) in values.into_iter().enumerate() {
        let cell = opt.filter(|v| !v.is_nan());
        if let Some(value) = cell {
            if value < min || value > max {
                return Err(LifeTableError::InvalidRowData {
                    reason: format!(
                        "row {}: value {value} in column '{label}' is outside [{min}, {max}]",
                        row + 1
                    ),
                });
            }
        }
        cells.push(cell);
    }

    Ok(cells)
}
