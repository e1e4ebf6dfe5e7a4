#![allow(non_snake_case)]

//! Derived-Function Calculator: compute `px`, `Lx`, `Tx` and `ex` from the
//! completed base columns and assemble the final table.
//!
//! # Formulas
//! ```text
//! px = 1 - qx
//! Lx = lx - dx/2
//! Tx = Σ Lx over all ages ≥ x   (exact reverse cumulative sum)
//! ex = Tx / lx   when lx > 0, else 0
//! ```
//!
//! Cells that survived completion as absent, and any non-finite result,
//! resolve to `0` in the output. That silent-zero policy is part of the
//! engine's contract; the only trace it leaves is a warning log naming how
//! many cells were zero-filled per column.

use crate::table_gen::normalize::CanonicalColumns;
use crate::LifeTableResult;
use log::{debug, warn};
use polars::prelude::*;

/// Compute the derived functions and build the eight-column result frame.
///
/// Pure with respect to its input: the base columns are read, never
/// changed, so running the calculator twice over the same base columns
/// yields identical output.
pub fn derive(cols: &CanonicalColumns) -> LifeTableResult<DataFrame> {
    let n = cols.len();

    // px = 1 - qx
    let px: Vec<Option<f64>> = cols.qx.iter().map(|qx| qx.map(|q| 1.0 - q)).collect();

    // Lx = lx - dx/2 (person-years lived within the age interval)
    let Lx: Vec<Option<f64>> = cols
        .lx
        .iter()
        .zip(cols.dx.iter())
        .map(|(lx, dx)| match (lx, dx) {
            (Some(l), Some(d)) => Some(l - d / 2.0),
            _ => None,
        })
        .collect();

    // Tx as a reverse cumulative sum: Tx[last] = Lx[last], then
    // Tx[i] = Lx[i] + Tx[i+1]. A row with no Lx contributes nothing to the
    // tail sum and keeps no Tx of its own.
    let mut Tx: Vec<Option<f64>> = vec![None; n];
    let mut tail = 0.0;
    for i in (0..n).rev() {
        if let Some(l) = Lx[i] {
            tail += l;
            Tx[i] = Some(tail);
        }
    }

    // ex = Tx / lx, with a zero cohort defined to zero rather than a
    // division blow-up
    let ex: Vec<Option<f64>> = cols
        .lx
        .iter()
        .zip(Tx.iter())
        .map(|(lx, tx)| match lx {
            Some(l) if *l > 0.0 => tx.map(|t| t / l),
            Some(_) => Some(0.0),
            None => None,
        })
        .collect();

    // Cleanup: everything still absent or non-finite becomes 0
    let lx = cleanup("lx", &cols.lx);
    let qx = cleanup("qx", &cols.qx);
    let dx = cleanup("dx", &cols.dx);
    let px = cleanup("px", &px);
    let Lx = cleanup("Lx", &Lx);
    let Tx = cleanup("Tx", &Tx);
    let ex = cleanup("ex", &ex);

    debug!("derived life-table functions for {n} rows");

    let result = DataFrame::new(vec![
        Series::new("age".into(), cols.age.clone()).into_column(),
        Series::new("lx".into(), lx).into_column(),
        Series::new("qx".into(), qx).into_column(),
        Series::new("dx".into(), dx).into_column(),
        Series::new("px".into(), px).into_column(),
        Series::new("Lx".into(), Lx).into_column(),
        Series::new("Tx".into(), Tx).into_column(),
        Series::new("ex".into(), ex).into_column(),
    ])?;

    Ok(result)
}

// ================================================
// PRIVATE FUNCTIONS
// ================================================

/// Replace absent and non-finite cells with 0, logging how many were
/// touched. The returned values are exactly what the caller gets: the
/// diagnostic changes nothing.
fn cleanup(column_name: &str, cells: &[Option<f64>]) -> Vec<f64> {
    let mut zero_filled = 0usize;
    let values = cells
        .iter()
        .map(|cell| match cell {
            Some(v) if v.is_finite() => *v,
            _ => {
                zero_filled += 1;
                0.0
            }
        })
        .collect();

    if zero_filled > 0 {
        warn!("{zero_filled} cell(s) in column '{column_name}' could not be derived and were zero-filled");
    }

    values
}
