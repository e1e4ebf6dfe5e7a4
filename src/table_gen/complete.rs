//! Sequence Completer: fill missing `lx`/`qx`/`dx` cells from the
//! recurrences that bind them.
//!
//! The three quantities are related by `dx = lx·qx` and
//! `lx[i] = lx[i-1] - dx[i-1]`. One dependency-respecting forward pass
//! settles the common case where a single quantity is given per row; a
//! corrective second pass then re-walks survivor counts still open,
//! resolving them from the predecessor's rate alone where the first pass
//! only looked back at deaths.

use crate::error::LifeTableError;
use crate::table_gen::normalize::CanonicalColumns;
use crate::LifeTableResult;

/// Fill every derivable `lx`/`qx`/`dx` cell in place.
///
/// Rows are sorted ascending by age first; duplicate ages are rejected.
/// When the first row's `lx` is absent it is seeded with `radix`. Cells
/// that remain absent after both passes stay absent - the calculator
/// zero-fills them later (silent-gap policy).
///
/// # Errors
/// - [`LifeTableError::InvalidRowData`] on an empty column set or a
///   duplicated age.
pub fn complete(cols: &mut CanonicalColumns, radix: u32) -> LifeTableResult<()> {
    if cols.is_empty() {
        return Err(LifeTableError::InvalidRowData {
            reason: "cannot complete an empty table".to_string(),
        });
    }

    cols.sort_by_age();
    cols.reject_duplicate_ages()?;

    // Seed the first survivor count with the radix if absent
    if cols.lx[0].is_none() {
        cols.lx[0] = Some(f64::from(radix));
    }

    let n = cols.len();

    // First forward pass. Per row the sub-steps run in a fixed order so
    // each can use values set earlier in the same pass: a freshly derived
    // lx feeds the dx step, a freshly derived dx feeds the qx step.
    for i in 0..n {
        // lx from the previous row's survivors and deaths
        if i > 0 && cols.lx[i].is_none() {
            if let (Some(prev_lx), Some(prev_dx)) = (cols.lx[i - 1], cols.dx[i - 1]) {
                cols.lx[i] = Some((prev_lx - prev_dx).max(0.0));
            }
        }

        // dx = lx · qx
        if cols.dx[i].is_none() {
            if let (Some(qx), Some(lx)) = (cols.qx[i], cols.lx[i]) {
                cols.dx[i] = Some(lx * qx);
            }
        }

        // qx = dx / lx, clamped into [0, 1]; a row with no survivors has
        // nothing left to die
        if cols.qx[i].is_none() {
            if let (Some(dx), Some(lx)) = (cols.dx[i], cols.lx[i]) {
                cols.qx[i] = Some(if lx > 0.0 { (dx / lx).min(1.0) } else { 0.0 });
            }
        }
    }

    // Corrective second pass: survivor counts still open can follow from a
    // predecessor that carries a rate but no death count.
    for i in 1..n {
        if cols.lx[i].is_none() {
            if let (Some(prev_lx), Some(prev_qx)) = (cols.lx[i - 1], cols.qx[i - 1]) {
                cols.lx[i] = Some((prev_lx * (1.0 - prev_qx)).max(0.0));
            }
        }
    }

    Ok(())
}
