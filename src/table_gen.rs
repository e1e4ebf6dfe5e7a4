//! # Life table generation (LifeTableConfig)
//!
//! Configure and run the generation pipeline that turns partial mortality
//! data into a complete life table:
//!
//! 1. **Normalize** - match input column labels to the canonical fields
//!    (`age`, `lx`, `qx`, `dx`), see [`normalize`].
//! 2. **Complete** - fill missing base cells from the life-table
//!    recurrences, see [`complete`].
//! 3. **Derive** - compute `px`, `Lx`, `Tx`, `ex` and zero-fill whatever
//!    stayed underivable, see [`functions`].
//!
//! ## Quick Start
//! ```rust
//! # use lifetable::prelude::*;
//! use polars::prelude::*;
//!
//! let df = df! {
//!     "age" => [0u32, 1, 2],
//!     "qx" => [0.010f64, 0.012, 0.015],
//! }?;
//!
//! let config = LifeTableConfig::builder()
//!     .data(RawTable::from_df(df)?)
//!     .radix(100_000)
//!     .build()?;
//!
//! let table = config.generate()?;
//! assert_eq!(table.dataframe.height(), 3);
//! # LifeTableResult::Ok(())
//! ```
//!
//! ## Configuration Options
//! - **data**: partial mortality data under struct [`RawTable`]
//! - **radix**: survivor count assumed at the first age when the input
//!   supplies none (e.g. 100,000)
//!
//! The configuration holds no mutable state: `generate()` allocates fresh
//! row buffers per call, so one config may safely produce independent
//! tables back to back.

// Create a structure for the module
pub mod complete;
pub mod functions;
pub mod normalize;

use crate::error::LifeTableError;
use crate::life_table::LifeTable;
use crate::raw_data::RawTable;
use crate::LifeTableResult;
use bon::bon;
use garde::Validate;

/// Configuration for generating a complete life table from partial data.
///
/// See the module documentation for the pipeline stages and an example.
#[derive(Debug, Clone, Validate)]
#[garde(allow_unvalidated)]
pub struct LifeTableConfig {
    /// Source mortality data with arbitrary column labels.
    pub data: RawTable,

    /// Survivor count at the first age when the input supplies none.
    /// Common values: 100,000 (standard), 1,000,000 (precise).
    #[garde(range(min = 1))]
    pub radix: u32,
}

#[bon]
impl LifeTableConfig {
    #[builder]
    pub fn new(data: RawTable, #[builder(default = 100_000)] radix: u32) -> LifeTableResult<Self> {
        // Temporarily allow unvalidated data
        let config = LifeTableConfig { data, radix };

        // Validate the configuration
        config
            .validate()
            .map_err(|err| LifeTableError::Config(err.to_string()))?;

        Ok(config)
    }

    /// Run the full pipeline: normalize, complete, derive.
    ///
    /// The input data is read, never mutated, so `generate()` may be
    /// called repeatedly and on independent configs without
    /// cross-contamination.
    ///
    /// # Errors
    /// - [`LifeTableError::MissingRequiredColumn`] when no input column
    ///   matches the `age` or `qx` synonyms.
    /// - [`LifeTableError::InvalidRowData`] on out-of-domain cells or
    ///   duplicate ages.
    pub fn generate(&self) -> LifeTableResult<LifeTable> {
        let mut columns = normalize::normalize(&self.data.dataframe)?;
        complete::complete(&mut columns, self.radix)?;
        let dataframe = functions::derive(&columns)?;

        Ok(LifeTable::new(self.data.source.clone(), dataframe))
    }
}
