//! # Lifetable Prelude
//!
//! Conveniently re-exports the most common types for life-table
//! generation. Import this module to access all primary features with a
//! single `use` statement.
//!
//! ## Example
//!
//! ```rust
//! # use lifetable::prelude::*;
//! use polars::prelude::*;
//! let df = df! {
//!     "age" => [30u32, 31],
//!     "qx" => [0.001, 0.002],
//! }?;
//! let table = LifeTableConfig::builder()
//!     .data(RawTable::from_df(df)?)
//!     .radix(100_000)
//!     .build()?
//!     .generate()?;
//! println!("e₃₀: {:.4}", table.ex().x(30).call()?);
//! # LifeTableResult::Ok(())
//! ```

// Package Result and error types
pub use crate::error::LifeTableError;
pub use crate::LifeTableResult;

// Raw input data and sample generators
pub use crate::raw_data::{RawTable, SampleShape};
pub use crate::rawdf;

// Generation pipeline configuration
pub use crate::table_gen::LifeTableConfig;

// Generated table and its summary statistics
pub use crate::life_table::{LifeTable, TableSummary};

// Most commonly used Polars types for working with mortality tables
pub use polars::prelude::{DataFrame, LazyFrame, PolarsError, PolarsResult, Series};
