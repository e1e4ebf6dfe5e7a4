//! # Lifetable
//!
//! A Rust library for generating complete actuarial life (mortality) tables from partial input data.
//!
//! ## Features
//! - **Gap Filling**: Given any workable mix of survivors (`lx`), mortality rates (`qx`) and
//!   deaths (`dx`) per age, missing cells are filled from the recurrences that bind them
//! - **Derived Functions**: Survival probability (`px`), person-years lived (`Lx`), total future
//!   person-years (`Tx`) and life expectancy (`ex`) computed for every row
//! - **Flexible Headers**: Input columns are matched by synonym lists, case-insensitive and
//!   whitespace-trimmed (`age`/`x`/`yaş`, `q(x)`/`mortality_rate`, ...)
//! - **Flexible Data**: Load from DataFrames, XLSX/ODS workbooks, remote workbooks, or generated
//!   sample data; write completed tables back to ODS
//! - **Builder Pattern**: Configuration and per-age accessors use builders with validated defaults
//!
//! ## Quick Start
//!
//! ```rust
//! use lifetable::prelude::*;
//! use polars::prelude::*;
//!
//! // Partial data: rates only, survivors and deaths left to the engine
//! let df = df! {
//!     "age" => [0u32, 1, 2, 3],
//!     "qx" => [0.010f64, 0.012, 0.015, 1.0],
//! }?;
//!
//! let table = LifeTableConfig::builder()
//!     .data(RawTable::from_df(df)?)
//!     .radix(100_000)
//!     .build()?
//!     .generate()?;
//!
//! let survivors = table.lx().x(1).call()?;
//! let expectancy = table.ex().x(0).call()?;
//!
//! println!("l₁: {survivors:.0}");
//! println!("e₀: {expectancy:.4}");
//! # LifeTableResult::Ok(())
//! ```
//!
//! ## Pipeline
//!
//! Generation is one pass of three stages over caller-owned data:
//! normalize (label matching), complete (two forward recurrence passes),
//! derive (`px`/`Lx`/`Tx`/`ex` plus zero-fill of underivable cells). The
//! engine keeps no state between invocations.
//!
//! ## Notes
//! - `age` and `qx` columns are mandatory; `lx` and `dx` are optional
//! - Blank and NaN cells mean *absent*, never zero
//! - Cells underivable after completion resolve to `0` in the output (a
//!   warning is logged naming how many per column)

pub type LifeTableResult<T> = Result<T, error::LifeTableError>;
pub mod error;
pub mod life_table;
pub mod macros;
pub mod prelude;
pub mod raw_data;
pub mod table_gen;
