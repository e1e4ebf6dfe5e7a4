#![allow(non_snake_case)]

//! # Generated life table (LifeTable)
//!
//! The completed result of table generation: every row carries the base
//! quantities (`lx`, `qx`, `dx`) and the derived functions (`px`, `Lx`,
//! `Tx`, `ex`) as finite numbers, sorted ascending by age. Accessors look
//! values up per age with the builder pattern; [`LifeTable::summary`]
//! condenses the table into headline statistics and
//! [`LifeTable::write_ods`] persists it as a spreadsheet.

use crate::error::LifeTableError;
use crate::LifeTableResult;
use bon::bon;
use polars::prelude::*;
use spreadsheet_ods::{Sheet, WorkBook};

/// Output column order of a generated table.
const OUTPUT_COLUMNS: &[&str] = &["age", "lx", "qx", "dx", "px", "Lx", "Tx", "ex"];

/// Columns holding counts of lives or person-years; rounded to whole
/// numbers on export.
const COUNT_COLUMNS: &[&str] = &["lx", "dx", "Lx", "Tx"];

/// A complete mortality table produced by
/// [`crate::table_gen::LifeTableConfig::generate`].
#[derive(Debug, Clone, PartialEq)]
pub struct LifeTable {
    /// Where the underlying raw data came from.
    pub source: String,

    /// Columns `age, lx, qx, dx, px, Lx, Tx, ex`, ascending by age.
    pub dataframe: DataFrame,
}

/// Headline statistics of a generated table.
#[derive(Debug, Clone, PartialEq)]
pub struct TableSummary {
    pub rows: usize,
    pub min_age: u32,
    pub max_age: u32,
    pub mean_qx: f64,
    pub max_qx: f64,
    /// Age at which the highest mortality rate occurs.
    pub max_qx_age: u32,
    /// Lowest non-zero mortality rate, if any rate is positive.
    pub min_positive_qx: Option<f64>,
    /// Life expectancy at the table's first age.
    pub ex_at_min_age: f64,
    pub median_ex: f64,
}

#[bon]
impl LifeTable {
    pub(crate) fn new(source: String, dataframe: DataFrame) -> Self {
        Self { source, dataframe }
    }

    pub fn min_age(&self) -> LifeTableResult<u32> {
        // Get the minimum age from the dataframe
        let age_column = self.dataframe.column("age")?;
        let age_series = age_column.u32()?;
        age_series
            .iter()
            .flatten()
            .min()
            .ok_or_else(|| LifeTableError::Load("No age data available".to_string()))
    }

    pub fn max_age(&self) -> LifeTableResult<u32> {
        // Get the maximum age from the dataframe
        let age_column = self.dataframe.column("age")?;
        let age_series = age_column.u32()?;
        age_series
            .iter()
            .flatten()
            .max()
            .ok_or_else(|| LifeTableError::Load("No age data available".to_string()))
    }

    // Alias for max_age
    pub fn omega(&self) -> LifeTableResult<u32> {
        self.max_age()
    }

    /// Survivors to age x.
    #[builder]
    pub fn lx(&self, x: u32) -> LifeTableResult<f64> {
        self.get_value("lx", x)
    }

    /// Mortality rate between ages x and x+1.
    #[builder]
    pub fn qx(&self, x: u32) -> LifeTableResult<f64> {
        self.get_value("qx", x)
    }

    /// Deaths between ages x and x+1.
    #[builder]
    pub fn dx(&self, x: u32) -> LifeTableResult<f64> {
        self.get_value("dx", x)
    }

    /// Survival probability between ages x and x+1.
    #[builder]
    pub fn px(&self, x: u32) -> LifeTableResult<f64> {
        self.get_value("px", x)
    }

    /// Person-years lived between ages x and x+1.
    #[builder(builder_type = LifeTableBigLxBuilder)]
    pub fn Lx(&self, x: u32) -> LifeTableResult<f64> {
        self.get_value("Lx", x)
    }

    /// Total person-years lived from age x onward.
    #[builder]
    pub fn Tx(&self, x: u32) -> LifeTableResult<f64> {
        self.get_value("Tx", x)
    }

    /// Life expectancy at age x.
    #[builder]
    pub fn ex(&self, x: u32) -> LifeTableResult<f64> {
        self.get_value("ex", x)
    }

    /// Condense the table into headline statistics.
    pub fn summary(&self) -> LifeTableResult<TableSummary> {
        let ages: Vec<u32> = self
            .dataframe
            .column("age")?
            .u32()?
            .into_no_null_iter()
            .collect();
        let qx: Vec<f64> = self
            .dataframe
            .column("qx")?
            .f64()?
            .into_no_null_iter()
            .collect();
        let ex: Vec<f64> = self
            .dataframe
            .column("ex")?
            .f64()?
            .into_no_null_iter()
            .collect();

        let rows = self.dataframe.height();

        let mut max_qx = 0.0f64;
        let mut max_qx_age = ages[0];
        let mut min_positive_qx: Option<f64> = None;
        for (&age, &q) in ages.iter().zip(qx.iter()) {
            if q > max_qx {
                max_qx = q;
                max_qx_age = age;
            }
            if q > 0.0 && min_positive_qx.is_none_or(|m| q < m) {
                min_positive_qx = Some(q);
            }
        }

        // Median over the sorted expectancies; table rows are never empty
        let mut sorted_ex = ex.clone();
        sorted_ex.sort_by(|a, b| a.total_cmp(b));
        let median_ex = if rows % 2 == 1 {
            sorted_ex[rows / 2]
        } else {
            (sorted_ex[rows / 2 - 1] + sorted_ex[rows / 2]) / 2.0
        };

        Ok(TableSummary {
            rows,
            min_age: self.min_age()?,
            max_age: self.max_age()?,
            mean_qx: qx.iter().sum::<f64>() / rows as f64,
            max_qx,
            max_qx_age,
            min_positive_qx,
            ex_at_min_age: ex.first().copied().unwrap_or(0.0),
            median_ex,
        })
    }

    /// Write the table to an ODS workbook: the full table on a
    /// `mortality_table` sheet plus a `summary` sheet.
    ///
    /// Count columns (`lx`, `dx`, `Lx`, `Tx`) are rounded to whole
    /// numbers, rate columns (`qx`, `px`, `ex`) to six decimals, the usual
    /// presentation of published tables.
    ///
    /// # Errors
    /// - Path not writable or ODS serialization failure
    ///
    /// # Examples
    /// ```rust, ignore
    /// # use lifetable::prelude::*;
    /// # let table: LifeTable = unimplemented!();
    /// table.write_ods("mortality_table.ods")?;
    /// # LifeTableResult::Ok(())
    /// ```
    pub fn write_ods(&self, path: &str) -> LifeTableResult<()> {
        let mut book = WorkBook::new_empty();

        // Main sheet: header row, then one row per age
        let mut sheet = Sheet::new("mortality_table");
        for (col, name) in OUTPUT_COLUMNS.iter().enumerate() {
            sheet.set_value(0, col as u32, *name);
        }

        let ages = self.dataframe.column("age")?.u32()?;
        for row in 0..self.dataframe.height() {
            let age = ages
                .get(row)
                .ok_or_else(|| LifeTableError::Load(format!("missing age at row {row}")))?;
            sheet.set_value(row as u32 + 1, 0, f64::from(age));

            for (col, name) in OUTPUT_COLUMNS.iter().enumerate().skip(1) {
                let value = self
                    .dataframe
                    .column(name)?
                    .f64()?
                    .get(row)
                    .unwrap_or(0.0);
                let rounded = if COUNT_COLUMNS.contains(name) {
                    value.round()
                } else {
                    (value * 1e6).round() / 1e6
                };
                sheet.set_value(row as u32 + 1, col as u32, rounded);
            }
        }
        book.push_sheet(sheet);

        // Summary sheet: one statistic per row
        let summary = self.summary()?;
        let mut summary_sheet = Sheet::new("summary");
        let entries: Vec<(&str, f64)> = vec![
            ("total age groups", summary.rows as f64),
            ("minimum age", f64::from(summary.min_age)),
            ("maximum age", f64::from(summary.max_age)),
            ("mean mortality rate", summary.mean_qx),
            ("highest mortality rate", summary.max_qx),
            ("age of highest mortality rate", f64::from(summary.max_qx_age)),
            (
                "lowest mortality rate (>0)",
                summary.min_positive_qx.unwrap_or(0.0),
            ),
            ("life expectancy at first age", summary.ex_at_min_age),
            ("median life expectancy", summary.median_ex),
        ];
        summary_sheet.set_value(0, 0, "statistic");
        summary_sheet.set_value(0, 1, "value");
        for (row, (label, value)) in entries.iter().enumerate() {
            summary_sheet.set_value(row as u32 + 1, 0, *label);
            summary_sheet.set_value(row as u32 + 1, 1, *value);
        }
        book.push_sheet(summary_sheet);

        spreadsheet_ods::write_ods(&mut book, path)
            .map_err(|e| LifeTableError::Load(format!("Failed to write ODS file '{path}': {e}")))
    }

    // ================================================
    // PRIVATE FUNCTIONS
    // ================================================

    fn get_value(&self, column_name: &str, x: u32) -> LifeTableResult<f64> {
        // Filter the DataFrame for the specified age
        let filtered_df = self
            .dataframe
            .clone()
            .lazy()
            .filter(col("age").eq(lit(x)))
            .collect()?;

        // Get the value from the specified column
        let series = filtered_df.column(column_name)?;
        let values = series.f64()?;
        if values.is_empty() {
            return Err(LifeTableError::AgeNotFound(x));
        }
        values.get(0).ok_or(LifeTableError::AgeNotFound(x))
    }
}
