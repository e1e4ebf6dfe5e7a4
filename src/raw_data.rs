//! # Raw input data (RawTable)
//!
//! Loaders for the partial mortality data the generation pipeline consumes:
//! DataFrames, XLSX/ODS workbooks, remote workbooks, and parametric sample
//! data. A [`RawTable`] is deliberately loose — arbitrary column labels,
//! blank cells kept as nulls — because matching labels to canonical fields
//! and validating values is the normalizer's job, not the loader's.

pub mod spreadsheet_helpers;

use crate::error::LifeTableError;
use crate::raw_data::spreadsheet_helpers::*;
use crate::LifeTableResult;
use bon::bon;
use calamine::{open_workbook_auto, Data, Range, Reader, Xlsx};
use polars::prelude::*;
use spreadsheet_ods::read_ods;
use std::io::Cursor;

/// Shape of generated sample data, mirroring the common layouts of
/// published tables: rates only, rates plus survivor counts, or all three
/// base columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleShape {
    /// `age` and `qx` only - the simplest input.
    RatesOnly,

    /// `age`, `qx` and `lx` - the standard format.
    WithSurvivors,

    /// `age`, `qx`, `lx` and `dx` - fully populated.
    Complete,
}

/// Partial mortality data awaiting table generation.
///
/// Column labels are kept as loaded; the generation pipeline matches them
/// against the accepted synonyms per canonical field (see
/// [`crate::table_gen::normalize`]). Blank or missing cells are nulls, not
/// zeros.
#[derive(Debug, Clone)]
pub struct RawTable {
    /// Where the data came from, carried through to the generated table.
    pub source: String,
    pub dataframe: DataFrame,
}

#[bon]
impl RawTable {
    /// Create a new RawTable from a source description and a DataFrame.
    ///
    /// The DataFrame may have any column labels and any mix of present and
    /// null cells; it only has to contain at least one row and one column.
    ///
    /// # Errors
    /// - Empty DataFrame (no rows or no columns)
    pub fn new(source: String, dataframe: DataFrame) -> LifeTableResult<Self> {
        if dataframe.height() == 0 {
            return Err("Input data must contain at least one row".into());
        }
        if dataframe.width() == 0 {
            return Err("Input data must contain at least one column".into());
        }

        Ok(Self { source, dataframe })
    }

    /// Create a RawTable from an existing Polars DataFrame.
    ///
    /// # Examples
    /// ```rust
    /// # use lifetable::prelude::*;
    /// use polars::prelude::*;
    ///
    /// let df = df! {
    ///     "age" => [0u32, 1, 2],
    ///     "qx" => [0.01f64, 0.012, 0.015],
    /// }?;
    ///
    /// let raw = RawTable::from_df(df)?;
    /// assert_eq!(raw.dataframe.height(), 3);
    /// # LifeTableResult::Ok(())
    /// ```
    pub fn from_df(dataframe: DataFrame) -> LifeTableResult<Self> {
        Self::new("DataFrame input".to_string(), dataframe)
    }

    /// Load raw mortality data from an XLSX/XLS workbook sheet.
    ///
    /// Headers are taken from the first row (trimmed, case preserved);
    /// data rows are read until the first fully empty row. Blank cells
    /// stay absent.
    ///
    /// # Errors
    /// - File not found or not readable
    /// - Sheet not found or empty
    /// - Non-numeric text in a data cell
    ///
    /// # Examples
    /// ```rust, ignore
    /// # use lifetable::prelude::*;
    /// let raw = RawTable::from_xlsx("data/elt15.xlsx", "female")?;
    /// # LifeTableResult::Ok(())
    /// ```
    pub fn from_xlsx(xlsx_file_path_str: &str, sheet_name: &str) -> LifeTableResult<Self> {
        // Open workbook
        let mut workbook = open_workbook_auto(xlsx_file_path_str)
            .map_err(|e| format!("Failed to open XLSX file '{xlsx_file_path_str}': {e}"))?;

        // Identify range
        let range = workbook
            .worksheet_range(sheet_name)
            .map_err(|e| format!("Failed to read sheet '{sheet_name}': {e}"))?;

        let dataframe = df_from_workbook_range(&range, sheet_name)?;
        Self::new(
            format!("XLSX file '{xlsx_file_path_str}', sheet '{sheet_name}'"),
            dataframe,
        )
    }

    /// Load raw mortality data from an ODS workbook sheet.
    ///
    /// Same header and blank-cell conventions as [`RawTable::from_xlsx`].
    ///
    /// # Errors
    /// - File not found or invalid ODS format
    /// - Sheet not found or empty
    /// - Non-numeric text in a data cell
    pub fn from_ods(ods_file_path_str: &str, sheet_name: &str) -> LifeTableResult<Self> {
        // Open ODS workbook
        let workbook = read_ods(ods_file_path_str)
            .map_err(|e| format!("Failed to open ODS file '{ods_file_path_str}': {e}"))?;

        // Find the sheet by name - iterate through sheets to find by name
        let mut sheet = None;
        for i in 0..workbook.num_sheets() {
            let current_sheet = workbook.sheet(i);
            if current_sheet.name() == sheet_name {
                sheet = Some(current_sheet);
                break;
            }
        }

        let sheet = sheet.ok_or_else(|| format!("Sheet '{sheet_name}' not found in ODS file"))?;

        // Check if sheet is empty
        let (max_row, _) = sheet.used_grid_size();
        if max_row < 1 {
            return Err(format!("Sheet '{sheet_name}' is empty").into());
        }

        // Parse headers, then extract all the data
        let headers = parse_ods_headers(sheet, 0)?;
        let data_cols = parse_ods_data(sheet, 1, headers.len())?;

        let dataframe = df_from_columns(&headers, &data_cols, sheet_name)?;
        Self::new(
            format!("ODS file '{ods_file_path_str}', sheet '{sheet_name}'"),
            dataframe,
        )
    }

    /// Download an XLSX workbook and load raw mortality data from one of
    /// its sheets.
    ///
    /// Requires an internet connection; the URL must return a valid XLSX
    /// body.
    ///
    /// # Errors
    /// - Network connectivity issues
    /// - HTTP request failures (4xx, 5xx status codes)
    /// - Invalid workbook body, missing sheet, or non-numeric data cells
    ///
    /// # Examples
    /// ```rust, ignore
    /// # use lifetable::prelude::*;
    /// let url = "https://example.org/tables/national_life_table.xlsx";
    /// let raw = RawTable::from_url(url, "Sheet1")?;
    /// # LifeTableResult::Ok(())
    /// ```
    pub fn from_url(url: &str, sheet_name: &str) -> LifeTableResult<Self> {
        // Fetch the workbook body from the URL
        let response = reqwest::blocking::get(url)
            .map_err(|e| format!("Failed to fetch workbook from '{url}': {e}"))?;

        if !response.status().is_success() {
            return Err(format!("Failed to fetch workbook from '{url}': HTTP {}", response.status()).into());
        }

        let body = response
            .bytes()
            .map_err(|e| format!("Failed to read workbook body from '{url}': {e}"))?;

        // Parse the in-memory workbook with calamine
        let mut workbook = Xlsx::new(Cursor::new(body.to_vec()))
            .map_err(|e| format!("Invalid XLSX body from '{url}': {e}"))?;

        let range = workbook
            .worksheet_range(sheet_name)
            .map_err(|e| format!("Failed to read sheet '{sheet_name}': {e}"))?;

        let dataframe = df_from_workbook_range(&range, sheet_name)?;
        Self::new(format!("URL '{url}', sheet '{sheet_name}'"), dataframe)
    }

    /// Generate sample mortality data from a quadratic rate curve.
    ///
    /// The mortality rate grows quadratically with age:
    /// ```text
    /// qₓ = min(0.95, 0.007 + (x/100)² · 0.1)
    /// ```
    /// Useful for demos and tests when no published table is at hand. The
    /// `shape` parameter controls which base columns are emitted; shapes
    /// with survivor counts truncate them to whole lives, as a published
    /// table would.
    ///
    /// # Parameters
    /// - `start_age`: first age of the table (default: 0).
    /// - `omega`: last age of the table (default: 100).
    /// - `radix`: survivor count at the first age (default: 100,000).
    /// - `shape`: which columns to emit (default: `RatesOnly`).
    ///
    /// # Errors
    /// - `omega` must not be below `start_age`; `radix` must be positive.
    ///
    /// # Examples
    /// ```rust
    /// # use lifetable::prelude::*;
    /// let raw = RawTable::from_quadratic_law()
    ///     .start_age(0)
    ///     .omega(100)
    ///     .shape(SampleShape::WithSurvivors)
    ///     .call()?;
    /// assert_eq!(raw.dataframe.height(), 101);
    /// # LifeTableResult::Ok(())
    /// ```
    #[builder]
    pub fn from_quadratic_law(
        #[builder(default = 0)] start_age: u32,
        #[builder(default = 100)] omega: u32, // end_age
        #[builder(default = 100_000)] radix: u32,
        #[builder(default = SampleShape::RatesOnly)] shape: SampleShape,
    ) -> LifeTableResult<Self> {
        // Quadratic rate curve:
        // qₓ = min(0.95, 0.007 + (x/100)² · 0.1)

        // Validate
        if omega < start_age {
            return Err("omega must not be below start_age".into());
        }
        if radix == 0 {
            return Err("radix must be positive".into());
        }

        let ages: Vec<u32> = (start_age..=omega).collect();
        let qx: Vec<f64> = ages
            .iter()
            .map(|&x| f64::min(0.95, 0.007 + (x as f64 / 100.0).powi(2) * 0.1))
            .collect();

        let source = "Quadratic-law sample data".to_string();

        if shape == SampleShape::RatesOnly {
            let data = df! {
                "age" => &ages,
                "qx" => &qx,
            }?;
            return Self::new(source, data);
        }

        // Survivor counts truncated to whole lives; at the final age the
        // remaining cohort dies.
        let n = ages.len();
        let mut lx: Vec<f64> = vec![f64::from(radix)];
        let mut dx: Vec<f64> = Vec::with_capacity(n);
        for i in 0..n {
            if i > 0 {
                let next = (lx[i - 1] - dx[i - 1]).max(0.0);
                lx.push(next);
            }
            let deaths = if i < n - 1 {
                (lx[i] * qx[i]).floor()
            } else {
                lx[i]
            };
            dx.push(deaths);
        }

        let data = match shape {
            SampleShape::WithSurvivors => df! {
                "age" => &ages,
                "qx" => &qx,
                "lx" => &lx,
            }?,
            _ => df! {
                "age" => &ages,
                "qx" => &qx,
                "lx" => &lx,
                "dx" => &dx,
            }?,
        };

        Self::new(source, data)
    }
}

// ================================================
// PRIVATE FUNCTIONS
// ================================================

/// Build a DataFrame from a calamine worksheet range: header row first,
/// then data rows until the first fully empty row.
fn df_from_workbook_range(range: &Range<Data>, sheet_name: &str) -> LifeTableResult<DataFrame> {
    // Check if range is empty
    if range.is_empty() {
        return Err(format!("Sheet '{sheet_name}' is empty").into());
    }

    // Extract headers, then extract all the data
    let headers = parse_excel_headers(range, 0)?;
    let data_cols = parse_excel_data(range, 1, headers.len())?;

    df_from_columns(&headers, &data_cols, sheet_name)
}

/// Assemble named Option<f64> columns into a DataFrame, keeping nulls.
fn df_from_columns(
    headers: &[String],
    data_cols: &[Vec<Option<f64>>],
    sheet_name: &str,
) -> LifeTableResult<DataFrame> {
    // Validate that we have data
    if data_cols.is_empty() || data_cols[0].is_empty() {
        return Err(format!("No data rows found in sheet '{sheet_name}'").into());
    }

    let mut columns = Vec::new();
    for (col_name, data_col) in headers.iter().zip(data_cols.iter()) {
        // Build Series as nullable f64
        let series = Series::new(col_name.into(), data_col.clone());
        columns.push(series.into_column());
    }

    DataFrame::new(columns).map_err(LifeTableError::from)
}
