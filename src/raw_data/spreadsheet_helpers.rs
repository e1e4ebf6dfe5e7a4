use crate::LifeTableResult;
use calamine::{Data, Range};
use spreadsheet_ods::Value;

// Blank cells must stay distinguishable from zero all the way into the
// normalizer, so every parser here yields Option<f64> with None for empty.

// ========= ODS - Using spreadsheet_ods =========

pub fn parse_ods_headers(
    sheet: &spreadsheet_ods::Sheet,
    header_row: u32, // Base 0 - identify which row is header
) -> LifeTableResult<Vec<String>> {
    let mut column_names = Vec::new();
    let mut col = 0;

    loop {
        let cell_value = sheet.value(header_row, col);
        let col_name = match cell_value {
            // Trim only - the normalizer matches labels case-insensitively,
            // and lowercasing here would collapse "lx" and "Lx" into
            // duplicate column names
            Value::Text(s) if !s.trim().is_empty() => s.trim().to_string(),
            Value::Empty => break,
            // Convert every other type to string
            Value::Number(f) => f.to_string(),
            Value::DateTime(dt) => format!("{dt:?}"),
            Value::Boolean(b) => b.to_string(),
            _ => String::new(),
        };
        column_names.push(col_name);
        col += 1;
    }

    Ok(column_names)
}

pub fn parse_ods_data(
    sheet: &spreadsheet_ods::Sheet,
    start_row: usize,
    ncols: usize,
) -> LifeTableResult<Vec<Vec<Option<f64>>>> {
    // Initialize columns as Vec<Vec<Option<f64>>> for ncols
    let mut columns: Vec<Vec<Option<f64>>> = vec![Vec::new(); ncols];
    let mut row_num = start_row;

    loop {
        let mut row_vals = Vec::with_capacity(ncols);
        let mut has_data = false;

        for col in 0..ncols {
            let cell_value = sheet.value(row_num as u32, col as u32);
            let val = parse_ods_cell(cell_value, row_num + 1, &format!("col{col}"))?;
            if val.is_some() {
                has_data = true;
            }
            row_vals.push(val);
        }

        // If the whole row is empty, break
        if !has_data {
            break;
        }

        // Convert from row data to column data
        for (col, column) in columns.iter_mut().enumerate().take(ncols) {
            column.push(row_vals[col]);
        }

        row_num += 1;
    }

    Ok(columns)
}

/// Parse an ODS cell as an optional f64. Empty and blank-text cells are
/// absent, not zero.
pub fn parse_ods_cell(
    cell_value: &Value,
    row_num: usize,
    col_name: &str,
) -> LifeTableResult<Option<f64>> {
    match cell_value {
        Value::Number(f) => Ok(Some(*f)),
        Value::Text(s) => {
            if s.trim().is_empty() {
                Ok(None)
            } else {
                s.parse::<f64>().map(Some).map_err(|_| {
                    format!("Cannot parse {col_name} '{s}' at row {row_num} as number").into()
                })
            }
        }
        Value::Empty => Ok(None),
        other => Err(format!("Invalid {col_name} cell type {other:?} at row {row_num}").into()),
    }
}

// ========= XLSX - Using calamine =========

pub fn parse_excel_headers(
    range: &Range<Data>,
    start_row: usize, // Base 0
) -> LifeTableResult<Vec<String>> {
    // If the first cell in the header row is None, return error
    if range.get((start_row, 0)).is_none() {
        return Err("Header row is empty".into());
    }

    // Initialize
    let mut headers = Vec::new();
    let mut col = 0;

    loop {
        let cell = range.get((start_row, col));
        match cell {
            // Trim only - label case is the normalizer's concern
            Some(Data::String(s)) if !s.trim().is_empty() => headers.push(s.trim().to_string()),
            Some(Data::Empty) | None => return Ok(headers),
            Some(other) => headers.push(other.to_string()),
        }
        col += 1;
    }
}

pub fn parse_excel_data(
    range: &Range<Data>,
    start_row: usize,
    ncols: usize,
) -> LifeTableResult<Vec<Vec<Option<f64>>>> {
    // Initialize
    let mut columns: Vec<Vec<Option<f64>>> = vec![Vec::new(); ncols];
    let mut row_num = start_row; // Base 0

    // Loop until reaching a row where all cells are empty
    loop {
        let mut row_vals = Vec::with_capacity(ncols);
        let mut has_data = false; // Initialize as has no data

        for col in 0..ncols {
            let cell = range.get((row_num, col));
            let val = parse_excel_cell(cell, row_num + 1, &format!("col{col}"))?;

            // There might be columns empty while others are not - turn to true once there is a value
            if val.is_some() {
                has_data = true;
            }

            // Push the data row by row
            row_vals.push(val);
        }

        // This occurs when a whole row is empty
        if !has_data {
            break;
        }

        // Convert from row data to column data
        for (col, column) in columns.iter_mut().enumerate().take(ncols) {
            column.push(row_vals[col]);
        }

        row_num += 1;
    }

    // Return the columns
    Ok(columns)
}

/// Parse a calamine cell as an optional f64. Used for both XLS and XLSX
/// formats; missing cells past the used range read as absent.
fn parse_excel_cell(
    cell: Option<&Data>,
    row_num: usize,
    col_name: &str,
) -> LifeTableResult<Option<f64>> {
    match cell {
        Some(Data::Float(f)) => Ok(Some(*f)),
        Some(Data::Int(v)) => Ok(Some(*v as f64)),
        Some(Data::String(s)) => {
            if s.trim().is_empty() {
                Ok(None)
            } else {
                s.parse::<f64>().map(Some).map_err(|_| {
                    format!("Cannot parse {col_name} '{s}' at row {row_num} as number").into()
                })
            }
        }
        Some(Data::Empty) | None => Ok(None),
        Some(other) => {
            Err(format!("Invalid {col_name} cell type {other:?} at row {row_num}").into())
        }
    }
}

// ================================================
// UNIT TESTS
// ================================================
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_excel_cell_blank_is_absent() {
        let blank = Data::String("   ".to_string());
        assert_eq!(parse_excel_cell(Some(&blank), 1, "qx").unwrap(), None);
        assert_eq!(parse_excel_cell(Some(&Data::Empty), 1, "qx").unwrap(), None);
        assert_eq!(parse_excel_cell(None, 1, "qx").unwrap(), None);
    }

    #[test]
    fn test_parse_excel_cell_numeric_forms() {
        assert_eq!(
            parse_excel_cell(Some(&Data::Float(0.01)), 1, "qx").unwrap(),
            Some(0.01)
        );
        assert_eq!(
            parse_excel_cell(Some(&Data::Int(42)), 1, "age").unwrap(),
            Some(42.0)
        );
        assert_eq!(
            parse_excel_cell(Some(&Data::String("0.5".into())), 1, "qx").unwrap(),
            Some(0.5)
        );
    }

    #[test]
    fn test_parse_excel_cell_rejects_text() {
        let cell = Data::String("not a number".to_string());
        assert!(parse_excel_cell(Some(&cell), 3, "lx").is_err());
    }

    #[test]
    fn test_parse_ods_cell_blank_is_absent() {
        assert_eq!(parse_ods_cell(&Value::Empty, 1, "dx").unwrap(), None);
        assert_eq!(
            parse_ods_cell(&Value::Text(" ".into()), 1, "dx").unwrap(),
            None
        );
        assert_eq!(
            parse_ods_cell(&Value::Number(12.5), 1, "dx").unwrap(),
            Some(12.5)
        );
    }
}
