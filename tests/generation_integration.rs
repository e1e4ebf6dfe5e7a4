//! # Integration Tests for Life-Table Generation
//!
//! Exercises the full pipeline through the prelude: raw data in, completed
//! eight-column table out, with the classical life-table identities
//! holding across the result.

use approx::assert_abs_diff_eq;
use lifetable::prelude::*;
use polars::df;

fn f64_column(df: &DataFrame, name: &str) -> Vec<f64> {
    df.column(name)
        .unwrap()
        .f64()
        .unwrap()
        .into_no_null_iter()
        .collect()
}

fn generate_sample_table() -> LifeTable {
    let raw = RawTable::from_quadratic_law()
        .omega(100)
        .shape(SampleShape::RatesOnly)
        .call()
        .expect("Failed to build sample data");

    LifeTableConfig::builder()
        .data(raw)
        .radix(100_000)
        .build()
        .expect("Failed to build config")
        .generate()
        .expect("Failed to generate table")
}

#[test]
fn test_prelude_imports_cover_public_surface() {
    // Types reachable through a single use statement
    let _config_type = std::any::type_name::<LifeTableConfig>();
    let _table_type = std::any::type_name::<LifeTable>();
    let _summary_type = std::any::type_name::<TableSummary>();
    let _raw_type = std::any::type_name::<RawTable>();
    let _shape = SampleShape::RatesOnly;
    let _df_type = std::any::type_name::<DataFrame>();
    let _result_type = std::any::type_name::<PolarsResult<f64>>();

    // The convenience macro is re-exported too
    let raw = rawdf! {
        "age" => [0u32, 1],
        "qx" => [0.01, 0.02],
    };
    assert!(raw.is_ok());
}

#[test]
fn test_rates_only_input_end_to_end() {
    // Rates in, everything else derived: lx follows the radix and the
    // death counts row by row
    let df = df! {
        "age" => [0u32, 1],
        "qx" => [0.01, 0.02],
    }
    .unwrap();

    let table = LifeTableConfig::builder()
        .data(RawTable::from_df(df).unwrap())
        .radix(100_000)
        .build()
        .unwrap()
        .generate()
        .unwrap();

    assert_abs_diff_eq!(table.lx().x(0).call().unwrap(), 100_000.0);
    assert_abs_diff_eq!(table.dx().x(0).call().unwrap(), 1_000.0);
    assert_abs_diff_eq!(table.lx().x(1).call().unwrap(), 99_000.0);
    assert_abs_diff_eq!(table.dx().x(1).call().unwrap(), 1_980.0);
}

#[test]
fn test_counts_only_input_derives_rate() {
    // Survivors and deaths in, rate out: q₀ = 500 / 100000
    let df = df! {
        "age" => [0u32],
        "lx" => [100_000.0],
        "dx" => [500.0],
        "qx" => [None::<f64>],
    }
    .unwrap();

    let table = LifeTableConfig::builder()
        .data(RawTable::from_df(df).unwrap())
        .build()
        .unwrap()
        .generate()
        .unwrap();

    assert_abs_diff_eq!(table.qx().x(0).call().unwrap(), 0.005);
}

#[test]
fn test_missing_rate_column_is_fatal() {
    let df = df! {
        "age" => [0u32, 1],
        "lx" => [100_000.0, 99_000.0],
    }
    .unwrap();

    let err = LifeTableConfig::builder()
        .data(RawTable::from_df(df).unwrap())
        .build()
        .unwrap()
        .generate()
        .unwrap_err();

    assert!(matches!(
        err,
        LifeTableError::MissingRequiredColumn { field: "qx", .. }
    ));
}

#[test]
fn test_turkish_headers_normalize() {
    // The original data sources label the age column "yaş"
    let df = df! {
        "Yaş" => [0u32, 1],
        "q(x)" => [0.10, 1.0],
    }
    .unwrap();

    let table = LifeTableConfig::builder()
        .data(RawTable::from_df(df).unwrap())
        .radix(1_000)
        .build()
        .unwrap()
        .generate()
        .unwrap();

    assert_abs_diff_eq!(table.lx().x(1).call().unwrap(), 900.0);
}

#[test]
fn test_final_row_certain_death() {
    let df = df! {
        "age" => [99u32],
        "lx" => [1_000.0],
        "qx" => [1.0],
    }
    .unwrap();

    let table = LifeTableConfig::builder()
        .data(RawTable::from_df(df).unwrap())
        .build()
        .unwrap()
        .generate()
        .unwrap();

    assert_abs_diff_eq!(table.dx().x(99).call().unwrap(), 1_000.0);
    assert_abs_diff_eq!(table.Lx().x(99).call().unwrap(), 500.0);
    assert_abs_diff_eq!(table.Tx().x(99).call().unwrap(), 500.0);
    assert_abs_diff_eq!(table.ex().x(99).call().unwrap(), 0.5);
}

#[test]
fn test_extinct_cohort_stays_finite() {
    // Once lx reaches 0, expectancy is defined as 0 and nothing downstream
    // may turn into NaN or infinity
    let df = df! {
        "age" => [0u32, 1, 2],
        "qx" => [1.0, 0.5, 0.5],
    }
    .unwrap();

    let table = LifeTableConfig::builder()
        .data(RawTable::from_df(df).unwrap())
        .radix(1_000)
        .build()
        .unwrap()
        .generate()
        .unwrap();

    assert_abs_diff_eq!(table.lx().x(1).call().unwrap(), 0.0);
    assert_abs_diff_eq!(table.ex().x(1).call().unwrap(), 0.0);

    for name in ["lx", "qx", "dx", "px", "Lx", "Tx", "ex"] {
        for value in f64_column(&table.dataframe, name) {
            assert!(value.is_finite(), "column {name} leaked a non-finite value");
        }
    }
}

#[test]
fn test_survivors_never_increase() {
    let table = generate_sample_table();
    let lx = f64_column(&table.dataframe, "lx");

    for pair in lx.windows(2) {
        assert!(
            pair[1] <= pair[0] + 1e-9,
            "lx increased from {} to {}",
            pair[0],
            pair[1]
        );
    }
}

#[test]
fn test_rates_and_complements_stay_bounded() {
    let table = generate_sample_table();
    let qx = f64_column(&table.dataframe, "qx");
    let px = f64_column(&table.dataframe, "px");

    for (q, p) in qx.iter().zip(px.iter()) {
        assert!((0.0..=1.0).contains(q));
        assert!((0.0..=1.0).contains(p));
        assert_abs_diff_eq!(q + p, 1.0, epsilon = 1e-12);
    }
}

#[test]
fn test_deaths_consistent_with_rates() {
    // dx ≈ lx · qx for derived rows
    let table = generate_sample_table();
    let lx = f64_column(&table.dataframe, "lx");
    let qx = f64_column(&table.dataframe, "qx");
    let dx = f64_column(&table.dataframe, "dx");

    for i in 0..lx.len() {
        if lx[i] > 0.0 && dx[i] > 0.0 {
            assert_abs_diff_eq!(dx[i], lx[i] * qx[i], epsilon = 1e-6);
        }
    }
}

#[test]
fn test_total_person_years_is_suffix_sum() {
    let table = generate_sample_table();
    let big_lx = f64_column(&table.dataframe, "Lx");
    let big_tx = f64_column(&table.dataframe, "Tx");
    let n = big_lx.len();

    assert_abs_diff_eq!(big_tx[n - 1], big_lx[n - 1], epsilon = 1e-9);
    for i in 0..n - 1 {
        assert_abs_diff_eq!(big_tx[i], big_lx[i] + big_tx[i + 1], epsilon = 1e-6);
    }

    // Spot-check against the explicit definition at an interior age
    let mid = n / 2;
    let tail: f64 = big_lx[mid..].iter().sum();
    assert_abs_diff_eq!(big_tx[mid], tail, epsilon = 1e-6);
}

#[test]
fn test_regeneration_is_stable() {
    // The derived functions are pure in the base columns: feeding a
    // completed table back through the pipeline changes nothing
    let first = generate_sample_table();

    let again = first
        .dataframe
        .select(["age", "lx", "qx", "dx"])
        .unwrap();
    let second = LifeTableConfig::builder()
        .data(RawTable::from_df(again).unwrap())
        .radix(100_000)
        .build()
        .unwrap()
        .generate()
        .unwrap();

    for name in ["lx", "qx", "dx", "px", "Lx", "Tx", "ex"] {
        let a = f64_column(&first.dataframe, name);
        let b = f64_column(&second.dataframe, name);
        for (x, y) in a.iter().zip(b.iter()) {
            assert_abs_diff_eq!(x, y, epsilon = 1e-9);
        }
    }
}

#[test]
fn test_unordered_input_rows_sort_by_age() {
    let df = df! {
        "age" => [2u32, 0, 1],
        "qx" => [0.03, 0.01, 0.02],
    }
    .unwrap();

    let table = LifeTableConfig::builder()
        .data(RawTable::from_df(df).unwrap())
        .radix(1_000)
        .build()
        .unwrap()
        .generate()
        .unwrap();

    let ages: Vec<u32> = table
        .dataframe
        .column("age")
        .unwrap()
        .u32()
        .unwrap()
        .into_no_null_iter()
        .collect();
    assert_eq!(ages, vec![0, 1, 2]);
    assert_abs_diff_eq!(table.lx().x(1).call().unwrap(), 990.0);
}

#[test]
fn test_duplicate_ages_rejected() {
    let df = df! {
        "age" => [0u32, 1, 1],
        "qx" => [0.01, 0.02, 0.03],
    }
    .unwrap();

    let err = LifeTableConfig::builder()
        .data(RawTable::from_df(df).unwrap())
        .build()
        .unwrap()
        .generate()
        .unwrap_err();

    assert!(matches!(err, LifeTableError::InvalidRowData { .. }));
}

#[test]
fn test_summary_of_sample_table() {
    let table = generate_sample_table();
    let summary = table.summary().unwrap();

    assert_eq!(summary.rows, 101);
    assert_eq!(summary.min_age, 0);
    assert_eq!(summary.max_age, 100);
    // The quadratic curve peaks at the last age
    assert_eq!(summary.max_qx_age, 100);
    assert_abs_diff_eq!(summary.max_qx, 0.107, epsilon = 1e-12);
    assert!(summary.ex_at_min_age > 0.0);
}
