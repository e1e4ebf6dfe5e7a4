//! # Lifetable Basic Usage Example
//!
//! Demonstrates the full workflow: build sample data, generate a complete
//! life table, look up values, print summary statistics and save the
//! result as an ODS workbook.
//!
//! Run with `RUST_LOG=warn` (or `debug`) to see the library's diagnostics.

use lifetable::prelude::*;

fn main() -> LifeTableResult<()> {
    env_logger::init();

    println!("Lifetable Basic Usage Example");
    println!("=============================");
    println!();

    // Generate sample mortality data: rates only, ages 0-100
    println!("Building quadratic-law sample data (rates only)...");
    let raw = RawTable::from_quadratic_law()
        .omega(100)
        .shape(SampleShape::RatesOnly)
        .call()?;
    println!("Raw input: {} rows, columns {:?}", raw.dataframe.height(), raw.dataframe.get_column_names());

    // Configure and run the generation pipeline
    println!("\nGenerating the complete life table (radix 100,000)...");
    let table = LifeTableConfig::builder()
        .data(raw)
        .radix(100_000)
        .build()?
        .generate()?;

    println!("\nFirst rows of the completed table:");
    println!("{}", table.dataframe.head(Some(10)));

    // Per-age lookups via the builder accessors
    println!("\n=== Lookups ===");
    let l65 = table.lx().x(65).call()?;
    let q65 = table.qx().x(65).call()?;
    let e65 = table.ex().x(65).call()?;
    println!("Survivors to 65 (l₆₅): {l65:.0}");
    println!("Mortality rate at 65 (q₆₅): {q65:.6}");
    println!("Life expectancy at 65 (e₆₅): {e65:.2} years");

    // Headline statistics
    println!("\n=== Summary ===");
    let summary = table.summary()?;
    println!("Ages covered: {}-{}", summary.min_age, summary.max_age);
    println!("Mean mortality rate: {:.6}", summary.mean_qx);
    println!(
        "Highest mortality rate: {:.6} (age {})",
        summary.max_qx, summary.max_qx_age
    );
    println!("Life expectancy at age {}: {:.2} years", summary.min_age, summary.ex_at_min_age);
    println!("Median life expectancy: {:.2} years", summary.median_ex);

    // Persist as a spreadsheet
    let output = std::env::temp_dir().join("mortality_table.ods");
    let output = output.to_str().expect("temp path is valid UTF-8");
    table.write_ods(output)?;
    println!("\nSaved completed table to {output}");

    println!("\n✓ Table generated, queried, summarized and saved!");
    Ok(())
}
