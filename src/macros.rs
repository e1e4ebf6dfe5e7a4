/// Macro to create a RawTable from inline columns.
/// Usage:
/// ```rust
/// # use lifetable::prelude::*;
/// let raw = rawdf! {
///     "age" => [0_u32, 1, 2],
///     "qx" => [0.010_f64, 0.012, 0.015],
/// };
/// # LifeTableResult::Ok(())
/// ```
#[macro_export]
macro_rules! rawdf {
    ($($name:expr => $val:expr),+ $(,)?) => {{
        use $crate::raw_data::RawTable;
        use polars::prelude::df;
        let df_result = df! { $($name => $val),+ };
        match df_result {
            Ok(df) => RawTable::from_df(df),
            Err(e) => Err(e.into()),
        }
    }};
}
