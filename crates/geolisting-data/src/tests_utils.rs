use polars::prelude::*;

pub fn assert_has_columns(df: &DataFrame, columns: &[&str]) {
    for name in columns {
        assert!(
            df.column(name).is_ok(),
            "Expected column `{name}` in {:?}",
            df.get_column_names()
        );
    }
}

pub fn assert_column_type(df: &DataFrame, column: &str, expected: &DataType) {
    let actual = df.column(column).unwrap().dtype();
    assert_eq!(
        actual, expected,
        "Column `{column}` has type {actual:?}, expected {expected:?}"
    );
}

pub fn assert_no_nulls_in_column(df: &DataFrame, column: &str) {
    let nulls = df.column(column).unwrap().null_count();
    assert_eq!(nulls, 0, "Column `{column}` has {nulls} null values");
}
