//! Training-data side of the feature pipeline.
//!
//! Labelled account datasets are JSON arrays of flat objects (the five raw
//! counters, any extra numeric columns, and the `isFake` target). Rows get the
//! same three ratio columns the server computes, through the same [`ratio`].

use super::{
    ratio, FOLLOWERS_FOLLOWING_RATIO, FOLLOWERS_MEDIA_RATIO, FOLLOWER_COUNT, FOLLOWING_COUNT,
    MEDIA_COUNT, USERNAME_DIGIT_COUNT, USERNAME_DIGIT_RATIO, USERNAME_LENGTH,
};
use serde_json::{Map, Number, Value};
use std::path::Path;

pub use crate::error::DatasetError;

/// Label column; never part of the feature columns.
pub const TARGET_COLUMN: &str = "isFake";

pub type Row = Map<String, Value>;

/// Engineered rows and the feature-column order a model trained on them expects.
#[derive(Debug, Clone)]
pub struct EngineeredDataset {
    pub columns: Vec<String>,
    pub rows: Vec<Row>,
}

/// Read one dataset file.
pub fn load_rows(path: &Path) -> Result<Vec<Row>, DatasetError> {
    let data = std::fs::read_to_string(path).map_err(|source| DatasetError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&data).map_err(|source| DatasetError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

fn numeric(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        _ => None,
    }
}

fn column(row: &Row, index: usize, name: &'static str) -> Result<f64, DatasetError> {
    row.get(name)
        .and_then(numeric)
        .ok_or(DatasetError::MissingColumn { row: index, column: name })
}

/// Append the ratio columns to one row in place.
pub fn engineer_row(row: &mut Row, index: usize) -> Result<(), DatasetError> {
    let followers = column(row, index, FOLLOWER_COUNT)?;
    let following = column(row, index, FOLLOWING_COUNT)?;
    let media = column(row, index, MEDIA_COUNT)?;
    let digits = column(row, index, USERNAME_DIGIT_COUNT)?;
    let length = column(row, index, USERNAME_LENGTH)?;

    for (name, value) in [
        (FOLLOWERS_FOLLOWING_RATIO, ratio(followers, following)),
        (FOLLOWERS_MEDIA_RATIO, ratio(followers, media)),
        (USERNAME_DIGIT_RATIO, ratio(digits, length)),
    ] {
        let n = Number::from_f64(value).ok_or(DatasetError::NonFinite { row: index, column: name })?;
        row.insert(name.to_string(), Value::Number(n));
    }
    Ok(())
}

/// Engineer every row and derive the feature-column order: every column
/// except [`TARGET_COLUMN`], in first-seen order.
pub fn engineer_dataset(mut rows: Vec<Row>) -> Result<EngineeredDataset, DatasetError> {
    let mut columns: Vec<String> = Vec::new();
    for (i, row) in rows.iter_mut().enumerate() {
        engineer_row(row, i)?;
        for key in row.keys() {
            if key != TARGET_COLUMN && !columns.iter().any(|c| c == key) {
                columns.push(key.clone());
            }
        }
    }
    Ok(EngineeredDataset { columns, rows })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::{engineer, RawAccountFeatures};
    use serde_json::json;

    fn rows(value: Value) -> Vec<Row> {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn ratios_match_serving_path_bit_for_bit() {
        let ds = engineer_dataset(rows(json!([{
            "userFollowerCount": 200, "userFollowingCount": 180, "userMediaCount": 30,
            "usernameDigitCount": 5, "usernameLength": 15, "isFake": 0
        }])))
        .unwrap();
        let served = engineer(&RawAccountFeatures {
            follower_count: 200,
            following_count: 180,
            media_count: 30,
            username_digit_count: 5,
            username_length: 15,
        });
        let row = &ds.rows[0];
        assert_eq!(
            row["followers_following_ratio"].as_f64().unwrap().to_bits(),
            served.followers_following_ratio.to_bits()
        );
        assert_eq!(
            row["followers_media_ratio"].as_f64().unwrap().to_bits(),
            served.followers_media_ratio.to_bits()
        );
        assert_eq!(row["username_digit_ratio"].as_f64().unwrap(), 0.3125);
    }

    #[test]
    fn columns_keep_first_seen_order_and_drop_target() {
        let ds = engineer_dataset(rows(json!([
            {
                "userFollowerCount": 1, "userFollowingCount": 2, "userBiographyLength": 0,
                "userMediaCount": 3, "userHasProfilPic": true, "userIsPrivate": false,
                "usernameDigitCount": 0, "usernameLength": 8, "isFake": 1
            },
            {
                "userFollowerCount": 1, "userFollowingCount": 2, "userMediaCount": 3,
                "usernameDigitCount": 0, "usernameLength": 8, "isFake": 0, "extra": 4
            }
        ])))
        .unwrap();
        assert_eq!(
            ds.columns,
            vec![
                "userFollowerCount",
                "userFollowingCount",
                "userBiographyLength",
                "userMediaCount",
                "userHasProfilPic",
                "userIsPrivate",
                "usernameDigitCount",
                "usernameLength",
                "followers_following_ratio",
                "followers_media_ratio",
                "username_digit_ratio",
                "extra",
            ]
        );
        assert_eq!(ds.rows.len(), 2);
    }

    #[test]
    fn missing_raw_column_is_reported_with_row_index() {
        let err = engineer_dataset(rows(json!([
            {"userFollowerCount": 1, "userFollowingCount": 2, "userMediaCount": 3,
             "usernameDigitCount": 0, "usernameLength": 8},
            {"userFollowerCount": 1, "userFollowingCount": "many", "userMediaCount": 3,
             "usernameDigitCount": 0, "usernameLength": 8}
        ])))
        .unwrap_err();
        assert!(matches!(
            err,
            DatasetError::MissingColumn { row: 1, column: "userFollowingCount" }
        ));
    }

    #[test]
    fn load_rows_reads_json_array() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("real.json");
        std::fs::write(
            &path,
            r#"[{"userFollowerCount": 5, "userFollowingCount": 1, "userMediaCount": 0,
                 "usernameDigitCount": 1, "usernameLength": 4, "isFake": 0}]"#,
        )
        .unwrap();
        assert_eq!(load_rows(&path).unwrap().len(), 1);
        assert!(matches!(
            load_rows(&dir.path().join("missing.json")),
            Err(DatasetError::Io { .. })
        ));
    }
}
