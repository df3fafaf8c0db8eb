//! Sample scatterplot: one circle per sample, colored by a metadata category.

use crate::data::{AbundanceTable, ColumnType, SampleMetadata};
use crate::error::{Result, RrvError};
use crate::plot::{ColumnTokens, COL_NAMES_DATASET, SAMPLE_DATA_NAME, VEGA_LITE_SCHEMA};
use serde_json::{json, Value};

// The unified column list starts with the sample ID, the balance, and the
// chosen category, so their tokens are fixed by position.
const INDEX_TOKEN: &str = "0";
const BALANCE_TOKEN: &str = "1";
const CATEGORY_TOKEN: &str = "2";

/// Build the sample plot document.
///
/// Each record joins a sample's metadata category value with its feature
/// abundances; samples absent from the metadata are dropped, samples with a
/// missing category value are kept with a `null`. The balance starts out
/// `null` for every sample — the front end computes real log ratios from
/// the features selected in the rank plot.
///
/// Record fields are token-compressed by [`ColumnTokens`]; the reverse
/// mapping ships in the document under the `rankratioviz_col_names`
/// dataset entry. A `color_scheme`, when given, names a Vega color scheme
/// for the categorical color scale.
pub fn sample_plot(
    table: &AbundanceTable,
    metadata: &SampleMetadata,
    category: &str,
    color_scheme: Option<&str>,
) -> Result<Value> {
    let category_type = metadata
        .column_type(category)
        .ok_or_else(|| RrvError::MissingColumn(category.to_string()))?;
    let x_type = match category_type {
        ColumnType::Int | ColumnType::Float => "quantitative",
        ColumnType::Str => "nominal",
    };

    let mut columns: Vec<&str> = vec!["index", crate::plot::BALANCE_COLUMN, category];
    columns.extend(table.feature_ids().iter().map(|f| f.as_str()));
    let tokens = ColumnTokens::from_columns(columns)?;

    let mut records: Vec<Value> = Vec::new();
    for (sample_idx, sample_id) in table.sample_ids().iter().enumerate() {
        if !metadata.has_sample(sample_id) {
            continue;
        }
        let mut record = serde_json::Map::new();
        record.insert(INDEX_TOKEN.to_string(), Value::String(sample_id.clone()));
        record.insert(BALANCE_TOKEN.to_string(), Value::Null);
        let category_value = metadata
            .get(sample_id, category)
            .map(|v| v.to_json())
            .unwrap_or(Value::Null);
        record.insert(CATEGORY_TOKEN.to_string(), category_value);
        for feature_idx in 0..table.n_features() {
            record.insert(
                (feature_idx + 3).to_string(),
                json!(table.get(sample_idx, feature_idx)),
            );
        }
        records.push(Value::Object(record));
    }

    let mut datasets = serde_json::Map::new();
    datasets.insert(SAMPLE_DATA_NAME.to_string(), Value::Array(records));
    datasets.insert(COL_NAMES_DATASET.to_string(), tokens.to_json());

    let mut spec = json!({
        "$schema": VEGA_LITE_SCHEMA,
        "config": {"view": {"width": 400, "height": 300}},
        "data": {"name": SAMPLE_DATA_NAME},
        "encoding": {
            "color": {"field": CATEGORY_TOKEN, "title": category, "type": "nominal"},
            "tooltip": [{"field": INDEX_TOKEN, "type": "nominal"}],
            "x": {"field": CATEGORY_TOKEN, "title": category, "type": x_type},
            "y": {
                "field": BALANCE_TOKEN,
                "title": "log(Numerator / Denominator)",
                "type": "quantitative"
            }
        },
        "mark": "circle",
        "title": "Log Ratio of Abundances in Samples"
    });
    spec["datasets"] = Value::Object(datasets);
    if let Some(scheme) = color_scheme {
        spec["encoding"]["color"]["scale"] = json!({"scheme": scheme});
    }
    Ok(spec)
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::DMatrix;

    fn create_test_table(samples: &[&str], features: &[&str], values: &[f64]) -> AbundanceTable {
        let data = DMatrix::from_row_slice(samples.len(), features.len(), values);
        AbundanceTable::new(
            data,
            samples.iter().map(|s| s.to_string()).collect(),
            features.iter().map(|f| f.to_string()).collect(),
        )
        .unwrap()
    }

    #[test]
    fn test_sample_plot_document() {
        let table = create_test_table(&["S1", "S2"], &["F1", "F2"], &[1.0, 2.0, 3.0, 4.0]);
        let metadata = SampleMetadata::from_reader(
            "ID\tBodySite\nS1\tgut\nS2\ttongue".as_bytes(),
        )
        .unwrap();

        let spec = sample_plot(&table, &metadata, "BodySite", None).unwrap();

        assert_eq!(spec["$schema"], VEGA_LITE_SCHEMA);
        assert_eq!(spec["title"], "Log Ratio of Abundances in Samples");
        assert_eq!(spec["mark"], "circle");
        assert_eq!(spec["data"]["name"], "sample_data");

        let col_names = &spec["datasets"]["rankratioviz_col_names"];
        assert_eq!(col_names["index"], "0");
        assert_eq!(col_names["rankratioviz_balance"], "1");
        assert_eq!(col_names["BodySite"], "2");
        assert_eq!(col_names["F1"], "3");
        assert_eq!(col_names["F2"], "4");

        let records = spec["datasets"]["sample_data"].as_array().unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0]["0"], "S1");
        assert!(records[0]["1"].is_null());
        assert_eq!(records[0]["2"], "gut");
        assert_eq!(records[0]["3"], 1.0);
        assert_eq!(records[0]["4"], 2.0);
        assert_eq!(records[1]["0"], "S2");
        assert_eq!(records[1]["3"], 3.0);

        assert_eq!(spec["encoding"]["x"]["field"], "2");
        assert_eq!(spec["encoding"]["x"]["title"], "BodySite");
        assert_eq!(spec["encoding"]["x"]["type"], "nominal");
        assert_eq!(spec["encoding"]["y"]["field"], "1");
        assert_eq!(
            spec["encoding"]["y"]["title"],
            "log(Numerator / Denominator)"
        );
        assert_eq!(spec["encoding"]["color"]["type"], "nominal");
        assert!(spec["encoding"]["color"]["scale"].is_null());
        assert_eq!(spec["encoding"]["tooltip"][0]["field"], "0");
    }

    #[test]
    fn test_numeric_category_is_quantitative() {
        let table = create_test_table(&["S1", "S2"], &["F1"], &[1.0, 2.0]);
        let metadata =
            SampleMetadata::from_reader("ID\tage\nS1\t25\nS2\t30".as_bytes()).unwrap();

        let spec = sample_plot(&table, &metadata, "age", None).unwrap();
        assert_eq!(spec["encoding"]["x"]["type"], "quantitative");
        // Color stays nominal even for numeric categories.
        assert_eq!(spec["encoding"]["color"]["type"], "nominal");

        let records = spec["datasets"]["sample_data"].as_array().unwrap();
        assert_eq!(records[0]["2"], 25);
    }

    #[test]
    fn test_samples_missing_from_metadata_are_dropped() {
        let table = create_test_table(&["S1", "S2", "S3"], &["F1"], &[1.0, 2.0, 3.0]);
        let metadata =
            SampleMetadata::from_reader("ID\tgroup\nS1\ta\nS3\tb".as_bytes()).unwrap();

        let spec = sample_plot(&table, &metadata, "group", None).unwrap();
        let records = spec["datasets"]["sample_data"].as_array().unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0]["0"], "S1");
        assert_eq!(records[1]["0"], "S3");
        assert_eq!(records[1]["3"], 3.0);
    }

    #[test]
    fn test_missing_category_value_stays_null() {
        let table = create_test_table(&["S1", "S2"], &["F1"], &[1.0, 2.0]);
        let metadata =
            SampleMetadata::from_reader("ID\tage\nS1\t25\nS2\tNA".as_bytes()).unwrap();

        let spec = sample_plot(&table, &metadata, "age", None).unwrap();
        let records = spec["datasets"]["sample_data"].as_array().unwrap();
        assert_eq!(records.len(), 2);
        assert!(records[1]["2"].is_null());
    }

    #[test]
    fn test_unknown_category() {
        let table = create_test_table(&["S1"], &["F1"], &[1.0]);
        let metadata =
            SampleMetadata::from_reader("ID\tgroup\nS1\ta".as_bytes()).unwrap();

        let result = sample_plot(&table, &metadata, "nope", None);
        assert!(matches!(result, Err(RrvError::MissingColumn(c)) if c == "nope"));
    }

    #[test]
    fn test_feature_name_collision() {
        let table = create_test_table(&["S1"], &["rankratioviz_balance"], &[1.0]);
        let metadata =
            SampleMetadata::from_reader("ID\tgroup\nS1\ta".as_bytes()).unwrap();

        let result = sample_plot(&table, &metadata, "group", None);
        assert!(matches!(result, Err(RrvError::DuplicateColumn(_))));
    }

    #[test]
    fn test_color_scheme() {
        let table = create_test_table(&["S1"], &["F1"], &[1.0]);
        let metadata =
            SampleMetadata::from_reader("ID\tgroup\nS1\ta".as_bytes()).unwrap();

        let spec = sample_plot(&table, &metadata, "group", Some("tableau10")).unwrap();
        assert_eq!(spec["encoding"]["color"]["scale"]["scheme"], "tableau10");
    }
}
