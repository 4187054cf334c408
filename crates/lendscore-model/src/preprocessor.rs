//! Feature preprocessor: raw payload to numeric feature vector
//!
//! The preprocessor artifact encodes the trained schema: which columns the
//! model expects, in what order, and how to standardize or one-hot encode
//! them. Schema coverage is checked here, not in the wire validator — only
//! the artifact knows its expected columns.

use lendscore_core::{Error, InferenceRequest, Result};
use serde::{Deserialize, Serialize};

/// A standardized numeric column: output is `(x - center) / scale`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NumericColumn {
    /// Feature name as it appears in request payloads
    pub name: String,

    /// Training-set center (mean) subtracted before scaling
    pub center: f64,

    /// Training-set scale (standard deviation); must be positive
    pub scale: f64,
}

/// A one-hot encoded categorical column
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoricalColumn {
    /// Feature name as it appears in request payloads
    pub name: String,

    /// Known categories in trained order; one output slot per category
    pub categories: Vec<String>,
}

/// The deserialized preprocessor artifact
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Preprocessor {
    /// Numeric columns in trained order
    pub numeric: Vec<NumericColumn>,

    /// Categorical columns in trained order, appended after the numerics
    pub categorical: Vec<CategoricalColumn>,
}

/// Dry-run schema report for a payload, mirroring the `/validate` endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchemaReport {
    /// Required columns absent from the payload
    pub missing_fields: Vec<String>,

    /// Numeric columns whose value does not parse as a number
    pub bad_numeric_fields: Vec<String>,

    /// Categorical columns whose value is blank or not a string
    pub bad_categorical_fields: Vec<String>,

    /// Every column the trained schema requires
    pub required_fields: Vec<String>,
}

impl SchemaReport {
    /// Whether the payload would pass the transform step's schema checks
    pub fn is_clean(&self) -> bool {
        self.missing_fields.is_empty()
            && self.bad_numeric_fields.is_empty()
            && self.bad_categorical_fields.is_empty()
    }
}

impl Preprocessor {
    /// Sanity-check the deserialized artifact before serving with it
    pub fn validate(&self) -> Result<()> {
        if self.numeric.is_empty() && self.categorical.is_empty() {
            return Err(Error::artifact("preprocessor defines no columns"));
        }

        for col in &self.numeric {
            if !col.scale.is_finite() || col.scale <= 0.0 {
                return Err(Error::artifact(format!(
                    "numeric column '{}' has non-positive scale {}",
                    col.name, col.scale
                )));
            }
            if !col.center.is_finite() {
                return Err(Error::artifact(format!(
                    "numeric column '{}' has non-finite center",
                    col.name
                )));
            }
        }

        for col in &self.categorical {
            if col.categories.is_empty() {
                return Err(Error::artifact(format!(
                    "categorical column '{}' has no categories",
                    col.name
                )));
            }
        }

        Ok(())
    }

    /// Width of the feature vector this preprocessor produces
    pub fn output_width(&self) -> usize {
        self.numeric.len()
            + self
                .categorical
                .iter()
                .map(|c| c.categories.len())
                .sum::<usize>()
    }

    /// Every column name the trained schema requires, in trained order
    pub fn required_columns(&self) -> Vec<&str> {
        self.numeric
            .iter()
            .map(|c| c.name.as_str())
            .chain(self.categorical.iter().map(|c| c.name.as_str()))
            .collect()
    }

    /// Transform a validated request into the classifier's feature vector
    ///
    /// Standardized numerics first, then one-hot categoricals, in trained
    /// column order. Any schema violation is a client error naming the field.
    pub fn transform(&self, request: &InferenceRequest) -> Result<Vec<f64>> {
        let mut vector = Vec::with_capacity(self.output_width());

        for col in &self.numeric {
            let value = request
                .get(&col.name)
                .ok_or_else(|| Error::schema(&col.name, "missing required field"))?;
            let raw = value
                .as_f64()
                .ok_or_else(|| Error::schema(&col.name, "expected a numeric value"))?;
            if !raw.is_finite() {
                return Err(Error::schema(&col.name, "value must be finite"));
            }
            vector.push((raw - col.center) / col.scale);
        }

        for col in &self.categorical {
            let value = request
                .get(&col.name)
                .ok_or_else(|| Error::schema(&col.name, "missing required field"))?;
            let label = value
                .as_text()
                .ok_or_else(|| Error::schema(&col.name, "expected a categorical string"))?;
            let label = label.trim();
            if label.is_empty() {
                return Err(Error::schema(&col.name, "value must not be blank"));
            }

            let hit = col.categories.iter().position(|c| c == label).ok_or_else(|| {
                Error::schema(&col.name, format!("unknown category '{label}'"))
            })?;
            for idx in 0..col.categories.len() {
                vector.push(if idx == hit { 1.0 } else { 0.0 });
            }
        }

        Ok(vector)
    }

    /// Report which required columns a payload is missing or mistyping
    ///
    /// Unlike [`transform`](Self::transform) this never fails; it collects
    /// every problem so a caller can fix its payload in one round trip.
    pub fn schema_report(&self, request: &InferenceRequest) -> SchemaReport {
        let mut missing = Vec::new();
        let mut bad_numeric = Vec::new();
        let mut bad_categorical = Vec::new();

        for col in &self.numeric {
            match request.get(&col.name) {
                None => missing.push(col.name.clone()),
                Some(value) => {
                    if value.as_f64().map_or(true, |v| !v.is_finite()) {
                        bad_numeric.push(col.name.clone());
                    }
                }
            }
        }

        for col in &self.categorical {
            match request.get(&col.name) {
                None => missing.push(col.name.clone()),
                Some(value) => {
                    if value.as_text().map_or(true, |s| s.trim().is_empty()) {
                        bad_categorical.push(col.name.clone());
                    }
                }
            }
        }

        SchemaReport {
            missing_fields: missing,
            bad_numeric_fields: bad_numeric,
            bad_categorical_fields: bad_categorical,
            required_fields: self
                .required_columns()
                .into_iter()
                .map(String::from)
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> Preprocessor {
        Preprocessor {
            numeric: vec![
                NumericColumn {
                    name: "fico_avg".into(),
                    center: 700.0,
                    scale: 50.0,
                },
                NumericColumn {
                    name: "dti_capped".into(),
                    center: 18.0,
                    scale: 8.0,
                },
            ],
            categorical: vec![CategoricalColumn {
                name: "grade".into(),
                categories: vec!["A".into(), "B".into(), "C".into()],
            }],
        }
    }

    fn request(payload: serde_json::Value) -> InferenceRequest {
        InferenceRequest::parse(&payload).unwrap()
    }

    #[test]
    fn transform_orders_numerics_then_one_hot() {
        let pre = sample();
        let vector = pre
            .transform(&request(json!({
                "fico_avg": 750,
                "dti_capped": 18.0,
                "grade": "B",
            })))
            .unwrap();

        assert_eq!(vector, vec![1.0, 0.0, 0.0, 1.0, 0.0]);
        assert_eq!(vector.len(), pre.output_width());
    }

    #[test]
    fn transform_accepts_numeric_strings() {
        let pre = sample();
        let vector = pre
            .transform(&request(json!({
                "fico_avg": "750",
                "dti_capped": "18",
                "grade": "A",
            })))
            .unwrap();
        assert_eq!(vector[0], 1.0);
    }

    #[test]
    fn missing_field_names_the_column() {
        let pre = sample();
        let err = pre
            .transform(&request(json!({"fico_avg": 750, "grade": "A"})))
            .unwrap_err();

        assert!(err.is_client_error());
        assert!(err.to_string().contains("dti_capped"));
    }

    #[test]
    fn non_numeric_value_is_a_schema_error() {
        let pre = sample();
        let err = pre
            .transform(&request(json!({
                "fico_avg": "seven hundred",
                "dti_capped": 18,
                "grade": "A",
            })))
            .unwrap_err();

        assert!(err.is_client_error());
        assert!(err.to_string().contains("fico_avg"));
    }

    #[test]
    fn unknown_category_is_a_schema_error() {
        let pre = sample();
        let err = pre
            .transform(&request(json!({
                "fico_avg": 700,
                "dti_capped": 18,
                "grade": "Z",
            })))
            .unwrap_err();

        assert!(err.is_client_error());
        assert!(err.to_string().contains("unknown category 'Z'"));
    }

    #[test]
    fn blank_category_is_rejected() {
        let pre = sample();
        let err = pre
            .transform(&request(json!({
                "fico_avg": 700,
                "dti_capped": 18,
                "grade": "   ",
            })))
            .unwrap_err();
        assert!(err.to_string().contains("blank"));
    }

    #[test]
    fn schema_report_collects_all_problems() {
        let pre = sample();
        let report = pre.schema_report(&request(json!({
            "fico_avg": "not a number",
            "grade": "",
        })));

        assert_eq!(report.missing_fields, vec!["dti_capped"]);
        assert_eq!(report.bad_numeric_fields, vec!["fico_avg"]);
        assert_eq!(report.bad_categorical_fields, vec!["grade"]);
        assert_eq!(
            report.required_fields,
            vec!["fico_avg", "dti_capped", "grade"]
        );
        assert!(!report.is_clean());
    }

    #[test]
    fn validate_rejects_degenerate_scale() {
        let mut pre = sample();
        pre.numeric[0].scale = 0.0;
        assert!(pre.validate().is_err());
    }

    #[test]
    fn validate_rejects_empty_schema() {
        let pre = Preprocessor {
            numeric: vec![],
            categorical: vec![],
        };
        assert!(pre.validate().is_err());
    }
}
