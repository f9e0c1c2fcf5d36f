use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;

/// Sentinel `result` value for a batch row whose prediction failed.
pub const ERROR_RESULT: &str = "ERROR";

/// Classification label the prediction API returns for active compounds.
pub const ACTIVE_RESULT: &str = "Active";

/// Reads an explicit JSON `null` as the type's default, so `"confidence": null`
/// decodes as `0.0` instead of failing the whole response.
pub fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct PredictionRequest {
    pub smiles: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct BatchRequest {
    pub smiles_list: Vec<String>,
}

/// Per-model breakdown. The single endpoint reports `gnn_prediction` /
/// `rf_prediction`, the batch endpoint `gnn` / `rf`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct PredictionDetails {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gnn_prediction: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rf_prediction: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gnn: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rf: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mol_weight: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logp: Option<f64>,
}

impl PredictionDetails {
    pub fn gnn_score(&self) -> f64 {
        self.gnn_prediction.or(self.gnn).unwrap_or(0.0)
    }

    pub fn rf_score(&self) -> f64 {
        self.rf_prediction.or(self.rf).unwrap_or(0.0)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct PredictionResult {
    #[serde(default, deserialize_with = "null_as_default")]
    pub result: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub confidence: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub details: PredictionDetails,
}

impl PredictionResult {
    pub fn is_active(&self) -> bool {
        self.result == ACTIVE_RESULT
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct BatchPredictionResult {
    pub smiles: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub result: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub confidence: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub details: PredictionDetails,
}

pub type BatchPredictionResults = Vec<BatchPredictionResult>;

/// View model shown on the result card of a single analysis.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub is_active: bool,
    pub confidence: f64,
    pub gnn_accuracy: f64,
    pub rf_accuracy: f64,
    pub smiles: String,
}

impl AnalysisResult {
    pub fn from_prediction(smiles: impl Into<String>, prediction: &PredictionResult) -> Self {
        AnalysisResult {
            is_active: prediction.is_active(),
            confidence: clamp_unit(prediction.confidence),
            gnn_accuracy: clamp_unit(prediction.details.gnn_score()),
            rf_accuracy: clamp_unit(prediction.details.rf_score()),
            smiles: smiles.into(),
        }
    }
}

/// One line of a batch run, in input order.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct BatchRow {
    pub smiles: String,
    pub result: String,
    pub confidence: f64,
    pub gnn: f64,
    pub rf: f64,
}

impl BatchRow {
    pub fn from_prediction(smiles: impl Into<String>, prediction: &PredictionResult) -> Self {
        BatchRow {
            smiles: smiles.into(),
            result: prediction.result.clone(),
            confidence: clamp_unit(prediction.confidence),
            gnn: clamp_unit(prediction.details.gnn_score()),
            rf: clamp_unit(prediction.details.rf_score()),
        }
    }

    pub fn error(smiles: impl Into<String>) -> Self {
        BatchRow {
            smiles: smiles.into(),
            result: ERROR_RESULT.to_string(),
            confidence: 0.0,
            gnn: 0.0,
            rf: 0.0,
        }
    }

    pub fn is_error(&self) -> bool {
        self.result == ERROR_RESULT
    }

    /// Loose check used for table badges: anything mentioning "active"
    /// but not "inactive".
    pub fn is_active(&self) -> bool {
        let lower = self.result.to_lowercase();
        lower.contains("active") && !lower.contains("inactive")
    }
}

impl From<BatchPredictionResult> for BatchRow {
    fn from(value: BatchPredictionResult) -> Self {
        BatchRow {
            confidence: clamp_unit(value.confidence),
            gnn: clamp_unit(value.details.gnn_score()),
            rf: clamp_unit(value.details.rf_score()),
            smiles: value.smiles,
            result: value.result,
        }
    }
}

fn clamp_unit(value: f64) -> f64 {
    // `<= 0.0` also catches -0.0, which would otherwise print as "-0.00%".
    if value.is_nan() || value <= 0.0 {
        0.0
    } else {
        value.min(1.0)
    }
}
