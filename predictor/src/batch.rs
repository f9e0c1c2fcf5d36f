//! Batch prediction over an uploaded line-delimited SMILES file.
//!
//! Two dispatch strategies exist and are selected explicitly:
//!
//! - [`DispatchMode::Sequential`] posts every line to `/predict`, one request
//!   at a time. A failing line becomes an `ERROR` row and the run continues,
//!   so the output always has one row per parsed line.
//! - [`DispatchMode::Batch`] posts the whole list to `/predict/batch` once.
//!   Any failure aborts the run and no rows are produced.

use crate::api::{ApiError, PredictionBackend};
use crate::notice::Notice;
use common::models::{BatchRequest, BatchRow, PredictionRequest};
use common::smiles::parse_smiles_list;
use log::{info, warn};
use serde::Deserialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DispatchMode {
    #[default]
    Sequential,
    Batch,
}

#[derive(Debug, thiserror::Error)]
pub enum BatchError {
    #[error("no SMILES strings found in input")]
    NoSmiles,
    #[error("a batch run is already in progress")]
    Busy,
    #[error("batch request failed: {0}")]
    Request(#[from] ApiError),
}

impl BatchError {
    pub fn notice(&self) -> Notice {
        match self {
            BatchError::NoSmiles => Notice::NoSmiles,
            BatchError::Busy => Notice::Busy,
            BatchError::Request(err) => Notice::BatchFailed(err.to_string()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BatchSummary {
    pub total: usize,
    pub active: usize,
    pub inactive: usize,
    pub errors: usize,
}

impl BatchSummary {
    pub fn from_rows(rows: &[BatchRow]) -> Self {
        rows.iter().fold(
            BatchSummary {
                total: rows.len(),
                ..Default::default()
            },
            |mut summary, row| {
                if row.is_error() {
                    summary.errors += 1;
                } else if row.is_active() {
                    summary.active += 1;
                } else {
                    summary.inactive += 1;
                }
                summary
            },
        )
    }
}

#[derive(Debug, Default)]
pub struct BatchJob {
    mode: DispatchMode,
    min_line_length: usize,
    rows: Vec<BatchRow>,
    loading: bool,
}

impl BatchJob {
    pub fn new(mode: DispatchMode, min_line_length: usize) -> Self {
        BatchJob {
            mode,
            min_line_length,
            ..Default::default()
        }
    }

    pub fn mode(&self) -> DispatchMode {
        self.mode
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn rows(&self) -> &[BatchRow] {
        &self.rows
    }

    pub fn summary(&self) -> BatchSummary {
        BatchSummary::from_rows(&self.rows)
    }

    /// Parses a new upload and marks the job as loading. Rows from the
    /// previous upload are discarded.
    pub fn begin(&mut self, text: &str) -> Result<Vec<String>, BatchError> {
        if self.loading {
            return Err(BatchError::Busy);
        }
        self.rows.clear();

        let smiles_list = parse_smiles_list(text, self.min_line_length);
        if smiles_list.is_empty() {
            return Err(BatchError::NoSmiles);
        }

        self.loading = true;
        Ok(smiles_list)
    }

    pub fn finish(
        &mut self,
        outcome: Result<Vec<BatchRow>, ApiError>,
    ) -> Result<&[BatchRow], BatchError> {
        self.loading = false;
        self.rows = outcome?;
        Ok(&self.rows)
    }

    pub async fn run<B, F>(
        &mut self,
        backend: &B,
        text: &str,
        on_row: F,
    ) -> Result<&[BatchRow], BatchError>
    where
        B: PredictionBackend,
        F: FnMut(usize, usize, &BatchRow),
    {
        let smiles_list = self.begin(text)?;
        info!(
            "running {} predictions ({:?} dispatch)",
            smiles_list.len(),
            self.mode
        );
        let outcome = dispatch(backend, self.mode, &smiles_list, on_row).await;
        self.finish(outcome)
    }
}

/// Predicts every entry of `smiles_list`, calling `on_row(index, total, row)`
/// as rows become available.
pub async fn dispatch<B, F>(
    backend: &B,
    mode: DispatchMode,
    smiles_list: &[String],
    on_row: F,
) -> Result<Vec<BatchRow>, ApiError>
where
    B: PredictionBackend,
    F: FnMut(usize, usize, &BatchRow),
{
    match mode {
        DispatchMode::Sequential => Ok(dispatch_sequential(backend, smiles_list, on_row).await),
        DispatchMode::Batch => dispatch_batch(backend, smiles_list, on_row).await,
    }
}

async fn dispatch_sequential<B, F>(backend: &B, smiles_list: &[String], mut on_row: F) -> Vec<BatchRow>
where
    B: PredictionBackend,
    F: FnMut(usize, usize, &BatchRow),
{
    let total = smiles_list.len();
    let mut rows = Vec::with_capacity(total);

    for (index, smiles) in smiles_list.iter().enumerate() {
        let request = PredictionRequest {
            smiles: smiles.clone(),
        };
        let row = match backend.predict(&request).await {
            Ok(prediction) => BatchRow::from_prediction(smiles.as_str(), &prediction),
            Err(err) => {
                warn!("line {} ({smiles}) failed: {err}", index + 1);
                BatchRow::error(smiles.as_str())
            }
        };
        on_row(index, total, &row);
        rows.push(row);
    }

    rows
}

async fn dispatch_batch<B, F>(
    backend: &B,
    smiles_list: &[String],
    mut on_row: F,
) -> Result<Vec<BatchRow>, ApiError>
where
    B: PredictionBackend,
    F: FnMut(usize, usize, &BatchRow),
{
    let request = BatchRequest {
        smiles_list: smiles_list.to_vec(),
    };
    let rows: Vec<BatchRow> = backend
        .predict_batch(&request)
        .await?
        .into_iter()
        .map(BatchRow::from)
        .collect();

    if rows.len() != smiles_list.len() {
        warn!(
            "batch endpoint returned {} rows for {} inputs",
            rows.len(),
            smiles_list.len()
        );
    }
    for (index, row) in rows.iter().enumerate() {
        on_row(index, rows.len(), row);
    }
    Ok(rows)
}
