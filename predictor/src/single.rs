//! One analyze cycle for a pasted SMILES string.
//!
//! The cycle is split into [`SingleAnalysis::begin_analysis`] and
//! [`SingleAnalysis::complete_analysis`] so a front end can render the loading
//! state in between. While an analysis is in flight every trigger (input,
//! reset, analyze, close) is disabled and calling it is a no-op.

use crate::api::{ApiError, PredictionBackend};
use crate::notice::Notice;
use common::models::{AnalysisResult, PredictionRequest, PredictionResult};
use common::smiles::validate;
use log::{info, warn};
use reqwest::Url;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Analyzing,
    Success,
}

/// Handed out by `begin_analysis`, consumed by `complete_analysis`.
#[derive(Debug)]
pub struct PendingAnalysis {
    request: PredictionRequest,
}

impl PendingAnalysis {
    pub fn request(&self) -> &PredictionRequest {
        &self.request
    }
}

#[derive(Debug, Default)]
pub struct SingleAnalysis {
    input: String,
    validity: Option<bool>,
    phase: Phase,
    surface_open: bool,
    result: Option<AnalysisResult>,
    image_url: Option<Url>,
}

impl SingleAnalysis {
    pub fn input(&self) -> &str {
        &self.input
    }

    /// `None` until something has been typed.
    pub fn validity(&self) -> Option<bool> {
        self.validity
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_analyzing(&self) -> bool {
        self.phase == Phase::Analyzing
    }

    pub fn is_open(&self) -> bool {
        self.surface_open
    }

    pub fn result(&self) -> Option<&AnalysisResult> {
        self.result.as_ref()
    }

    pub fn image_url(&self) -> Option<&Url> {
        self.image_url.as_ref()
    }

    /// Returns `false` when the input is locked by an in-flight analysis.
    pub fn set_input(&mut self, value: impl Into<String>) -> bool {
        if self.is_analyzing() {
            return false;
        }
        self.input = value.into();
        self.validity = if self.input.is_empty() {
            None
        } else {
            Some(validate(&self.input))
        };
        true
    }

    pub fn can_analyze(&self) -> bool {
        self.validity == Some(true) && !self.input.is_empty() && !self.is_analyzing()
    }

    pub fn begin_analysis<B: PredictionBackend>(
        &mut self,
        backend: &B,
    ) -> Result<PendingAnalysis, Notice> {
        if self.is_analyzing() {
            return Err(Notice::Busy);
        }
        if self.input.is_empty() {
            return Err(Notice::EmptyInput);
        }
        if self.validity != Some(true) {
            return Err(Notice::InvalidSmiles);
        }

        self.image_url = backend.molecule_image_url(&self.input);
        self.phase = Phase::Analyzing;
        self.surface_open = true;
        self.result = None;

        Ok(PendingAnalysis {
            request: PredictionRequest {
                smiles: self.input.clone(),
            },
        })
    }

    pub fn complete_analysis(
        &mut self,
        pending: PendingAnalysis,
        outcome: Result<PredictionResult, ApiError>,
    ) -> Result<AnalysisResult, Notice> {
        self.phase = Phase::Idle;

        match outcome {
            Ok(prediction) => {
                let view = AnalysisResult::from_prediction(pending.request.smiles, &prediction);
                info!(
                    "{} classified as {} ({:.2})",
                    view.smiles, prediction.result, view.confidence
                );
                self.result = Some(view.clone());
                self.phase = Phase::Success;
                Ok(view)
            }
            Err(err) => {
                warn!("prediction for {} failed: {err}", pending.request.smiles);
                self.surface_open = false;
                Err(Notice::AnalysisFailed(err.to_string()))
            }
        }
    }

    pub async fn analyze<B: PredictionBackend>(
        &mut self,
        backend: &B,
    ) -> Result<AnalysisResult, Notice> {
        let pending = self.begin_analysis(backend)?;
        let outcome = backend.predict(pending.request()).await;
        self.complete_analysis(pending, outcome)
    }

    /// Clears the input and any result, leaving the result surface as it is.
    pub fn reset(&mut self) {
        if self.is_analyzing() {
            return;
        }
        self.input.clear();
        self.validity = None;
        self.result = None;
        self.image_url = None;
        self.phase = Phase::Idle;
    }

    pub fn new_analysis(&mut self) {
        if self.is_analyzing() {
            return;
        }
        self.surface_open = false;
        self.reset();
    }

    pub fn close(&mut self) {
        if !self.is_analyzing() {
            self.surface_open = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::models::{BatchPredictionResults, BatchRequest, PredictionDetails};
    use reqwest::StatusCode;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct FakeBackend {
        calls: AtomicUsize,
        fail: bool,
    }

    impl PredictionBackend for FakeBackend {
        async fn predict(&self, request: &PredictionRequest) -> Result<PredictionResult, ApiError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(ApiError::Upstream(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    format!("cannot score {}", request.smiles),
                ));
            }
            Ok(PredictionResult {
                result: "Active".to_string(),
                confidence: 0.87,
                details: PredictionDetails {
                    gnn_prediction: Some(0.91),
                    rf_prediction: Some(0.8),
                    ..Default::default()
                },
            })
        }

        async fn predict_batch(
            &self,
            _request: &BatchRequest,
        ) -> Result<BatchPredictionResults, ApiError> {
            unreachable!("single analysis never calls the batch endpoint")
        }

        fn molecule_image_url(&self, smiles: &str) -> Option<Url> {
            Url::parse_with_params("http://fake/molecule-image", &[("smiles", smiles)]).ok()
        }
    }

    #[test]
    fn input_change_updates_validity() {
        let mut analysis = SingleAnalysis::default();
        assert_eq!(analysis.validity(), None);
        analysis.set_input("C(C");
        assert_eq!(analysis.validity(), Some(false));
        analysis.set_input("CCO");
        assert_eq!(analysis.validity(), Some(true));
        analysis.set_input("");
        assert_eq!(analysis.validity(), None);
    }

    #[tokio::test]
    async fn disabled_trigger_makes_no_call() {
        let backend = FakeBackend::default();
        let mut analysis = SingleAnalysis::default();

        assert_eq!(analysis.analyze(&backend).await, Err(Notice::EmptyInput));

        analysis.set_input("C)C");
        assert!(!analysis.can_analyze());
        assert_eq!(analysis.analyze(&backend).await, Err(Notice::InvalidSmiles));
        assert!(!analysis.is_open());

        analysis.set_input("CCO");
        let pending = analysis.begin_analysis(&backend).unwrap();
        assert!(!analysis.can_analyze());
        assert_eq!(analysis.begin_analysis(&backend).unwrap_err(), Notice::Busy);
        assert!(!analysis.set_input("CCN"));
        assert_eq!(analysis.input(), "CCO");

        assert_eq!(backend.calls.load(Ordering::SeqCst), 0);
        drop(pending);
    }

    #[tokio::test]
    async fn success_maps_view_model() {
        let backend = FakeBackend::default();
        let mut analysis = SingleAnalysis::default();
        analysis.set_input("C[C@H](C)O");

        let view = analysis.analyze(&backend).await.unwrap();
        assert!(view.is_active);
        assert_eq!(view.confidence, 0.87);
        assert_eq!(view.gnn_accuracy, 0.91);
        assert_eq!(view.rf_accuracy, 0.8);
        assert_eq!(view.smiles, "C[C@H](C)O");

        assert_eq!(analysis.phase(), Phase::Success);
        assert!(analysis.is_open());
        assert!(!analysis.is_analyzing());
        assert_eq!(analysis.result(), Some(&view));
        assert!(analysis.image_url().is_some());
        assert_eq!(backend.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn failure_closes_surface_and_clears_loading() {
        let backend = FakeBackend {
            fail: true,
            ..Default::default()
        };
        let mut analysis = SingleAnalysis::default();
        analysis.set_input("CCO");

        let notice = analysis.analyze(&backend).await.unwrap_err();
        assert!(matches!(notice, Notice::AnalysisFailed(_)));
        assert_eq!(analysis.phase(), Phase::Idle);
        assert!(!analysis.is_open());
        assert!(analysis.result().is_none());
        assert!(analysis.can_analyze());
    }

    #[tokio::test]
    async fn reset_and_new_analysis_clear_state() {
        let backend = FakeBackend::default();
        let mut analysis = SingleAnalysis::default();
        analysis.set_input("CCO");
        analysis.analyze(&backend).await.unwrap();

        analysis.reset();
        assert_eq!(analysis.input(), "");
        assert_eq!(analysis.validity(), None);
        assert!(analysis.result().is_none());
        assert!(analysis.image_url().is_none());
        assert!(analysis.is_open());

        analysis.set_input("CCO");
        analysis.analyze(&backend).await.unwrap();
        analysis.new_analysis();
        assert!(!analysis.is_open());
        assert_eq!(analysis.phase(), Phase::Idle);
        assert!(analysis.result().is_none());
    }

    #[tokio::test]
    async fn close_keeps_result() {
        let backend = FakeBackend::default();
        let mut analysis = SingleAnalysis::default();
        analysis.set_input("CCO");
        analysis.analyze(&backend).await.unwrap();
        analysis.close();
        assert!(!analysis.is_open());
        assert!(analysis.result().is_some());
    }
}
