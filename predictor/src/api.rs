use common::models::{BatchPredictionResults, BatchRequest, PredictionRequest, PredictionResult};
use log::debug;
use reqwest::{Client, Response, StatusCode, Url};
use serde::de::DeserializeOwned;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("unexpected code {0}: {1}")]
    Upstream(StatusCode, String),
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("api base url cannot take a path: {0}")]
    InvalidUrl(String),
}

/// The calls the orchestrators make against the prediction service.
pub trait PredictionBackend {
    fn predict(
        &self,
        request: &PredictionRequest,
    ) -> impl Future<Output = Result<PredictionResult, ApiError>> + Send;

    fn predict_batch(
        &self,
        request: &BatchRequest,
    ) -> impl Future<Output = Result<BatchPredictionResults, ApiError>> + Send;

    /// Where the 2D structure image for `smiles` can be fetched, if the
    /// backend serves one.
    fn molecule_image_url(&self, _smiles: &str) -> Option<Url> {
        None
    }
}

#[derive(Debug, Clone)]
pub struct PredictionApi {
    client: Client,
    base_url: Url,
}

impl PredictionApi {
    pub fn new(base_url: Url) -> Self {
        PredictionApi {
            client: Client::new(),
            base_url,
        }
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ApiError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    pub fn image_url(&self, smiles: &str) -> Result<Url, ApiError> {
        let mut url = self.endpoint(&["molecule-image"])?;
        url.query_pairs_mut().append_pair("smiles", smiles);
        Ok(url)
    }

    /// Fetches the rendered structure. A 404 means the service has no image
    /// for this molecule and yields `Ok(None)`.
    pub async fn molecule_image(&self, smiles: &str) -> Result<Option<Vec<u8>>, ApiError> {
        let url = self.image_url(smiles)?;
        debug!("GET {url}");
        let res = self.client.get(url).send().await?;

        if res.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        match res.error_for_status_ref() {
            Ok(_) => Ok(Some(res.bytes().await?.to_vec())),
            Err(_) => Err(ApiError::Upstream(res.status(), res.text().await?)),
        }
    }
}

impl PredictionBackend for PredictionApi {
    async fn predict(&self, request: &PredictionRequest) -> Result<PredictionResult, ApiError> {
        let url = self.endpoint(&["predict"])?;
        debug!("POST {url} smiles={}", request.smiles);
        let res = self.client.post(url).json(request).send().await?;
        decode(res).await
    }

    async fn predict_batch(
        &self,
        request: &BatchRequest,
    ) -> Result<BatchPredictionResults, ApiError> {
        let url = self.endpoint(&["predict", "batch"])?;
        debug!("POST {url} with {} smiles", request.smiles_list.len());
        let res = self.client.post(url).json(request).send().await?;
        decode(res).await
    }

    fn molecule_image_url(&self, smiles: &str) -> Option<Url> {
        self.image_url(smiles).ok()
    }
}

async fn decode<T: DeserializeOwned>(res: Response) -> Result<T, ApiError> {
    match res.error_for_status_ref() {
        Ok(_) => Ok(res.json().await?),
        Err(_) => Err(ApiError::Upstream(res.status(), res.text().await?)),
    }
}
