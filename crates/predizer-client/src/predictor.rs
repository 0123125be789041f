use std::{future::Future, sync::Arc, time::Duration};

use reqwest::{Client, header::CONTENT_TYPE};
use tracing::instrument;

use crate::error::PredictError;
use crate::features::FeatureVector;
use crate::response::{PredictionOutcome, parse_outcome};
use crate::types::newtypes::{EndpointUrl, RequestId};
use crate::wire::{WireRequest, build_predict_request};

/// Something that turns a feature vector into a renderable outcome.
///
/// [`HttpPredictor`] is the production implementation; tests substitute their own.
pub trait Predictor: Send + Sync {
    fn predict(
        &self,
        features: &FeatureVector,
    ) -> impl Future<Output = Result<PredictionOutcome, PredictError>> + Send;
}

impl<P: Predictor> Predictor for Arc<P> {
    fn predict(
        &self,
        features: &FeatureVector,
    ) -> impl Future<Output = Result<PredictionOutcome, PredictError>> + Send {
        (**self).predict(features)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PredictHttpConfig {
    pub endpoint: EndpointUrl,
    /// `None` waits for the server indefinitely.
    pub timeout: Option<Duration>,
}

impl PredictHttpConfig {
    pub fn new(endpoint: EndpointUrl) -> Self {
        Self {
            endpoint,
            timeout: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }
}

#[derive(Clone, Debug)]
pub struct HttpPredictor {
    client: Client,
    cfg: PredictHttpConfig,
}

impl HttpPredictor {
    pub fn new(cfg: PredictHttpConfig) -> Self {
        Self::with_client(Client::new(), cfg)
    }

    pub fn with_client(client: Client, cfg: PredictHttpConfig) -> Self {
        Self { client, cfg }
    }

    pub fn config(&self) -> &PredictHttpConfig {
        &self.cfg
    }
}

impl Predictor for HttpPredictor {
    async fn predict(&self, features: &FeatureVector) -> Result<PredictionOutcome, PredictError> {
        let wire = build_predict_request(&self.cfg.endpoint, features)?;
        tracing::debug!(
            n_features = features.len(),
            n_nan = features.nan_count(),
            "built prediction request"
        );
        predict_step(&self.client, &wire, self.cfg.timeout).await
    }
}

/// Send one prediction request and interpret the response.
///
/// Transport failures, including failing to read the body, become [`PredictError::Request`].
/// The status decides which field is expected; see [`parse_outcome`].
#[instrument(skip_all, fields(request_id = %RequestId::new_v4(), url = %wire.url))]
pub async fn predict_step(
    client: &Client,
    wire: &WireRequest,
    timeout: Option<Duration>,
) -> Result<PredictionOutcome, PredictError> {
    let mut req = client
        .post(wire.url.clone())
        .header(CONTENT_TYPE, wire.content_type)
        .json(&wire.body);
    if let Some(timeout) = timeout {
        req = req.timeout(timeout);
    }

    let resp = req.send().await.map_err(|e| {
        let err = PredictError::from_reqwest(&e);
        tracing::warn!(error = %err.diagnostic(), "prediction request failed");
        err
    })?;

    let status = resp.status().as_u16();
    let body = resp
        .text()
        .await
        .map_err(|e| PredictError::from_reqwest(&e))?;
    tracing::debug!(status, body_len = body.len(), "prediction response received");

    parse_outcome(status, &body)
}
