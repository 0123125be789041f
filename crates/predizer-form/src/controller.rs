use std::sync::Arc;

use predizer_client::{FeatureVector, PredictError, PredictionOutcome, Predictor, parse_features};
use predizer_error::{ErrorPolicy, InternalError};
use serde::{Deserialize, Serialize};
use tokio::task::{JoinError, JoinSet};
use tracing::instrument;

use crate::messages::{EMPTY_INPUT_MESSAGE, error_message, outcome_message};
use crate::surface::{ClickEvent, ClickSource, TextSink, TextSource};
use crate::tokens::{RenderPolicy, RequestToken, RequestTokens};

/// When the "please enter the features" guidance is shown instead of sending a request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum EmptyInputPolicy {
    /// The parsed feature sequence is empty. Splitting always yields at least one segment, so
    /// an empty field is sent as `[0]` under this policy.
    #[default]
    ParsedLength,
    /// The input field holds nothing but whitespace.
    RawText,
}

impl EmptyInputPolicy {
    pub fn is_empty(self, raw: &str, features: &FeatureVector) -> bool {
        match self {
            EmptyInputPolicy::ParsedLength => features.is_empty(),
            EmptyInputPolicy::RawText => raw.trim().is_empty(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderSettings {
    pub render_policy: RenderPolicy,
    pub empty_input: EmptyInputPolicy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderKind {
    Guidance,
    Prediction,
    Failure,
}

/// What a single click did to the result element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClickOutcome {
    Rendered {
        token: RequestToken,
        kind: RenderKind,
        text: String,
    },
    /// A newer click was issued before this one resolved; nothing was written.
    Superseded { token: RequestToken },
}

impl ClickOutcome {
    pub fn text(&self) -> Option<&str> {
        match self {
            ClickOutcome::Rendered { text, .. } => Some(text),
            ClickOutcome::Superseded { .. } => None,
        }
    }
}

/// Totals reported when the click loop ends.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub clicks: usize,
    pub rendered: usize,
    pub superseded: usize,
    /// Handler failures that were not rendered.
    pub unhandled: usize,
}

/// Binds clicks to one request/response/render cycle each.
#[derive(Debug)]
pub struct PredictionFormController<S, K, P> {
    source: S,
    sink: K,
    predictor: P,
    tokens: RequestTokens,
    settings: RenderSettings,
}

impl<S, K, P> PredictionFormController<S, K, P>
where
    S: TextSource,
    K: TextSink,
    P: Predictor,
{
    pub fn new(source: S, sink: K, predictor: P) -> Self {
        Self {
            source,
            sink,
            predictor,
            tokens: RequestTokens::default(),
            settings: RenderSettings::default(),
        }
    }

    pub fn with_settings(mut self, settings: RenderSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn settings(&self) -> RenderSettings {
        self.settings
    }

    pub fn tokens(&self) -> &RequestTokens {
        &self.tokens
    }

    /// Handle one click: read the input, request a prediction and render the result.
    ///
    /// Guidance, predictions, server-reported failures and transport failures are rendered.
    /// A response whose body is not JSON or lacks the expected field is returned as `Err` and
    /// nothing is written.
    pub async fn on_predict_clicked(&self) -> Result<ClickOutcome, PredictError> {
        let (token, raw) = self.begin_click();
        self.finish_click(token, raw).await
    }

    /// Synchronous part of a click: take a token and read the input field as it is right now.
    fn begin_click(&self) -> (RequestToken, String) {
        (self.tokens.issue(), self.source.value())
    }

    #[instrument(skip(self, raw), fields(token = token.get()))]
    async fn finish_click(
        &self,
        token: RequestToken,
        raw: String,
    ) -> Result<ClickOutcome, PredictError> {
        let features = parse_features(&raw);
        if self.settings.empty_input.is_empty(&raw, &features) {
            return Ok(self.render(token, RenderKind::Guidance, EMPTY_INPUT_MESSAGE.to_string()));
        }

        let (kind, text) = match self.predictor.predict(&features).await {
            Ok(outcome) => {
                let kind = match &outcome {
                    PredictionOutcome::Prediction(_) => RenderKind::Prediction,
                    PredictionOutcome::Failure { status, .. } => {
                        tracing::info!(status = *status, "prediction endpoint reported a failure");
                        RenderKind::Failure
                    }
                };
                (kind, outcome_message(&outcome))
            }
            Err(e) if e.is_transport() => (RenderKind::Failure, error_message(&e)),
            Err(e) => return Err(e),
        };
        Ok(self.render(token, kind, text))
    }

    fn render(&self, token: RequestToken, kind: RenderKind, text: String) -> ClickOutcome {
        if !self
            .settings
            .render_policy
            .should_render(&self.tokens, token)
        {
            tracing::debug!(
                token = token.get(),
                latest = ?self.tokens.latest().map(RequestToken::get),
                "dropping superseded response"
            );
            return ClickOutcome::Superseded { token };
        }
        self.sink.set_text(text.clone());
        ClickOutcome::Rendered { token, kind, text }
    }
}

impl<S, K, P> PredictionFormController<S, K, P>
where
    S: TextSource + 'static,
    K: TextSink + 'static,
    P: Predictor + 'static,
{
    /// Event loop: every click runs [`Self::on_predict_clicked`] as its own task, with no
    /// in-flight guard.
    ///
    /// Returns once the click source closes and every spawned task has finished. Failures that
    /// were not rendered are handed to `policy`.
    pub async fn run<C: ClickSource>(
        self: Arc<Self>,
        mut clicks: C,
        policy: &impl ErrorPolicy,
    ) -> RunSummary {
        let mut summary = RunSummary::default();
        let mut tasks = JoinSet::new();

        while let Some(ClickEvent) = clicks.next_click().await {
            summary.clicks += 1;
            let (token, raw) = self.begin_click();
            let controller = Arc::clone(&self);
            tasks.spawn(async move { controller.finish_click(token, raw).await });

            while let Some(done) = tasks.try_join_next() {
                record(&mut summary, done, policy);
            }
        }
        tracing::debug!(in_flight = tasks.len(), "click source closed");

        while let Some(done) = tasks.join_next().await {
            record(&mut summary, done, policy);
        }
        summary
    }
}

fn record(
    summary: &mut RunSummary,
    done: Result<Result<ClickOutcome, PredictError>, JoinError>,
    policy: &impl ErrorPolicy,
) {
    match done {
        Ok(Ok(ClickOutcome::Rendered { .. })) => summary.rendered += 1,
        Ok(Ok(ClickOutcome::Superseded { .. })) => summary.superseded += 1,
        Ok(Err(e)) => {
            summary.unhandled += 1;
            policy.emit(&e.into());
        }
        Err(join) => {
            summary.unhandled += 1;
            policy.emit(&InternalError::TaskJoin(join.to_string()).into());
        }
    }
}
