use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use predizer_client::{FeatureVector, PredictError, PredictionOutcome, Predictor};
use predizer_error::{ErrorPolicy, Severity};
use predizer_form::tracing_setup::init_tracing_tests;
use predizer_form::{
    DisplayElement, InputField, LineClicks, PredictionFormController, RenderPolicy,
    RenderSettings, RunSummary,
};
use serde_json::json;
use tokio::sync::oneshot;
use tracing::Level;

/// Holds each request until the test opens the gate keyed by its first feature.
struct Gated {
    gates: Mutex<HashMap<u64, oneshot::Receiver<()>>>,
    started: flume::Sender<u64>,
}

impl Predictor for Gated {
    async fn predict(&self, features: &FeatureVector) -> Result<PredictionOutcome, PredictError> {
        let key = features.as_slice()[0] as u64;
        let gate = self
            .gates
            .lock()
            .expect("gates lock")
            .remove(&key)
            .expect("gate registered for key");
        let _ = self.started.send(key);
        gate.await.expect("gate opened");
        Ok(PredictionOutcome::Prediction(json!(key)))
    }
}

struct Harness {
    lines: flume::Sender<String>,
    started: flume::Receiver<u64>,
    open: HashMap<u64, oneshot::Sender<()>>,
    display: DisplayElement,
    run: tokio::task::JoinHandle<RunSummary>,
}

/// `None` keeps the controller's default settings.
fn start(policy: Option<RenderPolicy>, keys: &[u64]) -> Harness {
    let (started_tx, started) = flume::unbounded();
    let mut gates = HashMap::new();
    let mut open = HashMap::new();
    for &key in keys {
        let (tx, rx) = oneshot::channel();
        gates.insert(key, rx);
        open.insert(key, tx);
    }

    let input = InputField::default();
    let display = DisplayElement::default();
    let mut controller = PredictionFormController::new(
        input.clone(),
        display.clone(),
        Gated {
            gates: Mutex::new(gates),
            started: started_tx,
        },
    );
    if let Some(policy) = policy {
        controller = controller.with_settings(RenderSettings {
            render_policy: policy,
            ..Default::default()
        });
    }
    let controller = Arc::new(controller);

    let (lines, line_rx) = flume::unbounded();
    let run = tokio::spawn(async move {
        controller
            .run(LineClicks::new(line_rx, input), &Counting::default())
            .await
    });
    Harness {
        lines,
        started,
        open,
        display,
        run,
    }
}

impl Harness {
    async fn click(&self, text: &str) {
        self.lines.send_async(text.to_string()).await.expect("run loop alive");
        self.started.recv_async().await.expect("request started");
    }

    fn release(&mut self, key: u64) {
        self.open
            .remove(&key)
            .expect("gate still closed")
            .send(())
            .expect("request waiting");
    }

    async fn wait_for(&self, text: &str) {
        let mut rx = self.display.subscribe();
        rx.wait_for(|t| t == text).await.expect("display alive");
    }

    async fn finish(self) -> (RunSummary, DisplayElement) {
        drop(self.lines);
        let summary = self.run.await.expect("run task");
        (summary, self.display)
    }
}

#[tokio::test]
async fn last_resolved_lets_the_slow_first_click_win() {
    let mut h = start(Some(RenderPolicy::LastResolved), &[1, 2]);
    h.click("1").await;
    h.click("2").await;

    h.release(2);
    h.wait_for("Predição: 2").await;
    h.release(1);
    h.wait_for("Predição: 1").await;

    let (summary, display) = h.finish().await;
    assert_eq!(display.text(), "Predição: 1");
    assert_eq!(display.write_count(), 2);
    assert_eq!(summary.clicks, 2);
    assert_eq!(summary.rendered, 2);
    assert_eq!(summary.superseded, 0);
}

#[tokio::test]
async fn default_settings_render_every_overlapping_response() {
    let mut h = start(None, &[1, 2]);
    h.click("1").await;
    h.click("2").await;

    h.release(2);
    h.wait_for("Predição: 2").await;
    h.release(1);
    h.wait_for("Predição: 1").await;

    let (summary, display) = h.finish().await;
    assert_eq!(display.text(), "Predição: 1");
    assert_eq!(display.write_count(), 2);
    assert_eq!(summary.rendered, 2);
    assert_eq!(summary.superseded, 0);
}

#[tokio::test]
async fn latest_issued_drops_the_stale_response() {
    init_tracing_tests(Level::DEBUG);
    let mut h = start(Some(RenderPolicy::LatestIssued), &[1, 2]);
    h.click("1").await;
    h.click("2").await;

    h.release(2);
    h.wait_for("Predição: 2").await;
    h.release(1);

    let (summary, display) = h.finish().await;
    assert_eq!(display.text(), "Predição: 2");
    assert_eq!(display.write_count(), 1);
    assert_eq!(summary.rendered, 1);
    assert_eq!(summary.superseded, 1);
}

#[tokio::test]
async fn latest_issued_renders_in_order_responses() {
    let mut h = start(Some(RenderPolicy::LatestIssued), &[1, 2]);
    h.click("1").await;
    h.release(1);
    h.wait_for("Predição: 1").await;

    h.click("2").await;
    h.release(2);

    let (summary, display) = h.finish().await;
    assert_eq!(display.text(), "Predição: 2");
    assert_eq!(summary.rendered, 2);
    assert_eq!(summary.superseded, 0);
}

/// Counts what the event loop hands over instead of rendering.
#[derive(Default)]
struct Counting(Mutex<Vec<Severity>>);

impl ErrorPolicy for Counting {
    fn classify(&self, err: &predizer_error::Error) -> Severity {
        err.severity()
    }

    fn emit(&self, err: &predizer_error::Error) {
        self.0.lock().expect("lock").push(self.classify(err));
    }
}

/// Answers with a body that has no `prediction` field.
struct Malformed;

impl Predictor for Malformed {
    async fn predict(&self, _features: &FeatureVector) -> Result<PredictionOutcome, PredictError> {
        Err(PredictError::MissingField {
            status: 200,
            field: "prediction",
            body_snippet: Some("{\"result\":7}".into()),
        })
    }
}

#[tokio::test]
async fn unhandled_failures_reach_the_policy() {
    let input = InputField::default();
    let display = DisplayElement::default();
    let controller = Arc::new(PredictionFormController::new(
        input.clone(),
        display.clone(),
        Malformed,
    ));

    let (lines, line_rx) = flume::unbounded();
    lines.send("1,2".to_string()).expect("send");
    lines.send("3".to_string()).expect("send");
    drop(lines);

    let policy = Counting::default();
    let summary = controller.run(LineClicks::new(line_rx, input), &policy).await;

    assert_eq!(summary.clicks, 2);
    assert_eq!(summary.unhandled, 2);
    assert_eq!(summary.rendered, 0);
    assert_eq!(display.write_count(), 0);
    assert_eq!(
        *policy.0.lock().expect("lock"),
        vec![Severity::Warning, Severity::Warning]
    );
}
