//! The page elements the form talks to.
//!
//! The controller never reaches for global handles; it is given one text source (the features
//! input), one text sink (the result element) and, in its event loop, one click source.

use std::future::Future;
use std::io::Write as _;
use std::sync::{
    Arc, RwLock,
    atomic::{AtomicUsize, Ordering},
};

use tokio::sync::{mpsc, watch};

/// Read access to the input field.
pub trait TextSource: Send + Sync {
    fn value(&self) -> String;
}

/// Write access to the result element. Every call replaces the previous text.
pub trait TextSink: Send + Sync {
    fn set_text(&self, text: String);
}

/// A click on the predict control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ClickEvent;

/// Subscription to click events. `None` means the control is gone and no more clicks will come.
pub trait ClickSource: Send {
    fn next_click(&mut self) -> impl Future<Output = Option<ClickEvent>> + Send;
}

impl ClickSource for flume::Receiver<ClickEvent> {
    async fn next_click(&mut self) -> Option<ClickEvent> {
        self.recv_async().await.ok()
    }
}

impl ClickSource for mpsc::Receiver<ClickEvent> {
    async fn next_click(&mut self) -> Option<ClickEvent> {
        self.recv().await
    }
}

impl<T: TextSource> TextSource for Arc<T> {
    fn value(&self) -> String {
        (**self).value()
    }
}

impl<T: TextSink> TextSink for Arc<T> {
    fn set_text(&self, text: String) {
        (**self).set_text(text)
    }
}

/// In-memory input field. Clones share the same value.
#[derive(Debug, Clone, Default)]
pub struct InputField(Arc<RwLock<String>>);

impl InputField {
    pub fn new(value: impl Into<String>) -> Self {
        Self(Arc::new(RwLock::new(value.into())))
    }

    pub fn set_value(&self, value: impl Into<String>) {
        let mut guard = self.0.write().unwrap_or_else(|poisoned| poisoned.into_inner());
        *guard = value.into();
    }
}

impl TextSource for InputField {
    fn value(&self) -> String {
        self.0
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

/// In-memory result element. Clones share the same text.
///
/// Keeps a write counter and a watch channel so callers can wait for the next render.
#[derive(Debug, Clone)]
pub struct DisplayElement {
    text: Arc<watch::Sender<String>>,
    writes: Arc<AtomicUsize>,
}

impl Default for DisplayElement {
    fn default() -> Self {
        let (tx, _rx) = watch::channel(String::new());
        Self {
            text: Arc::new(tx),
            writes: Arc::new(AtomicUsize::new(0)),
        }
    }
}

impl DisplayElement {
    pub fn text(&self) -> String {
        self.text.borrow().clone()
    }

    /// Number of times the text has been set.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    pub fn subscribe(&self) -> watch::Receiver<String> {
        self.text.subscribe()
    }
}

impl TextSink for DisplayElement {
    fn set_text(&self, text: String) {
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.text.send_replace(text);
    }
}

/// Click source of the terminal front-end: each submitted line is typed into the input field
/// and clicked.
///
/// The value is set when the click is taken, so the handler always reads its own line.
#[derive(Debug)]
pub struct LineClicks {
    lines: flume::Receiver<String>,
    input: InputField,
}

impl LineClicks {
    pub fn new(lines: flume::Receiver<String>, input: InputField) -> Self {
        Self { lines, input }
    }
}

impl ClickSource for LineClicks {
    async fn next_click(&mut self) -> Option<ClickEvent> {
        let line = self.lines.recv_async().await.ok()?;
        self.input.set_value(line);
        Some(ClickEvent)
    }
}

/// Result element of the terminal front-end: each render is one line on stdout.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdoutDisplay;

impl TextSink for StdoutDisplay {
    fn set_text(&self, text: String) {
        let mut out = std::io::stdout().lock();
        if let Err(e) = writeln!(out, "{text}").and_then(|_| out.flush()) {
            tracing::warn!(error = %e, "failed to write result to stdout");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn input_clones_share_value() {
        let input = InputField::new("1,2");
        let other = input.clone();
        other.set_value("3,4");
        assert_eq!(input.value(), "3,4");
    }

    #[test]
    fn display_overwrites_and_counts() {
        let display = DisplayElement::default();
        assert_eq!(display.text(), "");
        display.set_text("Predição: 1".into());
        display.set_text("Erro: boom".into());
        assert_eq!(display.text(), "Erro: boom");
        assert_eq!(display.write_count(), 2);
    }

    #[tokio::test]
    async fn display_subscribers_see_renders() {
        let display = DisplayElement::default();
        let mut rx = display.subscribe();
        let writer = display.clone();
        tokio::spawn(async move { writer.set_text("Predição: 9".into()) });
        rx.changed().await.expect("sender alive");
        assert_eq!(*rx.borrow(), "Predição: 9");
    }

    #[tokio::test]
    async fn line_clicks_type_before_clicking() {
        let input = InputField::default();
        let (tx, rx) = flume::unbounded();
        let mut clicks = LineClicks::new(rx, input.clone());
        tx.send("1,2".to_string()).unwrap();
        tx.send("3".to_string()).unwrap();
        drop(tx);

        assert_eq!(clicks.next_click().await, Some(ClickEvent));
        assert_eq!(input.value(), "1,2");
        assert_eq!(clicks.next_click().await, Some(ClickEvent));
        assert_eq!(input.value(), "3");
        assert_eq!(clicks.next_click().await, None);
    }

    #[tokio::test]
    async fn flume_click_source_ends_when_senders_drop() {
        let (tx, mut rx) = flume::unbounded();
        tx.send(ClickEvent).unwrap();
        drop(tx);
        assert_eq!(rx.next_click().await, Some(ClickEvent));
        assert_eq!(rx.next_click().await, None);
    }
}
