pub mod cli;
pub mod controller;
pub mod messages;
pub mod surface;
pub mod tokens;
pub mod tracing_setup;
pub mod user_config;

use std::path::PathBuf;
use std::sync::Arc;

use predizer_client::HttpPredictor;
use predizer_error::{DomainError, ErrorPolicy, ResultExt, TracingPolicy};
use tokio::io::{AsyncBufReadExt, BufReader};

pub use cli::Cli;
pub use controller::{
    ClickOutcome, EmptyInputPolicy, PredictionFormController, RenderKind, RenderSettings,
    RunSummary,
};
pub use surface::{
    ClickEvent, ClickSource, DisplayElement, InputField, LineClicks, StdoutDisplay, TextSink,
    TextSource,
};
pub use tokens::{RenderPolicy, RequestToken, RequestTokens};
pub use user_config::FormConfig;

pub type TerminalController = PredictionFormController<InputField, StdoutDisplay, HttpPredictor>;

pub async fn try_main(cli: Cli) -> color_eyre::Result<()> {
    dotenvy::dotenv().ok();

    let config = resolve_config(&cli)?;
    if cli.save_config {
        let path = save_config(&cli, &config)?;
        println!("saved configuration to {}", path.display());
        return Ok(());
    }

    let _guards = tracing_setup::init_tracing(&config.log_dir())?;
    tracing::info!(endpoint = %config.endpoint, "predizer starting");

    let input = InputField::default();
    let controller = Arc::new(
        PredictionFormController::new(
            input.clone(),
            StdoutDisplay,
            HttpPredictor::new(config.http_config()),
        )
        .with_settings(config.render_settings()),
    );

    match cli.features {
        Some(features) => submit_once(&controller, &input, features).await,
        None => {
            let summary = run_terminal(controller, input).await;
            tracing::info!(?summary, "predizer finished");
            Ok(())
        }
    }
}

/// File and `PREDIZER_*` settings with the command-line flags applied on top.
pub fn resolve_config(cli: &Cli) -> color_eyre::Result<FormConfig> {
    let loaded = FormConfig::load_from(&cli.config_path(), None)?;
    Ok(cli.apply_to(loaded))
}

/// Persist `config` to the invocation's config file, returning the path written.
pub fn save_config(cli: &Cli, config: &FormConfig) -> color_eyre::Result<PathBuf> {
    let path = cli.config_path();
    config.save_to_path(&path)?;
    tracing::info!(path = %path.display(), "saved configuration");
    Ok(path)
}

/// One click with the given input; the handler's unhandled failure becomes the exit error.
pub async fn submit_once(
    controller: &TerminalController,
    input: &InputField,
    features: String,
) -> color_eyre::Result<()> {
    input.set_value(features);
    controller
        .on_predict_clicked()
        .await
        .map_err(predizer_error::Error::from)
        .emit_event(&TracingPolicy)?;
    Ok(())
}

/// Each stdin line becomes the input value followed by a click. Ends at EOF once every
/// in-flight request has finished.
pub async fn run_terminal(controller: Arc<TerminalController>, input: InputField) -> RunSummary {
    let (line_tx, line_rx) = flume::unbounded();

    let reader = tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            match lines.next_line().await {
                Ok(Some(line)) => {
                    if line_tx.send_async(line).await.is_err() {
                        break;
                    }
                }
                Ok(None) => break,
                Err(e) => {
                    TracingPolicy.emit(
                        &DomainError::Io {
                            message: format!("failed to read stdin: {e}"),
                        }
                        .into(),
                    );
                    break;
                }
            }
        }
    });

    let summary = controller
        .run(LineClicks::new(line_rx, input), &TracingPolicy)
        .await;
    if let Err(e) = reader.await {
        tracing::warn!(error = %e, "stdin reader task failed");
    }
    summary
}
