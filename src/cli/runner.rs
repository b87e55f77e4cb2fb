//! CLI runner - executes commands

use crate::cli::commands::{Action, Cli, Commands, OutputFormat};
use crate::config::ReplayConfig;
use crate::error::{Error, Result};
use crate::listing::map_listing;
use crate::model::PaginationDataLoadingModel;
use crate::state::{LoadingState, StateKind};
use serde_json::{json, Value};
use std::path::Path;
use tracing::{info, warn};

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        match &self.cli.command {
            Commands::Replay { fixture, actions } => self.replay(fixture, actions).await,
            Commands::Validate { fixture } => self.validate(fixture),
        }
    }

    async fn replay(&self, fixture: &Path, actions: &[Action]) -> Result<()> {
        let config = ReplayConfig::from_file(fixture)?;
        replay(&config, actions, |msg| self.output_message(&msg)).await
    }

    fn validate(&self, fixture: &Path) -> Result<()> {
        let config = ReplayConfig::from_file(fixture)?;
        let summary = summarize(&config)?;
        self.output_message(&summary);

        self.output_message(&log_message(
            "INFO",
            format!(
                "Fixture '{}' is valid with {} pages",
                fixture.display(),
                config.pages.len()
            ),
        ));
        Ok(())
    }

    /// Output a message
    fn output_message(&self, msg: &Value) {
        match self.cli.format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string(msg).unwrap_or_default());
            }
            OutputFormat::Pretty => {
                println!("{}", serde_json::to_string_pretty(msg).unwrap_or_default());
            }
        }
    }
}

/// Run `actions` against a model serving the fixture, emitting the state
/// published when each load starts and once it settles
async fn replay(
    config: &ReplayConfig,
    actions: &[Action],
    mut emit: impl FnMut(Value),
) -> Result<()> {
    let model: PaginationDataLoadingModel<_> =
        PaginationDataLoadingModel::builder(config.page_configuration().into_cursor())
            .config(config.model.clone())
            .build()
            .into();

    info!(
        pages = config.pages.len(),
        actions = actions.len(),
        overlap = %config.model.overlap,
        "Replaying fixture"
    );
    emit(state_message(0, "start", "settled", &model.state()));

    for (index, action) in actions.iter().enumerate() {
        let step = index + 1;
        let task = match action {
            Action::Reload => model.reload(),
            Action::Retry => model.retry(),
            Action::More if model.state_kind() == StateKind::Exhausted => {
                warn!(step, "Load more requested on an exhausted model");
                emit(log_message(
                    "ERROR",
                    format!("Step {step}: cannot load more, the model is exhausted"),
                ));
                continue;
            }
            Action::More => model.load_more(),
        };

        emit(state_message(step, action.as_str(), "started", &model.state()));
        task.await?;
        emit(state_message(step, action.as_str(), "settled", &model.state()));
    }

    Ok(())
}

/// Map every fixture page and summarize totals
fn summarize(config: &ReplayConfig) -> Result<Value> {
    let mut pages = Vec::with_capacity(config.pages.len());
    let mut elements = 0;
    let mut total_count = 0;

    for (index, page) in config.pages.iter().enumerate() {
        let listing = map_listing(page.clone(), &config.listing)
            .map_err(|e| Error::config(format!("page {}: {e}", index + 1)))?;

        elements += listing.results.len();
        total_count = listing.total_count;
        pages.push(json!({
            "page": index + 1,
            "total_count": listing.total_count,
            "results": listing.results.len(),
        }));
    }

    Ok(json!({
        "type": "SUMMARY",
        "summary": {
            "pages": pages,
            "elements": elements,
            "total_count": total_count,
            "complete": elements >= total_count,
            "fail_pages": config.fail_pages,
        }
    }))
}

fn state_message(
    step: usize,
    action: &str,
    phase: &str,
    state: &LoadingState<Vec<Value>>,
) -> Value {
    json!({
        "type": "STATE",
        "step": step,
        "action": action,
        "phase": phase,
        "state": state_json(state),
    })
}

fn log_message(level: &str, message: String) -> Value {
    json!({
        "type": "LOG",
        "log": {
            "level": level,
            "message": message
        }
    })
}

fn state_json(state: &LoadingState<Vec<Value>>) -> Value {
    let mut out = json!({ "state": state.kind().as_str() });

    match state {
        LoadingState::Loaded {
            result,
            previous_results,
        } => {
            out["result"] = Value::Array(result.clone());
            out["previous_results"] =
                Value::Array(previous_results.iter().cloned().map(Value::Array).collect());
        }
        LoadingState::Error { error, .. } => {
            out["error"] = Value::String(error.to_string());
            out["retryable"] = Value::Bool(error.is_retryable());
        }
        _ => {}
    }

    if let Some(after) = state.after() {
        out["after"] = state_json(after);
    }
    out
}
